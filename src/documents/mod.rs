//! Administrative document derivation.
//!
//! Each deriver turns an agent, a monthly record and (where amounts are
//! printed) the salary breakdown into a [`Document`]: the exact text of
//! every field, with dates and numbers already formatted the way that
//! document prints them.
//!
//! | Document    | Dates        | Decimal separator |
//! |-------------|--------------|-------------------|
//! | Decision    | `DD-MM-YYYY` | point             |
//! | Engagement  | `DD/MM/YYYY` | n/a               |
//! | Liquidation | `DD/MM/YYYY` | comma             |

mod decision;
mod engagement;
mod liquidation;

pub use decision::derive_decision;
pub use engagement::{courtesy_title, derive_engagement};
pub use liquidation::derive_liquidation;

use crate::models::{Document, DocumentKind, Employee, MonthlyData, SalaryCalculation};

/// Letterhead lines shared by every document.
pub const ADMINISTRATION_HEADER: [&str; 5] = [
    "ROYAUME DU MAROC",
    "MINISTERE DE L’INTERIEUR",
    "PROVINCE DE NADOR",
    "CERCLE DE LOUTA",
    "CAIDAT HASSI BERKANE",
];

/// Grade printed when the agent has none.
pub const FALLBACK_GRADE: &str = "Ouvrier Spécialisé";

/// Bank printed when the agent has none.
pub const FALLBACK_BANK: &str = "Al Barid Bank";

/// Signature block of the commune's president.
pub(crate) const PRESIDENT: &str = "Le président";

/// Builds the letterhead of a document: the shared lines plus the
/// document's own commune line.
pub(crate) fn letterhead(commune_line: &'static str) -> Vec<&'static str> {
    let mut lines = ADMINISTRATION_HEADER.to_vec();
    lines.push(commune_line);
    lines
}

/// Returns the grade to print, falling back to [`FALLBACK_GRADE`].
pub(crate) fn display_grade(employee: &Employee) -> &str {
    if employee.grade.is_empty() {
        FALLBACK_GRADE
    } else {
        &employee.grade
    }
}

/// Derives any of the three documents.
///
/// The engagement letter prints no amounts and ignores `salary`.
///
/// # Example
///
/// ```
/// use agent_payroll::calculation::calculate_salary;
/// use agent_payroll::config::ConfigLoader;
/// use agent_payroll::documents::derive_document;
/// use agent_payroll::models::{DocumentKind, Employee, MonthlyData, MonthlyKey};
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     last_name: "BENALI".to_string(),
///     first_name: "Karim".to_string(),
///     national_id: "S123456".to_string(),
///     bank_name: String::new(),
///     account_number: "350810000000000000000000".to_string(),
///     budget_code: "1020201014".to_string(),
///     grade: "Ouvrier Qualifié".to_string(),
///     duty: "Service de recette".to_string(),
///     rcar_enabled: false,
/// };
/// let key = MonthlyKey::new("emp_001", 2024, 0).unwrap();
/// let mut monthly = MonthlyData::with_defaults(&key).unwrap();
/// monthly.worked_days.extend(1..=10);
/// let salary = calculate_salary(Some(&employee), Some(&monthly), loader.wage_table());
///
/// let document = derive_document(DocumentKind::Liquidation, &employee, &monthly, &salary);
/// assert_eq!(document.field("salaire.total"), Some("1054,00"));
/// ```
pub fn derive_document(
    kind: DocumentKind,
    employee: &Employee,
    monthly: &MonthlyData,
    salary: &SalaryCalculation,
) -> Document {
    match kind {
        DocumentKind::Decision => derive_decision(employee, monthly, salary),
        DocumentKind::Engagement => derive_engagement(employee, monthly),
        DocumentKind::Liquidation => derive_liquidation(employee, monthly, salary),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{Employee, MonthlyData, MonthlyKey};

    pub fn create_test_employee() -> Employee {
        Employee {
            id: "emp_001".to_string(),
            last_name: "BENALI".to_string(),
            first_name: "Karim".to_string(),
            national_id: "S123456".to_string(),
            bank_name: "Al Barid Bank".to_string(),
            account_number: "350810000000000000000000".to_string(),
            budget_code: "1020201014".to_string(),
            grade: "Ouvrier Spécialisé".to_string(),
            duty: "Service de Recette".to_string(),
            rcar_enabled: true,
        }
    }

    pub fn create_test_month() -> MonthlyData {
        let key = MonthlyKey::new("emp_001", 2024, 0).unwrap();
        let mut data = MonthlyData::with_defaults(&key).unwrap();
        data.worked_days.extend(1..=5);
        data
    }
}
