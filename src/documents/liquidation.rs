//! Payment settlement statement ("Etat de liquidation").
//!
//! The statement is a two-table form: the agent's identity row, then one
//! row per pay element (salary, family charge, gross, RCAR, net). Every
//! number is printed with a decimal comma.

use crate::format::{DateStyle, format_date, two_decimals, with_decimal_comma};
use crate::models::{Document, DocumentKind, Employee, MonthlyData, SalaryCalculation};

use super::{PRESIDENT, letterhead};

const ZERO_AMOUNT: &str = "0,00";

/// Derives the settlement statement of an agent for a month.
///
/// Each table row is flattened into `{row}.{column}` fields, e.g.
/// `salaire.total` or `rcar.taux`.
pub fn derive_liquidation(
    employee: &Employee,
    monthly: &MonthlyData,
    salary: &SalaryCalculation,
) -> Document {
    let mut document = Document::new(
        DocumentKind::Liquidation,
        "Etat de Liquidation",
        &letterhead("C/T DE HASSI BERKANE"),
    );

    document.push("exercice", format!("Exercice {}", monthly.year));

    document.push("agent.prenom", employee.first_name.to_uppercase());
    document.push("agent.nom", employee.last_name.to_uppercase());
    document.push("agent.cin", employee.national_id.to_uppercase());
    document.push("agent.code_budgetaire", employee.budget_code.as_str());
    document.push("agent.emploi", employee.grade.as_str());

    document.push(
        "periode",
        format!(
            "Du:{}\nau:{}",
            format_date(monthly.service_start, DateStyle::Slashed),
            format_date(monthly.service_end, DateStyle::Slashed)
        ),
    );

    let gross = with_decimal_comma(&salary.gross_total);

    document.push("salaire.nature", employee.grade.as_str());
    document.push(
        "salaire.prix_journee",
        with_decimal_comma(&two_decimals(salary.daily_rate)),
    );
    document.push(
        "salaire.nombre_jours",
        with_decimal_comma(&salary.day_count.to_string()),
    );
    document.push("salaire.total", gross.as_str());
    document.push("salaire.periode", "0");

    document.push("charge_famille.nature", "Charge de famille");
    document.push("charge_famille.prix_journee", "0");
    document.push("charge_famille.nombre_jours", "0");
    document.push("charge_famille.total", ZERO_AMOUNT);
    document.push("charge_famille.periode", "0");

    document.push("total_brut.nature", "Total Brute");
    document.push("total_brut.prix_journee", "");
    document.push("total_brut.nombre_jours", "0");
    document.push("total_brut.total", gross.as_str());
    document.push("total_brut.periode", ZERO_AMOUNT);

    document.push("rcar.nature", "R.C.A.R");
    document.push("rcar.prix_journee", "");
    document.push("rcar.taux", if employee.rcar_enabled { "6%" } else { "0%" });
    document.push("rcar.total", with_decimal_comma(&salary.retention_amount));
    document.push("rcar.periode", ZERO_AMOUNT);

    document.push("net.nature", "Net à Ordonnancer");
    document.push("net.total", with_decimal_comma(&salary.net_total));
    document.push("net.periode", ZERO_AMOUNT);

    document.push(
        "lieu_date",
        format!(
            "HASSI BERKANE Le:{}",
            format_date(monthly.service_end, DateStyle::Slashed)
        ),
    );
    document.push("signataire", PRESIDENT);

    document
}
