//! Appointment decree ("Décision").

use crate::format::{DateStyle, format_date, month_name_fr, two_decimals};
use crate::models::{Document, DocumentKind, Employee, MonthlyData, SalaryCalculation};

use super::{FALLBACK_BANK, PRESIDENT, display_grade, letterhead};

const AUTHORITY: &str = "Le président de la commune de HASSI BERKANE .";

const CIVIL_SERVICE_STATUTE: &str = "Vu le dahir N°1.58.008 du 4 Chaoual 1377 ( 24 Février 1958) \
portant statut Général de la fonction publique.";

const TERRITORIAL_ORGANISATION: &str = "Vu le dahir N°1.15.85 du Ramadan 1436 (07-07-2015) \
Portant l’Exécution de La loi n° 14.113 Relative à l’organisation des collectivités territoriales.";

const PUBLIC_ACCOUNTING: &str = "Vu le décret N° 451-17-2 du 4 Rabia 1er 1439 (23 Novembre 2017) \
relatif à la Comptabilité publique des communes et des établissements de coopération entre les communes.";

const SALARY_INTRO: &str = "Le salaire journalier de l’intéressé s’élève à :";

const PAYING_OFFICER: &str =
    "Le percepteur de Zaio est chargé de ce qui concerne l’application de la présente décision.";

/// Derives the appointment decree of an agent for a month.
///
/// The wage line reads `{days}j X {rate} DHS = {gross} DHS` and, when the
/// RCAR retention applies, continues with ` - {retention} DHS = {net} DHS`.
/// Amounts keep the decimal point; the closing date is the end of service.
pub fn derive_decision(
    employee: &Employee,
    monthly: &MonthlyData,
    salary: &SalaryCalculation,
) -> Document {
    let grade = display_grade(employee);
    let month_name = month_name_fr(monthly.month).unwrap_or_default();

    let mut document = Document::new(
        DocumentKind::Decision,
        "DECISION",
        &letterhead("Commune de Hassi Berkane"),
    );

    document.push("autorite", AUTHORITY);
    document.push("vu.statut_general", CIVIL_SERVICE_STATUTE);
    document.push("vu.collectivites_territoriales", TERRITORIAL_ORGANISATION);
    document.push("vu.comptabilite_publique", PUBLIC_ACCOUNTING);
    document.push(
        "vu.lettre_engagement",
        format!(
            "Vu la lettre d’engagement portant l’emploi d’un {} occasionnel N° :{} .",
            grade.to_lowercase(),
            monthly.act_number
        ),
    );
    document.push(
        "vu.credits",
        format!(
            "Vu les crédits ouverts à l’article {} au titre de l’exercice {}.",
            employee.budget_code, monthly.year
        ),
    );

    let agent = format!(
        "{} {} (CIN: {})",
        employee.last_name, employee.first_name, employee.national_id
    )
    .to_uppercase();
    document.push(
        "article_1",
        format!(
            "A compter du : 01 {} {}: {}; {} ; affecté à la commune de HASSI BERKANE ayant comme fonction {}.",
            month_name,
            monthly.year,
            agent,
            grade,
            employee.duty.to_lowercase()
        ),
    );

    document.push("article_2", SALARY_INTRO);
    document.push("article_2.salaire", wage_line(employee, salary));
    document.push(
        "article_2.compte",
        format!(
            ", est versé à son compte {} N°: {} .",
            bank_name(employee),
            employee.account_number
        ),
    );

    document.push("article_3", PAYING_OFFICER);

    document.push(
        "lieu_date",
        format!(
            "Hassi Berkane Le: {}",
            format_date(monthly.service_end, DateStyle::Dashed)
        ),
    );
    document.push("signataire", PRESIDENT);

    document
}

fn wage_line(employee: &Employee, salary: &SalaryCalculation) -> String {
    let mut line = format!(
        "{}j X {} DHS = {} DHS",
        salary.day_count,
        two_decimals(salary.daily_rate),
        salary.gross_total
    );
    if employee.rcar_enabled {
        line.push_str(&format!(
            " - {} DHS = {} DHS",
            salary.retention_amount, salary.net_total
        ));
    }
    line
}

fn bank_name(employee: &Employee) -> &str {
    if employee.bank_name.is_empty() {
        FALLBACK_BANK
    } else {
        &employee.bank_name
    }
}
