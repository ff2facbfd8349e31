//! Hiring letter ("Lettre d'engagement").

use crate::format::{DateStyle, format_date};
use crate::models::{Document, DocumentKind, Employee, MonthlyData};

use super::display_grade;
use super::letterhead;

const SENDER: &str = "Le président de la commune de Hassi Berkane";

const CLOSING: &str = "Veuillez agréer, monsieur, l’assurance de ma considération Distinguée.";

/// Returns the courtesy title of the addressee: `Mme` for a feminine grade
/// label, `M.` otherwise.
pub fn courtesy_title(grade: &str) -> &'static str {
    if grade.to_lowercase().contains("ouvrière") {
        "Mme"
    } else {
        "M."
    }
}

/// Derives the hiring letter of an agent for a month.
///
/// Dates print as `DD/MM/YYYY`. The letter is dated on the engagement
/// date and references the start of service twice.
pub fn derive_engagement(employee: &Employee, monthly: &MonthlyData) -> Document {
    let grade = display_grade(employee);
    let service_start = format_date(monthly.service_start, DateStyle::Slashed);

    let mut document = Document::new(
        DocumentKind::Engagement,
        "Lettre D’engagement",
        &letterhead("C .DE HASSI BERKANE"),
    );

    document.push(
        "reference",
        format!("N° :{}/{}/S.P", monthly.act_number, monthly.year),
    );

    document.push("destinataire.expediteur", SENDER);
    document.push("destinataire.a", "A");
    document.push(
        "destinataire.agent",
        format!(
            "({} :{} {})",
            courtesy_title(&employee.grade),
            employee.last_name,
            employee.first_name
        )
        .to_uppercase(),
    );

    document.push(
        "corps.qualite",
        format!(
            "J’ai l’honneur de vous faire connaitre que vous êtes employé à la commune de HASSI BERKANE, en qualité d’{}.",
            grade.to_lowercase()
        ),
    );
    document.push(
        "corps.affectation",
        format!(
            "En conséquence vous êtes à compter du : {}, occupé un emploi de la main d’œuvre rétribué \
             sur les crédits du rubrique budgétaire :{},vous percevez à ce titre un salaire mensuel. \
             Vous aurez droit en outre le cas échéant aux allocations familiales servies aux agents \
             de votre catégorie.",
            service_start, employee.budget_code
        ),
    );
    document.push("corps.formule", CLOSING);

    document.push(
        "lieu_date",
        format!(
            "HASSI BERKANE Le : {}",
            format_date(monthly.engagement_date, DateStyle::Slashed)
        ),
    );
    document.push("signataire", "Le Président");
    document.push(
        "prise_de_service",
        format!("Date de Prise de service : {}", service_start),
    );
    document.push("acceptation", "Lu et Accepté");

    document
}
