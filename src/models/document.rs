//! Printable document models.
//!
//! A [`Document`] is the field set of one administrative document, ready to
//! be dropped into a page template: a title, the letterhead lines and an
//! ordered list of labeled text fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The three administrative documents produced for an agent's month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Appointment decree ("Décision").
    Decision,
    /// Hiring letter ("Lettre d'engagement").
    Engagement,
    /// Payment settlement statement ("Etat de liquidation").
    Liquidation,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Decision => write!(f, "decision"),
            DocumentKind::Engagement => write!(f, "engagement"),
            DocumentKind::Liquidation => write!(f, "liquidation"),
        }
    }
}

impl FromStr for DocumentKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "decision" => Ok(DocumentKind::Decision),
            "engagement" => Ok(DocumentKind::Engagement),
            "liquidation" => Ok(DocumentKind::Liquidation),
            _ => Err(EngineError::UnknownDocument {
                kind: s.to_string(),
            }),
        }
    }
}

/// One labeled, fully formatted value of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentField {
    /// Stable identifier of the field in the page template.
    pub label: String,
    /// The text to print.
    pub value: String,
}

/// The complete field set of one document.
///
/// # Example
///
/// ```
/// use agent_payroll::models::{Document, DocumentKind};
///
/// let mut document = Document::new(DocumentKind::Decision, "DECISION", &["ROYAUME DU MAROC"]);
/// document.push("exercice", "2024");
///
/// assert_eq!(document.field("exercice"), Some("2024"));
/// assert_eq!(document.field("missing"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Which document this is.
    pub kind: DocumentKind,
    /// Title printed at the top of the page.
    pub title: String,
    /// Letterhead lines, top to bottom.
    pub header: Vec<String>,
    /// Fields in print order.
    pub fields: Vec<DocumentField>,
}

impl Document {
    /// Creates a document with no fields.
    pub fn new(kind: DocumentKind, title: &str, header: &[&str]) -> Self {
        Self {
            kind,
            title: title.to_string(),
            header: header.iter().map(|line| line.to_string()).collect(),
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    pub fn push(&mut self, label: &str, value: impl Into<String>) {
        self.fields.push(DocumentField {
            label: label.to_string(),
            value: value.into(),
        });
    }

    /// Returns the value of the first field with the given label.
    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.label == label)
            .map(|field| field.value.as_str())
    }

    /// Returns the field labels in print order.
    pub fn labels(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.label.as_str()).collect()
    }
}
