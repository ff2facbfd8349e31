//! Agent payroll engine for the Commune de Hassi Berkane
//!
//! This crate keeps the register of temporary agents, records the days each
//! agent worked per month, derives the monthly wage from the grade's daily
//! rate (with the optional 6% RCAR retention) and produces the field sets of
//! the three administrative documents: the decision, the engagement letter
//! and the liquidation statement.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod documents;
pub mod error;
pub mod format;
pub mod models;
pub mod store;
