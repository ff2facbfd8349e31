//! Configuration loading for the payroll engine.
//!
//! This module loads the wage table and the registration catalogue from
//! YAML files, or from the copy compiled into the crate.
//!
//! # Example
//!
//! ```no_run
//! use agent_payroll::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/hassi_berkane").unwrap();
//! for (grade, rate) in config.wage_table().grades() {
//!     println!("{grade}: {rate} DHS");
//! }
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EmployeeDefaults, PayrollConfig, RegistrationConfig, WageTable};
