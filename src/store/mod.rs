//! Record storage for agents and their monthly records.
//!
//! [`RecordStore`] abstracts where records live. Two backends are
//! provided:
//!
//! - [`LocalStore`]: an in-memory cache, optionally persisted to a JSON
//!   file after every write.
//! - [`MirroredStore`]: a local cache in front of a remote store. Writes
//!   always land locally; reads prefer the remote and fall back to the
//!   cache when it is unavailable.

mod local;
mod mirrored;

pub use local::LocalStore;
pub use mirrored::MirroredStore;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{Employee, MonthlyData, MonthlyKey};

/// Full content of a store, used for export, import and the JSON file of
/// a [`LocalStore`].
///
/// Monthly records are keyed by [`MonthlyKey::storage_key`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// All registered agents.
    #[serde(default)]
    pub employees: Vec<Employee>,
    /// All saved monthly records. Legacy exports name this section
    /// `monthly`.
    #[serde(default, alias = "monthly")]
    pub monthly_records: BTreeMap<String, MonthlyData>,
}

impl StoreSnapshot {
    /// Checks every monthly record with [`MonthlyData::validate`].
    ///
    /// # Errors
    ///
    /// Returns the first `InvalidMonth` or `InvalidDay` found.
    pub fn validate(&self) -> EngineResult<()> {
        self.monthly_records
            .values()
            .try_for_each(MonthlyData::validate)
    }
}

/// Persistent storage of agents and monthly records.
///
/// Implementations must be safe to share between request handlers.
pub trait RecordStore: Send + Sync {
    /// Returns every agent, sorted by last name.
    fn list_employees(&self) -> EngineResult<Vec<Employee>>;

    /// Returns one agent, or `None` if the id is unknown.
    fn get_employee(&self, id: &str) -> EngineResult<Option<Employee>>;

    /// Inserts or replaces an agent and returns the stored record.
    ///
    /// The last name and national ID are upper-cased; an empty id is
    /// replaced by a freshly generated one.
    fn save_employee(&self, employee: Employee) -> EngineResult<Employee>;

    /// Removes an agent. Returns `false` if the id was unknown.
    ///
    /// The agent's monthly records are kept.
    fn delete_employee(&self, id: &str) -> EngineResult<bool>;

    /// Returns a saved monthly record, or `None` if it was never edited.
    fn get_monthly(&self, key: &MonthlyKey) -> EngineResult<Option<MonthlyData>>;

    /// Inserts or replaces a monthly record, stamping `updated_at`, and
    /// returns the stored record.
    fn save_monthly(&self, data: MonthlyData) -> EngineResult<MonthlyData>;

    /// Edits a monthly record in place and returns the stored result.
    ///
    /// The record is read, edited, stamped and saved under one lock, so
    /// concurrent edits of the same month are never lost. A record that
    /// was never saved starts from [`MonthlyData::with_defaults`]. When
    /// `edit` fails nothing is saved.
    fn update_monthly(
        &self,
        key: &MonthlyKey,
        edit: &mut dyn FnMut(&mut MonthlyData) -> EngineResult<()>,
    ) -> EngineResult<MonthlyData>;

    /// Exports the full content of the store.
    fn snapshot(&self) -> EngineResult<StoreSnapshot>;

    /// Replaces the full content of the store.
    ///
    /// The snapshot is checked with [`StoreSnapshot::validate`] first; an
    /// invalid snapshot leaves the store untouched.
    fn restore(&self, snapshot: StoreSnapshot) -> EngineResult<()>;
}

/// Loads a monthly record, or builds the default one if it was never saved.
///
/// The default record is not written back; it is persisted by the first
/// edit.
pub fn load_monthly_or_default(
    store: &dyn RecordStore,
    key: &MonthlyKey,
) -> EngineResult<MonthlyData> {
    match store.get_monthly(key)? {
        Some(data) => Ok(data),
        None => MonthlyData::with_defaults(key),
    }
}

/// Returns the agents matching a free-text search, sorted by last name.
///
/// See [`Employee::matches_search`].
pub fn search_employees(store: &dyn RecordStore, search: &str) -> EngineResult<Vec<Employee>> {
    let employees = store.list_employees()?;
    Ok(employees
        .into_iter()
        .filter(|employee| employee.matches_search(search))
        .collect())
}

/// Sorts agents the way listings present them: by last name, then first
/// name.
pub(crate) fn sort_employees(employees: &mut [Employee]) {
    employees.sort_by(|a, b| {
        a.last_name
            .cmp(&b.last_name)
            .then_with(|| a.first_name.cmp(&b.first_name))
    });
}
