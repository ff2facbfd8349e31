//! Local record store with optional JSON file persistence.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tempfile::NamedTempFile;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, MonthlyData, MonthlyKey};

use super::{RecordStore, StoreSnapshot, sort_employees};

#[derive(Debug, Clone, Default)]
struct LocalState {
    employees: BTreeMap<String, Employee>,
    monthly_records: BTreeMap<String, MonthlyData>,
}

impl LocalState {
    fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let employees = snapshot
            .employees
            .into_iter()
            .map(|employee| (employee.id.clone(), employee))
            .collect();
        // re-key from the record itself; legacy dumps may carry stale keys
        let monthly_records = snapshot
            .monthly_records
            .into_values()
            .map(|data| (data.key().storage_key(), data))
            .collect();

        Self {
            employees,
            monthly_records,
        }
    }

    fn to_snapshot(&self) -> StoreSnapshot {
        let mut employees: Vec<Employee> = self.employees.values().cloned().collect();
        sort_employees(&mut employees);

        StoreSnapshot {
            employees,
            monthly_records: self.monthly_records.clone(),
        }
    }
}

/// In-memory record store, optionally backed by a JSON file.
///
/// When opened on a file, the whole store is rewritten after every
/// successful write. The file is replaced atomically (write to a fresh
/// temporary file in the same directory, then rename). A write that fails
/// to reach the disk leaves both the file and the in-memory state as they
/// were.
///
/// # Example
///
/// ```
/// use agent_payroll::store::{LocalStore, RecordStore};
///
/// let store = LocalStore::in_memory();
/// assert!(store.list_employees().unwrap().is_empty());
/// ```
#[derive(Debug)]
pub struct LocalStore {
    state: RwLock<LocalState>,
    path: Option<PathBuf>,
}

impl LocalStore {
    /// Creates an empty store that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            state: RwLock::new(LocalState::default()),
            path: None,
        }
    }

    /// Opens a store persisted at `path`.
    ///
    /// A missing file yields an empty store; the file is created by the
    /// first write.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the file exists but cannot be read or parsed,
    /// or holds a monthly record with an out-of-range month or day.
    pub fn open(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref().to_path_buf();

        let state = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| EngineError::Storage {
                message: format!("failed to read {}: {}", path.display(), e),
            })?;
            let snapshot: StoreSnapshot =
                serde_json::from_str(&content).map_err(|e| EngineError::Storage {
                    message: format!("failed to parse {}: {}", path.display(), e),
                })?;
            snapshot.validate().map_err(|e| EngineError::Storage {
                message: format!("invalid record in {}: {}", path.display(), e),
            })?;
            info!(
                path = %path.display(),
                employees = snapshot.employees.len(),
                monthly_records = snapshot.monthly_records.len(),
                "Loaded record store"
            );
            LocalState::from_snapshot(snapshot)
        } else {
            info!(path = %path.display(), "Starting with an empty record store");
            LocalState::default()
        };

        Ok(Self {
            state: RwLock::new(state),
            path: Some(path),
        })
    }

    /// Returns the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Replaces the cached agent list with a fresher copy.
    pub fn replace_employees(&self, employees: Vec<Employee>) -> EngineResult<()> {
        self.update(|state| {
            state.employees = employees
                .into_iter()
                .map(|employee| (employee.id.clone(), employee))
                .collect();
            Ok(())
        })
    }

    /// Caches one agent as-is.
    pub fn cache_employee(&self, employee: Employee) -> EngineResult<()> {
        self.update(|state| {
            state.employees.insert(employee.id.clone(), employee);
            Ok(())
        })
    }

    /// Caches a monthly record as-is, keeping its `updated_at`.
    pub fn cache_monthly(&self, data: MonthlyData) -> EngineResult<()> {
        self.update(|state| {
            state.monthly_records.insert(data.key().storage_key(), data);
            Ok(())
        })
    }

    fn read(&self) -> EngineResult<RwLockReadGuard<'_, LocalState>> {
        self.state.read().map_err(|_| EngineError::Storage {
            message: "record store lock poisoned".to_string(),
        })
    }

    fn write(&self) -> EngineResult<RwLockWriteGuard<'_, LocalState>> {
        self.state.write().map_err(|_| EngineError::Storage {
            message: "record store lock poisoned".to_string(),
        })
    }

    /// Applies `edit` to a copy of the state under the write lock, persists
    /// the copy and only then makes it visible.
    fn update<T>(&self, edit: impl FnOnce(&mut LocalState) -> EngineResult<T>) -> EngineResult<T> {
        let mut state = self.write()?;
        if self.path.is_none() {
            return edit(&mut *state);
        }

        let mut next = state.clone();
        let value = edit(&mut next)?;
        self.persist(&next)?;
        *state = next;
        Ok(value)
    }

    fn persist(&self, state: &LocalState) -> EngineResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let storage_error = |action: &str, e: &dyn std::fmt::Display| EngineError::Storage {
            message: format!("failed to {} {}: {}", action, path.display(), e),
        };

        let json = serde_json::to_vec_pretty(&state.to_snapshot())
            .map_err(|e| storage_error("serialize", &e))?;

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp_file =
            NamedTempFile::new_in(parent).map_err(|e| storage_error("create temp file for", &e))?;
        temp_file
            .write_all(&json)
            .map_err(|e| storage_error("write temp file for", &e))?;
        // the temp file is removed when `persist` fails
        temp_file
            .persist(path)
            .map_err(|e| storage_error("write", &e.error))?;

        debug!(path = %path.display(), "Persisted record store");
        Ok(())
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl RecordStore for LocalStore {
    fn list_employees(&self) -> EngineResult<Vec<Employee>> {
        let state = self.read()?;
        let mut employees: Vec<Employee> = state.employees.values().cloned().collect();
        sort_employees(&mut employees);
        Ok(employees)
    }

    fn get_employee(&self, id: &str) -> EngineResult<Option<Employee>> {
        Ok(self.read()?.employees.get(id).cloned())
    }

    fn save_employee(&self, employee: Employee) -> EngineResult<Employee> {
        let mut employee = employee.normalized();
        if employee.id.is_empty() {
            employee.id = Uuid::new_v4().to_string();
        }

        self.update(|state| {
            state.employees.insert(employee.id.clone(), employee.clone());
            Ok(employee)
        })
    }

    fn delete_employee(&self, id: &str) -> EngineResult<bool> {
        if !self.read()?.employees.contains_key(id) {
            return Ok(false);
        }
        self.update(|state| Ok(state.employees.remove(id).is_some()))
    }

    fn get_monthly(&self, key: &MonthlyKey) -> EngineResult<Option<MonthlyData>> {
        Ok(self.read()?.monthly_records.get(&key.storage_key()).cloned())
    }

    fn save_monthly(&self, mut data: MonthlyData) -> EngineResult<MonthlyData> {
        data.updated_at = Some(Utc::now());

        self.update(|state| {
            state
                .monthly_records
                .insert(data.key().storage_key(), data.clone());
            Ok(data)
        })
    }

    fn update_monthly(
        &self,
        key: &MonthlyKey,
        edit: &mut dyn FnMut(&mut MonthlyData) -> EngineResult<()>,
    ) -> EngineResult<MonthlyData> {
        let storage_key = key.storage_key();

        self.update(|state| {
            let mut data = match state.monthly_records.get(&storage_key) {
                Some(data) => data.clone(),
                None => MonthlyData::with_defaults(key)?,
            };
            edit(&mut data)?;
            data.updated_at = Some(Utc::now());
            state.monthly_records.insert(storage_key, data.clone());
            Ok(data)
        })
    }

    fn snapshot(&self) -> EngineResult<StoreSnapshot> {
        Ok(self.read()?.to_snapshot())
    }

    fn restore(&self, snapshot: StoreSnapshot) -> EngineResult<()> {
        snapshot.validate()?;
        let normalized = StoreSnapshot {
            employees: snapshot
                .employees
                .into_iter()
                .map(Employee::normalized)
                .collect(),
            monthly_records: snapshot.monthly_records,
        };

        self.update(|state| {
            *state = LocalState::from_snapshot(normalized);
            Ok(())
        })
    }
}
