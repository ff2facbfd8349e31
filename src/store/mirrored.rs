//! Local cache mirrored to a remote record store.

use tracing::warn;

use crate::error::EngineResult;
use crate::models::{Employee, MonthlyData, MonthlyKey};

use super::{LocalStore, RecordStore, StoreSnapshot};

/// A [`LocalStore`] cache in front of a remote [`RecordStore`].
///
/// - Writes go to the cache first, then to the remote. A remote failure
///   is logged and the write still succeeds.
/// - Reads ask the remote first and refresh the cache with the answer.
///   When the remote fails, the cached copy is served.
///
/// # Example
///
/// ```
/// use agent_payroll::store::{LocalStore, MirroredStore, RecordStore};
///
/// let store = MirroredStore::new(LocalStore::in_memory(), LocalStore::in_memory());
/// assert!(store.list_employees().unwrap().is_empty());
/// ```
#[derive(Debug)]
pub struct MirroredStore<R> {
    local: LocalStore,
    remote: R,
}

impl<R: RecordStore> MirroredStore<R> {
    /// Creates a mirrored store from a local cache and a remote backend.
    pub fn new(local: LocalStore, remote: R) -> Self {
        Self { local, remote }
    }

    /// Returns the local cache.
    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    /// Returns the remote backend.
    pub fn remote(&self) -> &R {
        &self.remote
    }
}

impl<R: RecordStore> RecordStore for MirroredStore<R> {
    fn list_employees(&self) -> EngineResult<Vec<Employee>> {
        match self.remote.list_employees() {
            Ok(employees) => {
                self.local.replace_employees(employees.clone())?;
                Ok(employees)
            }
            Err(err) => {
                warn!(error = %err, "Remote store unavailable, listing cached employees");
                self.local.list_employees()
            }
        }
    }

    fn get_employee(&self, id: &str) -> EngineResult<Option<Employee>> {
        match self.remote.get_employee(id) {
            Ok(Some(employee)) => {
                self.local.cache_employee(employee.clone())?;
                Ok(Some(employee))
            }
            Ok(None) => Ok(None),
            Err(err) => {
                warn!(error = %err, employee_id = %id, "Remote store unavailable, reading cached employee");
                self.local.get_employee(id)
            }
        }
    }

    fn save_employee(&self, employee: Employee) -> EngineResult<Employee> {
        let saved = self.local.save_employee(employee)?;
        if let Err(err) = self.remote.save_employee(saved.clone()) {
            warn!(error = %err, employee_id = %saved.id, "Failed to mirror employee to remote store");
        }
        Ok(saved)
    }

    fn delete_employee(&self, id: &str) -> EngineResult<bool> {
        let removed_locally = self.local.delete_employee(id)?;
        match self.remote.delete_employee(id) {
            Ok(removed_remotely) => Ok(removed_locally || removed_remotely),
            Err(err) => {
                warn!(error = %err, employee_id = %id, "Failed to mirror employee deletion to remote store");
                Ok(removed_locally)
            }
        }
    }

    fn get_monthly(&self, key: &MonthlyKey) -> EngineResult<Option<MonthlyData>> {
        match self.remote.get_monthly(key) {
            Ok(Some(data)) => {
                self.local.cache_monthly(data.clone())?;
                Ok(Some(data))
            }
            Ok(None) => Ok(None),
            Err(err) => {
                warn!(
                    error = %err,
                    storage_key = %key.storage_key(),
                    "Remote store unavailable, reading cached monthly record"
                );
                self.local.get_monthly(key)
            }
        }
    }

    fn save_monthly(&self, data: MonthlyData) -> EngineResult<MonthlyData> {
        let saved = self.local.save_monthly(data)?;
        if let Err(err) = self.remote.save_monthly(saved.clone()) {
            warn!(
                error = %err,
                storage_key = %saved.key().storage_key(),
                "Failed to mirror monthly record to remote store"
            );
        }
        Ok(saved)
    }

    fn update_monthly(
        &self,
        key: &MonthlyKey,
        edit: &mut dyn FnMut(&mut MonthlyData) -> EngineResult<()>,
    ) -> EngineResult<MonthlyData> {
        // start from the remote copy when there is one
        match self.remote.get_monthly(key) {
            Ok(Some(data)) => self.local.cache_monthly(data)?,
            Ok(None) => {}
            Err(err) => warn!(
                error = %err,
                storage_key = %key.storage_key(),
                "Remote store unavailable, editing cached monthly record"
            ),
        }

        let updated = self.local.update_monthly(key, edit)?;
        if let Err(err) = self.remote.save_monthly(updated.clone()) {
            warn!(
                error = %err,
                storage_key = %key.storage_key(),
                "Failed to mirror monthly record to remote store"
            );
        }
        Ok(updated)
    }

    fn snapshot(&self) -> EngineResult<StoreSnapshot> {
        match self.remote.snapshot() {
            Ok(snapshot) => Ok(snapshot),
            Err(err) => {
                warn!(error = %err, "Remote store unavailable, exporting cached records");
                self.local.snapshot()
            }
        }
    }

    fn restore(&self, snapshot: StoreSnapshot) -> EngineResult<()> {
        self.local.restore(snapshot.clone())?;
        if let Err(err) = self.remote.restore(snapshot) {
            warn!(error = %err, "Failed to mirror import to remote store");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::error::EngineError;
    use crate::store::test_support::create_test_employee;

    /// A remote that can be switched off.
    #[derive(Default)]
    struct FlakyRemote {
        inner: LocalStore,
        offline: AtomicBool,
    }

    impl FlakyRemote {
        fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }

        fn check(&self) -> EngineResult<()> {
            if self.offline.load(Ordering::SeqCst) {
                Err(EngineError::Storage {
                    message: "remote unreachable".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    impl RecordStore for FlakyRemote {
        fn list_employees(&self) -> EngineResult<Vec<Employee>> {
            self.check()?;
            self.inner.list_employees()
        }

        fn get_employee(&self, id: &str) -> EngineResult<Option<Employee>> {
            self.check()?;
            self.inner.get_employee(id)
        }

        fn save_employee(&self, employee: Employee) -> EngineResult<Employee> {
            self.check()?;
            self.inner.save_employee(employee)
        }

        fn delete_employee(&self, id: &str) -> EngineResult<bool> {
            self.check()?;
            self.inner.delete_employee(id)
        }

        fn get_monthly(&self, key: &MonthlyKey) -> EngineResult<Option<MonthlyData>> {
            self.check()?;
            self.inner.get_monthly(key)
        }

        fn save_monthly(&self, data: MonthlyData) -> EngineResult<MonthlyData> {
            self.check()?;
            self.inner.save_monthly(data)
        }

        fn update_monthly(
            &self,
            key: &MonthlyKey,
            edit: &mut dyn FnMut(&mut MonthlyData) -> EngineResult<()>,
        ) -> EngineResult<MonthlyData> {
            self.check()?;
            self.inner.update_monthly(key, edit)
        }

        fn snapshot(&self) -> EngineResult<StoreSnapshot> {
            self.check()?;
            self.inner.snapshot()
        }

        fn restore(&self, snapshot: StoreSnapshot) -> EngineResult<()> {
            self.check()?;
            self.inner.restore(snapshot)
        }
    }

    fn create_mirrored() -> MirroredStore<FlakyRemote> {
        MirroredStore::new(LocalStore::in_memory(), FlakyRemote::default())
    }

    fn create_test_month(employee_id: &str) -> MonthlyData {
        let key = MonthlyKey::new(employee_id, 2024, 2).unwrap();
        MonthlyData::with_defaults(&key).unwrap()
    }

    #[test]
    fn test_writes_reach_both_sides() {
        let store = create_mirrored();

        let saved = store.save_employee(create_test_employee("", "benali", "Karim")).unwrap();
        store.save_monthly(create_test_month(&saved.id)).unwrap();

        assert_eq!(store.local().get_employee(&saved.id).unwrap(), Some(saved.clone()));
        assert_eq!(store.remote().inner.get_employee(&saved.id).unwrap(), Some(saved.clone()));

        let key = MonthlyKey::new(saved.id.as_str(), 2024, 2).unwrap();
        assert!(store.local().get_monthly(&key).unwrap().is_some());
        assert!(store.remote().inner.get_monthly(&key).unwrap().is_some());
    }

    #[test]
    fn test_remote_failure_does_not_fail_writes() {
        let store = create_mirrored();
        store.remote().set_offline(true);

        let saved = store.save_employee(create_test_employee("emp_001", "BENALI", "Karim")).unwrap();
        store.save_monthly(create_test_month("emp_001")).unwrap();

        assert_eq!(saved.id, "emp_001");
        assert_eq!(store.remote().inner.get_employee("emp_001").unwrap(), None);
        assert!(store.local().get_employee("emp_001").unwrap().is_some());
    }

    #[test]
    fn test_reads_fall_back_to_cache() {
        let store = create_mirrored();
        store.save_employee(create_test_employee("emp_001", "BENALI", "Karim")).unwrap();
        let month = store.save_monthly(create_test_month("emp_001")).unwrap();

        store.remote().set_offline(true);

        assert_eq!(store.list_employees().unwrap().len(), 1);
        assert!(store.get_employee("emp_001").unwrap().is_some());
        assert_eq!(store.get_monthly(&month.key()).unwrap(), Some(month));
        assert_eq!(store.snapshot().unwrap().employees.len(), 1);
    }

    #[test]
    fn test_reads_refresh_cache_from_remote() {
        let store = create_mirrored();
        store
            .remote()
            .inner
            .save_employee(create_test_employee("remote_only", "ZIANI", "Omar"))
            .unwrap();
        let remote_month = store
            .remote()
            .inner
            .save_monthly(create_test_month("remote_only"))
            .unwrap();

        assert_eq!(store.list_employees().unwrap().len(), 1);
        assert_eq!(store.get_monthly(&remote_month.key()).unwrap(), Some(remote_month.clone()));

        store.remote().set_offline(true);
        assert!(store.get_employee("remote_only").unwrap().is_some());
        assert_eq!(store.get_monthly(&remote_month.key()).unwrap(), Some(remote_month));
    }

    #[test]
    fn test_delete_while_offline_removes_locally() {
        let store = create_mirrored();
        store.save_employee(create_test_employee("emp_001", "BENALI", "Karim")).unwrap();
        store.remote().set_offline(true);

        assert!(store.delete_employee("emp_001").unwrap());
        assert_eq!(store.local().get_employee("emp_001").unwrap(), None);
    }

    #[test]
    fn test_restore_mirrors_to_remote() {
        let store = create_mirrored();
        let snapshot = StoreSnapshot {
            employees: vec![create_test_employee("emp_009", "NADORI", "Amine")],
            ..StoreSnapshot::default()
        };

        store.restore(snapshot).unwrap();

        assert!(store.local().get_employee("emp_009").unwrap().is_some());
        assert!(store.remote().inner.get_employee("emp_009").unwrap().is_some());
    }

    #[test]
    fn test_update_monthly_edits_remote_copy() {
        let store = create_mirrored();
        let mut remote_month = create_test_month("emp_001");
        remote_month.worked_days.insert(1);
        let remote_month = store.remote().inner.save_monthly(remote_month).unwrap();

        let updated = store
            .update_monthly(&remote_month.key(), &mut |data| {
                data.worked_days.insert(2);
                Ok(())
            })
            .unwrap();

        assert_eq!(updated.worked_days, [1, 2].into_iter().collect());
        assert_eq!(store.local().get_monthly(&updated.key()).unwrap().unwrap().worked_days.len(), 2);
        assert_eq!(store.remote().inner.get_monthly(&updated.key()).unwrap().unwrap().worked_days.len(), 2);
    }

    #[test]
    fn test_update_monthly_while_offline_edits_cache() {
        let store = create_mirrored();
        store.remote().set_offline(true);
        let key = MonthlyKey::new("emp_001", 2024, 2).unwrap();

        let updated = store
            .update_monthly(&key, &mut |data| {
                data.act_number = "41".to_string();
                Ok(())
            })
            .unwrap();

        assert_eq!(updated.act_number, "41");
        assert_eq!(store.local().get_monthly(&key).unwrap(), Some(updated));
        assert_eq!(store.remote().inner.get_monthly(&key).unwrap(), None);
    }
}
