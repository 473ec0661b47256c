use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use polars::prelude::{DataFrame, IntoLazy, LazyFrame, col, lit};
use sg_model::{SmartGroup, User};
use tracing::{debug, info};

use crate::StoreError;
use crate::columns::{ID, custom_field_values, users};
use crate::groups::{decode_groups, group_rows};
use crate::scope::{GroupScope, UserScope};
use crate::snapshot::Snapshot;

/// Shared handle to the current [`Snapshot`].
///
/// Readers take an `Arc` of the snapshot current at the time and keep it
/// for the whole query. Writers build a new snapshot and swap it in under
/// the write lock, so a reader sees either the old or the new version of a
/// smart group, never a mix.
#[derive(Debug)]
pub struct DataStore {
    current: RwLock<Arc<Snapshot>>,
    fetches: AtomicUsize,
}

impl DataStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        // A poisoned lock still holds a whole snapshot: the only write is a
        // single `Arc` assignment.
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Every user, as a lazily filterable scope.
    pub fn users(&self) -> UserScope<'_> {
        UserScope::all(self, self.snapshot())
    }

    /// Every smart group, as a lazily filterable scope.
    pub fn groups(&self) -> GroupScope<'_> {
        GroupScope::all(self, self.snapshot())
    }

    /// Run a query. Each call is one data-fetch round trip.
    pub fn fetch(&self, frame: LazyFrame) -> Result<DataFrame, StoreError> {
        let fetch = self.fetches.fetch_add(1, Ordering::Relaxed) + 1;
        let df = frame.collect()?;
        debug!(fetch, rows = df.height(), "fetched");
        Ok(df)
    }

    /// Number of [`fetch`](Self::fetch) calls so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    pub fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let snapshot = self.snapshot();
        let frame = snapshot.users_lazy().filter(col(ID).eq(lit(id)));
        let df = self.fetch(frame)?;
        if df.height() == 0 {
            return Ok(None);
        }
        let email = df.column(users::EMAIL)?.str()?.get(0).unwrap_or_default();
        let flag = |name: &str| -> Result<bool, StoreError> {
            Ok(df.column(name)?.bool()?.get(0).unwrap_or(false))
        };
        let registration = df
            .column(users::REGISTRATION_COMPLETED_AT)?
            .str()?
            .get(0)
            .and_then(|raw| sg_model::parse_date(raw).ok());
        let domicile = df.column(users::DOMICILE)?.str()?.get(0).map(str::to_string);

        let values = self.fetch(
            snapshot
                .custom_field_values_lazy()
                .filter(col(custom_field_values::USER_ID).eq(lit(id))),
        )?;
        let field_ids = values.column(custom_field_values::CUSTOM_FIELD_ID)?.str()?;
        let field_values = values.column(custom_field_values::VALUE)?.str()?;
        let custom_field_values = field_ids
            .into_iter()
            .zip(field_values)
            .filter_map(|(field, value)| Some((field?.to_string(), value?.to_string())))
            .collect();

        Ok(Some(User {
            id: id.to_string(),
            email: email.to_string(),
            is_admin: flag(users::IS_ADMIN)?,
            is_project_moderator: flag(users::IS_PROJECT_MODERATOR)?,
            verified: flag(users::VERIFIED)?,
            registration_completed_at: registration,
            domicile,
            custom_field_values,
        }))
    }

    /// Every smart group with its rules, in one fetch.
    pub fn load_groups(&self) -> Result<Vec<SmartGroup>, StoreError> {
        let rows = self.fetch(group_rows(&self.snapshot()))?;
        decode_groups(&rows)
    }

    pub fn find_group(&self, id: &str) -> Result<Option<SmartGroup>, StoreError> {
        let rows = self.fetch(group_rows(&self.snapshot()).filter(col(ID).eq(lit(id))))?;
        Ok(decode_groups(&rows)?.into_iter().next())
    }

    /// Insert or replace a smart group, rule list included.
    pub fn save_group(&self, group: &SmartGroup) -> Result<(), StoreError> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let next = guard.with_group(group)?;
        *guard = Arc::new(next);
        info!(group_id = %group.id, rules = group.rules.len(), "saved smart group");
        Ok(())
    }

    /// Remove a smart group. Users and custom fields are left untouched.
    pub fn destroy_group(&self, id: &str) -> Result<bool, StoreError> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let existed = guard
            .groups
            .clone()
            .lazy()
            .filter(col(ID).eq(lit(id)))
            .collect()?
            .height()
            > 0;
        if existed {
            let next = guard.without_group(id)?;
            *guard = Arc::new(next);
            info!(group_id = %id, "destroyed smart group");
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use sg_model::{RuleDefinition, SmartGroup, User};

    use super::*;
    use crate::SnapshotBuilder;

    #[test]
    fn poisoned_lock_keeps_the_last_snapshot() {
        let snapshot = SnapshotBuilder::new()
            .user(User::new("u1", "one@example.org"))
            .build()
            .expect("snapshot");
        let store = DataStore::new(snapshot);

        thread::scope(|scope| {
            let writer = scope.spawn(|| {
                let _guard = store.current.write();
                panic!("writer died holding the lock");
            });
            assert!(writer.join().is_err());
        });
        assert!(store.current.is_poisoned());

        assert_eq!(store.users().ids().expect("ids"), vec!["u1".to_string()]);
        store
            .save_group(&SmartGroup::new(
                "g1",
                vec![RuleDefinition::valueless("role", "is_admin")],
            ))
            .expect("save");
        assert!(store.find_group("g1").expect("find").is_some());
        assert!(store.destroy_group("g1").expect("destroy"));
    }
}
