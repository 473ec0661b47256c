//! Lazy, composable views over the user and group collections.

use std::sync::Arc;

use polars::prelude::{DataFrame, LazyFrame, col, lit};

use crate::StoreError;
use crate::columns::ID;
use crate::snapshot::Snapshot;
use crate::store::DataStore;

fn frame_ids(df: &DataFrame) -> Result<Vec<String>, StoreError> {
    Ok(df
        .column(ID)?
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect())
}

/// A filtered view of the users of one snapshot.
///
/// Narrowing only extends the query plan. `count`, `ids` and `collect` run
/// it, one fetch each.
#[derive(Clone)]
pub struct UserScope<'a> {
    store: &'a DataStore,
    snapshot: Arc<Snapshot>,
    frame: LazyFrame,
}

impl<'a> UserScope<'a> {
    pub(crate) fn all(store: &'a DataStore, snapshot: Arc<Snapshot>) -> Self {
        let frame = snapshot.users_lazy();
        Self {
            store,
            snapshot,
            frame,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn frame(&self) -> &LazyFrame {
        &self.frame
    }

    /// Replace the query plan with `f(plan, snapshot)`.
    pub fn try_narrow<E>(
        self,
        f: impl FnOnce(LazyFrame, &Snapshot) -> Result<LazyFrame, E>,
    ) -> Result<Self, E> {
        let frame = f(self.frame, &self.snapshot)?;
        Ok(Self {
            store: self.store,
            snapshot: self.snapshot,
            frame,
        })
    }

    #[must_use]
    pub fn where_id(self, id: &str) -> Self {
        Self {
            frame: self.frame.filter(col(ID).eq(lit(id))),
            ..self
        }
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.store.fetch(self.frame.clone().select([col(ID)]))?.height())
    }

    pub fn ids(&self) -> Result<Vec<String>, StoreError> {
        let df = self.store.fetch(self.frame.clone().select([col(ID)]))?;
        frame_ids(&df)
    }

    pub fn collect(&self) -> Result<DataFrame, StoreError> {
        self.store.fetch(self.frame.clone())
    }
}

/// A filtered view of the smart groups of one snapshot.
#[derive(Clone)]
pub struct GroupScope<'a> {
    store: &'a DataStore,
    snapshot: Arc<Snapshot>,
    frame: LazyFrame,
}

impl<'a> GroupScope<'a> {
    pub(crate) fn all(store: &'a DataStore, snapshot: Arc<Snapshot>) -> Self {
        let frame = snapshot.groups_lazy();
        Self {
            store,
            snapshot,
            frame,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn frame(&self) -> &LazyFrame {
        &self.frame
    }

    #[must_use]
    pub fn narrow(self, f: impl FnOnce(LazyFrame, &Snapshot) -> LazyFrame) -> Self {
        let frame = f(self.frame, &self.snapshot);
        Self {
            store: self.store,
            snapshot: self.snapshot,
            frame,
        }
    }

    #[must_use]
    pub fn where_id(self, id: &str) -> Self {
        Self {
            frame: self.frame.filter(col(ID).eq(lit(id))),
            ..self
        }
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.store.fetch(self.frame.clone().select([col(ID)]))?.height())
    }

    /// Group ids, sorted.
    pub fn ids(&self) -> Result<Vec<String>, StoreError> {
        let df = self.store.fetch(self.frame.clone().select([col(ID)]))?;
        let mut ids = frame_ids(&df)?;
        ids.sort();
        Ok(ids)
    }
}
