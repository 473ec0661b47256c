//! Loading a dataset directory into a [`Snapshot`].
//!
//! Layout:
//!
//! ```text
//! <dir>/
//!   users.csv               id,email,is_admin,is_project_moderator,verified,registration_completed_at,domicile
//!   custom_field_values.csv user_id,custom_field_id,value
//!   ideas.csv               id,author_id,project_id,idea_status_id
//!   idea_topics.csv         idea_id,topic_id
//!   comments.csv            id,idea_id,author_id
//!   votes.csv               id,votable_type,votable_id,user_id
//!   references.json         idea statuses, topics, projects, areas, custom fields, options
//!   smart_groups.json       [SmartGroup, ...]
//! ```
//!
//! Every file is optional; a missing table is empty. Columns are read as
//! strings; boolean columns accept `true` and treat anything else as false.
//! Registration timestamps are cut down to their date.

use std::fs;
use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, Expr, IntoLazy, PolarsError, SerReader, col, lit};
use serde::de::DeserializeOwned;
use sg_model::SmartGroup;
use tracing::{debug, info};

use crate::StoreError;
use crate::columns::{ID, comments, custom_field_values, idea_topics, ideas, users, votes};
use crate::references::ReferenceData;
use crate::snapshot::{
    Snapshot, SnapshotBuilder, comments_frame, custom_field_values_frame, idea_topics_frame,
    ideas_frame, users_frame, votes_frame,
};

enum Kind {
    Text,
    Flag,
    /// Timestamp or date, kept as its `YYYY-MM-DD` prefix.
    Date,
}

/// Length of `YYYY-MM-DD`.
const DATE_LEN: u32 = 10;

struct Table {
    name: &'static str,
    columns: &'static [(&'static str, Kind)],
}

const USERS: Table = Table {
    name: users::TABLE,
    columns: &[
        (ID, Kind::Text),
        (users::EMAIL, Kind::Text),
        (users::IS_ADMIN, Kind::Flag),
        (users::IS_PROJECT_MODERATOR, Kind::Flag),
        (users::VERIFIED, Kind::Flag),
        (users::REGISTRATION_COMPLETED_AT, Kind::Date),
        (users::DOMICILE, Kind::Text),
    ],
};

const CUSTOM_FIELD_VALUES: Table = Table {
    name: custom_field_values::TABLE,
    columns: &[
        (custom_field_values::USER_ID, Kind::Text),
        (custom_field_values::CUSTOM_FIELD_ID, Kind::Text),
        (custom_field_values::VALUE, Kind::Text),
    ],
};

const IDEAS: Table = Table {
    name: ideas::TABLE,
    columns: &[
        (ID, Kind::Text),
        (ideas::AUTHOR_ID, Kind::Text),
        (ideas::PROJECT_ID, Kind::Text),
        (ideas::IDEA_STATUS_ID, Kind::Text),
    ],
};

const IDEA_TOPICS: Table = Table {
    name: idea_topics::TABLE,
    columns: &[
        (idea_topics::IDEA_ID, Kind::Text),
        (idea_topics::TOPIC_ID, Kind::Text),
    ],
};

const COMMENTS: Table = Table {
    name: comments::TABLE,
    columns: &[
        (ID, Kind::Text),
        (comments::IDEA_ID, Kind::Text),
        (comments::AUTHOR_ID, Kind::Text),
    ],
};

const VOTES: Table = Table {
    name: votes::TABLE,
    columns: &[
        (ID, Kind::Text),
        (votes::VOTABLE_TYPE, Kind::Text),
        (votes::VOTABLE_ID, Kind::Text),
        (votes::USER_ID, Kind::Text),
    ],
};

fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    if !path.exists() {
        return Ok(T::default());
    }
    let raw = fs::read_to_string(path).map_err(|source| StoreError::io(path, source))?;
    serde_json::from_str(&raw).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read `<dir>/<table>.csv`, check its columns and normalize their types.
/// Returns `None` when the file does not exist.
fn read_table(dir: &Path, table: &Table) -> Result<Option<DataFrame>, StoreError> {
    let path = dir.join(format!("{}.csv", table.name));
    if !path.exists() {
        debug!(table = table.name, "no table file, using an empty table");
        return Ok(None);
    }
    let csv_error = |source: PolarsError| StoreError::Csv {
        path: path.clone(),
        source,
    };
    let raw = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.clone()))
        .map_err(csv_error)?
        .finish()
        .map_err(csv_error)?;

    let present: Vec<String> = raw
        .get_column_names()
        .iter()
        .map(ToString::to_string)
        .collect();
    let mut exprs: Vec<Expr> = Vec::with_capacity(table.columns.len());
    for (name, kind) in table.columns {
        if !present.iter().any(|column| column == name) {
            return Err(StoreError::MissingColumn {
                table: table.name.to_string(),
                column: (*name).to_string(),
            });
        }
        exprs.push(match kind {
            Kind::Text => col(*name),
            Kind::Flag => col(*name)
                .eq(lit("true"))
                .fill_null(lit(false))
                .alias(*name),
            Kind::Date => col(*name)
                .str()
                .slice(lit(0), lit(DATE_LEN))
                .alias(*name),
        });
    }
    let df = raw.lazy().select(exprs).collect()?;
    debug!(table = table.name, rows = df.height(), "read table");
    Ok(Some(df))
}

/// Load every table under `dir`.
pub fn load_dataset(dir: &Path) -> Result<Snapshot, StoreError> {
    let references: ReferenceData = read_json(&dir.join("references.json"))?;
    let groups: Vec<SmartGroup> = read_json(&dir.join("smart_groups.json"))?;
    let group_count = groups.len();

    let mut snapshot = groups
        .into_iter()
        .fold(SnapshotBuilder::new(), SnapshotBuilder::group)
        .references(references.into())
        .build()?;

    snapshot.users = read_table(dir, &USERS)?.map_or_else(|| users_frame(&[]), Ok)?;
    snapshot.custom_field_values = read_table(dir, &CUSTOM_FIELD_VALUES)?
        .map_or_else(|| custom_field_values_frame(&[]), Ok)?;
    snapshot.ideas = read_table(dir, &IDEAS)?.map_or_else(|| ideas_frame(&[]), Ok)?;
    snapshot.idea_topics =
        read_table(dir, &IDEA_TOPICS)?.map_or_else(|| idea_topics_frame(&[]), Ok)?;
    snapshot.comments = read_table(dir, &COMMENTS)?.map_or_else(|| comments_frame(&[]), Ok)?;
    snapshot.votes = read_table(dir, &VOTES)?.map_or_else(|| votes_frame(&[]), Ok)?;

    info!(
        dir = %dir.display(),
        users = snapshot.users.height(),
        ideas = snapshot.ideas.height(),
        groups = group_count,
        "loaded dataset"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).expect("write fixture");
    }

    #[test]
    fn loads_tables_and_defaults_missing_ones() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(
            dir.path(),
            "users.csv",
            "id,email,is_admin,is_project_moderator,verified,registration_completed_at,domicile\n\
             u1,a@example.org,true,false,true,2024-01-05,\n\
             u2,b@example.org,,,,,area-1\n",
        );
        write(
            dir.path(),
            "smart_groups.json",
            r#"[{"id":"g1","titleMultiloc":{"en":"Admins"},"rules":[{"ruleType":"role","predicate":"is_admin"}]}]"#,
        );

        let snapshot = load_dataset(dir.path()).expect("load");
        assert_eq!(snapshot.users.height(), 2);
        let admins = snapshot
            .users
            .column(users::IS_ADMIN)
            .expect("column")
            .bool()
            .expect("bool")
            .into_iter()
            .collect::<Vec<_>>();
        assert_eq!(admins, vec![Some(true), Some(false)]);
        assert_eq!(snapshot.ideas.height(), 0);
        assert_eq!(snapshot.groups.height(), 1);
        assert_eq!(snapshot.group_rules.height(), 1);
    }

    #[test]
    fn registration_timestamps_become_dates() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(
            dir.path(),
            "users.csv",
            "id,email,is_admin,is_project_moderator,verified,registration_completed_at,domicile\n\
             u1,a@example.org,,,,2024-01-05T10:20:30Z,\n\
             u2,b@example.org,,,,2023-12-31 23:59:59,\n\
             u3,c@example.org,,,,2022-02-02,\n\
             u4,d@example.org,,,,,\n",
        );

        let snapshot = load_dataset(dir.path()).expect("load");
        let dates = snapshot
            .users
            .column(users::REGISTRATION_COMPLETED_AT)
            .expect("column")
            .str()
            .expect("str")
            .into_iter()
            .collect::<Vec<_>>();
        assert_eq!(
            dates,
            vec![Some("2024-01-05"), Some("2023-12-31"), Some("2022-02-02"), None]
        );
    }

    #[test]
    fn rejects_tables_missing_a_column() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "comments.csv", "id,idea_id\nc1,i1\n");
        let err = load_dataset(dir.path()).expect_err("missing author_id");
        assert!(matches!(
            err,
            StoreError::MissingColumn { ref column, .. } if column == "author_id"
        ));
    }
}
