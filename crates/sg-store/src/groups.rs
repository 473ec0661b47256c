//! Reading smart groups back out of the group tables.

use std::collections::BTreeMap;

use polars::prelude::{DataFrame, JoinArgs, JoinType, LazyFrame, col};
use sg_model::{Multiloc, RuleDefinition, SmartGroup};

use crate::StoreError;
use crate::columns::{ID, group_rules, groups};
use crate::snapshot::Snapshot;

/// One row per (group, rule); groups without rules get a single row with
/// null rule columns.
pub fn group_rows(snapshot: &Snapshot) -> LazyFrame {
    snapshot
        .groups_lazy()
        .join(
            snapshot.group_rules_lazy(),
            [col(ID)],
            [col(group_rules::GROUP_ID)],
            JoinArgs::new(JoinType::Left),
        )
        .select([
            col(ID),
            col(groups::TITLE_MULTILOC),
            col(group_rules::POSITION),
            col(group_rules::DEFINITION),
        ])
}

/// Rebuild smart groups from rows shaped like [`group_rows`]. Rules come
/// back in their stored order, groups sorted by id.
pub fn decode_groups(rows: &DataFrame) -> Result<Vec<SmartGroup>, StoreError> {
    let ids = rows.column(ID)?.str()?;
    let titles = rows.column(groups::TITLE_MULTILOC)?.str()?;
    let positions = rows.column(group_rules::POSITION)?.u32()?;
    let definitions = rows.column(group_rules::DEFINITION)?.str()?;

    let mut decoded: BTreeMap<String, (Multiloc, Vec<(u32, RuleDefinition)>)> = BTreeMap::new();
    for (((id, title), position), definition) in ids
        .into_iter()
        .zip(titles)
        .zip(positions)
        .zip(definitions)
    {
        let Some(id) = id else { continue };
        let entry = decoded.entry(id.to_string()).or_insert_with(|| {
            let title = title
                .and_then(|raw| serde_json::from_str(raw).ok())
                .unwrap_or_default();
            (title, Vec::new())
        });
        if let (Some(position), Some(definition)) = (position, definition) {
            let rule = serde_json::from_str(definition).map_err(|source| {
                StoreError::CorruptRule {
                    group_id: id.to_string(),
                    position,
                    source,
                }
            })?;
            entry.1.push((position, rule));
        }
    }

    Ok(decoded
        .into_iter()
        .map(|(id, (title_multiloc, mut rules))| {
            rules.sort_by_key(|(position, _)| *position);
            SmartGroup {
                id,
                title_multiloc,
                rules: rules.into_iter().map(|(_, rule)| rule).collect(),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SnapshotBuilder;
    use sg_model::RuleDefinition;

    #[test]
    fn decodes_groups_with_and_without_rules() {
        let snapshot = SnapshotBuilder::new()
            .group(SmartGroup::new(
                "g1",
                vec![
                    RuleDefinition::new("email", "is", "a@b.c"),
                    RuleDefinition::valueless("role", "is_admin"),
                ],
            ))
            .group(SmartGroup::new("g2", vec![]))
            .build()
            .expect("snapshot");
        let rows = group_rows(&snapshot).collect().expect("rows");
        let groups = decode_groups(&rows).expect("decode");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id, "g1");
        assert_eq!(groups[0].rules[1].predicate, "is_admin");
        assert!(groups[1].rules.is_empty());
    }
}
