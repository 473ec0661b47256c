use sg_model::{Multiloc, RuleDefinition, SmartGroup, User};
use sg_store::{DataStore, SnapshotBuilder};

fn store() -> DataStore {
    let snapshot = SnapshotBuilder::new()
        .user(
            User::new("u1", "one@example.org")
                .admin()
                .with_custom_field_value("cf-color", "blue"),
        )
        .user(User::new("u2", "two@example.org"))
        .group(SmartGroup::new(
            "g1",
            vec![RuleDefinition::valueless("role", "is_admin")],
        ))
        .build()
        .expect("snapshot");
    DataStore::new(snapshot)
}

#[test]
fn scopes_fetch_only_when_materialized() {
    let store = store();
    let scope = store.users().where_id("u1");
    assert_eq!(store.fetch_count(), 0);
    assert_eq!(scope.count().expect("count"), 1);
    assert_eq!(scope.ids().expect("ids"), vec!["u1".to_string()]);
    assert_eq!(store.fetch_count(), 2);
}

#[test]
fn find_user_reads_custom_field_values() {
    let store = store();
    let user = store.find_user("u1").expect("find").expect("present");
    assert!(user.is_admin);
    assert_eq!(
        user.custom_field_values.get("cf-color").map(String::as_str),
        Some("blue")
    );
    assert!(store.find_user("missing").expect("find").is_none());
}

#[test]
fn save_replaces_a_group_wholesale() {
    let store = store();
    let mut title = Multiloc::new();
    title.insert("en", "Everyone called two");
    let replacement = SmartGroup {
        id: "g1".to_string(),
        title_multiloc: title,
        rules: vec![
            RuleDefinition::new("email", "is", "two@example.org"),
            RuleDefinition::valueless("role", "not_is_admin"),
        ],
    };
    store.save_group(&replacement).expect("save");

    let groups = store.load_groups().expect("load");
    assert_eq!(groups, vec![replacement]);
}

#[test]
fn readers_keep_the_snapshot_they_started_with() {
    let store = store();
    let before = store.groups();
    store
        .save_group(&SmartGroup::new("g2", vec![]))
        .expect("save");
    assert_eq!(before.ids().expect("ids"), vec!["g1".to_string()]);
    assert_eq!(
        store.groups().ids().expect("ids"),
        vec!["g1".to_string(), "g2".to_string()]
    );
}

#[test]
fn destroy_removes_only_the_group() {
    let store = store();
    assert!(store.destroy_group("g1").expect("destroy"));
    assert!(!store.destroy_group("g1").expect("destroy again"));
    assert!(store.find_group("g1").expect("find").is_none());
    assert_eq!(store.snapshot().group_rules.height(), 0);
    assert_eq!(store.users().count().expect("count"), 2);
}
