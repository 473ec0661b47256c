use polars::prelude::LazyFrame;
use sg_model::{
    Area, Comment, CustomField, CustomFieldKind, CustomFieldOption, EntityKind, Idea, IdeaStatus,
    Multiloc, RuleDefinition, Topic, User, Vote,
};
use sg_rules::{ErrorCategory, RuleContext, RuleError, Translator, default_registry};
use sg_store::{Snapshot, SnapshotBuilder};

fn field(id: &str, kind: CustomFieldKind) -> CustomField {
    CustomField {
        id: id.to_string(),
        key: id.to_string(),
        input_type: kind,
        title_multiloc: Multiloc::single("en", format!("Field {id}")),
    }
}

fn fixture() -> Snapshot {
    let mut moderator = User::new("u3", "mod@city.gov");
    moderator.is_project_moderator = true;
    moderator.domicile = Some("area-north".to_string());
    moderator.registration_completed_at = sg_model::parse_date("2023-06-01").ok();

    let mut verified = User::new("u4", "four@example.org")
        .with_custom_field_value("cf-age", "41")
        .with_custom_field_value("cf-newsletter", "true")
        .with_custom_field_value("cf-birthday", "1983-02-10");
    verified.verified = true;

    SnapshotBuilder::new()
        .user(
            User::new("u1", "one@example.org")
                .admin()
                .with_custom_field_value("cf-nickname", "rocket")
                .with_custom_field_value("cf-color", "blue")
                .with_custom_field_value("cf-age", "17"),
        )
        .user(
            User::new("u2", "two@city.gov")
                .with_custom_field_value("cf-nickname", "")
                .with_custom_field_value("cf-color", "red")
                .with_custom_field_value("cf-newsletter", "false"),
        )
        .user(moderator)
        .user(verified)
        .custom_field(field("cf-nickname", CustomFieldKind::Text))
        .custom_field(field("cf-color", CustomFieldKind::Select))
        .custom_field(field("cf-newsletter", CustomFieldKind::Checkbox))
        .custom_field(field("cf-birthday", CustomFieldKind::Date))
        .custom_field(field("cf-age", CustomFieldKind::Number))
        .custom_field_option(CustomFieldOption {
            id: "opt-blue".to_string(),
            custom_field_id: "cf-color".to_string(),
            key: "blue".to_string(),
            title_multiloc: Multiloc::single("en", "Blue"),
        })
        .area(Area {
            id: "area-north".to_string(),
            title_multiloc: Multiloc::single("en", "North"),
        })
        .idea_status(IdeaStatus {
            id: "s1".to_string(),
            title_multiloc: Multiloc::single("en", "in the garbage can"),
        })
        .topic(Topic {
            id: "t1".to_string(),
            title_multiloc: Multiloc::single("en", "beer"),
        })
        .idea(Idea::new("i1", "p1").by("u1").with_status("s1").with_topic("t1"))
        .comment(Comment::new("c1", "i1", "u3"))
        .vote(Vote::on_idea("v1", "i1", "u2"))
        .build()
        .expect("snapshot")
}

fn ids(frame: LazyFrame) -> Vec<String> {
    let df = frame.collect().expect("collect");
    let mut ids: Vec<String> = df
        .column("id")
        .expect("id column")
        .str()
        .expect("string ids")
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();
    ids.sort();
    ids
}

fn matching(snapshot: &Snapshot, definition: RuleDefinition) -> Vec<String> {
    let rule = default_registry()
        .rehydrate(&definition)
        .expect("rehydrate");
    let ctx = RuleContext::new(snapshot);
    rule.validate(&ctx).expect("valid rule");
    ids(rule.filter(snapshot.users_lazy(), &ctx).expect("filter"))
}

#[test]
fn attribute_rules() {
    let snapshot = fixture();
    let cases = [
        (RuleDefinition::new("email", "ends_on", "@city.gov"), vec!["u2", "u3"]),
        (RuleDefinition::new("email", "not_contains", "example"), vec!["u2", "u3"]),
        (RuleDefinition::new("email", "is", "one@example.org"), vec!["u1"]),
        (RuleDefinition::valueless("role", "is_admin"), vec!["u1"]),
        (RuleDefinition::valueless("role", "is_normal_user"), vec!["u2", "u4"]),
        (RuleDefinition::valueless("role", "not_is_normal_user"), vec!["u1", "u3"]),
        (
            RuleDefinition::new("registration_completed_at", "is_before", "2024-01-01"),
            vec!["u3"],
        ),
        (
            RuleDefinition::valueless("registration_completed_at", "is_empty"),
            vec!["u1", "u2", "u4"],
        ),
        (RuleDefinition::new("lives_in", "has_value", "area-north"), vec!["u3"]),
        (
            RuleDefinition::new("lives_in", "not_has_value", "area-north"),
            vec!["u1", "u2", "u4"],
        ),
        (RuleDefinition::valueless("verified", "is_verified"), vec!["u4"]),
    ];
    for (definition, expected) in cases {
        let label = format!("{definition:?}");
        assert_eq!(matching(&snapshot, definition), expected, "{label}");
    }
}

#[test]
fn custom_field_rules() {
    let snapshot = fixture();
    let cases = [
        (
            RuleDefinition::new("custom_field_text", "begins_with", "roc")
                .with_custom_field("cf-nickname"),
            vec!["u1"],
        ),
        (
            RuleDefinition::new("custom_field_text", "not_is", "rocket")
                .with_custom_field("cf-nickname"),
            vec!["u2", "u3", "u4"],
        ),
        (
            RuleDefinition::valueless("custom_field_text", "is_empty")
                .with_custom_field("cf-nickname"),
            vec!["u2", "u3", "u4"],
        ),
        (
            RuleDefinition::new("custom_field_select", "has_value", "opt-blue")
                .with_custom_field("cf-color"),
            vec!["u1"],
        ),
        (
            RuleDefinition::new("custom_field_select", "not_has_value", "opt-blue")
                .with_custom_field("cf-color"),
            vec!["u2", "u3", "u4"],
        ),
        (
            RuleDefinition::valueless("custom_field_checkbox", "is_checked")
                .with_custom_field("cf-newsletter"),
            vec!["u4"],
        ),
        (
            RuleDefinition::valueless("custom_field_checkbox", "not_is_checked")
                .with_custom_field("cf-newsletter"),
            vec!["u1", "u2", "u3"],
        ),
        (
            RuleDefinition::new("custom_field_date", "is_after", "1980-01-01")
                .with_custom_field("cf-birthday"),
            vec!["u4"],
        ),
        (
            RuleDefinition::new("custom_field_number", "is_larger_than_or_equal", 18.0)
                .with_custom_field("cf-age"),
            vec!["u4"],
        ),
        (
            RuleDefinition::new("custom_field_number", "not_is_equal", 17.0)
                .with_custom_field("cf-age"),
            vec!["u2", "u3", "u4"],
        ),
        (
            RuleDefinition::valueless("custom_field_number", "not_is_empty")
                .with_custom_field("cf-age"),
            vec!["u1", "u4"],
        ),
    ];
    for (definition, expected) in cases {
        let label = format!("{definition:?}");
        assert_eq!(matching(&snapshot, definition), expected, "{label}");
    }
}

#[test]
fn participation_rules_complement_within_all_users() {
    let snapshot = fixture();
    let all = vec!["u1", "u2", "u3", "u4"];
    for rule_type in ["participated_in_idea_status", "participated_in_topic"] {
        let value = if rule_type.ends_with("topic") { "t1" } else { "s1" };
        for (positive, negative) in [
            ("in", "not_in"),
            ("posted_in", "not_posted_in"),
            ("commented_in", "not_commented_in"),
            ("voted_idea_in", "not_voted_idea_in"),
            ("voted_comment_in", "not_voted_comment_in"),
        ] {
            let matched = matching(&snapshot, RuleDefinition::new(rule_type, positive, value));
            let unmatched = matching(&snapshot, RuleDefinition::new(rule_type, negative, value));
            assert!(matched.iter().all(|id| !unmatched.contains(id)), "{positive} overlaps");
            let mut union: Vec<String> = matched.into_iter().chain(unmatched).collect();
            union.sort();
            assert_eq!(union, all, "{rule_type} {positive}");
        }
    }
}

#[test]
fn comment_votes_are_not_idea_votes() {
    let snapshot = SnapshotBuilder::new()
        .users((1..=4).map(|n| User::new(format!("u{n}"), format!("u{n}@example.org"))))
        .topic(Topic {
            id: "t1".to_string(),
            title_multiloc: Multiloc::single("en", "beer"),
        })
        .idea(Idea::new("i1", "p1").by("u1").with_topic("t1"))
        .comment(Comment::new("c1", "i1", "u3"))
        .vote(Vote::on_comment("v1", "c1", "u2"))
        .build()
        .expect("snapshot");
    let rule = |predicate: &str| RuleDefinition::new("participated_in_topic", predicate, "t1");

    assert_eq!(matching(&snapshot, rule("voted_comment_in")), ["u2"]);
    assert_eq!(matching(&snapshot, rule("not_voted_comment_in")), ["u1", "u3", "u4"]);
    assert!(matching(&snapshot, rule("voted_idea_in")).is_empty());
    assert_eq!(matching(&snapshot, rule("not_voted_idea_in")), ["u1", "u2", "u3", "u4"]);
}

#[test]
fn filters_compose() {
    let snapshot = fixture();
    let ctx = RuleContext::new(&snapshot);
    let registry = default_registry();
    let gov = registry
        .rehydrate(&RuleDefinition::new("email", "ends_on", "@city.gov"))
        .expect("email");
    let normal = registry
        .rehydrate(&RuleDefinition::valueless("role", "is_normal_user"))
        .expect("role");
    let once = gov.filter(snapshot.users_lazy(), &ctx).expect("filter");
    let twice = normal.filter(once, &ctx).expect("filter");
    assert_eq!(ids(twice), vec!["u2"]);
}

#[test]
fn missing_references_are_reported_at_validation_and_filter_time() {
    let snapshot = fixture();
    let ctx = RuleContext::new(&snapshot);
    let rule = default_registry()
        .rehydrate(&RuleDefinition::new("participated_in_idea_status", "in", "gone"))
        .expect("rehydrate");

    let err = rule.validate(&ctx).expect_err("status was deleted");
    assert_eq!(err.category(), ErrorCategory::ReferencedEntityNotFound);
    assert!(matches!(
        rule.filter(snapshot.users_lazy(), &ctx),
        Err(RuleError::ReferencedEntityNotFound { kind: EntityKind::IdeaStatus, .. })
    ));
}

#[test]
fn custom_field_kind_must_match() {
    let snapshot = fixture();
    let ctx = RuleContext::new(&snapshot);
    let rule = default_registry()
        .rehydrate(&RuleDefinition::new("custom_field_text", "is", "x").with_custom_field("cf-age"))
        .expect("rehydrate");
    let err = rule.validate(&ctx).expect_err("cf-age is a number field");
    assert!(matches!(err, RuleError::IncompatibleCustomField { .. }));
    assert_eq!(err.category(), ErrorCategory::MalformedInput);
}

#[test]
fn unknown_predicates_fail_at_rehydration() {
    let err = default_registry()
        .rehydrate(&RuleDefinition::new("participated_in_topic", "liked", "t1"))
        .expect_err("unsupported");
    assert!(matches!(err, RuleError::UnsupportedPredicate { .. }));
    assert_eq!(err.category(), ErrorCategory::Internal);
}

struct Templates;

impl Translator for Templates {
    fn translate(&self, _locale: &str, key: &str, args: &[(&str, &str)]) -> String {
        let rendered: Vec<String> = args.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{key}({})", rendered.join(","))
    }

    fn locales(&self) -> Vec<String> {
        vec!["en".to_string()]
    }
}

#[test]
fn descriptions_resolve_display_values() {
    let snapshot = fixture();
    let ctx = RuleContext::new(&snapshot);
    let describe = |definition: RuleDefinition| {
        default_registry()
            .rehydrate(&definition)
            .expect("rehydrate")
            .describe("en", &Templates, &ctx)
            .expect("describe")
    };
    assert_eq!(
        describe(RuleDefinition::new("participated_in_idea_status", "posted_in", "s1")),
        "participated_in_idea_status.posted_in(value=in the garbage can)"
    );
    assert_eq!(
        describe(
            RuleDefinition::new("custom_field_select", "has_value", "opt-blue")
                .with_custom_field("cf-color")
        ),
        "custom_field_select.has_value(customField=Field cf-color,value=Blue)"
    );
    assert_eq!(
        describe(
            RuleDefinition::new("custom_field_number", "is_equal", 3.0).with_custom_field("cf-age")
        ),
        "custom_field_number.is_equal(customField=Field cf-age,value=3)"
    );
    assert_eq!(
        describe(RuleDefinition::valueless("role", "is_admin")),
        "role.is_admin()"
    );
}
