//! Tests for sg-model types.

use proptest::prelude::*;
use serde_json::json;
use sg_model::{CustomFieldKind, RuleDefinition, RuleValue, Vote};

#[test]
fn vote_serializes_votable_type_and_id() {
    let vote = Vote::on_comment("v1", "c1", "u1");
    let json = serde_json::to_value(&vote).expect("serialize vote");
    assert_eq!(
        json,
        json!({"id": "v1", "votableType": "Comment", "votableId": "c1", "userId": "u1"})
    );
    let round: Vote = serde_json::from_value(json).expect("deserialize vote");
    assert_eq!(round, vote);
}

#[test]
fn custom_field_kind_parses() {
    assert_eq!("select".parse::<CustomFieldKind>().ok(), Some(CustomFieldKind::Select));
    assert!("multiselect".parse::<CustomFieldKind>().is_err());
}

fn arb_value() -> impl Strategy<Value = Option<RuleValue>> {
    prop_oneof![
        Just(None),
        "[a-z0-9@.-]{0,12}".prop_map(|s| Some(RuleValue::Text(s))),
        (-1_000_000i64..1_000_000).prop_map(|n| Some(RuleValue::Number(n as f64))),
    ]
}

proptest! {
    #[test]
    fn rule_definition_round_trips(
        rule_type in "[a-z_]{1,24}",
        predicate in "[a-z_]{1,24}",
        value in arb_value(),
        custom_field_id in proptest::option::of("[a-f0-9]{8}"),
    ) {
        let rule = RuleDefinition { rule_type, predicate, value, custom_field_id };
        let round = RuleDefinition::from_json(rule.to_json()).expect("round trip");
        prop_assert_eq!(&round.predicate, &rule.predicate);
        prop_assert_eq!(&round.value, &rule.value);
        prop_assert_eq!(round, rule);
    }
}
