use serde_json::json;
use sg_rules::{RuleRegistry, VerificationRules, default_registry, generate_schema};

#[test]
fn verification_fragment_shape() {
    let registry = RuleRegistry::from_modules([&VerificationRules as &dyn sg_rules::RuleModule]);
    let schema = generate_schema(&registry);
    insta::assert_json_snapshot!("verified_definition", schema["definitions"]["verified"]);
}

#[test]
fn mixed_rule_types_contribute_an_any_of() {
    let schema = generate_schema(default_registry());
    let lives_in = &schema["definitions"]["lives_in"]["anyOf"];
    assert_eq!(lives_in.as_array().map(Vec::len), Some(2));
    assert_eq!(
        lives_in[0]["properties"]["value"],
        json!({"type": "string", "description": "The id of an area"})
    );
    assert_eq!(
        schema["definitions"]["participated_in_topic"]["required"],
        json!(["ruleType", "predicate", "value"])
    );
}
