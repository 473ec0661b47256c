//! JSON schema for rule definition lists.

use serde_json::{Map, Value, json};

use crate::registry::RuleRegistry;

pub const DRAFT_04: &str = "http://json-schema.org/draft-04/schema#";

/// Schema accepting an array of rule definitions of any registered type.
///
/// Each rule type gets an entry under `definitions`, holding its fragment
/// or an `anyOf` of its fragments, and `items` is an `anyOf` of references
/// to those entries. The result depends only on `registry`.
pub fn generate_schema(registry: &RuleRegistry) -> Value {
    let mut definitions = Map::new();
    let mut variants = Vec::with_capacity(registry.len());
    for descriptor in registry.descriptors() {
        let mut fragments = descriptor.schema_fragments();
        let definition = if fragments.len() == 1 {
            fragments.remove(0)
        } else {
            json!({ "anyOf": fragments })
        };
        definitions.insert(descriptor.tag.to_string(), definition);
        variants.push(json!({ "$ref": format!("#/definitions/{}", descriptor.tag) }));
    }

    let mut schema = json!({
        "$schema": DRAFT_04,
        "description": "Smart group rules: every rule must hold for a user to be a member",
        "type": "array",
        "definitions": definitions,
    });
    // draft-04 forbids an empty anyOf.
    schema["items"] = if variants.is_empty() {
        json!({ "not": {} })
    } else {
        json!({ "anyOf": variants })
    };
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::default_registry;

    #[test]
    fn every_registered_type_has_a_definition_and_a_reference() {
        let schema = generate_schema(default_registry());
        let definitions = schema["definitions"].as_object().expect("definitions");
        let refs = schema["items"]["anyOf"].as_array().expect("items");
        assert_eq!(definitions.len(), default_registry().len());
        assert_eq!(refs.len(), default_registry().len());
        assert_eq!(refs[0]["$ref"], "#/definitions/email");
    }

    #[test]
    fn schema_is_deterministic() {
        assert_eq!(
            generate_schema(default_registry()),
            generate_schema(default_registry())
        );
    }

    #[test]
    fn empty_registry_accepts_only_empty_lists() {
        let schema = generate_schema(&RuleRegistry::from_modules([]));
        assert_eq!(schema["items"], json!({"not": {}}));
    }
}
