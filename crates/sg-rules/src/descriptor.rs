//! Static description of a rule type.
//!
//! A [`RuleTypeDescriptor`] is everything the engine knows about a rule type
//! without instantiating it: its predicates, the shape of its value, its
//! schema fragments and how to rehydrate a stored definition. The schema
//! fragments and [`RuleTypeDescriptor::check_shape`] are both derived from
//! the same fields, so a definition accepted by one is accepted by the other.

use serde_json::{Map, Value, json};
use sg_model::{CustomFieldKind, EntityKind, RuleDefinition, RuleValue, parse_date};

use crate::error::Result;
use crate::rule::Rule;

/// `YYYY-MM-DD`, as accepted by [`parse_date`].
pub const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

/// What the `value` of a value-bearing predicate holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// The rule type has no value-bearing predicates.
    None,
    Text,
    Number,
    Date,
    /// Id of an existing entity.
    Reference(EntityKind),
}

impl ValueKind {
    fn schema(self) -> Value {
        match self {
            Self::None | Self::Text => json!({"type": "string"}),
            Self::Number => json!({"type": "number"}),
            Self::Date => json!({"type": "string", "pattern": DATE_PATTERN}),
            Self::Reference(kind) => json!({
                "type": "string",
                "description": format!("The id of {}", with_article(kind.label())),
            }),
        }
    }
}

fn with_article(noun: &str) -> String {
    match noun.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => format!("an {noun}"),
        _ => format!("a {noun}"),
    }
}

/// Relative evaluation cost, cheapest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleCost {
    /// Filter on a column of the user table.
    Attribute,
    /// Semi or anti join against custom field values.
    CustomField,
    /// Joins through ideas, comments and votes.
    Participation,
}

pub type Constructor = fn(&RuleDefinition) -> Result<Box<dyn Rule>>;

#[derive(Debug)]
pub struct RuleTypeDescriptor {
    pub tag: &'static str,
    /// Every predicate, including the valueless ones.
    pub predicates: &'static [&'static str],
    pub valueless_predicates: &'static [&'static str],
    pub value: ValueKind,
    /// Kind of custom field `customFieldId` must reference, if required.
    pub custom_field: Option<CustomFieldKind>,
    pub cost: RuleCost,
    pub constructor: Constructor,
}

impl RuleTypeDescriptor {
    pub fn supports(&self, predicate: &str) -> bool {
        self.predicates.contains(&predicate)
    }

    pub fn is_valueless(&self, predicate: &str) -> bool {
        self.value == ValueKind::None || self.valueless_predicates.contains(&predicate)
    }

    /// Predicates that require a value.
    pub fn value_predicates(&self) -> Vec<&'static str> {
        if self.value == ValueKind::None {
            return Vec::new();
        }
        self.predicates
            .iter()
            .copied()
            .filter(|predicate| !self.valueless_predicates.contains(predicate))
            .collect()
    }

    /// Rehydrate `definition` into a runtime rule.
    pub fn instantiate(&self, definition: &RuleDefinition) -> Result<Box<dyn Rule>> {
        (self.constructor)(definition)
    }

    /// Structural problems with `definition`, as human-readable messages.
    /// Empty when the definition matches one of this type's fragments.
    pub fn check_shape(&self, definition: &RuleDefinition) -> Vec<String> {
        let mut errors = Vec::new();
        if definition.rule_type != self.tag {
            errors.push(format!(
                "ruleType `{}` does not match `{}`",
                definition.rule_type, self.tag
            ));
        }

        let predicate = definition.predicate.as_str();
        if !self.supports(predicate) {
            errors.push(format!(
                "predicate `{predicate}` is not one of: {}",
                self.predicates.join(", ")
            ));
        } else if self.is_valueless(predicate) {
            if definition.value.is_some() {
                errors.push(format!("predicate `{predicate}` takes no value"));
            }
        } else {
            match &definition.value {
                None => errors.push(format!("predicate `{predicate}` requires a value")),
                Some(value) => {
                    if let Some(error) = self.check_value(value) {
                        errors.push(error);
                    }
                }
            }
        }

        match (self.custom_field, &definition.custom_field_id) {
            (Some(_), None) => errors.push(format!(
                "rule type `{}` requires a customFieldId",
                self.tag
            )),
            (None, Some(_)) => errors.push(format!(
                "rule type `{}` does not take a customFieldId",
                self.tag
            )),
            _ => {}
        }
        errors
    }

    fn check_value(&self, value: &RuleValue) -> Option<String> {
        match (self.value, value) {
            (ValueKind::Number, RuleValue::Number(_))
            | (ValueKind::Text | ValueKind::Reference(_), RuleValue::Text(_)) => None,
            (ValueKind::Number, RuleValue::Text(text)) => {
                Some(format!("value `{text}` is not a number"))
            }
            (ValueKind::Date, RuleValue::Text(text)) => parse_date(text)
                .err()
                .map(|_| format!("value `{text}` is not a YYYY-MM-DD date")),
            (_, RuleValue::Number(number)) => Some(format!("value `{number}` is not a string")),
            (ValueKind::None, RuleValue::Text(_)) => Some("no value expected".to_string()),
        }
    }

    /// JSON schema objects accepted for this rule type: one for the
    /// value-bearing predicates and one for the valueless ones, whichever
    /// exist.
    pub fn schema_fragments(&self) -> Vec<Value> {
        let mut fragments = Vec::with_capacity(2);
        let value_predicates = self.value_predicates();
        if !value_predicates.is_empty() {
            fragments.push(self.fragment(&value_predicates, true));
        }
        let valueless: Vec<&str> = self
            .predicates
            .iter()
            .copied()
            .filter(|predicate| self.is_valueless(predicate))
            .collect();
        if !valueless.is_empty() {
            fragments.push(self.fragment(&valueless, false));
        }
        fragments
    }

    fn fragment(&self, predicates: &[&str], with_value: bool) -> Value {
        let mut properties = Map::new();
        let mut required = vec!["ruleType"];
        properties.insert(
            "ruleType".into(),
            json!({"type": "string", "enum": [self.tag]}),
        );
        if let Some(kind) = self.custom_field {
            properties.insert(
                "customFieldId".into(),
                json!({
                    "type": "string",
                    "description": format!("The id of a {kind} custom field"),
                }),
            );
            required.push("customFieldId");
        }
        properties.insert(
            "predicate".into(),
            json!({"type": "string", "enum": predicates}),
        );
        required.push("predicate");
        if with_value {
            properties.insert("value".into(), self.value.schema());
            required.push("value");
        }
        json!({
            "type": "object",
            "required": required,
            "additionalProperties": false,
            "properties": properties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{custom_field_date, role};

    #[test]
    fn valueless_types_have_a_single_fragment_without_value() {
        let fragments = role::DESCRIPTOR.schema_fragments();
        assert_eq!(fragments.len(), 1);
        assert!(fragments[0]["properties"].get("value").is_none());
        assert_eq!(fragments[0]["properties"]["predicate"]["enum"][0], "is_admin");
    }

    #[test]
    fn mixed_types_split_value_and_valueless_predicates() {
        let fragments = custom_field_date::DESCRIPTOR.schema_fragments();
        assert_eq!(fragments.len(), 2);
        assert_eq!(
            fragments[0]["required"],
            json!(["ruleType", "customFieldId", "predicate", "value"])
        );
        assert_eq!(fragments[0]["properties"]["value"]["pattern"], DATE_PATTERN);
        assert_eq!(
            fragments[1]["properties"]["predicate"]["enum"],
            json!(["is_empty", "not_is_empty"])
        );
    }

    #[test]
    fn shape_check_reports_every_problem() {
        let definition = RuleDefinition::new("custom_field_date", "is_before", "garbage");
        let errors = custom_field_date::DESCRIPTOR.check_shape(&definition);
        assert_eq!(errors.len(), 2, "{errors:?}");
        assert!(errors[0].contains("garbage"));
        assert!(errors[1].contains("customFieldId"));
    }

    #[test]
    fn shape_check_rejects_values_on_valueless_predicates() {
        let definition = RuleDefinition::new("role", "is_admin", "yes");
        assert_eq!(
            role::DESCRIPTOR.check_shape(&definition),
            vec!["predicate `is_admin` takes no value".to_string()]
        );
    }
}
