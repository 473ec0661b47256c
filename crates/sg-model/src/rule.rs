//! Serializable rule definitions.
//!
//! A [`RuleDefinition`] is the stored, wire-level form of one segmentation
//! condition. It carries no behavior: the rule engine rehydrates it into a
//! runtime rule by looking up `rule_type` in its registry.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Date format used by date-valued rules and date custom fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Scalar rule value. Ids and dates travel as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Text(String),
    Number(f64),
}

impl RuleValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Number(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    /// Canonical string form used when comparing stored values.
    pub fn as_key(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Number(value) => serde_json::Number::from_f64(*value)
                .map(|number| number.to_string())
                .unwrap_or_else(|| value.to_string()),
        }
    }
}

impl fmt::Display for RuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Number(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for RuleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RuleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for RuleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// One rule as stored on a smart group and exchanged with the admin UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleDefinition {
    pub rule_type: String,
    pub predicate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<RuleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_field_id: Option<String>,
}

impl RuleDefinition {
    pub fn new(
        rule_type: impl Into<String>,
        predicate: impl Into<String>,
        value: impl Into<RuleValue>,
    ) -> Self {
        Self {
            rule_type: rule_type.into(),
            predicate: predicate.into(),
            value: Some(value.into()),
            custom_field_id: None,
        }
    }

    pub fn valueless(rule_type: impl Into<String>, predicate: impl Into<String>) -> Self {
        Self {
            rule_type: rule_type.into(),
            predicate: predicate.into(),
            value: None,
            custom_field_id: None,
        }
    }

    #[must_use]
    pub fn with_custom_field(mut self, custom_field_id: impl Into<String>) -> Self {
        self.custom_field_id = Some(custom_field_id.into());
        self
    }

    pub fn value_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(RuleValue::as_str)
    }

    pub fn value_f64(&self) -> Option<f64> {
        self.value.as_ref().and_then(RuleValue::as_f64)
    }

    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    pub fn to_json(&self) -> serde_json::Value {
        // A struct of strings and finite numbers always serializes.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ModelError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ModelError::InvalidDate {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_and_number_values_deserialize_untagged() {
        let text: RuleDefinition =
            serde_json::from_value(json!({"ruleType": "email", "predicate": "is", "value": "a@b.c"}))
                .expect("text rule");
        assert_eq!(text.value_str(), Some("a@b.c"));

        let number: RuleDefinition = serde_json::from_value(json!({
            "ruleType": "custom_field_number",
            "predicate": "is_equal",
            "value": 3,
            "customFieldId": "cf"
        }))
        .expect("number rule");
        assert_eq!(number.value_f64(), Some(3.0));
        assert_eq!(number.custom_field_id.as_deref(), Some("cf"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: serde_json::Result<RuleDefinition> = serde_json::from_value(json!({
            "ruleType": "role",
            "predicate": "is_admin",
            "extra": true
        }));
        assert!(result.is_err());
    }

    #[test]
    fn number_keys_are_canonical() {
        assert_eq!(RuleValue::Number(3.0).as_key(), "3.0");
        assert_eq!(RuleValue::text("abc").as_key(), "abc");
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("2018-05-04").is_ok());
        assert!(parse_date("garbage").is_err());
        assert!(parse_date("2018-13-01").is_err());
    }
}
