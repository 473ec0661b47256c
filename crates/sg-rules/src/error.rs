#![deny(unsafe_code)]

use polars::prelude::PolarsError;
use sg_model::{CustomFieldKind, EntityKind};
use sg_store::StoreError;

/// How a [`RuleError`] should be surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The submitted rules are invalid; fix the input.
    MalformedInput,
    /// A rule refers to something that no longer exists.
    ReferencedEntityNotFound,
    /// Configuration or programming error.
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("malformed rule input: {}", errors.join("; "))]
    MalformedInput { errors: Vec<String> },

    #[error(
        "rule type {rule_type} needs a {expected} custom field, but {custom_field_id} is a {actual} field"
    )]
    IncompatibleCustomField {
        rule_type: String,
        custom_field_id: String,
        expected: CustomFieldKind,
        actual: CustomFieldKind,
    },

    #[error("{rule_type} rule refers to {kind} {id}, which no longer exists")]
    ReferencedEntityNotFound {
        rule_type: String,
        kind: EntityKind,
        id: String,
    },

    #[error("unknown rule type: {0}")]
    UnknownRuleType(String),

    #[error("rule type {rule_type} does not support predicate {predicate}")]
    UnsupportedPredicate { rule_type: String, predicate: String },

    #[error("generated rule schema does not compile: {0}")]
    InvalidSchema(String),

    #[error("stored rule definition is invalid: {0}")]
    StoredDefinition(#[source] serde_json::Error),

    #[error("query failed: {0}")]
    Query(#[from] PolarsError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RuleError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            errors: vec![message.into()],
        }
    }

    pub(crate) fn not_found(rule_type: &str, kind: EntityKind, id: &str) -> Self {
        Self::ReferencedEntityNotFound {
            rule_type: rule_type.to_string(),
            kind,
            id: id.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedInput { .. } | Self::IncompatibleCustomField { .. } => {
                ErrorCategory::MalformedInput
            }
            Self::ReferencedEntityNotFound { .. } => ErrorCategory::ReferencedEntityNotFound,
            Self::UnknownRuleType(_)
            | Self::UnsupportedPredicate { .. }
            | Self::InvalidSchema(_)
            | Self::StoredDefinition(_)
            | Self::Query(_)
            | Self::Store(_) => ErrorCategory::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, RuleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        assert_eq!(
            RuleError::malformed("bad").category(),
            ErrorCategory::MalformedInput
        );
        assert_eq!(
            RuleError::not_found("lives_in", EntityKind::Area, "a1").category(),
            ErrorCategory::ReferencedEntityNotFound
        );
        assert_eq!(
            RuleError::UnknownRuleType("x".into()).category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn not_found_message_names_the_entity() {
        let err = RuleError::not_found("participated_in_topic", EntityKind::Topic, "t9");
        assert_eq!(
            err.to_string(),
            "participated_in_topic rule refers to topic t9, which no longer exists"
        );
    }
}
