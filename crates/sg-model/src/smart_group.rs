use serde::{Deserialize, Serialize};

use crate::{Multiloc, RuleDefinition};

/// A rule-based user group: the conjunction of its rules defines membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartGroup {
    pub id: String,
    #[serde(default)]
    pub title_multiloc: Multiloc,
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

impl SmartGroup {
    pub fn new(id: impl Into<String>, rules: Vec<RuleDefinition>) -> Self {
        Self {
            id: id.into(),
            title_multiloc: Multiloc::new(),
            rules,
        }
    }

    pub fn rule_types(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.rule_type.as_str())
    }
}
