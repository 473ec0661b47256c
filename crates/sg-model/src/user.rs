use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_project_moderator: bool,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub registration_completed_at: Option<NaiveDate>,
    /// Area id the user lives in.
    #[serde(default)]
    pub domicile: Option<String>,
    /// Custom field id to stored value. Select fields store the option key.
    #[serde(default)]
    pub custom_field_values: BTreeMap<String, String>,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    #[must_use]
    pub fn with_custom_field_value(
        mut self,
        custom_field_id: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.custom_field_values
            .insert(custom_field_id.into(), value.into());
        self
    }
}
