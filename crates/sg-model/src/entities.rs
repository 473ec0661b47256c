//! Reference entities that rule values point at.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ModelError, Multiloc};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaStatus {
    pub id: String,
    #[serde(default)]
    pub title_multiloc: Multiloc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    #[serde(default)]
    pub title_multiloc: Multiloc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub title_multiloc: Multiloc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub id: String,
    #[serde(default)]
    pub title_multiloc: Multiloc,
}

/// Input type of a registration custom field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomFieldKind {
    Text,
    Select,
    Checkbox,
    Date,
    Number,
}

impl CustomFieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Date => "date",
            Self::Number => "number",
        }
    }
}

impl fmt::Display for CustomFieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomFieldKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "select" => Ok(Self::Select),
            "checkbox" => Ok(Self::Checkbox),
            "date" => Ok(Self::Date),
            "number" => Ok(Self::Number),
            other => Err(ModelError::UnknownInputType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    pub id: String,
    pub key: String,
    pub input_type: CustomFieldKind,
    #[serde(default)]
    pub title_multiloc: Multiloc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldOption {
    pub id: String,
    pub custom_field_id: String,
    /// Value stored in a user's custom field values when this option is picked.
    pub key: String,
    #[serde(default)]
    pub title_multiloc: Multiloc,
}

/// Kind of entity a rule value can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    IdeaStatus,
    Topic,
    Project,
    Area,
    CustomField,
    CustomFieldOption,
}

impl EntityKind {
    /// Lower-case noun phrase, used in messages and schema descriptions.
    pub fn label(self) -> &'static str {
        match self {
            Self::IdeaStatus => "idea status",
            Self::Topic => "topic",
            Self::Project => "project",
            Self::Area => "area",
            Self::CustomField => "custom field",
            Self::CustomFieldOption => "custom field option",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
