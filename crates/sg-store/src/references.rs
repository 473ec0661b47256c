use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sg_model::{
    Area, CustomField, CustomFieldOption, EntityKind, IdeaStatus, Multiloc, Project, Topic,
};

/// In-memory index of the entities rule values refer to.
#[derive(Debug, Clone, Default)]
pub struct References {
    idea_statuses: HashMap<String, IdeaStatus>,
    topics: HashMap<String, Topic>,
    projects: HashMap<String, Project>,
    areas: HashMap<String, Area>,
    custom_fields: HashMap<String, CustomField>,
    custom_field_options: HashMap<String, CustomFieldOption>,
}

/// Serialized form of [`References`], as found in `references.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferenceData {
    pub idea_statuses: Vec<IdeaStatus>,
    pub topics: Vec<Topic>,
    pub projects: Vec<Project>,
    pub areas: Vec<Area>,
    pub custom_fields: Vec<CustomField>,
    pub custom_field_options: Vec<CustomFieldOption>,
}

impl From<ReferenceData> for References {
    fn from(data: ReferenceData) -> Self {
        let mut references = Self::default();
        for status in data.idea_statuses {
            references.add_idea_status(status);
        }
        for topic in data.topics {
            references.add_topic(topic);
        }
        for project in data.projects {
            references.add_project(project);
        }
        for area in data.areas {
            references.add_area(area);
        }
        for field in data.custom_fields {
            references.add_custom_field(field);
        }
        for option in data.custom_field_options {
            references.add_custom_field_option(option);
        }
        references
    }
}

impl References {
    pub fn add_idea_status(&mut self, status: IdeaStatus) {
        self.idea_statuses.insert(status.id.clone(), status);
    }

    pub fn add_topic(&mut self, topic: Topic) {
        self.topics.insert(topic.id.clone(), topic);
    }

    pub fn add_project(&mut self, project: Project) {
        self.projects.insert(project.id.clone(), project);
    }

    pub fn add_area(&mut self, area: Area) {
        self.areas.insert(area.id.clone(), area);
    }

    pub fn add_custom_field(&mut self, field: CustomField) {
        self.custom_fields.insert(field.id.clone(), field);
    }

    pub fn add_custom_field_option(&mut self, option: CustomFieldOption) {
        self.custom_field_options.insert(option.id.clone(), option);
    }

    pub fn idea_status(&self, id: &str) -> Option<&IdeaStatus> {
        self.idea_statuses.get(id)
    }

    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.get(id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.get(id)
    }

    pub fn area(&self, id: &str) -> Option<&Area> {
        self.areas.get(id)
    }

    pub fn custom_field(&self, id: &str) -> Option<&CustomField> {
        self.custom_fields.get(id)
    }

    pub fn custom_field_option(&self, id: &str) -> Option<&CustomFieldOption> {
        self.custom_field_options.get(id)
    }

    /// Options of one custom field, in no particular order.
    pub fn options_of<'a>(
        &'a self,
        custom_field_id: &'a str,
    ) -> impl Iterator<Item = &'a CustomFieldOption> + 'a {
        self.custom_field_options
            .values()
            .filter(move |option| option.custom_field_id == custom_field_id)
    }

    /// Title of any referenced entity, or `None` if it does not exist.
    pub fn title(&self, kind: EntityKind, id: &str) -> Option<&Multiloc> {
        match kind {
            EntityKind::IdeaStatus => self.idea_status(id).map(|e| &e.title_multiloc),
            EntityKind::Topic => self.topic(id).map(|e| &e.title_multiloc),
            EntityKind::Project => self.project(id).map(|e| &e.title_multiloc),
            EntityKind::Area => self.area(id).map(|e| &e.title_multiloc),
            EntityKind::CustomField => self.custom_field(id).map(|e| &e.title_multiloc),
            EntityKind::CustomFieldOption => {
                self.custom_field_option(id).map(|e| &e.title_multiloc)
            }
        }
    }

    pub fn contains(&self, kind: EntityKind, id: &str) -> bool {
        self.title(kind, id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_data_indexes_by_kind() {
        let data: ReferenceData = serde_json::from_str(
            r#"{"topics":[{"id":"t1","titleMultiloc":{"en":"beer"}}],
                "customFields":[{"id":"cf1","key":"color","inputType":"select"}],
                "customFieldOptions":[{"id":"o1","customFieldId":"cf1","key":"blue"}]}"#,
        )
        .expect("reference data");
        let references = References::from(data);
        assert_eq!(
            references.title(EntityKind::Topic, "t1").and_then(|t| t.get("en")),
            Some("beer")
        );
        assert!(!references.contains(EntityKind::IdeaStatus, "t1"));
        assert_eq!(references.options_of("cf1").count(), 1);
    }
}
