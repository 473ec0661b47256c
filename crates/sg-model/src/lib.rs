pub mod entities;
pub mod error;
pub mod multiloc;
pub mod participation;
pub mod rule;
pub mod smart_group;
pub mod user;

pub use entities::{
    Area, CustomField, CustomFieldKind, CustomFieldOption, EntityKind, IdeaStatus, Project, Topic,
};
pub use error::{ModelError, Result};
pub use multiloc::Multiloc;
pub use participation::{Comment, Idea, ParticipationAction, VotableType, Vote};
pub use rule::{RuleDefinition, RuleValue, parse_date};
pub use smart_group::SmartGroup;
pub use user::User;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smart_group_serializes_with_camel_case_rules() {
        let group = SmartGroup {
            id: "g1".to_string(),
            title_multiloc: Multiloc::single("en", "Admins"),
            rules: vec![RuleDefinition::valueless("role", "is_admin")],
        };
        let json = serde_json::to_value(&group).expect("serialize group");
        assert_eq!(json["rules"][0]["ruleType"], "role");
        assert!(json["rules"][0].get("value").is_none());
        let round: SmartGroup = serde_json::from_value(json).expect("deserialize group");
        assert_eq!(round, group);
    }
}
