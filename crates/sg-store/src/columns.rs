//! Table and column names shared by the store and the rule filters.

pub const ID: &str = "id";

pub mod users {
    pub const TABLE: &str = "users";
    pub const EMAIL: &str = "email";
    pub const IS_ADMIN: &str = "is_admin";
    pub const IS_PROJECT_MODERATOR: &str = "is_project_moderator";
    pub const VERIFIED: &str = "verified";
    pub const REGISTRATION_COMPLETED_AT: &str = "registration_completed_at";
    pub const DOMICILE: &str = "domicile";
}

pub mod custom_field_values {
    pub const TABLE: &str = "custom_field_values";
    pub const USER_ID: &str = "user_id";
    pub const CUSTOM_FIELD_ID: &str = "custom_field_id";
    pub const VALUE: &str = "value";
}

pub mod ideas {
    pub const TABLE: &str = "ideas";
    pub const AUTHOR_ID: &str = "author_id";
    pub const PROJECT_ID: &str = "project_id";
    pub const IDEA_STATUS_ID: &str = "idea_status_id";
}

pub mod idea_topics {
    pub const TABLE: &str = "idea_topics";
    pub const IDEA_ID: &str = "idea_id";
    pub const TOPIC_ID: &str = "topic_id";
}

pub mod comments {
    pub const TABLE: &str = "comments";
    pub const IDEA_ID: &str = "idea_id";
    pub const AUTHOR_ID: &str = "author_id";
}

pub mod votes {
    pub const TABLE: &str = "votes";
    pub const VOTABLE_TYPE: &str = "votable_type";
    pub const VOTABLE_ID: &str = "votable_id";
    pub const USER_ID: &str = "user_id";
}

pub mod groups {
    pub const TABLE: &str = "groups";
    pub const TITLE_MULTILOC: &str = "title_multiloc";
}

pub mod group_rules {
    pub const TABLE: &str = "group_rules";
    pub const GROUP_ID: &str = "group_id";
    pub const POSITION: &str = "position";
    pub const RULE_TYPE: &str = "rule_type";
    pub const PREDICATE: &str = "predicate";
    pub const VALUE: &str = "value";
    pub const CUSTOM_FIELD_ID: &str = "custom_field_id";
    /// Full JSON of the stored rule definition.
    pub const DEFINITION: &str = "definition";
}
