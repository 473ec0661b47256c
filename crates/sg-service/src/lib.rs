//! Smart group operations on top of the rule engine.
//!
//! [`RulesService`] validates submitted rule lists, turns them into user
//! filters and answers the reverse questions: which groups a user belongs
//! to, and which groups mention a rule type or a value.

mod service;

pub use service::RulesService;
