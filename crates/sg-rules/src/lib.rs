//! Rule engine for smart groups.
//!
//! A smart group is a conjunction of rules over users. Each rule type is a
//! [`RuleTypeDescriptor`] registered by a [`RuleModule`]; a stored
//! [`RuleDefinition`](sg_model::RuleDefinition) is rehydrated through the
//! [`RuleRegistry`] into a [`Rule`] that can validate itself, narrow a user
//! query and describe itself through a [`Translator`].

mod macros;

pub mod descriptor;
pub mod error;
pub mod locale;
pub mod modules;
pub mod registry;
pub mod rule;
pub mod rules;
pub mod schema;

pub use descriptor::{RuleCost, RuleTypeDescriptor, ValueKind};
pub use error::{ErrorCategory, Result, RuleError};
pub use locale::Translator;
pub use modules::{BUNDLED_MODULES, CoreRules, VerificationRules};
pub use registry::{RegistryBuilder, RuleModule, RuleRegistry, default_registry};
pub use rule::{Rule, RuleContext};
pub use schema::generate_schema;
