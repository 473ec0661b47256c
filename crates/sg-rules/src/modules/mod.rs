//! Bundled rule modules.

mod core_rules;
mod verification_rules;

pub use core_rules::CoreRules;
pub use verification_rules::VerificationRules;

use crate::registry::RuleModule;

/// Every module shipped with the engine, core first.
pub static BUNDLED_MODULES: [&dyn RuleModule; 2] = [&CoreRules, &VerificationRules];
