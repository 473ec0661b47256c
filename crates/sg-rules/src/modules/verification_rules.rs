use crate::registry::{RegistryBuilder, RuleModule};
use crate::rules::verified;

/// Identity verification status.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerificationRules;

impl RuleModule for VerificationRules {
    fn name(&self) -> &'static str {
        "verification"
    }

    fn register(&self, registry: &mut RegistryBuilder) {
        registry.register(&verified::DESCRIPTOR);
    }
}
