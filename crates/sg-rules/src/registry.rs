//! Rule type registry.
//!
//! Feature modules contribute rule types through [`RuleModule::register`]
//! while a [`RegistryBuilder`] is open. [`RegistryBuilder::build`] freezes
//! the table into a [`RuleRegistry`], which never changes afterwards and can
//! be shared between threads without locking.
//!
//! # Example
//!
//! ```ignore
//! use sg_rules::{default_registry, RuleContext};
//!
//! let rule = default_registry().rehydrate(&definition)?;
//! let narrowed = rule.filter(users, &RuleContext::new(&snapshot))?;
//! ```

use std::collections::HashMap;
use std::sync::OnceLock;

use serde_json::Value;
use sg_model::RuleDefinition;
use tracing::{debug, error, warn};

use crate::descriptor::RuleTypeDescriptor;
use crate::error::{Result, RuleError};
use crate::modules::{BUNDLED_MODULES, CoreRules};
use crate::rule::Rule;

/// A feature module that adds rule types.
pub trait RuleModule: Send + Sync {
    /// Name used to enable or disable the module in configuration.
    fn name(&self) -> &'static str;

    fn register(&self, registry: &mut RegistryBuilder);
}

/// Registry under construction. Registration is append-only.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    by_tag: HashMap<&'static str, usize>,
    descriptors: Vec<&'static RuleTypeDescriptor>,
    modules: Vec<&'static str>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule type. A tag that is already registered keeps its first
    /// descriptor; returns whether `descriptor` was added.
    pub fn register(&mut self, descriptor: &'static RuleTypeDescriptor) -> bool {
        if self.by_tag.contains_key(descriptor.tag) {
            warn!(tag = descriptor.tag, "rule type already registered, ignoring");
            return false;
        }
        self.by_tag.insert(descriptor.tag, self.descriptors.len());
        self.descriptors.push(descriptor);
        true
    }

    /// Run `module`'s registration.
    pub fn install(&mut self, module: &dyn RuleModule) -> &mut Self {
        let before = self.descriptors.len();
        module.register(self);
        debug!(
            module = module.name(),
            rule_types = self.descriptors.len() - before,
            "registered rule module"
        );
        self.modules.push(module.name());
        self
    }

    pub fn build(self) -> RuleRegistry {
        RuleRegistry {
            by_tag: self.by_tag,
            descriptors: self.descriptors,
            modules: self.modules,
        }
    }
}

/// Frozen table of rule types.
#[derive(Debug)]
pub struct RuleRegistry {
    by_tag: HashMap<&'static str, usize>,
    descriptors: Vec<&'static RuleTypeDescriptor>,
    modules: Vec<&'static str>,
}

impl RuleRegistry {
    pub fn from_modules<'m>(modules: impl IntoIterator<Item = &'m dyn RuleModule>) -> Self {
        let mut builder = RegistryBuilder::new();
        for module in modules {
            builder.install(module);
        }
        builder.build()
    }

    /// Registry with only the bundled modules named in `names`.
    /// Unknown names are logged and skipped. Core rules are always included.
    pub fn with_enabled_modules<S: AsRef<str>>(names: &[S]) -> Self {
        for name in names {
            if !BUNDLED_MODULES.iter().any(|m| m.name() == name.as_ref()) {
                warn!(module = name.as_ref(), "unknown rule module, skipping");
            }
        }
        let core_name = CoreRules.name();
        Self::from_modules(BUNDLED_MODULES.iter().copied().filter(|module| {
            module.name() == core_name || names.iter().any(|name| name.as_ref() == module.name())
        }))
    }

    pub fn get(&self, tag: &str) -> Option<&'static RuleTypeDescriptor> {
        self.by_tag.get(tag).map(|index| self.descriptors[*index])
    }

    /// Like [`get`](Self::get), but a missing tag is an error.
    pub fn descriptor(&self, tag: &str) -> Result<&'static RuleTypeDescriptor> {
        self.get(tag).ok_or_else(|| {
            error!(rule_type = tag, "rule type is not registered");
            RuleError::UnknownRuleType(tag.to_string())
        })
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &'static RuleTypeDescriptor> + '_ {
        self.descriptors.iter().copied()
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.descriptors.iter().map(|descriptor| descriptor.tag)
    }

    /// Names of the installed modules.
    pub fn modules(&self) -> &[&'static str] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Build the runtime rule for `definition`.
    pub fn rehydrate(&self, definition: &RuleDefinition) -> Result<Box<dyn Rule>> {
        self.descriptor(&definition.rule_type)?
            .instantiate(definition)
    }

    /// Rehydrate a stored JSON definition.
    pub fn rehydrate_json(&self, json: &Value) -> Result<Box<dyn Rule>> {
        let definition =
            RuleDefinition::from_json(json.clone()).map_err(RuleError::StoredDefinition)?;
        self.rehydrate(&definition)
    }
}

static DEFAULT_REGISTRY: OnceLock<RuleRegistry> = OnceLock::new();

/// Process-wide registry with every bundled module installed.
pub fn default_registry() -> &'static RuleRegistry {
    DEFAULT_REGISTRY.get_or_init(|| RuleRegistry::from_modules(BUNDLED_MODULES.iter().copied()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::email;

    struct Duplicate;

    impl RuleModule for Duplicate {
        fn name(&self) -> &'static str {
            "duplicate"
        }

        fn register(&self, registry: &mut RegistryBuilder) {
            registry.register(&email::DESCRIPTOR);
        }
    }

    #[test]
    fn duplicate_tags_keep_the_first_registration() {
        let registry = RuleRegistry::from_modules([&CoreRules as &dyn RuleModule, &Duplicate]);
        assert_eq!(registry.tags().filter(|tag| *tag == "email").count(), 1);
        assert_eq!(registry.modules(), ["core", "duplicate"]);
    }

    #[test]
    fn default_registry_preserves_registration_order() {
        let tags: Vec<&str> = default_registry().tags().collect();
        assert_eq!(tags.first(), Some(&"email"));
        assert_eq!(tags.last(), Some(&"verified"));
        assert_eq!(tags.len(), 13);
    }

    #[test]
    fn disabled_modules_make_their_rules_unknown() {
        let registry = RuleRegistry::with_enabled_modules::<&str>(&[]);
        let err = registry
            .rehydrate(&RuleDefinition::valueless("verified", "is_verified"))
            .expect_err("verification module disabled");
        assert!(matches!(err, RuleError::UnknownRuleType(tag) if tag == "verified"));
    }

    #[test]
    fn rehydrate_json_rejects_unknown_fields() {
        let err = default_registry()
            .rehydrate_json(&serde_json::json!({"ruleType": "role", "predicate": "is_admin", "x": 1}))
            .expect_err("unknown field");
        assert!(matches!(err, RuleError::StoredDefinition(_)));
    }
}
