//! The runtime rule contract.

use std::fmt;

use polars::prelude::LazyFrame;
use serde_json::Value;
use sg_model::RuleDefinition;
use sg_store::{References, Snapshot};

use crate::descriptor::RuleTypeDescriptor;
use crate::error::{Result, RuleError};
use crate::locale::Translator;

/// Read-only view of the data a rule validates and filters against.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> RuleContext<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &'a Snapshot {
        self.snapshot
    }

    pub fn references(&self) -> &'a References {
        &self.snapshot.references
    }
}

/// A rule definition bound to the behavior of its rule type.
///
/// Instances are built on demand by [`RuleTypeDescriptor::instantiate`] and
/// dropped after use.
pub trait Rule: fmt::Debug + Send + Sync {
    fn descriptor(&self) -> &'static RuleTypeDescriptor;

    fn definition(&self) -> &RuleDefinition;

    /// Check that the entities this rule points at exist.
    fn validate_references(&self, _ctx: &RuleContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Narrow `users` to the users matching this rule.
    ///
    /// Never executes the query. The result can be filtered again.
    fn filter(&self, users: LazyFrame, ctx: &RuleContext<'_>) -> Result<LazyFrame>;

    /// Interpolation arguments for the description template.
    fn description_args(
        &self,
        _locale: &str,
        _translator: &dyn Translator,
        _ctx: &RuleContext<'_>,
    ) -> Result<Vec<(&'static str, String)>> {
        Ok(self
            .definition()
            .value
            .iter()
            .map(|value| ("value", value.to_string()))
            .collect())
    }

    fn validate(&self, ctx: &RuleContext<'_>) -> Result<()> {
        let errors = self.descriptor().check_shape(self.definition());
        if !errors.is_empty() {
            return Err(RuleError::MalformedInput { errors });
        }
        self.validate_references(ctx)
    }

    fn schema_fragments(&self) -> Vec<Value> {
        self.descriptor().schema_fragments()
    }

    fn describe(
        &self,
        locale: &str,
        translator: &dyn Translator,
        ctx: &RuleContext<'_>,
    ) -> Result<String> {
        let definition = self.definition();
        let key = format!("{}.{}", definition.rule_type, definition.predicate);
        let args = self.description_args(locale, translator, ctx)?;
        let args: Vec<(&str, &str)> = args
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .collect();
        Ok(translator.translate(locale, &key, &args))
    }
}
