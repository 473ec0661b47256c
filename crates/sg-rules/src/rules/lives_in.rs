//! `lives_in`: the user's domicile area.

use polars::prelude::{LazyFrame, col, lit};
use sg_model::{EntityKind, RuleDefinition};
use sg_store::columns::users;

use super::{filter_rows, parse_predicate, reference_title, require_reference, text_value};
use crate::descriptor::{RuleCost, RuleTypeDescriptor, ValueKind};
use crate::error::Result;
use crate::locale::Translator;
use crate::macros::predicates;
use crate::rule::{Rule, RuleContext};

predicates! {
    pub enum LivesInPredicate {
        HasValue => "has_value",
        NotHasValue => "not_has_value",
        IsEmpty => "is_empty",
        NotIsEmpty => "not_is_empty",
    }
}

pub static DESCRIPTOR: RuleTypeDescriptor = RuleTypeDescriptor {
    tag: "lives_in",
    predicates: LivesInPredicate::ALL,
    valueless_predicates: &["is_empty", "not_is_empty"],
    value: ValueKind::Reference(EntityKind::Area),
    custom_field: None,
    cost: RuleCost::Attribute,
    constructor: LivesInRule::rehydrate,
};

#[derive(Debug)]
pub struct LivesInRule {
    definition: RuleDefinition,
    predicate: LivesInPredicate,
    area_id: Option<String>,
}

impl LivesInRule {
    fn rehydrate(definition: &RuleDefinition) -> Result<Box<dyn Rule>> {
        let predicate = parse_predicate(definition, LivesInPredicate::parse)?;
        let area_id = match predicate {
            LivesInPredicate::HasValue | LivesInPredicate::NotHasValue => {
                Some(text_value(definition)?)
            }
            LivesInPredicate::IsEmpty | LivesInPredicate::NotIsEmpty => None,
        };
        Ok(Box::new(Self {
            definition: definition.clone(),
            predicate,
            area_id,
        }))
    }
}

impl Rule for LivesInRule {
    fn descriptor(&self) -> &'static RuleTypeDescriptor {
        &DESCRIPTOR
    }

    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn validate_references(&self, ctx: &RuleContext<'_>) -> Result<()> {
        match &self.area_id {
            Some(id) => require_reference(DESCRIPTOR.tag, EntityKind::Area, id, ctx),
            None => Ok(()),
        }
    }

    fn filter(&self, frame: LazyFrame, ctx: &RuleContext<'_>) -> Result<LazyFrame> {
        self.validate_references(ctx)?;
        let domicile = col(users::DOMICILE);
        let area = self.area_id.as_deref().unwrap_or_default();
        let (condition, negate) = match self.predicate {
            LivesInPredicate::HasValue => (domicile.eq(lit(area)), false),
            LivesInPredicate::NotHasValue => (domicile.eq(lit(area)), true),
            LivesInPredicate::IsEmpty => (domicile.is_null(), false),
            LivesInPredicate::NotIsEmpty => (domicile.is_null(), true),
        };
        Ok(filter_rows(frame, condition, negate))
    }

    fn description_args(
        &self,
        locale: &str,
        translator: &dyn Translator,
        ctx: &RuleContext<'_>,
    ) -> Result<Vec<(&'static str, String)>> {
        let Some(id) = &self.area_id else {
            return Ok(Vec::new());
        };
        let title = reference_title(DESCRIPTOR.tag, EntityKind::Area, id, locale, translator, ctx)?;
        Ok(vec![("value", title)])
    }
}
