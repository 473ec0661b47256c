//! `email`: string match on the user's email address.

use polars::prelude::{LazyFrame, col};
use sg_model::RuleDefinition;
use sg_store::columns::users;

use super::compare::TextMatch;
use super::{filter_rows, parse_predicate, text_value};
use crate::descriptor::{RuleCost, RuleTypeDescriptor, ValueKind};
use crate::error::Result;
use crate::macros::predicates;
use crate::rule::{Rule, RuleContext};

predicates! {
    pub enum EmailPredicate {
        Is => "is",
        NotIs => "not_is",
        Contains => "contains",
        NotContains => "not_contains",
        BeginsWith => "begins_with",
        NotBeginsWith => "not_begins_with",
        EndsOn => "ends_on",
        NotEndsOn => "not_ends_on",
    }
}

impl EmailPredicate {
    fn matcher(self) -> (TextMatch, bool) {
        match self {
            Self::Is => (TextMatch::Is, false),
            Self::NotIs => (TextMatch::Is, true),
            Self::Contains => (TextMatch::Contains, false),
            Self::NotContains => (TextMatch::Contains, true),
            Self::BeginsWith => (TextMatch::BeginsWith, false),
            Self::NotBeginsWith => (TextMatch::BeginsWith, true),
            Self::EndsOn => (TextMatch::EndsOn, false),
            Self::NotEndsOn => (TextMatch::EndsOn, true),
        }
    }
}

pub static DESCRIPTOR: RuleTypeDescriptor = RuleTypeDescriptor {
    tag: "email",
    predicates: EmailPredicate::ALL,
    valueless_predicates: &[],
    value: ValueKind::Text,
    custom_field: None,
    cost: RuleCost::Attribute,
    constructor: EmailRule::rehydrate,
};

#[derive(Debug)]
pub struct EmailRule {
    definition: RuleDefinition,
    predicate: EmailPredicate,
    value: String,
}

impl EmailRule {
    fn rehydrate(definition: &RuleDefinition) -> Result<Box<dyn Rule>> {
        Ok(Box::new(Self {
            predicate: parse_predicate(definition, EmailPredicate::parse)?,
            value: text_value(definition)?,
            definition: definition.clone(),
        }))
    }
}

impl Rule for EmailRule {
    fn descriptor(&self) -> &'static RuleTypeDescriptor {
        &DESCRIPTOR
    }

    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn filter(&self, frame: LazyFrame, _ctx: &RuleContext<'_>) -> Result<LazyFrame> {
        let (matcher, negate) = self.predicate.matcher();
        let condition = matcher.condition(col(users::EMAIL), &self.value);
        Ok(filter_rows(frame, condition, negate))
    }
}
