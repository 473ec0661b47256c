//! `verified`: users who completed identity verification.

use polars::prelude::{LazyFrame, col};
use sg_model::RuleDefinition;
use sg_store::columns::users;

use super::{filter_rows, parse_predicate};
use crate::descriptor::{RuleCost, RuleTypeDescriptor, ValueKind};
use crate::error::Result;
use crate::macros::predicates;
use crate::rule::{Rule, RuleContext};

predicates! {
    pub enum VerifiedPredicate {
        IsVerified => "is_verified",
        NotIsVerified => "not_is_verified",
    }
}

pub static DESCRIPTOR: RuleTypeDescriptor = RuleTypeDescriptor {
    tag: "verified",
    predicates: VerifiedPredicate::ALL,
    valueless_predicates: VerifiedPredicate::ALL,
    value: ValueKind::None,
    custom_field: None,
    cost: RuleCost::Attribute,
    constructor: VerifiedRule::rehydrate,
};

#[derive(Debug)]
pub struct VerifiedRule {
    definition: RuleDefinition,
    predicate: VerifiedPredicate,
}

impl VerifiedRule {
    fn rehydrate(definition: &RuleDefinition) -> Result<Box<dyn Rule>> {
        Ok(Box::new(Self {
            predicate: parse_predicate(definition, VerifiedPredicate::parse)?,
            definition: definition.clone(),
        }))
    }
}

impl Rule for VerifiedRule {
    fn descriptor(&self) -> &'static RuleTypeDescriptor {
        &DESCRIPTOR
    }

    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn filter(&self, frame: LazyFrame, _ctx: &RuleContext<'_>) -> Result<LazyFrame> {
        let negate = self.predicate == VerifiedPredicate::NotIsVerified;
        Ok(filter_rows(frame, col(users::VERIFIED), negate))
    }
}
