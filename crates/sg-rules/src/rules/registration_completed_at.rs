//! `registration_completed_at`: when the user finished signing up.

use polars::prelude::{LazyFrame, col};
use sg_model::RuleDefinition;
use sg_store::columns::users;

use super::compare::DateMatch;
use super::{date_value, filter_rows, parse_predicate};
use crate::descriptor::{RuleCost, RuleTypeDescriptor, ValueKind};
use crate::error::Result;
use crate::macros::predicates;
use crate::rule::{Rule, RuleContext};

predicates! {
    pub enum RegistrationPredicate {
        IsBefore => "is_before",
        IsAfter => "is_after",
        IsExactly => "is_exactly",
        IsEmpty => "is_empty",
        NotIsEmpty => "not_is_empty",
    }
}

pub static DESCRIPTOR: RuleTypeDescriptor = RuleTypeDescriptor {
    tag: "registration_completed_at",
    predicates: RegistrationPredicate::ALL,
    valueless_predicates: &["is_empty", "not_is_empty"],
    value: ValueKind::Date,
    custom_field: None,
    cost: RuleCost::Attribute,
    constructor: RegistrationCompletedAtRule::rehydrate,
};

#[derive(Debug)]
pub struct RegistrationCompletedAtRule {
    definition: RuleDefinition,
    predicate: RegistrationPredicate,
    date: Option<String>,
}

impl RegistrationCompletedAtRule {
    fn rehydrate(definition: &RuleDefinition) -> Result<Box<dyn Rule>> {
        let predicate = parse_predicate(definition, RegistrationPredicate::parse)?;
        let date = match predicate {
            RegistrationPredicate::IsEmpty | RegistrationPredicate::NotIsEmpty => None,
            _ => Some(date_value(definition)?),
        };
        Ok(Box::new(Self {
            definition: definition.clone(),
            predicate,
            date,
        }))
    }
}

impl Rule for RegistrationCompletedAtRule {
    fn descriptor(&self) -> &'static RuleTypeDescriptor {
        &DESCRIPTOR
    }

    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn filter(&self, frame: LazyFrame, _ctx: &RuleContext<'_>) -> Result<LazyFrame> {
        let column = col(users::REGISTRATION_COMPLETED_AT);
        let date = self.date.as_deref().unwrap_or_default();
        let condition = match self.predicate {
            RegistrationPredicate::IsBefore => DateMatch::Before.condition(column, date),
            RegistrationPredicate::IsAfter => DateMatch::After.condition(column, date),
            RegistrationPredicate::IsExactly => DateMatch::Exactly.condition(column, date),
            RegistrationPredicate::IsEmpty => column.is_null(),
            RegistrationPredicate::NotIsEmpty => column.is_not_null(),
        };
        Ok(filter_rows(frame, condition, false))
    }
}
