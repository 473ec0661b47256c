//! `custom_field_number`: numeric comparisons on a number custom field.

use polars::prelude::{LazyFrame, col};
use sg_model::{CustomFieldKind, RuleDefinition, RuleValue};
use sg_store::columns::custom_field_values;

use super::compare::NumberMatch;
use super::{
    custom_field, custom_field_args, custom_field_id, field_value_present, filter_by_field_value,
    number_value, parse_predicate,
};
use crate::descriptor::{RuleCost, RuleTypeDescriptor, ValueKind};
use crate::error::Result;
use crate::locale::Translator;
use crate::macros::predicates;
use crate::rule::{Rule, RuleContext};

predicates! {
    pub enum CustomFieldNumberPredicate {
        IsEqual => "is_equal",
        NotIsEqual => "not_is_equal",
        IsLargerThan => "is_larger_than",
        IsLargerThanOrEqual => "is_larger_than_or_equal",
        IsSmallerThan => "is_smaller_than",
        IsSmallerThanOrEqual => "is_smaller_than_or_equal",
        IsEmpty => "is_empty",
        NotIsEmpty => "not_is_empty",
    }
}

impl CustomFieldNumberPredicate {
    fn matcher(self) -> Option<(NumberMatch, bool)> {
        Some(match self {
            Self::IsEqual => (NumberMatch::Equal, false),
            Self::NotIsEqual => (NumberMatch::Equal, true),
            Self::IsLargerThan => (NumberMatch::Larger, false),
            Self::IsLargerThanOrEqual => (NumberMatch::LargerOrEqual, false),
            Self::IsSmallerThan => (NumberMatch::Smaller, false),
            Self::IsSmallerThanOrEqual => (NumberMatch::SmallerOrEqual, false),
            Self::IsEmpty | Self::NotIsEmpty => return None,
        })
    }
}

pub static DESCRIPTOR: RuleTypeDescriptor = RuleTypeDescriptor {
    tag: "custom_field_number",
    predicates: CustomFieldNumberPredicate::ALL,
    valueless_predicates: &["is_empty", "not_is_empty"],
    value: ValueKind::Number,
    custom_field: Some(CustomFieldKind::Number),
    cost: RuleCost::CustomField,
    constructor: CustomFieldNumberRule::rehydrate,
};

#[derive(Debug)]
pub struct CustomFieldNumberRule {
    definition: RuleDefinition,
    predicate: CustomFieldNumberPredicate,
    custom_field_id: String,
    number: Option<f64>,
}

impl CustomFieldNumberRule {
    fn rehydrate(definition: &RuleDefinition) -> Result<Box<dyn Rule>> {
        let predicate = parse_predicate(definition, CustomFieldNumberPredicate::parse)?;
        let number = match predicate.matcher() {
            Some(_) => Some(number_value(definition)?),
            None => None,
        };
        Ok(Box::new(Self {
            custom_field_id: custom_field_id(definition)?,
            definition: definition.clone(),
            predicate,
            number,
        }))
    }
}

impl Rule for CustomFieldNumberRule {
    fn descriptor(&self) -> &'static RuleTypeDescriptor {
        &DESCRIPTOR
    }

    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn validate_references(&self, ctx: &RuleContext<'_>) -> Result<()> {
        custom_field(DESCRIPTOR.tag, &self.custom_field_id, CustomFieldKind::Number, ctx)
            .map(|_| ())
    }

    fn filter(&self, frame: LazyFrame, ctx: &RuleContext<'_>) -> Result<LazyFrame> {
        self.validate_references(ctx)?;
        let (condition, negate) = match (self.predicate.matcher(), self.number) {
            (Some((matcher, negate)), Some(number)) => (
                matcher.condition(col(custom_field_values::VALUE), number),
                negate,
            ),
            _ => (
                field_value_present(),
                self.predicate == CustomFieldNumberPredicate::IsEmpty,
            ),
        };
        Ok(filter_by_field_value(
            frame,
            ctx,
            &self.custom_field_id,
            condition,
            negate,
        ))
    }

    fn description_args(
        &self,
        locale: &str,
        translator: &dyn Translator,
        ctx: &RuleContext<'_>,
    ) -> Result<Vec<(&'static str, String)>> {
        let field = custom_field(
            DESCRIPTOR.tag,
            &self.custom_field_id,
            CustomFieldKind::Number,
            ctx,
        )?;
        let value = self.number.map(|number| RuleValue::Number(number).to_string());
        Ok(custom_field_args(field, value, locale, translator))
    }
}
