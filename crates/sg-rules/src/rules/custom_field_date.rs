//! `custom_field_date`: comparisons on a date custom field.

use polars::prelude::{LazyFrame, col};
use sg_model::{CustomFieldKind, RuleDefinition};
use sg_store::columns::custom_field_values;

use super::compare::DateMatch;
use super::{
    custom_field, custom_field_args, custom_field_id, date_value, field_value_present,
    filter_by_field_value, parse_predicate,
};
use crate::descriptor::{RuleCost, RuleTypeDescriptor, ValueKind};
use crate::error::Result;
use crate::locale::Translator;
use crate::macros::predicates;
use crate::rule::{Rule, RuleContext};

predicates! {
    pub enum CustomFieldDatePredicate {
        IsBefore => "is_before",
        IsAfter => "is_after",
        IsExactly => "is_exactly",
        IsEmpty => "is_empty",
        NotIsEmpty => "not_is_empty",
    }
}

impl CustomFieldDatePredicate {
    fn matcher(self) -> Option<DateMatch> {
        match self {
            Self::IsBefore => Some(DateMatch::Before),
            Self::IsAfter => Some(DateMatch::After),
            Self::IsExactly => Some(DateMatch::Exactly),
            Self::IsEmpty | Self::NotIsEmpty => None,
        }
    }
}

pub static DESCRIPTOR: RuleTypeDescriptor = RuleTypeDescriptor {
    tag: "custom_field_date",
    predicates: CustomFieldDatePredicate::ALL,
    valueless_predicates: &["is_empty", "not_is_empty"],
    value: ValueKind::Date,
    custom_field: Some(CustomFieldKind::Date),
    cost: RuleCost::CustomField,
    constructor: CustomFieldDateRule::rehydrate,
};

#[derive(Debug)]
pub struct CustomFieldDateRule {
    definition: RuleDefinition,
    predicate: CustomFieldDatePredicate,
    custom_field_id: String,
    date: Option<String>,
}

impl CustomFieldDateRule {
    fn rehydrate(definition: &RuleDefinition) -> Result<Box<dyn Rule>> {
        let predicate = parse_predicate(definition, CustomFieldDatePredicate::parse)?;
        let date = match predicate.matcher() {
            Some(_) => Some(date_value(definition)?),
            None => None,
        };
        Ok(Box::new(Self {
            custom_field_id: custom_field_id(definition)?,
            definition: definition.clone(),
            predicate,
            date,
        }))
    }
}

impl Rule for CustomFieldDateRule {
    fn descriptor(&self) -> &'static RuleTypeDescriptor {
        &DESCRIPTOR
    }

    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn validate_references(&self, ctx: &RuleContext<'_>) -> Result<()> {
        custom_field(DESCRIPTOR.tag, &self.custom_field_id, CustomFieldKind::Date, ctx).map(|_| ())
    }

    fn filter(&self, frame: LazyFrame, ctx: &RuleContext<'_>) -> Result<LazyFrame> {
        self.validate_references(ctx)?;
        let (condition, negate) = match (self.predicate.matcher(), &self.date) {
            (Some(matcher), Some(date)) => {
                (matcher.condition(col(custom_field_values::VALUE), date), false)
            }
            _ => (
                field_value_present(),
                self.predicate == CustomFieldDatePredicate::IsEmpty,
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
            CustomFieldKind::Date,
            ctx,
        )?;
        Ok(custom_field_args(field, self.date.clone(), locale, translator))
    }
}
