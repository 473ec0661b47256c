//! `custom_field_select`: the option picked in a select custom field.
//!
//! The rule value is an option id; user values hold the option key.

use polars::prelude::{LazyFrame, col, lit};
use sg_model::{CustomFieldKind, CustomFieldOption, EntityKind, RuleDefinition};
use sg_store::columns::custom_field_values;

use super::{
    custom_field, custom_field_args, custom_field_id, field_value_present, filter_by_field_value,
    parse_predicate, text_value,
};
use crate::descriptor::{RuleCost, RuleTypeDescriptor, ValueKind};
use crate::error::{Result, RuleError};
use crate::locale::Translator;
use crate::macros::predicates;
use crate::rule::{Rule, RuleContext};

predicates! {
    pub enum CustomFieldSelectPredicate {
        HasValue => "has_value",
        NotHasValue => "not_has_value",
        IsEmpty => "is_empty",
        NotIsEmpty => "not_is_empty",
    }
}

pub static DESCRIPTOR: RuleTypeDescriptor = RuleTypeDescriptor {
    tag: "custom_field_select",
    predicates: CustomFieldSelectPredicate::ALL,
    valueless_predicates: &["is_empty", "not_is_empty"],
    value: ValueKind::Reference(EntityKind::CustomFieldOption),
    custom_field: Some(CustomFieldKind::Select),
    cost: RuleCost::CustomField,
    constructor: CustomFieldSelectRule::rehydrate,
};

#[derive(Debug)]
pub struct CustomFieldSelectRule {
    definition: RuleDefinition,
    predicate: CustomFieldSelectPredicate,
    custom_field_id: String,
    option_id: Option<String>,
}

impl CustomFieldSelectRule {
    fn rehydrate(definition: &RuleDefinition) -> Result<Box<dyn Rule>> {
        let predicate = parse_predicate(definition, CustomFieldSelectPredicate::parse)?;
        let option_id = match predicate {
            CustomFieldSelectPredicate::HasValue | CustomFieldSelectPredicate::NotHasValue => {
                Some(text_value(definition)?)
            }
            CustomFieldSelectPredicate::IsEmpty | CustomFieldSelectPredicate::NotIsEmpty => None,
        };
        Ok(Box::new(Self {
            custom_field_id: custom_field_id(definition)?,
            definition: definition.clone(),
            predicate,
            option_id,
        }))
    }

    /// The option, which must belong to this rule's field.
    fn option<'a>(&self, ctx: &RuleContext<'a>) -> Result<Option<&'a CustomFieldOption>> {
        let Some(id) = &self.option_id else {
            return Ok(None);
        };
        ctx.references()
            .custom_field_option(id)
            .filter(|option| option.custom_field_id == self.custom_field_id)
            .map(Some)
            .ok_or_else(|| RuleError::not_found(DESCRIPTOR.tag, EntityKind::CustomFieldOption, id))
    }
}

impl Rule for CustomFieldSelectRule {
    fn descriptor(&self) -> &'static RuleTypeDescriptor {
        &DESCRIPTOR
    }

    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn validate_references(&self, ctx: &RuleContext<'_>) -> Result<()> {
        custom_field(DESCRIPTOR.tag, &self.custom_field_id, CustomFieldKind::Select, ctx)?;
        self.option(ctx).map(|_| ())
    }

    fn filter(&self, frame: LazyFrame, ctx: &RuleContext<'_>) -> Result<LazyFrame> {
        custom_field(DESCRIPTOR.tag, &self.custom_field_id, CustomFieldKind::Select, ctx)?;
        let option = self.option(ctx)?;
        let (condition, negate) = match (self.predicate, option) {
            (CustomFieldSelectPredicate::HasValue, Some(option)) => {
                (col(custom_field_values::VALUE).eq(lit(option.key.as_str())), false)
            }
            (CustomFieldSelectPredicate::NotHasValue, Some(option)) => {
                (col(custom_field_values::VALUE).eq(lit(option.key.as_str())), true)
            }
            (CustomFieldSelectPredicate::IsEmpty, _) => (field_value_present(), true),
            _ => (field_value_present(), false),
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
            CustomFieldKind::Select,
            ctx,
        )?;
        let value = self
            .option(ctx)?
            .map(|option| translator.localize(&option.title_multiloc, locale));
        Ok(custom_field_args(field, value, locale, translator))
    }
}
