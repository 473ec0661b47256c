//! `custom_field_checkbox`: whether a checkbox custom field is ticked.

use polars::prelude::{LazyFrame, col, lit};
use sg_model::{CustomFieldKind, RuleDefinition};
use sg_store::columns::custom_field_values;

use super::{
    custom_field, custom_field_args, custom_field_id, filter_by_field_value, parse_predicate,
};
use crate::descriptor::{RuleCost, RuleTypeDescriptor, ValueKind};
use crate::error::Result;
use crate::locale::Translator;
use crate::macros::predicates;
use crate::rule::{Rule, RuleContext};

/// Stored value of a ticked checkbox.
const CHECKED: &str = "true";

predicates! {
    pub enum CustomFieldCheckboxPredicate {
        IsChecked => "is_checked",
        NotIsChecked => "not_is_checked",
    }
}

pub static DESCRIPTOR: RuleTypeDescriptor = RuleTypeDescriptor {
    tag: "custom_field_checkbox",
    predicates: CustomFieldCheckboxPredicate::ALL,
    valueless_predicates: CustomFieldCheckboxPredicate::ALL,
    value: ValueKind::None,
    custom_field: Some(CustomFieldKind::Checkbox),
    cost: RuleCost::CustomField,
    constructor: CustomFieldCheckboxRule::rehydrate,
};

#[derive(Debug)]
pub struct CustomFieldCheckboxRule {
    definition: RuleDefinition,
    predicate: CustomFieldCheckboxPredicate,
    custom_field_id: String,
}

impl CustomFieldCheckboxRule {
    fn rehydrate(definition: &RuleDefinition) -> Result<Box<dyn Rule>> {
        Ok(Box::new(Self {
            predicate: parse_predicate(definition, CustomFieldCheckboxPredicate::parse)?,
            custom_field_id: custom_field_id(definition)?,
            definition: definition.clone(),
        }))
    }
}

impl Rule for CustomFieldCheckboxRule {
    fn descriptor(&self) -> &'static RuleTypeDescriptor {
        &DESCRIPTOR
    }

    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn validate_references(&self, ctx: &RuleContext<'_>) -> Result<()> {
        custom_field(DESCRIPTOR.tag, &self.custom_field_id, CustomFieldKind::Checkbox, ctx)
            .map(|_| ())
    }

    fn filter(&self, frame: LazyFrame, ctx: &RuleContext<'_>) -> Result<LazyFrame> {
        self.validate_references(ctx)?;
        Ok(filter_by_field_value(
            frame,
            ctx,
            &self.custom_field_id,
            col(custom_field_values::VALUE).eq(lit(CHECKED)),
            self.predicate == CustomFieldCheckboxPredicate::NotIsChecked,
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
            CustomFieldKind::Checkbox,
            ctx,
        )?;
        Ok(custom_field_args(field, None, locale, translator))
    }
}
