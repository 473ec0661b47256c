//! `custom_field_text`: string match on a text custom field.

use polars::prelude::{LazyFrame, col};
use sg_model::{CustomFieldKind, RuleDefinition};
use sg_store::columns::custom_field_values;

use super::compare::TextMatch;
use super::{
    custom_field, custom_field_args, custom_field_id, field_value_present, filter_by_field_value,
    parse_predicate, text_value,
};
use crate::descriptor::{RuleCost, RuleTypeDescriptor, ValueKind};
use crate::error::Result;
use crate::locale::Translator;
use crate::macros::predicates;
use crate::rule::{Rule, RuleContext};

predicates! {
    pub enum CustomFieldTextPredicate {
        Is => "is",
        NotIs => "not_is",
        Contains => "contains",
        NotContains => "not_contains",
        BeginsWith => "begins_with",
        NotBeginsWith => "not_begins_with",
        EndsOn => "ends_on",
        NotEndsOn => "not_ends_on",
        IsEmpty => "is_empty",
        NotIsEmpty => "not_is_empty",
    }
}

impl CustomFieldTextPredicate {
    /// `None` for the presence predicates.
    fn matcher(self) -> Option<(TextMatch, bool)> {
        Some(match self {
            Self::Is => (TextMatch::Is, false),
            Self::NotIs => (TextMatch::Is, true),
            Self::Contains => (TextMatch::Contains, false),
            Self::NotContains => (TextMatch::Contains, true),
            Self::BeginsWith => (TextMatch::BeginsWith, false),
            Self::NotBeginsWith => (TextMatch::BeginsWith, true),
            Self::EndsOn => (TextMatch::EndsOn, false),
            Self::NotEndsOn => (TextMatch::EndsOn, true),
            Self::IsEmpty | Self::NotIsEmpty => return None,
        })
    }
}

pub static DESCRIPTOR: RuleTypeDescriptor = RuleTypeDescriptor {
    tag: "custom_field_text",
    predicates: CustomFieldTextPredicate::ALL,
    valueless_predicates: &["is_empty", "not_is_empty"],
    value: ValueKind::Text,
    custom_field: Some(CustomFieldKind::Text),
    cost: RuleCost::CustomField,
    constructor: CustomFieldTextRule::rehydrate,
};

#[derive(Debug)]
pub struct CustomFieldTextRule {
    definition: RuleDefinition,
    predicate: CustomFieldTextPredicate,
    custom_field_id: String,
    value: Option<String>,
}

impl CustomFieldTextRule {
    fn rehydrate(definition: &RuleDefinition) -> Result<Box<dyn Rule>> {
        let predicate = parse_predicate(definition, CustomFieldTextPredicate::parse)?;
        let value = match predicate.matcher() {
            Some(_) => Some(text_value(definition)?),
            None => None,
        };
        Ok(Box::new(Self {
            custom_field_id: custom_field_id(definition)?,
            definition: definition.clone(),
            predicate,
            value,
        }))
    }
}

impl Rule for CustomFieldTextRule {
    fn descriptor(&self) -> &'static RuleTypeDescriptor {
        &DESCRIPTOR
    }

    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn validate_references(&self, ctx: &RuleContext<'_>) -> Result<()> {
        custom_field(DESCRIPTOR.tag, &self.custom_field_id, CustomFieldKind::Text, ctx).map(|_| ())
    }

    fn filter(&self, frame: LazyFrame, ctx: &RuleContext<'_>) -> Result<LazyFrame> {
        self.validate_references(ctx)?;
        let (condition, negate) = match (self.predicate.matcher(), &self.value) {
            (Some((matcher, negate)), Some(value)) => (
                matcher.condition(col(custom_field_values::VALUE), value),
                negate,
            ),
            _ => (
                field_value_present(),
                self.predicate == CustomFieldTextPredicate::IsEmpty,
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
            CustomFieldKind::Text,
            ctx,
        )?;
        Ok(custom_field_args(field, self.value.clone(), locale, translator))
    }
}
