//! Bundled rule types.

pub mod custom_field_checkbox;
pub mod custom_field_date;
pub mod custom_field_number;
pub mod custom_field_select;
pub mod custom_field_text;
pub mod email;
pub mod lives_in;
pub mod participation;
pub mod registration_completed_at;
pub mod role;
pub mod verified;

mod compare;

use polars::prelude::{Expr, LazyFrame, col, lit};
use sg_model::{CustomField, CustomFieldKind, EntityKind, RuleDefinition, parse_date};
use sg_store::columns::custom_field_values;
use sg_store::{drop_users, keep_users};
use tracing::error;

use crate::error::{Result, RuleError};
use crate::rule::RuleContext;

pub(crate) fn parse_predicate<P>(
    definition: &RuleDefinition,
    parse: fn(&str) -> Option<P>,
) -> Result<P> {
    parse(&definition.predicate).ok_or_else(|| {
        error!(
            rule_type = %definition.rule_type,
            predicate = %definition.predicate,
            "unsupported predicate"
        );
        RuleError::UnsupportedPredicate {
            rule_type: definition.rule_type.clone(),
            predicate: definition.predicate.clone(),
        }
    })
}

pub(crate) fn text_value(definition: &RuleDefinition) -> Result<String> {
    definition.value_str().map(str::to_string).ok_or_else(|| {
        RuleError::malformed(format!(
            "{} rule with predicate `{}` requires a text value",
            definition.rule_type, definition.predicate
        ))
    })
}

pub(crate) fn number_value(definition: &RuleDefinition) -> Result<f64> {
    definition.value_f64().ok_or_else(|| {
        RuleError::malformed(format!(
            "{} rule with predicate `{}` requires a number value",
            definition.rule_type, definition.predicate
        ))
    })
}

/// The value as a normalized `YYYY-MM-DD` string.
pub(crate) fn date_value(definition: &RuleDefinition) -> Result<String> {
    let raw = text_value(definition)?;
    let date = parse_date(&raw).map_err(|err| RuleError::malformed(err.to_string()))?;
    Ok(date.format(sg_model::rule::DATE_FORMAT).to_string())
}

pub(crate) fn custom_field_id(definition: &RuleDefinition) -> Result<String> {
    definition.custom_field_id.clone().ok_or_else(|| {
        RuleError::malformed(format!(
            "{} rule requires a customFieldId",
            definition.rule_type
        ))
    })
}

/// Look up the custom field and check it has the kind the rule type expects.
pub(crate) fn custom_field<'a>(
    rule_type: &str,
    id: &str,
    expected: CustomFieldKind,
    ctx: &RuleContext<'a>,
) -> Result<&'a CustomField> {
    let field = ctx
        .references()
        .custom_field(id)
        .ok_or_else(|| RuleError::not_found(rule_type, EntityKind::CustomField, id))?;
    if field.input_type != expected {
        return Err(RuleError::IncompatibleCustomField {
            rule_type: rule_type.to_string(),
            custom_field_id: id.to_string(),
            expected,
            actual: field.input_type,
        });
    }
    Ok(field)
}

pub(crate) fn require_reference(
    rule_type: &str,
    kind: EntityKind,
    id: &str,
    ctx: &RuleContext<'_>,
) -> Result<()> {
    if ctx.references().contains(kind, id) {
        Ok(())
    } else {
        Err(RuleError::not_found(rule_type, kind, id))
    }
}

/// Keep the rows where `condition` holds, or, when `negate`, every other
/// row. Rows where `condition` is null never match, so they land in the
/// complement.
pub(crate) fn filter_rows(users: LazyFrame, condition: Expr, negate: bool) -> LazyFrame {
    let condition = condition.fill_null(lit(false));
    users.filter(if negate { condition.not() } else { condition })
}

/// Keep the users that have a value for `field_id` satisfying `condition`,
/// or, when `negate`, every other user.
pub(crate) fn filter_by_field_value(
    users: LazyFrame,
    ctx: &RuleContext<'_>,
    field_id: &str,
    condition: Expr,
    negate: bool,
) -> LazyFrame {
    let matching = ctx
        .snapshot()
        .custom_field_values_lazy()
        .filter(
            col(custom_field_values::CUSTOM_FIELD_ID)
                .eq(lit(field_id))
                .and(condition.fill_null(lit(false))),
        )
        .select([col(custom_field_values::USER_ID)]);
    if negate {
        drop_users(users, matching)
    } else {
        keep_users(users, matching)
    }
}

/// Condition on the custom field value column: set and non-blank.
pub(crate) fn field_value_present() -> Expr {
    col(custom_field_values::VALUE)
        .is_not_null()
        .and(col(custom_field_values::VALUE).neq(lit("")))
}

/// Display arguments shared by custom field rules.
pub(crate) fn custom_field_args(
    field: &CustomField,
    value: Option<String>,
    locale: &str,
    translator: &dyn crate::locale::Translator,
) -> Vec<(&'static str, String)> {
    let mut args = vec![(
        "customField",
        translator.localize(&field.title_multiloc, locale),
    )];
    if let Some(value) = value {
        args.push(("value", value));
    }
    args
}

/// Localized title of a referenced entity.
pub(crate) fn reference_title(
    rule_type: &str,
    kind: EntityKind,
    id: &str,
    locale: &str,
    translator: &dyn crate::locale::Translator,
    ctx: &RuleContext<'_>,
) -> Result<String> {
    ctx.references()
        .title(kind, id)
        .map(|title| translator.localize(title, locale))
        .ok_or_else(|| RuleError::not_found(rule_type, kind, id))
}
