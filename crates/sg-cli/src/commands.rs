//! Subcommand implementations. Each returns the text to print.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use serde_json::Value;
use sg_model::{RuleValue, SmartGroup};
use sg_rules::{ErrorCategory, RuleError, RuleRegistry, Translator, ValueKind, generate_schema};
use sg_store::columns::{ID, users};
use tracing::{info, info_span};

use crate::workspace::Workspace;

/// Outcome of `validate`: invalid rules are a normal result, not an error.
#[derive(Debug)]
pub enum Validation {
    Valid(usize),
    Invalid {
        category: ErrorCategory,
        errors: Vec<String>,
    },
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn render(&self) -> String {
        match self {
            Self::Valid(count) => format!("{count} rule(s) valid"),
            Self::Invalid { category, errors } => {
                let mut out = format!("invalid rules ({category:?}):");
                for error in errors {
                    out.push_str("\n  - ");
                    out.push_str(error);
                }
                out
            }
        }
    }
}

pub fn run_schema(registry: &RuleRegistry) -> Result<String> {
    serde_json::to_string_pretty(&generate_schema(registry)).context("serialize schema")
}

pub fn run_rule_types(registry: &RuleRegistry) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rule type"),
        header_cell("Predicates"),
        header_cell("Value"),
        header_cell("Custom field"),
    ]);
    apply_table_style(&mut table);
    for descriptor in registry.descriptors() {
        let predicates: Vec<String> = descriptor
            .predicates
            .iter()
            .map(|predicate| {
                if descriptor.is_valueless(predicate) {
                    format!("{predicate}*")
                } else {
                    (*predicate).to_string()
                }
            })
            .collect();
        table.add_row(vec![
            Cell::new(descriptor.tag).fg(Color::Cyan),
            Cell::new(predicates.join(", ")),
            Cell::new(value_label(descriptor.value)),
            Cell::new(descriptor.custom_field.map_or("-", |kind| kind.as_str())),
        ]);
    }
    format!("{table}\n* takes no value")
}

fn value_label(kind: ValueKind) -> String {
    match kind {
        ValueKind::None => "-".to_string(),
        ValueKind::Text => "text".to_string(),
        ValueKind::Number => "number".to_string(),
        ValueKind::Date => "date".to_string(),
        ValueKind::Reference(entity) => format!("{} id", entity.label()),
    }
}

pub fn read_rules(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse JSON in {}", path.display()))
}

pub fn run_validate(workspace: &Workspace, rules: &Value) -> Result<Validation> {
    let service = workspace.service()?;
    match service.validate_rules(rules) {
        Ok(definitions) => Ok(Validation::Valid(definitions.len())),
        Err(err) => invalid(err),
    }
}

fn invalid(err: RuleError) -> Result<Validation> {
    let category = err.category();
    match (category, err) {
        (ErrorCategory::Internal, err) => Err(err).context("validate rules"),
        (_, RuleError::MalformedInput { errors }) => Ok(Validation::Invalid { category, errors }),
        (_, err) => Ok(Validation::Invalid {
            category,
            errors: vec![err.to_string()],
        }),
    }
}

fn find_group(workspace: &Workspace, id: &str) -> Result<SmartGroup> {
    workspace
        .store
        .find_group(id)
        .context("load smart groups")?
        .ok_or_else(|| anyhow!("smart group {id} not found"))
}

pub fn run_members(workspace: &Workspace, group_id: &str) -> Result<String> {
    let _span = info_span!("members", group_id).entered();
    let group = find_group(workspace, group_id)?;
    let service = workspace.service()?;
    let members = service
        .members(&group)
        .and_then(|scope| scope.collect().map_err(RuleError::from))
        .with_context(|| format!("evaluate smart group {group_id}"))?;

    let ids = members.column(ID)?.str()?;
    let emails = members.column(users::EMAIL)?.str()?;
    let mut rows: Vec<(&str, &str)> = ids
        .into_iter()
        .zip(emails)
        .filter_map(|(id, email)| Some((id?, email.unwrap_or_default())))
        .collect();
    rows.sort_unstable();

    let mut table = Table::new();
    table.set_header(vec![header_cell("User"), header_cell("Email")]);
    apply_table_style(&mut table);
    for (id, email) in &rows {
        table.add_row(vec![*id, *email]);
    }
    info!(members = rows.len(), "evaluated smart group");
    Ok(format!("{table}\n{} member(s)", rows.len()))
}

pub fn run_groups_for_user(workspace: &Workspace, user_id: &str, locale: &str) -> Result<String> {
    let user = workspace
        .store
        .find_user(user_id)
        .context("load user")?
        .ok_or_else(|| anyhow!("user {user_id} not found"))?;
    let service = workspace.service()?;
    let before = workspace.store.fetch_count();
    let groups = service
        .groups_for_user(&user)
        .with_context(|| format!("evaluate smart groups for {user_id}"))?;
    let fetches = workspace.store.fetch_count() - before;
    Ok(format!(
        "{}\n{} group(s), {fetches} fetch(es)",
        group_table(workspace, &groups, locale),
        groups.len()
    ))
}

#[derive(Debug, Clone, Default)]
pub struct GroupQuery {
    pub rule_type: Option<String>,
    pub value: Option<String>,
    /// Match `value` against numeric rule values instead of text ones.
    pub numeric: bool,
}

pub fn run_find_groups(workspace: &Workspace, query: &GroupQuery, locale: &str) -> Result<String> {
    let service = workspace.service()?;
    let mut scope = workspace.store.groups();
    if let Some(rule_type) = &query.rule_type {
        scope = service.filter_by_rule_type(scope, rule_type);
    }
    if let Some(value) = &query.value {
        scope = service.filter_by_rule_value(scope, &query_value(value, query.numeric)?);
    }
    let ids = scope.ids().context("query smart groups")?;
    let groups: Vec<SmartGroup> = workspace
        .store
        .load_groups()
        .context("load smart groups")?
        .into_iter()
        .filter(|group| ids.contains(&group.id))
        .collect();
    Ok(format!(
        "{}\n{} group(s)",
        group_table(workspace, &groups, locale),
        groups.len()
    ))
}

fn query_value(raw: &str, numeric: bool) -> Result<RuleValue> {
    if !numeric {
        return Ok(RuleValue::text(raw));
    }
    raw.parse::<f64>()
        .map(RuleValue::Number)
        .with_context(|| format!("`{raw}` is not a number"))
}

pub fn run_describe(workspace: &Workspace, group_id: &str, locale: &str) -> Result<String> {
    let group = find_group(workspace, group_id)?;
    let service = workspace.service()?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Rule type"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    for (position, rule) in group.rules.iter().enumerate() {
        let description = service
            .describe(rule, locale, &workspace.catalog)
            .with_context(|| format!("describe rule {position} of {group_id}"))?;
        table.add_row(vec![
            Cell::new(position + 1),
            Cell::new(&rule.rule_type),
            Cell::new(description),
        ]);
    }
    let title = workspace.catalog.localize(&group.title_multiloc, locale);
    Ok(format!("{group_id}: {title}\n{table}"))
}

fn group_table(workspace: &Workspace, groups: &[SmartGroup], locale: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Group"),
        header_cell("Title"),
        header_cell("Rules"),
    ]);
    apply_table_style(&mut table);
    for group in groups {
        table.add_row(vec![
            Cell::new(&group.id),
            Cell::new(workspace.catalog.localize(&group.title_multiloc, locale)),
            Cell::new(group.rules.len()),
        ]);
    }
    table
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}
