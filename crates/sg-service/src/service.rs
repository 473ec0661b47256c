use std::collections::HashSet;

use jsonschema::Validator;
use polars::prelude::{Expr, JoinArgs, JoinType, LazyFrame, UnionArgs, col, concat, lit};
use serde_json::Value;
use sg_model::{Multiloc, RuleDefinition, RuleValue, SmartGroup, User};
use sg_rules::{
    Result, Rule, RuleContext, RuleError, RuleRegistry, Translator, generate_schema,
};
use sg_store::columns::{ID, group_rules};
use sg_store::groups::{decode_groups, group_rows};
use sg_store::{DataStore, GroupScope, UserScope};
use tracing::{debug, error, info, info_span};

/// Entry point for everything that evaluates smart group rules.
///
/// Holds the generated schema compiled once; regenerate it with
/// [`generate_rules_json_schema`](Self::generate_rules_json_schema).
pub struct RulesService<'a> {
    registry: &'a RuleRegistry,
    store: &'a DataStore,
    validator: Validator,
}

impl<'a> RulesService<'a> {
    pub fn new(registry: &'a RuleRegistry, store: &'a DataStore) -> Result<Self> {
        let schema = generate_schema(registry);
        let validator = jsonschema::draft4::new(&schema).map_err(|err| {
            error!(error = %err, "generated rule schema does not compile");
            RuleError::InvalidSchema(err.to_string())
        })?;
        Ok(Self {
            registry,
            store,
            validator,
        })
    }

    pub fn registry(&self) -> &'a RuleRegistry {
        self.registry
    }

    pub fn store(&self) -> &'a DataStore {
        self.store
    }

    pub fn generate_rules_json_schema(&self) -> Value {
        generate_schema(self.registry)
    }

    /// Check a submitted rule list: schema first, then each rule's own
    /// validation, including that referenced entities exist.
    pub fn validate_rules(&self, rules: &Value) -> Result<Vec<RuleDefinition>> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(rules)
            .map(|err| err.to_string())
            .collect();
        if !errors.is_empty() {
            debug!(errors = errors.len(), "rules rejected by schema");
            return Err(RuleError::MalformedInput { errors });
        }
        let definitions: Vec<RuleDefinition> =
            serde_json::from_value(rules.clone()).map_err(|err| RuleError::MalformedInput {
                errors: vec![err.to_string()],
            })?;

        let snapshot = self.store.snapshot();
        let ctx = RuleContext::new(&snapshot);
        for definition in &definitions {
            let descriptor = self.registry.descriptor(&definition.rule_type)?;
            let errors = descriptor.check_shape(definition);
            if !errors.is_empty() {
                return Err(RuleError::MalformedInput { errors });
            }
            descriptor.instantiate(definition)?.validate(&ctx)?;
        }
        Ok(definitions)
    }

    /// Rehydrate `definitions`, cheapest rule types first.
    fn rehydrate_all(&self, definitions: &[RuleDefinition]) -> Result<Vec<Box<dyn Rule>>> {
        let mut rules = definitions
            .iter()
            .map(|definition| self.registry.rehydrate(definition))
            .collect::<Result<Vec<_>>>()?;
        rules.sort_by_key(|rule| rule.descriptor().cost);
        Ok(rules)
    }

    fn apply(
        rules: &[Box<dyn Rule>],
        frame: LazyFrame,
        ctx: &RuleContext<'_>,
    ) -> Result<LazyFrame> {
        rules
            .iter()
            .try_fold(frame, |frame, rule| rule.filter(frame, ctx))
    }

    /// Narrow `users` to the users satisfying every rule.
    pub fn filter<'s>(
        &self,
        users: UserScope<'s>,
        definitions: &[RuleDefinition],
    ) -> Result<UserScope<'s>> {
        if definitions.is_empty() {
            return Ok(users);
        }
        let rules = self.rehydrate_all(definitions)?;
        debug!(rules = rules.len(), "building user filter");
        users.try_narrow(|frame, snapshot| Self::apply(&rules, frame, &RuleContext::new(snapshot)))
    }

    /// Current members of `group`.
    pub fn members(&self, group: &SmartGroup) -> Result<UserScope<'a>> {
        self.filter(self.store.users(), &group.rules)
    }

    /// Every group whose rules `user` satisfies, sorted by id.
    ///
    /// Takes two fetches whatever the number of groups: one for all group
    /// rows, and one evaluating every group against the user in a single
    /// union query. With no groups the second fetch is skipped.
    pub fn groups_for_user(&self, user: &User) -> Result<Vec<SmartGroup>> {
        let _span = info_span!("groups_for_user", user_id = %user.id).entered();
        let snapshot = self.store.snapshot();
        let rows = self.store.fetch(group_rows(&snapshot))?;
        let groups = decode_groups(&rows)?;
        if groups.is_empty() {
            return Ok(groups);
        }

        let ctx = RuleContext::new(&snapshot);
        let candidate = snapshot
            .users_lazy()
            .filter(col(ID).eq(lit(user.id.as_str())));
        let mut frames = Vec::with_capacity(groups.len());
        for group in &groups {
            let rules = self.rehydrate_all(&group.rules)?;
            frames.push(
                Self::apply(&rules, candidate.clone(), &ctx)?
                    .with_column(lit(group.id.as_str()).alias(group_rules::GROUP_ID))
                    .select([col(group_rules::GROUP_ID)]),
            );
        }
        let matched = self
            .store
            .fetch(concat(frames, UnionArgs::default())?)?;
        let matched: HashSet<String> = matched
            .column(group_rules::GROUP_ID)?
            .str()?
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();
        debug!(groups = groups.len(), matched = matched.len(), "evaluated groups");
        Ok(groups
            .into_iter()
            .filter(|group| matched.contains(&group.id))
            .collect())
    }

    fn groups_with_rules<'s>(
        groups: GroupScope<'s>,
        condition: Expr,
    ) -> GroupScope<'s> {
        groups.narrow(|frame, snapshot| {
            let rules = snapshot
                .group_rules_lazy()
                .filter(condition)
                .select([col(group_rules::GROUP_ID)]);
            frame.join(
                rules,
                [col(ID)],
                [col(group_rules::GROUP_ID)],
                JoinArgs::new(JoinType::Semi),
            )
        })
    }

    /// Groups with at least one rule of type `rule_type`.
    pub fn filter_by_rule_type<'s>(
        &self,
        groups: GroupScope<'s>,
        rule_type: &str,
    ) -> GroupScope<'s> {
        Self::groups_with_rules(groups, col(group_rules::RULE_TYPE).eq(lit(rule_type)))
    }

    /// Groups with at least one rule whose value equals `value`.
    pub fn filter_by_rule_value<'s>(
        &self,
        groups: GroupScope<'s>,
        value: &RuleValue,
    ) -> GroupScope<'s> {
        Self::groups_with_rules(groups, col(group_rules::VALUE).eq(lit(value.as_key())))
    }

    pub fn describe(
        &self,
        definition: &RuleDefinition,
        locale: &str,
        translator: &dyn Translator,
    ) -> Result<String> {
        let snapshot = self.store.snapshot();
        self.registry
            .rehydrate(definition)?
            .describe(locale, translator, &RuleContext::new(&snapshot))
    }

    /// The description in every locale `translator` offers.
    pub fn description_multiloc(
        &self,
        definition: &RuleDefinition,
        translator: &dyn Translator,
    ) -> Result<Multiloc> {
        let snapshot = self.store.snapshot();
        let ctx = RuleContext::new(&snapshot);
        let rule = self.registry.rehydrate(definition)?;
        translator
            .locales()
            .into_iter()
            .map(|locale| {
                let text = rule.describe(&locale, translator, &ctx)?;
                Ok((locale, text))
            })
            .collect()
    }

    /// Validate `rules` and store them as the whole rule list of group `id`.
    pub fn save_group(&self, id: &str, title: Multiloc, rules: &Value) -> Result<SmartGroup> {
        let group = SmartGroup {
            id: id.to_string(),
            title_multiloc: title,
            rules: self.validate_rules(rules)?,
        };
        self.store.save_group(&group)?;
        info!(group_id = %id, rules = group.rules.len(), "smart group saved");
        Ok(group)
    }

    pub fn destroy_group(&self, id: &str) -> Result<bool> {
        Ok(self.store.destroy_group(id)?)
    }
}
