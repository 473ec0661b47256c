//! `role`: admins, project moderators and normal users.

use polars::prelude::{Expr, LazyFrame, col};
use sg_model::RuleDefinition;
use sg_store::columns::users;

use super::{filter_rows, parse_predicate};
use crate::descriptor::{RuleCost, RuleTypeDescriptor, ValueKind};
use crate::error::Result;
use crate::macros::predicates;
use crate::rule::{Rule, RuleContext};

predicates! {
    pub enum RolePredicate {
        IsAdmin => "is_admin",
        NotIsAdmin => "not_is_admin",
        IsProjectModerator => "is_project_moderator",
        NotIsProjectModerator => "not_is_project_moderator",
        IsNormalUser => "is_normal_user",
        NotIsNormalUser => "not_is_normal_user",
    }
}

pub static DESCRIPTOR: RuleTypeDescriptor = RuleTypeDescriptor {
    tag: "role",
    predicates: RolePredicate::ALL,
    valueless_predicates: RolePredicate::ALL,
    value: ValueKind::None,
    custom_field: None,
    cost: RuleCost::Attribute,
    constructor: RoleRule::rehydrate,
};

#[derive(Debug)]
pub struct RoleRule {
    definition: RuleDefinition,
    predicate: RolePredicate,
}

impl RoleRule {
    fn rehydrate(definition: &RuleDefinition) -> Result<Box<dyn Rule>> {
        Ok(Box::new(Self {
            predicate: parse_predicate(definition, RolePredicate::parse)?,
            definition: definition.clone(),
        }))
    }
}

fn admin() -> Expr {
    col(users::IS_ADMIN)
}

fn moderator() -> Expr {
    col(users::IS_PROJECT_MODERATOR)
}

/// Neither admin nor moderator.
fn normal_user() -> Expr {
    admin().or(moderator()).not()
}

impl Rule for RoleRule {
    fn descriptor(&self) -> &'static RuleTypeDescriptor {
        &DESCRIPTOR
    }

    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn filter(&self, frame: LazyFrame, _ctx: &RuleContext<'_>) -> Result<LazyFrame> {
        let (condition, negate) = match self.predicate {
            RolePredicate::IsAdmin => (admin(), false),
            RolePredicate::NotIsAdmin => (admin(), true),
            RolePredicate::IsProjectModerator => (moderator(), false),
            RolePredicate::NotIsProjectModerator => (moderator(), true),
            RolePredicate::IsNormalUser => (normal_user(), false),
            RolePredicate::NotIsNormalUser => (normal_user(), true),
        };
        Ok(filter_rows(frame, condition, negate))
    }
}
