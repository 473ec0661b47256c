//! Participation rules: `participated_in_idea_status`,
//! `participated_in_topic` and `participated_in_project`.
//!
//! The three types share their predicates and only differ in what the value
//! points at. `in` matches any participation action, the scoped pairs match
//! a single action, and every `not_*` predicate is the complement of its
//! positive form within the full user collection.

use polars::prelude::LazyFrame;
use sg_model::{EntityKind, ParticipationAction, RuleDefinition};
use sg_store::{ParticipationTarget, drop_users, keep_users, participants};

use super::{parse_predicate, reference_title, require_reference, text_value};
use crate::descriptor::{RuleCost, RuleTypeDescriptor, ValueKind};
use crate::error::Result;
use crate::locale::Translator;
use crate::macros::predicates;
use crate::rule::{Rule, RuleContext};

predicates! {
    pub enum ParticipationPredicate {
        In => "in",
        NotIn => "not_in",
        PostedIn => "posted_in",
        NotPostedIn => "not_posted_in",
        CommentedIn => "commented_in",
        NotCommentedIn => "not_commented_in",
        VotedIdeaIn => "voted_idea_in",
        NotVotedIdeaIn => "not_voted_idea_in",
        VotedCommentIn => "voted_comment_in",
        NotVotedCommentIn => "not_voted_comment_in",
    }
}

const ANY_ACTION: &[ParticipationAction] = &ParticipationAction::ALL;
const POSTING: &[ParticipationAction] = &[ParticipationAction::Posting];
const COMMENTING: &[ParticipationAction] = &[ParticipationAction::Commenting];
const IDEA_VOTING: &[ParticipationAction] = &[ParticipationAction::IdeaVoting];
const COMMENT_VOTING: &[ParticipationAction] = &[ParticipationAction::CommentVoting];

impl ParticipationPredicate {
    /// Actions counted, and whether the result is complemented.
    pub fn scope(self) -> (&'static [ParticipationAction], bool) {
        match self {
            Self::In => (ANY_ACTION, false),
            Self::NotIn => (ANY_ACTION, true),
            Self::PostedIn => (POSTING, false),
            Self::NotPostedIn => (POSTING, true),
            Self::CommentedIn => (COMMENTING, false),
            Self::NotCommentedIn => (COMMENTING, true),
            Self::VotedIdeaIn => (IDEA_VOTING, false),
            Self::NotVotedIdeaIn => (IDEA_VOTING, true),
            Self::VotedCommentIn => (COMMENT_VOTING, false),
            Self::NotVotedCommentIn => (COMMENT_VOTING, true),
        }
    }
}

pub static IDEA_STATUS: RuleTypeDescriptor = RuleTypeDescriptor {
    tag: "participated_in_idea_status",
    predicates: ParticipationPredicate::ALL,
    valueless_predicates: &[],
    value: ValueKind::Reference(EntityKind::IdeaStatus),
    custom_field: None,
    cost: RuleCost::Participation,
    constructor: |definition| ParticipationRule::rehydrate(definition, &IDEA_STATUS),
};

pub static TOPIC: RuleTypeDescriptor = RuleTypeDescriptor {
    tag: "participated_in_topic",
    predicates: ParticipationPredicate::ALL,
    valueless_predicates: &[],
    value: ValueKind::Reference(EntityKind::Topic),
    custom_field: None,
    cost: RuleCost::Participation,
    constructor: |definition| ParticipationRule::rehydrate(definition, &TOPIC),
};

pub static PROJECT: RuleTypeDescriptor = RuleTypeDescriptor {
    tag: "participated_in_project",
    predicates: ParticipationPredicate::ALL,
    valueless_predicates: &[],
    value: ValueKind::Reference(EntityKind::Project),
    custom_field: None,
    cost: RuleCost::Participation,
    constructor: |definition| ParticipationRule::rehydrate(definition, &PROJECT),
};

#[derive(Debug)]
pub struct ParticipationRule {
    descriptor: &'static RuleTypeDescriptor,
    definition: RuleDefinition,
    predicate: ParticipationPredicate,
    kind: EntityKind,
    target: ParticipationTarget,
    target_id: String,
}

impl ParticipationRule {
    fn rehydrate(
        definition: &RuleDefinition,
        descriptor: &'static RuleTypeDescriptor,
    ) -> Result<Box<dyn Rule>> {
        let (kind, target) = match descriptor.value {
            ValueKind::Reference(EntityKind::Topic) => {
                (EntityKind::Topic, ParticipationTarget::Topic)
            }
            ValueKind::Reference(EntityKind::Project) => {
                (EntityKind::Project, ParticipationTarget::Project)
            }
            _ => (EntityKind::IdeaStatus, ParticipationTarget::IdeaStatus),
        };
        Ok(Box::new(Self {
            descriptor,
            predicate: parse_predicate(definition, ParticipationPredicate::parse)?,
            target_id: text_value(definition)?,
            definition: definition.clone(),
            kind,
            target,
        }))
    }
}

impl Rule for ParticipationRule {
    fn descriptor(&self) -> &'static RuleTypeDescriptor {
        self.descriptor
    }

    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn validate_references(&self, ctx: &RuleContext<'_>) -> Result<()> {
        require_reference(self.descriptor.tag, self.kind, &self.target_id, ctx)
    }

    fn filter(&self, frame: LazyFrame, ctx: &RuleContext<'_>) -> Result<LazyFrame> {
        self.validate_references(ctx)?;
        let (actions, negate) = self.predicate.scope();
        let user_ids = participants(ctx.snapshot(), self.target, &self.target_id, actions)?;
        Ok(if negate {
            drop_users(frame, user_ids)
        } else {
            keep_users(frame, user_ids)
        })
    }

    fn description_args(
        &self,
        locale: &str,
        translator: &dyn Translator,
        ctx: &RuleContext<'_>,
    ) -> Result<Vec<(&'static str, String)>> {
        let title = reference_title(
            self.descriptor.tag,
            self.kind,
            &self.target_id,
            locale,
            translator,
            ctx,
        )?;
        Ok(vec![("value", title)])
    }
}
