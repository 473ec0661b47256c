//! Immutable store contents.

use polars::prelude::{
    Column, DataFrame, IntoLazy, LazyFrame, PolarsResult, UnionArgs, col, concat, lit,
};
use sg_model::{
    Area, Comment, CustomField, CustomFieldOption, Idea, IdeaStatus, Project, SmartGroup, Topic,
    User, Vote,
};

use crate::columns::{
    ID, comments, custom_field_values, group_rules, groups, idea_topics, ideas, users, votes,
};
use crate::references::References;

/// One consistent version of every table.
///
/// DataFrame clones share their buffers, so handing a snapshot's tables to a
/// lazy query is cheap.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub users: DataFrame,
    pub custom_field_values: DataFrame,
    pub ideas: DataFrame,
    pub idea_topics: DataFrame,
    pub comments: DataFrame,
    pub votes: DataFrame,
    pub groups: DataFrame,
    pub group_rules: DataFrame,
    pub references: References,
}

impl Snapshot {
    pub fn empty() -> PolarsResult<Self> {
        SnapshotBuilder::new().build()
    }

    pub fn users_lazy(&self) -> LazyFrame {
        self.users.clone().lazy()
    }

    pub fn custom_field_values_lazy(&self) -> LazyFrame {
        self.custom_field_values.clone().lazy()
    }

    pub fn ideas_lazy(&self) -> LazyFrame {
        self.ideas.clone().lazy()
    }

    pub fn idea_topics_lazy(&self) -> LazyFrame {
        self.idea_topics.clone().lazy()
    }

    pub fn comments_lazy(&self) -> LazyFrame {
        self.comments.clone().lazy()
    }

    pub fn votes_lazy(&self) -> LazyFrame {
        self.votes.clone().lazy()
    }

    pub fn groups_lazy(&self) -> LazyFrame {
        self.groups.clone().lazy()
    }

    pub fn group_rules_lazy(&self) -> LazyFrame {
        self.group_rules.clone().lazy()
    }

    /// Copy of this snapshot with `group` inserted, or its rows replaced.
    pub fn with_group(&self, group: &SmartGroup) -> PolarsResult<Self> {
        let mut next = self.without_group(&group.id)?;
        let (group_frame, rule_frame) = group_frames(std::slice::from_ref(group))?;
        next.groups = concat([next.groups.lazy(), group_frame.lazy()], UnionArgs::default())?
            .collect()?;
        next.group_rules = concat(
            [next.group_rules.lazy(), rule_frame.lazy()],
            UnionArgs::default(),
        )?
        .collect()?;
        Ok(next)
    }

    /// Copy of this snapshot without the group `group_id` and its rules.
    pub fn without_group(&self, group_id: &str) -> PolarsResult<Self> {
        let mut next = self.clone();
        next.groups = self
            .groups_lazy()
            .filter(col(ID).neq(lit(group_id)))
            .collect()?;
        next.group_rules = self
            .group_rules_lazy()
            .filter(col(group_rules::GROUP_ID).neq(lit(group_id)))
            .collect()?;
        Ok(next)
    }
}

/// Assembles a [`Snapshot`] from model records.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    users: Vec<User>,
    ideas: Vec<Idea>,
    comments: Vec<Comment>,
    votes: Vec<Vote>,
    groups: Vec<SmartGroup>,
    references: References,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    #[must_use]
    pub fn users(mut self, users: impl IntoIterator<Item = User>) -> Self {
        self.users.extend(users);
        self
    }

    #[must_use]
    pub fn idea(mut self, idea: Idea) -> Self {
        self.ideas.push(idea);
        self
    }

    #[must_use]
    pub fn comment(mut self, comment: Comment) -> Self {
        self.comments.push(comment);
        self
    }

    #[must_use]
    pub fn vote(mut self, vote: Vote) -> Self {
        self.votes.push(vote);
        self
    }

    #[must_use]
    pub fn group(mut self, group: SmartGroup) -> Self {
        self.groups.push(group);
        self
    }

    #[must_use]
    pub fn idea_status(mut self, status: IdeaStatus) -> Self {
        self.references.add_idea_status(status);
        self
    }

    #[must_use]
    pub fn topic(mut self, topic: Topic) -> Self {
        self.references.add_topic(topic);
        self
    }

    #[must_use]
    pub fn project(mut self, project: Project) -> Self {
        self.references.add_project(project);
        self
    }

    #[must_use]
    pub fn area(mut self, area: Area) -> Self {
        self.references.add_area(area);
        self
    }

    #[must_use]
    pub fn custom_field(mut self, field: CustomField) -> Self {
        self.references.add_custom_field(field);
        self
    }

    #[must_use]
    pub fn custom_field_option(mut self, option: CustomFieldOption) -> Self {
        self.references.add_custom_field_option(option);
        self
    }

    #[must_use]
    pub fn references(mut self, references: References) -> Self {
        self.references = references;
        self
    }

    pub fn build(self) -> PolarsResult<Snapshot> {
        let (groups, group_rules) = group_frames(&self.groups)?;
        Ok(Snapshot {
            users: users_frame(&self.users)?,
            custom_field_values: custom_field_values_frame(&self.users)?,
            ideas: ideas_frame(&self.ideas)?,
            idea_topics: idea_topics_frame(&self.ideas)?,
            comments: comments_frame(&self.comments)?,
            votes: votes_frame(&self.votes)?,
            groups,
            group_rules,
            references: self.references,
        })
    }
}

fn strings<'a, T: 'a>(items: &'a [T], f: impl Fn(&'a T) -> &'a str) -> Vec<String> {
    items.iter().map(|item| f(item).to_string()).collect()
}

fn optional_strings<'a, T: 'a>(
    items: &'a [T],
    f: impl Fn(&'a T) -> Option<&'a str>,
) -> Vec<Option<String>> {
    items.iter().map(|item| f(item).map(str::to_string)).collect()
}

pub fn users_frame(records: &[User]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Column::new(ID.into(), strings(records, |u| u.id.as_str())),
        Column::new(users::EMAIL.into(), strings(records, |u| u.email.as_str())),
        Column::new(
            users::IS_ADMIN.into(),
            records.iter().map(|u| u.is_admin).collect::<Vec<_>>(),
        ),
        Column::new(
            users::IS_PROJECT_MODERATOR.into(),
            records
                .iter()
                .map(|u| u.is_project_moderator)
                .collect::<Vec<_>>(),
        ),
        Column::new(
            users::VERIFIED.into(),
            records.iter().map(|u| u.verified).collect::<Vec<_>>(),
        ),
        Column::new(
            users::REGISTRATION_COMPLETED_AT.into(),
            records
                .iter()
                .map(|u| {
                    u.registration_completed_at
                        .map(|date| date.format(sg_model::rule::DATE_FORMAT).to_string())
                })
                .collect::<Vec<_>>(),
        ),
        Column::new(
            users::DOMICILE.into(),
            optional_strings(records, |u| u.domicile.as_deref()),
        ),
    ])
}

pub fn custom_field_values_frame(records: &[User]) -> PolarsResult<DataFrame> {
    let mut user_ids = Vec::new();
    let mut field_ids = Vec::new();
    let mut values = Vec::new();
    for user in records {
        for (field_id, value) in &user.custom_field_values {
            user_ids.push(user.id.clone());
            field_ids.push(field_id.clone());
            values.push(value.clone());
        }
    }
    DataFrame::new(vec![
        Column::new(custom_field_values::USER_ID.into(), user_ids),
        Column::new(custom_field_values::CUSTOM_FIELD_ID.into(), field_ids),
        Column::new(custom_field_values::VALUE.into(), values),
    ])
}

pub fn ideas_frame(records: &[Idea]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Column::new(ID.into(), strings(records, |i| i.id.as_str())),
        Column::new(
            ideas::AUTHOR_ID.into(),
            optional_strings(records, |i| i.author_id.as_deref()),
        ),
        Column::new(
            ideas::PROJECT_ID.into(),
            strings(records, |i| i.project_id.as_str()),
        ),
        Column::new(
            ideas::IDEA_STATUS_ID.into(),
            optional_strings(records, |i| i.idea_status_id.as_deref()),
        ),
    ])
}

pub fn idea_topics_frame(records: &[Idea]) -> PolarsResult<DataFrame> {
    let (idea_ids, topic_ids): (Vec<String>, Vec<String>) = records
        .iter()
        .flat_map(|idea| {
            idea.topic_ids
                .iter()
                .map(move |topic| (idea.id.clone(), topic.clone()))
        })
        .unzip();
    DataFrame::new(vec![
        Column::new(idea_topics::IDEA_ID.into(), idea_ids),
        Column::new(idea_topics::TOPIC_ID.into(), topic_ids),
    ])
}

pub fn comments_frame(records: &[Comment]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Column::new(ID.into(), strings(records, |c| c.id.as_str())),
        Column::new(
            comments::IDEA_ID.into(),
            strings(records, |c| c.idea_id.as_str()),
        ),
        Column::new(
            comments::AUTHOR_ID.into(),
            optional_strings(records, |c| c.author_id.as_deref()),
        ),
    ])
}

pub fn votes_frame(records: &[Vote]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Column::new(ID.into(), strings(records, |v| v.id.as_str())),
        Column::new(
            votes::VOTABLE_TYPE.into(),
            strings(records, |v| v.votable_type.as_str()),
        ),
        Column::new(
            votes::VOTABLE_ID.into(),
            strings(records, |v| v.votable_id.as_str()),
        ),
        Column::new(
            votes::USER_ID.into(),
            strings(records, |v| v.user_id.as_str()),
        ),
    ])
}

/// Group rows plus one row per stored rule.
pub fn group_frames(records: &[SmartGroup]) -> PolarsResult<(DataFrame, DataFrame)> {
    let group_frame = DataFrame::new(vec![
        Column::new(ID.into(), strings(records, |g| g.id.as_str())),
        Column::new(
            groups::TITLE_MULTILOC.into(),
            records
                .iter()
                .map(|g| serde_json::to_string(&g.title_multiloc).unwrap_or_default())
                .collect::<Vec<_>>(),
        ),
    ])?;

    let mut group_ids = Vec::new();
    let mut positions = Vec::new();
    let mut rule_types = Vec::new();
    let mut predicates = Vec::new();
    let mut values = Vec::new();
    let mut custom_field_ids = Vec::new();
    let mut definitions = Vec::new();
    for group in records {
        for (position, rule) in (0u32..).zip(&group.rules) {
            group_ids.push(group.id.clone());
            positions.push(position);
            rule_types.push(rule.rule_type.clone());
            predicates.push(rule.predicate.clone());
            values.push(rule.value.as_ref().map(sg_model::RuleValue::as_key));
            custom_field_ids.push(rule.custom_field_id.clone());
            definitions.push(rule.to_json().to_string());
        }
    }
    let rule_frame = DataFrame::new(vec![
        Column::new(group_rules::GROUP_ID.into(), group_ids),
        Column::new(group_rules::POSITION.into(), positions),
        Column::new(group_rules::RULE_TYPE.into(), rule_types),
        Column::new(group_rules::PREDICATE.into(), predicates),
        Column::new(group_rules::VALUE.into(), values),
        Column::new(group_rules::CUSTOM_FIELD_ID.into(), custom_field_ids),
        Column::new(group_rules::DEFINITION.into(), definitions),
    ])?;
    Ok((group_frame, rule_frame))
}
