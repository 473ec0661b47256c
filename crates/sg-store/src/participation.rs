//! Participation queries.
//!
//! A participant of a target (an idea status, a topic or a project) is a
//! user who took at least one of the requested [`ParticipationAction`]s on an
//! idea carrying that target:
//!
//! | Action | Source |
//! |--------|--------|
//! | posting | idea authors |
//! | commenting | comment authors on those ideas |
//! | idea voting | voters on those ideas |
//! | comment voting | voters on comments on those ideas |
//!
//! Everything here only builds query plans.

use polars::prelude::{
    JoinArgs, JoinType, LazyFrame, PolarsResult, UnionArgs, col, concat, lit,
};
use sg_model::{ParticipationAction, VotableType};

use crate::columns::{ID, comments, idea_topics, ideas, votes};
use crate::snapshot::Snapshot;

const IDEA_ID: &str = "idea_id";
const COMMENT_ID: &str = "comment_id";
const USER_ID: &str = "user_id";

/// What a participation rule value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipationTarget {
    IdeaStatus,
    Topic,
    Project,
}

fn semi(left: LazyFrame, right: LazyFrame, left_on: &str, right_on: &str) -> LazyFrame {
    left.join(
        right,
        [col(left_on)],
        [col(right_on)],
        JoinArgs::new(JoinType::Semi),
    )
}

/// Ids of the ideas carrying `target_id`, as a single `idea_id` column.
pub fn target_ideas(
    snapshot: &Snapshot,
    target: ParticipationTarget,
    target_id: &str,
) -> LazyFrame {
    match target {
        ParticipationTarget::IdeaStatus => snapshot
            .ideas_lazy()
            .filter(col(ideas::IDEA_STATUS_ID).eq(lit(target_id)))
            .select([col(ID).alias(IDEA_ID)]),
        ParticipationTarget::Project => snapshot
            .ideas_lazy()
            .filter(col(ideas::PROJECT_ID).eq(lit(target_id)))
            .select([col(ID).alias(IDEA_ID)]),
        ParticipationTarget::Topic => snapshot
            .idea_topics_lazy()
            .filter(col(idea_topics::TOPIC_ID).eq(lit(target_id)))
            .select([col(idea_topics::IDEA_ID)]),
    }
}

fn action_participants(
    snapshot: &Snapshot,
    target_ideas: LazyFrame,
    action: ParticipationAction,
) -> LazyFrame {
    match action {
        ParticipationAction::Posting => semi(snapshot.ideas_lazy(), target_ideas, ID, IDEA_ID)
            .select([col(ideas::AUTHOR_ID).alias(USER_ID)]),
        ParticipationAction::Commenting => {
            semi(snapshot.comments_lazy(), target_ideas, comments::IDEA_ID, IDEA_ID)
                .select([col(comments::AUTHOR_ID).alias(USER_ID)])
        }
        ParticipationAction::IdeaVoting => semi(
            votes_on(snapshot, VotableType::Idea),
            target_ideas,
            votes::VOTABLE_ID,
            IDEA_ID,
        )
        .select([col(votes::USER_ID)]),
        ParticipationAction::CommentVoting => {
            let target_comments =
                semi(snapshot.comments_lazy(), target_ideas, comments::IDEA_ID, IDEA_ID)
                    .select([col(ID).alias(COMMENT_ID)]);
            semi(
                votes_on(snapshot, VotableType::Comment),
                target_comments,
                votes::VOTABLE_ID,
                COMMENT_ID,
            )
            .select([col(votes::USER_ID)])
        }
    }
}

fn votes_on(snapshot: &Snapshot, votable_type: VotableType) -> LazyFrame {
    snapshot
        .votes_lazy()
        .filter(col(votes::VOTABLE_TYPE).eq(lit(votable_type.as_str())))
}

/// Users who performed any of `actions` on ideas carrying `target_id`, as a
/// `user_id` column. May contain duplicates and nulls (deleted authors).
pub fn participants(
    snapshot: &Snapshot,
    target: ParticipationTarget,
    target_id: &str,
    actions: &[ParticipationAction],
) -> PolarsResult<LazyFrame> {
    let ideas = target_ideas(snapshot, target, target_id);
    let mut frames: Vec<LazyFrame> = actions
        .iter()
        .map(|action| action_participants(snapshot, ideas.clone(), *action))
        .collect();
    match frames.len() {
        0 => Ok(snapshot
            .users_lazy()
            .filter(lit(false))
            .select([col(ID).alias(USER_ID)])),
        1 => Ok(frames.remove(0)),
        _ => concat(frames, UnionArgs::default()),
    }
}

/// Keep the users whose id appears in the `user_id` column of `user_ids`.
pub fn keep_users(users: LazyFrame, user_ids: LazyFrame) -> LazyFrame {
    semi(users, user_ids, ID, USER_ID)
}

/// Drop the users whose id appears in the `user_id` column of `user_ids`.
pub fn drop_users(users: LazyFrame, user_ids: LazyFrame) -> LazyFrame {
    users.join(
        user_ids,
        [col(ID)],
        [col(USER_ID)],
        JoinArgs::new(JoinType::Anti),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SnapshotBuilder;
    use sg_model::{Comment, Idea, User, Vote};

    fn fixture() -> Snapshot {
        SnapshotBuilder::new()
            .users((1..=4).map(|n| User::new(format!("u{n}"), format!("u{n}@example.org"))))
            .idea(Idea::new("i1", "p1").by("u1").with_status("s1").with_topic("t1"))
            .idea(Idea::new("i2", "p1").by("u3").with_status("s2"))
            .comment(Comment::new("c1", "i1", "u3"))
            .vote(Vote::on_idea("v1", "i1", "u2"))
            .vote(Vote::on_comment("v2", "c1", "u4"))
            .build()
            .expect("snapshot")
    }

    fn user_ids(frame: LazyFrame) -> Vec<String> {
        let df = frame.collect().expect("collect");
        let mut ids: Vec<String> = df
            .column(ID)
            .expect("id column")
            .str()
            .expect("string ids")
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();
        ids.sort();
        ids
    }

    #[test]
    fn each_action_selects_its_participants() {
        let snapshot = fixture();
        let cases = [
            (ParticipationAction::Posting, vec!["u1"]),
            (ParticipationAction::Commenting, vec!["u3"]),
            (ParticipationAction::IdeaVoting, vec!["u2"]),
            (ParticipationAction::CommentVoting, vec!["u4"]),
        ];
        for (action, expected) in cases {
            let ids = participants(&snapshot, ParticipationTarget::IdeaStatus, "s1", &[action])
                .expect("participants");
            assert_eq!(user_ids(keep_users(snapshot.users_lazy(), ids)), expected, "{action:?}");
        }
    }

    #[test]
    fn topic_and_project_targets_resolve_ideas() {
        let snapshot = fixture();
        let topic = participants(
            &snapshot,
            ParticipationTarget::Topic,
            "t1",
            &ParticipationAction::ALL,
        )
        .expect("participants");
        assert_eq!(
            user_ids(keep_users(snapshot.users_lazy(), topic)),
            vec!["u1", "u2", "u3", "u4"]
        );

        let project = participants(
            &snapshot,
            ParticipationTarget::Project,
            "p1",
            &[ParticipationAction::Posting],
        )
        .expect("participants");
        assert_eq!(
            user_ids(drop_users(snapshot.users_lazy(), project)),
            vec!["u2", "u4"]
        );
    }
}
