//! Participation records: ideas, comments and votes.

use serde::{Deserialize, Serialize};

/// One of the four ways a user can take part in an idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationAction {
    Posting,
    Commenting,
    IdeaVoting,
    CommentVoting,
}

impl ParticipationAction {
    pub const ALL: [ParticipationAction; 4] = [
        Self::Posting,
        Self::Commenting,
        Self::IdeaVoting,
        Self::CommentVoting,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: String,
    /// `None` once the author account is deleted.
    #[serde(default)]
    pub author_id: Option<String>,
    pub project_id: String,
    #[serde(default)]
    pub idea_status_id: Option<String>,
    #[serde(default)]
    pub topic_ids: Vec<String>,
}

impl Idea {
    pub fn new(id: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            author_id: None,
            project_id: project_id.into(),
            idea_status_id: None,
            topic_ids: Vec::new(),
        }
    }

    #[must_use]
    pub fn by(mut self, author_id: impl Into<String>) -> Self {
        self.author_id = Some(author_id.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, idea_status_id: impl Into<String>) -> Self {
        self.idea_status_id = Some(idea_status_id.into());
        self
    }

    #[must_use]
    pub fn with_topic(mut self, topic_id: impl Into<String>) -> Self {
        self.topic_ids.push(topic_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub idea_id: String,
    #[serde(default)]
    pub author_id: Option<String>,
}

impl Comment {
    pub fn new(
        id: impl Into<String>,
        idea_id: impl Into<String>,
        author_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            idea_id: idea_id.into(),
            author_id: Some(author_id.into()),
        }
    }
}

/// What a vote was cast on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VotableType {
    Idea,
    Comment,
}

impl VotableType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idea => "Idea",
            Self::Comment => "Comment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: String,
    pub votable_type: VotableType,
    pub votable_id: String,
    pub user_id: String,
}

impl Vote {
    pub fn on_idea(
        id: impl Into<String>,
        idea_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            votable_type: VotableType::Idea,
            votable_id: idea_id.into(),
            user_id: user_id.into(),
        }
    }

    pub fn on_comment(
        id: impl Into<String>,
        comment_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            votable_type: VotableType::Comment,
            votable_id: comment_id.into(),
            user_id: user_id.into(),
        }
    }
}
