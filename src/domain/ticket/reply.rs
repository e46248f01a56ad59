//! Structured model reply - the normalized result of parsing model output.

use serde::{Deserialize, Serialize};

/// Placeholder title for an action that arrived without one.
pub const DEFAULT_ACTION_TITLE: &str = "Action";

/// One recommended troubleshooting action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedAction {
    pub title: String,
    #[serde(default)]
    pub steps: Vec<String>,
}

impl SuggestedAction {
    pub fn new(title: impl Into<String>, steps: Vec<String>) -> Self {
        Self {
            title: title.into(),
            steps,
        }
    }
}

/// One clarifying question for the requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowupQuestion {
    pub text: String,
}

impl FollowupQuestion {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Answer, actions and questions recovered from one model reply.
///
/// Only `answer` is ever persisted (as the agent message).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructuredReply {
    pub answer: String,
    #[serde(default)]
    pub suggested_actions: Vec<SuggestedAction>,
    #[serde(default)]
    pub followup_questions: Vec<FollowupQuestion>,
}

impl StructuredReply {
    /// Reply carrying only free text.
    pub fn unstructured(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            suggested_actions: Vec::new(),
            followup_questions: Vec::new(),
        }
    }
}
