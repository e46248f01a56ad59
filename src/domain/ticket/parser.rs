//! Model reply parsing.
//!
//! Model output is expected to be a JSON object with `answer`,
//! `suggested_actions` and `followup_questions`, but nothing guarantees it.
//! [`ResponseParser`] never fails: whatever it cannot recover is backfilled
//! with defaults, and unreadable output becomes a plain-text answer.

use serde_json::{Map, Value};

use super::{FollowupQuestion, StructuredReply, SuggestedAction, DEFAULT_ACTION_TITLE};

/// How much structure survived parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Every field was present with the expected shape.
    FullyStructured,
    /// A JSON object was found but some fields had to be backfilled.
    PartiallyRecovered,
    /// No JSON object could be decoded; the raw text became the answer.
    Unstructured,
}

impl ParseOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseOutcome::FullyStructured => "fully_structured",
            ParseOutcome::PartiallyRecovered => "partially_recovered",
            ParseOutcome::Unstructured => "unstructured",
        }
    }

    /// True for anything short of a fully structured reply.
    pub fn is_degraded(&self) -> bool {
        !matches!(self, ParseOutcome::FullyStructured)
    }
}

/// Turns raw model text into a [`StructuredReply`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses `raw`, discarding the diagnostic outcome.
    pub fn parse(&self, raw: &str) -> StructuredReply {
        self.parse_with_outcome(raw).0
    }

    /// Parses `raw` and reports how much structure was recovered.
    pub fn parse_with_outcome(&self, raw: &str) -> (StructuredReply, ParseOutcome) {
        let candidate = object_span(raw).unwrap_or(raw);

        let object = match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Object(object)) => object,
            _ => {
                return (
                    StructuredReply::unstructured(raw.trim()),
                    ParseOutcome::Unstructured,
                )
            }
        };

        recover(&object, candidate)
    }
}

/// Greedy span from the first `{` to the last `}`.
pub fn object_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

fn recover(object: &Map<String, Value>, candidate: &str) -> (StructuredReply, ParseOutcome) {
    let (answer, answer_ok) = backfill_answer(object.get("answer"), candidate);
    let (suggested_actions, actions_ok) = backfill_actions(object.get("suggested_actions"));
    let (followup_questions, questions_ok) = backfill_questions(object.get("followup_questions"));

    let outcome = if answer_ok && actions_ok && questions_ok {
        ParseOutcome::FullyStructured
    } else {
        ParseOutcome::PartiallyRecovered
    };

    (
        StructuredReply {
            answer,
            suggested_actions,
            followup_questions,
        },
        outcome,
    )
}

/// Answer text, falling back to the matched candidate when absent.
///
/// The flag is `false` whenever the fallback was used.
pub fn backfill_answer(value: Option<&Value>, candidate: &str) -> (String, bool) {
    match value {
        Some(Value::String(answer)) => (answer.trim().to_string(), true),
        Some(value) if value.is_number() || value.is_boolean() => (value.to_string(), false),
        _ => (candidate.trim().to_string(), false),
    }
}

/// Suggested actions; anything but a list yields an empty list.
pub fn backfill_actions(value: Option<&Value>) -> (Vec<SuggestedAction>, bool) {
    let Some(Value::Array(items)) = value else {
        return (Vec::new(), false);
    };

    let mut complete = true;
    let mut actions = Vec::with_capacity(items.len());
    for item in items {
        match backfill_action(item) {
            Some((action, ok)) => {
                complete &= ok;
                actions.push(action);
            }
            None => complete = false,
        }
    }
    (actions, complete)
}

/// One action. A bare string becomes a titled action with no steps.
pub fn backfill_action(value: &Value) -> Option<(SuggestedAction, bool)> {
    match value {
        Value::Object(fields) => {
            let (title, title_ok) = match fields.get("title") {
                Some(Value::String(title)) => (title.clone(), true),
                _ => (DEFAULT_ACTION_TITLE.to_string(), false),
            };
            let (steps, steps_ok) = match fields.get("steps") {
                Some(Value::Array(steps)) => {
                    let rendered: Vec<String> = steps.iter().filter_map(step_text).collect();
                    (rendered, steps.iter().all(Value::is_string))
                }
                _ => (Vec::new(), false),
            };
            Some((SuggestedAction { title, steps }, title_ok && steps_ok))
        }
        Value::String(title) => Some((SuggestedAction::new(title.clone(), Vec::new()), false)),
        _ => None,
    }
}

/// Step text. Scalars are rendered; null, objects and arrays are dropped.
pub fn step_text(value: &Value) -> Option<String> {
    match value {
        Value::String(step) => Some(step.clone()),
        Value::Number(_) | Value::Bool(_) => Some(value.to_string()),
        _ => None,
    }
}

/// Follow-up questions; anything but a list yields an empty list.
pub fn backfill_questions(value: Option<&Value>) -> (Vec<FollowupQuestion>, bool) {
    let Some(Value::Array(items)) = value else {
        return (Vec::new(), false);
    };

    let mut complete = true;
    let mut questions = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Object(fields) => match fields.get("text") {
                Some(Value::String(text)) => questions.push(FollowupQuestion::new(text.clone())),
                _ => {
                    complete = false;
                    questions.push(FollowupQuestion::new(String::new()));
                }
            },
            Value::String(text) => {
                complete = false;
                questions.push(FollowupQuestion::new(text.clone()));
            }
            _ => complete = false,
        }
    }
    (questions, complete)
}
