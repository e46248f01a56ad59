//! Ticket module - support requests, their threads, and the prompt/parse
//! logic that turns them into model conversations.

mod aggregate;
mod incident;
mod message;
mod parser;
mod prompt;
mod reply;
mod view;

pub use aggregate::{Severity, Ticket, TicketStatus, TicketSummary};
pub use incident::SimilarIncident;
pub use message::{MessageRole, TicketMessage};
pub use parser::{
    backfill_action, backfill_actions, backfill_answer, backfill_questions, object_span,
    step_text, ParseOutcome, ResponseParser,
};
pub use prompt::{PromptComposer, PromptLimits, IT_HELPDESK_SYSTEM_PROMPT, REGENERATE_PLACEHOLDER};
pub use reply::{FollowupQuestion, StructuredReply, SuggestedAction, DEFAULT_ACTION_TITLE};
pub use view::ThreadView;
