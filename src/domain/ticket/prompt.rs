//! Prompt composition for the helpdesk assistant.
//!
//! Builds the exact message list sent to the model backend for a new ticket
//! and for a follow-up (or a regenerate-without-new-input request). History
//! and similar incidents are windowed by [`PromptLimits`] to bound prompt size.

use serde::{Deserialize, Serialize};

use super::{SimilarIncident, Ticket, TicketMessage};
use crate::ports::ChatMessage;

/// Persona, output contract and behavioral rules for the assistant.
pub const IT_HELPDESK_SYSTEM_PROMPT: &str = r#"You are an expert IT support engineer in a corporate environment
(Microsoft 365, Azure AD, Teams, Exchange Online, Windows, network & printers).

You MUST always:
- Ask a few clarifying questions WHEN NEEDED, but still propose concrete next steps.
- Give step-by-step instructions that a Level 1 helpdesk engineer can follow.
- For M365/Teams/Exchange/Intune, prefer using the latest Microsoft admin centers
  (Entra admin center, Teams admin center, M365 admin center, Intune).
- If a scenario is ambiguous, give branching instructions:
  "If A, do X. If B, do Y."

You MUST reply in this STRICT JSON format (no extra keys, no commentary):

{
  "answer": "Short overview answer in 2–4 sentences. Mention key tools/portals.",
  "suggested_actions": [
    {
      "title": "Action title",
      "steps": [
        "Step 1...",
        "Step 2...",
        "Step 3..."
      ]
    }
  ],
  "followup_questions": [
    { "text": "Clarifying question 1?" },
    { "text": "Clarifying question 2?" }
  ]
}

Rules:
- Do NOT include any date text like "Invalid Date".
- Do NOT wrap the JSON in backticks.
- Do NOT include any other top-level fields."#;

/// Stand-in for the new message when a thread is regenerated without input.
pub const REGENERATE_PLACEHOLDER: &str =
    "(No new message – just summarize current state and propose next actions.)";

const RESPONSE_FORMAT_REMINDER: &str = "Please respond in the STRICT JSON format described earlier.";
const NEW_TICKET_SIMILAR_HEADER: &str = "We have some similar past incidents:\n";
const FOLLOWUP_SIMILAR_HEADER: &str = "Similar incidents in the knowledge base:\n";
const EMPTY_HISTORY: &str = "None yet.";

/// Window sizes applied while composing prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptLimits {
    /// Most recent thread messages included in a follow-up prompt.
    pub history_window: usize,
    /// Similar incidents requested and rendered.
    pub similar_incidents: usize,
    /// Characters of each incident description shown.
    pub incident_preview_chars: usize,
}

impl Default for PromptLimits {
    fn default() -> Self {
        Self {
            history_window: 6,
            similar_incidents: 5,
            incident_preview_chars: 220,
        }
    }
}

/// Deterministic builder for model conversations.
#[derive(Debug, Clone, Default)]
pub struct PromptComposer {
    limits: PromptLimits,
}

impl PromptComposer {
    pub fn new(limits: PromptLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &PromptLimits {
        &self.limits
    }

    /// System instruction plus one user turn describing a fresh ticket.
    pub fn new_ticket(&self, ticket: &Ticket, similar: &[SimilarIncident]) -> Vec<ChatMessage> {
        let similar_block = self.render_similar(NEW_TICKET_SIMILAR_HEADER, similar);

        let content = format!(
            "New support ticket:\n\n\
             Subject: {subject}\n\
             Description: {description}\n\
             User: {requester}\n\
             Severity: {severity}\n\n\
             {similar_block}\n\n\
             {RESPONSE_FORMAT_REMINDER}",
            subject = ticket.subject(),
            description = ticket.description(),
            requester = ticket.requester(),
            severity = ticket.severity(),
        );

        vec![
            ChatMessage::system(IT_HELPDESK_SYSTEM_PROMPT),
            ChatMessage::user(content.trim()),
        ]
    }

    /// System instruction plus one user turn continuing an existing thread.
    ///
    /// `history` is the full thread; only the last `history_window` messages
    /// are rendered. `new_message` of `None` means "regenerate", which uses
    /// [`REGENERATE_PLACEHOLDER`].
    pub fn followup(
        &self,
        ticket: &Ticket,
        history: &[TicketMessage],
        new_message: Option<&str>,
        similar: &[SimilarIncident],
    ) -> Vec<ChatMessage> {
        let history_block = self.render_history(history);
        let similar_block = self.render_similar(FOLLOWUP_SIMILAR_HEADER, similar);

        let content = format!(
            "Follow-up on an existing ticket.\n\n\
             Ticket subject: {subject}\n\
             Initial description: {description}\n\n\
             Recent conversation:\n\
             {history_block}\n\n\
             New user message:\n\
             {new_message}\n\n\
             {similar_block}\n\n\
             {RESPONSE_FORMAT_REMINDER}",
            subject = ticket.subject(),
            description = ticket.description(),
            new_message = new_message.unwrap_or(REGENERATE_PLACEHOLDER),
        );

        vec![
            ChatMessage::system(IT_HELPDESK_SYSTEM_PROMPT),
            ChatMessage::user(content.trim()),
        ]
    }

    fn render_history(&self, history: &[TicketMessage]) -> String {
        let start = history.len().saturating_sub(self.limits.history_window);
        let lines: Vec<String> = history[start..]
            .iter()
            .map(TicketMessage::transcript_line)
            .collect();

        if lines.is_empty() {
            EMPTY_HISTORY.to_string()
        } else {
            lines.join("\n")
        }
    }

    fn render_similar(&self, header: &str, similar: &[SimilarIncident]) -> String {
        if similar.is_empty() {
            return String::new();
        }

        let mut lines = vec![header.to_string()];
        for incident in similar.iter().take(self.limits.similar_incidents) {
            lines.push(format!(
                "- Ticket {} | Subject: {}",
                incident.ticket_id, incident.subject
            ));
            if !incident.description.is_empty() {
                lines.push(format!(
                    "  Summary: {}...",
                    incident.preview(self.limits.incident_preview_chars)
                ));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}
