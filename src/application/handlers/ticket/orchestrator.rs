//! TicketOrchestrator - drives the lifecycle of a ticket and its thread.
//!
//! Each operation is one sequential unit of work:
//! similarity query, prompt composition, model call, reply parsing and
//! persistence. Nothing is retried; collaborator failures propagate.
//!
//! Persistence order differs between operations:
//!
//! - `create_ticket` writes only after the model answered, so a model
//!   failure leaves no ticket behind
//! - `post_followup` writes the user message before the model call, so the
//!   message survives a model failure

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::errors::TicketError;
use crate::domain::foundation::{TicketId, Timestamp};
use crate::domain::ticket::{
    PromptComposer, PromptLimits, ResponseParser, Severity, SimilarIncident, StructuredReply,
    ThreadView, Ticket, TicketMessage, TicketStatus, TicketSummary,
};
use crate::ports::{ChatMessage, DocumentStore, ModelBackend};

/// Number of summaries returned when the caller gives no limit.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Command to open a new ticket.
#[derive(Debug, Clone)]
pub struct CreateTicketCommand {
    pub subject: String,
    pub description: String,
    pub requester: String,
    pub severity: Severity,
}

/// Command to add a user message to an existing ticket.
#[derive(Debug, Clone)]
pub struct PostFollowupCommand {
    pub ticket_id: TicketId,
    pub message: String,
}

/// Confirmation returned by `close_ticket`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CloseTicketResult {
    pub ticket_id: TicketId,
    pub status: TicketStatus,
}

/// Coordinates the document store and the model backend for ticket threads.
pub struct TicketOrchestrator {
    store: Arc<dyn DocumentStore>,
    model: Arc<dyn ModelBackend>,
    composer: PromptComposer,
    parser: ResponseParser,
}

impl TicketOrchestrator {
    /// Creates an orchestrator with the given collaborators and prompt limits.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        model: Arc<dyn ModelBackend>,
        limits: PromptLimits,
    ) -> Self {
        Self {
            store,
            model,
            composer: PromptComposer::new(limits),
            parser: ResponseParser::new(),
        }
    }

    pub fn limits(&self) -> &PromptLimits {
        self.composer.limits()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Operations
    // ════════════════════════════════════════════════════════════════════════════

    /// Opens a ticket, asks the model for a first answer and persists both turns.
    pub async fn create_ticket(&self, cmd: CreateTicketCommand) -> Result<ThreadView, TicketError> {
        let ticket = Ticket::open(
            TicketId::generate(),
            cmd.subject,
            cmd.description,
            cmd.requester,
            cmd.severity,
            Timestamp::now(),
        );
        let ticket_id = ticket.id().clone();

        info!(
            ticket_id = %ticket_id,
            severity = %ticket.severity(),
            "Creating ticket"
        );

        let similar = self
            .similar_to(ticket.description(), None)
            .await
            .map_err(|e| log_upstream(&ticket_id, "query_similar", e))?;

        let prompt = self.composer.new_ticket(&ticket, &similar);
        let reply = self.ask(&ticket_id, &prompt).await?;

        self.store
            .add_ticket_root(&ticket)
            .await
            .map_err(|e| log_upstream(&ticket_id, "add_ticket_root", e))?;

        let user_turn = TicketMessage::user(ticket.description(), *ticket.created_at());
        self.persist(&ticket_id, &user_turn).await?;

        let agent_turn = TicketMessage::agent(reply.answer.clone(), Timestamp::now());
        self.persist(&ticket_id, &agent_turn).await?;

        info!(ticket_id = %ticket_id, similar = similar.len(), "Ticket created");

        Ok(ThreadView::assemble(
            &ticket,
            reply,
            vec![user_turn, agent_turn],
            similar,
        ))
    }

    /// Up to `limit` ticket summaries, newest first.
    pub async fn list_history(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<TicketSummary>, TicketError> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        let summaries = self.store.list_tickets(limit).await.map_err(|e| {
            error!(error = %e, "Failed to list tickets");
            TicketError::from(e)
        })?;

        debug!(limit, returned = summaries.len(), "Listed ticket history");
        Ok(summaries)
    }

    /// Loads a thread and regenerates the assistant guidance for it.
    ///
    /// The regenerated answer is returned but never appended, so repeated
    /// loads leave the stored thread unchanged.
    pub async fn load_thread(&self, ticket_id: &TicketId) -> Result<ThreadView, TicketError> {
        let (ticket, thread) = self.load(ticket_id).await?;

        let similar = self
            .similar_to(ticket.description(), Some(ticket_id))
            .await
            .map_err(|e| log_upstream(ticket_id, "query_similar", e))?;

        let prompt = self.composer.followup(&ticket, &thread, None, &similar);
        let reply = self.ask(ticket_id, &prompt).await?;

        debug!(
            ticket_id = %ticket_id,
            messages = thread.len(),
            similar = similar.len(),
            "Thread loaded"
        );

        Ok(ThreadView::assemble(&ticket, reply, thread, similar))
    }

    /// Adds a user message, asks the model for the next answer and persists it.
    ///
    /// Closed tickets still accept follow-ups.
    pub async fn post_followup(&self, cmd: PostFollowupCommand) -> Result<ThreadView, TicketError> {
        let ticket_id = cmd.ticket_id;
        let (ticket, mut thread) = self.load(&ticket_id).await?;

        let user_turn = TicketMessage::user(cmd.message, Timestamp::now());
        self.persist(&ticket_id, &user_turn).await?;
        thread.push(user_turn);

        let latest = thread
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        let similar = self
            .similar_to(latest, Some(&ticket_id))
            .await
            .map_err(|e| log_upstream(&ticket_id, "query_similar", e))?;

        let prompt = self
            .composer
            .followup(&ticket, &thread, Some(latest), &similar);
        let reply = self.ask(&ticket_id, &prompt).await?;

        let agent_turn = TicketMessage::agent(reply.answer.clone(), Timestamp::now());
        self.persist(&ticket_id, &agent_turn).await?;
        thread.push(agent_turn);

        info!(
            ticket_id = %ticket_id,
            messages = thread.len(),
            similar = similar.len(),
            "Follow-up answered"
        );

        Ok(ThreadView::assemble(&ticket, reply, thread, similar))
    }

    /// Marks a ticket closed. Closing an already closed ticket succeeds.
    pub async fn close_ticket(
        &self,
        ticket_id: &TicketId,
    ) -> Result<CloseTicketResult, TicketError> {
        self.store.close_ticket(ticket_id).await.map_err(|e| {
            let err = TicketError::from(e);
            if !err.is_not_found() {
                error!(ticket_id = %ticket_id, error = %err, "Failed to close ticket");
            }
            err
        })?;

        info!(ticket_id = %ticket_id, "Ticket closed");

        Ok(CloseTicketResult {
            ticket_id: ticket_id.clone(),
            status: TicketStatus::Closed,
        })
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Helpers
    // ════════════════════════════════════════════════════════════════════════════

    async fn load(
        &self,
        ticket_id: &TicketId,
    ) -> Result<(Ticket, Vec<TicketMessage>), TicketError> {
        let record = self
            .store
            .get_ticket_and_messages(ticket_id)
            .await
            .map_err(|e| log_upstream(ticket_id, "get_ticket_and_messages", e))?;

        match record.ticket {
            Some(ticket) => Ok((ticket, record.messages)),
            None => {
                debug!(ticket_id = %ticket_id, "Ticket not found");
                Err(TicketError::NotFound(ticket_id.clone()))
            }
        }
    }

    /// Similar incidents for `text`, leaving out `exclude` when given.
    ///
    /// Load and follow-up pass the ticket itself as `exclude`, so a ticket is
    /// never listed among its own similar incidents. This differs from a
    /// plain top-k store query, which would usually rank the ticket first.
    /// One extra incident is fetched so `k` results remain after the filter.
    async fn similar_to(
        &self,
        text: &str,
        exclude: Option<&TicketId>,
    ) -> Result<Vec<SimilarIncident>, TicketError> {
        let k = self.composer.limits().similar_incidents;
        let Some(exclude) = exclude else {
            return Ok(self.store.query_similar(text, k).await?);
        };

        let mut similar = self.store.query_similar(text, k + 1).await?;
        similar.retain(|incident| &incident.ticket_id != exclude);
        similar.truncate(k);
        Ok(similar)
    }

    async fn ask(
        &self,
        ticket_id: &TicketId,
        prompt: &[ChatMessage],
    ) -> Result<StructuredReply, TicketError> {
        let raw = self.model.complete(prompt).await.map_err(|e| {
            let provider = self.model.provider_info();
            error!(
                ticket_id = %ticket_id,
                provider = %provider.name,
                model = %provider.model,
                error = %e,
                "Model backend call failed"
            );
            TicketError::from(e)
        })?;

        let (reply, outcome) = self.parser.parse_with_outcome(&raw);
        if outcome.is_degraded() {
            warn!(
                ticket_id = %ticket_id,
                outcome = outcome.as_str(),
                raw_len = raw.len(),
                "Model reply was not fully structured"
            );
        } else {
            debug!(ticket_id = %ticket_id, outcome = outcome.as_str(), "Model reply parsed");
        }

        Ok(reply)
    }

    async fn persist(
        &self,
        ticket_id: &TicketId,
        message: &TicketMessage,
    ) -> Result<(), TicketError> {
        let message_id = self
            .store
            .append_message(ticket_id, message.role, &message.content, message.created_at)
            .await
            .map_err(|e| log_upstream(ticket_id, "append_message", e))?;

        debug!(
            message_id = %message_id.as_str(),
            role = %message.role,
            "Message appended"
        );
        Ok(())
    }
}

fn log_upstream(ticket_id: &TicketId, operation: &str, err: impl Into<TicketError>) -> TicketError {
    let err = err.into();
    if !err.is_not_found() {
        error!(ticket_id = %ticket_id, operation, error = %err, "Document store call failed");
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockModelBackend;
    use crate::adapters::store::InMemoryDocumentStore;
    use crate::domain::ticket::{MessageRole, DEFAULT_ACTION_TITLE, REGENERATE_PLACEHOLDER};
    use crate::ports::{ChatRole, ModelError};

    const VPN_REPLY: &str = r#"Sure! {"answer": "Reset the VPN client.", "suggested_actions": [{"title": "Reset", "steps": ["Quit the client", "Clear the cache"]}], "followup_questions": [{"text": "Which OS are you on?"}]}"#;

    fn orchestrator(
        store: &InMemoryDocumentStore,
        model: &MockModelBackend,
    ) -> TicketOrchestrator {
        TicketOrchestrator::new(
            Arc::new(store.clone()),
            Arc::new(model.clone()),
            PromptLimits::default(),
        )
    }

    fn create_cmd(subject: &str, description: &str) -> CreateTicketCommand {
        CreateTicketCommand {
            subject: subject.to_string(),
            description: description.to_string(),
            requester: "alice@corp.example".to_string(),
            severity: Severity::High,
        }
    }

    fn user_prompt(call: &[ChatMessage]) -> String {
        call.iter()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }

    mod create {
        use super::*;

        #[tokio::test]
        async fn returns_parsed_reply_and_two_message_thread() {
            let store = InMemoryDocumentStore::new();
            let model = MockModelBackend::new().with_reply(VPN_REPLY);
            let orch = orchestrator(&store, &model);

            let view = orch
                .create_ticket(create_cmd("VPN down", "VPN drops every 5 minutes"))
                .await
                .unwrap();

            assert_eq!(view.answer, "Reset the VPN client.");
            assert_eq!(view.suggested_actions[0].title, "Reset");
            assert_eq!(view.suggested_actions[0].steps.len(), 2);
            assert_eq!(view.followup_questions[0].text, "Which OS are you on?");
            assert_eq!(view.status, TicketStatus::Open);
            assert_eq!(view.severity, Severity::High);
            assert_eq!(view.user_upn, "alice@corp.example");

            assert_eq!(view.thread.len(), 2);
            assert_eq!(view.thread[0].role, MessageRole::User);
            assert_eq!(view.thread[0].content, "VPN drops every 5 minutes");
            assert_eq!(view.thread[1].role, MessageRole::Agent);
            assert_eq!(view.thread[1].content, "Reset the VPN client.");
            assert!(view.thread[0].created_at <= view.thread[1].created_at);

            assert_eq!(store.ticket_count().await, 1);
            assert_eq!(store.message_count().await, 2);
        }

        #[tokio::test]
        async fn surfaces_similar_incidents_from_before_the_answer() {
            let store = InMemoryDocumentStore::new();
            let model = MockModelBackend::new();
            let orch = orchestrator(&store, &model);

            let first = orch
                .create_ticket(create_cmd("VPN", "VPN drops every few minutes"))
                .await
                .unwrap();
            let second = orch
                .create_ticket(create_cmd("VPN again", "VPN drops when on wifi"))
                .await
                .unwrap();

            assert!(first.similar_incidents.is_empty());
            assert_eq!(second.similar_incidents.len(), 1);
            assert_eq!(second.similar_incidents[0].ticket_id, first.ticket_id);

            let prompt = user_prompt(&model.last_call().unwrap());
            assert!(prompt.contains("We have some similar past incidents:"));
            assert!(prompt.contains(first.ticket_id.as_str()));
        }

        #[tokio::test]
        async fn model_failure_leaves_no_trace() {
            let store = InMemoryDocumentStore::new();
            let model = MockModelBackend::new().with_error(ModelError::RateLimited);
            let orch = orchestrator(&store, &model);

            let err = orch
                .create_ticket(create_cmd("Printer", "Printer jams"))
                .await
                .unwrap_err();

            assert_eq!(err, TicketError::Model(ModelError::RateLimited));
            assert_eq!(store.ticket_count().await, 0);
            assert_eq!(store.message_count().await, 0);
        }

        #[tokio::test]
        async fn unstructured_reply_becomes_answer() {
            let store = InMemoryDocumentStore::new();
            let model = MockModelBackend::new().with_reply("  Try turning it off and on.  ");
            let orch = orchestrator(&store, &model);

            let view = orch
                .create_ticket(create_cmd("Laptop", "Laptop is slow"))
                .await
                .unwrap();

            assert_eq!(view.answer, "Try turning it off and on.");
            assert!(view.suggested_actions.is_empty());
            assert!(view.followup_questions.is_empty());
            assert_eq!(view.thread[1].content, "Try turning it off and on.");
        }

        #[tokio::test]
        async fn backfills_partial_actions() {
            let store = InMemoryDocumentStore::new();
            let model = MockModelBackend::new()
                .with_reply(r#"{"answer": "ok", "suggested_actions": [{"steps": ["a"]}]}"#);
            let orch = orchestrator(&store, &model);

            let view = orch
                .create_ticket(create_cmd("Mail", "Outlook won't sync"))
                .await
                .unwrap();

            assert_eq!(view.suggested_actions[0].title, DEFAULT_ACTION_TITLE);
            assert!(view.followup_questions.is_empty());
        }
    }

    mod history {
        use super::*;

        #[tokio::test]
        async fn empty_store_yields_empty_list() {
            let store = InMemoryDocumentStore::new();
            let orch = orchestrator(&store, &MockModelBackend::new());

            assert!(orch.list_history(None).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn respects_limit_and_newest_first() {
            let store = InMemoryDocumentStore::new();
            let orch = orchestrator(&store, &MockModelBackend::new());

            let mut ids = Vec::new();
            for n in 0..3 {
                let view = orch
                    .create_ticket(create_cmd(&format!("Issue {n}"), &format!("problem {n}")))
                    .await
                    .unwrap();
                ids.push(view.ticket_id);
            }

            let summaries = orch.list_history(Some(2)).await.unwrap();
            assert_eq!(summaries.len(), 2);
            assert_eq!(summaries[0].ticket_id, ids[2]);
            assert_eq!(summaries[1].ticket_id, ids[1]);
        }
    }

    mod load {
        use super::*;

        #[tokio::test]
        async fn missing_ticket_is_not_found_without_model_call() {
            let store = InMemoryDocumentStore::new();
            let model = MockModelBackend::new();
            let orch = orchestrator(&store, &model);
            let id = TicketId::new("TCK-DEADBEEF").unwrap();

            let err = orch.load_thread(&id).await.unwrap_err();

            assert!(err.is_not_found());
            assert_eq!(model.call_count(), 0);
        }

        #[tokio::test]
        async fn regenerates_answer_without_growing_thread() {
            let store = InMemoryDocumentStore::new();
            let model = MockModelBackend::new();
            let orch = orchestrator(&store, &model);
            let created = orch
                .create_ticket(create_cmd("Wifi", "Wifi keeps dropping"))
                .await
                .unwrap();

            model.push_reply(r#"{"answer": "Still investigating"}"#);
            let first = orch.load_thread(&created.ticket_id).await.unwrap();
            let second = orch.load_thread(&created.ticket_id).await.unwrap();

            assert_eq!(first.answer, "Still investigating");
            assert_eq!(first.thread, created.thread);
            assert_eq!(second.thread, created.thread);
            assert_eq!(store.message_count().await, 2);

            let prompt = user_prompt(&model.last_call().unwrap());
            assert!(prompt.contains(REGENERATE_PLACEHOLDER));
        }

        #[tokio::test]
        async fn excludes_the_ticket_from_its_own_similar_incidents() {
            let store = InMemoryDocumentStore::new();
            let model = MockModelBackend::new();
            let orch = orchestrator(&store, &model);
            let other = orch
                .create_ticket(create_cmd("Wifi", "Wifi keeps dropping"))
                .await
                .unwrap();
            let created = orch
                .create_ticket(create_cmd("Wifi 2", "Wifi keeps dropping at night"))
                .await
                .unwrap();

            let view = orch.load_thread(&created.ticket_id).await.unwrap();

            assert_eq!(view.similar_incidents.len(), 1);
            assert_eq!(view.similar_incidents[0].ticket_id, other.ticket_id);
        }

        #[tokio::test]
        async fn model_failure_propagates() {
            let store = InMemoryDocumentStore::new();
            let model = MockModelBackend::new();
            let orch = orchestrator(&store, &model);
            let created = orch
                .create_ticket(create_cmd("Disk", "Disk almost full"))
                .await
                .unwrap();

            model.push_error(ModelError::unavailable("down"));
            let err = orch.load_thread(&created.ticket_id).await.unwrap_err();

            assert!(matches!(err, TicketError::Model(_)));
            assert_eq!(store.message_count().await, 2);
        }
    }

    mod followup {
        use super::*;

        fn followup(ticket_id: &TicketId, message: &str) -> PostFollowupCommand {
            PostFollowupCommand {
                ticket_id: ticket_id.clone(),
                message: message.to_string(),
            }
        }

        #[tokio::test]
        async fn grows_thread_by_user_and_agent_turn() {
            let store = InMemoryDocumentStore::new();
            let model = MockModelBackend::new();
            let orch = orchestrator(&store, &model);
            let created = orch
                .create_ticket(create_cmd("VPN", "VPN drops"))
                .await
                .unwrap();

            model.push_reply(r#"{"answer": "Update the client"}"#);
            let view = orch
                .post_followup(followup(&created.ticket_id, "Still happening on Windows"))
                .await
                .unwrap();

            assert_eq!(view.thread.len(), 4);
            assert_eq!(view.thread[2].role, MessageRole::User);
            assert_eq!(view.thread[2].content, "Still happening on Windows");
            assert_eq!(view.thread[3].role, MessageRole::Agent);
            assert_eq!(view.thread[3].content, "Update the client");
            assert_eq!(view.answer, "Update the client");
            assert_eq!(store.message_count().await, 4);
        }

        #[tokio::test]
        async fn prompt_carries_history_and_new_message() {
            let store = InMemoryDocumentStore::new();
            let model = MockModelBackend::new();
            let orch = orchestrator(&store, &model);
            let created = orch
                .create_ticket(create_cmd("VPN", "VPN drops"))
                .await
                .unwrap();

            orch.post_followup(followup(&created.ticket_id, "Tried reboot"))
                .await
                .unwrap();

            let prompt = user_prompt(&model.last_call().unwrap());
            assert!(prompt.contains("USER: VPN drops"));
            assert!(prompt.contains("USER: Tried reboot"));
            assert!(prompt.contains("New user message:\nTried reboot"));
        }

        #[tokio::test]
        async fn model_failure_keeps_user_message() {
            let store = InMemoryDocumentStore::new();
            let model = MockModelBackend::new();
            let orch = orchestrator(&store, &model);
            let created = orch
                .create_ticket(create_cmd("VPN", "VPN drops"))
                .await
                .unwrap();

            model.push_error(ModelError::network("connection reset"));
            let err = orch
                .post_followup(followup(&created.ticket_id, "Any update?"))
                .await
                .unwrap_err();

            assert!(matches!(err, TicketError::Model(_)));
            assert_eq!(store.message_count().await, 3);

            let view = orch.load_thread(&created.ticket_id).await.unwrap();
            assert_eq!(view.thread.len(), 3);
            assert_eq!(view.thread[2].content, "Any update?");
        }

        #[tokio::test]
        async fn missing_ticket_is_not_found() {
            let store = InMemoryDocumentStore::new();
            let model = MockModelBackend::new();
            let orch = orchestrator(&store, &model);
            let id = TicketId::new("TCK-00000000").unwrap();

            let err = orch.post_followup(followup(&id, "hello")).await.unwrap_err();

            assert_eq!(err, TicketError::NotFound(id));
            assert_eq!(store.message_count().await, 0);
            assert_eq!(model.call_count(), 0);
        }

        #[tokio::test]
        async fn closed_ticket_still_accepts_followups() {
            let store = InMemoryDocumentStore::new();
            let model = MockModelBackend::new();
            let orch = orchestrator(&store, &model);
            let created = orch
                .create_ticket(create_cmd("VPN", "VPN drops"))
                .await
                .unwrap();
            orch.close_ticket(&created.ticket_id).await.unwrap();

            let view = orch
                .post_followup(followup(&created.ticket_id, "It came back"))
                .await
                .unwrap();

            assert_eq!(view.status, TicketStatus::Closed);
            assert_eq!(view.thread.len(), 4);
        }

        #[tokio::test]
        async fn similarity_uses_new_message() {
            let store = InMemoryDocumentStore::new();
            let model = MockModelBackend::new();
            let orch = orchestrator(&store, &model);
            let printer = orch
                .create_ticket(create_cmd("Printer", "Printer paper jam on floor three"))
                .await
                .unwrap();
            let vpn = orch
                .create_ticket(create_cmd("VPN", "VPN drops"))
                .await
                .unwrap();

            let view = orch
                .post_followup(followup(&vpn.ticket_id, "Also the printer has a paper jam"))
                .await
                .unwrap();

            assert_eq!(view.similar_incidents.len(), 1);
            assert_eq!(view.similar_incidents[0].ticket_id, printer.ticket_id);
        }
    }

    mod close {
        use super::*;

        #[tokio::test]
        async fn closes_and_is_idempotent() {
            let store = InMemoryDocumentStore::new();
            let orch = orchestrator(&store, &MockModelBackend::new());
            let created = orch
                .create_ticket(create_cmd("VPN", "VPN drops"))
                .await
                .unwrap();

            let first = orch.close_ticket(&created.ticket_id).await.unwrap();
            let second = orch.close_ticket(&created.ticket_id).await.unwrap();

            assert_eq!(first.status, TicketStatus::Closed);
            assert_eq!(first, second);

            let view = orch.load_thread(&created.ticket_id).await.unwrap();
            assert_eq!(view.status, TicketStatus::Closed);
        }

        #[tokio::test]
        async fn missing_ticket_is_not_found() {
            let store = InMemoryDocumentStore::new();
            let orch = orchestrator(&store, &MockModelBackend::new());
            let id = TicketId::new("TCK-ABCDEF01").unwrap();

            let err = orch.close_ticket(&id).await.unwrap_err();
            assert_eq!(err, TicketError::NotFound(id));
        }
    }
}
