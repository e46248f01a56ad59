//! File-based Document Store Adapter
//!
//! Keeps every ticket and message in one YAML snapshot
//! (`<data_dir>/tickets.yaml`). The snapshot is rewritten through a temp
//! file and rename after each mutation, while the write lock is held.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;

use super::collection::TicketCollection;
use crate::domain::foundation::{MessageId, TicketId, Timestamp};
use crate::domain::ticket::{MessageRole, SimilarIncident, Ticket, TicketSummary};
use crate::ports::{DocumentStore, StoreError, TicketRecord};

const SNAPSHOT_FILE: &str = "tickets.yaml";
const SNAPSHOT_TMP_FILE: &str = "tickets.yaml.tmp";

/// YAML-snapshot document store
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    data_dir: PathBuf,
    collection: Arc<RwLock<TicketCollection>>,
}

impl FileDocumentStore {
    /// Open (or create) the store rooted at `data_dir`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileDocumentStore::open("./ticket_store").await?;
    /// ```
    pub async fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir).await?;

        let snapshot = data_dir.join(SNAPSHOT_FILE);
        let collection = if fs::try_exists(&snapshot).await? {
            let yaml = fs::read_to_string(&snapshot).await?;
            if yaml.trim().is_empty() {
                TicketCollection::new()
            } else {
                serde_yaml::from_str(&yaml)?
            }
        } else {
            TicketCollection::new()
        };

        tracing::debug!(
            path = %snapshot.display(),
            tickets = collection.ticket_count(),
            "opened ticket store"
        );

        Ok(Self {
            data_dir,
            collection: Arc::new(RwLock::new(collection)),
        })
    }

    /// Path of the YAML snapshot
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }

    async fn persist(&self, collection: &TicketCollection) -> Result<(), StoreError> {
        let yaml = serde_yaml::to_string(collection)?;
        let tmp = self.data_dir.join(SNAPSHOT_TMP_FILE);
        fs::write(&tmp, yaml).await?;
        fs::rename(&tmp, self.snapshot_path()).await?;
        Ok(())
    }

    /// Applies `change` to a copy, writes it, then swaps it in.
    ///
    /// A failed write leaves both disk and memory untouched.
    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut TicketCollection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.collection.write().await;
        let mut next = guard.clone();
        let value = change(&mut next)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(value)
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn add_ticket_root(&self, ticket: &Ticket) -> Result<(), StoreError> {
        self.mutate(|c| c.add_root(ticket)).await
    }

    async fn append_message(
        &self,
        ticket_id: &TicketId,
        role: MessageRole,
        content: &str,
        created_at: Timestamp,
    ) -> Result<MessageId, StoreError> {
        self.mutate(|c| c.append(ticket_id, role, content, created_at))
            .await
    }

    async fn query_similar(
        &self,
        text: &str,
        k: usize,
    ) -> Result<Vec<SimilarIncident>, StoreError> {
        Ok(self.collection.read().await.similar(text, k))
    }

    async fn list_tickets(&self, limit: usize) -> Result<Vec<TicketSummary>, StoreError> {
        Ok(self.collection.read().await.summaries(limit))
    }

    async fn get_ticket_and_messages(
        &self,
        ticket_id: &TicketId,
    ) -> Result<TicketRecord, StoreError> {
        Ok(self.collection.read().await.record(ticket_id))
    }

    async fn close_ticket(&self, ticket_id: &TicketId) -> Result<(), StoreError> {
        self.mutate(|c| c.close(ticket_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ticket::{Severity, TicketStatus};
    use tempfile::TempDir;

    fn ticket(id: &str) -> Ticket {
        Ticket::open(
            TicketId::new(id).unwrap(),
            "Shared drive missing",
            "Mapped drive S: disappeared after update",
            "carol@example.com",
            Severity::Critical,
            Timestamp::parse("2024-06-01T12:00:00Z").unwrap(),
        )
    }

    #[tokio::test]
    async fn open_creates_directory_and_starts_empty() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("store");

        let store = FileDocumentStore::open(&dir).await.unwrap();

        assert!(dir.exists());
        assert!(store.list_tickets(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let root = ticket("TCK-00000001");
        {
            let store = FileDocumentStore::open(temp.path()).await.unwrap();
            store.add_ticket_root(&root).await.unwrap();
            store
                .append_message(
                    root.id(),
                    MessageRole::User,
                    "Mapped drive S: disappeared after update",
                    Timestamp::parse("2024-06-01T12:00:00Z").unwrap(),
                )
                .await
                .unwrap();
            store.close_ticket(root.id()).await.unwrap();
        }

        let reopened = FileDocumentStore::open(temp.path()).await.unwrap();
        let record = reopened.get_ticket_and_messages(root.id()).await.unwrap();

        let stored = record.ticket.unwrap();
        assert_eq!(stored.status(), TicketStatus::Closed);
        assert_eq!(stored.requester(), "carol@example.com");
        assert_eq!(record.messages.len(), 1);
        assert_eq!(
            record.messages[0].created_at.to_iso_string(),
            "2024-06-01T12:00:00Z"
        );
    }

    #[tokio::test]
    async fn snapshot_is_written_without_temp_leftovers() {
        let temp = TempDir::new().unwrap();
        let store = FileDocumentStore::open(temp.path()).await.unwrap();
        store.add_ticket_root(&ticket("TCK-00000001")).await.unwrap();

        assert!(store.snapshot_path().exists());
        assert!(!temp.path().join(SNAPSHOT_TMP_FILE).exists());
    }

    #[tokio::test]
    async fn failed_mutation_leaves_snapshot_unchanged() {
        let temp = TempDir::new().unwrap();
        let store = FileDocumentStore::open(temp.path()).await.unwrap();
        store.add_ticket_root(&ticket("TCK-00000001")).await.unwrap();
        let before = std::fs::read_to_string(store.snapshot_path()).unwrap();

        let result = store.add_ticket_root(&ticket("TCK-00000001")).await;

        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert_eq!(std::fs::read_to_string(store.snapshot_path()).unwrap(), before);
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_a_serialization_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(SNAPSHOT_FILE), "tickets: [ {").unwrap();

        let result = FileDocumentStore::open(temp.path()).await;

        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }
}
