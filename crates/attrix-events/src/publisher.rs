//! Publication channel for outbound announcements.
//!
//! Transport, delivery and retry live outside this crate; a publisher only
//! accepts the announcement text.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, instrument};

use crate::announcement::OutboundAnnouncement;
use crate::error::EventError;

/// Sink for announcements produced by recomputation.
#[async_trait]
pub trait AnnouncementPublisher: Send + Sync {
    /// Hand one announcement to the channel.
    async fn publish(&self, announcement: &OutboundAnnouncement) -> Result<(), EventError>;
}

/// In-memory publisher for testing.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPublisher {
    published: Arc<RwLock<Vec<OutboundAnnouncement>>>,
}

impl InMemoryPublisher {
    /// Create an empty publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of announcements published so far.
    pub async fn count(&self) -> usize {
        self.published.read().await.len()
    }

    /// Published announcements in publication order.
    pub async fn published(&self) -> Vec<OutboundAnnouncement> {
        self.published.read().await.clone()
    }

    /// Wire texts in publication order.
    pub async fn texts(&self) -> Vec<String> {
        self.published
            .read()
            .await
            .iter()
            .map(|a| a.text.clone())
            .collect()
    }

    /// Clear all announcements (for testing).
    pub async fn clear(&self) {
        self.published.write().await.clear();
    }
}

#[async_trait]
impl AnnouncementPublisher for InMemoryPublisher {
    async fn publish(&self, announcement: &OutboundAnnouncement) -> Result<(), EventError> {
        self.published.write().await.push(announcement.clone());
        Ok(())
    }
}

/// Publisher that forwards announcement text into a bounded tokio channel,
/// e.g. the inbound side of the audit pipeline.
///
/// Never waits for capacity: a full channel is reported as a transient
/// `PublishFailed`, a dropped receiver as `ChannelClosed`.
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    channel: String,
    sender: mpsc::Sender<String>,
}

impl ChannelPublisher {
    /// Wrap a sender under a channel name used in logs and errors.
    pub fn new(channel: impl Into<String>, sender: mpsc::Sender<String>) -> Self {
        Self {
            channel: channel.into(),
            sender,
        }
    }

    /// Create a publisher together with the receiving end of a channel
    /// holding at most `capacity` pending announcements.
    pub fn bounded(
        channel: impl Into<String>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<String>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self::new(channel, sender), receiver)
    }
}

#[async_trait]
impl AnnouncementPublisher for ChannelPublisher {
    #[instrument(skip(self, announcement), fields(channel = %self.channel, principal_id = %announcement.principal_id))]
    async fn publish(&self, announcement: &OutboundAnnouncement) -> Result<(), EventError> {
        self.sender
            .try_send(announcement.text.clone())
            .map_err(|e| match e {
                TrySendError::Full(_) => EventError::PublishFailed {
                    channel: self.channel.clone(),
                    cause: "channel full".to_string(),
                },
                TrySendError::Closed(_) => EventError::ChannelClosed {
                    channel: self.channel.clone(),
                },
            })?;
        debug!(kind = %announcement.kind, "Announcement forwarded");
        Ok(())
    }
}
