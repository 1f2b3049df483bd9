//! Error types for the attrix-events crate.

use thiserror::Error;

/// Errors that can occur while handing announcements to a publication channel.
#[derive(Debug, Error)]
pub enum EventError {
    /// The channel rejected the announcement.
    #[error("Failed to publish to channel {channel}: {cause}")]
    PublishFailed { channel: String, cause: String },

    /// The receiving side of the channel is gone.
    #[error("Publication channel {channel} is closed")]
    ChannelClosed { channel: String },
}

impl EventError {
    /// Returns true if this error is transient and the publish can be retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, EventError::PublishFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_transient() {
        let transient = EventError::PublishFailed {
            channel: "audit".to_string(),
            cause: "busy".to_string(),
        };
        assert!(transient.is_transient());

        let permanent = EventError::ChannelClosed {
            channel: "audit".to_string(),
        };
        assert!(!permanent.is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = EventError::ChannelClosed {
            channel: "auditer".to_string(),
        };
        assert_eq!(err.to_string(), "Publication channel auditer is closed");

        let err = EventError::PublishFailed {
            channel: "auditer".to_string(),
            cause: "timeout".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to publish to channel auditer: timeout"
        );
    }
}
