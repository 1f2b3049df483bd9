//! # attrix-events
//!
//! Audit message grammar and announcement publishing for attrix.
//!
//! ## Features
//!
//! - **Wire grammar**: bracketed bean serialization and parsing, and the
//!   `set for` / `removed for` / `All attributes removed for` message shapes
//! - **Announcements**: typed outbound messages for derived attribute changes
//! - **Publishing**: pluggable [`AnnouncementPublisher`] with in-memory and
//!   tokio-channel implementations
//!
//! ## Example
//!
//! ```rust,ignore
//! use attrix_events::{AnnouncementPublisher, InMemoryPublisher, OutboundAnnouncement};
//!
//! let publisher = InMemoryPublisher::new();
//! let announcement = OutboundAnnouncement::set(&attribute, &principal);
//! publisher.publish(&announcement).await?;
//! ```

pub mod announcement;
pub mod error;
pub mod publisher;
pub mod wire;

pub use announcement::{AnnouncementKind, OutboundAnnouncement};
pub use error::EventError;
pub use publisher::{AnnouncementPublisher, ChannelPublisher, InMemoryPublisher};
pub use wire::{parse_beans, EntityKind, WireBean, WireEntity};
