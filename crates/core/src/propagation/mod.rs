//! Change propagation to derived records and side effects.
//!
//! When a primary record changes, this module fans the change out:
//! denormalized copies on scheduled class instances are patched in the
//! same unit of work (and failures abort the change), while notifications,
//! geocoding, and moderation are queued as best-effort side effects that
//! never roll the primary write back.

pub mod engine;
pub mod entities;
pub mod events;
pub mod outbox;

pub use engine::{InstanceStore, MemoryInstances, PropagationEngine, PropagationError};
pub use entities::{
    ClassInstance, ClassInstanceStatus, ClassTemplate, ModerationStatus, Review, ReviewStatus,
    SubscriptionEvent, UserProfile, Venue, VenueRatingSummary,
};
pub use events::NotificationEvent;
pub use outbox::{MemoryOutbox, Outbox, SideEffect};
