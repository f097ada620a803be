//! Queued side effects.
//!
//! Notifications, geocoding, and moderation run after the primary write,
//! picked up by background workers. Enqueueing is best-effort: a failed
//! enqueue is logged and never rolls the primary write back.

use serde::{Deserialize, Serialize};
use slotbook_shared::types::{ReviewId, UserId, VenueId};

use super::engine::PropagationError;
use super::events::NotificationEvent;

/// A deferred piece of work for a background worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SideEffect {
    /// Deliver a notification to its recipient.
    Notify(NotificationEvent),
    /// Resolve a venue's address to coordinates.
    GeocodeAddress {
        /// The venue whose address changed.
        venue_id: VenueId,
        /// The new address.
        address: String,
    },
    /// Moderate a review's free text.
    ModerateReview {
        /// The review awaiting moderation.
        review_id: ReviewId,
    },
    /// Moderate a newly uploaded profile image.
    ModerateProfileImage {
        /// The user whose image changed.
        user_id: UserId,
    },
}

/// Queue abstraction for side effects.
pub trait Outbox {
    /// Enqueues one side effect.
    ///
    /// # Errors
    ///
    /// Returns [`PropagationError::Storage`] if the queue write fails.
    fn enqueue(&mut self, effect: SideEffect) -> Result<(), PropagationError>;
}

/// In-memory [`Outbox`] implementation.
#[derive(Debug, Default)]
pub struct MemoryOutbox {
    effects: Vec<SideEffect>,
    fail: bool,
}

impl MemoryOutbox {
    /// Creates an empty outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an outbox whose every enqueue fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            effects: Vec::new(),
            fail: true,
        }
    }

    /// Everything enqueued so far, in order.
    #[must_use]
    pub fn effects(&self) -> &[SideEffect] {
        &self.effects
    }

    /// The enqueued notifications, in order.
    #[must_use]
    pub fn notifications(&self) -> Vec<&NotificationEvent> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                SideEffect::Notify(event) => Some(event),
                _ => None,
            })
            .collect()
    }
}

impl Outbox for MemoryOutbox {
    fn enqueue(&mut self, effect: SideEffect) -> Result<(), PropagationError> {
        if self.fail {
            return Err(PropagationError::Storage("outbox unavailable".to_string()));
        }
        self.effects.push(effect);
        Ok(())
    }
}
