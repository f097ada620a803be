//! Primary records whose changes the propagation engine fans out.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use slotbook_shared::types::{
    BusinessId, ClassInstanceId, ClassTemplateId, ReviewId, SubscriptionEventId, UserId, VenueId,
};

/// Running aggregate of approved review ratings for a venue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueRatingSummary {
    /// Number of approved reviews.
    pub count: u32,
    /// Sum of their ratings.
    pub sum: u32,
}

impl VenueRatingSummary {
    /// Folds one approved rating into the aggregate.
    pub fn add(&mut self, rating: u8) {
        self.count += 1;
        self.sum += u32::from(rating);
    }

    /// The average rating, `None` until a review is approved.
    #[must_use]
    pub fn average(&self) -> Option<Decimal> {
        if self.count == 0 {
            None
        } else {
            Some(Decimal::from(self.sum) / Decimal::from(self.count))
        }
    }
}

/// A physical location classes run at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    /// The venue ID.
    pub id: VenueId,
    /// The owning business.
    pub business_id: BusinessId,
    /// Display name, denormalized onto scheduled instances.
    pub name: String,
    /// Street address, denormalized onto scheduled instances.
    pub address: String,
    /// Geocoded coordinates, cleared when the address changes.
    pub coordinates: Option<(Decimal, Decimal)>,
    /// Approved-review rating aggregate.
    pub rating: VenueRatingSummary,
}

/// A reusable class definition owned by a business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassTemplate {
    /// The template ID.
    pub id: ClassTemplateId,
    /// The owning business.
    pub business_id: BusinessId,
    /// Display name, denormalized onto scheduled instances.
    pub name: String,
    /// Base price in minor units, denormalized onto scheduled instances.
    pub base_price: Decimal,
    /// Whether bookings start in awaiting approval.
    pub requires_approval: bool,
}

/// Scheduling state of a class instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassInstanceStatus {
    /// Upcoming; receives denormalized updates.
    Scheduled,
    /// Called off; frozen.
    Cancelled,
    /// Already ran; frozen.
    Completed,
}

/// One occurrence of a class template at a venue.
///
/// Carries denormalized template and venue fields so listings render
/// without joins; only `Scheduled` instances are kept in sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassInstance {
    /// The instance ID.
    pub id: ClassInstanceId,
    /// The template this instance was created from.
    pub template_id: ClassTemplateId,
    /// Where it runs.
    pub venue_id: VenueId,
    /// Scheduling state.
    pub status: ClassInstanceStatus,
    /// When it starts.
    pub start_time: DateTime<Utc>,
    /// Denormalized template name.
    pub class_name: String,
    /// Denormalized template base price.
    pub base_price: Decimal,
    /// Denormalized venue name.
    pub venue_name: String,
    /// Denormalized venue address.
    pub venue_address: String,
}

/// Moderation state of user-submitted content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    /// Awaiting review.
    Pending,
    /// Cleared for display.
    Approved,
    /// Not displayable.
    Rejected,
}

/// A consumer profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user ID.
    pub id: UserId,
    /// Display name.
    pub display_name: String,
    /// True once the user finished onboarding.
    pub onboarding_complete: bool,
    /// True once the one-time welcome bonus was granted.
    pub welcome_bonus_granted: bool,
    /// Profile image, if uploaded.
    pub image_url: Option<String>,
    /// Moderation state of the current image.
    pub image_moderation: ModerationStatus,
}

/// Review visibility state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Awaiting moderation.
    Pending,
    /// Public; counted in the venue aggregate.
    Approved,
    /// Hidden.
    Rejected,
}

/// A consumer review of a venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// The review ID.
    pub id: ReviewId,
    /// The business being reviewed.
    pub business_id: BusinessId,
    /// The venue being reviewed.
    pub venue_id: VenueId,
    /// The reviewing consumer.
    pub author_id: UserId,
    /// Star rating, 1..=5.
    pub rating: u8,
    /// Free-text body; its presence requires moderation.
    pub text: Option<String>,
    /// Visibility state.
    pub status: ReviewStatus,
}

impl Review {
    /// True when the review carries free text that needs moderation.
    #[must_use]
    pub fn needs_moderation(&self) -> bool {
        self.text
            .as_deref()
            .is_some_and(|text| !text.trim().is_empty())
    }
}

/// A subscription renewal that deposits credits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionEvent {
    /// The event ID, used as the deposit's idempotency key.
    pub id: SubscriptionEventId,
    /// The subscriber.
    pub user_id: UserId,
    /// Credits to deposit, in minor units.
    pub credits: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rating_summary_average() {
        let mut summary = VenueRatingSummary::default();
        assert_eq!(summary.average(), None);

        summary.add(5);
        summary.add(4);
        assert_eq!(summary.average(), Some(dec!(4.5)));
    }

    #[test]
    fn test_review_needs_moderation_only_with_text() {
        let mut review = Review {
            id: ReviewId::new(),
            business_id: BusinessId::new(),
            venue_id: VenueId::new(),
            author_id: UserId::new(),
            rating: 5,
            text: None,
            status: ReviewStatus::Pending,
        };
        assert!(!review.needs_moderation());

        review.text = Some("   ".to_string());
        assert!(!review.needs_moderation());

        review.text = Some("great class".to_string());
        assert!(review.needs_moderation());
    }
}
