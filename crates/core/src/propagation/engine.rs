//! Change propagation rules.
//!
//! Two tiers of effects:
//! - Synchronous cascades (denormalized fields on scheduled instances,
//!   review aggregates, credit deposits) run in the same unit of work as
//!   the primary change; their failure aborts the change.
//! - Queued side effects (notifications, geocoding, moderation) are
//!   best-effort; an enqueue failure is logged and the primary change
//!   stands.

use rust_decimal::Decimal;
use slotbook_shared::types::{BookingId, ClassInstanceId, ClassTemplateId, UserId, VenueId};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{info, warn};

use crate::ledger::{
    EntryDraft, LedgerError, LedgerService, LedgerStore, SystemAccount, TransactionDraft,
    TransactionReceipt,
};

use super::entities::{
    ClassInstance, ClassInstanceStatus, ClassTemplate, ModerationStatus, Review, ReviewStatus,
    SubscriptionEvent, UserProfile, Venue,
};
use super::events::NotificationEvent;
use super::outbox::{Outbox, SideEffect};

/// Errors raised by synchronous propagation cascades.
#[derive(Debug, Error)]
pub enum PropagationError {
    /// A derived-record write failed; the primary change must abort.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A credit deposit failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl PropagationError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Ledger(err) => err.error_code(),
        }
    }
}

/// Storage abstraction for class instances.
pub trait InstanceStore {
    /// All scheduled instances at a venue.
    fn scheduled_for_venue(&self, venue_id: VenueId) -> Vec<ClassInstance>;

    /// All scheduled instances of a template.
    fn scheduled_for_template(&self, template_id: ClassTemplateId) -> Vec<ClassInstance>;

    /// Persists an updated instance.
    ///
    /// # Errors
    ///
    /// Returns [`PropagationError::Storage`] if the write fails.
    fn update(&mut self, instance: ClassInstance) -> Result<(), PropagationError>;
}

/// In-memory [`InstanceStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryInstances {
    instances: HashMap<ClassInstanceId, ClassInstance>,
    fail_updates: bool,
}

impl MemoryInstances {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose every update fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            instances: HashMap::new(),
            fail_updates: true,
        }
    }

    /// Adds an instance.
    pub fn insert(&mut self, instance: ClassInstance) {
        self.instances.insert(instance.id, instance);
    }

    /// Looks up an instance.
    #[must_use]
    pub fn get(&self, id: ClassInstanceId) -> Option<&ClassInstance> {
        self.instances.get(&id)
    }
}

impl InstanceStore for MemoryInstances {
    fn scheduled_for_venue(&self, venue_id: VenueId) -> Vec<ClassInstance> {
        self.instances
            .values()
            .filter(|instance| {
                instance.venue_id == venue_id && instance.status == ClassInstanceStatus::Scheduled
            })
            .cloned()
            .collect()
    }

    fn scheduled_for_template(&self, template_id: ClassTemplateId) -> Vec<ClassInstance> {
        self.instances
            .values()
            .filter(|instance| {
                instance.template_id == template_id
                    && instance.status == ClassInstanceStatus::Scheduled
            })
            .cloned()
            .collect()
    }

    fn update(&mut self, instance: ClassInstance) -> Result<(), PropagationError> {
        if self.fail_updates {
            return Err(PropagationError::Storage(
                "instance store unavailable".to_string(),
            ));
        }
        self.instances.insert(instance.id, instance);
        Ok(())
    }
}

/// The idempotency key of a user's one-time welcome bonus.
#[must_use]
pub fn welcome_bonus_key(user_id: UserId) -> String {
    format!("welcome-bonus-{user_id}")
}

fn enqueue_best_effort<O: Outbox>(outbox: &mut O, effect: SideEffect) {
    if let Err(err) = outbox.enqueue(effect) {
        warn!(error = %err, "side effect enqueue failed, continuing");
    }
}

/// Engine fanning primary-record changes out to derived records and
/// side effects.
pub struct PropagationEngine;

impl PropagationEngine {
    /// Propagates a venue edit.
    ///
    /// Name and address changes are copied onto every scheduled instance
    /// at the venue in the same unit of work. An address change also
    /// clears the stale coordinates and queues a re-geocode.
    ///
    /// # Errors
    ///
    /// Returns a [`PropagationError`] if any instance write fails; the
    /// venue edit must abort in that case.
    pub fn venue_changed<I: InstanceStore, O: Outbox>(
        instances: &mut I,
        outbox: &mut O,
        before: &Venue,
        after: &mut Venue,
    ) -> Result<(), PropagationError> {
        let name_changed = before.name != after.name;
        let address_changed = before.address != after.address;
        if !name_changed && !address_changed {
            return Ok(());
        }

        let mut patched = 0usize;
        for mut instance in instances.scheduled_for_venue(after.id) {
            instance.venue_name.clone_from(&after.name);
            instance.venue_address.clone_from(&after.address);
            instances.update(instance)?;
            patched += 1;
        }
        info!(venue_id = %after.id, patched, "venue change propagated");

        if address_changed {
            after.coordinates = None;
            enqueue_best_effort(
                outbox,
                SideEffect::GeocodeAddress {
                    venue_id: after.id,
                    address: after.address.clone(),
                },
            );
        }
        Ok(())
    }

    /// Propagates a template edit to its scheduled instances.
    ///
    /// Existing bookings are untouched: their snapshots and charged
    /// prices were frozen at booking time.
    ///
    /// # Errors
    ///
    /// Returns a [`PropagationError`] if any instance write fails.
    pub fn template_changed<I: InstanceStore>(
        instances: &mut I,
        before: &ClassTemplate,
        after: &ClassTemplate,
    ) -> Result<(), PropagationError> {
        if before.name == after.name && before.base_price == after.base_price {
            return Ok(());
        }

        for mut instance in instances.scheduled_for_template(after.id) {
            instance.class_name.clone_from(&after.name);
            instance.base_price = after.base_price;
            instances.update(instance)?;
        }
        Ok(())
    }

    /// Propagates a profile edit.
    ///
    /// Completing onboarding grants the one-time welcome bonus from the
    /// promotions account; the ledger key makes a re-run replay instead
    /// of double-granting. A changed image resets moderation and queues
    /// a review of the new image.
    ///
    /// # Errors
    ///
    /// Returns a [`PropagationError`] if the bonus deposit fails; the
    /// profile edit must abort in that case.
    pub fn profile_changed<L: LedgerStore, O: Outbox>(
        ledger: &mut L,
        outbox: &mut O,
        before: &UserProfile,
        after: &mut UserProfile,
        welcome_bonus: Decimal,
    ) -> Result<(), PropagationError> {
        let finished_onboarding = !before.onboarding_complete && after.onboarding_complete;
        if finished_onboarding && !after.welcome_bonus_granted && welcome_bonus > Decimal::ZERO {
            let draft = TransactionDraft {
                idempotency_key: welcome_bonus_key(after.id),
                description: format!("Welcome bonus for user {}", after.id),
                entries: vec![
                    EntryDraft::system(SystemAccount::Promotions, -welcome_bonus),
                    EntryDraft::user(after.id, welcome_bonus),
                ],
            };
            LedgerService::apply(ledger, &draft)?;
            after.welcome_bonus_granted = true;
            info!(user_id = %after.id, credits = %welcome_bonus, "welcome bonus granted");

            enqueue_best_effort(
                outbox,
                SideEffect::Notify(NotificationEvent::WelcomeBonusGranted {
                    user_id: after.id,
                    credits: welcome_bonus,
                }),
            );
        }

        if before.image_url != after.image_url && after.image_url.is_some() {
            after.image_moderation = ModerationStatus::Pending;
            enqueue_best_effort(
                outbox,
                SideEffect::ModerateProfileImage { user_id: after.id },
            );
        }
        Ok(())
    }

    /// Notifies bookings affected by an instance moving in time or venue.
    ///
    /// Each affected booking gets exactly one notification, even when
    /// both the time and the venue changed.
    pub fn instance_rescheduled<O: Outbox>(
        outbox: &mut O,
        before: &ClassInstance,
        after: &ClassInstance,
        affected: &[(BookingId, UserId)],
    ) {
        let moved = before.start_time != after.start_time || before.venue_id != after.venue_id;
        if !moved {
            return;
        }
        for (booking_id, consumer_id) in affected {
            enqueue_best_effort(
                outbox,
                SideEffect::Notify(NotificationEvent::BookingRescheduled {
                    booking_id: *booking_id,
                    consumer_id: *consumer_id,
                }),
            );
        }
    }

    /// Routes a newly submitted review.
    ///
    /// Free text goes to moderation and stays pending; a rating-only
    /// review is auto-approved on the spot.
    pub fn review_submitted<O: Outbox>(outbox: &mut O, venue: &mut Venue, review: &mut Review) {
        if review.needs_moderation() {
            enqueue_best_effort(outbox, SideEffect::ModerateReview { review_id: review.id });
        } else {
            Self::approve_review(outbox, venue, review);
        }
    }

    /// Approves a review, folding it into the venue aggregate.
    ///
    /// The pending-to-approved transition guards the aggregate and the
    /// notification: approving an already approved review does nothing.
    pub fn approve_review<O: Outbox>(outbox: &mut O, venue: &mut Venue, review: &mut Review) {
        if review.status == ReviewStatus::Approved {
            return;
        }
        review.status = ReviewStatus::Approved;
        venue.rating.add(review.rating);
        info!(
            review_id = %review.id,
            venue_id = %venue.id,
            rating = review.rating,
            "review approved"
        );
        enqueue_best_effort(
            outbox,
            SideEffect::Notify(NotificationEvent::ReviewApproved {
                review_id: review.id,
                business_id: review.business_id,
            }),
        );
    }

    /// Deposits a subscription renewal's credits.
    ///
    /// Keyed by the subscription event ID, so a redelivered event replays
    /// the original deposit. Renewals that allocate no credits deposit
    /// nothing and notify nobody; `None` is returned.
    ///
    /// # Errors
    ///
    /// Returns a [`PropagationError`] if the deposit fails.
    pub fn subscription_renewed<L: LedgerStore, O: Outbox>(
        ledger: &mut L,
        outbox: &mut O,
        event: &SubscriptionEvent,
    ) -> Result<Option<TransactionReceipt>, PropagationError> {
        if event.credits <= Decimal::ZERO {
            return Ok(None);
        }
        let draft = TransactionDraft {
            idempotency_key: format!("subscription-{}", event.id),
            description: format!("Subscription credits for user {}", event.user_id),
            entries: vec![
                EntryDraft::system(SystemAccount::Platform, -event.credits),
                EntryDraft::user(event.user_id, event.credits),
            ],
        };
        let receipt = LedgerService::apply(ledger, &draft)?;

        enqueue_best_effort(
            outbox,
            SideEffect::Notify(NotificationEvent::CreditsReceived {
                user_id: event.user_id,
                credits: event.credits,
            }),
        );
        Ok(Some(receipt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{LedgerAccount, MemoryLedger};
    use crate::propagation::entities::VenueRatingSummary;
    use crate::propagation::outbox::MemoryOutbox;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;
    use slotbook_shared::types::{BusinessId, ReviewId, SubscriptionEventId};

    fn venue(name: &str, address: &str) -> Venue {
        Venue {
            id: VenueId::new(),
            business_id: BusinessId::new(),
            name: name.to_string(),
            address: address.to_string(),
            coordinates: Some((dec!(52.52), dec!(13.405))),
            rating: VenueRatingSummary::default(),
        }
    }

    fn instance(venue: &Venue, template_id: ClassTemplateId, status: ClassInstanceStatus) -> ClassInstance {
        ClassInstance {
            id: ClassInstanceId::new(),
            template_id,
            venue_id: venue.id,
            status,
            start_time: Utc::now() + Duration::hours(48),
            class_name: "Morning yoga".to_string(),
            base_price: dec!(1000),
            venue_name: venue.name.clone(),
            venue_address: venue.address.clone(),
        }
    }

    fn profile(onboarded: bool) -> UserProfile {
        UserProfile {
            id: UserId::new(),
            display_name: "Sam".to_string(),
            onboarding_complete: onboarded,
            welcome_bonus_granted: false,
            image_url: None,
            image_moderation: ModerationStatus::Pending,
        }
    }

    fn review(text: Option<&str>) -> (Venue, Review) {
        let venue = venue("Studio One", "Main St 1");
        let review = Review {
            id: ReviewId::new(),
            business_id: venue.business_id,
            venue_id: venue.id,
            author_id: UserId::new(),
            rating: 4,
            text: text.map(str::to_string),
            status: ReviewStatus::Pending,
        };
        (venue, review)
    }

    #[test]
    fn test_venue_rename_patches_scheduled_instances_only() {
        let before = venue("Studio One", "Main St 1");
        let mut after = before.clone();
        after.name = "Studio One West".to_string();

        let template = ClassTemplateId::new();
        let mut instances = MemoryInstances::new();
        let scheduled = instance(&before, template, ClassInstanceStatus::Scheduled);
        let completed = instance(&before, template, ClassInstanceStatus::Completed);
        instances.insert(scheduled.clone());
        instances.insert(completed.clone());
        let mut outbox = MemoryOutbox::new();

        PropagationEngine::venue_changed(&mut instances, &mut outbox, &before, &mut after)
            .unwrap();

        assert_eq!(
            instances.get(scheduled.id).unwrap().venue_name,
            "Studio One West"
        );
        // Past instances are frozen.
        assert_eq!(instances.get(completed.id).unwrap().venue_name, "Studio One");
        // A rename alone queues no geocode and keeps coordinates.
        assert!(outbox.effects().is_empty());
        assert!(after.coordinates.is_some());
    }

    #[test]
    fn test_address_change_clears_coordinates_and_queues_geocode() {
        let before = venue("Studio One", "Main St 1");
        let mut after = before.clone();
        after.address = "Side St 9".to_string();
        let mut instances = MemoryInstances::new();
        let mut outbox = MemoryOutbox::new();

        PropagationEngine::venue_changed(&mut instances, &mut outbox, &before, &mut after)
            .unwrap();

        assert!(after.coordinates.is_none());
        assert_eq!(outbox.effects().len(), 1);
        assert!(matches!(
            &outbox.effects()[0],
            SideEffect::GeocodeAddress { address, .. } if address == "Side St 9"
        ));
    }

    #[test]
    fn test_instance_write_failure_aborts_cascade() {
        let before = venue("Studio One", "Main St 1");
        let mut after = before.clone();
        after.name = "Renamed".to_string();

        let mut instances = MemoryInstances::failing();
        instances.insert(instance(
            &before,
            ClassTemplateId::new(),
            ClassInstanceStatus::Scheduled,
        ));
        let mut outbox = MemoryOutbox::new();

        let err =
            PropagationEngine::venue_changed(&mut instances, &mut outbox, &before, &mut after)
                .unwrap_err();
        assert!(matches!(err, PropagationError::Storage(_)));
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_template_change_patches_scheduled_instances() {
        let venue = venue("Studio One", "Main St 1");
        let before = ClassTemplate {
            id: ClassTemplateId::new(),
            business_id: venue.business_id,
            name: "Morning yoga".to_string(),
            base_price: dec!(1000),
            requires_approval: false,
        };
        let mut after = before.clone();
        after.base_price = dec!(1200);

        let mut instances = MemoryInstances::new();
        let scheduled = instance(&venue, before.id, ClassInstanceStatus::Scheduled);
        instances.insert(scheduled.clone());

        PropagationEngine::template_changed(&mut instances, &before, &after).unwrap();
        assert_eq!(instances.get(scheduled.id).unwrap().base_price, dec!(1200));
    }

    #[test]
    fn test_onboarding_completion_grants_welcome_bonus_once() {
        let before = profile(false);
        let mut after = before.clone();
        after.onboarding_complete = true;
        let mut ledger = MemoryLedger::new();
        let mut outbox = MemoryOutbox::new();

        PropagationEngine::profile_changed(
            &mut ledger,
            &mut outbox,
            &before,
            &mut after,
            dec!(500),
        )
        .unwrap();

        assert!(after.welcome_bonus_granted);
        assert_eq!(ledger.balance(&LedgerAccount::User(after.id)), dec!(500));
        assert_eq!(
            ledger.balance(&LedgerAccount::System(SystemAccount::Promotions)),
            dec!(-500)
        );
        assert_eq!(outbox.notifications().len(), 1);

        // A later profile edit never grants again.
        let before = after.clone();
        let mut again = after.clone();
        again.display_name = "Sam R".to_string();
        PropagationEngine::profile_changed(
            &mut ledger,
            &mut outbox,
            &before,
            &mut again,
            dec!(500),
        )
        .unwrap();
        assert_eq!(ledger.balance(&LedgerAccount::User(after.id)), dec!(500));
        assert_eq!(outbox.notifications().len(), 1);
    }

    #[test]
    fn test_image_change_resets_moderation_despite_outbox_failure() {
        let mut before = profile(true);
        before.welcome_bonus_granted = true;
        before.image_moderation = ModerationStatus::Approved;
        let mut after = before.clone();
        after.image_url = Some("https://cdn.example/avatar.png".to_string());
        let mut ledger = MemoryLedger::new();
        let mut outbox = MemoryOutbox::failing();

        // The enqueue failure is logged, not surfaced.
        PropagationEngine::profile_changed(
            &mut ledger,
            &mut outbox,
            &before,
            &mut after,
            dec!(500),
        )
        .unwrap();
        assert_eq!(after.image_moderation, ModerationStatus::Pending);
    }

    #[test]
    fn test_reschedule_notifies_each_booking_once() {
        let venue_a = venue("Studio One", "Main St 1");
        let template = ClassTemplateId::new();
        let before = instance(&venue_a, template, ClassInstanceStatus::Scheduled);
        let mut after = before.clone();
        // Both the time and the venue change.
        after.start_time = before.start_time + Duration::hours(3);
        after.venue_id = VenueId::new();

        let affected = vec![
            (BookingId::new(), UserId::new()),
            (BookingId::new(), UserId::new()),
        ];
        let mut outbox = MemoryOutbox::new();
        PropagationEngine::instance_rescheduled(&mut outbox, &before, &after, &affected);

        let notifications = outbox.notifications();
        assert_eq!(notifications.len(), 2);
        assert!(notifications
            .iter()
            .all(|event| matches!(event, NotificationEvent::BookingRescheduled { .. })));
    }

    #[test]
    fn test_unmoved_instance_notifies_nobody() {
        let venue_a = venue("Studio One", "Main St 1");
        let before = instance(&venue_a, ClassTemplateId::new(), ClassInstanceStatus::Scheduled);
        let mut after = before.clone();
        after.class_name = "Evening yoga".to_string();

        let affected = vec![(BookingId::new(), UserId::new())];
        let mut outbox = MemoryOutbox::new();
        PropagationEngine::instance_rescheduled(&mut outbox, &before, &after, &affected);
        assert!(outbox.effects().is_empty());
    }

    #[test]
    fn test_free_text_review_goes_to_moderation() {
        let (mut venue, mut review) = review(Some("great class"));
        let mut outbox = MemoryOutbox::new();

        PropagationEngine::review_submitted(&mut outbox, &mut venue, &mut review);

        assert_eq!(review.status, ReviewStatus::Pending);
        assert_eq!(venue.rating.count, 0);
        assert_eq!(outbox.effects().len(), 1);
        assert!(matches!(
            outbox.effects()[0],
            SideEffect::ModerateReview { .. }
        ));
    }

    #[test]
    fn test_rating_only_review_auto_approves() {
        let (mut venue, mut review) = review(None);
        let mut outbox = MemoryOutbox::new();

        PropagationEngine::review_submitted(&mut outbox, &mut venue, &mut review);

        assert_eq!(review.status, ReviewStatus::Approved);
        assert_eq!(venue.rating.count, 1);
        assert_eq!(venue.rating.average(), Some(dec!(4)));
        assert_eq!(outbox.notifications().len(), 1);
        assert!(matches!(
            outbox.notifications()[0],
            NotificationEvent::ReviewApproved { .. }
        ));
    }

    #[test]
    fn test_double_approval_counts_once() {
        let (mut venue, mut review) = review(Some("lovely"));
        let mut outbox = MemoryOutbox::new();

        PropagationEngine::approve_review(&mut outbox, &mut venue, &mut review);
        PropagationEngine::approve_review(&mut outbox, &mut venue, &mut review);

        assert_eq!(venue.rating.count, 1);
        assert_eq!(outbox.notifications().len(), 1);
    }

    #[test]
    fn test_subscription_deposit_is_idempotent() {
        let event = SubscriptionEvent {
            id: SubscriptionEventId::new(),
            user_id: UserId::new(),
            credits: dec!(2000),
        };
        let mut ledger = MemoryLedger::new();
        let mut outbox = MemoryOutbox::new();

        let first = PropagationEngine::subscription_renewed(&mut ledger, &mut outbox, &event)
            .unwrap()
            .unwrap();
        let second = PropagationEngine::subscription_renewed(&mut ledger, &mut outbox, &event)
            .unwrap()
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(
            ledger.balance(&LedgerAccount::User(event.user_id)),
            dec!(2000)
        );
    }

    #[test]
    fn test_zero_credit_renewal_deposits_nothing() {
        let event = SubscriptionEvent {
            id: SubscriptionEventId::new(),
            user_id: UserId::new(),
            credits: dec!(0),
        };
        let mut ledger = MemoryLedger::new();
        let mut outbox = MemoryOutbox::new();

        let receipt =
            PropagationEngine::subscription_renewed(&mut ledger, &mut outbox, &event).unwrap();

        assert!(receipt.is_none());
        assert!(outbox.effects().is_empty());
        assert_eq!(
            ledger.balance(&LedgerAccount::User(event.user_id)),
            dec!(0)
        );
        assert_eq!(
            ledger.balance(&LedgerAccount::System(SystemAccount::Platform)),
            dec!(0)
        );
    }
}
