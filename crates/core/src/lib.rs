//! Core business logic for Slotbook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Double-entry credit ledger with idempotent application
//! - `points` - Loyalty points balance tracking
//! - `questionnaire` - Pre-booking question validation and fee calculation
//! - `discount` - Time-based discount rule evaluation
//! - `pricing` - Booking price composition
//! - `booking` - Booking lifecycle state machine
//! - `propagation` - Change propagation to derived records and notifications

pub mod booking;
pub mod discount;
pub mod ledger;
pub mod points;
pub mod pricing;
pub mod propagation;
pub mod questionnaire;
