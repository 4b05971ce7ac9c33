//! # Shared Bus - Event Bus for Loyalty Domain Events
//!
//! Carries the events the cycle engine emits to collaborators that live
//! outside the core (push notifications, analytics, audit).
//!
//! ```text
//! ┌──────────────┐                    ┌────────────────────┐
//! │ Cycle Engine │                    │ Notification svc   │
//! │              │    publish()       │                    │
//! │              │ ──────┐            │                    │
//! └──────────────┘       │            └────────────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! Publishing never blocks on delivery; an event with no subscribers is
//! dropped and logged.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{EventFilter, EventTopic, LoyaltyEvent, RewardEarned};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
