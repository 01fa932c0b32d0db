//! Shared types for SaaS Pulse.
//!
//! Holds the four dataset record types, the error type, calendar and
//! date-range helpers, number formatting and the command-line settings.

pub mod date_range;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use date_range::DateRange;
pub use error::{PulseError, Result};
pub use models::{Event, EventType, RevenueRecord, Subscription, Tables, User};
