//! Data layer for SaaS Pulse.
//!
//! Loads the users, subscriptions, events and revenue JSONL files, applies
//! the dashboard filters and computes the product metrics behind each
//! dashboard page.

pub mod analysis;
pub mod analytics;
pub mod cohorts;
pub mod feature_usage;
pub mod filter;
pub mod reader;
pub mod revenue;

pub use pulse_core as core;
