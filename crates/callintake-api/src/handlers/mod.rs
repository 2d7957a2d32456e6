//! HTTP request handlers for the callintake API.
//!
//! - `webhook` - voice-agent webhook intake
//! - `health` - liveness report
//! - `patients` - dump of the store document
//! - `notifications` - raw notification log
//!
//! Failures are returned as `ApiError`, rendered as a JSON error envelope.

pub mod health;
pub mod notifications;
pub mod patients;
pub mod webhook;

pub use health::health_check;
pub use notifications::list_notifications;
pub use patients::list_patients;
pub use webhook::receive_webhook;
