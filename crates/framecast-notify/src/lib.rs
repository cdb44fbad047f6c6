//! Notification dispatch service
//!
//! Formats and POSTs push messages to a gateway endpoint keyed by an opaque
//! device token. A call succeeds only if the HTTP exchange succeeds *and*
//! the gateway's response carries no per-recipient error entries; rejections
//! are logged and surface as `Ok(false)`, never as a panic or error.
//!
//! At most one attempt per call: no retry, no receipts, no queuing.

pub mod client;
pub mod message;

pub use client::{NotifyError, PushClient};
pub use message::{gateway_accepted, MediaNotificationOptions, PushData, PushMessage};
