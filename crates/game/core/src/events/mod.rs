//! Push-style notifications for gameplay consumers.
//!
//! The authority manager publishes [`GameEvent`]s on an injected [`EventBus`].
//! Hazards, UI and player controllers subscribe by topic.

mod bus;
mod mailbox;
mod types;

pub use bus::{EventBus, Handler, SubscriptionId};
pub use mailbox::EventMailbox;
pub use types::{GameEvent, Topic};
