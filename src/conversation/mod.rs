//! Support conversation engine.
//!
//! The dispatcher turns an [`InboundEvent`] into a list of [`Effect`]s,
//! committing every store mutation before the effects are returned. Delivering
//! the effects is the transport's job.

mod dispatcher;
pub mod effect;
pub mod event;
mod machine;
pub mod state;
pub mod texts;

pub use dispatcher::ConversationEngine;
pub use effect::{Button, Effect, Keyboard, OutboundMessage, TextFormat};
pub use event::{Action, InboundEvent, Input, MenuItem, Sender};
pub use state::FlowState;
