//! Conversational data entry for capify.
//!
//! Classifies free-form chat messages into transaction fields, accumulates
//! them into per-user drafts, and renders replies. Transport-agnostic: the
//! chat network lives behind whatever adapter drives [`ChatOrchestrator`].

pub mod classifier;
pub mod error;
pub mod orchestrator;
pub mod presenter;
pub mod session;
pub mod types;
pub mod updater;

pub use classifier::FieldClassifier;
pub use error::ChatError;
pub use orchestrator::ChatOrchestrator;
pub use presenter::Presenter;
pub use session::SessionStore;
pub use types::{
    ActionButton, Command, Inbound, InboundKind, ParseMode, Reply, ReplyMarkup,
};
pub use updater::DraftUpdater;
