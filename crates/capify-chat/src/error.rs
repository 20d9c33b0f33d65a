//! Error types for the chat engine.

use capify_core::error::CapifyError;
use capify_core::ActionToken;

/// Errors from the chat engine.
///
/// A malformed date or amount is never one of these: such text is simply
/// classified further down the chain.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("not a whole-number amount: {0}")]
    InvalidAmount(String),
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("action not supported yet: {0}")]
    ActionNotSupported(ActionToken),
    #[error("core error: {0}")]
    Core(String),
}

impl From<CapifyError> for ChatError {
    fn from(err: CapifyError) -> Self {
        ChatError::Core(err.to_string())
    }
}
