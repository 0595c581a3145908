//! Keyword chat responder
//!
//! Classifies a message into an [`Intent`] and answers it from the
//! [`BusinessKnowledge`](crate::storage::BusinessKnowledge) loaded from the
//! last run's stored rows.

mod intent;
mod responder;

pub use intent::{classify, Intent};
pub use responder::{ChatBot, DEFAULT_REPLY, GREETING_REPLY};
