//! Prompt domain
//!
//! Templates for each kind of debate turn, and the chat message type
//! handed to model gateways.

mod message;
mod template;

pub use message::{ChatMessage, MessageRole};
pub use template::PromptTemplate;
