//! Conversation command handlers.

mod handle_message;

pub use handle_message::{
    HandleMessageCommand, HandleMessageConfig, HandleMessageHandler, HandleMessageResult,
};
