//! AIOVerse — portfolio chat shell core.
//!
//! A streaming chat session against a remote model, with an offline keyword
//! responder that answers whenever the remote path is unavailable.

pub mod error;
pub mod llm;
pub mod persona;
pub mod services;
pub mod state;
