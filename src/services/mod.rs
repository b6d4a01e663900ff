//! Domain services behind the chat shell.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the chat turn lifecycle, the offline responder, and
//! the small file-backed stores, so the binary stays focused on terminal
//! plumbing.

pub mod feedback;
pub mod projects;
pub mod responder;
pub mod session;
