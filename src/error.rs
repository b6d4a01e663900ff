//! Error codes — stable, grepable identifiers for every error in the crate.
//!
//! DESIGN
//! ======
//! Each error enum implements [`ErrorCode`] so logs and the terminal surface
//! can report `E_*` codes and a retryable flag without matching on variants.

/// Grepable error code and retry hint for an error type.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Render an error as `[E_CODE] message`, suffixed with `(retryable)` when set.
pub fn describe(err: &(impl ErrorCode + ?Sized)) -> String {
    if err.retryable() {
        format!("[{}] {err} (retryable)", err.error_code())
    } else {
        format!("[{}] {err}", err.error_code())
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
