//! Authentication against the hosted auth service.

mod client;
mod session;

pub use client::AuthClient;
pub use session::{Session, SessionEvent, SessionHub, SessionProvider, Subscription};

use thiserror::Error;

/// Failure of an auth operation.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("auth request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("auth service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("no active session")]
    NoSession,
}
