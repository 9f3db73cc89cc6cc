//! # Signed-in user
//!
//! [`UserInfo`] is the subset of the hosted auth service's user object the site
//! needs: the opaque `id` that owns dashboard rows, and the email shown in the
//! navigation bar. Unknown fields in the service's payload are ignored.

use serde::{Deserialize, Serialize};

/// User information carried by a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserInfo {
    /// Get display name, falling back to the id if the account has no email.
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.id)
    }
}
