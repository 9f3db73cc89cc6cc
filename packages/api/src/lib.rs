//! # API crate — identity and session for the portfolio
//!
//! The site's users sign in against the hosted auth service; this crate is the
//! client side of that conversation and the place the rest of the workspace asks
//! "who is signed in, and tell me when that changes".
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | [`SessionProvider`] interface, the [`SessionHub`] observer registry with scoped [`Subscription`]s, and the REST [`AuthClient`] |
//! | [`models`] | [`UserInfo`], the user carried by a session |

pub mod auth;
pub mod models;

pub use auth::{
    AuthClient, AuthError, Session, SessionEvent, SessionHub, SessionProvider, Subscription,
};
pub use models::UserInfo;
