//! This crate contains all shared UI for the workspace.

pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;

    pub mod brands {
        pub use dioxus_free_icons::icons::fa_brands_icons::*;
    }
}

pub mod views;

mod backend;
pub use backend::{use_backend, Backend};

mod auth;
pub use auth::{use_auth, AuthProvider, AuthState, LogoutButton};

mod navbar;
pub use navbar::Navbar;

mod footer;
pub use footer::SiteFooter;

pub mod notices;
pub use notices::{notify, report, use_notices, Notice, NoticeLevel, NoticeProvider, Notices};

pub mod markdown;
