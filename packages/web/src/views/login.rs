//! Login page view.

use dioxus::prelude::*;
use ui::use_auth;
use ui::views::LoginForm;

use crate::Route;

/// Login page component.
#[component]
pub fn Login() -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    // Already signed in: go straight to the dashboard.
    use_effect(move || {
        if auth().user.is_some() {
            nav.replace(Route::Dashboard {});
        }
    });

    rsx! {
        LoginForm {
            on_signed_in: move |_| {
                nav.push(Route::Dashboard {});
            },
        }
    }
}
