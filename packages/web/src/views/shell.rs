use dioxus::prelude::*;
use ui::{use_auth, LogoutButton, Navbar, SiteFooter};

use crate::Route;

/// Site chrome around every page.
#[component]
pub fn Shell() -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let signed_in = auth().user.is_some();

    rsx! {
        Navbar {
            Link { to: Route::Home {}, "Home" }
            Link { to: Route::Projects {}, "Projects" }
            Link { to: Route::Skills {}, "Skills" }
            Link { to: Route::Blog {}, "Blog" }
            span { class: "spacer" }
            if signed_in {
                Link { to: Route::Dashboard {}, "Dashboard" }
                LogoutButton {
                    class: "btn btn-secondary",
                    on_signed_out: move |_| {
                        nav.push(Route::Home {});
                    },
                }
            } else {
                Link { to: Route::Login {}, "Sign in" }
            }
        }
        main {
            class: "page",
            Outlet::<Route> {}
        }
        SiteFooter {
            Link { to: Route::Projects {}, "Projects" }
            Link { to: Route::Skills {}, "Skills" }
            Link { to: Route::Blog {}, "Blog" }
        }
    }
}
