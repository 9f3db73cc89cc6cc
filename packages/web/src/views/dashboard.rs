use dioxus::prelude::*;
use ui::icons::{FaChartSimple, FaFolderOpen, FaNewspaper, FaUser};
use ui::views::{BlogManager, DashboardOverview, ProfileManager, ProjectsManager};
use ui::{use_auth, Icon};

use crate::Route;

/// Dashboard frame. Visitors without a session are sent to the login page.
#[component]
pub fn DashboardLayout() -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    use_effect(move || {
        if auth().user.is_none() {
            tracing::debug!("dashboard requires a session; redirecting to login");
            nav.replace(Route::Login {});
        }
    });

    if auth().user.is_none() {
        return rsx! {};
    }

    rsx! {
        div {
            class: "dashboard",
            aside {
                class: "dashboard-nav",
                Link { to: Route::Dashboard {},
                    Icon { icon: FaChartSimple, width: 14, height: 14 }
                    " Overview"
                }
                Link { to: Route::DashboardProjects {},
                    Icon { icon: FaFolderOpen, width: 14, height: 14 }
                    " Projects"
                }
                Link { to: Route::DashboardPosts {},
                    Icon { icon: FaNewspaper, width: 14, height: 14 }
                    " Blog"
                }
                Link { to: Route::DashboardProfile {},
                    Icon { icon: FaUser, width: 14, height: 14 }
                    " Profile"
                }
            }
            div {
                class: "dashboard-content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
pub fn Dashboard() -> Element {
    rsx! { DashboardOverview {} }
}

#[component]
pub fn DashboardProjects() -> Element {
    rsx! { ProjectsManager {} }
}

#[component]
pub fn DashboardPosts() -> Element {
    rsx! { BlogManager {} }
}

#[component]
pub fn DashboardProfile() -> Element {
    rsx! { ProfileManager {} }
}
