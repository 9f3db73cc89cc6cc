use dioxus::prelude::*;
use store::catalog::dashboard_stats;
use store::DashboardStats;

use crate::auth::use_auth;
use crate::backend::use_backend;
use crate::notices::{report, use_notices};

/// Counters for the signed-in owner's content.
#[component]
pub fn DashboardOverview() -> Element {
    let backend = use_backend();
    let auth = use_auth();
    let mut notices = use_notices();
    let mut stats = use_signal(DashboardStats::default);

    let _loader = use_resource(move || async move {
        let Some(owner) = auth().user_id() else {
            return;
        };
        let store = backend().fresh_store().await;
        let result = dashboard_stats(&store, &owner).await;
        if let Some(loaded) = report(&mut notices, result, "Loading dashboard", "") {
            stats.set(loaded);
        }
    });

    let greeting = auth()
        .user
        .map(|u| u.display_name().to_string())
        .unwrap_or_default();
    let DashboardStats {
        projects,
        posts,
        published_posts,
    } = stats();
    let drafts = posts - published_posts;

    rsx! {
        div {
            class: "dashboard-overview",
            h2 { class: "page-title", "Welcome back, {greeting}" }
            div {
                class: "stat-grid",
                StatCard { label: "Projects", value: projects }
                StatCard { label: "Posts", value: posts }
                StatCard { label: "Published", value: published_posts }
                StatCard { label: "Drafts", value: drafts }
            }
        }
    }
}

#[component]
fn StatCard(label: &'static str, value: usize) -> Element {
    rsx! {
        div {
            class: "stat-card",
            span { class: "stat-value", "{value}" }
            span { class: "stat-label", "{label}" }
        }
    }
}
