use dioxus::prelude::*;
use store::catalog::{site_profile, skill_groups};

use crate::backend::use_backend;
use crate::notices::{report, use_notices};

/// Public skills page built from the profile's skill list.
#[component]
pub fn SkillsView() -> Element {
    let backend = use_backend();
    let mut notices = use_notices();

    let skills = use_resource(move || async move {
        let store = backend().fresh_store().await;
        report(&mut notices, site_profile(&store).await, "Loading skills", "")
            .flatten()
            .map(|profile| profile.skills)
            .unwrap_or_default()
    });

    let Some(skills) = skills() else {
        return rsx! { p { class: "loading", "Loading skills..." } };
    };
    let groups = skill_groups(&skills);

    rsx! {
        section {
            class: "skills",
            h1 { class: "page-title", "Skills" }
            if groups.is_empty() {
                p { class: "empty-state", "No skills listed yet." }
            }
            div {
                class: "skill-grid",
                for group in groups.iter().filter(|g| g.category.is_some()) {
                    div {
                        key: "{group.category.clone().unwrap_or_default()}",
                        class: "skill-card",
                        h2 { class: "section-title", {group.category.clone().unwrap_or_default()} }
                        ul {
                            for skill in group.skills.iter() {
                                li { class: "skill-item", "{skill}" }
                            }
                        }
                    }
                }
            }
            for group in groups.iter().filter(|g| g.category.is_none()) {
                div {
                    class: "skill-cloud",
                    h2 { class: "section-title", "Additional skills & tools" }
                    div {
                        class: "tech-list",
                        for skill in group.skills.iter() {
                            span { class: "tech-tag", "{skill}" }
                        }
                    }
                }
            }
        }
    }
}
