use dioxus::prelude::*;
use store::catalog::{all_projects, filter_by_technology, technologies};
use store::Project;

use crate::backend::use_backend;
use crate::icons::brands::FaGithub;
use crate::icons::FaArrowUpRightFromSquare;
use crate::notices::{report, use_notices};
use crate::Icon;

/// Public project gallery with a technology filter.
#[component]
pub fn ProjectsGallery() -> Element {
    let backend = use_backend();
    let mut notices = use_notices();
    let mut selected = use_signal(|| Option::<String>::None);

    let projects = use_resource(move || async move {
        let store = backend().fresh_store().await;
        report(&mut notices, all_projects(&store).await, "Loading projects", "").unwrap_or_default()
    });

    let Some(projects) = projects() else {
        return rsx! { p { class: "loading", "Loading projects..." } };
    };
    let chips = technologies(&projects);
    let active = selected();
    let shown: Vec<Project> = filter_by_technology(&projects, active.as_deref())
        .into_iter()
        .cloned()
        .collect();

    rsx! {
        section {
            class: "gallery",
            h1 { class: "page-title", "Projects" }
            div {
                class: "chip-row",
                button {
                    class: if active.is_none() { "chip chip-active" } else { "chip" },
                    onclick: move |_| selected.set(None),
                    "All"
                }
                for tech in chips {
                    button {
                        key: "{tech}",
                        class: if active.as_deref() == Some(tech.as_str()) { "chip chip-active" } else { "chip" },
                        onclick: {
                            let tech = tech.clone();
                            move |_| selected.set(Some(tech.clone()))
                        },
                        "{tech}"
                    }
                }
            }
            if shown.is_empty() {
                p { class: "empty-state", "No projects to show." }
            }
            div {
                class: "project-grid",
                for project in shown {
                    ProjectCard { key: "{project.id}", project }
                }
            }
        }
    }
}

#[component]
pub(crate) fn ProjectCard(project: Project) -> Element {
    rsx! {
        article {
            class: "project-card",
            if !project.image_url.is_empty() {
                img { class: "project-image", src: "{project.image_url}", alt: "{project.title}" }
            }
            div {
                class: "project-body",
                h3 { "{project.title}" }
                p { "{project.description}" }
                div {
                    class: "tech-list",
                    for tech in project.technologies.iter() {
                        span { class: "tech-tag", "{tech}" }
                    }
                }
                div {
                    class: "project-links",
                    if let Some(url) = project.live_url.as_ref() {
                        a {
                            href: "{url}",
                            target: "_blank",
                            rel: "noopener noreferrer",
                            Icon { icon: FaArrowUpRightFromSquare, width: 12, height: 12 }
                            " Live"
                        }
                    }
                    if let Some(url) = project.github_url.as_ref() {
                        a {
                            href: "{url}",
                            target: "_blank",
                            rel: "noopener noreferrer",
                            Icon { icon: FaGithub, width: 12, height: 12 }
                            " Source"
                        }
                    }
                }
            }
        }
    }
}
