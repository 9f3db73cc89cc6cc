use dioxus::prelude::*;
use store::catalog::{featured_projects, site_profile};
use store::{Profile, Project};

use super::gallery::ProjectCard;
use crate::backend::use_backend;
use crate::icons::brands::{FaGithub, FaLinkedin, FaTwitter};
use crate::notices::{report, use_notices};
use crate::Icon;

#[derive(Clone, Debug, Default, PartialEq)]
struct HomeData {
    profile: Option<Profile>,
    featured: Vec<Project>,
}

/// Landing page: the owner's profile and their most recent projects.
#[component]
pub fn HomeView() -> Element {
    let backend = use_backend();
    let mut notices = use_notices();

    let data = use_resource(move || async move {
        let backend = backend();
        let store = backend.fresh_store().await;
        let profile = report(&mut notices, site_profile(&store).await, "Loading profile", "")
            .flatten();
        let limit = backend.config.gallery.featured_limit;
        let featured = report(
            &mut notices,
            featured_projects(&store, limit).await,
            "Loading projects",
            "",
        )
        .unwrap_or_default();
        HomeData { profile, featured }
    });

    let Some(HomeData { profile, featured }) = data() else {
        return rsx! { p { class: "loading", "Loading..." } };
    };

    rsx! {
        section {
            class: "hero",
            {match profile {
                Some(profile) => rsx! { ProfileHero { profile } },
                None => rsx! {
                    h1 { class: "hero-name", "Portfolio" }
                    p { class: "hero-bio", "Nothing here yet." }
                },
            }}
        }
        if !featured.is_empty() {
            section {
                class: "featured",
                h2 { class: "section-title", "Featured projects" }
                div {
                    class: "project-grid",
                    for project in featured {
                        ProjectCard { key: "{project.id}", project }
                    }
                }
            }
        }
    }
}

#[component]
fn ProfileHero(profile: Profile) -> Element {
    let links = profile.social_links.clone();
    rsx! {
        if !profile.avatar_url.is_empty() {
            img { class: "hero-avatar", src: "{profile.avatar_url}", alt: "{profile.full_name}" }
        }
        h1 { class: "hero-name", "{profile.full_name}" }
        if !profile.bio.is_empty() {
            p { class: "hero-bio", "{profile.bio}" }
        }
        if !profile.skills.is_empty() {
            div {
                class: "tech-list",
                for skill in profile.skills.iter() {
                    span { class: "tech-tag", "{skill}" }
                }
            }
        }
        div {
            class: "social-row",
            if let Some(url) = links.github {
                a { href: "{url}", target: "_blank", title: "GitHub",
                    Icon { icon: FaGithub, width: 20, height: 20 }
                }
            }
            if let Some(url) = links.linkedin {
                a { href: "{url}", target: "_blank", title: "LinkedIn",
                    Icon { icon: FaLinkedin, width: 20, height: 20 }
                }
            }
            if let Some(url) = links.twitter {
                a { href: "{url}", target: "_blank", title: "Twitter",
                    Icon { icon: FaTwitter, width: 20, height: 20 }
                }
            }
        }
    }
}
