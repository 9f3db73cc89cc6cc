use dioxus::prelude::*;
use ui::views::{BlogView, HomeView, ProjectsGallery, SkillsView};

use crate::Route;

#[component]
pub fn Home() -> Element {
    rsx! { HomeView {} }
}

#[component]
pub fn Projects() -> Element {
    rsx! { ProjectsGallery {} }
}

#[component]
pub fn Skills() -> Element {
    rsx! { SkillsView {} }
}

#[component]
pub fn Blog() -> Element {
    rsx! { BlogView {} }
}

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        section {
            class: "not-found",
            h1 { class: "page-title", "Page not found" }
            p { class: "empty-state", "Nothing lives at /{path}." }
            Link { to: Route::Home {}, "Back home" }
        }
    }
}
