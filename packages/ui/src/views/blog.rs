use dioxus::prelude::*;
use store::catalog::published_posts;
use store::Post;

use crate::backend::use_backend;
use crate::icons::FaArrowLeft;
use crate::markdown::render_markdown;
use crate::notices::{report, use_notices};
use crate::Icon;

const DATE_FORMAT: &str = "%B %-d, %Y";

/// Public blog: the list of published posts, or one post rendered from Markdown.
#[component]
pub fn BlogView() -> Element {
    let backend = use_backend();
    let mut notices = use_notices();
    let mut selected = use_signal(|| Option::<Post>::None);

    let posts = use_resource(move || async move {
        let store = backend().fresh_store().await;
        report(&mut notices, published_posts(&store).await, "Loading posts", "").unwrap_or_default()
    });

    if let Some(post) = selected() {
        let html = render_markdown(&post.content);
        let date = post.created_at.format(DATE_FORMAT).to_string();
        return rsx! {
            article {
                class: "post",
                button {
                    class: "btn btn-link",
                    onclick: move |_| selected.set(None),
                    Icon { icon: FaArrowLeft, width: 12, height: 12 }
                    " All posts"
                }
                h1 { class: "post-title", "{post.title}" }
                time { class: "post-date", "{date}" }
                div { class: "post-content", dangerous_inner_html: "{html}" }
            }
        };
    }

    let Some(posts) = posts() else {
        return rsx! { p { class: "loading", "Loading posts..." } };
    };

    rsx! {
        section {
            class: "blog",
            h1 { class: "page-title", "Blog" }
            if posts.is_empty() {
                p { class: "empty-state", "No posts published yet." }
            }
            for post in posts {
                article {
                    key: "{post.id}",
                    class: "post-summary",
                    h2 {
                        class: "post-title",
                        onclick: {
                            let post = post.clone();
                            move |_| selected.set(Some(post.clone()))
                        },
                        "{post.title}"
                    }
                    time { class: "post-date", {post.created_at.format(DATE_FORMAT).to_string()} }
                    if !post.excerpt.is_empty() {
                        p { class: "post-excerpt", "{post.excerpt}" }
                    }
                }
            }
        }
    }
}
