use dioxus::prelude::*;
use store::{Post, RecordManager};

use super::{commit, ConfirmDialog};
use crate::auth::use_auth;
use crate::backend::use_backend;
use crate::icons::{FaEye, FaEyeSlash, FaPen, FaPlus, FaTrash};
use crate::notices::use_notices;
use crate::Icon;

/// Dashboard screen for the owner's posts, drafts included.
#[component]
pub fn BlogManager() -> Element {
    let backend = use_backend();
    let auth = use_auth();
    let mut notices = use_notices();
    let mut manager = use_signal(RecordManager::<Post>::new);

    let _loader = use_resource(move || async move {
        let owner = auth().user_id();
        let store = backend().fresh_store().await;
        let mut next = manager.write().start();
        let result = next.load(&store, owner.as_deref()).await;
        commit(&mut manager, next, result, &mut notices, "Loading posts", "");
    });

    let on_submit = move |evt: FormEvent| async move {
        evt.prevent_default();
        let owner = auth().user_id();
        let store = backend().fresh_store().await;
        let mut next = manager.write().start();
        let result = next.submit(&store, owner.as_deref()).await;
        commit(&mut manager, next, result, &mut notices, "Saving post", "Post saved");
    };

    let on_confirm_delete = move |_: ()| async move {
        let owner = auth().user_id();
        let store = backend().fresh_store().await;
        let mut next = manager.write().start();
        let result = next.confirm_delete(&store, owner.as_deref()).await;
        commit(&mut manager, next, result, &mut notices, "Deleting post", "Post deleted");
    };

    let toggle = move |post: Post| async move {
        let owner = auth().user_id();
        let store = backend().fresh_store().await;
        let mut next = manager.write().start();
        let result = next.toggle_published(&store, owner.as_deref(), &post).await;
        let done = if post.published { "Post unpublished" } else { "Post published" };
        commit(&mut manager, next, result, &mut notices, "Updating post", done);
    };

    let state = manager();
    let busy = state.is_busy();
    let draft = state.draft().clone();
    let heading = if draft.id.is_some() { "Edit post" } else { "New post" };

    rsx! {
        div {
            class: "manager",
            div {
                class: "manager-header",
                h2 { class: "page-title", "Blog" }
                if !state.is_editing() {
                    button {
                        class: "btn btn-primary",
                        disabled: busy,
                        onclick: move |_| manager.write().begin_create(),
                        Icon { icon: FaPlus, width: 12, height: 12 }
                        " New post"
                    }
                }
            }

            if state.is_editing() {
                form {
                    class: "manager-form",
                    onsubmit: on_submit,
                    fieldset {
                        class: "form-fields",
                        disabled: busy,
                        h3 { "{heading}" }
                        label { "Title" }
                        input {
                            value: "{draft.title}",
                            oninput: move |e| manager.write().draft_mut().title = e.value(),
                        }
                        label { "Excerpt" }
                        input {
                            value: "{draft.excerpt}",
                            oninput: move |e| manager.write().draft_mut().excerpt = e.value(),
                        }
                        label { "Content (Markdown)" }
                        textarea {
                            rows: 12,
                            class: "markdown-input",
                            value: "{draft.content}",
                            oninput: move |e| manager.write().draft_mut().content = e.value(),
                        }
                        label {
                            class: "checkbox",
                            input {
                                r#type: "checkbox",
                                checked: draft.published,
                                onchange: move |e| manager.write().draft_mut().published = e.checked(),
                            }
                            " Published"
                        }
                        div {
                            class: "form-actions",
                            button {
                                r#type: "button",
                                class: "btn btn-secondary",
                                onclick: move |_| manager.write().cancel(),
                                "Cancel"
                            }
                            button { r#type: "submit", class: "btn btn-primary", "Save" }
                        }
                    }
                }
            }

            if state.records().is_empty() {
                p { class: "empty-state", "No posts yet." }
            }

            ul {
                class: "record-list",
                for post in state.records().iter().cloned() {
                    li {
                        key: "{post.id}",
                        class: "record-row",
                        div {
                            class: "record-main",
                            span { class: "record-title", "{post.title}" }
                            span {
                                class: if post.published { "badge badge-live" } else { "badge badge-draft" },
                                if post.published { "Published" } else { "Draft" }
                            }
                            span { class: "record-meta", {post.created_at.format("%b %-d, %Y").to_string()} }
                        }
                        div {
                            class: "record-actions",
                            button {
                                class: "btn btn-icon",
                                disabled: busy,
                                title: if post.published { "Unpublish" } else { "Publish" },
                                onclick: {
                                    let post = post.clone();
                                    move |_| toggle(post.clone())
                                },
                                if post.published {
                                    Icon { icon: FaEyeSlash, width: 12, height: 12 }
                                } else {
                                    Icon { icon: FaEye, width: 12, height: 12 }
                                }
                            }
                            button {
                                class: "btn btn-icon",
                                disabled: busy,
                                title: "Edit",
                                onclick: {
                                    let post = post.clone();
                                    move |_| manager.write().begin_edit(&post)
                                },
                                Icon { icon: FaPen, width: 12, height: 12 }
                            }
                            button {
                                class: "btn btn-icon btn-danger",
                                disabled: busy,
                                title: "Delete",
                                onclick: {
                                    let id = post.id.clone();
                                    move |_| manager.write().request_delete(&id)
                                },
                                Icon { icon: FaTrash, width: 12, height: 12 }
                            }
                        }
                    }
                }
            }

            if state.pending_delete().is_some() {
                ConfirmDialog {
                    title: "Delete post?",
                    message: "This post will be permanently removed.",
                    on_confirm: on_confirm_delete,
                    busy,
                    on_cancel: move |_| manager.write().cancel_delete(),
                }
            }
        }
    }
}
