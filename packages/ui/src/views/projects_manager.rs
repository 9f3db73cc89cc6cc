use dioxus::prelude::*;
use store::models::{join_list, optional};
use store::{Project, RecordManager};

use super::{commit, ConfirmDialog};
use crate::auth::use_auth;
use crate::backend::use_backend;
use crate::icons::{FaPen, FaPlus, FaTrash};
use crate::notices::use_notices;
use crate::Icon;

/// Dashboard screen for the owner's projects.
#[component]
pub fn ProjectsManager() -> Element {
    let backend = use_backend();
    let auth = use_auth();
    let mut notices = use_notices();
    let mut manager = use_signal(RecordManager::<Project>::new);
    // Kept as typed so a trailing comma survives while the list is re-split.
    let mut tech_input = use_signal(String::new);

    let _loader = use_resource(move || async move {
        let owner = auth().user_id();
        let store = backend().fresh_store().await;
        let mut next = manager.write().start();
        let result = next.load(&store, owner.as_deref()).await;
        commit(&mut manager, next, result, &mut notices, "Loading projects", "");
    });

    let on_submit = move |evt: FormEvent| async move {
        evt.prevent_default();
        let owner = auth().user_id();
        let store = backend().fresh_store().await;
        let mut next = manager.write().start();
        let result = next.submit(&store, owner.as_deref()).await;
        commit(&mut manager, next, result, &mut notices, "Saving project", "Project saved");
    };

    let on_confirm_delete = move |_: ()| async move {
        let owner = auth().user_id();
        let store = backend().fresh_store().await;
        let mut next = manager.write().start();
        let result = next.confirm_delete(&store, owner.as_deref()).await;
        commit(&mut manager, next, result, &mut notices, "Deleting project", "Project deleted");
    };

    let state = manager();
    let busy = state.is_busy();
    let draft = state.draft().clone();
    let heading = if draft.id.is_some() { "Edit project" } else { "New project" };

    rsx! {
        div {
            class: "manager",
            div {
                class: "manager-header",
                h2 { class: "page-title", "Projects" }
                if !state.is_editing() {
                    button {
                        class: "btn btn-primary",
                        disabled: busy,
                        onclick: move |_| {
                            tech_input.set(String::new());
                            manager.write().begin_create();
                        },
                        Icon { icon: FaPlus, width: 12, height: 12 }
                        " New project"
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
                        label { "Description" }
                        textarea {
                            rows: 4,
                            value: "{draft.description}",
                            oninput: move |e| manager.write().draft_mut().description = e.value(),
                        }
                        label { "Image URL" }
                        input {
                            value: "{draft.image_url}",
                            oninput: move |e| manager.write().draft_mut().image_url = e.value(),
                        }
                        label { "Live URL" }
                        input {
                            value: "{draft.live_url.clone().unwrap_or_default()}",
                            oninput: move |e| manager.write().draft_mut().live_url = optional(&e.value()),
                        }
                        label { "GitHub URL" }
                        input {
                            value: "{draft.github_url.clone().unwrap_or_default()}",
                            oninput: move |e| manager.write().draft_mut().github_url = optional(&e.value()),
                        }
                        label { "Technologies (comma separated)" }
                        input {
                            value: "{tech_input}",
                            oninput: move |e| {
                                let value = e.value();
                                manager.write().draft_mut().set_technologies(&value);
                                tech_input.set(value);
                            },
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
                p { class: "empty-state", "No projects yet." }
            }

            ul {
                class: "record-list",
                for project in state.records().iter().cloned() {
                    li {
                        key: "{project.id}",
                        class: "record-row",
                        div {
                            class: "record-main",
                            span { class: "record-title", "{project.title}" }
                            span { class: "record-meta", "{join_list(&project.technologies)}" }
                        }
                        div {
                            class: "record-actions",
                            button {
                                class: "btn btn-icon",
                                disabled: busy,
                                title: "Edit",
                                onclick: {
                                    let project = project.clone();
                                    move |_| {
                                        tech_input.set(join_list(&project.technologies));
                                        manager.write().begin_edit(&project);
                                    }
                                },
                                Icon { icon: FaPen, width: 12, height: 12 }
                            }
                            button {
                                class: "btn btn-icon btn-danger",
                                disabled: busy,
                                title: "Delete",
                                onclick: {
                                    let id = project.id.clone();
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
                    title: "Delete project?",
                    message: "This project will be removed from your portfolio.",
                    on_confirm: on_confirm_delete,
                    busy,
                    on_cancel: move |_| manager.write().cancel_delete(),
                }
            }
        }
    }
}
