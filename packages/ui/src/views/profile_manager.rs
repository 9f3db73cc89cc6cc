use dioxus::prelude::*;
use store::models::{join_list, optional};
use store::{Profile, RecordManager};

use super::commit;
use crate::auth::use_auth;
use crate::backend::use_backend;
use crate::notices::use_notices;

/// Dashboard form for the owner's profile. The saved profile, if any, seeds the
/// form on load; saving creates it or replaces it.
#[component]
pub fn ProfileManager() -> Element {
    let backend = use_backend();
    let auth = use_auth();
    let mut notices = use_notices();
    let mut manager = use_signal(RecordManager::<Profile>::new);
    let mut skills_input = use_signal(String::new);

    let _loader = use_resource(move || async move {
        let owner = auth().user_id();
        let store = backend().fresh_store().await;
        let mut next = manager.write().start();
        let result = next.load(&store, owner.as_deref()).await;
        commit(&mut manager, next, result, &mut notices, "Loading profile", "");
        skills_input.set(join_list(&manager.peek().draft().skills));
    });

    let on_submit = move |evt: FormEvent| async move {
        evt.prevent_default();
        let owner = auth().user_id();
        let store = backend().fresh_store().await;
        let mut next = manager.write().start();
        let result = next.submit(&store, owner.as_deref()).await;
        let saved = result.is_ok();
        commit(&mut manager, next, result, &mut notices, "Saving profile", "Profile saved");
        if saved {
            skills_input.set(join_list(&manager.peek().draft().skills));
        }
    };

    let state = manager();
    let busy = state.is_busy();
    let draft = state.draft().clone();
    let links = draft.social_links.clone();

    rsx! {
        div {
            class: "manager",
            div {
                class: "manager-header",
                h2 { class: "page-title", "Profile" }
            }
            if state.records().is_none() {
                p { class: "empty-state", "No profile saved yet. Fill in the form to create one." }
            }
            form {
                class: "manager-form",
                onsubmit: on_submit,
                fieldset {
                    class: "form-fields",
                    disabled: busy,
                    label { "Full name" }
                    input {
                        value: "{draft.full_name}",
                        oninput: move |e| manager.write().draft_mut().full_name = e.value(),
                    }
                    label { "Avatar URL" }
                    input {
                        value: "{draft.avatar_url}",
                        oninput: move |e| manager.write().draft_mut().avatar_url = e.value(),
                    }
                    label { "Bio" }
                    textarea {
                        rows: 5,
                        value: "{draft.bio}",
                        oninput: move |e| manager.write().draft_mut().bio = e.value(),
                    }
                    label { "Skills (comma separated; write Category: Skill to group)" }
                    input {
                        value: "{skills_input}",
                        oninput: move |e| {
                            let value = e.value();
                            manager.write().draft_mut().set_skills(&value);
                            skills_input.set(value);
                        },
                    }
                    fieldset {
                        class: "social-links",
                        legend { "Social links" }
                        label { "GitHub" }
                        input {
                            value: "{links.github.clone().unwrap_or_default()}",
                            oninput: move |e| manager.write().draft_mut().social_links.github = optional(&e.value()),
                        }
                        label { "LinkedIn" }
                        input {
                            value: "{links.linkedin.clone().unwrap_or_default()}",
                            oninput: move |e| manager.write().draft_mut().social_links.linkedin = optional(&e.value()),
                        }
                        label { "Twitter" }
                        input {
                            value: "{links.twitter.clone().unwrap_or_default()}",
                            oninput: move |e| manager.write().draft_mut().social_links.twitter = optional(&e.value()),
                        }
                    }
                    div {
                        class: "form-actions",
                        button { r#type: "submit", class: "btn btn-primary", "Save profile" }
                    }
                }
            }
        }
    }
}
