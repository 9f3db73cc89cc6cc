use dioxus::prelude::*;

use crate::backend::use_backend;
use crate::notices::{report, use_notices};

/// Email/password sign-in. `on_signed_in` fires once the session is established.
#[component]
pub fn LoginForm(on_signed_in: EventHandler<()>) -> Element {
    let backend = use_backend();
    let mut notices = use_notices();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut submitting = use_signal(|| false);

    let on_submit = move |evt: FormEvent| async move {
        evt.prevent_default();
        submitting.set(true);
        let auth = backend().auth;
        let result = auth.sign_in_with_password(&email(), &password()).await;
        submitting.set(false);
        if report(&mut notices, result, "Signing in", "").is_some() {
            password.set(String::new());
            on_signed_in.call(());
        }
    };

    rsx! {
        form {
            class: "login-form",
            onsubmit: on_submit,
            h1 { class: "login-title", "Sign in" }
            p { class: "login-subtitle", "Manage your projects, posts and profile." }
            label { "Email" }
            input {
                r#type: "email",
                autocomplete: "username",
                value: "{email}",
                oninput: move |e| email.set(e.value()),
            }
            label { "Password" }
            input {
                r#type: "password",
                autocomplete: "current-password",
                value: "{password}",
                oninput: move |e| password.set(e.value()),
            }
            button {
                r#type: "submit",
                class: "btn btn-primary",
                disabled: submitting(),
                if submitting() { "Signing in..." } else { "Sign in" }
            }
        }
    }
}
