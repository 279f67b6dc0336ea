use api::{AuthError, SignUpForm};
use dioxus::prelude::*;
use ui::{use_session, ErrorBanner};

use crate::Route;

/// Account creation. Success continues to email confirmation.
#[component]
pub fn SignUp() -> Element {
    let session = use_session();
    let nav = use_navigator();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut error = use_signal(|| Option::<AuthError>::None);
    let mut loading = use_signal(|| false);

    let handle_sign_up = move |evt: FormEvent| {
        evt.prevent_default();
        let session = session.clone();
        spawn(async move {
            error.set(None);

            let form = SignUpForm {
                name: name(),
                email: email(),
                password: password(),
                confirm_password: confirm_password(),
            };
            let credentials = match form.into_credentials() {
                Ok(credentials) => credentials,
                Err(e) => {
                    error.set(Some(e));
                    return;
                }
            };

            loading.set(true);
            match session.sign_up(&credentials).await {
                Ok(_) => {
                    nav.push(Route::ConfirmSignUp {
                        email: credentials.email.trim().to_string(),
                    });
                }
                Err(e) => {
                    loading.set(false);
                    error.set(Some(e));
                }
            }
        });
    };

    rsx! {
        div {
            class: "auth-screen",

            h1 { class: "auth-screen__title", "Create Account" }

            form {
                onsubmit: handle_sign_up,
                class: "auth-screen",

                if let Some(err) = error() {
                    ErrorBanner { message: err.message }
                }

                input {
                    class: "input",
                    placeholder: "Name",
                    autocomplete: "name",
                    disabled: loading(),
                    value: name(),
                    oninput: move |evt: FormEvent| name.set(evt.value()),
                }
                input {
                    class: "input",
                    r#type: "email",
                    placeholder: "Email",
                    disabled: loading(),
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }
                input {
                    class: "input",
                    r#type: "password",
                    placeholder: "Password",
                    disabled: loading(),
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }
                input {
                    class: "input",
                    r#type: "password",
                    placeholder: "Confirm Password",
                    disabled: loading(),
                    value: confirm_password(),
                    oninput: move |evt: FormEvent| confirm_password.set(evt.value()),
                }

                button {
                    class: "button",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Creating account..." } else { "Sign Up" }
                }
            }

            p {
                class: "auth-screen__subtitle",
                "Already have an account? "
                Link { class: "link-button", to: Route::SignIn {}, "Sign In" }
            }
        }
    }
}
