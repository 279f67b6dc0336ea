//! Password reset: request a code, then set a new password with it.
//!
//! Both screens show the session's last error. Form validation and `Busy` never reach
//! the session state, so those messages are kept locally.

use api::AuthError;
use dioxus::prelude::*;
use ui::{use_auth, use_session, ErrorBanner};

use crate::Route;

#[component]
pub fn ResetPassword() -> Element {
    let auth = use_auth();
    let session = use_session();
    let nav = use_navigator();
    let mut email = use_signal(String::new);
    let mut loading = use_signal(|| false);
    let mut input_error = use_signal(|| Option::<String>::None);

    let handle_reset = move |evt: FormEvent| {
        evt.prevent_default();
        let session = session.clone();
        spawn(async move {
            input_error.set(None);
            loading.set(true);
            match session.reset_password(&email()).await {
                Ok(_) => {
                    nav.push(Route::ConfirmResetPassword {
                        email: email().trim().to_string(),
                    });
                }
                Err(e) => {
                    loading.set(false);
                    input_error.set(local_message(e));
                }
            }
        });
    };

    let error = input_error()
        .or_else(|| auth().last_error.map(|e| e.message))
        .unwrap_or_default();

    rsx! {
        div {
            class: "auth-screen",

            h1 { class: "auth-screen__title", "Reset Password" }
            p {
                class: "auth-screen__subtitle",
                "Enter your email address and we'll send you a code to reset your password."
            }

            form {
                onsubmit: handle_reset,
                class: "auth-screen",

                input {
                    class: "input",
                    r#type: "email",
                    placeholder: "Email",
                    disabled: loading(),
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }

                ErrorBanner { message: error }

                button {
                    class: "button",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Sending..." } else { "Send Reset Code" }
                }
            }

            Link { class: "link-button", to: Route::SignIn {}, "Back to Sign In" }
        }
    }
}

#[component]
pub fn ConfirmResetPassword(email: String) -> Element {
    let auth = use_auth();
    let session = use_session();
    let nav = use_navigator();
    let mut code = use_signal(String::new);
    let mut new_password = use_signal(String::new);
    let mut loading = use_signal(|| false);
    let mut input_error = use_signal(|| Option::<String>::None);

    let address = email.clone();
    let handle_confirm = move |evt: FormEvent| {
        evt.prevent_default();
        let session = session.clone();
        let email = address.clone();
        spawn(async move {
            input_error.set(None);
            loading.set(true);
            match session
                .confirm_reset_password(&email, &code(), &new_password())
                .await
            {
                Ok(()) => {
                    nav.replace(Route::SignIn {});
                }
                Err(e) => {
                    loading.set(false);
                    input_error.set(local_message(e));
                }
            }
        });
    };

    let error = input_error()
        .or_else(|| auth().last_error.map(|e| e.message))
        .unwrap_or_default();

    rsx! {
        div {
            class: "auth-screen",

            h1 { class: "auth-screen__title", "Reset Password" }
            p {
                class: "auth-screen__subtitle",
                "Enter the verification code sent to {email} and your new password."
            }

            form {
                onsubmit: handle_confirm,
                class: "auth-screen",

                input {
                    class: "input",
                    inputmode: "numeric",
                    placeholder: "Verification Code",
                    disabled: loading(),
                    value: code(),
                    oninput: move |evt: FormEvent| code.set(evt.value()),
                }
                input {
                    class: "input",
                    r#type: "password",
                    placeholder: "New Password",
                    disabled: loading(),
                    value: new_password(),
                    oninput: move |evt: FormEvent| new_password.set(evt.value()),
                }

                ErrorBanner { message: error }

                button {
                    class: "button",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Resetting..." } else { "Reset Password" }
                }
            }

            Link { class: "link-button", to: Route::ResetPassword {}, "Request a new code" }
        }
    }
}

fn local_message(error: AuthError) -> Option<String> {
    error.is_local().then_some(error.message)
}
