//! Sign-in screen with email/password and links to sign-up and password reset.

use api::{AuthError, Credentials};
use dioxus::prelude::*;
use ui::{use_auth, use_session, ErrorBanner};

use crate::Route;

#[component]
pub fn SignIn() -> Element {
    let auth = use_auth();
    let session = use_session();
    let nav = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<AuthError>::None);
    let mut loading = use_signal(|| false);

    // If already signed in, go to the feed
    if auth().is_authenticated {
        nav.replace(Route::Feed {});
    }

    let handle_sign_in = move |evt: FormEvent| {
        evt.prevent_default();
        let session = session.clone();
        spawn(async move {
            error.set(None);
            loading.set(true);

            let credentials = Credentials::new(email(), password());
            match session.sign_in(&credentials).await {
                Ok(()) => {
                    nav.replace(Route::Feed {});
                }
                Err(e) => {
                    tracing::warn!("Sign in failed: {}", e);
                    loading.set(false);
                    error.set(Some(e));
                }
            }
        });
    };

    rsx! {
        div {
            class: "auth-screen",

            h1 { class: "auth-screen__title", "Dimly" }
            p { class: "auth-screen__subtitle", "Sign in to your account" }

            form {
                onsubmit: handle_sign_in,
                class: "auth-screen",

                {match error() {
                    Some(err) if err.needs_confirmation() => rsx! {
                        div {
                            class: "notice",
                            p { "Please verify your email address first" }
                            button {
                                class: "link-button",
                                r#type: "button",
                                onclick: move |_| {
                                    nav.push(Route::ConfirmSignUp { email: email().trim().to_string() });
                                },
                                "Verify Now"
                            }
                        }
                    },
                    Some(err) => rsx! {
                        ErrorBanner { message: err.message }
                    },
                    None => rsx! {},
                }}

                input {
                    class: "input",
                    r#type: "email",
                    placeholder: "Email",
                    autocomplete: "email",
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

                button {
                    class: "button",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Signing in..." } else { "Sign In" }
                }
            }

            Link { class: "link-button", to: Route::ResetPassword {}, "Forgot Password?" }

            p {
                class: "auth-screen__subtitle",
                "Don't have an account? "
                Link { class: "link-button", to: Route::SignUp {}, "Sign Up" }
            }
        }
    }
}
