use api::AuthError;
use dioxus::prelude::*;
use ui::{use_session, ErrorBanner};

use crate::Route;

/// Enter the code emailed after sign-up.
#[component]
pub fn ConfirmSignUp(email: String) -> Element {
    let session = use_session();
    let nav = use_navigator();
    let mut code = use_signal(String::new);
    let mut error = use_signal(|| Option::<AuthError>::None);
    let mut loading = use_signal(|| false);

    let address = email.clone();
    let handle_confirm = move |evt: FormEvent| {
        evt.prevent_default();
        let session = session.clone();
        let email = address.clone();
        spawn(async move {
            error.set(None);
            loading.set(true);

            match session.confirm_sign_up(&email, &code()).await {
                Ok(_) => {
                    tracing::info!("Account verified");
                    nav.replace(Route::SignIn {});
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

            h1 { class: "auth-screen__title", "Verify Email" }
            p {
                class: "auth-screen__subtitle",
                "Please enter the verification code sent to {email}"
            }

            form {
                onsubmit: handle_confirm,
                class: "auth-screen",

                if let Some(err) = error() {
                    ErrorBanner { message: err.message }
                }

                input {
                    class: "input",
                    inputmode: "numeric",
                    autocomplete: "one-time-code",
                    placeholder: "Verification Code",
                    disabled: loading(),
                    value: code(),
                    oninput: move |evt: FormEvent| code.set(evt.value()),
                }

                button {
                    class: "button",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Verifying..." } else { "Verify" }
                }
            }

            Link { class: "link-button", to: Route::SignIn {}, "Back to Sign In" }
        }
    }
}
