use dioxus::prelude::*;
use store::config::{MAX_FONT_SIZE, MIN_FONT_SIZE};
use store::{inbox_address, ReaderSettings};
use ui::{save_settings, use_auth, use_reader_settings, SignOutButton};

/// Writes the received text to the clipboard and answers whether it worked.
const COPY_JS: &str = r#"
    const text = await dioxus.recv();
    try {
        await navigator.clipboard.writeText(text);
        dioxus.send(true);
    } catch (e) {
        dioxus.send(false);
    }
"#;

#[component]
pub fn Settings() -> Element {
    let auth = use_auth();
    let mut settings = use_reader_settings();
    let mut save_error = use_signal(|| Option::<String>::None);
    let mut copied = use_signal(|| false);

    let mut update = move |next: ReaderSettings| {
        match save_settings(&next) {
            Ok(()) => save_error.set(None),
            Err(e) => {
                tracing::error!("Failed to save settings: {}", e);
                save_error.set(Some(e.to_string()));
            }
        }
        settings.set(next);
    };

    let user = auth().user;
    let inbox = user
        .as_ref()
        .map(|u| inbox_address(u.inbox_handle()))
        .unwrap_or_default();
    let account = user
        .as_ref()
        .map(|u| u.email.clone().unwrap_or_else(|| u.username.clone()))
        .unwrap_or_default();
    let address = inbox.clone();
    let copy_inbox = move |_| {
        let address = address.clone();
        async move {
            let mut eval = document::eval(COPY_JS);
            if let Err(e) = eval.send(address) {
                tracing::warn!("Failed to copy inbox address: {:?}", e);
                return;
            }
            match eval.recv::<bool>().await {
                Ok(ok) => copied.set(ok),
                Err(e) => tracing::warn!("Failed to copy inbox address: {:?}", e),
            }
        }
    };

    let current = settings();
    let font_size = current.reader.font_size;
    let push_enabled = current.notifications.push_enabled;

    rsx! {
        h1 { class: "screen-title", "Settings" }

        if let Some(err) = save_error() {
            ui::ErrorBanner { message: err }
        }

        section {
            class: "settings-section",
            h2 { "Reading" }
            div {
                class: "settings-row",
                label { r#for: "font-size", "Font Size" }
                span { "{font_size}" }
            }
            input {
                id: "font-size",
                r#type: "range",
                min: "{MIN_FONT_SIZE}",
                max: "{MAX_FONT_SIZE}",
                step: "1",
                value: "{font_size}",
                oninput: move |evt: FormEvent| {
                    if let Ok(size) = evt.value().parse::<u8>() {
                        update(settings().with_font_size(size));
                    }
                },
            }
            p {
                style: "font-size: {font_size}px;",
                "This is how newsletters will look."
            }
        }

        section {
            class: "settings-section",
            h2 { "Email Integration" }
            p { class: "auth-screen__subtitle", "Your Dimly Address" }
            p { class: "inbox-address", "{inbox}" }
            button {
                class: "button",
                disabled: inbox.is_empty(),
                onclick: copy_inbox,
                if copied() { "Copied" } else { "Copy Address" }
            }
        }

        section {
            class: "settings-section",
            h2 { "Notifications" }
            div {
                class: "settings-row",
                label { r#for: "push", "Push Notifications" }
                input {
                    id: "push",
                    r#type: "checkbox",
                    checked: push_enabled,
                    onchange: move |evt: FormEvent| {
                        update(settings().with_push_enabled(evt.checked()));
                    },
                }
            }
        }

        section {
            class: "settings-section",
            h2 { "Account" }
            p { "{account}" }
            SignOutButton { class: "button" }
        }
    }
}
