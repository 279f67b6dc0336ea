use std::sync::Arc;

use dioxus::prelude::*;
use views::{
    ConfirmResetPassword, ConfirmSignUp, Feed, Library, MainTabs, NewsletterPreview,
    ResetPassword, Settings, SignIn, SignUp,
};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Root {},
    #[route("/sign-in")]
    SignIn {},
    #[route("/sign-up")]
    SignUp {},
    #[route("/confirm-sign-up/:email")]
    ConfirmSignUp { email: String },
    #[route("/reset-password")]
    ResetPassword {},
    #[route("/confirm-reset-password/:email")]
    ConfirmResetPassword { email: String },
    #[layout(MainTabs)]
        #[route("/feed")]
        Feed {},
        #[route("/library")]
        Library {},
        #[route("/settings")]
        Settings {},
    #[end_layout]
    #[route("/newsletter/:id")]
    NewsletterPreview { id: String },
}

fn main() {
    let config = match api::IdentityConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            dioxus::logger::initialize_default();
            tracing::error!("Identity provider is not configured: {}", e);
            std::process::exit(1);
        }
    };

    let provider = api::CognitoProvider::new(config);
    let session = ui::SessionHandle::new(api::Session::new(Arc::new(provider)));

    dioxus::LaunchBuilder::new()
        .with_context(session)
        .launch(App);
}

#[component]
fn App() -> Element {
    let session = use_context::<ui::SessionHandle>();
    use_context_provider(|| Signal::new(ui::load_settings()));
    use_context_provider(views::make_source);

    rsx! {
        document::Link { rel: "stylesheet", href: ui::DIMLY_CSS }
        ui::AuthProvider {
            session,
            Router::<Route> {}
        }
    }
}

#[component]
fn Root() -> Element {
    let auth = ui::use_auth();
    let nav = use_navigator();

    // Redirect once the startup session check is done
    use_effect(move || {
        let state = auth();
        if state.is_loading {
            return;
        }
        if state.is_authenticated {
            nav.replace(Route::Feed {});
        } else {
            nav.replace(Route::SignIn {});
        }
    });

    rsx! {
        div { class: "loading-screen", div { class: "spinner" } }
    }
}
