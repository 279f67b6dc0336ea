mod sign_in;
pub use sign_in::SignIn;

mod sign_up;
pub use sign_up::SignUp;

mod confirm_sign_up;
pub use confirm_sign_up::ConfirmSignUp;

mod reset_password;
pub use reset_password::{ConfirmResetPassword, ResetPassword};

mod main_tabs;
pub use main_tabs::MainTabs;

mod feed;
pub use feed::Feed;

mod library;
pub use library::Library;

mod settings;
pub use settings::Settings;

mod newsletter_preview;
pub use newsletter_preview::NewsletterPreview;

/// The feed backing every newsletter screen, shared through context.
pub(crate) fn make_source() -> store::MockNewsletterSource {
    store::MockNewsletterSource::new()
}

pub(crate) fn use_source() -> store::MockNewsletterSource {
    dioxus::prelude::use_context::<store::MockNewsletterSource>()
}
