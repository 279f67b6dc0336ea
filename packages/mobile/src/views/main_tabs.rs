use dioxus::prelude::*;
use ui::icons::{FaBook, FaGear, FaNewspaper};
use ui::{use_auth, Icon};

use crate::Route;

/// Bottom tab bar around the feed, library and settings screens.
///
/// Leaving the authenticated state (sign-out, expired session) sends the user back
/// to sign-in.
#[component]
pub fn MainTabs() -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    use_effect(move || {
        let state = auth();
        if !state.is_loading && !state.is_authenticated {
            nav.replace(Route::SignIn {});
        }
    });

    rsx! {
        div {
            class: "tabs",
            main {
                class: "tabs__content",
                Outlet::<Route> {}
            }
            nav {
                class: "tabs__bar",
                Link {
                    class: "tabs__item",
                    active_class: "active",
                    to: Route::Feed {},
                    Icon { icon: FaNewspaper, width: 20, height: 20 }
                    "Feed"
                }
                Link {
                    class: "tabs__item",
                    active_class: "active",
                    to: Route::Library {},
                    Icon { icon: FaBook, width: 20, height: 20 }
                    "Library"
                }
                Link {
                    class: "tabs__item",
                    active_class: "active",
                    to: Route::Settings {},
                    Icon { icon: FaGear, width: 20, height: 20 }
                    "Settings"
                }
            }
        }
    }
}
