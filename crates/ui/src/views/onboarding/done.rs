use dioxus::prelude::*;
use dioxus_router::Link;

use crate::routes::Route;

#[component]
pub fn DoneStep() -> Element {
    rsx! {
        section { class: "onboarding-step done",
            h2 { "You're all set!" }
            p { "We'll use your goals and interests to suggest plans with your people." }
            Link { to: Route::Home {}, "Go to home" }
        }
    }
}
