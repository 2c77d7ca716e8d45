use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::views::{HomeView, OnboardingView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", OnboardingView)] Onboarding {},
        #[route("/home", HomeView)] Home {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            header { class: "topbar",
                span { class: "brand", "Gather" }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
