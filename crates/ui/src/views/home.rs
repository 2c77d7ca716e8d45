use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use tracing::warn;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{HomeVm, map_home};

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let profiles = ctx.profiles();
    let auth = ctx.auth();
    let mut signing_out = use_signal(|| false);
    let mut sign_out_error = use_signal(|| None::<ViewError>);

    let resource = use_resource(move || {
        let profiles = profiles.clone();
        async move {
            let profile = profiles.load().await.map_err(|err| {
                warn!(error = %err, "failed to load profile");
                ViewError::from(&err)
            })?;
            Ok::<_, ViewError>(map_home(profile.as_ref()))
        }
    });

    let body = match view_state_from_resource(resource) {
        ViewState::Idle | ViewState::Loading => rsx! {
            p { class: "loading", "Loading..." }
        },
        ViewState::Error(err) => rsx! {
            p { class: "error", "{err.message()}" }
        },
        ViewState::Ready(home) => rsx! { HomeSummary { home } },
    };

    rsx! {
        div { class: "page home",
            header { class: "page-header",
                h2 { "Home" }
                button {
                    class: "secondary",
                    disabled: signing_out(),
                    onclick: move |_| {
                        if signing_out() {
                            return;
                        }
                        signing_out.set(true);
                        let auth = auth.clone();
                        spawn(async move {
                            let result = auth.sign_out().await;
                            signing_out.set(false);
                            match result {
                                Ok(()) => {
                                    navigator.push(Route::Onboarding {});
                                }
                                Err(err) => {
                                    warn!(error = %err, "sign out failed");
                                    sign_out_error.set(Some(ViewError::from(&err)));
                                }
                            }
                        });
                    },
                    "Sign out"
                }
            }
            if let Some(err) = sign_out_error() {
                p { class: "error", "{err.message()}" }
            }
            {body}
        }
    }
}

#[component]
fn HomeSummary(home: HomeVm) -> Element {
    if !home.onboarding_completed {
        return rsx! {
            div { class: "card",
                p { "Finish setting up to see your plans." }
                Link { to: Route::Onboarding {}, "Continue onboarding" }
            }
        };
    }

    rsx! {
        div { class: "card",
            h3 { "Your goals" }
            ol { class: "goal-list",
                for goal in home.goals.iter() {
                    li { key: "{goal}", "{goal}" }
                }
            }
        }
        div { class: "card",
            h3 { "Your interests" }
            ul { class: "tag-list",
                for interest in home.interests.iter() {
                    li { key: "{interest}", class: "tag", "{interest}" }
                }
            }
        }
    }
}
