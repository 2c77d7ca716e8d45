use dioxus::prelude::*;
use plan_core::model::StageTransition;
use tracing::warn;

use crate::vm::{Notice, NoticeSlot, OnboardingVm};

#[component]
pub fn SplashStep(flow: OnboardingVm, on_complete: EventHandler<StageTransition>) -> Element {
    let notice = use_context::<NoticeSlot>();

    rsx! {
        section { class: "onboarding-step splash",
            h1 { "Welcome to Gather" }
            p { class: "lede",
                "Make time for the people who matter. A few quick questions and we'll tailor your plans."
            }
            button {
                class: "primary",
                onclick: move |_| match flow.acknowledge() {
                    Ok(transition) => {
                        notice.clear();
                        on_complete.call(transition);
                    }
                    Err(err) => {
                        warn!(error = %err, "splash acknowledgement rejected");
                        notice.show(Notice::from_error(&err));
                    }
                },
                "Get started"
            }
        }
    }
}
