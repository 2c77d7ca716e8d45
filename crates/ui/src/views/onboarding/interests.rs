use dioxus::prelude::*;
use plan_core::model::{InterestSelection, StageTransition};
use tracing::warn;

use super::{choice_class, continue_class};
use crate::vm::{Notice, NoticeSlot, OnboardingVm, interest_rows};

#[component]
pub fn InterestsStep(flow: OnboardingVm, on_complete: EventHandler<StageTransition>) -> Element {
    let notice = use_context::<NoticeSlot>();
    let mut selection = use_signal(InterestSelection::new);
    let mut saving = use_signal(|| false);

    let rows = interest_rows(&selection.read());
    let can_finish = !selection.read().is_empty() && !saving();

    rsx! {
        section { class: "onboarding-step interests",
            h2 { "What do you enjoy doing together?" }
            p { class: "hint", "Pick at least one." }
            ul { class: "choice-list",
                for row in rows {
                    li { key: "{row.id}",
                        button {
                            class: choice_class(row.selected),
                            onclick: move |_| {
                                if let Err(err) = selection.write().toggle(row.id) {
                                    warn!(error = %err, "interest toggle rejected");
                                }
                            },
                            "{row.label}"
                        }
                    }
                }
            }
            button {
                class: continue_class(can_finish),
                disabled: !can_finish,
                onclick: move |_| {
                    if saving() || selection.read().is_empty() {
                        return;
                    }
                    saving.set(true);
                    let flow = flow.clone();
                    let picked = selection.read().clone();
                    spawn(async move {
                        let result = flow.submit_interests(&picked).await;
                        saving.set(false);
                        match result {
                            Ok(transition) => {
                                notice.clear();
                                on_complete.call(transition);
                            }
                            Err(err) => {
                                warn!(error = %err, "interests not saved");
                                notice.show(Notice::from_error(&err));
                            }
                        }
                    });
                },
                if saving() { "Saving..." } else { "Finish" }
            }
        }
    }
}
