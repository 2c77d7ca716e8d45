use dioxus::prelude::*;
use plan_core::model::StageTransition;
use tracing::warn;

use super::{choice_class, continue_class};
use crate::vm::{AdvanceStep, AssessmentVm, NOD_DURATION, Notice, NoticeSlot, OnboardingVm};

fn pick_option(mut wizard: Signal<AssessmentVm>, option: &'static str) {
    let ticket = match wizard.write().select_option(option) {
        Ok(ticket) => ticket,
        Err(err) => {
            warn!(error = %err, "assessment option rejected");
            return;
        }
    };
    spawn(async move {
        tokio::time::sleep(NOD_DURATION).await;
        wizard.write().clear_nod(ticket);
    });
}

fn continue_assessment(
    mut wizard: Signal<AssessmentVm>,
    flow: OnboardingVm,
    notice: NoticeSlot,
    on_complete: EventHandler<StageTransition>,
) {
    let step = wizard.write().begin_advance();
    let AdvanceStep::Submit(record) = step else {
        return;
    };
    spawn(async move {
        let result = flow.assessments().submit(&record).await;
        let outcome = wizard.write().finish_submit(record, result);
        match outcome.and_then(|_| flow.assessment_saved()) {
            Ok(transition) => {
                notice.clear();
                on_complete.call(transition);
            }
            Err(err) => {
                warn!(error = %err, "personality assessment not saved");
                notice.show(Notice::from_error(&err));
            }
        }
    });
}

#[component]
pub fn PersonalityStep(flow: OnboardingVm, on_complete: EventHandler<StageTransition>) -> Element {
    let notice = use_context::<NoticeSlot>();
    let registry = flow.assessments().registry();
    let mut wizard = use_signal(|| AssessmentVm::new(registry));

    let snapshot = wizard.read().clone();
    let Some(step) = snapshot.step() else {
        return rsx! {
            p { class: "empty", "There are no questions to answer." }
        };
    };
    let selected = snapshot.selected().map(str::to_owned);
    let note = snapshot.note().to_owned();
    let progress = snapshot.progress_label();
    let can_continue = snapshot.can_continue();
    let continue_label = snapshot.continue_label();
    let nod_class = if snapshot.is_nodding() { "nod is-visible" } else { "nod" };

    rsx! {
        section { class: "onboarding-step personality",
            p { class: "progress", "{progress}" }
            h2 { "{step.title}" }
            p { class: "description", "{step.description}" }
            ul { class: "choice-list",
                for option in step.options.iter().copied() {
                    li { key: "{option}",
                        button {
                            class: choice_class(selected.as_deref() == Some(option)),
                            onclick: move |_| pick_option(wizard, option),
                            "{option}"
                        }
                    }
                }
            }
            span { class: nod_class, "Got it" }
            textarea {
                class: "notes",
                placeholder: "Anything you'd like to add? (optional)",
                value: "{note}",
                oninput: move |evt: FormEvent| {
                    if let Err(err) = wizard.write().set_note(evt.value()) {
                        warn!(error = %err, "note rejected");
                    }
                },
            }
            button {
                class: continue_class(can_continue),
                disabled: !can_continue,
                onclick: move |_| continue_assessment(wizard, flow.clone(), notice, on_complete),
                "{continue_label}"
            }
        }
    }
}
