mod done;
mod goals;
mod interests;
mod personality;
mod splash;

use dioxus::prelude::*;
use plan_core::model::{OnboardingStage, StageTransition};
use tracing::warn;

use crate::context::AppContext;
use crate::views::{NoticeBanner, ViewError, ViewState, view_state_from_resource};
use crate::vm::{Notice, NoticeSlot, OnboardingVm};

pub use done::DoneStep;
pub use goals::{GoalsRankStep, GoalsSelectStep};
pub use interests::InterestsStep;
pub use personality::PersonalityStep;
pub use splash::SplashStep;

/// Stages that show a "Step n of N" counter.
const COUNTED_STAGES: u32 = 4;

fn choice_class(selected: bool) -> &'static str {
    if selected { "choice is-selected" } else { "choice" }
}

fn continue_class(enabled: bool) -> &'static str {
    if enabled { "primary" } else { "primary is-disabled" }
}

/// Hosts exactly one onboarding stage at a time and commits the transitions
/// each stage reports.
#[component]
pub fn OnboardingView() -> Element {
    let ctx = use_context::<AppContext>();
    let notice_state = use_signal(|| None::<Notice>);
    let notice = use_context_provider(|| NoticeSlot(notice_state));
    let mut flow = use_signal(|| None::<OnboardingVm>);

    let services = ctx.onboarding_services();
    let resource = use_resource(move || {
        let services = services.clone();
        async move {
            let entry = services.profiles.entry_stage().await.map_err(|err| {
                warn!(error = %err, "failed to resolve onboarding entry stage");
                ViewError::from(&err)
            })?;
            flow.set(Some(OnboardingVm::new(services, entry)));
            Ok::<_, ViewError>(entry)
        }
    });

    let advance = use_callback(move |transition: StageTransition| {
        let mut guard = flow.write();
        let Some(vm) = guard.as_mut() else {
            return;
        };
        if let Err(err) = vm.apply(transition) {
            warn!(error = %err, "ignored onboarding transition");
        }
    });

    let current = flow.read().clone();
    let body = match (view_state_from_resource(resource), current) {
        (ViewState::Error(err), _) => rsx! {
            p { class: "error", "{err.message()}" }
        },
        (_, Some(vm)) => {
            let stage = vm.stage();
            let counter = stage.progress_step();
            let step = match stage {
                OnboardingStage::Splash => rsx! { SplashStep { flow: vm, on_complete: advance } },
                OnboardingStage::GoalsSelect => {
                    rsx! { GoalsSelectStep { flow: vm, on_complete: advance } }
                }
                OnboardingStage::GoalsRank => rsx! { GoalsRankStep { flow: vm, on_complete: advance } },
                OnboardingStage::Personality => {
                    rsx! { PersonalityStep { flow: vm, on_complete: advance } }
                }
                OnboardingStage::Interests => rsx! { InterestsStep { flow: vm, on_complete: advance } },
                OnboardingStage::Done => rsx! { DoneStep {} },
            };
            rsx! {
                if (1..=COUNTED_STAGES).contains(&counter) {
                    p { class: "stage-counter", "Step {counter} of {COUNTED_STAGES}" }
                }
                {step}
            }
        }
        (_, None) => rsx! {
            p { class: "loading", "Loading..." }
        },
    };

    rsx! {
        div { class: "page onboarding",
            NoticeBanner { slot: notice }
            {body}
        }
    }
}
