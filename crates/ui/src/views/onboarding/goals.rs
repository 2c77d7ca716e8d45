use dioxus::prelude::*;
use plan_core::model::{GoalSelection, RankedGoals, StageTransition};
use tracing::warn;

use super::{choice_class, continue_class};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{Notice, NoticeSlot, OnboardingVm, goal_rows, rank_rows};

#[component]
pub fn GoalsSelectStep(flow: OnboardingVm, on_complete: EventHandler<StageTransition>) -> Element {
    let notice = use_context::<NoticeSlot>();
    let mut selection = use_signal(GoalSelection::new);
    let mut saving = use_signal(|| false);

    let rows = goal_rows(&selection.read());
    let can_continue = !selection.read().is_empty() && !saving();

    rsx! {
        section { class: "onboarding-step goals-select",
            h2 { "What would you like to focus on?" }
            p { class: "hint", "Pick as many as you like." }
            ul { class: "choice-list",
                for row in rows {
                    li { key: "{row.id}",
                        button {
                            class: choice_class(row.selected),
                            onclick: move |_| {
                                if let Err(err) = selection.write().toggle(row.id) {
                                    warn!(error = %err, "goal toggle rejected");
                                }
                            },
                            "{row.label}"
                        }
                    }
                }
            }
            button {
                class: continue_class(can_continue),
                disabled: !can_continue,
                onclick: move |_| {
                    if saving() || selection.read().is_empty() {
                        return;
                    }
                    saving.set(true);
                    let flow = flow.clone();
                    let picked = selection.read().clone();
                    spawn(async move {
                        let result = flow.submit_goals(&picked).await;
                        saving.set(false);
                        match result {
                            Ok(transition) => {
                                notice.clear();
                                on_complete.call(transition);
                            }
                            Err(err) => {
                                warn!(error = %err, "goal selection not saved");
                                notice.show(Notice::from_error(&err));
                            }
                        }
                    });
                },
                if saving() { "Saving..." } else { "Continue" }
            }
        }
    }
}

#[component]
pub fn GoalsRankStep(flow: OnboardingVm, on_complete: EventHandler<StageTransition>) -> Element {
    let notice = use_context::<NoticeSlot>();
    let mut ranking = use_signal(|| None::<RankedGoals>);
    let mut saving = use_signal(|| false);

    let loader = {
        let flow = flow.clone();
        use_resource(move || {
            let flow = flow.clone();
            async move {
                let loaded = flow.load_ranking().await.map_err(|err| {
                    warn!(error = %err, "failed to load goals for ranking");
                    ViewError::from(&err)
                })?;
                ranking.set(Some(loaded));
                Ok::<_, ViewError>(())
            }
        })
    };

    let rows = ranking.read().as_ref().map(rank_rows).unwrap_or_default();
    let can_confirm = !rows.is_empty() && !saving();

    let list = match view_state_from_resource(loader) {
        ViewState::Error(err) => rsx! {
            p { class: "error", "{err.message()}" }
        },
        ViewState::Ready(()) => rsx! {
            ol { class: "rank-list",
                for row in rows {
                    li { key: "{row.label}", class: "rank-row",
                        span { class: "rank-position", "{row.position}" }
                        span { class: "rank-label", "{row.label}" }
                        button {
                            class: "rank-move",
                            disabled: !row.can_move_up,
                            onclick: move |_| {
                                if let Some(current) = ranking.write().as_mut() {
                                    if let Err(err) = current.move_up(row.index) {
                                        warn!(error = %err, "goal move rejected");
                                    }
                                }
                            },
                            "Move up"
                        }
                        button {
                            class: "rank-move",
                            disabled: !row.can_move_down,
                            onclick: move |_| {
                                if let Some(current) = ranking.write().as_mut() {
                                    if let Err(err) = current.move_down(row.index) {
                                        warn!(error = %err, "goal move rejected");
                                    }
                                }
                            },
                            "Move down"
                        }
                    }
                }
            }
        },
        ViewState::Idle | ViewState::Loading => rsx! {
            p { class: "loading", "Loading your goals..." }
        },
    };

    rsx! {
        section { class: "onboarding-step goals-rank",
            h2 { "Put them in order" }
            p { class: "hint", "Your top goal shapes the plans we suggest first." }
            {list}
            button {
                class: continue_class(can_confirm),
                disabled: !can_confirm,
                onclick: move |_| {
                    if saving() {
                        return;
                    }
                    let Some(current) = ranking.read().clone() else {
                        return;
                    };
                    saving.set(true);
                    let flow = flow.clone();
                    spawn(async move {
                        let result = flow.confirm_ranking(&current).await;
                        saving.set(false);
                        match result {
                            Ok(transition) => {
                                notice.clear();
                                on_complete.call(transition);
                            }
                            Err(err) => {
                                warn!(error = %err, "goal ranking not saved");
                                notice.show(Notice::from_error(&err));
                            }
                        }
                    });
                },
                if saving() { "Saving..." } else { "Confirm order" }
            }
        }
    }
}
