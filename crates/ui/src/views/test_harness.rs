use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use plan_core::model::{OnboardingStage, Session, StageTransition, UserId};
use plan_core::time::fixed_clock;
use services::{
    AppServices, AssessmentService, AuthService, GoalService, InterestService, ProfileService,
};
use storage::repository::{InMemoryRepository, Storage};

use crate::context::{AppContext, UiApp, build_app_context};
use crate::views::{
    GoalsRankStep, GoalsSelectStep, HomeView, InterestsStep, NoticeBanner, OnboardingView,
    PersonalityStep,
};
use crate::vm::{Notice, NoticeSlot, OnboardingVm};

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn auth(&self) -> Arc<AuthService> {
        self.services.auth()
    }

    fn profiles(&self) -> Arc<ProfileService> {
        self.services.profiles()
    }

    fn goals(&self) -> Arc<GoalService> {
        self.services.goals()
    }

    fn assessments(&self) -> Arc<AssessmentService> {
        self.services.assessments()
    }

    fn interests(&self) -> Arc<InterestService> {
        self.services.interests()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Onboarding,
    Home,
    /// A single onboarding stage mounted on its own.
    Stage(OnboardingStage),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Onboarding => rsx! { OnboardingView {} },
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Stage(stage) => rsx! { StageHost { stage } },
    }
}

#[component]
fn StageHost(stage: OnboardingStage) -> Element {
    let ctx = use_context::<AppContext>();
    let notice_state = use_signal(|| None::<Notice>);
    let notice = use_context_provider(|| NoticeSlot(notice_state));
    let flow = OnboardingVm::new(ctx.onboarding_services(), stage);
    let on_complete = move |_: StageTransition| {};

    let step = match stage {
        OnboardingStage::GoalsSelect => rsx! { GoalsSelectStep { flow, on_complete } },
        OnboardingStage::GoalsRank => rsx! { GoalsRankStep { flow, on_complete } },
        OnboardingStage::Personality => rsx! { PersonalityStep { flow, on_complete } },
        OnboardingStage::Interests => rsx! { InterestsStep { flow, on_complete } },
        OnboardingStage::Splash | OnboardingStage::Done => rsx! { OnboardingView {} },
    };
    rsx! {
        NoticeBanner { slot: notice }
        {step}
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub repo: InMemoryRepository,
    pub user: UserId,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        for _ in 0..3 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Harness over an in-memory store. `signed_in` controls whether a user session exists.
pub fn setup_view_harness(view: ViewKind, signed_in: bool) -> ViewHarness {
    let repo = InMemoryRepository::new();
    let user = UserId::random();
    if signed_in {
        repo.sign_in(Session::new(user, Some("dev@example.com".into())))
            .expect("sign in");
    }
    let storage = Storage::from_in_memory(&repo);
    let app = Arc::new(TestApp {
        services: AppServices::new(&storage, fixed_clock()),
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness { dom, repo, user }
}
