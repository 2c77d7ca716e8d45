mod assessment_vm;
mod choice_vm;
mod home_vm;
mod notice;
mod onboarding_vm;

pub use assessment_vm::{AdvanceOutcome, AdvanceStep, AssessmentVm, NOD_DURATION, NodTicket};
pub use choice_vm::{ChoiceRow, RankRow, goal_rows, interest_rows, rank_rows};
pub use home_vm::{HomeVm, map_home};
pub use notice::{Notice, NoticeSlot};
pub use onboarding_vm::{OnboardingServices, OnboardingVm};
