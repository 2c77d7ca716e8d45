mod assessment;
mod goal;
mod ids;
mod interest;
mod profile;
mod session;
mod stage;
mod step;

pub use assessment::{AssessmentError, AssessmentRecord, AssessmentState, StepMove, TraitAnswer};
pub use goal::{GOAL_CATALOG, Goal, GoalOption, GoalSelection, RankedGoals, SelectionError};
pub use ids::{ParseIdError, UserId};
pub use interest::{INTEREST_CATALOG, InterestSelection};
pub use profile::{Profile, ProfileField, ProfileUpdate};
pub use session::{AuthEvent, Session};
pub use stage::{OnboardingStage, StageError, StageTransition, StageTrigger};
pub use step::{PERSONALITY_STEPS, Step, StepRegistry};
