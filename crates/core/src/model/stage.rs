//! Onboarding stages and the transition table between them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Named phases of onboarding, in the only order they can be visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OnboardingStage {
    #[default]
    Splash,
    GoalsSelect,
    GoalsRank,
    Personality,
    Interests,
    Done,
}

/// Event that completes the current stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageTrigger {
    Acknowledged,
    GoalsChosen,
    RankingConfirmed,
    AssessmentPersisted,
    InterestsPersisted,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StageError {
    #[error("{trigger:?} does not complete the {stage} stage")]
    UnexpectedTrigger {
        stage: OnboardingStage,
        trigger: StageTrigger,
    },

    #[error("onboarding is already done")]
    AlreadyDone,

    #[error("transition {from} -> {to} does not start at the current stage {current}")]
    Stale {
        current: OnboardingStage,
        from: OnboardingStage,
        to: OnboardingStage,
    },
}

/// A validated move from one stage to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTransition {
    pub from: OnboardingStage,
    pub to: OnboardingStage,
}

impl OnboardingStage {
    pub const ALL: [OnboardingStage; 6] = [
        Self::Splash,
        Self::GoalsSelect,
        Self::GoalsRank,
        Self::Personality,
        Self::Interests,
        Self::Done,
    ];

    #[must_use]
    pub fn next(&self) -> Option<OnboardingStage> {
        match self {
            Self::Splash => Some(Self::GoalsSelect),
            Self::GoalsSelect => Some(Self::GoalsRank),
            Self::GoalsRank => Some(Self::Personality),
            Self::Personality => Some(Self::Interests),
            Self::Interests => Some(Self::Done),
            Self::Done => None,
        }
    }

    #[must_use]
    pub fn can_transition_to(&self, target: OnboardingStage) -> bool {
        self.next() == Some(target)
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// The trigger that completes this stage, if any.
    #[must_use]
    pub fn completing_trigger(&self) -> Option<StageTrigger> {
        match self {
            Self::Splash => Some(StageTrigger::Acknowledged),
            Self::GoalsSelect => Some(StageTrigger::GoalsChosen),
            Self::GoalsRank => Some(StageTrigger::RankingConfirmed),
            Self::Personality => Some(StageTrigger::AssessmentPersisted),
            Self::Interests => Some(StageTrigger::InterestsPersisted),
            Self::Done => None,
        }
    }

    /// Value of the profile's `onboarding_step` counter once this stage is reached.
    #[must_use]
    pub fn progress_step(&self) -> u32 {
        match self {
            Self::Splash => 0,
            Self::GoalsSelect => 1,
            Self::GoalsRank => 2,
            Self::Personality => 3,
            Self::Interests => 4,
            Self::Done => 5,
        }
    }

    /// Validate `trigger` against this stage and describe the resulting move.
    ///
    /// # Errors
    ///
    /// Returns `StageError::AlreadyDone` from `Done` and
    /// `StageError::UnexpectedTrigger` when `trigger` belongs to another stage.
    pub fn transition(&self, trigger: StageTrigger) -> Result<StageTransition, StageError> {
        let expected = self.completing_trigger().ok_or(StageError::AlreadyDone)?;
        if expected != trigger {
            return Err(StageError::UnexpectedTrigger {
                stage: *self,
                trigger,
            });
        }
        let to = self.next().ok_or(StageError::AlreadyDone)?;
        Ok(StageTransition { from: *self, to })
    }
}

impl std::fmt::Display for OnboardingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Splash => "splash",
            Self::GoalsSelect => "goals-select",
            Self::GoalsRank => "goals-rank",
            Self::Personality => "personality",
            Self::Interests => "interests",
            Self::Done => "done",
        };
        write!(f, "{s}")
    }
}

impl StageTransition {
    /// Apply this move to `current`, rejecting it if the stage moved on meanwhile.
    ///
    /// # Errors
    ///
    /// Returns `StageError::Stale` when `current` is not `self.from`.
    pub fn apply(&self, current: &mut OnboardingStage) -> Result<OnboardingStage, StageError> {
        if *current != self.from || !self.from.can_transition_to(self.to) {
            return Err(StageError::Stale {
                current: *current,
                from: self.from,
                to: self.to,
            });
        }
        *current = self.to;
        Ok(self.to)
    }
}
