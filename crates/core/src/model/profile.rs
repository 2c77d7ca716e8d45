use serde::{Deserialize, Serialize};

use super::goal::Goal;
use super::ids::UserId;

/// Remote profile aggregate, as far as onboarding reads and writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub onboarding_step: u32,
    #[serde(default)]
    pub onboarding_completed: bool,
    #[serde(default)]
    pub personality_traits: Option<serde_json::Value>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

impl Profile {
    #[must_use]
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            phone_number: None,
            onboarding_step: 0,
            onboarding_completed: false,
            personality_traits: None,
            interests: Vec::new(),
            goals: Vec::new(),
        }
    }

    /// Copy of this profile with every field outside `fields` reset to its default.
    #[must_use]
    pub fn project(&self, fields: &[ProfileField]) -> Self {
        let mut out = Self::empty(self.user_id);
        for field in fields {
            match field {
                ProfileField::PhoneNumber => out.phone_number.clone_from(&self.phone_number),
                ProfileField::OnboardingStep => out.onboarding_step = self.onboarding_step,
                ProfileField::OnboardingCompleted => {
                    out.onboarding_completed = self.onboarding_completed;
                }
                ProfileField::PersonalityTraits => {
                    out.personality_traits.clone_from(&self.personality_traits);
                }
                ProfileField::Interests => out.interests.clone_from(&self.interests),
                ProfileField::Goals => out.goals.clone_from(&self.goals),
            }
        }
        out
    }
}

/// Selectable profile columns for `get_profile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    PhoneNumber,
    OnboardingStep,
    OnboardingCompleted,
    PersonalityTraits,
    Interests,
    Goals,
}

impl ProfileField {
    pub const ALL: [ProfileField; 6] = [
        Self::PhoneNumber,
        Self::OnboardingStep,
        Self::OnboardingCompleted,
        Self::PersonalityTraits,
        Self::Interests,
        Self::Goals,
    ];

    #[must_use]
    pub fn column(&self) -> &'static str {
        match self {
            Self::PhoneNumber => "phone_number",
            Self::OnboardingStep => "onboarding_step",
            Self::OnboardingCompleted => "onboarding_completed",
            Self::PersonalityTraits => "personality_traits",
            Self::Interests => "interests",
            Self::Goals => "goals",
        }
    }
}

/// Partial profile write. Only `Some` fields are sent; the rest are left as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarding_step: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarding_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personality_traits: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<Goal>>,
}

impl ProfileUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_onboarding_step(mut self, step: u32) -> Self {
        self.onboarding_step = Some(step);
        self
    }

    #[must_use]
    pub fn with_onboarding_completed(mut self, completed: bool) -> Self {
        self.onboarding_completed = Some(completed);
        self
    }

    #[must_use]
    pub fn with_personality_traits(mut self, traits: serde_json::Value) -> Self {
        self.personality_traits = Some(traits);
        self
    }

    #[must_use]
    pub fn with_interests(mut self, interests: Vec<String>) -> Self {
        self.interests = Some(interests);
        self
    }

    #[must_use]
    pub fn with_goals(mut self, goals: Vec<Goal>) -> Self {
        self.goals = Some(goals);
        self
    }

    #[must_use]
    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    #[must_use]
    pub fn marks_complete(&self) -> bool {
        self.onboarding_completed == Some(true)
    }

    /// Merge this update into `profile`, last write wins per field.
    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(phone_number) = &self.phone_number {
            profile.phone_number = Some(phone_number.clone());
        }
        if let Some(step) = self.onboarding_step {
            profile.onboarding_step = step;
        }
        if let Some(completed) = self.onboarding_completed {
            profile.onboarding_completed = completed;
        }
        if let Some(traits) = &self.personality_traits {
            profile.personality_traits = Some(traits.clone());
        }
        if let Some(interests) = &self.interests {
            profile.interests.clone_from(interests);
        }
        if let Some(goals) = &self.goals {
            profile.goals.clone_from(goals);
        }
    }
}
