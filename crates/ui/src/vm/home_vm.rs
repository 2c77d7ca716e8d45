use plan_core::model::Profile;

/// What the home screen shows once onboarding is done.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HomeVm {
    pub onboarding_completed: bool,
    /// Goal labels, highest priority first.
    pub goals: Vec<String>,
    pub interests: Vec<String>,
}

#[must_use]
pub fn map_home(profile: Option<&Profile>) -> HomeVm {
    let Some(profile) = profile else {
        return HomeVm {
            onboarding_completed: false,
            goals: Vec::new(),
            interests: Vec::new(),
        };
    };
    let mut goals = profile.goals.clone();
    goals.sort_by_key(|goal| goal.priority);
    HomeVm {
        onboarding_completed: profile.onboarding_completed,
        goals: goals.into_iter().map(|goal| goal.label).collect(),
        interests: profile.interests.clone(),
    }
}

#[cfg(test)]
mod tests {
    use plan_core::model::{Goal, UserId};

    use super::*;

    #[test]
    fn goals_are_listed_by_priority() {
        let mut profile = Profile::empty(UserId::random());
        profile.onboarding_completed = true;
        profile.goals = vec![
            Goal {
                id: "plan-more".into(),
                label: "Plan more get-togethers".into(),
                priority: 2,
            },
            Goal {
                id: "reconnect".into(),
                label: "Reconnect with old friends".into(),
                priority: 1,
            },
        ];
        let vm = map_home(Some(&profile));
        assert_eq!(vm.goals, ["Reconnect with old friends", "Plan more get-togethers"]);
    }

    #[test]
    fn missing_profile_is_not_complete() {
        assert!(!map_home(None).onboarding_completed);
    }
}
