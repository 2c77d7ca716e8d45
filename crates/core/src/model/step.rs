/// One question of the personality assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub options: &'static [&'static str],
    /// Profile trait key the selected option is stored under.
    pub field: &'static str,
}

impl Step {
    /// Key the free-text note for this step is stored under.
    #[must_use]
    pub fn notes_key(&self) -> String {
        format!("{}_notes", self.field)
    }

    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|candidate| *candidate == option)
    }
}

pub const PERSONALITY_STEPS: &[Step] = &[
    Step {
        id: "social-energy",
        title: "How do you recharge?",
        description: "Think about a free evening after a long week.",
        options: &["Out with a group", "A mix of both", "Quiet time alone"],
        field: "social_energy",
    },
    Step {
        id: "planning-style",
        title: "How do you like to make plans?",
        description: "We use this to suggest when to reach out.",
        options: &["Spontaneous", "Loosely planned", "Scheduled well ahead"],
        field: "planning_style",
    },
    Step {
        id: "communication-style",
        title: "How do you prefer to keep in touch?",
        description: "Pick the one that feels most natural.",
        options: &["Texting", "Phone calls", "Meeting in person"],
        field: "communication_style",
    },
];

/// Ordered, read-only view over a fixed step list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRegistry {
    steps: &'static [Step],
}

impl StepRegistry {
    #[must_use]
    pub const fn new(steps: &'static [Step]) -> Self {
        Self { steps }
    }

    /// The personality assessment shared by the wizard, its views and services.
    #[must_use]
    pub const fn personality() -> Self {
        Self::new(PERSONALITY_STEPS)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'static Step> {
        self.steps.get(index)
    }

    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.steps.len().checked_sub(1)
    }

    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'static, Step> {
        self.steps.iter()
    }
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::personality()
    }
}
