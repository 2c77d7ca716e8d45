use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectionError {
    #[error("unknown choice: {0}")]
    Unknown(String),

    #[error("at least one choice is required")]
    Empty,

    #[error("position {index} is out of range for {len} goals")]
    OutOfRange { index: usize, len: usize },
}

/// A goal the user can pick during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalOption {
    pub id: &'static str,
    pub label: &'static str,
}

pub const GOAL_CATALOG: &[GoalOption] = &[
    GoalOption {
        id: "reconnect",
        label: "Reconnect with old friends",
    },
    GoalOption {
        id: "meet-new-people",
        label: "Meet new people",
    },
    GoalOption {
        id: "family-time",
        label: "Spend more time with family",
    },
    GoalOption {
        id: "plan-more",
        label: "Plan more get-togethers",
    },
    GoalOption {
        id: "deepen-friendships",
        label: "Deepen close friendships",
    },
    GoalOption {
        id: "stay-in-touch",
        label: "Stay in touch with long-distance friends",
    },
];

/// Persisted goal. `priority` is 1-based; 1 is the most important.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub label: String,
    pub priority: u32,
}

fn catalog_option(id: &str) -> Option<&'static GoalOption> {
    GOAL_CATALOG.iter().find(|option| option.id == id)
}

fn prioritized(options: &[&'static GoalOption]) -> Vec<Goal> {
    options
        .iter()
        .zip(1_u32..)
        .map(|(option, priority)| Goal {
            id: option.id.to_owned(),
            label: option.label.to_owned(),
            priority,
        })
        .collect()
}

/// Goals picked on the selection screen, in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalSelection {
    chosen: Vec<&'static GoalOption>,
}

impl GoalSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the goal if absent, remove it if present.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::Unknown` if `id` is not in the catalog.
    pub fn toggle(&mut self, id: &str) -> Result<bool, SelectionError> {
        let option = catalog_option(id).ok_or_else(|| SelectionError::Unknown(id.to_owned()))?;
        if let Some(pos) = self.chosen.iter().position(|chosen| chosen.id == id) {
            self.chosen.remove(pos);
            Ok(false)
        } else {
            self.chosen.push(option);
            Ok(true)
        }
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.chosen.iter().any(|chosen| chosen.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    /// Raw goal list in pick order.
    #[must_use]
    pub fn to_goals(&self) -> Vec<Goal> {
        prioritized(&self.chosen)
    }

    /// Start ranking from the current pick order.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::Empty` when nothing was picked.
    pub fn into_ranking(self) -> Result<RankedGoals, SelectionError> {
        if self.chosen.is_empty() {
            return Err(SelectionError::Empty);
        }
        Ok(RankedGoals { order: self.chosen })
    }
}

/// Goals being reordered on the ranking screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedGoals {
    order: Vec<&'static GoalOption>,
}

impl RankedGoals {
    /// Rebuild a ranking from persisted goals, ordered by priority.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::Empty` for no goals and
    /// `SelectionError::Unknown` for ids missing from the catalog.
    pub fn from_goals(goals: &[Goal]) -> Result<Self, SelectionError> {
        let mut sorted: Vec<&Goal> = goals.iter().collect();
        sorted.sort_by_key(|goal| goal.priority);
        let order = sorted
            .into_iter()
            .map(|goal| {
                catalog_option(&goal.id).ok_or_else(|| SelectionError::Unknown(goal.id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if order.is_empty() {
            return Err(SelectionError::Empty);
        }
        Ok(Self { order })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().map(|option| option.label)
    }

    /// Swap the goal at `index` with the one above it. No-op at the top.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::OutOfRange` for an invalid `index`.
    pub fn move_up(&mut self, index: usize) -> Result<(), SelectionError> {
        self.check(index)?;
        if index > 0 {
            self.order.swap(index - 1, index);
        }
        Ok(())
    }

    /// Swap the goal at `index` with the one below it. No-op at the bottom.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::OutOfRange` for an invalid `index`.
    pub fn move_down(&mut self, index: usize) -> Result<(), SelectionError> {
        self.check(index)?;
        if index + 1 < self.order.len() {
            self.order.swap(index, index + 1);
        }
        Ok(())
    }

    #[must_use]
    pub fn to_goals(&self) -> Vec<Goal> {
        prioritized(&self.order)
    }

    fn check(&self, index: usize) -> Result<(), SelectionError> {
        if index < self.order.len() {
            Ok(())
        } else {
            Err(SelectionError::OutOfRange {
                index,
                len: self.order.len(),
            })
        }
    }
}
