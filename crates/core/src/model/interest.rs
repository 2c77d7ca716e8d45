use super::goal::SelectionError;

pub const INTEREST_CATALOG: &[&str] = &[
    "Hiking",
    "Board games",
    "Live music",
    "Cooking",
    "Coffee chats",
    "Sports",
    "Movies",
    "Art & museums",
];

/// Interests picked on the last onboarding screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterestSelection {
    chosen: Vec<&'static str>,
}

impl InterestSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `SelectionError::Unknown` if `interest` is not in the catalog.
    pub fn toggle(&mut self, interest: &str) -> Result<bool, SelectionError> {
        let known = INTEREST_CATALOG
            .iter()
            .find(|candidate| **candidate == interest)
            .ok_or_else(|| SelectionError::Unknown(interest.to_owned()))?;
        if let Some(pos) = self.chosen.iter().position(|chosen| chosen == known) {
            self.chosen.remove(pos);
            Ok(false)
        } else {
            self.chosen.push(*known);
            Ok(true)
        }
    }

    #[must_use]
    pub fn contains(&self, interest: &str) -> bool {
        self.chosen.iter().any(|chosen| *chosen == interest)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.chosen.iter().map(|interest| (*interest).to_owned()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_known_interests() {
        let mut selection = InterestSelection::new();
        assert!(selection.toggle("Hiking").unwrap());
        assert!(selection.toggle("Cooking").unwrap());
        assert!(!selection.toggle("Hiking").unwrap());
        assert_eq!(selection.to_vec(), vec!["Cooking".to_string()]);
    }

    #[test]
    fn rejects_unknown_interest() {
        let mut selection = InterestSelection::new();
        assert!(selection.toggle("Competitive napping").is_err());
        assert!(selection.is_empty());
    }
}
