use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::step::{Step, StepRegistry};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AssessmentError {
    #[error("assessment has no steps")]
    NoSteps,

    #[error("{option:?} is not an option for {field}")]
    UnknownOption { field: &'static str, option: String },

    #[error("{field} has not been answered")]
    Unanswered { field: &'static str },
}

/// One answered step inside an assembled record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitAnswer {
    pub field: String,
    pub answer: String,
    pub notes: String,
}

/// Complete set of answers sent to the remote store when the assessment ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    answers: Vec<TraitAnswer>,
}

impl AssessmentRecord {
    #[must_use]
    pub fn new(answers: Vec<TraitAnswer>) -> Self {
        Self { answers }
    }

    #[must_use]
    pub fn answers(&self) -> &[TraitAnswer] {
        &self.answers
    }

    #[must_use]
    pub fn answer(&self, field: &str) -> Option<&TraitAnswer> {
        self.answers.iter().find(|entry| entry.field == field)
    }

    /// Flattened `field` / `field_notes` columns, the shape of a stored row.
    #[must_use]
    pub fn columns(&self) -> BTreeMap<String, String> {
        let mut columns = BTreeMap::new();
        for entry in &self.answers {
            columns.insert(entry.field.clone(), entry.answer.clone());
            columns.insert(format!("{}_notes", entry.field), entry.notes.clone());
        }
        columns
    }

    /// Rebuild a record from flattened columns, in registry order.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::Unanswered` if a step's column is missing or empty.
    pub fn from_columns(
        registry: StepRegistry,
        columns: &BTreeMap<String, String>,
    ) -> Result<Self, AssessmentError> {
        let answers = registry
            .iter()
            .map(|step| {
                let answer = columns
                    .get(step.field)
                    .filter(|answer| !answer.is_empty())
                    .ok_or(AssessmentError::Unanswered { field: step.field })?;
                Ok(TraitAnswer {
                    field: step.field.to_owned(),
                    answer: answer.clone(),
                    notes: columns.get(&step.notes_key()).cloned().unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, AssessmentError>>()?;
        Ok(Self { answers })
    }

    /// Personality traits object written to the profile aggregate.
    #[must_use]
    pub fn traits_json(&self) -> serde_json::Value {
        let map = self
            .columns()
            .into_iter()
            .map(|(key, value)| (key, serde_json::Value::String(value)))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

/// Result of asking the state to move past the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMove {
    /// Current step is unanswered; nothing changed.
    Blocked,
    /// Moved to the step at this index.
    Moved(usize),
    /// Already on the last step and it is answered; the record is ready to send.
    Final,
}

/// Local answers of one assessment mount. Nothing here is persisted until the
/// final step is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentState {
    registry: StepRegistry,
    current_index: usize,
    answers: BTreeMap<&'static str, String>,
    notes: BTreeMap<String, String>,
}

impl AssessmentState {
    #[must_use]
    pub fn new(registry: StepRegistry) -> Self {
        Self {
            registry,
            current_index: 0,
            answers: BTreeMap::new(),
            notes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn registry(&self) -> StepRegistry {
        self.registry
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_step(&self) -> Option<&'static Step> {
        self.registry.get(self.current_index)
    }

    #[must_use]
    pub fn is_last_step(&self) -> bool {
        self.registry.last_index() == Some(self.current_index)
    }

    #[must_use]
    pub fn answer(&self, field: &str) -> Option<&str> {
        self.answers.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn note(&self, notes_key: &str) -> Option<&str> {
        self.notes.get(notes_key).map(String::as_str)
    }

    /// Record `option` for the current step. Later selections overwrite earlier ones.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::NoSteps` for an empty registry and
    /// `AssessmentError::UnknownOption` if the step does not offer `option`.
    pub fn select_option(&mut self, option: &str) -> Result<(), AssessmentError> {
        let step = self.current_step().ok_or(AssessmentError::NoSteps)?;
        if !step.has_option(option) {
            return Err(AssessmentError::UnknownOption {
                field: step.field,
                option: option.to_owned(),
            });
        }
        self.answers.insert(step.field, option.to_owned());
        Ok(())
    }

    /// Record free text for the current step.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::NoSteps` for an empty registry.
    pub fn set_note(&mut self, text: impl Into<String>) -> Result<(), AssessmentError> {
        let step = self.current_step().ok_or(AssessmentError::NoSteps)?;
        self.notes.insert(step.notes_key(), text.into());
        Ok(())
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.current_step()
            .and_then(|step| self.answer(step.field))
            .is_some_and(|answer| !answer.is_empty())
    }

    pub fn step_forward(&mut self) -> StepMove {
        if !self.can_advance() {
            return StepMove::Blocked;
        }
        if self.is_last_step() {
            return StepMove::Final;
        }
        self.current_index += 1;
        StepMove::Moved(self.current_index)
    }

    /// Build the record for every step. Notes that were never set become `""`.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::Unanswered` naming the first step without an answer.
    pub fn assemble_record(&self) -> Result<AssessmentRecord, AssessmentError> {
        if self.registry.is_empty() {
            return Err(AssessmentError::NoSteps);
        }
        let mut answers = Vec::with_capacity(self.registry.len());
        for step in self.registry.iter() {
            let answer = self
                .answer(step.field)
                .filter(|answer| !answer.is_empty())
                .ok_or(AssessmentError::Unanswered { field: step.field })?;
            let notes = self.note(&step.notes_key()).unwrap_or_default();
            answers.push(TraitAnswer {
                field: step.field.to_owned(),
                answer: answer.to_owned(),
                notes: notes.to_owned(),
            });
        }
        Ok(AssessmentRecord::new(answers))
    }
}
