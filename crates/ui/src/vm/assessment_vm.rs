use std::time::Duration;

use plan_core::model::{
    AssessmentError, AssessmentRecord, AssessmentState, Step, StepMove, StepRegistry,
};
use services::{AssessmentService, OnboardingError};

/// How long the acknowledgement animation stays up after an option is picked.
pub const NOD_DURATION: Duration = Duration::from_millis(600);

/// Identifies one raise of the nodding flag. Only the newest ticket clears it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodTicket(u64);

/// Synchronous half of the continue action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdvanceStep {
    /// The current step has no answer yet.
    Blocked,
    /// A submit is already outstanding.
    Busy,
    Moved(usize),
    /// The final step was answered; persist this record.
    Submit(AssessmentRecord),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Blocked,
    Busy,
    Moved(usize),
    Completed(AssessmentRecord),
}

/// Personality assessment wizard state for one mount of the screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssessmentVm {
    state: AssessmentState,
    nod_seq: u64,
    nodding: bool,
    in_flight: bool,
}

impl AssessmentVm {
    #[must_use]
    pub fn new(registry: StepRegistry) -> Self {
        Self {
            state: AssessmentState::new(registry),
            nod_seq: 0,
            nodding: false,
            in_flight: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> &AssessmentState {
        &self.state
    }

    #[must_use]
    pub fn step(&self) -> Option<&'static Step> {
        self.state.current_step()
    }

    #[must_use]
    pub fn progress_label(&self) -> String {
        let total = self.state.registry().len();
        let current = (self.state.current_index() + 1).min(total);
        format!("Question {current} of {total}")
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.step().and_then(|step| self.state.answer(step.field))
    }

    #[must_use]
    pub fn note(&self) -> &str {
        self.step()
            .and_then(|step| self.state.note(&step.notes_key()))
            .unwrap_or("")
    }

    #[must_use]
    pub fn is_nodding(&self) -> bool {
        self.nodding
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    #[must_use]
    pub fn can_continue(&self) -> bool {
        !self.in_flight && self.state.can_advance()
    }

    #[must_use]
    pub fn continue_label(&self) -> &'static str {
        if self.in_flight {
            "Saving..."
        } else if self.state.is_last_step() {
            "Finish"
        } else {
            "Continue"
        }
    }

    /// Record `option` for the current step and raise the nodding flag.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::UnknownOption` if `option` is not offered by
    /// the current step.
    pub fn select_option(&mut self, option: &str) -> Result<NodTicket, AssessmentError> {
        self.state.select_option(option)?;
        self.nod_seq += 1;
        self.nodding = true;
        Ok(NodTicket(self.nod_seq))
    }

    /// Lower the nodding flag if `ticket` is the latest one handed out.
    pub fn clear_nod(&mut self, ticket: NodTicket) {
        if ticket.0 == self.nod_seq {
            self.nodding = false;
        }
    }

    /// # Errors
    ///
    /// Returns `AssessmentError::NoSteps` for an empty registry.
    pub fn set_note(&mut self, text: impl Into<String>) -> Result<(), AssessmentError> {
        self.state.set_note(text)
    }

    /// Move to the next step, or hand back the record to persist on the last one.
    ///
    /// Returning `Submit` marks a request as in flight until `finish_submit`.
    pub fn begin_advance(&mut self) -> AdvanceStep {
        if self.in_flight {
            return AdvanceStep::Busy;
        }
        match self.state.step_forward() {
            StepMove::Blocked => AdvanceStep::Blocked,
            StepMove::Moved(index) => AdvanceStep::Moved(index),
            StepMove::Final => match self.state.assemble_record() {
                Ok(record) => {
                    self.in_flight = true;
                    AdvanceStep::Submit(record)
                }
                Err(_) => AdvanceStep::Blocked,
            },
        }
    }

    /// Settle the outstanding submit. Answers and notes are kept either way.
    ///
    /// # Errors
    ///
    /// Passes the submit failure through so the caller can notify.
    pub fn finish_submit(
        &mut self,
        record: AssessmentRecord,
        result: Result<(), OnboardingError>,
    ) -> Result<AssessmentRecord, OnboardingError> {
        self.in_flight = false;
        result.map(|()| record)
    }

    /// Run the whole continue action against `service`.
    ///
    /// Holds `&mut self` across the await, so views use the two halves instead.
    ///
    /// # Errors
    ///
    /// Returns the `OnboardingError` of a failed submit; state stays as it was.
    pub async fn advance(
        &mut self,
        service: &AssessmentService,
    ) -> Result<AdvanceOutcome, OnboardingError> {
        match self.begin_advance() {
            AdvanceStep::Blocked => Ok(AdvanceOutcome::Blocked),
            AdvanceStep::Busy => Ok(AdvanceOutcome::Busy),
            AdvanceStep::Moved(index) => Ok(AdvanceOutcome::Moved(index)),
            AdvanceStep::Submit(record) => {
                let result = service.submit(&record).await;
                self.finish_submit(record, result)
                    .map(AdvanceOutcome::Completed)
            }
        }
    }
}
