//! Verification session state machine.
//!
//! The session is pure state: it validates input, hands out [`Ticket`]s for
//! operations that have to leave the session (the NIN lookup, the biometric
//! confirmation, a delayed BVN check) and applies their results when they come
//! back. Every step transition bumps the session generation, so a result
//! carrying an older ticket is recognised as stale and dropped.

use std::collections::VecDeque;

use idcheck_types::{PrimaryId, Record, SecondaryId};
use tracing::{debug, info, warn};

use crate::confirm::ConfirmationError;
use crate::display::RecordSummary;
use crate::error::FlowError;
use crate::lookup::LookupError;
use crate::notice::Notice;
use crate::step::Step;

/// Identifies one outstanding operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    step: Step,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The step that issued this ticket.
    pub fn step(&self) -> Step {
        self.step
    }
}

/// A lookup the caller must perform and feed back via [`Session::resolve_primary`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingLookup {
    pub ticket: Ticket,
    pub primary_id: PrimaryId,
}

/// What happened when an operation result was applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The session moved to this step.
    Advanced(Step),
    /// The session stayed put and recorded this error.
    Failed(FlowError),
    /// The ticket no longer matches the session; nothing changed.
    Stale,
}

impl Resolution {
    pub fn is_advanced(&self) -> bool {
        matches!(self, Self::Advanced(_))
    }
}

/// Most notices kept between drains; older ones are dropped first.
pub const MAX_NOTICES: usize = 16;

/// Transient state of one verification attempt.
#[derive(Clone, Debug, Default)]
pub struct Session {
    step: Step,
    entered_primary_id: String,
    entered_secondary_id: String,
    matched_record: Option<Record>,
    last_error: Option<FlowError>,
    generation: u64,
    in_flight: Option<Ticket>,
    notices: VecDeque<Notice>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn entered_primary_id(&self) -> &str {
        &self.entered_primary_id
    }

    pub fn entered_secondary_id(&self) -> &str {
        &self.entered_secondary_id
    }

    pub fn matched_record(&self) -> Option<&Record> {
        self.matched_record.as_ref()
    }

    pub fn last_error(&self) -> Option<&FlowError> {
        self.last_error.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether an operation for the current step is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Take all queued notices, oldest first.
    ///
    /// Callers that never drain only ever see the last [`MAX_NOTICES`].
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// The result screen, available once the session is complete.
    pub fn summary(&self) -> Option<RecordSummary<'_>> {
        match (self.step, &self.matched_record) {
            (Step::Complete, Some(record)) => Some(RecordSummary::new(record)),
            _ => None,
        }
    }

    // ── Step 1: primary id ──────────────────────────────────────────────

    /// Validate a NIN and open a lookup for it.
    ///
    /// Malformed input is recorded as `InvalidFormat` and no lookup is issued.
    pub fn begin_primary(&mut self, input: &str) -> Result<PendingLookup, FlowError> {
        self.guard(Step::CollectingPrimaryId, "submit NIN")?;
        self.last_error = None;
        self.entered_primary_id = input.to_owned();

        let primary_id = match PrimaryId::parse(input) {
            Ok(id) => id,
            Err(e) => return Err(self.record_failure(e.into())),
        };
        let ticket = self.issue_ticket();
        debug!(generation = ticket.generation, "NIN lookup issued");
        Ok(PendingLookup { ticket, primary_id })
    }

    /// Apply the lookup result for `ticket`.
    pub fn resolve_primary(
        &mut self,
        ticket: Ticket,
        outcome: Result<Option<Record>, LookupError>,
    ) -> Resolution {
        if !self.accepts(ticket) {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "dropping stale NIN lookup result"
            );
            return Resolution::Stale;
        }
        self.in_flight = None;

        match outcome {
            Ok(Some(record)) if record.primary_id.as_str() == self.entered_primary_id => {
                self.matched_record = Some(record);
                self.notify(Notice::success(
                    "NIN Verified",
                    "Your NIN has been successfully verified.",
                ));
                self.advance(Step::CollectingSecondaryId)
            }
            Ok(Some(record)) => {
                warn!(
                    requested = %self.entered_primary_id,
                    returned = %record.primary_id,
                    "lookup returned a record for a different NIN"
                );
                self.fail(FlowError::TransportFailure(
                    "lookup returned a record for a different NIN".into(),
                ))
            }
            Ok(None) => self.fail(FlowError::NotFound),
            Err(e) => {
                warn!(error = %e, "NIN lookup could not complete");
                self.fail(FlowError::TransportFailure(e.to_string()))
            }
        }
    }

    // ── Step 2: secondary id ────────────────────────────────────────────

    /// Validate a BVN and compare it against the bound record immediately.
    pub fn submit_secondary(&mut self, input: &str) -> Result<Resolution, FlowError> {
        let ticket = self.begin_secondary(input)?;
        Ok(self.resolve_secondary(ticket))
    }

    /// Validate a BVN and hold the comparison open until
    /// [`resolve_secondary`](Self::resolve_secondary), for callers that
    /// simulate a check delay.
    pub fn begin_secondary(&mut self, input: &str) -> Result<Ticket, FlowError> {
        self.guard(Step::CollectingSecondaryId, "submit BVN")?;
        self.last_error = None;
        self.entered_secondary_id = input.to_owned();

        if let Err(e) = SecondaryId::parse(input) {
            return Err(self.record_failure(e.into()));
        }
        Ok(self.issue_ticket())
    }

    pub fn resolve_secondary(&mut self, ticket: Ticket) -> Resolution {
        if !self.accepts(ticket) {
            debug!(ticket = ticket.generation, "dropping stale BVN check");
            return Resolution::Stale;
        }
        self.in_flight = None;

        let matches = match (
            SecondaryId::parse(&self.entered_secondary_id),
            &self.matched_record,
        ) {
            (Ok(candidate), Some(record)) => record.secondary_matches(&candidate),
            _ => false,
        };
        if !matches {
            return self.fail(FlowError::Mismatch);
        }
        self.notify(Notice::success(
            "BVN Verified",
            "Your BVN has been successfully verified.",
        ));
        self.advance(Step::BiometricCheck)
    }

    // ── Step 3: biometric confirmation ──────────────────────────────────

    pub fn begin_confirmation(&mut self) -> Result<Ticket, FlowError> {
        self.guard(Step::BiometricCheck, "confirm")?;
        self.last_error = None;
        Ok(self.issue_ticket())
    }

    pub fn resolve_confirmation(
        &mut self,
        ticket: Ticket,
        outcome: Result<(), ConfirmationError>,
    ) -> Resolution {
        if !self.accepts(ticket) {
            debug!(ticket = ticket.generation, "dropping stale confirmation");
            return Resolution::Stale;
        }
        self.in_flight = None;

        match outcome {
            Ok(()) => {
                self.notify(Notice::success(
                    "Biometric Verified",
                    "Your fingerprint has been successfully verified.",
                ));
                self.advance(Step::Complete)
            }
            Err(e) => self.fail(FlowError::ConfirmationFailed(e.to_string())),
        }
    }

    // ── Navigation ──────────────────────────────────────────────────────

    /// Return to the previous step, abandoning anything in flight.
    ///
    /// Entered values are kept. Going back to the first step unbinds the record.
    pub fn back(&mut self) -> Result<Step, FlowError> {
        let previous = self.step.previous().ok_or(FlowError::InvalidAction {
            action: "back",
            step: self.step,
        })?;
        self.last_error = None;
        if previous == Step::CollectingPrimaryId {
            self.matched_record = None;
        }
        self.transition(previous);
        Ok(previous)
    }

    /// Start over from the terminal step with everything cleared.
    pub fn restart(&mut self) -> Result<(), FlowError> {
        if self.step != Step::Complete {
            return Err(FlowError::InvalidAction {
                action: "restart",
                step: self.step,
            });
        }
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::default()
        };
        info!("verification session restarted");
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn guard(&self, expected: Step, action: &'static str) -> Result<(), FlowError> {
        if self.step != expected {
            return Err(FlowError::InvalidAction {
                action,
                step: self.step,
            });
        }
        if self.in_flight.is_some() {
            return Err(FlowError::Busy(self.step));
        }
        Ok(())
    }

    fn issue_ticket(&mut self) -> Ticket {
        let ticket = Ticket {
            generation: self.generation,
            step: self.step,
        };
        self.in_flight = Some(ticket);
        ticket
    }

    fn accepts(&self, ticket: Ticket) -> bool {
        self.in_flight == Some(ticket)
            && ticket.generation == self.generation
            && ticket.step == self.step
    }

    fn transition(&mut self, to: Step) {
        debug!(from = %self.step, to = %to, "step transition");
        self.step = to;
        self.generation += 1;
        self.in_flight = None;
    }

    fn advance(&mut self, to: Step) -> Resolution {
        self.transition(to);
        Resolution::Advanced(to)
    }

    fn notify(&mut self, notice: Notice) {
        if self.notices.len() == MAX_NOTICES {
            self.notices.pop_front();
        }
        self.notices.push_back(notice);
    }

    fn record_failure(&mut self, error: FlowError) -> FlowError {
        info!(step = %self.step, error = %error, "verification step failed");
        self.notify(Notice::failure(error.user_message()));
        self.last_error = Some(error.clone());
        error
    }

    fn fail(&mut self, error: FlowError) -> Resolution {
        Resolution::Failed(self.record_failure(error))
    }
}
