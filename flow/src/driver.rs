//! Async driver pairing a [`Session`] with its lookup backend and confirmer.
//!
//! Each step's operation can be run in one call (`submit_*`,
//! `confirm_biometric`) or split into `start_*`, awaiting the returned
//! [`InFlight`], and [`finish`](VerificationFlow::finish). The split form is
//! what lets a front end keep accepting `back` while a check is outstanding:
//! an [`InFlight`] owns everything it needs, so the flow stays free to
//! navigate, and a result that arrives afterwards resolves as stale.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use idcheck_types::Record;

use crate::confirm::{ConfirmationError, Confirmer};
use crate::error::FlowError;
use crate::lookup::{LookupError, RecordLookup};
use crate::session::{Resolution, Session, Ticket};

/// Timing knobs for [`VerificationFlow`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowConfig {
    /// Upper bound on one NIN lookup. Exceeding it is a transport failure.
    pub lookup_timeout: Duration,
    /// Artificial pause before the BVN comparison.
    pub secondary_check_delay: Duration,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_secs(5),
            secondary_check_delay: Duration::ZERO,
        }
    }
}

enum Outcome {
    Primary(Result<Option<Record>, LookupError>),
    Secondary,
    Confirmation(Result<(), ConfirmationError>),
}

/// The result of an [`InFlight`] operation, to be applied with
/// [`VerificationFlow::finish`].
pub struct Completed {
    ticket: Ticket,
    outcome: Outcome,
}

/// An outstanding step operation.
///
/// Dropping it abandons the work, but the session stays busy until it
/// navigates away with `back` or `restart`.
pub struct InFlight {
    ticket: Ticket,
    work: Pin<Box<dyn Future<Output = Outcome> + Send>>,
}

impl InFlight {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }
}

impl Future for InFlight {
    type Output = Completed;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Completed> {
        let this = self.get_mut();
        let ticket = this.ticket;
        this.work
            .as_mut()
            .poll(cx)
            .map(|outcome| Completed { ticket, outcome })
    }
}

/// Drives one verification session end to end.
///
/// Guard failures (`Busy`, `InvalidAction`) and `InvalidFormat` come back as
/// `Err` before anything leaves the session; outcomes of the step itself come
/// back as a [`Resolution`].
pub struct VerificationFlow<L> {
    session: Session,
    lookup: Arc<L>,
    confirmer: Arc<dyn Confirmer>,
    config: FlowConfig,
}

impl<L: RecordLookup + 'static> VerificationFlow<L> {
    pub fn new(lookup: L, confirmer: Box<dyn Confirmer>, config: FlowConfig) -> Self {
        tracing::debug!(confirmer = confirmer.name(), "verification flow created");
        Self {
            session: Session::new(),
            lookup: Arc::new(lookup),
            confirmer: Arc::from(confirmer),
            config,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn confirmer_name(&self) -> &str {
        self.confirmer.name()
    }

    /// Step 1: validate the NIN and start its lookup.
    pub fn start_primary(&mut self, input: &str) -> Result<InFlight, FlowError> {
        let pending = self.session.begin_primary(input)?;
        let lookup = Arc::clone(&self.lookup);
        let timeout = self.config.lookup_timeout;
        let primary_id = pending.primary_id;
        let work = async move {
            let outcome =
                match tokio::time::timeout(timeout, lookup.find_by_primary_id(&primary_id)).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(LookupError::Timeout(timeout)),
                };
            Outcome::Primary(outcome)
        };
        Ok(InFlight {
            ticket: pending.ticket,
            work: Box::pin(work),
        })
    }

    /// Step 2: validate the BVN; the comparison happens in [`finish`](Self::finish)
    /// after the configured check delay.
    pub fn start_secondary(&mut self, input: &str) -> Result<InFlight, FlowError> {
        let ticket = self.session.begin_secondary(input)?;
        let delay = self.config.secondary_check_delay;
        let work = async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Outcome::Secondary
        };
        Ok(InFlight {
            ticket,
            work: Box::pin(work),
        })
    }

    /// Step 3: start the configured confirmation strategy.
    pub fn start_confirmation(&mut self) -> Result<InFlight, FlowError> {
        let ticket = self.session.begin_confirmation()?;
        let confirmer = Arc::clone(&self.confirmer);
        let record = self.session.matched_record().cloned();
        let work = async move {
            let outcome = match record {
                Some(record) => confirmer.confirm(&record).await,
                None => Err(ConfirmationError::Rejected("no record bound".into())),
            };
            Outcome::Confirmation(outcome)
        };
        Ok(InFlight {
            ticket,
            work: Box::pin(work),
        })
    }

    /// Apply a finished operation to the session.
    pub fn finish(&mut self, done: Completed) -> Resolution {
        match done.outcome {
            Outcome::Primary(outcome) => self.session.resolve_primary(done.ticket, outcome),
            Outcome::Secondary => self.session.resolve_secondary(done.ticket),
            Outcome::Confirmation(outcome) => {
                self.session.resolve_confirmation(done.ticket, outcome)
            }
        }
    }

    pub async fn submit_primary_id(&mut self, input: &str) -> Result<Resolution, FlowError> {
        let done = self.start_primary(input)?.await;
        Ok(self.finish(done))
    }

    pub async fn submit_secondary_id(&mut self, input: &str) -> Result<Resolution, FlowError> {
        let done = self.start_secondary(input)?.await;
        Ok(self.finish(done))
    }

    pub async fn confirm_biometric(&mut self) -> Result<Resolution, FlowError> {
        let done = self.start_confirmation()?.await;
        Ok(self.finish(done))
    }

    /// Navigate back. Allowed while an operation is in flight; its result
    /// will resolve as stale.
    pub fn back(&mut self) -> Result<crate::Step, FlowError> {
        self.session.back()
    }

    pub fn restart(&mut self) -> Result<(), FlowError> {
        self.session.restart()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::SimulatedScan;
    use crate::lookup::InProcessLookup;
    use crate::Step;
    use idcheck_registry::StaticRegistry;

    fn demo_flow(scan: Duration) -> VerificationFlow<InProcessLookup<StaticRegistry>> {
        VerificationFlow::new(
            InProcessLookup::new(StaticRegistry::demo()),
            Box::new(SimulatedScan::new(scan)),
            FlowConfig::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn walks_the_demo_profile_to_completion() {
        let mut flow = demo_flow(SimulatedScan::DEFAULT_DURATION);

        let res = flow.submit_primary_id("12345678901").await.unwrap();
        assert_eq!(res, Resolution::Advanced(Step::CollectingSecondaryId));
        let res = flow.submit_secondary_id("10987654321").await.unwrap();
        assert_eq!(res, Resolution::Advanced(Step::BiometricCheck));
        let res = flow.confirm_biometric().await.unwrap();
        assert_eq!(res, Resolution::Advanced(Step::Complete));

        let summary = flow.session().summary().unwrap();
        assert_eq!(summary.headline(), "John Doe");
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_scan_takes_its_duration() {
        let mut flow = demo_flow(Duration::from_secs(3));
        flow.submit_primary_id("98765432109").await.unwrap();
        flow.submit_secondary_id("90123456789").await.unwrap();

        let started = tokio::time::Instant::now();
        flow.confirm_biometric().await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test]
    async fn unknown_nin_stays_on_first_step() {
        let mut flow = demo_flow(Duration::ZERO);
        let res = flow.submit_primary_id("00000000000").await.unwrap();
        assert_eq!(res, Resolution::Failed(FlowError::NotFound));
        assert_eq!(flow.session().step(), Step::CollectingPrimaryId);
    }

    fn delayed_flow(
        delay: Duration,
        scan: Duration,
    ) -> VerificationFlow<InProcessLookup<StaticRegistry>> {
        VerificationFlow::new(
            InProcessLookup::new(StaticRegistry::demo()),
            Box::new(SimulatedScan::new(scan)),
            FlowConfig {
                secondary_check_delay: delay,
                ..FlowConfig::default()
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn back_during_bvn_check_cancels_it() {
        let mut flow = delayed_flow(Duration::from_millis(1500), Duration::ZERO);
        flow.submit_primary_id("12345678901").await.unwrap();

        let check = flow.start_secondary("10987654321").unwrap();
        assert!(flow.session().is_busy());
        assert_eq!(
            flow.start_secondary("10987654321").err(),
            Some(FlowError::Busy(Step::CollectingSecondaryId))
        );

        assert_eq!(flow.back().unwrap(), Step::CollectingPrimaryId);
        let done = check.await;
        assert_eq!(flow.finish(done), Resolution::Stale);
        assert_eq!(flow.session().step(), Step::CollectingPrimaryId);
        assert!(flow.session().matched_record().is_none());
        assert!(!flow.session().is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn back_during_scan_cancels_it() {
        let mut flow = delayed_flow(Duration::ZERO, Duration::from_secs(3));
        flow.submit_primary_id("12345678901").await.unwrap();
        flow.submit_secondary_id("10987654321").await.unwrap();

        let scan = flow.start_confirmation().unwrap();
        assert_eq!(flow.back().unwrap(), Step::CollectingSecondaryId);
        drop(scan);
        assert!(!flow.session().is_busy());
        assert!(flow.session().matched_record().is_some());

        // The session accepts a fresh BVN submission right away.
        let res = flow.submit_secondary_id("10987654321").await.unwrap();
        assert_eq!(res, Resolution::Advanced(Step::BiometricCheck));
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_check_can_be_retried_after_back() {
        let mut flow = delayed_flow(Duration::from_millis(1500), Duration::ZERO);
        flow.submit_primary_id("12345678901").await.unwrap();
        let stale = flow.start_secondary("10987654321").unwrap();
        flow.back().unwrap();

        let res = flow.submit_primary_id("98765432109").await.unwrap();
        assert_eq!(res, Resolution::Advanced(Step::CollectingSecondaryId));
        // John's check finishing now must not touch Jane's session.
        let done = stale.await;
        assert_eq!(flow.finish(done), Resolution::Stale);
        assert_eq!(flow.session().step(), Step::CollectingSecondaryId);
        assert_eq!(
            flow.session().matched_record().unwrap().display_name(),
            "Jane Smith"
        );
    }
}
