//! Identity verification flow.
//!
//! A [`Session`] walks through four steps:
//! 1. **Primary id**: the NIN is looked up through a [`RecordLookup`].
//! 2. **Secondary id**: the BVN is compared against the bound record, locally.
//! 3. **Biometric check**: a pluggable [`Confirmer`] acknowledges the user.
//! 4. **Complete**: the bound record is rendered.
//!
//! The session itself never performs I/O. Every outstanding operation is
//! represented by a [`Ticket`]; responses carrying a ticket from an older
//! generation are dropped, so navigating away cancels interest in them.
//! [`VerificationFlow`] is the async driver that pairs a session with a lookup
//! backend and a confirmation strategy; its [`InFlight`] operations can be
//! raced against navigation.

pub mod confirm;
pub mod display;
pub mod driver;
pub mod error;
pub mod lookup;
pub mod notice;
pub mod session;
pub mod step;

pub use confirm::{
    ConfirmationError, Confirmer, CredentialPlatform, CredentialRequest, PlatformCredential,
    SimulatedScan,
};
pub use display::RecordSummary;
pub use driver::{Completed, FlowConfig, InFlight, VerificationFlow};
pub use error::FlowError;
pub use lookup::{InProcessLookup, LookupError, RecordLookup};
pub use notice::{Notice, NoticeVariant};
pub use session::{PendingLookup, Resolution, Session, Ticket, MAX_NOTICES};
pub use step::Step;
