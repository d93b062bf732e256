use std::fmt::Debug;

use crate::model::{Candidate, VoteReceipt, VoterRecord};

/// Trait for the session stage, enforcing on the type level that a stage only
/// holds the data that is valid for it.
pub trait Stage: Debug {
    /// Human-readable name of the screen this stage is shown on.
    const NAME: &'static str;
}

/// Waiting for the voter to register. Holds nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration;

impl Stage for Registration {
    const NAME: &'static str = "registration";
}

/// A registered voter is choosing a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSelection {
    pub(super) voter: VoterRecord,
    pub(super) selected: Option<Candidate>,
}

impl Stage for CandidateSelection {
    const NAME: &'static str = "candidate selection";
}

/// The voter is reviewing their choice. Both the voter and the candidate are
/// always present here, which is what makes confirmation infallible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub(super) voter: VoterRecord,
    pub(super) candidate: Candidate,
}

impl Stage for Confirmation {
    const NAME: &'static str = "confirmation";
}

/// The vote has been confirmed and a receipt issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub(super) receipt: VoteReceipt,
}

impl Stage for Receipt {
    const NAME: &'static str = "receipt";
}
