//! Text rendering of the candidate list, the confirmation summary and the
//! receipt. Nothing in here changes session state.

use std::fmt::Write;

use chrono::{DateTime, Local, Utc};

use crate::model::{Candidate, CandidateId, Registry, VoteReceipt};

/// Format used for receipt timestamps, in local time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One card per candidate. The selected card, if any, is marked with `*`.
pub fn candidates(registry: &Registry, selected: Option<CandidateId>) -> String {
    let mut out = String::new();
    for candidate in registry.list() {
        let marker = if Some(candidate.id) == selected { '*' } else { ' ' };
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "{marker} [{}] {}\n      {}\n      {}\n      ({})",
            candidate.id, candidate.name, candidate.party, candidate.bio, candidate.image_ref
        );
    }
    out
}

/// The read-only summary shown before the vote is confirmed.
pub fn summary(candidate: &Candidate) -> String {
    format!(
        "{}\nParty: {}\n{}\n",
        candidate.name, candidate.party, candidate.bio
    )
}

pub fn timestamp(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

pub fn receipt(receipt: &VoteReceipt) -> String {
    format!(
        "Vote ID: {}\nTimestamp: {}\nVoter: {} ({})\nCandidate: {}\nParty: {}\n",
        receipt.vote_id,
        timestamp(receipt.timestamp),
        receipt.voter.name,
        receipt.voter.external_id,
        receipt.candidate.name,
        receipt.candidate.party,
    )
}
