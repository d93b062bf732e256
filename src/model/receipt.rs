use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use data_encoding::BASE32_NOPAD;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::{Candidate, VoterRecord};

/// Number of random bytes behind each vote ID.
pub const TOKEN_BYTES: usize = 5;

/// Identifies one generated receipt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteId(String);

impl VoteId {
    /// Generate a random ID: the prefix followed by an uppercase base32 token.
    pub fn random(prefix: &str, rng: &mut impl RngCore) -> Self {
        let mut token = [0; TOKEN_BYTES];
        rng.fill_bytes(&mut token);
        Self(format!("{prefix}{}", BASE32_NOPAD.encode(&token)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The artifact shown to the voter once their vote is confirmed.
/// Snapshots are taken at confirmation, so the receipt outlives the session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteReceipt {
    pub vote_id: VoteId,
    pub timestamp: DateTime<Utc>,
    pub voter: VoterRecord,
    pub candidate: Candidate,
}
