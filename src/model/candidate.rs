use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub type CandidateId = u32;

/// A single candidate that voters may choose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Candidate unique ID.
    pub id: CandidateId,
    /// Full name.
    pub name: String,
    /// Party the candidate stands for.
    pub party: String,
    /// Where to find the candidate's portrait.
    pub image_ref: String,
    /// Short biography.
    pub bio: String,
}

impl Candidate {
    fn builtin(id: CandidateId, name: &str, party: &str, initials: &str, bio: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            party: party.to_string(),
            image_ref: format!("https://via.placeholder.com/100?text={initials}"),
            bio: bio.to_string(),
        }
    }
}

/// The fixed, ordered list of candidates on offer.
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    candidates: Vec<Candidate>,
}

impl Registry {
    /// Build a registry, rejecting empty lists and duplicate IDs.
    pub fn new(candidates: Vec<Candidate>) -> Result<Self> {
        if candidates.is_empty() {
            return Err(Error::EmptyRegistry);
        }
        let mut seen = HashSet::with_capacity(candidates.len());
        for candidate in &candidates {
            if !seen.insert(candidate.id) {
                return Err(Error::DuplicateCandidate(candidate.id));
            }
        }
        Ok(Self { candidates })
    }

    /// All candidates, in display order.
    pub fn list(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Look up a candidate by ID.
    pub fn get(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            candidates: vec![
                Candidate::builtin(
                    1,
                    "John Smith",
                    "Progress Party",
                    "JS",
                    "Experienced leader with a vision for progress.",
                ),
                Candidate::builtin(
                    2,
                    "Sarah Johnson",
                    "Unity Alliance",
                    "SJ",
                    "Dedicated to bringing people together for common goals.",
                ),
                Candidate::builtin(
                    3,
                    "Michael Chen",
                    "Future Forward",
                    "MC",
                    "Innovative thinker with fresh ideas for our community.",
                ),
                Candidate::builtin(
                    4,
                    "Emily Williams",
                    "Green Initiative",
                    "EW",
                    "Committed to sustainable development and environmental protection.",
                ),
            ],
        }
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Candidate {
        pub fn example(id: CandidateId) -> Self {
            Self {
                id,
                name: format!("Candidate {id}"),
                party: "Example Party".to_string(),
                image_ref: String::new(),
                bio: "An example candidate.".to_string(),
            }
        }
    }
}
