pub use candidate::{Candidate, CandidateId, Registry};
pub use receipt::{VoteId, VoteReceipt};
pub use voter::{Field, RegistrationForm, ValidationError, VoterRecord};

pub mod candidate;
pub mod receipt;
pub mod voter;
