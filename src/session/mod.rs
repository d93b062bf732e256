//! The voting session state machine.
//!
//! A session moves through four stages: registration, candidate selection,
//! confirmation and receipt. Each stage is its own type, and every transition
//! is a method that only exists on the stage it starts from, so an operation
//! can never be invoked from the wrong stage. Transitions that can fail hand
//! the untouched session back inside a [`Rejected`].

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::Error;
use crate::logging::SessionId;
use crate::model::{
    Candidate, CandidateId, Registry, RegistrationForm, VoteId, VoteReceipt, VoterRecord,
};

pub use clock::{Clock, FixedClock, SystemClock};
pub use screen::{Action, Screen};
pub use stage::{CandidateSelection, Confirmation, Receipt, Registration, Stage};

pub mod clock;
pub mod screen;
pub mod stage;

/// Policy knobs that apply to every session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    /// Voters younger than this, in whole years, are turned away.
    pub minimum_age: u32,
    /// Prepended to every generated vote ID.
    pub vote_id_prefix: String,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            minimum_age: 18,
            vote_id_prefix: "VOTE-".to_string(),
        }
    }
}

/// One voter's traversal of the flow, currently at stage `S`.
#[derive(Debug)]
pub struct Session<S: Stage> {
    id: SessionId,
    registry: Arc<Registry>,
    rules: Rules,
    clock: Arc<dyn Clock>,
    /// Every vote ID this session has handed out, across all cycles.
    issued: HashSet<VoteId>,
    stage: S,
}

/// A transition that was refused. The session is returned unchanged.
#[derive(Debug)]
pub struct Rejected<S: Stage> {
    pub session: Session<S>,
    pub error: Error,
}

impl<S: Stage> From<Rejected<S>> for Error {
    fn from(rejected: Rejected<S>) -> Self {
        rejected.error
    }
}

impl Session<Registration> {
    /// Start a session that reads the system clock.
    pub fn new(registry: Arc<Registry>, rules: Rules) -> Self {
        Self::with_clock(registry, rules, SystemClock)
    }

    pub fn with_clock(
        registry: Arc<Registry>,
        rules: Rules,
        clock: impl Clock + 'static,
    ) -> Self {
        let id = SessionId::next();
        debug!("{id} started");
        Self {
            id,
            registry,
            rules,
            clock: Arc::new(clock),
            issued: HashSet::new(),
            stage: Registration,
        }
    }

    /// Validate the form and, if it passes, register the voter.
    pub fn submit_registration(
        self,
        form: &RegistrationForm,
    ) -> Result<Session<CandidateSelection>, Rejected<Registration>> {
        match form.validate(self.clock.today(), self.rules.minimum_age) {
            Ok(voter) => {
                info!("{} registered voter {}", self.id, voter.external_id);
                Ok(self.into_stage(CandidateSelection {
                    voter,
                    selected: None,
                }))
            }
            Err(err) => {
                warn!("{} registration rejected: {err}", self.id);
                Err(self.reject(err.into()))
            }
        }
    }
}

impl Session<CandidateSelection> {
    pub fn voter(&self) -> &VoterRecord {
        &self.stage.voter
    }

    pub fn selected(&self) -> Option<&Candidate> {
        self.stage.selected.as_ref()
    }

    /// Whether the "cast vote" action is enabled.
    pub fn can_cast_vote(&self) -> bool {
        self.stage.selected.is_some()
    }

    /// Pick a candidate, replacing any earlier pick.
    pub fn select_candidate(&mut self, id: CandidateId) -> Result<&Candidate, Error> {
        let candidate = self.registry.get(id).cloned().ok_or_else(|| {
            warn!("{} tried to select unknown candidate {id}", self.id);
            Error::NotFound(id)
        })?;
        debug!("{} selected candidate {id}", self.id);
        let selected = self.stage.selected.insert(candidate);
        Ok(&*selected)
    }

    /// Move on to confirmation. Requires a selection.
    pub fn cast_vote(self) -> Result<Session<Confirmation>, Rejected<CandidateSelection>> {
        let candidate = match self.stage.selected.clone() {
            Some(candidate) => candidate,
            None => {
                warn!("{} tried to cast a vote with no selection", self.id);
                return Err(self.reject(Error::NoSelection));
            }
        };
        info!("{} cast a vote for candidate {}", self.id, candidate.id);
        let voter = self.stage.voter.clone();
        Ok(self.into_stage(Confirmation { voter, candidate }))
    }
}

impl Session<Confirmation> {
    pub fn voter(&self) -> &VoterRecord {
        &self.stage.voter
    }

    /// The candidate awaiting confirmation.
    pub fn summary(&self) -> &Candidate {
        &self.stage.candidate
    }

    /// Confirm the vote and issue a receipt with a fresh vote ID.
    pub fn confirm_vote(mut self) -> Session<Receipt> {
        let vote_id = self.fresh_vote_id();
        let timestamp = self.clock.now();
        info!(
            "{} confirmed vote {vote_id} for candidate {}",
            self.id, self.stage.candidate.id
        );
        let Confirmation { voter, candidate } = self.stage.clone();
        self.into_stage(Receipt {
            receipt: VoteReceipt {
                vote_id,
                timestamp,
                voter,
                candidate,
            },
        })
    }

    /// Go back to candidate selection, keeping the current pick.
    pub fn change_vote(self) -> Session<CandidateSelection> {
        debug!("{} went back to change their vote", self.id);
        let Confirmation { voter, candidate } = self.stage.clone();
        self.into_stage(CandidateSelection {
            voter,
            selected: Some(candidate),
        })
    }

    /// Generate a vote ID this session has never issued before.
    fn fresh_vote_id(&mut self) -> VoteId {
        let mut rng = rand::thread_rng();
        loop {
            let id = VoteId::random(&self.rules.vote_id_prefix, &mut rng);
            if self.issued.insert(id.clone()) {
                return id;
            }
            warn!("{} regenerating colliding vote ID {id}", self.id);
        }
    }
}

impl Session<Receipt> {
    pub fn receipt(&self) -> &VoteReceipt {
        &self.stage.receipt
    }

    /// Forget the voter, their pick and the receipt, and start over.
    pub fn start_new_vote(self) -> Session<Registration> {
        info!("{} reset for a new vote", self.id);
        self.into_stage(Registration)
    }
}

impl<S: Stage> Session<S> {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Name of the screen this session is on.
    pub fn stage_name(&self) -> &'static str {
        S::NAME
    }

    /// Carry the session context over into a new stage, dropping the old
    /// stage's data.
    fn into_stage<T: Stage>(self, stage: T) -> Session<T> {
        Session {
            id: self.id,
            registry: self.registry,
            rules: self.rules,
            clock: self.clock,
            issued: self.issued,
            stage,
        }
    }

    fn reject(self, error: Error) -> Rejected<S> {
        Rejected {
            session: self,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate};

    use super::*;
    use crate::model::{Field, ValidationError};

    fn init_logging() {
        log4rs_test_utils::test_logging::init_logging_once_for(["mock_voting"], None, None);
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn years_before(years: i32) -> String {
        let today = today();
        today
            .with_year(today.year() - years)
            .unwrap()
            .format("%Y-%m-%d")
            .to_string()
    }

    fn session() -> Session<Registration> {
        init_logging();
        Session::with_clock(
            Arc::new(Registry::default()),
            Rules::default(),
            FixedClock::on(today()),
        )
    }

    fn ann_lee() -> RegistrationForm {
        RegistrationForm {
            voter_id: "V1".to_string(),
            name: "Ann Lee".to_string(),
            email: "a@x.com".to_string(),
            date_of_birth: years_before(20),
        }
    }

    fn registered() -> Session<CandidateSelection> {
        session().submit_registration(&ann_lee()).unwrap()
    }

    #[test]
    fn missing_field_keeps_registration() {
        let mut session = session();
        for field in Field::ALL {
            let mut form = ann_lee();
            form.field_mut(field).clear();
            let rejected = session.submit_registration(&form).unwrap_err();
            assert!(matches!(
                &rejected.error,
                Error::Validation(ValidationError::MissingFields(fields)) if fields == &vec![field]
            ));
            session = rejected.session;
            assert_eq!(session.stage_name(), "registration");
        }
        session.submit_registration(&ann_lee()).unwrap();
    }

    #[test]
    fn eighteenth_birthday_boundary() {
        let mut form = ann_lee();
        form.date_of_birth = years_before(18);
        let selecting = session().submit_registration(&form).unwrap();
        assert_eq!(selecting.voter().date_of_birth.year(), 2008);

        form.date_of_birth = "2008-10-17".to_string();
        let rejected = session().submit_registration(&form).unwrap_err();
        assert!(matches!(
            rejected.error,
            Error::Validation(ValidationError::Underage { minimum_age: 18 })
        ));
        assert_eq!(
            rejected.error.to_string(),
            "You must be at least 18 years old to vote"
        );
    }

    #[test]
    fn minimum_age_comes_from_rules() {
        init_logging();
        let rules = Rules {
            minimum_age: 21,
            ..Rules::default()
        };
        let session = Session::with_clock(
            Arc::new(Registry::default()),
            rules,
            FixedClock::on(today()),
        );
        let mut form = ann_lee();
        form.date_of_birth = years_before(20);
        let rejected = session.submit_registration(&form).unwrap_err();
        assert!(matches!(
            rejected.error,
            Error::Validation(ValidationError::Underage { minimum_age: 21 })
        ));
    }

    #[test]
    fn cast_without_selection() {
        let selecting = registered();
        assert!(!selecting.can_cast_vote());
        let rejected = selecting.cast_vote().unwrap_err();
        assert!(matches!(rejected.error, Error::NoSelection));
        assert_eq!(rejected.session.stage_name(), "candidate selection");
        assert_eq!(rejected.session.voter().name, "Ann Lee");
    }

    #[test]
    fn select_unknown_candidate() {
        let mut selecting = registered();
        assert!(matches!(
            selecting.select_candidate(99),
            Err(Error::NotFound(99))
        ));
        assert!(selecting.selected().is_none());

        selecting.select_candidate(2).unwrap();
        assert!(matches!(
            selecting.select_candidate(42),
            Err(Error::NotFound(42))
        ));
        // A failed pick leaves the earlier one in place.
        assert_eq!(selecting.selected().unwrap().id, 2);
    }

    #[test]
    fn reselecting_replaces_pick() {
        let mut selecting = registered();
        selecting.select_candidate(1).unwrap();
        let picked = selecting.select_candidate(4).unwrap();
        assert_eq!(picked.name, "Emily Williams");
        assert!(selecting.can_cast_vote());
        let confirming = selecting.cast_vote().unwrap();
        assert_eq!(confirming.summary().id, 4);
    }

    #[test]
    fn change_then_cast_keeps_summary() {
        let mut selecting = registered();
        selecting.select_candidate(2).unwrap();
        let confirming = selecting.cast_vote().unwrap();
        let before = confirming.summary().clone();

        let selecting = confirming.change_vote();
        assert_eq!(selecting.selected(), Some(&before));
        assert!(selecting.can_cast_vote());

        let confirming = selecting.cast_vote().unwrap();
        assert_eq!(confirming.summary(), &before);
        assert_eq!(confirming.stage_name(), "confirmation");
    }

    #[test]
    fn new_vote_clears_everything() {
        let mut selecting = registered();
        selecting.select_candidate(1).unwrap();
        let registration = selecting
            .cast_vote()
            .unwrap()
            .confirm_vote()
            .start_new_vote();
        assert_eq!(registration.stage_name(), "registration");

        let selecting = registration.submit_registration(&ann_lee()).unwrap();
        assert!(selecting.selected().is_none());
        let rejected = selecting.cast_vote().unwrap_err();
        assert!(matches!(rejected.error, Error::NoSelection));
    }

    #[test]
    fn vote_ids_unique_across_cycles() {
        let mut registration = session();
        let session_id = registration.id();
        let mut seen = HashSet::new();
        for cycle in 0..50 {
            let mut selecting = registration.submit_registration(&ann_lee()).unwrap();
            selecting.select_candidate(cycle % 4 + 1).unwrap();
            let receipt = selecting.cast_vote().unwrap().confirm_vote();
            let vote_id = receipt.receipt().vote_id.clone();
            assert!(vote_id.as_str().starts_with("VOTE-"));
            assert!(seen.insert(vote_id));
            registration = receipt.start_new_vote();
        }
        assert_eq!(registration.id(), session_id);
        assert_eq!(registration.issued.len(), 50);
    }

    #[test]
    fn end_to_end() {
        let mut selecting = registered();
        selecting.select_candidate(3).unwrap();
        let confirming = selecting.cast_vote().unwrap();
        assert_eq!(
            confirming.summary().bio,
            "Innovative thinker with fresh ideas for our community."
        );

        let done = confirming.confirm_vote();
        let receipt = done.receipt();
        assert_eq!(receipt.candidate.name, "Michael Chen");
        assert_eq!(receipt.candidate.party, "Future Forward");
        assert_eq!(receipt.voter.name, "Ann Lee");
        assert_eq!(receipt.voter.external_id, "V1");
        assert_eq!(receipt.timestamp, FixedClock::on(today()).now);
    }

    #[test]
    fn sessions_are_independent() {
        let registry = Arc::new(Registry::default());
        let first = Session::with_clock(
            registry.clone(),
            Rules::default(),
            FixedClock::on(today()),
        );
        let second = Session::with_clock(registry, Rules::default(), FixedClock::on(today()));
        assert_ne!(first.id(), second.id());

        let mut a = first.submit_registration(&ann_lee()).unwrap();
        let b = second.submit_registration(&ann_lee()).unwrap();
        a.select_candidate(1).unwrap();
        assert!(a.can_cast_vote());
        assert!(!b.can_cast_vote());
    }
}
