use crate::error::{Error, Result};
use crate::logging::SessionId;
use crate::model::{CandidateId, Registry, RegistrationForm};

use super::{CandidateSelection, Confirmation, Receipt, Registration, Session};

/// A user action, as delivered by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Register(RegistrationForm),
    Select(CandidateId),
    Cast,
    Confirm,
    Change,
    NewVote,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Register(_) => "register",
            Action::Select(_) => "select",
            Action::Cast => "cast",
            Action::Confirm => "confirm",
            Action::Change => "change",
            Action::NewVote => "new",
        }
    }
}

/// Whichever stage a session is currently at, for callers that only learn
/// the stage at runtime.
#[derive(Debug)]
pub enum Screen {
    Registration(Session<Registration>),
    CandidateSelection(Session<CandidateSelection>),
    Confirmation(Session<Confirmation>),
    Receipt(Session<Receipt>),
}

impl From<Session<Registration>> for Screen {
    fn from(session: Session<Registration>) -> Self {
        Screen::Registration(session)
    }
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Registration(s) => s.stage_name(),
            Screen::CandidateSelection(s) => s.stage_name(),
            Screen::Confirmation(s) => s.stage_name(),
            Screen::Receipt(s) => s.stage_name(),
        }
    }

    pub fn session_id(&self) -> SessionId {
        match self {
            Screen::Registration(s) => s.id(),
            Screen::CandidateSelection(s) => s.id(),
            Screen::Confirmation(s) => s.id(),
            Screen::Receipt(s) => s.id(),
        }
    }

    pub fn registry(&self) -> &Registry {
        match self {
            Screen::Registration(s) => s.registry(),
            Screen::CandidateSelection(s) => s.registry(),
            Screen::Confirmation(s) => s.registry(),
            Screen::Receipt(s) => s.registry(),
        }
    }

    /// Apply an action, returning the screen to show next.
    /// On error the returned screen is the one that was active before.
    pub fn apply(self, action: Action) -> (Screen, Result<()>) {
        match (self, action) {
            (Screen::Registration(s), Action::Register(form)) => {
                match s.submit_registration(&form) {
                    Ok(next) => (Screen::CandidateSelection(next), Ok(())),
                    Err(rejected) => {
                        (Screen::Registration(rejected.session), Err(rejected.error))
                    }
                }
            }
            (Screen::CandidateSelection(mut s), Action::Select(id)) => {
                let result = s.select_candidate(id).map(|_| ());
                (Screen::CandidateSelection(s), result)
            }
            (Screen::CandidateSelection(s), Action::Cast) => match s.cast_vote() {
                Ok(next) => (Screen::Confirmation(next), Ok(())),
                Err(rejected) => (
                    Screen::CandidateSelection(rejected.session),
                    Err(rejected.error),
                ),
            },
            (Screen::Confirmation(s), Action::Confirm) => {
                (Screen::Receipt(s.confirm_vote()), Ok(()))
            }
            (Screen::Confirmation(s), Action::Change) => {
                (Screen::CandidateSelection(s.change_vote()), Ok(()))
            }
            (Screen::Receipt(s), Action::NewVote) => {
                (Screen::Registration(s.start_new_vote()), Ok(()))
            }
            (screen, action) => {
                warn!(
                    "{} `{}` refused on the {} screen",
                    screen.session_id(),
                    action.name(),
                    screen.name()
                );
                let error = Error::WrongScreen {
                    action: action.name(),
                    screen: screen.name(),
                };
                (screen, Err(error))
            }
        }
    }
}
