use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Candidate, Registry};
use crate::session::Rules;

/// Environment variables with this prefix override the config file.
pub const ENV_PREFIX: &str = "VOTING_";

const VOTE_ID_PREFIX_KEY: &str = "vote_id_prefix";

/// Application configuration, derived from built-in defaults, `Voting.toml`,
/// and `VOTING_*` environment variables, in increasing priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    minimum_age: u32,
    vote_id_prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    candidates: Option<Vec<Candidate>>,
}

impl Default for Config {
    fn default() -> Self {
        let rules = Rules::default();
        Self {
            minimum_age: rules.minimum_age,
            vote_id_prefix: rules.vote_id_prefix,
            candidates: None,
        }
    }
}

impl Config {
    /// The layered configuration sources, lowest priority first.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(
                Env::prefixed(ENV_PREFIX)
                    .filter(|key| !key.as_str().eq_ignore_ascii_case(VOTE_ID_PREFIX_KEY)),
            );
        // `Env` would parse an all-digit prefix as a number; read it verbatim.
        match Env::var(&format!("{ENV_PREFIX}{}", VOTE_ID_PREFIX_KEY.to_uppercase())) {
            Some(prefix) => figment.merge(Serialized::default(VOTE_ID_PREFIX_KEY, prefix)),
            None => figment,
        }
    }

    /// Load the configuration. A missing file is not an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::figment(path).extract::<Config>()?;
        Ok(config)
    }

    /// Minimum age, in whole years, to be allowed to vote.
    /// Configured via `VOTING_MINIMUM_AGE`.
    pub fn minimum_age(&self) -> u32 {
        self.minimum_age
    }

    /// Prefix of generated vote IDs.
    /// Configured via `VOTING_VOTE_ID_PREFIX`.
    pub fn vote_id_prefix(&self) -> &str {
        &self.vote_id_prefix
    }

    /// Session rules derived from this config.
    pub fn rules(&self) -> Rules {
        Rules {
            minimum_age: self.minimum_age,
            vote_id_prefix: self.vote_id_prefix.clone(),
        }
    }

    /// Build the candidate registry: the configured list if there is one,
    /// otherwise the built-in candidates.
    pub fn registry(&self) -> Result<Registry> {
        match &self.candidates {
            Some(candidates) => Registry::new(candidates.clone()),
            None => Ok(Registry::default()),
        }
    }
}
