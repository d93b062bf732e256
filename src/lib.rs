#[macro_use]
extern crate log;

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod session;
pub mod view;
pub mod wizard;

pub use config::Config;
pub use error::{Error, Result};
pub use session::{Screen, Session};
