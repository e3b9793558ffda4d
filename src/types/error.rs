use std::error::Error;
use std::fmt;
use std::io;
use std::num::ParseIntError;

use dli_power_sdk_rs::DliPowerError;

use crate::types::options::OptionKey;

#[derive(Debug)]
pub enum AgentError {
    Io(io::Error),
    MissingPort,
    InvalidPort {
        value: String,
        source: ParseIntError,
    },
    InvalidNumber {
        option: OptionKey,
        value: String,
    },
    Switch(DliPowerError),
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentError::Io(error) => write!(f, "Could not read options: {}", error),
            AgentError::MissingPort => write!(f, "No port given for an action that needs one"),
            AgentError::InvalidPort { value, source } => write!(f, "Invalid port {:?}: {}", value, source),
            AgentError::InvalidNumber { option, value } => write!(f, "Invalid {} {:?}: not a number", option, value),
            AgentError::Switch(error) => write!(f, "{}", error),
        }
    }
}

impl Error for AgentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AgentError::Io(error) => Some(error),
            AgentError::InvalidPort { source, .. } => Some(source),
            AgentError::Switch(error) => Some(error),
            _ => None,
        }
    }
}

impl From<io::Error> for AgentError {
    fn from(error: io::Error) -> Self {
        AgentError::Io(error)
    }
}

impl From<DliPowerError> for AgentError {
    fn from(error: DliPowerError) -> Self {
        AgentError::Switch(error)
    }
}
