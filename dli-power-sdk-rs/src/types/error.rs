use std::error::Error;
use std::fmt;
use std::io;

use crate::types::outlet::OutletState;

#[derive(Debug)]
pub enum DliPowerError {
    Http(reqwest::Error),
    Io(io::Error),
    Config(String),
    Parse(String),
    LoginFailed(String),
    InvalidOutlet(String),
    StateMismatch {
        outlet: u32,
        expected: OutletState,
        actual: OutletState,
    },
}

impl fmt::Display for DliPowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DliPowerError::Http(error) => write!(f, "Error talking to the power switch: {}", error),
            DliPowerError::Io(error) => write!(f, "I/O error: {}", error),
            DliPowerError::Config(message) => write!(f, "Invalid configuration: {}", message),
            DliPowerError::Parse(message) => write!(f, "Could not parse the switch page: {}", message),
            DliPowerError::LoginFailed(message) => write!(f, "Login failed: {}", message),
            DliPowerError::InvalidOutlet(outlet) => write!(f, "Invalid outlet: {}", outlet),
            DliPowerError::StateMismatch { outlet, expected, actual } => {
                write!(f, "Outlet {} is {} after switching it {}", outlet, actual, expected)
            }
        }
    }
}

impl Error for DliPowerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DliPowerError::Http(error) => Some(error),
            DliPowerError::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DliPowerError {
    fn from(error: reqwest::Error) -> Self {
        DliPowerError::Http(error)
    }
}

impl From<io::Error> for DliPowerError {
    fn from(error: io::Error) -> Self {
        DliPowerError::Io(error)
    }
}
