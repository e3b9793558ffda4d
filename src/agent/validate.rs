use std::fmt;

use crate::types::{AgentError, OptionKey, OptionSet};

pub const REQUIRED_OPTIONS: [OptionKey; 4] = [
    OptionKey::Ipaddr,
    OptionKey::Login,
    OptionKey::Passwd,
    OptionKey::Action,
];

// Compared against the action exactly as given; dispatch lowercases later.
pub const PORT_ACTIONS: [&str; 4] = ["off", "on", "reboot", "status"];

/// A validated fencing request.
///
/// `timeout` and `cycletime` stay `None` when the cluster did not send them so
/// the power switch library falls back to its own defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceRequest {
    pub ipaddr: String,
    pub login: String,
    pub passwd: String,
    pub action: String,
    pub port: Option<String>,
    pub timeout: Option<String>,
    pub cycletime: Option<String>,
}

impl FenceRequest {
    pub fn port_number(&self) -> Result<i32, AgentError> {
        let port = self.port.as_deref().ok_or(AgentError::MissingPort)?;
        port.parse::<i32>().map_err(|source| AgentError::InvalidPort {
            value: port.to_string(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingOptions(Vec<OptionKey>),
    NoPort,
}

impl ValidationError {
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Missing options go to stderr, a missing port to stdout.
    pub fn report(&self) {
        match self {
            ValidationError::MissingOptions(_) => eprintln!("{}", self),
            ValidationError::NoPort => println!("{}", self),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingOptions(missing) => {
                let missing: Vec<&str> = missing.iter().map(OptionKey::as_str).collect();
                write!(f, "Did not receive all required options, missing {}", missing.join(" "))
            }
            ValidationError::NoPort => write!(f, "Cannot execute action, no port specified"),
        }
    }
}

pub fn validate(options: &OptionSet) -> Result<FenceRequest, ValidationError> {
    let missing: Vec<OptionKey> = REQUIRED_OPTIONS
        .into_iter()
        .filter(|key| !options.contains(*key))
        .collect();

    let (Some(ipaddr), Some(login), Some(passwd), Some(action)) = (
        options.get(OptionKey::Ipaddr),
        options.get(OptionKey::Login),
        options.get(OptionKey::Passwd),
        options.get(OptionKey::Action),
    ) else {
        return Err(ValidationError::MissingOptions(missing));
    };

    let port = options.get(OptionKey::Port);
    if port.is_none() && PORT_ACTIONS.iter().any(|port_action| *port_action == action) {
        return Err(ValidationError::NoPort);
    }

    Ok(FenceRequest {
        ipaddr: ipaddr.to_string(),
        login: login.to_string(),
        passwd: passwd.to_string(),
        action: action.to_string(),
        port: port.map(str::to_string),
        timeout: options.get(OptionKey::Timeout).map(str::to_string),
        cycletime: options.get(OptionKey::Cycletime).map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(input: &str) -> OptionSet {
        OptionSet::parse(input.as_bytes()).unwrap()
    }

    #[test]
    fn complete_request_is_accepted() {
        let request = validate(&options(
            "ipaddr=10.0.0.1\nlogin=admin\npasswd=secret\naction=on\nport=3\ntimeout=30\n",
        ))
        .unwrap();
        assert_eq!(request.ipaddr, "10.0.0.1");
        assert_eq!(request.port.as_deref(), Some("3"));
        assert_eq!(request.timeout.as_deref(), Some("30"));
        assert_eq!(request.cycletime, None);
    }

    #[test]
    fn missing_password_is_named() {
        let error = validate(&options("ipaddr=10.0.0.1\nlogin=admin\naction=on\nport=3\n")).unwrap_err();
        assert_eq!(error, ValidationError::MissingOptions(vec![OptionKey::Passwd]));
        assert!(error.to_string().contains("passwd"));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn every_missing_option_is_reported() {
        let error = validate(&options("port=1\n")).unwrap_err();
        let ValidationError::MissingOptions(missing) = &error else {
            panic!("expected missing options, got {:?}", error);
        };
        assert_eq!(missing.len(), 4);
        for key in REQUIRED_OPTIONS {
            assert!(missing.contains(&key));
        }
        assert_eq!(
            error.to_string(),
            "Did not receive all required options, missing ipaddr login passwd action"
        );
    }

    #[test]
    fn port_actions_need_a_port() {
        for action in PORT_ACTIONS {
            let input = format!("ipaddr=h\nlogin=l\npasswd=p\naction={}\n", action);
            assert_eq!(validate(&options(&input)), Err(ValidationError::NoPort));
        }
        assert_eq!(ValidationError::NoPort.to_string(), "Cannot execute action, no port specified");
    }

    #[test]
    fn list_and_monitor_need_no_port() {
        for action in ["list", "monitor"] {
            let input = format!("ipaddr=h\nlogin=l\npasswd=p\naction={}\n", action);
            let request = validate(&options(&input)).unwrap();
            assert_eq!(request.port, None);
        }
    }

    #[test]
    fn port_check_is_case_sensitive() {
        let request = validate(&options("ipaddr=h\nlogin=l\npasswd=p\naction=OFF\n")).unwrap();
        assert_eq!(request.action, "OFF");
        assert!(matches!(request.port_number(), Err(AgentError::MissingPort)));
    }

    #[test]
    fn non_numeric_port_fails_on_use() {
        let request = validate(&options("ipaddr=h\nlogin=l\npasswd=p\naction=on\nport=three\n")).unwrap();
        assert!(matches!(request.port_number(), Err(AgentError::InvalidPort { .. })));
    }
}
