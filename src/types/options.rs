use std::collections::HashMap;
use std::fmt;
use std::io::{self, BufRead};

/// Option names a cluster manager may hand the agent on stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionKey {
    Help,
    Version,
    Agent,
    Action,
    Ipaddr,
    Login,
    Passwd,
    Port,
    Nodename,
    Timeout,
    Cycletime,
}

impl OptionKey {
    pub const ALL: [OptionKey; 11] = [
        OptionKey::Help,
        OptionKey::Version,
        OptionKey::Agent,
        OptionKey::Action,
        OptionKey::Ipaddr,
        OptionKey::Login,
        OptionKey::Passwd,
        OptionKey::Port,
        OptionKey::Nodename,
        OptionKey::Timeout,
        OptionKey::Cycletime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKey::Help => "help",
            OptionKey::Version => "version",
            OptionKey::Agent => "agent",
            OptionKey::Action => "action",
            OptionKey::Ipaddr => "ipaddr",
            OptionKey::Login => "login",
            OptionKey::Passwd => "passwd",
            OptionKey::Port => "port",
            OptionKey::Nodename => "nodename",
            OptionKey::Timeout => "timeout",
            OptionKey::Cycletime => "cycletime",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options read from `key=value` lines. Later lines overwrite earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    options: HashMap<OptionKey, String>,
    unknown_options: Vec<String>,
}

impl OptionSet {
    pub fn parse(reader: impl BufRead) -> io::Result<Self> {
        let mut option_set = Self::default();
        for line in reader.lines() {
            option_set.parse_line(&line?);
        }
        Ok(option_set)
    }

    fn parse_line(&mut self, line: &str) {
        if line.starts_with('#') {
            return;
        }
        let Some((key, value)) = line.trim().split_once('=') else {
            return;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            return;
        }

        match OptionKey::from_name(key) {
            Some(option_key) => {
                self.options.insert(option_key, value.to_string());
            }
            None => {
                if !self.unknown_options.iter().any(|unknown| unknown == key) {
                    self.unknown_options.push(key.to_string());
                }
            }
        }
    }

    pub fn get(&self, key: OptionKey) -> Option<&str> {
        self.options.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: OptionKey) -> bool {
        self.options.contains_key(&key)
    }

    pub fn unknown_options(&self) -> &[String] {
        &self.unknown_options
    }

    pub fn unknown_options_warning(&self) -> Option<String> {
        if self.unknown_options.is_empty() {
            return None;
        }
        Some(format!("Unknown options, ignoring: {}", self.unknown_options().join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> OptionSet {
        OptionSet::parse(input.as_bytes()).unwrap()
    }

    #[test]
    fn reads_recognized_options() {
        let options = parse("ipaddr=10.0.0.1\nlogin=admin\npasswd=secret\naction=on\nport=3\n");
        assert_eq!(options.get(OptionKey::Ipaddr), Some("10.0.0.1"));
        assert_eq!(options.get(OptionKey::Login), Some("admin"));
        assert_eq!(options.get(OptionKey::Passwd), Some("secret"));
        assert_eq!(options.get(OptionKey::Action), Some("on"));
        assert_eq!(options.get(OptionKey::Port), Some("3"));
        assert!(options.unknown_options().is_empty());
    }

    #[test]
    fn last_write_wins() {
        let options = parse("ipaddr=1.1.1.1\nipaddr=2.2.2.2\n");
        assert_eq!(options.get(OptionKey::Ipaddr), Some("2.2.2.2"));
    }

    #[test]
    fn strips_whitespace_around_key_and_value() {
        let options = parse("   login =  admin  \r\n\tport\t=\t7\n");
        assert_eq!(options.get(OptionKey::Login), Some("admin"));
        assert_eq!(options.get(OptionKey::Port), Some("7"));
    }

    #[test]
    fn comment_lines_are_ignored_even_with_equals() {
        let options = parse("#ipaddr=10.0.0.9\nipaddr=10.0.0.1\n#foo=bar\n");
        assert_eq!(options.get(OptionKey::Ipaddr), Some("10.0.0.1"));
        assert!(options.unknown_options().is_empty());
    }

    #[test]
    fn comment_marker_must_be_first_character() {
        let options = parse(" #port=4\n");
        assert!(!options.contains(OptionKey::Port));
        assert_eq!(options.unknown_options(), ["#port".to_string()]);
    }

    #[test]
    fn splits_on_first_equals_only() {
        let options = parse("passwd=a=b=c\n");
        assert_eq!(options.get(OptionKey::Passwd), Some("a=b=c"));
    }

    #[test]
    fn lines_without_key_or_value_are_skipped() {
        let options = parse("=value\nport=\nport\n\n   \nnodename = node1\n");
        assert!(!options.contains(OptionKey::Port));
        assert_eq!(options.get(OptionKey::Nodename), Some("node1"));
        assert!(options.unknown_options().is_empty());
    }

    #[test]
    fn unknown_keys_are_collected_once_in_order() {
        let options = parse("foo=1\naction=list\nbar=2\nfoo=3\n");
        assert_eq!(options.unknown_options(), ["foo".to_string(), "bar".to_string()]);
        assert_eq!(
            options.unknown_options_warning().as_deref(),
            Some("Unknown options, ignoring: foo bar")
        );
        assert_eq!(options.get(OptionKey::Action), Some("list"));
    }

    #[test]
    fn option_names_are_case_sensitive() {
        let options = parse("IPADDR=10.0.0.1\n");
        assert!(!options.contains(OptionKey::Ipaddr));
        assert_eq!(options.unknown_options(), ["IPADDR".to_string()]);
    }

    #[test]
    fn no_warning_without_unknown_keys() {
        assert_eq!(parse("action=on\n").unknown_options_warning(), None);
    }
}
