use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::error::DliPowerError;

// Outlet rows on /index.htm: number cell, name cell, then a state cell whose text
// may be wrapped in <b>/<font> tags.
const OUTLET_ROW_PATTERN: &str =
    r"(?is)<tr[^>]*>\s*<td[^>]*>\s*(\d+)\s*</td>\s*<td[^>]*>(.*?)</td>\s*<td[^>]*>(?:\s*<[^>]+>)*\s*([A-Za-z]+)";
const TAG_PATTERN: &str = r"<[^>]*>";

static OUTLET_ROW_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(OUTLET_ROW_PATTERN).expect("outlet row pattern compiles"));
static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(TAG_PATTERN).expect("tag pattern compiles"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutletState {
    On,
    Off,
    Unknown,
    Other(String),
}

impl OutletState {
    pub fn parse(raw_state: &str) -> Self {
        let raw_state = raw_state.trim();
        match raw_state.to_uppercase().as_str() {
            "ON" => OutletState::On,
            "OFF" => OutletState::Off,
            "" | "UNKNOWN" => OutletState::Unknown,
            _ => OutletState::Other(raw_state.to_string()),
        }
    }
}

impl fmt::Display for OutletState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutletState::On => write!(f, "ON"),
            OutletState::Off => write!(f, "OFF"),
            OutletState::Unknown => write!(f, "Unknown"),
            OutletState::Other(raw_state) => write!(f, "{}", raw_state),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outlet {
    pub number: u32,
    pub name: String,
    pub state: OutletState,
}

pub fn parse_outlet_rows(page: &str) -> Result<Vec<Outlet>, DliPowerError> {
    let mut outlets = vec![];
    for captures in OUTLET_ROW_REGEX.captures_iter(page) {
        let number = captures[1]
            .parse::<u32>()
            .map_err(|error| DliPowerError::Parse(format!("bad outlet number {}: {}", &captures[1], error)))?;
        let name = TAG_REGEX
            .replace_all(&captures[2], "")
            .replace("&nbsp;", " ")
            .trim()
            .to_string();

        outlets.push(Outlet {
            number,
            name,
            state: OutletState::parse(&captures[3]),
        });
    }
    Ok(outlets)
}

pub fn format_status_table(outlets: &[Outlet]) -> String {
    let mut table = format!("{}\t{:<15}\t{}\n", "Outlet", "Name", "State");
    for outlet in outlets {
        let name: String = outlet.name.chars().take(15).collect();
        table.push_str(&format!("{}\t{:<15}\t{}\n", outlet.number, name, outlet.state));
    }
    table
}
