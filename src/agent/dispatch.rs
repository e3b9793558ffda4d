use dli_power_sdk_rs::OutletState;
use tracing::{info, warn};

use crate::agent::session::PduSession;
use crate::agent::validate::FenceRequest;
use crate::types::AgentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The action decided the exit code.
    Exit(i32),
    /// No branch chose an exit code: a status string outside ON/OFF/Unknown,
    /// or an action the agent has no handler for.
    FellThrough,
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Exit(code) => *code,
            Outcome::FellThrough => 0,
        }
    }
}

pub async fn dispatch<S: PduSession>(request: &FenceRequest, session: &mut S) -> Result<Outcome, AgentError> {
    let action = request.action.to_lowercase();
    info!(action = %action, port = ?request.port, "dispatching");

    let outcome = match action.as_str() {
        "off" => Outcome::Exit(session.turn_off(request.port_number()?).await),
        "on" => Outcome::Exit(session.turn_on(request.port_number()?).await),
        "reboot" => Outcome::Exit(session.power_cycle(request.port_number()?).await),
        "status" => match session.outlet_status(request.port_number()?).await {
            OutletState::On => Outcome::Exit(0),
            OutletState::Unknown => Outcome::Exit(1),
            OutletState::Off => Outcome::Exit(2),
            OutletState::Other(raw_state) => {
                warn!(state = %raw_state, "switch reported an unrecognized outlet state");
                Outcome::FellThrough
            }
        },
        "list" | "monitor" => Outcome::Exit(session.print_outlets().await),
        _ => {
            warn!(action = %request.action, "unsupported action, nothing to do");
            Outcome::FellThrough
        }
    };
    Ok(outcome)
}
