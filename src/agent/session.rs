use dli_power_sdk_rs::{DliPowerError, OutletState, PowerSwitch, SwitchConfig};
use tracing::{debug, error};

use crate::agent::validate::FenceRequest;
use crate::types::{AgentError, OptionKey};

/// The calls the dispatcher makes against a power switch.
///
/// Power calls return the process exit code for the action: 0 on success.
#[allow(async_fn_in_trait)]
pub trait PduSession {
    async fn turn_on(&mut self, outlet: i32) -> i32;
    async fn turn_off(&mut self, outlet: i32) -> i32;
    async fn power_cycle(&mut self, outlet: i32) -> i32;
    async fn outlet_status(&mut self, outlet: i32) -> OutletState;
    async fn print_outlets(&mut self) -> i32;
}

pub fn connect(request: &FenceRequest) -> Result<PowerSwitch, AgentError> {
    let config = SwitchConfig {
        hostname: Some(request.ipaddr.clone()),
        userid: Some(request.login.clone()),
        password: Some(request.passwd.clone()),
        timeout: parse_number(OptionKey::Timeout, request.timeout.as_deref())?,
        cycletime: parse_number(OptionKey::Cycletime, request.cycletime.as_deref())?,
    };
    debug!(switch = %request.ipaddr, timeout = ?config.timeout, cycletime = ?config.cycletime, "connecting");
    Ok(PowerSwitch::new(config)?)
}

fn parse_number<T: std::str::FromStr>(option: OptionKey, value: Option<&str>) -> Result<Option<T>, AgentError> {
    match value {
        None => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(|_| AgentError::InvalidNumber {
            option,
            value: value.to_string(),
        }),
    }
}

fn outlet_number(outlet: i32) -> Result<u32, DliPowerError> {
    u32::try_from(outlet).map_err(|_| DliPowerError::InvalidOutlet(outlet.to_string()))
}

fn exit_code(operation: &str, result: Result<(), DliPowerError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(switch_error) => {
            error!(operation, error = %switch_error, "power switch call failed");
            1
        }
    }
}

impl PduSession for PowerSwitch {
    async fn turn_on(&mut self, outlet: i32) -> i32 {
        let result = async { self.on(outlet_number(outlet)?).await }.await;
        exit_code("on", result)
    }

    async fn turn_off(&mut self, outlet: i32) -> i32 {
        let result = async { self.off(outlet_number(outlet)?).await }.await;
        exit_code("off", result)
    }

    async fn power_cycle(&mut self, outlet: i32) -> i32 {
        let result = async { self.cycle(outlet_number(outlet)?).await }.await;
        exit_code("cycle", result)
    }

    async fn outlet_status(&mut self, outlet: i32) -> OutletState {
        let result = async { self.status(outlet_number(outlet)?).await }.await;
        result.unwrap_or_else(|switch_error| {
            error!(operation = "status", error = %switch_error, "power switch call failed");
            OutletState::Unknown
        })
    }

    async fn print_outlets(&mut self) -> i32 {
        exit_code("list", self.print_status().await)
    }
}
