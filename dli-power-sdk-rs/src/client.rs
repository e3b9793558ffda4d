use tokio::time::sleep;
use tracing::{info, warn};

use crate::connection::{Authentication, Connection};
use crate::types::outlet::{format_status_table, parse_outlet_rows};
use crate::types::{DliPowerError, Outlet, OutletState, SwitchConfig, SwitchDefaults, SwitchSettings};

const STATUS_PAGE: &str = "/index.htm";

/// A session with one Digital Loggers power switch.
///
/// The session logs in on first use. Every call is a single request/response
/// exchange and fails straight away; nothing is retried.
pub struct PowerSwitch {
    settings: SwitchSettings,
    connection: Connection,
}

impl PowerSwitch {
    /// Connects using `~/.dlipower.conf` for every value `config` leaves unset.
    pub fn new(config: SwitchConfig) -> Result<Self, DliPowerError> {
        let defaults = SwitchDefaults::load()?;
        Self::with_defaults(config, &defaults)
    }

    pub fn with_defaults(config: SwitchConfig, defaults: &SwitchDefaults) -> Result<Self, DliPowerError> {
        let settings = config.resolve(defaults)?;
        let connection = Connection::new(&settings)?;
        Ok(Self {
            settings,
            connection,
        })
    }

    pub fn settings(&self) -> &SwitchSettings {
        &self.settings
    }

    pub fn authentication(&self) -> Option<Authentication> {
        self.connection.authentication()
    }

    pub async fn login(&mut self) -> Result<Authentication, DliPowerError> {
        self.connection.login().await
    }

    pub async fn statuslist(&mut self) -> Result<Vec<Outlet>, DliPowerError> {
        let status_page = self.connection.get_page(STATUS_PAGE).await?;
        parse_outlet_rows(&status_page)
    }

    pub async fn status(&mut self, outlet: u32) -> Result<OutletState, DliPowerError> {
        check_outlet(outlet)?;
        let outlets = self.statuslist().await?;
        let state = outlets
            .into_iter()
            .find(|candidate| candidate.number == outlet)
            .map(|found| found.state)
            .unwrap_or(OutletState::Unknown);
        Ok(state)
    }

    pub async fn on(&mut self, outlet: u32) -> Result<(), DliPowerError> {
        self.switch(outlet, OutletState::On).await
    }

    pub async fn off(&mut self, outlet: u32) -> Result<(), DliPowerError> {
        self.switch(outlet, OutletState::Off).await
    }

    pub async fn cycle(&mut self, outlet: u32) -> Result<(), DliPowerError> {
        self.off(outlet).await?;
        sleep(self.settings.cycletime).await;
        self.on(outlet).await
    }

    pub async fn print_status(&mut self) -> Result<(), DliPowerError> {
        let outlets = self.statuslist().await?;
        print!("{}", format_status_table(&outlets));
        Ok(())
    }

    /// Resolves an outlet given either as a number or as its configured name.
    pub async fn determine_outlet(&mut self, outlet: &str) -> Result<u32, DliPowerError> {
        let outlet = outlet.trim();
        if let Ok(number) = outlet.parse::<u32>() {
            check_outlet(number)?;
            return Ok(number);
        }

        let outlets = self.statuslist().await?;
        outlets
            .iter()
            .find(|candidate| candidate.name.eq_ignore_ascii_case(outlet))
            .map(|found| found.number)
            .ok_or_else(|| DliPowerError::InvalidOutlet(outlet.to_string()))
    }

    async fn switch(&mut self, outlet: u32, target: OutletState) -> Result<(), DliPowerError> {
        check_outlet(outlet)?;
        let command = if target == OutletState::On { "ON" } else { "OFF" };

        self.connection.get_page(&format!("/outlet?{}={}", outlet, command)).await?;

        let actual = self.status(outlet).await?;
        if actual != target {
            warn!(outlet, %actual, expected = %target, "outlet did not change state");
            return Err(DliPowerError::StateMismatch {
                outlet,
                expected: target,
                actual,
            });
        }
        info!(outlet, state = %actual, "switched outlet");
        Ok(())
    }
}

fn check_outlet(outlet: u32) -> Result<(), DliPowerError> {
    if outlet == 0 {
        return Err(DliPowerError::InvalidOutlet(outlet.to_string()));
    }
    Ok(())
}
