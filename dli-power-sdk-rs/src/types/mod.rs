pub mod config;
pub mod error;
pub mod outlet;

pub use config::{SwitchConfig, SwitchDefaults, SwitchSettings};
pub use error::DliPowerError;
pub use outlet::{Outlet, OutletState};
