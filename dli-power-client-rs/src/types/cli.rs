use clap::{ArgAction, Parser, Subcommand};

/// Control a Digital Loggers network power switch.
///
/// Settings not given here come from ~/.dlipower.conf. Without a command the
/// client opens an interactive prompt.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Hostname or address of the switch
    #[arg(long)]
    pub hostname: Option<String>,

    #[arg(long)]
    pub userid: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Seconds an outlet stays off during a cycle
    #[arg(long)]
    pub cycletime: Option<f64>,

    /// Write the effective settings to ~/.dlipower.conf
    #[arg(long)]
    pub save_config: bool,

    #[arg(long, short, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Turn an outlet on
    On { outlet: String },
    /// Turn an outlet off
    Off { outlet: String },
    /// Turn an outlet off, wait the cycle time, turn it back on
    Cycle { outlet: String },
    /// Print the state of one outlet
    Status { outlet: String },
    /// Print the state of every outlet
    PrintStatus,
}
