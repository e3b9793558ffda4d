use clap::Parser;

/// STONITH agent for Digital Loggers network power switches.
///
/// Reads `key=value` options (ipaddr, login, passwd, action, port, ...) from stdin.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Log more to stderr (-v info, -vv debug)
    #[arg(long, short, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
