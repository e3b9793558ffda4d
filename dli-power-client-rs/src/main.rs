use std::io;
use std::process;

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use dli_power_sdk_rs::{DliPowerError, PowerSwitch, SwitchConfig, SwitchDefaults};

use crate::types::{parse_prompt_line, Args, Command, PromptInput};

mod types;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = SwitchConfig {
        hostname: args.hostname,
        userid: args.userid,
        password: args.password,
        timeout: args.timeout,
        cycletime: args.cycletime,
    };
    let mut switch = match PowerSwitch::new(config) {
        Ok(switch) => switch,
        Err(error) => {
            eprintln!("Aborting. Could not set up the power switch: {}", error);
            process::exit(1);
        }
    };

    if args.save_config {
        if let Err(error) = SwitchDefaults::from(switch.settings()).save() {
            eprintln!("Could not save defaults: {}", error);
            process::exit(1);
        }
    }

    match args.command {
        Some(command) => process::exit(run_command(&mut switch, command).await),
        None => prompt(switch).await,
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter = EnvFilter::try_from_env("DLIPOWER_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

async fn run_command(switch: &mut PowerSwitch, command: Command) -> i32 {
    match execute(switch, command).await {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("Error executing command: {}", error);
            1
        }
    }
}

async fn execute(switch: &mut PowerSwitch, command: Command) -> Result<(), DliPowerError> {
    match command {
        Command::On { outlet } => {
            let outlet = switch.determine_outlet(&outlet).await?;
            switch.on(outlet).await
        }
        Command::Off { outlet } => {
            let outlet = switch.determine_outlet(&outlet).await?;
            switch.off(outlet).await
        }
        Command::Cycle { outlet } => {
            let outlet = switch.determine_outlet(&outlet).await?;
            switch.cycle(outlet).await
        }
        Command::Status { outlet } => {
            let outlet = switch.determine_outlet(&outlet).await?;
            println!("{}", switch.status(outlet).await?);
            Ok(())
        }
        Command::PrintStatus => switch.print_status().await,
    }
}

async fn prompt(mut switch: PowerSwitch) {
    let mut line = match DefaultEditor::new() {
        Ok(line) => line,
        Err(error) => {
            eprintln!("Aborting. Could not open the prompt: {}", error);
            process::exit(1);
        }
    };

    loop {
        let user_input = match line.readline("dlipower >> ") {
            Ok(user_input) => user_input,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                break;
            }
        };
        let _ = line.add_history_entry(user_input.as_str());

        match parse_prompt_line(&user_input) {
            PromptInput::Run(command) => {
                run_command(&mut switch, command).await;
            }
            PromptInput::Quit => break,
            PromptInput::Empty => {}
            PromptInput::Invalid(message) => println!("{}", message),
        }
    }
}
