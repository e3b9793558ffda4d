use crate::types::cli::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptInput {
    Run(Command),
    Quit,
    Empty,
    Invalid(String),
}

/// Reads one prompt line such as `off 3` or `status web server`.
pub fn parse_prompt_line(line: &str) -> PromptInput {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return PromptInput::Empty;
    };
    let outlet = parts.collect::<Vec<&str>>().join(" ");

    let command = match verb.to_lowercase().as_str() {
        "exit" | "quit" => return PromptInput::Quit,
        "print-status" | "printstatus" | "list" => Command::PrintStatus,
        "on" | "off" | "cycle" | "status" if outlet.is_empty() => {
            return PromptInput::Invalid(format!("{} needs an outlet", verb));
        }
        "on" => Command::On { outlet },
        "off" => Command::Off { outlet },
        "cycle" => Command::Cycle { outlet },
        "status" => Command::Status { outlet },
        _ => return PromptInput::Invalid(format!("Unknown command: {}", verb)),
    };
    PromptInput::Run(command)
}
