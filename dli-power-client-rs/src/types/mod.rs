pub use cli::{Args, Command};
pub use prompt::{parse_prompt_line, PromptInput};

pub mod cli;
pub mod prompt;
