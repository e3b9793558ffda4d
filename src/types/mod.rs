pub use cli::Args;
pub use error::AgentError;
pub use options::{OptionKey, OptionSet};

pub mod cli;
pub mod error;
pub mod options;
