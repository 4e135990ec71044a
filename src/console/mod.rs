//! Text console for driving the keyer.
//!
//! One line in, one command executed. The same commands run interactively
//! against the real-time runtime and from script files in virtual time.

pub mod commands;
pub mod control;
pub mod error;
pub mod parser;

pub use commands::{command_names, execute, CommandDescriptor, COMMANDS};
pub use control::{KeyerControl, ScriptSession, WAIT_MAX_MS};
pub use error::ConsoleError;
pub use parser::{parse_line, ParsedCommand};

/// Parse and execute one line, writing any output to `out`.
pub fn run_line(
    line: &str,
    keyer: &mut dyn KeyerControl,
    out: &mut dyn core::fmt::Write,
) -> Result<(), ConsoleError> {
    execute(&parse_line(line), keyer, out)
}
