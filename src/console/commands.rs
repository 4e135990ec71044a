//! Command handlers

use core::fmt::Write;

use super::control::KeyerControl;
use super::parser::ParsedCommand;
use super::ConsoleError;
use crate::config::{find_param, find_params_matching, KeyerConfig, ParamDescriptor, PARAMS};
use crate::element::Element;
use crate::session::Snapshot;

/// Command descriptor
pub struct CommandDescriptor {
    pub name: &'static str,
    pub usage: &'static str,
    pub brief: &'static str,
    pub handler: fn(&ParsedCommand<'_>, &mut dyn KeyerControl, &mut dyn Write) -> Result<(), ConsoleError>,
}

/// All available commands
pub static COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor { name: "help", usage: "[cmd]", brief: "List commands", handler: cmd_help },
    CommandDescriptor { name: "press", usage: "<dit|dah>", brief: "Close a paddle", handler: cmd_press },
    CommandDescriptor { name: "release", usage: "<dit|dah>", brief: "Open a paddle", handler: cmd_release },
    CommandDescriptor { name: "tap", usage: "<dit|dah> [ms]", brief: "Press, hold, release", handler: cmd_tap },
    CommandDescriptor { name: "wait", usage: "<ms>", brief: "Let time pass", handler: cmd_wait },
    CommandDescriptor { name: "set", usage: "<param> <value>", brief: "Set parameter value", handler: cmd_set },
    CommandDescriptor { name: "show", usage: "[param|prefix*]", brief: "Show parameters", handler: cmd_show },
    CommandDescriptor { name: "send", usage: "<text>", brief: "Play text as Morse", handler: cmd_send },
    CommandDescriptor { name: "clear", usage: "", brief: "Clear decoded text", handler: cmd_clear },
    CommandDescriptor { name: "text", usage: "", brief: "Show decoded text", handler: cmd_text },
    CommandDescriptor { name: "stats", usage: "", brief: "Timer statistics", handler: cmd_stats },
];

/// Execute a parsed command
pub fn execute(
    cmd: &ParsedCommand<'_>,
    keyer: &mut dyn KeyerControl,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if cmd.command.is_empty() {
        return Ok(()); // Empty line, do nothing
    }

    let handler = COMMANDS
        .iter()
        .find(|c| c.name == cmd.command)
        .ok_or(ConsoleError::UnknownCommand)?;

    (handler.handler)(cmd, keyer, out)
}

/// Get all command names
pub fn command_names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|c| c.name)
}

// --- Command Implementations ---

fn cmd_help(
    cmd: &ParsedCommand<'_>,
    _keyer: &mut dyn KeyerControl,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if let Some(name) = cmd.arg(0) {
        let c = COMMANDS
            .iter()
            .find(|c| c.name == name)
            .ok_or(ConsoleError::UnknownCommand)?;
        let _ = writeln!(out, "{} {}: {}", c.name, c.usage, c.brief);
    } else {
        for c in COMMANDS {
            let _ = writeln!(out, "  {:<8} {:<16} {}", c.name, c.usage, c.brief);
        }
    }
    Ok(())
}

fn element_arg(cmd: &ParsedCommand<'_>) -> Result<Element, ConsoleError> {
    cmd.arg(0)
        .ok_or(ConsoleError::MissingArg)?
        .parse()
        .map_err(|_| ConsoleError::InvalidValue)
}

fn ms_arg(value: &str) -> Result<u64, ConsoleError> {
    value.parse().map_err(|_| ConsoleError::InvalidValue)
}

fn cmd_press(
    cmd: &ParsedCommand<'_>,
    keyer: &mut dyn KeyerControl,
    _out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    keyer.press(element_arg(cmd)?)
}

fn cmd_release(
    cmd: &ParsedCommand<'_>,
    keyer: &mut dyn KeyerControl,
    _out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    keyer.release(element_arg(cmd)?)
}

fn cmd_tap(
    cmd: &ParsedCommand<'_>,
    keyer: &mut dyn KeyerControl,
    _out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let element = element_arg(cmd)?;
    let hold_ms = cmd.arg(1).map(ms_arg).transpose()?;

    keyer.press(element)?;
    if let Some(ms) = hold_ms {
        keyer.wait(ms)?;
    }
    keyer.release(element)
}

fn cmd_wait(
    cmd: &ParsedCommand<'_>,
    keyer: &mut dyn KeyerControl,
    _out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let ms = ms_arg(cmd.arg(0).ok_or(ConsoleError::MissingArg)?)?;
    keyer.wait(ms)
}

fn cmd_set(
    cmd: &ParsedCommand<'_>,
    keyer: &mut dyn KeyerControl,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let name = cmd.arg(0).ok_or(ConsoleError::MissingArg)?;
    let value = cmd.arg(1).ok_or(ConsoleError::MissingArg)?;

    let param = find_param(name).ok_or(ConsoleError::UnknownCommand)?;
    let v: u64 = value.parse().map_err(|_| ConsoleError::InvalidValue)?;
    if !param.in_range(v) {
        return Err(ConsoleError::OutOfRange);
    }

    keyer.set_param(param, v)?;

    let _ = writeln!(out, "{}={}", param.name, v);
    Ok(())
}

fn cmd_show(
    cmd: &ParsedCommand<'_>,
    keyer: &mut dyn KeyerControl,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let config = keyer.snapshot().config;

    match cmd.arg(0) {
        Some(pattern) if pattern.ends_with('*') => {
            for p in find_params_matching(pattern) {
                write_param(p, &config, out);
            }
        }
        Some(name) => {
            let param = find_param(name).ok_or(ConsoleError::UnknownCommand)?;
            write_param(param, &config, out);
        }
        None => {
            for p in PARAMS {
                write_param(p, &config, out);
            }
        }
    }
    Ok(())
}

fn write_param(p: &ParamDescriptor, config: &KeyerConfig, out: &mut dyn Write) {
    let _ = writeln!(out, "{}={}", p.name, (p.get)(config));
}

fn cmd_send(
    cmd: &ParsedCommand<'_>,
    keyer: &mut dyn KeyerControl,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if cmd.rest.is_empty() {
        return Err(ConsoleError::MissingArg);
    }
    keyer.send_text(cmd.rest)?;
    let _ = writeln!(out, "sending: {}", cmd.rest.to_uppercase());
    Ok(())
}

fn cmd_clear(
    _cmd: &ParsedCommand<'_>,
    keyer: &mut dyn KeyerControl,
    _out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    keyer.clear()
}

fn cmd_text(
    _cmd: &ParsedCommand<'_>,
    keyer: &mut dyn KeyerControl,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let Snapshot {
        decoded_text,
        morse_buffer,
        ..
    } = keyer.snapshot();
    let _ = writeln!(out, "{}", decoded_text);
    if !morse_buffer.is_empty() {
        let _ = writeln!(out, "pending: {}", morse_buffer);
    }
    Ok(())
}

fn cmd_stats(
    _cmd: &ParsedCommand<'_>,
    keyer: &mut dyn KeyerControl,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let snapshot = keyer.snapshot();
    let stats = snapshot.stats;
    let _ = writeln!(out, "elements: {}", stats.elements);
    let _ = writeln!(
        out,
        "timers:   {} fired, {} late ({:.1}%)",
        stats.fired,
        stats.late,
        stats.late_ratio() * 100.0
    );
    let _ = writeln!(out, "max late: {}us", stats.max_lateness_us);
    let _ = writeln!(out, "stale:    {}", stats.stale_steps);
    let _ = writeln!(out, "keying:   {}", if snapshot.keying { "yes" } else { "no" });
    let _ = writeln!(out, "sending:  {}", if snapshot.sending { "yes" } else { "no" });
    Ok(())
}
