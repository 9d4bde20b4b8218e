use log::debug;

use crate::configuration::types::{FlagStyle, ToolConfig};
use crate::error_handling::types::CommandError;
use crate::extraction::record::{Field, Record};

/// Record fields in the order the tool's options are emitted.
const ARGUMENT_ORDER: [Field; 6] = [
    Field::PeerPublicKey,
    Field::OwnPublicKey,
    Field::EHash1,
    Field::EHash2,
    Field::AuthKey,
    Field::ENonce,
];

/// Flag/value pairs for the recovery tool.
///
/// Refuses an incomplete record rather than emitting empty values.
pub fn build_args(record: &Record, style: FlagStyle) -> Result<Vec<String>, CommandError> {
    let missing = record.missing_required();
    if !missing.is_empty() {
        return Err(CommandError::Incomplete {
            missing: missing.into_iter().map(Field::name).collect(),
        });
    }

    let mut args = Vec::with_capacity(ARGUMENT_ORDER.len() * 2);
    for (flag, field) in style.flags().iter().zip(ARGUMENT_ORDER) {
        args.push((*flag).to_string());
        args.push(record.hex(field).unwrap_or_default().to_string());
    }
    Ok(args)
}

/// Makes `value` a single shell word with no expansion.
///
/// Plain hex passes through untouched; anything else is single-quoted with
/// embedded quotes closed, escaped and reopened.
pub fn shell_quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'));
    if plain {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', "'\\''"))
}

/// Full command line, ready to be handed to a shell.
///
/// Values come straight from the log, so each one is quoted before joining.
/// The program name is configuration and is passed as written.
pub fn build_command(record: &Record, tool: &ToolConfig) -> Result<String, CommandError> {
    let args = build_args(record, tool.flag_style)?;
    let quoted: Vec<String> = args.iter().map(|a| shell_quote(a)).collect();
    let command = format!("{} {}", tool.program, quoted.join(" "));
    debug!("Built command for {}", tool.program);
    Ok(command)
}
