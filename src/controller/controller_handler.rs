use log::{debug, info, warn};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use crate::command::builder::build_command;
use crate::command::launcher::{LaunchOutcome, Launcher};
use crate::configuration::config::Config;
use crate::configuration::types::DumpFormat;
use crate::error_handling::types::*;
use crate::extraction::extractor::Extractor;
use crate::extraction::record::{Field, Record};

/// How a run ended when no error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// End of input reached without every required field.
    Incomplete { missing: Vec<Field> },
    /// Command was printed but not launched.
    DryRun(String),
    /// The launcher returned (wrapper mode, or exec fallback).
    Launched(LaunchOutcome),
}

/// Opens the log source: a file when a path is given, standard input otherwise.
pub fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>, InputError> {
    match path {
        Some(path) => {
            info!("Reading log from {}", path.display());
            Ok(Box::new(BufReader::new(File::open(path)?)))
        }
        None => {
            info!("Reading log from standard input");
            Ok(Box::new(BufReader::new(io::stdin())))
        }
    }
}

/// Reads one line without its `\n` / `\r\n` terminator.
///
/// Returns `None` at end of stream. Bytes that are not UTF-8 are replaced
/// rather than failing the read; debug logs routinely carry binary junk.
fn next_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> Result<Option<String>, InputError> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

pub struct Controller {
    pub config: Config,
}

impl Controller {
    pub fn new(config: Config) -> Self {
        debug!("Controller created for tool {}", config.tool.program);
        Self { config }
    }

    /// Consumes the whole input and returns the collected record.
    ///
    /// Stops at the first fatal extraction error; nothing collected so far is
    /// returned in that case.
    pub fn extract<R: BufRead>(&self, mut reader: R) -> Result<Record, ControllerError> {
        let mut extractor = Extractor::new();
        let mut buf = Vec::new();
        while let Some(line) = next_line(&mut reader, &mut buf)? {
            extractor.feed(&line)?;
        }
        info!(
            "Read {} lines, extracted {} values",
            extractor.lines_seen(),
            extractor.fields_extracted()
        );
        Ok(extractor.into_record())
    }

    /// Writes the nine-field dump in the configured format.
    pub fn report<W: Write>(&self, record: &Record, out: &mut W) -> Result<(), ControllerError> {
        let written = match self.config.format {
            DumpFormat::Text => writeln!(out, "{}", record),
            DumpFormat::Json => {
                let json = record.to_json().map_err(|e| {
                    ControllerError::OutputFailed(io::Error::new(io::ErrorKind::InvalidData, e))
                })?;
                writeln!(out, "{}", json)
            }
        };
        written.map_err(ControllerError::OutputFailed)
    }

    /// Extract, dump, and launch the recovery tool when the record is complete.
    ///
    /// With a process-replacing launcher a successful launch does not return.
    pub fn run<R: BufRead, W: Write>(
        &self,
        reader: R,
        out: &mut W,
        launcher: &dyn Launcher,
    ) -> Result<RunOutcome, ControllerError> {
        let record = self.extract(reader)?;
        self.report(&record, out)?;

        if !record.is_complete() {
            let missing = record.missing_required();
            info!(
                "Not enough data for {}, missing: {}",
                self.config.tool.program,
                missing
                    .iter()
                    .map(|f| f.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            out.flush().map_err(ControllerError::OutputFailed)?;
            return Ok(RunOutcome::Incomplete { missing });
        }

        let command = build_command(&record, &self.config.tool)?;
        writeln!(out, "running {}", command).map_err(ControllerError::OutputFailed)?;
        out.flush().map_err(ControllerError::OutputFailed)?;

        if self.config.dry_run {
            info!("Dry run, not launching");
            return Ok(RunOutcome::DryRun(command));
        }

        info!("Launching via {}", launcher.name());
        let outcome = launcher.launch(&command).map_err(|e| {
            warn!("Launch failed: {}", e);
            ControllerError::LaunchError(e)
        })?;
        Ok(RunOutcome::Launched(outcome))
    }
}
