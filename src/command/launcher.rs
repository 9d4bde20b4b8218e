use log::{debug, info, warn};
use regex::Regex;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::OnceLock;

use crate::configuration::types::{LaunchMode, ToolConfig};
use crate::error_handling::types::LaunchError;

/// Result of handing a command line to a [`Launcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The command ran as a child and exited with this status.
    Exited(i32),
    /// The tool reported a PIN. An empty string is the valid empty PIN.
    PinFound(String),
    PinNotFound,
}

/// Boundary between the extractor and the operating system.
pub trait Launcher {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    fn launch(&self, command_line: &str) -> Result<LaunchOutcome, LaunchError>;
}

/// Builds the launcher selected by the configuration.
pub fn launcher_for(tool: &ToolConfig) -> Box<dyn Launcher> {
    match tool.mode {
        LaunchMode::Exec => Box::new(ShellExec::new(&tool.shell)),
        LaunchMode::Wrapper => Box::new(WrapperRunner::new(&tool.shell)),
    }
}

fn shell_command(shell: &Path, command_line: &str) -> Command {
    let mut command = Command::new(shell);
    command.arg("-c").arg(command_line);
    command
}

/// Replaces the current process with `shell -c <command>`.
///
/// On success this never returns. Platforms without `exec` fall back to
/// running the command and reporting its exit status.
pub struct ShellExec {
    shell: PathBuf,
}

impl ShellExec {
    pub fn new(shell: &Path) -> Self {
        Self {
            shell: shell.to_path_buf(),
        }
    }

    #[cfg(unix)]
    fn run(&self, command_line: &str) -> Result<LaunchOutcome, LaunchError> {
        use std::os::unix::process::CommandExt;

        let err = shell_command(&self.shell, command_line).exec();
        Err(LaunchError::Exec(err))
    }

    #[cfg(not(unix))]
    fn run(&self, command_line: &str) -> Result<LaunchOutcome, LaunchError> {
        let status = shell_command(&self.shell, command_line)
            .status()
            .map_err(LaunchError::Spawn)?;
        Ok(LaunchOutcome::Exited(status.code().unwrap_or(1)))
    }
}

impl Launcher for ShellExec {
    fn name(&self) -> &'static str {
        "exec"
    }

    fn launch(&self, command_line: &str) -> Result<LaunchOutcome, LaunchError> {
        info!("Handing over to {}", self.shell.display());
        self.run(command_line)
    }
}

fn pin_line() -> &'static Regex {
    static PIN_LINE: OnceLock<Regex> = OnceLock::new();
    PIN_LINE.get_or_init(|| {
        Regex::new(r"\[\+\] WPS pin:\s*(?P<pin>\S*)").expect("static pattern compiles")
    })
}

/// What a wrapper printed, as far as PIN reporting is concerned.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WrapperOutput {
    /// PIN from a `[+] WPS pin:` line, if one was printed.
    pub reported_pin: Option<String>,
    /// Last line printed, terminator stripped.
    pub last_line: String,
}

/// Copies the wrapper's output to `echo` line by line while watching for a
/// PIN report.
pub fn scan_wrapper_output<R: BufRead, W: Write>(
    mut reader: R,
    echo: &mut W,
) -> std::io::Result<WrapperOutput> {
    let mut output = WrapperOutput::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        echo.write_all(&buf)?;
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        if let Some(caps) = pin_line().captures(line) {
            let pin = &caps["pin"];
            let pin = if line.contains("empty") {
                String::new()
            } else {
                pin.chars().take(8).collect()
            };
            debug!("Wrapper reported pin {:?}", pin);
            output.reported_pin = Some(pin);
        }
        output.last_line = line.to_string();
    }
    echo.flush()?;
    Ok(output)
}

/// Maps a wrapper's exit status and output to an outcome.
///
/// A zero status means success; the reported PIN is preferred, otherwise the
/// last printed line is taken as the PIN.
pub fn interpret_wrapper(success: bool, output: WrapperOutput) -> LaunchOutcome {
    if !success {
        return LaunchOutcome::PinNotFound;
    }
    LaunchOutcome::PinFound(output.reported_pin.unwrap_or(output.last_line))
}

/// Relays a spawned wrapper's output to `echo` and waits for it to exit.
///
/// If relaying fails the child is killed and reaped before the error is
/// returned.
fn relay_and_wait<W: Write>(
    child: &mut Child,
    echo: &mut W,
) -> Result<(WrapperOutput, ExitStatus), LaunchError> {
    let scanned = match child.stdout.take() {
        Some(stdout) => scan_wrapper_output(BufReader::new(stdout), echo),
        None => Ok(WrapperOutput::default()),
    };
    let output = match scanned {
        Ok(output) => output,
        Err(e) => {
            warn!("Relaying wrapper output failed: {}", e);
            if let Err(kill_err) = child.kill() {
                debug!("Wrapper already gone: {}", kill_err);
            }
            let _ = child.wait();
            return Err(LaunchError::Io(e));
        }
    };
    let status = child.wait().map_err(LaunchError::Io)?;
    Ok((output, status))
}

/// Runs the command as a child process, relays its standard output and
/// reports the PIN it finds.
pub struct WrapperRunner {
    shell: PathBuf,
}

impl WrapperRunner {
    pub fn new(shell: &Path) -> Self {
        Self {
            shell: shell.to_path_buf(),
        }
    }
}

impl Launcher for WrapperRunner {
    fn name(&self) -> &'static str {
        "wrapper"
    }

    fn launch(&self, command_line: &str) -> Result<LaunchOutcome, LaunchError> {
        let mut child = shell_command(&self.shell, command_line)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(LaunchError::Spawn)?;
        debug!("Wrapper running with pid {}", child.id());

        let stdout_handle = std::io::stdout();
        let mut echo = stdout_handle.lock();
        let (output, status) = relay_and_wait(&mut child, &mut echo)?;
        if !status.success() {
            warn!("Wrapper exited with {}", status);
        }
        Ok(interpret_wrapper(status.success(), output))
    }
}
