use super::types::*;
use crate::error_handling::types::ConfigError;
use clap::Parser;
use log::{debug, info, LevelFilter};
use std::fs;
use std::path::{Path, PathBuf};

/// Command-line arguments.
///
/// Values given here take precedence over the configuration file, which in
/// turn takes precedence over the built-in defaults.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use pixiefilter::configuration::config::{Args, Config};
///
/// let config = Config::resolve(Args::parse()).expect("valid configuration");
/// println!("Tool: {}", config.tool.program);
/// ```
#[derive(Parser, Debug, Clone)]
#[command(name = "pixiefilter")]
#[command(version)]
#[command(
    about = "Extract WPS key-exchange values from wpa_supplicant/reaver debug output and run an offline PIN recovery tool with them"
)]
pub struct Args {
    /// Log file to read.
    ///
    /// When omitted the log is read from standard input until end of stream.
    pub input: Option<PathBuf>,

    /// TOML configuration file.
    ///
    /// Only a `[tool]` table is recognised, with the optional keys `program`,
    /// `shell`, `flag_style` and `mode`.
    ///
    /// # Command Line
    /// Use `--config <FILE>` or `-c <FILE>`
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Recovery tool to invoke (default `pixiewps`)
    #[arg(long, value_name = "PROGRAM")]
    pub tool: Option<String>,

    /// Shell used to run the command line (default `/bin/sh`)
    #[arg(long, value_name = "PATH")]
    pub shell: Option<PathBuf>,

    /// Option names passed to the tool
    #[arg(long, value_enum)]
    pub flag_style: Option<FlagStyle>,

    /// Replace this process with the tool, or run it as a child and report the PIN
    #[arg(long, value_enum)]
    pub mode: Option<LaunchMode>,

    /// Print the command line without running it
    ///
    /// # Command Line
    /// Use `--dry-run` or `-n`. This is a boolean flag that doesn't take a value
    #[arg(short = 'n', long, action = clap::ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Format of the field dump written to standard output
    #[arg(long, value_enum, default_value_t = DumpFormat::Text)]
    pub format: DumpFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `None` reads standard input
    pub input: Option<PathBuf>,
    pub tool: ToolConfig,
    pub dry_run: bool,
    pub format: DumpFormat,
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            tool: ToolConfig::default(),
            dry_run: false,
            format: DumpFormat::default(),
            verbosity: 0,
        }
    }
}

impl Config {
    /// Builds the configuration from parsed arguments, loading the file named
    /// by `--config` first when present.
    pub fn resolve(args: Args) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => Self::load_file(path)?,
            None => FileConfig::default(),
        };

        let defaults = ToolConfig::default();
        let tool = ToolConfig {
            program: args
                .tool
                .or(file.tool.program)
                .unwrap_or(defaults.program),
            shell: args.shell.or(file.tool.shell).unwrap_or(defaults.shell),
            flag_style: args
                .flag_style
                .or(file.tool.flag_style)
                .unwrap_or(defaults.flag_style),
            mode: args.mode.or(file.tool.mode).unwrap_or(defaults.mode),
        };

        if tool.program.trim().is_empty() {
            return Err(ConfigError::InvalidValue(String::from(
                "tool program must not be empty",
            )));
        }
        if tool.shell.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue(String::from(
                "shell path must not be empty",
            )));
        }

        let config = Config {
            input: args.input,
            tool,
            dry_run: args.dry_run,
            format: args.format,
            verbosity: args.verbose,
        };
        debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }

    /// Parses a TOML configuration file.
    pub fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
        info!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    pub fn parse_toml(content: &str) -> Result<FileConfig, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlError(e.to_string()))
    }

    pub fn log_level(&self) -> LevelFilter {
        log_level(self.verbosity)
    }
}

/// Log level matching the number of `-v` flags.
pub fn log_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args_under_test(extra: &[&str]) -> Args {
        let mut argv = vec!["pixiefilter"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap_or_else(|e| panic!("{}", e))
    }

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::resolve(args_under_test(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tool.program, "pixiewps");
        assert_eq!(config.tool.shell, PathBuf::from("/bin/sh"));
        assert_eq!(config.log_level(), LevelFilter::Warn);
    }

    #[test]
    fn test_from_args() {
        let config = Config::resolve(args_under_test(&[
            "capture.log",
            "--tool",
            "pixie-wrapper",
            "--shell",
            "/usr/bin/bash",
            "--flag-style",
            "short",
            "--mode",
            "wrapper",
            "--dry-run",
            "--format",
            "json",
            "-vv",
        ]))
        .unwrap();

        assert_eq!(config.input, Some(PathBuf::from("capture.log")));
        assert_eq!(config.tool.program, "pixie-wrapper");
        assert_eq!(config.tool.shell, PathBuf::from("/usr/bin/bash"));
        assert_eq!(config.tool.flag_style, FlagStyle::Short);
        assert_eq!(config.tool.mode, LaunchMode::Wrapper);
        assert!(config.dry_run);
        assert_eq!(config.format, DumpFormat::Json);
        assert_eq!(config.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_file_values_apply() {
        let file = config_file(
            "[tool]\nprogram = \"/opt/pixiewps\"\nflag_style = \"short\"\nmode = \"wrapper\"\n",
        );
        let path = file.path().to_str().unwrap();
        let config = Config::resolve(args_under_test(&["--config", path])).unwrap();

        assert_eq!(config.tool.program, "/opt/pixiewps");
        assert_eq!(config.tool.flag_style, FlagStyle::Short);
        assert_eq!(config.tool.mode, LaunchMode::Wrapper);
        assert_eq!(config.tool.shell, PathBuf::from("/bin/sh"));
    }

    #[test]
    fn test_args_override_file() {
        let file = config_file("[tool]\nprogram = \"from-file\"\nmode = \"wrapper\"\n");
        let path = file.path().to_str().unwrap();
        let config =
            Config::resolve(args_under_test(&["-c", path, "--tool", "from-args"])).unwrap();

        assert_eq!(config.tool.program, "from-args");
        assert_eq!(config.tool.mode, LaunchMode::Wrapper);
    }

    #[test]
    fn test_missing_file() {
        let result = Config::resolve(args_under_test(&[
            "--config",
            "/nonexistent/pixiefilter.toml",
        ]));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            Config::parse_toml("[tool]\nflag_style = \"medium\"\n"),
            Err(ConfigError::TomlError(_))
        ));
        assert!(matches!(
            Config::parse_toml("[tool]\nunknown = 1\n"),
            Err(ConfigError::TomlError(_))
        ));
    }

    #[test]
    fn test_empty_file_is_defaults() {
        assert_eq!(Config::parse_toml("").unwrap(), FileConfig::default());
    }

    #[test]
    fn test_empty_program_rejected() {
        let result = Config::resolve(args_under_test(&["--tool", " "]));
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_unknown_flag_style_rejected_by_parser() {
        assert!(Args::try_parse_from(["pixiefilter", "--flag-style", "medium"]).is_err());
    }
}
