use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    InvalidValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::InvalidValue(e) => write!(f, "Invalid configuration value: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

/// Fatal conditions raised while pulling a field out of a hexdump line.
///
/// Any of these aborts the whole run: a capture with one corrupt value is
/// not trusted for the others either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// Hex payload length (in characters) differs from twice the field's byte size.
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    /// The line matched a field marker but carried no payload part.
    MissingPayload { field: &'static str },
    /// The payload could not be decoded into raw bytes.
    InvalidHex { field: &'static str, reason: String },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::LengthMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "{} has {} hex characters, expected {}",
                field, actual, expected
            ),
            ExtractError::MissingPayload { field } => {
                write!(f, "{} line carries no hexdump payload", field)
            }
            ExtractError::InvalidHex { field, reason } => {
                write!(f, "{} payload is not valid hex: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ExtractError {}

#[derive(Debug)]
pub enum InputError {
    Io(std::io::Error),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Io(e) => write!(f, "Input read error: {}", e),
        }
    }
}

impl std::error::Error for InputError {}

impl From<std::io::Error> for InputError {
    fn from(err: std::io::Error) -> Self {
        InputError::Io(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Required fields still unset; names listed in dump order.
    Incomplete { missing: Vec<&'static str> },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Incomplete { missing } => {
                write!(f, "Record is incomplete, missing: {}", missing.join(", "))
            }
        }
    }
}

impl std::error::Error for CommandError {}

#[derive(Debug)]
pub enum LaunchError {
    Spawn(std::io::Error),
    Exec(std::io::Error),
    Io(std::io::Error),
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchError::Spawn(e) => write!(f, "Failed to spawn command: {}", e),
            LaunchError::Exec(e) => write!(f, "Failed to replace process image: {}", e),
            LaunchError::Io(e) => write!(f, "Command output error: {}", e),
        }
    }
}

impl std::error::Error for LaunchError {}

#[derive(Debug)]
pub enum ControllerError {
    ConfigurationError(ConfigError),
    InputError(InputError),
    ExtractError(ExtractError),
    CommandError(CommandError),
    LaunchError(LaunchError),
    OutputFailed(std::io::Error),
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::ConfigurationError(e) => write!(f, "Configuration error: {}", e),
            ControllerError::InputError(e) => write!(f, "Input error: {}", e),
            ControllerError::ExtractError(e) => write!(f, "Extraction error: {}", e),
            ControllerError::CommandError(e) => write!(f, "Command error: {}", e),
            ControllerError::LaunchError(e) => write!(f, "Launch error: {}", e),
            ControllerError::OutputFailed(e) => write!(f, "Output failed: {}", e),
        }
    }
}

impl std::error::Error for ControllerError {}

impl From<ConfigError> for ControllerError {
    fn from(err: ConfigError) -> Self {
        ControllerError::ConfigurationError(err)
    }
}

impl From<InputError> for ControllerError {
    fn from(err: InputError) -> Self {
        ControllerError::InputError(err)
    }
}

impl From<ExtractError> for ControllerError {
    fn from(err: ExtractError) -> Self {
        ControllerError::ExtractError(err)
    }
}

impl From<CommandError> for ControllerError {
    fn from(err: CommandError) -> Self {
        ControllerError::CommandError(err)
    }
}

impl From<LaunchError> for ControllerError {
    fn from(err: LaunchError) -> Self {
        ControllerError::LaunchError(err)
    }
}
