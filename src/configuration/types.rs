use clap::ValueEnum;
use serde::Deserialize;
use std::path::PathBuf;

/// Which option names the recovery tool is invoked with.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FlagStyle {
    /// `--pke --pkr --e-hash1 --e-hash2 --authkey --e-nonce`
    #[default]
    Long,
    /// `-e -r -s -z -a -n`
    Short,
}

impl FlagStyle {
    /// Option names in the fixed argument order: peer key, own key, hash1,
    /// hash2, auth key, nonce.
    pub fn flags(self) -> [&'static str; 6] {
        match self {
            FlagStyle::Long => ["--pke", "--pkr", "--e-hash1", "--e-hash2", "--authkey", "--e-nonce"],
            FlagStyle::Short => ["-e", "-r", "-s", "-z", "-a", "-n"],
        }
    }
}

/// How the built command is handed to the operating system.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    /// Replace this process with `shell -c <command>`.
    #[default]
    Exec,
    /// Run the command as a child, relay its output and look for a PIN.
    Wrapper,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, ValueEnum)]
pub enum DumpFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ToolConfig {
    pub program: String,
    pub shell: PathBuf,
    pub flag_style: FlagStyle,
    pub mode: LaunchMode,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: String::from("pixiewps"),
            shell: PathBuf::from("/bin/sh"),
            flag_style: FlagStyle::default(),
            mode: LaunchMode::default(),
        }
    }
}

/// `[tool]` table of the TOML configuration file. Every key is optional.
#[derive(Debug, Default, PartialEq, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolSection {
    pub program: Option<String>,
    pub shell: Option<PathBuf>,
    pub flag_style: Option<FlagStyle>,
    pub mode: Option<LaunchMode>,
}

#[derive(Debug, Default, PartialEq, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub tool: ToolSection,
}
