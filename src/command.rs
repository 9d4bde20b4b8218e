//! Command subsystem: formats the recovery tool invocation from a complete
//! [`Record`](crate::extraction::Record) and hands it to the OS through a
//! [`Launcher`].

pub mod builder;
pub mod launcher;

pub use builder::{build_args, build_command, shell_quote};
pub use launcher::{launcher_for, LaunchOutcome, Launcher, ShellExec, WrapperRunner};
