use clap::Parser;
use log::{error, info};
use pixiefilter::command::launcher::{launcher_for, LaunchOutcome};
use pixiefilter::configuration::config::{log_level, Args, Config};
use pixiefilter::controller::controller_handler::{open_input, Controller, RunOutcome};
use pixiefilter::error_handling::types::ControllerError;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(log_level(args.verbose))
        .parse_default_env()
        .format_target(false)
        .init();

    let config = match Config::resolve(args) {
        Ok(config) => config,
        Err(e) => {
            error!("Unable to load configuration: {}", e);
            return ExitCode::from(1);
        }
    };

    let input = match open_input(config.input.as_deref()) {
        Ok(input) => input,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(1);
        }
    };

    let launcher = launcher_for(&config.tool);
    let controller = Controller::new(config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match controller.run(input, &mut out, launcher.as_ref()) {
        Ok(RunOutcome::Incomplete { .. }) | Ok(RunOutcome::DryRun(_)) => ExitCode::SUCCESS,
        Ok(RunOutcome::Launched(LaunchOutcome::Exited(code))) => {
            info!("Tool exited with status {}", code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
        Ok(RunOutcome::Launched(LaunchOutcome::PinFound(pin))) => {
            println!("[+] Pin found: \"{}\"", pin);
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::Launched(LaunchOutcome::PinNotFound)) => {
            println!("[-] WPS pin not found!");
            ExitCode::from(1)
        }
        Err(e @ ControllerError::LaunchError(_)) => {
            error!("{}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::from(1)
        }
    }
}
