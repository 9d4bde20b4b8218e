pub mod command;
pub use command::*;

pub mod configuration;

pub mod controller;
pub use controller::*;

pub mod error_handling;

pub mod extraction;
pub use extraction::*;
