//! Extraction subsystem: turns wpa_supplicant / reaver WPS debug output into
//! a [`Record`] of the values needed for an offline PIN recovery attempt.
//!
//! Re-exports:
//! - [`Record`], [`Field`]: the collected values and their names.
//! - [`process_line`], [`Extractor`]: per-line update and a session driver.
//! - [`is_complete`]: whether enough has been collected to build a command.

pub mod extractor;
pub mod field_table;
pub mod record;

pub use extractor::{process_line, Extractor};
pub use field_table::{FieldMarker, FIELD_MARKERS, HEXDUMP_MARKER, WPS_SENTINEL};
pub use record::{is_complete, Field, Record};
