//! Decoder for Raspberry Pi OTP dumps
//!
//! The one-time-programmable memory of a Raspberry Pi holds the board's
//! identity (revision, serial number, MAC address) and its boot
//! configuration. `vcgencmd otp_dump` prints it as a list of words; this crate
//! parses such a dump into a [RegionStore] and decodes the documented fields.
//!
//! ```
//! use rpi_otp::{decode_revision, RegionStore};
//!
//! let store: RegionStore = "30:00a02082".parse()?;
//! let labels = decode_revision(&store)?.labels();
//!
//! assert_eq!(labels.board_type, "3B");
//! assert_eq!(labels.processor, "BCM2837");
//! # Ok::<(), rpi_otp::Error>(())
//! ```
//!
//! ## Cargo Features
//!
//! - `cli`: the `rpi-otp` binary, with its configuration file and logging
//!   setup. Enabled by default.

pub use self::{
    checks::{check_bootmode_consistency, check_serial_consistency, format_mac},
    error::{ConsistencyWarning, Error, RecordError},
    fields::{bitfield, BitField, BitValue},
    region::Region,
    report::{Report, ReportOptions},
    revision::{decode_revision, BoardIdentity, BoardLabels, Scheme},
    store::RegionStore,
    tables::{resolve_board_type_label, Code, CodeTable},
};

pub mod checks;
pub mod error;
pub mod fields;
pub mod region;
pub mod report;
pub mod revision;
pub mod store;
pub mod tables;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod logging;
