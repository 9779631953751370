//! Library and application errors

use std::{io, path::PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use crate::region::Region;

/// All possible errors returned by rpi-otp
#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Unable to open OTP dump {}", .path.display())]
    #[diagnostic(
        code(rpi_otp::input_unavailable),
        help("Check the path, or omit it to read the dump from standard input")
    )]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("The OTP dump did not contain any records")]
    #[diagnostic(
        code(rpi_otp::empty_input),
        help("Generate a dump on the target with `vcgencmd otp_dump`")
    )]
    EmptyInput,

    #[error("Malformed record on line {line} (`{content}`): {reason}")]
    #[diagnostic(
        code(rpi_otp::malformed_record),
        help("Records have the form `<index>:<8 hex digits>`")
    )]
    MalformedRecord {
        line: usize,
        content: String,
        reason: RecordError,
    },

    #[error("No OTP region is named '{0}'")]
    #[diagnostic(code(rpi_otp::unknown_region))]
    UnknownRegion(String),

    #[error("OTP region {region} (index {}) is not present in the dump", .region.index())]
    #[diagnostic(
        code(rpi_otp::missing_region),
        help("The dump may be truncated; a complete dump covers regions 8 to 66")
    )]
    MissingRegion { region: Region },

    #[error("OTP region {region} has no bitfield named '{field}'")]
    #[diagnostic(code(rpi_otp::unknown_field))]
    UnknownField { region: Region, field: String },

    #[error("Malformed OTP contents: {0}")]
    #[diagnostic(code(rpi_otp::malformed_input))]
    MalformedInput(String),

    #[error("Failed to read the OTP dump")]
    #[diagnostic(code(rpi_otp::read_failed))]
    Io(#[from] io::Error),

    #[error("Invalid configuration file {}", .path.display())]
    #[diagnostic(code(rpi_otp::invalid_config))]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Reasons a single dump record could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("missing ':' separator")]
    MissingSeparator,
    #[error("region index is not an integer")]
    InvalidIndex,
    #[error("region index {0} is out of range")]
    IndexOutOfRange(String),
    #[error("expected 8 hex digits, found {0}")]
    TooShort(usize),
    #[error("value is not hexadecimal")]
    InvalidHex,
    #[error("region index {0} appears more than once")]
    DuplicateIndex(u8),
}

/// Non-fatal anomalies detected while decoding a dump
#[derive(Debug, Clone, PartialEq, Eq, Diagnostic, Error)]
pub enum ConsistencyWarning {
    #[error("Bootmode fields are not the same ({primary:#010x} != {copy:#010x}), the OTP read may be corrupt")]
    #[diagnostic(code(rpi_otp::bootmode_mismatch), severity(Warning))]
    BootmodeMismatch { primary: u32, copy: u32 },

    #[error("Serial failed checksum ({serial:#010x} is not the inverse of {inverted:#010x})")]
    #[diagnostic(code(rpi_otp::serial_checksum), severity(Warning))]
    SerialChecksum { serial: u32, inverted: u32 },
}
