//! Symbolic names for the OTP words
//!
//! The Raspberry Pi exposes its OTP as 32-bit words numbered 8 through 66.
//! Every index in that range has a [Region]; the undocumented ones are named
//! `unknown_<index>`.

use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator, VariantNames};

use crate::Error;

/// Lowest OTP word index present in a dump
pub const FIRST_INDEX: u8 = 8;
/// Highest OTP word index present in a dump
pub const LAST_INDEX: u8 = 66;

/// An OTP word, identified by its index
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumString, VariantNames,
)]
#[non_exhaustive]
#[repr(u8)]
#[strum(serialize_all = "snake_case")]
pub enum Region {
    #[strum(serialize = "unknown_8")]
    Unknown8 = 8,
    #[strum(serialize = "unknown_9")]
    Unknown9 = 9,
    #[strum(serialize = "unknown_10")]
    Unknown10 = 10,
    #[strum(serialize = "unknown_11")]
    Unknown11 = 11,
    #[strum(serialize = "unknown_12")]
    Unknown12 = 12,
    #[strum(serialize = "unknown_13")]
    Unknown13 = 13,
    #[strum(serialize = "unknown_14")]
    Unknown14 = 14,
    #[strum(serialize = "unknown_15")]
    Unknown15 = 15,
    /// Control register, usually `0x00280000`
    #[strum(to_string = "control", serialize = "unknown_16")]
    Control = 16,
    /// Bootmode register
    Bootmode = 17,
    /// Backup copy of the bootmode register
    BootmodeCopy = 18,
    #[strum(serialize = "unknown_19")]
    Unknown19 = 19,
    #[strum(serialize = "unknown_20")]
    Unknown20 = 20,
    #[strum(serialize = "unknown_21")]
    Unknown21 = 21,
    #[strum(serialize = "unknown_22")]
    Unknown22 = 22,
    #[strum(serialize = "unknown_23")]
    Unknown23 = 23,
    #[strum(serialize = "unknown_24")]
    Unknown24 = 24,
    #[strum(serialize = "unknown_25")]
    Unknown25 = 25,
    #[strum(serialize = "unknown_26")]
    Unknown26 = 26,
    /// Varies per board; purpose undocumented
    #[strum(serialize = "unknown_27")]
    Unknown27 = 27,
    /// Serial number
    SerialNumber = 28,
    /// Bitwise inverse of the serial number
    SerialNumberInverted = 29,
    /// Board revision code
    RevisionNumber = 30,
    /// Manufacturing batch number
    BatchNumber = 31,
    /// Overclock register
    Overclock = 32,
    #[strum(serialize = "unknown_33")]
    Unknown33 = 33,
    #[strum(serialize = "unknown_34")]
    Unknown34 = 34,
    #[strum(serialize = "unknown_35")]
    Unknown35 = 35,
    CustomerOne = 36,
    CustomerTwo = 37,
    CustomerThree = 38,
    CustomerFour = 39,
    CustomerFive = 40,
    CustomerSix = 41,
    CustomerSeven = 42,
    CustomerEight = 43,
    #[strum(serialize = "unknown_44")]
    Unknown44 = 44,
    /// Codec license key #1
    CodecKeyOne = 45,
    /// Codec license key #2
    CodecKeyTwo = 46,
    #[strum(serialize = "unknown_47")]
    Unknown47 = 47,
    #[strum(serialize = "unknown_48")]
    Unknown48 = 48,
    #[strum(serialize = "unknown_49")]
    Unknown49 = 49,
    #[strum(serialize = "unknown_50")]
    Unknown50 = 50,
    #[strum(serialize = "unknown_51")]
    Unknown51 = 51,
    #[strum(serialize = "unknown_52")]
    Unknown52 = 52,
    #[strum(serialize = "unknown_53")]
    Unknown53 = 53,
    #[strum(serialize = "unknown_54")]
    Unknown54 = 54,
    #[strum(serialize = "unknown_55")]
    Unknown55 = 55,
    #[strum(serialize = "unknown_56")]
    Unknown56 = 56,
    #[strum(serialize = "unknown_57")]
    Unknown57 = 57,
    #[strum(serialize = "unknown_58")]
    Unknown58 = 58,
    #[strum(serialize = "unknown_59")]
    Unknown59 = 59,
    #[strum(serialize = "unknown_60")]
    Unknown60 = 60,
    #[strum(serialize = "unknown_61")]
    Unknown61 = 61,
    #[strum(serialize = "unknown_62")]
    Unknown62 = 62,
    #[strum(serialize = "unknown_63")]
    Unknown63 = 63,
    /// MAC address, low part
    MacAddressTwo = 64,
    /// MAC address, high part
    MacAddressOne = 65,
    /// Advanced boot register
    AdvancedBoot = 66,
}

impl Region {
    /// Look up a region by its symbolic name
    pub fn from_name(name: &str) -> Result<Self, Error> {
        Self::from_str(name).map_err(|_| Error::UnknownRegion(name.to_string()))
    }

    /// The region stored at OTP word `index`, if the index is in range
    pub fn from_index(index: u8) -> Option<Self> {
        Self::iter().find(|region| region.index() == index)
    }

    /// OTP word index of the region
    pub fn index(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn indices_cover_the_dump_range() {
        let indices: Vec<u8> = Region::iter().map(Region::index).collect();
        let expected: Vec<u8> = (FIRST_INDEX..=LAST_INDEX).collect();

        assert_eq!(indices, expected);
    }

    #[test]
    fn names_round_trip() {
        for region in Region::iter() {
            assert_eq!(Region::from_name(&region.to_string()).unwrap(), region);
        }
    }

    #[test]
    fn well_known_names() {
        assert_eq!(Region::from_name("bootmode").unwrap().index(), 17);
        assert_eq!(Region::from_name("serial_number_inverted").unwrap().index(), 29);
        assert_eq!(Region::from_name("revision_number").unwrap().index(), 30);
        assert_eq!(Region::from_name("mac_address_one").unwrap().index(), 65);
        assert_eq!(Region::from_name("unknown_47").unwrap().index(), 47);
        assert_eq!(Region::from_index(66), Some(Region::AdvancedBoot));
        assert_eq!(Region::from_index(7), None);
        assert_eq!(Region::from_index(67), None);
    }

    #[test]
    fn control_keeps_its_historical_name() {
        assert_eq!(Region::from_name("unknown_16").unwrap(), Region::Control);
        assert_eq!(Region::Control.to_string(), "control");
    }

    #[test]
    fn undefined_name_is_rejected() {
        assert!(matches!(
            Region::from_name("serial"),
            Err(Error::UnknownRegion(name)) if name == "serial"
        ));
    }
}
