//! Consistency checks and derived values
//!
//! The OTP stores some words redundantly. Disagreement between the copies
//! points at a bad read rather than at the tool, so mismatches are reported
//! as [ConsistencyWarning]s and decoding carries on.

use log::debug;

use crate::{error::ConsistencyWarning, region::Region, store::RegionStore, Error};

/// Compare the bootmode register against its backup copy
pub fn check_bootmode_consistency(
    store: &RegionStore,
) -> Result<Option<ConsistencyWarning>, Error> {
    let primary = store.get_word(Region::Bootmode)?;
    let copy = store.get_word(Region::BootmodeCopy)?;

    if primary == copy {
        return Ok(None);
    }

    let warning = ConsistencyWarning::BootmodeMismatch { primary, copy };
    debug!("{warning}");

    Ok(Some(warning))
}

/// Check the serial number against its stored inverse
pub fn check_serial_consistency(store: &RegionStore) -> Result<Option<ConsistencyWarning>, Error> {
    let serial = store.get_word(Region::SerialNumber)?;
    let inverted = store.get_word(Region::SerialNumberInverted)?;

    if serial ^ inverted == u32::MAX {
        return Ok(None);
    }

    let warning = ConsistencyWarning::SerialChecksum { serial, inverted };
    debug!("{warning}");

    Ok(Some(warning))
}

/// Format the programmed MAC address, or `None` if it was never written
pub fn format_mac(store: &RegionStore) -> Result<String, Error> {
    let high = store.get_raw(Region::MacAddressOne)?;
    if high == "00000000" {
        return Ok("None".to_string());
    }

    let low = store.get_raw(Region::MacAddressTwo)?;

    // Only the first six of the eight bytes form the address
    let digits = high + &low;
    let mac = (0..12)
        .step_by(2)
        .map(|i| &digits[i..i + 2])
        .collect::<Vec<_>>()
        .join(":");

    Ok(mac)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn store(records: &[&str]) -> RegionStore {
        RegionStore::load(records).unwrap()
    }

    #[test]
    fn matching_bootmode() {
        let store = store(&["17:1020000a", "18:1020000a"]);

        assert_eq!(check_bootmode_consistency(&store).unwrap(), None);
    }

    #[test]
    fn mismatched_bootmode() {
        let store = store(&["17:1020000a", "18:1020000b"]);

        assert_eq!(
            check_bootmode_consistency(&store).unwrap(),
            Some(ConsistencyWarning::BootmodeMismatch {
                primary: 0x1020_000a,
                copy: 0x1020_000b
            })
        );
    }

    #[test]
    fn serial_with_valid_inverse() {
        let store = store(&["28:a1b2c3d4", "29:5e4d3c2b"]);

        assert_eq!(check_serial_consistency(&store).unwrap(), None);
    }

    #[test]
    fn serial_with_invalid_inverse() {
        let store = store(&["28:a1b2c3d4", "29:5e4d3c2a"]);

        assert!(matches!(
            check_serial_consistency(&store).unwrap(),
            Some(ConsistencyWarning::SerialChecksum { serial: 0xa1b2_c3d4, .. })
        ));
    }

    #[test]
    fn checks_require_both_words() {
        let store = store(&["28:a1b2c3d4"]);

        assert!(matches!(
            check_serial_consistency(&store),
            Err(Error::MissingRegion {
                region: Region::SerialNumberInverted
            })
        ));
    }

    #[test]
    fn unprogrammed_mac() {
        let store = store(&["64:00000000", "65:00000000"]);

        assert_eq!(format_mac(&store).unwrap(), "None");
    }

    #[test]
    fn programmed_mac() {
        let store = store(&["64:34567800", "65:dca63212"]);

        assert_eq!(format_mac(&store).unwrap(), "dc:a6:32:12:34:56");
    }

    #[test]
    fn unprogrammed_mac_needs_only_the_first_word() {
        let store = store(&["65:00000000"]);

        assert_eq!(format_mac(&store).unwrap(), "None");
    }

    #[test]
    fn mac_requires_both_words() {
        let store = store(&["65:dca63212"]);

        assert!(format_mac(&store).is_err());
    }
}
