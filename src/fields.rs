//! Bitfields of the documented OTP words
//!
//! Offsets index the binary rendering of a word, so bit offset 0 is the most
//! significant bit and `[start, end)` selects `end - start` bits. The hardware
//! documentation numbers bits from the other end; the field names follow the
//! documentation (`bit_19` is offset 12).

use std::fmt;

use crate::{region::Region, store::RegionStore, Error};

/// A named range of bits within an OTP word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pub region: Region,
    pub name: &'static str,
    pub start: u32,
    pub end: u32,
}

impl BitField {
    const fn new(region: Region, name: &'static str, start: u32, end: u32) -> Self {
        assert!(start < end, "bitfield must select at least one bit");
        assert!(end <= 32, "bitfield must lie within a 32-bit word");

        Self {
            region,
            name,
            start,
            end,
        }
    }

    /// Number of bits selected by the field
    pub const fn width(&self) -> u32 {
        self.end - self.start
    }

    /// Slice the field out of `word`
    pub fn extract(&self, word: u32) -> BitValue {
        let width = self.width();
        let shifted = word >> (32 - self.end);
        let mask = u32::MAX >> (32 - width);

        BitValue::new(shifted & mask, width)
    }

    /// Read the field from the word stored in its region
    pub fn read(&self, store: &RegionStore) -> Result<BitValue, Error> {
        store.get_word(self.region).map(|word| self.extract(word))
    }
}

/// The bits selected by a [BitField]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitValue {
    value: u32,
    width: u32,
}

impl BitValue {
    /// Wrap `value` as a field of `width` bits
    pub const fn new(value: u32, width: u32) -> Self {
        Self { value, width }
    }

    pub const fn value(&self) -> u32 {
        self.value
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Is the field a single set bit?
    pub const fn is_set(&self) -> bool {
        self.value != 0
    }

    /// Decimal, hex and binary forms, e.g. `40 (0x28) 00101000`
    pub fn pretty(&self) -> String {
        format!("{} ({:#x}) {}", self.value, self.value, self)
    }

    /// Decimal and hex forms, e.g. `40 (0x28)`
    pub fn pretty_no_binary(&self) -> String {
        format!("{} ({:#x})", self.value, self.value)
    }
}

impl fmt::Display for BitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.value, width = self.width as usize)
    }
}

/// Region 16
pub mod control {
    use super::*;

    pub const BITS_24_TO_31: BitField = BitField::new(Region::Control, "bits_24_to_31", 0, 8);
    /// Only `0x28` seen so far
    pub const BITS_16_TO_23: BitField = BitField::new(Region::Control, "bits_16_to_23", 8, 16);
    pub const BITS_0_TO_15: BitField = BitField::new(Region::Control, "bits_0_to_15", 16, 32);

    pub(crate) const FIELDS: &[BitField] = &[BITS_24_TO_31, BITS_16_TO_23, BITS_0_TO_15];
}

/// Region 17, mirrored in region 18
pub mod bootmode {
    use super::*;

    const fn field(name: &'static str, start: u32, end: u32) -> BitField {
        BitField::new(Region::Bootmode, name, start, end)
    }

    pub const BITS_30_31: BitField = field("bits_30_31", 0, 2);
    /// Enables USB host booting (Ethernet and mass storage)
    pub const USB_HOST_BOOT: BitField = field("bit_29", 2, 3);
    /// Enables USB device booting
    pub const USB_DEVICE_BOOT: BitField = field("bit_28", 3, 4);
    pub const BITS_23_TO_24: BitField = field("bits_23_to_24", 4, 6);
    /// Undocumented, set on the Compute Module 3
    pub const BIT_25: BitField = field("bit_25", 6, 7);
    pub const BITS_26_TO_27: BitField = field("bits_26_to_27", 7, 9);
    /// Selects the SD card bank to boot from
    pub const BOOT_BANK: BitField = field("bit_22", 9, 10);
    /// Enables booting from SD card
    pub const SD_BOOT: BitField = field("bit_21", 10, 11);
    /// Selects the GPIO bank checked for GPIO bootmode
    pub const GPIO_BOOTMODE_BANK: BitField = field("bit_20", 11, 12);
    /// Enables GPIO bootmode
    pub const GPIO_BOOTMODE: BitField = field("bit_19", 12, 13);
    pub const BITS_4_TO_18: BitField = field("bits_4_to_18", 13, 28);
    /// Enables the pull-ups on the SDIO pins
    pub const SDIO_PULLUP: BitField = field("bit_3", 28, 29);
    pub const BIT_2: BitField = field("bit_2", 29, 30);
    /// Sets the oscillator frequency to 19.2MHz
    pub const OSC_19_2MHZ: BitField = field("bit_1", 30, 31);
    pub const BIT_0: BitField = field("bit_0", 31, 32);

    pub(crate) const FIELDS: &[BitField] = &[
        BITS_30_31,
        USB_HOST_BOOT,
        USB_DEVICE_BOOT,
        BITS_23_TO_24,
        BIT_25,
        BITS_26_TO_27,
        BOOT_BANK,
        SD_BOOT,
        GPIO_BOOTMODE_BANK,
        GPIO_BOOTMODE,
        BITS_4_TO_18,
        SDIO_PULLUP,
        BIT_2,
        OSC_19_2MHZ,
        BIT_0,
    ];
}

/// Region 27
pub mod unknown_27 {
    use super::*;

    pub const BITS_16_TO_31: BitField = BitField::new(Region::Unknown27, "bits_16_to_31", 0, 16);
    /// `5050` on 1B and 2B 1.1, `7373` on 2B 1.2, `2727` on CM3, `1f1f` on 3B+
    pub const BITS_0_TO_15: BitField = BitField::new(Region::Unknown27, "bits_0_to_15", 16, 32);

    pub(crate) const FIELDS: &[BitField] = &[BITS_16_TO_31, BITS_0_TO_15];
}

/// Region 30
pub mod revision {
    use super::*;

    const fn field(name: &'static str, start: u32, end: u32) -> BitField {
        BitField::new(Region::RevisionNumber, name, start, end)
    }

    pub const BITS_24_TO_31: BitField = field("bits_24_to_31", 0, 8);
    /// Set when the word uses the new revision encoding
    pub const NEW_FLAG: BitField = field("new_flag", 8, 9);
    pub const MEMORY_SIZE: BitField = field("memory_size", 9, 12);
    pub const MANUFACTURER: BitField = field("manufacturer", 12, 16);
    pub const PROCESSOR: BitField = field("processor", 16, 20);
    pub const BOARD_TYPE: BitField = field("board_type", 20, 28);
    pub const BOARD_REVISION: BitField = field("board_revision", 28, 32);
    /// Legacy revision code, only meaningful when [NEW_FLAG] is clear.
    ///
    /// Aliases the low bits of [BOARD_TYPE] and [BOARD_REVISION]. The legacy
    /// code is really 8 bits wide but only 5 were ever used.
    pub const LEGACY_BOARD_REVISION: BitField = field("legacy_board_revision", 27, 32);

    pub(crate) const FIELDS: &[BitField] = &[
        BITS_24_TO_31,
        NEW_FLAG,
        MEMORY_SIZE,
        MANUFACTURER,
        PROCESSOR,
        BOARD_TYPE,
        BOARD_REVISION,
    ];

    pub(crate) const ALIASES: &[BitField] = &[LEGACY_BOARD_REVISION];
}

/// Region 32
pub mod overclock {
    use super::*;

    pub const BITS_0_TO_30: BitField = BitField::new(Region::Overclock, "bits_0_to_30", 0, 31);
    pub const OVERVOLT_PROTECTION: BitField =
        BitField::new(Region::Overclock, "overvolt_protection", 31, 32);

    pub(crate) const FIELDS: &[BitField] = &[BITS_0_TO_30, OVERVOLT_PROTECTION];
}

/// Region 66
pub mod advanced_boot {
    use super::*;

    const fn field(name: &'static str, start: u32, end: u32) -> BitField {
        BitField::new(Region::AdvancedBoot, name, start, end)
    }

    pub const BITS_26_TO_31: BitField = field("bits_26_to_31", 0, 6);
    /// ETH_CLK frequency, 24MHz when set and 25MHz otherwise
    pub const ETH_CLK_FREQUENCY: BitField = field("bit_25", 6, 7);
    /// Extends the USB hub timeout from 2 to 5 seconds
    pub const USB_HUB_TIMEOUT: BitField = field("bit_24", 7, 8);
    pub const BITS_16_TO_23: BitField = field("bits_16_to_23", 8, 16);
    pub const LAN_RUN_ENABLE: BitField = field("bit_15", 16, 17);
    /// GPIO used for the LAN_RUN output
    pub const LAN_RUN_PIN: BitField = field("bits_8_to_14", 17, 24);
    pub const ETH_CLK_ENABLE: BitField = field("bit_7", 24, 25);
    /// GPIO used for the ETH_CLK output
    pub const ETH_CLK_PIN: BitField = field("bits_0_to_6", 25, 32);

    pub(crate) const FIELDS: &[BitField] = &[
        BITS_26_TO_31,
        ETH_CLK_FREQUENCY,
        USB_HUB_TIMEOUT,
        BITS_16_TO_23,
        LAN_RUN_ENABLE,
        LAN_RUN_PIN,
        ETH_CLK_ENABLE,
        ETH_CLK_PIN,
    ];
}

/// Every bitfield defined for `region`, documented aliases last
pub fn fields(region: Region) -> impl Iterator<Item = &'static BitField> {
    let (fields, aliases): (&'static [BitField], &'static [BitField]) = match region {
        Region::Control => (control::FIELDS, &[]),
        Region::Bootmode | Region::BootmodeCopy => (bootmode::FIELDS, &[]),
        Region::Unknown27 => (unknown_27::FIELDS, &[]),
        Region::RevisionNumber => (revision::FIELDS, revision::ALIASES),
        Region::Overclock => (overclock::FIELDS, &[]),
        Region::AdvancedBoot => (advanced_boot::FIELDS, &[]),
        _ => (&[], &[]),
    };

    fields.iter().chain(aliases)
}

/// Look up the bitfield `name` of `region`.
///
/// The bootmode copy shares the layout of the bootmode register; fields
/// returned for it read from the copy.
pub fn field(region: Region, name: &str) -> Result<BitField, Error> {
    fields(region)
        .find(|field| field.name == name)
        .map(|field| BitField { region, ..*field })
        .ok_or_else(|| Error::UnknownField {
            region,
            field: name.to_string(),
        })
}

/// Slice the bitfield `name` out of the word stored in `region`
pub fn bitfield(store: &RegionStore, region: Region, name: &str) -> Result<BitValue, Error> {
    field(region, name)?.read(store)
}
