//! Human readable report of a dump
//!
//! The report is assembled completely before it is displayed, so a dump
//! missing a required word produces an error and no partial output.

use std::fmt;

use crate::{
    checks::{check_bootmode_consistency, check_serial_consistency, format_mac},
    error::ConsistencyWarning,
    fields::{
        advanced_boot, bootmode, control, overclock, revision, unknown_27, BitField, BitValue,
    },
    region::Region,
    revision::{decode_revision, BoardIdentity},
    store::RegionStore,
    tables::{resolve_board_type_label, Code, BOARD_TYPES, UNKNOWN},
    Error,
};

/// Width of the label column
const LABEL_WIDTH: usize = 23;

/// Customer regions, in display order
const CUSTOMER_REGIONS: [(&str, Region); 8] = [
    ("Customer Region One", Region::CustomerOne),
    ("Customer Region Two", Region::CustomerTwo),
    ("Customer Region Three", Region::CustomerThree),
    ("Customer Region Four", Region::CustomerFour),
    ("Customer Region Five", Region::CustomerFive),
    ("Customer Region Six", Region::CustomerSix),
    ("Customer Region Seven", Region::CustomerSeven),
    ("Customer Region Eight", Region::CustomerEight),
];

/// What to include in a [Report]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Show raw binary alongside decoded values
    pub show_binary: bool,
    /// Show the undocumented parts of regions 16 and 27
    pub show_unknown_regions: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            show_binary: true,
            show_unknown_regions: true,
        }
    }
}

/// A single `label : value` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub label: &'static str,
    pub value: String,
}

/// Every decoded field of a dump, in display order
#[derive(Debug, Clone)]
pub struct Report {
    pub identity: BoardIdentity,
    pub lines: Vec<Line>,
    pub warnings: Vec<ConsistencyWarning>,
}

impl Report {
    /// Decode every field of the dump
    pub fn generate(store: &RegionStore, options: &ReportOptions) -> Result<Self, Error> {
        let warnings = [
            check_bootmode_consistency(store)?,
            check_serial_consistency(store)?,
        ]
        .into_iter()
        .flatten()
        .collect();

        let identity = decode_revision(store)?;

        let mut builder = Builder {
            store,
            options,
            lines: Vec::new(),
        };
        builder.control()?;
        builder.bootmode()?;
        builder.unknown_27()?;
        builder.identity(&identity)?;
        builder.regions()?;
        builder.advanced_boot()?;

        Ok(Self {
            identity,
            lines: builder.lines,
            warnings,
        })
    }

    /// Value of the first line with the given label
    pub fn value(&self, label: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|line| line.label == label)
            .map(|line| line.value.as_str())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{:>LABEL_WIDTH$} : {}", line.label, line.value)?;
        }

        Ok(())
    }
}

struct Builder<'a> {
    store: &'a RegionStore,
    options: &'a ReportOptions,
    lines: Vec<Line>,
}

impl Builder<'_> {
    fn push(&mut self, label: &'static str, value: impl Into<String>) {
        self.lines.push(Line {
            label,
            value: value.into(),
        });
    }

    fn pretty(&self, value: BitValue) -> String {
        if self.options.show_binary {
            value.pretty()
        } else {
            value.pretty_no_binary()
        }
    }

    fn word(&self, region: Region) -> Result<String, Error> {
        let hex = self.store.get_hex(region)?;
        if !self.options.show_binary {
            return Ok(hex);
        }

        Ok(format!("{hex} {}", self.store.get_binary(region)?))
    }

    fn bit(&self, field: BitField) -> Result<String, Error> {
        Ok(field.read(self.store)?.to_string())
    }

    fn control(&mut self) -> Result<(), Error> {
        if !self.options.show_unknown_regions {
            return Ok(());
        }

        let fields = [
            ("OTP Region 16 ( 0-15)", control::BITS_0_TO_15),
            ("OTP Region 16 (16-23)", control::BITS_16_TO_23),
            ("OTP Region 16 (24-31)", control::BITS_24_TO_31),
        ];
        for (label, field) in fields {
            let value = self.pretty(field.read(self.store)?);
            self.push(label, value);
        }

        Ok(())
    }

    fn bootmode(&mut self) -> Result<(), Error> {
        let value = self.word(Region::Bootmode)?;
        self.push("Bootmode", value);
        let copy = self.store.get_hex(Region::BootmodeCopy)?;
        self.push("Bootmode - Copy", copy);

        let fields = [
            ("OSC Frequency 19.2MHz", bootmode::OSC_19_2MHZ),
            ("SDIO Pullup Enabled", bootmode::SDIO_PULLUP),
            ("GPIO Bootmode", bootmode::GPIO_BOOTMODE),
            ("GPIO Bootmode Bank", bootmode::GPIO_BOOTMODE_BANK),
            ("SD Boot Enabled", bootmode::SD_BOOT),
            ("Boot Bank", bootmode::BOOT_BANK),
        ];
        for (label, field) in fields {
            let value = self.bit(field)?;
            self.push(label, value);
        }

        let bit_25 = self.bit(bootmode::BIT_25)?;
        self.push("OTP Region 17 (25)", format!("{bit_25} (unknown, set on the CM3)"));

        let usb_device = self.bit(bootmode::USB_DEVICE_BOOT)?;
        self.push("USB Device Boot Enabled", usb_device);
        let usb_host = self.bit(bootmode::USB_HOST_BOOT)?;
        self.push("USB Host Boot Enabled", usb_host);

        Ok(())
    }

    fn unknown_27(&mut self) -> Result<(), Error> {
        if !self.options.show_unknown_regions {
            return Ok(());
        }

        let fields = [
            ("OTP Region 27 ( 0-15)", unknown_27::BITS_0_TO_15),
            ("OTP Region 27 (16-31)", unknown_27::BITS_16_TO_31),
        ];
        for (label, field) in fields {
            let value = self.pretty(field.read(self.store)?);
            self.push(label, value);
        }

        Ok(())
    }

    fn identity(&mut self, identity: &BoardIdentity) -> Result<(), Error> {
        let serial = self.store.get_hex(Region::SerialNumber)?;
        self.push("Serial Number", serial);
        let inverted = self.store.get_hex(Region::SerialNumberInverted)?;
        self.push("Inverse Serial Number", inverted);
        let revision_number = self.store.get_hex(Region::RevisionNumber)?;
        self.push("Revision Number", revision_number);
        let flag = self.bit(revision::NEW_FLAG)?;
        self.push("New Revision Flag", flag);

        let labels = identity.labels();
        self.push("RAM", format!("{} MB", labels.memory_size));
        self.push("Manufacturer", labels.manufacturer);
        self.push("CPU", labels.processor);
        self.push("Board Type", board_type(&identity.board_type));
        self.push("Board Revision", labels.board_revision);

        Ok(())
    }

    fn regions(&mut self) -> Result<(), Error> {
        let batch = self.store.get_hex(Region::BatchNumber)?;
        self.push("Batch Number", batch);
        let overvolt = self.bit(overclock::OVERVOLT_PROTECTION)?;
        self.push("Overvolt Protection Bit", overvolt);

        for (label, region) in CUSTOMER_REGIONS {
            let value = self.store.get_hex(region)?;
            self.push(label, value);
        }

        let codec_one = self.store.get_hex(Region::CodecKeyOne)?;
        self.push("Codec License Key One", codec_one);
        let codec_two = self.store.get_hex(Region::CodecKeyTwo)?;
        self.push("Codec License Key Two", codec_two);

        let mac = format_mac(self.store)?;
        self.push("MAC Address", mac);

        Ok(())
    }

    fn advanced_boot(&mut self) -> Result<(), Error> {
        let value = self.word(Region::AdvancedBoot)?;
        self.push("Advanced Boot", value);

        let eth_clk_pin = advanced_boot::ETH_CLK_PIN.read(self.store)?;
        self.push("ETH_CLK Output Pin", eth_clk_pin.pretty_no_binary());
        let eth_clk_enable = self.bit(advanced_boot::ETH_CLK_ENABLE)?;
        self.push("ETH_CLK Output Enabled", eth_clk_enable);

        let lan_run_pin = advanced_boot::LAN_RUN_PIN.read(self.store)?;
        self.push("LAN_RUN Output Pin", lan_run_pin.pretty_no_binary());
        let lan_run_enable = self.bit(advanced_boot::LAN_RUN_ENABLE)?;
        self.push("LAN_RUN Output Enabled", lan_run_enable);

        let timeout = if advanced_boot::USB_HUB_TIMEOUT.read(self.store)?.is_set() {
            "5 Seconds"
        } else {
            "2 Seconds"
        };
        self.push("USB Hub Timeout", timeout);

        let frequency = if advanced_boot::ETH_CLK_FREQUENCY.read(self.store)?.is_set() {
            "24MHz"
        } else {
            "25MHz"
        };
        self.push("ETH_CLK Frequency", frequency);

        Ok(())
    }
}

/// Known board types get the model prefix, anything else its fallback label
fn board_type(code: &Code) -> String {
    let label = match code {
        Code::Bits(bits) => match BOARD_TYPES.lookup(bits.value()) {
            Some(label) => label,
            None => return resolve_board_type_label(bits.value()),
        },
        Code::Legacy(label) => *label,
        Code::Unknown => return UNKNOWN.to_string(),
    };

    format!("Raspberry Pi Model {label}")
}
