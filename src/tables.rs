//! Code tables for the board identity fields
//!
//! Each table maps the documented bit patterns of one field of the revision
//! word to a label. Patterns without an entry never fail to decode: they fall
//! back to [UNKNOWN], or for board types to a label carrying the raw value,
//! since new boards keep appearing after a table is written.
//!
//! A few boards are only described by the legacy revision scheme, and some of
//! their attributes (a 256/512MB board, the Qisda factory, revision 2.0) never
//! received an encoding in the new scheme. Those are kept per table as
//! legacy-only labels.

use crate::fields::BitValue;

/// Label used for any value a table cannot resolve
pub const UNKNOWN: &str = "unknown";

/// How a table labels patterns it has no entry for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// The generic [UNKNOWN] label
    Unknown,
    /// `unknown_<hex>`, preserving the pattern
    Synthesized,
}

/// A board identity value, prior to label resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    /// A pattern as encoded in a new-style revision word
    Bits(BitValue),
    /// A legacy-only label without a new-style encoding
    Legacy(&'static str),
    /// No value could be determined
    Unknown,
}

/// Mapping between labels and the bit patterns of one field
#[derive(Debug)]
pub struct CodeTable {
    pub name: &'static str,
    /// Width of the encoded field in bits
    pub width: u32,
    entries: &'static [(u32, &'static str)],
    legacy: &'static [&'static str],
    fallback: Fallback,
}

impl CodeTable {
    /// The label of `pattern`, if the table defines one
    pub fn lookup(&self, pattern: u32) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(bits, _)| *bits == pattern)
            .map(|(_, label)| *label)
    }

    /// The code a label is stored as
    pub fn encode(&self, label: &str) -> Option<Code> {
        if let Some((bits, _)) = self.entries.iter().find(|(_, l)| *l == label) {
            return Some(Code::Bits(BitValue::new(*bits, self.width)));
        }

        self.legacy
            .iter()
            .find(|l| **l == label)
            .map(|l| Code::Legacy(*l))
    }

    /// Encode `label`, or [Code::Unknown] if the table does not know it
    pub fn encode_or_unknown(&self, label: &str) -> Code {
        self.encode(label).unwrap_or(Code::Unknown)
    }

    /// Label for a raw pattern, applying the table's fallback policy
    pub fn decode_bits(&self, pattern: u32) -> String {
        match (self.lookup(pattern), self.fallback) {
            (Some(label), _) => label.to_string(),
            (None, Fallback::Unknown) => UNKNOWN.to_string(),
            (None, Fallback::Synthesized) => format!("{UNKNOWN}_{pattern:x}"),
        }
    }

    /// Resolve a code to its label; never fails
    pub fn decode(&self, code: &Code) -> String {
        match code {
            Code::Bits(bits) => self.decode_bits(bits.value()),
            Code::Legacy(label) => label.to_string(),
            Code::Unknown => UNKNOWN.to_string(),
        }
    }

    /// Every label with a bit pattern in this table
    pub fn labels(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|(_, label)| *label)
    }
}

/// RAM size in megabytes
pub static MEMORY_SIZES: CodeTable = CodeTable {
    name: "memory size",
    width: 3,
    entries: &[(0b000, "256"), (0b001, "512"), (0b010, "1024")],
    legacy: &["256/512"],
    fallback: Fallback::Unknown,
};

pub static MANUFACTURERS: CodeTable = CodeTable {
    name: "manufacturer",
    width: 4,
    entries: &[
        (0x0, "Sony UK"),
        (0x1, "Egoman"),
        (0x2, "Embest"),
        (0x3, "Sony Japan"),
        (0x4, "Embest #2"),
        (0x5, "Stadium"),
    ],
    legacy: &["Qisda"],
    fallback: Fallback::Unknown,
};

pub static PROCESSORS: CodeTable = CodeTable {
    name: "processor",
    width: 4,
    entries: &[(0x0, "BCM2835"), (0x1, "BCM2836"), (0x2, "BCM2837")],
    legacy: &[],
    fallback: Fallback::Unknown,
};

pub static BOARD_TYPES: CodeTable = CodeTable {
    name: "board type",
    width: 8,
    entries: &[
        (0x00, "A"),
        (0x01, "B"),
        (0x02, "A+"),
        (0x03, "B+"),
        (0x04, "2B"),
        (0x05, "Alpha"),
        (0x06, "CM1"),
        (0x08, "3B"),
        (0x09, "Zero"),
        (0x0a, "CM3"),
        (0x0c, "Zero W"),
        (0x0d, "3B+"),
        (0x0e, "3A+"),
    ],
    legacy: &[],
    fallback: Fallback::Synthesized,
};

pub static BOARD_REVISIONS: CodeTable = CodeTable {
    name: "board revision",
    width: 4,
    entries: &[(0x0, "1.0"), (0x1, "1.1"), (0x2, "1.2"), (0x3, "1.3")],
    legacy: &["2.0"],
    fallback: Fallback::Unknown,
};

/// Label a board type pattern, falling back to `unknown_<hex>`
pub fn resolve_board_type_label(pattern: u32) -> String {
    BOARD_TYPES.decode_bits(pattern)
}

/// Board attributes described by a legacy revision code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyBoard {
    pub memory_size: &'static str,
    pub manufacturer: &'static str,
    pub processor: &'static str,
    pub board_type: &'static str,
    pub board_revision: &'static str,
}

impl LegacyBoard {
    pub const UNKNOWN: Self = Self::new(UNKNOWN, UNKNOWN, UNKNOWN, UNKNOWN, UNKNOWN);

    const fn new(
        memory_size: &'static str,
        manufacturer: &'static str,
        processor: &'static str,
        board_type: &'static str,
        board_revision: &'static str,
    ) -> Self {
        Self {
            memory_size,
            manufacturer,
            processor,
            board_type,
            board_revision,
        }
    }
}

/// Boards of the legacy revision scheme, keyed by their 5-bit code
const LEGACY_REVISIONS: &[(u32, LegacyBoard)] = &[
    (0x02, LegacyBoard::new("256", "Egoman", "BCM2835", "B", "1.0")),
    (0x03, LegacyBoard::new("256", "Egoman", "BCM2835", "B", "1.0")),
    (0x04, LegacyBoard::new("256", "Sony UK", "BCM2835", "B", "2.0")),
    (0x05, LegacyBoard::new("256", "Qisda", "BCM2835", "B", "2.0")),
    (0x06, LegacyBoard::new("256", "Egoman", "BCM2835", "B", "2.0")),
    (0x07, LegacyBoard::new("256", "Egoman", "BCM2835", "A", "2.0")),
    (0x08, LegacyBoard::new("256", "Sony UK", "BCM2835", "A", "2.0")),
    (0x09, LegacyBoard::new("256", "Qisda", "BCM2835", "A", "2.0")),
    (0x0d, LegacyBoard::new("512", "Egoman", "BCM2835", "B", "2.0")),
    (0x0e, LegacyBoard::new("512", "Sony UK", "BCM2835", "B", "2.0")),
    (0x0f, LegacyBoard::new("512", "Egoman", "BCM2835", "B", "2.0")),
    (0x10, LegacyBoard::new("512", "Sony UK", "BCM2835", "B+", "1.0")),
    (0x11, LegacyBoard::new("512", "Sony UK", "BCM2835", "CM1", "1.0")),
    (0x12, LegacyBoard::new("512", "Sony UK", "BCM2835", "A+", "1.1")),
    (0x13, LegacyBoard::new("512", "Embest", "BCM2835", "B+", "1.2")),
    (0x14, LegacyBoard::new("512", "Embest", "BCM2835", "CM1", "1.0")),
    // Shipped with either 256MB or 512MB
    (0x15, LegacyBoard::new("256/512", "Embest", "BCM2835", "A+", "1.1")),
];

/// The board described by legacy revision `code`.
///
/// Codes without a known board yield [LegacyBoard::UNKNOWN].
pub fn legacy_board(code: u32) -> LegacyBoard {
    LEGACY_REVISIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, board)| *board)
        .unwrap_or(LegacyBoard::UNKNOWN)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn tables() -> [&'static CodeTable; 5] {
        [
            &MEMORY_SIZES,
            &MANUFACTURERS,
            &PROCESSORS,
            &BOARD_TYPES,
            &BOARD_REVISIONS,
        ]
    }

    #[test]
    fn labels_round_trip_through_their_patterns() {
        for table in tables() {
            for label in table.labels() {
                let code = table.encode(label).unwrap();
                assert!(matches!(code, Code::Bits(_)), "{label} in {}", table.name);
                assert_eq!(table.decode(&code), label);
            }
        }
    }

    #[test]
    fn patterns_are_unique_and_fit_the_field() {
        for table in tables() {
            let mut patterns: Vec<u32> = table.entries.iter().map(|(bits, _)| *bits).collect();
            assert!(patterns.iter().all(|bits| *bits < 1 << table.width));

            patterns.sort_unstable();
            patterns.dedup();
            assert_eq!(patterns.len(), table.entries.len(), "{}", table.name);
        }
    }

    #[test]
    fn unmapped_patterns_are_unknown() {
        for pattern in 0b011..=0b111 {
            assert_eq!(MEMORY_SIZES.decode_bits(pattern), UNKNOWN);
        }
        for pattern in 0x6..=0xf {
            assert_eq!(MANUFACTURERS.decode_bits(pattern), UNKNOWN);
        }
        for pattern in 0x3..=0xf {
            assert_eq!(PROCESSORS.decode_bits(pattern), UNKNOWN);
        }
        for pattern in 0x4..=0xf {
            assert_eq!(BOARD_REVISIONS.decode_bits(pattern), UNKNOWN);
        }
    }

    #[test]
    fn unmapped_board_types_keep_their_value() {
        assert_eq!(resolve_board_type_label(0x07), "unknown_7");
        assert_eq!(resolve_board_type_label(0x0b), "unknown_b");
        assert_eq!(resolve_board_type_label(0x11), "unknown_11");
        assert_eq!(resolve_board_type_label(0x0d), "3B+");
    }

    #[test]
    fn legacy_only_labels() {
        assert_eq!(MEMORY_SIZES.encode("256/512"), Some(Code::Legacy("256/512")));
        assert_eq!(MANUFACTURERS.encode("Qisda"), Some(Code::Legacy("Qisda")));
        assert_eq!(BOARD_REVISIONS.encode("2.0"), Some(Code::Legacy("2.0")));
        assert_eq!(BOARD_REVISIONS.decode(&Code::Legacy("2.0")), "2.0");
        assert_eq!(PROCESSORS.encode("Qisda"), None);
        assert_eq!(BOARD_TYPES.encode_or_unknown(UNKNOWN), Code::Unknown);
        assert_eq!(BOARD_TYPES.decode(&Code::Unknown), UNKNOWN);
    }

    #[test]
    fn legacy_codes() {
        assert_eq!(
            legacy_board(0x02),
            LegacyBoard::new("256", "Egoman", "BCM2835", "B", "1.0")
        );
        assert_eq!(legacy_board(0x15).memory_size, "256/512");
        assert_eq!(legacy_board(0x00), LegacyBoard::UNKNOWN);
        assert_eq!(legacy_board(0x0a), LegacyBoard::UNKNOWN);
        assert_eq!(legacy_board(0x1f), LegacyBoard::UNKNOWN);
    }

    #[test]
    fn legacy_boards_resolve_through_the_tables() {
        for (code, board) in LEGACY_REVISIONS {
            let fields = [
                (&MEMORY_SIZES, board.memory_size),
                (&MANUFACTURERS, board.manufacturer),
                (&PROCESSORS, board.processor),
                (&BOARD_TYPES, board.board_type),
                (&BOARD_REVISIONS, board.board_revision),
            ];

            for (table, label) in fields {
                assert!(table.encode(label).is_some(), "{label} of legacy code {code:#x}");
            }
        }
    }
}
