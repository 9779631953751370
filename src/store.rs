//! Parsed OTP dump
//!
//! `vcgencmd otp_dump` prints one record per line, `<index>:<word>`, where the
//! word is eight hexadecimal digits. Some dumps pad lines after the word, so
//! only the first eight characters after the separator are considered.

use std::{collections::BTreeMap, str::FromStr};

use log::debug;

use crate::{
    error::{Error, RecordError},
    region::Region,
};

/// Number of hex digits in a dumped word
const WORD_DIGITS: usize = 8;

/// The words of an OTP dump, keyed by region index
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegionStore {
    words: BTreeMap<u8, u32>,
}

impl RegionStore {
    /// Parse the records of a dump, one per line.
    ///
    /// Blank lines are skipped. Any other line which is not a valid record
    /// aborts parsing; line numbers in the resulting error start at 1.
    pub fn load<I, S>(lines: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words = BTreeMap::new();

        for (n, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }

            let malformed = |reason| Error::MalformedRecord {
                line: n + 1,
                content: line.trim_end().to_string(),
                reason,
            };

            let (index, word) = parse_record(line).map_err(malformed)?;
            if words.insert(index, word).is_some() {
                return Err(malformed(RecordError::DuplicateIndex(index)));
            }

            if Region::from_index(index).is_none() {
                debug!("Region index {index} is outside the documented OTP range");
            }
        }

        if words.is_empty() {
            return Err(Error::EmptyInput);
        }

        debug!("Loaded {} OTP words", words.len());

        Ok(Self { words })
    }

    /// Number of words in the dump
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the dump holds no words
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Is the given region present in the dump?
    pub fn contains(&self, region: Region) -> bool {
        self.words.contains_key(&region.index())
    }

    /// The word stored in `region` as an unsigned integer
    pub fn get_word(&self, region: Region) -> Result<u32, Error> {
        self.words
            .get(&region.index())
            .copied()
            .ok_or(Error::MissingRegion { region })
    }

    /// The word stored in `region`, as it appears in a dump
    pub fn get_raw(&self, region: Region) -> Result<String, Error> {
        self.get_word(region).map(|word| format!("{word:08x}"))
    }

    /// The word stored in `region` as 32 binary digits, most significant first
    pub fn get_binary(&self, region: Region) -> Result<String, Error> {
        self.get_word(region).map(|word| format!("{word:032b}"))
    }

    /// The word stored in `region` as a `0x`-prefixed hex string
    pub fn get_hex(&self, region: Region) -> Result<String, Error> {
        self.get_word(region).map(|word| format!("{word:#010x}"))
    }

    /// All words of the dump in index order
    pub fn words(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.words.iter().map(|(index, word)| (*index, *word))
    }
}

impl FromStr for RegionStore {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::load(s.lines())
    }
}

fn parse_record(line: &str) -> Result<(u8, u32), RecordError> {
    let (index, value) = line.split_once(':').ok_or(RecordError::MissingSeparator)?;

    let index = index.trim();
    let index = index.parse::<u8>().map_err(|_| {
        if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
            RecordError::IndexOutOfRange(index.to_string())
        } else {
            RecordError::InvalidIndex
        }
    })?;

    let digits = match value.get(..WORD_DIGITS) {
        Some(digits) => digits,
        // Long enough, but the cut falls inside a multi-byte character
        None if value.len() >= WORD_DIGITS => return Err(RecordError::InvalidHex),
        None => return Err(RecordError::TooShort(value.trim_end().chars().count())),
    };
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(RecordError::InvalidHex);
    }

    let word = u32::from_str_radix(digits, 16).map_err(|_| RecordError::InvalidHex)?;

    Ok((index, word))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const DUMP: &str = "\
08:00000000
16:00280000
17:1020000a
18:1020000a
28:a1b2c3d4
29:5e4d3c2b
30:00a02082
65:dca63212
64:34567800
";

    fn reason(err: Error) -> (usize, RecordError) {
        match err {
            Error::MalformedRecord { line, reason, .. } => (line, reason),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn loads_records_by_index() {
        let store: RegionStore = DUMP.parse().unwrap();

        assert_eq!(store.len(), 9);
        assert_eq!(store.get_word(Region::Bootmode).unwrap(), 0x1020_000a);
        assert_eq!(store.get_raw(Region::SerialNumber).unwrap(), "a1b2c3d4");
        assert!(store.contains(Region::Control));
        assert!(!store.contains(Region::AdvancedBoot));
    }

    #[test]
    fn typed_views() {
        let store: RegionStore = DUMP.parse().unwrap();

        assert_eq!(
            store.get_binary(Region::Control).unwrap(),
            "00000000001010000000000000000000"
        );
        assert_eq!(store.get_hex(Region::Control).unwrap(), "0x00280000");
        assert_eq!(store.get_hex(Region::Unknown8).unwrap(), "0x00000000");
    }

    #[test]
    fn hex_and_binary_views_agree() {
        let words = ["00000000", "ffffffff", "00a02082", "80000001", "dca63212"];

        for raw in words {
            let store = RegionStore::load([format!("30:{raw}")]).unwrap();
            let hex = store.get_hex(Region::RevisionNumber).unwrap();
            let binary = store.get_binary(Region::RevisionNumber).unwrap();

            assert_eq!(
                u32::from_str_radix(hex.trim_start_matches("0x"), 16).unwrap(),
                u32::from_str_radix(&binary, 2).unwrap()
            );
            assert_eq!(store.get_raw(Region::RevisionNumber).unwrap(), raw);
        }
    }

    #[test]
    fn ignores_trailing_bytes_and_blank_lines() {
        let store = RegionStore::load(["", "17:1020000aXYZ  ", "   ", "18:1020000a\r"]).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get_word(Region::Bootmode).unwrap(), 0x1020_000a);
        assert_eq!(store.get_word(Region::BootmodeCopy).unwrap(), 0x1020_000a);
    }

    #[test]
    fn uppercase_digits_are_accepted() {
        let store = RegionStore::load(["28:A1B2C3D4"]).unwrap();

        assert_eq!(store.get_raw(Region::SerialNumber).unwrap(), "a1b2c3d4");
    }

    #[test]
    fn rejects_non_integer_index() {
        let err = RegionStore::load(["notanumber:deadbeef"]).unwrap_err();

        assert_eq!(reason(err), (1, RecordError::InvalidIndex));
    }

    #[test]
    fn rejects_out_of_range_index() {
        let err = RegionStore::load(["300:deadbeef"]).unwrap_err();

        assert_eq!(
            reason(err),
            (1, RecordError::IndexOutOfRange("300".to_string()))
        );
    }

    #[test]
    fn rejects_missing_separator() {
        let err = RegionStore::load(["17:1020000a", "18 1020000a"]).unwrap_err();

        assert_eq!(reason(err), (2, RecordError::MissingSeparator));
    }

    #[test]
    fn rejects_short_and_non_hex_values() {
        let err = RegionStore::load(["17:1020"]).unwrap_err();
        assert_eq!(reason(err), (1, RecordError::TooShort(4)));

        let err = RegionStore::load(["17:1020000g"]).unwrap_err();
        assert_eq!(reason(err), (1, RecordError::InvalidHex));

        let err = RegionStore::load(["17:+020000a"]).unwrap_err();
        assert_eq!(reason(err), (1, RecordError::InvalidHex));

        let err = RegionStore::load(["17:1020000é"]).unwrap_err();
        assert_eq!(reason(err), (1, RecordError::InvalidHex));
    }

    #[test]
    fn rejects_duplicate_index() {
        let err = RegionStore::load(["17:00000000", "17:00000001"]).unwrap_err();

        assert_eq!(reason(err), (2, RecordError::DuplicateIndex(17)));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            RegionStore::load(Vec::<String>::new()),
            Err(Error::EmptyInput)
        ));
        assert!(matches!("\n\n  \n".parse::<RegionStore>(), Err(Error::EmptyInput)));
    }

    #[test]
    fn missing_region_is_an_error() {
        let store: RegionStore = DUMP.parse().unwrap();

        assert!(matches!(
            store.get_raw(Region::AdvancedBoot),
            Err(Error::MissingRegion { region: Region::AdvancedBoot })
        ));
    }
}
