//! Board identity from the revision word
//!
//! Region 30 holds either a legacy revision code, an index into a fixed list
//! of early boards, or the new-style encoding in which each attribute has its
//! own bitfield. The `new_flag` bit selects between the two.

use log::debug;

use crate::{
    fields::revision,
    store::RegionStore,
    tables::{
        self, Code, BOARD_REVISIONS, BOARD_TYPES, MANUFACTURERS, MEMORY_SIZES, PROCESSORS,
    },
    Error,
};

/// Encoding used by the revision word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Legacy revision code
    Legacy(u32),
    /// New-style bitfields
    New,
}

/// Identity of a board, as stored in the revision word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardIdentity {
    pub scheme: Scheme,
    pub memory_size: Code,
    pub manufacturer: Code,
    pub processor: Code,
    pub board_type: Code,
    pub board_revision: Code,
}

/// Identity fields resolved to their labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLabels {
    pub memory_size: String,
    pub manufacturer: String,
    pub processor: String,
    pub board_type: String,
    pub board_revision: String,
}

impl BoardIdentity {
    /// Resolve every field through its code table
    pub fn labels(&self) -> BoardLabels {
        BoardLabels {
            memory_size: MEMORY_SIZES.decode(&self.memory_size),
            manufacturer: MANUFACTURERS.decode(&self.manufacturer),
            processor: PROCESSORS.decode(&self.processor),
            board_type: BOARD_TYPES.decode(&self.board_type),
            board_revision: BOARD_REVISIONS.decode(&self.board_revision),
        }
    }
}

/// Decode the board identity held in the revision word
pub fn decode_revision(store: &RegionStore) -> Result<BoardIdentity, Error> {
    let flag = revision::NEW_FLAG.read(store)?;

    let identity = match flag.value() {
        0 => {
            let code = revision::LEGACY_BOARD_REVISION.read(store)?.value();
            let board = tables::legacy_board(code);
            debug!("Legacy revision code {code:#04x}: {board:?}");

            BoardIdentity {
                scheme: Scheme::Legacy(code),
                memory_size: MEMORY_SIZES.encode_or_unknown(board.memory_size),
                manufacturer: MANUFACTURERS.encode_or_unknown(board.manufacturer),
                processor: PROCESSORS.encode_or_unknown(board.processor),
                board_type: BOARD_TYPES.encode_or_unknown(board.board_type),
                board_revision: BOARD_REVISIONS.encode_or_unknown(board.board_revision),
            }
        }
        1 => BoardIdentity {
            scheme: Scheme::New,
            memory_size: Code::Bits(revision::MEMORY_SIZE.read(store)?),
            manufacturer: Code::Bits(revision::MANUFACTURER.read(store)?),
            processor: Code::Bits(revision::PROCESSOR.read(store)?),
            board_type: Code::Bits(revision::BOARD_TYPE.read(store)?),
            board_revision: Code::Bits(revision::BOARD_REVISION.read(store)?),
        },
        other => {
            return Err(Error::MalformedInput(format!(
                "revision flag has impossible value {other:#b}"
            )))
        }
    };

    Ok(identity)
}
