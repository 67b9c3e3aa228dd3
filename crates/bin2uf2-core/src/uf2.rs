//! UF2 block layout and magic constants.
//!
//! See <https://github.com/microsoft/uf2> for the format description. Every
//! field is little-endian regardless of the host.

use static_assertions::const_assert;
use std::mem;
use thiserror::Error;
use zerocopy::{
    byteorder::{LittleEndian, U32},
    FromBytes, Immutable, IntoBytes, KnownLayout,
};

pub const UF2_MAGIC_START0: u32 = 0x0A324655;
pub const UF2_MAGIC_START1: u32 = 0x9E5D5157;
pub const UF2_MAGIC_END: u32 = 0x0AB16F30;

pub const UF2_FLAG_NOT_MAIN_FLASH: u32 = 0x00000001;
pub const UF2_FLAG_FILE_CONTAINER: u32 = 0x00001000;
pub const UF2_FLAG_FAMILY_ID_PRESENT: u32 = 0x00002000;
pub const UF2_FLAG_MD5_PRESENT: u32 = 0x00004000;
pub const UF2_FLAG_EXTENSION_TAGS_PRESENT: u32 = 0x00008000;

pub const UF2_BLOCK_SIZE: usize = 512;
pub const UF2_HEADER_SIZE: usize = 32;
pub const UF2_DATA_SIZE: usize = 476;

/// Payload carried by every block this crate writes.
pub const PAYLOAD_SIZE: usize = 256;

pub type Uf2BlockData = [u8; UF2_DATA_SIZE];

#[repr(C)]
#[derive(Clone, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct Uf2BlockHeader {
    pub magic_start0: U32<LittleEndian>,
    pub magic_start1: U32<LittleEndian>,
    pub flags: U32<LittleEndian>,
    pub target_addr: U32<LittleEndian>,
    pub payload_size: U32<LittleEndian>,
    pub block_no: U32<LittleEndian>,
    pub num_blocks: U32<LittleEndian>,
    // file size when the family id flag is clear
    pub family_id: U32<LittleEndian>,
}

#[repr(C)]
#[derive(Clone, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct Uf2Block {
    pub header: Uf2BlockHeader,
    pub data: Uf2BlockData,
    pub magic_end: U32<LittleEndian>,
}

const_assert!(mem::size_of::<Uf2BlockHeader>() == UF2_HEADER_SIZE);
const_assert!(mem::size_of::<Uf2Block>() == UF2_BLOCK_SIZE);
const_assert!(PAYLOAD_SIZE <= UF2_DATA_SIZE);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Uf2ParseError {
    #[error("UF2 data is {0} bytes, not a multiple of 512")]
    InvalidLength(usize),
    #[error("Block {index} has a bad magic number")]
    InvalidMagic { index: usize },
    #[error("Block {index} claims a payload of {size} bytes")]
    InvalidPayloadSize { index: usize, size: u32 },
    #[error("Expected block number {expected}, found {actual}")]
    BlockOutOfOrder { expected: u32, actual: u32 },
    #[error("Block {index} reports {actual} blocks in total, expected {expected}")]
    InconsistentBlockCount {
        index: usize,
        expected: u32,
        actual: u32,
    },
    #[error("Block {index} targets family {actual:#010x}, expected {expected:#010x}")]
    InconsistentFamily {
        index: usize,
        expected: u32,
        actual: u32,
    },
}

impl Uf2Block {
    /// Creates a block carrying `payload` with every other field filled in
    /// from the arguments. The unused tail of the data area stays zeroed.
    pub fn new(
        payload: &[u8; PAYLOAD_SIZE],
        target_addr: u32,
        block_no: u32,
        num_blocks: u32,
        family_id: u32,
    ) -> Self {
        let mut data: Uf2BlockData = [0; UF2_DATA_SIZE];
        data[..PAYLOAD_SIZE].copy_from_slice(payload);

        Self {
            header: Uf2BlockHeader {
                magic_start0: U32::new(UF2_MAGIC_START0),
                magic_start1: U32::new(UF2_MAGIC_START1),
                flags: U32::new(UF2_FLAG_FAMILY_ID_PRESENT),
                target_addr: U32::new(target_addr),
                payload_size: U32::new(PAYLOAD_SIZE as u32),
                block_no: U32::new(block_no),
                num_blocks: U32::new(num_blocks),
                family_id: U32::new(family_id),
            },
            data,
            magic_end: U32::new(UF2_MAGIC_END),
        }
    }

    /// Views exactly [`UF2_BLOCK_SIZE`] bytes as a block.
    ///
    /// `index` only labels errors.
    pub fn parse(bytes: &[u8], index: usize) -> Result<&Self, Uf2ParseError> {
        let block =
            Self::ref_from_bytes(bytes).map_err(|_| Uf2ParseError::InvalidLength(bytes.len()))?;

        if block.header.magic_start0.get() != UF2_MAGIC_START0
            || block.header.magic_start1.get() != UF2_MAGIC_START1
            || block.magic_end.get() != UF2_MAGIC_END
        {
            return Err(Uf2ParseError::InvalidMagic { index });
        }

        let size = block.header.payload_size.get();
        if size as usize > UF2_DATA_SIZE {
            return Err(Uf2ParseError::InvalidPayloadSize { index, size });
        }

        Ok(block)
    }

    pub fn has_flag(&self, flag: u32) -> bool {
        self.header.flags.get() & flag == flag
    }

    /// The data bytes the block actually carries.
    pub fn payload(&self) -> &[u8] {
        let size = (self.header.payload_size.get() as usize).min(UF2_DATA_SIZE);
        &self.data[..size]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Uf2Block {
        let mut payload = [0u8; PAYLOAD_SIZE];
        payload.iter_mut().enumerate().for_each(|(i, b)| *b = i as u8);
        Uf2Block::new(&payload, 0x1000_0100, 1, 3, 0xe48bff56)
    }

    #[test]
    fn fields_land_at_documented_offsets() {
        let block = sample();
        let bytes = block.as_bytes();

        let word = |offset: usize| u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap());

        assert_eq!(bytes.len(), UF2_BLOCK_SIZE);
        assert_eq!(word(0), UF2_MAGIC_START0);
        assert_eq!(word(4), UF2_MAGIC_START1);
        assert_eq!(word(8), UF2_FLAG_FAMILY_ID_PRESENT);
        assert_eq!(word(12), 0x1000_0100);
        assert_eq!(word(16), 256);
        assert_eq!(word(20), 1);
        assert_eq!(word(24), 3);
        assert_eq!(word(28), 0xe48bff56);
        assert_eq!(bytes[32], 0);
        assert_eq!(bytes[32 + 255], 255);
        assert!(bytes[288..508].iter().all(|&b| b == 0));
        assert_eq!(word(508), UF2_MAGIC_END);
    }

    #[test]
    fn parse_recovers_payload() {
        let block = sample();
        let parsed = Uf2Block::parse(block.as_bytes(), 0).unwrap();

        assert!(parsed.has_flag(UF2_FLAG_FAMILY_ID_PRESENT));
        assert!(!parsed.has_flag(UF2_FLAG_NOT_MAIN_FLASH));
        assert_eq!(parsed.payload(), &block.data[..PAYLOAD_SIZE]);
    }

    #[test]
    fn parse_rejects_bad_magic() {
        let mut bytes = sample().as_bytes().to_vec();
        bytes[508] ^= 0xff;

        assert_eq!(
            Uf2Block::parse(&bytes, 4).unwrap_err(),
            Uf2ParseError::InvalidMagic { index: 4 }
        );
    }

    #[test]
    fn parse_rejects_short_input() {
        let bytes = sample().as_bytes()[..511].to_vec();

        assert_eq!(
            Uf2Block::parse(&bytes, 0).unwrap_err(),
            Uf2ParseError::InvalidLength(511)
        );
    }

    #[test]
    fn parse_rejects_oversized_payload() {
        let mut bytes = sample().as_bytes().to_vec();
        bytes[16..20].copy_from_slice(&477u32.to_le_bytes());

        assert_eq!(
            Uf2Block::parse(&bytes, 2).unwrap_err(),
            Uf2ParseError::InvalidPayloadSize {
                index: 2,
                size: 477
            }
        );
    }
}
