//! This is the backend library logic for bin2uf2-rs.
//!
//! It packs a flat firmware binary into UF2 blocks of 256 payload bytes,
//! addressed contiguously from a base address and tagged with a family id.
//! The input is treated as opaque bytes, no object format is parsed.

use crate::{
    chunk::{chunk_count, chunks},
    family::Family,
    uf2::{Uf2Block, PAYLOAD_SIZE, UF2_BLOCK_SIZE},
};
use std::io::Write;

use assert_into::AssertInto;
use log::*;
use thiserror::Error;
use zerocopy::IntoBytes;

pub mod boards;
pub mod chunk;
pub mod family;
pub mod inspect;
pub mod uf2;

pub const DEFAULT_BASE_ADDR: u32 = boards::rp2040::FLASH_START_RP2040;

/// Per-invocation encoding parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uf2Config {
    pub base_addr: u32,
    pub family_id: u32,
}

impl Uf2Config {
    pub fn new(base_addr: u32, family_id: impl Into<u32>) -> Self {
        Self {
            base_addr,
            family_id: family_id.into(),
        }
    }

    pub fn with_base_addr(self, base_addr: u32) -> Self {
        Self { base_addr, ..self }
    }

    pub fn with_family_id(self, family_id: impl Into<u32>) -> Self {
        Self {
            family_id: family_id.into(),
            ..self
        }
    }

    /// Returns the block count for an image of `len` bytes, or
    /// [`Bin2Uf2Error::AddressOverflow`] if the last block would be addressed
    /// past the end of the 32 bit address space.
    pub fn block_count(&self, len: usize) -> Result<u32, Bin2Uf2Error> {
        let overflow = || Bin2Uf2Error::AddressOverflow {
            base_addr: self.base_addr,
            num_blocks: chunk_count(len) as u64,
        };

        let num_blocks = u32::try_from(chunk_count(len)).map_err(|_| overflow())?;
        if let Some(last) = num_blocks.checked_sub(1) {
            target_addr(self.base_addr, last).ok_or_else(overflow)?;
        }

        Ok(num_blocks)
    }
}

impl Default for Uf2Config {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_ADDR, Family::default())
    }
}

#[derive(Error, Debug)]
pub enum Bin2Uf2Error {
    #[error("{num_blocks} blocks starting at {base_addr:#010x} do not fit in the 32 bit address space")]
    AddressOverflow { base_addr: u32, num_blocks: u64 },
    #[error("Failed to write to output")]
    FailedToWrite(std::io::Error),
}

fn target_addr(base_addr: u32, block_no: u32) -> Option<u32> {
    block_no
        .checked_mul(PAYLOAD_SIZE.assert_into())
        .and_then(|offset| base_addr.checked_add(offset))
}

/// Frames one chunk as block `block_no` of `num_blocks`.
pub fn assemble_block(
    chunk: &[u8; PAYLOAD_SIZE],
    block_no: u32,
    num_blocks: u32,
    config: &Uf2Config,
) -> Result<Uf2Block, Bin2Uf2Error> {
    let target_addr =
        target_addr(config.base_addr, block_no).ok_or(Bin2Uf2Error::AddressOverflow {
            base_addr: config.base_addr,
            num_blocks: u64::from(block_no) + 1,
        })?;

    Ok(Uf2Block::new(
        chunk,
        target_addr,
        block_no,
        num_blocks,
        config.family_id,
    ))
}

/// Streams the UF2 image of `data` into `output`.
///
/// The address range is checked before anything is written, so an
/// [`Bin2Uf2Error::AddressOverflow`] leaves `output` untouched.
pub fn write_output(
    data: &[u8],
    mut output: impl Write,
    config: &Uf2Config,
) -> Result<(), Bin2Uf2Error> {
    let num_blocks = config.block_count(data.len())?;

    for (block_no, chunk) in (0..num_blocks).zip(chunks(data)) {
        let block = assemble_block(chunk.bytes(), block_no, num_blocks, config)?;

        debug!(
            "Block {} / {} {:#010x}",
            block_no,
            num_blocks,
            block.header.target_addr.get()
        );

        output
            .write_all(block.as_bytes())
            .map_err(Bin2Uf2Error::FailedToWrite)?;
    }

    Ok(())
}

/// Converts a flat binary into a UF2 image.
pub fn encode(data: &[u8], config: &Uf2Config) -> Result<Vec<u8>, Bin2Uf2Error> {
    let num_blocks = config.block_count(data.len())?;

    let mut output = Vec::with_capacity(num_blocks as usize * UF2_BLOCK_SIZE);
    write_output(data, &mut output, config)?;

    Ok(output)
}

/// Size of the UF2 image for `len` input bytes.
pub fn encoded_len(len: usize) -> usize {
    chunk_count(len) * UF2_BLOCK_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        inspect::blocks,
        uf2::{UF2_FLAG_FAMILY_ID_PRESENT, UF2_MAGIC_END, UF2_MAGIC_START0, UF2_MAGIC_START1},
    };
    use std::io;

    fn word(block: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(block[offset..offset + 4].try_into().unwrap())
    }

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 7 + 3) as u8).collect()
    }

    #[test]
    pub fn blink() {
        let bytes_in = include_bytes!("../tests/fixtures/blink.bin");
        let bytes_out = encode(bytes_in, &Uf2Config::default()).unwrap();

        assert_eq!(bytes_out, include_bytes!("../tests/fixtures/blink.uf2"));
    }

    #[test]
    fn output_length() {
        for len in [0, 1, 255, 256, 257, 300, 512, 4097] {
            let out = encode(&pattern(len), &Uf2Config::default()).unwrap();
            assert_eq!(out.len(), 512 * len.div_ceil(256), "len {len}");
            assert_eq!(out.len(), encoded_len(len));
        }
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(encode(&[], &Uf2Config::default()).unwrap().is_empty());
    }

    #[test]
    fn header_fields() {
        let config = Uf2Config::new(0x2000_0000, Family::RP2350_ARM_S);
        let out = encode(&pattern(1000), &config).unwrap();

        for (i, block) in out.chunks_exact(UF2_BLOCK_SIZE).enumerate() {
            assert_eq!(word(block, 0), UF2_MAGIC_START0);
            assert_eq!(word(block, 4), UF2_MAGIC_START1);
            assert_eq!(word(block, 8) & UF2_FLAG_FAMILY_ID_PRESENT, UF2_FLAG_FAMILY_ID_PRESENT);
            assert_eq!(word(block, 12), 0x2000_0000 + i as u32 * 256);
            assert_eq!(word(block, 16), 256);
            assert_eq!(word(block, 20), i as u32);
            assert_eq!(word(block, 24), 4);
            assert_eq!(word(block, 28), 0xe48bff59);
            assert!(block[288..508].iter().all(|&b| b == 0));
            assert_eq!(word(block, 508), UF2_MAGIC_END);
        }
    }

    #[test]
    fn single_full_chunk_is_unmodified() {
        let data = pattern(256);
        let out = encode(&data, &Uf2Config::default()).unwrap();

        assert_eq!(out.len(), 512);
        assert_eq!(&out[32..288], &data[..]);
    }

    #[test]
    fn last_chunk_is_zero_padded() {
        let data = pattern(300);
        let out = encode(&data, &Uf2Config::default()).unwrap();
        let second = &out[512..];

        assert_eq!(out.len(), 1024);
        assert_eq!(&second[32..76], &data[256..]);
        assert!(second[76..288].iter().all(|&b| b == 0));
    }

    #[test]
    fn payload_round_trips() {
        let data = pattern(5000);
        let out = encode(&data, &Uf2Config::default()).unwrap();

        let recovered: Vec<u8> = blocks(&out)
            .unwrap()
            .flat_map(|block| block.unwrap().payload().to_vec())
            .collect();

        assert_eq!(&recovered[..data.len()], &data[..]);
        assert!(recovered[data.len()..].iter().all(|&b| b == 0));
    }

    #[test]
    fn last_addressable_block_is_accepted() {
        let config = Uf2Config::default().with_base_addr(u32::MAX - 255);
        let out = encode(&pattern(256), &config).unwrap();

        assert_eq!(word(&out, 12), u32::MAX - 255);
    }

    #[test]
    fn address_overflow() {
        let config = Uf2Config::default().with_base_addr(u32::MAX - 255);
        let mut out = Vec::new();

        let err = write_output(&pattern(257), &mut out, &config).unwrap_err();

        assert!(matches!(
            err,
            Bin2Uf2Error::AddressOverflow {
                base_addr,
                num_blocks: 2
            } if base_addr == u32::MAX - 255
        ));
        assert!(out.is_empty());
        assert!(encode(&pattern(257), &config).is_err());
    }

    #[test]
    fn assemble_block_guards_address() {
        let config = Uf2Config::new(0xffff_ff00, Family::RP2040);
        let chunk = [0; PAYLOAD_SIZE];

        assert!(assemble_block(&chunk, 0, 2, &config).is_ok());
        assert!(matches!(
            assemble_block(&chunk, 1, 2, &config),
            Err(Bin2Uf2Error::AddressOverflow { .. })
        ));
    }

    #[test]
    fn encoding_is_deterministic() {
        let data = pattern(777);
        let config = Uf2Config::default();

        assert_eq!(
            encode(&data, &config).unwrap(),
            encode(&data, &config).unwrap()
        );
    }

    #[test]
    fn write_errors_are_reported() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk full"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let err = write_output(&pattern(10), Broken, &Uf2Config::default()).unwrap_err();
        assert!(matches!(err, Bin2Uf2Error::FailedToWrite(_)));
    }
}
