//! Read-only view over an encoded UF2 stream.

use crate::uf2::{Uf2Block, Uf2ParseError, UF2_BLOCK_SIZE, UF2_FLAG_FAMILY_ID_PRESENT};
use assert_into::AssertInto;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSummary {
    pub num_blocks: u32,
    pub family_id: Option<u32>,
    pub first_addr: Option<u32>,
    pub last_addr: Option<u32>,
    pub payload_bytes: u64,
}

/// Iterates over every 512 byte record of `stream`.
///
/// Fails up front when the stream length is not a whole number of blocks.
pub fn blocks(
    stream: &[u8],
) -> Result<impl Iterator<Item = Result<&Uf2Block, Uf2ParseError>> + '_, Uf2ParseError> {
    if stream.len() % UF2_BLOCK_SIZE != 0 {
        return Err(Uf2ParseError::InvalidLength(stream.len()));
    }

    Ok(stream
        .chunks_exact(UF2_BLOCK_SIZE)
        .enumerate()
        .map(|(index, bytes)| Uf2Block::parse(bytes, index)))
}

/// Walks the whole stream, checking that it is one contiguous image.
pub fn summarize(stream: &[u8]) -> Result<ImageSummary, Uf2ParseError> {
    let mut summary = ImageSummary {
        num_blocks: 0,
        family_id: None,
        first_addr: None,
        last_addr: None,
        payload_bytes: 0,
    };

    for (index, block) in blocks(stream)?.enumerate() {
        let block = block?;
        let header = &block.header;
        let expected_no: u32 = index.assert_into();

        if header.block_no.get() != expected_no {
            return Err(Uf2ParseError::BlockOutOfOrder {
                expected: expected_no,
                actual: header.block_no.get(),
            });
        }

        if index == 0 {
            summary.num_blocks = header.num_blocks.get();
            summary.family_id = block
                .has_flag(UF2_FLAG_FAMILY_ID_PRESENT)
                .then(|| header.family_id.get());
            summary.first_addr = Some(header.target_addr.get());
        } else {
            if header.num_blocks.get() != summary.num_blocks {
                return Err(Uf2ParseError::InconsistentBlockCount {
                    index,
                    expected: summary.num_blocks,
                    actual: header.num_blocks.get(),
                });
            }
            if let Some(expected) = summary.family_id {
                if header.family_id.get() != expected {
                    return Err(Uf2ParseError::InconsistentFamily {
                        index,
                        expected,
                        actual: header.family_id.get(),
                    });
                }
            }
        }

        summary.last_addr = Some(header.target_addr.get());
        summary.payload_bytes += block.payload().len() as u64;
    }

    let found: u32 = (stream.len() / UF2_BLOCK_SIZE).assert_into();
    if found != summary.num_blocks && found != 0 {
        return Err(Uf2ParseError::InconsistentBlockCount {
            index: found.assert_into(),
            expected: summary.num_blocks,
            actual: found,
        });
    }

    Ok(summary)
}
