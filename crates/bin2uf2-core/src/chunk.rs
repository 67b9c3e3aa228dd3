use crate::uf2::PAYLOAD_SIZE;
use std::slice;

/// One payload-sized slice of the input, zero-padded at the end of the image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    bytes: [u8; PAYLOAD_SIZE],
    len: usize,
}

impl Chunk {
    fn from_slice(src: &[u8]) -> Self {
        debug_assert!(!src.is_empty() && src.len() <= PAYLOAD_SIZE);

        let mut bytes = [0; PAYLOAD_SIZE];
        bytes[..src.len()].copy_from_slice(src);

        Self {
            bytes,
            len: src.len(),
        }
    }

    pub fn bytes(&self) -> &[u8; PAYLOAD_SIZE] {
        &self.bytes
    }

    /// Number of bytes taken from the input, the rest is padding.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_padded(&self) -> bool {
        self.len < PAYLOAD_SIZE
    }
}

/// Lazily splits an image into [`Chunk`]s.
#[derive(Clone, Debug)]
pub struct Chunks<'a> {
    inner: slice::Chunks<'a, u8>,
}

impl Iterator for Chunks<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Chunk::from_slice)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Chunks<'_> {}

pub fn chunks(data: &[u8]) -> Chunks<'_> {
    Chunks {
        inner: data.chunks(PAYLOAD_SIZE),
    }
}

/// `ceil(len / PAYLOAD_SIZE)`, zero for an empty image.
pub fn chunk_count(len: usize) -> usize {
    len.div_ceil(PAYLOAD_SIZE)
}
