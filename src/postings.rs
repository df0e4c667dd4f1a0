// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Block posting lists: the byte layout for one term's postings and the
//! cursor that walks it.
//!
//! A list is laid out as: variable-byte length, a raw `u32` block-max array,
//! a raw `u32` block-endpoint array (block 0 implicitly starts at offset 0),
//! then the encoded blocks, each one the document-gap codeword followed by
//! the frequency codeword. Document gaps store `doc − prev − 1` starting
//! from −1, frequencies store `freq − 1`, so both streams are dense small
//! integers.
//!
//! The cursor decodes lazily: advancing decodes document gaps one block at a
//! time; frequencies of a block are only decoded on the first `freq()` call
//! against it. `next_geq` skips whole blocks by scanning the block-max array
//! linearly from the current block; binary search loses here because a skip
//! rarely crosses more than a handful of blocks.

use crate::bits::{patch_u32_le, read_u32_le};
use crate::codec::{BlockCodec, TightVariableByte};
use crate::error::{Error, Result};

// ============================================================================
// WRITE PATH
// ============================================================================

/// Append the encoding of one posting list to `out`.
///
/// `docs` must be non-empty and strictly increasing, `freqs` must be the
/// same length with every entry ≥ 1. Fails with `InvalidArgument` before
/// writing anything otherwise.
pub fn write_posting_list(
    codec: &dyn BlockCodec,
    out: &mut Vec<u8>,
    docs: &[u32],
    freqs: &[u32],
) -> Result<()> {
    if docs.is_empty() {
        return Err(Error::InvalidArgument("posting list must be non-empty".into()));
    }
    if docs.len() != freqs.len() {
        return Err(Error::InvalidArgument(format!(
            "docs/freqs length mismatch: {} vs {}",
            docs.len(),
            freqs.len()
        )));
    }
    if docs.windows(2).any(|w| w[0] >= w[1]) {
        return Err(Error::InvalidArgument(
            "docids must be strictly increasing".into(),
        ));
    }
    if freqs.iter().any(|&f| f == 0) {
        return Err(Error::InvalidArgument("frequencies must be >= 1".into()));
    }

    let n = docs.len();
    let block_size = codec.block_size();
    let blocks = crate::bits::ceil_div(n, block_size);

    TightVariableByte::encode_single(n as u32, out);
    let begin_block_maxs = out.len();
    let begin_block_endpoints = begin_block_maxs + 4 * blocks;
    let begin_blocks = begin_block_endpoints + 4 * (blocks - 1);
    out.resize(begin_blocks, 0);

    let mut docs_buf = vec![0u32; block_size];
    let mut freqs_buf = vec![0u32; block_size];
    // last_doc starts at -1 so the first gap is the first docid itself.
    let mut last_doc = u32::MAX;
    let mut block_base = 0u32;
    for b in 0..blocks {
        let cur_block_size = if (b + 1) * block_size <= n {
            block_size
        } else {
            n % block_size
        };

        for i in 0..cur_block_size {
            let doc = docs[b * block_size + i];
            docs_buf[i] = doc.wrapping_sub(last_doc).wrapping_sub(1);
            last_doc = doc;
            freqs_buf[i] = freqs[b * block_size + i] - 1;
        }
        patch_u32_le(out, begin_block_maxs + 4 * b, last_doc);

        let gaps_universe = last_doc - block_base - (cur_block_size as u32 - 1);
        codec.encode(&docs_buf, Some(gaps_universe), cur_block_size, out);
        codec.encode(&freqs_buf, None, cur_block_size, out);
        if b != blocks - 1 {
            let endpoint = (out.len() - begin_blocks) as u32;
            patch_u32_le(out, begin_block_endpoints + 4 * b, endpoint);
        }
        block_base = last_doc + 1;
    }
    Ok(())
}

/// Rebuild a posting list from block descriptors without re-encoding.
///
/// The descriptors may arrive in any order except that block 0 must come
/// first (its encoding is the only one whose base is implicit). Used to
/// re-lay-out a list after block-level reordering or recompression.
pub fn write_blocks(out: &mut Vec<u8>, n: u32, input_blocks: &[BlockData<'_>]) -> Result<()> {
    match input_blocks.first() {
        Some(first) if first.index == 0 => {}
        _ => {
            return Err(Error::InvalidArgument(
                "first block must remain first when rewriting a list".into(),
            ))
        }
    }

    TightVariableByte::encode_single(n, out);
    let blocks = input_blocks.len();
    let begin_block_maxs = out.len();
    let begin_block_endpoints = begin_block_maxs + 4 * blocks;
    let begin_blocks = begin_block_endpoints + 4 * (blocks - 1);
    out.resize(begin_blocks, 0);

    for block in input_blocks {
        let b = block.index as usize;
        // The block starts wherever the output currently ends.
        if b != 0 {
            let endpoint = (out.len() - begin_blocks) as u32;
            patch_u32_le(out, begin_block_endpoints + 4 * (b - 1), endpoint);
        }
        patch_u32_le(out, begin_block_maxs + 4 * b, block.max);
        block.append_docs_block(out);
        block.append_freqs_block(out);
    }
    Ok(())
}

// ============================================================================
// CURSOR
// ============================================================================

/// Cursor over one encoded posting list.
///
/// Borrows the list bytes for its lifetime and owns only decode scratch.
/// `docid()` returns the universe once the list is exhausted.
pub struct BlockPostingCursor<'a> {
    codec: &'a dyn BlockCodec,
    n: u32,
    num_blocks: usize,
    block_maxs: &'a [u8],
    block_endpoints: &'a [u8],
    blocks_data: &'a [u8],
    universe: u32,

    cur_block: usize,
    pos_in_block: usize,
    cur_block_size: usize,
    cur_block_max: u32,
    cur_docid: u32,

    freqs_offset: usize,
    freqs_decoded: bool,

    docs_buf: Vec<u32>,
    freqs_buf: Vec<u32>,
}

impl<'a> BlockPostingCursor<'a> {
    /// Open a cursor over the list encoded at the start of `data`.
    pub fn new(codec: &'a dyn BlockCodec, data: &'a [u8], universe: u32) -> Self {
        let (n, rest) = TightVariableByte::decode_single(data);
        let block_size = codec.block_size();
        let num_blocks = crate::bits::ceil_div(n as usize, block_size);
        let (block_maxs, rest) = rest.split_at(4 * num_blocks);
        let (block_endpoints, blocks_data) = rest.split_at(4 * (num_blocks - 1));

        let mut cursor = BlockPostingCursor {
            codec,
            n,
            num_blocks,
            block_maxs,
            block_endpoints,
            blocks_data,
            universe,
            cur_block: 0,
            pos_in_block: 0,
            cur_block_size: 0,
            cur_block_max: 0,
            cur_docid: 0,
            freqs_offset: 0,
            freqs_decoded: false,
            docs_buf: vec![0u32; block_size],
            freqs_buf: vec![0u32; block_size],
        };
        cursor.reset();
        cursor
    }

    /// Rewind to the first posting.
    pub fn reset(&mut self) {
        self.decode_docs_block(0);
    }

    /// Current docid, or the universe if exhausted.
    #[inline]
    pub fn docid(&self) -> u32 {
        self.cur_docid
    }

    /// Frequency of the current posting; decodes the block's frequency
    /// codeword on first use.
    #[inline]
    pub fn freq(&mut self) -> u32 {
        if !self.freqs_decoded {
            self.decode_freqs_block();
        }
        self.freqs_buf[self.pos_in_block] + 1
    }

    /// Number of postings in the list.
    pub fn len(&self) -> usize {
        self.n as usize
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Number of encoded blocks.
    pub fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    /// Logical position of the current posting within the list.
    pub fn position(&self) -> usize {
        self.cur_block * self.codec.block_size() + self.pos_in_block
    }

    /// Largest docid in the current block, an O(1) read.
    #[inline]
    pub fn current_block_max(&self) -> u32 {
        self.cur_block_max
    }

    /// Advance to the next posting.
    #[inline]
    pub fn next(&mut self) {
        if self.cur_docid == self.universe {
            return;
        }
        self.pos_in_block += 1;
        if self.pos_in_block == self.cur_block_size {
            if self.cur_block + 1 == self.num_blocks {
                self.cur_docid = self.universe;
                self.pos_in_block = self.cur_block_size - 1;
                return;
            }
            self.decode_docs_block(self.cur_block + 1);
        } else {
            self.cur_docid += self.docs_buf[self.pos_in_block] + 1;
        }
    }

    /// Advance to the first posting with docid ≥ `target`. A target at or
    /// below the current docid is a no-op: the cursor never moves backwards.
    pub fn next_geq(&mut self, target: u32) {
        if target <= self.cur_docid || self.cur_docid == self.universe {
            return;
        }
        if target > self.cur_block_max {
            // Linear scan of the block-max array; binary search performs
            // worse at the block counts a realistic skip covers.
            if target > self.block_max(self.num_blocks - 1) {
                self.cur_docid = self.universe;
                return;
            }
            let mut block = self.cur_block + 1;
            while self.block_max(block) < target {
                block += 1;
            }
            self.decode_docs_block(block);
        }
        while self.cur_docid < target {
            self.pos_in_block += 1;
            debug_assert!(self.pos_in_block < self.cur_block_size);
            self.cur_docid += self.docs_buf[self.pos_in_block] + 1;
        }
    }

    /// Positional access: advance to the posting at logical position `pos`.
    /// Only forward moves are supported.
    pub fn move_to(&mut self, pos: usize) {
        debug_assert!(pos >= self.position());
        debug_assert!(pos < self.len());
        let block = pos / self.codec.block_size();
        if block != self.cur_block {
            self.decode_docs_block(block);
        }
        while self.position() < pos {
            self.pos_in_block += 1;
            self.cur_docid += self.docs_buf[self.pos_in_block] + 1;
        }
    }

    /// Descriptors for every block of the list, in on-disk order. Each holds
    /// the raw codeword slices and decodes on demand.
    pub fn blocks(&self) -> Blocks<'a> {
        Blocks {
            codec: self.codec,
            n: self.n as usize,
            num_blocks: self.num_blocks,
            block_maxs: self.block_maxs,
            rest: self.blocks_data,
            next_index: 0,
            scratch: vec![0u32; self.codec.block_size()],
        }
    }

    #[inline]
    fn block_max(&self, block: usize) -> u32 {
        read_u32_le(&self.block_maxs[4 * block..])
    }

    fn block_len(&self, block: usize) -> usize {
        let block_size = self.codec.block_size();
        if (block + 1) * block_size <= self.n as usize {
            block_size
        } else {
            self.n as usize % block_size
        }
    }

    fn decode_docs_block(&mut self, block: usize) {
        let endpoint = if block == 0 {
            0
        } else {
            read_u32_le(&self.block_endpoints[4 * (block - 1)..]) as usize
        };
        let block_data = &self.blocks_data[endpoint..];
        self.cur_block_size = self.block_len(block);
        // The decoder's only knowledge of where docids restart.
        let cur_base = if block == 0 { 0 } else { self.block_max(block - 1) + 1 };
        self.cur_block_max = self.block_max(block);
        let gaps_universe = self.cur_block_max - cur_base - (self.cur_block_size as u32 - 1);
        let rest = self.codec.decode(
            block_data,
            &mut self.docs_buf[..self.cur_block_size],
            Some(gaps_universe),
            self.cur_block_size,
        );
        self.freqs_offset = self.blocks_data.len() - rest.len();
        self.docs_buf[0] += cur_base;

        self.cur_block = block;
        self.pos_in_block = 0;
        self.cur_docid = self.docs_buf[0];
        self.freqs_decoded = false;
    }

    fn decode_freqs_block(&mut self) {
        self.codec.decode(
            &self.blocks_data[self.freqs_offset..],
            &mut self.freqs_buf[..self.cur_block_size],
            None,
            self.cur_block_size,
        );
        self.freqs_decoded = true;
    }
}

// ============================================================================
// BLOCK DESCRIPTORS
// ============================================================================

/// One block's raw codewords plus the header facts needed to decode them.
pub struct BlockData<'a> {
    pub index: u32,
    pub size: u32,
    pub max: u32,
    pub doc_gaps_universe: u32,
    docs_bytes: &'a [u8],
    freqs_bytes: &'a [u8],
}

impl BlockData<'_> {
    /// Copy the raw document-gap codeword into `out`.
    pub fn append_docs_block(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.docs_bytes);
    }

    /// Copy the raw frequency codeword into `out`.
    pub fn append_freqs_block(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.freqs_bytes);
    }

    /// Decode the document gaps of this block.
    pub fn decode_doc_gaps(&self, codec: &dyn BlockCodec, out: &mut Vec<u32>) {
        out.resize(self.size as usize, 0);
        codec.decode(
            self.docs_bytes,
            out,
            Some(self.doc_gaps_universe),
            self.size as usize,
        );
    }

    /// Decode the frequencies of this block (still stored minus one).
    pub fn decode_freqs(&self, codec: &dyn BlockCodec, out: &mut Vec<u32>) {
        out.resize(self.size as usize, 0);
        codec.decode(self.freqs_bytes, out, None, self.size as usize);
    }
}

/// Lazy iterator over a list's block descriptors.
pub struct Blocks<'a> {
    codec: &'a dyn BlockCodec,
    n: usize,
    num_blocks: usize,
    block_maxs: &'a [u8],
    rest: &'a [u8],
    next_index: usize,
    scratch: Vec<u32>,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = BlockData<'a>;

    fn next(&mut self) -> Option<BlockData<'a>> {
        if self.next_index == self.num_blocks {
            return None;
        }
        let b = self.next_index;
        let block_size = self.codec.block_size();
        let size = if (b + 1) * block_size <= self.n {
            block_size
        } else {
            self.n % block_size
        };
        let max = read_u32_le(&self.block_maxs[4 * b..]);
        let base = if b == 0 {
            0
        } else {
            read_u32_le(&self.block_maxs[4 * (b - 1)..]) + 1
        };
        let gaps_universe = max - base - (size as u32 - 1);

        // Step over both codewords to learn their extents; the gap decode is
        // unavoidable, the frequencies stay raw.
        let docs_begin = self.rest;
        let after_docs = self.codec.decode(
            docs_begin,
            &mut self.scratch[..size],
            Some(gaps_universe),
            size,
        );
        let docs_len = docs_begin.len() - after_docs.len();
        let after_freqs = self
            .codec
            .decode(after_docs, &mut self.scratch[..size], None, size);
        let freqs_len = after_docs.len() - after_freqs.len();

        let block = BlockData {
            index: b as u32,
            size: size as u32,
            max,
            doc_gaps_universe: gaps_universe,
            docs_bytes: &docs_begin[..docs_len],
            freqs_bytes: &after_docs[..freqs_len],
        };
        self.rest = after_freqs;
        self.next_index += 1;
        Some(block)
    }
}
