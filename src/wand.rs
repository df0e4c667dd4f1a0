// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! WAND auxiliary data: per-term and per-block score bounds, document
//! length norms, and the corpus statistics scorers feed on.
//!
//! Built once, after the inverted index, by walking every posting list with
//! the chosen scorer and recording (a) the term's global maximum partial
//! score and (b) one (last-docid, max-score) pair per *score block*. Score
//! blocks are either fixed-length runs or a variable partition chosen by a
//! dynamic program that trades bound tightness against table size through a
//! single λ parameter.
//!
//! Scores can be linearly quantised to u8/u16 on disk; the file records the
//! scorer that produced them and the quantiser's range, because bounds from
//! one scorer are meaningless to another.
//!
//! # File format (`TWND`, version 1)
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ magic "TWND", version u8                                 │
//! │ scorer name (u8 length + bytes)                          │
//! │ quantiser bits u8 (0 = none), quantiser max f32          │
//! │ partition tag u8 (0 fixed / 1 variable), parameter u32   │
//! │ doc_count u32, avg_len f32, collection_len u64           │
//! │ term_count u32, total_blocks u64                         │
//! ├──────────────────────────────────────────────────────────┤
//! │ doc length vector [u32; doc_count]                       │
//! ├──────────────────────────────────────────────────────────┤
//! │ per term: posting_count u32, occurrence_count u32,       │
//! │           block_count u32, max_score (f32 | u8 | u16)    │
//! ├──────────────────────────────────────────────────────────┤
//! │ flattened block last-docids [u32; total_blocks]          │
//! │ flattened block max-scores  [(f32 | u8 | u16)]           │
//! ├──────────────────────────────────────────────────────────┤
//! │ FOOTER: crc32 + magic "DNWT"                             │
//! └──────────────────────────────────────────────────────────┘
//! ```

use std::fs;
use std::path::Path;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::bits::{read_f32_le, read_u16_le, read_u32_le, read_u64_le};
use crate::error::{Error, Result};
use crate::index::{append_footer, check_footer, InvertedIndex, InvertedIndexBuilder, MemorySource};
use crate::scoring::{from_params, LinearQuantizer, QuantizingScorer, ScorerParams};

/// Header magic: "TWND".
pub const WAND_MAGIC: [u8; 4] = *b"TWND";

/// Footer magic: "DNWT".
pub const WAND_FOOTER_MAGIC: [u8; 4] = *b"DNWT";

/// Current WAND-data format version.
pub const WAND_VERSION: u8 = 1;

/// Bound on the variable-partition DP window, so the quadratic inner scan
/// stays quadratic in the window, not the list.
const PARTITION_WINDOW: usize = 2048;

/// How a term's postings are cut into score blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockPartition {
    /// Runs of exactly this many postings (the last may be shorter).
    Fixed(usize),
    /// Dynamic-programming partition minimising Σ(block cost + λ), where a
    /// block's cost is the total overestimation its shared bound causes.
    VariableLambda(f32),
}

impl Default for BlockPartition {
    fn default() -> Self {
        BlockPartition::Fixed(64)
    }
}

struct TermMeta {
    posting_count: u32,
    occurrence_count: u32,
    max_score: f32,
    blocks_start: usize,
    block_count: usize,
}

/// The sealed WAND data; shared read-only across query threads.
pub struct WandData {
    scorer_name: String,
    quantizer_bits: Option<u8>,
    quantizer_max: f32,
    partition: BlockPartition,
    num_docs: u32,
    avg_len: f32,
    collection_len: u64,
    doc_lens: Vec<u32>,
    terms: Vec<TermMeta>,
    block_last_docs: Vec<u32>,
    block_max_scores: Vec<f32>,
}

impl WandData {
    /// Build WAND data for `index` with the scorer `params` names.
    ///
    /// `doc_lens[d]` is the length of document `d`; it must cover exactly
    /// the index universe. `quantize_bits` of 8 or 16 stores all bounds
    /// quantised; the scorer identity is recorded either way.
    pub fn build(
        index: &InvertedIndex,
        doc_lens: Vec<u32>,
        params: &ScorerParams,
        partition: BlockPartition,
        quantize_bits: Option<u8>,
    ) -> Result<WandData> {
        if doc_lens.len() != index.num_docs() as usize {
            return Err(Error::InvalidArgument(format!(
                "{} document lengths for a universe of {}",
                doc_lens.len(),
                index.num_docs()
            )));
        }
        if let Some(bits) = quantize_bits {
            if bits != 8 && bits != 16 {
                return Err(Error::InvalidArgument(format!(
                    "wand quantisation must be 8 or 16 bits, got {}",
                    bits
                )));
            }
        }
        if let BlockPartition::Fixed(size) = partition {
            if size == 0 {
                return Err(Error::InvalidArgument("fixed block size must be > 0".into()));
            }
        }

        let collection_len: u64 = doc_lens.iter().map(|&l| u64::from(l)).sum();
        let avg_len = collection_len as f32 / doc_lens.len().max(1) as f32;

        // First pass: corpus-level term statistics, so the scorer in the
        // second pass sees the finished counts.
        let num_terms = index.num_terms();
        let mut skeleton_terms = Vec::with_capacity(num_terms);
        for term in 0..num_terms as u32 {
            let mut cursor = index.cursor(term)?;
            let posting_count = cursor.len() as u32;
            let mut occurrence_count = 0u64;
            while cursor.docid() < index.num_docs() {
                occurrence_count += u64::from(cursor.freq());
                cursor.next();
            }
            skeleton_terms.push(TermMeta {
                posting_count,
                occurrence_count: occurrence_count as u32,
                max_score: 0.0,
                blocks_start: 0,
                block_count: 0,
            });
        }

        let skeleton = WandData {
            scorer_name: params.name.clone(),
            quantizer_bits: None,
            quantizer_max: 0.0,
            partition,
            num_docs: index.num_docs(),
            avg_len,
            collection_len,
            doc_lens,
            terms: skeleton_terms,
            block_last_docs: Vec::new(),
            block_max_scores: Vec::new(),
        };
        let scorer = from_params(params, &skeleton)?;

        // Second pass: per-term maxima and score-block bounds.
        let score_term = |term: u32| -> Result<(f32, Vec<(u32, f32)>)> {
            let mut cursor = index.cursor(term)?;
            let term_scorer = scorer.term_scorer(term);
            let mut docs = Vec::with_capacity(cursor.len());
            let mut scores = Vec::with_capacity(cursor.len());
            let mut max_score = 0.0f32;
            while cursor.docid() < index.num_docs() {
                let score = term_scorer(cursor.docid(), cursor.freq());
                max_score = max_score.max(score);
                docs.push(cursor.docid());
                scores.push(score);
                cursor.next();
            }
            let blocks = match partition {
                BlockPartition::Fixed(size) => fixed_partition(&docs, &scores, size),
                BlockPartition::VariableLambda(lambda) => {
                    variable_partition(&docs, &scores, lambda)
                }
            };
            Ok((max_score, blocks))
        };

        #[cfg(feature = "parallel")]
        let per_term: Vec<(f32, Vec<(u32, f32)>)> = (0..num_terms as u32)
            .into_par_iter()
            .map(score_term)
            .collect::<Result<_>>()?;
        #[cfg(not(feature = "parallel"))]
        let per_term: Vec<(f32, Vec<(u32, f32)>)> = (0..num_terms as u32)
            .map(score_term)
            .collect::<Result<_>>()?;
        drop(scorer);

        let mut wdata = skeleton;
        let mut block_last_docs = Vec::new();
        let mut block_max_scores = Vec::new();
        for (meta, (max_score, blocks)) in wdata.terms.iter_mut().zip(per_term) {
            meta.max_score = max_score;
            meta.blocks_start = block_last_docs.len();
            meta.block_count = blocks.len();
            for (last_doc, score) in blocks {
                block_last_docs.push(last_doc);
                block_max_scores.push(score);
            }
        }
        wdata.block_last_docs = block_last_docs;
        wdata.block_max_scores = block_max_scores;

        if let Some(bits) = quantize_bits {
            let global_max = wdata.global_max_score();
            let quantizer = LinearQuantizer::new(global_max, bits)?;
            for meta in &mut wdata.terms {
                meta.max_score = quantizer.quantize(meta.max_score)? as f32;
            }
            for score in &mut wdata.block_max_scores {
                *score = quantizer.quantize(*score)? as f32;
            }
            wdata.quantizer_bits = Some(bits);
            wdata.quantizer_max = global_max;
        }
        Ok(wdata)
    }

    // ------------------------------------------------------------------
    // ACCESSORS
    // ------------------------------------------------------------------

    pub fn num_docs(&self) -> u32 {
        self.num_docs
    }

    pub fn avg_len(&self) -> f32 {
        self.avg_len
    }

    pub fn collection_len(&self) -> u64 {
        self.collection_len
    }

    /// Length of document `doc`.
    #[inline]
    pub fn doc_len(&self, doc: u32) -> u32 {
        self.doc_lens[doc as usize]
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn term_posting_count(&self, term_id: u32) -> u32 {
        self.terms[term_id as usize].posting_count
    }

    pub fn term_occurrence_count(&self, term_id: u32) -> u32 {
        self.terms[term_id as usize].occurrence_count
    }

    /// The term's maximum partial score across all its postings.
    pub fn max_term_weight(&self, term_id: u32) -> f32 {
        self.terms[term_id as usize].max_score
    }

    /// Largest per-term maximum in the table.
    pub fn global_max_score(&self) -> f32 {
        self.terms.iter().fold(0.0f32, |m, t| m.max(t.max_score))
    }

    /// Name of the scorer the bounds were computed with.
    pub fn scorer_name(&self) -> &str {
        &self.scorer_name
    }

    /// Quantiser parameters when the stored scores are quantised.
    pub fn quantizer(&self) -> Option<(f32, u8)> {
        self.quantizer_bits.map(|bits| (self.quantizer_max, bits))
    }

    /// Fail unless `name` matches the scorer recorded at build time.
    /// Mandatory before scoring against quantised bounds.
    pub fn verify_scorer(&self, name: &str) -> Result<()> {
        if self.scorer_name != name {
            return Err(Error::InvalidArgument(format!(
                "wand data was built with scorer '{}', queried with '{}'",
                self.scorer_name, name
            )));
        }
        Ok(())
    }

    /// Block-bound cursor over one term.
    pub fn cursor(&self, term_id: u32) -> Result<WandCursor<'_>> {
        let i = term_id as usize;
        if i >= self.terms.len() {
            return Err(Error::OutOfRange(format!(
                "term {} outside wand table of {} terms",
                term_id,
                self.terms.len()
            )));
        }
        let meta = &self.terms[i];
        let range = meta.blocks_start..meta.blocks_start + meta.block_count;
        Ok(WandCursor {
            last_docs: &self.block_last_docs[range.clone()],
            scores: &self.block_max_scores[range],
            universe: self.num_docs,
            pos: 0,
        })
    }

    // ------------------------------------------------------------------
    // PERSISTENCE
    // ------------------------------------------------------------------

    /// Serialise to `path`; byte-exact with [`WandData::open`].
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let name = self.scorer_name.as_bytes();
        let mut out = Vec::new();
        out.extend_from_slice(&WAND_MAGIC);
        out.push(WAND_VERSION);
        out.push(name.len() as u8);
        out.extend_from_slice(name);
        out.push(self.quantizer_bits.unwrap_or(0));
        out.extend_from_slice(&self.quantizer_max.to_bits().to_le_bytes());
        match self.partition {
            BlockPartition::Fixed(size) => {
                out.push(0);
                out.extend_from_slice(&(size as u32).to_le_bytes());
            }
            BlockPartition::VariableLambda(lambda) => {
                out.push(1);
                out.extend_from_slice(&lambda.to_bits().to_le_bytes());
            }
        }
        out.extend_from_slice(&self.num_docs.to_le_bytes());
        out.extend_from_slice(&self.avg_len.to_bits().to_le_bytes());
        out.extend_from_slice(&self.collection_len.to_le_bytes());
        out.extend_from_slice(&(self.terms.len() as u32).to_le_bytes());
        out.extend_from_slice(&(self.block_last_docs.len() as u64).to_le_bytes());

        for &len in &self.doc_lens {
            out.extend_from_slice(&len.to_le_bytes());
        }
        for meta in &self.terms {
            out.extend_from_slice(&meta.posting_count.to_le_bytes());
            out.extend_from_slice(&meta.occurrence_count.to_le_bytes());
            out.extend_from_slice(&(meta.block_count as u32).to_le_bytes());
            self.write_score(meta.max_score, &mut out);
        }
        for &doc in &self.block_last_docs {
            out.extend_from_slice(&doc.to_le_bytes());
        }
        for &score in &self.block_max_scores {
            self.write_score(score, &mut out);
        }
        append_footer(&mut out, WAND_FOOTER_MAGIC);
        fs::write(path, out)?;
        Ok(())
    }

    fn write_score(&self, score: f32, out: &mut Vec<u8>) {
        match self.quantizer_bits {
            None => out.extend_from_slice(&score.to_bits().to_le_bytes()),
            Some(8) => out.push(score as u8),
            Some(16) => out.extend_from_slice(&(score as u16).to_le_bytes()),
            Some(bits) => unreachable!("unsupported quantiser width {}", bits),
        }
    }

    /// Load WAND data written by [`WandData::write_to_file`].
    pub fn open(path: &Path) -> Result<Self> {
        let source = MemorySource::open(path)?;
        let body = check_footer(source.as_slice(), WAND_FOOTER_MAGIC)?;
        if body.len() < 6 || body[..4] != WAND_MAGIC {
            return Err(Error::CorruptIndex("bad wand magic".into()));
        }
        if body[4] != WAND_VERSION {
            return Err(Error::CorruptIndex(format!(
                "unsupported wand version {}",
                body[4]
            )));
        }
        let name_len = body[5] as usize;
        let mut pos = 6;
        if body.len() < pos + name_len + 10 + 28 {
            return Err(Error::CorruptIndex("wand header truncated".into()));
        }
        let scorer_name = std::str::from_utf8(&body[pos..pos + name_len])
            .map_err(|_| Error::CorruptIndex("scorer name is not utf-8".into()))?
            .to_string();
        pos += name_len;

        let quantizer_bits = match body[pos] {
            0 => None,
            bits @ (8 | 16) => Some(bits),
            bits => {
                return Err(Error::CorruptIndex(format!(
                    "unsupported quantiser width {}",
                    bits
                )))
            }
        };
        let quantizer_max = read_f32_le(&body[pos + 1..]);
        let partition = match body[pos + 5] {
            0 => BlockPartition::Fixed(read_u32_le(&body[pos + 6..]) as usize),
            1 => BlockPartition::VariableLambda(read_f32_le(&body[pos + 6..])),
            tag => {
                return Err(Error::CorruptIndex(format!(
                    "unknown partition tag {}",
                    tag
                )))
            }
        };
        pos += 10;
        let num_docs = read_u32_le(&body[pos..]);
        let avg_len = read_f32_le(&body[pos + 4..]);
        let collection_len = read_u64_le(&body[pos + 8..]);
        let term_count = read_u32_le(&body[pos + 16..]) as usize;
        let total_blocks = read_u64_le(&body[pos + 20..]) as usize;
        pos += 28;

        let score_width = match quantizer_bits {
            None => 4,
            Some(8) => 1,
            Some(16) => 2,
            Some(_) => unreachable!(),
        };
        let needed = pos
            + 4 * num_docs as usize
            + term_count * (12 + score_width)
            + total_blocks * (4 + score_width);
        if body.len() != needed {
            return Err(Error::CorruptIndex(format!(
                "wand sections disagree with file size ({} vs {})",
                body.len(),
                needed
            )));
        }

        let read_score = |bytes: &[u8]| -> f32 {
            match quantizer_bits {
                None => read_f32_le(bytes),
                Some(8) => f32::from(bytes[0]),
                Some(16) => f32::from(read_u16_le(bytes)),
                Some(_) => unreachable!(),
            }
        };

        let mut doc_lens = Vec::with_capacity(num_docs as usize);
        for _ in 0..num_docs {
            doc_lens.push(read_u32_le(&body[pos..]));
            pos += 4;
        }
        let mut terms = Vec::with_capacity(term_count);
        let mut blocks_start = 0usize;
        for _ in 0..term_count {
            let posting_count = read_u32_le(&body[pos..]);
            let occurrence_count = read_u32_le(&body[pos + 4..]);
            let block_count = read_u32_le(&body[pos + 8..]) as usize;
            let max_score = read_score(&body[pos + 12..]);
            pos += 12 + score_width;
            terms.push(TermMeta {
                posting_count,
                occurrence_count,
                max_score,
                blocks_start,
                block_count,
            });
            blocks_start += block_count;
        }
        if blocks_start != total_blocks {
            return Err(Error::CorruptIndex(format!(
                "term block counts sum to {}, header says {}",
                blocks_start, total_blocks
            )));
        }
        let mut block_last_docs = Vec::with_capacity(total_blocks);
        for _ in 0..total_blocks {
            block_last_docs.push(read_u32_le(&body[pos..]));
            pos += 4;
        }
        let mut block_max_scores = Vec::with_capacity(total_blocks);
        for _ in 0..total_blocks {
            block_max_scores.push(read_score(&body[pos..]));
            pos += score_width;
        }

        Ok(WandData {
            scorer_name,
            quantizer_bits,
            quantizer_max,
            partition,
            num_docs,
            avg_len,
            collection_len,
            doc_lens,
            terms,
            block_last_docs,
            block_max_scores,
        })
    }
}

// ============================================================================
// SCORE-BLOCK PARTITIONS
// ============================================================================

fn fixed_partition(docs: &[u32], scores: &[f32], size: usize) -> Vec<(u32, f32)> {
    docs.chunks(size)
        .zip(scores.chunks(size))
        .map(|(d, s)| {
            let max = s.iter().fold(0.0f32, |m, &v| m.max(v));
            (*d.last().unwrap(), max)
        })
        .collect()
}

/// Minimise Σ(block_cost + λ) where block_cost = Σ(block_max − score), by a
/// windowed dynamic program over block end positions.
fn variable_partition(docs: &[u32], scores: &[f32], lambda: f32) -> Vec<(u32, f32)> {
    let n = scores.len();
    if n == 0 {
        return Vec::new();
    }
    let mut dp = vec![f32::INFINITY; n + 1];
    let mut back = vec![0usize; n + 1];
    dp[0] = 0.0;
    for i in 1..=n {
        let lo = i.saturating_sub(PARTITION_WINDOW);
        let mut max = 0.0f32;
        let mut sum = 0.0f32;
        let mut j = i;
        while j > lo {
            j -= 1;
            sum += scores[j];
            max = max.max(scores[j]);
            let cost = max * (i - j) as f32 - sum;
            let cand = dp[j] + cost + lambda;
            if cand < dp[i] {
                dp[i] = cand;
                back[i] = j;
            }
        }
    }

    let mut ends = Vec::new();
    let mut i = n;
    while i > 0 {
        ends.push(i);
        i = back[i];
    }
    ends.reverse();

    let mut blocks = Vec::with_capacity(ends.len());
    let mut prev = 0usize;
    for end in ends {
        let max = scores[prev..end].iter().fold(0.0f32, |m, &v| m.max(v));
        blocks.push((docs[end - 1], max));
        prev = end;
    }
    blocks
}

// ============================================================================
// CURSOR
// ============================================================================

/// Cursor over one term's score blocks.
///
/// `docid()` is the current block's last docid, `score()` its max partial
/// score. Past the final block the cursor reports the universe and a zero
/// bound: no documents remain, so nothing can score.
pub struct WandCursor<'w> {
    last_docs: &'w [u32],
    scores: &'w [f32],
    universe: u32,
    pos: usize,
}

impl WandCursor<'_> {
    /// Last docid covered by the current block, or the universe when
    /// exhausted.
    #[inline]
    pub fn docid(&self) -> u32 {
        if self.pos < self.last_docs.len() {
            self.last_docs[self.pos]
        } else {
            self.universe
        }
    }

    /// Max partial score of the current block (0 when exhausted).
    #[inline]
    pub fn score(&self) -> f32 {
        if self.pos < self.scores.len() {
            self.scores[self.pos]
        } else {
            0.0
        }
    }

    /// Advance to the first block whose last docid ≥ `target`.
    #[inline]
    pub fn next_geq(&mut self, target: u32) {
        while self.pos < self.last_docs.len() && self.last_docs[self.pos] < target {
            self.pos += 1;
        }
    }
}

// ============================================================================
// QUANTISED INDEX CONSTRUCTION
// ============================================================================

/// Rewrite `index` with each frequency slot replaced by the quantised
/// partial score, for use with the `quantized` scorer.
///
/// `wdata` must hold unquantised bounds from the same scorer `params` name;
/// its global maximum fixes the quantiser range.
pub fn build_quantized_index(
    index: &InvertedIndex,
    wdata: &WandData,
    params: &ScorerParams,
    bits: u8,
) -> Result<InvertedIndex> {
    if wdata.quantizer().is_some() {
        return Err(Error::InvalidArgument(
            "quantised index must be built from unquantised wand data".into(),
        ));
    }
    wdata.verify_scorer(&params.name)?;

    let scorer = from_params(params, wdata)?;
    let quantizer = LinearQuantizer::new(wdata.global_max_score(), bits)?;
    let quantizing = QuantizingScorer::new(scorer.as_ref(), quantizer);

    let mut builder = InvertedIndexBuilder::new(index.codec_name(), index.num_docs())?;
    for term in 0..index.num_terms() as u32 {
        let term_scorer = quantizing.term_scorer(term);
        let mut cursor = index.cursor(term)?;
        let mut docs = Vec::with_capacity(cursor.len());
        let mut quantized = Vec::with_capacity(cursor.len());
        while cursor.docid() < index.num_docs() {
            docs.push(cursor.docid());
            quantized.push(term_scorer(cursor.docid(), cursor.freq())?);
            cursor.next();
        }
        builder.add_posting_list(&docs, &quantized)?;
    }
    builder.build()
}

// ============================================================================
// TEST SUPPORT
// ============================================================================

#[cfg(test)]
impl WandData {
    /// Bare corpus statistics for scorer unit tests: document lengths plus
    /// per-term (posting count, occurrence count); no blocks.
    pub(crate) fn stats_for_tests(doc_lens: Vec<u32>, term_counts: Vec<(u32, u32)>) -> WandData {
        let collection_len: u64 = doc_lens.iter().map(|&l| u64::from(l)).sum();
        let avg_len = collection_len as f32 / doc_lens.len().max(1) as f32;
        WandData {
            scorer_name: "bm25".to_string(),
            quantizer_bits: None,
            quantizer_max: 0.0,
            partition: BlockPartition::default(),
            num_docs: doc_lens.len() as u32,
            avg_len,
            collection_len,
            doc_lens,
            terms: term_counts
                .into_iter()
                .map(|(posting_count, occurrence_count)| TermMeta {
                    posting_count,
                    occurrence_count,
                    max_score: 0.0,
                    blocks_start: 0,
                    block_count: 0,
                })
                .collect(),
            block_last_docs: Vec::new(),
            block_max_scores: Vec::new(),
        }
    }
}
