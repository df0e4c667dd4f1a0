// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Unranked conjunction: count the documents containing every term.
//!
//! Pivot on the shortest list and `next_geq` the others to each candidate;
//! the first mismatch becomes the new candidate. With `with_freqs` every
//! match also reads the frequencies through `black_box`, so benchmarks of
//! the decode path cannot be optimised into a pure docid walk.

use std::hint::black_box;

use crate::postings::BlockPostingCursor;

/// Count conjunctive matches; cursors are reordered by list length.
pub fn and_query(cursors: &mut [BlockPostingCursor], max_docid: u32, with_freqs: bool) -> u64 {
    if cursors.is_empty() {
        return 0;
    }
    cursors.sort_by_key(|c| c.len());

    let mut results = 0u64;
    let mut candidate = cursors[0].docid();
    let mut i = 1;
    while candidate < max_docid {
        while i < cursors.len() {
            cursors[i].next_geq(candidate);
            if cursors[i].docid() != candidate {
                candidate = cursors[i].docid();
                i = 0;
                break;
            }
            i += 1;
        }
        if i == cursors.len() {
            results += 1;
            if with_freqs {
                for cursor in cursors.iter_mut() {
                    black_box(cursor.freq());
                }
            }
            cursors[0].next();
            candidate = cursors[0].docid();
            i = 1;
        }
    }
    results
}
