// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Unranked disjunction: count the documents containing any term.

use std::hint::black_box;

use crate::postings::BlockPostingCursor;

/// Count disjunctive matches. With `with_freqs`, frequencies of every
/// matching cursor are decoded through `black_box`.
pub fn or_query(cursors: &mut [BlockPostingCursor], max_docid: u32, with_freqs: bool) -> u64 {
    if cursors.is_empty() {
        return 0;
    }

    let mut results = 0u64;
    let mut cur_doc = cursors.iter().map(|c| c.docid()).min().unwrap();
    while cur_doc < max_docid {
        results += 1;
        let mut next_doc = max_docid;
        for cursor in cursors.iter_mut() {
            if cursor.docid() == cur_doc {
                if with_freqs {
                    black_box(cursor.freq());
                }
                cursor.next();
            }
            if cursor.docid() < next_doc {
                next_doc = cursor.docid();
            }
        }
        cur_doc = next_doc;
    }
    results
}
