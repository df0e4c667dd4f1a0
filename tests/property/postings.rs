//! Posting-list invariants: full walks, `next_geq` landings, the exhaustion
//! sentinel, and block-reorder stability.

use proptest::prelude::*;
use talpa::postings::{write_blocks, write_posting_list, BlockPostingCursor};
use talpa::{get_block_codec, BlockData};

use crate::common::{random_posting_data, Rng};

fn posting_list() -> impl Strategy<Value = (Vec<u32>, Vec<u32>, u32)> {
    // Densities from packed to sparse over universes of assorted sizes.
    (1u32..5000, 16u32..=4096, any::<u32>()).prop_map(|(extra, n, seed)| {
        let universe = n * 2 + extra;
        let mut rng = Rng::new(seed);
        let (docs, freqs) = random_posting_data(n as usize, universe, &mut rng);
        (docs, freqs, universe)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_walk_yields_every_posting((docs, freqs, universe) in posting_list()) {
        let codec = get_block_codec("block_simdbp").unwrap();
        let mut data = Vec::new();
        write_posting_list(codec.as_ref(), &mut data, &docs, &freqs).unwrap();

        let mut cursor = BlockPostingCursor::new(codec.as_ref(), &data, universe);
        prop_assert_eq!(cursor.len(), docs.len());
        for i in 0..docs.len() {
            prop_assert_eq!(cursor.docid(), docs[i]);
            prop_assert_eq!(cursor.freq(), freqs[i]);
            cursor.next();
        }
        prop_assert_eq!(cursor.docid(), universe);
    }

    #[test]
    fn prop_next_geq_lands_on_position((docs, freqs, universe) in posting_list()) {
        let codec = get_block_codec("block_optpfor").unwrap();
        let mut data = Vec::new();
        write_posting_list(codec.as_ref(), &mut data, &docs, &freqs).unwrap();

        // Fresh cursor per probe, exactly like the reference walk.
        let step = (docs.len() / 37).max(1);
        for i in (0..docs.len()).step_by(step) {
            let mut cursor = BlockPostingCursor::new(codec.as_ref(), &data, universe);
            cursor.next_geq(docs[i]);
            prop_assert_eq!(cursor.position(), i);
            prop_assert_eq!(cursor.docid(), docs[i]);
            prop_assert_eq!(cursor.freq(), freqs[i]);
        }

        let mut cursor = BlockPostingCursor::new(codec.as_ref(), &data, universe);
        cursor.next_geq(docs.last().unwrap() + 1);
        prop_assert_eq!(cursor.docid(), universe);

        let mut cursor = BlockPostingCursor::new(codec.as_ref(), &data, universe);
        cursor.next_geq(universe);
        prop_assert_eq!(cursor.docid(), universe);
    }

    #[test]
    fn prop_block_reorder_reads_identically(
        (docs, freqs, universe) in posting_list(),
        seed in any::<u32>(),
    ) {
        let codec = get_block_codec("block_maskedvbyte").unwrap();
        let mut data = Vec::new();
        write_posting_list(codec.as_ref(), &mut data, &docs, &freqs).unwrap();

        let cursor = BlockPostingCursor::new(codec.as_ref(), &data, universe);
        let mut blocks: Vec<BlockData> = cursor.blocks().collect();

        // Shuffle every block except block 0.
        let mut rng = Rng::new(seed);
        for i in (2..blocks.len()).rev() {
            let j = 1 + rng.below((i - 1) as u32 + 1) as usize;
            blocks.swap(i, j);
        }

        let mut reordered = Vec::new();
        write_blocks(&mut reordered, docs.len() as u32, &blocks).unwrap();

        let mut cursor = BlockPostingCursor::new(codec.as_ref(), &reordered, universe);
        for i in 0..docs.len() {
            prop_assert_eq!(cursor.docid(), docs[i]);
            prop_assert_eq!(cursor.freq(), freqs[i]);
            cursor.next();
        }
        prop_assert_eq!(cursor.docid(), universe);
    }
}
