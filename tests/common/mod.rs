//! Shared test fixtures: deterministic random posting data and a small
//! fixed collection every query-equivalence test runs against.

#![allow(dead_code)]

use talpa::{
    BlockPartition, InvertedIndex, InvertedIndexBuilder, Query, ScorerParams, TermPolicy, WandData,
};

/// Tiny deterministic generator (xorshift32) so failures reproduce without
/// a seed dance.
pub struct Rng(u32);

impl Rng {
    pub fn new(seed: u32) -> Self {
        Rng(seed.max(1))
    }

    pub fn next(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    pub fn below(&mut self, bound: u32) -> u32 {
        self.next() % bound
    }
}

/// Random strictly-increasing docids of roughly `n` entries over
/// `[0, universe)`, with frequencies in `[1, 256)`.
pub fn random_posting_data(
    n: usize,
    universe: u32,
    rng: &mut Rng,
) -> (Vec<u32>, Vec<u32>) {
    assert!(n as u32 <= universe);
    // Average gap keeps the list inside the universe with room to spare.
    let max_gap = (universe / n as u32).max(1) * 2;
    let mut docs = Vec::with_capacity(n);
    let mut doc = rng.below(max_gap);
    while docs.len() < n && doc < universe {
        docs.push(doc);
        doc += 1 + rng.below(max_gap);
    }
    let freqs: Vec<u32> = docs.iter().map(|_| 1 + rng.below(255)).collect();
    (docs, freqs)
}

/// A seeded collection with lists of assorted densities, its WAND data,
/// and a canonical query set; the shared bed for every processor
/// equivalence test.
pub struct TestCollection {
    pub index: InvertedIndex,
    pub wdata: WandData,
    pub queries: Vec<Query>,
}

impl TestCollection {
    pub fn build(codec: &str, partition: BlockPartition) -> TestCollection {
        let universe = 2000u32;
        let mut rng = Rng::new(0x5EED);
        let mut builder = InvertedIndexBuilder::new(codec, universe).unwrap();

        // Densities from a third of the universe down to a handful.
        let sizes = [600, 400, 300, 200, 150, 100, 64, 33, 10, 3];
        for &n in &sizes {
            let (docs, freqs) = random_posting_data(n, universe, &mut rng);
            builder.add_posting_list(&docs, &freqs).unwrap();
        }
        let index = builder.build().unwrap();

        let doc_lens: Vec<u32> = (0..universe).map(|_| 20 + rng.below(200)).collect();
        let wdata = WandData::build(
            &index,
            doc_lens,
            &ScorerParams::default(),
            partition,
            None,
        )
        .unwrap();

        let queries = [
            vec![0u32],
            vec![9],
            vec![0, 1],
            vec![2, 7],
            vec![0, 1, 2],
            vec![3, 4, 5],
            vec![6, 7, 8, 9],
            vec![0, 5, 9],
            vec![1, 1, 2],
            vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
        ]
        .iter()
        .map(|ids| Query::from_ids(None, ids, TermPolicy::DEFAULT))
        .collect();

        TestCollection { index, wdata, queries }
    }
}

/// The fixed three-list index of the end-to-end scenarios: `P0={0,2,4,6}`,
/// `P1={1,2,3,4}`, `P2={2,4,10}`, all frequencies 1, universe 100.
pub fn scenario_index(codec: &str) -> (InvertedIndex, WandData) {
    let mut builder = InvertedIndexBuilder::new(codec, 100).unwrap();
    builder.add_posting_list(&[0, 2, 4, 6], &[1, 1, 1, 1]).unwrap();
    builder.add_posting_list(&[1, 2, 3, 4], &[1, 1, 1, 1]).unwrap();
    builder.add_posting_list(&[2, 4, 10], &[1, 1, 1]).unwrap();
    let index = builder.build().unwrap();
    let wdata = WandData::build(
        &index,
        vec![10; 100],
        &ScorerParams::default(),
        BlockPartition::Fixed(2),
        None,
    )
    .unwrap();
    (index, wdata)
}

/// Relative-tolerance comparison used by the equivalence properties.
pub fn close(a: f32, b: f32) -> bool {
    (a - b).abs() <= 0.1 * a.abs().max(b.abs()).max(1e-6)
}
