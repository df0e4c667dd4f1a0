//! Benchmarks the top-k processors against each other on a synthetic
//! collection: exhaustive OR as the baseline, then the pruned family.
//!
//! Run with: cargo bench --bench query_bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use talpa::query::algorithm::{
    BlockMaxMaxScoreQuery, BlockMaxWandQuery, MaxScoreQuery, RankedOrQuery, WandQuery,
};
use talpa::scoring::from_params;
use talpa::{
    make_block_max_scored_cursors, make_max_scored_cursors, make_scored_cursors, BlockPartition,
    InvertedIndex, InvertedIndexBuilder, Query, ScorerParams, TermPolicy, WandData,
};

const UNIVERSE: u32 = 100_000;

fn synthetic_collection() -> (InvertedIndex, WandData) {
    let mut builder = InvertedIndexBuilder::new("block_simdbp", UNIVERSE).unwrap();
    let mut state = 0x5EED_1234u32;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };

    // A frequent, a medium, and two rare terms.
    for &n in &[40_000u32, 8_000, 900, 120] {
        let max_gap = (UNIVERSE / n) * 2;
        let mut docs = Vec::with_capacity(n as usize);
        let mut doc = next() % max_gap;
        while docs.len() < n as usize && doc < UNIVERSE {
            docs.push(doc);
            doc += 1 + next() % max_gap;
        }
        let freqs: Vec<u32> = docs.iter().map(|_| 1 + next() % 16).collect();
        builder.add_posting_list(&docs, &freqs).unwrap();
    }
    let index = builder.build().unwrap();

    let doc_lens: Vec<u32> = (0..UNIVERSE).map(|_| 50 + next() % 400).collect();
    let wdata = WandData::build(
        &index,
        doc_lens,
        &ScorerParams::default(),
        BlockPartition::Fixed(64),
        None,
    )
    .unwrap();
    (index, wdata)
}

fn bench_processors(c: &mut Criterion) {
    let (index, wdata) = synthetic_collection();
    let scorer = from_params(&ScorerParams::default(), &wdata).unwrap();
    let query = Query::from_ids(None, &[0, 1, 2, 3], TermPolicy::DEFAULT);

    let mut group = c.benchmark_group("top10");

    group.bench_function(BenchmarkId::from_parameter("ranked_or"), |b| {
        b.iter(|| {
            let mut cursors = make_scored_cursors(&index, scorer.as_ref(), &query).unwrap();
            let mut processor = RankedOrQuery::new(10);
            processor.run(&mut cursors, index.num_docs())
        });
    });

    group.bench_function(BenchmarkId::from_parameter("wand"), |b| {
        b.iter(|| {
            let mut cursors =
                make_max_scored_cursors(&index, &wdata, scorer.as_ref(), &query).unwrap();
            let mut processor = WandQuery::new(10);
            processor.run(&mut cursors, index.num_docs())
        });
    });

    group.bench_function(BenchmarkId::from_parameter("maxscore"), |b| {
        b.iter(|| {
            let mut cursors =
                make_max_scored_cursors(&index, &wdata, scorer.as_ref(), &query).unwrap();
            let mut processor = MaxScoreQuery::new(10);
            processor.run(&mut cursors, index.num_docs())
        });
    });

    group.bench_function(BenchmarkId::from_parameter("block_max_wand"), |b| {
        b.iter(|| {
            let mut cursors =
                make_block_max_scored_cursors(&index, &wdata, scorer.as_ref(), &query).unwrap();
            let mut processor = BlockMaxWandQuery::new(10);
            processor.run(&mut cursors, index.num_docs())
        });
    });

    group.bench_function(BenchmarkId::from_parameter("block_max_maxscore"), |b| {
        b.iter(|| {
            let mut cursors =
                make_block_max_scored_cursors(&index, &wdata, scorer.as_ref(), &query).unwrap();
            let mut processor = BlockMaxMaxScoreQuery::new(10);
            processor.run(&mut cursors, index.num_docs())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_processors);
criterion_main!(benches);
