//! The fixed end-to-end scenarios, with literal inputs.

use talpa::query::algorithm::{BlockMaxWandQuery, RankedAndQuery, RankedOrQuery, WandQuery};
use talpa::scoring::from_params;
use talpa::{
    make_block_max_scored_cursors, make_max_scored_cursors, make_scored_cursors, Error,
    InvertedIndexBuilder, LinearQuantizer, Query, ScorerParams, TermPolicy, BLOCK_SIZE,
};

use crate::common::scenario_index;

/// S1: ranked AND of three terms lands on {2, 4} with summed BM25 scores.
#[test]
fn test_s1_ranked_and_of_three_terms() {
    let (index, wdata) = scenario_index("block_varint");
    let scorer = from_params(&ScorerParams::default(), &wdata).unwrap();
    let query = Query::from_ids(None, &[0, 1, 2], TermPolicy::DEFAULT);

    let mut cursors = make_scored_cursors(&index, scorer.as_ref(), &query).unwrap();
    let mut processor = RankedAndQuery::new(10);
    let count = processor.run(&mut cursors, index.num_docs());
    assert_eq!(count, 2);

    let mut docids: Vec<u32> = processor.topk().iter().map(|e| e.1).collect();
    docids.sort_unstable();
    assert_eq!(docids, vec![2, 4]);

    // Each score is the sum of the three per-term BM25 scores there.
    for &(score, docid) in processor.topk() {
        let mut expected = 0.0f32;
        for term in 0..3u32 {
            let s = scorer.term_scorer(term);
            expected += s(docid, 1);
        }
        assert!((score - expected).abs() < 1e-5);
    }
}

/// S2: ranked OR yields all docids of the union; docid 2's score is the sum
/// of all three term scorers at (2, 1).
#[test]
fn test_s2_ranked_or_of_three_terms() {
    let (index, wdata) = scenario_index("block_varint");
    let scorer = from_params(&ScorerParams::default(), &wdata).unwrap();
    let query = Query::from_ids(None, &[0, 1, 2], TermPolicy::DEFAULT);

    let mut cursors = make_scored_cursors(&index, scorer.as_ref(), &query).unwrap();
    let mut processor = RankedOrQuery::new(10);
    let count = processor.run(&mut cursors, index.num_docs());
    // Union of {0,2,4,6}, {1,2,3,4}, {2,4,10}.
    assert_eq!(count, 7);

    let doc2 = processor
        .topk()
        .iter()
        .find(|e| e.1 == 2)
        .expect("docid 2 must be in the union");
    let expected: f32 = (0..3u32).map(|t| scorer.term_scorer(t)(2, 1)).sum();
    assert!((doc2.0 - expected).abs() < 1e-5);

    // Docs 2 and 4 match all three terms; nothing else matches more than
    // one, so the top two are exactly {2, 4}.
    let mut top2: Vec<u32> = processor.topk()[..2].iter().map(|e| e.1).collect();
    top2.sort_unstable();
    assert_eq!(top2, vec![2, 4]);
}

/// S3: a single-term query returns the four postings in decreasing score
/// order, docid-ascending on ties.
#[test]
fn test_s3_single_term() {
    let mut builder = InvertedIndexBuilder::new("block_varint", 100).unwrap();
    builder.add_posting_list(&[0, 2, 4, 6], &[1, 1, 1, 1]).unwrap();
    let index = builder.build().unwrap();
    let wdata = talpa::WandData::build(
        &index,
        vec![10; 100],
        &ScorerParams::default(),
        talpa::BlockPartition::Fixed(2),
        None,
    )
    .unwrap();
    let scorer = from_params(&ScorerParams::default(), &wdata).unwrap();
    let query = Query::from_ids(None, &[0], TermPolicy::DEFAULT);

    let mut cursors = make_scored_cursors(&index, scorer.as_ref(), &query).unwrap();
    let mut processor = RankedOrQuery::new(10);
    let count = processor.run(&mut cursors, index.num_docs());
    assert_eq!(count, 4);

    // Uniform lengths and frequencies: all scores tie, docids ascend.
    let docids: Vec<u32> = processor.topk().iter().map(|e| e.1).collect();
    assert_eq!(docids, vec![0, 2, 4, 6]);
    for window in processor.topk().windows(2) {
        assert!(window[0].0 >= window[1].0);
    }
}

/// S4: WAND and BlockMax-WAND agree on the canonical query set.
#[test]
fn test_s4_wand_vs_block_max_wand() {
    let collection = crate::common::TestCollection::build(
        "block_simdbp",
        talpa::BlockPartition::Fixed(8),
    );
    let scorer = from_params(&ScorerParams::default(), &collection.wdata).unwrap();

    for query in &collection.queries {
        let mut wand = WandQuery::new(10);
        let mut cursors = make_max_scored_cursors(
            &collection.index,
            &collection.wdata,
            scorer.as_ref(),
            query,
        )
        .unwrap();
        wand.run(&mut cursors, collection.index.num_docs());

        let mut bmw = BlockMaxWandQuery::new(10);
        let mut cursors = make_block_max_scored_cursors(
            &collection.index,
            &collection.wdata,
            scorer.as_ref(),
            query,
        )
        .unwrap();
        bmw.run(&mut cursors, collection.index.num_docs());

        assert_eq!(wand.topk().len(), bmw.topk().len());
        if !wand.topk().is_empty() {
            assert_eq!(wand.topk()[0].1, bmw.topk()[0].1);
        }
        for (a, b) in wand.topk().iter().zip(bmw.topk()) {
            assert!(crate::common::close(a.0, b.0), "{} vs {}", a.0, b.0);
        }
    }
}

/// S5: a list of BLOCK_SIZE + 1 postings forces a second block of size 1.
#[test]
fn test_s5_codec_boundary() {
    let n = BLOCK_SIZE + 1;
    let docs: Vec<u32> = (0..n as u32).map(|i| i * 2).collect();
    let freqs: Vec<u32> = vec![1; n];
    let universe = docs.last().unwrap() + 5;

    for codec_name in talpa::block_codec_names() {
        let codec = talpa::get_block_codec(codec_name).unwrap();
        let mut data = Vec::new();
        talpa::write_posting_list(codec.as_ref(), &mut data, &docs, &freqs).unwrap();

        let mut cursor = talpa::BlockPostingCursor::new(codec.as_ref(), &data, universe);
        assert_eq!(cursor.num_blocks(), 2);
        for i in 0..n {
            assert_eq!(cursor.docid(), docs[i], "{}", codec_name);
            cursor.next();
        }
        assert_eq!(cursor.docid(), universe);

        let mut cursor = talpa::BlockPostingCursor::new(codec.as_ref(), &data, universe);
        cursor.next_geq(docs[BLOCK_SIZE]);
        assert_eq!(cursor.docid(), docs[BLOCK_SIZE]);
        assert_eq!(cursor.position(), BLOCK_SIZE);

        let mut cursor = talpa::BlockPostingCursor::new(codec.as_ref(), &data, universe);
        cursor.next_geq(docs[BLOCK_SIZE] + 1);
        assert_eq!(cursor.docid(), universe);
    }
}

/// S6: the quantiser's fixed values and failure case.
#[test]
fn test_s6_quantizer() {
    let quantizer = LinearQuantizer::new(10.0, 8).unwrap();
    assert_eq!(quantizer.quantize(0.0).unwrap(), 1);
    assert_eq!(quantizer.quantize(10.0).unwrap(), 255);
    let mid = quantizer.quantize(5.0).unwrap();
    assert!((127..=129).contains(&mid));
    assert!(matches!(
        quantizer.quantize(10.5),
        Err(Error::InvalidArgument(_))
    ));
}
