// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Talpa CLI: evaluate queries and inspect index files.
//!
//! ```bash
//! # Evaluate queries with BlockMax-WAND, BM25, top 10
//! talpa query --index coll.tidx --wand coll.twnd --queries topics.txt
//!
//! # Inspect a file header
//! talpa inspect coll.tidx
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use talpa::query::algorithm::{
    BlockMaxMaxScoreQuery, BlockMaxRankedAndQuery, BlockMaxWandQuery, MaxScoreQuery,
    RankedAndQuery, RankedOrQuery, RankedOrTaatQuery, WandQuery,
};
use talpa::{
    make_block_max_scored_cursors, make_max_scored_cursors, make_scored_cursors, write_trec_run,
    InvertedIndex, LazyAccumulator, Query, Result, ScorerParams, SimpleAccumulator, TermPolicy,
    TopKQueue, WandData,
};

mod cli;
use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Query {
            index,
            wand,
            queries,
            algorithm,
            scorer,
            k,
            run_id,
            k1,
            b,
            c,
            mu,
        } => {
            let mut params = ScorerParams::new(&scorer);
            if let Some(k1) = k1 {
                params.k1 = k1;
            }
            if let Some(b) = b {
                params.b = b;
            }
            if let Some(c) = c {
                params.c = c;
            }
            if let Some(mu) = mu {
                params.mu = mu;
            }
            run_queries(&index, &wand, &queries, &algorithm, &params, k, &run_id)
        }
        Commands::Inspect { file } => inspect(&file),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn read_query_lines(path: &str) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let reader: Box<dyn BufRead> = if path == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        Box::new(BufReader::new(File::open(path).map_err(talpa::Error::Io)?))
    };
    for line in reader.lines() {
        let line = line.map_err(talpa::Error::Io)?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

#[allow(clippy::too_many_arguments)]
fn run_queries(
    index_path: &str,
    wand_path: &str,
    queries_path: &str,
    algorithm: &str,
    params: &ScorerParams,
    default_k: usize,
    run_id: &str,
) -> Result<()> {
    let index = InvertedIndex::open(Path::new(index_path))?;
    let wdata = WandData::open(Path::new(wand_path))?;
    if wdata.quantizer().is_some() {
        wdata.verify_scorer(&params.name)?;
    }
    let scorer = talpa::scoring::from_params(params, &wdata)?;
    let lines = read_query_lines(queries_path)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (line_no, line) in lines.iter().enumerate() {
        let query = Query::parse(line, TermPolicy::DEFAULT)?;
        let qid = query
            .id()
            .map(str::to_string)
            .unwrap_or_else(|| line_no.to_string());
        let k = query.k().unwrap_or(default_k);
        let queue = match query.threshold() {
            Some(t) => TopKQueue::with_threshold(k, t),
            None => TopKQueue::new(k),
        };

        let results = evaluate(&index, &wdata, scorer.as_ref(), &query, algorithm, queue)?;
        write_trec_run(&mut out, &qid, &results, run_id).map_err(talpa::Error::Io)?;
    }
    out.flush().map_err(talpa::Error::Io)?;
    Ok(())
}

fn evaluate(
    index: &InvertedIndex,
    wdata: &WandData,
    scorer: &dyn talpa::IndexScorer,
    query: &Query,
    algorithm: &str,
    queue: TopKQueue,
) -> Result<Vec<(f32, u32)>> {
    let max_docid = index.num_docs();
    match algorithm {
        "ranked_or" => {
            let mut cursors = make_scored_cursors(index, scorer, query)?;
            let mut processor = RankedOrQuery::with_queue(queue);
            processor.run(&mut cursors, max_docid);
            Ok(processor.topk().to_vec())
        }
        "ranked_and" => {
            let mut cursors = make_scored_cursors(index, scorer, query)?;
            let mut processor = RankedAndQuery::with_queue(queue);
            processor.run(&mut cursors, max_docid);
            Ok(processor.topk().to_vec())
        }
        "wand" => {
            let mut cursors = make_max_scored_cursors(index, wdata, scorer, query)?;
            let mut processor = WandQuery::with_queue(queue);
            processor.run(&mut cursors, max_docid);
            Ok(processor.topk().to_vec())
        }
        "maxscore" => {
            let mut cursors = make_max_scored_cursors(index, wdata, scorer, query)?;
            let mut processor = MaxScoreQuery::with_queue(queue);
            processor.run(&mut cursors, max_docid);
            Ok(processor.topk().to_vec())
        }
        "block_max_wand" => {
            let mut cursors = make_block_max_scored_cursors(index, wdata, scorer, query)?;
            let mut processor = BlockMaxWandQuery::with_queue(queue);
            processor.run(&mut cursors, max_docid);
            Ok(processor.topk().to_vec())
        }
        "block_max_maxscore" => {
            let mut cursors = make_block_max_scored_cursors(index, wdata, scorer, query)?;
            let mut processor = BlockMaxMaxScoreQuery::with_queue(queue);
            processor.run(&mut cursors, max_docid);
            Ok(processor.topk().to_vec())
        }
        "block_max_ranked_and" => {
            let mut cursors = make_block_max_scored_cursors(index, wdata, scorer, query)?;
            let mut processor = BlockMaxRankedAndQuery::with_queue(queue);
            processor.run(&mut cursors, max_docid);
            Ok(processor.topk().to_vec())
        }
        "taat_or" => {
            let mut cursors = make_scored_cursors(index, scorer, query)?;
            let mut accumulator = SimpleAccumulator::new(max_docid as usize);
            let mut processor = RankedOrTaatQuery::with_queue(queue);
            processor.run(&mut cursors, max_docid, &mut accumulator);
            Ok(processor.topk().to_vec())
        }
        "taat_or_lazy" => {
            let mut cursors = make_scored_cursors(index, scorer, query)?;
            let mut accumulator = LazyAccumulator::<8>::new(max_docid as usize);
            let mut processor = RankedOrTaatQuery::with_queue(queue);
            processor.run(&mut cursors, max_docid, &mut accumulator);
            Ok(processor.topk().to_vec())
        }
        other => Err(talpa::Error::InvalidArgument(format!(
            "unknown algorithm: {}",
            other
        ))),
    }
}

fn inspect(path: &str) -> Result<()> {
    match InvertedIndex::open(Path::new(path)) {
        Ok(index) => {
            println!("inverted index: {}", path);
            println!("  codec:      {}", index.codec_name());
            println!("  terms:      {}", index.num_terms());
            println!("  documents:  {}", index.num_docs());
            return Ok(());
        }
        Err(talpa::Error::Io(e)) => return Err(talpa::Error::Io(e)),
        Err(_) => {}
    }

    let wdata = WandData::open(Path::new(path))?;
    println!("wand data: {}", path);
    println!("  scorer:          {}", wdata.scorer_name());
    println!("  terms:           {}", wdata.num_terms());
    println!("  documents:       {}", wdata.num_docs());
    println!("  avg doc length:  {:.2}", wdata.avg_len());
    println!("  collection size: {}", wdata.collection_len());
    match wdata.quantizer() {
        Some((max, bits)) => println!("  quantiser:       {} bits, max {}", bits, max),
        None => println!("  quantiser:       none"),
    }
    Ok(())
}
