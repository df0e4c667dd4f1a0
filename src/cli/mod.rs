// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the talpa command-line interface.
//!
//! Two subcommands: `query` evaluates a query file against an index and
//! prints TREC run lines, `inspect` dumps the header of an index or
//! WAND-data file.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "talpa",
    about = "Block-compressed inverted-index search core",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate queries against an index, writing a TREC run to stdout
    Query {
        /// Path to the inverted index (.tidx)
        #[arg(short, long)]
        index: String,

        /// Path to the WAND data (.twnd)
        #[arg(short, long)]
        wand: String,

        /// Query file: one query per line, plain ("id:t1 t2 ...") or JSON;
        /// "-" reads stdin
        #[arg(short, long, default_value = "-")]
        queries: String,

        /// Processor: ranked_or, ranked_and, wand, maxscore,
        /// block_max_wand, block_max_maxscore, block_max_ranked_and,
        /// taat_or, taat_or_lazy
        #[arg(short, long, default_value = "block_max_wand")]
        algorithm: String,

        /// Scorer: bm25, dph, pl2, qld, quantized
        #[arg(short, long, default_value = "bm25")]
        scorer: String,

        /// Results per query (overridden by a query's own k)
        #[arg(short, default_value = "10")]
        k: usize,

        /// Run id in the TREC output
        #[arg(long, default_value = "talpa")]
        run_id: String,

        /// BM25 k1
        #[arg(long)]
        k1: Option<f32>,

        /// BM25 b
        #[arg(long)]
        b: Option<f32>,

        /// PL2 c
        #[arg(long)]
        c: Option<f32>,

        /// QLD mu
        #[arg(long)]
        mu: Option<f32>,
    },

    /// Print the header of an index or WAND-data file
    Inspect {
        /// Path to a .tidx or .twnd file
        file: String,
    },
}
