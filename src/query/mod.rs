// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Queries: weighted term bags, the two input formats, and TREC run output.
//!
//! A query is a bag of term ids with optional weights. By default duplicate
//! terms collapse into a single term whose weight is its occurrence count,
//! preserving first-occurrence order; [`TermPolicy`] tweaks that the same
//! way a bitset of flags would.
//!
//! Two wire formats are accepted: a whitespace line of term ids with an
//! optional `id:` prefix, and a JSON object with at least `term_ids`.
//! Results go out in TREC run format, one `qid Q0 docno rank score run_id`
//! line per hit with ranks from 0.

pub mod algorithm;

use std::io::{self, Write};
use std::ops::BitOr;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Index of a term in the lexicon.
pub type TermId = u32;

/// Term id along with its query weight; partial scores from the term are
/// multiplied by the weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedTerm {
    pub id: TermId,
    pub weight: f32,
}

// ============================================================================
// TERM POLICY
// ============================================================================

/// How the constructor treats the raw term sequence. Policies combine with
/// `|`: `TermPolicy::UNWEIGHTED | TermPolicy::SORT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TermPolicy(u32);

impl TermPolicy {
    /// Collapse duplicates into occurrence-count weights, keep order of
    /// first occurrence.
    pub const DEFAULT: TermPolicy = TermPolicy(0);
    /// Keep duplicate terms, each with weight 1. Posting lists of repeated
    /// terms get traversed once per occurrence; only useful outside the
    /// standard processors.
    pub const KEEP_DUPLICATES: TermPolicy = TermPolicy(0b001);
    /// Force weight 1 even when duplicates were collapsed.
    pub const UNWEIGHTED: TermPolicy = TermPolicy(0b010);
    /// Sort terms by id.
    pub const SORT: TermPolicy = TermPolicy(0b100);

    pub fn contains(self, other: TermPolicy) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for TermPolicy {
    type Output = TermPolicy;

    fn bitor(self, rhs: TermPolicy) -> TermPolicy {
        TermPolicy(self.0 | rhs.0)
    }
}

// ============================================================================
// QUERY
// ============================================================================

/// A query issued to a processor.
#[derive(Debug, Clone)]
pub struct Query {
    id: Option<String>,
    terms: Vec<WeightedTerm>,
    k: Option<usize>,
    threshold: Option<f32>,
    /// Term-subset bitmasks used by selective intersection front-ends;
    /// parsed and carried through, not interpreted here.
    selections: Option<Vec<u64>>,
}

impl Query {
    /// Build a query from unweighted term ids under the given policy.
    pub fn from_ids(id: Option<String>, term_ids: &[TermId], policy: TermPolicy) -> Query {
        let terms = term_ids
            .iter()
            .map(|&id| WeightedTerm { id, weight: 1.0 })
            .collect();
        let mut query = Query {
            id,
            terms,
            k: None,
            threshold: None,
            selections: None,
        };
        query.postprocess(policy);
        query
    }

    /// Build a query from explicitly weighted terms under the given policy.
    pub fn from_weighted(
        id: Option<String>,
        terms: Vec<WeightedTerm>,
        policy: TermPolicy,
    ) -> Query {
        let mut query = Query {
            id,
            terms,
            k: None,
            threshold: None,
            selections: None,
        };
        query.postprocess(policy);
        query
    }

    fn postprocess(&mut self, policy: TermPolicy) {
        if !policy.contains(TermPolicy::KEEP_DUPLICATES) {
            let mut collapsed: Vec<WeightedTerm> = Vec::with_capacity(self.terms.len());
            for term in &self.terms {
                match collapsed.iter_mut().find(|t| t.id == term.id) {
                    Some(seen) => seen.weight += term.weight,
                    None => collapsed.push(*term),
                }
            }
            self.terms = collapsed;
        }
        if policy.contains(TermPolicy::UNWEIGHTED) || policy.contains(TermPolicy::KEEP_DUPLICATES) {
            for term in &mut self.terms {
                term.weight = 1.0;
            }
        }
        if policy.contains(TermPolicy::SORT) {
            self.terms.sort_by_key(|t| t.id);
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn terms(&self) -> &[WeightedTerm] {
        &self.terms
    }

    /// Bare term ids, in query order.
    pub fn term_ids(&self) -> Vec<TermId> {
        self.terms.iter().map(|t| t.id).collect()
    }

    /// Requested result count, when the query carries one.
    pub fn k(&self) -> Option<usize> {
        self.k
    }

    /// Initial top-k threshold, when the query carries one.
    pub fn threshold(&self) -> Option<f32> {
        self.threshold
    }

    pub fn selections(&self) -> Option<&[u64]> {
        self.selections.as_deref()
    }

    // ------------------------------------------------------------------
    // PARSING
    // ------------------------------------------------------------------

    /// Parse either input format: JSON if the line starts with `{`,
    /// otherwise the plain `id:t1 t2 …` form.
    pub fn parse(line: &str, policy: TermPolicy) -> Result<Query> {
        if line.trim_start().starts_with('{') {
            Self::parse_json(line, policy)
        } else {
            Self::parse_plain(line, policy)
        }
    }

    /// Parse a whitespace-separated term-id line with an optional query-id
    /// prefix: `"q1:3 17 3"` or `"3 17 3"`.
    pub fn parse_plain(line: &str, policy: TermPolicy) -> Result<Query> {
        let (id, rest) = match line.split_once(':') {
            Some((id, rest)) => (Some(id.trim().to_string()), rest),
            None => (None, line),
        };
        let mut term_ids = Vec::new();
        for token in rest.split_whitespace() {
            let term = token.parse::<TermId>().map_err(|_| {
                Error::InvalidArgument(format!("bad term id '{}' in query line", token))
            })?;
            term_ids.push(term);
        }
        Ok(Query::from_ids(id, &term_ids, policy))
    }

    /// Parse the JSON query format; `term_ids` is required, everything else
    /// optional.
    pub fn parse_json(line: &str, policy: TermPolicy) -> Result<Query> {
        let raw: QueryJson = serde_json::from_str(line)
            .map_err(|e| Error::InvalidArgument(format!("bad query json: {}", e)))?;
        let mut query = Query::from_ids(raw.id.map(|id| id.into_string()), &raw.term_ids, policy);
        query.k = raw.k;
        query.threshold = raw.threshold;
        query.selections = raw.selections;
        Ok(query)
    }
}

/// Sort and deduplicate a raw term-id list, for the unranked processors
/// that score nothing and only count matches.
pub fn remove_duplicate_terms(terms: &mut Vec<TermId>) {
    terms.sort_unstable();
    terms.dedup();
}

#[derive(Deserialize)]
struct QueryJson {
    #[serde(default)]
    id: Option<QueryId>,
    /// Original query text; accepted and ignored (term resolution happens
    /// upstream of this crate).
    #[serde(default)]
    #[allow(dead_code)]
    query: Option<String>,
    term_ids: Vec<TermId>,
    #[serde(default)]
    threshold: Option<f32>,
    #[serde(default)]
    k: Option<usize>,
    #[serde(default)]
    selections: Option<Vec<u64>>,
}

/// Query ids appear both as strings and as bare numbers in the wild.
#[derive(Deserialize)]
#[serde(untagged)]
enum QueryId {
    Text(String),
    Number(u64),
}

impl QueryId {
    fn into_string(self) -> String {
        match self {
            QueryId::Text(s) => s,
            QueryId::Number(n) => n.to_string(),
        }
    }
}

// ============================================================================
// TREC OUTPUT
// ============================================================================

/// Write one query's results as TREC run lines: `qid Q0 docno rank score
/// run_id`, tab-separated, ranks from 0, docno the decimal docid.
pub fn write_trec_run<W: Write>(
    out: &mut W,
    qid: &str,
    results: &[(f32, u32)],
    run_id: &str,
) -> io::Result<()> {
    for (rank, (score, docid)) in results.iter().enumerate() {
        writeln!(out, "{}\tQ0\t{}\t{}\t{}\t{}", qid, docid, rank, score, run_id)?;
    }
    Ok(())
}
