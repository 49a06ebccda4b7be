//! Unordered gene pairs.
//!
//! Every lookup keyed by a pair of genes (interaction index, known SL set,
//! negative sampling) goes through [`GenePair`], which stores the two symbols
//! in lexicographic order so that (A, B) and (B, A) are the same key.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonicalized, order-independent gene pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GenePair {
    first: String,
    second: String,
}

impl GenePair {
    /// Build a pair from two symbols in any order.
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    /// Lexicographically smaller symbol.
    pub fn first(&self) -> &str {
        &self.first
    }

    /// Lexicographically larger symbol.
    pub fn second(&self) -> &str {
        &self.second
    }

    pub fn is_self_pair(&self) -> bool {
        self.first == self.second
    }

    pub fn contains(&self, gene: &str) -> bool {
        self.first == gene || self.second == gene
    }

    pub fn into_parts(self) -> (String, String) {
        (self.first, self.second)
    }
}

impl fmt::Display for GenePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}

impl<A: Into<String>, B: Into<String>> From<(A, B)> for GenePair {
    fn from((a, b): (A, B)) -> Self {
        Self::new(a, b)
    }
}

impl From<GenePair> for (String, String) {
    fn from(pair: GenePair) -> Self {
        pair.into_parts()
    }
}

/// Set of known (positive) pairs, canonicalized on insertion.
#[derive(Debug, Clone, Default)]
pub struct KnownPairSet {
    pairs: HashSet<GenePair>,
}

impl KnownPairSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, a: &str, b: &str) -> bool {
        self.pairs.insert(GenePair::new(a, b))
    }

    /// Order-independent membership test.
    pub fn contains(&self, a: &str, b: &str) -> bool {
        self.pairs.contains(&GenePair::new(a, b))
    }

    pub fn contains_pair(&self, pair: &GenePair) -> bool {
        self.pairs.contains(pair)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GenePair> {
        self.pairs.iter()
    }
}

impl<P: Into<GenePair>> FromIterator<P> for KnownPairSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(Into::into).collect(),
        }
    }
}
