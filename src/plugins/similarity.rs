//! Name similarity scoring.
//!
//! The default scorer is the gestalt (Ratcliff/Obershelp) ratio: find the
//! longest common block, recurse on both sides, and report
//! `2 * matched / (len(a) + len(b))`. Characters are compared as Unicode
//! scalar values, so multi-byte names score the same way ASCII names do.
//!
//! Anything implementing [`Similarity`], including a plain closure, can be
//! swapped in through [`NameMatcher::with_similarity`].

use crate::core::config::{DEFAULT_SIMILARITY_THRESHOLD, validate_threshold};
use crate::core::error::GurumeError;
use rustc_hash::FxHashMap;

/// Sequences at least this long drop "popular" characters from the match index.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Scores two strings in `[0, 1]`; `1.0` means identical.
pub trait Similarity {
    fn ratio(&self, a: &str, b: &str) -> f64;
}

impl<F> Similarity for F
where
    F: Fn(&str, &str) -> f64,
{
    fn ratio(&self, a: &str, b: &str) -> f64 {
        self(a, b)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceRatio;

impl Similarity for SequenceRatio {
    fn ratio(&self, a: &str, b: &str) -> f64 {
        sequence_ratio(a, b)
    }
}

pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = BlockMatcher::new(&a, &b).matched_len();
    2.0 * matched as f64 / total as f64
}

struct BlockMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each character in `b`, ascending.
    b2j: FxHashMap<char, Vec<usize>>,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: FxHashMap<char, Vec<usize>> = FxHashMap::default();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }
        if b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= ntest);
        }
        BlockMatcher { a, b, b2j }
    }

    /// Total size of all matching blocks.
    fn matched_len(&self) -> usize {
        let mut matched = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        matched
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` inside the given window. Ties
    /// resolve to the earliest start in `a`, then in `b`.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (a, b) = (self.a, self.b);
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);

        let mut j2len: FxHashMap<usize, usize> = FxHashMap::default();
        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: FxHashMap<usize, usize> = FxHashMap::default();
            if let Some(positions) = self.b2j.get(c) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = if j > 0 { j2len.get(&(j - 1)).copied().unwrap_or(0) } else { 0 };
                    let k = prev + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular characters are absent from b2j but may still extend a block.
        while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && a[besti + bestsize] == b[bestj + bestsize]
        {
            bestsize += 1;
        }

        (besti, bestj, bestsize)
    }
}

/// Decides whether two names denote the same establishment.
///
/// Names match when their similarity ratio is strictly greater than the threshold.
#[derive(Debug, Clone)]
pub struct NameMatcher<S: Similarity = SequenceRatio> {
    similarity: S,
    threshold: f64,
}

impl NameMatcher<SequenceRatio> {
    pub fn new(threshold: f64) -> Result<Self, GurumeError> {
        Self::with_similarity(SequenceRatio, threshold)
    }
}

impl Default for NameMatcher<SequenceRatio> {
    fn default() -> Self {
        NameMatcher {
            similarity: SequenceRatio,
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl<S: Similarity> NameMatcher<S> {
    pub fn with_similarity(similarity: S, threshold: f64) -> Result<Self, GurumeError> {
        Ok(NameMatcher {
            similarity,
            threshold: validate_threshold(threshold)?,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn ratio(&self, a: &str, b: &str) -> f64 {
        self.similarity.ratio(a, b)
    }

    pub fn is_same(&self, a: &str, b: &str) -> bool {
        self.ratio(a, b) > self.threshold
    }
}
