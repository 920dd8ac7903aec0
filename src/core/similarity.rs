//! Ratcliff/Obershelp sequence matching over Unicode scalar values.
//!
//! `ratio = 2 * M / (len(a) + len(b))`, where `M` is the total length of the
//! matching blocks found by repeatedly taking the longest common block and
//! recursing on both sides of it.

use std::collections::HashMap;

/// Sequences at least this long get the "popular element" heuristic.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Compares many candidates (`a`) against one fixed sequence (`b`).
///
/// The index of `b` is built once, mirroring how a paraphrase is scored
/// against every sentence of a document.
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    b: Vec<char>,
    b2j: HashMap<char, Vec<usize>>,
    b_counts: HashMap<char, usize>,
}

impl SequenceMatcher {
    pub fn new(b: &str) -> Self {
        let b: Vec<char> = b.chars().collect();

        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        let mut b_counts = HashMap::with_capacity(b2j.len());
        for (&c, positions) in &b2j {
            b_counts.insert(c, positions.len());
        }

        // 過於常見的字元不參與 longest-match 搜尋，只在擴張時補回
        let n = b.len();
        if n >= AUTOJUNK_MIN_LEN {
            let threshold = n / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= threshold);
        }

        Self { b, b2j, b_counts }
    }

    pub fn ratio(&self, a: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let matches = self.matching_chars(&a);
        calculate_ratio(matches, a.len() + self.b.len())
    }

    /// Upper bound on [`ratio`](Self::ratio) from character multisets alone.
    pub fn quick_ratio(&self, a: &str) -> f64 {
        let mut available = self.b_counts.clone();
        let mut matches = 0;
        let mut len_a = 0;

        for c in a.chars() {
            len_a += 1;
            if let Some(count) = available.get_mut(&c) {
                if *count > 0 {
                    *count -= 1;
                    matches += 1;
                }
            }
        }

        calculate_ratio(matches, len_a + self.b.len())
    }

    fn matching_chars(&self, a: &[char]) -> usize {
        let mut total = 0;
        let mut queue = vec![(0, a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.find_longest_match(a, alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        total
    }

    /// Longest block with `a[i..i+k] == b[j..j+k]` inside the given window.
    /// Ties go to the smallest `i`, then the smallest `j`.
    fn find_longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut new_j2len = HashMap::new();
            if let Some(positions) = self.b2j.get(c) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    new_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = new_j2len;
        }

        // popular characters were left out of b2j; grow the block over them
        while best_i > alo && best_j > blo && a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }
}

fn calculate_ratio(matches: usize, length: usize) -> f64 {
    if length == 0 {
        1.0
    } else {
        2.0 * matches as f64 / length as f64
    }
}

/// Convenience wrapper for a single comparison.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    SequenceMatcher::new(b).ratio(a)
}
