use crate::core::similarity::SequenceMatcher;

/// Minimum similarity for a sentence to stand in for the paraphrase.
pub const MATCH_CUTOFF: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub enum Recovery<'a> {
    Matched {
        index: usize,
        ratio: f64,
        sentence: &'a str,
    },
    /// No sentence reached the cutoff. `best_ratio` is `None` when no candidate
    /// survived the quick-ratio prefilter.
    Miss { best_ratio: Option<f64> },
}

/// Closest source sentence to `paraphrase`, scored by sequence-matching ratio.
///
/// Earliest index wins a tie.
pub fn recover_match<'a, S: AsRef<str>>(paraphrase: &str, sentences: &'a [S]) -> Recovery<'a> {
    let matcher = SequenceMatcher::new(paraphrase);
    let mut best: Option<(usize, f64)> = None;

    for (index, sentence) in sentences.iter().enumerate() {
        let sentence = sentence.as_ref();
        let floor = best.map_or(MATCH_CUTOFF, |(_, ratio)| ratio.max(MATCH_CUTOFF));

        // quick_ratio 是上界，比不過目前最佳就不必算完整 ratio
        if matcher.quick_ratio(sentence) < floor {
            continue;
        }

        let ratio = matcher.ratio(sentence);
        if best.map_or(true, |(_, best_ratio)| ratio > best_ratio) {
            best = Some((index, ratio));
        }
    }

    match best {
        Some((index, ratio)) if ratio >= MATCH_CUTOFF => Recovery::Matched {
            index,
            ratio,
            sentence: sentences[index].as_ref(),
        },
        _ => Recovery::Miss {
            best_ratio: best.map(|(_, ratio)| ratio),
        },
    }
}

/// The literal sentence when one is close enough, otherwise `paraphrase` unchanged.
pub fn recover<S: AsRef<str>>(paraphrase: &str, sentences: &[S]) -> String {
    match recover_match(paraphrase, sentences) {
        Recovery::Matched { sentence, .. } => sentence.to_string(),
        Recovery::Miss { .. } => paraphrase.to_string(),
    }
}
