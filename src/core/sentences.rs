use crate::domain::model::NormalizedText;

/// Split text after `.`, `!` or `?` when the mark is followed by whitespace.
///
/// The whitespace run between two sentences is dropped. Each returned slice
/// borrows from `text`, so every sentence exists verbatim in the input.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }

        let end = idx + c.len_utf8();
        let mut next_start = end;
        while let Some(&(ws_idx, ws)) = chars.peek() {
            if !ws.is_whitespace() {
                break;
            }
            next_start = ws_idx + ws.len_utf8();
            chars.next();
        }

        if next_start > end {
            push_non_empty(&mut sentences, &text[start..end]);
            start = next_start;
        }
    }

    push_non_empty(&mut sentences, &text[start..]);
    sentences
}

fn push_non_empty<'a>(sentences: &mut Vec<&'a str>, segment: &'a str) {
    if !segment.is_empty() {
        sentences.push(segment);
    }
}

/// Sentences of one normalized document, built once and shared by every finding.
#[derive(Debug, Clone)]
pub struct SentenceIndex {
    sentences: Vec<String>,
}

impl SentenceIndex {
    pub fn build(text: &NormalizedText) -> Self {
        Self::from_text(text.as_str())
    }

    pub(crate) fn from_text(text: &str) -> Self {
        Self {
            sentences: split_sentences(text).into_iter().map(str::to_string).collect(),
        }
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_each_terminator() {
        assert_eq!(split_sentences("A. B! C?"), vec!["A.", "B!", "C?"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(split_sentences("").is_empty());
    }

    #[test]
    fn test_whitespace_run_is_consumed() {
        assert_eq!(
            split_sentences("One.  \n\tTwo.\n\nThree"),
            vec!["One.", "Two.", "Three"]
        );
    }

    #[test]
    fn test_terminator_without_whitespace_does_not_split() {
        assert_eq!(
            split_sentences("Version 1.5 shipped.Next line"),
            vec!["Version 1.5 shipped.Next line"]
        );
    }

    #[test]
    fn test_trailing_whitespace_leaves_no_empty_sentence() {
        assert_eq!(split_sentences("Done. "), vec!["Done."]);
    }

    #[test]
    fn test_sentences_are_verbatim_substrings() {
        let text = "Dogs bark. Cats purr. All mammals are dogs, so all mammals bark.";
        let sentences = split_sentences(text);

        assert_eq!(sentences.len(), 3);
        for sentence in &sentences {
            assert!(text.contains(sentence));
        }
        assert_eq!(sentences[2], "All mammals are dogs, so all mammals bark.");
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(
            split_sentences("Caf\u{e9} ferm\u{e9}? Oui! \u{2014}fin"),
            vec!["Caf\u{e9} ferm\u{e9}?", "Oui!", "\u{2014}fin"]
        );
    }

    #[test]
    fn test_index_from_normalized_text() {
        let text = NormalizedText::from_raw("  First one. Second one!  ");
        let index = SentenceIndex::build(&text);

        assert_eq!(index.len(), 2);
        assert_eq!(index.sentences()[1], "Second one!");
    }
}
