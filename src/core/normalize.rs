//! Mojibake repair and Unicode normalization.
//!
//! Text that was UTF-8 encoded and then decoded as Windows-1252 (or Latin-1)
//! shows up with sequences such as `â€™` in place of a right single quote.
//! [`normalize`] rewrites the known sequences, applies NFKC and trims the ends.

use unicode_normalization::UnicodeNormalization;

/// Known artifact sequences and their repairs.
///
/// Every pattern starts with `â` (U+00E2) or `Â` (U+00C2) and no replacement
/// contains either character, so a replacement can never produce a pattern.
/// Patterns are matched leftmost-longest, which makes the order of this table
/// irrelevant even though the bare `â€` is a prefix of the others.
pub const REPAIR_TABLE: &[(&str, &str)] = &[
    // â€œ  left double quote
    ("\u{e2}\u{20ac}\u{153}", "\""),
    ("\u{e2}\u{20ac}\u{9c}", "\""),
    // â€\x9d  right double quote (0x9D is unmapped in cp1252)
    ("\u{e2}\u{20ac}\u{9d}", "\""),
    // â€™  right single quote
    ("\u{e2}\u{20ac}\u{2122}", "'"),
    ("\u{e2}\u{20ac}\u{99}", "'"),
    // â€˜  left single quote
    ("\u{e2}\u{20ac}\u{2dc}", "'"),
    ("\u{e2}\u{20ac}\u{98}", "'"),
    // â€”  em dash
    ("\u{e2}\u{20ac}\u{201d}", "\u{2014}"),
    // â€“  en dash
    ("\u{e2}\u{20ac}\u{201c}", "\u{2013}"),
    // â€¦  ellipsis
    ("\u{e2}\u{20ac}\u{a6}", "..."),
    // â€ with the third byte lost
    ("\u{e2}\u{20ac}", "\""),
    // Â  stray lead byte in front of NBSP and friends
    ("\u{c2}", ""),
];

/// Repair mojibake, apply NFKC and strip surrounding whitespace.
///
/// Never fails. The three steps are repeated until nothing changes, because
/// deleting a stray `Â` or composing `a` + U+0302 can bring a new artifact
/// together; this is what keeps `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut current = normalize_once(text);
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// `None` is treated the same as an empty string.
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

fn normalize_once(text: &str) -> String {
    // NFKC turns a leftover ™ into "TM", so repair must settle first
    let mut repaired = repair_mojibake(text);
    loop {
        let next = repair_mojibake(&repaired);
        if next == repaired {
            break;
        }
        repaired = next;
    }

    let composed: String = repaired.nfkc().collect();
    composed.trim().to_string()
}

/// Single leftmost-longest pass over [`REPAIR_TABLE`].
pub fn repair_mojibake(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        match longest_repair_at(rest) {
            Some((pattern, replacement)) => {
                out.push_str(replacement);
                rest = &rest[pattern.len()..];
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    out
}

fn longest_repair_at(text: &str) -> Option<(&'static str, &'static str)> {
    if !text.starts_with(['\u{e2}', '\u{c2}']) {
        return None;
    }

    REPAIR_TABLE
        .iter()
        .filter(|(pattern, _)| text.starts_with(pattern))
        .max_by_key(|(pattern, _)| pattern.len())
        .copied()
}
