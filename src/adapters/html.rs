//! Pulls a title and readable body text out of an article page.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Elements whose content is never article text.
const NOISE_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "aside", "form", "svg", "template",
];

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment regex"));
static NOISE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    NOISE_TAGS
        .iter()
        .map(|tag| {
            Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>")).expect("noise tag regex")
        })
        .collect()
});
static META_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("meta regex"));
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)([a-z_:][-a-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("attr regex")
});
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").expect("title regex"));
static ARTICLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<article\b[^>]*>(.*)</article\s*>").expect("article regex")
});
static BODY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body\b[^>]*>(.*)</body\s*>").expect("body regex"));
static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p\s*>").expect("paragraph regex"));
static BLOCK_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(?:br|/p|/div|/li|/h[1-6]|/blockquote|/section)\b[^>]*>")
        .expect("block regex")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag regex"));
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").expect("entity regex")
});
static INLINE_WS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: Option<String>,
    pub text: String,
}

pub fn extract_article(html: &str) -> Article {
    let cleaned = strip_noise(html);

    let title = og_title(&cleaned).or_else(|| {
        TITLE_RE
            .captures(&cleaned)
            .map(|caps| inline_text(&caps[1]))
            .filter(|title| !title.is_empty())
    });

    let scope = ARTICLE_RE
        .captures(&cleaned)
        .or_else(|| BODY_RE.captures(&cleaned))
        .and_then(|caps| caps.get(1))
        .map_or(cleaned.as_str(), |m| m.as_str());

    let paragraphs: Vec<String> = PARAGRAPH_RE
        .captures_iter(scope)
        .map(|caps| inline_text(&caps[1]))
        .filter(|paragraph| !paragraph.is_empty())
        .collect();

    let text = if paragraphs.is_empty() {
        block_text(scope)
    } else {
        paragraphs.join("\n\n")
    };

    Article { title, text }
}

fn strip_noise(html: &str) -> String {
    let mut cleaned = COMMENT_RE.replace_all(html, "").into_owned();
    for re in NOISE_RES.iter() {
        cleaned = re.replace_all(&cleaned, "").into_owned();
    }
    cleaned
}

fn og_title(html: &str) -> Option<String> {
    META_RE.find_iter(html).find_map(|meta| {
        let mut is_og_title = false;
        let mut content = None;

        for caps in ATTR_RE.captures_iter(meta.as_str()) {
            let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
            match caps[1].to_ascii_lowercase().as_str() {
                "property" | "name" if value.eq_ignore_ascii_case("og:title") => is_og_title = true,
                "content" => content = Some(value),
                _ => {}
            }
        }

        if is_og_title {
            content.map(inline_text).filter(|title| !title.is_empty())
        } else {
            None
        }
    })
}

/// Tags removed, entities decoded, whitespace collapsed to single spaces.
fn inline_text(fragment: &str) -> String {
    let text = TAG_RE.replace_all(fragment, " ");
    let text = decode_entities(&text);
    INLINE_WS_RE.replace_all(&text, " ").trim().to_string()
}

/// Fallback for pages without `<p>`: one line per block element.
fn block_text(fragment: &str) -> String {
    let with_breaks = BLOCK_BREAK_RE.replace_all(fragment, "\n");
    with_breaks
        .lines()
        .map(inline_text)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(entity)
            };
            decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "hellip" => '\u{2026}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "laquo" => '\u{ab}',
        "raquo" => '\u{bb}',
        "copy" => '\u{a9}',
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Fallback Title | Daily News</title>
  <meta property="og:title" content="Why Everyone Agrees &amp; Is Right">
  <style>p { color: red; }</style>
</head>
<body>
  <nav><p>Home</p><p>Sports</p></nav>
  <article>
    <h1>Why Everyone Agrees</h1>
    <p>Everyone I know agrees.</p>
    <!-- <p>hidden</p> -->
    <p>So it must be <em>true</em>&nbsp;&mdash; obviously.</p>
    <script>var p = "<p>not text</p>";</script>
  </article>
  <footer><p>Copyright</p></footer>
</body>
</html>"#;

    #[test]
    fn test_prefers_og_title() {
        let article = extract_article(PAGE);
        assert_eq!(article.title.as_deref(), Some("Why Everyone Agrees & Is Right"));
    }

    #[test]
    fn test_article_paragraphs_only() {
        let article = extract_article(PAGE);
        assert_eq!(
            article.text,
            "Everyone I know agrees.\n\nSo it must be true \u{2014} obviously."
        );
        assert!(!article.text.contains("Home"));
        assert!(!article.text.contains("hidden"));
        assert!(!article.text.contains("not text"));
        assert!(!article.text.contains("Copyright"));
    }

    #[test]
    fn test_title_tag_fallback() {
        let article = extract_article("<html><head><title> Plain  Title </title></head><body><p>Hi.</p></body></html>");
        assert_eq!(article.title.as_deref(), Some("Plain Title"));
        assert_eq!(article.text, "Hi.");
    }

    #[test]
    fn test_page_without_paragraphs() {
        let article = extract_article("<body><div>First line.</div><div>Second<br>line.</div></body>");
        assert_eq!(article.title, None);
        assert_eq!(article.text, "First line.\nSecond\nline.");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &lt;b&gt; &#65;&#x42; &unknown; &amp;"), "a <b> AB &unknown; &");
    }
}
