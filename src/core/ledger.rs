use crate::domain::model::RenderedFinding;

const FINDING_STYLE: &str =
    "border-left: 5px solid #e74c3c; background: #fdf2f2; padding: 20px; margin-bottom: 20px;";
const UNVERIFIED_NOTE: &str = "unverified: not found verbatim in the source";

/// Build the ledger HTML. Pure: the same title and items give the same bytes.
///
/// Every finding becomes one `<div class="finding">` block, in input order.
/// All embedded text is escaped.
pub fn assemble(title: &str, items: &[RenderedFinding]) -> String {
    let title = escape_html(title);
    let blocks: String = items.iter().map(render_block).collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Audit: {title}</title>
    <style>body {{ font-family: sans-serif; max-width: 800px; margin: 40px auto; padding: 20px; }} .unverified {{ color: #7f8c8d; font-size: 0.85em; }}</style>
</head>
<body>
    <h1>Logic Audit Ledger: {title}</h1>
    <hr>
    <main class="findings">{blocks}
    </main>
</body>
</html>
"#
    )
}

fn render_block(item: &RenderedFinding) -> String {
    let marker = if item.is_verified() {
        String::new()
    } else {
        format!(
            "\n            <span class=\"unverified\">({})</span>",
            UNVERIFIED_NOTE
        )
    };

    format!(
        r#"
        <div class="finding" style="{style}">
            <b style="color: #c0392b;">{fallacy}</b><br>
            <i style="color: #34495e; display: block; margin: 10px 0;">"{quote}"</i>{marker}
            <p><b>Audit Note:</b> {explanation}</p>
        </div>"#,
        style = FINDING_STYLE,
        fallacy = escape_html(&item.fallacy),
        quote = escape_html(&item.literal_quote),
        marker = marker,
        explanation = escape_html(&item.clean_explanation),
    )
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
