//! Minimal HTML helpers for server-rendered pages.

/// Escapes a string for use in HTML text and attribute values. Pollutant
/// codes and city names come from the remote feed and are untrusted.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Wraps page content in the shared shell.
pub fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
  body {{ font-family: sans-serif; margin: 2rem auto; max-width: 56rem; color: #222; }}
  table {{ border-collapse: collapse; width: 100%; font-size: 0.9rem; }}
  th, td {{ border: 1px solid #ddd; padding: 0.3rem 0.5rem; text-align: left; }}
  th {{ background: #f5f5f5; }}
  .warning {{ background: #fff3cd; border: 1px solid #ffe69c; padding: 1rem; border-radius: 4px; }}
  .bar-row {{ display: flex; align-items: center; margin: 0.2rem 0; }}
  .bar-label {{ width: 6rem; font-size: 0.85rem; }}
  .bar {{ height: 1.1rem; border-radius: 2px; }}
  .bar-value {{ margin-left: 0.4rem; font-size: 0.85rem; }}
</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
        body = body,
    )
}
