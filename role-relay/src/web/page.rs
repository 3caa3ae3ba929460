//! HTML page shell for the Linked Roles browser flow.

use axum::response::Html;

const PAGE_HEAD: &str = r#"<!doctype html><meta charset="utf-8">
<style>
  body{font-family:ui-sans-serif,system-ui,Segoe UI,Roboto,Helvetica,Arial;
       background:#0b0b0f;color:#e5e7eb;display:grid;place-items:center;height:100vh}
  .card{max-width:720px;background:#111827;padding:28px 32px;border-radius:16px;
        box-shadow:0 10px 40px rgba(0,0,0,.35)}
  h1{margin:0 0 8px;font-size:22px}
  p{margin:6px 0 0;line-height:1.5;color:#cbd5e1}
  .ok{color:#34d399}
  .err{color:#f87171}
  a{color:#93c5fd}
  code{background:#0f172a;padding:2px 6px;border-radius:6px}
</style>
"#;

/// Wrap a body fragment in the shared page shell.
///
/// The fragment is inserted as-is. Interpolate untrusted values through
/// `html_escape::encode_text`.
pub fn render_page(fragment: &str) -> Html<String> {
    Html(format!(
        "{}<div class=\"card\">{}</div>",
        PAGE_HEAD, fragment
    ))
}
