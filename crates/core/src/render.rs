//! HTML rendering boundary
//!
//! Model output is untrusted: every text segment and every code body is
//! escaped before it is placed in markup.

use crate::error_detection::{ErrorDetectionView, CORRECTED_TAB, ERRORS_TAB};
use crate::format::Segment;
use crate::response::Rendered;

/// Render segments to HTML. Code becomes `<pre><code>` blocks.
pub fn render_html(segments: &[Segment]) -> String {
    let mut html = String::new();

    for segment in segments {
        match segment {
            Segment::Text(text) => html.push_str(&html_escape::encode_text(text)),
            Segment::Code(code) => {
                html.push_str("<pre><code>");
                html.push_str(&html_escape::encode_text(code));
                html.push_str("</code></pre>");
            }
        }
    }

    html
}

/// Render the error detection dual view as two preformatted sections.
pub fn render_error_detection_html(view: &ErrorDetectionView) -> String {
    format!(
        "<section class=\"errors\"><h4>{}</h4><pre>{}</pre></section>\
         <section class=\"corrected\"><h4>{}</h4><pre><code>{}</code></pre></section>",
        ERRORS_TAB,
        html_escape::encode_text(&view.errors_view),
        CORRECTED_TAB,
        html_escape::encode_text(&view.corrected_view),
    )
}

/// Render any finished output.
pub fn render_rendered_html(rendered: &Rendered) -> String {
    match rendered {
        Rendered::Segments(segments) => render_html(segments),
        Rendered::ErrorDetection(view) => render_error_detection_html(view),
    }
}
