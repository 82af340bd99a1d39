use colored::Colorize;
use devgenius_core::error_detection::{CORRECTED_TAB, ERRORS_TAB, RESULT_HEADING};
use devgenius_core::feature::FeatureKind;
use devgenius_core::format::Segment;
use devgenius_core::response::Rendered;

const RULE_WIDTH: usize = 80;

/// Format a finished response for the terminal.
pub fn format_rendered(feature: FeatureKind, rendered: &Rendered) -> String {
    match rendered {
        Rendered::Segments(segments) => {
            let mut result = heading(feature.descriptor().result_title);
            result.push_str(&format_segments(segments));
            result
        }
        Rendered::ErrorDetection(view) => {
            let mut result = heading(RESULT_HEADING);

            result.push_str(&format!("\n{}\n", ERRORS_TAB.bright_red().bold()));
            result.push_str(&format!("{}\n", "-".repeat(RULE_WIDTH).red()));
            result.push_str(view.errors_view.trim_end());
            result.push('\n');

            result.push_str(&format!("\n{}\n", CORRECTED_TAB.bright_green().bold()));
            result.push_str(&format!("{}\n", "-".repeat(RULE_WIDTH).green()));
            result.push_str(&view.corrected_view.trim_end().green().to_string());
            result.push('\n');

            result
        }
    }
}

fn heading(title: &str) -> String {
    let mut result = String::new();
    result.push_str(&format!("\n{}\n", "=".repeat(RULE_WIDTH).bright_cyan()));
    result.push_str(&format!("{}\n", title.to_uppercase().bright_white().bold()));
    result.push_str(&format!("{}\n", "=".repeat(RULE_WIDTH).bright_cyan()));
    result
}

/// Text verbatim, code blocks framed and highlighted.
fn format_segments(segments: &[Segment]) -> String {
    let mut result = String::new();

    for segment in segments {
        match segment {
            Segment::Text(text) => result.push_str(text),
            Segment::Code(code) => {
                if !result.is_empty() && !result.ends_with('\n') {
                    result.push('\n');
                }
                result.push_str(&format!("┌{}\n", "─".repeat(RULE_WIDTH - 1)));
                for line in code.lines() {
                    result.push_str(&format!("{} {}\n", "│".dimmed(), line.yellow()));
                }
                result.push_str(&format!("└{}\n", "─".repeat(RULE_WIDTH - 1)));
            }
        }
    }

    result
}
