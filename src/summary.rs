//! Heuristic transcript summarization
//!
//! Pure function over stored transcript lines; no model, no network. The
//! summary is a bullet list of the first lines short enough to read as
//! bullets, in their original order.

use crate::config::SummaryConfig;

/// Summarize transcript lines as a bullet list
///
/// Blank lines are skipped, lines longer than `max_line_chars` are left
/// out, and at most `max_bullets` bullets are produced. Deterministic for
/// a given transcript.
pub fn summarize_lines(lines: &[String], config: &SummaryConfig) -> String {
    let mut bullets: Vec<&str> = Vec::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.chars().count() <= config.max_line_chars {
            bullets.push(line);
        }
        if bullets.len() >= config.max_bullets {
            break;
        }
    }

    if bullets.is_empty() {
        return "No transcript available to summarize.".to_string();
    }

    bullets
        .iter()
        .map(|line| format!("• {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}
