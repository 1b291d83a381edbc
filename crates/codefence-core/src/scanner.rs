use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use crate::FENCE;

/// Previews longer than this many characters are cut and suffixed with `...`.
pub const MAX_PREVIEW_CHARS: usize = 50;

const ELLIPSIS: &str = "...";

static FENCE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```(\S*)").unwrap());

/// An opening fence without a language tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// 1-based line number of the opening fence.
    pub line: usize,
    /// First meaningful line of the block, trimmed and possibly truncated.
    pub preview: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line {}: Missing language for code block. Code starts with: \"{}\"",
            self.line, self.preview
        )
    }
}

/// Walks `body` line by line and reports every opening fence that carries no
/// language tag.
///
/// Fence state does not nest: any fence line seen inside a block closes it,
/// whatever follows the backticks. An unterminated block at the end of the
/// text is accepted silently.
pub fn find_missing_lang_blocks(body: &str) -> Vec<Finding> {
    let lines: Vec<&str> = body.split('\n').collect();
    let mut inside_code = false;
    let mut findings = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let Some(captures) = FENCE_PATTERN.captures(line.trim()) else {
            continue;
        };

        if inside_code {
            inside_code = false;
            continue;
        }

        let lang = captures.get(1).map_or("", |m| m.as_str());
        if lang.is_empty() {
            findings.push(Finding {
                line: index + 1,
                preview: code_preview(&lines[index + 1..]),
            });
        }
        inside_code = true;
    }

    findings
}

/// First non-blank line before the closing fence, truncated to
/// [`MAX_PREVIEW_CHARS`].
fn code_preview(following: &[&str]) -> String {
    for line in following {
        let trimmed = line.trim();
        if trimmed.starts_with(FENCE) {
            break;
        }
        if !trimmed.is_empty() {
            return truncate_preview(trimmed);
        }
    }
    String::new()
}

fn truncate_preview(text: &str) -> String {
    if text.chars().count() <= MAX_PREVIEW_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_PREVIEW_CHARS).collect();
    cut.push_str(ELLIPSIS);
    cut
}
