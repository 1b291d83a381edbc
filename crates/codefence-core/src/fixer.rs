use serde::Serialize;

use crate::FENCE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixResult {
    pub body: String,
    pub fixed: bool,
    pub fix_count: usize,
}

/// Rewrites every bare opening fence in `body` to carry `lang`.
///
/// Only a fence whose trimmed line is exactly three backticks is rewritten.
/// Inside a block, only an exact closing fence ends it, so a tagged fence line
/// found inside a block is treated as content. Never fails.
pub fn fix_code_blocks(body: &str, lang: &str) -> FixResult {
    let mut inside_code = false;
    let mut fix_count = 0;

    let lines: Vec<String> = body
        .split('\n')
        .map(|line| {
            let trimmed = line.trim();
            if !inside_code && trimmed == FENCE {
                inside_code = true;
                fix_count += 1;
                format!("{FENCE}{lang}")
            } else if !inside_code && trimmed.starts_with(FENCE) && trimmed.len() > FENCE.len() {
                inside_code = true;
                line.to_string()
            } else {
                if inside_code && trimmed == FENCE {
                    inside_code = false;
                }
                line.to_string()
            }
        })
        .collect();

    FixResult {
        body: lines.join("\n"),
        fixed: fix_count > 0,
        fix_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_fence_gets_language() {
        let result = fix_code_blocks("```\ncode\n```", "python");
        assert_eq!(result.body, "```python\ncode\n```");
        assert!(result.fixed);
        assert_eq!(result.fix_count, 1);
    }

    #[test]
    fn test_tagged_fence_untouched() {
        let result = fix_code_blocks("```js\ncode\n```", "python");
        assert_eq!(result.body, "```js\ncode\n```");
        assert!(!result.fixed);
        assert_eq!(result.fix_count, 0);
    }

    #[test]
    fn test_two_bare_fences() {
        let body = "```\na\n```\ntext\n```\nb\n```";
        let result = fix_code_blocks(body, "text");
        assert_eq!(result.fix_count, 2);
        assert_eq!(result.body, "```text\na\n```\ntext\n```text\nb\n```");
    }

    #[test]
    fn test_no_fences() {
        let body = "line one\nline two\n";
        let result = fix_code_blocks(body, "rust");
        assert_eq!(result.body, body);
        assert!(!result.fixed);
    }

    #[test]
    fn test_closing_fences_are_preserved() {
        let result = fix_code_blocks("```\n```\n", "sh");
        assert_eq!(result.body, "```sh\n```\n");
    }

    #[test]
    fn test_tagged_fence_inside_block_is_content() {
        let body = "```js\na\n```end\n```\nb\n```";
        let result = fix_code_blocks(body, "python");
        // ```end does not close, so the following ``` closes and the final ``` opens bare
        assert_eq!(result.fix_count, 1);
        assert_eq!(result.body, "```js\na\n```end\n```\nb\n```python");
    }

    #[test]
    fn test_indentation_of_rewritten_fence_is_dropped() {
        let result = fix_code_blocks("  ```  \n  x\n  ```", "go");
        assert_eq!(result.body, "```go\n  x\n  ```");
    }

    #[test]
    fn test_second_pass_is_a_noop() {
        let body = "```\na\n```\n```ruby\nb\n```\n```\n";
        let first = fix_code_blocks(body, "python");
        let second = fix_code_blocks(&first.body, "python");
        assert!(!second.fixed);
        assert_eq!(second.body, first.body);
    }

    #[test]
    fn test_unterminated_block() {
        let result = fix_code_blocks("```\nopen forever", "c");
        assert_eq!(result.body, "```c\nopen forever");
        assert_eq!(result.fix_count, 1);
    }
}
