//! Line comment stripping
//!
//! Both helpers are pure and idempotent. The router runs the comment pass twice:
//! once on the scan text used for directive and include matching, and once on
//! the content it stores.

use crate::constants::markers;

/// Truncate `line` at the first `//`
pub fn strip_line_comment(line: &str) -> &str {
    match line.find(markers::LINE_COMMENT) {
        Some(index) => &line[..index],
        None => line,
    }
}

/// Remove every carriage return and line feed
pub fn strip_line_ending(line: &str) -> String {
    line.replace(['\r', '\n'], "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_trailing_comment() {
        assert_eq!(strip_line_comment("vec4 a; // color"), "vec4 a; ");
        assert_eq!(strip_line_comment("// whole line"), "");
        assert_eq!(strip_line_comment("no comment"), "no comment");
    }

    #[test]
    fn test_first_marker_wins() {
        assert_eq!(strip_line_comment("a // b // c"), "a ");
        assert_eq!(strip_line_comment("url://x"), "url:");
    }

    #[test]
    fn test_strip_is_idempotent() {
        for line in ["x = 1; // one", "// only", "plain", ""] {
            let once = strip_line_comment(line);
            assert_eq!(strip_line_comment(once), once);
        }
    }

    #[test]
    fn test_strip_line_ending() {
        assert_eq!(strip_line_ending("abc\r\n"), "abc");
        assert_eq!(strip_line_ending("a\rb"), "ab");
        assert_eq!(strip_line_ending(&strip_line_ending("x\n")), "x");
    }
}
