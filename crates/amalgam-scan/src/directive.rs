//! Include directive matching
//!
//! Recognizes `#include <...>` and `#include "..."` on a single line. The
//! token may only contain word characters, dots and path separators, so
//! macro includes and includes with embedded comments are plain text.
//!
//! Lines end at `\n`, `\r\n` or a bare `\r`.

use regex::Regex;

const INCLUDE_PATTERN: &str = r#"#include\s*[<"]([\w.\\/]*)[>"]"#;

/// Single-line include directive matcher
#[derive(Debug, Clone)]
pub struct IncludeMatcher {
    pattern: Regex,
}

impl IncludeMatcher {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(INCLUDE_PATTERN).unwrap(),
        }
    }

    /// Extract the include token from a line, if any
    pub fn token<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Whether the line is an include directive
    pub fn is_include(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    /// All include tokens in a file, in line order
    pub fn tokens(&self, source: &str) -> Vec<String> {
        source_lines(source)
            .filter_map(|line| self.token(line))
            .map(str::to_string)
            .collect()
    }
}

/// Lines of a source file, each with its original terminator
pub fn source_lines(source: &str) -> SourceLines<'_> {
    SourceLines { rest: source }
}

/// Iterator returned by [`source_lines`]
#[derive(Debug, Clone)]
pub struct SourceLines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for SourceLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        let end = match self.rest.find(|c: char| c == '\r' || c == '\n') {
            Some(i) if self.rest[i..].starts_with("\r\n") => i + 2,
            Some(i) => i + 1,
            None => self.rest.len(),
        };
        let (line, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(line)
    }
}

impl Default for IncludeMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_and_angled() {
        let matcher = IncludeMatcher::new();
        assert_eq!(matcher.token(r#"#include "a.hpp""#), Some("a.hpp"));
        assert_eq!(matcher.token("#include <vector>"), Some("vector"));
        assert_eq!(matcher.token("#include<detail/impl.inl>"), Some("detail/impl.inl"));
        assert_eq!(matcher.token(r#"  #  include "x.h""#), None);
        assert_eq!(matcher.token(r#"#include "../common/x.h""#), Some("../common/x.h"));
    }

    #[test]
    fn test_unanchored_match() {
        let matcher = IncludeMatcher::new();
        // Indented directives and trailing comments still match
        assert_eq!(matcher.token(r#"    #include "a.h" // first"#), Some("a.h"));
        assert!(matcher.is_include(r#"// #include "old.h""#));
    }

    #[test]
    fn test_non_conforming_includes() {
        let matcher = IncludeMatcher::new();
        assert_eq!(matcher.token("#include PLATFORM_HEADER"), None);
        assert_eq!(matcher.token(r#"#include "a/*b*/.h""#), None);
        assert_eq!(matcher.token("#include <my-header.h>"), None);
        assert_eq!(matcher.token("int main() {}"), None);
    }

    #[test]
    fn test_tokens_in_order() {
        let matcher = IncludeMatcher::new();
        let source = "#include \"b.hpp\"\n#include <vector>\nint x;\n#include \"a.hpp\"\r\n";
        assert_eq!(matcher.tokens(source), vec!["b.hpp", "vector", "a.hpp"]);
    }

    #[test]
    fn test_carriage_return_line_endings() {
        let matcher = IncludeMatcher::new();
        let source = "#include \"a.h\"\r#include \"b.h\"\rint x = 1;\r";
        assert_eq!(matcher.tokens(source), vec!["a.h", "b.h"]);
    }

    #[test]
    fn test_source_lines_keep_terminators() {
        let lines: Vec<_> = source_lines("a\nb\r\nc\rd").collect();
        assert_eq!(lines, vec!["a\n", "b\r\n", "c\r", "d"]);

        let lines: Vec<_> = source_lines("\r\n\n\r").collect();
        assert_eq!(lines, vec!["\r\n", "\n", "\r"]);

        assert_eq!(source_lines("").count(), 0);
    }
}
