//! Shader source reading
//!
//! Lines are split with universal-newline rules: `\n`, `\r\n` and a lone `\r`
//! all terminate a line, so sources edited on any platform flatten to the same
//! bytes.

use std::fs;
use std::io;
use std::path::Path;

/// Read a shader source file as UTF-8 text
pub fn read_source(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
}

/// One line of a source file, without its terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalLine<'a> {
    pub text: &'a str,
    /// Whether the line ended with a terminator (false only for a final
    /// unterminated line)
    pub terminated: bool,
}

/// Iterate over the physical lines of `source`
pub fn physical_lines(source: &str) -> PhysicalLines<'_> {
    PhysicalLines { rest: source }
}

pub struct PhysicalLines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for PhysicalLines<'a> {
    type Item = PhysicalLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        match self.rest.find(['\n', '\r']) {
            Some(end) => {
                let text = &self.rest[..end];
                let after = if self.rest[end..].starts_with("\r\n") {
                    end + 2
                } else {
                    end + 1
                };
                self.rest = &self.rest[after..];
                Some(PhysicalLine {
                    text,
                    terminated: true,
                })
            }
            None => {
                let text = self.rest;
                self.rest = "";
                Some(PhysicalLine {
                    text,
                    terminated: false,
                })
            }
        }
    }
}
