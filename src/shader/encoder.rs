//! Byte-stream encoding of flattened stages

use std::path::Path;

use crate::constants::encoding;

use super::diagnostics::{Diagnostic, Diagnostics};
use super::stage::Stage;

/// Character codes of one stage, sentinel included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteStream {
    codes: Vec<u32>,
}

impl ByteStream {
    /// Every code, ending with the sentinel
    pub fn codes(&self) -> &[u32] {
        &self.codes
    }

    /// Codes before the sentinel
    pub fn body(&self) -> &[u32] {
        &self.codes[..self.codes.len() - 1]
    }

    pub fn sentinel(&self) -> u32 {
        encoding::SENTINEL_CODE
    }
}

/// Encode `lines` as character codes, one newline after each line and a zero
/// sentinel at the end
///
/// Characters above 255 are reported against `file` but still emitted verbatim.
pub fn encode_stage(
    file: &Path,
    stage: Stage,
    lines: &[String],
    diagnostics: &mut Diagnostics,
) -> ByteStream {
    let capacity = lines.iter().map(|line| line.len() + 1).sum::<usize>() + 1;
    let mut codes = Vec::with_capacity(capacity);

    for (line_index, line) in lines.iter().enumerate() {
        for (column_index, character) in line.chars().enumerate() {
            let code = u32::from(character);
            if code > encoding::MAX_BYTE_CODE {
                diagnostics.report(Diagnostic::CharacterOutOfRange {
                    file: file.to_path_buf(),
                    stage,
                    line: line_index + 1,
                    column: column_index + 1,
                    code,
                    character,
                    line_text: line.clone(),
                });
            }
            codes.push(code);
        }
        codes.push(encoding::NEWLINE_CODE);
    }
    codes.push(encoding::SENTINEL_CODE);

    ByteStream { codes }
}

/// Encode `text` verbatim (newlines included) followed by the sentinel
pub fn encode_text(text: &str) -> ByteStream {
    let mut codes: Vec<u32> = text.chars().map(u32::from).collect();
    codes.push(encoding::SENTINEL_CODE);
    ByteStream { codes }
}
