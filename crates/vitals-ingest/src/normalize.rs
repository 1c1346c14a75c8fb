//! Document normalization.
//!
//! Monitor exports arrive as rich text. Normalization turns them into one
//! flat line of text suitable for pattern scanning:
//!
//! 1. decode the bytes as UTF-8
//! 2. if the document is RTF, drop control words and destination groups
//! 3. replace braces, backslashes and tabs with spaces
//! 4. collapse every whitespace run, newlines included, into one space
//!
//! Plain-text input skips step 2.

use std::path::Path;

use encoding_rs::{
    BIG5, EUC_KR, Encoding, GBK, KOI8_R, MACINTOSH, SHIFT_JIS, UTF_8, WINDOWS_874, WINDOWS_1250,
    WINDOWS_1251, WINDOWS_1252, WINDOWS_1253, WINDOWS_1254, WINDOWS_1255, WINDOWS_1256,
    WINDOWS_1257, WINDOWS_1258,
};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Read and normalize an export file.
///
/// A read or decode failure aborts before any text is produced.
pub fn read_export(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::read(path, source))?;
    let text = String::from_utf8(bytes).map_err(|source| IngestError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let normalized = normalize_text(&text);
    debug!(
        path = %path.display(),
        raw_len = text.len(),
        normalized_len = normalized.len(),
        rtf = is_rtf(&text),
        "export normalized"
    );
    Ok(normalized)
}

/// Normalize already-decoded document text.
pub fn normalize_text(raw: &str) -> String {
    if is_rtf(raw) {
        collapse(&rtf_to_text(raw))
    } else {
        collapse(raw)
    }
}

/// Whether the text is an RTF document.
pub fn is_rtf(raw: &str) -> bool {
    raw.trim_start().starts_with("{\\rtf")
}

fn collapse(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || matches!(c, '{' | '}' | '\\'))
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Groups whose content is never document text.
const SKIPPED_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "stylesheet",
    "info",
    "pict",
    "header",
    "footer",
    "listtable",
    "listoverridetable",
    "themedata",
    "datastore",
    "latentstyles",
    "generator",
];

/// Character set of `\'hh` escapes for an `\ansicpgN` code page.
fn code_page_encoding(code_page: i32) -> Option<&'static Encoding> {
    let encoding = match code_page {
        437 | 1252 | 28591 => WINDOWS_1252,
        874 => WINDOWS_874,
        932 => SHIFT_JIS,
        936 => GBK,
        949 => EUC_KR,
        950 => BIG5,
        1250 => WINDOWS_1250,
        1251 => WINDOWS_1251,
        1253 => WINDOWS_1253,
        1254 => WINDOWS_1254,
        1255 => WINDOWS_1255,
        1256 => WINDOWS_1256,
        1257 => WINDOWS_1257,
        1258 => WINDOWS_1258,
        10000 => MACINTOSH,
        20866 => KOI8_R,
        65001 => UTF_8,
        _ => return None,
    };
    Some(encoding)
}

/// Per-group RTF state restored when the group closes.
#[derive(Clone, Copy)]
struct GroupState {
    skipping: bool,
    /// Fallback characters that follow each `\uN` (`\ucN`, default 1).
    unicode_skip: usize,
}

struct TextSink {
    out: String,
    encoding: &'static Encoding,
    bytes: Vec<u8>,
    pending_fallback: usize,
}

impl TextSink {
    /// Decode buffered `\'hh` bytes; multi-byte code pages need the whole run.
    fn flush(&mut self) {
        if self.bytes.is_empty() {
            return;
        }
        let (text, _) = self.encoding.decode_without_bom_handling(&self.bytes);
        self.out.push_str(&text);
        self.bytes.clear();
    }

    /// Consume one fallback unit. Returns false when none is pending.
    fn take_fallback(&mut self) -> bool {
        if self.pending_fallback == 0 {
            return false;
        }
        self.pending_fallback -= 1;
        true
    }

    fn text(&mut self, c: char, state: GroupState) {
        self.flush();
        if !self.take_fallback() && !state.skipping {
            self.out.push(c);
        }
    }

    fn byte(&mut self, byte: u8, state: GroupState) {
        if !self.take_fallback() && !state.skipping {
            self.bytes.push(byte);
        }
    }

    fn control(&mut self, c: char, state: GroupState) {
        self.flush();
        if !state.skipping {
            self.out.push(c);
        }
    }
}

/// Extract the visible text of an RTF document.
///
/// Paragraph, line, cell and row breaks become newlines and `\tab` becomes a
/// tab. Hex escapes are decoded with the document's `\ansicpgN` code page
/// (Windows-1252 when absent). After `\uN` the number of fallback characters
/// given by the enclosing `\ucN` is dropped.
pub fn rtf_to_text(source: &str) -> String {
    let mut sink = TextSink {
        out: String::with_capacity(source.len() / 2),
        encoding: WINDOWS_1252,
        bytes: Vec::new(),
        pending_fallback: 0,
    };
    let mut chars = source.chars().peekable();
    let mut group_stack: Vec<GroupState> = Vec::new();
    let mut state = GroupState {
        skipping: false,
        unicode_skip: 1,
    };

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                sink.flush();
                group_stack.push(state);
            }
            '}' => {
                sink.flush();
                sink.pending_fallback = 0;
                state = group_stack.pop().unwrap_or(GroupState {
                    skipping: false,
                    unicode_skip: 1,
                });
            }
            '\r' | '\n' => {}
            '\\' => {
                let Some(&next) = chars.peek() else { break };
                if next.is_ascii_alphabetic() {
                    let mut word = String::new();
                    while let Some(&ch) = chars.peek() {
                        if !ch.is_ascii_alphabetic() {
                            break;
                        }
                        word.push(ch);
                        chars.next();
                    }
                    let mut digits = String::new();
                    if chars.peek() == Some(&'-') {
                        digits.push('-');
                        chars.next();
                    }
                    while let Some(&ch) = chars.peek() {
                        if !ch.is_ascii_digit() {
                            break;
                        }
                        digits.push(ch);
                        chars.next();
                    }
                    if chars.peek() == Some(&' ') {
                        chars.next();
                    }
                    let param = digits.parse::<i32>().ok();

                    match word.as_str() {
                        "par" | "line" | "row" | "cell" | "sect" | "page" => {
                            sink.control('\n', state);
                        }
                        "tab" => sink.control('\t', state),
                        "u" => {
                            if let Some(code) = param {
                                let code = if code < 0 { code + 65_536 } else { code };
                                if let Some(ch) = u32::try_from(code).ok().and_then(char::from_u32)
                                {
                                    sink.control(ch, state);
                                }
                                sink.pending_fallback = state.unicode_skip;
                            }
                        }
                        "uc" => {
                            state.unicode_skip = param
                                .and_then(|n| usize::try_from(n).ok())
                                .unwrap_or(1);
                        }
                        "ansicpg" => match param.and_then(code_page_encoding) {
                            Some(encoding) => {
                                sink.flush();
                                sink.encoding = encoding;
                            }
                            None => debug!(code_page = ?param, "unknown RTF code page"),
                        },
                        word if SKIPPED_DESTINATIONS.contains(&word) => state.skipping = true,
                        _ => {}
                    }
                } else {
                    chars.next();
                    match next {
                        '\\' | '{' | '}' => sink.text(next, state),
                        '\'' => {
                            let hex: String = chars.by_ref().take(2).collect();
                            if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                                sink.byte(byte, state);
                            }
                        }
                        '*' => state.skipping = true,
                        '~' => sink.text(' ', state),
                        '\r' | '\n' => sink.control('\n', state),
                        _ => {}
                    }
                }
            }
            _ => sink.text(c, state),
        }
    }
    sink.flush();
    sink.out
}
