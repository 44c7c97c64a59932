//! Escape-Aware Text Primitives
//!
//! Lines handed to the compositor carry their styling inline as terminal
//! escape sequences. Everything in this module measures and cuts by display
//! column, never by byte offset, and never splits an escape sequence.
//!
//! # Splicing
//!
//! Cutting a styled line in the middle of a colored run would otherwise leak
//! that color into whatever gets glued next to it. Every function that
//! returns a fragment therefore:
//! - re-emits the SGR state that was active where the fragment starts, and
//! - terminates the fragment with a reset if any style is still open.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// SGR reset
pub const RESET: &str = "\x1b[0m";

const ESC: u8 = 0x1b;
const BEL: u8 = 0x07;

/// A lexical piece of a styled line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// A complete escape sequence (zero display width)
    Escape(&'a str),
    /// One grapheme cluster and the columns it occupies
    Text { grapheme: &'a str, width: usize },
}

/// Split a line into escape sequences and grapheme clusters
pub fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = line;

    while !rest.is_empty() {
        if rest.as_bytes()[0] == ESC {
            let len = escape_len(rest);
            tokens.push(Token::Escape(&rest[..len]));
            rest = &rest[len..];
            continue;
        }

        let run_end = rest.find('\x1b').unwrap_or(rest.len());
        for grapheme in rest[..run_end].graphemes(true) {
            tokens.push(Token::Text {
                grapheme,
                width: grapheme.width(),
            });
        }
        rest = &rest[run_end..];
    }

    tokens
}

/// Byte length of the escape sequence at the start of `rest`
///
/// Recognizes CSI (`ESC [ ... final`), OSC (`ESC ] ... BEL` or `ESC ] ... ESC \`)
/// and two-character escapes. Unterminated sequences swallow the rest of the line.
fn escape_len(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    match bytes.get(1) {
        None => 1,
        Some(b'[') => bytes
            .iter()
            .enumerate()
            .skip(2)
            .find(|(_, b)| (0x40..=0x7e).contains(*b))
            .map_or(bytes.len(), |(i, _)| i + 1),
        Some(b']') => {
            let mut i = 2;
            while i < bytes.len() {
                if bytes[i] == BEL {
                    return i + 1;
                }
                if bytes[i] == ESC && bytes.get(i + 1) == Some(&b'\\') {
                    return i + 2;
                }
                i += 1;
            }
            bytes.len()
        }
        Some(_) => 1 + rest[1..].chars().next().map_or(0, char::len_utf8),
    }
}

/// Whether an escape sequence is Select Graphic Rendition
pub fn is_sgr(seq: &str) -> bool {
    seq.starts_with("\x1b[") && seq.ends_with('m')
}

fn sgr_params(seq: &str) -> &str {
    &seq[2..seq.len() - 1]
}

/// Whether an SGR sequence clears all attributes (possibly setting new ones after)
pub fn resets_style(seq: &str) -> bool {
    if !is_sgr(seq) {
        return false;
    }
    let first = sgr_params(seq).split([';', ':']).next().unwrap_or("");
    first.chars().all(|c| c == '0')
}

/// Whether an SGR sequence does nothing but reset
fn is_pure_reset(seq: &str) -> bool {
    is_sgr(seq)
        && sgr_params(seq)
            .split(';')
            .all(|p| p.chars().all(|c| c == '0'))
}

/// Whether an SGR sequence cancels intensity or either color
///
/// True for resets and for codes 22, 39 and 49. The arguments of extended
/// colors (`38;5;n`, `48;2;r;g;b`) are skipped, not read as codes.
fn clears_backdrop(seq: &str) -> bool {
    if !is_sgr(seq) {
        return false;
    }

    let mut params = sgr_params(seq).split(';');
    while let Some(param) = params.next() {
        let code = match param.split(':').next().unwrap_or("") {
            "" => 0,
            head => head.parse::<u16>().unwrap_or(u16::MAX),
        };
        match code {
            0 | 22 | 39 | 49 => return true,
            38 | 48 if !param.contains(':') => match params.next() {
                Some("5") => {
                    params.next();
                }
                Some("2") => {
                    params.nth(2);
                }
                _ => {}
            },
            _ => {}
        }
    }
    false
}

/// Tracks the SGR sequences in effect at a point in a line
#[derive(Debug, Default)]
struct StyleState<'a> {
    active: Vec<&'a str>,
}

impl<'a> StyleState<'a> {
    fn apply(&mut self, seq: &'a str) {
        if !is_sgr(seq) {
            return;
        }
        if resets_style(seq) {
            self.active.clear();
        }
        if !is_pure_reset(seq) {
            self.active.push(seq);
        }
    }

    fn is_styled(&self) -> bool {
        !self.active.is_empty()
    }

    fn restore(&self) -> String {
        self.active.concat()
    }
}

/// Remove every escape sequence
pub fn strip(line: &str) -> String {
    tokenize(line)
        .into_iter()
        .filter_map(|t| match t {
            Token::Text { grapheme, .. } => Some(grapheme),
            Token::Escape(_) => None,
        })
        .collect()
}

/// Terminal columns occupied by a line, ignoring escape sequences
pub fn display_width(line: &str) -> usize {
    tokenize(line)
        .into_iter()
        .map(|t| match t {
            Token::Text { width, .. } => width,
            Token::Escape(_) => 0,
        })
        .sum()
}

/// Keep the first `cols` display columns
///
/// A wide grapheme straddling the limit is replaced with spaces so the result
/// is exactly `cols` wide whenever the input was at least that wide.
pub fn truncate(line: &str, cols: usize) -> String {
    let mut out = String::new();
    let mut state = StyleState::default();
    let mut col = 0;

    for token in tokenize(line) {
        if col >= cols {
            break;
        }
        match token {
            Token::Escape(seq) => {
                state.apply(seq);
                out.push_str(seq);
            }
            Token::Text { grapheme, width } => {
                if col + width > cols {
                    out.push_str(&" ".repeat(cols - col));
                    col = cols;
                } else {
                    out.push_str(grapheme);
                    col += width;
                }
            }
        }
    }

    if state.is_styled() {
        out.push_str(RESET);
    }
    out
}

/// Drop the first `cols` display columns
///
/// The style active at the cut point is re-emitted in front of the remainder.
/// The visible half of a wide grapheme split by the cut becomes spaces.
pub fn truncate_left(line: &str, cols: usize) -> String {
    let mut out = String::new();
    let mut state = StyleState::default();
    let mut col = 0;
    let mut started = false;

    for token in tokenize(line) {
        match token {
            Token::Escape(seq) => {
                state.apply(seq);
                if started {
                    out.push_str(seq);
                }
            }
            Token::Text { grapheme, width } => {
                if started {
                    out.push_str(grapheme);
                } else if col >= cols {
                    started = true;
                    out.push_str(&state.restore());
                    out.push_str(grapheme);
                } else if col + width > cols {
                    started = true;
                    out.push_str(&state.restore());
                    out.push_str(&" ".repeat(col + width - cols));
                }
                col += width;
            }
        }
    }

    if started && state.is_styled() {
        out.push_str(RESET);
    }
    out
}

/// Columns `from..to` of a line
pub fn cut(line: &str, from: usize, to: usize) -> String {
    if to <= from {
        return String::new();
    }
    truncate(&truncate_left(line, from), to - from)
}

/// Render a line through an SGR prefix
///
/// The prefix is re-asserted after every sequence inside the line that could
/// cancel it: resets, normal intensity and default colors. Visible content is
/// left untouched.
pub fn restyle(line: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(line.len() + prefix.len() * 2 + RESET.len());
    out.push_str(prefix);
    for token in tokenize(line) {
        match token {
            Token::Escape(seq) => {
                out.push_str(seq);
                if clears_backdrop(seq) {
                    out.push_str(prefix);
                }
            }
            Token::Text { grapheme, .. } => out.push_str(grapheme),
        }
    }
    out.push_str(RESET);
    out
}
