//! Metadata Extractor
//!
//! Recognizes the reserved `FX_METADATA(({ role: [NAME, IMPL] }))` marker and
//! `FX_INTERFACE(NAME)` usage tokens in C-like source text. This is a
//! dedicated lightweight scanner, not a C parser: string and character
//! literals are masked so a marker inside a literal is never recognized, and
//! everything else is matched by exact reserved token.

use std::collections::BTreeSet;
use std::path::Path;

use crate::domain::error::{ConfigureError, Result};
use crate::domain::module::{FileScan, ModuleDeclaration, Role};

/// The declaration marker. The `((` opener is part of the token: a comment
/// that merely mentions FX_METADATA is not a marker.
pub const METADATA_MARKER: &str = "FX_METADATA((";

/// The usage-position token requesting an interface.
pub const INTERFACE_MARKER: &str = "FX_INTERFACE(";

/// Scan one file's text. Pure: text in, `FileScan` out.
///
/// Absence of the declaration marker is not an error (the file is plain
/// support code); a recognized marker with a malformed payload is.
pub fn scan_file(path: &Path, text: &str) -> Result<FileScan> {
    let masked = mask_literals(text);

    let declaration = match find_token(&masked, METADATA_MARKER, 0) {
        // First marker is binding; later markers are ignored.
        Some(offset) => Some(parse_declaration(path, &masked, offset)?),
        None => None,
    };

    Ok(FileScan {
        path: path.to_path_buf(),
        declaration,
        references: scan_references(&masked),
    })
}

/// Collect the deduplicated set of `FX_INTERFACE(NAME)` references.
/// Repeated references within one file count once.
pub fn scan_references(masked: &str) -> BTreeSet<String> {
    let mut refs = BTreeSet::new();
    let mut from = 0;
    while let Some(at) = find_token(masked, INTERFACE_MARKER, from) {
        let mut cursor = Cursor::new(masked, at + INTERFACE_MARKER.len());
        cursor.skip_ws();
        // A usage site that does not fit `FX_INTERFACE(ident)` is left for
        // the compiler to reject; it is not a reference.
        if let Some(name) = cursor.read_ident() {
            cursor.skip_ws();
            if cursor.eat(')') {
                refs.insert(name);
            }
        }
        from = at + INTERFACE_MARKER.len();
    }
    refs
}

/// Parse the payload following a marker at `offset`:
/// `{ role: [ NAME , IMPL ] }))` with arbitrary interior whitespace.
fn parse_declaration(path: &Path, masked: &str, offset: usize) -> Result<ModuleDeclaration> {
    let fail = |reason: &str| ConfigureError::MetadataSyntax {
        path: path.to_path_buf(),
        offset,
        reason: reason.to_string(),
    };

    let mut cursor = Cursor::new(masked, offset + METADATA_MARKER.len());
    cursor.skip_ws();
    if !cursor.eat('{') {
        return Err(fail("expected '{' after FX_METADATA(("));
    }
    cursor.skip_ws();
    let keyword = cursor.read_ident().ok_or_else(|| fail("expected role keyword"))?;
    let role = Role::from_keyword(&keyword)
        .ok_or_else(|| fail(&format!("unknown role '{keyword}' (expected interface or implementation)")))?;
    cursor.skip_ws();
    if !cursor.eat(':') {
        return Err(fail("expected ':' after role keyword"));
    }
    cursor.skip_ws();
    if !cursor.eat('[') {
        return Err(fail("expected '[' opening the name pair"));
    }
    cursor.skip_ws();
    let interface = cursor.read_ident().ok_or_else(|| fail("expected interface name"))?;
    cursor.skip_ws();
    if !cursor.eat(',') {
        return Err(fail("expected ',' between interface and implementation names"));
    }
    cursor.skip_ws();
    let implementation = cursor.read_ident().ok_or_else(|| fail("expected implementation name"))?;
    cursor.skip_ws();
    if !cursor.eat(']') {
        return Err(fail("expected ']' closing the name pair"));
    }
    cursor.skip_ws();
    if !cursor.eat('}') {
        return Err(fail("expected '}' closing the payload"));
    }
    cursor.skip_ws();
    if !(cursor.eat(')') && cursor.eat(')')) {
        return Err(fail("expected '))' closing the marker"));
    }

    Ok(ModuleDeclaration {
        path: path.to_path_buf(),
        role,
        interface,
        implementation,
    })
}

/// Find `token` at or after `from`, requiring a non-identifier character (or
/// start of text) before it so `MY_FX_INTERFACE(` does not match.
fn find_token(text: &str, token: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut search_from = from;
    while let Some(rel) = text[search_from..].find(token) {
        let at = search_from + rel;
        let boundary = at == 0 || !is_ident_byte(bytes[at - 1]);
        if boundary {
            return Some(at);
        }
        search_from = at + 1;
    }
    None
}

fn is_ident_byte(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

/// Replace the interiors of string and character literals with spaces,
/// preserving text length so byte offsets stay valid. Comment text passes
/// through untouched (recognition is by exact token, not comment scanning),
/// but comments are tracked so an apostrophe in one does not open a
/// character literal.
fn mask_literals(text: &str) -> String {
    #[derive(PartialEq)]
    enum State {
        Code,
        Str,
        Chr,
        LineComment,
        BlockComment,
    }

    let bytes = text.as_bytes();
    let mut out = bytes.to_vec();
    let mut state = State::Code;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match state {
            State::Code => match b {
                b'"' => state = State::Str,
                b'\'' => state = State::Chr,
                b'/' if bytes.get(i + 1) == Some(&b'/') => {
                    state = State::LineComment;
                    i += 1;
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    state = State::BlockComment;
                    i += 1;
                }
                _ => {}
            },
            State::Str => match b {
                b'\\' => {
                    out[i] = b' ';
                    if i + 1 < bytes.len() && bytes[i + 1] != b'\n' {
                        out[i + 1] = b' ';
                        i += 1;
                    }
                }
                b'"' => state = State::Code,
                b'\n' => state = State::Code, // unterminated literal; resync
                _ => out[i] = b' ',
            },
            State::Chr => match b {
                b'\\' => {
                    out[i] = b' ';
                    if i + 1 < bytes.len() && bytes[i + 1] != b'\n' {
                        out[i + 1] = b' ';
                        i += 1;
                    }
                }
                b'\'' => state = State::Code,
                b'\n' => state = State::Code,
                _ => out[i] = b' ',
            },
            State::LineComment => {
                if b == b'\n' {
                    state = State::Code;
                }
            }
            State::BlockComment => {
                if b == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    state = State::Code;
                    i += 1;
                }
            }
        }
        i += 1;
    }

    // Masking only ever writes ASCII spaces over existing bytes, so the
    // result is valid UTF-8 whenever the input was.
    String::from_utf8(out).unwrap_or_else(|e| {
        String::from_utf8_lossy(e.as_bytes()).into_owned()
    })
}

/// Minimal character cursor over the masked text.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, pos: usize) -> Self {
        Self { bytes: text.as_bytes(), pos }
    }

    fn skip_ws(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, c: char) -> bool {
        if self.bytes.get(self.pos) == Some(&(c as u8)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn read_ident(&mut self) -> Option<String> {
        let start = self.pos;
        if let Some(&b) = self.bytes.get(self.pos) {
            if b == b'_' || b.is_ascii_alphabetic() {
                self.pos += 1;
                while self.pos < self.bytes.len() && is_ident_byte(self.bytes[self.pos]) {
                    self.pos += 1;
                }
                return Some(String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned());
            }
        }
        None
    }
}
