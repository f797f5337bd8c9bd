//! SV header parser: given preprocessor-cleaned text, locates the first
//! top-level module and extracts its name, parameter list, and port list
//! (ANSI and non-ANSI styles) into a `Module`.
//!
//! No tokenizer sits between the cleaned text and this parser; instead the
//! parser works directly off balanced-delimiter scans the way a
//! hand-written recursive-descent reader would, since balanced-delimiter
//! awareness is the whole contract, not a specific lexical representation.

use std::path::{Path, PathBuf};

use crate::error::{Error, Hint};
use crate::model::port::{Direction, Endianness, Expr, Range};
use crate::model::{Module, Parameter, Port};
use crate::report::{Diagnostic, Report};

pub fn parse_module(cleaned: &str, source_file: &Path, report: &mut Report) -> Result<Module, Error> {
    let chars: Vec<char> = cleaned.chars().collect();
    let mod_start = match find_word(&chars, "module", 0) {
        Some(i) => i,
        None => {
            return Err(Error::NoModuleFound(
                source_file.to_path_buf(),
                Hint::CheckModuleKeyword,
            ))
        }
    };

    let mut i = skip_ws(&chars, mod_start + "module".len());
    let (name, mut i2) = read_ident(&chars, i);
    if name.is_empty() {
        return Err(Error::NoModuleFound(
            source_file.to_path_buf(),
            Hint::CheckModuleKeyword,
        ));
    }
    i = skip_ws(&chars, i2);

    let mut parameters = Vec::new();
    if chars.get(i) == Some(&'#') {
        i = skip_ws(&chars, i + 1);
        if chars.get(i) == Some(&'(') {
            let (inner, end) = extract_balanced(&chars, i);
            parameters = parse_parameters(&inner, report);
            i = end;
        }
    }
    i = skip_ws(&chars, i);

    let mut ansi_ports = Vec::new();
    let mut bare_names: Vec<String> = Vec::new();
    let mut is_ansi = true;
    if chars.get(i) == Some(&'(') {
        let (inner, end) = extract_balanced(&chars, i);
        let (parsed, bare, ansi) = parse_port_list_header(&inner, report);
        ansi_ports = parsed;
        bare_names = bare;
        is_ansi = ansi;
        i = end;
    }
    i2 = skip_ws(&chars, i);
    if chars.get(i2) == Some(&';') {
        i2 += 1;
    }

    let endmodule_idx = find_word(&chars, "endmodule", i2).unwrap_or(chars.len());
    let body: String = chars[i2..endmodule_idx].iter().collect();

    let ports = if is_ansi {
        ansi_ports
    } else {
        parse_nonansi_ports(&body, &bare_names, report)
    };

    Ok(Module {
        name,
        parameters,
        ports,
        source_file: PathBuf::from(source_file),
    })
}

// ---------------------------------------------------------------------
// character-class helpers
// ---------------------------------------------------------------------

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn skip_ws(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    i
}

fn read_ident(chars: &[char], start: usize) -> (String, usize) {
    let mut i = start;
    if i >= chars.len() || !is_ident_start(chars[i]) {
        return (String::new(), start);
    }
    let begin = i;
    i += 1;
    while i < chars.len() && is_ident_char(chars[i]) {
        i += 1;
    }
    (chars[begin..i].iter().collect(), i)
}

/// Finds the first standalone occurrence of `word` at or after `from`,
/// bounded on both sides by non-identifier characters (so `module` never
/// matches inside `endmodule`).
fn find_word(chars: &[char], word: &str, from: usize) -> Option<usize> {
    let wlen = word.len();
    let word_chars: Vec<char> = word.chars().collect();
    let mut i = from;
    while i + wlen <= chars.len() {
        if chars[i..i + wlen] == word_chars[..] {
            let before_ok = i == 0 || !is_ident_char(chars[i - 1]);
            let after_ok = i + wlen >= chars.len() || !is_ident_char(chars[i + wlen]);
            if before_ok && after_ok {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// Scans from `chars[open]` (expected to be an opening delimiter) to its
/// matching close, treating `(`, `[`, `{` uniformly as "open" and `)`, `]`,
/// `}` as "close" so nested mixed delimiters and commas inside them never
/// confuse the caller.
///
/// Returns the inner text (exclusive of the outer pair) and the index just
/// past the matching close delimiter.
fn extract_balanced(chars: &[char], open: usize) -> (String, usize) {
    let mut depth = 0i32;
    let mut i = open;
    let mut in_str = false;
    let begin = open + 1;
    loop {
        if i >= chars.len() {
            return (chars[begin..i].iter().collect(), i);
        }
        let c = chars[i];
        if in_str {
            if c == '\\' {
                i += 2;
                continue;
            }
            if c == '"' {
                in_str = false;
            }
            i += 1;
            continue;
        }
        match c {
            '"' => in_str = true,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth -= 1;
                if depth == 0 {
                    return (chars[begin..i].iter().collect(), i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
}

/// Splits `s` on top-level (depth-0) occurrences of `sep`, respecting
/// nested `()`/`[]`/`{}` and double-quoted strings.
fn split_top_level(s: &str, sep: char) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut in_str = false;
    let mut start = 0usize;
    let mut i = 0usize;
    while i < chars.len() {
        let c = chars[i];
        if in_str {
            if c == '\\' {
                i += 2;
                continue;
            }
            if c == '"' {
                in_str = false;
            }
            i += 1;
            continue;
        }
        match c {
            '"' => in_str = true,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            _ if c == sep && depth == 0 => {
                out.push(chars[start..i].iter().collect());
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    out.push(chars[start..].iter().collect());
    out
}

/// Finds the first top-level `=` in `s`, returning the text before it and
/// the text after (None if no top-level `=` exists).
fn split_first_top_level_eq(s: &str) -> (String, Option<String>) {
    let chars: Vec<char> = s.chars().collect();
    let mut depth = 0i32;
    let mut in_str = false;
    let mut i = 0usize;
    while i < chars.len() {
        let c = chars[i];
        if in_str {
            if c == '\\' {
                i += 2;
                continue;
            }
            if c == '"' {
                in_str = false;
            }
            i += 1;
            continue;
        }
        match c {
            '"' => in_str = true,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            '=' if depth == 0 => {
                // avoid splitting on ==, <=, >=, !=
                let prev = if i > 0 { chars[i - 1] } else { '\0' };
                let next = chars.get(i + 1).copied().unwrap_or('\0');
                if next == '=' || matches!(prev, '<' | '>' | '!' | '=') {
                    i += 1;
                    continue;
                }
                let before: String = chars[..i].iter().collect();
                let after: String = chars[i + 1..].iter().collect();
                return (before, Some(after));
            }
            _ => {}
        }
        i += 1;
    }
    (s.to_string(), None)
}

fn strip_prefix_word<'a>(s: &'a str, word: &str) -> Option<&'a str> {
    let trimmed = s.trim_start();
    if trimmed.starts_with(word) {
        let rest = &trimmed[word.len()..];
        if rest.is_empty() || !is_ident_char(rest.chars().next().unwrap()) {
            return Some(rest);
        }
    }
    None
}

// ---------------------------------------------------------------------
// parameter list
// ---------------------------------------------------------------------

fn parse_parameters(list_text: &str, report: &mut Report) -> Vec<Parameter> {
    let mut current_is_localparam = false;
    let mut out = Vec::new();
    for raw_entry in split_top_level(list_text, ',') {
        let entry = raw_entry.trim();
        if entry.is_empty() {
            continue;
        }
        let mut rest = entry;
        if let Some(r) = strip_prefix_word(rest, "localparam") {
            current_is_localparam = true;
            rest = r.trim_start();
        } else if let Some(r) = strip_prefix_word(rest, "parameter") {
            current_is_localparam = false;
            rest = r.trim_start();
        }
        let (prefix, default) = split_first_top_level_eq(rest);
        let (type_tag, name) = split_name_and_type(prefix.trim());
        if name.is_empty() {
            report.push(Diagnostic::MalformedParameter {
                text: entry.to_string(),
                reason: "could not locate a parameter name".to_string(),
            });
            continue;
        }
        out.push(Parameter {
            name,
            type_tag,
            default: default.map(|d| Expr::new(d.trim())),
            is_localparam: current_is_localparam,
        });
    }
    out
}

/// Separates a declaration prefix (everything before an optional `= expr`)
/// into its trailing identifier (the name) and whatever type-spec tokens
/// preceded it, e.g. `"logic [W-1:0] FOO"` -> (`Some("logic [W-1:0]")`, `"FOO"`).
fn split_name_and_type(prefix: &str) -> (Option<String>, String) {
    let words = scan_words_outside_brackets(prefix);
    match words.last() {
        Some((name, start)) => {
            let head = prefix[..*start].trim();
            let type_tag = if head.is_empty() {
                None
            } else {
                Some(head.to_string())
            };
            (type_tag, name.clone())
        }
        None => (None, String::new()),
    }
}

/// Returns every identifier-like run (letters/digits/underscore/`$`/`.`) that
/// sits outside any bracketed group, alongside its byte offset in `s`.
fn scan_words_outside_brackets(s: &str) -> Vec<(String, usize)> {
    let bytes: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut depth = 0i32;
    let mut i = 0usize;
    let mut byte_offset = 0usize;
    let mut offsets = Vec::with_capacity(bytes.len() + 1);
    for c in &bytes {
        offsets.push(byte_offset);
        byte_offset += c.len_utf8();
    }
    offsets.push(byte_offset);

    while i < bytes.len() {
        let c = bytes[i];
        match c {
            '(' | '[' | '{' => {
                depth += 1;
                i += 1;
            }
            ')' | ']' | '}' => {
                depth -= 1;
                i += 1;
            }
            _ if depth == 0 && (is_ident_start(c) || c == '$' || c == '\\') => {
                let start = i;
                i += 1;
                while i < bytes.len() && (is_ident_char(bytes[i]) || bytes[i] == '.') {
                    i += 1;
                }
                let w: String = bytes[start..i].iter().collect();
                words.push((w, offsets[start]));
            }
            _ => i += 1,
        }
    }
    words
}

// ---------------------------------------------------------------------
// ANSI-style port list
// ---------------------------------------------------------------------

#[derive(Clone, Default)]
struct PendingDescriptor {
    direction: Option<Direction>,
    type_token: Option<String>,
    signed: bool,
    packed_range: Option<Range>,
    is_interface_ref: bool,
}

/// Parses the header port list. Returns `(ports, bare_names, is_ansi)`: if
/// every entry is a bare identifier (no direction/type keyword anywhere in
/// the list) the module is treated as non-ANSI and the body must still be
/// scanned to recover directions and types for each name.
fn parse_port_list_header(
    list_text: &str,
    report: &mut Report,
) -> (Vec<Port>, Vec<String>, bool) {
    let entries = split_top_level(list_text, ',');
    let has_direction_kw = entries.iter().any(|e| {
        let words = scan_words_outside_brackets(e.trim());
        words
            .first()
            .map(|(w, _)| is_direction_word(w))
            .unwrap_or(false)
    });

    if !has_direction_kw {
        let bare: Vec<String> = entries
            .iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();
        return (Vec::new(), bare, false);
    }

    let mut pending = PendingDescriptor::default();
    let mut ports = Vec::new();
    for raw_entry in entries {
        let entry = raw_entry.trim();
        if entry.is_empty() {
            continue;
        }
        match parse_one_port_entry(entry, &mut pending) {
            Some(port) => ports.push(port),
            None => report.push(Diagnostic::MalformedPort {
                text: entry.to_string(),
                reason: "missing a port direction and no prior declaration to inherit from"
                    .to_string(),
            }),
        }
    }
    (ports, Vec::new(), true)
}

fn is_direction_word(w: &str) -> bool {
    matches!(w, "input" | "output" | "inout")
}

fn parse_direction_word(w: &str) -> Direction {
    match w {
        "input" => Direction::In,
        "output" => Direction::Out,
        _ => Direction::InOut,
    }
}

const NET_TYPE_WORDS: &[&str] = &[
    "wire", "reg", "logic", "tri", "wand", "wor", "uwire", "tri0", "tri1", "trireg", "supply0",
    "supply1", "var",
];

fn parse_one_port_entry(entry: &str, pending: &mut PendingDescriptor) -> Option<Port> {
    let words = scan_words_outside_brackets(entry);
    if words.is_empty() {
        return None;
    }
    let name = words.last().unwrap().0.clone();
    let name_offset = words.last().unwrap().1;
    let head_words: Vec<&str> = words[..words.len() - 1].iter().map(|(w, _)| w.as_str()).collect();

    let brackets = find_bracket_groups(entry);
    let packed_bracket = brackets
        .iter()
        .filter(|(start, _)| *start < name_offset)
        .last()
        .cloned();
    let unpacked_dims: Vec<Range> = brackets
        .iter()
        .filter(|(start, _)| *start > name_offset)
        .map(|(_, inner)| parse_range(inner))
        .collect();

    let is_continuation = head_words.is_empty() && packed_bracket.is_none();

    let (direction, type_token, signed, packed_range, is_interface_ref) = if is_continuation {
        (
            pending.direction,
            pending.type_token.clone(),
            pending.signed,
            pending.packed_range.clone(),
            pending.is_interface_ref,
        )
    } else {
        let mut idx = 0usize;
        let mut direction = None;
        if idx < head_words.len() && is_direction_word(head_words[idx]) {
            direction = Some(parse_direction_word(head_words[idx]));
            idx += 1;
        }
        let mut signed = false;
        let mut type_parts = Vec::new();
        while idx < head_words.len() {
            match head_words[idx] {
                "signed" => signed = true,
                "unsigned" => signed = false,
                other => type_parts.push(other.to_string()),
            }
            idx += 1;
        }
        let is_interface_ref = type_parts.iter().any(|t| t.contains('.'));
        let type_token = if type_parts.is_empty() {
            None
        } else {
            Some(type_parts.join(" "))
        };
        let packed_range = packed_bracket.as_ref().map(|(_, inner)| parse_range(inner));
        let direction = direction.or(pending.direction);
        (direction, type_token, signed, packed_range, is_interface_ref)
    };

    *pending = PendingDescriptor {
        direction,
        type_token: type_token.clone(),
        signed,
        packed_range: packed_range.clone(),
        is_interface_ref,
    };

    let resolved_direction = if is_interface_ref {
        Direction::InOut
    } else {
        direction?
    };

    Some(Port {
        name,
        direction: resolved_direction,
        signed,
        packed_range,
        unpacked_dims,
        type_token,
        is_interface_ref,
    })
}

/// Returns `(start_char_index, inner_text)` for every balanced `[...]` group
/// in `s`, in order of appearance.
fn find_bracket_groups(s: &str) -> Vec<(usize, String)> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::new();
    let mut i = 0usize;
    while i < chars.len() {
        if chars[i] == '[' {
            let (inner, end) = extract_balanced(&chars, i);
            out.push((i, inner));
            i = end;
        } else {
            i += 1;
        }
    }
    out
}

/// Parses a bracket's inner text (e.g. `"DATA_WIDTH-1:0"`) into a `Range`,
/// preserving whichever side came first as `left`/`right` — little-endian
/// ranges are kept as written rather than normalized to big-endian.
fn parse_range(inner: &str) -> Range {
    let parts = split_top_level(inner, ':');
    if parts.len() == 2 {
        let left = Expr::new(parts[0].trim());
        let right = Expr::new(parts[1].trim());
        let endianness = match (left.as_literal_int(), right.as_literal_int()) {
            (Some(l), Some(r)) if r > l => Endianness::LittleEndian,
            _ => Endianness::BigEndian,
        };
        Range {
            left,
            right,
            endianness,
        }
    } else {
        // a single-value dimension, e.g. an unpacked array size `[8]`
        Range {
            left: Expr::new(inner.trim()),
            right: Expr::new("0"),
            endianness: Endianness::BigEndian,
        }
    }
}

// ---------------------------------------------------------------------
// non-ANSI port list
// ---------------------------------------------------------------------

fn parse_nonansi_ports(body: &str, header_names: &[String], report: &mut Report) -> Vec<Port> {
    let mut found: std::collections::HashMap<String, Port> = std::collections::HashMap::new();

    let chars: Vec<char> = body.chars().collect();
    let mut search_from = 0usize;
    loop {
        let next_kw = ["input", "output", "inout"]
            .iter()
            .filter_map(|kw| find_word(&chars, kw, search_from))
            .min();
        let kw_start = match next_kw {
            Some(i) => i,
            None => break,
        };
        // find terminating ';' at depth 0 from kw_start
        let mut depth = 0i32;
        let mut j = kw_start;
        let mut stmt_end = chars.len();
        while j < chars.len() {
            match chars[j] {
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth -= 1,
                ';' if depth == 0 => {
                    stmt_end = j;
                    break;
                }
                _ => {}
            }
            j += 1;
        }
        let stmt: String = chars[kw_start..stmt_end].iter().collect();
        let mut pending = PendingDescriptor::default();
        for raw_entry in split_top_level(&stmt, ',') {
            let entry = raw_entry.trim();
            if entry.is_empty() {
                continue;
            }
            if let Some(port) = parse_one_port_entry(entry, &mut pending) {
                found.insert(port.name.clone(), port);
            }
        }
        search_from = stmt_end + 1;
    }

    let mut ports = Vec::new();
    for name in header_names {
        match found.remove(name) {
            Some(p) => ports.push(p),
            None => report.push(Diagnostic::MalformedPort {
                text: name.clone(),
                reason: "no matching declaration found in the module body".to_string(),
            }),
        }
    }
    ports
}
