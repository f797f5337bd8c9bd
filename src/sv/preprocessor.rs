//! Lexical preprocessor: strips comments and inactive preprocessor-
//! conditional regions from SystemVerilog source text before the header
//! parser ever sees it.
//!
//! Runs as two passes. The first strips comments and leaves string literals
//! alone so a `//` or `/*` inside a quoted string, or inside an
//! already-commented region, never gets mis-split — a `//input wire` sitting
//! inside a comment must never create a spurious port. The second walks the
//! decommented text with a stack-based scan of `` `ifdef``/`` `ifndef``/
//! `` `else``/`` `endif``, dropping inactive branches, `` `define``/
//! `` `include`` lines, and expanding any other `` `NAME`` reference to the
//! empty string. Because no macro table is evaluated, an `ifdef NAME` is
//! always treated as undefined: under-exposing ports is safer than
//! fabricating ones that don't exist.

#[derive(Debug, Clone, PartialEq)]
pub struct PreprocDiagnostic {
    pub line: usize,
    pub message: String,
}

pub fn preprocess(src: &str) -> (String, Vec<PreprocDiagnostic>) {
    let (decommented, mut diags) = strip_comments(src);
    let (cleaned, mut cond_diags) = strip_conditionals(&decommented);
    diags.append(&mut cond_diags);
    (cleaned, diags)
}

fn strip_comments(src: &str) -> (String, Vec<PreprocDiagnostic>) {
    #[derive(PartialEq)]
    enum State {
        Normal,
        Line,
        Block,
        Str,
    }

    let chars: Vec<char> = src.chars().collect();
    let mut out = String::with_capacity(src.len());
    let mut diags = Vec::new();
    let mut line = 1usize;
    let mut block_start_line = 0usize;
    let mut state = State::Normal;
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match state {
            State::Normal => match (c, next) {
                ('/', Some('/')) => {
                    state = State::Line;
                    out.push_str("  ");
                    i += 2;
                }
                ('/', Some('*')) => {
                    state = State::Block;
                    block_start_line = line;
                    out.push_str("  ");
                    i += 2;
                }
                ('"', _) => {
                    state = State::Str;
                    out.push(c);
                    i += 1;
                }
                _ => {
                    out.push(c);
                    if c == '\n' {
                        line += 1;
                    }
                    i += 1;
                }
            },
            State::Line => {
                if c == '\n' {
                    state = State::Normal;
                    out.push('\n');
                    line += 1;
                } else {
                    out.push(' ');
                }
                i += 1;
            }
            State::Block => {
                if c == '*' && next == Some('/') {
                    state = State::Normal;
                    out.push_str("  ");
                    i += 2;
                } else {
                    if c == '\n' {
                        out.push('\n');
                        line += 1;
                    } else {
                        out.push(' ');
                    }
                    i += 1;
                }
            }
            State::Str => {
                if c == '\\' && next.is_some() {
                    out.push(c);
                    out.push(next.unwrap());
                    if next == Some('\n') {
                        line += 1;
                    }
                    i += 2;
                } else if c == '"' {
                    state = State::Normal;
                    out.push(c);
                    i += 1;
                } else {
                    out.push(c);
                    if c == '\n' {
                        line += 1;
                    }
                    i += 1;
                }
            }
        }
    }

    if state == State::Block {
        diags.push(PreprocDiagnostic {
            line: block_start_line,
            message: "unterminated block comment (missing */)".to_string(),
        });
    }

    (out, diags)
}

fn strip_conditionals(src: &str) -> (String, Vec<PreprocDiagnostic>) {
    struct Frame {
        ancestor_active: bool,
        cond_is_true: bool,
    }

    fn is_ident_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }

    let active = |stack: &[Frame]| -> bool {
        stack
            .last()
            .map(|f| f.ancestor_active && f.cond_is_true)
            .unwrap_or(true)
    };

    let chars: Vec<char> = src.chars().collect();
    let mut out = String::with_capacity(src.len());
    let mut diags = Vec::new();
    let mut line = 1usize;
    let mut stack: Vec<Frame> = Vec::new();
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        if c == '\n' {
            out.push('\n');
            line += 1;
            i += 1;
            continue;
        }
        if c == '`' {
            let mut j = i + 1;
            while j < chars.len() && is_ident_char(chars[j]) {
                j += 1;
            }
            let name: String = chars[i + 1..j].iter().collect();
            let skip_to_eol = |mut k: usize| {
                while k < chars.len() && chars[k] != '\n' {
                    k += 1;
                }
                k
            };
            match name.as_str() {
                "ifdef" | "ifndef" => {
                    let ancestor_active = active(&stack);
                    // unknown macro name => treated as undefined
                    let cond_is_true = name == "ifndef";
                    stack.push(Frame {
                        ancestor_active,
                        cond_is_true,
                    });
                    i = skip_to_eol(j);
                }
                "else" => {
                    match stack.last_mut() {
                        Some(top) => top.cond_is_true = !top.cond_is_true,
                        None => diags.push(PreprocDiagnostic {
                            line,
                            message: "`else directive without a matching `ifdef/`ifndef"
                                .to_string(),
                        }),
                    }
                    i = skip_to_eol(j);
                }
                "endif" => {
                    if stack.pop().is_none() {
                        diags.push(PreprocDiagnostic {
                            line,
                            message: "`endif directive without a matching `ifdef/`ifndef"
                                .to_string(),
                        });
                    }
                    i = skip_to_eol(j);
                }
                "define" | "include" => {
                    i = skip_to_eol(j);
                }
                _ => {
                    // any other `NAME reference expands to the empty string
                    i = j;
                }
            }
            continue;
        }
        if active(&stack) {
            out.push(c);
        }
        i += 1;
    }

    if !stack.is_empty() {
        diags.push(PreprocDiagnostic {
            line,
            message: "unbalanced conditional region (missing `endif)".to_string(),
        });
    }

    (out, diags)
}
