//! Name tokenization shared by the port grouper and protocol matcher: both
//! need the same underscore-and-CamelCase split and the same
//! candidate-prefix/candidate-suffix enumeration over it.

/// Splits `name` on underscores and on CamelCase word boundaries. Tokens keep
/// their original case; callers normalize (upper-case) when comparing.
pub fn tokenize(name: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for part in name.split('_') {
        if part.is_empty() {
            continue;
        }
        tokens.extend(split_camel(part));
    }
    tokens
}

fn split_camel(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut tokens = Vec::new();
    let mut start = 0;
    for i in 1..chars.len() {
        let prev = chars[i - 1];
        let cur = chars[i];
        let boundary = (prev.is_lowercase() && cur.is_uppercase())
            || (prev.is_uppercase() && cur.is_uppercase() && chars.get(i + 1).is_some_and(|c| c.is_lowercase()))
            || (prev.is_alphabetic() && cur.is_numeric())
            || (prev.is_numeric() && cur.is_alphabetic());
        if boundary {
            tokens.push(chars[start..i].iter().collect());
            start = i;
        }
    }
    tokens.push(chars[start..].iter().collect());
    tokens
}

pub fn normalize_token(t: &str) -> String {
    t.to_uppercase()
}

fn normalized_join(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|t| normalize_token(t))
        .collect::<Vec<_>>()
        .join("_")
}

/// Every prefix of the token sequence (length 1..=n), normalized and joined
/// with `_`: `M_AXI_AWADDR` -> `{M, M_AXI, M_AXI_AWADDR}`.
pub fn candidate_prefixes(tokens: &[String]) -> Vec<String> {
    (1..=tokens.len()).map(|n| normalized_join(&tokens[..n])).collect()
}

/// Every suffix of the token sequence, normalized and joined with `_`, over
/// both the full token list and (when the final token is a direction/instance
/// marker like `o`, `i`, a digit) the list with that marker dropped — this is
/// what lets a bare logical name like `AWADDR` align against a physical name
/// like `M_AXI_AWADDR_o` without a dedicated stripping pass.
///
/// Each entry is `(text, suffix token count, trailing tokens stripped to
/// reach this variant)`; the matcher sorts by the first descending and the
/// last ascending so the longest candidate wins, ties broken by fewest
/// trailing non-alphabetic tokens stripped.
pub fn candidate_suffixes(tokens: &[String]) -> Vec<(String, usize, usize)> {
    let mut variants: Vec<(&[String], usize)> = vec![(tokens, 0)];
    if tokens.len() > 1 {
        if let Some(last) = tokens.last() {
            if is_direction_or_instance_marker(last) {
                variants.push((&tokens[..tokens.len() - 1], 1));
            }
        }
    }

    let mut out = Vec::new();
    for (variant, stripped) in variants {
        for start in 0..variant.len() {
            let suffix = &variant[start..];
            out.push((normalized_join(suffix), suffix.len(), stripped));
        }
    }
    out
}

/// True for a trailing direction marker (`o`/`i`, either case) or a purely
/// numeric instance suffix (`0`..`9`, possibly multi-digit) — the two
/// postfix shapes spec §4.4/§4.5 call out for suffix-stripped alignment.
fn is_direction_or_instance_marker(token: &str) -> bool {
    token.eq_ignore_ascii_case("o")
        || token.eq_ignore_ascii_case("i")
        || (!token.is_empty() && token.chars().all(|c| c.is_ascii_digit()))
}

/// Bus-root tokens that are allowed to anchor a grouping even as a
/// single-token common prefix.
pub const WELL_KNOWN_BUS_ROOTS: &[&str] = &["AXI", "APB", "AHB", "CHI", "DFI", "ACE", "ATB"];
