//! # Text Processing Module
//!
//! ## Purpose
//! Canonicalizes raw catalog and listing strings into the normalized token
//! form that the trie index and the matcher operate on.
//!
//! ## Input/Output Specification
//! - **Input**: arbitrary Unicode strings (titles, manufacturer names, models)
//! - **Output**: lower-case, space-delimited token strings over `[a-z0-9]`
//! - **Guarantee**: total and deterministic; unrecognized characters fold away
//!
//! ## Key Features
//! - Accent folding via Unicode decomposition
//! - Case folding
//! - Punctuation and symbol runs collapsed to single spaces
//! - Letter/digit boundary splitting, so model numbers tokenize the same
//!   way regardless of source formatting ("DMC-FP7" and "DMC FP7" agree)

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[derive(Clone, Copy, PartialEq)]
enum CharClass {
    Letter,
    Digit,
}

/// Normalize a raw string for matching.
///
/// Steps, in order: NFD decomposition with combining marks dropped, case
/// folding, replacement of every run of characters outside `[a-z0-9]` with a
/// single space, and a space inserted at every letter/digit boundary. The
/// result carries no leading or trailing space. Applying `normalize` to its
/// own output is a no-op.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev: Option<CharClass> = None;
    let mut pending_space = false;

    for decomposed in raw.nfd() {
        if is_combining_mark(decomposed) {
            continue;
        }
        for c in decomposed.to_lowercase() {
            let class = if c.is_ascii_digit() {
                Some(CharClass::Digit)
            } else if c.is_ascii_lowercase() {
                Some(CharClass::Letter)
            } else {
                None
            };
            let Some(class) = class else {
                // Anything outside [a-z0-9] is a separator; runs collapse.
                pending_space = true;
                continue;
            };
            if pending_space {
                if !out.is_empty() {
                    out.push(' ');
                }
            } else if prev.is_some() && prev != Some(class) {
                // Letter/digit boundary inside a contiguous run.
                out.push(' ');
            }
            out.push(c);
            prev = Some(class);
            pending_space = false;
        }
    }

    out
}

/// Normalize `raw` and split it into tokens. An empty or all-symbol input
/// yields no tokens.
pub fn tokenize(raw: &str) -> Vec<String> {
    normalize(raw)
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_case_and_accents() {
        assert_eq!(normalize("Café"), normalize("CAFE"));
        assert_eq!(normalize("Caméra Numérique"), "camera numerique");
    }

    #[test]
    fn collapses_symbol_runs() {
        assert_eq!(normalize("Cyber-shot  (Black)"), "cyber shot black");
        assert_eq!(normalize("++--__"), "");
    }

    #[test]
    fn splits_letter_digit_boundaries() {
        assert_eq!(normalize("DMC-FP7"), "dmc fp 7");
        assert_eq!(normalize("DMCFP7"), "dmcfp 7");
        assert_eq!(normalize("EOS 7D"), "eos 7 d");
        assert_eq!(normalize("100 IS"), "100 is");
    }

    #[test]
    fn is_idempotent() {
        for raw in [
            "Panasonic Lumix DMC-FP7",
            "Canon_EOS-550D / Rebel T2i",
            "  trailing -- junk!! ",
            "Ångström 3000",
            "",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn no_leading_or_trailing_space() {
        assert_eq!(normalize(" Pentax "), "pentax");
        assert_eq!(normalize("(WG-1)"), "wg 1");
    }

    #[test]
    fn tokenize_drops_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" ... ").is_empty());
        assert_eq!(tokenize("Pentax WG-1 GPS"), ["pentax", "wg", "1", "gps"]);
    }
}
