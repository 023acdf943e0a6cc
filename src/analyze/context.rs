//! Context windows around a pattern hit.
//!
//! All radii are in characters and every slice lands on a char boundary, so
//! OCR output with stray multi-byte glyphs can't make the extractor panic.

use once_cell::sync::Lazy;
use regex::Regex;

static CLAUSE_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:clause|paragraph|schedule)\s*(\d+(?:\.\d+)*)").expect("clause ref regex")
});

/// Multiplier for the diagnostic window relative to the base radius.
pub const FULL_CONTEXT_FACTOR: usize = 3;

/// Text extracted around one match.
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseContext {
    /// Base window, trimmed.
    pub text: String,
    /// Structural locator such as `4.2`, if one could be found.
    pub clause_ref: Option<String>,
    /// Wider window for diagnostics; never shown to users.
    pub full_context: String,
    /// The sentence the match sits in.
    pub clause: String,
}

/// Byte range covering `radius` chars either side of `[start, end)`.
pub fn char_window(text: &str, start: usize, end: usize, radius: usize) -> (usize, usize) {
    let from = text[..start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map_or(start, |(i, _)| i);
    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map_or(text.len(), |(i, _)| end + i);
    (from, to)
}

/// First `(clause|paragraph|schedule) N[.N...]` number inside `text`.
pub fn find_clause_ref(text: &str) -> Option<String> {
    CLAUSE_REF
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn is_terminator(b: u8) -> bool {
    matches!(b, b'.' | b';' | b'!' | b'?')
}

/// Byte span of the sentence containing `[start, end)`, limited to
/// `[lo, hi)`. A sentence ends at `.;!?` followed by whitespace (or the end
/// of the text), or at a blank line. Decimal clause numbers like `4.2` don't
/// split a sentence.
pub fn clause_span(text: &str, start: usize, end: usize, lo: usize, hi: usize) -> (usize, usize) {
    let bytes = text.as_bytes();

    // terminators are ASCII, so every index we stop at is a char boundary
    let mut from = lo;
    let mut j = start;
    while j > lo {
        j -= 1;
        let b = bytes[j];
        let next_ws = bytes.get(j + 1).map_or(true, |n| n.is_ascii_whitespace());
        if is_terminator(b) && next_ws && j + 1 <= start {
            from = j + 1;
            break;
        }
        if b == b'\n' && j > lo && bytes[j - 1] == b'\n' {
            from = j + 1;
            break;
        }
    }

    let mut to = hi;
    let mut k = end;
    while k < hi {
        let b = bytes[k];
        let next_ws = bytes.get(k + 1).map_or(true, |n| n.is_ascii_whitespace());
        if is_terminator(b) && next_ws {
            to = k + 1;
            break;
        }
        if b == b'\n' && bytes.get(k + 1) == Some(&b'\n') {
            to = k;
            break;
        }
        k += 1;
    }

    // skip the whitespace that followed the previous terminator
    let lead = text[from..to].len() - text[from..to].trim_start().len();
    let tail = text[from..to].len() - text[from..to].trim_end().len();
    let (from, to) = (from + lead, to - tail);
    if from >= to {
        (start, end)
    } else {
        (from, to)
    }
}

/// Extract the base window, full window, enclosing clause and structural
/// reference for a match at byte span `[start, end)`.
///
/// The reference is looked up in the part of the clause sentence that lies
/// inside the base window first, so a window spanning two numbered clauses
/// cites the right one; otherwise the first reference in the window is used.
pub fn extract_context(text: &str, start: usize, end: usize, radius: usize) -> ClauseContext {
    let (w_from, w_to) = char_window(text, start, start, radius);
    let (f_from, f_to) = char_window(text, start, end, radius * FULL_CONTEXT_FACTOR);
    let (c_from, c_to) = clause_span(text, start, end, f_from, f_to);

    let window = text[w_from..w_to].trim();
    let (r_from, r_to) = (c_from.max(w_from), c_to.min(w_to));
    let clause_in_window = if r_from < r_to { &text[r_from..r_to] } else { "" };
    let clause_ref = find_clause_ref(clause_in_window).or_else(|| find_clause_ref(window));

    ClauseContext {
        text: window.to_string(),
        clause_ref,
        full_context: text[f_from..f_to].to_string(),
        clause: text[c_from..c_to].to_string(),
    }
}

/// Byte → char offset conversion for ascending byte positions. Each call only
/// counts the chars since the previous one.
#[derive(Debug, Default, Clone, Copy)]
pub struct CharCursor {
    byte: usize,
    chars: usize,
}

impl CharCursor {
    /// Character offset of byte index `at`. Positions before the last one
    /// restart the count from the beginning.
    pub fn offset(&mut self, text: &str, at: usize) -> usize {
        if at < self.byte {
            *self = Self::default();
        }
        self.chars += text[self.byte..at].chars().count();
        self.byte = at;
        self.chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_clamped_to_bounds() {
        let t = "short text";
        assert_eq!(char_window(t, 3, 3, 150), (0, t.len()));
        assert_eq!(char_window(t, 0, 0, 0), (0, 0));
    }

    #[test]
    fn window_counts_chars_not_bytes() {
        let t = "££££X££££";
        let at = t.find('X').unwrap();
        let (a, b) = char_window(t, at, at, 2);
        assert_eq!(&t[a..b], "££X£");
    }

    #[test]
    fn clause_ref_variants() {
        assert_eq!(find_clause_ref("see Clause 4.2.1 below"), Some("4.2.1".into()));
        assert_eq!(find_clause_ref("SCHEDULE 3 part 2"), Some("3".into()));
        assert_eq!(find_clause_ref("paragraph12"), Some("12".into()));
        assert_eq!(find_clause_ref("clause heading only"), None);
    }

    #[test]
    fn sentence_ignores_decimal_numbers() {
        let t = "... Clause 4.2: The Landlord shall repair the windows ...";
        let at = t.find("repair").unwrap();
        let (a, b) = clause_span(t, at, at + 6, 0, t.len());
        assert_eq!(
            &t[a..b],
            "Clause 4.2: The Landlord shall repair the windows ..."
        );
    }

    #[test]
    fn sentence_stops_at_terminators_and_blank_lines() {
        let t = "Clause 9.1 Tenant shall repair. Clause 9.2 Landlord shall maintain structure.";
        let at = t.find("Landlord").unwrap();
        let (a, b) = clause_span(t, at, at + 8, 0, t.len());
        assert_eq!(&t[a..b], "Clause 9.2 Landlord shall maintain structure.");

        let t2 = "Heading\n\nThe tenant shall keep\nthe interior clean\n\nNext";
        let at2 = t2.find("tenant").unwrap();
        let (a2, b2) = clause_span(t2, at2, at2 + 6, 0, t2.len());
        assert_eq!(&t2[a2..b2], "The tenant shall keep\nthe interior clean");
    }

    #[test]
    fn reference_prefers_own_clause() {
        let t = "Clause 9.1 Tenant shall maintain internal repairs. Clause 9.2 Landlord shall maintain structure.";
        let at = t.find("Landlord").unwrap();
        let ctx = extract_context(t, at, at + 8, 150);
        assert_eq!(ctx.clause_ref.as_deref(), Some("9.2"));
        // base window spans the whole text here
        assert_eq!(ctx.text, t);
        assert_eq!(ctx.full_context, t);
    }

    #[test]
    fn empty_document_is_harmless() {
        let ctx = extract_context("", 0, 0, 150);
        assert!(ctx.text.is_empty());
        assert!(ctx.clause_ref.is_none());
        assert_eq!(CharCursor::default().offset("", 0), 0);
    }

    #[test]
    fn reference_outside_base_window_is_not_cited() {
        let t = format!(
            "Clause 7 {}the landlord shall repair the windows.",
            "and the parties agree ".repeat(10)
        );
        let at = t.find("landlord").unwrap();
        // clause sentence reaches "Clause 7", the base window doesn't
        let narrow = extract_context(&t, at, at + 8, 150);
        assert!(narrow.clause.starts_with("Clause 7"));
        assert!(!narrow.text.contains("Clause 7"));
        assert_eq!(narrow.clause_ref, None);

        let wide = extract_context(&t, at, at + 8, 300);
        assert_eq!(wide.clause_ref.as_deref(), Some("7"));
    }

    #[test]
    fn cursor_counts_incrementally() {
        let t = "£a£b£c";
        let mut c = CharCursor::default();
        let positions: Vec<usize> = t.char_indices().map(|(i, _)| i).collect();
        for (n, &at) in positions.iter().enumerate() {
            assert_eq!(c.offset(t, at), n);
        }
        // going backwards restarts cleanly
        assert_eq!(c.offset(t, positions[1]), 1);
        assert_eq!(c.offset(t, t.len()), 6);
    }
}
