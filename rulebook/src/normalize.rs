//! Text folding helpers shared by every rule lookup.
//!
//! Policy:
//! - Drop control characters.
//! - Drop common zero-width characters (ZWS/ZWNJ/ZWJ/WJ/BOM).
//! - Unicode-aware lowercasing (char.to_lowercase()).
//!
//! Keep this logic single-sourced so table keys and inputs fold the same way.

/// Normalize text for rule matching and case-insensitive search.
pub fn for_rules(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if ch.is_control() { continue; }
        for lc in ch.to_lowercase() {
            match lc {
                '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' => {},
                _ => out.push(lc),
            }
        }
    }
    out
}

/// Remove `( ... )` and `[ ... ]` annotations, along with the whitespace
/// directly in front of them. No nesting; an unclosed opener runs to the end.
pub fn strip_annotations(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut closer: Option<char> = None;
    for ch in s.chars() {
        match (closer, ch) {
            (None, '(') => {
                trim_end_in_place(&mut out);
                closer = Some(')');
            }
            (None, '[') => {
                trim_end_in_place(&mut out);
                closer = Some(']');
            }
            (None, _) => out.push(ch),
            (Some(c), _) if ch == c => closer = None,
            (Some(_), _) => {}
        }
    }
    out
}

fn trim_end_in_place(s: &mut String) {
    let keep = s.trim_end().len();
    s.truncate(keep);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotations_drop_with_leading_space() {
        assert_eq!(strip_annotations("Berlin, Germany [disputed]"), "Berlin, Germany");
        assert_eq!(strip_annotations("England (both) "), "England ");
        assert_eq!(strip_annotations("Paris (France"), "Paris");
        assert_eq!(strip_annotations("a(b)c"), "ac");
        assert_eq!(strip_annotations("[x]"), "");
    }

    #[test]
    fn folding_drops_zero_width_and_lowercases() {
        assert_eq!(for_rules("Ge\u{200B}RMANY"), "germany");
        let mut s = String::from("usa \t");
        trim_end_in_place(&mut s);
        assert_eq!(s, "usa");
    }
}
