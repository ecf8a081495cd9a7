//! String collation used by consensus equality and the timeline sort.
//!
//! Two comparisons are needed:
//! - a *search* equality that ignores case, accents, punctuation and
//!   whitespace ("O'Brien" == "OBrien" == "obrien", "Nguyễn" == "Nguyen");
//! - a *numeric* ordering where digit runs compare by value, so
//!   "2 mile" < "10k" and "200 meter" < "1600 meter".

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold a string to its primary collation key: compatibility-decomposed,
/// lower-cased, combining marks dropped, letters and digits only. Letters
/// that have no decomposition but a base-letter spelling ("ß", "æ", "ø")
/// are expanded.
pub fn search_key(s: &str) -> String {
    let mut key = String::with_capacity(s.len());
    for c in s.nfkd().flat_map(char::to_lowercase) {
        if is_combining_mark(c) || !c.is_alphanumeric() {
            continue;
        }
        match expand_letter(c) {
            Some(spelled) => key.push_str(spelled),
            None => key.push(c),
        }
    }
    key
}

/// Case-, accent- and punctuation-insensitive equality.
pub fn search_eq(a: &str, b: &str) -> bool {
    search_key(a) == search_key(b)
}

/// Numeric-aware ordering. Ties at the primary level fall back to code-point
/// order so the result is deterministic.
pub fn numeric_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digits(&mut left);
                let r_run = take_digits(&mut right);
                let ord = cmp_digit_runs(&l_run, &r_run);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                left.next();
                right.next();
                let ord = primary_weight(l).cmp(&primary_weight(r));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Spaces and punctuation sort before digits, digits before letters.
fn primary_weight(c: char) -> (u8, char) {
    if c.is_ascii_digit() {
        (1, c)
    } else if c.is_alphabetic() {
        (2, base_letter(c))
    } else {
        (0, c)
    }
}

/// Lower-cased letter with its marks removed, for ordering.
fn base_letter(c: char) -> char {
    let lower = c.to_lowercase().next().unwrap_or(c);
    let base = std::iter::once(lower)
        .nfkd()
        .find(|d| !is_combining_mark(*d))
        .unwrap_or(lower);
    expand_letter(base)
        .and_then(|spelled| spelled.chars().next())
        .unwrap_or(base)
}

/// Letters that NFKD leaves alone but collate like plain Latin.
fn expand_letter(c: char) -> Option<&'static str> {
    let spelled = match c {
        'ß' => "ss",
        'æ' => "ae",
        'œ' => "oe",
        'ø' => "o",
        'ł' => "l",
        'đ' | 'ð' => "d",
        'þ' => "th",
        'ħ' => "h",
        'ŧ' => "t",
        'ı' => "i",
        _ => return None,
    };
    Some(spelled)
}
