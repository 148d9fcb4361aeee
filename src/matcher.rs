//! Pairwise string comparators used to build ordering rules.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::iter::Peekable;
use std::str::Chars;

/// Three-way comparison of two field values.
pub trait Matcher: Debug + Send + Sync {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// Equal strings compare equal, everything else falls back to natural order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl Matcher for ExactMatcher {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        if a == b {
            Ordering::Equal
        } else {
            natural_cmp(a, b)
        }
    }
}

/// Treats two strings as equal only when each contains the other.
///
/// One-directional containment is not enough: `"python"` and `"py"` still
/// order by natural comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialMatcher;

impl Matcher for PartialMatcher {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        if a.contains(b) && b.contains(a) {
            Ordering::Equal
        } else {
            natural_cmp(a, b)
        }
    }
}

/// Case-insensitive ordering where runs of digits compare by numeric value,
/// so `"3.9" < "3.12"`. Ties are broken by byte order, which keeps distinct
/// strings from ever comparing equal.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
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
                let ord = l.to_lowercase().cmp(r.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }
    run
}

fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
