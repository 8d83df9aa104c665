//! Secret comparison helpers

use subtle::ConstantTimeEq;

/// Exact, case-sensitive equality in constant time.
/// Strings of different length compare unequal.
pub fn secrets_match(submitted: &str, expected: &str) -> bool {
    submitted.as_bytes().ct_eq(expected.as_bytes()).into()
}
