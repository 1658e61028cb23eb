////////////////////////////////////////////////////////////////////////////////
// Utilities

pub fn subscript_numbers(s: &str) -> String {
    s.chars()
        .map(|digit| match digit {
            '0' => '₀',
            '1' => '₁',
            '2' => '₂',
            '3' => '₃',
            '4' => '₄',
            '5' => '₅',
            '6' => '₆',
            '7' => '₇',
            '8' => '₈',
            '9' => '₉',
            _ => digit,
        })
        .collect()
}

/// Extend `v` with `fill` up to `len` entries (the host expects rectangular,
/// fixed-size tables padded with -1).
pub fn pad<T: Clone>(mut v: Vec<T>, len: usize, fill: T) -> Vec<T> {
    if v.len() < len {
        v.resize(len, fill);
    }
    v
}

/// Convert a table index to the host's integer element type.
pub fn int(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
