//! Geometric predicates with explicit tolerance.

use num_traits::Float;

/// Returns `true` if `a` and `b` differ by at most `eps`.
#[inline]
pub fn is_close<F: Float>(a: F, b: F, eps: F) -> bool {
    (a - b).abs() <= eps
}

/// Wraps a signed index into `0..n`.
///
/// Unlike `%`, negative indices wrap around from the end, so walking
/// backwards over the corners of a rectangle stays in range.
///
/// # Example
///
/// ```
/// use dynfog::tolerance::wrap_index;
///
/// assert_eq!(wrap_index(-1, 4), 3);
/// assert_eq!(wrap_index(5, 4), 1);
/// ```
#[inline]
pub fn wrap_index(k: isize, n: usize) -> usize {
    debug_assert!(n > 0);
    k.rem_euclid(n as isize) as usize
}
