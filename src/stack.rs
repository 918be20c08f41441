//! Stack growth for the recursive parser and evaluator.
//!
//! Deeply nested source and deep (terminating) recursion in user programs
//! would otherwise overflow the native stack and abort the process.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
  stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
  f()
}

#[cfg(test)]
mod tests {
  use super::ensure_sufficient_stack;

  fn depth(n: u64) -> u64 {
    ensure_sufficient_stack(|| if n == 0 { 0 } else { 1 + depth(n - 1) })
  }

  #[test]
  fn deep_recursion_completes() {
    assert_eq!(depth(200_000), 200_000);
  }
}
