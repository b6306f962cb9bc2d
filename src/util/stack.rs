//! Stack growth for recursive parsing and evaluation
//!
//! The parser and the interpreter recurse once per nesting level. Their
//! depth is capped, but the cap alone does not bound native stack usage
//! (frame sizes differ between builds), so recursive entry points run
//! through [`ensure_sufficient_stack`].

/// Grow the stack when less than this remains
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first when it is close to exhausted
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
