/// Remaining stack below which a recursive walk moves onto a fresh segment.
const RED_ZONE: usize = 128 * 1024;
const SEGMENT_SIZE: usize = 4 * 1024 * 1024;

/// Runs `f`, first growing the stack if less than [`RED_ZONE`] is left.
/// Every recursive walk over the AST goes through here, so nesting depth is
/// bounded by heap instead of the thread's stack.
pub fn grow<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}
