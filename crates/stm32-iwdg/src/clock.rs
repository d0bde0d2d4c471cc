//! Millisecond tick source used to bound the status poll.

/// A monotonic millisecond counter.
///
/// The counter may wrap; elapsed time is always computed with wrapping
/// subtraction.
pub trait TickSource {
    /// Current tick in milliseconds.
    fn now_ms(&self) -> u32;

    /// Milliseconds elapsed since `start`, tolerant of wrap-around.
    fn elapsed_since(&self, start: u32) -> u32 {
        self.now_ms().wrapping_sub(start)
    }
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }

    fn elapsed_since(&self, start: u32) -> u32 {
        (**self).elapsed_since(start)
    }
}

/// Adapts a platform tick function (for example a SysTick-driven counter)
/// into a [`TickSource`].
///
/// ```rust
/// use stm32_iwdg::clock::{FnTicks, TickSource};
///
/// let ticks = FnTicks::new(|| 42);
/// assert_eq!(ticks.now_ms(), 42);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnTicks<F>(F);

impl<F: Fn() -> u32> FnTicks<F> {
    /// Wrap a tick function.
    pub const fn new(now: F) -> Self {
        Self(now)
    }
}

impl<F: Fn() -> u32> TickSource for FnTicks<F> {
    fn now_ms(&self) -> u32 {
        (self.0)()
    }
}
