//! The watchdog controller.
//!
//! [`IndependentWatchdog`] owns no state beyond its collaborators. Every
//! operation translates directly into register accesses in the order the
//! reference manual prescribes.

use tracing::{debug, warn};

use crate::clock::TickSource;
use crate::error::{IwdgError, IwdgResult};
use crate::registers::{IwdgRegisters, Key};
use crate::timing::{STATUS_TIMEOUT_MS, Timing, check_expiration};

/// Independent watchdog controller.
///
/// # Initialization hazard
///
/// [`init`](Self::init) writes the enable key *before* installing the
/// requested timing. From that instant the watchdog counts down with the
/// hardware default timing (about 511ms), so a failed `init` leaves a live
/// watchdog behind. Treat any `init` error as "watchdog running with unknown
/// timing": retry [`set_expiration`](Self::set_expiration) or force a
/// controlled reset.
///
/// # Concurrency
///
/// The controller performs no locking. [`refresh`](Self::refresh) is a single
/// register write and takes `&self`; reconfiguration takes `&mut self`.
///
/// # Example
///
/// ```rust
/// use stm32_iwdg::prelude::*;
///
/// let regs = SimulatedIwdg::new();
/// let clock = ManualClock::with_auto_advance(0, 1);
/// let mut watchdog = IndependentWatchdog::new(&regs, &clock);
///
/// watchdog.init(5000)?;
/// watchdog.refresh();
/// assert_eq!(watchdog.expiration_ms()?, 5000);
/// # Ok::<(), IwdgError>(())
/// ```
#[derive(Debug)]
pub struct IndependentWatchdog<R, C> {
    regs: R,
    clock: C,
}

impl<R: IwdgRegisters, C: TickSource> IndependentWatchdog<R, C> {
    /// Create a controller over the given registers and tick source.
    ///
    /// Does not touch the hardware.
    pub const fn new(regs: R, clock: C) -> Self {
        Self { regs, clock }
    }

    /// Enable the watchdog and install the requested expiration.
    ///
    /// Call at most once per power-on. The range check runs before any
    /// register is written; everything after it follows the hardware
    /// procedure: keep the counter running through debug halts, enable key,
    /// then [`set_expiration`](Self::set_expiration).
    ///
    /// # Errors
    ///
    /// - [`IwdgError::OutOfRange`]: nothing was written, the watchdog is untouched.
    /// - [`IwdgError::Busy`] / [`IwdgError::Timeout`]: the watchdog is already
    ///   running with default or partially applied timing.
    pub fn init(&mut self, expiration_ms: u32) -> IwdgResult<()> {
        check_expiration(expiration_ms)?;

        self.regs.set_debug_stop(false);
        self.regs.write_key(Key::Enable);
        debug!(expiration_ms, "independent watchdog enabled");

        self.set_expiration(expiration_ms)
    }

    /// Reprogram the expiration and refresh the counter.
    ///
    /// Safe to call repeatedly at runtime, before or after [`init`](Self::init).
    /// Blocks for at most [`STATUS_TIMEOUT_MS`] while the hardware latches the
    /// new values.
    ///
    /// # Errors
    ///
    /// - [`IwdgError::OutOfRange`]: `expiration_ms` is not representable; nothing written.
    /// - [`IwdgError::Busy`]: an earlier update is still propagating; nothing written.
    /// - [`IwdgError::Timeout`]: the update did not complete in time. The
    ///   counter was not refreshed and the installed timing is unknown.
    pub fn set_expiration(&mut self, expiration_ms: u32) -> IwdgResult<()> {
        let timing = Timing::for_expiration(expiration_ms)?;

        let status = self.regs.read_status();
        if status != 0 {
            warn!(status, "watchdog registers busy, expiration not changed");
            return Err(IwdgError::Busy { status });
        }

        self.regs.write_key(Key::Unlock);
        self.regs.write_prescaler(timing.prescaler().code());
        self.regs.write_reload(timing.reload());

        self.wait_for_update()?;
        self.refresh();

        debug!(
            expiration_ms,
            prescaler = %timing.prescaler(),
            reload = timing.reload(),
            "watchdog expiration set"
        );
        Ok(())
    }

    /// Reload the counter and re-lock the protected registers.
    ///
    /// A single unconditional register write; callable from interrupt context.
    #[inline]
    pub fn refresh(&self) {
        self.regs.write_key(Key::Refresh);
    }

    /// Read back the installed prescaler/reload pair.
    ///
    /// # Errors
    ///
    /// Returns [`IwdgError::Busy`] while an update is propagating, since the
    /// registers do not yet reflect the last write.
    pub fn current_timing(&self) -> IwdgResult<Timing> {
        let status = self.regs.read_status();
        if status != 0 {
            return Err(IwdgError::Busy { status });
        }
        Ok(Timing::from_registers(
            self.regs.read_prescaler(),
            self.regs.read_reload(),
        ))
    }

    /// Installed expiration in milliseconds, read back from the registers.
    ///
    /// # Errors
    ///
    /// Returns [`IwdgError::Busy`] while an update is propagating.
    pub fn expiration_ms(&self) -> IwdgResult<u32> {
        self.current_timing().map(|timing| timing.expiration_ms())
    }

    /// Get the register binding.
    #[must_use]
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Release the collaborators.
    pub fn free(self) -> (R, C) {
        (self.regs, self.clock)
    }

    fn wait_for_update(&self) -> IwdgResult<()> {
        let start = self.clock.now_ms();
        loop {
            let status = self.regs.read_status();
            if status == 0 {
                return Ok(());
            }
            let elapsed_ms = self.clock.elapsed_since(start);
            if elapsed_ms > STATUS_TIMEOUT_MS {
                warn!(status, elapsed_ms, "watchdog register update timed out");
                return Err(IwdgError::Timeout { elapsed_ms, status });
            }
            core::hint::spin_loop();
        }
    }
}
