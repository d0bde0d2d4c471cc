//! Software models of the IWDG registers and the tick source.
//!
//! [`SimulatedIwdg`] behaves like the peripheral as seen from the register
//! interface: protected registers ignore writes unless unlocked, updates keep
//! the status register busy for a configurable number of reads, and the
//! counter runs down as simulated time advances, resetting the "device" when
//! it reaches zero. Every write is journaled for inspection.

use portable_atomic::{AtomicU32, Ordering};

use crate::clock::TickSource;

/// Manually driven millisecond clock.
///
/// Optionally advances by a fixed step on every read, so a busy-wait loop
/// observes time passing without a real timer.
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicU32,
    step: AtomicU32,
}

impl ManualClock {
    /// Create a clock frozen at `start_ms`.
    #[must_use]
    pub const fn new(start_ms: u32) -> Self {
        Self::with_auto_advance(start_ms, 0)
    }

    /// Create a clock that advances by `step_ms` each time it is read.
    #[must_use]
    pub const fn with_auto_advance(start_ms: u32, step_ms: u32) -> Self {
        Self {
            now: AtomicU32::new(start_ms),
            step: AtomicU32::new(step_ms),
        }
    }

    /// Move the clock forward, wrapping at `u32::MAX`.
    pub fn advance(&self, ms: u32) {
        self.now.fetch_add(ms, Ordering::AcqRel);
    }

    /// Set the current time.
    pub fn set(&self, ms: u32) {
        self.now.store(ms, Ordering::Release);
    }

    /// Change the auto-advance step.
    pub fn set_auto_advance(&self, step_ms: u32) {
        self.step.store(step_ms, Ordering::Release);
    }

    /// Read the current time without auto-advancing.
    #[must_use]
    pub fn peek_ms(&self) -> u32 {
        self.now.load(Ordering::Acquire)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl TickSource for ManualClock {
    fn now_ms(&self) -> u32 {
        let step = self.step.load(Ordering::Acquire);
        self.now.fetch_add(step, Ordering::AcqRel)
    }
}

#[cfg(feature = "std")]
pub use simulated::{RegisterWrite, SimulatedIwdg};

#[cfg(feature = "std")]
mod simulated {
    use alloc::vec::Vec;

    use parking_lot::Mutex;

    use crate::registers::{IwdgRegisters, Key, status};
    use crate::state::PeripheralState;
    use crate::timing::{LSI_FREQUENCY_HZ, MAX_RELOAD, Timing};

    /// LSI cycles per millisecond at the nominal frequency.
    const LSI_CYCLES_PER_MS: u64 = LSI_FREQUENCY_HZ as u64 / 1000;

    /// One journaled register write.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum RegisterWrite {
        /// Key register write.
        Key(Key),
        /// Prescaler register write (accepted or not).
        Prescaler(u8),
        /// Reload register write (accepted or not).
        Reload(u16),
        /// Debug-stop bit write.
        DebugStop(bool),
    }

    #[derive(Debug)]
    struct SimState {
        peripheral: PeripheralState,
        prescaler: u8,
        reload: u16,
        unlocked: bool,
        status: u32,
        pending_reads: u32,
        update_latency: u32,
        held_status: u32,
        debug_stop: bool,
        lsi_remainder: u64,
        resets: u32,
        writes: Vec<RegisterWrite>,
    }

    impl SimState {
        fn new() -> Self {
            Self {
                peripheral: PeripheralState::Disabled,
                prescaler: Timing::HARDWARE_DEFAULT.prescaler().code(),
                reload: Timing::HARDWARE_DEFAULT.reload(),
                unlocked: false,
                status: 0,
                pending_reads: 0,
                update_latency: 0,
                held_status: 0,
                debug_stop: false,
                lsi_remainder: 0,
                resets: 0,
                writes: Vec::new(),
            }
        }

        fn latched_timing(&self) -> Timing {
            Timing::from_registers(self.prescaler, self.reload)
        }

        fn begin_update(&mut self, bit: u32) {
            self.status |= bit;
            self.pending_reads = self.update_latency;
        }

        fn device_reset(&mut self) {
            let writes = core::mem::take(&mut self.writes);
            let resets = self.resets.saturating_add(1);
            let update_latency = self.update_latency;
            let held_status = self.held_status;
            *self = Self::new();
            self.writes = writes;
            self.resets = resets;
            self.update_latency = update_latency;
            self.held_status = held_status;
        }
    }

    /// Register-level model of the IWDG peripheral.
    ///
    /// Thread-safe so a test can refresh from one thread while another
    /// reconfigures.
    #[derive(Debug)]
    pub struct SimulatedIwdg {
        inner: Mutex<SimState>,
    }

    impl SimulatedIwdg {
        /// Create a model in the power-on state: disabled, default registers.
        #[must_use]
        pub fn new() -> Self {
            Self {
                inner: Mutex::new(SimState::new()),
            }
        }

        /// Keep the status register busy for `reads` reads after each
        /// prescaler/reload write.
        pub fn set_update_latency(&self, reads: u32) {
            self.inner.lock().update_latency = reads;
        }

        /// Force status bits on until [`release_status`](Self::release_status).
        pub fn hold_status(&self, bits: u32) {
            self.inner.lock().held_status = bits;
        }

        /// Stop forcing status bits.
        pub fn release_status(&self) {
            self.inner.lock().held_status = 0;
        }

        /// Current peripheral state.
        #[must_use]
        pub fn state(&self) -> PeripheralState {
            self.inner.lock().peripheral
        }

        /// Whether the protected registers are currently unlocked.
        #[must_use]
        pub fn is_unlocked(&self) -> bool {
            self.inner.lock().unlocked
        }

        /// Whether the debug-stop bit is set.
        #[must_use]
        pub fn debug_stop(&self) -> bool {
            self.inner.lock().debug_stop
        }

        /// Number of device resets caused by expiry.
        #[must_use]
        pub fn reset_count(&self) -> u32 {
            self.inner.lock().resets
        }

        /// Snapshot of the write journal.
        #[must_use]
        pub fn writes(&self) -> Vec<RegisterWrite> {
            self.inner.lock().writes.clone()
        }

        /// Number of times `key` was written.
        #[must_use]
        pub fn key_writes(&self, key: Key) -> usize {
            self.inner
                .lock()
                .writes
                .iter()
                .filter(|w| **w == RegisterWrite::Key(key))
                .count()
        }

        /// Clear the write journal.
        pub fn clear_writes(&self) {
            self.inner.lock().writes.clear();
        }

        /// Let `ms` milliseconds of LSI time pass.
        ///
        /// Returns `true` if the counter reached zero and the device reset.
        pub fn advance_ms(&self, ms: u32) -> bool {
            let mut s = self.inner.lock();
            let PeripheralState::CountingDown { timing, counter } = s.peripheral else {
                return false;
            };

            let cycles = s.lsi_remainder + u64::from(ms) * LSI_CYCLES_PER_MS;
            let divider = u64::from(timing.prescaler().divider());
            let counts = cycles / divider;
            s.lsi_remainder = cycles % divider;

            if counts >= u64::from(counter) {
                s.device_reset();
                return true;
            }

            let remaining = u64::from(counter) - counts;
            s.peripheral = PeripheralState::CountingDown {
                timing,
                counter: u16::try_from(remaining).unwrap_or(MAX_RELOAD),
            };
            false
        }
    }

    impl Default for SimulatedIwdg {
        fn default() -> Self {
            Self::new()
        }
    }

    impl IwdgRegisters for SimulatedIwdg {
        fn write_key(&self, key: Key) {
            let mut s = self.inner.lock();
            s.writes.push(RegisterWrite::Key(key));
            match key {
                Key::Enable => {
                    if !s.peripheral.is_counting() {
                        let timing = s.latched_timing();
                        s.peripheral = PeripheralState::CountingDown {
                            timing,
                            counter: timing.reload(),
                        };
                        s.lsi_remainder = 0;
                    }
                }
                Key::Unlock => s.unlocked = true,
                Key::Refresh => {
                    s.unlocked = false;
                    if s.peripheral.is_counting() {
                        let timing = s.latched_timing();
                        s.peripheral = PeripheralState::CountingDown {
                            timing,
                            counter: timing.reload(),
                        };
                    }
                }
            }
        }

        fn write_prescaler(&self, code: u8) {
            let mut s = self.inner.lock();
            s.writes.push(RegisterWrite::Prescaler(code));
            if s.unlocked {
                s.prescaler = code & 0x7;
                s.begin_update(status::PVU);
            }
        }

        fn write_reload(&self, reload: u16) {
            let mut s = self.inner.lock();
            s.writes.push(RegisterWrite::Reload(reload));
            if s.unlocked {
                s.reload = reload & MAX_RELOAD;
                s.begin_update(status::RVU);
            }
        }

        fn read_status(&self) -> u32 {
            let mut s = self.inner.lock();
            if s.status != 0 {
                if s.pending_reads == 0 {
                    s.status = 0;
                } else {
                    s.pending_reads -= 1;
                }
            }
            s.status | s.held_status
        }

        fn read_prescaler(&self) -> u8 {
            self.inner.lock().prescaler
        }

        fn read_reload(&self) -> u16 {
            self.inner.lock().reload
        }

        fn set_debug_stop(&self, stop: bool) {
            let mut s = self.inner.lock();
            s.writes.push(RegisterWrite::DebugStop(stop));
            s.debug_stop = stop;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_frozen() {
        let clock = ManualClock::new(10);
        assert_eq!(clock.now_ms(), 10);
        assert_eq!(clock.now_ms(), 10);
        clock.advance(5);
        assert_eq!(clock.now_ms(), 15);
    }

    #[test]
    fn test_manual_clock_auto_advance() {
        let clock = ManualClock::with_auto_advance(0, 2);
        assert_eq!(clock.now_ms(), 0);
        assert_eq!(clock.now_ms(), 2);
        assert_eq!(clock.peek_ms(), 4);
    }

    #[test]
    fn test_manual_clock_wraps() {
        let clock = ManualClock::new(u32::MAX);
        clock.advance(3);
        assert_eq!(clock.peek_ms(), 2);
        assert_eq!(clock.elapsed_since(u32::MAX), 3);
    }

    #[cfg(feature = "std")]
    mod model {
        use super::super::*;
        use crate::registers::{IwdgRegisters, Key, status};
        use crate::state::PeripheralState;
        use crate::timing::{Prescaler, Timing};

        #[test]
        fn test_power_on_state() {
            let sim = SimulatedIwdg::new();
            assert_eq!(sim.state(), PeripheralState::Disabled);
            assert_eq!(sim.read_prescaler(), 0);
            assert_eq!(sim.read_reload(), 0x0FFF);
            assert_eq!(sim.read_status(), 0);
        }

        #[test]
        fn test_enable_starts_default_countdown() {
            let sim = SimulatedIwdg::new();
            sim.write_key(Key::Enable);
            assert_eq!(
                sim.state(),
                PeripheralState::CountingDown {
                    timing: Timing::HARDWARE_DEFAULT,
                    counter: 0x0FFF,
                }
            );
        }

        #[test]
        fn test_locked_writes_ignored() {
            let sim = SimulatedIwdg::new();
            sim.write_prescaler(5);
            sim.write_reload(123);
            assert_eq!(sim.read_prescaler(), 0);
            assert_eq!(sim.read_reload(), 0x0FFF);
            assert_eq!(sim.writes().len(), 2);
        }

        #[test]
        fn test_refresh_relocks() {
            let sim = SimulatedIwdg::new();
            sim.write_key(Key::Unlock);
            assert!(sim.is_unlocked());
            sim.write_key(Key::Refresh);
            assert!(!sim.is_unlocked());
        }

        #[test]
        fn test_update_latency() {
            let sim = SimulatedIwdg::new();
            sim.set_update_latency(2);
            sim.write_key(Key::Unlock);
            sim.write_reload(100);
            assert_eq!(sim.read_status(), status::RVU);
            assert_eq!(sim.read_status(), status::RVU);
            assert_eq!(sim.read_status(), 0);
        }

        #[test]
        fn test_held_status() {
            let sim = SimulatedIwdg::new();
            sim.hold_status(status::PVU);
            assert_eq!(sim.read_status(), status::PVU);
            sim.release_status();
            assert_eq!(sim.read_status(), 0);
        }

        #[test]
        fn test_countdown_and_reset() {
            let sim = SimulatedIwdg::new();
            sim.write_key(Key::Enable);
            sim.write_key(Key::Unlock);
            sim.write_prescaler(Prescaler::Div32.code());
            sim.write_reload(100);
            sim.write_key(Key::Refresh);

            assert!(!sim.advance_ms(60));
            assert_eq!(sim.state().counter(), Some(40));

            sim.write_key(Key::Refresh);
            assert_eq!(sim.state().counter(), Some(100));

            assert!(sim.advance_ms(100));
            assert_eq!(sim.state(), PeripheralState::Disabled);
            assert_eq!(sim.reset_count(), 1);
        }

        #[test]
        fn test_held_status_survives_device_reset() {
            let sim = SimulatedIwdg::new();
            sim.set_update_latency(3);
            sim.write_key(Key::Enable);
            sim.hold_status(status::PVU);

            assert!(sim.advance_ms(2000));
            assert_eq!(sim.reset_count(), 1);
            assert_eq!(sim.read_status(), status::PVU);

            sim.release_status();
            sim.write_key(Key::Unlock);
            sim.write_reload(10);
            assert_eq!(sim.read_status(), status::RVU);
        }

        #[test]
        fn test_disabled_never_resets() {
            let sim = SimulatedIwdg::new();
            assert!(!sim.advance_ms(100_000));
            assert_eq!(sim.reset_count(), 0);
        }

        #[test]
        fn test_key_write_count() {
            let sim = SimulatedIwdg::new();
            sim.write_key(Key::Refresh);
            sim.write_key(Key::Refresh);
            sim.write_key(Key::Unlock);
            assert_eq!(sim.key_writes(Key::Refresh), 2);
            assert_eq!(sim.key_writes(Key::Enable), 0);
            sim.clear_writes();
            assert!(sim.writes().is_empty());
        }
    }
}
