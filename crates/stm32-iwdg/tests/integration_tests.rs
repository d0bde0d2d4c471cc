//! Integration tests for the full watchdog lifecycle.

#![cfg(test)]
#![cfg(feature = "std")]

use stm32_iwdg::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

type TestResult = Result<(), Box<dyn std::error::Error>>;

mod full_lifecycle {
    use super::*;

    #[test]
    fn test_complete_lifecycle() -> TestResult {
        let regs = SimulatedIwdg::new();
        let clock = ManualClock::with_auto_advance(0, 1);
        let mut watchdog = IndependentWatchdog::new(&regs, &clock);

        assert_eq!(regs.state(), PeripheralState::Disabled);

        watchdog.init(2000)?;
        assert_eq!(
            regs.state(),
            PeripheralState::CountingDown {
                timing: Timing::for_expiration(2000)?,
                counter: 2000,
            }
        );

        for _ in 0..10 {
            assert!(!regs.advance_ms(1500));
            watchdog.refresh();
        }
        assert_eq!(regs.reset_count(), 0);

        watchdog.set_expiration(500)?;
        assert_eq!(regs.state().counter(), Some(500));
        assert!(regs.advance_ms(500));
        assert_eq!(regs.reset_count(), 1);
        Ok(())
    }

    #[test]
    fn test_retune_across_prescalers() -> TestResult {
        let regs = SimulatedIwdg::new();
        let clock = ManualClock::with_auto_advance(0, 1);
        let mut watchdog = IndependentWatchdog::new(&regs, &clock);
        watchdog.init(100)?;

        for ms in [100, 4095, 4096, 10_000, 20_000, 32_767, 250] {
            watchdog.set_expiration(ms)?;
            let timing = watchdog.current_timing()?;
            assert_eq!(timing, Timing::for_expiration(ms)?);
            assert!(ms - timing.expiration_ms() < timing.prescaler().divider() / 32);
        }
        Ok(())
    }

    #[test]
    fn test_slow_register_update_within_window() -> TestResult {
        let regs = SimulatedIwdg::new();
        let clock = ManualClock::with_auto_advance(0, 1);
        regs.set_update_latency(40);
        let mut watchdog = IndependentWatchdog::new(&regs, &clock);

        watchdog.init(8000)?;
        assert_eq!(watchdog.expiration_ms()?, 8000);
        Ok(())
    }

    #[test]
    fn test_tick_counter_wraps_during_poll() -> TestResult {
        let regs = SimulatedIwdg::new();
        let clock = ManualClock::with_auto_advance(u32::MAX - 10, 1);
        regs.set_update_latency(30);
        let mut watchdog = IndependentWatchdog::new(&regs, &clock);

        watchdog.set_expiration(1000)?;
        assert_eq!(regs.key_writes(Key::Refresh), 1);
        Ok(())
    }
}

mod platform_ticks {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_fn_ticks_bound_poll() {
        let regs = SimulatedIwdg::new();
        regs.set_update_latency(u32::MAX);
        let now = Cell::new(0u32);
        let ticks = FnTicks::new(|| {
            let t = now.get();
            now.set(t.wrapping_add(5));
            t
        });
        let mut watchdog = IndependentWatchdog::new(&regs, ticks);

        let result = watchdog.set_expiration(1000);
        assert!(matches!(
            result,
            Err(IwdgError::Timeout { elapsed_ms: 50, .. })
        ));
    }
}

mod concurrency {
    use super::*;

    #[test]
    fn test_refresh_from_another_thread() -> TestResult {
        let regs = SimulatedIwdg::new();
        let clock = ManualClock::with_auto_advance(0, 1);
        let mut watchdog = IndependentWatchdog::new(&regs, &clock);
        watchdog.init(1000)?;

        let done = AtomicBool::new(false);
        let refresher = IndependentWatchdog::new(&regs, &clock);
        thread::scope(|scope| {
            scope.spawn(|| {
                while !done.load(Ordering::Acquire) {
                    refresher.refresh();
                    thread::sleep(Duration::from_micros(200));
                }
            });

            for _ in 0..20 {
                let before = regs.key_writes(Key::Refresh);
                while regs.key_writes(Key::Refresh) == before {
                    thread::yield_now();
                }
                assert!(!regs.advance_ms(100));
            }
            done.store(true, Ordering::Release);
        });

        assert_eq!(regs.reset_count(), 0);
        assert!(regs.key_writes(Key::Refresh) >= 1);
        Ok(())
    }
}
