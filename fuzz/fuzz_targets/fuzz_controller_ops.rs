//! Fuzzes arbitrary sequences of controller operations against the simulated
//! peripheral.
//!
//! Each byte selects an operation; following bytes feed its argument. The
//! controller must never panic, never write protected registers while the
//! status register is busy, and never leave the watchdog disabled once enabled
//! (short of an expiry reset).
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_controller_ops
#![no_main]

use libfuzzer_sys::fuzz_target;
use stm32_iwdg::prelude::*;

fuzz_target!(|data: &[u8]| {
    let regs = SimulatedIwdg::new();
    let clock = ManualClock::with_auto_advance(0, 1);
    let mut watchdog = IndependentWatchdog::new(&regs, &clock);

    let mut held = false;
    let mut bytes = data.iter().copied();
    while let Some(op) = bytes.next() {
        let arg = u32::from(bytes.next().unwrap_or(0)) << 8 | u32::from(bytes.next().unwrap_or(0));
        let resets_before = regs.reset_count();
        let was_counting = regs.state().is_counting();

        match op % 6 {
            0 => {
                let _ = watchdog.init(arg);
            }
            1 => {
                regs.clear_writes();
                let result = watchdog.set_expiration(arg);
                if held && arg < MAX_EXPIRATION_MS {
                    assert!(matches!(result, Err(IwdgError::Busy { .. })));
                    assert!(regs.writes().is_empty());
                }
            }
            2 => watchdog.refresh(),
            3 => {
                let _ = regs.advance_ms(arg);
            }
            4 => regs.set_update_latency(arg % 128),
            _ => {
                held = arg % 2 == 0;
                if held {
                    regs.hold_status(status::PVU);
                } else {
                    regs.release_status();
                }
            }
        }

        if was_counting && regs.reset_count() == resets_before {
            assert!(regs.state().is_counting());
        }
    }
});
