//! Fuzzes the prescaler/reload derivation and register decoding.
//!
//! Verifies the reload always fits 12 bits, the read-back never exceeds the
//! request, and raw register values always decode.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_timing
#![no_main]

use libfuzzer_sys::fuzz_target;
use stm32_iwdg::{MAX_EXPIRATION_MS, MAX_RELOAD, Timing};

fuzz_target!(|data: &[u8]| {
    let Some(bytes) = data.first_chunk::<4>() else {
        return;
    };
    let ms = u32::from_le_bytes(*bytes);

    match Timing::for_expiration(ms) {
        Ok(timing) => {
            assert!(ms < MAX_EXPIRATION_MS);
            assert!(timing.reload() <= MAX_RELOAD);
            assert!(timing.expiration_ms() <= ms);
        }
        Err(_) => assert!(ms >= MAX_EXPIRATION_MS),
    }

    if let [pr, rl0, rl1, ..] = data {
        let timing = Timing::from_registers(*pr, u16::from_le_bytes([*rl0, *rl1]));
        assert!(timing.reload() <= MAX_RELOAD);
    }
});
