//! # stm32-iwdg
//!
//! Timing configuration and refresh for the STM32 independent watchdog (IWDG).
//!
//! The IWDG is a 12-bit down-counter clocked by the ~32 kHz LSI oscillator
//! through a power-of-two prescaler. Once enabled it cannot be stopped: if
//! the counter reaches zero the device resets. This crate provides:
//! - `Timing`: derivation of the prescaler/reload pair for an expiration in ms
//! - `IndependentWatchdog`: the three operations `init`, `set_expiration`, `refresh`
//! - `IwdgRegisters` / `TickSource`: injected seams for the registers and the tick counter
//! - `MmioIwdg`: the memory-mapped binding for real hardware
//! - `SimulatedIwdg` / `ManualClock`: software models for hardware-free tests
//!
//! ## Guarantees
//!
//! - **No allocation** in the controller
//! - **Bounded blocking**: the only wait is a status poll capped at 48ms
//! - **Out-of-range requests never touch hardware**
//! - **No disable path**: once enabled, the watchdog is only reconfigured or refreshed
//!
//! ## State Machine
//!
//! ```text
//! Disabled ──init()──► CountingDown(default)
//!                          │
//!                  set_expiration()
//!                          ▼
//!                   CountingDown(timing) ◄──refresh()──┐
//!                          │                           │
//!                          └───────────────────────────┘
//!                          │
//!                 counter reaches zero
//!                          ▼
//!                     device reset
//! ```
//!
//! ## Example
//!
//! ```rust
//! use stm32_iwdg::prelude::*;
//!
//! let regs = SimulatedIwdg::new();
//! let clock = ManualClock::with_auto_advance(0, 1);
//! let mut watchdog = IndependentWatchdog::new(&regs, &clock);
//!
//! watchdog.init(1000).expect("valid expiration");
//! assert!(regs.state().is_counting());
//!
//! // Called from the main loop well within the 1s window.
//! watchdog.refresh();
//! ```

#![no_std]
#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod clock;
pub mod controller;
pub mod error;
pub mod mmio;
pub mod prelude;
pub mod registers;
pub mod sim;
pub mod state;
pub mod timing;

pub use clock::{FnTicks, TickSource};
pub use controller::IndependentWatchdog;
pub use error::{IwdgError, IwdgResult};
pub use mmio::MmioIwdg;
pub use registers::{IwdgRegisters, Key};
pub use sim::ManualClock;
#[cfg(feature = "std")]
pub use sim::SimulatedIwdg;
pub use state::PeripheralState;
pub use timing::{MAX_EXPIRATION_MS, MAX_RELOAD, Prescaler, STATUS_TIMEOUT_MS, Timing};
