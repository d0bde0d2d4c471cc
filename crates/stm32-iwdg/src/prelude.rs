//! Prelude for stm32-iwdg.
//!
//! This module re-exports the most commonly used types for convenient importing.
//!
//! # Example
//!
//! ```rust
//! use stm32_iwdg::prelude::*;
//!
//! let timing = Timing::for_expiration(5000).expect("in range");
//! assert_eq!(timing.prescaler(), Prescaler::Div64);
//! assert_eq!(timing.reload(), 2500);
//! ```

pub use crate::clock::{FnTicks, TickSource};
pub use crate::controller::IndependentWatchdog;
pub use crate::error::{IwdgError, IwdgResult};
pub use crate::mmio::MmioIwdg;
pub use crate::registers::{IwdgRegisters, Key, status};
pub use crate::sim::ManualClock;
#[cfg(feature = "std")]
pub use crate::sim::{RegisterWrite, SimulatedIwdg};
pub use crate::state::PeripheralState;
pub use crate::timing::{
    MAX_EXPIRATION_MS, MAX_RELOAD, Prescaler, STATUS_TIMEOUT_MS, Timing, check_expiration,
};
