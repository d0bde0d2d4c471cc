//! Peripheral state as observed through the controller.
//!
//! The controller itself keeps no state; the live registers are the state.
//! This module names the states those registers move through so models and
//! tests can reason about them.
//!
//! ```text
//! Disabled ──enable──► CountingDown(default)
//!                          │   ▲
//!          set_expiration  │   │ refresh (counter := reload)
//!                          ▼   │
//!                      CountingDown(timing)
//!                          │
//!                  counter reaches 0
//!                          ▼
//!                    device reset ──► Disabled
//! ```

use crate::timing::Timing;

/// State of the IWDG peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeripheralState {
    /// Not yet enabled since power-on or the last reset.
    #[default]
    Disabled,
    /// Enabled and counting down.
    CountingDown {
        /// Prescaler/reload currently installed.
        timing: Timing,
        /// Current counter value.
        counter: u16,
    },
}

impl PeripheralState {
    /// Whether the watchdog is enabled.
    #[must_use]
    pub fn is_counting(&self) -> bool {
        matches!(self, Self::CountingDown { .. })
    }

    /// Installed timing, if counting.
    #[must_use]
    pub fn timing(&self) -> Option<Timing> {
        match self {
            Self::Disabled => None,
            Self::CountingDown { timing, .. } => Some(*timing),
        }
    }

    /// Current counter value, if counting.
    #[must_use]
    pub fn counter(&self) -> Option<u16> {
        match self {
            Self::Disabled => None,
            Self::CountingDown { counter, .. } => Some(*counter),
        }
    }

    /// Get the state as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "Disabled",
            Self::CountingDown { .. } => "CountingDown",
        }
    }
}

impl core::fmt::Display for PeripheralState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Disabled => f.write_str("Disabled"),
            Self::CountingDown { timing, counter } => write!(
                f,
                "CountingDown({}/{} {})",
                counter,
                timing.reload(),
                timing.prescaler()
            ),
        }
    }
}
