//! Prescaler/reload derivation for the independent watchdog.
//!
//! The IWDG counts down from a 12-bit reload value at the LSI frequency
//! divided by a power-of-two prescaler. At the nominal 32 kHz LSI, the /32
//! divider yields exactly one count per millisecond, which is where the
//! derivation starts.

use crate::error::{IwdgError, IwdgResult};

/// Nominal LSI oscillator frequency in Hz.
pub const LSI_FREQUENCY_HZ: u32 = 32_000;

/// Largest value the 12-bit reload register can hold.
pub const MAX_RELOAD: u16 = 0x0FFF;

/// Exclusive upper bound on the expiration, in milliseconds.
///
/// `(MAX_RELOAD + 1) * 256 * 1000 / LSI_FREQUENCY_HZ`
pub const MAX_EXPIRATION_MS: u32 =
    (MAX_RELOAD as u32 + 1) * Prescaler::Div256.divider() * 1000 / LSI_FREQUENCY_HZ;

/// Worst-case time for a prescaler/reload update to propagate, in milliseconds.
///
/// Six LSI cycles at the largest divider: `6 * 256 * 1000 / LSI_FREQUENCY_HZ`.
pub const STATUS_TIMEOUT_MS: u32 = 6 * Prescaler::Div256.divider() * 1000 / LSI_FREQUENCY_HZ;

/// Prescaler divider applied to the LSI clock.
///
/// The discriminant is the 3-bit value written to the prescaler register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum Prescaler {
    /// Divide by 4. Hardware reset value.
    #[default]
    Div4 = 0,
    /// Divide by 8.
    Div8 = 1,
    /// Divide by 16.
    Div16 = 2,
    /// Divide by 32. One count per millisecond at the nominal LSI frequency.
    Div32 = 3,
    /// Divide by 64.
    Div64 = 4,
    /// Divide by 128.
    Div128 = 5,
    /// Divide by 256.
    Div256 = 6,
}

impl Prescaler {
    /// The divider that yields one count per millisecond.
    pub const ONE_COUNT_PER_MS: Self = Self::Div32;

    /// Register code for this divider.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Division factor applied to the LSI clock.
    #[must_use]
    pub const fn divider(self) -> u32 {
        4 << (self as u32)
    }

    /// Decode a register value. Code 7 is the hardware alias of /256.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Div4),
            1 => Some(Self::Div8),
            2 => Some(Self::Div16),
            3 => Some(Self::Div32),
            4 => Some(Self::Div64),
            5 => Some(Self::Div128),
            6 | 7 => Some(Self::Div256),
            _ => None,
        }
    }

    /// The next larger divider, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Div4 => Some(Self::Div8),
            Self::Div8 => Some(Self::Div16),
            Self::Div16 => Some(Self::Div32),
            Self::Div32 => Some(Self::Div64),
            Self::Div64 => Some(Self::Div128),
            Self::Div128 => Some(Self::Div256),
            Self::Div256 => None,
        }
    }
}

impl core::fmt::Display for Prescaler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "/{}", self.divider())
    }
}

/// Reject expirations the hardware cannot represent.
///
/// # Errors
///
/// Returns [`IwdgError::OutOfRange`] if `expiration_ms >= MAX_EXPIRATION_MS`.
pub fn check_expiration(expiration_ms: u32) -> IwdgResult<()> {
    if expiration_ms >= MAX_EXPIRATION_MS {
        return Err(IwdgError::out_of_range(expiration_ms));
    }
    Ok(())
}

/// A prescaler/reload register pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timing {
    prescaler: Prescaler,
    reload: u16,
}

impl Timing {
    /// Register values after a hardware reset: /4 with a full reload.
    pub const HARDWARE_DEFAULT: Self = Self {
        prescaler: Prescaler::Div4,
        reload: MAX_RELOAD,
    };

    /// Derive the register pair for an expiration in milliseconds.
    ///
    /// Starts at one count per millisecond and, while the count does not fit
    /// in 12 bits, doubles the divider and halves the count (truncating).
    ///
    /// # Errors
    ///
    /// Returns [`IwdgError::OutOfRange`] if `expiration_ms >= MAX_EXPIRATION_MS`.
    pub fn for_expiration(expiration_ms: u32) -> IwdgResult<Self> {
        check_expiration(expiration_ms)?;

        let mut prescaler = Prescaler::ONE_COUNT_PER_MS;
        let mut reload = expiration_ms;
        while reload > u32::from(MAX_RELOAD) {
            prescaler = prescaler
                .next()
                .ok_or(IwdgError::out_of_range(expiration_ms))?;
            reload >>= 1;
        }

        Ok(Self {
            prescaler,
            reload: reload_bits(reload),
        })
    }

    /// Build a timing from raw register values.
    ///
    /// The prescaler is masked to 3 bits and the reload to 12 bits, as the
    /// hardware does.
    #[must_use]
    pub fn from_registers(prescaler_code: u8, reload: u16) -> Self {
        Self {
            prescaler: Prescaler::from_code(prescaler_code & 0x7).unwrap_or(Prescaler::Div256),
            reload: reload & MAX_RELOAD,
        }
    }

    /// The prescaler divider.
    #[must_use]
    pub fn prescaler(&self) -> Prescaler {
        self.prescaler
    }

    /// The reload count.
    #[must_use]
    pub fn reload(&self) -> u16 {
        self.reload
    }

    /// Expiration in milliseconds at the nominal LSI frequency.
    ///
    /// Sub-millisecond dividers round down.
    #[must_use]
    pub fn expiration_ms(&self) -> u32 {
        u32::from(self.reload) * self.prescaler.divider() * 1000 / LSI_FREQUENCY_HZ
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::HARDWARE_DEFAULT
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "callers bound the value by MAX_RELOAD"
)]
fn reload_bits(reload: u32) -> u16 {
    (reload & u32::from(MAX_RELOAD)) as u16
}
