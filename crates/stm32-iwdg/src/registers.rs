//! Register-level access to the IWDG peripheral.
//!
//! The controller never touches memory directly. It drives an
//! [`IwdgRegisters`] implementation, which is bound to the memory-mapped
//! peripheral in production ([`crate::mmio::MmioIwdg`]) and to a software
//! model in tests.

/// Magic values accepted by the key register (`IWDG_KR`).
///
/// These are bit-exact hardware contracts from the reference manual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Key {
    /// Start the watchdog (and the LSI oscillator).
    Enable = 0xCCCC,
    /// Unlock the prescaler and reload registers for writing.
    Unlock = 0x5555,
    /// Reload the counter and re-lock the protected registers.
    Refresh = 0xAAAA,
}

impl Key {
    /// Value written to the 32-bit key register.
    #[must_use]
    pub const fn value(self) -> u32 {
        self as u32
    }

    /// Decode a key register value.
    #[must_use]
    pub const fn from_value(value: u32) -> Option<Self> {
        match value {
            0xCCCC => Some(Self::Enable),
            0x5555 => Some(Self::Unlock),
            0xAAAA => Some(Self::Refresh),
            _ => None,
        }
    }
}

/// Bits of the status register (`IWDG_SR`).
pub mod status {
    /// Prescaler value update in progress.
    pub const PVU: u32 = 1 << 0;
    /// Reload value update in progress.
    pub const RVU: u32 = 1 << 1;
    /// Window value update in progress (parts with a window register).
    pub const WVU: u32 = 1 << 2;
}

/// Register operations the watchdog controller needs.
///
/// All methods take `&self`: the registers are memory-mapped state with no
/// software-side ownership, and [`Key::Refresh`] must be writable from an
/// interrupt while the controller is borrowed elsewhere. Callers serialize
/// access to the configuration sequence themselves.
pub trait IwdgRegisters {
    /// Write a magic value to the key register.
    fn write_key(&self, key: Key);

    /// Write the 3-bit prescaler code. Ignored by hardware while locked.
    fn write_prescaler(&self, code: u8);

    /// Write the 12-bit reload value. Ignored by hardware while locked.
    fn write_reload(&self, reload: u16);

    /// Read the raw status register.
    fn read_status(&self) -> u32;

    /// Read the prescaler register.
    fn read_prescaler(&self) -> u8;

    /// Read the reload register.
    fn read_reload(&self) -> u16;

    /// Set whether the watchdog stops counting while the core is halted by a debugger.
    fn set_debug_stop(&self, stop: bool);
}

impl<T: IwdgRegisters + ?Sized> IwdgRegisters for &T {
    fn write_key(&self, key: Key) {
        (**self).write_key(key);
    }

    fn write_prescaler(&self, code: u8) {
        (**self).write_prescaler(code);
    }

    fn write_reload(&self, reload: u16) {
        (**self).write_reload(reload);
    }

    fn read_status(&self) -> u32 {
        (**self).read_status()
    }

    fn read_prescaler(&self) -> u8 {
        (**self).read_prescaler()
    }

    fn read_reload(&self) -> u16 {
        (**self).read_reload()
    }

    fn set_debug_stop(&self, stop: bool) {
        (**self).set_debug_stop(stop);
    }
}
