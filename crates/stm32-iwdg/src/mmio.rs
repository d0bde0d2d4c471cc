//! Memory-mapped register binding.
//!
//! Layout per RM0316 (STM32F303) section 25; the IWDG block and the DBGMCU
//! freeze register sit at the same addresses on the F4 family.

#![expect(unsafe_code, reason = "volatile access to memory-mapped registers")]

use core::ptr;

use crate::registers::{IwdgRegisters, Key};

/// Base address of the IWDG register block.
pub const IWDG_BASE: usize = 0x4000_3000;

/// Address of `DBGMCU_APB1_FZ`.
pub const DBGMCU_APB1_FZ: usize = 0xE004_2008;

/// `DBG_IWDG_STOP` bit in `DBGMCU_APB1_FZ`.
pub const DBG_IWDG_STOP: u32 = 1 << 12;

// Word offsets into the IWDG block.
const KR: usize = 0;
const PR: usize = 1;
const RLR: usize = 2;
const SR: usize = 3;

/// [`IwdgRegisters`] bound to the peripheral's memory-mapped registers.
///
/// The binding is `Sync`, so a controller over `&'static MmioIwdg` can be
/// shared with an interrupt handler that only calls `refresh`.
#[derive(Debug)]
pub struct MmioIwdg {
    iwdg: *mut u32,
    apb1_fz: *mut u32,
}

impl MmioIwdg {
    /// Bind to the IWDG and DBGMCU at their fixed addresses.
    ///
    /// # Safety
    ///
    /// Must only be called on a part with this register layout, and no other
    /// code may drive the IWDG registers while the binding exists.
    #[must_use]
    pub unsafe fn steal() -> Self {
        Self {
            iwdg: IWDG_BASE as *mut u32,
            apb1_fz: DBGMCU_APB1_FZ as *mut u32,
        }
    }

    /// Bind to an IWDG block and freeze register at arbitrary addresses.
    ///
    /// # Safety
    ///
    /// `iwdg` must be valid for volatile reads and writes of four consecutive
    /// `u32` words and `apb1_fz` of one, for as long as the binding exists.
    #[must_use]
    pub unsafe fn from_raw(iwdg: *mut u32, apb1_fz: *mut u32) -> Self {
        Self { iwdg, apb1_fz }
    }

    fn write(&self, word: usize, value: u32) {
        // SAFETY: `steal`/`from_raw` guarantee the block is valid for four words.
        unsafe { ptr::write_volatile(self.iwdg.wrapping_add(word), value) }
    }

    fn read(&self, word: usize) -> u32 {
        // SAFETY: `steal`/`from_raw` guarantee the block is valid for four words.
        unsafe { ptr::read_volatile(self.iwdg.wrapping_add(word)) }
    }
}

// SAFETY: the binding holds addresses of hardware registers, not references to
// thread-local data; callers serialize configuration per the constructors' contract.
unsafe impl Send for MmioIwdg {}

// SAFETY: every register access is one aligned 32-bit volatile load or store,
// which the bus performs indivisibly. The only read-modify-write
// (`set_debug_stop`) is reached through `init`, which takes `&mut` on the
// controller.
unsafe impl Sync for MmioIwdg {}

impl IwdgRegisters for MmioIwdg {
    fn write_key(&self, key: Key) {
        self.write(KR, key.value());
    }

    fn write_prescaler(&self, code: u8) {
        self.write(PR, u32::from(code & 0x7));
    }

    fn write_reload(&self, reload: u16) {
        self.write(RLR, u32::from(reload & crate::timing::MAX_RELOAD));
    }

    fn read_status(&self) -> u32 {
        self.read(SR)
    }

    #[expect(clippy::cast_possible_truncation, reason = "masked to 3 bits")]
    fn read_prescaler(&self) -> u8 {
        (self.read(PR) & 0x7) as u8
    }

    #[expect(clippy::cast_possible_truncation, reason = "masked to 12 bits")]
    fn read_reload(&self) -> u16 {
        (self.read(RLR) & u32::from(crate::timing::MAX_RELOAD)) as u16
    }

    fn set_debug_stop(&self, stop: bool) {
        // SAFETY: `steal`/`from_raw` guarantee `apb1_fz` is valid.
        let current = unsafe { ptr::read_volatile(self.apb1_fz) };
        let next = if stop {
            current | DBG_IWDG_STOP
        } else {
            current & !DBG_IWDG_STOP
        };
        // SAFETY: as above.
        unsafe { ptr::write_volatile(self.apb1_fz, next) }
    }
}
