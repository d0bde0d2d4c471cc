//! Error types for IWDG operations.

use thiserror::Error;

/// Errors that can occur while configuring the independent watchdog.
///
/// Every variant is `Copy` so errors can be returned from code that runs
/// before any allocator exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum IwdgError {
    /// Requested expiration cannot be represented by the prescaler/reload pair.
    ///
    /// Raised before any register is written.
    #[error("expiration of {requested_ms} ms is out of range (must be below {max_ms} ms)")]
    OutOfRange {
        /// The rejected expiration in milliseconds.
        requested_ms: u32,
        /// Exclusive upper bound in milliseconds.
        max_ms: u32,
    },

    /// A previous prescaler/reload update is still propagating.
    ///
    /// No register was written. The caller may retry later.
    #[error("watchdog registers are busy (status {status:#x})")]
    Busy {
        /// Raw status register value observed.
        status: u32,
    },

    /// The status register did not clear within the poll window.
    ///
    /// The prescaler/reload writes may or may not have taken effect.
    #[error("watchdog register update timed out after {elapsed_ms} ms (status {status:#x})")]
    Timeout {
        /// Milliseconds elapsed when the poll gave up.
        elapsed_ms: u32,
        /// Raw status register value at the last poll.
        status: u32,
    },
}

impl IwdgError {
    /// Create an out-of-range error for the given request.
    #[must_use]
    pub fn out_of_range(requested_ms: u32) -> Self {
        Self::OutOfRange {
            requested_ms,
            max_ms: crate::timing::MAX_EXPIRATION_MS,
        }
    }

    /// Numeric error code for compact reporting.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::OutOfRange { .. } => 1,
            Self::Busy { .. } => 2,
            Self::Timeout { .. } => 3,
        }
    }

    /// Whether re-issuing the same request can succeed.
    ///
    /// After a `Timeout` the installed timing is unknown, so re-issuing
    /// `set_expiration` is the only way back to a known state.
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Busy { .. } | Self::Timeout { .. })
    }
}

/// A specialized `Result` type for IWDG operations.
pub type IwdgResult<T> = core::result::Result<T, IwdgError>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_error_display() {
        assert_eq!(
            IwdgError::out_of_range(40_000).to_string(),
            "expiration of 40000 ms is out of range (must be below 32768 ms)"
        );
        assert_eq!(
            IwdgError::Busy { status: 0x3 }.to_string(),
            "watchdog registers are busy (status 0x3)"
        );
        assert_eq!(
            IwdgError::Timeout {
                elapsed_ms: 49,
                status: 0x1
            }
            .to_string(),
            "watchdog register update timed out after 49 ms (status 0x1)"
        );
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let codes = [
            IwdgError::out_of_range(0).code(),
            IwdgError::Busy { status: 1 }.code(),
            IwdgError::Timeout {
                elapsed_ms: 0,
                status: 0,
            }
            .code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in codes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_retryable() {
        assert!(!IwdgError::out_of_range(32_768).is_retryable());
        assert!(IwdgError::Busy { status: 1 }.is_retryable());
        assert!(
            IwdgError::Timeout {
                elapsed_ms: 49,
                status: 2
            }
            .is_retryable()
        );
    }
}
