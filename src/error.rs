//! Error types for the GSM 06.10 codec.

use thiserror::Error;

/// GSM 06.10 codec errors.
///
/// The signal-processing core is total: every arithmetic operation
/// saturates and every quantizer input is clipped or masked, so errors
/// only arise at the API boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Gsm610Error {
    /// PCM frame with the wrong number of samples.
    #[error("Invalid frame size: {0} samples (a frame is 160 samples)")]
    InvalidFrameSize(usize),

    /// Buffer too small for a packed frame.
    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// Packed frame whose signature nibble is not 0x0D.
    #[error("Invalid frame signature: 0x{0:02x}")]
    InvalidSignature(u8),
}

/// Result type for GSM 06.10 operations.
pub type Result<T> = std::result::Result<T, Gsm610Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Gsm610Error::InvalidFrameSize(159);
        assert!(err.to_string().contains("159"));

        let err = Gsm610Error::BufferTooSmall {
            needed: 33,
            available: 20,
        };
        assert!(err.to_string().contains("33"));
        assert!(err.to_string().contains("20"));

        let err = Gsm610Error::InvalidSignature(0x07);
        assert!(err.to_string().contains("0x07"));
    }
}
