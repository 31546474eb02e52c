//! # GSM 06.10 full-rate codec
//!
//! A bit-exact, fixed-point implementation of the GSM full-rate speech
//! codec (RPE-LTP, ETSI EN 300 961). The encoder turns frames of 160
//! linear PCM samples (8 kHz, 13 bits left-aligned in an `i16`) into a
//! 76-field parameter set that packs into 33 bytes; the decoder
//! reconstructs 160 samples from such a parameter set.
//!
//! ## Usage
//!
//! ```
//! use gsm610::{Decoder, Encoder, Parameters};
//!
//! let mut encoder = Encoder::new();
//! let mut decoder = Decoder::new();
//!
//! let pcm = [0i16; gsm610::FRAME_SAMPLES];
//! let params = encoder.encode(&pcm)?;
//!
//! // Wire format per RFC 3551 §4.5.8.1.
//! let frame = params.to_bytes();
//! assert!(Parameters::is_valid_frame(&frame));
//!
//! let received = Parameters::unpack(&frame)?;
//! let out = decoder.decode(&received);
//! assert!(out.iter().all(|&s| s & 7 == 0));
//! # Ok::<(), gsm610::Gsm610Error>(())
//! ```
//!
//! ## Properties
//!
//! - All arithmetic goes through saturating fixed-point primitives
//!   ([`fixed`]); no wrapping overflow is observable.
//! - Encoder and decoder are stateful per stream and deterministic:
//!   encoding frames 0..N on one instance equals encoding them on a
//!   freshly reset instance.
//! - The decoder is total: any parameter bit pattern yields 160 samples
//!   with bounded energy and zeroed low bits.
//! - With homing enabled, the encoder homing frame (160 samples of
//!   0x0008) resets the encoder with one frame of latency, per ETSI
//!   EN 300 961 Annex A.

#![warn(missing_docs)]

pub mod bitstream;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod fixed;
pub mod frame;
pub mod tables;

mod long_term;
mod rpe;
mod short_term;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{Gsm610Error, Result};
pub use frame::{Parameters, SubframeParameters};

/// Sample rate of the codec in Hz.
pub const SAMPLE_RATE: u32 = 8000;

/// Samples per frame (20 ms at 8 kHz).
pub const FRAME_SAMPLES: usize = 160;

/// Samples per sub-segment; four sub-segments make a frame.
pub const SUBFRAME_SAMPLES: usize = 40;

/// Bytes in a packed frame.
pub const FRAME_BYTES: usize = 33;

/// Bits in a packed frame, including the signature nibble.
pub const FRAME_BITS: usize = 264;

/// Sample value of the encoder homing frame: the 13-bit pattern with
/// only its least significant bit set, left-justified in 16 bits.
pub const HOMING_SAMPLE: i16 = 0x0008;
