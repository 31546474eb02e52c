//! Frame parameter record and the 33-byte wire codec.
//!
//! A coded frame carries 76 parameter fields: eight log-area-ratio codes
//! followed by four sub-segments of LTP lag, LTP gain, RPE grid phase,
//! block maximum, and thirteen pulse codes. Packed per RFC 3551
//! §4.5.8.1 the frame is 264 bits (33 bytes), opening with the constant
//! signature nibble 0x0D.

use crate::bitstream::{FrameReader, FrameWriter};
use crate::error::{Gsm610Error, Result};
use crate::{FRAME_BITS, FRAME_BYTES};

/// Bit widths of the eight coded log-area ratios.
pub const LARC_WIDTHS: [u8; 8] = [6, 6, 5, 5, 4, 4, 3, 3];

/// Signature nibble carried in the low nibble of byte 0.
pub const FRAME_SIGNATURE: u8 = 0x0D;

/// Parameters of one 40-sample sub-segment.
///
/// Fields are held as 16-bit integers for convenience; each is a small
/// unsigned code whose width is fixed by the wire layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubframeParameters {
    /// LTP lag, 7 bits, nominal range 40..=120.
    pub nc: u16,
    /// LTP gain quantizer index, 2 bits.
    pub bc: u16,
    /// RPE grid position, 2 bits.
    pub mc: u16,
    /// Block maximum quantizer code, 6 bits.
    pub xmaxc: u16,
    /// RPE pulse codes, 3 bits each.
    pub xmc: [u16; 13],
}

impl SubframeParameters {
    fn pack(&self, writer: &mut FrameWriter<'_>) {
        writer.write_bits(self.nc as u8, 7);
        writer.write_bits(self.bc as u8, 2);
        writer.write_bits(self.mc as u8, 2);
        writer.write_bits(self.xmaxc as u8, 6);
        for &pulse in &self.xmc {
            writer.write_bits(pulse as u8, 3);
        }
    }

    fn unpack(reader: &mut FrameReader<'_>) -> Self {
        let mut sub = Self {
            nc: u16::from(reader.read_bits(7)),
            bc: u16::from(reader.read_bits(2)),
            mc: u16::from(reader.read_bits(2)),
            xmaxc: u16::from(reader.read_bits(6)),
            xmc: [0; 13],
        };
        for pulse in &mut sub.xmc {
            *pulse = u16::from(reader.read_bits(3));
        }
        sub
    }
}

/// The full parameter set of one coded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Parameters {
    /// Coded log-area ratios, widths {6, 6, 5, 5, 4, 4, 3, 3} bits.
    pub larc: [u16; 8],
    /// The four sub-segment parameter sets.
    pub subframes: [SubframeParameters; 4],
}

impl Parameters {
    /// Pack the frame into the first 33 bytes of `buf`.
    pub fn pack_into(&self, buf: &mut [u8]) -> Result<()> {
        if buf.len() < FRAME_BYTES {
            return Err(Gsm610Error::BufferTooSmall {
                needed: FRAME_BYTES,
                available: buf.len(),
            });
        }
        let mut writer = FrameWriter::new(buf);
        writer.write_bits(FRAME_SIGNATURE, 4);
        for (larc, width) in self.larc.iter().zip(LARC_WIDTHS) {
            writer.write_bits(*larc as u8, width);
        }
        for sub in &self.subframes {
            sub.pack(&mut writer);
        }
        debug_assert_eq!(writer.bits_used(), FRAME_BITS);
        Ok(())
    }

    /// Pack the frame into a fresh 33-byte array.
    pub fn to_bytes(&self) -> [u8; FRAME_BYTES] {
        let mut buf = [0u8; FRAME_BYTES];
        self.pack_into(&mut buf)
            .expect("fixed-size buffer holds a frame");
        buf
    }

    /// Unpack a frame from the first 33 bytes of `buf`.
    ///
    /// The signature nibble is consumed but not enforced; use
    /// [`Parameters::is_valid_frame`] to reject foreign data before
    /// decoding.
    pub fn unpack(buf: &[u8]) -> Result<Self> {
        if buf.len() < FRAME_BYTES {
            return Err(Gsm610Error::BufferTooSmall {
                needed: FRAME_BYTES,
                available: buf.len(),
            });
        }
        let mut reader = FrameReader::new(buf);
        reader.read_bits(4);
        let mut params = Self::default();
        for (larc, width) in params.larc.iter_mut().zip(LARC_WIDTHS) {
            *larc = u16::from(reader.read_bits(width));
        }
        for sub in &mut params.subframes {
            *sub = SubframeParameters::unpack(&mut reader);
        }
        debug_assert_eq!(reader.bits_used(), FRAME_BITS);
        Ok(params)
    }

    /// Whether `buf` starts with the GSM frame signature nibble.
    pub fn is_valid_frame(buf: &[u8]) -> bool {
        buf.first().map_or(false, |b| b & 0x0F == FRAME_SIGNATURE)
    }

    /// The 76 parameter fields in declaration order, as used by the
    /// conformance-vector `.cod` files.
    pub fn to_words(&self) -> [u16; 76] {
        let mut words = [0u16; 76];
        words[..8].copy_from_slice(&self.larc);
        for (j, sub) in self.subframes.iter().enumerate() {
            let base = 8 + j * 17;
            words[base] = sub.nc;
            words[base + 1] = sub.bc;
            words[base + 2] = sub.mc;
            words[base + 3] = sub.xmaxc;
            words[base + 4..base + 17].copy_from_slice(&sub.xmc);
        }
        words
    }

    /// Rebuild a parameter record from its 76-word vector layout.
    pub fn from_words(words: &[u16; 76]) -> Self {
        let mut params = Self::default();
        params.larc.copy_from_slice(&words[..8]);
        for (j, sub) in params.subframes.iter_mut().enumerate() {
            let base = 8 + j * 17;
            sub.nc = words[base];
            sub.bc = words[base + 1];
            sub.mc = words[base + 2];
            sub.xmaxc = words[base + 3];
            sub.xmc.copy_from_slice(&words[base + 4..base + 17]);
        }
        params
    }
}
