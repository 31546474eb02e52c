//! Quantizer tables from ETSI EN 300 961, tables 5.1 through 5.6.
//!
//! The tables are indexed by coefficient number 1..8 in the standard;
//! here they are zero-based, so index `i` holds the entry for
//! coefficient `i + 1`.

/// Slopes of the LAR quantizer, scaled down by 32 (table 5.1).
pub const LAR_A: [i16; 8] = [20480, 20480, 20480, 20480, 13964, 15360, 8534, 9036];

/// Offsets of the LAR quantizer, scaled down by 64 (table 5.1).
pub const LAR_B: [i16; 8] = [0, 0, 2048, -2560, 94, -1792, -341, -1144];

/// Lower bounds of the quantized LAR values (table 5.1).
pub const LAR_MIC: [i16; 8] = [-32, -32, -16, -16, -8, -8, -4, -4];

/// Upper bounds of the quantized LAR values (table 5.1).
pub const LAR_MAC: [i16; 8] = [31, 31, 15, 15, 7, 7, 3, 3];

/// Multiplicative inverses of the LAR slopes, used when decoding the
/// coded log-area ratios (table 5.2).
pub const LAR_INVA: [i16; 8] = [13107, 13107, 13107, 13107, 19223, 17476, 31454, 29708];

/// Decision levels of the LTP gain quantizer (table 5.3a).
pub const DLB: [i16; 4] = [6554, 16384, 26214, 32767];

/// Quantization levels of the LTP gain quantizer (table 5.3b).
pub const QLB: [i16; 4] = [3277, 11469, 21299, 32767];

/// Impulse response of the RPE weighting filter (table 5.4).
pub const WEIGHTING_H: [i16; 11] = [
    -134, -374, 0, 2054, 5741, 8192, 5741, 2054, 0, -374, -134,
];

/// Normalized inverse mantissa used to quantize the RPE pulses against
/// the block maximum (table 5.5).
pub const NRFAC: [i16; 8] = [29128, 26215, 23832, 21846, 20165, 18725, 17476, 16384];

/// Normalized direct mantissa used to reconstruct the RPE pulses from
/// the block maximum (table 5.6).
pub const FAC: [i16; 8] = [18431, 20479, 22527, 24575, 26623, 28671, 30719, 32767];
