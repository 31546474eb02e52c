//! GSM 06.10 decoder.
//!
//! Decoding reverses the transmit chain: inverse RPE, long-term
//! synthesis against the residual history, short-term synthesis through
//! the inverse lattice, then deemphasis and output scaling. State
//! carries across frames, so one instance serves one stream.

use tracing::debug;

use crate::fixed::{add, mult_r};
use crate::frame::Parameters;
use crate::short_term;
use crate::tables::QLB;
use crate::{rpe, FRAME_SAMPLES};

/// GSM 06.10 full-rate decoder.
///
/// Any 33-byte bit pattern decodes to 160 samples; callers that want to
/// reject foreign data check [`Parameters::is_valid_frame`] first.
///
/// ```
/// use gsm610::{Decoder, Parameters};
///
/// let mut decoder = Decoder::new();
/// let pcm = decoder.decode(&Parameters::default());
/// assert_eq!(pcm.len(), 160);
/// ```
#[derive(Debug, Clone)]
pub struct Decoder {
    /// Last valid LTP lag.
    nrp: i16,
    /// Reconstructed residual: 120 samples of history followed by the
    /// sub-segment being built.
    drp: [i16; 160],
    /// Previous frame's decoded log-area ratios.
    larpp_last: [i16; 8],
    /// Synthesis lattice memory.
    v: [i16; 9],
    /// Deemphasis memory.
    msr: i16,
}

impl Decoder {
    /// Create a decoder in its home state.
    pub fn new() -> Self {
        Self {
            nrp: 40,
            drp: [0; 160],
            larpp_last: [0; 8],
            v: [0; 9],
            msr: 0,
        }
    }

    /// Return the decoder to its home state.
    pub fn reset(&mut self) {
        debug!("resetting decoder to home state");
        *self = Self::new();
    }

    /// Decode one frame of parameters into 160 samples of 13-bit
    /// left-aligned PCM; the three low bits of every sample are zero.
    pub fn decode(&mut self, params: &Parameters) -> [i16; FRAME_SAMPLES] {
        let mut wt = [0i16; FRAME_SAMPLES];
        for (j, sub) in params.subframes.iter().enumerate() {
            // RPE decoding (5.3.1): reconstruct the excitation.
            let (exp, mant) = rpe::xmaxc_to_exp_mant(sub.xmaxc);
            let xmp = rpe::apcm_inverse_quantization(&sub.xmc, mant, exp);
            let erp = rpe::grid_positioning(sub.mc, &xmp);

            // Long-term synthesis filtering (5.3.2). Lags outside the
            // valid range fall back to the previous frame's lag, which
            // also keeps the history index in bounds for any input.
            let nr = if (40..=120).contains(&sub.nc) {
                sub.nc as i16
            } else {
                self.nrp
            };
            self.nrp = nr;
            let brp = QLB[(sub.bc & 3) as usize];
            for (k, &excitation) in erp.iter().enumerate() {
                let drpp = mult_r(brp, self.drp[k + 120 - nr as usize]);
                self.drp[120 + k] = add(excitation, drpp);
            }
            self.drp.copy_within(40.., 0);

            wt[j * 40..(j + 1) * 40].copy_from_slice(&self.drp[120..]);
        }

        // Short-term synthesis over the whole frame (5.3.3, 5.3.4).
        let rrp = short_term::reflection_coefficients(&params.larc, &mut self.larpp_last);
        let mut out = [0i16; FRAME_SAMPLES];
        short_term::synthesis_filter(&mut self.v, &rrp, &wt, &mut out);

        // Deemphasis, up-scaling, and truncation (5.3.5 through 5.3.7).
        for sample in &mut out {
            self.msr = add(*sample, mult_r(self.msr, 28180));
            *sample = add(self.msr, self.msr) & !7;
        }
        out
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}
