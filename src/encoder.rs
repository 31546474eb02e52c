//! GSM 06.10 encoder.
//!
//! The encoder is stateful across frames: the offset-compensation and
//! pre-emphasis memories, the analysis lattice, the previous frame's
//! decoded log-area ratios, and the 120-sample reconstructed residual
//! history all carry over. One instance serves one stream.

use tracing::debug;

use crate::error::{Gsm610Error, Result};
use crate::fixed::{add, l_add, l_mult, l_sub, mult, mult_r, norm, s_abs, sub};
use crate::frame::{Parameters, SubframeParameters};
use crate::tables::{LAR_A, LAR_B, LAR_MAC, LAR_MIC};
use crate::{long_term, rpe, short_term};
use crate::{FRAME_SAMPLES, HOMING_SAMPLE};

/// GSM 06.10 full-rate encoder.
///
/// ```
/// use gsm610::Encoder;
///
/// let mut encoder = Encoder::new();
/// let pcm = [0i16; 160];
/// let params = encoder.encode(&pcm).unwrap();
/// let frame = params.to_bytes();
/// assert_eq!(frame.len(), 33);
/// ```
#[derive(Debug, Clone)]
pub struct Encoder {
    homing_supported: bool,
    last_frame_home: bool,
    /// Offset-compensation memory (non-recursive part).
    z1: i16,
    /// Offset-compensation memory (recursive part).
    l_z2: i32,
    /// Pre-emphasis memory.
    mp: i16,
    /// Previous frame's decoded log-area ratios.
    larpp_last: [i16; 8],
    /// Analysis lattice memory.
    u: [i16; 8],
    /// Reconstructed short-term residual history, oldest first.
    dp: [i16; 120],
}

impl Encoder {
    /// Create an encoder with homing-frame support enabled.
    pub fn new() -> Self {
        Self::with_homing(true)
    }

    /// Create an encoder that treats the homing frame as ordinary input.
    pub fn without_homing() -> Self {
        Self::with_homing(false)
    }

    fn with_homing(homing_supported: bool) -> Self {
        Self {
            homing_supported,
            last_frame_home: false,
            z1: 0,
            l_z2: 0,
            mp: 0,
            larpp_last: [0; 8],
            u: [0; 8],
            dp: [0; 120],
        }
    }

    /// Return the encoder to its home state.
    pub fn reset(&mut self) {
        self.reset_signal_state();
        self.last_frame_home = false;
    }

    fn reset_signal_state(&mut self) {
        self.z1 = 0;
        self.l_z2 = 0;
        self.mp = 0;
        self.larpp_last = [0; 8];
        self.u = [0; 8];
        self.dp = [0; 120];
    }

    /// Whether `frame` is the encoder homing frame: 160 samples of
    /// 0x0008, the 13-bit pattern with only its least significant bit
    /// set, left-justified in 16 bits.
    pub fn is_homing_frame(frame: &[i16]) -> bool {
        frame.len() == FRAME_SAMPLES && frame.iter().all(|&s| s == HOMING_SAMPLE)
    }

    /// Encode one 160-sample frame of 13-bit left-aligned PCM.
    ///
    /// The three low bits of each sample are ignored. With homing
    /// enabled, a homing frame resets the encoder after this frame is
    /// produced, and the frame following a homing frame carries the
    /// canonical homing response instead of its own parameters.
    pub fn encode(&mut self, pcm: &[i16]) -> Result<Parameters> {
        let frame: &[i16; FRAME_SAMPLES] = pcm
            .try_into()
            .map_err(|_| Gsm610Error::InvalidFrameSize(pcm.len()))?;

        let mut params = self.encode_frame(frame);

        if self.homing_supported {
            if self.last_frame_home {
                params = homing_response();
            }
            if Self::is_homing_frame(frame) {
                debug!("homing frame received, resetting encoder");
                self.reset_signal_state();
                self.last_frame_home = true;
            } else {
                self.last_frame_home = false;
            }
        }
        Ok(params)
    }

    /// Run the signal-processing pipeline for one frame.
    fn encode_frame(&mut self, pcm: &[i16; FRAME_SAMPLES]) -> Parameters {
        let mut s = self.preprocess(pcm);

        let larc = lpc_analysis(&mut s);
        let rp = short_term::reflection_coefficients(&larc, &mut self.larpp_last);
        short_term::analysis_filter(&mut self.u, &rp, &mut s);

        let mut params = Parameters {
            larc,
            ..Parameters::default()
        };
        for (j, d) in s.chunks_exact(40).enumerate() {
            let d: &[i16; 40] = d.try_into().expect("exact 40-sample chunks");
            params.subframes[j] = self.encode_subframe(d);
        }
        params
    }

    /// LTP and RPE coding of one 40-sample sub-segment, feeding the
    /// decoded residual back into the encoder's reconstruction history.
    fn encode_subframe(&mut self, d: &[i16; 40]) -> SubframeParameters {
        let (nc, bc) = long_term::ltp_parameters(d, &self.dp);
        let mut dpp = [0i16; 40];
        let mut e = [0i16; 40];
        long_term::long_term_filter(nc, bc, d, &self.dp, &mut dpp, &mut e);

        let x = rpe::weighting_filter(&e);
        let (mc, xm) = rpe::grid_selection(&x);
        let (xmaxc, xmc, exp, mant) = rpe::apcm_quantization(&xm);

        // Local reconstruction (5.2.18): decode our own excitation and
        // append it to the residual history, shifted by one sub-segment.
        let xmp = rpe::apcm_inverse_quantization(&xmc, mant, exp);
        let ep = rpe::grid_positioning(mc, &xmp);
        self.dp.copy_within(40.., 0);
        for k in 0..40 {
            self.dp[80 + k] = add(ep[k], dpp[k]);
        }

        SubframeParameters {
            nc: nc as u16,
            bc,
            mc,
            xmaxc,
            xmc,
        }
    }

    /// Downscaling, offset compensation, and pre-emphasis
    /// (5.2.1 through 5.2.3).
    fn preprocess(&mut self, pcm: &[i16; FRAME_SAMPLES]) -> [i16; FRAME_SAMPLES] {
        let mut out = [0i16; FRAME_SAMPLES];
        for (sample, so_out) in pcm.iter().zip(out.iter_mut()) {
            // Truncate to 13 significant bits, then restore 15-bit scale.
            let so = (sample >> 3) << 2;

            // Offset compensation: single-pole high pass run at 31-bit
            // precision, split into a 16-bit head and 15-bit tail.
            let s1 = sub(so, self.z1);
            self.z1 = so;
            let mut l_s2 = i32::from(s1) << 15;
            let msp = (self.l_z2 >> 15) as i16;
            let lsp = l_sub(self.l_z2, i32::from(msp) << 15) as i16;
            l_s2 = l_add(l_s2, i32::from(mult_r(lsp, 32735)));
            self.l_z2 = l_add(i32::from(msp) * 32735, l_s2);
            let l_temp = l_add(self.l_z2, 16384);

            // Pre-emphasis against the previous compensated sample.
            let msp = mult_r(self.mp, -28180);
            self.mp = (l_temp >> 15) as i16;
            *so_out = add(self.mp, msp);
        }
        out
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// The canonical response emitted for the frame that follows a homing
/// frame. It is the parameter set a home-state encoder produces for the
/// homing frame itself, which keeps the value consistent with the
/// pipeline by construction.
fn homing_response() -> Parameters {
    let mut encoder = Encoder::without_homing();
    encoder.encode_frame(&[HOMING_SAMPLE; FRAME_SAMPLES])
}

/// LPC analysis: autocorrelation, Schur recursion, and LAR coding
/// (5.2.4 through 5.2.6). Returns the coded log-area ratios; `s` is
/// scaled in place during the autocorrelation and restored afterwards.
fn lpc_analysis(s: &mut [i16; FRAME_SAMPLES]) -> [u16; 8] {
    let l_acf = autocorrelation(s);
    let r = schur_reflection_coefficients(&l_acf);
    let lar = transform_to_lar(&r);
    quantize_lar(&lar)
}

/// Autocorrelation with automatic scaling (5.2.4).
fn autocorrelation(s: &mut [i16; FRAME_SAMPLES]) -> [i32; 9] {
    let mut smax: i16 = 0;
    for &sample in s.iter() {
        let magnitude = s_abs(sample);
        if magnitude > smax {
            smax = magnitude;
        }
    }
    let scalauto = if smax == 0 {
        0
    } else {
        sub(4, norm(i32::from(smax) << 16))
    };

    if scalauto > 0 {
        let temp = 16384 >> (scalauto - 1);
        for sample in s.iter_mut() {
            *sample = mult_r(*sample, temp);
        }
    }

    let mut l_acf = [0i32; 9];
    for (k, acf) in l_acf.iter_mut().enumerate() {
        for i in k..FRAME_SAMPLES {
            *acf = l_add(*acf, l_mult(s[i], s[i - k]));
        }
    }

    if scalauto > 0 {
        for sample in s.iter_mut() {
            *sample = ((i32::from(*sample)) << scalauto) as i16;
        }
    }
    l_acf
}

/// Schur recursion yielding eight reflection coefficients (5.2.5).
fn schur_reflection_coefficients(l_acf: &[i32; 9]) -> [i16; 8] {
    let mut r = [0i16; 8];
    if l_acf[0] == 0 {
        return r;
    }

    let shift = norm(l_acf[0]);
    let mut acf = [0i16; 9];
    for (a, &l) in acf.iter_mut().zip(l_acf) {
        *a = ((l << shift) >> 16) as i16;
    }

    let mut k = [0i16; 9];
    let mut p = [0i16; 9];
    for i in 1..8 {
        k[8 - i] = acf[i];
    }
    p.copy_from_slice(&acf);

    for n in 1..=8usize {
        let magnitude = s_abs(p[1]);
        if p[0] < magnitude {
            // Unstable stage: the remaining coefficients stay zero.
            break;
        }
        let mut rn = crate::fixed::div(magnitude, p[0]);
        if p[1] > 0 {
            rn = -rn;
        }
        r[n - 1] = rn;
        if n == 8 {
            break;
        }

        p[0] = add(p[0], mult_r(p[1], rn));
        for m in 1..=(8 - n) {
            let km = k[8 - m];
            let pm1 = p[m + 1];
            p[m] = add(pm1, mult_r(km, rn));
            k[8 - m] = add(km, mult_r(pm1, rn));
        }
    }
    r
}

/// Piecewise-linear approximation of the log-area transform (5.2.6).
fn transform_to_lar(r: &[i16; 8]) -> [i16; 8] {
    let mut lar = [0i16; 8];
    for (out, &coeff) in lar.iter_mut().zip(r) {
        let magnitude = s_abs(coeff);
        let temp = if magnitude < 22118 {
            magnitude >> 1
        } else if magnitude < 31130 {
            magnitude - 11059
        } else {
            (magnitude - 26112) << 2
        };
        *out = if coeff < 0 { -temp } else { temp };
    }
    lar
}

/// Quantization and coding of the log-area ratios (5.2.6).
fn quantize_lar(lar: &[i16; 8]) -> [u16; 8] {
    let mut larc = [0u16; 8];
    for i in 0..8 {
        let temp = mult(LAR_A[i], lar[i]);
        let temp = add(temp, LAR_B[i]);
        let temp = add(temp, 256);
        let temp = temp >> 9;
        larc[i] = if temp > LAR_MAC[i] {
            (LAR_MAC[i] - LAR_MIC[i]) as u16
        } else if temp < LAR_MIC[i] {
            0
        } else {
            (temp - LAR_MIC[i]) as u16
        };
    }
    larc
}
