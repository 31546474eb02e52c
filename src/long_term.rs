//! Long-term predictor: lag search, gain quantization, and the residual
//! and prediction signals for one sub-segment.

use crate::fixed::{l_add, l_mult, mult, mult_r, norm, s_abs, sub};
use crate::tables::{DLB, QLB};

/// LTP lag and gain estimation for one 40-sample sub-segment (5.2.11).
///
/// `d` is the current short-term residual block and `dp` the 120 most
/// recent reconstructed residual samples, oldest first. Returns the
/// coded lag `nc` in 40..=120 and the gain index `bc` in 0..=3.
pub(crate) fn ltp_parameters(d: &[i16; 40], dp: &[i16; 120]) -> (i16, u16) {
    // Optimum scaling of d[0..39].
    let mut dmax: i16 = 0;
    for &sample in d {
        let magnitude = s_abs(sample);
        if magnitude > dmax {
            dmax = magnitude;
        }
    }
    let temp = if dmax == 0 {
        0
    } else {
        norm(i32::from(dmax) << 16)
    };
    let scal = if temp > 6 { 0 } else { 6 - temp };

    let mut wt = [0i16; 40];
    for (w, &sample) in wt.iter_mut().zip(d) {
        *w = sample >> scal;
    }

    // Search for the maximum cross-correlation over the lag range.
    let mut l_max: i32 = 0;
    let mut nc: i16 = 40;
    for lambda in 40..=120usize {
        let mut l_result: i32 = 0;
        for (k, &w) in wt.iter().enumerate() {
            l_result = l_add(l_result, l_mult(w, dp[k + 120 - lambda]));
        }
        if l_result > l_max {
            nc = lambda as i16;
            l_max = l_result;
        }
    }

    // Rescaling of the maximum.
    l_max >>= 6 - scal;

    // Power of the reconstructed residual at the chosen lag.
    let mut l_power: i32 = 0;
    for k in 0..40 {
        let temp = dp[k + 120 - nc as usize] >> 3;
        l_power = l_add(l_power, l_mult(temp, temp));
    }

    // Normalization of the maximum and the power, then gain coding
    // against the decision levels.
    if l_max <= 0 {
        return (nc, 0);
    }
    if l_max >= l_power {
        return (nc, 3);
    }
    let shift = norm(l_power);
    let r = ((l_max << shift) >> 16) as i16;
    let s = ((l_power << shift) >> 16) as i16;
    for (bc, &dlb) in DLB.iter().enumerate().take(3) {
        if r <= mult(s, dlb) {
            return (nc, bc as u16);
        }
    }
    (nc, 3)
}

/// Long-term analysis filtering (5.2.12).
///
/// Produces the LTP residual `e` and the prediction `dpp` from the
/// quantized gain and lag.
pub(crate) fn long_term_filter(
    nc: i16,
    bc: u16,
    d: &[i16; 40],
    dp: &[i16; 120],
    dpp: &mut [i16; 40],
    e: &mut [i16; 40],
) {
    let bp = QLB[(bc & 3) as usize];
    for k in 0..40 {
        dpp[k] = mult_r(bp, dp[k + 120 - nc as usize]);
        e[k] = sub(d[k], dpp[k]);
    }
}
