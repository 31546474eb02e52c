//! Regular pulse excitation: weighting filter, grid selection, and the
//! block-adaptive PCM quantizer with its inverse.
//!
//! The inverse quantizer, the block-maximum split, and the grid
//! expansion are shared with the decoder; the encoder runs them on its
//! own output to keep the local reconstruction bit-identical to what a
//! decoder will compute.

use crate::fixed::{add, asl, asr, l_add, l_mult, mult, mult_r, s_abs, sub};
use crate::tables::{FAC, NRFAC, WEIGHTING_H};

/// Weighting filter (5.2.13).
///
/// An 11-tap FIR over the LTP residual, zero-padded by five samples on
/// each side, with rounding and a gain of four folded into the output
/// scaling.
pub(crate) fn weighting_filter(e: &[i16; 40]) -> [i16; 40] {
    let mut padded = [0i16; 50];
    padded[5..45].copy_from_slice(e);

    let mut x = [0i16; 40];
    for (k, out) in x.iter_mut().enumerate() {
        let mut l_result: i32 = 8192; // rounding of the filter output
        for (i, &h) in WEIGHTING_H.iter().enumerate() {
            l_result = l_add(l_result, l_mult(padded[k + i], h));
        }
        l_result = l_add(l_result, l_result);
        l_result = l_add(l_result, l_result);
        *out = (l_result >> 16) as i16;
    }
    x
}

/// RPE grid selection (5.2.14).
///
/// Picks the decimation phase with the highest energy and returns it
/// together with the selected 13-sample sub-sequence.
pub(crate) fn grid_selection(x: &[i16; 40]) -> (u16, [i16; 13]) {
    let mut em: i32 = 0;
    let mut mc: usize = 0;
    for m in 0..4 {
        let mut l_result: i32 = 0;
        for i in 0..13 {
            let temp = x[m + 3 * i] >> 2;
            l_result = l_add(l_result, l_mult(temp, temp));
        }
        if l_result > em {
            mc = m;
            em = l_result;
        }
    }

    let mut xm = [0i16; 13];
    for (i, pulse) in xm.iter_mut().enumerate() {
        *pulse = x[mc + 3 * i];
    }
    (mc as u16, xm)
}

/// APCM quantization of the selected RPE sequence (5.2.15).
///
/// Codes the block maximum logarithmically into `xmaxc`, then scales
/// each pulse by the inverse mantissa to its 3-bit code. Returns
/// `(xmaxc, xmc, exp, mant)`; the exponent and mantissa are passed on to
/// the local inverse quantization.
pub(crate) fn apcm_quantization(xm: &[i16; 13]) -> (u16, [u16; 13], i16, i16) {
    let mut xmax: i16 = 0;
    for &pulse in xm {
        let magnitude = s_abs(pulse);
        if magnitude > xmax {
            xmax = magnitude;
        }
    }

    // Exponent of xmax, counting down from the 6 bits above the
    // quantizer's 9-bit floor.
    let mut exp: i16 = 0;
    let mut temp = xmax >> 9;
    let mut itest = 0;
    for _ in 0..6 {
        if temp <= 0 {
            itest = 1;
        }
        temp >>= 1;
        if itest == 0 {
            exp += 1;
        }
    }
    let xmaxc = add(xmax >> (exp + 5), exp << 3) as u16;

    // Quantize the pulses against the decoded block maximum, which the
    // exponent/mantissa split reproduces without a division.
    let (exp, mant) = xmaxc_to_exp_mant(xmaxc);
    let shift = 6 - exp;
    let nrfac = NRFAC[mant as usize];
    let mut xmc = [0u16; 13];
    for (code, &pulse) in xmc.iter_mut().zip(xm) {
        let temp = ((i32::from(pulse)) << shift) as i16;
        let temp = mult(temp, nrfac) >> 12;
        *code = (temp + 4).clamp(0, 7) as u16;
    }
    (xmaxc, xmc, exp, mant)
}

/// Split a coded block maximum into its exponent and mantissa, with the
/// mantissa normalized into 0..=7 (5.3.1.1).
pub(crate) fn xmaxc_to_exp_mant(xmaxc: u16) -> (i16, i16) {
    let xmaxc = (xmaxc & 0x3F) as i16;
    let mut exp: i16 = 0;
    if xmaxc > 15 {
        exp = sub(xmaxc >> 3, 1);
    }
    let mut mant = sub(xmaxc, exp << 3);

    if mant == 0 {
        exp = -4;
        mant = 7;
    } else {
        while mant <= 7 {
            mant = (mant << 1) | 1;
            exp = sub(exp, 1);
        }
        mant = sub(mant, 8);
    }
    (exp, mant)
}

/// APCM inverse quantization (5.2.16).
///
/// Reconstructs the 13 pulse amplitudes from their codes and the decoded
/// block maximum.
pub(crate) fn apcm_inverse_quantization(xmc: &[u16; 13], mant: i16, exp: i16) -> [i16; 13] {
    let temp1 = FAC[mant as usize];
    let temp2 = sub(12, exp);
    let temp3 = asl(1, sub(temp2, 1));

    let mut xmp = [0i16; 13];
    for (out, &code) in xmp.iter_mut().zip(xmc) {
        let code = (code & 7) as i16;
        let temp = sub(code << 1, 7) << 12; // restore sign at full scale
        let temp = mult_r(temp1, temp);
        let temp = add(temp, temp3);
        *out = asr(temp, temp2);
    }
    xmp
}

/// RPE grid positioning (5.2.17).
///
/// Scatters the 13 reconstructed pulses onto their grid phase within a
/// zero-filled 40-sample block.
pub(crate) fn grid_positioning(mc: u16, xmp: &[i16; 13]) -> [i16; 40] {
    let mut ep = [0i16; 40];
    let mc = (mc & 3) as usize;
    for (i, &pulse) in xmp.iter().enumerate() {
        ep[mc + 3 * i] = pulse;
    }
    ep
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighting_of_silence() {
        assert_eq!(weighting_filter(&[0i16; 40]), [0i16; 40]);
    }

    #[test]
    fn test_weighting_center_tap() {
        // A lone unit-ish pulse picks up the center tap with gain
        // 8192/8192 = 1 after the output scaling.
        let mut e = [0i16; 40];
        e[20] = 1024;
        let x = weighting_filter(&e);
        assert_eq!(x[20], 1024);
        assert_eq!(x[19], ((5741i32 * 1024 + 4096) >> 13) as i16);
        assert_eq!(x[0], 0);
    }

    #[test]
    fn test_grid_selection_prefers_loud_phase() {
        let mut x = [0i16; 40];
        for i in 0..13 {
            x[2 + 3 * i] = 2000;
        }
        let (mc, xm) = grid_selection(&x);
        assert_eq!(mc, 2);
        assert_eq!(xm, [2000i16; 13]);
    }

    #[test]
    fn test_grid_selection_tie_takes_first() {
        let (mc, _) = grid_selection(&[0i16; 40]);
        assert_eq!(mc, 0);
    }

    #[test]
    fn test_exp_mant_split() {
        assert_eq!(xmaxc_to_exp_mant(0), (-4, 7));
        // 16 -> exp 1, raw mantissa 8, normalized to 0.
        assert_eq!(xmaxc_to_exp_mant(16), (1, 0));
        // 31 -> exp 2, raw mantissa 15, already normalized.
        assert_eq!(xmaxc_to_exp_mant(31), (2, 7));
        assert_eq!(xmaxc_to_exp_mant(63), (6, 7));
        // Out-of-range codes are masked to their width.
        assert_eq!(xmaxc_to_exp_mant(64), xmaxc_to_exp_mant(0));
    }

    #[test]
    fn test_quantize_codes_are_three_bit() {
        let mut xm = [0i16; 13];
        for (i, pulse) in xm.iter_mut().enumerate() {
            *pulse = if i % 2 == 0 { 20000 } else { -20000 };
        }
        let (xmaxc, xmc, _, _) = apcm_quantization(&xm);
        assert!(xmaxc <= 63);
        assert!(xmc.iter().all(|&c| c <= 7));
    }

    #[test]
    fn test_inverse_is_monotone_in_code() {
        let (exp, mant) = xmaxc_to_exp_mant(40);
        let codes: [u16; 13] = [0, 1, 2, 3, 4, 5, 6, 7, 0, 0, 0, 0, 0];
        let xmp = apcm_inverse_quantization(&codes, mant, exp);
        for pair in xmp[..8].windows(2) {
            assert!(pair[0] < pair[1]);
        }
        // Code 3 and 4 straddle zero symmetrically.
        assert_eq!(xmp[3], -xmp[4]);
    }

    #[test]
    fn test_grid_positioning_scatter() {
        let xmp: [i16; 13] = [7; 13];
        let ep = grid_positioning(1, &xmp);
        for (k, &v) in ep.iter().enumerate() {
            if k >= 1 && (k - 1) % 3 == 0 {
                assert_eq!(v, 7);
            } else {
                assert_eq!(v, 0);
            }
        }
    }
}
