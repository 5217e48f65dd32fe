//! Secure round-number selection.
//!
//! Brute-force search over the (R_F, R_P) grid against the attack bounds of
//! the paper (page 10) and its supplementary material
//! <https://extgit.iaik.tugraz.at/krypto/hadeshash>.

use {crate::field::bits, ark_ff::PrimeField};

/// Target security level in bits.
pub const SECURITY_LEVEL: usize = 128;

/// Returns the cheapest secure `(R_F, R_P)` for state width `t`, measured in
/// S-box count `t * R_F + R_P` (ties broken by smaller `R_F`). With
/// `security_margin` the margin of the paper (page 9) is applied to the
/// candidates before scoring: two extra full rounds and 7.5% extra partial
/// rounds. Returns `(0, 0)` when no candidate within the search bounds is
/// secure.
pub fn calc_round_numbers<F: PrimeField>(t: usize, security_margin: bool) -> (usize, usize) {
    let (mut rf, mut rp) = (0, 0);
    let mut min_sbox_count = usize::MAX;

    // The margin is applied to the loop counters themselves before scoring;
    // the published round-number tables depend on this exact traversal.
    let mut rf_test = 2;
    while rf_test <= 1000 {
        let mut rp_test = 4;
        while rp_test < 200 {
            if is_round_number_secure::<F>(t, rf_test, rp_test) {
                if security_margin {
                    rf_test += 2;
                    rp_test = (1.075 * rp_test as f64).ceil() as usize;
                }
                let sbox_count = t * rf_test + rp_test;
                if sbox_count < min_sbox_count || (sbox_count == min_sbox_count && rf_test < rf) {
                    rf = rf_test;
                    rp = rp_test;
                    min_sbox_count = sbox_count;
                }
            }
            rp_test += 1;
        }
        rf_test += 2;
    }

    (rf, rp)
}

// The four lower bounds on R_F for the known attacks: statistical,
// interpolation and the two Groebner-basis variants (paper page 10). The
// constants assume the degree-5 S-box.
fn is_round_number_secure<F: PrimeField>(t: usize, rf: usize, rp: usize) -> bool {
    let n = bits::<F>();

    let rf0: f64 = if SECURITY_LEVEL <= (n - 2) * (t + 1) {
        6.0
    } else {
        10.0
    };
    let rf1 = 0.43 * SECURITY_LEVEL as f64 + (t as f64).log2() - rp as f64;
    let rf2 = 0.21 * n as f64 - rp as f64;
    let rf3 = (0.14 * n as f64 - 1.0 - rp as f64) / (t as f64 - 1.0);

    rf as f64 >= rf0.max(rf1).max(rf2.max(rf3))
}
