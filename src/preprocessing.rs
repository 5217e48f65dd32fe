//! Round-constant compression (paper page 20).
//!
//! Pushes the round keys backwards through the linear layer and through the
//! identity interiors of the partial-round matrices, so that the optimized
//! permutation only ever adds a key after an S-box. Full rounds keep `t`
//! keys each; every partial round collapses to a single key.

use {
    crate::{
        matrix::{right_mat_mul, vec_add},
        mds::MdsMatrices,
        Error,
    },
    ark_ff::PrimeField,
};

/// Produces the compressed schedule of length `rf * width + rp`.
///
/// Layout: the initial `width` keys are added to the state before any round;
/// then `width` keys per first-half full round, one key per partial round,
/// and `width` keys per second-half full round except the last, whose keys
/// have all been absorbed by earlier slots.
pub fn compress_round_constants<F: PrimeField>(
    width: usize,
    rf: usize,
    rp: usize,
    round_constants: &[F],
    mds: &MdsMatrices<F>,
) -> Result<Vec<F>, Error> {
    let m_inv = &mds.m_inv;
    let half = rf / 2;
    let mut compressed = vec![F::ZERO; rf * width + rp];

    // The pre-addition to the initial state is used as-is.
    compressed[..width].copy_from_slice(&round_constants[..width]);

    // First-half full rounds: push each round's keys back through the
    // linear layer.
    for i in 0..half - 1 {
        let next_round = &round_constants[(i + 1) * width..(i + 2) * width];
        let inv = right_mat_mul(next_round, m_inv)?;
        compressed[(i + 1) * width..(i + 2) * width].copy_from_slice(&inv);
    }

    // Partial rounds: walk from the last partial round back to the first,
    // accumulating everything that commutes past the identity interior.
    // Only the accumulator's first component is blocked by the S-box; it
    // becomes that round's single key.
    let last_partial_round = half + rp;
    let mut round_acc =
        round_constants[last_partial_round * width..(last_partial_round + 1) * width].to_vec();
    let mut partial_keys = Vec::with_capacity(rp);
    for i in 0..rp {
        let mut inv = right_mat_mul(&round_acc, m_inv)?;
        partial_keys.push(inv[0]);
        inv[0] = F::ZERO;
        let previous_keys =
            &round_constants[(last_partial_round - i - 1) * width..(last_partial_round - i) * width];
        round_acc = vec_add(previous_keys, &inv)?;
    }

    // The fully accumulated keys land in the transition round's slot.
    let acc = right_mat_mul(&round_acc, m_inv)?;
    compressed[half * width..(half + 1) * width].copy_from_slice(&acc);

    // The partial keys were collected in reverse round order.
    for i in 0..rp {
        compressed[(half + 1) * width + i] = partial_keys[rp - i - 1];
    }

    // Final full rounds, skipping the first (absorbed by the transition
    // slot above).
    for i in 1..half {
        let constants = &round_constants[(half + rp + i) * width..(half + rp + i + 1) * width];
        let inv = right_mat_mul(constants, m_inv)?;
        compressed[(half + i) * width + rp..(half + i + 1) * width + rp].copy_from_slice(&inv);
    }

    Ok(compressed)
}

#[cfg(test)]
mod test {
    use {
        super::*,
        crate::{
            mds::{derive_matrices, gen_mds},
            round_constants::gen_round_constants,
            Fr,
        },
    };

    #[test]
    fn compressed_schedule_lengths() {
        // (width, rf, rp) -> rf * width + rp
        for (width, rf, rp, expected) in [
            (8, 8, 55, 119),
            (9, 8, 56, 128),
            (10, 8, 57, 137),
            (11, 8, 57, 145),
            (12, 8, 57, 153),
        ] {
            let constants = gen_round_constants::<Fr>(1, 1, width, rf, rp);
            let mds = derive_matrices(&gen_mds::<Fr>(width)).unwrap();
            let compressed =
                compress_round_constants(width, rf, rp, &constants, &mds).unwrap();
            assert_eq!(compressed.len(), expected, "width={width}");
        }
    }

    #[test]
    fn initial_keys_pass_through_unchanged() {
        let (width, rf, rp) = (3, 8, 55);
        let constants = gen_round_constants::<Fr>(1, 1, width, rf, rp);
        let mds = derive_matrices(&gen_mds::<Fr>(width)).unwrap();
        let compressed = compress_round_constants(width, rf, rp, &constants, &mds).unwrap();
        assert_eq!(&compressed[..width], &constants[..width]);
    }
}
