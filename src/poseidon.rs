//! The Poseidon permutation and its three equivalent evaluation strategies.

use {
    crate::{
        field::{bigs_to_elements, element_to_big, pow_bigint},
        matrix::{right_mat_mul, Matrix},
        mds::{derive_matrices, gen_mds, gen_sparse_matrix, MdsMatrices, SparseMatrix},
        preprocessing::compress_round_constants,
        round_constants::gen_round_constants,
        round_numbers::calc_round_numbers,
        Error,
    },
    ark_ff::PrimeField,
    num_bigint::{BigInt, BigUint},
    std::sync::LazyLock,
};

/// Exponent of the S-box.
pub static POSEIDON_EXP: LazyLock<BigInt> = LazyLock::new(|| BigInt::from(5));

// Capacity element prepended to the input. Neptune uses 0x3; the zero tag of
// older versions produces incompatible digests.
const DOMAIN_TAG: u64 = 3;

// Tags seeding the round-constant generator: prime field, x^5 S-box.
const FIELD_TAG: usize = 1;
const SBOX_TAG: usize = 1;

/// Evaluation strategy. All modes produce identical digests.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HashMode {
    /// Consumes the statically pre-processed constants. The default mode.
    OptimizedStatic,
    /// Folds the raw constants through the inverse MDS matrix on the fly.
    OptimizedDynamic,
    /// The unoptimized algorithm from the paper.
    Correct,
}

/// Everything derived from a state width: matrices, both round-constant
/// schedules and the round counts. Built once, then shared immutably by any
/// number of hash calls.
#[derive(Clone, Debug)]
pub struct PoseidonConstants<F: PrimeField> {
    pub mds: MdsMatrices<F>,
    pub round_constants: Vec<F>,
    pub compressed_round_constants: Vec<F>,
    pub pre_sparse: Matrix<F>,
    pub sparse: Vec<SparseMatrix<F>>,
    pub full_rounds: usize,
    pub half_full_rounds: usize,
    pub partial_rounds: usize,
}

impl<F: PrimeField> PoseidonConstants<F> {
    /// Constants for the default instantiation: prime-field tag, x^5 S-box,
    /// exact partial-round count and a generated Cauchy MDS matrix.
    pub fn new(width: usize) -> Result<Self, Error> {
        Self::generate(width, FIELD_TAG, SBOX_TAG, false, None)
    }

    /// Derives the constants for a state width.
    ///
    /// `field_tag` and `sbox_tag` seed the round-constant generator. With
    /// `round_up_partial` the partial-round count is rounded up to the next
    /// multiple of `width`. An MDS matrix may be supplied; otherwise the
    /// Cauchy matrix is generated.
    pub fn generate(
        width: usize,
        field_tag: usize,
        sbox_tag: usize,
        round_up_partial: bool,
        mds: Option<Matrix<F>>,
    ) -> Result<Self, Error> {
        let (rf, mut rp) = calc_round_numbers::<F>(width, true);
        if rf == 0 {
            return Err(Error::RoundNumbersNotFound);
        }
        if rf % 2 != 0 {
            return Err(Error::ParityError);
        }
        let half = rf / 2;
        if round_up_partial {
            rp = rp.div_ceil(width) * width;
        }

        let round_constants = gen_round_constants::<F>(field_tag, sbox_tag, width, rf, rp);

        let m = match mds {
            Some(m) => m,
            None => gen_mds(width),
        };
        let mds = derive_matrices(&m)?;

        let compressed_round_constants =
            compress_round_constants(width, rf, rp, &round_constants, &mds)?;
        let (sparse, pre_sparse) = gen_sparse_matrix(&mds.m, rp)?;

        Ok(PoseidonConstants {
            mds,
            round_constants,
            compressed_round_constants,
            pre_sparse,
            sparse,
            full_rounds: rf,
            half_full_rounds: half,
            partial_rounds: rp,
        })
    }

    /// State width `t` of the permutation; the hash arity is `t - 1`.
    pub fn width(&self) -> usize {
        self.mds.m.len()
    }
}

/// Hashes `width - 1` big integers into one.
///
/// The state starts as the domain tag followed by the inputs reduced mod p,
/// runs through the permutation selected by `mode`, and the second state
/// element is the digest.
pub fn hash<F: PrimeField>(
    input: &[BigUint],
    constants: &PoseidonConstants<F>,
    mode: HashMode,
) -> Result<BigUint, Error> {
    let width = constants.width();
    if input.len() + 1 != width {
        return Err(Error::WidthMismatch {
            input: input.len(),
            width,
        });
    }

    let mut state = Vec::with_capacity(width);
    state.push(F::from(DOMAIN_TAG));
    state.extend(bigs_to_elements::<F>(input));

    let state = match mode {
        HashMode::OptimizedStatic => optimized_static_hash(state, constants)?,
        HashMode::OptimizedDynamic => optimized_dynamic_hash(state, constants)?,
        HashMode::Correct => correct_hash(state, constants)?,
    };

    Ok(element_to_big(&state[1]))
}

// x^5, absorbing an optional key before and after.
fn quintic_s_box<F: PrimeField>(e: &mut F, pre: Option<&F>, post: Option<&F>) {
    if let Some(pre) = pre {
        *e += pre;
    }
    *e = pow_bigint(e, &POSEIDON_EXP);
    if let Some(post) = post {
        *e += post;
    }
}

// state * m'' using the compact (w_hat, v) representation:
// out[0] = state . w_hat, out[i] = state[0] * v[i-1] + state[i].
fn product_sparse_matrix<F: PrimeField>(state: &[F], sparse: &SparseMatrix<F>) -> Vec<F> {
    let mut result = vec![F::ZERO; state.len()];
    for (e, w) in state.iter().zip(&sparse.w_hat) {
        result[0] += *e * w;
    }
    for i in 1..state.len() {
        result[i] = state[i] + state[0] * sparse.v[i - 1];
    }
    result
}

fn optimized_static_hash<F: PrimeField>(
    mut state: Vec<F>,
    constants: &PoseidonConstants<F>,
) -> Result<Vec<F>, Error> {
    let t = state.len();
    let half = constants.half_full_rounds;

    // The initial round keys are added before any S-box.
    for (e, key) in state.iter_mut().zip(&constants.compressed_round_constants) {
        *e += key;
    }

    for i in 0..half {
        state = static_full_round(state, false, i * t + t, constants)?;
    }
    for i in 0..constants.partial_rounds {
        state = static_partial_round(state, i + half * t + t, constants);
    }
    for i in 0..half - 1 {
        state = static_full_round(
            state,
            false,
            i * t + half * t + constants.partial_rounds + t,
            constants,
        )?;
    }
    static_full_round(state, true, 0, constants)
}

// One full round of the static schedule: S-box everything, adding the next
// round's (pushed-back) keys after, then the linear layer. The last round of
// the first half multiplies by the pre-sparse matrix m* = m * m' instead of
// the MDS matrix, entering the sparse partial-round chain. The last round of
// the permutation adds no keys at all: they were absorbed by earlier slots.
fn static_full_round<F: PrimeField>(
    mut state: Vec<F>,
    last_round: bool,
    offset: usize,
    constants: &PoseidonConstants<F>,
) -> Result<Vec<F>, Error> {
    let t = state.len();
    if last_round {
        for e in state.iter_mut() {
            quintic_s_box(e, None, None);
        }
    } else {
        for (i, e) in state.iter_mut().enumerate() {
            let post_key = constants.compressed_round_constants[offset + i];
            quintic_s_box(e, None, Some(&post_key));
        }
    }

    if !last_round && offset == constants.half_full_rounds * t {
        right_mat_mul(&state, &constants.pre_sparse)
    } else {
        right_mat_mul(&state, &constants.mds.m)
    }
}

// One partial round of the static schedule. The key addition and linear
// layer are swapped relative to the paper, so the single compressed key
// lands after the S-box; the linear layer is this round's sparse matrix.
fn static_partial_round<F: PrimeField>(
    mut state: Vec<F>,
    offset: usize,
    constants: &PoseidonConstants<F>,
) -> Vec<F> {
    let post_key = constants.compressed_round_constants[offset];
    quintic_s_box(&mut state[0], None, Some(&post_key));

    let sparse_index = offset - state.len() * (constants.half_full_rounds + 1);
    product_sparse_matrix(&state, &constants.sparse[sparse_index])
}

fn optimized_dynamic_hash<F: PrimeField>(
    mut state: Vec<F>,
    constants: &PoseidonConstants<F>,
) -> Result<Vec<F>, Error> {
    let t = state.len();
    let half = constants.half_full_rounds;

    state = dynamic_full_round(state, true, true, 0, constants)?;
    for i in 0..half - 1 {
        state = dynamic_full_round(state, false, true, (2 + i) * t, constants)?;
    }

    // The first partial round's keys were absorbed as post-keys of the
    // preceding full round.
    quintic_s_box(&mut state[0], None, None);
    state = right_mat_mul(&state, &constants.mds.m)?;
    for i in 1..constants.partial_rounds {
        state = partial_round(state, (half + i) * t, constants)?;
    }

    for i in 0..half {
        state = dynamic_full_round(
            state,
            true,
            false,
            (half + constants.partial_rounds + i) * t,
            constants,
        )?;
    }
    Ok(state)
}

// One full round folding constants on the fly. With `current` the round's
// own keys are added before the S-box; with `next` the following round's
// keys are pulled back through the inverse MDS matrix and added after it.
fn dynamic_full_round<F: PrimeField>(
    mut state: Vec<F>,
    current: bool,
    next: bool,
    offset: usize,
    constants: &PoseidonConstants<F>,
) -> Result<Vec<F>, Error> {
    let t = state.len();
    let rc = &constants.round_constants;

    let pre_keys: Vec<F> = if current {
        rc[offset..offset + t].to_vec()
    } else {
        vec![F::ZERO; t]
    };
    if next {
        let post_start = if current { offset + t } else { offset };
        let post_keys = right_mat_mul(&rc[post_start..post_start + t], &constants.mds.m_inv)?;
        for (i, e) in state.iter_mut().enumerate() {
            quintic_s_box(e, Some(&pre_keys[i]), Some(&post_keys[i]));
        }
    } else {
        for (i, e) in state.iter_mut().enumerate() {
            quintic_s_box(e, Some(&pre_keys[i]), None);
        }
    }

    right_mat_mul(&state, &constants.mds.m)
}

fn correct_hash<F: PrimeField>(
    mut state: Vec<F>,
    constants: &PoseidonConstants<F>,
) -> Result<Vec<F>, Error> {
    let t = state.len();
    let half = constants.half_full_rounds;

    for i in 0..half {
        state = full_round(state, i * t, constants)?;
    }
    for i in 0..constants.partial_rounds {
        state = partial_round(state, (half + i) * t, constants)?;
    }
    for i in 0..half {
        state = full_round(state, (half + constants.partial_rounds + i) * t, constants)?;
    }
    Ok(state)
}

// Textbook full round: add keys, S-box everything, linear layer.
fn full_round<F: PrimeField>(
    mut state: Vec<F>,
    offset: usize,
    constants: &PoseidonConstants<F>,
) -> Result<Vec<F>, Error> {
    for (i, e) in state.iter_mut().enumerate() {
        let pre_key = constants.round_constants[offset + i];
        quintic_s_box(e, Some(&pre_key), None);
    }
    right_mat_mul(&state, &constants.mds.m)
}

// Textbook partial round: add keys, S-box the first element, linear layer.
fn partial_round<F: PrimeField>(
    mut state: Vec<F>,
    offset: usize,
    constants: &PoseidonConstants<F>,
) -> Result<Vec<F>, Error> {
    for (i, e) in state.iter_mut().enumerate() {
        *e += constants.round_constants[offset + i];
    }
    quintic_s_box(&mut state[0], None, None);
    right_mat_mul(&state, &constants.mds.m)
}
