//! MDS matrix construction and the factorizations behind the optimized
//! permutation (paper page 20).

use {
    crate::{
        matrix::{
            invert, is_equal, is_identity, is_invertible, is_square_matrix, left_mat_mul, mat_mul,
            minor, rows, transpose, Matrix, Vector,
        },
        Error,
    },
    ark_ff::PrimeField,
};

/// The MDS matrix together with everything derived from it.
#[derive(Clone, Debug)]
pub struct MdsMatrices<F: PrimeField> {
    /// The MDS matrix itself.
    pub m: Matrix<F>,
    /// Inverse of `m`.
    pub m_inv: Matrix<F>,
    /// `m` with its first row and column removed.
    pub m_hat: Matrix<F>,
    /// Inverse of `m_hat`.
    pub m_hat_inv: Matrix<F>,
    /// The matrix m' of the factorization m = m' * m'':
    ///
    /// 1  |  0
    /// 0  |  m_hat
    pub m_prime: Matrix<F>,
    /// The matrix m'' of the factorization m = m' * m'':
    ///
    /// m_00  |  v
    /// w_hat |  I
    ///
    /// with dense first row and column and identity interior.
    pub m_double_prime: Matrix<F>,
}

/// Compact form of an m''-shaped matrix: the dense first column (`w_hat`,
/// including `m_00`) and the dense first row without `m_00` (`v`). The
/// identity interior is implied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparseMatrix<F: PrimeField> {
    pub w_hat: Vector<F>,
    pub v: Vector<F>,
}

/// Generates a t*t Cauchy MDS matrix over `x[i] = i`, `y[j] = t + j`.
/// The sequences are disjoint and duplicate-free, so every sub-matrix is
/// invertible; should the full matrix still fail the invertibility check,
/// the width is bumped and construction retried.
pub fn gen_mds<F: PrimeField>(t: usize) -> Matrix<F> {
    let mut t = t;
    loop {
        let x: Vec<F> = (0..t).map(|i| F::from(i as u64)).collect();
        let y: Vec<F> = (0..t).map(|j| F::from((j + t) as u64)).collect();

        let m: Matrix<F> = x
            .iter()
            .map(|xi| {
                y.iter()
                    .map(|yj| (*xi + yj).inverse().unwrap_or(F::ZERO))
                    .collect()
            })
            .collect();

        if !is_invertible(&m) {
            t += 1;
            continue;
        }
        assert!(is_equal(&transpose(&m), &m), "cauchy matrix is not symmetric");
        return m;
    }
}

/// Derives the full matrix set from an MDS matrix.
pub fn derive_matrices<F: PrimeField>(m: &Matrix<F>) -> Result<MdsMatrices<F>, Error> {
    let m_inv = invert(m)?;
    let m_hat = minor(m, 0, 0)?;
    let m_hat_inv = invert(&m_hat)?;
    let m_prime = gen_prime(m);
    let m_double_prime = gen_double_prime(m, &m_hat_inv)?;

    Ok(MdsMatrices {
        m: m.clone(),
        m_inv,
        m_hat,
        m_hat_inv,
        m_prime,
        m_double_prime,
    })
}

// m': identity in the first row and column, m's interior elsewhere.
fn gen_prime<F: PrimeField>(m: &Matrix<F>) -> Matrix<F> {
    let t = rows(m);
    let mut prime = Vec::with_capacity(t);
    let mut first = vec![F::ZERO; t];
    first[0] = F::ONE;
    prime.push(first);
    for i in 1..t {
        let mut row = vec![F::ZERO; t];
        row[1..].copy_from_slice(&m[i][1..]);
        prime.push(row);
    }
    prime
}

// m'': dense first row [m_00, v] and first column [m_00, w_hat], identity
// interior, where w_hat = m_hat^-1 * w and (w, v) are m's first column and
// row without m_00.
fn gen_double_prime<F: PrimeField>(
    m: &Matrix<F>,
    m_hat_inv: &Matrix<F>,
) -> Result<Matrix<F>, Error> {
    let (w, v) = gen_pre_vectors(m);
    let w_hat = left_mat_mul(m_hat_inv, &w)?;

    let t = rows(m);
    let mut double_prime = Vec::with_capacity(t);
    let mut first = Vec::with_capacity(t);
    first.push(m[0][0]);
    first.extend_from_slice(&v);
    double_prime.push(first);
    for i in 1..t {
        let mut row = vec![F::ZERO; t];
        row[0] = w_hat[i - 1];
        row[i] = F::ONE;
        double_prime.push(row);
    }
    Ok(double_prime)
}

// w is m's first column below m_00, v is m's first row right of m_00.
fn gen_pre_vectors<F: PrimeField>(m: &Matrix<F>) -> (Vector<F>, Vector<F>) {
    let v = m[0][1..].to_vec();
    let w = m[1..].iter().map(|row| row[0]).collect();
    (w, v)
}

/// Extracts the compact form of an m''-shaped matrix. Fails with
/// [`Error::BadSparse`] unless the interior is the identity.
pub fn parse_sparse_matrix<F: PrimeField>(m: &Matrix<F>) -> Result<SparseMatrix<F>, Error> {
    let interior = minor(m, 0, 0)?;
    if !is_square_matrix(m) || !is_identity(&interior) {
        return Err(Error::BadSparse);
    }

    let w_hat = m.iter().map(|row| row[0]).collect();
    let v = m[0][1..].to_vec();
    Ok(SparseMatrix { w_hat, v })
}

/// Factors the linear layer of every partial round into a sparse matrix.
///
/// Starting from the last partial round and walking backwards, each round's
/// matrix is split as m = m' * m''; the sparse m'' stays with the round and
/// the dense m' is pushed into the previous layer as m * m'. The matrix left
/// over after all partial rounds is the pre-sparse matrix applied at the
/// full-to-partial transition. The schedule is returned in forward order:
/// partial round r multiplies by `sparse[r]`.
pub fn gen_sparse_matrix<F: PrimeField>(
    m: &Matrix<F>,
    rp: usize,
) -> Result<(Vec<SparseMatrix<F>>, Matrix<F>), Error> {
    let mut sparse = Vec::with_capacity(rp);
    let mut pre_sparse = m.clone();

    for _ in 0..rp {
        let mds = derive_matrices(&pre_sparse)?;
        let pushed = mat_mul(m, &mds.m_prime)?;
        sparse.push(parse_sparse_matrix(&mds.m_double_prime)?);
        pre_sparse = pushed;
    }
    sparse.reverse();

    Ok((sparse, pre_sparse))
}

impl<F: PrimeField> SparseMatrix<F> {
    /// Expands the compact form back into a dense t*t matrix.
    pub fn to_dense(&self) -> Matrix<F> {
        let t = self.w_hat.len();
        let mut dense = Vec::with_capacity(t);
        let mut first = Vec::with_capacity(t);
        first.push(self.w_hat[0]);
        first.extend_from_slice(&self.v);
        dense.push(first);
        for i in 1..t {
            let mut row = vec![F::ZERO; t];
            row[0] = self.w_hat[i];
            row[i] = F::ONE;
            dense.push(row);
        }
        dense
    }
}
