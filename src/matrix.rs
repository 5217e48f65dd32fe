//! Vector and matrix arithmetic over a prime field.
//!
//! Matrices are row-major and value-like: public operations never alias or
//! mutate their inputs. Inversion is Gauss-Jordan on `[M | I]`, run in two
//! phases (reduce to upper triangular, then to the identity) with the shadow
//! matrix accumulating `M^-1`.

use {crate::Error, ark_ff::PrimeField};

pub type Matrix<F> = Vec<Vec<F>>;
pub type Vector<F> = Vec<F>;

pub(crate) fn rows<F>(m: &[Vec<F>]) -> usize {
    m.len()
}

// Panics on a ragged row set; matrices are rectangular by construction.
pub(crate) fn columns<F>(m: &[Vec<F>]) -> usize {
    match m.first() {
        None => 0,
        Some(first) => {
            let width = first.len();
            assert!(m.iter().all(|row| row.len() == width), "ragged matrix");
            width
        }
    }
}

/// Multiplies every entry of the matrix by a scalar.
pub fn scalar_mul<F: PrimeField>(scalar: &F, m: &[Vec<F>]) -> Matrix<F> {
    m.iter().map(|row| scalar_vec_mul(scalar, row)).collect()
}

/// Multiplies every entry of the vector by a scalar.
pub fn scalar_vec_mul<F: PrimeField>(scalar: &F, v: &[F]) -> Vector<F> {
    v.iter().map(|x| *scalar * x).collect()
}

pub fn vec_add<F: PrimeField>(a: &[F], b: &[F]) -> Result<Vector<F>, Error> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch);
    }
    Ok(a.iter().zip(b).map(|(x, y)| *x + y).collect())
}

pub fn vec_sub<F: PrimeField>(a: &[F], b: &[F]) -> Result<Vector<F>, Error> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch);
    }
    Ok(a.iter().zip(b).map(|(x, y)| *x - y).collect())
}

/// Dot product of two vectors.
pub fn vec_mul<F: PrimeField>(a: &[F], b: &[F]) -> Result<F, Error> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch);
    }
    Ok(a.iter().zip(b).map(|(x, y)| *x * y).sum())
}

/// Not constant time; callers needing timing resistance must compare
/// elsewhere.
pub fn is_vec_equal<F: PrimeField>(a: &[F], b: &[F]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

/// Matrix product `a * b`.
pub fn mat_mul<F: PrimeField>(a: &[Vec<F>], b: &[Vec<F>]) -> Result<Matrix<F>, Error> {
    if columns(a) != rows(b) {
        return Err(Error::DimensionMismatch);
    }
    let b_t = transpose(b);
    a.iter()
        .map(|row| b_t.iter().map(|col| vec_mul(row, col)).collect())
        .collect()
}

/// Left matrix multiplication `m * v`.
pub fn left_mat_mul<F: PrimeField>(m: &[Vec<F>], v: &[F]) -> Result<Vector<F>, Error> {
    if !is_square_matrix(m) {
        return Err(Error::NonSquare);
    }
    if rows(m) != v.len() {
        return Err(Error::DimensionMismatch);
    }
    m.iter().map(|row| vec_mul(row, v)).collect()
}

/// Right matrix multiplication `v * m`, treating `v` as a row vector.
pub fn right_mat_mul<F: PrimeField>(v: &[F], m: &[Vec<F>]) -> Result<Vector<F>, Error> {
    if !is_square_matrix(m) {
        return Err(Error::NonSquare);
    }
    if rows(m) != v.len() {
        return Err(Error::DimensionMismatch);
    }
    let m_t = transpose(m);
    m_t.iter().map(|col| vec_mul(col, v)).collect()
}

pub fn transpose<F: PrimeField>(m: &[Vec<F>]) -> Matrix<F> {
    (0..columns(m))
        .map(|j| m.iter().map(|row| row[j]).collect())
        .collect()
}

pub fn is_square_matrix<F>(m: &[Vec<F>]) -> bool {
    rows(m) == columns(m)
}

/// The t*t identity matrix.
pub fn make_identity<F: PrimeField>(t: usize) -> Matrix<F> {
    (0..t)
        .map(|i| (0..t).map(|j| if i == j { F::ONE } else { F::ZERO }).collect())
        .collect()
}

pub fn is_identity<F: PrimeField>(m: &[Vec<F>]) -> bool {
    m.iter().enumerate().all(|(i, row)| {
        row.iter()
            .enumerate()
            .all(|(j, x)| *x == if i == j { F::ONE } else { F::ZERO })
    })
}

/// Not constant time; see [`is_vec_equal`].
pub fn is_equal<F: PrimeField>(a: &[Vec<F>], b: &[Vec<F>]) -> bool {
    rows(a) == rows(b)
        && columns(a) == columns(b)
        && a.iter().zip(b).all(|(x, y)| is_vec_equal(x, y))
}

/// Removes row `row_index` and column `column_index`.
pub fn minor<F: PrimeField>(
    m: &[Vec<F>],
    row_index: usize,
    column_index: usize,
) -> Result<Matrix<F>, Error> {
    if !is_square_matrix(m) {
        return Err(Error::NonSquare);
    }
    Ok(m.iter()
        .enumerate()
        .filter(|(i, _)| *i != row_index)
        .map(|(_, row)| {
            row.iter()
                .enumerate()
                .filter(|(j, _)| *j != column_index)
                .map(|(_, x)| *x)
                .collect()
        })
        .collect())
}

fn copy_matrix_rows<F: PrimeField>(m: &[Vec<F>], start: usize, end: usize) -> Matrix<F> {
    assert!(start < end, "start index must be less than end index");
    m[start..end].to_vec()
}

// First non-zero entry in the given column, with its row index.
fn find_non_zero<F: PrimeField>(m: &[Vec<F>], column: usize) -> Option<(F, usize)> {
    m.iter()
        .enumerate()
        .find(|(_, row)| row[column] != F::ZERO)
        .map(|(i, row)| (row[column], i))
}

// Zeroes the given column in every row but the pivot's, applying the same
// row operations to the shadow. Assumes the matrix is partially reduced.
fn eliminate<F: PrimeField>(
    m: &mut Matrix<F>,
    shadow: &mut Matrix<F>,
    column: usize,
) -> Result<(), Error> {
    let (pivot, pivot_index) = find_non_zero(m, column).ok_or(Error::NonInvertible)?;
    let pivot_inv = pivot.inverse().ok_or(Error::NonInvertible)?;

    for i in 0..rows(m) {
        if i == pivot_index || m[i][column] == F::ZERO {
            continue;
        }
        let factor = m[i][column] * pivot_inv;
        let scaled_pivot = scalar_vec_mul(&factor, &m[pivot_index]);
        m[i] = vec_sub(&m[i], &scaled_pivot)?;
        let scaled_shadow = scalar_vec_mul(&factor, &shadow[pivot_index]);
        shadow[i] = vec_sub(&shadow[i], &scaled_shadow)?;
    }
    Ok(())
}

// Leading zero count of the row equals its index.
fn is_upper_triangular<F: PrimeField>(m: &[Vec<F>]) -> bool {
    m.iter()
        .enumerate()
        .all(|(i, row)| row.iter().take_while(|x| **x == F::ZERO).count() == i)
}

// Phase 1: repeatedly eliminate the leading column of the remaining rows,
// peeling the pivot row off into the result.
fn upper_triangular<F: PrimeField>(
    m: &[Vec<F>],
    shadow: &[Vec<F>],
) -> Result<(Matrix<F>, Matrix<F>), Error> {
    if !is_square_matrix(m) {
        return Err(Error::NonSquare);
    }
    let mut current = copy_matrix_rows(m, 0, rows(m));
    let mut current_shadow = copy_matrix_rows(shadow, 0, rows(shadow));
    let mut result = Vec::with_capacity(rows(m));
    let mut shadow_result = Vec::with_capacity(rows(shadow));

    let mut column = 0;
    while rows(&current) > 1 {
        eliminate(&mut current, &mut current_shadow, column)?;
        result.push(current[0].clone());
        shadow_result.push(current_shadow[0].clone());
        current = copy_matrix_rows(&current, 1, rows(&current));
        current_shadow = copy_matrix_rows(&current_shadow, 1, rows(&current_shadow));
        column += 1;
    }
    result.push(current[0].clone());
    shadow_result.push(current_shadow[0].clone());

    Ok((result, shadow_result))
}

// Phase 2: normalize each pivot to one bottom-up and clear the entries
// above it, then restore the row order.
fn reduce_to_identity<F: PrimeField>(
    m: &[Vec<F>],
    shadow: &[Vec<F>],
) -> Result<(Matrix<F>, Matrix<F>), Error> {
    let t = rows(m);
    let mut result: Vec<Vector<F>> = Vec::with_capacity(t);
    let mut shadow_result: Vec<Vector<F>> = Vec::with_capacity(t);

    for i in 0..t {
        let index = t - i - 1;
        let factor = m[index][index];
        let factor_inv = factor.inverse().ok_or(Error::NonInvertible)?;

        let mut norm = scalar_vec_mul(&factor_inv, &m[index]);
        let mut shadow_norm = scalar_vec_mul(&factor_inv, &shadow[index]);

        for j in 0..i {
            let index_j = t - j - 1;
            let value = norm[index_j];
            norm = vec_sub(&norm, &scalar_vec_mul(&value, &result[j]))?;
            shadow_norm = vec_sub(&shadow_norm, &scalar_vec_mul(&value, &shadow_result[j]))?;
        }
        result.push(norm);
        shadow_result.push(shadow_norm);
    }
    result.reverse();
    shadow_result.reverse();

    Ok((result, shadow_result))
}

/// Whether Gaussian elimination yields a non-zero main diagonal. Does not
/// mutate the input.
pub fn is_invertible<F: PrimeField>(m: &[Vec<F>]) -> bool {
    if !is_square_matrix(m) {
        return false;
    }
    let shadow = make_identity::<F>(rows(m));
    match upper_triangular(m, &shadow) {
        Ok((upper, _)) => (0..rows(m)).all(|i| upper[i][i] != F::ZERO),
        Err(_) => false,
    }
}

/// Gauss-Jordan inversion: `[M | I] -> [I | M^-1]`.
pub fn invert<F: PrimeField>(m: &[Vec<F>]) -> Result<Matrix<F>, Error> {
    if !is_invertible(m) {
        return Err(Error::NonInvertible);
    }
    let shadow = make_identity::<F>(rows(m));
    let (upper, upper_shadow) = upper_triangular(m, &shadow)?;
    if !is_upper_triangular(&upper) {
        return Err(Error::NonInvertible);
    }
    let (reduced, reduced_shadow) = reduce_to_identity(&upper, &upper_shadow)?;
    if !is_identity(&reduced) {
        return Err(Error::NonInvertible);
    }
    Ok(reduced_shadow)
}
