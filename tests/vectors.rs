//! Verifies all five derived schedules against the reference constants file
//! for the width-12 BLS12-381 instance (R_F = 8, R_P = 57).

use {
    poseidon_hash::{
        field::hex_to_elements,
        matrix::{is_equal, is_identity, is_vec_equal, mat_mul, Matrix},
        mds::{derive_matrices, gen_mds, gen_sparse_matrix},
        preprocessing::compress_round_constants,
        round_constants::gen_round_constants,
        Fr,
    },
    serde::Deserialize,
    std::fs,
};

#[derive(Deserialize)]
struct ConstantsFile {
    compress: Vec<String>,
    constants: Vec<String>,
    mds: Vec<Vec<String>>,
    sparse: Vec<Vec<Vec<String>>>,
    pre_sparse: Vec<Vec<String>>,
}

const WIDTH: usize = 12;
const FULL_ROUNDS: usize = 8;
const PARTIAL_ROUNDS: usize = 57;

fn load() -> ConstantsFile {
    let path = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/data/poseidon-constants-1-1-255-12-8-57-",
        "73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001.json"
    );
    let raw = fs::read_to_string(path).expect("missing constants file");
    serde_json::from_str(&raw).expect("malformed constants file")
}

fn to_matrix(rows: &[Vec<String>]) -> Matrix<Fr> {
    rows.iter().map(|row| hex_to_elements(row)).collect()
}

#[test]
fn mds_matrix_matches_reference() {
    let file = load();
    let m = gen_mds::<Fr>(WIDTH);
    assert!(is_equal(&m, &to_matrix(&file.mds)));
}

#[test]
fn round_constants_match_reference() {
    let file = load();
    let expected: Vec<Fr> = hex_to_elements(&file.constants);
    assert_eq!(expected.len(), (FULL_ROUNDS + PARTIAL_ROUNDS) * WIDTH);
    let constants = gen_round_constants::<Fr>(1, 1, WIDTH, FULL_ROUNDS, PARTIAL_ROUNDS);
    assert_eq!(constants, expected);
}

#[test]
fn derived_matrices_satisfy_their_identities() {
    let file = load();
    let mds = derive_matrices(&to_matrix(&file.mds)).unwrap();
    assert!(is_identity(&mat_mul(&mds.m, &mds.m_inv).unwrap()));
    assert!(is_identity(&mat_mul(&mds.m_hat, &mds.m_hat_inv).unwrap()));
    assert!(is_equal(
        &mat_mul(&mds.m_prime, &mds.m_double_prime).unwrap(),
        &mds.m
    ));
}

#[test]
fn sparse_schedule_matches_reference() {
    let file = load();
    let m = to_matrix(&file.mds);
    let (sparse, pre_sparse) = gen_sparse_matrix(&m, PARTIAL_ROUNDS).unwrap();

    assert!(is_equal(&pre_sparse, &to_matrix(&file.pre_sparse)));
    assert_eq!(sparse.len(), file.sparse.len());
    for (got, expected) in sparse.iter().zip(&file.sparse) {
        let w_hat: Vec<Fr> = hex_to_elements(&expected[0]);
        let v: Vec<Fr> = hex_to_elements(&expected[1]);
        assert!(is_vec_equal(&got.w_hat, &w_hat));
        assert!(is_vec_equal(&got.v, &v));
    }
}

#[test]
fn compressed_constants_match_reference() {
    let file = load();
    let mds = derive_matrices(&to_matrix(&file.mds)).unwrap();
    let round_constants: Vec<Fr> = hex_to_elements(&file.constants);
    let compressed = compress_round_constants(
        WIDTH,
        FULL_ROUNDS,
        PARTIAL_ROUNDS,
        &round_constants,
        &mds,
    )
    .unwrap();
    let expected: Vec<Fr> = hex_to_elements(&file.compress);
    assert_eq!(expected.len(), FULL_ROUNDS * WIDTH + PARTIAL_ROUNDS);
    assert_eq!(compressed, expected);
}
