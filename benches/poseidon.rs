use {
    criterion::{criterion_group, criterion_main, Criterion},
    num_bigint::BigUint,
    poseidon_hash::{hash, Fr, HashMode, PoseidonConstants},
};

fn bench_poseidon_hash(c: &mut Criterion) {
    let modes = [
        ("static", HashMode::OptimizedStatic),
        ("dynamic", HashMode::OptimizedDynamic),
        ("correct", HashMode::Correct),
    ];
    for arity in [1usize, 4, 10] {
        let constants = PoseidonConstants::<Fr>::new(arity + 1).unwrap();
        let input: Vec<BigUint> = (1..=arity as u64).map(BigUint::from).collect();
        for (label, mode) in modes {
            c.bench_function(&format!("poseidon_{label}_{arity}_inputs"), |b| {
                b.iter(|| hash(&input, &constants, mode).unwrap())
            });
        }
    }
}

criterion_group!(benches, bench_poseidon_hash);
criterion_main!(benches);
