//! Round-constant generation with a Grain LFSR in self-shrinking mode
//! (paper appendix B).
//!
//! The 80-bit register is seeded, most significant bit first per field, with
//! a field tag (2 bits), an S-box tag (4 bits), the modulus bit length (12),
//! the state width (12), R_F (10), R_P (10) and 30 set bits; the first 160
//! update outputs are discarded. Constants depend on every parameter, so no
//! two instances share a schedule.

use {
    crate::field::{bits, bytes, modulus},
    ark_ff::PrimeField,
    num_bigint::BigUint,
};

const STATE_BITS: usize = 80;

struct GrainLfsr {
    bits: Vec<u8>,
}

impl GrainLfsr {
    fn new(field: usize, sbox: usize, field_size: usize, t: usize, rf: usize, rp: usize) -> Self {
        let mut bits = Vec::with_capacity(STATE_BITS);
        append_bits(&mut bits, field, 2);
        append_bits(&mut bits, sbox, 4);
        append_bits(&mut bits, field_size, 12);
        append_bits(&mut bits, t, 12);
        append_bits(&mut bits, rf, 10);
        append_bits(&mut bits, rp, 10);
        append_bits(&mut bits, (1 << 30) - 1, 30);
        debug_assert_eq!(bits.len(), STATE_BITS);

        let mut lfsr = GrainLfsr { bits };
        // discard the first 160 bits
        for _ in 0..160 {
            lfsr.step();
        }
        lfsr
    }

    // b[i+80] = b[i] ^ b[i+13] ^ b[i+23] ^ b[i+38] ^ b[i+51] ^ b[i+62]
    fn step(&mut self) -> u8 {
        let b = &self.bits;
        let new_bit = b[0] ^ b[13] ^ b[23] ^ b[38] ^ b[51] ^ b[62];
        self.bits.rotate_left(1);
        self.bits[STATE_BITS - 1] = new_bit;
        new_bit
    }

    // Self-shrinking rule: evaluate output bits in pairs. A first bit of 1
    // passes the second bit through; a first bit of 0 discards it.
    fn next_bit(&mut self) -> u8 {
        let mut first = self.step();
        while first == 0 {
            self.step();
            first = self.step();
        }
        self.step()
    }

    fn next_byte(&mut self, bit_count: usize) -> u8 {
        let mut byte = 0;
        for _ in 0..bit_count {
            byte = (byte << 1) | self.next_bit();
        }
        byte
    }

    // One candidate element: bytes(p) bytes, big endian, where the first
    // byte carries only the modulus' bits-mod-8 remainder bits.
    fn next_field_bytes(&mut self, field_size: usize, num_bytes: usize) -> Vec<u8> {
        let mut buf = vec![0; num_bytes];
        buf[0] = self.next_byte(field_size % 8);
        for slot in buf.iter_mut().skip(1) {
            *slot = self.next_byte(8);
        }
        buf
    }
}

// Appends the low `size` bits of `n`, most significant first.
fn append_bits(bits: &mut Vec<u8>, n: usize, size: usize) {
    for i in (0..size).rev() {
        bits.push(((n >> i) & 1) as u8);
    }
}

/// Generates the `(rf + rp) * t` round constants for the given instance.
/// Candidates at or above the modulus are rejected and regenerated.
pub fn gen_round_constants<F: PrimeField>(
    field: usize,
    sbox: usize,
    t: usize,
    rf: usize,
    rp: usize,
) -> Vec<F> {
    let num_constants = (rf + rp) * t;
    let field_size = bits::<F>();
    let num_bytes = bytes::<F>();
    let p = modulus::<F>();

    let mut lfsr = GrainLfsr::new(field, sbox, field_size, t, rf, rp);
    let mut constants = Vec::with_capacity(num_constants);
    while constants.len() < num_constants {
        let buf = lfsr.next_field_bytes(field_size, num_bytes);
        if BigUint::from_bytes_be(&buf) < p {
            constants.push(F::from_be_bytes_mod_order(&buf));
        }
    }
    constants
}

#[cfg(test)]
mod test {
    use {super::*, crate::field::hex_to_elements, crate::Fr};

    #[test]
    fn constant_counts() {
        let constants = gen_round_constants::<Fr>(1, 1, 8, 8, 55);
        assert_eq!(constants.len(), 504);
        let constants = gen_round_constants::<Fr>(1, 1, 12, 8, 57);
        assert_eq!(constants.len(), 780);
    }

    #[test]
    fn generation_is_deterministic() {
        let a = gen_round_constants::<Fr>(1, 1, 3, 8, 55);
        let b = gen_round_constants::<Fr>(1, 1, 3, 8, 55);
        assert_eq!(a, b);
    }

    #[test]
    fn known_leading_constants() {
        // first two constants of the width-3 BLS12-381 instance
        let constants = gen_round_constants::<Fr>(1, 1, 3, 8, 55);
        let expected: Vec<Fr> = hex_to_elements(&[
            "669f064bfa3ae17a23bd51861dbb4a24501eac92a2758b36a7320a009d6ed3d8",
            "0a61a8defbacca36e4537ff2c84fa66ceee67c9645ac27346e72ab842b9d3f15",
        ]);
        assert_eq!(&constants[..2], &expected[..]);
    }

    #[test]
    fn distinct_instances_get_distinct_constants() {
        let a = gen_round_constants::<Fr>(1, 1, 3, 8, 55);
        let b = gen_round_constants::<Fr>(1, 1, 3, 8, 56);
        assert_ne!(a[0], b[0]);
    }

    #[test]
    fn seed_layout() {
        let mut bits = Vec::new();
        append_bits(&mut bits, 1, 2);
        append_bits(&mut bits, 1, 4);
        append_bits(&mut bits, 255, 12);
        assert_eq!(
            bits,
            [0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1]
        );
    }
}
