//! Queries and conversions on the prime field backing the hash.
//!
//! The field itself is any `ark_ff::PrimeField`; everything here is a thin
//! layer translating between field elements, big integers and hex strings.

use {
    ark_ff::{BigInteger, PrimeField},
    num_bigint::{BigInt, BigUint, Sign},
};

/// Prime modulus of the field as a big integer.
pub fn modulus<F: PrimeField>() -> BigUint {
    BigUint::from_bytes_be(&F::MODULUS.to_bytes_be())
}

/// Bit length of the modulus.
pub fn bits<F: PrimeField>() -> usize {
    F::MODULUS_BIT_SIZE as usize
}

/// Byte length of a canonical big-endian element encoding.
pub fn bytes<F: PrimeField>() -> usize {
    (bits::<F>() + 7) / 8
}

/// Square-and-multiply exponentiation with an arbitrary signed exponent.
/// A negative exponent inverts the base first: x^-k = (x^-1)^k mod p.
pub fn pow_bigint<F: PrimeField>(base: &F, exp: &BigInt) -> F {
    if exp.sign() == Sign::NoSign {
        return F::ONE;
    }
    let base = if exp.sign() == Sign::Minus {
        // inverse of zero stays zero, matching the field backend
        base.inverse().unwrap_or(F::ZERO)
    } else {
        *base
    };
    let magnitude = exp.magnitude();
    let mut result = base;
    for i in (0..magnitude.bits() - 1).rev() {
        result.square_in_place();
        if magnitude.bit(i) {
            result *= base;
        }
    }
    result
}

/// Converts big-endian hex strings to field elements, reducing mod p.
pub fn hex_to_elements<F: PrimeField>(hex: &[impl AsRef<str>]) -> Vec<F> {
    hex.iter()
        .map(|s| {
            let big = BigUint::parse_bytes(s.as_ref().as_bytes(), 16)
                .expect("invalid hex string");
            big_to_element(&big)
        })
        .collect()
}

/// Converts big-endian hex strings to big integers.
pub fn hex_to_bigs(hex: &[impl AsRef<str>]) -> Vec<BigUint> {
    hex.iter()
        .map(|s| BigUint::parse_bytes(s.as_ref().as_bytes(), 16).expect("invalid hex string"))
        .collect()
}

/// Converts a big integer to a field element, reducing mod p.
pub fn big_to_element<F: PrimeField>(big: &BigUint) -> F {
    F::from_le_bytes_mod_order(&big.to_bytes_le())
}

/// Converts big integers to field elements, reducing mod p.
pub fn bigs_to_elements<F: PrimeField>(bigs: &[BigUint]) -> Vec<F> {
    bigs.iter().map(big_to_element).collect()
}

/// Exports a field element as a big integer in canonical form.
pub fn element_to_big<F: PrimeField>(element: &F) -> BigUint {
    BigUint::from_bytes_be(&element.into_bigint().to_bytes_be())
}

#[cfg(test)]
mod test {
    use {super::*, crate::Fr, ark_ff::Field};

    #[test]
    fn bls12_381_scalar_field_queries() {
        assert_eq!(
            format!("{:x}", modulus::<Fr>()),
            "73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001"
        );
        assert_eq!(bits::<Fr>(), 255);
        assert_eq!(bytes::<Fr>(), 32);
    }

    #[test]
    fn pow_small_exponents() {
        let x = Fr::from(7u64);
        assert_eq!(pow_bigint(&x, &BigInt::from(0)), Fr::ONE);
        assert_eq!(pow_bigint(&x, &BigInt::from(1)), x);
        assert_eq!(pow_bigint(&x, &BigInt::from(2)), x.square());
        assert_eq!(pow_bigint(&x, &BigInt::from(5)), x.square().square() * x);
    }

    #[test]
    fn pow_negative_exponent_inverts() {
        let x = Fr::from(12345u64);
        let inv = x.inverse().unwrap();
        assert_eq!(pow_bigint(&x, &BigInt::from(-1)), inv);
        assert_eq!(
            pow_bigint(&x, &BigInt::from(-5)),
            pow_bigint(&inv, &BigInt::from(5))
        );
    }

    #[test]
    fn element_round_trips_through_big_integer() {
        let big = BigUint::parse_bytes(
            b"56af805edfdbcf14bf6b229e24cb35a2d8e8b41f2f77f330ad1ec81e87124091",
            16,
        )
        .unwrap();
        let element: Fr = big_to_element(&big);
        assert_eq!(element_to_big(&element), big);
    }

    #[test]
    fn hex_parsing_reduces_mod_p() {
        // modulus + 1 wraps to one
        let wrapped: Vec<Fr> = hex_to_elements(&[
            "73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000002",
        ]);
        assert_eq!(wrapped[0], Fr::ONE);
    }
}
