//! Traits related to the key components

use num_bigint::BigUint;

/// Components of an RSA public key.
pub trait PublicKeyParts {
    /// Returns the modulus of the key.
    fn n(&self) -> &BigUint;

    /// Returns the public exponent of the key.
    fn e(&self) -> u64;

    /// Returns the modulus size in bytes.
    fn size(&self) -> usize {
        (self.n().bits() + 7) / 8
    }
}

/// Components of an RSA private key.
///
/// The CRT values are whatever the key was built with. They are not
/// recomputed from the primes or checked against them.
pub trait PrivateKeyParts: PublicKeyParts {
    /// Returns the private exponent of the key.
    fn d(&self) -> &BigUint;

    /// Returns the prime factors, P first.
    fn primes(&self) -> &[BigUint];

    /// Returns the dp value, D mod (P-1)
    fn dp(&self) -> &BigUint;

    /// Returns the dq value, D mod (Q-1)
    fn dq(&self) -> &BigUint;

    /// Returns the qinv value, Q^-1 mod P
    fn qinv(&self) -> &BigUint;
}
