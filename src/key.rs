use alloc::vec::Vec;
use core::fmt;

use num_bigint::Sign::Plus;
use num_bigint::{BigInt, BigUint, ModInverse};
use num_traits::One;
use zeroize::Zeroize;

use crate::errors::{Error, Result};
use crate::traits::{PrivateKeyParts, PublicKeyParts};

/// Represents the public part of an RSA key.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RsaPublicKey {
    /// Modulus: product of prime numbers `p` and `q`
    n: BigUint,
    /// Public exponent
    e: u64,
}

/// Represents a whole RSA key, public and private parts, together with the
/// CRT values carried alongside it by both the XML and PKCS#1 formats.
///
/// This is the in-memory form every codec converts through. It is a plain
/// container: nothing here checks that `p * q == n`, that `d` inverts `e`,
/// or that the CRT values agree with the primes.
#[derive(Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    /// Public components of the private key.
    pubkey_components: RsaPublicKey,
    /// Private exponent
    d: BigUint,
    /// Prime factors of N, P then Q.
    primes: [BigUint; 2],
    /// D mod (P-1)
    dp: BigUint,
    /// D mod (Q-1)
    dq: BigUint,
    /// Q^-1 mod P
    qinv: BigUint,
}

impl RsaPublicKey {
    /// Create a new public key from its components.
    pub fn new(n: BigUint, e: u64) -> Self {
        Self { n, e }
    }
}

impl PublicKeyParts for RsaPublicKey {
    fn n(&self) -> &BigUint {
        &self.n
    }

    fn e(&self) -> u64 {
        self.e
    }
}

impl fmt::Debug for RsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPublicKey")
            .field("n", &format_args!("{}", self.n))
            .field("e", &self.e)
            .finish()
    }
}

impl From<RsaPrivateKey> for RsaPublicKey {
    fn from(private_key: RsaPrivateKey) -> Self {
        (&private_key).into()
    }
}

impl From<&RsaPrivateKey> for RsaPublicKey {
    fn from(private_key: &RsaPrivateKey) -> Self {
        private_key.pubkey_components.clone()
    }
}

impl RsaPrivateKey {
    /// Constructs an RSA key pair from its individual components.
    ///
    /// `primes` must hold exactly two entries, P then Q. Any other count is
    /// [`Error::PrimeCount`]; extra primes are never dropped silently.
    pub fn from_components(
        n: BigUint,
        e: u64,
        d: BigUint,
        primes: Vec<BigUint>,
        dp: BigUint,
        dq: BigUint,
        qinv: BigUint,
    ) -> Result<RsaPrivateKey> {
        let primes: [BigUint; 2] = primes.try_into().map_err(|mut primes: Vec<BigUint>| {
            let count = primes.len();
            primes.iter_mut().for_each(Zeroize::zeroize);
            Error::PrimeCount(count)
        })?;

        Ok(RsaPrivateKey {
            pubkey_components: RsaPublicKey::new(n, e),
            d,
            primes,
            dp,
            dq,
            qinv,
        })
    }

    /// Constructs an RSA key pair from the modulus, exponents and the two
    /// primes, deriving dp, dq and qinv.
    ///
    /// This is the only place CRT values are computed. Decoding and encoding
    /// always pass them through as found.
    pub fn from_primes(n: BigUint, e: u64, d: BigUint, p: BigUint, q: BigUint) -> Result<Self> {
        let two = BigUint::from(2u32);
        if p < two || q < two {
            return Err(Error::InvalidPrime);
        }

        let dp = &d % (&p - BigUint::one());
        let dq = &d % (&q - BigUint::one());

        let p_int = BigInt::from_biguint(Plus, p.clone());
        let qinv = q
            .clone()
            .mod_inverse(&p)
            .map(|qinv| ((qinv % &p_int) + &p_int) % &p_int)
            .and_then(|qinv| qinv.to_biguint())
            .ok_or(Error::InvalidPrime)?;

        Self::from_components(n, e, d, vec![p, q], dp, dq, qinv)
    }

    /// Get the public key from the private key, cloning `n` and `e`.
    pub fn to_public_key(&self) -> RsaPublicKey {
        self.pubkey_components.clone()
    }
}

impl PublicKeyParts for RsaPrivateKey {
    fn n(&self) -> &BigUint {
        &self.pubkey_components.n
    }

    fn e(&self) -> u64 {
        self.pubkey_components.e
    }
}

impl PrivateKeyParts for RsaPrivateKey {
    fn d(&self) -> &BigUint {
        &self.d
    }

    fn primes(&self) -> &[BigUint] {
        &self.primes
    }

    fn dp(&self) -> &BigUint {
        &self.dp
    }

    fn dq(&self) -> &BigUint {
        &self.dq
    }

    fn qinv(&self) -> &BigUint {
        &self.qinv
    }
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("n", &format_args!("{}", self.n()))
            .field("e", &self.e())
            .finish_non_exhaustive()
    }
}

impl Zeroize for RsaPrivateKey {
    fn zeroize(&mut self) {
        self.d.zeroize();
        for prime in self.primes.iter_mut() {
            prime.zeroize();
        }
        self.dp.zeroize();
        self.dq.zeroize();
        self.qinv.zeroize();
    }
}

impl Drop for RsaPrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}
