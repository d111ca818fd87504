//! Error types.

use alloc::string::{String, ToString};
use core::fmt;

use crate::xml::Field;

/// Alias for [`core::result::Result`] with the `rsa-xmlkey` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Text which should have been base64 could not be decoded.
    Base64,

    /// The `Exponent` field did not decode to an ASCII decimal integer.
    ExponentNotDecimal,

    /// Public exponent does not fit in 64 bits.
    ExponentTooLarge,

    /// The XML payload is not well-formed markup.
    Xml {
        /// Reason reported by the parser.
        reason: String,
    },

    /// The same element occurs more than once in an `RSAKeyValue` document.
    DuplicateField(Field),

    /// The document root is not `RSAKeyValue`.
    UnexpectedRoot {
        /// Local name of the root element found.
        found: String,
    },

    /// PEM armor could not be parsed.
    Pem(pkcs1::der::pem::Error),

    /// PEM type label is not the one expected.
    PemLabel {
        /// Expected label.
        expected: &'static str,
        /// Label found in the input.
        found: String,
    },

    /// ASN.1 DER structure could not be parsed or serialized.
    Asn1(pkcs1::der::Error),

    /// Only two-prime keys are supported.
    PrimeCount(usize),

    /// Q has no inverse modulo P, or a prime is below 2.
    InvalidPrime,

    /// A numeric field required by the target format is absent (zero).
    MissingField(Field),
}

/// Coarse classification of an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid base64, XML, PEM armor or ASN.1.
    MalformedInput,
    /// Recognized input which this crate does not handle: a multi-prime key,
    /// an unexpected root element or PEM label.
    UnsupportedStructure,
    /// A required numeric field was absent and no default applies.
    MissingField,
}

impl Error {
    /// Get the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Base64
            | Error::ExponentNotDecimal
            | Error::ExponentTooLarge
            | Error::Xml { .. }
            | Error::DuplicateField(_)
            | Error::Pem(_)
            | Error::Asn1(_)
            | Error::InvalidPrime => ErrorKind::MalformedInput,
            Error::UnexpectedRoot { .. } | Error::PemLabel { .. } | Error::PrimeCount(_) => {
                ErrorKind::UnsupportedStructure
            }
            Error::MissingField(_) => ErrorKind::MissingField,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Base64 => write!(f, "invalid base64 encoding"),
            Error::ExponentNotDecimal => {
                write!(f, "exponent is not base64 of an ASCII decimal integer")
            }
            Error::ExponentTooLarge => write!(f, "public exponent too large"),
            Error::Xml { reason } => write!(f, "malformed XML: {}", reason),
            Error::DuplicateField(field) => write!(f, "duplicate <{}> element", field),
            Error::UnexpectedRoot { found } => {
                write!(f, "expected <RSAKeyValue> root element, found <{}>", found)
            }
            Error::Pem(err) => write!(f, "malformed PEM: {}", err),
            Error::PemLabel { expected, found } => {
                write!(f, "PEM label mismatch: expected {:?}, found {:?}", expected, found)
            }
            Error::Asn1(err) => write!(f, "malformed ASN.1: {}", err),
            Error::PrimeCount(count) => {
                write!(f, "unsupported key with {} primes, exactly 2 are required", count)
            }
            Error::InvalidPrime => write!(f, "invalid prime value"),
            Error::MissingField(field) => write!(f, "missing required field <{}>", field),
        }
    }
}

impl std::error::Error for Error {}

impl From<base64ct::Error> for Error {
    fn from(_err: base64ct::Error) -> Error {
        Error::Base64
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Error {
        Error::Xml {
            reason: err.to_string(),
        }
    }
}

impl From<pkcs1::der::pem::Error> for Error {
    fn from(err: pkcs1::der::pem::Error) -> Error {
        Error::Pem(err)
    }
}

impl From<pkcs1::der::Error> for Error {
    fn from(err: pkcs1::der::Error) -> Error {
        match err.kind() {
            pkcs1::der::ErrorKind::Pem(pem) => Error::Pem(pem),
            _ => Error::Asn1(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(Error::Base64.kind(), ErrorKind::MalformedInput);
        assert_eq!(Error::PrimeCount(3).kind(), ErrorKind::UnsupportedStructure);
        assert_eq!(
            Error::MissingField(Field::Modulus).kind(),
            ErrorKind::MissingField
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Error::PrimeCount(3).to_string(),
            "unsupported key with 3 primes, exactly 2 are required"
        );
        assert_eq!(
            Error::MissingField(Field::Modulus).to_string(),
            "missing required field <Modulus>"
        );
    }
}
