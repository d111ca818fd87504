//! Whole-document conversions between the XML and PKCS#1 formats.
//!
//! Each function decodes into an [`RsaPrivateKey`] and immediately encodes it
//! again. Nothing is validated beyond what the two codecs need to parse their
//! input, and the key is dropped (and zeroized) before returning.

use alloc::string::String;

use pkcs1::LineEnding;
use zeroize::Zeroizing;

use crate::errors::Result;
use crate::{RsaPrivateKey, RsaPublicKey};

/// Private and public PEM documents for one key.
pub struct KeyPairPem {
    /// `RSA PRIVATE KEY` document.
    pub private_key: Zeroizing<String>,
    /// `RSA PUBLIC KEY` document.
    pub public_key: String,
}

fn decode_xml(xml: &[u8], base64_wrapped: bool) -> Result<RsaPrivateKey> {
    if base64_wrapped {
        RsaPrivateKey::from_xml_base64(xml)
    } else {
        RsaPrivateKey::from_xml(xml)
    }
}

/// Convert an `RSAKeyValue` XML document into a PKCS#1 private key PEM.
///
/// When `base64_wrapped` is set the whole input is base64 decoded first.
pub fn xml_to_pem(
    xml: &[u8],
    base64_wrapped: bool,
    line_ending: LineEnding,
) -> Result<Zeroizing<String>> {
    decode_xml(xml, base64_wrapped)?.to_pkcs1_pem(line_ending)
}

/// Convert an `RSAKeyValue` XML document into PKCS#1 private and public
/// key PEM documents.
pub fn xml_to_pem_pair(
    xml: &[u8],
    base64_wrapped: bool,
    line_ending: LineEnding,
) -> Result<KeyPairPem> {
    let key = decode_xml(xml, base64_wrapped)?;
    let private_key = key.to_pkcs1_pem(line_ending)?;
    let public_key = RsaPublicKey::from(&key).to_pkcs1_pem(line_ending)?;

    Ok(KeyPairPem {
        private_key,
        public_key,
    })
}

/// Convert a PKCS#1 private key, PEM or DER, into an `RSAKeyValue` XML
/// document.
pub fn pem_to_xml(pem: &[u8]) -> Result<Zeroizing<String>> {
    RsaPrivateKey::from_pkcs1(pem)?.to_xml()
}
