//! .NET `RSAKeyValue` XML encoding support.
//!
//! ```text
//! <RSAKeyValue>
//!   <Modulus>…</Modulus>
//!   <Exponent>…</Exponent>
//!   <D>…</D>
//!   <P>…</P>
//!   <Q>…</Q>
//!   <DP>…</DP>
//!   <DQ>…</DQ>
//!   <InverseQ>…</InverseQ>
//! </RSAKeyValue>
//! ```
//!
//! Every element is optional. See [`crate::bigint`] for how each one encodes
//! its integer.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use num_bigint::BigUint;
use num_traits::Zero;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use zeroize::Zeroizing;

use crate::bigint::{self, FieldKind};
use crate::errors::{Error, Result};
use crate::traits::{PrivateKeyParts, PublicKeyParts};
use crate::RsaPrivateKey;

/// Root element name.
pub const ROOT_ELEMENT: &str = "RSAKeyValue";

/// Public exponent used when a document carries none.
///
/// The .NET format allows `Exponent` to be left out. Such documents are read
/// as the conventional `65537` rather than rejected; an `Exponent` that
/// decodes to zero is treated the same way.
pub const DEFAULT_EXPONENT: u64 = 65537;

/// Child elements of an `RSAKeyValue` document, in document order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// `Modulus`: n
    Modulus,
    /// `Exponent`: e
    Exponent,
    /// `D`: private exponent
    D,
    /// `P`: first prime
    P,
    /// `Q`: second prime
    Q,
    /// `DP`: d mod (p-1)
    DP,
    /// `DQ`: d mod (q-1)
    DQ,
    /// `InverseQ`: (inverse of q) mod p
    InverseQ,
}

impl Field {
    /// All fields, in the order they are written.
    pub const ALL: [Field; 8] = [
        Field::Modulus,
        Field::Exponent,
        Field::D,
        Field::P,
        Field::Q,
        Field::DP,
        Field::DQ,
        Field::InverseQ,
    ];

    /// Element name.
    pub fn name(self) -> &'static str {
        match self {
            Field::Modulus => "Modulus",
            Field::Exponent => "Exponent",
            Field::D => "D",
            Field::P => "P",
            Field::Q => "Q",
            Field::DP => "DP",
            Field::DQ => "DQ",
            Field::InverseQ => "InverseQ",
        }
    }

    /// Textual convention used by this element.
    pub fn kind(self) -> FieldKind {
        match self {
            Field::Exponent => FieldKind::Decimal,
            _ => FieldKind::Magnitude,
        }
    }

    fn from_name(name: &[u8]) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|field| field.name().as_bytes() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw text of each element, indexed by [`Field::index`].
#[derive(Default)]
struct RawFields {
    text: [Option<Zeroizing<String>>; 8],
}

impl RawFields {
    /// Text of `field`, or `None` when absent or blank.
    fn get(&self, field: Field) -> Option<&str> {
        self.text[field.index()]
            .as_deref()
            .map(|text| text.as_str())
            .filter(|text| !text.trim().is_empty())
    }

    fn uint(&self, field: Field) -> Result<BigUint> {
        Ok(self
            .get(field)
            .map(bigint::decode_uint)
            .transpose()?
            .unwrap_or_else(BigUint::zero))
    }

    fn exponent(&self) -> Result<u64> {
        match self.get(Field::Exponent) {
            None => Ok(DEFAULT_EXPONENT),
            Some(text) => match bigint::decode_exponent(text)? {
                0 => Ok(DEFAULT_EXPONENT),
                e => Ok(e),
            },
        }
    }

    fn into_key(self) -> Result<RsaPrivateKey> {
        RsaPrivateKey::from_components(
            self.uint(Field::Modulus)?,
            self.exponent()?,
            self.uint(Field::D)?,
            vec![self.uint(Field::P)?, self.uint(Field::Q)?],
            self.uint(Field::DP)?,
            self.uint(Field::DQ)?,
            self.uint(Field::InverseQ)?,
        )
    }
}

fn malformed(reason: &str) -> Error {
    Error::Xml {
        reason: reason.to_string(),
    }
}

fn parse(xml: &[u8]) -> Result<RawFields> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);
    reader.expand_empty_elements(true);

    let mut fields = RawFields::default();
    let mut current: Option<Field> = None;
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                match depth {
                    0 if seen_root => return Err(malformed("multiple root elements")),
                    0 => {
                        let name = e.local_name();
                        if name.as_ref() != ROOT_ELEMENT.as_bytes() {
                            return Err(Error::UnexpectedRoot {
                                found: String::from_utf8_lossy(name.as_ref()).into_owned(),
                            });
                        }
                        seen_root = true;
                    }
                    1 => {
                        current = Field::from_name(e.local_name().as_ref());
                        if let Some(field) = current {
                            let slot = &mut fields.text[field.index()];
                            if slot.is_some() {
                                return Err(Error::DuplicateField(field));
                            }
                            *slot = Some(Zeroizing::new(String::new()));
                        }
                    }
                    _ => {}
                }
                depth += 1;
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| malformed("unexpected closing tag"))?;
                if depth == 1 {
                    current = None;
                }
            }
            Event::Text(ref e) => {
                if depth == 0 {
                    return Err(malformed("text outside of the root element"));
                }
                if let (2, Some(field)) = (depth, current) {
                    let text = e.unescape()?;
                    push_text(&mut fields, field, &text);
                }
            }
            Event::CData(ref e) => {
                if let (2, Some(field)) = (depth, current) {
                    let text = core::str::from_utf8(e)
                        .map_err(|_| malformed("CDATA is not valid UTF-8"))?;
                    push_text(&mut fields, field, text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(malformed("no root element"));
    }
    if depth != 0 {
        return Err(malformed("unclosed element at end of document"));
    }

    Ok(fields)
}

fn push_text(fields: &mut RawFields, field: Field, text: &str) {
    if let Some(slot) = fields.text[field.index()].as_mut() {
        slot.push_str(text);
    }
}

impl RsaPrivateKey {
    /// Decode a key from an `RSAKeyValue` XML document.
    ///
    /// Element order does not matter. Absent elements decode to zero, except
    /// `Exponent`, which decodes to [`DEFAULT_EXPONENT`]. No check is made
    /// that the decoded numbers form a consistent key.
    pub fn from_xml(xml: &[u8]) -> Result<Self> {
        parse(xml)?.into_key()
    }

    /// Decode a key from an `RSAKeyValue` XML document which has itself been
    /// base64 encoded as a whole.
    pub fn from_xml_base64(wrapped: &[u8]) -> Result<Self> {
        let xml = bigint::decode_base64(wrapped)?;
        Self::from_xml(&xml)
    }

    /// Encode this key as an `RSAKeyValue` XML document.
    ///
    /// All eight elements are written, in [`Field::ALL`] order. A zero field
    /// is written as `AA==` rather than left out, so the document always
    /// carries every element.
    pub fn to_xml(&self) -> Result<Zeroizing<String>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer.write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))?;
        for field in Field::ALL {
            let text = Zeroizing::new(match field {
                Field::Modulus => bigint::encode_uint(self.n()),
                Field::Exponent => bigint::encode_exponent(self.e()),
                Field::D => bigint::encode_uint(self.d()),
                Field::P => bigint::encode_uint(&self.primes()[0]),
                Field::Q => bigint::encode_uint(&self.primes()[1]),
                Field::DP => bigint::encode_uint(self.dp()),
                Field::DQ => bigint::encode_uint(self.dq()),
                Field::InverseQ => bigint::encode_uint(self.qinv()),
            });

            writer.write_event(Event::Start(BytesStart::new(field.name())))?;
            writer.write_event(Event::Text(BytesText::new(&text)))?;
            writer.write_event(Event::End(BytesEnd::new(field.name())))?;
        }
        writer.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))?;

        let xml = String::from_utf8(writer.into_inner())
            .map_err(|_| malformed("encoder produced invalid UTF-8"))?;
        Ok(Zeroizing::new(xml))
    }
}
