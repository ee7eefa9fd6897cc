//! XML wire format for single values and value lists.
//!
//! # Design
//! The service speaks the data-contract XML dialect: a single value is a
//! `<string>` element in the serialization namespace, a list is an
//! `<ArrayOfstring>` element holding one `<string>` child per item in
//! order. Encoding writes that shape directly with escaped text; decoding
//! walks quick-xml events and accepts exactly one root of the expected
//! local name. Namespaces are written on encode but not enforced on decode.
//!
//! Character data is kept verbatim. `Decode(Encode(v)) == v` for every
//! value the XML character set can carry.

use std::borrow::Cow;

use quick_xml::escape::escape;
use quick_xml::events::{BytesText, Event};
use quick_xml::Reader;

use crate::error::ClientError;

pub const SERIALIZATION_NS: &str = "http://schemas.microsoft.com/2003/10/Serialization/";
pub const ARRAYS_NS: &str = "http://schemas.microsoft.com/2003/10/Serialization/Arrays";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

const STRING: &str = "string";
const ARRAY_OF_STRING: &str = "ArrayOfstring";

/// Encode one value as a `<string>` element.
pub fn encode_string(value: &str) -> Vec<u8> {
    format!(r#"<{STRING} xmlns="{SERIALIZATION_NS}">{}</{STRING}>"#, escape_text(value)).into_bytes()
}

/// Encode an ordered list of values as an `<ArrayOfstring>` element.
pub fn encode_string_list<S: AsRef<str>>(values: &[S]) -> Vec<u8> {
    let open = format!(r#"<{ARRAY_OF_STRING} xmlns="{ARRAYS_NS}" xmlns:i="{XSI_NS}""#);
    if values.is_empty() {
        return format!("{open}/>").into_bytes();
    }
    let mut out = format!("{open}>");
    for value in values {
        out.push_str(&format!("<{STRING}>{}</{STRING}>", escape_text(value.as_ref())));
    }
    out.push_str(&format!("</{ARRAY_OF_STRING}>"));
    out.into_bytes()
}

/// Decode a `<string>` element produced by [`encode_string`].
///
/// A self-closing element, including one marked `i:nil="true"`, decodes to
/// the empty string.
pub fn decode_string(bytes: &[u8]) -> Result<String, ClientError> {
    let mut doc = Document::new(bytes);
    let value = if doc.root(STRING)? {
        doc.text_until_end(STRING)?
    } else {
        String::new()
    };
    doc.finish()?;
    Ok(value)
}

/// Decode an `<ArrayOfstring>` element, preserving document order.
pub fn decode_string_list(bytes: &[u8]) -> Result<Vec<String>, ClientError> {
    let mut doc = Document::new(bytes);
    let mut values = Vec::new();
    if doc.root(ARRAY_OF_STRING)? {
        loop {
            match doc.next()? {
                Event::Start(e) if e.local_name().as_ref() == STRING.as_bytes() => {
                    values.push(doc.text_until_end(STRING)?);
                }
                Event::Empty(e) if e.local_name().as_ref() == STRING.as_bytes() => {
                    values.push(String::new());
                }
                Event::End(_) => break,
                Event::Text(t) if is_blank(&t) => {}
                Event::Comment(_) | Event::PI(_) => {}
                Event::Eof => return Err(ClientError::malformed("unclosed <ArrayOfstring>")),
                other => {
                    return Err(ClientError::malformed(format!(
                        "unexpected {other:?} inside <ArrayOfstring>"
                    )))
                }
            }
        }
    }
    doc.finish()?;
    Ok(values)
}

/// Escape markup and quotes, and write carriage returns as `&#xD;` so
/// parsers that normalize line endings keep them.
fn escape_text(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if escaped.contains('\r') {
        Cow::Owned(escaped.replace('\r', "&#xD;"))
    } else {
        escaped
    }
}

struct Document<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> Document<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            reader: Reader::from_reader(bytes),
        }
    }

    fn next(&mut self) -> Result<Event<'a>, ClientError> {
        self.reader.read_event().map_err(ClientError::malformed)
    }

    /// Skip the prolog and consume the root tag. Returns `true` when the
    /// root has content to read, `false` when it is self-closing.
    fn root(&mut self, name: &str) -> Result<bool, ClientError> {
        loop {
            let open = match self.next()? {
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => continue,
                Event::Text(t) if is_blank(&t) => continue,
                Event::Start(e) => (e.local_name().as_ref() == name.as_bytes(), true),
                Event::Empty(e) => (e.local_name().as_ref() == name.as_bytes(), false),
                Event::Eof => return Err(ClientError::malformed("empty document")),
                other => {
                    return Err(ClientError::malformed(format!(
                        "unexpected {other:?} before <{name}>"
                    )))
                }
            };
            return match open {
                (true, has_content) => Ok(has_content),
                (false, _) => Err(ClientError::malformed(format!("expected root <{name}>"))),
            };
        }
    }

    /// Collect character data up to the closing tag of `name`.
    fn text_until_end(&mut self, name: &str) -> Result<String, ClientError> {
        let mut value = String::new();
        loop {
            match self.next()? {
                Event::Text(t) => value.push_str(&t.unescape().map_err(ClientError::malformed)?),
                Event::CData(c) => {
                    value.push_str(std::str::from_utf8(&c).map_err(ClientError::malformed)?)
                }
                Event::Comment(_) | Event::PI(_) => {}
                Event::End(_) => return Ok(value),
                Event::Eof => return Err(ClientError::malformed(format!("unclosed <{name}>"))),
                other => {
                    return Err(ClientError::malformed(format!(
                        "unexpected {other:?} inside <{name}>"
                    )))
                }
            }
        }
    }

    /// Only whitespace and comments may follow the root element.
    fn finish(&mut self) -> Result<(), ClientError> {
        loop {
            match self.next()? {
                Event::Eof => return Ok(()),
                Event::Comment(_) | Event::PI(_) => {}
                Event::Text(t) if is_blank(&t) => {}
                other => {
                    return Err(ClientError::malformed(format!(
                        "trailing {other:?} after root element"
                    )))
                }
            }
        }
    }
}

fn is_blank(text: &BytesText<'_>) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}
