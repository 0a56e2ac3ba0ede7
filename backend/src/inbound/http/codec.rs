//! Body decoding and response encoding for JSON, XML and form payloads.
//!
//! Decoding always yields a JSON object map so every wire format feeds the
//! same serde request schemas. XML bodies must be wrapped in a declared root
//! element, which is stripped before the fields are returned. XML leaves
//! decode to strings; an empty element decodes to `null`.
//!
//! Encoding goes through `serde_json::Value`, so any `Serialize` payload can
//! be rendered as either format.

use std::io::{self, Write};

use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::Serialize;
use serde_json::{Map, Value};

use super::negotiation::BodyFormat;

/// Element name used for array entries.
pub const ITEM_ELEMENT: &str = "item";

/// Default root element for XML responses.
pub const DEFAULT_ROOT: &str = "root";

/// Failures raised while decoding or encoding bodies.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Body is empty or whitespace only.
    #[error("request body is empty")]
    EmptyBody,
    /// JSON syntax error, or a payload serde could not render.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// XML syntax error reported by the reader or writer.
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// XML is well-formed token by token but not a usable document.
    #[error("malformed XML text: {0}")]
    Encoding(String),
    /// Form body is not valid `application/x-www-form-urlencoded`.
    #[error("malformed form body: {0}")]
    Form(#[from] serde_urlencoded::de::Error),
    /// XML document has no root element.
    #[error("missing root element <{expected}>")]
    MissingRoot {
        /// Root element the endpoint requires.
        expected: String,
    },
    /// XML root element has the wrong name.
    #[error("expected root element <{expected}>, found <{found}>")]
    UnexpectedRoot {
        /// Root element the endpoint requires.
        expected: String,
        /// Root element the document carried.
        found: String,
    },
    /// Body decodes to something other than a field map.
    #[error("request body must be an object")]
    NotAnObject,
    /// Writing the encoded body failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Decode a request body into a field map.
///
/// `root` is the XML root element the body must be wrapped in; JSON and form
/// bodies ignore it.
///
/// # Examples
/// ```
/// use bookshelf::inbound::http::codec::decode;
/// use bookshelf::inbound::http::negotiation::BodyFormat;
///
/// let xml = b"<book><title>Dune</title><price>10</price></book>";
/// let fields = decode(BodyFormat::Xml, xml, "book").unwrap();
/// assert_eq!(fields["title"], "Dune");
/// assert_eq!(fields["price"], "10");
/// ```
pub fn decode(format: BodyFormat, body: &[u8], root: &str) -> Result<Map<String, Value>, CodecError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(CodecError::EmptyBody);
    }
    match format {
        BodyFormat::Json => decode_json(body),
        BodyFormat::Xml => decode_xml(body, root),
        BodyFormat::Form => decode_form(body),
    }
}

fn decode_json(body: &[u8]) -> Result<Map<String, Value>, CodecError> {
    match serde_json::from_slice(body)? {
        Value::Object(map) => Ok(map),
        _ => Err(CodecError::NotAnObject),
    }
}

fn decode_form(body: &[u8]) -> Result<Map<String, Value>, CodecError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;
    Ok(pairs
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect())
}

fn decode_xml(body: &[u8], root: &str) -> Result<Map<String, Value>, CodecError> {
    let mut reader = Reader::from_reader(body);
    let value = loop {
        match reader.read_event()? {
            Event::Start(e) => {
                check_root(e.name().as_ref(), root)?;
                break read_element(&mut reader)?;
            }
            Event::Empty(e) => {
                check_root(e.name().as_ref(), root)?;
                break Value::Null;
            }
            Event::Eof => {
                return Err(CodecError::MissingRoot {
                    expected: root.to_owned(),
                });
            }
            event => ensure_prolog(&event, "content before root element")?,
        }
    };
    loop {
        match reader.read_event()? {
            Event::Eof => break,
            event => ensure_prolog(&event, "content after root element")?,
        }
    }
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(CodecError::NotAnObject),
    }
}

/// Accept only markup allowed outside the root element.
fn ensure_prolog(event: &Event<'_>, context: &str) -> Result<(), CodecError> {
    match event {
        Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => Ok(()),
        Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => Ok(()),
        _ => Err(CodecError::Encoding(context.to_owned())),
    }
}

fn element_name(raw: &[u8]) -> Result<String, CodecError> {
    std::str::from_utf8(raw)
        .map(str::to_owned)
        .map_err(|err| CodecError::Encoding(err.to_string()))
}

fn check_root(raw: &[u8], expected: &str) -> Result<(), CodecError> {
    let found = element_name(raw)?;
    if found == expected {
        Ok(())
    } else {
        Err(CodecError::UnexpectedRoot {
            expected: expected.to_owned(),
            found,
        })
    }
}

/// Read the content of an element whose start tag was just consumed.
fn read_element(reader: &mut Reader<&[u8]>) -> Result<Value, CodecError> {
    let mut text = String::new();
    let mut children: Vec<(String, Value)> = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = element_name(e.name().as_ref())?;
                let value = read_element(reader)?;
                children.push((name, value));
            }
            Event::Empty(e) => {
                children.push((element_name(e.name().as_ref())?, Value::Null));
            }
            Event::Text(e) => {
                let decoded = e
                    .decode()
                    .map_err(|err| CodecError::Encoding(err.to_string()))?;
                let unescaped = quick_xml::escape::unescape(&decoded)
                    .map_err(|err| CodecError::Encoding(err.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::CData(e) => {
                let decoded = e
                    .decode()
                    .map_err(|err| CodecError::Encoding(err.to_string()))?;
                text.push_str(&decoded);
            }
            Event::GeneralRef(reference) => push_reference(&mut text, &reference)?,
            Event::End(_) => return Ok(collect(text, children)),
            Event::Eof => {
                return Err(CodecError::Encoding(
                    "unexpected end of document".to_owned(),
                ));
            }
            _ => {}
        }
    }
}

fn push_reference(
    text: &mut String,
    reference: &quick_xml::events::BytesRef<'_>,
) -> Result<(), CodecError> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|err| CodecError::Encoding(err.to_string()))?
    {
        text.push(ch);
        return Ok(());
    }
    let name = reference
        .decode()
        .map_err(|err| CodecError::Encoding(err.to_string()))?;
    match quick_xml::escape::resolve_predefined_entity(&name) {
        Some(resolved) => {
            text.push_str(resolved);
            Ok(())
        }
        None => Err(CodecError::Encoding(format!("unknown entity &{name};"))),
    }
}

fn collect(text: String, children: Vec<(String, Value)>) -> Value {
    if children.is_empty() {
        return if text.trim().is_empty() {
            Value::Null
        } else {
            Value::String(text)
        };
    }
    if children.iter().all(|(name, _)| name == ITEM_ELEMENT) {
        return Value::Array(children.into_iter().map(|(_, value)| value).collect());
    }

    let mut map = Map::new();
    for (name, value) in children {
        match map.get_mut(&name) {
            Some(Value::Array(existing)) => existing.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(name, value);
            }
        }
    }
    Value::Object(map)
}

/// XML rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlOptions {
    /// Emit a declaration and wrap the document in `root_name`.
    pub wrap_root: bool,
    /// Root element name used when `wrap_root` is set.
    pub root_name: String,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            wrap_root: true,
            root_name: DEFAULT_ROOT.to_owned(),
        }
    }
}

impl XmlOptions {
    /// Wrapped document with a custom root element.
    #[must_use]
    pub fn with_root(root_name: impl Into<String>) -> Self {
        Self {
            wrap_root: true,
            root_name: root_name.into(),
        }
    }

    /// Bare fragment: each top-level field becomes a top-level element.
    #[must_use]
    pub fn unwrapped() -> Self {
        Self {
            wrap_root: false,
            ..Self::default()
        }
    }
}

/// Encode a payload as JSON.
pub fn encode_json<T: Serialize + ?Sized>(payload: &T) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(payload)?)
}

/// Encode a payload as XML.
///
/// # Examples
/// ```
/// use bookshelf::inbound::http::codec::{XmlOptions, encode_xml};
/// use serde_json::json;
///
/// let xml = encode_xml(&json!({"title": "Dune"}), &XmlOptions::unwrapped()).unwrap();
/// assert_eq!(String::from_utf8(xml).unwrap(), "<title>Dune</title>");
/// ```
pub fn encode_xml<T: Serialize + ?Sized>(
    payload: &T,
    options: &XmlOptions,
) -> Result<Vec<u8>, CodecError> {
    let value = serde_json::to_value(payload)?;
    let mut buf = Vec::with_capacity(256);
    let mut writer = Writer::new(&mut buf);

    if options.wrap_root {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write_value(&mut writer, &options.root_name, &value)?;
    } else {
        write_content(&mut writer, &value)?;
    }
    Ok(buf)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) => Some(text.clone()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn write_value<W: Write>(writer: &mut Writer<W>, name: &str, value: &Value) -> io::Result<()> {
    if let Some(text) = scalar_text(value) {
        writer
            .create_element(name)
            .write_text_content(BytesText::new(&text))?;
        return Ok(());
    }
    match value {
        Value::Array(entries) if entries.is_empty() => {
            writer.create_element(name).write_empty()?;
        }
        Value::Object(fields) if fields.is_empty() => {
            writer.create_element(name).write_empty()?;
        }
        Value::Null => {
            writer.create_element(name).write_empty()?;
        }
        _ => {
            writer
                .create_element(name)
                .write_inner_content(|inner| write_content(inner, value))?;
        }
    }
    Ok(())
}

fn write_content<W: Write>(writer: &mut Writer<W>, value: &Value) -> io::Result<()> {
    match value {
        Value::Object(fields) => {
            for (name, field) in fields {
                write_value(writer, name, field)?;
            }
        }
        Value::Array(entries) => {
            for entry in entries {
                write_value(writer, ITEM_ELEMENT, entry)?;
            }
        }
        Value::Null => {}
        scalar => {
            if let Some(text) = scalar_text(scalar) {
                writer.write_event(Event::Text(BytesText::new(&text)))?;
            }
        }
    }
    Ok(())
}
