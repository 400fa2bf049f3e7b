use std::fmt;

use crate::ebml::element_header::DataSize;
use crate::ebml::error::FormatError;
use crate::ebml::primitives::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub length: u64,
}

impl ByteRange {
    pub const fn end(&self) -> u64 {
        self.start + self.length
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementBody {
    Master(Vec<Element>),
    Value(Value),
    /// Container passed over without reading its contents (shallow scan).
    Skipped,
    /// Subtree that could not be built.
    Corrupt(FormatError),
}

#[derive(Clone, PartialEq)]
pub struct Element {
    pub id: u32,
    pub header: ByteRange,
    pub declared_size: DataSize,
    /// Resolved payload extent; always inside the parent's payload.
    pub data: ByteRange,
    pub body: ElementBody,
    /// Recovered problem with an otherwise usable element.
    pub error: Option<FormatError>,
}

// Custom Debug impl to format id as hex
impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &format_args!("{:#X}", self.id))
            .field("header", &self.header)
            .field("declared_size", &self.declared_size)
            .field("data", &self.data)
            .field("body", &self.body)
            .field("error", &self.error)
            .finish()
    }
}

impl Element {
    /// Placeholder for bytes whose header could not be decoded.
    pub fn corrupt(start: u64, length: u64, reason: FormatError) -> Self {
        Self {
            id: 0,
            header: ByteRange { start, length: 0 },
            declared_size: DataSize::Known(length),
            data: ByteRange { start, length },
            body: ElementBody::Corrupt(reason),
            error: None,
        }
    }

    /// Offset one past the last payload byte.
    pub const fn end(&self) -> u64 {
        self.data.end()
    }

    pub fn children(&self) -> &[Element] {
        match &self.body {
            ElementBody::Master(children) => children,
            _ => &[],
        }
    }

    pub fn child(&self, id: u32) -> Option<&Element> {
        self.children().iter().find(|child| child.id == id)
    }

    pub fn children_with_id(&self, id: u32) -> impl Iterator<Item = &Element> {
        self.children().iter().filter(move |child| child.id == id)
    }

    pub const fn value(&self) -> Option<&Value> {
        match &self.body {
            ElementBody::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_unsigned(&self) -> Option<u64> {
        match self.value()? {
            Value::Unsigned(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_signed(&self) -> Option<i64> {
        match self.value()? {
            Value::Signed(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.value()? {
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self.value()? {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<i64> {
        match self.value()? {
            Value::Date(value) => Some(*value),
            _ => None,
        }
    }

    /// Leading payload bytes of a binary element and its full length.
    pub fn as_binary(&self) -> Option<(u64, &[u8])> {
        match self.value()? {
            Value::Binary { len, preview } => Some((*len, preview.as_slice())),
            _ => None,
        }
    }

    pub const fn is_corrupt(&self) -> bool {
        matches!(self.body, ElementBody::Corrupt(_))
    }

    /// Depth-first, file-order walk over this element and its descendants.
    pub fn walk(&self, visit: &mut impl FnMut(&Element, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at(&self, depth: usize, visit: &mut impl FnMut(&Element, usize)) {
        visit(self, depth);
        for child in self.children() {
            child.walk_at(depth + 1, visit);
        }
    }
}
