use std::io::{Read, Seek};

use tracing::{debug, trace, warn};

use crate::ebml::element::{ByteRange, Element, ElementBody};
use crate::ebml::element_header::{DataSize, ElementHeader, MAX_HEADER_LEN};
use crate::ebml::error::{FormatError, ScanError};
use crate::ebml::options::{RecoveryPolicy, ScanOptions};
use crate::ebml::primitives::{decode_value, Value, MAX_STRING_LEN};
use crate::ebml::schema::{EbmlSchema, ValueKind};
use crate::ebml::source::ByteSource;

/// How the end of the range being scanned is known.
#[derive(Debug, Clone, Copy)]
enum Extent {
    /// Fixed by a declared size (or the end of the source).
    Declared,
    /// Open until a header that cannot belong to `parent` shows up.
    Open { parent: u32 },
}

/// Builds an element tree from a [`ByteSource`] by recursive descent.
pub struct EbmlReader<R: Read + Seek> {
    source: ByteSource<R>,
    options: ScanOptions,
    /// IDs of the masters enclosing the current position, outermost first.
    path: Vec<u32>,
    shallow_seen: bool,
}

impl<R: Read + Seek> EbmlReader<R> {
    pub const fn new(source: ByteSource<R>, options: ScanOptions) -> Self {
        Self {
            source,
            options,
            path: Vec::new(),
            shallow_seen: false,
        }
    }

    pub const fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Reads every top-level element of the source.
    pub fn read_root<S: EbmlSchema>(&mut self) -> Result<Vec<Element>, ScanError> {
        self.path.clear();
        let end = self.source.len();
        debug!(len = end, "reading EBML stream");
        let (children, _) = self.read_children::<S>(Extent::Declared, 0, end, 0)?;
        Ok(children)
    }

    fn check_cancelled(&self) -> Result<(), ScanError> {
        if self.options.cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }
        Ok(())
    }

    /// Accepts a subtree-local format error, or fails under [`RecoveryPolicy::Strict`].
    fn recover(&self, offset: u64, reason: &FormatError) -> Result<(), ScanError> {
        match self.options.recovery {
            RecoveryPolicy::Strict => Err(ScanError::format(offset, reason.clone())),
            RecoveryPolicy::BestEffort => {
                warn!(offset, %reason, "recovered malformed element");
                Ok(())
            }
        }
    }

    fn read_header(&mut self, pos: u64, end: u64) -> Result<ElementHeader, ScanError> {
        let bytes = self.source.read_up_to(pos, MAX_HEADER_LEN, end)?;
        match ElementHeader::decode(&bytes) {
            Ok(Some(header)) => Ok(header),
            Ok(None) => Err(ScanError::format(pos, FormatError::TruncatedVint)),
            Err(reason) => Err(ScanError::format(pos, reason)),
        }
    }

    /// Reads sibling elements in `[start, end)` and returns them with the
    /// offset where the run of siblings stopped.
    fn read_children<S: EbmlSchema>(
        &mut self,
        extent: Extent,
        start: u64,
        end: u64,
        depth: usize,
    ) -> Result<(Vec<Element>, u64), ScanError> {
        let mut children = Vec::new();
        let mut pos = start;

        while pos < end {
            self.check_cancelled()?;

            let header = match self.read_header(pos, end) {
                Ok(header) => header,
                Err(ScanError::Format { offset, reason }) => {
                    if let Extent::Open { parent } = extent {
                        warn!(offset, %reason, parent = format_args!("{parent:#X}"), "bad header inside unknown-size element");
                        return Err(ScanError::format(offset, FormatError::UnresolvableBoundary));
                    }
                    self.recover(offset, &reason)?;
                    children.push(Element::corrupt(pos, end - pos, reason));
                    pos = end;
                    break;
                }
                Err(error) => return Err(error),
            };

            if let Extent::Open { parent } = extent {
                if S::ends_unknown_size(&self.path, header.id.value) {
                    trace!(
                        offset = pos,
                        parent = format_args!("{parent:#X}"),
                        id = format_args!("{:#X}", header.id.value),
                        "unknown-size element ends at sibling"
                    );
                    break;
                }
            }

            if depth == 0 {
                // Each top-level element (each Segment) gets its own first full container.
                self.shallow_seen = false;
            }
            let element = self.read_element::<S>(pos, header, end, extent, depth)?;
            pos = element.end();
            children.push(element);
        }

        Ok((children, pos.min(end)))
    }

    fn read_element<S: EbmlSchema>(
        &mut self,
        pos: u64,
        header: ElementHeader,
        end: u64,
        extent: Extent,
        depth: usize,
    ) -> Result<Element, ScanError> {
        let id = header.id.value;
        let declared_size = header.data_size.value;
        let header_range = ByteRange {
            start: pos,
            length: u64::from(header.header_size),
        };
        let data_start = header_range.end();
        let available = end - data_start;
        trace!(id = format_args!("{id:#X}"), offset = pos, ?declared_size, depth, "element header");

        let mut element = Element {
            id,
            header: header_range,
            declared_size,
            data: ByteRange {
                start: data_start,
                length: available,
            },
            body: ElementBody::Skipped,
            error: None,
        };

        match declared_size {
            DataSize::Known(size) if size <= available => element.data.length = size,
            DataSize::Known(size) => {
                let reason = FormatError::ElementOverrunsParent {
                    declared: size,
                    available,
                };
                self.recover(pos, &reason)?;
                element.error = Some(reason);
            }
            DataSize::Unknown if !S::is_master(id) => {
                return self.unresolvable(element, extent, FormatError::UnresolvableBoundary);
            }
            DataSize::Unknown => {}
        }

        if S::is_master(id) {
            self.read_master::<S>(element, extent, depth)
        } else {
            self.read_leaf::<S>(element)
        }
    }

    /// Boundary of `element` cannot be found. Inside a parent of known size
    /// the rest of that parent becomes a corrupt placeholder; otherwise the scan fails.
    fn unresolvable(
        &self,
        mut element: Element,
        extent: Extent,
        reason: FormatError,
    ) -> Result<Element, ScanError> {
        let recoverable = matches!(extent, Extent::Declared)
            && self.options.recovery == RecoveryPolicy::BestEffort;
        if !recoverable {
            return Err(ScanError::format(element.header.start, reason));
        }
        warn!(offset = element.header.start, %reason, "treating rest of parent as corrupt");
        element.body = ElementBody::Corrupt(reason);
        Ok(element)
    }

    fn read_master<S: EbmlSchema>(
        &mut self,
        mut element: Element,
        extent: Extent,
        depth: usize,
    ) -> Result<Element, ScanError> {
        self.check_cancelled()?;
        let id = element.id;

        let max_depth = self.options.max_depth.get();
        if depth >= max_depth {
            let reason = FormatError::MaxDepthExceeded(max_depth);
            if element.declared_size == DataSize::Unknown {
                return self.unresolvable(element, extent, reason);
            }
            self.recover(element.header.start, &reason)?;
            element.body = ElementBody::Corrupt(reason);
            return Ok(element);
        }

        let child_extent = match element.declared_size {
            DataSize::Known(_) => Extent::Declared,
            DataSize::Unknown => Extent::Open { parent: id },
        };

        if self.options.shallow && S::is_shallow_skippable(id) {
            if self.shallow_seen {
                if child_extent.is_open() {
                    // No length field: walk the contents to find the end, then drop them.
                    let (_, resolved_end) =
                        self.read_contents::<S>(&element, child_extent, depth)?;
                    element.data.length = resolved_end - element.data.start;
                }
                debug!(
                    id = format_args!("{id:#X}"),
                    offset = element.header.start,
                    length = element.data.length,
                    "shallow scan: skipping container"
                );
                element.body = ElementBody::Skipped;
                return Ok(element);
            }
            self.shallow_seen = true;
        }

        let (children, resolved_end) = self.read_contents::<S>(&element, child_extent, depth)?;
        if child_extent.is_open() {
            element.data.length = resolved_end - element.data.start;
        }
        element.body = ElementBody::Master(children);
        Ok(element)
    }

    /// Reads the children of master `element` with its ID pushed on the path.
    fn read_contents<S: EbmlSchema>(
        &mut self,
        element: &Element,
        extent: Extent,
        depth: usize,
    ) -> Result<(Vec<Element>, u64), ScanError> {
        self.path.push(element.id);
        let result = self.read_children::<S>(extent, element.data.start, element.data.end(), depth + 1);
        self.path.pop();
        result
    }

    fn read_leaf<S: EbmlSchema>(&mut self, mut element: Element) -> Result<Element, ScanError> {
        self.check_cancelled()?;

        if let Some(reason) = element.error.take() {
            // Payload was cut short by the parent; its bytes mean nothing.
            element.body = ElementBody::Corrupt(reason);
            return Ok(element);
        }

        let kind = S::kind_of(element.id);
        let ByteRange { start, length } = element.data;

        let decoded = match kind {
            ValueKind::Binary | ValueKind::Master => {
                let preview_len = u64::try_from(S::preview_len(element.id)).unwrap_or(u64::MAX);
                let preview = self.source.read_up_to(start, preview_len, element.data.end())?;
                Ok(Value::Binary { len: length, preview })
            }
            ValueKind::String | ValueKind::Utf8 if length > MAX_STRING_LEN => {
                Err(FormatError::OversizedValue(length))
            }
            ValueKind::Float if length > 8 => Err(FormatError::InvalidFloatWidth(length)),
            ValueKind::Date if length > 8 => Err(FormatError::InvalidDateWidth(length)),
            ValueKind::Unsigned | ValueKind::Signed if length > 8 => {
                Err(FormatError::InvalidIntegerWidth(length))
            }
            _ => {
                let bytes = self.source.read(start, length)?;
                decode_value(kind, &bytes)
            }
        };

        element.body = match decoded {
            Ok(value) => ElementBody::Value(value),
            Err(reason) => {
                self.recover(element.header.start, &reason)?;
                ElementBody::Corrupt(reason)
            }
        };
        Ok(element)
    }
}

impl Extent {
    const fn is_open(self) -> bool {
        matches!(self, Self::Open { .. })
    }
}
