use std::sync::OnceLock;

use crate::ebml::primitives::BINARY_PREVIEW_LEN;
use crate::ebml::{EbmlSchema, ElementSpec};

mod block;
mod document;
pub mod ids;
mod printer;

pub use block::{BlockError, BlockHeader, Lacing};
pub use document::{
    Attachment, AudioSettings, Block, BlockKind, Chapter, ChapterDisplay, Cluster, CuePoint,
    CueTrackPosition, EbmlHeader, Edition, MatroskaDocument, MatroskaElement, SeekEntry, Segment,
    SegmentInfo, SimpleTag, Tag, Targets, TrackEntry, TrackOperation, TrackPlane, TrackType,
    VideoSettings, DEFAULT_TIMESTAMP_SCALE,
};
pub use printer::{print_matroska_report, Report};

/// Block payload bytes kept in the tree, enough for the header and most lace size tables.
pub const BLOCK_PREVIEW_LEN: usize = 256;

fn elements_by_id() -> &'static [ElementSpec] {
    static SORTED: OnceLock<Vec<ElementSpec>> = OnceLock::new();
    SORTED.get_or_init(|| {
        let mut elements = ids::MATROSKA_ELEMENTS.to_vec();
        elements.sort_unstable_by_key(|spec| spec.id);
        elements
    })
}

/// ID table for the `matroska` and `webm` doc types.
pub struct MatroskaSchema;

impl EbmlSchema for MatroskaSchema {
    fn lookup(id: u32) -> Option<&'static ElementSpec> {
        let elements = elements_by_id();
        elements
            .binary_search_by_key(&id, |spec| spec.id)
            .ok()
            .map(|index| &elements[index])
    }

    fn is_shallow_skippable(id: u32) -> bool {
        id == ids::CLUSTER_ID
    }

    fn preview_len(id: u32) -> usize {
        match id {
            ids::SIMPLE_BLOCK_ID | ids::BLOCK_ID => BLOCK_PREVIEW_LEN,
            _ => BINARY_PREVIEW_LEN,
        }
    }
}

/// Table name of `id`, or `Unknown(0x..)` for IDs outside the table.
pub fn element_name(id: u32) -> String {
    MatroskaSchema::lookup(id).map_or_else(|| format!("Unknown({id:#X})"), |spec| spec.name.to_string())
}
