use std::fmt;
use std::io::{Read, Seek};

use tracing::{debug, trace};

use crate::ebml::{ByteSource, EbmlReader, Element, ElementBody, ScanError, ScanOptions};
use crate::matroska::block::{BlockError, BlockHeader};
use crate::matroska::ids::{
    ATTACHED_FILE_ID, ATTACHMENTS_ID, AUDIO_ID, BIT_DEPTH_ID, BLOCK_DURATION_ID, BLOCK_GROUP_ID,
    BLOCK_ID, CHANNELS_ID, CHAPTERS_ID, CHAPTER_ATOM_ID, CHAPTER_DISPLAY_ID, CHAPTER_TIME_END_ID,
    CHAPTER_TIME_START_ID, CHAPTER_UID_ID, CHAP_LANGUAGE_ID, CHAP_STRING_ID, CLUSTER_ID,
    CLUSTER_POSITION_ID, CLUSTER_PREV_SIZE_ID, CLUSTER_TIMESTAMP_ID, CODEC_DELAY_ID, CODEC_ID_ID,
    CODEC_NAME_ID, CODEC_PRIVATE_ID, CUES_ID, CUE_BLOCK_NUMBER_ID, CUE_CLUSTER_POSITION_ID,
    CUE_DURATION_ID, CUE_POINT_ID, CUE_RELATIVE_POSITION_ID, CUE_TIME_ID, CUE_TRACK_ID,
    CUE_TRACK_POSITIONS_ID, DATE_UTC_ID, DEFAULT_DURATION_ID, DISPLAY_HEIGHT_ID,
    DISPLAY_WIDTH_ID, DURATION_ID, EBML_DOCTYPE_ID, EBML_DOCTYPE_READ_VERSION_ID,
    EBML_DOCTYPE_VERSION_ID, EBML_HEADER_ID, EBML_MAX_ID_LENGTH_ID, EBML_MAX_SIZE_LENGTH_ID,
    EBML_READ_VERSION_ID, EBML_VERSION_ID, EDITION_ENTRY_ID, EDITION_UID_ID, FILE_DATA_ID,
    FILE_DESCRIPTION_ID, FILE_MEDIA_TYPE_ID, FILE_NAME_ID, FILE_UID_ID, FLAG_DEFAULT_ID,
    FLAG_ENABLED_ID, FLAG_FORCED_ID, FLAG_INTERLACED_ID, FLAG_LACING_ID, INFO_ID, LANGUAGE_BCP47_ID,
    LANGUAGE_ID, MUXING_APP_ID, NAME_ID, OUTPUT_SAMPLING_FREQUENCY_ID, PIXEL_HEIGHT_ID,
    PIXEL_WIDTH_ID, REFERENCE_BLOCK_ID, SAMPLING_FREQUENCY_ID, SEEK_HEAD_ID, SEEK_ID, SEEK_ID_ID,
    SEEK_POSITION_ID, SEEK_PRE_ROLL_ID, SEGMENT_FILENAME_ID, SEGMENT_ID, SEGMENT_UID_ID,
    SIMPLE_BLOCK_ID, SIMPLE_TAG_ID, TAGS_ID, TAG_ATTACHMENT_UID_ID, TAG_BINARY_ID,
    TAG_CHAPTER_UID_ID, TAG_DEFAULT_ID, TAG_EDITION_UID_ID, TAG_ID, TAG_LANGUAGE_ID, TAG_NAME_ID,
    TAG_STRING_ID, TAG_TRACK_UID_ID, TARGETS_ID, TARGET_TYPE_ID, TARGET_TYPE_VALUE_ID, TIMESTAMP_SCALE_ID,
    TITLE_ID, TRACKS_ID, TRACK_COMBINE_PLANES_ID, TRACK_ENTRY_ID, TRACK_JOIN_BLOCKS_ID,
    TRACK_JOIN_UID_ID, TRACK_NUMBER_ID, TRACK_OPERATION_ID, TRACK_OVERLAY_ID, TRACK_PLANE_ID,
    TRACK_PLANE_TYPE_ID, TRACK_PLANE_UID_ID, TRACK_TYPE_ID, TRACK_UID_ID, VIDEO_ID, WRITING_APP_ID,
};
use crate::matroska::MatroskaSchema;

/// Nanoseconds per timestamp tick when Info carries no TimestampScale.
pub const DEFAULT_TIMESTAMP_SCALE: u64 = 1_000_000;

const KNOWN_DOC_TYPES: [&str; 2] = ["matroska", "webm"];

/// A typed view over one kind of master element.
pub trait MatroskaElement {
    const ID: u32;

    fn parse(raw: &Element) -> Self
    where
        Self: Sized;
}

fn parse_all<T: MatroskaElement>(parent: &Element) -> Vec<T> {
    parent.children_with_id(T::ID).map(T::parse).collect()
}

fn text(element: &Element) -> Option<String> {
    element.as_text().map(str::to_string)
}

fn binary_len(element: &Element) -> Option<u64> {
    element.as_binary().map(|(len, _)| len)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EbmlHeader {
    pub version: Option<u64>,
    pub read_version: Option<u64>,
    pub max_id_length: Option<u64>,
    pub max_size_length: Option<u64>,
    pub doc_type: Option<String>,
    pub doc_type_version: Option<u64>,
    pub doc_type_read_version: Option<u64>,
}

impl MatroskaElement for EbmlHeader {
    const ID: u32 = EBML_HEADER_ID;

    fn parse(raw: &Element) -> Self {
        debug_assert_eq!(raw.id, Self::ID, "trying to parse invalid element");

        let mut header = Self::default();
        for child in raw.children() {
            match child.id {
                EBML_VERSION_ID => header.version = child.as_unsigned(),
                EBML_READ_VERSION_ID => header.read_version = child.as_unsigned(),
                EBML_MAX_ID_LENGTH_ID => header.max_id_length = child.as_unsigned(),
                EBML_MAX_SIZE_LENGTH_ID => header.max_size_length = child.as_unsigned(),
                EBML_DOCTYPE_ID => header.doc_type = text(child),
                EBML_DOCTYPE_VERSION_ID => header.doc_type_version = child.as_unsigned(),
                EBML_DOCTYPE_READ_VERSION_ID => header.doc_type_read_version = child.as_unsigned(),
                _ => trace!(id = format_args!("{:#X}", child.id), "unhandled EBML header child"),
            }
        }
        header
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentInfo {
    /// Up to the first 16 bytes, which is the whole UID for conforming files.
    pub segment_uid: Option<Vec<u8>>,
    pub segment_filename: Option<String>,
    pub title: Option<String>,
    pub muxing_app: Option<String>,
    pub writing_app: Option<String>,
    pub timestamp_scale: Option<u64>,
    /// In timestamp ticks.
    pub duration: Option<f64>,
    pub date_utc: Option<i64>,
}

impl SegmentInfo {
    pub fn timestamp_scale_or_default(&self) -> u64 {
        self.timestamp_scale.unwrap_or(DEFAULT_TIMESTAMP_SCALE)
    }

    /// Duration converted to seconds using the effective timestamp scale.
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_seconds(&self) -> Option<f64> {
        self.duration
            .map(|ticks| ticks * self.timestamp_scale_or_default() as f64 / 1e9)
    }
}

impl MatroskaElement for SegmentInfo {
    const ID: u32 = INFO_ID;

    fn parse(raw: &Element) -> Self {
        let mut info = Self::default();
        for child in raw.children() {
            match child.id {
                SEGMENT_UID_ID => info.segment_uid = child.as_binary().map(|(_, bytes)| bytes.to_vec()),
                SEGMENT_FILENAME_ID => info.segment_filename = text(child),
                TITLE_ID => info.title = text(child),
                MUXING_APP_ID => info.muxing_app = text(child),
                WRITING_APP_ID => info.writing_app = text(child),
                TIMESTAMP_SCALE_ID => info.timestamp_scale = child.as_unsigned(),
                DURATION_ID => info.duration = child.as_float(),
                DATE_UTC_ID => info.date_utc = child.as_date(),
                _ => {}
            }
        }
        info
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackType {
    Video,
    Audio,
    Complex,
    Logo,
    Subtitle,
    Buttons,
    Control,
    Metadata,
    Other(u64),
}

impl From<u64> for TrackType {
    fn from(value: u64) -> Self {
        match value {
            1 => Self::Video,
            2 => Self::Audio,
            3 => Self::Complex,
            0x10 => Self::Logo,
            0x11 => Self::Subtitle,
            0x12 => Self::Buttons,
            0x20 => Self::Control,
            0x21 => Self::Metadata,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => f.write_str("video"),
            Self::Audio => f.write_str("audio"),
            Self::Complex => f.write_str("complex"),
            Self::Logo => f.write_str("logo"),
            Self::Subtitle => f.write_str("subtitle"),
            Self::Buttons => f.write_str("buttons"),
            Self::Control => f.write_str("control"),
            Self::Metadata => f.write_str("metadata"),
            Self::Other(value) => write!(f, "unknown ({value})"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoSettings {
    pub pixel_width: Option<u64>,
    pub pixel_height: Option<u64>,
    pub display_width: Option<u64>,
    pub display_height: Option<u64>,
    pub interlaced: Option<u64>,
}

impl MatroskaElement for VideoSettings {
    const ID: u32 = VIDEO_ID;

    fn parse(raw: &Element) -> Self {
        let mut video = Self::default();
        for child in raw.children() {
            match child.id {
                PIXEL_WIDTH_ID => video.pixel_width = child.as_unsigned(),
                PIXEL_HEIGHT_ID => video.pixel_height = child.as_unsigned(),
                DISPLAY_WIDTH_ID => video.display_width = child.as_unsigned(),
                DISPLAY_HEIGHT_ID => video.display_height = child.as_unsigned(),
                FLAG_INTERLACED_ID => video.interlaced = child.as_unsigned(),
                _ => {}
            }
        }
        video
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioSettings {
    pub sampling_frequency: Option<f64>,
    pub output_sampling_frequency: Option<f64>,
    pub channels: Option<u64>,
    pub bit_depth: Option<u64>,
}

impl MatroskaElement for AudioSettings {
    const ID: u32 = AUDIO_ID;

    fn parse(raw: &Element) -> Self {
        let mut audio = Self::default();
        for child in raw.children() {
            match child.id {
                SAMPLING_FREQUENCY_ID => audio.sampling_frequency = child.as_float(),
                OUTPUT_SAMPLING_FREQUENCY_ID => audio.output_sampling_frequency = child.as_float(),
                CHANNELS_ID => audio.channels = child.as_unsigned(),
                BIT_DEPTH_ID => audio.bit_depth = child.as_unsigned(),
                _ => {}
            }
        }
        audio
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackPlane {
    pub uid: Option<u64>,
    /// 0 left eye, 1 right eye, 2 background.
    pub plane_type: Option<u64>,
}

impl MatroskaElement for TrackPlane {
    const ID: u32 = TRACK_PLANE_ID;

    fn parse(raw: &Element) -> Self {
        Self {
            uid: raw.child(TRACK_PLANE_UID_ID).and_then(Element::as_unsigned),
            plane_type: raw.child(TRACK_PLANE_TYPE_ID).and_then(Element::as_unsigned),
        }
    }
}

/// A virtual track built from other tracks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackOperation {
    pub planes: Vec<TrackPlane>,
    pub join_uids: Vec<u64>,
}

impl MatroskaElement for TrackOperation {
    const ID: u32 = TRACK_OPERATION_ID;

    fn parse(raw: &Element) -> Self {
        let mut operation = Self::default();
        for child in raw.children() {
            match child.id {
                TRACK_COMBINE_PLANES_ID => operation.planes.extend(parse_all::<TrackPlane>(child)),
                TRACK_JOIN_BLOCKS_ID => operation.join_uids.extend(
                    child
                        .children_with_id(TRACK_JOIN_UID_ID)
                        .filter_map(Element::as_unsigned),
                ),
                _ => {}
            }
        }
        operation
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackEntry {
    pub number: Option<u64>,
    pub uid: Option<u64>,
    pub track_type: Option<TrackType>,
    pub flag_enabled: Option<u64>,
    pub flag_default: Option<u64>,
    pub flag_forced: Option<u64>,
    pub flag_lacing: Option<u64>,
    pub name: Option<String>,
    pub language: Option<String>,
    pub language_bcp47: Option<String>,
    pub codec_id: Option<String>,
    pub codec_name: Option<String>,
    pub codec_private_len: Option<u64>,
    /// Nanoseconds per frame.
    pub default_duration: Option<u64>,
    pub codec_delay: Option<u64>,
    pub seek_pre_roll: Option<u64>,
    pub video: Option<VideoSettings>,
    pub audio: Option<AudioSettings>,
    /// UIDs of tracks to use when this one has no data.
    pub overlays: Vec<u64>,
    pub operation: Option<TrackOperation>,
}

impl MatroskaElement for TrackEntry {
    const ID: u32 = TRACK_ENTRY_ID;

    fn parse(raw: &Element) -> Self {
        let mut track = Self::default();
        for child in raw.children() {
            match child.id {
                TRACK_NUMBER_ID => track.number = child.as_unsigned(),
                TRACK_UID_ID => track.uid = child.as_unsigned(),
                TRACK_TYPE_ID => track.track_type = child.as_unsigned().map(TrackType::from),
                FLAG_ENABLED_ID => track.flag_enabled = child.as_unsigned(),
                FLAG_DEFAULT_ID => track.flag_default = child.as_unsigned(),
                FLAG_FORCED_ID => track.flag_forced = child.as_unsigned(),
                FLAG_LACING_ID => track.flag_lacing = child.as_unsigned(),
                NAME_ID => track.name = text(child),
                LANGUAGE_ID => track.language = text(child),
                LANGUAGE_BCP47_ID => track.language_bcp47 = text(child),
                CODEC_ID_ID => track.codec_id = text(child),
                CODEC_NAME_ID => track.codec_name = text(child),
                CODEC_PRIVATE_ID => track.codec_private_len = binary_len(child),
                DEFAULT_DURATION_ID => track.default_duration = child.as_unsigned(),
                CODEC_DELAY_ID => track.codec_delay = child.as_unsigned(),
                SEEK_PRE_ROLL_ID => track.seek_pre_roll = child.as_unsigned(),
                VIDEO_ID => track.video = Some(VideoSettings::parse(child)),
                AUDIO_ID => track.audio = Some(AudioSettings::parse(child)),
                TRACK_OVERLAY_ID => track.overlays.extend(child.as_unsigned()),
                TRACK_OPERATION_ID => track.operation = Some(TrackOperation::parse(child)),
                _ => {}
            }
        }
        track
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Simple,
    Group,
}

/// A SimpleBlock, or the Block inside a BlockGroup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub offset: u64,
    pub size: u64,
    pub header: Result<BlockHeader, BlockError>,
    /// BlockGroup only.
    pub duration: Option<u64>,
    /// Number of ReferenceBlock entries; BlockGroup only.
    pub references: usize,
}

impl Block {
    fn from_payload(kind: BlockKind, raw: &Element) -> Self {
        let header = match raw.as_binary() {
            Some((_, preview)) => BlockHeader::parse(preview, raw.data.length),
            None => Err(BlockError::Truncated),
        };
        Self {
            kind,
            offset: raw.header.start,
            size: raw.data.length,
            header,
            duration: None,
            references: 0,
        }
    }

    fn from_group(raw: &Element) -> Option<Self> {
        let mut block = Self::from_payload(BlockKind::Group, raw.child(BLOCK_ID)?);
        block.offset = raw.header.start;
        block.duration = raw.child(BLOCK_DURATION_ID).and_then(Element::as_unsigned);
        block.references = raw.children_with_id(REFERENCE_BLOCK_ID).count();
        Some(block)
    }

    /// Cluster timestamp plus the block's relative timecode, in ticks.
    pub fn absolute_timestamp(&self, cluster_timestamp: Option<u64>) -> Option<i128> {
        let header = self.header.as_ref().ok()?;
        Some(i128::from(cluster_timestamp?) + i128::from(header.timecode))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub offset: u64,
    pub timestamp: Option<u64>,
    pub position: Option<u64>,
    pub prev_size: Option<u64>,
    pub blocks: Vec<Block>,
    /// Offsets of BlockGroups that carry no Block.
    pub empty_groups: Vec<u64>,
}

impl MatroskaElement for Cluster {
    const ID: u32 = CLUSTER_ID;

    fn parse(raw: &Element) -> Self {
        let mut cluster = Self {
            offset: raw.header.start,
            timestamp: None,
            position: None,
            prev_size: None,
            blocks: Vec::new(),
            empty_groups: Vec::new(),
        };
        for child in raw.children() {
            match child.id {
                CLUSTER_TIMESTAMP_ID => cluster.timestamp = child.as_unsigned(),
                CLUSTER_POSITION_ID => cluster.position = child.as_unsigned(),
                CLUSTER_PREV_SIZE_ID => cluster.prev_size = child.as_unsigned(),
                SIMPLE_BLOCK_ID => cluster.blocks.push(Block::from_payload(BlockKind::Simple, child)),
                BLOCK_GROUP_ID => match Block::from_group(child) {
                    Some(block) => cluster.blocks.push(block),
                    None => cluster.empty_groups.push(child.header.start),
                },
                _ => {}
            }
        }
        cluster
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeekEntry {
    pub id: Option<u32>,
    pub position: Option<u64>,
}

impl MatroskaElement for SeekEntry {
    const ID: u32 = SEEK_ID;

    fn parse(raw: &Element) -> Self {
        let mut entry = Self::default();
        for child in raw.children() {
            match child.id {
                SEEK_ID_ID => {
                    entry.id = child
                        .as_binary()
                        .filter(|(len, _)| (1..=4).contains(len))
                        .map(|(_, bytes)| bytes.iter().fold(0, |id, &b| (id << 8) | u32::from(b)));
                }
                SEEK_POSITION_ID => entry.position = child.as_unsigned(),
                _ => {}
            }
        }
        entry
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CueTrackPosition {
    pub track: Option<u64>,
    pub cluster_position: Option<u64>,
    pub relative_position: Option<u64>,
    pub duration: Option<u64>,
    pub block_number: Option<u64>,
}

impl MatroskaElement for CueTrackPosition {
    const ID: u32 = CUE_TRACK_POSITIONS_ID;

    fn parse(raw: &Element) -> Self {
        let mut position = Self::default();
        for child in raw.children() {
            match child.id {
                CUE_TRACK_ID => position.track = child.as_unsigned(),
                CUE_CLUSTER_POSITION_ID => position.cluster_position = child.as_unsigned(),
                CUE_RELATIVE_POSITION_ID => position.relative_position = child.as_unsigned(),
                CUE_DURATION_ID => position.duration = child.as_unsigned(),
                CUE_BLOCK_NUMBER_ID => position.block_number = child.as_unsigned(),
                _ => {}
            }
        }
        position
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CuePoint {
    pub time: Option<u64>,
    pub positions: Vec<CueTrackPosition>,
}

impl MatroskaElement for CuePoint {
    const ID: u32 = CUE_POINT_ID;

    fn parse(raw: &Element) -> Self {
        Self {
            time: raw.child(CUE_TIME_ID).and_then(Element::as_unsigned),
            positions: parse_all(raw),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: Option<String>,
    pub media_type: Option<String>,
    pub description: Option<String>,
    pub data_len: Option<u64>,
    pub uid: Option<u64>,
}

impl MatroskaElement for Attachment {
    const ID: u32 = ATTACHED_FILE_ID;

    fn parse(raw: &Element) -> Self {
        let mut attachment = Self::default();
        for child in raw.children() {
            match child.id {
                FILE_NAME_ID => attachment.file_name = text(child),
                FILE_MEDIA_TYPE_ID => attachment.media_type = text(child),
                FILE_DESCRIPTION_ID => attachment.description = text(child),
                FILE_DATA_ID => attachment.data_len = binary_len(child),
                FILE_UID_ID => attachment.uid = child.as_unsigned(),
                _ => {}
            }
        }
        attachment
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterDisplay {
    pub string: Option<String>,
    pub language: Option<String>,
}

impl MatroskaElement for ChapterDisplay {
    const ID: u32 = CHAPTER_DISPLAY_ID;

    fn parse(raw: &Element) -> Self {
        Self {
            string: raw.child(CHAP_STRING_ID).and_then(text),
            language: raw.child(CHAP_LANGUAGE_ID).and_then(text),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chapter {
    pub uid: Option<u64>,
    /// Nanoseconds.
    pub time_start: Option<u64>,
    pub time_end: Option<u64>,
    pub displays: Vec<ChapterDisplay>,
    /// Nested ChapterAtoms.
    pub chapters: Vec<Chapter>,
}

impl MatroskaElement for Chapter {
    const ID: u32 = CHAPTER_ATOM_ID;

    fn parse(raw: &Element) -> Self {
        Self {
            uid: raw.child(CHAPTER_UID_ID).and_then(Element::as_unsigned),
            time_start: raw.child(CHAPTER_TIME_START_ID).and_then(Element::as_unsigned),
            time_end: raw.child(CHAPTER_TIME_END_ID).and_then(Element::as_unsigned),
            displays: parse_all(raw),
            chapters: parse_all(raw),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Edition {
    pub uid: Option<u64>,
    pub chapters: Vec<Chapter>,
}

impl MatroskaElement for Edition {
    const ID: u32 = EDITION_ENTRY_ID;

    fn parse(raw: &Element) -> Self {
        Self {
            uid: raw.child(EDITION_UID_ID).and_then(Element::as_unsigned),
            chapters: parse_all(raw),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targets {
    pub type_value: Option<u64>,
    pub target_type: Option<String>,
    pub track_uids: Vec<u64>,
    pub edition_uids: Vec<u64>,
    pub chapter_uids: Vec<u64>,
    pub attachment_uids: Vec<u64>,
}

impl MatroskaElement for Targets {
    const ID: u32 = TARGETS_ID;

    fn parse(raw: &Element) -> Self {
        let mut targets = Self::default();
        for child in raw.children() {
            match child.id {
                TARGET_TYPE_VALUE_ID => targets.type_value = child.as_unsigned(),
                TARGET_TYPE_ID => targets.target_type = text(child),
                TAG_TRACK_UID_ID => targets.track_uids.extend(child.as_unsigned()),
                TAG_EDITION_UID_ID => targets.edition_uids.extend(child.as_unsigned()),
                TAG_CHAPTER_UID_ID => targets.chapter_uids.extend(child.as_unsigned()),
                TAG_ATTACHMENT_UID_ID => targets.attachment_uids.extend(child.as_unsigned()),
                _ => {}
            }
        }
        targets
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleTag {
    pub name: Option<String>,
    pub language: Option<String>,
    pub default: Option<u64>,
    pub string: Option<String>,
    pub binary_len: Option<u64>,
    pub children: Vec<SimpleTag>,
}

impl MatroskaElement for SimpleTag {
    const ID: u32 = SIMPLE_TAG_ID;

    fn parse(raw: &Element) -> Self {
        let mut tag = Self::default();
        for child in raw.children() {
            match child.id {
                TAG_NAME_ID => tag.name = text(child),
                TAG_LANGUAGE_ID => tag.language = text(child),
                TAG_DEFAULT_ID => tag.default = child.as_unsigned(),
                TAG_STRING_ID => tag.string = text(child),
                TAG_BINARY_ID => tag.binary_len = binary_len(child),
                SIMPLE_TAG_ID => tag.children.push(Self::parse(child)),
                _ => {}
            }
        }
        tag
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    pub targets: Option<Targets>,
    pub simple_tags: Vec<SimpleTag>,
}

impl MatroskaElement for Tag {
    const ID: u32 = TAG_ID;

    fn parse(raw: &Element) -> Self {
        Self {
            targets: raw.child(TARGETS_ID).map(Targets::parse),
            simple_tags: parse_all(raw),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    pub offset: u64,
    pub info: Option<SegmentInfo>,
    pub seek_entries: Vec<SeekEntry>,
    pub tracks: Vec<TrackEntry>,
    pub clusters: Vec<Cluster>,
    /// Clusters passed over by a shallow scan.
    pub skipped_clusters: usize,
    /// Clusters whose contents could not be read.
    pub corrupt_clusters: usize,
    pub cue_points: Vec<CuePoint>,
    pub attachments: Vec<Attachment>,
    pub editions: Vec<Edition>,
    pub tags: Vec<Tag>,
}

impl MatroskaElement for Segment {
    const ID: u32 = SEGMENT_ID;

    fn parse(raw: &Element) -> Self {
        let mut segment = Self {
            offset: raw.header.start,
            ..Self::default()
        };

        for child in raw.children() {
            match child.id {
                INFO_ID if segment.info.is_none() => segment.info = Some(SegmentInfo::parse(child)),
                SEEK_HEAD_ID => segment.seek_entries.extend(parse_all::<SeekEntry>(child)),
                TRACKS_ID => segment.tracks.extend(parse_all::<TrackEntry>(child)),
                CLUSTER_ID => match child.body {
                    ElementBody::Skipped => segment.skipped_clusters += 1,
                    ElementBody::Corrupt(_) => segment.corrupt_clusters += 1,
                    _ => segment.clusters.push(Cluster::parse(child)),
                },
                CUES_ID => segment.cue_points.extend(parse_all::<CuePoint>(child)),
                ATTACHMENTS_ID => segment.attachments.extend(parse_all::<Attachment>(child)),
                CHAPTERS_ID => segment.editions.extend(parse_all::<Edition>(child)),
                TAGS_ID => segment.tags.extend(parse_all::<Tag>(child)),
                _ => {}
            }
        }

        debug!(
            offset = segment.offset,
            tracks = segment.tracks.len(),
            clusters = segment.clusters.len(),
            skipped_clusters = segment.skipped_clusters,
            corrupt_clusters = segment.corrupt_clusters,
            cue_points = segment.cue_points.len(),
            tags = segment.tags.len(),
            "extracted segment"
        );
        segment
    }
}

/// Element tree of a Matroska/WebM file plus the records extracted from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatroskaDocument {
    /// Top-level elements in file order.
    pub elements: Vec<Element>,
    pub ebml_header: Option<EbmlHeader>,
    pub segments: Vec<Segment>,
    /// Structural problems that did not stop the scan.
    pub warnings: Vec<String>,
}

impl MatroskaDocument {
    pub fn parse_from<R: Read + Seek>(reader: R, options: &ScanOptions) -> Result<Self, ScanError> {
        let source = ByteSource::new(reader)?;
        Self::parse_source(source, options)
    }

    pub fn parse_source<R: Read + Seek>(
        source: ByteSource<R>,
        options: &ScanOptions,
    ) -> Result<Self, ScanError> {
        let mut reader = EbmlReader::new(source, options.clone());
        let elements = reader.read_root::<MatroskaSchema>()?;
        Ok(Self::from_elements(elements))
    }

    /// Extracts typed records from an already built element tree.
    pub fn from_elements(elements: Vec<Element>) -> Self {
        let mut warnings = Vec::new();

        let ebml_header = match elements.iter().position(|element| element.id == EBML_HEADER_ID) {
            Some(0) => Some(EbmlHeader::parse(&elements[0])),
            Some(index) => {
                warnings.push(format!(
                    "EBML header is not the first element (found at byte {})",
                    elements[index].header.start
                ));
                Some(EbmlHeader::parse(&elements[index]))
            }
            None => {
                warnings.push("EBML header missing".to_string());
                None
            }
        };

        if let Some(header) = &ebml_header {
            match header.doc_type.as_deref() {
                Some(doc_type) if KNOWN_DOC_TYPES.contains(&doc_type) => {}
                Some(doc_type) => warnings.push(format!("unexpected DocType {doc_type:?}")),
                None => warnings.push("EBML header has no DocType".to_string()),
            }
        }

        let segments: Vec<Segment> = elements
            .iter()
            .filter(|element| element.id == SEGMENT_ID)
            .map(Segment::parse)
            .collect();
        if segments.is_empty() {
            warnings.push("no Segment element found".to_string());
        }
        for cluster in segments.iter().flat_map(|segment| &segment.clusters) {
            for offset in &cluster.empty_groups {
                warnings.push(format!("BlockGroup at byte {offset} has no Block"));
            }
        }

        let mut corrupt = 0usize;
        for element in &elements {
            element.walk(&mut |element, _| {
                if element.is_corrupt() || element.error.is_some() {
                    corrupt += 1;
                }
            });
        }
        if corrupt > 0 {
            warnings.push(format!("{corrupt} malformed element(s) recovered, see element tree"));
        }

        Self {
            elements,
            ebml_header,
            segments,
            warnings,
        }
    }
}
