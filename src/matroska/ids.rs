//! Matroska element IDs and the static ID table.

use crate::ebml::schema::{ElementSpec, Placement, ValueKind};

// EBML header
pub const EBML_HEADER_ID: u32 = 0x1A45_DFA3;
pub const EBML_VERSION_ID: u32 = 0x4286;
pub const EBML_READ_VERSION_ID: u32 = 0x42F7;
pub const EBML_MAX_ID_LENGTH_ID: u32 = 0x42F2;
pub const EBML_MAX_SIZE_LENGTH_ID: u32 = 0x42F3;
pub const EBML_DOCTYPE_ID: u32 = 0x4282;
pub const EBML_DOCTYPE_VERSION_ID: u32 = 0x4287;
pub const EBML_DOCTYPE_READ_VERSION_ID: u32 = 0x4285;

// Global
pub const VOID_ID: u32 = 0xEC;
pub const CRC32_ID: u32 = 0xBF;

pub const SEGMENT_ID: u32 = 0x1853_8067;

// Meta seek
pub const SEEK_HEAD_ID: u32 = 0x114D_9B74;
pub const SEEK_ID: u32 = 0x4DBB;
pub const SEEK_ID_ID: u32 = 0x53AB;
pub const SEEK_POSITION_ID: u32 = 0x53AC;

// Segment information
pub const INFO_ID: u32 = 0x1549_A966;
pub const SEGMENT_UID_ID: u32 = 0x73A4;
pub const SEGMENT_FILENAME_ID: u32 = 0x7384;
pub const PREV_UID_ID: u32 = 0x003C_B923;
pub const PREV_FILENAME_ID: u32 = 0x003C_83AB;
pub const NEXT_UID_ID: u32 = 0x003E_B923;
pub const NEXT_FILENAME_ID: u32 = 0x003E_83BB;
pub const TIMESTAMP_SCALE_ID: u32 = 0x002A_D7B1;
pub const DURATION_ID: u32 = 0x4489;
pub const DATE_UTC_ID: u32 = 0x4461;
pub const TITLE_ID: u32 = 0x7BA9;
pub const MUXING_APP_ID: u32 = 0x4D80;
pub const WRITING_APP_ID: u32 = 0x5741;

// Cluster
pub const CLUSTER_ID: u32 = 0x1F43_B675;
pub const CLUSTER_TIMESTAMP_ID: u32 = 0xE7;
pub const CLUSTER_POSITION_ID: u32 = 0xA7;
pub const CLUSTER_PREV_SIZE_ID: u32 = 0xAB;
pub const SIMPLE_BLOCK_ID: u32 = 0xA3;
pub const BLOCK_GROUP_ID: u32 = 0xA0;
pub const BLOCK_ID: u32 = 0xA1;
pub const BLOCK_DURATION_ID: u32 = 0x9B;
pub const REFERENCE_BLOCK_ID: u32 = 0xFB;
pub const DISCARD_PADDING_ID: u32 = 0x75A2;

// Tracks
pub const TRACKS_ID: u32 = 0x1654_AE6B;
pub const TRACK_ENTRY_ID: u32 = 0xAE;
pub const TRACK_NUMBER_ID: u32 = 0xD7;
pub const TRACK_UID_ID: u32 = 0x73C5;
pub const TRACK_TYPE_ID: u32 = 0x83;
pub const FLAG_ENABLED_ID: u32 = 0xB9;
pub const FLAG_DEFAULT_ID: u32 = 0x88;
pub const FLAG_FORCED_ID: u32 = 0x55AA;
pub const FLAG_LACING_ID: u32 = 0x9C;
pub const MIN_CACHE_ID: u32 = 0x6DE7;
pub const MAX_CACHE_ID: u32 = 0x6DF8;
pub const DEFAULT_DURATION_ID: u32 = 0x0023_E383;
pub const MAX_BLOCK_ADDITION_ID_ID: u32 = 0x55EE;
pub const NAME_ID: u32 = 0x536E;
pub const LANGUAGE_ID: u32 = 0x0022_B59C;
pub const LANGUAGE_BCP47_ID: u32 = 0x0022_B59D;
pub const CODEC_ID_ID: u32 = 0x86;
pub const CODEC_PRIVATE_ID: u32 = 0x63A2;
pub const CODEC_NAME_ID: u32 = 0x0025_8688;
pub const CODEC_DELAY_ID: u32 = 0x56AA;
pub const SEEK_PRE_ROLL_ID: u32 = 0x56BB;
pub const TRACK_OVERLAY_ID: u32 = 0x6FAB;

// Track operation
pub const TRACK_OPERATION_ID: u32 = 0xE2;
pub const TRACK_COMBINE_PLANES_ID: u32 = 0xE3;
pub const TRACK_PLANE_ID: u32 = 0xE4;
pub const TRACK_PLANE_UID_ID: u32 = 0xE5;
pub const TRACK_PLANE_TYPE_ID: u32 = 0xE6;
pub const TRACK_JOIN_BLOCKS_ID: u32 = 0xE9;
pub const TRACK_JOIN_UID_ID: u32 = 0xED;

// Video
pub const VIDEO_ID: u32 = 0xE0;
pub const FLAG_INTERLACED_ID: u32 = 0x9A;
pub const PIXEL_WIDTH_ID: u32 = 0xB0;
pub const PIXEL_HEIGHT_ID: u32 = 0xBA;
pub const DISPLAY_WIDTH_ID: u32 = 0x54B0;
pub const DISPLAY_HEIGHT_ID: u32 = 0x54BA;
pub const DISPLAY_UNIT_ID: u32 = 0x54B2;

// Audio
pub const AUDIO_ID: u32 = 0xE1;
pub const SAMPLING_FREQUENCY_ID: u32 = 0xB5;
pub const OUTPUT_SAMPLING_FREQUENCY_ID: u32 = 0x78B5;
pub const CHANNELS_ID: u32 = 0x9F;
pub const BIT_DEPTH_ID: u32 = 0x6264;

// Cues
pub const CUES_ID: u32 = 0x1C53_BB6B;
pub const CUE_POINT_ID: u32 = 0xBB;
pub const CUE_TIME_ID: u32 = 0xB3;
pub const CUE_TRACK_POSITIONS_ID: u32 = 0xB7;
pub const CUE_TRACK_ID: u32 = 0xF7;
pub const CUE_CLUSTER_POSITION_ID: u32 = 0xF1;
pub const CUE_RELATIVE_POSITION_ID: u32 = 0xF0;
pub const CUE_DURATION_ID: u32 = 0xB2;
pub const CUE_BLOCK_NUMBER_ID: u32 = 0x5378;

// Attachments
pub const ATTACHMENTS_ID: u32 = 0x1941_A469;
pub const ATTACHED_FILE_ID: u32 = 0x61A7;
pub const FILE_DESCRIPTION_ID: u32 = 0x467E;
pub const FILE_NAME_ID: u32 = 0x466E;
pub const FILE_MEDIA_TYPE_ID: u32 = 0x4660;
pub const FILE_DATA_ID: u32 = 0x465C;
pub const FILE_UID_ID: u32 = 0x46AE;

// Chapters
pub const CHAPTERS_ID: u32 = 0x1043_A770;
pub const EDITION_ENTRY_ID: u32 = 0x45B9;
pub const EDITION_UID_ID: u32 = 0x45BC;
pub const CHAPTER_ATOM_ID: u32 = 0xB6;
pub const CHAPTER_UID_ID: u32 = 0x73C4;
pub const CHAPTER_TIME_START_ID: u32 = 0x91;
pub const CHAPTER_TIME_END_ID: u32 = 0x92;
pub const CHAPTER_DISPLAY_ID: u32 = 0x80;
pub const CHAP_STRING_ID: u32 = 0x85;
pub const CHAP_LANGUAGE_ID: u32 = 0x437C;

// Tags
pub const TAGS_ID: u32 = 0x1254_C367;
pub const TAG_ID: u32 = 0x7373;
pub const TARGETS_ID: u32 = 0x63C0;
pub const TARGET_TYPE_VALUE_ID: u32 = 0x68CA;
pub const TARGET_TYPE_ID: u32 = 0x63CA;
pub const TAG_TRACK_UID_ID: u32 = 0x63C5;
pub const TAG_EDITION_UID_ID: u32 = 0x63C9;
pub const TAG_CHAPTER_UID_ID: u32 = 0x63C4;
pub const TAG_ATTACHMENT_UID_ID: u32 = 0x63C6;
pub const SIMPLE_TAG_ID: u32 = 0x67C8;
pub const TAG_NAME_ID: u32 = 0x45A3;
pub const TAG_LANGUAGE_ID: u32 = 0x447A;
pub const TAG_DEFAULT_ID: u32 = 0x4484;
pub const TAG_STRING_ID: u32 = 0x4487;
pub const TAG_BINARY_ID: u32 = 0x4485;

use Placement::{Global, Root, Within};
use ValueKind::{Binary, Date, Float, Master, Signed, Unsigned, Utf8};

const STRING: ValueKind = ValueKind::String;

const IN_EBML: Placement = Within(&[EBML_HEADER_ID]);
const IN_SEGMENT: Placement = Within(&[SEGMENT_ID]);
const IN_SEEK: Placement = Within(&[SEEK_ID]);
const IN_INFO: Placement = Within(&[INFO_ID]);
const IN_CLUSTER: Placement = Within(&[CLUSTER_ID]);
const IN_BLOCK_GROUP: Placement = Within(&[BLOCK_GROUP_ID]);
const IN_TRACK_ENTRY: Placement = Within(&[TRACK_ENTRY_ID]);
const IN_VIDEO: Placement = Within(&[VIDEO_ID]);
const IN_AUDIO: Placement = Within(&[AUDIO_ID]);
const IN_CUE_POINT: Placement = Within(&[CUE_POINT_ID]);
const IN_CUE_TRACK_POSITIONS: Placement = Within(&[CUE_TRACK_POSITIONS_ID]);
const IN_ATTACHED_FILE: Placement = Within(&[ATTACHED_FILE_ID]);
const IN_EDITION_ENTRY: Placement = Within(&[EDITION_ENTRY_ID]);
const IN_CHAPTER_ATOM: Placement = Within(&[CHAPTER_ATOM_ID]);
const IN_CHAPTER_DISPLAY: Placement = Within(&[CHAPTER_DISPLAY_ID]);
const IN_TAG: Placement = Within(&[TAG_ID]);
const IN_TARGETS: Placement = Within(&[TARGETS_ID]);
const IN_SIMPLE_TAG: Placement = Within(&[SIMPLE_TAG_ID]);

const fn spec(id: u32, name: &'static str, kind: ValueKind, placement: Placement) -> ElementSpec {
    ElementSpec::new(id, name, kind, placement)
}

pub static MATROSKA_ELEMENTS: &[ElementSpec] = &[
    spec(EBML_HEADER_ID, "EBML", Master, Root),
    spec(EBML_VERSION_ID, "EBMLVersion", Unsigned, IN_EBML),
    spec(EBML_READ_VERSION_ID, "EBMLReadVersion", Unsigned, IN_EBML),
    spec(EBML_MAX_ID_LENGTH_ID, "EBMLMaxIDLength", Unsigned, IN_EBML),
    spec(EBML_MAX_SIZE_LENGTH_ID, "EBMLMaxSizeLength", Unsigned, IN_EBML),
    spec(EBML_DOCTYPE_ID, "DocType", STRING, IN_EBML),
    spec(EBML_DOCTYPE_VERSION_ID, "DocTypeVersion", Unsigned, IN_EBML),
    spec(EBML_DOCTYPE_READ_VERSION_ID, "DocTypeReadVersion", Unsigned, IN_EBML),
    spec(VOID_ID, "Void", Binary, Global),
    spec(CRC32_ID, "CRC-32", Binary, Global),
    spec(SEGMENT_ID, "Segment", Master, Root),
    // Meta seek
    spec(SEEK_HEAD_ID, "SeekHead", Master, IN_SEGMENT),
    spec(SEEK_ID, "Seek", Master, Within(&[SEEK_HEAD_ID])),
    spec(SEEK_ID_ID, "SeekID", Binary, IN_SEEK),
    spec(SEEK_POSITION_ID, "SeekPosition", Unsigned, IN_SEEK),
    // Segment information
    spec(INFO_ID, "Info", Master, IN_SEGMENT),
    spec(SEGMENT_UID_ID, "SegmentUID", Binary, IN_INFO),
    spec(SEGMENT_FILENAME_ID, "SegmentFilename", Utf8, IN_INFO),
    spec(PREV_UID_ID, "PrevUID", Binary, IN_INFO),
    spec(PREV_FILENAME_ID, "PrevFilename", Utf8, IN_INFO),
    spec(NEXT_UID_ID, "NextUID", Binary, IN_INFO),
    spec(NEXT_FILENAME_ID, "NextFilename", Utf8, IN_INFO),
    spec(TIMESTAMP_SCALE_ID, "TimestampScale", Unsigned, IN_INFO),
    spec(DURATION_ID, "Duration", Float, IN_INFO),
    spec(DATE_UTC_ID, "DateUTC", Date, IN_INFO),
    spec(TITLE_ID, "Title", Utf8, IN_INFO),
    spec(MUXING_APP_ID, "MuxingApp", Utf8, IN_INFO),
    spec(WRITING_APP_ID, "WritingApp", Utf8, IN_INFO),
    // Cluster
    spec(CLUSTER_ID, "Cluster", Master, IN_SEGMENT),
    spec(CLUSTER_TIMESTAMP_ID, "Timestamp", Unsigned, IN_CLUSTER),
    spec(CLUSTER_POSITION_ID, "Position", Unsigned, IN_CLUSTER),
    spec(CLUSTER_PREV_SIZE_ID, "PrevSize", Unsigned, IN_CLUSTER),
    spec(SIMPLE_BLOCK_ID, "SimpleBlock", Binary, IN_CLUSTER),
    spec(BLOCK_GROUP_ID, "BlockGroup", Master, IN_CLUSTER),
    spec(BLOCK_ID, "Block", Binary, IN_BLOCK_GROUP),
    spec(BLOCK_DURATION_ID, "BlockDuration", Unsigned, IN_BLOCK_GROUP),
    spec(REFERENCE_BLOCK_ID, "ReferenceBlock", Signed, IN_BLOCK_GROUP),
    spec(DISCARD_PADDING_ID, "DiscardPadding", Signed, IN_BLOCK_GROUP),
    // Tracks
    spec(TRACKS_ID, "Tracks", Master, IN_SEGMENT),
    spec(TRACK_ENTRY_ID, "TrackEntry", Master, Within(&[TRACKS_ID])),
    spec(TRACK_NUMBER_ID, "TrackNumber", Unsigned, IN_TRACK_ENTRY),
    spec(TRACK_UID_ID, "TrackUID", Unsigned, IN_TRACK_ENTRY),
    spec(TRACK_TYPE_ID, "TrackType", Unsigned, IN_TRACK_ENTRY),
    spec(FLAG_ENABLED_ID, "FlagEnabled", Unsigned, IN_TRACK_ENTRY),
    spec(FLAG_DEFAULT_ID, "FlagDefault", Unsigned, IN_TRACK_ENTRY),
    spec(FLAG_FORCED_ID, "FlagForced", Unsigned, IN_TRACK_ENTRY),
    spec(FLAG_LACING_ID, "FlagLacing", Unsigned, IN_TRACK_ENTRY),
    spec(MIN_CACHE_ID, "MinCache", Unsigned, IN_TRACK_ENTRY),
    spec(MAX_CACHE_ID, "MaxCache", Unsigned, IN_TRACK_ENTRY),
    spec(DEFAULT_DURATION_ID, "DefaultDuration", Unsigned, IN_TRACK_ENTRY),
    spec(MAX_BLOCK_ADDITION_ID_ID, "MaxBlockAdditionID", Unsigned, IN_TRACK_ENTRY),
    spec(NAME_ID, "Name", Utf8, IN_TRACK_ENTRY),
    spec(LANGUAGE_ID, "Language", STRING, IN_TRACK_ENTRY),
    spec(LANGUAGE_BCP47_ID, "LanguageBCP47", STRING, IN_TRACK_ENTRY),
    spec(CODEC_ID_ID, "CodecID", STRING, IN_TRACK_ENTRY),
    spec(CODEC_PRIVATE_ID, "CodecPrivate", Binary, IN_TRACK_ENTRY),
    spec(CODEC_NAME_ID, "CodecName", Utf8, IN_TRACK_ENTRY),
    spec(CODEC_DELAY_ID, "CodecDelay", Unsigned, IN_TRACK_ENTRY),
    spec(SEEK_PRE_ROLL_ID, "SeekPreRoll", Unsigned, IN_TRACK_ENTRY),
    spec(TRACK_OVERLAY_ID, "TrackOverlay", Unsigned, IN_TRACK_ENTRY),
    // Track operation
    spec(TRACK_OPERATION_ID, "TrackOperation", Master, IN_TRACK_ENTRY),
    spec(TRACK_COMBINE_PLANES_ID, "TrackCombinePlanes", Master, Within(&[TRACK_OPERATION_ID])),
    spec(TRACK_PLANE_ID, "TrackPlane", Master, Within(&[TRACK_COMBINE_PLANES_ID])),
    spec(TRACK_PLANE_UID_ID, "TrackPlaneUID", Unsigned, Within(&[TRACK_PLANE_ID])),
    spec(TRACK_PLANE_TYPE_ID, "TrackPlaneType", Unsigned, Within(&[TRACK_PLANE_ID])),
    spec(TRACK_JOIN_BLOCKS_ID, "TrackJoinBlocks", Master, Within(&[TRACK_OPERATION_ID])),
    spec(TRACK_JOIN_UID_ID, "TrackJoinUID", Unsigned, Within(&[TRACK_JOIN_BLOCKS_ID])),
    // Video
    spec(VIDEO_ID, "Video", Master, IN_TRACK_ENTRY),
    spec(FLAG_INTERLACED_ID, "FlagInterlaced", Unsigned, IN_VIDEO),
    spec(PIXEL_WIDTH_ID, "PixelWidth", Unsigned, IN_VIDEO),
    spec(PIXEL_HEIGHT_ID, "PixelHeight", Unsigned, IN_VIDEO),
    spec(DISPLAY_WIDTH_ID, "DisplayWidth", Unsigned, IN_VIDEO),
    spec(DISPLAY_HEIGHT_ID, "DisplayHeight", Unsigned, IN_VIDEO),
    spec(DISPLAY_UNIT_ID, "DisplayUnit", Unsigned, IN_VIDEO),
    // Audio
    spec(AUDIO_ID, "Audio", Master, IN_TRACK_ENTRY),
    spec(SAMPLING_FREQUENCY_ID, "SamplingFrequency", Float, IN_AUDIO),
    spec(OUTPUT_SAMPLING_FREQUENCY_ID, "OutputSamplingFrequency", Float, IN_AUDIO),
    spec(CHANNELS_ID, "Channels", Unsigned, IN_AUDIO),
    spec(BIT_DEPTH_ID, "BitDepth", Unsigned, IN_AUDIO),
    // Cues
    spec(CUES_ID, "Cues", Master, IN_SEGMENT),
    spec(CUE_POINT_ID, "CuePoint", Master, Within(&[CUES_ID])),
    spec(CUE_TIME_ID, "CueTime", Unsigned, IN_CUE_POINT),
    spec(CUE_TRACK_POSITIONS_ID, "CueTrackPositions", Master, IN_CUE_POINT),
    spec(CUE_TRACK_ID, "CueTrack", Unsigned, IN_CUE_TRACK_POSITIONS),
    spec(CUE_CLUSTER_POSITION_ID, "CueClusterPosition", Unsigned, IN_CUE_TRACK_POSITIONS),
    spec(CUE_RELATIVE_POSITION_ID, "CueRelativePosition", Unsigned, IN_CUE_TRACK_POSITIONS),
    spec(CUE_DURATION_ID, "CueDuration", Unsigned, IN_CUE_TRACK_POSITIONS),
    spec(CUE_BLOCK_NUMBER_ID, "CueBlockNumber", Unsigned, IN_CUE_TRACK_POSITIONS),
    // Attachments
    spec(ATTACHMENTS_ID, "Attachments", Master, IN_SEGMENT),
    spec(ATTACHED_FILE_ID, "AttachedFile", Master, Within(&[ATTACHMENTS_ID])),
    spec(FILE_DESCRIPTION_ID, "FileDescription", Utf8, IN_ATTACHED_FILE),
    spec(FILE_NAME_ID, "FileName", Utf8, IN_ATTACHED_FILE),
    spec(FILE_MEDIA_TYPE_ID, "FileMediaType", STRING, IN_ATTACHED_FILE),
    spec(FILE_DATA_ID, "FileData", Binary, IN_ATTACHED_FILE),
    spec(FILE_UID_ID, "FileUID", Unsigned, IN_ATTACHED_FILE),
    // Chapters
    spec(CHAPTERS_ID, "Chapters", Master, IN_SEGMENT),
    spec(EDITION_ENTRY_ID, "EditionEntry", Master, Within(&[CHAPTERS_ID])),
    spec(EDITION_UID_ID, "EditionUID", Unsigned, IN_EDITION_ENTRY),
    spec(CHAPTER_ATOM_ID, "ChapterAtom", Master, Within(&[EDITION_ENTRY_ID, CHAPTER_ATOM_ID])),
    spec(CHAPTER_UID_ID, "ChapterUID", Unsigned, IN_CHAPTER_ATOM),
    spec(CHAPTER_TIME_START_ID, "ChapterTimeStart", Unsigned, IN_CHAPTER_ATOM),
    spec(CHAPTER_TIME_END_ID, "ChapterTimeEnd", Unsigned, IN_CHAPTER_ATOM),
    spec(CHAPTER_DISPLAY_ID, "ChapterDisplay", Master, IN_CHAPTER_ATOM),
    spec(CHAP_STRING_ID, "ChapString", Utf8, IN_CHAPTER_DISPLAY),
    spec(CHAP_LANGUAGE_ID, "ChapLanguage", STRING, IN_CHAPTER_DISPLAY),
    // Tags
    spec(TAGS_ID, "Tags", Master, IN_SEGMENT),
    spec(TAG_ID, "Tag", Master, Within(&[TAGS_ID])),
    spec(TARGETS_ID, "Targets", Master, IN_TAG),
    spec(TARGET_TYPE_VALUE_ID, "TargetTypeValue", Unsigned, IN_TARGETS),
    spec(TARGET_TYPE_ID, "TargetType", STRING, IN_TARGETS),
    spec(TAG_TRACK_UID_ID, "TagTrackUID", Unsigned, IN_TARGETS),
    spec(TAG_EDITION_UID_ID, "TagEditionUID", Unsigned, IN_TARGETS),
    spec(TAG_CHAPTER_UID_ID, "TagChapterUID", Unsigned, IN_TARGETS),
    spec(TAG_ATTACHMENT_UID_ID, "TagAttachmentUID", Unsigned, IN_TARGETS),
    spec(SIMPLE_TAG_ID, "SimpleTag", Master, Within(&[TAG_ID, SIMPLE_TAG_ID])),
    spec(TAG_NAME_ID, "TagName", Utf8, IN_SIMPLE_TAG),
    spec(TAG_LANGUAGE_ID, "TagLanguage", STRING, IN_SIMPLE_TAG),
    spec(TAG_DEFAULT_ID, "TagDefault", Unsigned, IN_SIMPLE_TAG),
    spec(TAG_STRING_ID, "TagString", Utf8, IN_SIMPLE_TAG),
    spec(TAG_BINARY_ID, "TagBinary", Binary, IN_SIMPLE_TAG),
];
