use std::fmt;

use crate::ebml::primitives::format_date;
use crate::ebml::{DataSize, Element, ElementBody, RecoveryPolicy, ScanOptions};
use crate::matroska::document::{
    Attachment, AudioSettings, Block, BlockKind, Chapter, Cluster, CuePoint, EbmlHeader, Edition,
    MatroskaDocument, SeekEntry, Segment, SegmentInfo, SimpleTag, Tag, TrackEntry, TrackOperation,
    VideoSettings, DEFAULT_TIMESTAMP_SCALE,
};
use crate::matroska::{element_name, Lacing};
use crate::util::tree_printer::{print_forest, TreePrinter, TreePrintable};

/// Rendered scan result, one entry per output line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn push_field(fields: &mut Vec<String>, name: &str, value: Option<impl fmt::Display>) {
    if let Some(value) = value {
        fields.push(format!("{name}: {value}"));
    }
}

fn quoted(value: Option<&String>) -> Option<String> {
    value.map(|value| format!("{value:?}"))
}

fn or_unknown(value: Option<impl fmt::Display>) -> String {
    value.map_or_else(|| "?".to_string(), |value| value.to_string())
}

fn element_label(element: &Element) -> String {
    // Placeholders for undecodable headers have no header bytes.
    let placeholder = element.header.length == 0;
    let mut label = if placeholder {
        "!! corrupt".to_string()
    } else {
        element_name(element.id)
    };

    label.push_str(&format!(" @{} ", element.header.start));
    match element.declared_size {
        DataSize::Known(size) => label.push_str(&format!("size={size}")),
        DataSize::Unknown => label.push_str(&format!("size=unknown (resolved {})", element.data.length)),
    }

    match &element.body {
        ElementBody::Master(_) => {}
        ElementBody::Value(value) => label.push_str(&format!(": {value}")),
        ElementBody::Skipped => label.push_str(" [skipped]"),
        ElementBody::Corrupt(reason) if placeholder => label.push_str(&format!(": {reason}")),
        ElementBody::Corrupt(reason) => label.push_str(&format!(" !! corrupt: {reason}")),
    }

    if let Some(error) = &element.error {
        label.push_str(&format!(" !! {error}"));
    }
    label
}

impl TreePrintable for Element {
    fn label(&self) -> String {
        element_label(self)
    }

    fn subtrees(&self) -> Vec<&dyn TreePrintable> {
        self.children()
            .iter()
            .map(|child| child as &dyn TreePrintable)
            .collect()
    }
}

/// Summary node grouping records that have no element of their own.
struct Section<'a> {
    label: String,
    fields: Vec<String>,
    items: Vec<&'a dyn TreePrintable>,
    sections: Vec<Section<'a>>,
}

impl<'a> Section<'a> {
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            fields: Vec::new(),
            items: Vec::new(),
            sections: Vec::new(),
        }
    }

    fn with_items<T: TreePrintable>(mut self, items: &'a [T]) -> Self {
        self.items
            .extend(items.iter().map(|item| item as &dyn TreePrintable));
        self
    }
}

impl TreePrintable for Section<'_> {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn fields(&self) -> Vec<String> {
        self.fields.clone()
    }

    fn subtrees(&self) -> Vec<&dyn TreePrintable> {
        let mut subtrees: Vec<&dyn TreePrintable> = self.items.clone();
        for section in &self.sections {
            subtrees.push(section);
        }
        subtrees
    }
}

impl TreePrintable for EbmlHeader {
    fn label(&self) -> String {
        "EBML Header".to_string()
    }

    fn fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        push_field(&mut fields, "EBMLVersion", self.version);
        push_field(&mut fields, "EBMLReadVersion", self.read_version);
        push_field(&mut fields, "EBMLMaxIDLength", self.max_id_length);
        push_field(&mut fields, "EBMLMaxSizeLength", self.max_size_length);
        push_field(&mut fields, "DocType", quoted(self.doc_type.as_ref()));
        push_field(&mut fields, "DocTypeVersion", self.doc_type_version);
        push_field(&mut fields, "DocTypeReadVersion", self.doc_type_read_version);
        fields
    }
}

impl TreePrintable for SegmentInfo {
    fn label(&self) -> String {
        "Info".to_string()
    }

    fn fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        push_field(&mut fields, "SegmentUID", self.segment_uid.as_deref().map(hex::encode));
        push_field(&mut fields, "SegmentFilename", quoted(self.segment_filename.as_ref()));
        push_field(&mut fields, "Title", quoted(self.title.as_ref()));
        push_field(&mut fields, "MuxingApp", quoted(self.muxing_app.as_ref()));
        push_field(&mut fields, "WritingApp", quoted(self.writing_app.as_ref()));
        let scale = self
            .timestamp_scale
            .map_or_else(|| format!("{DEFAULT_TIMESTAMP_SCALE} (default)"), |scale| scale.to_string());
        fields.push(format!("TimestampScale: {scale}"));
        if let (Some(duration), Some(seconds)) = (self.duration, self.duration_seconds()) {
            fields.push(format!("Duration: {duration:.6} ({seconds:.6} s)"));
        }
        push_field(&mut fields, "DateUTC", self.date_utc.map(format_date));
        fields
    }
}

impl TreePrintable for VideoSettings {
    fn label(&self) -> String {
        "Video".to_string()
    }

    fn fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        push_field(&mut fields, "PixelWidth", self.pixel_width);
        push_field(&mut fields, "PixelHeight", self.pixel_height);
        push_field(&mut fields, "DisplayWidth", self.display_width);
        push_field(&mut fields, "DisplayHeight", self.display_height);
        push_field(&mut fields, "FlagInterlaced", self.interlaced);
        fields
    }
}

impl TreePrintable for AudioSettings {
    fn label(&self) -> String {
        "Audio".to_string()
    }

    fn fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        let hz = |value: f64| format!("{value:.6}");
        push_field(&mut fields, "SamplingFrequency", self.sampling_frequency.map(hz));
        push_field(&mut fields, "OutputSamplingFrequency", self.output_sampling_frequency.map(hz));
        push_field(&mut fields, "Channels", self.channels);
        push_field(&mut fields, "BitDepth", self.bit_depth);
        fields
    }
}

impl TreePrintable for TrackOperation {
    fn label(&self) -> String {
        "TrackOperation".to_string()
    }

    fn fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = self
            .planes
            .iter()
            .map(|plane| {
                format!(
                    "TrackPlane: uid {}, type {}",
                    or_unknown(plane.uid),
                    or_unknown(plane.plane_type)
                )
            })
            .collect();
        fields.extend(self.join_uids.iter().map(|uid| format!("TrackJoinUID: {uid}")));
        fields
    }
}

impl TreePrintable for TrackEntry {
    fn label(&self) -> String {
        format!("Track {}: {}", or_unknown(self.number), or_unknown(self.track_type))
    }

    fn fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        push_field(&mut fields, "TrackUID", self.uid);
        push_field(&mut fields, "FlagEnabled", self.flag_enabled);
        push_field(&mut fields, "FlagDefault", self.flag_default);
        push_field(&mut fields, "FlagForced", self.flag_forced);
        push_field(&mut fields, "FlagLacing", self.flag_lacing);
        push_field(&mut fields, "Name", quoted(self.name.as_ref()));
        push_field(&mut fields, "Language", quoted(self.language.as_ref()));
        push_field(&mut fields, "LanguageBCP47", quoted(self.language_bcp47.as_ref()));
        push_field(&mut fields, "CodecID", quoted(self.codec_id.as_ref()));
        push_field(&mut fields, "CodecName", quoted(self.codec_name.as_ref()));
        push_field(&mut fields, "CodecPrivate", self.codec_private_len.map(|len| format!("{len} bytes")));
        push_field(&mut fields, "DefaultDuration", self.default_duration.map(|ns| format!("{ns} ns")));
        push_field(&mut fields, "CodecDelay", self.codec_delay.map(|ns| format!("{ns} ns")));
        push_field(&mut fields, "SeekPreRoll", self.seek_pre_roll.map(|ns| format!("{ns} ns")));
        fields.extend(self.overlays.iter().map(|uid| format!("TrackOverlay: {uid}")));
        fields
    }

    fn subtrees(&self) -> Vec<&dyn TreePrintable> {
        let mut subtrees: Vec<&dyn TreePrintable> = Vec::new();
        if let Some(video) = &self.video {
            subtrees.push(video);
        }
        if let Some(audio) = &self.audio {
            subtrees.push(audio);
        }
        if let Some(operation) = &self.operation {
            subtrees.push(operation);
        }
        subtrees
    }
}

fn block_line(block: &Block, cluster_timestamp: Option<u64>) -> String {
    let kind = match block.kind {
        BlockKind::Simple => "SimpleBlock",
        BlockKind::Group => "BlockGroup",
    };
    let prefix = format!("{kind} @{} size={}", block.offset, block.size);

    let header = match &block.header {
        Ok(header) => header,
        Err(error) => return format!("{prefix} !! {error}"),
    };

    let mut parts = vec![format!("track {}", header.track_number)];
    match block.absolute_timestamp(cluster_timestamp) {
        Some(absolute) => parts.push(format!("timecode {} (absolute {absolute})", header.timecode)),
        None => parts.push(format!("timecode {}", header.timecode)),
    }
    if block.kind == BlockKind::Simple && header.is_keyframe() {
        parts.push("keyframe".to_string());
    }
    if header.is_invisible() {
        parts.push("invisible".to_string());
    }
    if header.is_discardable() {
        parts.push("discardable".to_string());
    }
    parts.push(format!("lacing {}", header.lacing));
    parts.push(format!("frames {}", header.frame_count));
    match &header.frame_sizes {
        Some(sizes) if header.lacing != Lacing::None => {
            let sizes: Vec<String> = sizes.iter().map(u64::to_string).collect();
            parts.push(format!("frame sizes {}", sizes.join("/")));
        }
        _ => {}
    }
    if let Some(duration) = block.duration {
        parts.push(format!("duration {duration}"));
    }
    if block.kind == BlockKind::Group {
        parts.push(format!("references {}", block.references));
    }

    format!("{prefix}: {}", parts.join(", "))
}

impl TreePrintable for Cluster {
    fn label(&self) -> String {
        format!("Cluster @{}", self.offset)
    }

    fn fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        push_field(&mut fields, "Timestamp", self.timestamp);
        push_field(&mut fields, "Position", self.position);
        push_field(&mut fields, "PrevSize", self.prev_size);
        fields.extend(self.blocks.iter().map(|block| block_line(block, self.timestamp)));
        fields
    }
}

impl TreePrintable for SeekEntry {
    fn label(&self) -> String {
        let target = self.id.map_or_else(|| "?".to_string(), element_name);
        format!("Seek {target} at {}", or_unknown(self.position))
    }
}

impl TreePrintable for CuePoint {
    fn label(&self) -> String {
        format!("CuePoint time={}", or_unknown(self.time))
    }

    fn fields(&self) -> Vec<String> {
        self.positions
            .iter()
            .map(|position| {
                let mut parts = vec![
                    format!("track {}", or_unknown(position.track)),
                    format!("cluster {}", or_unknown(position.cluster_position)),
                ];
                if let Some(relative) = position.relative_position {
                    parts.push(format!("relative {relative}"));
                }
                if let Some(block) = position.block_number {
                    parts.push(format!("block {block}"));
                }
                if let Some(duration) = position.duration {
                    parts.push(format!("duration {duration}"));
                }
                parts.join(", ")
            })
            .collect()
    }
}

impl TreePrintable for Attachment {
    fn label(&self) -> String {
        format!("AttachedFile {}", quoted(self.file_name.as_ref()).unwrap_or_else(|| "?".to_string()))
    }

    fn fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        push_field(&mut fields, "FileMediaType", quoted(self.media_type.as_ref()));
        push_field(&mut fields, "FileDescription", quoted(self.description.as_ref()));
        push_field(&mut fields, "FileData", self.data_len.map(|len| format!("{len} bytes")));
        push_field(&mut fields, "FileUID", self.uid);
        fields
    }
}

impl TreePrintable for Chapter {
    fn label(&self) -> String {
        format!("Chapter {}", or_unknown(self.uid))
    }

    fn fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        push_field(&mut fields, "ChapterTimeStart", self.time_start);
        push_field(&mut fields, "ChapterTimeEnd", self.time_end);
        for display in &self.displays {
            let string = quoted(display.string.as_ref()).unwrap_or_else(|| "?".to_string());
            match &display.language {
                Some(language) => fields.push(format!("ChapterDisplay: {string} ({language})")),
                None => fields.push(format!("ChapterDisplay: {string}")),
            }
        }
        fields
    }

    fn subtrees(&self) -> Vec<&dyn TreePrintable> {
        self.chapters
            .iter()
            .map(|chapter| chapter as &dyn TreePrintable)
            .collect()
    }
}

impl TreePrintable for Edition {
    fn label(&self) -> String {
        format!("Edition {}", or_unknown(self.uid))
    }

    fn subtrees(&self) -> Vec<&dyn TreePrintable> {
        self.chapters
            .iter()
            .map(|chapter| chapter as &dyn TreePrintable)
            .collect()
    }
}

impl TreePrintable for SimpleTag {
    fn label(&self) -> String {
        let name = quoted(self.name.as_ref()).unwrap_or_else(|| "?".to_string());
        match (&self.string, self.binary_len) {
            (Some(string), _) => format!("{name} = {string:?}"),
            (None, Some(len)) => format!("{name} = <{len} bytes>"),
            (None, None) => name,
        }
    }

    fn fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        push_field(&mut fields, "TagLanguage", quoted(self.language.as_ref()));
        push_field(&mut fields, "TagDefault", self.default);
        fields
    }

    fn subtrees(&self) -> Vec<&dyn TreePrintable> {
        self.children
            .iter()
            .map(|tag| tag as &dyn TreePrintable)
            .collect()
    }
}

impl TreePrintable for Tag {
    fn label(&self) -> String {
        "Tag".to_string()
    }

    fn fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        if let Some(targets) = &self.targets {
            push_field(&mut fields, "TargetTypeValue", targets.type_value);
            push_field(&mut fields, "TargetType", quoted(targets.target_type.as_ref()));
            let uids = [
                ("TagTrackUID", &targets.track_uids),
                ("TagEditionUID", &targets.edition_uids),
                ("TagChapterUID", &targets.chapter_uids),
                ("TagAttachmentUID", &targets.attachment_uids),
            ];
            for (name, values) in uids {
                fields.extend(values.iter().map(|uid| format!("{name}: {uid}")));
            }
        }
        fields
    }

    fn subtrees(&self) -> Vec<&dyn TreePrintable> {
        self.simple_tags
            .iter()
            .map(|tag| tag as &dyn TreePrintable)
            .collect()
    }
}

fn segment_section(segment: &Segment) -> Section<'_> {
    let mut section = Section::new(format!("Segment @{}", segment.offset));
    if let Some(info) = &segment.info {
        section.items.push(info);
    }

    if !segment.seek_entries.is_empty() {
        section
            .sections
            .push(Section::new("SeekHead").with_items(&segment.seek_entries));
    }
    if !segment.tracks.is_empty() {
        section.sections.push(
            Section::new(format!("Tracks ({})", segment.tracks.len())).with_items(&segment.tracks),
        );
    }
    if !segment.clusters.is_empty() || segment.skipped_clusters > 0 || segment.corrupt_clusters > 0 {
        let mut clusters = Section::new(format!("Clusters ({})", segment.clusters.len()))
            .with_items(&segment.clusters);
        if segment.skipped_clusters > 0 {
            clusters
                .fields
                .push(format!("{} more skipped by shallow scan", segment.skipped_clusters));
        }
        if segment.corrupt_clusters > 0 {
            clusters
                .fields
                .push(format!("{} corrupt", segment.corrupt_clusters));
        }
        section.sections.push(clusters);
    }
    if !segment.cue_points.is_empty() {
        section.sections.push(
            Section::new(format!("Cues ({})", segment.cue_points.len()))
                .with_items(&segment.cue_points),
        );
    }
    if !segment.attachments.is_empty() {
        section.sections.push(
            Section::new(format!("Attachments ({})", segment.attachments.len()))
                .with_items(&segment.attachments),
        );
    }
    if !segment.editions.is_empty() {
        section
            .sections
            .push(Section::new("Chapters").with_items(&segment.editions));
    }
    if !segment.tags.is_empty() {
        section.sections.push(
            Section::new(format!("Tags ({})", segment.tags.len())).with_items(&segment.tags),
        );
    }
    section
}

/// Renders the summary, the full element tree and the warnings of `doc`.
pub fn print_matroska_report(doc: &MatroskaDocument, options: &ScanOptions) -> Report {
    let recovery = match options.recovery {
        RecoveryPolicy::BestEffort => "best-effort",
        RecoveryPolicy::Strict => "strict",
    };
    let mut out = vec![
        "Matroska report".to_string(),
        format!(
            "Options: shallow={} max_depth={} recovery={recovery}",
            options.shallow, options.max_depth
        ),
    ];

    out.push("Summary".to_string());
    let segments: Vec<Section<'_>> = doc.segments.iter().map(segment_section).collect();
    let mut summary: Vec<&dyn TreePrintable> = Vec::new();
    if let Some(header) = &doc.ebml_header {
        summary.push(header);
    }
    summary.extend(segments.iter().map(|section| section as &dyn TreePrintable));
    print_forest(&mut out, &summary);

    out.push("Element tree".to_string());
    let elements: Vec<&dyn TreePrintable> = doc
        .elements
        .iter()
        .map(|element| element as &dyn TreePrintable)
        .collect();
    print_forest(&mut out, &elements);

    if !doc.warnings.is_empty() {
        out.push("Warnings".to_string());
        let printer = TreePrinter::new();
        for (i, warning) in doc.warnings.iter().enumerate() {
            printer.node(&mut out, i + 1 == doc.warnings.len(), warning);
        }
    }

    Report { lines: out }
}
