mod common;

use std::io::{Cursor, Write};
use std::num::NonZeroUsize;

use assert_matches::assert_matches;
use common::{ebml_header, element, uint, unknown_size_element, CancelAfterReads};
use mkvinfo::ebml::{DataSize, Element};
use mkvinfo::matroska::ids::{
    CHAPTERS_ID, CHAPTER_ATOM_ID, CHAPTER_UID_ID, CLUSTER_ID, CLUSTER_TIMESTAMP_ID, CUES_ID,
    EDITION_ENTRY_ID, INFO_ID, SEGMENT_ID, SIMPLE_BLOCK_ID, TITLE_ID, TRACKS_ID, TRACK_ENTRY_ID,
    TRACK_NUMBER_ID, TRACK_TYPE_ID, VOID_ID,
};
use mkvinfo::{
    scan, scan_file, CancelToken, FormatError, MatroskaDocument, RecoveryPolicy, Report,
    ScanError, ScanOptions,
};

fn scan_bytes(bytes: &[u8], options: &ScanOptions) -> Result<Report, ScanError> {
    scan(Cursor::new(bytes.to_vec()), options)
}

fn element_tree(report: &Report) -> Vec<String> {
    report
        .lines()
        .iter()
        .skip_while(|line| *line != "Element tree")
        .skip(1)
        .take_while(|line| *line != "Warnings")
        .cloned()
        .collect()
}

fn cluster(timestamp: u64) -> Vec<u8> {
    [
        uint(CLUSTER_TIMESTAMP_ID, timestamp),
        element(SIMPLE_BLOCK_ID, &[0x81, 0x00, 0x00, 0x80]),
    ]
    .concat()
}

fn sample_file() -> Vec<u8> {
    let info = element(INFO_ID, &element(TITLE_ID, b"Sample"));
    let tracks = element(
        TRACKS_ID,
        &element(
            TRACK_ENTRY_ID,
            &[uint(TRACK_NUMBER_ID, 1), uint(TRACK_TYPE_ID, 1)].concat(),
        ),
    );
    let clusters = [
        unknown_size_element(CLUSTER_ID, &cluster(0)),
        element(CLUSTER_ID, &cluster(40)),
    ]
    .concat();
    [
        ebml_header("matroska"),
        unknown_size_element(SEGMENT_ID, &[info, tracks, clusters].concat()),
    ]
    .concat()
}

#[test]
fn test_minimal_file_with_unknown_size_segment() {
    let bytes = [
        ebml_header("webm"),
        unknown_size_element(SEGMENT_ID, &element(INFO_ID, &element(TITLE_ID, b"T"))),
    ]
    .concat();
    // Segment header is 5 bytes at offset 12
    let remaining = bytes.len() - 17;

    let report = scan_bytes(&bytes, &ScanOptions::default()).unwrap();

    assert_eq!(
        element_tree(&report),
        vec![
            "├── EBML @0 size=7".to_string(),
            "│   └── DocType @5 size=4: \"webm\"".to_string(),
            format!("└── Segment @12 size=unknown (resolved {remaining})"),
            "    └── Info @17 size=4".to_string(),
            "        └── Title @22 size=1: \"T\"".to_string(),
        ]
    );
}

#[test]
fn test_unknown_id_is_reported_opaque() {
    let bytes = [
        ebml_header("matroska"),
        unknown_size_element(
            SEGMENT_ID,
            &[element(0x4BAD, &[9; 20]), element(INFO_ID, &element(TITLE_ID, b"after"))].concat(),
        ),
    ]
    .concat();

    let report = scan_bytes(&bytes, &ScanOptions::default()).unwrap();
    let tree = element_tree(&report);

    assert!(
        tree.iter()
            .any(|line| line.contains("Unknown(0x4BAD) @21 size=20: <20 bytes: 09090909")),
        "{report}"
    );
    // The scan went on past it, still inside the Segment.
    assert!(tree.iter().any(|line| line.ends_with("Title @49 size=5: \"after\"")), "{report}");
}

#[test]
fn test_shallow_scan_skips_later_clusters() {
    let bytes = [
        ebml_header("matroska"),
        unknown_size_element(
            SEGMENT_ID,
            &[
                element(CLUSTER_ID, &cluster(0)),
                unknown_size_element(CLUSTER_ID, &cluster(40)),
                element(CLUSTER_ID, &cluster(80)),
            ]
            .concat(),
        ),
    ]
    .concat();

    let report = scan_bytes(&bytes, &ScanOptions::default().with_shallow(true)).unwrap();
    let tree = element_tree(&report);

    assert_eq!(
        tree[3..],
        [
            "    ├── Cluster @21 size=9".to_string(),
            "    │   ├── Timestamp @26 size=1: 0".to_string(),
            "    │   └── SimpleBlock @29 size=4: <4 bytes: 81000080>".to_string(),
            "    ├── Cluster @35 size=unknown (resolved 9) [skipped]".to_string(),
            "    └── Cluster @49 size=9 [skipped]".to_string(),
        ]
    );

    let full = scan_bytes(&bytes, &ScanOptions::default()).unwrap();
    assert_eq!(element_tree(&full).len(), 3 + 3 * 3);
}

#[test]
fn test_single_unknown_size_element_resolves_to_end_of_file() {
    let bytes = unknown_size_element(SEGMENT_ID, &element(INFO_ID, &element(TITLE_ID, b"x")));
    let doc = MatroskaDocument::parse_from(Cursor::new(bytes.clone()), &ScanOptions::default())
        .unwrap();

    assert_eq!(doc.elements.len(), 1);
    assert_eq!(doc.elements[0].declared_size, DataSize::Unknown);
    assert_eq!(doc.elements[0].end(), bytes.len() as u64);
    assert_eq!(doc.warnings, vec!["EBML header missing"]);
}

#[test]
fn test_scans_are_deterministic() {
    let bytes = sample_file();
    let options = ScanOptions::default();

    let first = scan_bytes(&bytes, &options).unwrap();
    let second = scan_bytes(&bytes, &options).unwrap();

    assert_eq!(first.to_string(), second.to_string());
}

fn check_containment(element: &Element) {
    if let DataSize::Known(size) = element.declared_size {
        if element.error.is_none() && !element.is_corrupt() {
            assert_eq!(element.data.length, size, "{element:?}");
        }
    }

    let mut pos = element.data.start;
    for child in element.children() {
        assert!(child.header.start >= pos, "siblings overlap: {child:?}");
        assert!(child.end() <= element.end(), "child escapes parent: {child:?}");
        pos = child.end();
        check_containment(child);
    }
}

#[test]
fn test_children_stay_inside_parents() {
    let bytes = sample_file();
    for len in [bytes.len(), bytes.len() - 3, bytes.len() / 2] {
        if let Ok(doc) =
            MatroskaDocument::parse_from(Cursor::new(bytes[..len].to_vec()), &ScanOptions::default())
        {
            doc.elements.iter().for_each(check_containment);
        }
    }
}

#[test]
fn test_truncated_files_always_terminate() {
    let bytes = sample_file();

    for len in 0..bytes.len() {
        let result = scan_bytes(&bytes[..len], &ScanOptions::default());
        assert_matches!(
            result,
            Ok(_) | Err(ScanError::Format { .. } | ScanError::Io(_)),
            "unexpected result for truncation at {len}"
        );
    }
}

#[test]
fn test_recovery_policies() {
    let bytes = [
        ebml_header("matroska"),
        element(SEGMENT_ID, &element(INFO_ID, &element(TITLE_ID, &[0xFF, 0xFE]))),
    ]
    .concat();

    let report = scan_bytes(&bytes, &ScanOptions::default()).unwrap();
    assert!(
        report
            .lines()
            .iter()
            .any(|line| line.ends_with("Title @26 size=2 !! corrupt: invalid UTF-8 string")),
        "{report}"
    );

    let strict = ScanOptions::default().with_recovery(RecoveryPolicy::Strict);
    assert_matches!(
        scan_bytes(&bytes, &strict),
        Err(ScanError::Format {
            offset: 26,
            reason: FormatError::InvalidUtf8
        })
    );
}

#[test]
fn test_depth_limit() {
    let mut atom = element(CHAPTER_ATOM_ID, &uint(CHAPTER_UID_ID, 1));
    for uid in 2..10 {
        atom = element(CHAPTER_ATOM_ID, &[uint(CHAPTER_UID_ID, uid), atom].concat());
    }
    let chapters = element(CHAPTERS_ID, &element(EDITION_ENTRY_ID, &atom));
    let bytes = [ebml_header("matroska"), element(SEGMENT_ID, &chapters)].concat();
    let options = ScanOptions::default().with_max_depth(NonZeroUsize::new(4).unwrap());

    let report = scan_bytes(&bytes, &options).unwrap();
    assert!(
        report.to_string().contains("!! corrupt: maximum nesting depth of 4 exceeded"),
        "{report}"
    );

    let strict = options.with_recovery(RecoveryPolicy::Strict);
    assert_matches!(
        scan_bytes(&bytes, &strict),
        Err(ScanError::Format {
            reason: FormatError::MaxDepthExceeded(4),
            ..
        })
    );
}

#[test]
fn test_cancelled_scan() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let options = ScanOptions::default().with_cancel(cancel);

    assert_matches!(scan_bytes(&sample_file(), &options), Err(ScanError::Cancelled));
}

#[test]
fn test_cancel_mid_scan() {
    // Large enough that the scan has to go back to the file several times.
    let voids: Vec<u8> = (0..5).flat_map(|_| element(VOID_ID, &[0; 4000])).collect();
    let bytes = [ebml_header("matroska"), element(SEGMENT_ID, &voids)].concat();

    let cases = vec![(2, true), (usize::MAX, false)];
    for (reads, cancelled) in cases {
        let cancel = CancelToken::new();
        let reader = CancelAfterReads::new(bytes.clone(), cancel.clone(), reads);
        let result = scan(reader, &ScanOptions::default().with_cancel(cancel));

        if cancelled {
            assert_matches!(result, Err(ScanError::Cancelled));
        } else {
            assert!(result.is_ok(), "{result:?}");
        }
    }
}

#[test]
fn test_stray_child_stays_in_unknown_size_cluster() {
    let open_cluster = unknown_size_element(
        CLUSTER_ID,
        &[
            uint(CLUSTER_TIMESTAMP_ID, 0),
            uint(TRACK_NUMBER_ID, 1),
            element(SIMPLE_BLOCK_ID, &[0x81, 0x00, 0x00, 0x80]),
        ]
        .concat(),
    );
    let bytes = [
        ebml_header("matroska"),
        unknown_size_element(SEGMENT_ID, &[open_cluster, element(CUES_ID, &[])].concat()),
    ]
    .concat();

    let doc = MatroskaDocument::parse_from(Cursor::new(bytes), &ScanOptions::default()).unwrap();
    assert_eq!(doc.elements.len(), 2);

    let ids = |element: &Element| element.children().iter().map(|child| child.id).collect::<Vec<_>>();
    let segment = &doc.elements[1];
    assert_eq!(ids(segment), vec![CLUSTER_ID, CUES_ID]);
    assert_eq!(
        ids(&segment.children()[0]),
        vec![CLUSTER_TIMESTAMP_ID, TRACK_NUMBER_ID, SIMPLE_BLOCK_ID]
    );
    assert!(doc.warnings.is_empty(), "{:?}", doc.warnings);
}

#[test]
fn test_scan_file_on_disk() {
    let bytes = sample_file();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();
    file.flush().unwrap();

    let options = ScanOptions::default();
    let from_disk = scan_file(file.path(), &options).unwrap();
    let from_memory = scan_bytes(&bytes, &options).unwrap();

    assert_eq!(from_disk, from_memory);
    assert!(from_disk.to_string().contains("Title: \"Sample\""));
    assert!(from_disk.to_string().contains("Track 1: video"));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = scan_file(dir.path().join("missing.mkv"), &ScanOptions::default());

    assert_matches!(result, Err(ScanError::Io(_)));
}
