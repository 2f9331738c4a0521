// Unit tests for validation and reshaping rules

use super::*;

fn libav_like() -> ProbeProfile {
    ProbeProfile {
        name: "test-derive",
        date_source: DateSource::UtcCreationTime,
        bitrate_policy: BitratePolicy::DeriveFromSize,
        uses_extension_hint: false,
    }
}

fn reported_only() -> ProbeProfile {
    ProbeProfile {
        name: "test-reported",
        date_source: DateSource::LocalChangeTime,
        bitrate_policy: BitratePolicy::ReportedOnly,
        uses_extension_hint: false,
    }
}

#[test]
fn test_empty_bytes_rejected() {
    let request = MetadataRequest::new(Vec::new(), "mp4");
    let err = RequestRules::validate(&request, 1024).unwrap_err();
    assert_eq!(err, ExtractionError::invalid("Empty videoBytes"));
}

#[test]
fn test_oversized_bytes_rejected() {
    let request = MetadataRequest::new(vec![0u8; 11], "mp4");
    let err = RequestRules::validate(&request, 10).unwrap_err();
    assert_eq!(err.kind(), "InvalidArgument");
    assert!(err.message().contains("10 bytes"));
}

#[test]
fn test_extension_normalization() {
    assert_eq!(RequestRules::normalize_extension("mp4").unwrap(), "mp4");
    assert_eq!(RequestRules::normalize_extension(" .MOV ").unwrap(), "MOV");
    assert_eq!(RequestRules::normalize_extension("m2ts").unwrap(), "m2ts");
}

#[test]
fn test_extension_rejects_path_tricks() {
    for bad in ["", ".", "../mp4", "mp4/x", "a b", "mp4\0", "toolongextension12"] {
        assert!(
            RequestRules::normalize_extension(bad).is_err(),
            "expected {:?} to be rejected",
            bad
        );
    }
}

#[test]
fn test_derive_bitrate() {
    // 1_000_000 bytes over 8 seconds = 1 Mbit/s
    assert_eq!(ReshapeRules::derive_bitrate(1_000_000, 8000.0), 1_000_000);
    assert_eq!(ReshapeRules::derive_bitrate(1_000, 0.0), 0);
    assert_eq!(ReshapeRules::derive_bitrate(1_000, -5.0), 0);
    assert_eq!(ReshapeRules::derive_bitrate(1_000, f64::NAN), 0);
}

#[test]
fn test_rotation_normalization() {
    assert_eq!(ReshapeRules::normalize_rotation(0), 0);
    assert_eq!(ReshapeRules::normalize_rotation(-90), 270);
    assert_eq!(ReshapeRules::normalize_rotation(450), 90);
    assert_eq!(ReshapeRules::normalize_rotation(360), 0);
}

#[test]
fn test_display_matrix_is_counterclockwise() {
    assert_eq!(ReshapeRules::rotation_from_display_matrix(-90.0), Some(90));
    assert_eq!(ReshapeRules::rotation_from_display_matrix(90.0), Some(270));
    assert_eq!(ReshapeRules::rotation_from_display_matrix(-179.6), Some(180));
    assert_eq!(ReshapeRules::rotation_from_display_matrix(f64::NAN), None);
}

#[test]
fn test_pick_tag_is_case_insensitive_and_skips_blank() {
    let mut tags = BTreeMap::new();
    tags.insert("TITLE".to_string(), "  Holiday  ".to_string());
    tags.insert("album_artist".to_string(), "   ".to_string());
    tags.insert("albumartist".to_string(), "Various".to_string());

    assert_eq!(ReshapeRules::pick_tag(&tags, TITLE_KEYS), "Holiday");
    assert_eq!(ReshapeRules::pick_tag(&tags, ALBUM_ARTIST_KEYS), "Various");
    assert_eq!(ReshapeRules::pick_tag(&tags, AUTHOR_KEYS), "");
}

#[test]
fn test_reshape_defaults_missing_fields() {
    let record = ReshapeRules::reshape(&ProbeResult::default(), 42, "", &libav_like());

    assert_eq!(record.file_size, 42);
    assert_eq!(record.duration, 0.0);
    assert_eq!(record.width, 0);
    assert_eq!(record.height, 0);
    assert_eq!(record.rotation, 0);
    assert_eq!(record.bitrate, 0);
    assert_eq!(record.title, "");
    assert_eq!(record.album_artist, "");
    assert_eq!(record.date, "");
}

#[test]
fn test_reshape_derives_bitrate_under_derive_policy() {
    let probe = ProbeResult {
        duration_ms: Some(2000.0),
        reported_bitrate: Some(123),
        ..ProbeResult::default()
    };
    let record = ReshapeRules::reshape(&probe, 500, "2024-01-01 00:00:00", &libav_like());
    assert_eq!(record.bitrate, 2000);
    assert_eq!(record.date, "2024-01-01 00:00:00");
}

#[test]
fn test_reshape_uses_reported_bitrate_only() {
    let probe = ProbeResult {
        duration_ms: Some(2000.0),
        ..ProbeResult::default()
    };
    assert_eq!(ReshapeRules::reshape(&probe, 500, "", &reported_only()).bitrate, 0);

    let probe = ProbeResult {
        reported_bitrate: Some(96_000),
        ..probe
    };
    assert_eq!(ReshapeRules::reshape(&probe, 500, "", &reported_only()).bitrate, 96_000);
}

#[test]
fn test_reshape_copies_structure_and_tags() {
    let mut tags = BTreeMap::new();
    tags.insert("title".to_string(), "Clip".to_string());
    tags.insert("artist".to_string(), "Someone".to_string());
    tags.insert("author".to_string(), "Writer".to_string());
    tags.insert("album".to_string(), "Trips".to_string());
    tags.insert("album_artist".to_string(), "Band".to_string());

    let probe = ProbeResult {
        duration_ms: Some(1500.5),
        width: Some(1920),
        height: Some(1080),
        rotation: Some(-90),
        tags,
        stream_count: 2,
        ..ProbeResult::default()
    };
    let record = ReshapeRules::reshape(&probe, 10, "", &libav_like());

    assert_eq!(record.duration, 1500.5);
    assert_eq!((record.width, record.height), (1920, 1080));
    assert_eq!(record.rotation, 270);
    assert_eq!(record.title, "Clip");
    assert_eq!(record.artist, "Someone");
    assert_eq!(record.author, "Writer");
    assert_eq!(record.album, "Trips");
    assert_eq!(record.album_artist, "Band");
}
