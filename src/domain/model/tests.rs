// Unit tests for domain models

use super::*;
use serde_json::json;

#[test]
fn test_request_from_value() {
    let request = MetadataRequest::from_value(&json!({
        "videoBytes": [0, 1, 255],
        "extension": "mp4",
    }))
    .unwrap();

    assert_eq!(request.video_bytes, vec![0, 1, 255]);
    assert_eq!(request.extension, "mp4");
}

#[test]
fn test_request_missing_fields() {
    let err = MetadataRequest::from_value(&json!({ "extension": "mp4" })).unwrap_err();
    assert_eq!(err, ExtractionError::invalid("Missing videoBytes"));

    let err = MetadataRequest::from_value(&json!({ "videoBytes": [1, 2] })).unwrap_err();
    assert_eq!(err, ExtractionError::invalid("Missing extension"));

    let err = MetadataRequest::from_value(&json!({ "videoBytes": null, "extension": "mp4" }))
        .unwrap_err();
    assert_eq!(err, ExtractionError::invalid("Missing videoBytes"));
}

#[test]
fn test_request_wrong_types() {
    let err = MetadataRequest::from_value(&json!({ "videoBytes": "AAEC", "extension": "mp4" }))
        .unwrap_err();
    assert_eq!(err, ExtractionError::invalid("Invalid videoBytes format"));

    let err = MetadataRequest::from_value(&json!({ "videoBytes": [1, 256], "extension": "mp4" }))
        .unwrap_err();
    assert_eq!(err, ExtractionError::invalid("Invalid videoBytes format"));

    let err = MetadataRequest::from_value(&json!({ "videoBytes": [1, -1], "extension": "mp4" }))
        .unwrap_err();
    assert_eq!(err, ExtractionError::invalid("Invalid videoBytes format"));

    let err = MetadataRequest::from_value(&json!({ "videoBytes": [1], "extension": 4 }))
        .unwrap_err();
    assert_eq!(err, ExtractionError::invalid("Invalid extension format"));

    let err = MetadataRequest::from_value(&json!([1, 2, 3])).unwrap_err();
    assert_eq!(err.kind(), "InvalidArgument");
}

#[test]
fn test_request_debug_hides_payload() {
    let request = MetadataRequest::new(vec![7; 3], "mkv");
    let rendered = format!("{:?}", request);
    assert!(rendered.contains("<3 bytes>"));
    assert!(!rendered.contains("[7, 7, 7]"));
}

#[test]
fn test_record_serializes_exact_keys() {
    let value = serde_json::to_value(VideoMetadataRecord::default()).unwrap();
    let object = value.as_object().unwrap();

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "album",
            "albumArtist",
            "artist",
            "author",
            "bitrate",
            "date",
            "duration",
            "fileSize",
            "height",
            "rotation",
            "title",
            "width",
        ]
    );
    assert!(object["duration"].is_f64());
    assert!(object["fileSize"].is_u64());
}

#[test]
fn test_profile_serializes_snake_case() {
    let profile = ProbeProfile {
        name: "x",
        date_source: DateSource::LocalChangeTime,
        bitrate_policy: BitratePolicy::ReportedOnly,
        uses_extension_hint: true,
    };
    let value = serde_json::to_value(profile).unwrap();
    assert_eq!(value["date_source"], "local_change_time");
    assert_eq!(value["bitrate_policy"], "reported_only");
}
