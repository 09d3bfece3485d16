//! End-to-end tests for torrent creation.
//!
//! Each test lays out a small source tree in a temporary directory, runs
//! [`make_torrent`] and decodes the written file with `serde_bencode` to
//! check the descriptor independently of our own encoder.

use super::*;
use crate::error::MakeError;
use serde::Deserialize;
use serde_bytes::ByteBuf;
use sha1::{Digest, Sha1};
use std::fs;

#[derive(Debug, Deserialize)]
struct Decoded {
    announce: String,
    #[serde(rename = "announce-list", default)]
    announce_list: Option<Vec<Vec<String>>>,
    #[serde(default)]
    comment: Option<String>,
    #[serde(rename = "created by", default)]
    created_by: Option<String>,
    #[serde(rename = "creation date")]
    creation_date: i64,
    info: DecodedInfo,
}

#[derive(Debug, Deserialize)]
struct DecodedInfo {
    #[serde(default)]
    length: Option<u64>,
    #[serde(default)]
    files: Option<Vec<DecodedFile>>,
    name: String,
    #[serde(rename = "piece length")]
    piece_length: u64,
    pieces: ByteBuf,
    #[serde(default)]
    private: Option<u8>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct DecodedFile {
    length: u64,
    path: Vec<String>,
}

fn config(source: &Path, trackers: &[&str]) -> MakeConfig {
    let mut config = MakeConfig::new(source, TrackerList::parse(trackers.iter().copied()).unwrap());
    config.creation_date = Some(1_600_000_000);
    config
}

fn decode(path: &Path) -> Decoded {
    serde_bencode::from_bytes(&fs::read(path).unwrap()).unwrap()
}

fn sha1(data: &[u8]) -> [u8; 20] {
    Sha1::digest(data).into()
}

#[test]
fn test_single_file_torrent() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("a.txt");
    fs::write(&file, b"hello").unwrap();

    let mut config = config(&file, &["http://t/announce"]);
    config.piece_size_exponent = Some(16);
    config.output = Some(dir.path().join("a.txt.torrent"));

    let created = make_torrent(&config, |_, _| {}).unwrap();
    let decoded = decode(&created.output);

    assert_eq!(decoded.announce, "http://t/announce");
    assert!(decoded.announce_list.is_none());
    assert_eq!(decoded.creation_date, 1_600_000_000);
    assert_eq!(decoded.info.length, Some(5));
    assert!(decoded.info.files.is_none());
    assert_eq!(decoded.info.name, "a.txt");
    assert_eq!(decoded.info.piece_length, 65536);
    assert_eq!(decoded.info.pieces.as_ref(), &sha1(b"hello")[..]);
    assert!(decoded.info.private.is_none());
}

#[test]
fn test_directory_torrent_with_two_trackers() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("b");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("2.txt"), b"0123456789").unwrap();
    fs::write(root.join("1.txt"), b"").unwrap();

    let mut config = config(&root, &["udp://one:6969", "https://two/announce"]);
    config.output = Some(dir.path().join("b.torrent"));

    let created = make_torrent(&config, |_, _| {}).unwrap();
    let decoded = decode(&created.output);

    assert_eq!(decoded.announce, "udp://one:6969");
    assert_eq!(
        decoded.announce_list,
        Some(vec![
            vec!["udp://one:6969".to_string()],
            vec!["https://two/announce".to_string()],
        ])
    );
    assert_eq!(decoded.info.name, "b");
    assert!(decoded.info.length.is_none());
    assert_eq!(
        decoded.info.files.unwrap(),
        vec![
            DecodedFile { length: 0, path: vec!["1.txt".into()] },
            DecodedFile { length: 10, path: vec!["2.txt".into()] },
        ]
    );
    assert_eq!(decoded.info.piece_length, 1 << 18);
    assert_eq!(decoded.info.pieces.len(), 20);
    assert_eq!(decoded.info.pieces.as_ref(), &sha1(b"0123456789")[..]);
    assert_eq!(created.metainfo.info.total_pieces(), 1);
}

#[test]
fn test_nested_paths_and_cross_file_pieces() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("tree");
    fs::create_dir_all(root.join("sub")).unwrap();
    let a: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
    let b: Vec<u8> = (0..40_000u32).map(|i| (i % 7) as u8).collect();
    fs::write(root.join("a.bin"), &a).unwrap();
    fs::write(root.join("sub").join("b.bin"), &b).unwrap();

    let mut config = config(&root, &["http://t/announce"]);
    config.piece_size_exponent = Some(16);
    config.output = Some(dir.path().join("tree.torrent"));

    let created = make_torrent(&config, |_, _| {}).unwrap();
    let decoded = decode(&created.output);

    let files = decoded.info.files.unwrap();
    assert_eq!(files[1].path, vec!["sub".to_string(), "b.bin".to_string()]);

    let stream = [a, b].concat();
    let expected: Vec<u8> = stream.chunks(1 << 16).flat_map(sha1).collect();
    assert_eq!(decoded.info.pieces.as_ref(), expected.as_slice());
    assert_eq!(decoded.info.pieces.len(), 3 * 20);
}

#[test]
fn test_optional_fields_and_private_flag() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("data");
    fs::write(&file, b"content").unwrap();

    let mut config = config(&file, &["http://t/announce"]);
    config.comment = Some("a comment".into());
    config.created_by = Some("mktorrent-rs test".into());
    config.name = Some("renamed".into());
    config.private = true;
    config.output = Some(dir.path().join("out.torrent"));

    let created = make_torrent(&config, |_, _| {}).unwrap();
    let decoded = decode(&created.output);

    assert_eq!(decoded.comment.as_deref(), Some("a comment"));
    assert_eq!(decoded.created_by.as_deref(), Some("mktorrent-rs test"));
    assert_eq!(decoded.info.name, "renamed");
    assert_eq!(decoded.info.private, Some(1));

    let raw = fs::read(&created.output).unwrap();
    assert_eq!(raw, created.metainfo.to_bytes());
}

#[test]
fn test_default_output_name() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("movie.mkv");
    fs::write(&file, b"frames").unwrap();

    let config = config(&file, &["http://t/announce"]);
    let name = resolve_name(&config).unwrap();
    assert_eq!(name, "movie.mkv");
    assert_eq!(resolve_output(&config, &name), PathBuf::from("movie.mkv.torrent"));
}

#[test]
fn test_name_of_current_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("project");
    fs::create_dir(&root).unwrap();

    let config = config(&root.join("."), &["http://t/announce"]);
    assert_eq!(resolve_name(&config).unwrap(), "project");
}

#[test]
fn test_bad_tracker_is_rejected() {
    assert!(matches!(
        TrackerList::parse(["ftp://bad"]),
        Err(ConfigError::InvalidTracker(_))
    ));
}

#[test]
fn test_bad_exponent_fails_before_reading() {
    let dir = tempfile::tempdir().unwrap();
    // The source does not exist: the exponent must be rejected first.
    let mut config = config(&dir.path().join("missing"), &["http://t/announce"]);
    config.piece_size_exponent = Some(27);
    config.output = Some(dir.path().join("x.torrent"));

    let err = make_torrent(&config, |_, _| {}).unwrap_err();
    assert!(matches!(
        err,
        MakeError::Config(ConfigError::PieceSizeOutOfRange(27))
    ));
    assert!(!dir.path().join("x.torrent").exists());
}

#[test]
fn test_existing_output_is_kept_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("a.txt");
    fs::write(&file, b"hello").unwrap();
    let target = dir.path().join("a.torrent");
    fs::write(&target, b"keep me").unwrap();

    let mut config = config(&file, &["http://t/announce"]);
    config.output = Some(target.clone());

    let err = make_torrent(&config, |_, _| {}).unwrap_err();
    assert!(matches!(err, MakeError::Config(ConfigError::OutputExists(_))));
    assert_eq!(fs::read(&target).unwrap(), b"keep me");

    config.force = true;
    make_torrent(&config, |_, _| {}).unwrap();
    assert_eq!(decode(&target).info.name, "a.txt");
}

#[test]
fn test_same_input_same_output() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("src");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("x"), vec![7u8; 300_000]).unwrap();
    fs::write(root.join("y"), b"tail").unwrap();

    let mut first = config(&root, &["http://t/announce"]);
    first.output = Some(dir.path().join("1.torrent"));
    let mut second = first.clone();
    second.output = Some(dir.path().join("2.torrent"));

    make_torrent(&first, |_, _| {}).unwrap();
    make_torrent(&second, |_, _| {}).unwrap();
    assert_eq!(
        fs::read(dir.path().join("1.torrent")).unwrap(),
        fs::read(dir.path().join("2.torrent")).unwrap()
    );
}

#[test]
fn test_summary() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("a.txt");
    fs::write(&file, b"hello").unwrap();

    let mut config = config(&file, &["http://t/announce", "udp://u:1"]);
    config.output = Some(dir.path().join("a.torrent"));
    let created = make_torrent(&config, |_, _| {}).unwrap();

    let summary = serde_json::to_value(created.summary()).unwrap();
    assert_eq!(summary["name"], "a.txt");
    assert_eq!(summary["piece_count"], 1);
    assert_eq!(summary["total_size"], 5);
    assert_eq!(summary["trackers"][1], "udp://u:1");
    assert_eq!(summary["files"][0]["path"][0], "a.txt");
    assert_eq!(
        summary["info_hash"],
        hex::encode(created.metainfo.info_hash())
    );
}
