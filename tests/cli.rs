use std::process::Command;

use mdmc::mdmc::MdmcFile;

fn midi2mdmc() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_midi2mdmc"));
    command.env_remove("RUST_LOG");
    command
}

/// Two notes a quarter note apart, format 0, 96 ticks per quarter note
fn tiny_song() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00, 0x01, 0x00, 0x60]);

    let body = [
        0x00, 0xFF, 0x03, 0x05, b'F', b'l', b'u', b't', b'e', // track name
        0x60, 0x90, 0x3C, 0x64, // note on, then 96 ticks
        0x00, 0x90, 0x3E, 0x64, // note on
        0x00, 0xFF, 0x2F, 0x00, // end of track
    ];
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&body);
    bytes
}

#[test]
fn missing_output_is_a_usage_error() {
    let output = midi2mdmc().arg("song.mid").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage:"), "{stderr}");
    assert!(stderr.contains("<midi-in-file> <mdmc-out-file>"), "{stderr}");
}

#[test]
fn converts_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("song.mid");
    let output_path = dir.path().join("song.mdmc");
    std::fs::write(&input, tiny_song()).unwrap();

    let output = midi2mdmc().arg(&input).arg(&output_path).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Duration: 500 Speed: 1x"), "{stderr}");

    let written = std::fs::read(&output_path).unwrap();
    let file = MdmcFile::parse(&written).unwrap();
    assert_eq!(file.duration_millis(), 500);
    assert_eq!(file.notes().len(), 2);
    assert_eq!(written.len(), 4 * 2 + 12);
}

#[test]
fn failed_conversion_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.mid");
    let output_path = dir.path().join("broken.mdmc");
    std::fs::write(&input, b"MThd").unwrap();

    let output = midi2mdmc().arg(&input).arg(&output_path).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(!output_path.exists());
}
