use std::{
    env,
    fs,
    path::{Path, PathBuf},
    process::Command,
};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

fn norm_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "")
}

fn fresh_dir(tag: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("chord_cli_{tag}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn assert_png(path: &Path) {
    let bytes = fs::read(path).unwrap();
    assert!(bytes.len() > PNG_SIGNATURE.len());
    assert_eq!(bytes[..8], PNG_SIGNATURE);

    let img = image::open(path).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (500, 600));
}

#[test]
fn default_output_is_chord_name_in_current_dir() {
    let exe = env!("CARGO_BIN_EXE_chord_cli");
    let dir = fresh_dir("default_output");

    let out = Command::new(exe)
        .current_dir(&dir)
        .arg("Em7")
        .output()
        .unwrap();

    assert!(out.status.success());
    assert_png(&dir.join("Em7.png"));

    let stdout = norm_newlines(&String::from_utf8_lossy(&out.stdout));
    assert!(stdout.contains("Saved diagram for Em7 to Em7.png"));
}

#[test]
fn every_listed_chord_renders_to_default_path() {
    let exe = env!("CARGO_BIN_EXE_chord_cli");
    let dir = fresh_dir("every_chord");

    let list = Command::new(exe).arg("--list").output().unwrap();
    assert!(list.status.success());
    let names = norm_newlines(&String::from_utf8_lossy(&list.stdout));
    let names: Vec<&str> = names.lines().filter(|l| !l.is_empty()).collect();
    assert!(names.contains(&"C"));
    assert!(names.contains(&"Cmaj7"));

    for name in names {
        let out = Command::new(exe).current_dir(&dir).arg(name).output().unwrap();
        assert!(out.status.success(), "{name} failed");
        assert!(fs::metadata(dir.join(format!("{name}.png"))).unwrap().len() > 0);
    }
}

#[test]
fn explicit_output_path_is_used_exactly() {
    let exe = env!("CARGO_BIN_EXE_chord_cli");
    let dir = fresh_dir("explicit_output");
    fs::create_dir_all(dir.join("out")).unwrap();
    let output_path = dir.join("out").join("c7.png");

    let out = Command::new(exe)
        .current_dir(&dir)
        .args(["Cmaj7", "--output", output_path.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(out.status.success());
    assert_png(&output_path);
    assert!(!dir.join("Cmaj7.png").exists());
}

#[test]
fn running_twice_overwrites_output() {
    let exe = env!("CARGO_BIN_EXE_chord_cli");
    let dir = fresh_dir("overwrite");
    let output_path = dir.join("chord.png");
    fs::write(&output_path, b"not a png").unwrap();

    for chord in ["G", "C"] {
        let out = Command::new(exe)
            .args([chord, "-o", output_path.to_str().unwrap()])
            .output()
            .unwrap();
        assert!(out.status.success());
    }

    assert_png(&output_path);
    let entries = fs::read_dir(&dir).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn chord_name_is_trimmed() {
    let exe = env!("CARGO_BIN_EXE_chord_cli");
    let dir = fresh_dir("trimmed");

    let out = Command::new(exe)
        .current_dir(&dir)
        .arg("  D#m ")
        .output()
        .unwrap();

    assert!(out.status.success());
    assert_png(&dir.join("D#m.png"));
}

#[test]
fn unknown_chord_is_e1001_and_writes_nothing() {
    let exe = env!("CARGO_BIN_EXE_chord_cli");
    let dir = fresh_dir("unknown_chord");

    let out = Command::new(exe)
        .current_dir(&dir)
        .arg("Zx9")
        .output()
        .unwrap();

    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);

    let stderr = norm_newlines(&String::from_utf8_lossy(&out.stderr));
    assert!(stderr.contains("Error: chord lookup failed"));
    assert!(stderr.contains("Caused by:"));
    assert!(stderr.contains("E1001: unknown chord 'Zx9' (available: Bm7b5, C,"));
}

#[test]
fn output_write_failure_is_reported_stably() {
    let exe = env!("CARGO_BIN_EXE_chord_cli");
    let dir = fresh_dir("write_failure");

    // The parent is never created, so the OS error text varies; only the prefix is pinned.
    let output_path = dir.join("out").join("c7.png");

    let out = Command::new(exe)
        .args(["Cmaj7", "--output", output_path.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(1));
    assert!(!output_path.exists());

    let stderr = norm_newlines(&String::from_utf8_lossy(&out.stderr));
    assert!(stderr.contains("Error: failed to write:"));
    assert!(stderr.contains("c7.png"));
    assert!(stderr.contains("Caused by:"));
    assert!(stderr.contains("E4001: failed to write PNG"));
}

#[test]
fn library_file_adds_chords() {
    let exe = env!("CARGO_BIN_EXE_chord_cli");
    let dir = fresh_dir("library");
    let library = dir.join("chords.json");
    fs::write(
        &library,
        r#"{ "Asus2": { "frets": [-1, 0, 2, 2, 0, 0], "fingers": [0, 0, 1, 2, 0, 0] } }"#,
    )
    .unwrap();

    let out = Command::new(exe)
        .current_dir(&dir)
        .args(["Asus2", "--library", library.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(out.status.success());
    assert_png(&dir.join("Asus2.png"));
}

#[test]
fn invalid_library_is_reported_with_code() {
    let exe = env!("CARGO_BIN_EXE_chord_cli");
    let dir = fresh_dir("bad_library");
    let library = dir.join("chords.json");
    fs::write(&library, r#"{ "Bad": { "frets": [0, 0, 0] } }"#).unwrap();

    let out = Command::new(exe)
        .current_dir(&dir)
        .args(["C", "--library", library.to_str().unwrap()])
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(!dir.join("C.png").exists());

    let stderr = norm_newlines(&String::from_utf8_lossy(&out.stderr));
    assert!(stderr.contains("Error: failed to load chord library:"));
    assert!(stderr.contains("E2003:"));
}

#[test]
fn missing_chord_argument_is_a_usage_error() {
    let exe = env!("CARGO_BIN_EXE_chord_cli");

    let out = Command::new(exe).output().unwrap();

    assert!(!out.status.success());
    let stderr = norm_newlines(&String::from_utf8_lossy(&out.stderr));
    assert!(stderr.contains("CHORD"));
}

#[test]
fn help_mentions_output_flag() {
    let exe = env!("CARGO_BIN_EXE_chord_cli");

    let output = Command::new(exe).arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&output.stdout));

    // clap's wording can drift between versions; only check the flag is there.
    assert!(stdout.contains("--output"));
}

#[test]
fn library_chord_name_with_path_separator_is_rejected() {
    let exe = env!("CARGO_BIN_EXE_chord_cli");
    let dir = fresh_dir("slash_name");
    let library = dir.join("chords.json");
    fs::write(&library, r#"{ "C/G": { "frets": [3, 3, 2, 0, 1, 0] } }"#).unwrap();

    let out = Command::new(exe)
        .current_dir(&dir)
        .args(["C/G", "--library", library.to_str().unwrap()])
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(!dir.join("C").exists());

    let stderr = norm_newlines(&String::from_utf8_lossy(&out.stderr));
    assert!(stderr.contains("Error: failed to load chord library:"));
    assert!(stderr.contains("E2003: chord name 'C/G' must not contain a path separator"));
}
