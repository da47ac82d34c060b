// Archiver file-naming and move/copy semantics.

use std::path::PathBuf;
use uuid::Uuid;

use medivox_core::doctor::archive::Archiver;

struct Scratch {
    media_dir: PathBuf,
    output_dir: PathBuf,
}

impl Scratch {
    fn new() -> Self {
        let root = std::env::temp_dir().join(format!("medivox_arch_{}", Uuid::new_v4()));
        let scratch = Self {
            media_dir: root.join("media"),
            output_dir: root.join("doctor_responses"),
        };
        std::fs::create_dir_all(&scratch.media_dir).unwrap();
        std::fs::create_dir_all(&scratch.output_dir).unwrap();
        scratch
    }

    fn archiver(&self) -> Archiver {
        Archiver::new(&self.output_dir)
    }

    fn audio_file(&self, name: &str) -> PathBuf {
        let path = self.media_dir.join(name);
        std::fs::write(&path, b"fake mp3 bytes").unwrap();
        path
    }

    fn archived_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.output_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

#[test]
fn distinct_stamps_produce_distinct_pairs() {
    let scratch = Scratch::new();
    let archiver = scratch.archiver();

    let first_audio = scratch.audio_file("consult_a.mp3");
    let second_audio = scratch.audio_file("consult_b.mp3");

    archiver
        .archive_as("20250101_101010", "first response", &first_audio)
        .unwrap();
    archiver
        .archive_as("20250101_101011", "second response", &second_audio)
        .unwrap();

    assert_eq!(
        scratch.archived_files(),
        vec![
            "doctor_response_20250101_101010.txt",
            "doctor_response_20250101_101011.txt",
            "doctor_voice_20250101_101010.mp3",
            "doctor_voice_20250101_101011.mp3",
        ]
    );
}

#[test]
fn same_stamp_overwrites_silently() {
    let scratch = Scratch::new();
    let archiver = scratch.archiver();

    let first_audio = scratch.audio_file("consult_a.mp3");
    let second_audio = scratch.audio_file("consult_b.mp3");

    archiver
        .archive_as("20250101_101010", "first response", &first_audio)
        .unwrap();
    archiver
        .archive_as("20250101_101010", "second response", &second_audio)
        .unwrap();

    // One pair remains and the later write won
    let files = scratch.archived_files();
    assert_eq!(files.len(), 2);
    let stored = std::fs::read_to_string(
        scratch
            .output_dir
            .join("doctor_response_20250101_101010.txt"),
    )
    .unwrap();
    assert_eq!(stored, "second response");
}

#[test]
fn missing_audio_is_a_noop_on_audio() {
    let scratch = Scratch::new();
    let archiver = scratch.archiver();

    let ghost = scratch.media_dir.join("never_written.mp3");
    let returned = archiver
        .archive_as("20250101_101010", "text only", &ghost)
        .unwrap();

    // Audio path comes back unchanged; the text is still archived
    assert_eq!(returned, ghost);
    assert_eq!(
        scratch.archived_files(),
        vec!["doctor_response_20250101_101010.txt"]
    );
}

#[test]
fn archived_text_round_trips_byte_for_byte() {
    let scratch = Scratch::new();
    let archiver = scratch.archiver();

    let text = "Wysypka wygląda alergicznie.\nRecommend: антигистамин — twice daily.\n";
    let ghost = scratch.media_dir.join("none.mp3");
    archiver.archive_as("20250101_101010", text, &ghost).unwrap();

    let stored = std::fs::read(
        scratch
            .output_dir
            .join("doctor_response_20250101_101010.txt"),
    )
    .unwrap();
    assert_eq!(stored, text.as_bytes());
}

#[test]
fn audio_move_empties_the_source() {
    let scratch = Scratch::new();
    let archiver = scratch.archiver();

    let audio = scratch.audio_file("consult_a.mp3");
    let moved = archiver
        .archive_as("20250101_101010", "response", &audio)
        .unwrap();

    assert!(!audio.exists());
    assert!(moved.exists());
    assert!(moved.starts_with(&scratch.output_dir));
}

#[test]
fn download_copy_keeps_the_original_playable() {
    let scratch = Scratch::new();
    let archiver = scratch.archiver();

    let audio = scratch.audio_file("consult_a.mp3");
    let copy = archiver.save_audio_copy(&audio).unwrap();

    assert!(audio.exists());
    assert!(copy.exists());
    assert_eq!(
        std::fs::read(&audio).unwrap(),
        std::fs::read(&copy).unwrap()
    );
}

#[test]
fn saved_text_lands_in_the_archive_dir() {
    let scratch = Scratch::new();
    let archiver = scratch.archiver();

    let path = archiver.save_text("take-home summary").unwrap();
    assert!(path.starts_with(&scratch.output_dir));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "take-home summary");
}
