//! End-to-end tests against a synthetic WordNet-shaped directory, plus an
//! optional integration test against a real dictionary tree pointed to by
//! `WORDNET_DIR`.

use std::fs;
use std::io::Write;
use std::path::Path;

use wordnet_db::{ContentTypeKey, FileProvider, LoadPolicy};

fn write_file(dir: &Path, name: &str, contents: &str) {
    let mut file = fs::File::create(dir.join(name)).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
}

fn seed_fixture(dir: &Path) {
    write_file(
        dir,
        "index.noun",
        "  1 This file was generated for a fixture\n\
         ant n 1 0 0 1 1 00000042\n\
         dog n 1 0 0 1 1 00000154\n",
    );
    // Leading offsets below are the line's own byte position within this
    // file (header included), matching what a direct-access lookup expects.
    write_file(
        dir,
        "data.noun",
        "  1 This file was generated for a fixture\n\
         00000042 03 n 01 ant 0 001 @ 00000104 n 0000 | a small insect\n\
         00000104 03 n 01 insect 0 000 | a small arthropod\n\
         00000154 03 n 01 dog 0 000 | a domesticated canine\n",
    );
    write_file(dir, "noun.exc", "ants ant\n");
    write_file(
        dir,
        "index.sense",
        "ant%1:05:00:: 00000042 1 0\ndog%1:05:00:: 00000154 1 0\n",
    );
}

#[test]
fn opens_a_fixture_directory_and_resolves_lookups() {
    let dir = tempfile::tempdir().unwrap();
    seed_fixture(dir.path());

    let provider = FileProvider::new(dir.path());
    provider.open().unwrap();

    let index = provider.source(ContentTypeKey::IndexNoun).unwrap();
    let line = index.lookup("dog").unwrap().unwrap();
    assert!(line.starts_with("dog "));

    let data = provider.source(ContentTypeKey::DataNoun).unwrap();
    let line = data.lookup("00000104").unwrap().unwrap();
    assert!(line.contains("insect"));

    let exceptions = provider.source(ContentTypeKey::ExceptionNoun).unwrap();
    assert!(exceptions.lookup("ants").unwrap().is_some());

    let senses = provider.source(ContentTypeKey::Sense).unwrap();
    assert!(senses.lookup("dog%1:05:00::").unwrap().is_some());

    provider.close();
}

#[test]
fn immediate_load_policy_marks_sources_loaded_before_returning() {
    let dir = tempfile::tempdir().unwrap();
    seed_fixture(dir.path());

    let provider = FileProvider::new(dir.path());
    provider.set_load_policy(LoadPolicy::ImmediateLoad).unwrap();
    provider.open().unwrap();

    let data = provider.source(ContentTypeKey::DataNoun).unwrap();
    assert!(data.is_loaded());
    assert!(data.lookup("00000154").unwrap().is_some());

    provider.close();
}

/// Exercises the same flow against a real Princeton WordNet dictionary
/// directory, when one is available. Skips (rather than failing) when
/// `WORDNET_DIR` is unset, since the dictionary files aren't redistributable
/// as part of this repository.
#[test]
#[ignore]
fn opens_a_real_wordnet_directory() {
    let Ok(dir) = std::env::var("WORDNET_DIR") else {
        eprintln!("WORDNET_DIR not set, skipping");
        return;
    };

    let provider = FileProvider::new(&dir);
    provider.open().unwrap();

    let index = provider.source(ContentTypeKey::IndexNoun).unwrap();
    assert!(index.lookup("dog").unwrap().is_some());

    println!("dictionary version: {:?}", provider.version());
    provider.close();
}
