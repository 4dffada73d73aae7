use std::env;
use std::path::PathBuf;

use wordnet_dict::Dictionary;
use wordnet_morphy::WordnetStemmer;
use wordnet_types::Pos;

fn dict_dir() -> Option<PathBuf> {
    env::var("WORDNET_DIR").ok().map(PathBuf::from)
}

#[test]
fn resolves_demo_words_against_open_english_wordnet() {
    let Some(dir) = dict_dir() else {
        eprintln!("skipping: WORDNET_DIR not set");
        return;
    };
    let dict = Dictionary::open(dir).expect("open dictionary");
    let stemmer = WordnetStemmer::new(&dict);

    let running = stemmer.find_stems("running", Pos::Verb).unwrap();
    assert!(running.iter().any(|s| s == "run"));

    let children = stemmer.find_stems("children", Pos::Noun).unwrap();
    assert!(children.iter().any(|s| s == "child"));

    let better = stemmer.find_stems("better", Pos::Adj).unwrap();
    assert!(!better.is_empty());
}
