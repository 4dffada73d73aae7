use std::env;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use wordnet_dict::Dictionary;
use wordnet_morphy::WordnetStemmer;
use wordnet_types::Pos;

fn usage() -> ! {
    eprintln!("usage: cargo run -p wordnet-morphy --example lookup -- <dict-dir> [--demo | <word>]");
    process::exit(2);
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info")).unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter.max_level_hint().and_then(|hint| hint.into_level()).unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_env_filter(env_filter).with_target(false).with_level(true).with_max_level(max_level).init();
}

fn main() {
    init_tracing();

    let mut args = env::args().skip(1);
    let dict_dir: PathBuf = match args.next() {
        Some(dir) => dir.into(),
        None => usage(),
    };

    let demo_words: Vec<String> = match args.next() {
        Some(arg) if arg == "--demo" => {
            vec!["running".into(), "better".into(), "children".into(), "dogs".into(), "happiest".into()]
        }
        Some(arg) => vec![arg],
        None => usage(),
    };
    if args.next().is_some() {
        usage();
    }

    info!("loading dictionary at {}", dict_dir.display());
    let start = Instant::now();
    let dict = Dictionary::open(dict_dir.clone())
        .unwrap_or_else(|e| panic!("loading dictionary from {}: {e}", dict_dir.display()));
    info!("dictionary opened in {} ms", start.elapsed().as_millis());
    let stemmer = WordnetStemmer::new(&dict);

    println!("Dictionary: {}", dict_dir.display());

    for word in demo_words {
        println!("\nSurface: {word}");
        for pos in Pos::ALL {
            let stems = stemmer.find_stems(&word, pos).unwrap_or_else(|e| panic!("find_stems: {e}"));
            if stems.is_empty() {
                continue;
            }
            println!("  {pos:?}:");
            for stem in stems {
                println!("    {stem}");
            }
        }
    }
}
