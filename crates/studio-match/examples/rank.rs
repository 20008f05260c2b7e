use std::env;
use std::path::{Path, PathBuf};

use studio_core::library::Library;
use studio_core::types::Query;

// Rank a JSON library against a query and print results.
// Usage:
//   cargo run -p studio-match --example rank -- "王安石 青苗法" \
//     [--materials data/materials.json] [--cards data/cards.json] [--limit 10]

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("Usage: cargo run -p studio-match --example rank -- <query> [--materials PATH] [--cards PATH] [--limit N]");
        std::process::exit(1);
    }
    let mut query = String::new();
    let mut materials_path: Option<PathBuf> = None;
    let mut cards_path: Option<PathBuf> = None;
    let mut limit: Option<usize> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--materials" | "--cards" | "--limit" if i + 1 >= args.len() => {
                eprintln!("{} requires a value", args[i]);
                std::process::exit(2);
            }
            "--materials" => { materials_path = Some(PathBuf::from(&args[i + 1])); i += 2; }
            "--cards" => { cards_path = Some(PathBuf::from(&args[i + 1])); i += 2; }
            "--limit" => { limit = args[i + 1].parse().ok(); i += 2; }
            s if s.starts_with("--") => {
                eprintln!("Unknown flag: {}", s);
                std::process::exit(2);
            }
            s => {
                if query.is_empty() { query = s.to_string(); }
                i += 1;
            }
        }
    }

    // Paths default to the workspace's data/ directory.
    let base = Path::new(env!("CARGO_MANIFEST_DIR")).ancestors().nth(2).unwrap_or(Path::new("."));
    let materials_path = materials_path.unwrap_or_else(|| base.join("data/materials.json"));
    let cards_path = cards_path.unwrap_or_else(|| base.join("data/cards.json"));
    let library = Library::load(&materials_path, &cards_path)?;

    println!("Query: {}\n", query);
    let q = Query::from(query);
    println!("Materials:");
    for (n, m) in studio_match::match_materials(&q, &library.materials, limit).iter().enumerate() {
        println!("{:>2}. score={:.1} id={} title={}\n    tokens: {:?}", n + 1, m.score, m.record.id, m.record.title, m.reason.tokens);
    }
    println!("\nCards:");
    for (n, c) in studio_match::match_compare_cards(&q, &library.cards, limit).iter().enumerate() {
        println!("{:>2}. score={:.1} id={} {} -> {}", n + 1, c.score, c.record.id, c.record.topic_title, c.record.event_title);
    }
    Ok(())
}
