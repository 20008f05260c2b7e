use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use studio_core::config::{Config, Settings};
use studio_core::library::{load_cards, load_materials, load_topic};
use studio_core::traits::Ranker;
use studio_core::types::{Dynasty, Match, MatchReason, Query};
use studio_match::{filter_cards, filter_materials, CardRanker, DomainTables, MaterialRanker, QueryProfile};

// The comparison view suggests a few more materials than cards.
const SUGGEST_MATERIAL_LIMIT: usize = 8;

#[derive(Debug, Parser)]
#[command(name = "studio")]
#[command(about = "Match hot topics against a library of historical materials and comparison cards")]
struct Cli {
    /// Configuration environment (defaults to RUST_ENV, then "dev")
    #[arg(long, global = true)]
    config_env: Option<String>,

    /// Materials file or directory, overriding data.materials_path
    #[arg(long, global = true)]
    materials: Option<PathBuf>,

    /// Comparison cards file or directory, overriding data.cards_path
    #[arg(long, global = true)]
    cards: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank library materials against a query
    Materials(MatchArgs),
    /// Rank comparison cards against a query
    Cards(MatchArgs),
    /// Suggest cards and materials for one topic title
    Suggest(QueryArgs),
    /// Show the tokens, dimensions and eras extracted from a query
    Profile(QueryArgs),
    /// Plain keyword filter without ranking
    Filter {
        #[command(subcommand)]
        target: FilterCommand,
    },
}

#[derive(Debug, Args)]
struct QueryArgs {
    /// Free-text query
    query: Option<String>,

    /// JSON file holding one hot topic, used instead of QUERY
    #[arg(long, conflicts_with = "query")]
    topic: Option<PathBuf>,
}

impl QueryArgs {
    fn resolve(&self) -> Result<Query> {
        match (&self.topic, &self.query) {
            (Some(path), _) => {
                let topic = load_topic(path).with_context(|| format!("reading topic {}", path.display()))?;
                if let Some(platform) = topic.platform() {
                    tracing::debug!(platform = platform.display_name(), "topic platform");
                }
                Ok(Query::Topic(topic))
            }
            (None, Some(text)) => Ok(Query::Text(text.clone())),
            (None, None) => bail!("either QUERY or --topic is required"),
        }
    }
}

#[derive(Debug, Args)]
struct MatchArgs {
    #[command(flatten)]
    input: QueryArgs,

    /// Maximum number of results (defaults from match.* settings)
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Debug, Subcommand)]
enum FilterCommand {
    Materials {
        #[arg(default_value = "")]
        query: String,
        /// Keep only materials tagged with this era, e.g. 宋元
        #[arg(long)]
        dynasty: Option<Dynasty>,
    },
    Cards {
        #[arg(default_value = "")]
        query: String,
    },
}

struct App {
    config: Config,
    settings: Settings,
    materials: Option<PathBuf>,
    cards: Option<PathBuf>,
    json: bool,
}

impl App {
    fn materials_path(&self) -> Result<PathBuf> {
        match &self.materials {
            Some(p) => Ok(p.clone()),
            None => self.config.materials_path(),
        }
    }

    fn cards_path(&self) -> Result<PathBuf> {
        match &self.cards {
            Some(p) => Ok(p.clone()),
            None => self.config.cards_path(),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Config::load_env(cli.config_env.as_deref()).map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let settings = config.settings()?;
    let ctx = App { config, settings, materials: cli.materials, cards: cli.cards, json: cli.json };

    match cli.command {
        Command::Materials(args) => {
            let query = args.input.resolve()?;
            let materials = load_materials(&ctx.materials_path()?)?;
            let ranker = MaterialRanker::default().with_default_limit(ctx.settings.matching.material_limit);
            let matches = ranker.rank(&query, &materials, args.limit);
            emit(&ctx, &matches, || print_matches("materials", &matches, |m| format!("{} [{}·{}]", m.title, m.source_type, m.credibility)))?;
        }
        Command::Cards(args) => {
            let query = args.input.resolve()?;
            let cards = load_cards(&ctx.cards_path()?)?;
            let ranker = CardRanker::default().with_default_limit(ctx.settings.matching.card_limit);
            let matches = ranker.rank(&query, &cards, args.limit);
            emit(&ctx, &matches, || print_matches("cards", &matches, |c| format!("{} → {}", c.topic_title, c.event_title)))?;
        }
        Command::Suggest(args) => {
            let query = args.resolve()?;
            let materials = load_materials(&ctx.materials_path()?)?;
            let cards = load_cards(&ctx.cards_path()?)?;
            let profile = QueryProfile::extract(&query, DomainTables::standard());
            let card_matches = CardRanker::default().rank_profile(&profile, &cards, ctx.settings.matching.card_limit);
            let material_matches = MaterialRanker::default().rank_profile(&profile, &materials, SUGGEST_MATERIAL_LIMIT);
            let payload = serde_json::json!({ "cards": card_matches, "materials": material_matches });
            emit(&ctx, &payload, || {
                print_matches("cards", &card_matches, |c| format!("{} → {}", c.topic_title, c.event_title));
                println!();
                print_matches("materials", &material_matches, |m| m.title.clone());
            })?;
        }
        Command::Profile(args) => {
            let query = args.resolve()?;
            let profile = QueryProfile::extract(&query, DomainTables::standard());
            emit(&ctx, &profile, || {
                println!("tokens:     {}", profile.tokens.join(" | "));
                println!("dimensions: {}", join_labels(&profile.dimensions));
                println!("dynasties:  {}", join_labels(&profile.dynasties));
            })?;
        }
        Command::Filter { target: FilterCommand::Materials { query, dynasty } } => {
            let materials = load_materials(&ctx.materials_path()?)?;
            let kept = filter_materials(&materials, &query, dynasty);
            emit(&ctx, &kept, || {
                println!("📚 {} of {} materials", kept.len(), materials.len());
                for m in &kept {
                    println!("  {}  {}", m.id, m.title);
                }
            })?;
        }
        Command::Filter { target: FilterCommand::Cards { query } } => {
            let cards = load_cards(&ctx.cards_path()?)?;
            let kept = filter_cards(&cards, &query);
            emit(&ctx, &kept, || {
                println!("🗂  {} of {} cards", kept.len(), cards.len());
                for c in &kept {
                    println!("  {}  {} → {}", c.id, c.topic_title, c.event_title);
                }
            })?;
        }
    }
    Ok(())
}

fn emit<T: Serialize + ?Sized>(ctx: &App, value: &T, text: impl FnOnce()) -> Result<()> {
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text();
    }
    Ok(())
}

fn join_labels<T: std::fmt::Display>(items: &[T]) -> String {
    if items.is_empty() {
        return "-".to_string();
    }
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

fn describe_reason(reason: &MatchReason) -> String {
    format!(
        "tokens: {}  dimensions: {}  eras: {}",
        join_labels(&reason.tokens),
        join_labels(&reason.dimensions),
        join_labels(&reason.dynasties)
    )
}

fn print_matches<R>(label: &str, matches: &[Match<'_, R>], describe: impl Fn(&R) -> String)
where
    R: HasId,
{
    println!("🔍 {} {}", matches.len(), label);
    for (i, m) in matches.iter().enumerate() {
        println!("\n  {}. score={:.1}  id={}  {}", i + 1, m.score, m.record.id(), describe(m.record));
        println!("     {}", describe_reason(&m.reason));
    }
}

trait HasId {
    fn id(&self) -> &str;
}

impl HasId for studio_core::types::Material {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasId for studio_core::types::CompareCard {
    fn id(&self) -> &str {
        &self.id
    }
}
