use anyhow::Result;
use ingredient_scanner::config::AppConfig;
use ingredient_scanner::default_groups::load_default_groups_config;
use ingredient_scanner::group_store::GroupStore;
use ingredient_scanner::observability;
use ingredient_scanner::scanner::Scanner;
use ingredient_scanner::{GroupId, WordStats};
use serde::Serialize;
use std::env;
use std::fs;
use std::io::Read;
use tracing::info;

/// Command-line arguments
#[derive(Debug, Default)]
struct Args {
    /// Token index to report word statistics for
    detail: Option<usize>,
    /// Input file; stdin when absent
    path: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut iter = env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--detail" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--detail requires a token index"))?;
                args.detail = Some(
                    value
                        .parse()
                        .map_err(|_| anyhow::anyhow!("--detail must be a valid number, got '{}'", value))?,
                );
            }
            "-h" | "--help" => {
                println!("Usage: ingredient-scanner [--detail N] [FILE]");
                std::process::exit(0);
            }
            _ if args.path.is_none() => args.path = Some(arg),
            _ => return Err(anyhow::anyhow!("Unexpected argument '{}'", arg)),
        }
    }

    Ok(args)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read '{}': {}", path, e)),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn group_name<'a>(store: &'a GroupStore, id: &'a GroupId) -> &'a str {
    store.get(id).map_or(id.as_str(), |g| g.name.as_str())
}

#[derive(Serialize)]
struct FlaggedIngredient<'a> {
    text: &'a str,
    phrase: &'a str,
    groups: Vec<&'a str>,
    tokens: (usize, usize),
}

#[derive(Serialize)]
struct Report<'a> {
    token_count: usize,
    flagged: Vec<FlaggedIngredient<'a>>,
    group_counts: Vec<(String, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<WordStats>,
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    config.validate()?;
    observability::init_tracing(&config.logging)?;
    info!("{}", config.summary());

    let args = parse_args()?;
    let text = read_input(args.path.as_deref())?;

    let seeds = load_default_groups_config(config.default_groups_path.as_deref());
    let store = GroupStore::from_seeds(config.engine.clone(), &seeds)?;
    let index = store.build_index();
    let result = Scanner::new(config.engine.clone()).scan_with_index(&text, &index);

    let report = Report {
        token_count: result.tokens.len(),
        flagged: result
            .matches
            .iter()
            .map(|m| FlaggedIngredient {
                text: &m.surface,
                phrase: &m.phrase,
                groups: m.groups.iter().map(|id| group_name(&store, id)).collect(),
                tokens: (m.start, m.end),
            })
            .collect(),
        group_counts: result
            .group_counts()
            .iter()
            .map(|(id, count)| (group_name(&store, id).to_string(), *count))
            .collect(),
        detail: args.detail.and_then(|i| result.token_detail(i)),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
