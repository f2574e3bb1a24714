//! Run one view against TMDB and print its final state as JSON.
//! Usage:
//!   cargo run --bin query_props -- home
//!   cargo run --bin query_props -- category <trending|top-rated|upcoming> [page]
//!   cargo run --bin query_props -- search <text> [year] [industry]
//!   cargo run --bin query_props -- movie <tmdb_id>
//!   cargo run --bin query_props -- options <language|region|genre|year>
//!   cargo run --bin query_props -- discover <language|region|genre|year> <code>
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use moviescope::catalog::Catalog;
use moviescope::models::FacetKind;
use moviescope::query::{Category, FacetSelection, SearchFilters};
use moviescope::session::{self, DiscoverSession, SearchSession};
use moviescope::tmdb::TmdbClient;
use serde_json::Value;
use std::env;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    Home,
    Category,
    Search,
    Movie,
    Options,
    Discover,
}

impl FromStr for Command {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "home" => Ok(Command::Home),
            "category" => Ok(Command::Category),
            "search" => Ok(Command::Search),
            "movie" => Ok(Command::Movie),
            "options" => Ok(Command::Options),
            "discover" => Ok(Command::Discover),
            _ => Err(anyhow!(
                "command must be one of home, category, search, movie, options, discover"
            )),
        }
    }
}

fn arg(args: &[String], idx: usize, name: &str) -> Result<String> {
    args.get(idx)
        .cloned()
        .ok_or_else(|| anyhow!("missing argument <{}>", name))
}

fn facet(raw: &str) -> Result<FacetKind> {
    FacetKind::parse(raw).ok_or_else(|| anyhow!("unknown facet type '{}'", raw))
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let args: Vec<String> = env::args().skip(1).collect();
    let command: Command = arg(&args, 0, "command")?.parse()?;
    let catalog = Catalog::new(Arc::new(TmdbClient::from_env()?));

    let output: Value = match command {
        Command::Home => serde_json::to_value(session::load_landing(&catalog).await.into_state())?,
        Command::Category => {
            let slug = arg(&args, 1, "category")?;
            let category =
                Category::parse(&slug).ok_or_else(|| anyhow!("unknown category '{}'", slug))?;
            let page = match args.get(2) {
                Some(p) => p.parse().context("page must be a number")?,
                None => 1,
            };
            serde_json::to_value(
                session::load_category(&catalog, category, page)
                    .await
                    .into_state(),
            )?
        }
        Command::Search => {
            let text = arg(&args, 1, "text")?;
            let year = match args.get(2) {
                Some(y) => Some(y.parse::<i32>().context("year must be a number")?),
                None => None,
            };
            let filters = SearchFilters {
                language: None,
                year,
                industry: args.get(3).cloned(),
            };
            let mut search = SearchSession::new(&text, filters);
            search.load(&catalog, 1).await;
            serde_json::to_value(search.into_state())?
        }
        Command::Movie => {
            let id: u64 = arg(&args, 1, "tmdb_id")?
                .parse()
                .context("tmdb_id must be a number")?;
            serde_json::to_value(session::load_detail(&catalog, id).await.into_state())?
        }
        Command::Options => {
            let mut discover = DiscoverSession::new(facet(&arg(&args, 1, "type")?)?);
            discover.load_options(&catalog).await;
            serde_json::to_value(discover.options())?
        }
        Command::Discover => {
            let kind = facet(&arg(&args, 1, "type")?)?;
            let selection =
                FacetSelection::new(kind, &arg(&args, 2, "code")?).map_err(|e| anyhow!(e))?;
            let mut discover = DiscoverSession::new(kind);
            discover.select(&catalog, selection, 1).await;
            serde_json::to_value(discover.movies())?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
