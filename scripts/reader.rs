//! Command-line news reader on top of the gateway and the favorites store.
//!
//! Fetches through whichever transport the configured mode selects and keeps
//! favorites in the same `news-storage.json` record the store always uses.
//!
//! Run with: cargo run --bin newsflow-reader -- <command>
//! Examples:
//!   cargo run --bin newsflow-reader -- headlines technology
//!   cargo run --bin newsflow-reader -- search rust language
//!   cargo run --bin newsflow-reader -- toggle 3 business
//!   cargo run --bin newsflow-reader -- favorites

use newsflow::config::Settings;
use newsflow::feed::Feed;
use newsflow::gateway::NewsGateway;
use newsflow::store::{JsonFileStorage, NewsStore};
use newsflow::types::{Article, Category};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::new()?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::NONE)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&settings.logging.level))
        .with(fmt_layer)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let client = reqwest::Client::builder()
        .user_agent(settings.upstream.user_agent.as_str())
        .build()?;
    let gateway = NewsGateway::from_settings(&settings, client);
    let mut store = NewsStore::open(JsonFileStorage::new(&settings.storage.dir));
    let mut feed = Feed::new();

    match args[1].as_str() {
        "headlines" => {
            store.set_selected_category(parse_category(args.get(2))?);
            feed.refresh(&mut store, &gateway).await;
            print_listing(&store, store.articles());
        }
        "search" => {
            let query = args[2..].join(" ");
            let query = query.trim();
            if query.is_empty() {
                anyhow::bail!("search needs a query");
            }
            store.set_search_query(query);
            feed.refresh(&mut store, &gateway).await;
            print_listing(&store, store.articles());
        }
        "favorites" => {
            if store.favorites().is_empty() {
                println!("No saved articles yet.");
            }
            print_listing(&store, store.favorites());
        }
        "toggle" => {
            let index: usize = args
                .get(2)
                .and_then(|n| n.parse().ok())
                .filter(|n| *n > 0)
                .ok_or_else(|| anyhow::anyhow!("toggle needs a 1-based article number"))?;

            store.set_selected_category(parse_category(args.get(3))?);
            feed.refresh(&mut store, &gateway).await;
            if let Some(error) = store.error() {
                anyhow::bail!("{error}");
            }

            let article = store
                .articles()
                .get(index - 1)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("only {} articles listed", store.articles().len()))?;

            let title = article.title.clone();
            if store.toggle_favorite(article) {
                println!("Saved: {title}");
            } else {
                println!("Removed: {title}");
            }
        }
        "unsave" => {
            let url = args.get(2).ok_or_else(|| anyhow::anyhow!("unsave needs a url"))?;
            if !store.is_favorite(url) {
                println!("Not in favorites: {url}");
            }
            store.remove_favorite(url);
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn parse_category(arg: Option<&String>) -> anyhow::Result<Category> {
    match arg {
        None => Ok(Category::default()),
        Some(slug) => Category::from_slug(slug).ok_or_else(|| {
            let known: Vec<&str> = Category::ALL.iter().map(|c| c.slug()).collect();
            anyhow::anyhow!("unknown category '{slug}', expected one of: {}", known.join(", "))
        }),
    }
}

fn print_listing(store: &NewsStore, articles: &[Article]) {
    if let Some(error) = store.error() {
        eprintln!("Unable to load news: {error}");
        return;
    }

    let heading = if store.is_search_mode() {
        format!("Results: \"{}\"", store.search_query())
    } else {
        store.selected_category().label().to_string()
    };
    println!("{heading} ({} articles)\n", articles.len());

    for (i, article) in articles.iter().enumerate() {
        let marker = if store.is_favorite(&article.url) { "♥" } else { " " };
        let date = article
            .published_at()
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();

        println!("{:>3}. {marker} {}", i + 1, article.title);
        println!("       {} · {date}", article.source.name);
        println!("       {}", article.url);
    }
}

fn print_usage(bin: &str) {
    eprintln!("Usage: {bin} <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  headlines [category]     top headlines (default: general)");
    eprintln!("  search <query>           newest articles matching the query");
    eprintln!("  favorites                saved articles");
    eprintln!("  toggle <n> [category]    save or remove the n-th headline");
    eprintln!("  unsave <url>             remove a saved article");
    eprintln!();
    let known: Vec<&str> = Category::ALL.iter().map(|c| c.slug()).collect();
    eprintln!("Categories: {}", known.join(", "));
}
