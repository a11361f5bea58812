mod classifier;
mod config;
mod driver;
mod error;
mod extract;
mod models;
mod navigator;
mod scraper;
mod server;

use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use config::{ScrapeConfig, ServerConfig};
use driver::chromium::ChromiumLauncher;
use models::{Query, ResultSet};
use scraper::Scraper;

#[derive(Parser)]
#[command(
    name = "reno_radar",
    about = "Find renovation leads in TikTok comments"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the scrape API over HTTP
    Serve {
        #[arg(short, long, env = "PORT", default_value = "3001")]
        port: u16,
        /// Allowed CORS origins (default: any)
        #[arg(long = "cors-origin", env = "CORS_ORIGINS", value_delimiter = ',')]
        cors_origins: Vec<String>,
    },
    /// Run one query and print ranked comments
    Scrape {
        query: String,
        /// Max videos to visit
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Score a single comment
    Classify { text: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut scrape_config = ScrapeConfig::from_env();

    let result = match cli.command {
        Commands::Serve { port, cors_origins } => {
            let scraper = Scraper::new(Arc::new(ChromiumLauncher), Arc::new(scrape_config));
            let server_config = ServerConfig { port, cors_origins };
            server::run_server(Arc::new(scraper), &server_config).await
        }
        Commands::Scrape { query, limit } => {
            let query = Query::parse(&query)?;
            if let Some(n) = limit {
                scrape_config.max_items = n;
            }
            let scraper = Scraper::new(Arc::new(ChromiumLauncher), Arc::new(scrape_config));

            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
            );
            pb.set_message(format!("Scraping comments for '{}'...", query.as_str()));
            pb.enable_steady_tick(Duration::from_millis(120));
            let scraped = scraper.run(&query).await;
            pb.finish_and_clear();

            let results = scraped?;
            print_results(&results);
            Ok(())
        }
        Commands::Classify { text } => {
            let score = classifier::score_intent(&text);
            println!("Chrome:   {}", classifier::is_chrome_text(&text));
            println!("Handle:   {}", classifier::is_author_handle(&text));
            println!("Comment:  {}", classifier::is_plausible_comment(&text, true));
            println!("Intent:   {}", score.tier);
            if score.matched_terms.is_empty() {
                println!("Matched:  -");
            } else {
                println!("Matched:  {}", score.matched_terms.join(", "));
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn print_results(results: &ResultSet) {
    if results.records.is_empty() {
        println!("No comments found for '{}'.", results.query);
        return;
    }

    println!(
        "{:>3} | {:<6} | {:<20} | {:<48} | {:<24}",
        "#", "Intent", "User", "Comment", "Matched"
    );
    println!("{}", "-".repeat(112));

    for (i, r) in results.records.iter().enumerate() {
        println!(
            "{:>3} | {:<6} | {:<20} | {:<48} | {:<24}",
            i + 1,
            r.intent_tier,
            truncate(&r.record.author_name, 20),
            truncate(&r.record.comment_text, 48),
            truncate(&r.matched_terms.join(", "), 24),
        );
    }

    // Source videos listed once, in the order they first produced a lead
    let mut videos: Vec<&str> = Vec::new();
    for r in &results.records {
        if !videos.contains(&r.record.source_item_url.as_str()) {
            videos.push(&r.record.source_item_url);
        }
    }
    println!("\n--- Videos ---");
    for v in &videos {
        println!("  {}", v);
    }

    println!(
        "\n{} comments for '{}' across {} videos",
        results.total(),
        results.query,
        videos.len()
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer comment", 10), "a much ...");
        assert_eq!(truncate("🌹🌹🌹🌹🌹🌹", 5), "🌹🌹...");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.5s");
        assert_eq!(format_duration(Duration::from_secs(75)), "1m 15s");
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["reno_radar", "scrape", "kitchen remodel", "-n", "2"]).unwrap();
        match cli.command {
            Commands::Scrape { query, limit } => {
                assert_eq!(query, "kitchen remodel");
                assert_eq!(limit, Some(2));
            }
            _ => panic!("expected scrape"),
        }

        let cli = Cli::try_parse_from([
            "reno_radar",
            "serve",
            "--port",
            "8080",
            "--cors-origin",
            "http://a.test,http://b.test",
        ])
        .unwrap();
        match cli.command {
            Commands::Serve { port, cors_origins } => {
                assert_eq!(port, 8080);
                assert_eq!(cors_origins, vec!["http://a.test", "http://b.test"]);
            }
            _ => panic!("expected serve"),
        }
    }
}
