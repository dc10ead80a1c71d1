// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (RUST_LOG, or --verbose for debug output)
// 3. Dispatch to the appropriate subcommand handler
// 4. Print the links as a table or as JSON
// 5. Exit with proper code (0 = links found, 1 = no links, 2 = error)
// =============================================================================

mod cli;

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use serde_json::{json, Value};

use cli::{Cli, Commands};
use link_harvester::fetch;
use link_harvester::links::links_to_json;
use link_harvester::service::WebSearchService;
use link_harvester::{get_matching_links, LinkArray};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = links found
//   Ok(1) = nothing found
//   Err = unexpected error
async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Extract { input, selector, title_selector, base_uri, json } => {
            handle_extract(&input, &selector, &title_selector, base_uri.as_deref(), json)
        }
        Commands::Fetch { urls, selector, title_selector, json } => {
            handle_fetch(&urls, &selector, &title_selector, json).await
        }
        Commands::Service { config, params } => handle_service(&config, params).await,
    }
}

// Handles the 'extract' subcommand
fn handle_extract(input: &str, selector: &str, title_selector: &str, base_uri: Option<&str>, json: bool) -> Result<i32> {
    let html = read_input(input)?;

    let links = get_matching_links(&html, selector, title_selector, base_uri)
        .ok_or_else(|| anyhow!("Failed to get html links for '{}'", selector))?;

    print_links(&links, json)?;

    Ok(exit_code_for(links.populated_count()))
}

// Handles the 'fetch' subcommand
async fn handle_fetch(urls: &[String], selector: &str, title_selector: &str, json: bool) -> Result<i32> {
    let client = fetch::build_client()?;
    let pages = fetch::fetch_pages(&client, urls).await;

    let mut found = 0;
    let mut pages_json = Vec::new();

    for (url, result) in pages {
        let html = match result {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to fetch {}: {:#}", url, e);
                continue;
            }
        };

        // The selector is the same for every page, so a bad one fails them all
        let links = get_matching_links(&html, selector, title_selector, Some(url.as_str()))
            .ok_or_else(|| anyhow!("Failed to get html links for '{}'", selector))?;

        found += links.populated_count();
        info!("{} link(s) found on {}", links.populated_count(), url);

        if json {
            pages_json.push(json!({ "page": url, "links": links_to_json(&links) }));
        } else {
            println!("\n📄 {}", url);
            print_table(&links);
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&Value::Array(pages_json))?);
    }

    Ok(exit_code_for(found))
}

// Handles the 'service' subcommand
async fn handle_service(config: &str, params: Vec<(String, String)>) -> Result<i32> {
    let service = WebSearchService::from_file(Path::new(config))?;
    info!("Running {}", service.name());
    if let Some(description) = service.description() {
        info!("   {}", description);
    }
    if let Some(info_uri) = service.info_uri() {
        info!("   More information: {}", info_uri);
    }
    for param in service.parameters() {
        debug!("   parameter '{}' (default: {:?})", param.name, param.default);
    }

    let client = fetch::build_client()?;
    let supplied: HashMap<String, String> = params.into_iter().collect();
    let job = service.run(&client, &supplied).await;

    println!("{}", serde_json::to_string_pretty(&job)?);

    if !job.is_success() {
        return Err(anyhow!(
            "{}: {}",
            service.name(),
            job.message.as_deref().unwrap_or("job did not succeed")
        ));
    }

    let found = job.results.as_ref().and_then(Value::as_array).map_or(0, Vec::len);
    Ok(exit_code_for(found))
}

// Reads HTML from a file, or from stdin for "-"
fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut html = String::new();
        std::io::stdin()
            .read_to_string(&mut html)
            .context("Failed to read HTML from stdin")?;
        Ok(html)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))
    }
}

fn exit_code_for(found: usize) -> i32 {
    if found > 0 {
        0
    } else {
        1
    }
}

// Prints the links either as a table or JSON
fn print_links(links: &LinkArray, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(&links_to_json(links))?;
        println!("{}", json_output);
    } else {
        print_table(links);
    }
    Ok(())
}

// Prints links as a human-readable table in the terminal
fn print_table(links: &LinkArray) {
    println!("{:<50} {:<35} {:<20}", "URI", "TEXT", "TITLE");
    println!("{}", "=".repeat(105));

    for link in links.links() {
        println!(
            "{:<50} {:<35} {:<20}",
            truncate(&link.uri, 47),
            truncate(&link.text, 32),
            truncate(link.title.as_deref().unwrap_or(""), 17)
        );
    }

    println!();
    println!("📊 Summary:");
    println!("   🔗 Links: {}", links.populated_count());
    println!("   ⬜ Empty matches: {}", links.len() - links.populated_count());
    println!("   📋 Total matches: {}", links.len());
}

// Shortens long values for display, on a char boundary
fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() > max {
        let short: String = value.chars().take(max).collect();
        format!("{}...", short)
    } else {
        value.to_string()
    }
}
