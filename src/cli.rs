// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
// =============================================================================

use clap::{Parser, Subcommand};

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "link-harvester",
    version = "0.1.0",
    about = "Extract links from HTML pages using CSS selectors",
    long_about = "link-harvester pulls hyperlinks out of HTML: it selects candidate elements with a \
                  CSS selector, keeps the anchors, cleans up their visible text and resolves their \
                  hrefs against the page's URI."
)]
pub struct Cli {
    /// Log debug output (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract links from a local HTML file
    ///
    /// Example: link-harvester extract page.html --selector "div.result a" --base-uri https://example.com/
    Extract {
        /// HTML file to read, or "-" for stdin
        input: String,

        /// CSS selector for the link candidates
        #[arg(long, short)]
        selector: String,

        /// Title selector (accepted for compatibility, titles come from the title attribute)
        #[arg(long, default_value = "")]
        title_selector: String,

        /// URI the page was loaded from, for resolving relative links
        #[arg(long)]
        base_uri: Option<String>,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Fetch one or more pages and extract their links
    ///
    /// Example: link-harvester fetch https://example.com/ --selector "nav a"
    Fetch {
        /// Page URLs; each is also the base URI for its own links
        #[arg(required = true)]
        urls: Vec<String>,

        /// CSS selector for the link candidates
        #[arg(long, short)]
        selector: String,

        /// Title selector (accepted for compatibility, titles come from the title attribute)
        #[arg(long, default_value = "")]
        title_selector: String,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run a web search service described by a JSON config file
    ///
    /// Example: link-harvester service search.json --param q=rust
    Service {
        /// Path to the service configuration
        config: String,

        /// Parameter value as name=value (repeatable)
        #[arg(long = "param", short, value_parser = parse_key_value)]
        params: Vec<(String, String)>,
    },
}

// Parses "name=value" into a pair
fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got '{}'", raw)),
    }
}
