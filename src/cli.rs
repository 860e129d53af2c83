// CLI module - command-line argument parsing and handlers
//
// With no subcommand blogdeck runs the TUI. Subcommands:
// - list: print the post list and exit
// - show <ID>: print one post's full content and exit
// - config --show | --path | --reset: configuration management

use crate::api::{BlogDetail, BlogPost, BlogSource, SharedSource};
use crate::config::{Config, VERSION};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;

/// blogdeck - browse a blog API from the terminal
#[derive(Parser, Debug)]
#[command(name = "blogdeck")]
#[command(version = VERSION)]
#[command(about = "Browse blog posts in an animated terminal UI", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Per-run overrides, applied on top of env and config file
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// Blog API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<String>,

    /// Serve bundled demo posts instead of calling the API
    #[arg(long, global = true)]
    pub demo: bool,

    /// Start in the gallery (grid) view
    #[arg(long)]
    pub grid: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the post list
    List,

    /// Print one post with its full content
    Show {
        /// Post id (`_id`)
        id: String,
    },

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,
    },
}

impl Cli {
    /// Layer the command-line overrides over env and file config
    pub fn apply(&self, config: Config) -> Config {
        config.with_overrides(
            self.overrides.api_base.clone(),
            self.overrides.demo,
            self.overrides.grid,
        )
    }
}

/// Handle `config` subcommands
pub fn handle_config(show: bool, path: bool, reset: bool, effective: &Config) -> Result<()> {
    if path {
        let path = Config::config_path().context("Could not determine config path")?;
        println!("{}", path.display());
    } else if show {
        handle_config_show(effective);
    } else if reset {
        handle_config_reset()?;
    } else {
        // No flag provided, show help
        println!("Usage: blogdeck config [--show|--path|--reset]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --path    Show config file path");
        println!("  --reset   Reset config file to defaults");
    }
    Ok(())
}

fn handle_config_show(config: &Config) {
    println!("# Effective configuration (flags > env > file > defaults)");
    println!();
    print!("{}", config.to_toml());
    println!();
    println!("# demo_mode = {} (runtime only)", config.demo_mode);

    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    // Confirm if file exists
    if path.exists() {
        eprint!("Config file exists at {}. Overwrite? [y/N] ", path.display());
        std::io::stderr().flush().context("Failed to flush stderr")?;

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .context("Failed to read confirmation")?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    let path = Config::reset_file()?;
    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

/// `blogdeck list`
pub async fn run_list(source: SharedSource) -> Result<()> {
    let posts = source
        .list()
        .await
        .with_context(|| format!("Failed to load blogs from {}", source.name()))?;

    if posts.is_empty() {
        println!("No posts.");
        return Ok(());
    }

    let mut out = std::io::stdout().lock();
    for post in &posts {
        writeln!(out, "{}", format_post_line(post))?;
    }
    Ok(())
}

/// `blogdeck show <ID>`
pub async fn run_show(source: SharedSource, id: &str) -> Result<()> {
    let detail = source
        .detail(id)
        .await
        .with_context(|| format!("Failed to load blog details for {}", id))?;

    print!("{}", format_detail(&detail));
    Ok(())
}

fn format_post_line(post: &BlogPost) -> String {
    format!(
        "{:<26} {}  ({}, {})",
        post.id, post.title, post.author_name, post.author_role
    )
}

fn format_detail(detail: &BlogDetail) -> String {
    let post = &detail.post;
    let mut out = String::new();

    out.push_str(&format!("{}\n", post.title));
    out.push_str(&format!("By {} • {}\n", post.author_name, post.author_role));
    out.push_str(&format!("Image: {}\n\n", detail.banner_url()));
    out.push_str(&format!("{}\n", post.small_description));

    for section in &detail.detail_info {
        out.push_str(&format!("\n## {}\n\n{}\n", section.title, section.paragraph));
    }
    out
}
