use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use guild_board::api::{build_router, state::AppState};
use guild_board::calculate::Aggregator;
use guild_board::client::{refresh, MatchBoard, MatchClient};
use guild_board::config::AppConfig;
use guild_board::maintenance::{
    latest_backup, read_backup, validate_file, write_backup, NameMapping,
};
use guild_board::models::{
    GuildStats, Match, MatchResult, OverallRecord, PlayerStats, TopPerformers,
};
use guild_board::query::{
    LeaderboardQuery, MatchFilter, MatchQuery, Page, Pagination, PlayerFilter, SortField,
    SortOrder, SortState,
};
use guild_board::storage::{JsonlMatchStore, MatchStore, MemoryMatchStore, StorageConfig};

#[derive(Parser)]
#[command(name = "guild-board")]
#[command(about = "Match tracker, leaderboards and rival statistics for a gaming guild")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./guild-board.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Base URL of the match API used by the report commands
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,

        /// Keep matches in memory only
        #[arg(long)]
        in_memory: bool,
    },

    /// List matches, newest first
    Matches {
        /// Guild name contains
        #[arg(long, default_value = "")]
        guild: String,

        /// Any player name contains
        #[arg(long, default_value = "")]
        player: String,

        /// Victory or Defeat
        #[arg(long)]
        result: Option<MatchResult>,

        /// Exact opposing guild
        #[arg(long)]
        opponent: Option<String>,

        #[arg(long, default_value = "1")]
        page: usize,
    },

    /// Player leaderboard for the home guild
    Leaderboard {
        /// Restrict to matches against this guild
        #[arg(long)]
        rival: Option<String>,

        /// Player name contains
        #[arg(long, default_value = "")]
        search: String,

        #[arg(long, default_value = "kd")]
        sort: SortField,

        #[arg(long, default_value = "desc")]
        order: SortOrder,

        #[arg(long, default_value = "1")]
        page: usize,
    },

    /// Head-to-head breakdown against each rival
    Rivals {
        /// Only this rival instead of the configured list
        #[arg(long)]
        rival: Option<String>,
    },

    /// Record, top players and recent victories
    Summary {
        #[arg(long, default_value = "5")]
        top: usize,

        #[arg(long, default_value = "3")]
        recent: usize,
    },

    /// Check a match JSON file (one object or an array)
    Validate {
        file: PathBuf,
    },

    /// Write a timestamped backup of the local match file
    Backup,

    /// Replace the local match file with a backup
    Restore {
        /// Backup to restore; defaults to the newest in the backups directory
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Propose canonical spellings for player names differing only by case or spacing
    SuggestNames {
        /// Rewrite the local match file with the proposed names
        #[arg(long)]
        apply: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(Some(&cli.config))
        .with_context(|| format!("loading configuration from {:?}", cli.config))?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(url) = &cli.api_url {
        config.client.base_url = url.clone();
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::debug!("Starting guild-board v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.data_dir.clone());

    match cli.command {
        Commands::Serve {
            host,
            port,
            in_memory,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let store: Arc<dyn MatchStore> = if in_memory {
                tracing::warn!("Using in-memory store; matches are lost on restart");
                Arc::new(MemoryMatchStore::new())
            } else {
                Arc::new(JsonlMatchStore::open(storage.matches_path())?)
            };

            if !config.admin.gate_enabled() {
                tracing::warn!("No admin token configured; match writes are open");
            }

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let state = AppState::new(store, config)?;
            if !state.twitch.is_configured() {
                tracing::warn!("Twitch credentials not configured; stream proxy routes will fail");
            }
            let app = build_router(state);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Matches {
            guild,
            player,
            result,
            opponent,
            page,
        } => {
            let matches = fetch_matches(&config).await?;
            let query = MatchQuery {
                filter: MatchFilter {
                    guild,
                    player,
                    result,
                    opponent,
                },
                pagination: Pagination::new(Some(page), Some(config.guild.page_size)),
            };
            print_matches(&config, &query.run(&matches));
        }
        Commands::Leaderboard {
            rival,
            search,
            sort,
            order,
            page,
        } => {
            let matches = fetch_matches(&config).await?;
            let aggregator = Aggregator::new(&config.guild.home_guild);
            let stats = match &rival {
                Some(rival) => aggregator.against(&matches, rival).home,
                None => aggregator.overall(&matches),
            };

            let query = LeaderboardQuery {
                filter: PlayerFilter::new(search),
                sort: SortState::new(sort, order),
                pagination: Pagination::new(Some(page), Some(config.guild.page_size)),
            };
            print_record(&stats.guild, rival.as_deref(), &stats.record);
            print_leaderboard(&query.run(&stats.players));
        }
        Commands::Rivals { rival } => {
            let matches = fetch_matches(&config).await?;
            let rivals = match rival {
                Some(rival) => vec![rival],
                None => config.guild.rivals.clone(),
            };

            let aggregator = Aggregator::new(&config.guild.home_guild);
            for breakdown in aggregator.rivals(&matches, &rivals) {
                print_guild_stats(&breakdown.home, Some(&breakdown.rival));
                println!("  {} top performers:", breakdown.rival);
                print_top(&breakdown.rival_top);
                println!();
            }
        }
        Commands::Summary { top, recent } => {
            let matches = fetch_matches(&config).await?;
            let summary = Aggregator::new(&config.guild.home_guild).summary(&matches, top, recent);

            print_record(&config.guild.home_guild, None, &summary.record);
            println!(
                "Total kills: {}   Total damage: {}",
                summary.total_kills, summary.total_damage
            );
            println!("\nTop killers:");
            for row in &summary.top_killers {
                println!("  {:<20} {:>6}", row.name(), row.totals.kills);
            }
            println!("\nTop damage:");
            for row in &summary.top_damage {
                println!("  {:<20} {:>10}", row.name(), row.totals.damage);
            }
            println!("\nRecent victories:");
            for victory in &summary.recent_victories {
                println!(
                    "  {}  vs {:<16} kills {:>4}  damage {:>8}",
                    victory.date, victory.opponent, victory.home.kills, victory.home.damage
                );
            }
        }
        Commands::Validate { file } => {
            let report = validate_file(&file)?;
            if report.is_valid() {
                println!("{}: {} match(es) valid", file.display(), report.entries);
            } else {
                for entry in &report.invalid {
                    for error in &entry.errors {
                        println!("  [{}] {}", entry.index, error);
                    }
                }
                bail!(
                    "{} of {} match(es) invalid",
                    report.invalid.len(),
                    report.entries
                );
            }
        }
        Commands::Backup => {
            let store = JsonlMatchStore::open(storage.matches_path())?;
            let matches = store.find_all().await?;
            let path = write_backup(&storage.backups_dir(), matches, chrono::Utc::now())?;
            println!("Backup written to {}", path.display());
        }
        Commands::Restore { file } => {
            let path = match file {
                Some(path) => path,
                None => latest_backup(&storage.backups_dir())?,
            };
            let matches = read_backup(&path)?;

            let store = JsonlMatchStore::open(storage.matches_path())?;
            let count = store.replace_all(matches).await?;
            println!(
                "Restored {} matches from {} into {}",
                count,
                path.display(),
                store.path().display()
            );
        }
        Commands::SuggestNames { apply } => {
            let store = JsonlMatchStore::open(storage.matches_path())?;
            let mut matches = store.find_all().await?;
            let mapping = NameMapping::build(&matches, chrono::Utc::now());

            if mapping.is_empty() {
                println!("No similar player names found");
                return Ok(());
            }

            for (old, new) in &mapping.mapping {
                println!("  {:?} -> {:?}", old, new);
            }
            let mapping_path = storage.name_mapping_path();
            mapping.write(&mapping_path)?;
            println!("Mapping written to {}", mapping_path.display());

            if apply {
                let backup = write_backup(&storage.backups_dir(), matches.clone(), chrono::Utc::now())?;
                let changed = mapping.apply(&mut matches);
                store.replace_all(matches).await?;
                println!(
                    "Renamed players in {} matches (previous data in {})",
                    changed,
                    backup.display()
                );
            }
        }
    }

    Ok(())
}

/// Fetch the collection through the API once.
async fn fetch_matches(config: &AppConfig) -> Result<Vec<Match>> {
    let client = MatchClient::new(&config.client)?;
    let board = RwLock::new(MatchBoard::new());
    refresh(&board, &client).await;

    let board = board.into_inner();
    if !board.is_loaded() {
        bail!(
            "could not fetch matches from {}: {}",
            client.matches_url(),
            board.last_error().unwrap_or("no response")
        );
    }
    Ok(board.matches().to_vec())
}

fn print_record(guild: &str, rival: Option<&str>, record: &OverallRecord) {
    match rival {
        Some(rival) => println!("{} vs {}", guild, rival),
        None => println!("{}", guild),
    }
    println!(
        "  {} matches  {}W / {}L  win rate {}%",
        record.total_matches, record.victories, record.defeats, record.win_rate
    );
}

fn print_top(top: &TopPerformers) {
    for (label, performer) in [
        ("Most kills", &top.kills),
        ("Most deaths", &top.deaths),
        ("Most damage", &top.damage),
        ("Most debuffs", &top.debuffs),
    ] {
        if performer.is_empty() {
            println!("    {:<13} -", label);
        } else {
            println!(
                "    {:<13} {} ({}) vs {} on {}",
                label, performer.name, performer.value, performer.opponent, performer.date
            );
        }
    }
}

fn print_guild_stats(stats: &GuildStats, rival: Option<&str>) {
    print_record(&stats.guild, rival, &stats.record);
    println!(
        "  Totals: {} kills  {} deaths  {} damage  {} debuffs",
        stats.totals.kills, stats.totals.deaths, stats.totals.damage, stats.totals.debuffs
    );
    println!("  {} top performers:", stats.guild);
    print_top(&stats.top);
}

fn print_leaderboard(page: &Page<PlayerStats>) {
    println!(
        "\n  {:<20} {:>4} {:>6} {:>6} {:>6} {:>8} {:>10} {:>10} {:>6}",
        "Player", "M", "Win%", "Kills", "Deaths", "K/D", "Damage", "Healing", "Debuf"
    );
    for row in &page.items {
        let t = &row.totals;
        println!(
            "  {:<20} {:>4} {:>6.1} {:>6} {:>6} {:>8.2} {:>10} {:>10} {:>6}",
            t.name, t.matches, row.win_rate, t.kills, t.deaths, row.kd, t.damage, t.healing, t.debuffs
        );
    }
    print_page_footer(page);
}

fn print_matches(config: &AppConfig, page: &Page<Match>) {
    for m in &page.items {
        let (score1, score2) = config.scoring.score(m);
        println!(
            "  {}  {:<16} {:>4} - {:<4} {:<16} {:<8} {}",
            m.date,
            m.team1,
            score1,
            score2,
            m.team2,
            m.result.as_str(),
            m.id
        );
    }
    print_page_footer(page);
}

fn print_page_footer<T>(page: &Page<T>) {
    println!(
        "\n  page {}/{} ({} total)",
        page.page, page.total_pages, page.total_items
    );
}
