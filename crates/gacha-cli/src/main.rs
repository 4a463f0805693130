use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use gacha_store::{AggregatedView, GachaPayload, GachaPool, GachaStore, Game, StoreConfig};

#[derive(Debug, Parser)]
#[command(name = "gacha")]
#[command(about = "Inspect and maintain the local gacha record store")]
struct Args {
    /// Application data root. Falls back to GACHA_DATA_DIR.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Legacy vendor root holding SRTools/ZenlessTools. Falls back to GACHA_LEGACY_DIR.
    #[arg(long, global = true)]
    legacy_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List account ids with stored records
    Uids {
        /// Game (starrail, zzz); defaults to the current game
        #[arg(long)]
        game: Option<Game>,
    },

    /// Show one account's pools, newest draws first
    View {
        #[arg(long)]
        uid: String,
        #[arg(long)]
        game: Option<Game>,
        /// Only show this pool id
        #[arg(long)]
        pool: Option<i64>,
        /// Print the view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import a sync payload or legacy record file
    Import {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        game: Option<Game>,
    },

    /// Stop tracking an account and delete its records
    Delete {
        #[arg(long)]
        uid: String,
        #[arg(long)]
        game: Option<Game>,
    },

    /// Write one account's view as JSON into the Exports folder
    Export {
        #[arg(long)]
        uid: String,
        #[arg(long)]
        game: Option<Game>,
        /// Output file (default: <data dir>/Exports/<game>_<uid>.json)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Show or change the current game
    Game {
        name: Option<Game>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = StoreConfig::from_env_with(args.data_dir, args.legacy_dir)?;

    let store = GachaStore::open(&config).await?;
    let result = run(&store, args.command).await;
    store.close().await;
    result
}

async fn run(store: &GachaStore, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Uids { game } => {
            let game = resolve_game(store, game).await?;
            for uid in store.list_uids(game).await? {
                println!("{uid}");
            }
        }
        Command::View {
            uid,
            game,
            pool,
            json,
        } => {
            let game = resolve_game(store, game).await?;
            let mut view = store.aggregated_view(game, &uid).await?;
            if let Some(pool_id) = pool {
                view.pools.retain(|p| p.pool_id == pool_id);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render_view(&view));
            }
        }
        Command::Import { file, game } => {
            let game = resolve_game(store, game).await?;
            let json = tokio::fs::read_to_string(&file).await?;
            let payload = GachaPayload::from_json(game, &json)?;
            if payload.uid().is_none() {
                warn!(file = %file.display(), "Payload names no account; nothing to import");
                return Ok(());
            }

            let written = store.sync_payload(&payload).await?;
            info!(%game, file = %file.display(), written, "Imported records");
        }
        Command::Delete { uid, game } => {
            let game = resolve_game(store, game).await?;
            let removed = store.remove_account(game, &uid).await?;
            println!("Removed {removed} records for {uid}");
        }
        Command::Export { uid, game, out } => {
            let game = resolve_game(store, game).await?;
            let view = store.aggregated_view(game, &uid).await?;
            let path = out.unwrap_or_else(|| {
                store
                    .config()
                    .exports_dir()
                    .join(export_file_name(game, &uid))
            });
            tokio::fs::write(&path, serde_json::to_vec_pretty(&view)?).await?;
            info!(path = %path.display(), records = view.record_count(), "Exported view");
        }
        Command::Game { name } => {
            if let Some(game) = name {
                store.set_current_game(game).await?;
            }
            let game = store.current_game().await?;
            println!("{} ({})", game.display_name(), game);
        }
    }

    Ok(())
}

async fn resolve_game(store: &GachaStore, game: Option<Game>) -> gacha_store::Result<Game> {
    match game {
        Some(game) => Ok(game),
        None => store.current_game().await,
    }
}

fn export_file_name(game: Game, uid: &str) -> String {
    let safe: String = uid
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_{}.json", game.as_str(), safe)
}

/// Draw counts per rarity code.
fn rank_counts(pool: &GachaPool) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for record in &pool.records {
        *counts.entry(record.rank_type.as_str()).or_insert(0) += 1;
    }
    counts
}

fn render_view(view: &AggregatedView) -> String {
    if view.pools.is_empty() {
        return format!("No records for {} on {}\n", view.uid, view.game.display_name());
    }

    let mut out = format!("{} · {}\n", view.game.display_name(), view.uid);
    for pool in &view.pools {
        let label = if pool.pool_type.is_empty() {
            format!("Pool {}", pool.pool_id)
        } else {
            pool.pool_type.clone()
        };
        let ranks = rank_counts(pool)
            .iter()
            .map(|(rank, count)| format!("rank {rank}: {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "\n[{}] {} ({} draws; {})\n",
            pool.pool_id,
            label,
            pool.records.len(),
            ranks
        ));
        for record in &pool.records {
            out.push_str(&format!(
                "  {}  {:<24} {:>2}  {}\n",
                record.time, record.name, record.rank_type, record.item_type
            ));
        }
    }
    out
}
