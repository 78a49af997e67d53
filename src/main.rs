//! Pixel Forge CLI
//!
//! Generates logos, administers the exclusive seed pool and forges
//! exclusive logos. Results are printed as JSON on stdout; pool state
//! lives in a JSON snapshot between runs.

use clap::{Parser, Subcommand};
use pixel_forge::{
    fingerprint::StoredFingerprint,
    forge::ExclusiveForge,
    generation::{Artifact, GeneratedLogo, LogoGenerator},
    seeds::{ExclusiveSeedPool, ForgeLockStatusCache, MemorySeedStore, SnapshotLock},
    FileConfig, FingerprintClassifier,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "pixel-forge")]
#[command(about = "Pixel Forge - deterministic pixel-art logos", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed pool snapshot file (overrides the configuration)
    #[arg(short, long)]
    store: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a logo from text
    Generate {
        /// Logo text (1-30 characters)
        text: String,

        /// Seed in [0, 2147483647]; derived from the text when omitted
        #[arg(long)]
        seed: Option<i64>,

        /// Write the artifact as a binary PPM
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Draw a style fingerprint
    Fingerprint {
        /// Draw from the unrestricted pools
        #[arg(long)]
        unrestricted: bool,

        /// Repair a stored fingerprint given as JSON instead of drawing
        #[arg(long)]
        heal: Option<String>,
    },

    /// Administer the exclusive seed pool
    Pool {
        #[command(subcommand)]
        command: PoolCommand,
    },

    /// Forge an exclusive logo, spending one pool seed
    Forge {
        /// Logo text (1-30 characters)
        text: String,

        /// Consumer identity recorded on the seed
        #[arg(long)]
        consumer: Option<String>,

        /// Write the display artifact as a binary PPM
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Serve Prometheus metrics for the pool
    #[cfg(feature = "metrics")]
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand)]
enum PoolCommand {
    /// Mint seeds up to the configured total
    Init,
    /// Print pool counts
    Stats,
    /// Print the forge lock status
    Status,
    /// Claim the next seed
    Consume {
        /// Consumer identity recorded on the seed
        #[arg(long)]
        consumer: Option<String>,
    },
    /// Show the next unused seed without claiming it
    Peek,
    /// Mark every seed unused (refused in production)
    Reset,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] pixel_forge::ConfigError),
    #[error(transparent)]
    Generation(#[from] pixel_forge::GenerationError),
    #[error(transparent)]
    Pool(#[from] pixel_forge::PoolError),
    #[error(transparent)]
    Store(#[from] pixel_forge::seeds::StoreError),
    #[error(transparent)]
    Forge(#[from] pixel_forge::ForgeError),
    #[error("invalid fingerprint JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[cfg(feature = "metrics")]
    #[error(transparent)]
    Metrics(#[from] pixel_forge::metrics::MetricsError),
    #[cfg(feature = "metrics")]
    #[error(transparent)]
    Server(#[from] pixel_forge::metrics::ServerError),
    #[cfg(feature = "metrics")]
    #[error("failed to start runtime: {0}")]
    Runtime(std::io::Error),
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            println!("{}", serde_json::json!({ "success": false, "error": e.to_string() }));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let config = match &cli.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let store_path = cli
        .store
        .clone()
        .unwrap_or_else(|| config.output.store_path.clone());

    match cli.command {
        Commands::Generate { text, seed, out } => {
            let generator = LogoGenerator::new(config.generation)?;
            let logo = generator.generate(&text, seed)?;
            if let Some(path) = &out {
                write_ppm(&logo.artifact, path)?;
            }
            print_json(&logo_summary(&logo));
            Ok(ExitCode::SUCCESS)
        }

        Commands::Fingerprint { unrestricted, heal } => {
            let classifier = FingerprintClassifier::new();
            let output = match heal {
                Some(json) => {
                    let stored: StoredFingerprint = serde_json::from_str(&json)?;
                    let healed = classifier.heal_stored(&stored);
                    serde_json::json!({
                        "fingerprint": healed.fingerprint,
                        "repaired": healed.repaired,
                    })
                }
                None if unrestricted => {
                    serde_json::json!({ "fingerprint": classifier.generate_unrestricted() })
                }
                None => serde_json::json!({ "fingerprint": classifier.generate_enforced() }),
            };
            print_json(&output);
            Ok(ExitCode::SUCCESS)
        }

        Commands::Pool { command } => {
            // held until the snapshot is written back
            let _lock = SnapshotLock::exclusive(&store_path)?;
            let pool = ExclusiveSeedPool::new(MemorySeedStore::open(&store_path)?, config.pool.clone());
            let code = run_pool(&pool, command, &config)?;
            pool.store().persist(&store_path)?;
            Ok(code)
        }

        Commands::Forge {
            text,
            consumer,
            out,
        } => {
            let _lock = SnapshotLock::exclusive(&store_path)?;
            let pool = Arc::new(ExclusiveSeedPool::new(
                MemorySeedStore::open(&store_path)?,
                config.pool.clone(),
            ));
            let status = Arc::new(ForgeLockStatusCache::new(Arc::clone(&pool), config.status.clone()));
            let forge = ExclusiveForge::new(LogoGenerator::new(config.generation)?, status);

            let result = forge.forge_exclusive(&text, consumer.as_deref());
            pool.store().persist(&store_path)?;

            match result? {
                Some(exclusive) => {
                    if let Some(path) = &out {
                        write_ppm(&exclusive.display, path)?;
                    }
                    print_json(&serde_json::json!({
                        "success": true,
                        "token_prefix": &exclusive.token[..exclusive.token.len().min(8)],
                        "logo": logo_summary(&exclusive.logo),
                        "fingerprint": exclusive.fingerprint,
                        "rarity": exclusive.rarity,
                        "display_digest": exclusive.display.digest(),
                    }));
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    print_json(&serde_json::json!({ "success": false, "exhausted": true }));
                    Ok(ExitCode::from(2))
                }
            }
        }

        #[cfg(feature = "metrics")]
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.output.metrics_port);
            serve_metrics(&store_path, &config, port)
        }
    }
}

fn run_pool(
    pool: &ExclusiveSeedPool,
    command: PoolCommand,
    config: &FileConfig,
) -> Result<ExitCode, CliError> {
    match command {
        PoolCommand::Init => {
            let report = pool.initialize()?;
            print_json(&serde_json::json!({
                "inserted": report.inserted,
                "total": report.total,
            }));
        }
        PoolCommand::Stats => print_json(&pool.stats()?),
        PoolCommand::Status => {
            let stats = pool.stats()?;
            let status = pixel_forge::seeds::ForgeLockStatus::from_stats(
                stats,
                config.status.critical_threshold,
            );
            print_json(&status);
        }
        PoolCommand::Consume { consumer } => match pool.consume_next(consumer.as_deref())? {
            Some(token) => print_json(&serde_json::json!({ "token": token })),
            None => {
                print_json(&serde_json::json!({ "token": null, "exhausted": true }));
                return Ok(ExitCode::from(2));
            }
        },
        PoolCommand::Peek => print_json(&serde_json::json!({ "next": pool.peek_next()? })),
        PoolCommand::Reset => {
            let reset = pool.reset_all()?;
            print_json(&serde_json::json!({ "reset": reset }));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn logo_summary(logo: &GeneratedLogo) -> serde_json::Value {
    serde_json::json!({
        "seed": logo.seed_used.value(),
        "width": logo.artifact.width(),
        "height": logo.artifact.height(),
        "digest": logo.digest(),
        "config": logo.config,
    })
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => error!("Failed to serialize output: {}", e),
    }
}

/// Writes a binary PPM (P6) for quick inspection.
fn write_ppm(artifact: &Artifact, path: &Path) -> Result<(), CliError> {
    let write = || -> std::io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        write!(out, "P6\n{} {}\n255\n", artifact.width(), artifact.height())?;
        out.write_all(artifact.pixels())?;
        out.flush()
    };
    write().map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "Wrote artifact");
    Ok(())
}

#[cfg(feature = "metrics")]
fn serve_metrics(store_path: &Path, config: &FileConfig, port: u16) -> Result<ExitCode, CliError> {
    use pixel_forge::metrics::{MetricsRegistry, MetricsServer, MetricsServerConfig, MetricsSnapshot};

    let store_path = store_path.to_path_buf();
    let pool_config = config.pool.clone();
    let threshold = config.status.critical_threshold;
    let refresh = config.status.ttl();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    runtime.block_on(async move {
        let server = MetricsServer::new(MetricsServerConfig::with_port(port), MetricsRegistry::new()?);
        let state = server.state();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(refresh);
            loop {
                ticker.tick().await;
                // other runs persist claims between ticks
                match read_pool_status(&store_path, &pool_config, threshold) {
                    Ok(status) => {
                        state.read().await.update(&MetricsSnapshot::from_status(&status));
                    }
                    Err(e) => error!("Failed to read pool snapshot: {}", e),
                }
            }
        });

        server.run().await?;
        Ok::<_, CliError>(ExitCode::SUCCESS)
    })
}

#[cfg(feature = "metrics")]
fn read_pool_status(
    store_path: &Path,
    pool_config: &pixel_forge::seeds::PoolConfig,
    threshold: usize,
) -> Result<pixel_forge::seeds::ForgeLockStatus, CliError> {
    let _lock = SnapshotLock::shared(store_path)?;
    let pool = ExclusiveSeedPool::new(MemorySeedStore::open(store_path)?, pool_config.clone());
    Ok(pixel_forge::seeds::ForgeLockStatus::from_stats(pool.stats()?, threshold))
}

#[cfg(all(test, feature = "metrics"))]
mod tests {
    use super::*;
    use pixel_forge::seeds::{PoolConfig, SeedStore};

    #[test]
    fn test_metrics_status_follows_other_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.json");
        let config = PoolConfig {
            total: 3,
            ..Default::default()
        };
        let pool = ExclusiveSeedPool::new(MemorySeedStore::new(), config.clone());
        pool.initialize().unwrap();
        pool.store().persist(&path).unwrap();

        let before = read_pool_status(&path, &config, 2).unwrap();
        assert_eq!(before.used_seeds, 0);

        // a separate run claims and persists
        let other = MemorySeedStore::open(&path).unwrap();
        other.claim_next(Some("cli"), chrono::Utc::now()).unwrap().unwrap();
        other.persist(&path).unwrap();

        let after = read_pool_status(&path, &config, 2).unwrap();
        assert_eq!(after.used_seeds, 1);
        assert_eq!(after.available_seeds, 2);
    }
}
