//! `coursemates` - maintenance commands for the mutual-course cache.
//!
//! - `rebuild` - Write mutual-course sets for each user
//! - `read` - Print cached mutual courses per friend
//! - `clear` - Drop each user's cached pairs
//!
//! Configuration comes from `COURSEMATES__*` environment variables.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::error::Error;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use coursemates::adapters::postgres::{
    self, PostgresCourseCatalog, PostgresCourseHistoryRepository, PostgresUserRepository,
};
use coursemates::adapters::redis::RedisMutualCourseCache;
use coursemates::adapters::{CalendarTermClock, FixedTermClock, TracingDataQualitySink};
use coursemates::application::{
    ClearMutualCoursesCommand, GetMutualCoursesQuery, LifecyclePorts,
    RebuildMutualCoursesCommand, UserLifecycle,
};
use coursemates::config::AppConfig;
use coursemates::domain::foundation::{CommandMetadata, UserId};
use coursemates::ports::TermClock;
use coursemates::telemetry;

#[derive(Parser)]
#[command(name = "coursemates")]
#[command(author, version, about = "Mutual-course cache maintenance")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the mutual-course cache of each user
    Rebuild {
        #[arg(required = true)]
        user_ids: Vec<UserId>,
    },
    /// Print cached mutual courses of each user, one line per friend
    Read {
        #[arg(required = true)]
        user_ids: Vec<UserId>,
    },
    /// Delete the cached mutual-course sets of each user
    Clear {
        #[arg(required = true)]
        user_ids: Vec<UserId>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    telemetry::init_tracing(&config.logging);

    let lifecycle = build_lifecycle(&config).await?;
    let metadata = CommandMetadata::new().with_source("cli");

    match cli.command {
        Commands::Rebuild { user_ids } => {
            for user_id in user_ids {
                let result = lifecycle
                    .rebuild_mutual_courses(
                        RebuildMutualCoursesCommand { user_id },
                        metadata.clone(),
                    )
                    .await?;
                println!("{user_id}: {} pairs written", result.pairs_written);
            }
        }
        Commands::Read { user_ids } => {
            for user_id in user_ids {
                let mutual = lifecycle
                    .get_mutual_courses(GetMutualCoursesQuery { user_id })
                    .await?;
                for (friend_id, courses) in mutual {
                    let mut courses: Vec<_> = courses.iter().map(|c| c.as_str()).collect();
                    courses.sort_unstable();
                    println!("{user_id} {friend_id}: {}", courses.join(" "));
                }
            }
        }
        Commands::Clear { user_ids } => {
            for user_id in user_ids {
                let result = lifecycle
                    .clear_mutual_courses(ClearMutualCoursesCommand { user_id }, metadata.clone())
                    .await?;
                println!("{user_id}: {} pairs cleared", result.pairs_cleared);
            }
        }
    }

    Ok(())
}

async fn build_lifecycle(config: &AppConfig) -> Result<UserLifecycle, Box<dyn Error>> {
    let pool = postgres::connect(&config.database).await?;
    if config.database.run_migrations {
        postgres::run_migrations(&pool).await?;
        tracing::info!("Migrations applied");
    }

    let client = redis::Client::open(config.redis.url.as_str())?;
    let conn =
        tokio::time::timeout(config.redis.timeout(), client.get_multiplexed_tokio_connection())
            .await??;
    let cache = RedisMutualCourseCache::new(conn)
        .with_key_prefix(config.cache.key_prefix.clone())
        .with_points_key(config.cache.points_key.clone());

    let clock: Arc<dyn TermClock> = match config.terms.fixed_term()? {
        Some(term) => Arc::new(FixedTermClock::new(term)),
        None => Arc::new(CalendarTermClock),
    };
    tracing::info!(current_term = %clock.current_term(), "Connected");

    Ok(UserLifecycle::new(LifecyclePorts {
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        history: Arc::new(PostgresCourseHistoryRepository::new(pool.clone())),
        catalog: Arc::new(PostgresCourseCatalog::new(pool)),
        cache: Arc::new(cache),
        data_quality: Arc::new(TracingDataQualitySink::new()),
        clock,
    }))
}
