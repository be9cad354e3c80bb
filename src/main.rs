use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::{error, info};

use bookstore::{
    config::Config,
    db::Database,
    runner,
    seed::{self, SeedOutcome},
};

fn cli() -> Command {
    Command::new("bookstore")
        .about("Run the bookstore demo queries against MongoDB")
        .arg(
            Arg::new("uri")
                .help("MongoDB connection string (overrides MONGODB_URI)")
                .long("uri")
                .value_name("URI")
                .global(true),
        )
        .arg(
            Arg::new("database")
                .help("Database name (overrides MONGODB_DATABASE)")
                .long("database")
                .short('d')
                .value_name("NAME")
                .global(true),
        )
        .arg(
            Arg::new("collection")
                .help("Collection name (overrides MONGODB_COLLECTION)")
                .long("collection")
                .short('c')
                .value_name("NAME")
                .global(true),
        )
        .subcommand(Command::new("run").about("Run every query section in order (default)"))
        .subcommand(
            Command::new("seed")
                .about("Insert the sample books")
                .arg(
                    Arg::new("drop")
                        .help("Drop the collection before inserting")
                        .long("drop")
                        .action(ArgAction::SetTrue),
                ),
        )
}

/// Global options may be given before or after the subcommand.
fn global_value<'a>(matches: &'a ArgMatches, id: &str) -> Option<&'a str> {
    matches
        .subcommand()
        .and_then(|(_, sub)| sub.get_one::<String>(id))
        .or_else(|| matches.get_one::<String>(id))
        .map(String::as_str)
}

fn load_config(matches: &ArgMatches) -> Result<Config> {
    let config = Config::from_env()?.with_overrides(
        global_value(matches, "uri"),
        global_value(matches, "database"),
        global_value(matches, "collection"),
    );
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    info!(
        "Using database '{}' collection '{}'",
        config.database_name, config.collection_name
    );

    match matches.subcommand() {
        Some(("seed", seed_matches)) => {
            let db = Database::new(&config).await?;
            let outcome = seed::seed_books(&db, seed_matches.get_flag("drop")).await;
            db.close().await;
            match outcome {
                Ok(SeedOutcome::Inserted(count)) => println!("Inserted {} books", count),
                Ok(SeedOutcome::AlreadySeeded(count)) => {
                    println!("Collection already holds {} books, nothing inserted (use --drop to reseed)", count)
                }
                Err(e) => {
                    error!("Seeding failed: {:#}", e);
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        _ => {
            let mut stdout = std::io::stdout().lock();
            // run_queries has already logged the failure
            if runner::run_queries(&config, &mut stdout).await.is_err() {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
