// cmdwerk - completes your next shell command from your own history
//
// This is the main entry point. Parses CLI args and dispatches to handlers.

use cmdwerk_lib::{
    config::expand_tilde,
    core::{session, Session, Syncer},
    db::Database,
    history::HistoryFormat,
    index::CompletionIndex,
    logging, CmdwerkError, Config, Result,
};
use std::collections::BTreeMap;
use std::env;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let command = &args[1];

    let result = match command.as_str() {
        "sync" => handle_sync(&args[2..]).await,
        "run" => handle_run().await,
        "dump" => handle_dump(&args[2..]).await,
        "status" => handle_status().await,
        "version" | "-v" | "--version" => {
            println!("cmdwerk v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        // Nothing synced yet is guidance, not a failure.
        Err(e @ CmdwerkError::IndexNotFound(_)) => {
            println!("ERROR: {}", e.user_message());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ERROR: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn handle_sync(args: &[String]) -> Result<()> {
    let mut config = Config::from_env()?;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--history" => {
                i += 1;
                let value = args.get(i).ok_or_else(|| {
                    CmdwerkError::InvalidArgument("--history needs a file path".to_string())
                })?;
                let home = dirs::home_dir().unwrap_or_default();
                config = config.with_history_path(expand_tilde(value, &home));
            }
            "--format" => {
                i += 1;
                let value = args.get(i).ok_or_else(|| {
                    CmdwerkError::InvalidArgument("--format needs extended or plain".to_string())
                })?;
                let format = HistoryFormat::parse(value).ok_or_else(|| {
                    CmdwerkError::InvalidArgument(format!(
                        "unknown history format '{}', use extended or plain",
                        value
                    ))
                })?;
                config = config.with_history_format(format);
            }
            other => {
                return Err(CmdwerkError::InvalidArgument(format!(
                    "unexpected argument '{}'",
                    other
                )));
            }
        }
        i += 1;
    }
    config.validate()?;

    let report = Syncer::new(config.index_path())
        .sync(&config.history_path, config.history_format)
        .await?;

    println!("Saved history data to {}", report.output_path.display());
    println!("History lines : {}", report.history_lines);
    println!("Loading errors: {}", report.loading_errors);
    println!("Prefix keys   : {}", report.keys_indexed);
    println!("Commands      : {}", report.first_tokens);

    Ok(())
}

async fn handle_run() -> Result<()> {
    let config = Config::from_env()?;
    let session = Session::load(config.index_path()).await?;

    if let Some(line) = session.run().await? {
        println!("{}", line);
    }

    Ok(())
}

async fn handle_dump(args: &[String]) -> Result<()> {
    let as_json = args.iter().any(|arg| arg == "--json");

    let config = Config::from_env()?;
    let index = session::load_index(&config.index_path()).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&sorted_entries(&index))?);
    } else {
        for (key, candidates) in sorted_entries(&index) {
            println!("{} {:?}", key, candidates);
        }
    }

    Ok(())
}

async fn handle_status() -> Result<()> {
    let config = Config::from_env()?;
    let index_path = config.index_path();

    println!("\ncmdwerk Status");
    println!("{}", "=".repeat(60));
    println!("  History file: {}", config.history_path.display());
    println!("  Format:       {}", config.history_format);
    println!("  Index:        {}", index_path.display());

    let db = Database::open(&index_path).await?;
    let stats = db.stats().await?;
    let last = db.last_sync_run().await?;
    db.close().await;

    println!("\nIndex Statistics:");
    println!("  Prefix keys:  {}", stats.total_keys);
    println!("  Candidates:   {}", stats.total_candidates);
    println!("  Commands:     {}", stats.total_first_tokens);
    println!("  Syncs:        {}", stats.total_sync_runs);

    if let Some(run) = last {
        println!("\nLast Sync:");
        println!("  At:             {}", run.synced_at);
        println!("  From:           {}", run.history_path);
        println!("  History lines:  {}", run.history_lines);
        println!("  Loading errors: {}", run.loading_errors);
    }

    println!("{}", "=".repeat(60));

    Ok(())
}

/// Index entries sorted by key, candidates sorted too
fn sorted_entries(index: &CompletionIndex) -> BTreeMap<String, Vec<String>> {
    index
        .entries()
        .map(|(key, candidates)| {
            let mut candidates: Vec<String> = candidates.iter().cloned().collect();
            candidates.sort();
            (key.to_string(), candidates)
        })
        .collect()
}

fn print_usage() {
    println!(
        r#"cmdwerk v{} - Complete commands from your shell history

USAGE:
    cmdwerk <COMMAND> [OPTIONS]

COMMANDS:
    sync [--history <file>] [--format extended|plain]
                           Rebuild the completion index from shell history
    run                    Enter the interactive prompt
    dump [--json]          Print the completion index
    status                 Show index location and stats
    version                Show version
    help                   Show this help

EXAMPLES:
    cmdwerk sync
    cmdwerk sync --history ~/.zsh_history
    cmdwerk run

ENVIRONMENT:
    CMDWERK_HOME           Data directory (default: ~/.cmdwerk)
    HISTFILE               History file read by sync
    CMDWERK_LOG            Log filter, e.g. debug (default: warn)
"#,
        env!("CARGO_PKG_VERSION")
    );
}
