//! MacroAI
//!
//! A stdio front end for the MacroAI core: log meals and workouts in plain
//! English, review the log, and check daily targets.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{stdin, stdout, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use macroai::classifier::GeminiClassifier;
use macroai::db;
use macroai::models::UserProfile;
use macroai::session::{LogSession, SystemClock, UuidGenerator};
use macroai::store::{LogStore, SqliteBackend};
use macroai::targets;

/// Get the database path from environment or use default
fn get_database_path() -> PathBuf {
    std::env::var("MACROAI_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/macroai.db"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("macroai=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let db_path = get_database_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    eprintln!("Database path: {}", db_path.display());

    let database = db::Database::new(&db_path)?;
    database.with_conn(|conn| db::migrations::run_migrations(conn))?;

    let store = Arc::new(LogStore::new(Arc::new(SqliteBackend::new(database))).await?);

    let classifier = match GeminiClassifier::from_env() {
        Ok(c) => Some(Arc::new(c)),
        Err(e) => {
            eprintln!("Classifier unavailable ({}); 'log' is disabled", e);
            None
        }
    };

    let session = classifier.map(|c| {
        LogSession::new(
            Arc::clone(&store),
            c,
            Arc::new(SystemClock),
            Arc::new(UuidGenerator),
        )
    });

    let profile = UserProfile::default();

    let mut lines = BufReader::new(stdin()).lines();
    let mut out = stdout();
    out.write_all(b"Commands: log <text> | list | delete <id> | targets | summary | quit\n> ")
        .await?;
    out.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = match line.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "quit" | "exit" => break,
            "log" => match &session {
                Some(session) => {
                    session.update_input_text(rest);
                    match session.process_log_entry().await {
                        None => println!("Nothing to log."),
                        Some(_) => {
                            let state = session.state();
                            match state.error_message {
                                Some(message) => println!("Error: {}", message),
                                None => println!("Logged."),
                            }
                        }
                    }
                }
                None => println!("Set GEMINI_API_KEY to enable logging."),
            },
            "list" => {
                let entries = store.observe_all().borrow().clone();
                if entries.is_empty() {
                    println!("No entries yet.");
                }
                for entry in entries {
                    println!(
                        "{}  [{}] {} - {} kcal ({})",
                        entry.id,
                        entry.entry_type.as_str(),
                        entry.name,
                        entry.calories,
                        entry.macros
                    );
                }
            }
            "delete" => {
                if store.delete_by_id(rest).await? {
                    println!("Deleted.");
                } else {
                    println!("No entry with id {}", rest);
                }
            }
            "targets" => {
                let t = targets::calculate_targets(&profile);
                println!(
                    "{} kcal, protein {}g, fat {}g, carbs {}g",
                    t.calories, t.protein, t.fat, t.carbs
                );
            }
            "summary" => {
                let entries = store.observe_all().borrow().clone();
                let goal = targets::calculate_target_calories(&profile);
                let s = targets::summarize_day(&entries, goal);
                println!(
                    "goal {} kcal, consumed {}, burned {}, remaining {}",
                    s.goal, s.consumed, s.burned, s.remaining
                );
            }
            other => println!("Unknown command: {}", other),
        }

        out.write_all(b"> ").await?;
        out.flush().await?;
    }

    Ok(())
}
