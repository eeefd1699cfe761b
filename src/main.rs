//! Taskpilot - Entry Point
//!
//! Interactive shell for the command engine: type natural-language task
//! commands, watch them run against an in-memory store. Useful for manual
//! testing of the full inference -> parse -> execute pipeline.

use taskpilot::command::orchestrator::CommandOrchestrator;
use taskpilot::command::ActionKind;
use taskpilot::core::error::Result;
use taskpilot::core::types::UserId;
use taskpilot::llm::client::InferenceClient;
use taskpilot::store::MemoryTaskStore;

use chrono::Local;
use std::io::{self, Write};
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("taskpilot=debug")
        .init();

    tracing::info!("Taskpilot starting...");

    // Create the async runtime for inference calls
    let rt = Runtime::new()?;

    let client = match InferenceClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Cannot start: {e}");
            eprintln!("Set LLM_API_KEY (and optionally LLM_API_URL, LLM_MODEL).");
            std::process::exit(1);
        }
    };
    let orchestrator = CommandOrchestrator::new(client);

    // One in-memory store and one session user; real deployments supply a
    // store handle and the authenticated owner per call
    let mut store = MemoryTaskStore::new();
    let user = UserId::new();

    println!("\n=== TASKPILOT ===");
    println!("Manage tasks with natural language");
    println!();
    println!("Commands:");
    println!("  list / l        - Show current tasks");
    println!("  quit / q        - Exit");
    println!("  <any text>      - Natural language command, e.g.");
    println!("                    \"add buy milk due tomorrow\"");
    println!("                    \"mark buy milk as completed\"");
    println!("                    \"how many tasks are overdue?\"");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }
        if input == "list" || input == "l" {
            print_tasks(&store, user);
            continue;
        }

        let today = Local::now().date_naive();
        match rt.block_on(orchestrator.run_command(&mut store, user, input, today)) {
            Ok(outcome) => {
                for result in &outcome.results {
                    print_result(result);
                }
                if outcome.mutated {
                    print_tasks(&store, user);
                }
            }
            Err(e) => println!("  command failed: {e}"),
        }
    }

    println!("Bye.");
    Ok(())
}

fn print_result(result: &taskpilot::command::ActionResult) {
    let label = match result.kind {
        ActionKind::Add => "add",
        ActionKind::Edit => "edit",
        ActionKind::Delete => "delete",
        ActionKind::Analytics => "analytics",
        ActionKind::Error => "error",
        ActionKind::Unrecognized => "unrecognized",
    };
    let subject = result
        .title
        .as_deref()
        .or(result.query.as_deref())
        .or(result.instruction.as_deref())
        .unwrap_or("-");

    if result.succeeded {
        match (result.count, result.deleted) {
            (Some(count), _) => println!("  [ok] {label} \"{subject}\" -> {count}"),
            (_, Some(deleted)) => println!("  [ok] {label} \"{subject}\" ({deleted} removed)"),
            _ => println!("  [ok] {label} \"{subject}\""),
        }
    } else {
        let reason = result.error.as_deref().unwrap_or("unknown error");
        println!("  [failed] {label} \"{subject}\": {reason}");
    }
}

fn print_tasks(store: &MemoryTaskStore, user: UserId) {
    let tasks = store.tasks_for(user);
    if tasks.is_empty() {
        println!("  (no tasks)");
        return;
    }
    println!("  {} task(s):", tasks.len());
    for task in tasks {
        println!(
            "  - {} | due {} | {} | {} | {}",
            task.title, task.due_date, task.priority, task.status, task.category
        );
    }
}
