use anyhow::Result;
use clap::{Parser, Subcommand};
use examlock_core::{ProcessRecord, TerminationEngine};
use serde::Serialize;
use tabled::{Table, Tabled};

/// Safely truncate a string to a maximum number of characters (not bytes).
/// This avoids panics when slicing multi-byte UTF-8 characters.
fn truncate_str(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

#[derive(Parser)]
#[command(name = "examlock")]
#[command(about = "Exam-only execution enforcement", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Preview what a kill-all pass would terminate, without touching anything
    Preview {
        /// Exam URL whose domain would be preserved
        #[arg(short, long)]
        exam_url: Option<String>,
    },
    /// Terminate running AI-assistant applications
    KillAi,
    /// Close browser tabs, preserving the protected exam tab
    CloseTabs {
        /// Exam URL whose domain must survive the pass
        #[arg(short, long)]
        exam_url: Option<String>,
        /// Close every tab, including the protected exam tab
        #[arg(long)]
        all: bool,
    },
    /// Kill AI applications, then close unprotected browser tabs
    KillAll {
        /// Exam URL whose domain must survive the pass
        #[arg(short, long)]
        exam_url: Option<String>,
    },
    /// List running processes with their AI classification
    Processes {
        /// Only show processes classified as AI applications
        #[arg(long)]
        ai_only: bool,
    },
    /// Summarize open browser tabs per family
    Tabs,
}

#[derive(Tabled)]
struct ProcessRow {
    #[tabled(rename = "PID")]
    pid: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Memory %")]
    memory: String,
    #[tabled(rename = "CPU %")]
    cpu: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "AI")]
    ai: String,
}

#[derive(Tabled)]
struct TabCountRow {
    #[tabled(rename = "Browser")]
    browser: String,
    #[tabled(rename = "Open tabs")]
    tabs: usize,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn process_row(engine: &TerminationEngine, record: &ProcessRecord) -> ProcessRow {
    ProcessRow {
        pid: record.pid,
        name: truncate_str(&record.name, 40),
        memory: format!("{:.2}", record.memory_fraction * 100.0),
        cpu: format!("{:.2}", record.cpu_fraction * 100.0),
        status: record.status.to_string(),
        ai: if engine.is_ai_application(&record.name) {
            String::from("yes")
        } else {
            String::new()
        },
    }
}

fn show_processes(engine: &TerminationEngine, ai_only: bool) {
    let mut processes = if ai_only {
        engine.ai_processes()
    } else {
        engine.list_processes()
    };
    processes.sort_by(|a, b| b.memory_fraction.total_cmp(&a.memory_fraction));

    if processes.is_empty() {
        println!("No matching processes");
        return;
    }

    let rows: Vec<ProcessRow> = processes
        .iter()
        .map(|record| process_row(engine, record))
        .collect();
    println!("{}", Table::new(rows));
}

async fn show_tabs(engine: &TerminationEngine) {
    let summary = engine.tab_summary().await;
    let rows = vec![
        TabCountRow {
            browser: String::from("chrome"),
            tabs: summary.chrome,
        },
        TabCountRow {
            browser: String::from("firefox"),
            tabs: summary.firefox,
        },
        TabCountRow {
            browser: String::from("edge"),
            tabs: summary.edge,
        },
        TabCountRow {
            browser: String::from("total"),
            tabs: summary.total_tabs,
        },
    ];
    println!("{}", Table::new(rows));

    if summary.total_tabs == 0 && !engine.browser_debugging_enabled() {
        println!(
            "No debugging endpoints found; browsers must be started with --remote-debugging-port"
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();
    let engine = TerminationEngine::new()?;
    log::debug!("running {:?}", cli.command);

    match cli.command {
        Commands::Preview { exam_url } => {
            if let Some(url) = exam_url {
                engine.set_protected_domain(&url)?;
            }
            let preview = engine.get_termination_preview().await;
            print_json(&preview)?;
        }
        Commands::KillAi => {
            let outcome = engine.kill_ai_applications().await;
            print_json(&outcome)?;
        }
        Commands::CloseTabs { exam_url, all } => {
            if let Some(url) = exam_url {
                engine.set_protected_domain(&url)?;
            }
            let outcome = engine.close_browser_tabs(!all).await;
            print_json(&outcome)?;
        }
        Commands::KillAll { exam_url } => {
            let outcome = engine.kill_all_targeted(exam_url.as_deref()).await?;
            print_json(&outcome)?;
        }
        Commands::Processes { ai_only } => show_processes(&engine, ai_only),
        Commands::Tabs => show_tabs(&engine).await,
    }

    Ok(())
}
