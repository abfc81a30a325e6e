//! Market arena command line.
//!
//! `arena run` drives a full session from a TOML brief file and writes the
//! report plus the interaction log to an output directory. `arena analyze`
//! fires a one-shot run over a snippet of text and prints the report.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use arena_report::{Brief, PopulationConfig, Report, Topology};
use arena_session::SessionStore;

#[derive(Parser, Debug)]
#[command(name = "arena", version, about = "Simulates market reaction to a product brief")]
struct Cli {
    /// Log at debug level unless RUST_LOG overrides
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a full simulation session from a brief file
    Run {
        /// TOML brief file: product_name plus [[features]] tables
        #[arg(long)]
        brief: PathBuf,

        /// Number of agents in the arena
        #[arg(long)]
        population: Option<u32>,

        /// Number of rounds to simulate
        #[arg(long)]
        rounds: Option<u32>,

        /// Graph shape: echo_chamber, loose_network or real_follower
        #[arg(long)]
        topology: Option<Topology>,

        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Directory for report.json and the interaction log
        #[arg(long, default_value = "arena-out")]
        output: PathBuf,
    },
    /// Analyze a snippet of product text without keeping a session
    Analyze {
        /// Text to analyze; multiple arguments are joined with spaces
        text: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Command::Run {
            brief,
            population,
            rounds,
            topology,
            seed,
            output,
        } => run_session(brief, population, rounds, topology, seed, output).await,
        Command::Analyze { text } => analyze_text(text.join(" ")).await,
    }
}

async fn run_session(
    brief_path: PathBuf,
    population: Option<u32>,
    rounds: Option<u32>,
    topology: Option<Topology>,
    seed: Option<u64>,
    output: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let brief: Brief = toml::from_str(&fs::read_to_string(&brief_path)?)?;

    let mut config = PopulationConfig::default();
    if let Some(population) = population {
        config.population_size = population;
    }
    if let Some(rounds) = rounds {
        config.rounds = rounds;
    }
    if let Some(topology) = topology {
        config.topology = topology;
    }
    config.seed = seed;

    println!("Market Arena");
    println!("============");
    println!("Product:    {}", brief.product_name);
    println!("Features:   {}", brief.feature_count());
    println!("Population: {}", config.population_size);
    println!("Rounds:     {}", config.rounds);
    println!("Topology:   {}", config.topology);
    match config.seed {
        Some(seed) => println!("Seed:       {}", seed),
        None => println!("Seed:       fresh (recorded in the report)"),
    }
    println!();

    fs::create_dir_all(&output)?;

    let store = SessionStore::new().with_log_dir(&output);
    let session_id = store.create_session(brief).await?;
    store.configure(session_id, config).await?;

    println!("Running session {}...", session_id);
    store.run(session_id).await?;
    let status = store.await_completion(session_id).await?;
    println!("  finished with status: {}", status);
    println!();

    let report = store.get_report(session_id).await?;
    print_report(&report);

    let report_path = output.join("report.json");
    match report.to_json_pretty() {
        Ok(json) => {
            fs::write(&report_path, json)?;
            println!("Wrote {}", report_path.display());
        }
        Err(e) => eprintln!("Warning: could not serialize the report: {}", e),
    }
    let log_path = output.join(format!("interactions_{}.jsonl", session_id));
    if log_path.exists() {
        println!("Wrote {}", log_path.display());
    }

    Ok(())
}

async fn analyze_text(text: String) -> Result<(), Box<dyn std::error::Error>> {
    println!("Market Arena (ad-hoc)");
    println!("=====================");
    println!();

    let store = SessionStore::new();
    let report = store.analyze_ad_hoc(&text).await?;
    print_report(&report);

    Ok(())
}

fn print_report(report: &Report) {
    if let Some(reason) = &report.failure_reason {
        println!("Run failed: {}", reason);
        return;
    }

    println!(
        "Adoption score: {:.1} / 100 (seed {}, {} rounds, {} interactions)",
        report.adoption_score,
        report.seed,
        report.rounds_run,
        report.total_interactions()
    );
    println!();

    println!("Arena health");
    println!("  polarization:           {:.2}", report.arena_health.polarization_score);
    println!("  advocates per saboteur: {:.2}", report.arena_health.advocate_to_saboteur_ratio);
    println!("  viral path length:      {:.2}", report.arena_health.viral_path_length);
    println!("  engagement density:     {:.2}", report.arena_health.engagement_density);
    println!();

    if !report.quick_insights.is_empty() {
        println!("Quick insights");
        for insight in &report.quick_insights {
            println!("  - {}", insight);
        }
        println!();
    }

    if !report.top_objections.is_empty() {
        println!("Top objections");
        for objection in &report.top_objections {
            println!(
                "  - {} (x{}, peak influence {:.2})",
                objection.message, objection.frequency, objection.peak_influence
            );
        }
        println!();
    }

    if !report.must_fix.is_empty() {
        println!("Must fix before launch");
        for objection in &report.must_fix {
            println!("  - {}", objection.feature_title);
        }
        println!();
    }

    println!("Agent summaries");
    for summary in &report.agent_summaries {
        println!(
            "  {:<14} x{:<3} influence {:.2}, tokens left {:.1}",
            summary.agent_type.to_string(),
            summary.count,
            summary.mean_influence,
            summary.mean_tokens_remaining
        );
    }
}
