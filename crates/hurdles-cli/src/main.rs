use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hurdles_core::{EvolutionConfig, GeneticAlgorithm};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hurdles")]
#[command(about = "Evolve hurdle-jumping controllers with a genetic algorithm")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an evolution from a config file
    Run {
        /// Path to config file (JSON)
        #[arg(long)]
        config: PathBuf,

        /// Output directory for the report (optional)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also write an ASCII replay of the final generation
        #[arg(long, requires = "out")]
        render: bool,
    },
    /// Dump the default configuration to stdout
    DumpDefaultConfig,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::DumpDefaultConfig => {
            let config = EvolutionConfig::default();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Run {
            config,
            out,
            render,
        } => {
            let file = File::open(&config).context("failed to open config file")?;
            let evolution_config: EvolutionConfig =
                serde_json::from_reader(BufReader::new(file)).context("failed to parse config")?;

            tracing::info!(path = ?config, "loaded config");
            let mut ga =
                GeneticAlgorithm::new(evolution_config).context("invalid evolution config")?;
            let report = ga.run().context("evolution aborted")?;

            let Some(out_dir) = out else {
                println!(
                    "Run complete. {} generations, best fitness {}",
                    report.generations.len(),
                    report.best_fitness().unwrap_or(0)
                );
                return Ok(());
            };

            std::fs::create_dir_all(&out_dir).context("failed to create output directory")?;
            let report_path = out_dir.join("report.json");
            let file = File::create(&report_path).context("failed to create report file")?;
            serde_json::to_writer_pretty(BufWriter::new(file), &report)
                .context("failed to write report")?;

            if render {
                let replay = ga
                    .replay(ga.population())
                    .context("failed to replay final generation")?;
                let replay_path = out_dir.join("replay.txt");
                let file = File::create(&replay_path).context("failed to create replay file")?;
                let mut writer = BufWriter::new(file);
                for grid in &replay.frames {
                    writeln!(writer, "frame {}", grid.frame)?;
                    writer.write_all(grid.to_ascii().as_bytes())?;
                }
                writer.flush().context("failed to write replay")?;
            }
            println!("Run complete. Results saved to {:?}", out_dir);
        }
    }
    Ok(())
}
