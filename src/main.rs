use anyhow::Context;
use clap::Parser;
use sensor_chunk::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let report = sensor_chunk::run(&cli)
        .with_context(|| format!("processing {}", cli.path.display()))?;

    println!("workers:          {}", report.worker_count);
    println!("malformed lines:  {}", report.malformed_lines);
    for (id, tally) in report.per_worker_tally.iter().enumerate() {
        println!("  worker {id:>3}: {tally} lines");
    }
    println!("total lines:      {}", report.total_tally);
    Ok(())
}
