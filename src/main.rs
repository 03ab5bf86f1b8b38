use anyhow::Result;
use ekidata_api::{
    check::check_references,
    cli::{Cli, Commands},
    pipeline::{dry_run, generate_api},
    reader::Tables,
    schema::ALL_TABLES,
    ProgressUi, SilentUi,
};
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();

    match &cli.command {
        Commands::Generate { dry_run: dry, quiet, .. } => {
            let start = Instant::now();
            let config = cli
                .command
                .generate_config()
                .ok_or_else(|| anyhow::anyhow!("generate command without configuration"))?;

            let summary = match (*dry, *quiet) {
                (true, true) => dry_run(&config, &mut SilentUi::new())?,
                (true, false) => dry_run(&config, &mut ProgressUi::new())?,
                (false, true) => generate_api(&config, &mut SilentUi::new())?,
                (false, false) => generate_api(&config, &mut ProgressUi::new())?,
            };

            let elapsed = start.elapsed();
            for (endpoint, count) in &summary.counts {
                println!("  {:<14} {:>6} documents", endpoint.to_string(), count);
            }
            if *dry {
                println!(
                    "\nDry run: rendered {} documents in {:.1}s",
                    summary.total(),
                    elapsed.as_secs_f64()
                );
            } else {
                println!(
                    "\nWrote {} documents to {:?} in {:.1}s",
                    summary.total(),
                    config.output_dir,
                    elapsed.as_secs_f64()
                );
            }
        }

        Commands::Check { input } => {
            let tables = Tables::load(&input.input_dir, input.inclusion())?;
            let report = check_references(&tables);

            println!(
                "Loaded {} prefectures, {} companies, {} lines, {} stations, {} joins\n",
                tables.prefs.len(),
                tables.companies.len(),
                tables.lines.len(),
                tables.stations.len(),
                tables.joins.len()
            );
            print!("{}", report);
            if report.is_clean() {
                println!("\nAll references resolve");
            }
        }

        Commands::ListTables => {
            println!("Source tables:\n");
            for table in ALL_TABLES {
                println!("  {} ({})", table.name, table.source_file);
                for col in table.columns {
                    println!("    {:<16} {}", col.name, col.col_type);
                }
                for fk in table.foreign_keys {
                    println!(
                        "    {} -> {}.{}",
                        fk.column, fk.references_table, fk.references_column
                    );
                }
            }
        }
    }

    Ok(())
}
