use anyhow::Result;
use tracing::info;

use crate::config::GenerateConfig;
use crate::generator::{generate_all, GenerationSummary};
use crate::reader::Tables;
use crate::ui::{Phase, Ui};
use crate::writer::{DiscardSink, DocumentSink, DocumentWriter};

/// Load the tables once and run the configured generators into `sink`
pub fn run(
    config: &GenerateConfig,
    sink: &mut impl DocumentSink,
    ui: &mut impl Ui,
) -> Result<GenerationSummary> {
    ui.set_phase(Phase::Loading);
    let tables = Tables::load(&config.input_dir, config.inclusion)?;
    ui.log(format!(
        "Loaded {} prefectures, {} lines, {} stations, {} joins",
        tables.prefs.len(),
        tables.lines.len(),
        tables.stations.len(),
        tables.joins.len()
    ));

    let summary = generate_all(&config.endpoints, &tables, sink, ui)?;
    info!(documents = summary.total(), "generation complete");
    Ok(summary)
}

/// Generate the API into `config.output_dir`
pub fn generate_api(config: &GenerateConfig, ui: &mut impl Ui) -> Result<GenerationSummary> {
    let mut writer = DocumentWriter::new(&config.output_dir);
    run(config, &mut writer, ui)
}

/// Build and render every document without touching the output directory
pub fn dry_run(config: &GenerateConfig, ui: &mut impl Ui) -> Result<GenerationSummary> {
    let mut sink = DiscardSink::default();
    run(config, &mut sink, ui)
}
