pub mod check;
pub mod cli;
pub mod config;
pub mod filter;
pub mod generator;
pub mod parser;
pub mod pipeline;
pub mod reader;
pub mod schema;
pub mod ui;
pub mod writer;

pub use cli::{Cli, Commands};
pub use config::GenerateConfig;
pub use generator::{Endpoint, GenerationSummary};
pub use reader::Tables;
pub use ui::{Phase, ProgressUi, SilentUi, Ui};
