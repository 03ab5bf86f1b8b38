use std::path::PathBuf;

use crate::filter::Inclusion;
use crate::generator::Endpoint;

/// Everything a generation run needs to know; nothing is read from fixed paths
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateConfig {
    pub input_dir: PathBuf,
    /// API root; each endpoint writes into its own subdirectory
    pub output_dir: PathBuf,
    pub inclusion: Inclusion,
    pub endpoints: Vec<Endpoint>,
}

impl GenerateConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            inclusion: Inclusion::default(),
            endpoints: Endpoint::ALL.to_vec(),
        }
    }

    /// Output directory of one endpoint
    pub fn endpoint_dir(&self, endpoint: Endpoint) -> PathBuf {
        self.output_dir.join(endpoint.dir())
    }
}
