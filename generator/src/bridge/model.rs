use crate::export::codes::ExportBundle;
use serde::{Deserialize, Serialize};

/// State served by the HTTP bridge.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BridgeModel {
    pub latest: Option<ExportBundle>,
    pub synthesized: usize,
    pub rejected: usize,
}

impl BridgeModel {
    pub fn new() -> Self {
        Self::default()
    }
}
