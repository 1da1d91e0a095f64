//! Orchestrator configuration

use freeze_core::checkpoint::CheckpointKeys;
use freeze_core::domain::annotation::EntityType;

/// Number of pipelines requested per page when fanning out over a project
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Settings the orchestrator is constructed with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Annotation keys of the three checkpoint slots
    pub checkpoint_keys: CheckpointKeys,
    /// Entity type checkpoints are attached to
    pub entity_type: EntityType,
    /// Page size for project listings; 0 asks for unbounded pages
    pub page_size: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            checkpoint_keys: CheckpointKeys::default(),
            entity_type: EntityType::Pipeline,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl OrchestratorConfig {
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_checkpoint_keys(mut self, keys: CheckpointKeys) -> Self {
        self.checkpoint_keys = keys;
        self
    }
}
