//! Rhai-based provisioning engine
//!
//! Provides the execution environment for provisioning scripts.

use std::path::Path;

use anyhow::Result;
use rhai::Engine;

use crate::config::ExecMode;
use crate::helpers;

/// Provisioning script engine.
pub struct ProvisionEngine {
    engine: Engine,
    mode: ExecMode,
}

impl ProvisionEngine {
    /// Create a new engine with all helpers registered.
    pub fn new(mode: ExecMode) -> Self {
        let mut engine = Engine::new();
        helpers::register_all(&mut engine, mode);
        Self { engine, mode }
    }

    /// The execution mode the helpers were registered with.
    pub fn mode(&self) -> ExecMode {
        self.mode
    }

    /// Execute a provisioning script file.
    pub fn run_script(&self, path: &Path) -> Result<()> {
        self.engine
            .run_file(path.to_path_buf())
            .map_err(|e| anyhow::anyhow!("script {} failed: {}", path.display(), e))
    }

    /// Evaluate provisioning script source.
    pub fn eval_script(&self, script: &str) -> Result<()> {
        self.engine
            .run(script)
            .map_err(|e| anyhow::anyhow!("script failed: {}", e))
    }
}
