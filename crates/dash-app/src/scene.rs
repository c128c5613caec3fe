// ABOUTME: Scene files describing a workspace to lay out.
// ABOUTME: Lists the container width and each panel's span, content, and measured height.

use std::path::Path;

use anyhow::{Context, Result};
use dash_host::PanelSpec;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ScenePanel {
    #[serde(flatten)]
    pub spec: PanelSpec,

    /// Content height reported once the panel is measured. Omit to leave the
    /// panel unmeasured.
    #[serde(default)]
    pub height: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    pub container_width: f32,

    #[serde(default)]
    pub panels: Vec<ScenePanel>,
}

impl Scene {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse scene {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn specs(&self) -> Vec<PanelSpec> {
        self.panels.iter().map(|p| p.spec.clone()).collect()
    }
}
