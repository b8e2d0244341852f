//! render
//!
//! Manifest rendering: a fixed set of named templates filled from model
//! structs and written to deterministic paths.
//!
//! # Design
//!
//! Templates are pure substitution (no loops, no conditionals), so the
//! environment runs with auto-escaping off (output is YAML, not HTML)
//! and strict undefined behavior: a placeholder without a matching model
//! field fails the render instead of emitting an empty string into a
//! deployment manifest.

pub mod model;
pub mod templates;

pub use model::{JobManifest, SinkManifest, SourceManifest};

use std::fs;
use std::path::{Path, PathBuf};

use minijinja::{AutoEscape, Environment, UndefinedBehavior, Value};
use serde::Serialize;
use thiserror::Error;

/// The fixed template set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateId {
    SourceConnector,
    SinkConnector,
    SnowflakeJob,
}

impl TemplateId {
    pub fn name(&self) -> &'static str {
        match self {
            TemplateId::SourceConnector => "source-connector",
            TemplateId::SinkConnector => "sink-connector",
            TemplateId::SnowflakeJob => "snowflake-job",
        }
    }

    fn body(&self) -> &'static str {
        match self {
            TemplateId::SourceConnector => templates::SOURCE_CONNECTOR,
            TemplateId::SinkConnector => templates::SINK_CONNECTOR,
            TemplateId::SnowflakeJob => templates::SNOWFLAKE_JOB,
        }
    }

    const ALL: [TemplateId; 3] = [
        TemplateId::SourceConnector,
        TemplateId::SinkConnector,
        TemplateId::SnowflakeJob,
    ];
}

/// Errors from template setup and rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid template '{name}': {source}")]
    Template {
        name: &'static str,
        #[source]
        source: minijinja::Error,
    },

    #[error("failed to render template '{name}': {source}")]
    Render {
        name: &'static str,
        #[source]
        source: minijinja::Error,
    },

    #[error("failed to write rendered manifest '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Renders the fixed template set.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Build an environment with all templates loaded.
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        for id in TemplateId::ALL {
            env.add_template(id.name(), id.body())
                .map_err(|e| RenderError::Template {
                    name: id.name(),
                    source: e,
                })?;
        }
        Ok(Self { env })
    }

    /// Render one template against `data`.
    pub fn render<S: Serialize>(&self, id: TemplateId, data: &S) -> Result<String, RenderError> {
        let template = self
            .env
            .get_template(id.name())
            .map_err(|e| RenderError::Render {
                name: id.name(),
                source: e,
            })?;
        template
            .render(Value::from_serialize(data))
            .map_err(|e| RenderError::Render {
                name: id.name(),
                source: e,
            })
    }

    /// Render one template and write it to `path`, creating parent
    /// directories as needed.
    pub fn render_to_file<S: Serialize>(
        &self,
        id: TemplateId,
        data: &S,
        path: &Path,
    ) -> Result<(), RenderError> {
        let content = self.render(id, data)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| RenderError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        fs::write(path, content).map_err(|e| RenderError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
