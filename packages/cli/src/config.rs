use anyhow::Context;
use serde::{Deserialize, Serialize};
use sprig_template::{CompileOptions, Compiler};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "sprig.config.json";

/// Sprig configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Options handed to the template compiler
    #[serde(default)]
    pub compiler_options: CompileOptions,

    /// Partial templates by name, paths relative to the config file
    #[serde(default)]
    pub partials: BTreeMap<String, String>,

    #[serde(skip)]
    root: PathBuf,
}

impl Config {
    /// Load config from an explicit path, or from `cwd` if one exists there
    pub fn load(cwd: &str, explicit: Option<&Path>) -> anyhow::Result<Self> {
        let config_path = match explicit {
            Some(path) => PathBuf::from(cwd).join(path),
            None => PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME),
        };

        if !config_path.exists() {
            if explicit.is_some() {
                anyhow::bail!("Config file does not exist: {}", config_path.display());
            }
            return Ok(Config {
                root: PathBuf::from(cwd),
                ..Config::default()
            });
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let mut config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", config_path.display()))?;
        config.root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(cwd));
        tracing::debug!(path = %config_path.display(), partials = config.partials.len(), "loaded config");
        Ok(config)
    }

    pub fn partial_path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Build a compiler with the configured options and partials
    ///
    /// Partials are compiled in name order, each seeing the ones before it.
    pub fn compiler(&self) -> anyhow::Result<Compiler> {
        let mut compiler = Compiler::new().options(self.compiler_options.clone());
        for (name, relative) in &self.partials {
            let path = self.partial_path(relative);
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read partial `{}` at {}", name, path.display()))?;
            let template = compiler
                .compile(&source)
                .with_context(|| format!("Failed to compile partial `{}`", name))?;
            compiler = compiler.partial(name.clone(), template);
        }
        Ok(compiler)
    }
}
