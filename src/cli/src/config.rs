use std::{fs, path::Path};

use color_eyre::eyre::{self, WrapErr};
use color_resolver::ResolverConfig;
use serde::{Deserialize, Serialize};

/// Everything the `-c` file can set.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub resolver: ResolverConfig,
    pub solver: Option<SolverConfig>,
}

/// How to run the external engine that turns a coloring into moves.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SolverConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub input: SolverInput,
    #[serde(default)]
    pub encoding: SolverEncoding,
    /// Working directory under the user cache directory; engines tend to
    /// write their tables to it
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverInput {
    /// The coloring is the last command line argument
    #[default]
    Argument,
    /// The coloring is written to the engine's standard input
    Stdin,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverEncoding {
    #[default]
    Twophase,
    Cubex,
}

fn default_cache_dir() -> String {
    "cube-colors".to_owned()
}

impl CliConfig {
    pub fn load(path: Option<&Path>) -> eyre::Result<Self> {
        let Some(path) = path else {
            return Ok(CliConfig::default());
        };
        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read configuration file {}", path.display()))?;
        let config: CliConfig = toml::from_str(&text)
            .wrap_err_with(|| format!("Failed to parse configuration file {}", path.display()))?;
        config.resolver.validate()?;
        Ok(config)
    }
}
