// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Configuration document for submission runs.
//!
//! Every field carries a default, so an absent `tokensub.yaml` behaves like an
//! empty document. Identity values (repository owner, actor) are not part of
//! the file; the CLI reads them from flags or the environment.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{self, Error},
    logo::LogoRules,
    provider::{metamask::DEFAULT_CONTRACT_MAP, uniswap::DEFAULT_TOKENS_DIR},
};

/// Default configuration file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tokensub.yaml";

/// Root configuration document.
///
/// # Examples
///
/// ```
/// use tokensub::SubmissionConfig;
///
/// let yaml = r#"
/// token_list: lists/tokenlist.json
/// networks:
///   8453: base
/// "#;
/// let config: SubmissionConfig = serde_yaml::from_str(yaml,).expect("valid configuration",);
/// assert_eq!(config.networks.get(&8453).map(String::as_str), Some("base"));
/// assert_eq!(config.uniswap.tokens_dir.to_str(), Some("src/tokens"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize,)]
#[serde(default)]
pub struct SubmissionConfig
{
    /// Canonical token list.
    pub token_list:        PathBuf,
    /// Aggregate summary written after a submission run.
    pub summary:           PathBuf,
    /// Name of the repository hosting the canonical list.
    pub source_repository: String,
    /// Public URL of the canonical list, derived from the owner when absent.
    pub token_list_url:    Option<String,>,
    /// MetaMask registry checkout.
    pub metamask:          MetaMaskConfig,
    /// Uniswap registry checkout.
    pub uniswap:           UniswapConfig,
    /// Extra or overriding chain id to network name entries.
    pub networks:          BTreeMap<u64, String,>,
    /// Logo discovery and validation settings.
    pub logos:             LogoConfig,
}

impl Default for SubmissionConfig
{
    fn default() -> Self
    {
        Self {
            token_list:        PathBuf::from("tokenlist.json",),
            summary:           PathBuf::from("submission-summary.json",),
            source_repository: "crypto-assets".to_owned(),
            token_list_url:    None,
            metamask:          MetaMaskConfig::default(),
            uniswap:           UniswapConfig::default(),
            networks:          BTreeMap::new(),
            logos:             LogoConfig::default(),
        }
    }
}

/// Location of the MetaMask contract metadata checkout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize,)]
#[serde(default)]
pub struct MetaMaskConfig
{
    /// Working directory prepared by the caller.
    pub workdir:      PathBuf,
    /// Contract map path relative to `workdir`.
    pub contract_map: PathBuf,
}

impl Default for MetaMaskConfig
{
    fn default() -> Self
    {
        Self {
            workdir:      PathBuf::from("metamask-contract-metadata",),
            contract_map: PathBuf::from(DEFAULT_CONTRACT_MAP,),
        }
    }
}

impl MetaMaskConfig
{
    /// Full path of the contract map.
    pub fn contract_map_path(&self,) -> PathBuf
    {
        self.workdir.join(&self.contract_map,)
    }
}

/// Location of the Uniswap default token list checkout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize,)]
#[serde(default)]
pub struct UniswapConfig
{
    /// Working directory prepared by the caller.
    pub workdir:    PathBuf,
    /// Network files directory relative to `workdir`.
    pub tokens_dir: PathBuf,
}

impl Default for UniswapConfig
{
    fn default() -> Self
    {
        Self {
            workdir:    PathBuf::from("uniswap-default-token-list",),
            tokens_dir: PathBuf::from(DEFAULT_TOKENS_DIR,),
        }
    }
}

impl UniswapConfig
{
    /// Full path of the network files directory.
    pub fn tokens_path(&self,) -> PathBuf
    {
        self.workdir.join(&self.tokens_dir,)
    }
}

/// Logo asset discovery settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize,)]
#[serde(default)]
pub struct LogoConfig
{
    /// Directories walked recursively for logo files.
    pub roots:      Vec<PathBuf,>,
    /// Individual files validated before the walked ones, when present.
    pub files:      Vec<PathBuf,>,
    /// File names accepted during the walk; empty accepts any logo format.
    pub file_names: Vec<String,>,
    /// Validation report destination.
    pub report:     PathBuf,
    /// Compliance thresholds.
    pub rules:      LogoRules,
}

impl Default for LogoConfig
{
    fn default() -> Self
    {
        Self {
            roots:      vec![PathBuf::from("blockchains",)],
            files:      vec![PathBuf::from("evm-usd.png",)],
            file_names: vec!["logo.png".to_owned(), "logo.svg".to_owned()],
            report:     PathBuf::from("validation-results.json",),
            rules:      LogoRules::default(),
        }
    }
}

/// Loads the configuration from `path`.
///
/// A missing file yields [`SubmissionConfig::default`].
///
/// # Errors
///
/// Returns [`Error::Io`] when the file exists but cannot be read and
/// [`Error::Config`] when the YAML cannot be decoded.
pub fn load_config(path: &Path,) -> Result<SubmissionConfig, Error,>
{
    match fs::read_to_string(path,) {
        Ok(contents,) => parse_config(&contents,),
        Err(source,) if source.kind() == io::ErrorKind::NotFound => {
            debug!("{} not found, using default configuration", path.display());
            Ok(SubmissionConfig::default(),)
        }
        Err(source,) => Err(error::io_error(path, source,),),
    }
}

/// Parses a configuration document; an empty document yields the defaults.
///
/// # Errors
///
/// Returns [`Error::Config`] when the YAML cannot be decoded.
pub fn parse_config(contents: &str,) -> Result<SubmissionConfig, Error,>
{
    if contents.trim().is_empty() {
        return Ok(SubmissionConfig::default(),);
    }

    Ok(serde_yaml::from_str(contents,)?,)
}
