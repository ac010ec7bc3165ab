// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Registry-specific transformers.
//!
//! Each registry implements [`Provider`]: it maps canonical tokens into its
//! own record shape, merges them into its store through
//! [`merge`](crate::merge()) and persists the result. Adding a registry means
//! adding one module and one [`ProviderKind`] variant.

pub mod metamask;
pub mod uniswap;

use std::{fmt, path::PathBuf};

use serde::Serialize;

use crate::{
    error::Error,
    pull_request::{PullRequestDraft, SubmissionContext},
    token::{CanonicalTokenList, Token},
};

/// Registries supported by the submission engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum,)]
pub enum ProviderKind
{
    /// MetaMask contract metadata (`contract-map.json`, Ethereum only).
    #[serde(rename = "MetaMask")]
    #[value(name = "metamask")]
    MetaMask,
    /// Uniswap default token list (one file per network).
    #[serde(rename = "Uniswap")]
    #[value(name = "uniswap")]
    Uniswap,
}

impl ProviderKind
{
    /// All providers in their default execution order.
    pub const ALL: [ProviderKind; 2] = [ProviderKind::MetaMask, ProviderKind::Uniswap,];

    /// Display name used in summaries and logs.
    pub fn display_name(self,) -> &'static str
    {
        match self {
            Self::MetaMask => "MetaMask",
            Self::Uniswap => "Uniswap",
        }
    }

    /// Key used for this provider inside the aggregate summary file.
    pub fn summary_key(self,) -> &'static str
    {
        match self {
            Self::MetaMask => "metamask",
            Self::Uniswap => "uniswap",
        }
    }
}

impl fmt::Display for ProviderKind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.write_str(self.display_name(),)
    }
}

/// Terminal state of a provider run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize,)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus
{
    /// At least one token was added and the store was written.
    Success,
    /// Every eligible token already existed; nothing was written.
    NoChanges,
    /// The provider had no eligible tokens at all.
    Skipped,
    /// The run aborted before touching the store.
    Failed,
}

/// Token accepted into a provider store during this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedToken
{
    /// Chain id of the token.
    pub chain_id: u64,
    /// Network bucket the token landed in, when the provider has buckets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network:  Option<String,>,
    /// Lowercase contract address.
    pub address:  String,
    /// Ticker symbol.
    pub symbol:   String,
    /// Human readable name.
    pub name:     String,
    /// Number of decimals.
    pub decimals: u8,
    /// Logo location from the canonical list.
    #[serde(rename = "logoURI", skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String,>,
}

impl SubmittedToken
{
    pub(crate) fn from_token(token: &Token, network: Option<&str,>,) -> Self
    {
        Self {
            chain_id: token.chain_id,
            network:  network.map(str::to_owned,),
            address:  token.address.clone(),
            symbol:   token.symbol.clone(),
            name:     token.name.clone(),
            decimals: token.decimals,
            logo_uri: token.logo_uri.clone(),
        }
    }
}

/// Tokens dropped because their chain id has no registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
#[serde(rename_all = "camelCase")]
pub struct SkippedChain
{
    /// Unresolvable chain id.
    pub chain_id: u64,
    /// Number of tokens dropped for this chain.
    pub tokens:   usize,
}

impl fmt::Display for SkippedChain
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        write!(f, "skipped {} token(s) on unsupported chain {}", self.tokens, self.chain_id)
    }
}

/// Everything a provider run reports back to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Default,)]
pub struct ProviderOutcome
{
    /// Tokens that passed the provider's chain filter.
    pub eligible:       usize,
    /// Candidates dropped as duplicates of stored or earlier entries.
    pub duplicates:     usize,
    /// Tokens appended to the store.
    pub added:          Vec<SubmittedToken,>,
    /// Networks that received at least one token.
    pub networks:       Vec<String,>,
    /// Chains dropped because they could not be resolved.
    pub skipped_chains: Vec<SkippedChain,>,
    /// Store files written by the run.
    pub modified_files: Vec<PathBuf,>,
}

impl ProviderOutcome
{
    /// Derives the terminal status from the counts.
    pub fn status(&self,) -> SubmissionStatus
    {
        if self.eligible == 0 {
            SubmissionStatus::Skipped
        } else if self.added.is_empty() {
            SubmissionStatus::NoChanges
        } else {
            SubmissionStatus::Success
        }
    }
}

/// A registry that can absorb tokens from the canonical list.
pub trait Provider
{
    /// Which registry this is.
    fn kind(&self,) -> ProviderKind;

    /// Transforms, merges and persists the tokens relevant to this registry.
    ///
    /// Implementations must not write anything when they return an error and
    /// must only write stores that actually gained entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] for malformed stores and [`Error::Write`]
    /// when persisting fails.
    fn submit(&self, list: &CanonicalTokenList,) -> Result<ProviderOutcome, Error,>;

    /// Builds commit and pull-request texts for a successful run.
    fn draft(&self, context: &SubmissionContext, outcome: &ProviderOutcome,) -> PullRequestDraft;
}
