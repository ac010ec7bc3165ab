// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Uniswap default token list submissions.
//!
//! The registry stores one JSON array per network at
//! `src/tokens/<network>.json`. Deduplication is scoped to the destination
//! network file only.

use std::{collections::HashMap, path::PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::{Provider, ProviderKind, ProviderOutcome, SkippedChain, SubmittedToken};
use crate::{
    chain::ChainRegistry,
    error::Error,
    merge::{address_key, merge},
    pull_request::{self, PullRequestDraft, SubmissionContext},
    store,
    token::{CanonicalTokenList, Token},
};

/// Default token directory inside the registry checkout.
pub const DEFAULT_TOKENS_DIR: &str = "src/tokens";
/// Tag applied to submitted tokens without a `tags` field.
const DEFAULT_TAG: &str = "wrapped";

/// Record shape of a network file entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
#[serde(rename_all = "camelCase")]
pub struct UniswapToken
{
    /// EVM chain id.
    pub chain_id: u64,
    /// Lowercase contract address.
    pub address:  String,
    /// Ticker symbol.
    pub symbol:   String,
    /// Human readable name.
    pub name:     String,
    /// Number of decimals.
    pub decimals: u8,
    /// Logo location.
    #[serde(rename = "logoURI", skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String,>,
    /// Token tags.
    pub tags:     Vec<String,>,
}

impl UniswapToken
{
    /// Builds the record for a canonical token.
    pub fn from_token(token: &Token,) -> Self
    {
        let tags = token.tags.clone().unwrap_or_else(|| vec![DEFAULT_TAG.to_owned()],);

        Self {
            chain_id: token.chain_id,
            address: address_key(&token.address,),
            symbol: token.symbol.clone(),
            name: token.name.clone(),
            decimals: token.decimals,
            logo_uri: token.logo_uri.clone(),
            tags,
        }
    }

    fn to_value(&self,) -> Result<Value, Error,>
    {
        Ok(serde_json::to_value(self,)?,)
    }
}

/// Source of the existing token sequence for a network.
pub trait NetworkSource
{
    /// Loads the stored entries for `network`; a missing store is empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] when the stored document is malformed.
    fn load(&self, network: &str,) -> Result<Vec<Value,>, Error,>;
}

/// Network files laid out as `<dir>/<network>.json`.
#[derive(Debug, Clone,)]
pub struct TokenDirectory
{
    root: PathBuf,
}

impl TokenDirectory
{
    /// Creates a directory-backed source rooted at `root`.
    pub fn new(root: impl Into<PathBuf,>,) -> Self
    {
        Self {
            root: root.into(),
        }
    }

    /// File holding the entries of `network`.
    pub fn path_for(&self, network: &str,) -> PathBuf
    {
        self.root.join(format!("{network}.json"),)
    }
}

impl NetworkSource for TokenDirectory
{
    fn load(&self, network: &str,) -> Result<Vec<Value,>, Error,>
    {
        store::load_address_array(&self.path_for(network,),)
    }
}

impl NetworkSource for HashMap<String, Vec<Value,>,>
{
    fn load(&self, network: &str,) -> Result<Vec<Value,>, Error,>
    {
        Ok(self.get(network,).cloned().unwrap_or_default(),)
    }
}

/// Merge result for a single network file.
#[derive(Debug, Clone, PartialEq,)]
pub struct NetworkDelta
{
    /// Network name, also the file stem.
    pub network:    String,
    /// Full updated sequence, existing entries first.
    pub store:      Vec<Value,>,
    /// Entries appended by this merge.
    pub added:      Vec<Value,>,
    /// Canonical tokens that produced the appended entries.
    pub tokens:     Vec<Token,>,
    /// Candidates dropped as duplicates.
    pub duplicates: usize,
}

impl NetworkDelta
{
    /// Returns `true` when this network gained entries.
    pub fn changed(&self,) -> bool
    {
        !self.added.is_empty()
    }
}

/// Result of merging canonical tokens into every network file.
#[derive(Debug, Clone, PartialEq,)]
pub struct UniswapDelta
{
    /// One delta per resolved network, in first-appearance order.
    pub networks:       Vec<NetworkDelta,>,
    /// Chains dropped because the registry could not resolve them.
    pub skipped_chains: Vec<SkippedChain,>,
    /// `true` when at least one network gained a token.
    pub files_modified: bool,
}

/// Groups `tokens` by network and merges each group into its stored sequence.
///
/// Nothing is written here. Every network is loaded and merged before the
/// caller decides to persist, so a malformed file aborts the whole provider.
///
/// # Errors
///
/// Propagates [`Error::Schema`] from `source`.
pub fn transform<S,>(
    tokens: &[Token],
    registry: &ChainRegistry,
    source: &S,
) -> Result<UniswapDelta, Error,>
where
    S: NetworkSource + ?Sized,
{
    let mut groups: Vec<(u64, Vec<&Token,>,),> = Vec::new();
    for token in tokens {
        match groups.iter_mut().find(|(chain_id, _,)| *chain_id == token.chain_id,) {
            Some((_, members,),) => members.push(token,),
            None => groups.push((token.chain_id, vec![token],),),
        }
    }

    let mut buckets: Vec<(String, Vec<&Token,>,),> = Vec::new();
    let mut skipped_chains = Vec::new();
    for (chain_id, members,) in groups {
        let Some(network,) = registry.resolve(chain_id,) else {
            let skipped = SkippedChain {
                chain_id,
                tokens: members.len(),
            };
            warn!("{skipped}");
            skipped_chains.push(skipped,);
            continue;
        };

        match buckets.iter_mut().find(|(name, _,)| name == network,) {
            Some((_, existing,),) => existing.extend(members,),
            None => buckets.push((network.to_owned(), members,),),
        }
    }

    let mut networks = Vec::with_capacity(buckets.len(),);
    for (network, members,) in buckets {
        let existing = source.load(&network,)?;
        debug!("{} holds {} existing token(s)", network, existing.len());

        let candidates = members
            .iter()
            .map(|token| {
                UniswapToken::from_token(token,).to_value().map(|item| (item, *token,),)
            },)
            .collect::<Result<Vec<_,>, Error,>>()?;

        let existing: Vec<(Value, Option<&Token,>,),> =
            existing.into_iter().map(|item| (item, None,),).collect();
        let candidates = candidates.into_iter().map(|(item, token,)| (item, Some(token,),),);
        let outcome = merge(existing, candidates, |(item, _,)| {
            store::address_of(item,).map(address_key,).unwrap_or_default()
        },);

        let added_tokens: Vec<Token,> =
            outcome.added.iter().filter_map(|(_, token,)| token.cloned(),).collect();
        networks.push(NetworkDelta {
            network,
            store: outcome.store.into_iter().map(|(item, _,)| item,).collect(),
            added: outcome.added.into_iter().map(|(item, _,)| item,).collect(),
            tokens: added_tokens,
            duplicates: outcome.duplicates,
        },);
    }

    let files_modified = networks.iter().any(NetworkDelta::changed,);
    Ok(UniswapDelta {
        networks,
        skipped_chains,
        files_modified,
    },)
}

/// Default token list submission rooted in a Uniswap registry checkout.
#[derive(Debug, Clone,)]
pub struct UniswapProvider
{
    directory: TokenDirectory,
    registry:  ChainRegistry,
}

impl UniswapProvider
{
    /// Creates a provider writing network files under `tokens_dir`.
    pub fn new(tokens_dir: impl Into<PathBuf,>, registry: ChainRegistry,) -> Self
    {
        Self {
            directory: TokenDirectory::new(tokens_dir,),
            registry,
        }
    }
}

impl Provider for UniswapProvider
{
    fn kind(&self,) -> ProviderKind
    {
        ProviderKind::Uniswap
    }

    fn submit(&self, list: &CanonicalTokenList,) -> Result<ProviderOutcome, Error,>
    {
        if list.is_empty() {
            info!("Token list is empty, skipping Uniswap");
            return Ok(ProviderOutcome::default(),);
        }

        info!("Processing {} token(s) for Uniswap", list.len());
        let delta = transform(&list.tokens, &self.registry, &self.directory,)?;

        let mut outcome = ProviderOutcome {
            eligible: list.len(),
            skipped_chains: delta.skipped_chains.clone(),
            ..ProviderOutcome::default()
        };

        let mut staged = Vec::new();
        for network in &delta.networks {
            outcome.duplicates += network.duplicates;
            if !network.changed() {
                info!("No new tokens for {}", network.network);
                continue;
            }

            let path = self.directory.path_for(&network.network,);
            staged.push((store::stage_json(&path, &network.store,)?, network,),);
        }

        for (write, network,) in staged {
            let path = write.commit().inspect_err(|_| {
                if !outcome.modified_files.is_empty() {
                    error!(
                        "Uniswap write failed after replacing {:?}",
                        outcome.modified_files
                    );
                }
            },)?;
            info!("Added {} new token(s) to {}", network.added.len(), path.display());

            outcome.networks.push(network.network.clone(),);
            outcome.modified_files.push(path,);
            outcome.added.extend(
                network
                    .tokens
                    .iter()
                    .map(|token| SubmittedToken::from_token(token, Some(&network.network,),),),
            );
        }

        if !delta.files_modified {
            info!("No changes to commit, all tokens already exist in Uniswap");
        }

        Ok(outcome,)
    }

    fn draft(&self, context: &SubmissionContext, outcome: &ProviderOutcome,) -> PullRequestDraft
    {
        pull_request::uniswap_draft(context, &outcome.added,)
    }
}
