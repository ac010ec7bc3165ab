// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! MetaMask contract metadata submissions.
//!
//! The registry keeps a single `contract-map.json` object keyed by lowercase
//! address and only covers Ethereum mainnet. Existing entries are kept as raw
//! JSON so shapes this crate does not model (ERC-721 entries, extra fields)
//! survive a round-trip untouched.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::{Provider, ProviderKind, ProviderOutcome, SubmittedToken};
use crate::{
    error::Error,
    merge::{address_key, merge},
    pull_request::{self, PullRequestDraft, SubmissionContext},
    store,
    token::{CanonicalTokenList, ETHEREUM_MAINNET, Token},
};

/// Default location of the contract map inside the registry checkout.
pub const DEFAULT_CONTRACT_MAP: &str = "contract-map.json";

/// Record shape of a contract map entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct ContractEntry
{
    /// Token name.
    pub name:     String,
    /// Logo file name inside the registry `images/` directory.
    pub logo:     String,
    /// Always `true` for fungible tokens.
    pub erc20:    bool,
    /// Ticker symbol.
    pub symbol:   String,
    /// Number of decimals.
    pub decimals: u8,
}

impl ContractEntry
{
    /// Builds the entry for a canonical token.
    pub fn from_token(token: &Token,) -> Self
    {
        Self {
            name:     token.name.clone(),
            logo:     logo_file_name(token,),
            erc20:    true,
            symbol:   token.symbol.clone(),
            decimals: token.decimals,
        }
    }
}

/// Result of merging canonical tokens into a contract map.
#[derive(Debug, Clone, PartialEq,)]
pub struct MetaMaskDelta
{
    /// Updated contract map, existing keys first.
    pub store:      Map<String, Value,>,
    /// Entries appended by this merge, keyed by lowercase address.
    pub added:      Vec<(String, Value,),>,
    /// Mainnet tokens considered for submission.
    pub eligible:   usize,
    /// Mainnet tokens dropped as duplicates.
    pub duplicates: usize,
}

impl MetaMaskDelta
{
    /// Number of entries added.
    pub fn added_count(&self,) -> usize
    {
        self.added.len()
    }
}

/// Returns the logo file name for a token.
///
/// Uses the last path segment of `logoURI`, falling back to
/// `<address>.png` when the URI is missing or ends with a slash.
pub fn logo_file_name(token: &Token,) -> String
{
    token
        .logo_uri
        .as_deref()
        .and_then(|uri| uri.rsplit('/',).next(),)
        .filter(|segment| !segment.is_empty(),)
        .map_or_else(|| format!("{}.png", token.address), str::to_owned,)
}

/// Merges the mainnet subset of `tokens` into `existing`.
///
/// Tokens on any other chain are ignored without a warning; they are simply
/// out of scope for this registry.
pub fn transform(tokens: &[Token], existing: Map<String, Value,>,) -> MetaMaskDelta
{
    let mainnet: Vec<&Token,> =
        tokens.iter().filter(|token| token.chain_id == ETHEREUM_MAINNET,).collect();

    let candidates: Vec<(String, Value,),> = mainnet
        .iter()
        .map(|token| {
            let entry = ContractEntry::from_token(token,);
            (address_key(&token.address,), entry_value(&entry,),)
        },)
        .collect();

    let existing: Vec<(String, Value,),> = existing.into_iter().collect();
    let outcome = merge(existing, candidates, |(address, _,)| address_key(address,),);

    MetaMaskDelta {
        store:      outcome.store.into_iter().collect(),
        added:      outcome.added,
        eligible:   mainnet.len(),
        duplicates: outcome.duplicates,
    }
}

fn entry_value(entry: &ContractEntry,) -> Value
{
    let mut object = Map::with_capacity(5,);
    object.insert("name".to_owned(), Value::from(entry.name.clone(),),);
    object.insert("logo".to_owned(), Value::from(entry.logo.clone(),),);
    object.insert("erc20".to_owned(), Value::from(entry.erc20,),);
    object.insert("symbol".to_owned(), Value::from(entry.symbol.clone(),),);
    object.insert("decimals".to_owned(), Value::from(entry.decimals,),);
    Value::Object(object,)
}

/// Contract map submission rooted in a MetaMask registry checkout.
#[derive(Debug, Clone,)]
pub struct MetaMaskProvider
{
    contract_map: PathBuf,
}

impl MetaMaskProvider
{
    /// Creates a provider writing to `contract_map`.
    pub fn new(contract_map: impl Into<PathBuf,>,) -> Self
    {
        Self {
            contract_map: contract_map.into(),
        }
    }
}

impl Provider for MetaMaskProvider
{
    fn kind(&self,) -> ProviderKind
    {
        ProviderKind::MetaMask
    }

    fn submit(&self, list: &CanonicalTokenList,) -> Result<ProviderOutcome, Error,>
    {
        let eligible = list.on_chain(ETHEREUM_MAINNET,).count();
        if eligible == 0 {
            info!("No Ethereum mainnet tokens found, skipping MetaMask");
            return Ok(ProviderOutcome::default(),);
        }

        info!("Found {} Ethereum token(s) for MetaMask", eligible);
        let existing = store::load_object(&self.contract_map,)?;
        debug!("Contract map holds {} entries", existing.len());

        let delta = transform(&list.tokens, existing,);

        let mut outcome = ProviderOutcome {
            eligible: delta.eligible,
            duplicates: delta.duplicates,
            ..ProviderOutcome::default()
        };

        if delta.added.is_empty() {
            info!("All Ethereum tokens already exist in {}", self.contract_map.display());
            return Ok(outcome,);
        }

        store::write_json(&self.contract_map, &delta.store,)?;
        info!("Added {} new token(s) to {}", delta.added_count(), self.contract_map.display());

        outcome.added = delta
            .added
            .iter()
            .filter_map(|(address, _,)| {
                list.on_chain(ETHEREUM_MAINNET,).find(|token| &token.address == address,)
            },)
            .map(|token| SubmittedToken::from_token(token, None,),)
            .collect();
        outcome.networks = vec!["ethereum".to_owned()];
        outcome.modified_files = vec![self.contract_map.clone()];
        Ok(outcome,)
    }

    fn draft(&self, context: &SubmissionContext, outcome: &ProviderOutcome,) -> PullRequestDraft
    {
        pull_request::metamask_draft(context, &outcome.added,)
    }
}
