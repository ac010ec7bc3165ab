// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Chain id to network name resolution.
//!
//! Registries that lay their data out per network (one file per network name)
//! need the canonical network name for every EVM chain id. The table below is
//! the only place that knows about supported networks; configuration may add
//! or override entries without touching any other code.

use std::collections::BTreeMap;

use serde::Serialize;

/// Networks known without any configuration.
const BUILTIN_NETWORKS: &[(u64, &str,)] = &[
    (1, "ethereum",),
    (10, "optimism",),
    (56, "binance-smart-chain",),
    (137, "polygon",),
    (42161, "arbitrum",),
];

/// Lookup table from chain id to canonical network name.
///
/// # Examples
///
/// ```
/// use tokensub::ChainRegistry;
///
/// let registry = ChainRegistry::default();
/// assert_eq!(registry.resolve(137,), Some("polygon"));
/// assert_eq!(registry.resolve(999_999,), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct ChainRegistry
{
    networks: BTreeMap<u64, String,>,
}

/// Single row of the registry, as reported by [`ChainRegistry::networks`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
#[serde(rename_all = "camelCase")]
pub struct Network
{
    /// EVM chain id.
    pub chain_id: u64,
    /// Network name used for store file names.
    pub name:     String,
}

impl Default for ChainRegistry
{
    fn default() -> Self
    {
        Self::builtin()
    }
}

impl ChainRegistry
{
    /// Creates a registry holding only the built-in networks.
    pub fn builtin() -> Self
    {
        let networks = BUILTIN_NETWORKS
            .iter()
            .map(|(chain_id, name,)| (*chain_id, (*name).to_owned(),),)
            .collect();

        Self {
            networks,
        }
    }

    /// Adds or replaces a network entry.
    ///
    /// Names are trimmed; blank names are ignored so a malformed override can
    /// never shadow a working built-in entry.
    pub fn with_network(mut self, chain_id: u64, name: &str,) -> Self
    {
        let trimmed = name.trim();
        if !trimmed.is_empty() {
            self.networks.insert(chain_id, trimmed.to_owned(),);
        }
        self
    }

    /// Applies every override from `overrides` on top of the current table.
    pub fn extend<'a, I,>(self, overrides: I,) -> Self
    where
        I: IntoIterator<Item = (&'a u64, &'a String,),>,
    {
        overrides.into_iter().fold(self, |registry, (chain_id, name,)| {
            registry.with_network(*chain_id, name,)
        },)
    }

    /// Resolves a chain id to its network name.
    ///
    /// Returns `None` for unknown chains. Callers treat that as a reason to
    /// skip the token, never as a failure.
    pub fn resolve(&self, chain_id: u64,) -> Option<&str,>
    {
        self.networks.get(&chain_id,).map(String::as_str,)
    }

    /// Lists all networks in ascending chain id order.
    pub fn networks(&self,) -> Vec<Network,>
    {
        self.networks
            .iter()
            .map(|(chain_id, name,)| Network {
                chain_id: *chain_id,
                name:     name.clone(),
            },)
            .collect()
    }
}
