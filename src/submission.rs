// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Submission orchestration across providers.
//!
//! The canonical list is loaded once; each selected provider then runs in
//! turn. A provider error is recorded as a `failed` summary and the remaining
//! providers still run.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::{
    chain::ChainRegistry,
    config::SubmissionConfig,
    error::Error,
    provider::{
        Provider, ProviderKind, ProviderOutcome, SkippedChain, SubmissionStatus, SubmittedToken,
        metamask::MetaMaskProvider, uniswap::UniswapProvider,
    },
    pull_request::{PullRequestDraft, SubmissionContext},
    store,
    token::{CanonicalTokenList, load_token_list},
};

/// Per-provider details recorded in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize,)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDetails
{
    /// Human readable outcome.
    pub message:        String,
    /// Tokens that passed the provider's chain filter.
    pub eligible:       usize,
    /// Candidates dropped as duplicates.
    pub duplicates:     usize,
    /// Networks that received tokens.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub networks:       Vec<String,>,
    /// Chains dropped because they could not be resolved.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_chains: Vec<SkippedChain,>,
    /// Store files written.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modified_files: Vec<PathBuf,>,
    /// Tokens added to the store.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tokens:         Vec<SubmittedToken,>,
    /// Commit and pull-request texts, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request:   Option<PullRequestDraft,>,
    /// Failure description, present when the provider failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error:          Option<String,>,
}

/// Outcome of one provider run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSummary
{
    /// Provider that ran.
    pub provider:    ProviderKind,
    /// Terminal status.
    pub status:      SubmissionStatus,
    /// Number of tokens added.
    pub added_count: usize,
    /// Completion time.
    pub timestamp:   DateTime<Utc,>,
    /// Additional information.
    pub details:     SummaryDetails,
}

impl ProviderSummary
{
    fn from_outcome(
        provider: &dyn Provider,
        context: &SubmissionContext,
        outcome: ProviderOutcome,
    ) -> Self
    {
        let kind = provider.kind();
        let status = outcome.status();
        let message = match status {
            SubmissionStatus::Success => {
                format!("Added {} token(s) to {kind}", outcome.added.len())
            }
            SubmissionStatus::NoChanges => format!("All tokens already exist in {kind}"),
            SubmissionStatus::Skipped => format!("No eligible tokens for {kind}"),
            SubmissionStatus::Failed => format!("{kind} submission failed"),
        };
        let pull_request = (status == SubmissionStatus::Success)
            .then(|| provider.draft(context, &outcome,),);

        Self {
            provider: kind,
            status,
            added_count: outcome.added.len(),
            timestamp: Utc::now(),
            details: SummaryDetails {
                message,
                eligible: outcome.eligible,
                duplicates: outcome.duplicates,
                networks: outcome.networks,
                skipped_chains: outcome.skipped_chains,
                modified_files: outcome.modified_files,
                tokens: outcome.added,
                pull_request,
                error: None,
            },
        }
    }

    fn failed(kind: ProviderKind, failure: &Error,) -> Self
    {
        Self {
            provider:    kind,
            status:      SubmissionStatus::Failed,
            added_count: 0,
            timestamp:   Utc::now(),
            details:     SummaryDetails {
                message: format!("{kind} submission failed"),
                error: Some(failure.to_display_string(),),
                ..SummaryDetails::default()
            },
        }
    }
}

/// Summaries of every provider that ran, in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize,)]
pub struct SubmissionSummary
{
    /// One entry per selected provider.
    pub providers: Vec<ProviderSummary,>,
}

impl SubmissionSummary
{
    /// Returns `true` when any provider failed.
    pub fn has_failures(&self,) -> bool
    {
        self.providers.iter().any(|summary| summary.status == SubmissionStatus::Failed,)
    }

    /// Summary of `kind`, when it ran.
    pub fn get(&self, kind: ProviderKind,) -> Option<&ProviderSummary,>
    {
        self.providers.iter().find(|summary| summary.provider == kind,)
    }
}

/// Builds the provider for `kind` from the configured working directories.
pub fn build_provider(
    kind: ProviderKind,
    config: &SubmissionConfig,
    registry: &ChainRegistry,
) -> Box<dyn Provider,>
{
    match kind {
        ProviderKind::MetaMask => Box::new(MetaMaskProvider::new(config.metamask.contract_map_path(),),),
        ProviderKind::Uniswap => {
            Box::new(UniswapProvider::new(config.uniswap.tokens_path(), registry.clone(),),)
        }
    }
}

/// Runs a single provider and turns its result into a summary.
pub fn run_provider(
    provider: &dyn Provider,
    list: &CanonicalTokenList,
    context: &SubmissionContext,
) -> ProviderSummary
{
    let kind = provider.kind();
    info!("Running {kind} submission");
    match provider.submit(list,) {
        Ok(outcome,) => {
            for skipped in &outcome.skipped_chains {
                warn!("{kind}: {skipped}");
            }
            let summary = ProviderSummary::from_outcome(provider, context, outcome,);
            info!("{kind}: {}", summary.details.message);
            summary
        }
        Err(failure,) => {
            error!("{kind} submission failed: {failure}");
            ProviderSummary::failed(kind, &failure,)
        }
    }
}

/// Loads the canonical list and runs every provider in `kinds`.
///
/// # Errors
///
/// Returns an [`Error`] when the canonical list cannot be read or violates
/// the schema; no provider runs in that case. Provider failures are reported
/// inside the summary instead.
pub fn run_submission(
    config: &SubmissionConfig,
    context: &SubmissionContext,
    kinds: &[ProviderKind],
) -> Result<SubmissionSummary, Error,>
{
    let list = load_token_list(&config.token_list,)?;
    info!("Loaded {} token(s) from {}", list.len(), config.token_list.display());

    let registry = ChainRegistry::builtin().extend(&config.networks,);
    let providers = kinds
        .iter()
        .map(|kind| {
            let provider = build_provider(*kind, config, &registry,);
            run_provider(provider.as_ref(), &list, context,)
        },)
        .collect();

    Ok(SubmissionSummary {
        providers,
    },)
}

/// Merges `summary` into the aggregate summary file at `path`.
///
/// Entries of providers that did not run are kept.
///
/// # Errors
///
/// Returns [`Error::Schema`] when the existing file is not a JSON object and
/// [`Error::Write`] when it cannot be written.
pub fn write_summary(path: &Path, summary: &SubmissionSummary,) -> Result<(), Error,>
{
    let mut aggregate = store::load_object(path,)?;
    for provider in &summary.providers {
        let value: Value = serde_json::to_value(provider,)?;
        aggregate.insert(provider.provider.summary_key().to_owned(), value,);
    }

    store::write_json(path, &aggregate,)?;
    info!("Wrote submission summary to {}", path.display());
    Ok((),)
}
