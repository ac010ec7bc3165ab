// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Turns a canonical token list into deduplicated registry submissions.
//!
//! The library reads one token list, maps it into the record shapes of the
//! MetaMask contract metadata and the Uniswap default token list, merges the
//! candidates into on-disk stores without ever duplicating an address, and
//! reports what changed. Logo assets are validated by a separate batch
//! checker. Cloning registries, committing and opening pull requests are left
//! to the caller; this crate only produces the updated files and the texts.

mod chain;
mod config;
mod error;
mod logo;
mod merge;
pub mod provider;
mod pull_request;
mod store;
mod submission;
mod token;

pub use chain::{ChainRegistry, Network};
pub use config::{
    DEFAULT_CONFIG_FILE, LogoConfig, MetaMaskConfig, SubmissionConfig, UniswapConfig, load_config,
    parse_config,
};
pub use error::{Error, io_error};
pub use logo::{
    AcceptedLogo, LogoAsset, LogoFormat, LogoRejection, LogoRules, LogoWarning, ReportError,
    ReportWarning, ValidationReport, discover_assets, png_dimensions, validate, validate_assets,
};
pub use merge::{MergeOutcome, address_key, merge};
pub use provider::{
    Provider, ProviderKind, ProviderOutcome, SkippedChain, SubmissionStatus, SubmittedToken,
};
pub use pull_request::{PullRequestDraft, SubmissionContext, metamask_draft, uniswap_draft};
pub use store::{StagedWrite, load_address_array, load_object, read_json, stage_json, write_json};
pub use submission::{
    ProviderSummary, SubmissionSummary, SummaryDetails, build_provider, run_provider,
    run_submission, write_summary,
};
pub use token::{CanonicalTokenList, ETHEREUM_MAINNET, Token, load_token_list, parse_token_list};
