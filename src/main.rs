// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Command-line interface for the tokensub binary.
//!
//! JSON results go to stdout and logs go to stderr, so the output can be piped
//! straight into workflow steps.

use std::{io, path::PathBuf, process};

use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use tokensub::{
    ChainRegistry, DEFAULT_CONFIG_FILE, Error, ProviderKind, SubmissionConfig, SubmissionContext,
    discover_assets, load_config, run_submission, validate_assets, write_json, write_summary,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Submit a canonical token list to wallet and DEX registries.
#[derive(Debug, Parser,)]
#[command(name = "tokensub", version, about = "Submit token lists to MetaMask and Uniswap registries")]
struct Cli
{
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand,)]
/// Supported commands exposed by the CLI.
enum Command
{
    /// Merge the canonical list into the prepared registry checkouts.
    Submit(SubmitArgs,),
    /// Validate logo assets and write a report.
    #[command(name = "validate-logos")]
    ValidateLogos(ValidateLogosArgs,),
    /// List the chain id to network name table.
    Networks(NetworksArgs,),
}

/// Options shared by every subcommand.
#[derive(Debug, Args,)]
struct CommonArgs
{
    /// Path to the YAML configuration file; missing files use defaults.
    #[arg(long = "config", value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

#[derive(Debug, Args,)]
struct SubmitArgs
{
    #[command(flatten)]
    common: CommonArgs,

    /// Registries to submit to; all of them when omitted.
    #[arg(long = "provider", value_enum, value_name = "NAME")]
    providers: Vec<ProviderKind,>,

    /// Owner of the repository hosting the canonical list.
    #[arg(long = "repo-owner", env = "REPO_OWNER", value_name = "OWNER")]
    repo_owner: String,

    /// Account that pushes branches and opens pull requests.
    #[arg(long = "actor", env = "GITHUB_ACTOR", value_name = "LOGIN", default_value = "tokensub-bot")]
    actor: String,

    /// Public URL of the canonical list.
    #[arg(long = "token-list-url", env = "TOKEN_LIST_URL", value_name = "URL")]
    token_list_url: Option<String,>,

    /// Canonical token list, overriding the configuration.
    #[arg(long = "token-list", value_name = "PATH")]
    token_list: Option<PathBuf,>,

    /// MetaMask contract metadata checkout.
    #[arg(long = "metamask-dir", value_name = "DIR")]
    metamask_dir: Option<PathBuf,>,

    /// Uniswap default token list checkout.
    #[arg(long = "uniswap-dir", value_name = "DIR")]
    uniswap_dir: Option<PathBuf,>,

    /// Aggregate summary destination, overriding the configuration.
    #[arg(long = "summary", value_name = "PATH")]
    summary: Option<PathBuf,>,
}

#[derive(Debug, Args,)]
struct ValidateLogosArgs
{
    #[command(flatten)]
    common: CommonArgs,

    /// Asset roots to walk, replacing the configured ones.
    #[arg(long = "root", value_name = "DIR")]
    roots: Vec<PathBuf,>,

    /// Individual files to validate, replacing the configured ones.
    #[arg(long = "file", value_name = "PATH")]
    files: Vec<PathBuf,>,

    /// Report destination, overriding the configuration.
    #[arg(long = "report", value_name = "PATH")]
    report: Option<PathBuf,>,
}

#[derive(Debug, Args,)]
struct NetworksArgs
{
    #[command(flatten)]
    common: CommonArgs,
}

/// Entry point that reports errors and sets the appropriate exit status.
fn main()
{
    init_tracing();

    if let Err(error,) = run() {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

fn init_tracing()
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),);
    tracing_subscriber::fmt().with_env_filter(filter,).with_writer(io::stderr,).init();
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates loader and writer errors, and reports failed providers or
/// rejected logos as a validation error so the process exits non-zero.
fn run() -> Result<(), Error,>
{
    let cli = Cli::parse();

    match cli.command {
        Command::Submit(args,) => run_submit(args,),
        Command::ValidateLogos(args,) => run_validate_logos(args,),
        Command::Networks(args,) => run_networks(args,),
    }
}

fn run_submit(args: SubmitArgs,) -> Result<(), Error,>
{
    let mut config = load_config(&args.common.config,)?;
    apply_submit_overrides(&mut config, &args,);

    let context = SubmissionContext {
        repo_owner:        args.repo_owner.clone(),
        actor:             args.actor.clone(),
        source_repository: config.source_repository.clone(),
        token_list_url:    args.token_list_url.clone().or_else(|| config.token_list_url.clone(),),
    };
    let providers =
        if args.providers.is_empty() { ProviderKind::ALL.to_vec() } else { args.providers.clone() };

    let summary = run_submission(&config, &context, &providers,)?;
    write_summary(&config.summary, &summary,)?;
    write_output(&mut io::stdout().lock(), &summary, args.common.pretty,)?;

    if summary.has_failures() {
        return Err(Error::validation("one or more providers failed",),);
    }

    Ok((),)
}

fn apply_submit_overrides(config: &mut SubmissionConfig, args: &SubmitArgs,)
{
    if let Some(token_list,) = &args.token_list {
        config.token_list = token_list.clone();
    }
    if let Some(dir,) = &args.metamask_dir {
        config.metamask.workdir = dir.clone();
    }
    if let Some(dir,) = &args.uniswap_dir {
        config.uniswap.workdir = dir.clone();
    }
    if let Some(summary,) = &args.summary {
        config.summary = summary.clone();
    }
}

fn run_validate_logos(args: ValidateLogosArgs,) -> Result<(), Error,>
{
    let mut config = load_config(&args.common.config,)?;
    if !args.roots.is_empty() {
        config.logos.roots = args.roots.clone();
    }
    if !args.files.is_empty() {
        config.logos.files = args.files.clone();
    }
    if let Some(report,) = &args.report {
        config.logos.report = report.clone();
    }

    let assets = discover_assets(&config.logos,)?;
    let report = validate_assets(&assets, &config.logos.rules,);
    write_json(&config.logos.report, &report,)?;
    info!("Wrote validation report to {}", config.logos.report.display());
    write_output(&mut io::stdout().lock(), &report, args.common.pretty,)?;

    if !report.passed() {
        return Err(Error::validation(format!(
            "{} logo(s) failed validation",
            report.errors.len()
        ),),);
    }

    Ok((),)
}

fn run_networks(args: NetworksArgs,) -> Result<(), Error,>
{
    let config = load_config(&args.common.config,)?;
    let registry = ChainRegistry::builtin().extend(&config.networks,);
    write_output(&mut io::stdout().lock(), &registry.networks(), args.common.pretty,)
}

fn write_output<W, T,>(writer: &mut W, value: &T, pretty: bool,) -> Result<(), Error,>
where
    W: io::Write,
    T: Serialize + ?Sized,
{
    if pretty {
        serde_json::to_writer_pretty(writer, value,)?;
    } else {
        serde_json::to_writer(writer, value,)?;
    }

    Ok((),)
}
