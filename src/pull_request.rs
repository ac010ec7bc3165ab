// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Commit message and pull-request texts for registry submissions.
//!
//! The engine never talks to git or the GitHub API; it hands these strings to
//! whatever automation stages the modified store files and opens the PR.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::provider::SubmittedToken;

/// Identity and source information supplied by the caller.
///
/// Values usually originate from CI environment variables, but they are read
/// by the CLI and passed in explicitly so the engine stays testable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct SubmissionContext
{
    /// Owner of the repository hosting the canonical list.
    pub repo_owner:        String,
    /// Account that pushes branches and opens pull requests.
    pub actor:             String,
    /// Name of the repository hosting the canonical list.
    pub source_repository: String,
    /// Public URL of the canonical list; derived when `None`.
    pub token_list_url:    Option<String,>,
}

impl SubmissionContext
{
    /// URL of the repository hosting the canonical list.
    pub fn source_url(&self,) -> String
    {
        format!("https://github.com/{}/{}", self.repo_owner, self.source_repository)
    }

    /// Public URL of the canonical list.
    pub fn list_url(&self,) -> String
    {
        self.token_list_url.clone().unwrap_or_else(|| {
            format!(
                "https://raw.githubusercontent.com/{}/{}/main/tokenlist.json",
                self.repo_owner, self.source_repository
            )
        },)
    }
}

/// Texts handed to the collaborator that commits and opens the PR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestDraft
{
    /// Pull-request title, also used as the commit subject.
    pub title:          String,
    /// Full commit message.
    pub commit_message: String,
    /// Markdown pull-request body.
    pub body:           String,
}

/// Drafts the MetaMask contract metadata submission texts.
pub fn metamask_draft(context: &SubmissionContext, added: &[SubmittedToken],) -> PullRequestDraft
{
    let title = format!("Add {} Ethereum token(s) from {}", added.len(), context.repo_owner);

    let mut commit_message = format!(
        "{title}\n\nThis PR adds the following Ethereum tokens to MetaMask contract metadata:\n"
    );
    for token in added {
        let _ = writeln!(commit_message, "- {} ({}) - {}", token.symbol, token.name, token.address);
    }
    let _ = write!(
        commit_message,
        "\nSource: {}\nToken List: {}\n",
        context.source_url(),
        context.list_url()
    );

    let mut body = String::with_capacity(1024,);
    body.push_str("## MetaMask Token Metadata Submission\n\n",);
    let _ = writeln!(body, "This PR adds {} Ethereum token(s) to the contract metadata.\n", added.len());
    body.push_str("### Tokens Submitted:\n",);
    push_token_details(&mut body, added, false,);

    body.push_str("\n### Token Verification:\n",);
    for token in added {
        let _ = writeln!(
            body,
            "- [{} on Etherscan](https://etherscan.io/token/{})",
            token.symbol, token.address
        );
    }

    push_source_section(&mut body, context,);
    body.push_str(
        "\n### Requirements Checklist:\n- [x] All contracts are on Ethereum Mainnet (ChainID: 1)\n- [x] Token addresses are in correct format\n- [x] Metadata follows MetaMask schema\n- [x] Logos are accessible via HTTPS\n- [ ] Contracts verified on Etherscan (please verify manually)\n- [ ] Tokens have sufficient trading volume (please verify manually)\n- [ ] Community adoption proof (please add if available)\n",
    );
    push_footer(&mut body, context,);

    PullRequestDraft {
        title,
        commit_message,
        body,
    }
}

/// Drafts the Uniswap default token list submission texts.
pub fn uniswap_draft(context: &SubmissionContext, added: &[SubmittedToken],) -> PullRequestDraft
{
    let title = format!("Add {} token(s) from {}", added.len(), context.repo_owner);

    let mut commit_message = format!("{title}\n\nThis PR adds the following tokens:\n");
    for token in added {
        let _ = writeln!(
            commit_message,
            "- {} ({}) on chain {}",
            token.symbol, token.name, token.chain_id
        );
    }
    let _ = write!(commit_message, "\nToken list URL: {}\n", context.list_url());

    let mut body = String::with_capacity(1024,);
    body.push_str("## Token Submission\n\n",);
    let _ = writeln!(
        body,
        "This PR adds {} token(s) to the Uniswap default token list.\n",
        added.len()
    );
    body.push_str("### Tokens:\n",);
    push_token_details(&mut body, added, true,);
    push_source_section(&mut body, context,);
    body.push_str(
        "\n### Checklist:\n- [x] Tokens follow the required format\n- [x] Logo URIs are accessible via HTTPS\n- [x] Tokens are on supported networks\n- [x] No duplicate addresses\n",
    );
    push_footer(&mut body, context,);

    PullRequestDraft {
        title,
        commit_message,
        body,
    }
}

fn push_token_details(body: &mut String, added: &[SubmittedToken], with_chain: bool,)
{
    for (index, token,) in added.iter().enumerate() {
        if index > 0 {
            body.push('\n',);
        }
        let _ = writeln!(body, "- **{}** ({})", token.symbol, token.name);
        let _ = writeln!(body, "  - Address: `{}`", token.address);
        if with_chain {
            match token.network.as_deref() {
                Some(network,) => {
                    let _ = writeln!(body, "  - Chain: {} ({network})", token.chain_id);
                }
                None => {
                    let _ = writeln!(body, "  - Chain: {}", token.chain_id);
                }
            }
        }
        let _ = writeln!(body, "  - Decimals: {}", token.decimals);
        if let Some(logo,) = token.logo_uri.as_deref() {
            let _ = writeln!(body, "  - Logo: [View]({logo})");
        }
    }
}

fn push_source_section(body: &mut String, context: &SubmissionContext,)
{
    let _ = write!(
        body,
        "\n### Source Information:\n- **Repository**: {}\n- **Token List URL**: {}\n",
        context.source_url(),
        context.list_url()
    );
}

fn push_footer(body: &mut String, context: &SubmissionContext,)
{
    let _ = write!(
        body,
        "\n---\n*Submitted by {} via automated token list submission from {}*",
        context.actor,
        context.source_url()
    );
}

#[cfg(test)]
mod tests
{
    use super::{SubmissionContext, metamask_draft, uniswap_draft};
    use crate::provider::SubmittedToken;

    fn context() -> SubmissionContext
    {
        SubmissionContext {
            repo_owner:        "example".to_owned(),
            actor:             "example-bot".to_owned(),
            source_repository: "crypto-assets".to_owned(),
            token_list_url:    None,
        }
    }

    fn token(chain_id: u64, network: Option<&str,>,) -> SubmittedToken
    {
        SubmittedToken {
            chain_id,
            network: network.map(str::to_owned,),
            address: "0xabc".to_owned(),
            symbol: "FOO".to_owned(),
            name: "Foo Token".to_owned(),
            decimals: 18,
            logo_uri: Some("https://x/y/foo.png".to_owned(),),
        }
    }

    #[test]
    fn list_url_defaults_to_raw_github_location()
    {
        assert_eq!(
            context().list_url(),
            "https://raw.githubusercontent.com/example/crypto-assets/main/tokenlist.json"
        );
    }

    #[test]
    fn list_url_prefers_explicit_value()
    {
        let context = SubmissionContext {
            token_list_url: Some("https://tokens.example/list.json".to_owned(),),
            ..context()
        };
        assert_eq!(context.list_url(), "https://tokens.example/list.json");
    }

    #[test]
    fn metamask_draft_lists_tokens_and_etherscan_links()
    {
        let draft = metamask_draft(&context(), &[token(1, None,)],);

        assert_eq!(draft.title, "Add 1 Ethereum token(s) from example");
        assert!(draft.commit_message.starts_with("Add 1 Ethereum token(s) from example\n\n"));
        assert!(draft.commit_message.contains("- FOO (Foo Token) - 0xabc"));
        assert!(draft.body.contains("- **FOO** (Foo Token)"));
        assert!(draft.body.contains("https://etherscan.io/token/0xabc"));
        assert!(draft.body.contains("  - Logo: [View](https://x/y/foo.png)"));
        assert!(!draft.body.contains("Chain:"));
    }

    #[test]
    fn uniswap_draft_mentions_chain_and_network()
    {
        let draft = uniswap_draft(&context(), &[token(137, Some("polygon",),)],);

        assert_eq!(draft.title, "Add 1 token(s) from example");
        assert!(draft.commit_message.contains("- FOO (Foo Token) on chain 137"));
        assert!(draft.body.contains("  - Chain: 137 (polygon)"));
        assert!(draft.body.contains("Uniswap default token list"));
    }
}
