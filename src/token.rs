// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Canonical token list parsing and ingestion normalization.
//!
//! The canonical list is the single source of truth for a submission pass.
//! Every token is normalized exactly once here (lowercase address, trimmed
//! text fields, de-duplicated tags) so providers never repeat that work.

use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{self, Error};

/// Chain id of Ethereum mainnet.
pub const ETHEREUM_MAINNET: u64 = 1;

/// Token record as it appears in the canonical list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct Token
{
    /// EVM chain id the contract is deployed on.
    pub chain_id: u64,
    /// Contract address, lowercase after ingestion.
    pub address:  String,
    /// Ticker symbol.
    pub symbol:   String,
    /// Human readable name.
    pub name:     String,
    /// Number of decimals.
    pub decimals: u8,
    /// Optional logo location.
    #[serde(default, rename = "logoURI", skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String,>,
    /// Optional tags; `None` when the list omits the field entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags:     Option<Vec<String,>,>,
}

/// Ordered canonical token list loaded once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct CanonicalTokenList
{
    /// Tokens in list order.
    pub tokens: Vec<Token,>,
}

#[derive(Debug, Deserialize,)]
struct TokenListDocument
{
    tokens: Vec<Token,>,
}

impl CanonicalTokenList
{
    /// Wraps already normalized tokens.
    pub fn new(tokens: Vec<Token,>,) -> Self
    {
        Self {
            tokens,
        }
    }

    /// Number of tokens in the list.
    pub fn len(&self,) -> usize
    {
        self.tokens.len()
    }

    /// Returns `true` when the list holds no tokens.
    pub fn is_empty(&self,) -> bool
    {
        self.tokens.is_empty()
    }

    /// Iterates over the tokens deployed on `chain_id`, in list order.
    pub fn on_chain(&self, chain_id: u64,) -> impl Iterator<Item = &Token,>
    {
        self.tokens.iter().filter(move |token| token.chain_id == chain_id,)
    }
}

/// Loads the canonical token list from `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read and [`Error::Schema`]
/// when the document is not a token list or a token violates ingestion rules.
pub fn load_token_list(path: &Path,) -> Result<CanonicalTokenList, Error,>
{
    let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
    parse_token_list(&contents, path,)
}

/// Parses a canonical token list document.
///
/// `origin` only labels errors; nothing is read from it.
///
/// # Errors
///
/// Returns [`Error::Schema`] when the JSON is invalid, the `tokens` array is
/// missing, or a token has a blank address, symbol or name.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use tokensub::parse_token_list;
///
/// let json = r#"{"tokens":[{"chainId":1,"address":"0xABC","symbol":"FOO",
///     "name":"Foo","decimals":18}]}"#;
/// let list = parse_token_list(json, Path::new("tokenlist.json",),).expect("valid list",);
/// assert_eq!(list.tokens[0].address, "0xabc");
/// ```
pub fn parse_token_list(contents: &str, origin: &Path,) -> Result<CanonicalTokenList, Error,>
{
    let document: TokenListDocument =
        serde_json::from_str(contents,).map_err(|source| error::schema_error(origin, source,),)?;

    let tokens = document
        .tokens
        .into_iter()
        .enumerate()
        .map(|(index, token,)| normalize_token(token,).map_err(|message| {
            error::schema_error(origin, format!("tokens[{index}]: {message}"),)
        },),)
        .collect::<Result<Vec<_,>, _,>>()?;

    Ok(CanonicalTokenList::new(tokens,),)
}

/// Normalizes a single token in place.
///
/// Returns a plain message so the caller can attach the document location.
fn normalize_token(mut token: Token,) -> Result<Token, String,>
{
    token.address = normalize_address(&token.address,)?;
    token.symbol = required_text(&token.symbol, "symbol",)?;
    token.name = required_text(&token.name, "name",)?;
    token.logo_uri = token
        .logo_uri
        .map(|uri| uri.trim().to_owned(),)
        .filter(|uri| !uri.is_empty(),);
    token.tags = token.tags.map(dedup_tags,);
    Ok(token,)
}

fn normalize_address(input: &str,) -> Result<String, String,>
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("address cannot be empty".to_owned(),);
    }
    if trimmed.chars().any(char::is_whitespace,) {
        return Err(format!("address '{trimmed}' cannot contain whitespace"),);
    }
    Ok(trimmed.to_ascii_lowercase(),)
}

fn required_text(input: &str, field: &str,) -> Result<String, String,>
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} cannot be empty"),);
    }
    Ok(trimmed.to_owned(),)
}

fn dedup_tags(tags: Vec<String,>,) -> Vec<String,>
{
    let mut seen = HashSet::with_capacity(tags.len(),);
    tags.into_iter()
        .map(|tag| tag.trim().to_owned(),)
        .filter(|tag| !tag.is_empty() && seen.insert(tag.clone(),),)
        .collect()
}

#[cfg(test)]
mod tests
{
    use std::{io::Write, path::Path};

    use super::{ETHEREUM_MAINNET, load_token_list, parse_token_list};
    use crate::Error;

    const ORIGIN: &str = "tokenlist.json";

    #[test]
    fn parses_and_lowercases_addresses()
    {
        let json = r#"{
            "name": "Example list",
            "tokens": [
                {"chainId": 1, "address": " 0xABCdef ", "symbol": "FOO", "name": "Foo",
                 "decimals": 18, "logoURI": "https://x/y/foo.png"}
            ]
        }"#;

        let list = parse_token_list(json, Path::new(ORIGIN,),).expect("expected valid list",);
        assert_eq!(list.len(), 1);
        let token = &list.tokens[0];
        assert_eq!(token.address, "0xabcdef");
        assert_eq!(token.logo_uri.as_deref(), Some("https://x/y/foo.png"));
        assert!(token.tags.is_none());
    }

    #[test]
    fn deduplicates_tags_preserving_order()
    {
        let json = r#"{"tokens": [
            {"chainId": 10, "address": "0x1", "symbol": "A", "name": "A", "decimals": 6,
             "tags": ["stablecoin", "wrapped", "stablecoin", " "]}
        ]}"#;

        let list = parse_token_list(json, Path::new(ORIGIN,),).expect("expected valid list",);
        assert_eq!(
            list.tokens[0].tags.as_deref(),
            Some(&["stablecoin".to_owned(), "wrapped".to_owned()][..])
        );
    }

    #[test]
    fn blank_logo_uri_is_treated_as_missing()
    {
        let json = r#"{"tokens": [
            {"chainId": 1, "address": "0x1", "symbol": "A", "name": "A", "decimals": 6,
             "logoURI": "  "}
        ]}"#;

        let list = parse_token_list(json, Path::new(ORIGIN,),).expect("expected valid list",);
        assert!(list.tokens[0].logo_uri.is_none());
    }

    #[test]
    fn rejects_missing_tokens_array()
    {
        let error = parse_token_list(r#"{"name": "empty"}"#, Path::new(ORIGIN,),)
            .expect_err("expected schema error",);
        assert!(matches!(error, Error::Schema { .. }));
    }

    #[test]
    fn rejects_missing_required_fields()
    {
        let json = r#"{"tokens": [{"chainId": 1, "address": "0x1", "symbol": "A"}]}"#;
        let error =
            parse_token_list(json, Path::new(ORIGIN,),).expect_err("expected schema error",);
        assert!(matches!(error, Error::Schema { .. }));
    }

    #[test]
    fn rejects_blank_address_with_index()
    {
        let json = r#"{"tokens": [
            {"chainId": 1, "address": "0x1", "symbol": "A", "name": "A", "decimals": 6},
            {"chainId": 1, "address": "  ", "symbol": "B", "name": "B", "decimals": 6}
        ]}"#;

        let error =
            parse_token_list(json, Path::new(ORIGIN,),).expect_err("expected schema error",);
        match error {
            Error::Schema {
                message, ..
            } => {
                assert_eq!(message, "tokens[1]: address cannot be empty");
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_json()
    {
        let error =
            parse_token_list("not json", Path::new(ORIGIN,),).expect_err("expected schema error",);
        assert!(matches!(error, Error::Schema { .. }));
    }

    #[test]
    fn on_chain_filters_in_list_order()
    {
        let json = r#"{"tokens": [
            {"chainId": 1, "address": "0x1", "symbol": "A", "name": "A", "decimals": 6},
            {"chainId": 137, "address": "0x2", "symbol": "B", "name": "B", "decimals": 6},
            {"chainId": 1, "address": "0x3", "symbol": "C", "name": "C", "decimals": 6}
        ]}"#;

        let list = parse_token_list(json, Path::new(ORIGIN,),).expect("expected valid list",);
        let symbols: Vec<&str,> =
            list.on_chain(ETHEREUM_MAINNET,).map(|token| token.symbol.as_str(),).collect();
        assert_eq!(symbols, ["A", "C"]);
    }

    #[test]
    fn load_token_list_reads_from_disk()
    {
        let mut file = tempfile::NamedTempFile::new().expect("expected temp file",);
        write!(
            file,
            r#"{{"tokens":[{{"chainId":1,"address":"0xAA","symbol":"A","name":"A","decimals":18}}]}}"#
        )
        .expect("expected write to succeed",);

        let list = load_token_list(file.path(),).expect("expected load to succeed",);
        assert_eq!(list.tokens[0].address, "0xaa");
    }

    #[test]
    fn load_token_list_reports_io_errors()
    {
        let error = load_token_list(Path::new("/nonexistent/tokenlist.json",),)
            .expect_err("expected io error",);
        assert!(matches!(error, Error::Io { .. }));
    }
}
