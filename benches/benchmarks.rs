// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

use std::{collections::HashMap, path::Path};

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::{Map, Value};
use tokensub::{
    ChainRegistry, address_key, merge, parse_token_list,
    provider::{metamask, uniswap},
};

const CHAINS: [u64; 4] = [1, 10, 137, 42161];

fn token_list_json(count: usize,) -> String
{
    let tokens: Vec<String,> = (0..count)
        .map(|i| {
            format!(
                r#"{{"chainId":{},"address":"0x{i:040X}","symbol":"TK{i}","name":"Token {i}","decimals":18,"logoURI":"https://assets.example/{i}.png"}}"#,
                CHAINS[i % CHAINS.len()]
            )
        },)
        .collect();
    format!(r#"{{"name":"Bench","tokens":[{}]}}"#, tokens.join(",",))
}

fn benchmark_parse_token_list(c: &mut Criterion,)
{
    let json = token_list_json(500,);

    c.bench_function("parse_500_tokens", |b| {
        b.iter(|| {
            parse_token_list(black_box(&json,), Path::new("tokenlist.json",),)
                .expect("parse failed",)
        },)
    },);
}

fn benchmark_merge(c: &mut Criterion,)
{
    let existing: Vec<String,> = (0..1_000).map(|i| format!("0x{i:040x}"),).collect();
    let candidates: Vec<String,> = (500..1_500).map(|i| format!("0x{i:040X}"),).collect();

    c.bench_function("merge_1000_into_1000", |b| {
        b.iter(|| {
            let outcome = merge(
                black_box(existing.clone(),),
                black_box(candidates.clone(),),
                |address| address_key(address,),
            );
            black_box(outcome.added.len(),)
        },)
    },);
}

fn benchmark_metamask_transform(c: &mut Criterion,)
{
    let list = parse_token_list(&token_list_json(1_000,), Path::new("tokenlist.json",),)
        .expect("parse failed",);
    let seeded = metamask::transform(&list.tokens[..500], Map::new(),).store;

    c.bench_function("metamask_transform_half_known", |b| {
        b.iter(|| {
            let delta = metamask::transform(black_box(&list.tokens,), seeded.clone(),);
            black_box(delta.added_count(),)
        },)
    },);
}

fn benchmark_uniswap_transform(c: &mut Criterion,)
{
    let list = parse_token_list(&token_list_json(1_000,), Path::new("tokenlist.json",),)
        .expect("parse failed",);
    let registry = ChainRegistry::default();
    let stores: HashMap<String, Vec<Value,>,> = HashMap::new();

    c.bench_function("uniswap_transform_four_networks", |b| {
        b.iter(|| {
            uniswap::transform(black_box(&list.tokens,), &registry, &stores,)
                .expect("transform failed",)
        },)
    },);
}

criterion_group!(
    benches,
    benchmark_parse_token_list,
    benchmark_merge,
    benchmark_metamask_transform,
    benchmark_uniswap_transform
);
criterion_main!(benches);
