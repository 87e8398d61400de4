/*
 * Copyright © 2026, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */
#![allow(unused)]

use clap::Parser;
use lazy_static::lazy_static;
use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use odin_sbs::{load_config, FeedClient, FeedConfig, RawTableWriter, TcpSource};

#[derive(Parser)]
#[command(about="record SBS MSG lines from a live feed into a raw table")]
struct CliOpts {
    #[arg(short='n', long, default_value_t=5000, help="number of MSG lines to record")]
    messages: usize,

    #[arg(short, long, default_value="test_data_dashboard.csv", help="raw table filename, relative to PROJECT_ROOT")]
    output: String,

    #[arg(long, help="RON feed config to use instead of HOST/PORT/PROJECT_ROOT environment variables")]
    config: Option<String>,
}

lazy_static! { static ref ARGS: CliOpts = CliOpts::parse(); }

#[tokio::main]
async fn main ()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("info")))
        .init();

    // fail before we touch the network if the configuration is unusable
    let config: FeedConfig = match &ARGS.config {
        Some(path) => load_config( path)?,
        None => FeedConfig::from_env()?
    };

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler( move || {
            eprintln!("\nstop requested");
            cancel.cancel();
        })?;
    }

    let path = config.data_path( &ARGS.output);
    let mut sink = RawTableWriter::create( &path)?;
    let mut client = FeedClient::new( TcpSource::from_config( &config), config.clone(), cancel);

    println!("--- acquisition from {} into {:?}", config.addr(), path);
    let outcome = client.run( ARGS.messages, &mut sink).await?;

    println!("--- {outcome}");
    println!("data saved in {:?} ({} rows)", sink.path(), sink.n_rows());
    Ok(())
}
