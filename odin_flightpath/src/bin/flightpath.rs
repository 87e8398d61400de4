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

use std::{path::{Path,PathBuf}, time::Duration};
use clap::Parser;
use lazy_static::lazy_static;
use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{info,warn};
use tracing_subscriber::EnvFilter;
use odin_sbs::{load_config, FeedClient, FeedConfig, FeedOutcome, RawTableWriter, TcpSource};
use odin_flightpath::{run_transform, FlightpathConfig, TableCache, TransformOutcome};

#[derive(Parser)]
#[command(about="ingest SBS messages (if needed) and produce the enriched flight trajectory table")]
struct CliOpts {
    #[arg(long, env="PROJECT_ROOT", default_value=".", help="base directory for relative file names")]
    project_root: PathBuf,

    #[arg(long, default_value="raw_data.csv", help="raw SBS table")]
    raw: PathBuf,

    #[arg(short, long, default_value="flight_data_transformed.csv", help="enriched output table")]
    output: PathBuf,

    #[arg(short='n', long, default_value_t=10000, help="number of MSG lines to ingest")]
    messages: usize,

    #[arg(long, help="ingest even if the raw table already exists")]
    ingest: bool,

    #[arg(long, help="repeat ingestion and transform every <REFRESH> seconds until stopped")]
    refresh: Option<u64>,

    #[arg(long, help="RON transform config (default: Paris restricted zone, UTC)")]
    config: Option<PathBuf>,

    #[arg(long, help="RON feed config to use instead of HOST/PORT environment variables")]
    feed_config: Option<PathBuf>,
}

lazy_static! { static ref ARGS: CliOpts = CliOpts::parse(); }

#[tokio::main]
async fn main ()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("info")))
        .init();

    let config: FlightpathConfig = match &ARGS.config {
        Some(path) => load_config( path)?,
        None => FlightpathConfig::default()
    };

    let raw_path = ARGS.project_root.join( &ARGS.raw);
    let output_path = ARGS.project_root.join( &ARGS.output);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler( move || {
            eprintln!("\nstop requested");
            cancel.cancel();
        })?;
    }

    let mut cache = TableCache::new();
    let mut cycle = 0;

    loop {
        if ARGS.ingest || cycle > 0 || !raw_path.is_file() {
            let outcome = ingest( &raw_path, cancel.clone()).await?;
            println!("--- ingestion {outcome}");
        }

        match run_transform( &raw_path, &output_path, &config)? {
            TransformOutcome::Written{ stats, table } => {
                for s in table.summaries() { println!("{s}"); }
                println!("--- {stats}");
                cache.replace( table);
            }
            TransformOutcome::NoData(reason) => println!("--- no data: {reason}")
        }

        cycle += 1;
        match ARGS.refresh {
            Some(secs) if !cancel.is_cancelled() => {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep( Duration::from_secs(secs)) => {}
                }
            }
            _ => break
        }
    }

    if let Some(table) = cache.current() {
        println!("final table: {} rows in {} flights", table.n_rows(), table.n_flights());
    }
    Ok(())
}

/// record ARGS.messages lines into a fresh raw table at `path`
async fn ingest (path: &Path, cancel: CancellationToken)->Result<FeedOutcome> {
    let feed_config: FeedConfig = match &ARGS.feed_config {
        Some(p) => load_config( p)?,
        None => FeedConfig::from_env()?
    };

    let mut sink = RawTableWriter::create( path)?;
    let mut client = FeedClient::new( TcpSource::from_config( &feed_config), feed_config.clone(), cancel);

    info!("acquisition from {} into {:?}", feed_config.addr(), path);
    let outcome = client.run( ARGS.messages, &mut sink).await?;
    if outcome.is_failure() {
        warn!("continuing with the {} persisted messages", outcome.received());
    }
    Ok(outcome)
}
