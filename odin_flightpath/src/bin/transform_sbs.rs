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

use std::path::PathBuf;
use clap::Parser;
use lazy_static::lazy_static;
use anyhow::Result;
use tracing_subscriber::EnvFilter;
use odin_sbs::load_config;
use odin_flightpath::{run_transform, FlightpathConfig, TransformOutcome};

#[derive(Parser)]
#[command(about="transform a raw SBS table into an enriched per flight trajectory table")]
struct CliOpts {
    #[arg(long, env="PROJECT_ROOT", default_value=".", help="base directory for relative file names")]
    project_root: PathBuf,

    #[arg(short, long, default_value="test_data_dashboard.csv", help="raw SBS table")]
    input: PathBuf,

    #[arg(short, long, default_value="test_data_transformed.csv", help="enriched output table")]
    output: PathBuf,

    #[arg(long, help="RON transform config (default: Paris restricted zone, UTC)")]
    config: Option<PathBuf>,

    #[arg(long, help="list the route of each flight")]
    routes: bool,

    #[arg(long, help="print per flight summaries")]
    summary: bool,
}

lazy_static! { static ref ARGS: CliOpts = CliOpts::parse(); }

fn main ()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("info")))
        .init();

    let config: FlightpathConfig = match &ARGS.config {
        Some(path) => load_config( path)?,
        None => FlightpathConfig::default()
    };

    let input = ARGS.project_root.join( &ARGS.input);
    let output = ARGS.project_root.join( &ARGS.output);

    let outcome = run_transform( &input, &output, &config)?;
    println!("--- {outcome}");

    if let TransformOutcome::Written{ table, .. } = &outcome {
        if ARGS.routes {
            for block in table.flights() {
                println!("{:8} {}", block.flight_id, block.route);
            }
        }
        if ARGS.summary {
            for s in table.summaries() {
                println!("{s}");
            }
        }
        println!("output saved in {:?}", output);
    }

    Ok(())
}
