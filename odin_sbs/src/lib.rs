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

//! ingestion of SBS-1 (BaseStation) text feeds as provided by dump1090 and similar receivers on port 30003.
//! This crate covers the wire level: a reconnecting feed client that persists raw lines into a 22 column
//! table, and the parser that turns such lines (or table rows) into [`sbs::Observation`] records.

use std::path::Path;
use serde::Deserialize;

pub mod errors;
pub use errors::{OdinSbsError,Result};

pub mod config;
pub use config::FeedConfig;

pub mod sbs;
pub use sbs::{Observation, parse_line, parse_fields};

pub mod raw_table;
pub use raw_table::{RawTableWriter, RawLineSink, read_raw_table};

pub mod feed;
pub use feed::{FeedClient, FeedOutcome, FeedState, AbortReason, SbsSource, TcpSource};

/// the tag every relevant SBS line starts with
pub const MSG_TAG: &str = "MSG";

/// number of comma separated fields of a MSG line, including the tag
pub const N_FIELDS: usize = 22;

/// raw table column names in SBS field order
pub const SBS_COLUMNS: [&str; N_FIELDS] = [
    "MessageType", "TransmissionType", "SessionID", "AircraftID", "HexIdent", "FlightID",
    "DateGenerated", "TimeGenerated", "DateLogged", "TimeLogged", "Callsign", "Altitude",
    "GroundSpeed", "Track", "Latitude", "Longitude", "VerticalRate", "Squawk", "Alert",
    "Emergency", "SPI", "IsOnGround"
];

/// split a raw line into exactly [`N_FIELDS`] fields. Short lines are right-padded with empty fields,
/// surplus trailing fields are dropped
pub fn split_fields (line: &str)->Vec<String> {
    let mut fields: Vec<String> = line.split(',').take(N_FIELDS).map( |s| s.to_string()).collect();
    fields.resize( N_FIELDS, String::new());
    fields
}

/// load a RON config from an explicit path
pub fn load_config<C,P> (path: P)->Result<C> where C: for<'a> Deserialize<'a>, P: AsRef<Path> {
    let data = std::fs::read( path.as_ref())?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}
