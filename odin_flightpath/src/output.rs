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

//! CSV output of the enriched table.
//!
//! Files are written into a temporary file next to the target and only persisted over the target once all
//! rows are written, i.e. readers see either the previous or the complete new table

use std::{fs, path::Path};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use tempfile::NamedTempFile;
use tracing::info;

use crate::EnrichedPoint;
use crate::table::FlightTable;
use crate::errors::{Result, OdinFlightpathError, parse_error};

pub const OUTPUT_COLUMNS: [&str;11] = [
    "flight_id", "callsign", "latitude", "longitude", "altitude", "ground_speed", "heading",
    "autopilot_on", "deviation_m", "anomaly_type", "timestamp"
];

pub const ZONE_OUTPUT_COLUMNS: [&str;12] = [
    "flight_id", "callsign", "latitude", "longitude", "altitude", "ground_speed", "heading",
    "autopilot_on", "deviation_m", "in_restricted_zone", "anomaly_type", "timestamp"
];

/// with or without the `in_restricted_zone` column
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum OutputVariant {
    Basic,
    ZoneAware,
}

impl OutputVariant {
    pub fn columns (&self)->&'static [&'static str] {
        match self {
            OutputVariant::Basic => &OUTPUT_COLUMNS,
            OutputVariant::ZoneAware => &ZONE_OUTPUT_COLUMNS
        }
    }
}

pub fn format_timestamp (ts: &DateTime<Utc>)->String {
    ts.to_rfc3339_opts( SecondsFormat::Millis, true)
}

fn flag (b: bool)->&'static str { if b { "1" } else { "0" } }

fn record (p: &EnrichedPoint, variant: OutputVariant)->Vec<String> {
    let mut rec = Vec::with_capacity( ZONE_OUTPUT_COLUMNS.len());
    rec.push( p.flight_id.clone());
    rec.push( p.callsign.clone());
    rec.push( p.latitude.to_string());
    rec.push( p.longitude.to_string());
    rec.push( p.altitude.map( |a| a.to_string()).unwrap_or_default());
    rec.push( p.ground_speed.to_string());
    rec.push( p.heading.to_string());
    rec.push( flag( p.autopilot_on).to_string());
    rec.push( p.deviation_m.to_string());
    if variant == OutputVariant::ZoneAware {
        rec.push( flag( p.in_restricted_zone.unwrap_or(false)).to_string());
    }
    rec.push( p.anomaly_type.clone());
    rec.push( format_timestamp( &p.timestamp));
    rec
}

/// write all rows of `table` to `path`, replacing whatever was there. Returns the number of rows written
pub fn write_enriched_table<P: AsRef<Path>> (path: P, table: &FlightTable, variant: OutputVariant)->Result<usize> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new(".")
    };
    fs::create_dir_all( dir)?;

    let mut tmp = NamedTempFile::new_in( dir)?;
    let mut n_rows = 0;
    {
        let mut writer = csv::Writer::from_writer( &mut tmp);
        writer.write_record( variant.columns())?;
        for p in table.rows() {
            writer.write_record( record( p, variant))?;
            n_rows += 1;
        }
        writer.flush()?;
    }
    tmp.persist( path)?;

    info!("wrote {} rows to {:?}", n_rows, path);
    Ok(n_rows)
}

#[derive(Debug,Deserialize)]
struct OutputRecord {
    flight_id: String,
    callsign: String,
    latitude: f64,
    longitude: f64,
    altitude: Option<f64>,
    ground_speed: f64,
    heading: f64,
    autopilot_on: u8,
    deviation_m: f64,
    #[serde(default)]
    in_restricted_zone: Option<u8>,
    anomaly_type: String,
    timestamp: DateTime<Utc>,
}

impl From<OutputRecord> for EnrichedPoint {
    fn from (r: OutputRecord)->Self {
        EnrichedPoint {
            flight_id: r.flight_id,
            callsign: r.callsign,
            latitude: r.latitude,
            longitude: r.longitude,
            altitude: r.altitude,
            ground_speed: r.ground_speed,
            heading: r.heading,
            autopilot_on: r.autopilot_on != 0,
            deviation_m: r.deviation_m,
            in_restricted_zone: r.in_restricted_zone.map( |z| z != 0),
            anomaly_type: r.anomaly_type,
            timestamp: r.timestamp,
        }
    }
}

/// read an output table of either variant. The header has to match one of them exactly (names and order)
pub fn read_enriched_table<P: AsRef<Path>> (path: P)->Result<(Vec<EnrichedPoint>,OutputVariant)> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path( path.as_ref())?;

    let headers = reader.headers()?.clone();
    let variant = if headers.iter().eq( OUTPUT_COLUMNS.iter().copied()) {
        OutputVariant::Basic
    } else if headers.iter().eq( ZONE_OUTPUT_COLUMNS.iter().copied()) {
        OutputVariant::ZoneAware
    } else {
        return Err( parse_error!("unexpected output columns: {}", headers.iter().collect::<Vec<_>>().join(",")))
    };

    let mut rows = Vec::new();
    for res in reader.deserialize::<OutputRecord>() {
        rows.push( EnrichedPoint::from( res?));
    }
    Ok( (rows,variant) )
}
