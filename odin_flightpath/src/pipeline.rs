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

//! composition of the transform stages: raw table -> observations -> tracks -> enriched table -> output file.
//! Everything between reading the raw table and writing the output is plain computation over the
//! in-memory batch

use std::{fmt, path::{Path,PathBuf}};
use chrono_tz::Tz;
use serde::{Serialize,Deserialize};
use tracing::{info,warn};
use odin_sbs::{Observation, read_raw_table};

use crate::EnrichedPoint;
use crate::track::{FlightTrack, AggregateStats, aggregate};
use crate::route::RoutePolyline;
use crate::airspace::{Airspace, RestrictedZone};
use crate::autopilot::is_autopilot_on;
use crate::anomaly::AnomalyLabels;
use crate::table::{FlightBlock, FlightTable};
use crate::output::{OutputVariant, write_enriched_table};
use crate::errors::{Result, OdinFlightpathError};

/// transform configuration, usually loaded from a RON file
#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct FlightpathConfig {
    /// zone in which the SBS source generates its date/time fields
    #[serde(default="default_timezone")]
    pub timezone: Tz,

    /// add the `in_restricted_zone` column
    #[serde(default="default_zone_detection")]
    pub zone_detection: bool,

    #[serde(default)]
    pub restricted_zones: Vec<RestrictedZone>,

    /// optional CSV file with `flight_id,anomaly_type` columns
    #[serde(default)]
    pub anomaly_labels: Option<PathBuf>,
}

fn default_timezone ()->Tz { Tz::UTC }
fn default_zone_detection ()->bool { true }

impl Default for FlightpathConfig {
    fn default ()->Self {
        FlightpathConfig {
            timezone: default_timezone(),
            zone_detection: default_zone_detection(),
            restricted_zones: vec![ RestrictedZone::paris() ],
            anomaly_labels: None,
        }
    }
}

impl FlightpathConfig {
    /// None if zone detection is off
    pub fn airspace (&self)->Option<Airspace> {
        if self.zone_detection { Some( Airspace::new( self.restricted_zones.clone())) } else { None }
    }

    pub fn output_variant (&self)->OutputVariant {
        if self.zone_detection { OutputVariant::ZoneAware } else { OutputVariant::Basic }
    }

    pub fn load_anomaly_labels (&self)->Result<AnomalyLabels> {
        match &self.anomaly_labels {
            Some(path) => AnomalyLabels::from_csv_file( path),
            None => Ok( AnomalyLabels::new())
        }
    }
}

/// why a run did not produce output
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum NoDataReason {
    EmptyInput,
    AllFiltered,
}

impl fmt::Display for NoDataReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoDataReason::EmptyInput => write!( f, "input has no observations"),
            NoDataReason::AllFiltered => write!( f, "no observation has all required fields")
        }
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Default)]
pub struct TransformStats {
    pub aggregate: AggregateStats,
    pub zone_hits: usize,
    pub rows_written: usize,
}

impl fmt::Display for TransformStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{}, {} rows written, {} restricted zone hits", self.aggregate, self.rows_written, self.zone_hits)
    }
}

#[derive(Debug)]
pub enum TransformOutcome {
    Written { stats: TransformStats, table: FlightTable },
    NoData(NoDataReason),
}

impl TransformOutcome {
    pub fn table (&self)->Option<&FlightTable> {
        match self {
            TransformOutcome::Written{table,..} => Some(table),
            TransformOutcome::NoData(_) => None
        }
    }
}

impl fmt::Display for TransformOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformOutcome::Written{stats,..} => write!( f, "done: {}", stats),
            TransformOutcome::NoData(reason) => write!( f, "no data: {}", reason)
        }
    }
}

/// route, deviation, zone and autopilot enrichment of aggregated tracks. Tracks are only read
pub fn enrich_tracks (tracks: &[FlightTrack], airspace: Option<&Airspace>, labels: &AnomalyLabels)->FlightTable {
    let mut table = FlightTable::new();

    for track in tracks {
        let route = RoutePolyline::from_track( track);
        let anomaly_type = labels.label_for( track.flight_id());
        let n = track.len();

        let points: Vec<EnrichedPoint> = track.points().iter().enumerate().map( |(i,tp)| {
            let pos = tp.position();
            EnrichedPoint {
                flight_id: tp.flight_id.clone(),
                callsign: tp.callsign.clone(),
                latitude: tp.latitude,
                longitude: tp.longitude,
                altitude: tp.altitude,
                ground_speed: tp.ground_speed,
                heading: tp.heading,
                autopilot_on: is_autopilot_on( i, n, anomaly_type),
                deviation_m: route.deviation_m( &pos),
                in_restricted_zone: airspace.map( |a| a.is_restricted( &pos)),
                anomaly_type: anomaly_type.to_string(),
                timestamp: tp.timestamp,
            }
        }).collect();

        table.push( FlightBlock { flight_id: track.flight_id().to_string(), route, points });
    }

    table
}

/// the in-memory part of the transform
pub fn transform (observations: Vec<Observation>, config: &FlightpathConfig, labels: &AnomalyLabels)->std::result::Result<(FlightTable,TransformStats),NoDataReason> {
    if observations.is_empty() {
        return Err( NoDataReason::EmptyInput)
    }

    let (tracks, agg_stats) = aggregate( observations);
    if tracks.is_empty() {
        return Err( NoDataReason::AllFiltered)
    }

    let airspace = config.airspace();
    let table = enrich_tracks( &tracks, airspace.as_ref(), labels);
    let zone_hits = table.rows().filter( |p| p.in_restricted_zone == Some(true)).count();

    Ok( (table, TransformStats { aggregate: agg_stats, zone_hits, rows_written: 0 }) )
}

/// read the raw table at `input`, transform it and write the result to `output`. A missing input file
/// is an error, an empty or completely filtered input is a [`TransformOutcome::NoData`] that does not
/// touch `output`
pub fn run_transform<P1,P2> (input: P1, output: P2, config: &FlightpathConfig)->Result<TransformOutcome>
    where P1: AsRef<Path>, P2: AsRef<Path>
{
    let input = input.as_ref();
    if !input.is_file() {
        return Err( OdinFlightpathError::MissingInput( input.to_path_buf()))
    }
    let labels = config.load_anomaly_labels()?;

    let observations = read_raw_table( input, &config.timezone)?;
    info!("read {} observations from {:?}", observations.len(), input);

    match transform( observations, config, &labels) {
        Ok((table, mut stats)) => {
            stats.rows_written = write_enriched_table( output, &table, config.output_variant())?;
            info!("{}", stats);
            Ok( TransformOutcome::Written { stats, table })
        }
        Err(reason) => {
            warn!("no output written: {}", reason);
            Ok( TransformOutcome::NoData(reason))
        }
    }
}
