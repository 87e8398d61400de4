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

//! batch enrichment of SBS observations into per flight trajectories.
//!
//! The transform groups [`odin_sbs::Observation`]s into [`track::FlightTrack`]s, derives a coarse
//! [`route::RoutePolyline`] for each of them and annotates every point with its deviation from that route,
//! an optional restricted airspace flag and an autopilot estimate. The result is an [`EnrichedPoint`] table
//! that is written as CSV for downstream consumers (dashboards, classifier training).

use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Serialize,Deserialize};

pub mod errors;
pub use errors::{OdinFlightpathError,Result};

pub mod geo;
pub use crate::geo::{GeoPoint, GeoRect};

pub mod track;
pub use track::{TrackPoint, FlightTrack, AggregateStats, aggregate};

pub mod route;
pub use route::RoutePolyline;

pub mod airspace;
pub use airspace::{RestrictedZone, Airspace};

pub mod autopilot;
pub use autopilot::{is_autopilot_on, autopilot_flags};

pub mod anomaly;
pub use anomaly::{AnomalyLabels, AnomalyClassifier, FeatureVector, NORMAL};

pub mod table;
pub use table::{FlightBlock, FlightTable, FlightSummary, TableCache};

pub mod output;
pub use output::{OutputVariant, write_enriched_table, read_enriched_table};

pub mod pipeline;
pub use pipeline::{FlightpathConfig, TransformOutcome, TransformStats, NoDataReason, enrich_tracks, transform, run_transform};

/// one row of the output table: a track point plus everything we derived for it
#[derive(Debug,Clone,PartialEq)]
pub struct EnrichedPoint {
    pub flight_id: String,
    pub callsign: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub ground_speed: f64,
    pub heading: f64,
    pub autopilot_on: bool,
    pub deviation_m: f64,
    pub in_restricted_zone: Option<bool>, // None if zone detection was not enabled
    pub anomaly_type: String,
    pub timestamp: DateTime<Utc>,
}

impl EnrichedPoint {
    pub fn position (&self)->GeoPoint { GeoPoint::from_lat_lon_degrees( self.latitude, self.longitude) }

    pub fn is_anomalous (&self)->bool { self.anomaly_type != NORMAL }
}

impl fmt::Display for EnrichedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{} {} [{},{}] dev: {:.0}m ap: {}", self.flight_id, self.timestamp.format("%H:%M:%S%.3f"),
                self.latitude, self.longitude, self.deviation_m, self.autopilot_on as u8)?;
        if let Some(true) = self.in_restricted_zone { write!( f, " RESTRICTED")?; }
        if self.is_anomalous() { write!( f, " {}", self.anomaly_type)?; }
        Ok(())
    }
}
