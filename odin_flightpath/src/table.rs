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

//! the in-memory enriched table, organized as one contiguous block per flight

use std::{fmt, sync::Arc};
use chrono::{DateTime, Utc};

use crate::EnrichedPoint;
use crate::route::RoutePolyline;

/// the enriched points of one flight in chronological order, together with the route they refer to
#[derive(Debug,Clone,PartialEq)]
pub struct FlightBlock {
    pub flight_id: String,
    pub route: RoutePolyline,
    pub points: Vec<EnrichedPoint>,
}

impl FlightBlock {
    pub fn summary (&self)->FlightSummary {
        let n_points = self.points.len();
        let callsign = self.points.first().map( |p| p.callsign.clone()).unwrap_or_default();
        let anomaly_type = self.points.iter().find( |p| p.is_anomalous())
            .or( self.points.first())
            .map( |p| p.anomaly_type.clone())
            .unwrap_or_default();

        let max_altitude = self.points.iter().filter_map( |p| p.altitude).reduce( f64::max);
        let mean_ground_speed = if n_points > 0 {
            self.points.iter().map( |p| p.ground_speed).sum::<f64>() / n_points as f64
        } else { 0.0 };
        let max_deviation_m = self.points.iter().map( |p| p.deviation_m).fold( 0.0, f64::max);
        let zone_hits = self.points.iter().filter( |p| p.in_restricted_zone == Some(true)).count();

        FlightSummary { flight_id: self.flight_id.clone(), callsign, n_points, max_altitude, mean_ground_speed, max_deviation_m, zone_hits, anomaly_type }
    }
}

/// key figures of one flight as shown by monitoring front ends
#[derive(Debug,Clone,PartialEq)]
pub struct FlightSummary {
    pub flight_id: String,
    pub callsign: String,
    pub n_points: usize,
    pub max_altitude: Option<f64>,
    pub mean_ground_speed: f64,
    pub max_deviation_m: f64,
    pub zone_hits: usize,
    pub anomaly_type: String,
}

impl fmt::Display for FlightSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{:8} {:8} {:5} pts", self.flight_id, self.callsign, self.n_points)?;
        match self.max_altitude {
            Some(alt) => write!( f, "  max alt: {:6.0}", alt)?,
            None => write!( f, "  max alt:      -")?
        }
        write!( f, "  avg spd: {:5.1}  max dev: {:8.0}m  zone hits: {:3}  {}",
                self.mean_ground_speed, self.max_deviation_m, self.zone_hits, self.anomaly_type)
    }
}

#[derive(Debug,Clone,PartialEq,Default)]
pub struct FlightTable {
    flights: Vec<FlightBlock>,
}

impl FlightTable {
    pub fn new ()->Self { FlightTable::default() }

    pub fn push (&mut self, block: FlightBlock) { self.flights.push( block) }

    /// regroup a flat row sequence (e.g. read back from an output file). Consecutive rows with the same
    /// flight_id form one block, routes are recomputed from the block positions
    pub fn from_rows (rows: Vec<EnrichedPoint>)->Self {
        let mut flights: Vec<FlightBlock> = Vec::new();
        for p in rows {
            match flights.last_mut() {
                Some(block) if block.flight_id == p.flight_id => block.points.push( p),
                _ => flights.push( FlightBlock { flight_id: p.flight_id.clone(), route: RoutePolyline::empty(), points: vec![p] })
            }
        }
        for block in &mut flights {
            let positions: Vec<_> = block.points.iter().map( |p| p.position()).collect();
            block.route = RoutePolyline::from_positions( &positions);
        }
        FlightTable { flights }
    }

    pub fn flights (&self)->&[FlightBlock] { self.flights.as_slice() }
    pub fn flight (&self, flight_id: &str)->Option<&FlightBlock> { self.flights.iter().find( |b| b.flight_id == flight_id) }

    pub fn n_flights (&self)->usize { self.flights.len() }
    pub fn n_rows (&self)->usize { self.flights.iter().map( |b| b.points.len()).sum() }
    pub fn is_empty (&self)->bool { self.n_rows() == 0 }

    /// all rows, flight by flight
    pub fn rows (&self)->impl Iterator<Item=&EnrichedPoint> {
        self.flights.iter().flat_map( |b| b.points.iter())
    }

    pub fn summaries (&self)->Vec<FlightSummary> {
        self.flights.iter().map( |b| b.summary()).collect()
    }
}

/// single owner of the most recent table. Readers get a shared snapshot that stays valid when the
/// table is replaced by the next refresh
#[derive(Debug,Default)]
pub struct TableCache {
    table: Option<Arc<FlightTable>>,
    last_update: Option<DateTime<Utc>>,
}

impl TableCache {
    pub fn new ()->Self { TableCache::default() }

    /// install a new table, returning the previous one
    pub fn replace (&mut self, table: FlightTable)->Option<Arc<FlightTable>> {
        self.last_update = Some( Utc::now());
        self.table.replace( Arc::new( table))
    }

    pub fn current (&self)->Option<Arc<FlightTable>> { self.table.clone() }
    pub fn last_update (&self)->Option<DateTime<Utc>> { self.last_update }
    pub fn is_empty (&self)->bool { self.table.is_none() }
}
