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

//! grouping of observations into per flight tracks.
//!
//! SBS messages of one aircraft are spread over several message types (MSG,1 has the callsign, MSG,3 the
//! position, MSG,4 speed and track) so that a single observation hardly ever has all fields. We therefore
//! propagate the slowly changing fields (callsign, altitude, ground speed, heading) along each track before
//! we apply the strict validity filter

use std::{collections::BTreeMap, fmt};
use chrono::{DateTime, Utc};
use tracing::{debug,info};
use odin_sbs::Observation;

use crate::geo::GeoPoint;

/// a track point that passed the validity filter - everything except altitude is guaranteed to be present
#[derive(Debug,Clone,PartialEq)]
pub struct TrackPoint {
    pub flight_id: String,
    pub callsign: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub ground_speed: f64,
    pub heading: f64,
    pub timestamp: DateTime<Utc>,
}

impl TrackPoint {
    /// None if any of the required fields is missing
    pub fn from_observation (obs: Observation)->Option<Self> {
        Some( TrackPoint {
            flight_id: obs.flight_id?,
            callsign: obs.callsign?,
            latitude: obs.latitude?,
            longitude: obs.longitude?,
            altitude: obs.altitude,
            ground_speed: obs.ground_speed?,
            heading: obs.heading?,
            timestamp: obs.timestamp?,
        })
    }

    pub fn position (&self)->GeoPoint { GeoPoint::from_lat_lon_degrees( self.latitude, self.longitude) }
}

/// the chronologically ordered, valid points of one flight. Once built a track is not modified anymore
#[derive(Debug,Clone,PartialEq)]
pub struct FlightTrack {
    flight_id: String,
    points: Vec<TrackPoint>,
}

impl FlightTrack {
    pub fn flight_id (&self)->&str { self.flight_id.as_str() }
    pub fn points (&self)->&[TrackPoint] { self.points.as_slice() }
    pub fn len (&self)->usize { self.points.len() }
    pub fn is_empty (&self)->bool { self.points.is_empty() }

    pub fn first (&self)->Option<&TrackPoint> { self.points.first() }
    pub fn last (&self)->Option<&TrackPoint> { self.points.last() }

    pub fn callsign (&self)->Option<&str> { self.points.first().map( |p| p.callsign.as_str()) }
}

/// row counts of an aggregation run
#[derive(Debug,Clone,Copy,PartialEq,Eq,Default)]
pub struct AggregateStats {
    pub initial: usize,   // observations we started with
    pub surviving: usize, // points in all tracks
    pub dropped: usize,
    pub flights: usize,
}

impl fmt::Display for AggregateStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{} observations, {} valid points in {} flights ({} dropped)", self.initial, self.surviving, self.flights, self.dropped)
    }
}

/// group observations by flight_id, order them by time, fill gaps in the best-effort fields and drop
/// whatever is still incomplete. Observations without flight_id can't be assigned and are dropped right away.
/// Tracks that end up empty are not returned. The result is sorted by flight_id
pub fn aggregate (observations: Vec<Observation>)->(Vec<FlightTrack>,AggregateStats) {
    let initial = observations.len();
    let mut groups: BTreeMap<String,Vec<Observation>> = BTreeMap::new();

    for obs in observations {
        if let Some(id) = obs.flight_id.clone() {
            groups.entry( id).or_default().push( obs);
        }
    }

    let mut tracks: Vec<FlightTrack> = Vec::with_capacity( groups.len());
    for (flight_id, mut group) in groups {
        sort_chronologically( &mut group);
        fill_gaps( &mut group);

        let points: Vec<TrackPoint> = group.into_iter().filter_map( TrackPoint::from_observation).collect();
        if points.is_empty() {
            debug!("no valid points left for flight {}", flight_id);
        } else {
            tracks.push( FlightTrack{ flight_id, points });
        }
    }

    let surviving: usize = tracks.iter().map( |t| t.len()).sum();
    let stats = AggregateStats { initial, surviving, dropped: initial - surviving, flights: tracks.len() };
    info!( initial, surviving, flights = stats.flights, "aggregated tracks");

    (tracks, stats)
}

/// ascending timestamps, observations without a timestamp go last. The sort is stable so ties keep their
/// arrival order
pub fn sort_chronologically (group: &mut [Observation]) {
    group.sort_by_key( |o| (o.timestamp.is_none(), o.timestamp));
}

/// forward fill, then backward fill for what is still missing at the start of the track
pub fn fill_gaps (group: &mut [Observation]) {
    propagate( group, callsign);
    propagate( group, altitude);
    propagate( group, ground_speed);
    propagate( group, heading);
}

fn callsign (o: &mut Observation)->&mut Option<String> { &mut o.callsign }
fn altitude (o: &mut Observation)->&mut Option<f64> { &mut o.altitude }
fn ground_speed (o: &mut Observation)->&mut Option<f64> { &mut o.ground_speed }
fn heading (o: &mut Observation)->&mut Option<f64> { &mut o.heading }

fn propagate<T: Clone> (group: &mut [Observation], field: fn(&mut Observation)->&mut Option<T>) {
    fill( group.iter_mut(), field);
    fill( group.iter_mut().rev(), field);
}

fn fill<'a,I,T> (it: I, field: fn(&mut Observation)->&mut Option<T>) where I: Iterator<Item=&'a mut Observation>, T: Clone {
    let mut last: Option<T> = None;
    for obs in it {
        let v = field( obs);
        if v.is_some() {
            last = v.clone();
        } else if last.is_some() {
            *v = last.clone();
        }
    }
}
