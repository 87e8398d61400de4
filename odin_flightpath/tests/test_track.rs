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

use chrono::{DateTime, Duration, TimeZone, Utc};
use odin_sbs::Observation;
use odin_flightpath::{aggregate, AggregateStats};

fn t (secs: i64)->Option<DateTime<Utc>> {
    Some( Utc.with_ymd_and_hms( 2024, 5, 1, 12, 0, 0).unwrap() + Duration::seconds(secs))
}

/// a complete observation
fn obs (id: &str, secs: i64, lat: f64)->Observation {
    Observation {
        flight_id: Some(id.to_string()),
        callsign: Some("AFR123".to_string()),
        latitude: Some(lat),
        longitude: Some(2.4),
        altitude: Some(35000.0),
        ground_speed: Some(450.0),
        heading: Some(90.0),
        timestamp: t(secs),
    }
}

// run with "cargo test --test test_track -- --nocapture"

#[test]
fn test_callsign_fill() {
    let mut observations: Vec<Observation> = (0..5).map( |i| obs( "39C4A1", i, 48.0 + i as f64 * 0.1)).collect();
    observations[0].callsign = Some("AFR001".to_string());
    for o in &mut observations[1..4] { o.callsign = None; }
    observations[4].callsign = Some("AFR999".to_string());

    let (tracks, stats) = aggregate( observations);
    println!("{stats}");
    assert_eq!( tracks.len(), 1);

    let callsigns: Vec<&str> = tracks[0].points().iter().map( |p| p.callsign.as_str()).collect();
    assert_eq!( callsigns, vec!["AFR001", "AFR001", "AFR001", "AFR001", "AFR999"]);
}

#[test]
fn test_leading_gap_backfill() {
    let mut observations: Vec<Observation> = (0..4).map( |i| obs( "39C4A1", i, 48.0)).collect();
    observations[0].heading = None;
    observations[1].heading = None;
    observations[2].heading = Some(180.0);
    observations[3].heading = None;
    observations[0].altitude = None;

    let (tracks, stats) = aggregate( observations);
    assert_eq!( stats.dropped, 0);

    let headings: Vec<f64> = tracks[0].points().iter().map( |p| p.heading).collect();
    assert_eq!( headings, vec![180.0, 180.0, 180.0, 180.0]);
    assert_eq!( tracks[0].points()[0].altitude, Some(35000.0));
}

#[test]
fn test_chronological_order() {
    // out of order arrival, interleaved flights
    let observations = vec![
        obs( "B", 30, 1.0),
        obs( "A", 20, 2.0),
        obs( "B", 10, 3.0),
        obs( "A", 10, 4.0),
        obs( "A", 10, 5.0), // same time as the previous one: arrival order decides
    ];

    let (tracks, stats) = aggregate( observations);
    assert_eq!( stats.flights, 2);
    assert_eq!( tracks[0].flight_id(), "A");
    assert_eq!( tracks[1].flight_id(), "B");

    let lats: Vec<f64> = tracks[0].points().iter().map( |p| p.latitude).collect();
    assert_eq!( lats, vec![4.0, 5.0, 2.0]);

    let lats: Vec<f64> = tracks[1].points().iter().map( |p| p.latitude).collect();
    assert_eq!( lats, vec![3.0, 1.0]);
}

#[test]
fn test_no_cross_flight_fill() {
    // the callsign of A must not leak into B
    let mut a = obs( "A", 0, 1.0);
    let mut b = obs( "B", 1, 1.0);
    b.callsign = None;

    let (tracks, stats) = aggregate( vec![a, b]);
    assert_eq!( stats, AggregateStats{ initial: 2, surviving: 1, dropped: 1, flights: 1 });
    assert_eq!( tracks[0].flight_id(), "A");
}

#[test]
fn test_strict_filter() {
    let mut observations: Vec<Observation> = (0..6).map( |i| obs( "A", i, 48.0)).collect();
    observations[1].latitude = None;   // position is not propagated
    observations[2].timestamp = None;  // neither is time
    observations[3].flight_id = None;  // can't be grouped at all

    let mut no_speed = obs( "C", 0, 48.0);
    no_speed.ground_speed = None;      // nothing to propagate from
    observations.push( no_speed);

    let (tracks, stats) = aggregate( observations);
    println!("{stats}");
    assert_eq!( stats.initial, 7);
    assert_eq!( stats.surviving, 3);
    assert_eq!( stats.dropped, 4);
    assert_eq!( stats.flights, 1);
    assert!( tracks[0].points().windows(2).all( |w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn test_altitude_is_optional() {
    let mut observations: Vec<Observation> = (0..3).map( |i| obs( "A", i, 48.0)).collect();
    for o in &mut observations { o.altitude = None; }

    let (tracks, stats) = aggregate( observations);
    assert_eq!( stats.surviving, 3);
    assert!( tracks[0].points().iter().all( |p| p.altitude.is_none()));
}

#[test]
fn test_empty() {
    let (tracks, stats) = aggregate( Vec::new());
    assert!( tracks.is_empty());
    assert_eq!( stats, AggregateStats::default());
}
