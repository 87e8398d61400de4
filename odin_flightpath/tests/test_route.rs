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

use chrono::{Duration, TimeZone, Utc};
use odin_sbs::Observation;
use odin_flightpath::{aggregate, FlightTrack, GeoPoint, RoutePolyline};

fn track (positions: &[(f64,f64)])->FlightTrack {
    let t0 = Utc.with_ymd_and_hms( 2024, 5, 1, 12, 0, 0).unwrap();
    let observations: Vec<Observation> = positions.iter().enumerate().map( |(i,(lat,lon))| Observation {
        flight_id: Some("4CA2B7".to_string()),
        callsign: Some("EIN5EV".to_string()),
        latitude: Some(*lat),
        longitude: Some(*lon),
        altitude: Some(30000.0),
        ground_speed: Some(420.0),
        heading: Some(45.0),
        timestamp: Some( t0 + Duration::seconds( i as i64)),
    }).collect();

    let (mut tracks, _) = aggregate( observations);
    tracks.remove(0)
}

// run with "cargo test --test test_route -- --nocapture"

#[test]
fn test_waypoints() {
    let t = track( &[(48.0,2.0), (48.1,2.1)]);
    let route = RoutePolyline::from_track( &t);
    assert_eq!( route.to_string(), "48,2;48.1,2.1");

    let t = track( &[(48.0,2.0), (48.1,2.1), (48.2,2.2), (48.3,2.3), (48.4,2.4)]);
    let route = RoutePolyline::from_track( &t);
    println!("{route}");
    assert_eq!( route.len(), 3);
    assert_eq!( route.waypoints()[1], GeoPoint::from_lat_lon_degrees( 48.2, 2.2)); // 5/2 = 2

    let t = track( &[(48.0,2.0), (48.1,2.1), (48.2,2.2), (48.3,2.3)]);
    let route = RoutePolyline::from_track( &t);
    assert_eq!( route.waypoints()[1], GeoPoint::from_lat_lon_degrees( 48.2, 2.2)); // 4/2 = 2
}

#[test]
fn test_deviation_at_waypoints() {
    let t = track( &[(48.0,2.0), (48.3,2.5), (48.6,2.9), (49.0,3.5), (49.2,3.9)]);
    let route = RoutePolyline::from_track( &t);
    let devs = route.track_deviations_m( &t);
    println!("{devs:?}");

    assert!( devs.iter().all( |d| *d >= 0.0));
    assert_eq!( devs[0], 0.0);
    assert_eq!( devs[2], 0.0);
    assert_eq!( devs[4], 0.0);
    assert!( devs[1] > 0.0);
    assert!( devs[3] > 0.0);
}

#[test]
fn test_nearest_waypoint_not_segment() {
    // a point exactly between the two waypoints of a meridian route is still ~half the distance away
    let route = RoutePolyline::from_positions( &[
        GeoPoint::from_lat_lon_degrees( 0.0, 0.0),
        GeoPoint::from_lat_lon_degrees( 2.0, 0.0)
    ]);
    let d = route.deviation_m( &GeoPoint::from_lat_lon_degrees( 1.0, 0.0));
    println!("midpoint deviation: {d}");
    assert!( (d - 110_574.0).abs() < 200.0);
}

#[test]
fn test_degenerate_routes() {
    let p = GeoPoint::from_lat_lon_degrees( 48.7, 2.4);
    assert_eq!( RoutePolyline::empty().deviation_m( &p), 0.0);
    assert_eq!( RoutePolyline::parse( "garbage").deviation_m( &p), 0.0);

    let route = RoutePolyline::parse( "48.0,2.0;49.0,3.0");
    assert_eq!( route.deviation_m( &GeoPoint::from_lat_lon_degrees( f64::NAN, 2.4)), 0.0);
    assert_eq!( route.deviation_m( &GeoPoint::from_lat_lon_degrees( 95.0, 2.4)), 0.0);

    // one invalid waypoint zeroes the result although the valid one is ~130km away
    let route = RoutePolyline::from_positions( &[
        GeoPoint::from_lat_lon_degrees( 48.0, 2.0),
        GeoPoint::from_lat_lon_degrees( f64::NAN, 3.0)
    ]);
    let p = GeoPoint::from_lat_lon_degrees( 49.0, 3.0);
    assert!( GeoPoint::from_lat_lon_degrees( 48.0, 2.0).geodesic_distance( &p).is_some());
    assert_eq!( route.deviation_m( &p), 0.0);
}

#[test]
fn test_text_form() {
    let route: RoutePolyline = "48.5,2.2;48.7,2.4;48.9,2.6".parse().unwrap();
    assert_eq!( route.len(), 3);
    assert_eq!( route.to_string(), "48.5,2.2;48.7,2.4;48.9,2.6");
    assert_eq!( RoutePolyline::parse( &route.to_string()), route);

    assert!( RoutePolyline::try_parse( "48.5,2.2").is_err()); // single waypoint
    assert!( RoutePolyline::try_parse( "48.5,2.2;48.6,2.3;48.7,2.4;48.8,2.5").is_err());
    assert!( RoutePolyline::try_parse( "48.5;2.2").is_err());
    assert!( RoutePolyline::try_parse( "48.5,east;48.6,2.3").is_err());
    assert!( RoutePolyline::parse( "").is_empty());
}
