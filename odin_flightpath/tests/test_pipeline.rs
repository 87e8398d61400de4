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

use std::path::Path;
use odin_sbs::{load_config, RawTableWriter, RawLineSink};
use odin_flightpath::{
    run_transform, read_enriched_table, Airspace, FlightpathConfig, FlightTable, NoDataReason, OdinFlightpathError,
    OutputVariant, TableCache, TransformOutcome, NORMAL
};
use odin_flightpath::output::{OUTPUT_COLUMNS, ZONE_OUTPUT_COLUMNS};

const FLIGHT_A_LATS: [&str;10] = ["48.1", "48.2", "48.3", "48.4", "48.55", "48.6", "48.7", "48.8", "48.95", "49.0"];

fn time (secs: u32)->String { format!("2024/05/01,12:00:{secs:02}.250") }

fn msg1 (hex: &str, secs: u32, callsign: &str)->String {
    let t = time(secs);
    format!("MSG,1,1,1,{hex},1,{t},{t},{callsign},,,,,,,,,,,0")
}

fn msg3 (hex: &str, secs: u32, alt: u32, lat: &str, lon: &str)->String {
    let t = time(secs);
    format!("MSG,3,1,1,{hex},1,{t},{t},,{alt},,,{lat},{lon},,,,,,0")
}

fn msg4 (hex: &str, secs: u32, gs: u32, trk: u32)->String {
    let t = time(secs);
    format!("MSG,4,1,1,{hex},1,{t},{t},,,{gs},{trk},,,0,,,,,0")
}

/// three flights: A crosses the Paris zone, B never reports a callsign, C gets its callsign only at the end
fn sbs_lines ()->Vec<String> {
    let mut lines = Vec::new();
    lines.push( msg1( "CCCCCC", 5, "EZY12AB"));
    lines.push( msg1( "AAAAAA", 0, "AFR1234"));
    lines.push( msg4( "AAAAAA", 0, 450, 5));
    for (i,lat) in FLIGHT_A_LATS.iter().enumerate() {
        lines.push( msg3( "AAAAAA", i as u32 + 1, 35000, lat, "2.4"));
        if i < 3 {
            lines.push( msg3( "BBBBBB", i as u32 + 1, 12000, "10.0", "0.0"));
        }
    }
    lines.push( msg4( "BBBBBB", 2, 300, 180));
    lines.push( msg3( "CCCCCC", 3, 8000, "45.3", "1.1"));
    lines.push( msg4( "CCCCCC", 2, 250, 270));
    lines.push( msg3( "CCCCCC", 1, 7000, "45.1", "1.0"));
    lines.push( msg3( "CCCCCC", 2, 7500, "45.2", "1.05"));
    lines
}

fn write_raw (path: &Path, lines: &[String]) {
    let mut w = RawTableWriter::create( path).unwrap();
    for line in lines { w.write_line( line).unwrap(); }
    w.flush().unwrap();
}

fn header (path: &Path)->String {
    std::fs::read_to_string( path).unwrap().lines().next().unwrap().to_string()
}

// run with "cargo test --test test_pipeline -- --nocapture"

#[test]
fn test_zone_aware_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("raw_data.csv");
    let output = dir.path().join("flight_data_transformed.csv");
    write_raw( &input, &sbs_lines());
    std::fs::write( &output, "stale content\n").unwrap();

    let outcome = run_transform( &input, &output, &FlightpathConfig::default()).unwrap();
    println!("{outcome}");

    let TransformOutcome::Written{ stats, table } = outcome else { panic!("no output written") };
    assert_eq!( stats.aggregate.initial, 21);
    assert_eq!( stats.aggregate.dropped, 8);
    assert_eq!( stats.aggregate.surviving, 13);
    assert_eq!( stats.aggregate.flights, 2);
    assert_eq!( stats.rows_written, 13);
    assert_eq!( stats.zone_hits, 4);

    for s in table.summaries() { println!("{s}"); }

    // flight A
    let a = table.flight( "AAAAAA").unwrap();
    assert_eq!( a.points.len(), 10);
    assert!( a.points.iter().all( |p| p.callsign == "AFR1234" && p.ground_speed == 450.0 && p.heading == 5.0));
    assert!( a.points.windows(2).all( |w| w[0].timestamp < w[1].timestamp));
    let autopilot: Vec<bool> = a.points.iter().map( |p| p.autopilot_on).collect();
    assert_eq!( autopilot, vec![false, true, true, true, true, true, true, true, true, true]);
    assert_eq!( a.points[0].deviation_m, 0.0);
    assert_eq!( a.points[5].deviation_m, 0.0);
    assert_eq!( a.points[9].deviation_m, 0.0);
    assert_eq!( a.route.to_string(), "48.1,2.4;48.6,2.4;49,2.4");
    let in_zone: Vec<Option<bool>> = a.points.iter().map( |p| p.in_restricted_zone).collect();
    assert_eq!( in_zone.iter().filter( |z| **z == Some(true)).count(), 4);
    assert_eq!( in_zone[6], Some(true));
    assert_eq!( in_zone[0], Some(false));

    // flight C got its callsign and speed propagated, B is gone
    let c = table.flight( "CCCCCC").unwrap();
    assert_eq!( c.points.len(), 3);
    assert!( c.points.iter().all( |p| p.callsign == "EZY12AB" && p.ground_speed == 250.0));
    assert!( table.flight( "BBBBBB").is_none());
    assert!( table.rows().all( |p| p.anomaly_type == NORMAL));

    // read back
    assert_eq!( header( &output), ZONE_OUTPUT_COLUMNS.join(","));
    let (rows, variant) = read_enriched_table( &output).unwrap();
    assert_eq!( variant, OutputVariant::ZoneAware);
    assert_eq!( rows.len(), 13);
    assert!( rows.iter().zip( table.rows()).all( |(r,p)| r == p));

    // deviations can be recomputed from what we read
    let reread = FlightTable::from_rows( rows);
    assert_eq!( reread.n_flights(), 2);
    for block in reread.flights() {
        for p in &block.points {
            assert!( (block.route.deviation_m( &p.position()) - p.deviation_m).abs() < 1e-6);
        }
    }

    let csv = std::fs::read_to_string( &output).unwrap();
    assert!( csv.contains( "2024-05-01T12:00:01.250Z"));
    assert!( !csv.contains( "stale"));
}

#[test]
fn test_basic_variant() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("raw_data.csv");
    let output = dir.path().join("out/transformed.csv");
    write_raw( &input, &sbs_lines());

    let config = FlightpathConfig { zone_detection: false, ..FlightpathConfig::default() };
    let outcome = run_transform( &input, &output, &config).unwrap();
    assert!( matches!( outcome, TransformOutcome::Written{..}));

    assert_eq!( header( &output), OUTPUT_COLUMNS.join(","));
    let (rows, variant) = read_enriched_table( &output).unwrap();
    assert_eq!( variant, OutputVariant::Basic);
    assert_eq!( rows.len(), 13);
    assert!( rows.iter().all( |p| p.in_restricted_zone.is_none()));
}

#[test]
fn test_anomaly_labels() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("raw_data.csv");
    let output = dir.path().join("transformed.csv");
    let labels = dir.path().join("labels.csv");
    write_raw( &input, &sbs_lines());
    std::fs::write( &labels, "flight_id,anomaly_type\nCCCCCC,Transponder_Off\n").unwrap();

    let config = FlightpathConfig { anomaly_labels: Some(labels), ..FlightpathConfig::default() };
    let outcome = run_transform( &input, &output, &config).unwrap();
    let table = outcome.table().unwrap();

    let c = table.flight( "CCCCCC").unwrap();
    assert!( c.points.iter().all( |p| p.anomaly_type == "Transponder_Off" && !p.autopilot_on));
    assert_eq!( c.summary().anomaly_type, "Transponder_Off");

    let a = table.flight( "AAAAAA").unwrap();
    assert!( a.points.iter().any( |p| p.autopilot_on));
}

#[test]
fn test_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("transformed.csv");

    let empty = dir.path().join("empty.csv");
    write_raw( &empty, &[]);
    let outcome = run_transform( &empty, &output, &FlightpathConfig::default()).unwrap();
    assert!( matches!( outcome, TransformOutcome::NoData( NoDataReason::EmptyInput)));
    assert!( !output.exists());

    // only flight B, which never has a callsign
    let filtered = dir.path().join("filtered.csv");
    let lines: Vec<String> = sbs_lines().into_iter().filter( |l| l.contains("BBBBBB")).collect();
    write_raw( &filtered, &lines);
    let outcome = run_transform( &filtered, &output, &FlightpathConfig::default()).unwrap();
    assert!( matches!( outcome, TransformOutcome::NoData( NoDataReason::AllFiltered)));
    assert!( !output.exists());
}

#[test]
fn test_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let res = run_transform( dir.path().join("nothing.csv"), dir.path().join("out.csv"), &FlightpathConfig::default());
    match res {
        Err(OdinFlightpathError::MissingInput(path)) => println!("missing: {path:?}"),
        other => panic!("unexpected result {other:?}")
    }
}

#[test]
fn test_summary_and_cache() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("raw_data.csv");
    write_raw( &input, &sbs_lines());

    let mut cache = TableCache::new();
    assert!( cache.current().is_none());

    let outcome = run_transform( &input, dir.path().join("t1.csv"), &FlightpathConfig::default()).unwrap();
    let TransformOutcome::Written{ table, .. } = outcome else { panic!("no output") };
    assert!( cache.replace( table).is_none());

    let snapshot = cache.current().unwrap();
    let s = snapshot.flight( "AAAAAA").unwrap().summary();
    assert_eq!( s.callsign, "AFR1234");
    assert_eq!( s.n_points, 10);
    assert_eq!( s.max_altitude, Some(35000.0));
    assert_eq!( s.mean_ground_speed, 450.0);
    assert_eq!( s.zone_hits, 4);
    assert!( s.max_deviation_m > 0.0);
    assert_eq!( s.anomaly_type, NORMAL);

    let outcome = run_transform( &input, dir.path().join("t2.csv"), &FlightpathConfig::default()).unwrap();
    let TransformOutcome::Written{ table, .. } = outcome else { panic!("no output") };
    let previous = cache.replace( table).unwrap();
    assert!( std::sync::Arc::ptr_eq( &previous, &snapshot)); // old readers keep their snapshot
    assert!( cache.last_update().is_some());
}

#[test]
fn test_sample_config() {
    let config: FlightpathConfig = load_config( "configs/flightpath.ron").unwrap();
    assert!( config.zone_detection);
    assert_eq!( config.timezone, chrono_tz::Tz::UTC);
    assert_eq!( config.restricted_zones.len(), 1);
    assert_eq!( config.restricted_zones[0], odin_flightpath::RestrictedZone::paris());
    assert!( config.anomaly_labels.is_none());
}
