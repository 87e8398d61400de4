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

use std::fmt;
use chrono::{DateTime, Utc, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::{MSG_TAG, split_fields};
use crate::errors::{Result, OdinSbsError, parse_error};

// field indices
const HEX_IDENT: usize = 4;
const DATE_GENERATED: usize = 6;
const TIME_GENERATED: usize = 7;
const CALLSIGN: usize = 10;
const ALTITUDE: usize = 11;
const GROUND_SPEED: usize = 12;
const TRACK: usize = 13;
const LATITUDE: usize = 14;
const LONGITUDE: usize = 15;

/// one decoded SBS message. Every field is optional at this stage - which ones have to be present is
/// decided after track propagation, not by the parser
#[derive(Debug,Clone,PartialEq,Default)]
pub struct Observation {
    pub flight_id: Option<String>, // the ICAO 24 bit HexIdent
    pub callsign: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>, // ft (mode-C, flight level reference)
    pub ground_speed: Option<f64>, // knots
    pub heading: Option<f64>, // track over ground in degrees
    pub timestamp: Option<DateTime<Utc>>,
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "Observation( id: {}", self.flight_id.as_deref().unwrap_or("?"))?;
        if let Some(cs) = &self.callsign { write!( f, ", cs: \"{cs}\"")?; }
        if let (Some(lat),Some(lon)) = (self.latitude,self.longitude) { write!( f, ", pos: [{lat},{lon}]")?; }
        if let Some(alt) = self.altitude { write!( f, ", alt: {alt:.0}")?; }
        if let Some(spd) = self.ground_speed { write!( f, ", spd: {spd:.1}")?; }
        if let Some(hdg) = self.heading { write!( f, ", hdg: {hdg:.0}")?; }
        if let Some(ts) = &self.timestamp { write!( f, ", time: {}", ts.format("%Y-%m-%d %H:%M:%S%.3f"))?; }
        write!( f, ")")
    }
}

/// SBS as documented on http://woodair.net/SBS/Article/Barebones42_Socket_Data.htm
///
/// Message examples:
///  MSG,1,111,11111,AA2BC2,111111,2016/03/11,13:07:16.663,2016/03/11,13:07:16.626,UAL814  ,,,,,,,,,,,0
///  MSG,3,111,11111,A04424,111111,2016/03/11,13:07:05.343,2016/03/11,13:07:05.288,,11025,,,37.17274,-122.03935,,,,,,0
///  MSG,4,111,11111,AC1FCC,111111,2016/03/11,13:07:07.777,2016/03/11,13:07:07.713,,,316,106,,,1536,,,,,0
///
/// Only lines starting with `MSG` are accepted. Short lines are padded, they are not an error.
/// Individual fields that do not parse (e.g. a non-numeric latitude) just end up as `None`.
pub fn parse_line (line: &str, source_tz: &Tz)->Result<Observation> {
    let line = line.trim_end_matches( ['\r','\n']);
    if !line.starts_with( MSG_TAG) {
        return Err( parse_error!("not an SBS {} line: '{}'", MSG_TAG, line))
    }
    parse_fields( &split_fields(line), source_tz)
}

/// map already split fields (e.g. a raw table row) positionally onto an [`Observation`]. Missing trailing
/// fields count as empty, fields beyond [`crate::N_FIELDS`] are ignored
pub fn parse_fields<S: AsRef<str>> (fields: &[S], source_tz: &Tz)->Result<Observation> {
    let field = |i: usize| fields.get(i).map( |s| s.as_ref().trim()).unwrap_or("");

    Ok( Observation {
        flight_id: opt_str( field(HEX_IDENT)),
        callsign: opt_str( field(CALLSIGN)),
        latitude: opt_f64( field(LATITUDE)),
        longitude: opt_f64( field(LONGITUDE)),
        altitude: opt_f64( field(ALTITUDE)),
        ground_speed: opt_f64( field(GROUND_SPEED)),
        heading: opt_f64( field(TRACK)),
        timestamp: get_utc_datetime( field(DATE_GENERATED), field(TIME_GENERATED), source_tz).ok(),
    })
}

fn opt_str (s: &str)->Option<String> {
    if s.is_empty() { None } else { Some(s.to_string()) }
}

fn opt_f64 (s: &str)->Option<f64> {
    s.parse::<f64>().ok().filter( |v| v.is_finite())
}

// note that dump1090 does report time in local timezone, i.e. we have to convert to UTC
pub fn get_utc_datetime (date: &str, time: &str, tz: &Tz)->Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str( date, "%Y/%m/%d").or_else( |_| NaiveDate::parse_from_str( date, "%Y-%m-%d"))?;
    let time = NaiveTime::parse_from_str( time, "%H:%M:%S%.f")?;

    let dt = match tz.from_local_datetime( &date.and_time(time)) {
        chrono::offset::LocalResult::Single(dt) => dt,
        chrono::offset::LocalResult::Ambiguous(_, dt2) => dt2, // we don't care about that precision
        chrono::offset::LocalResult::None => return Err( OdinSbsError::OpFailedError("forward time jump cannot be mapped to UTC".into())),
    };
    Ok( dt.with_timezone( &Utc) )
}
