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

//! coarse intended routes and the deviation of track points from them.
//!
//! A [`RoutePolyline`] is not a filed flight plan. It consists of the first, the last and (for tracks with
//! more than two points) the middle point of the observed track. Deviation is measured against the
//! waypoints only, not against the segments between them

use std::{fmt, str::FromStr};
use tracing::debug;
use uom::si::f64::Length;
use uom::si::length::meter;

use crate::geo::GeoPoint;
use crate::track::FlightTrack;
use crate::errors::{Result, OdinFlightpathError, parse_error};

#[derive(Debug,Clone,PartialEq,Default)]
pub struct RoutePolyline {
    waypoints: Vec<GeoPoint>,
}

impl RoutePolyline {
    pub fn empty ()->Self { RoutePolyline { waypoints: Vec::new() } }

    /// first, middle (at index len/2, only if len > 2) and last point of the track
    pub fn from_track (track: &FlightTrack)->Self {
        let positions: Vec<GeoPoint> = track.points().iter().map( |p| p.position()).collect();
        Self::from_positions( &positions)
    }

    pub fn from_positions (positions: &[GeoPoint])->Self {
        let n = positions.len();
        let waypoints = match n {
            0 => Vec::new(),
            1 | 2 => vec![ positions[0], positions[n-1] ],
            _ => vec![ positions[0], positions[n/2], positions[n-1] ]
        };
        RoutePolyline { waypoints }
    }

    /// parse the `lat,lon;lat,lon[;lat,lon]` text form. Malformed input (including an invalid number of
    /// waypoints or out of range coordinates) is reported as an error
    pub fn try_parse (s: &str)->Result<Self> {
        let mut waypoints = Vec::with_capacity(3);
        for wp in s.trim().split(';') {
            let (lat,lon) = wp.split_once(',').ok_or_else( || parse_error!("not a 'lat,lon' waypoint: '{}'", wp))?;
            let lat: f64 = lat.trim().parse().map_err( |_| parse_error!("invalid latitude '{}'", lat))?;
            let lon: f64 = lon.trim().parse().map_err( |_| parse_error!("invalid longitude '{}'", lon))?;
            let p = GeoPoint::from_lat_lon_degrees( lat, lon);
            if !p.is_valid() { return Err( parse_error!("waypoint out of range: {}", wp)) }
            waypoints.push( p);
        }

        if waypoints.len() < 2 || waypoints.len() > 3 {
            Err( parse_error!("route needs 2 or 3 waypoints, got {}", waypoints.len()))
        } else {
            Ok( RoutePolyline { waypoints })
        }
    }

    /// lenient version of [`RoutePolyline::try_parse`] - malformed text yields an empty route
    pub fn parse (s: &str)->Self {
        Self::try_parse( s).unwrap_or_else( |e| {
            debug!("ignoring route '{}': {}", s, e);
            RoutePolyline::empty()
        })
    }

    pub fn waypoints (&self)->&[GeoPoint] { self.waypoints.as_slice() }
    pub fn len (&self)->usize { self.waypoints.len() }
    pub fn is_empty (&self)->bool { self.waypoints.is_empty() }

    /// geodesic distance from `p` to the closest waypoint. This is an analytic aid, hence an empty route,
    /// invalid coordinates or any other failure to compute it yields 0 instead of an error.
    /// Note that a single invalid waypoint makes the whole result 0, even if a valid waypoint is closer
    pub fn deviation (&self, p: &GeoPoint)->Length {
        let mut min: Option<Length> = None;
        for wp in &self.waypoints {
            match p.geodesic_distance( wp) {
                Some(d) => if min.map_or( true, |m| d < m) { min = Some(d) }
                None => return Length::new::<meter>(0.0)
            }
        }
        min.unwrap_or( Length::new::<meter>(0.0))
    }

    pub fn deviation_m (&self, p: &GeoPoint)->f64 {
        self.deviation( p).get::<meter>()
    }

    /// deviations of all points of `track` in meters, in track order
    pub fn track_deviations_m (&self, track: &FlightTrack)->Vec<f64> {
        track.points().iter().map( |tp| self.deviation_m( &tp.position())).collect()
    }
}

impl fmt::Display for RoutePolyline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i,wp) in self.waypoints.iter().enumerate() {
            if i > 0 { write!( f, ";")?; }
            write!( f, "{}", wp)?;
        }
        Ok(())
    }
}

impl FromStr for RoutePolyline {
    type Err = OdinFlightpathError;

    fn from_str (s: &str)->Result<Self> { Self::try_parse( s) }
}
