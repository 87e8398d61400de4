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

//! geodetic primitives on top of the [geo](https://docs.rs/geo/latest/geo/index.html) crate, using the
//! new type pattern so that we keep lat/lon semantics (geo uses x,y) and [uom](https://docs.rs/uom/latest/uom/)
//! lengths while still being able to use the geo algorithms without copying

use std::fmt;
use serde::{Serialize,Deserialize};
use geo::{Coord, Distance, Point, Rect};
use geo::algorithm::line_measures::metric_spaces::Geodesic;
use uom::si::f64::Length;
use uom::si::length::meter;

/// the serialized form of a [`GeoPoint`] - latitude first, as in the SBS/CSV data
#[derive(Serialize,Deserialize,Debug,Clone,Copy)]
struct LatLon {
    #[serde(alias="latitude")]
    lat: f64,
    #[serde(alias="longitude")]
    lon: f64,
}

/// a wrapper for geo::Point that uses geodetic degrees stored as f64. Unlike a general
/// purpose point this does not normalize, since invalid input has to stay detectable
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(from="LatLon", into="LatLon")]
pub struct GeoPoint(Point);

impl GeoPoint {
    pub fn from_lat_lon_degrees (lat: f64, lon: f64)->Self { GeoPoint( Point::new( lon, lat)) }

    pub fn latitude_degrees (&self)->f64 { self.0.y() }
    pub fn longitude_degrees (&self)->f64 { self.0.x() }

    pub fn point (&self)->&Point { &self.0 }

    /// finite and within [-90,90] latitude
    pub fn is_valid (&self)->bool {
        let lat = self.0.y();
        let lon = self.0.x();
        lat.is_finite() && lon.is_finite() && lat.abs() <= 90.0
    }

    /// surface distance on the WGS84 ellipsoid (Karney's geodesic algorithm).
    /// None if either point is not a valid position
    pub fn geodesic_distance (&self, other: &GeoPoint)->Option<Length> {
        if self.is_valid() && other.is_valid() {
            let d = Geodesic.distance( self.0, other.0);
            if d.is_finite() { Some( Length::new::<meter>(d)) } else { None }
        } else {
            None
        }
    }
}

impl From<LatLon> for GeoPoint {
    fn from (ll: LatLon)->Self { GeoPoint::from_lat_lon_degrees( ll.lat, ll.lon) }
}

impl From<GeoPoint> for LatLon {
    fn from (p: GeoPoint)->Self { LatLon{ lat: p.latitude_degrees(), lon: p.longitude_degrees() } }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.0.y(), self.0.x())
    }
}

/// axis aligned lat/lon rectangle (does not handle the antimeridian)
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct GeoRect(Rect);

impl GeoRect {
    /// corners in any order - geo::Rect sorts out min and max
    pub fn from_corners (p1: GeoPoint, p2: GeoPoint)->Self {
        GeoRect( Rect::new( p1.0.0, p2.0.0))
    }

    pub fn south (&self)->f64 { self.0.min().y }
    pub fn north (&self)->f64 { self.0.max().y }
    pub fn west (&self)->f64 { self.0.min().x }
    pub fn east (&self)->f64 { self.0.max().x }

    /// boundary counts as inside
    pub fn contains (&self, p: &GeoPoint)->bool {
        let lat = p.latitude_degrees();
        let lon = p.longitude_degrees();
        lat >= self.south() && lat <= self.north() && lon >= self.west() && lon <= self.east()
    }
}

impl fmt::Display for GeoRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]-[{},{}]", self.south(), self.west(), self.north(), self.east())
    }
}
