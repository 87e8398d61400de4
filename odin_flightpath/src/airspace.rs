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

//! restricted airspace detection. Zones are axis aligned lat/lon rectangles that are configured statically

use std::fmt;
use serde::{Serialize,Deserialize};

use crate::geo::{GeoPoint, GeoRect};

/// a restricted area given by its four corners. Only the SW/NW latitudes and SW/NE longitudes are used
/// to compute the bounds
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct RestrictedZone {
    pub name: String,
    pub sw: GeoPoint,
    pub nw: GeoPoint,
    pub ne: GeoPoint,
    pub se: GeoPoint,
}

impl RestrictedZone {
    pub fn new (name: impl ToString, sw: GeoPoint, nw: GeoPoint, ne: GeoPoint, se: GeoPoint)->Self {
        RestrictedZone { name: name.to_string(), sw, nw, ne, se }
    }

    /// the restricted area around Paris we use if nothing else is configured
    pub fn paris ()->Self {
        RestrictedZone::new( "Paris",
            GeoPoint::from_lat_lon_degrees( 48.5, 2.2),
            GeoPoint::from_lat_lon_degrees( 48.9, 2.2),
            GeoPoint::from_lat_lon_degrees( 48.9, 2.6),
            GeoPoint::from_lat_lon_degrees( 48.5, 2.6)
        )
    }

    pub fn bounds (&self)->GeoRect {
        GeoRect::from_corners(
            GeoPoint::from_lat_lon_degrees( self.sw.latitude_degrees(), self.sw.longitude_degrees()),
            GeoPoint::from_lat_lon_degrees( self.nw.latitude_degrees(), self.ne.longitude_degrees())
        )
    }

    /// inclusive on all four boundaries
    pub fn contains (&self, p: &GeoPoint)->bool {
        self.bounds().contains( p)
    }
}

impl fmt::Display for RestrictedZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{} {}", self.name, self.bounds())
    }
}

/// the immutable set of restricted zones of a run
#[derive(Debug,Clone)]
pub struct Airspace {
    zones: Vec<(RestrictedZone,GeoRect)>,
}

impl Airspace {
    pub fn new (zones: Vec<RestrictedZone>)->Self {
        let zones = zones.into_iter().map( |z| { let bounds = z.bounds(); (z,bounds) }).collect();
        Airspace { zones }
    }

    pub fn len (&self)->usize { self.zones.len() }
    pub fn is_empty (&self)->bool { self.zones.is_empty() }

    pub fn zones (&self)->impl Iterator<Item=&RestrictedZone> { self.zones.iter().map( |(z,_)| z) }

    /// true if `p` is inside of any zone
    pub fn is_restricted (&self, p: &GeoPoint)->bool {
        self.zones.iter().any( |(_,bounds)| bounds.contains( p))
    }

    /// the first zone containing `p`
    pub fn zone_of (&self, p: &GeoPoint)->Option<&RestrictedZone> {
        self.zones.iter().find( |(_,bounds)| bounds.contains( p)).map( |(z,_)| z)
    }
}

impl Default for Airspace {
    fn default ()->Self { Airspace::new( vec![ RestrictedZone::paris() ]) }
}
