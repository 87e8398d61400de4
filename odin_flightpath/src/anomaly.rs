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

//! externally supplied anomaly labels and the interface of the (external) anomaly classifier.
//! The transform itself never assigns anything but [`NORMAL`]

use std::{collections::HashMap, path::Path};
use serde::Deserialize;
use tracing::{info,warn};

use crate::EnrichedPoint;
use crate::errors::Result;

/// the default label
pub const NORMAL: &str = "Normal";

#[derive(Debug,Deserialize)]
struct LabelRecord {
    flight_id: String,
    anomaly_type: String,
}

/// per flight anomaly labels. Flights without an entry are [`NORMAL`]
#[derive(Debug,Clone,Default)]
pub struct AnomalyLabels {
    labels: HashMap<String,String>,
}

impl AnomalyLabels {
    pub fn new ()->Self { AnomalyLabels::default() }

    /// read a CSV file with `flight_id,anomaly_type` columns. Rows that do not decode are skipped,
    /// later rows for the same flight override earlier ones
    pub fn from_csv_file<P: AsRef<Path>> (path: P)->Result<Self> {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).flexible(true).trim( csv::Trim::All).from_path( path.as_ref())?;
        let mut labels = HashMap::new();

        for (i,res) in reader.deserialize::<LabelRecord>().enumerate() {
            match res {
                Ok(rec) => {
                    if !rec.flight_id.is_empty() && !rec.anomaly_type.is_empty() {
                        labels.insert( rec.flight_id, rec.anomaly_type);
                    }
                }
                Err(e) => warn!("skipping anomaly label row {}: {}", i+1, e)
            }
        }

        info!("loaded {} anomaly labels from {:?}", labels.len(), path.as_ref());
        Ok( AnomalyLabels { labels })
    }

    pub fn insert (&mut self, flight_id: impl ToString, anomaly_type: impl ToString) {
        self.labels.insert( flight_id.to_string(), anomaly_type.to_string());
    }

    pub fn label_for (&self, flight_id: &str)->&str {
        self.labels.get( flight_id).map( |s| s.as_str()).unwrap_or( NORMAL)
    }

    pub fn len (&self)->usize { self.labels.len() }
    pub fn is_empty (&self)->bool { self.labels.is_empty() }
}

/// input of the anomaly classifier, in the fixed order of [`FeatureVector::NAMES`]
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct FeatureVector(pub [f64;7]);

impl FeatureVector {
    pub const NAMES: [&'static str;7] = [
        "latitude", "longitude", "altitude", "ground_speed", "heading", "autopilot_on", "deviation_m"
    ];

    /// a missing altitude becomes 0.0
    pub fn from_point (p: &EnrichedPoint)->Self {
        FeatureVector([
            p.latitude,
            p.longitude,
            p.altitude.unwrap_or(0.0),
            p.ground_speed,
            p.heading,
            if p.autopilot_on { 1.0 } else { 0.0 },
            p.deviation_m
        ])
    }

    pub fn as_slice (&self)->&[f64] { &self.0 }
}

/// the opaque classifier that maps features to an anomaly label (e.g. a trained model served elsewhere).
/// Labels it returns can be fed back through [`AnomalyLabels`]
pub trait AnomalyClassifier {
    fn classify (&self, features: &FeatureVector)->Result<String>;
}
