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

//! heuristic autopilot labels for training data. This is not a measured avionics state

use crate::anomaly::NORMAL;

/// autopilot estimate for point `i` of a track with `n` points: off during a labeled anomaly and within
/// the first and last decile of the track (take-off and landing), on otherwise.
/// Index and decile bounds are compared as floats without rounding and both comparisons are strict, so
/// `i == 0.9·n` is still on (index 9 of a 10 point track)
pub fn is_autopilot_on (i: usize, n: usize, anomaly_type: &str)->bool {
    if anomaly_type != NORMAL {
        return false
    }

    let i = i as f64;
    let n = n as f64;
    !(i < 0.1 * n || i > 0.9 * n)
}

/// flags for a whole track that carries the same anomaly label for all its points
pub fn autopilot_flags (n: usize, anomaly_type: &str)->Vec<bool> {
    (0..n).map( |i| is_autopilot_on( i, n, anomaly_type)).collect()
}
