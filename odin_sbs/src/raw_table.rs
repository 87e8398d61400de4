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

//! the raw table is the persisted form of an ingestion run: a header row with the 22 SBS column names
//! followed by one row per accepted MSG line, padded to 22 fields

use std::{fs::File, path::{Path,PathBuf}};
use chrono_tz::Tz;
use tracing::{debug,warn};

use crate::{SBS_COLUMNS, split_fields};
use crate::sbs::{Observation, parse_fields};
use crate::errors::Result;

/// where the feed client puts accepted lines
pub trait RawLineSink {
    fn write_line (&mut self, line: &str)->Result<()>;
    fn flush (&mut self)->Result<()>;
}

/// keeps lines in memory (mostly for tests and tools that do not persist)
impl RawLineSink for Vec<String> {
    fn write_line (&mut self, line: &str)->Result<()> {
        self.push( line.to_string());
        Ok(())
    }
    fn flush (&mut self)->Result<()> { Ok(()) }
}

/// incremental CSV writer for the raw table. Creating it truncates any previous file at the same path
pub struct RawTableWriter {
    path: PathBuf,
    writer: csv::Writer<File>,
    n_rows: usize,
}

impl RawTableWriter {
    pub fn create<P: AsRef<Path>> (path: P)->Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut writer = csv::WriterBuilder::new().flexible(false).from_path( &path)?;
        writer.write_record( SBS_COLUMNS.iter())?;
        writer.flush()?;

        Ok( RawTableWriter{ path, writer, n_rows: 0 } )
    }

    pub fn path (&self)->&Path { self.path.as_path() }
    pub fn n_rows (&self)->usize { self.n_rows }
}

impl RawLineSink for RawTableWriter {
    fn write_line (&mut self, line: &str)->Result<()> {
        self.writer.write_record( split_fields( line))?;
        self.n_rows += 1;
        Ok(())
    }

    fn flush (&mut self)->Result<()> {
        Ok( self.writer.flush()? )
    }
}

/// read a raw table back into observations, skipping (and logging) rows the CSV reader cannot decode.
/// Rows with fewer than 22 columns are accepted (missing fields count as empty)
pub fn read_raw_table<P: AsRef<Path>> (path: P, source_tz: &Tz)->Result<Vec<Observation>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path( path.as_ref())?;

    let mut observations: Vec<Observation> = Vec::new();
    let mut n_skipped = 0;

    for (i,res) in reader.records().enumerate() {
        match res {
            Ok(rec) => {
                let fields: Vec<&str> = rec.iter().collect();
                match parse_fields( &fields, source_tz) {
                    Ok(obs) => observations.push( obs),
                    Err(e) => { n_skipped += 1; warn!("row {}: {}", i+1, e) }
                }
            }
            Err(e) => { n_skipped += 1; warn!("row {}: {}", i+1, e) }
        }
    }

    debug!("read {} observations from {:?} ({} rows skipped)", observations.len(), path.as_ref(), n_skipped);
    Ok(observations)
}
