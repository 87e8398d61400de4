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

use std::{env, path::PathBuf, time::Duration};
use serde::{Serialize,Deserialize};

use crate::errors::{OdinSbsError,Result,config_error};

pub const HOST_VAR: &str = "HOST";
pub const PORT_VAR: &str = "PORT";
pub const PROJECT_ROOT_VAR: &str = "PROJECT_ROOT";

/// connection and robustness parameters of the SBS feed client
#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct FeedConfig {
    pub host: String,
    pub port: u16,
    pub project_root: PathBuf, // base dir for relative data file names

    #[serde(default="default_read_timeout")]
    pub read_timeout: Duration, // a single socket read never blocks longer than this

    #[serde(default="default_connect_timeout")]
    pub connect_timeout: Duration,

    #[serde(default="default_retry_delay")]
    pub retry_delay: Duration, // initial delay after a failed connection attempt

    #[serde(default="default_backoff_factor")]
    pub backoff_factor: f64, // retry_delay growth per failed attempt

    #[serde(default="default_max_retries")]
    pub max_retries: u32, // consecutive errors before we give up

    #[serde(default)]
    pub max_duration: Option<Duration>, // optional deadline for the whole ingestion run

    #[serde(default="default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default="default_max_line_len")]
    pub max_line_len: usize, // longer partial lines are dropped (SBS lines are ~150 bytes)
}

fn default_read_timeout()->Duration { Duration::from_secs(10) }
fn default_connect_timeout()->Duration { Duration::from_secs(10) }
fn default_retry_delay()->Duration { Duration::from_secs(2) }
fn default_backoff_factor()->f64 { 1.5 }
fn default_max_retries()->u32 { 5 }
fn default_chunk_size()->usize { 4096 }
fn default_max_line_len()->usize { 1024 }

impl FeedConfig {
    pub fn new (host: impl Into<String>, port: u16, project_root: impl Into<PathBuf>)->Self {
        FeedConfig {
            host: host.into(),
            port,
            project_root: project_root.into(),
            read_timeout: default_read_timeout(),
            connect_timeout: default_connect_timeout(),
            retry_delay: default_retry_delay(),
            backoff_factor: default_backoff_factor(),
            max_retries: default_max_retries(),
            max_duration: None,
            chunk_size: default_chunk_size(),
            max_line_len: default_max_line_len(),
        }
    }

    /// get host, port and project root from the process environment. This fails before anything
    /// else happens if the port is not set or does not parse as an integer
    pub fn from_env ()->Result<Self> {
        Self::from_vars( |key| env::var(key).ok())
    }

    /// the testable core of [`from_env`]
    pub fn from_vars<F> (get: F)->Result<Self> where F: Fn(&str)->Option<String> {
        let host = get(HOST_VAR).ok_or_else( || config_error!("environment variable {} not set", HOST_VAR))?;

        let port = get(PORT_VAR).ok_or_else( || config_error!("environment variable {} not set", PORT_VAR))?;
        let port: u16 = port.trim().parse().map_err( |_| config_error!("{} is not a valid port number: '{}'", PORT_VAR, port))?;

        let project_root = get(PROJECT_ROOT_VAR).map( PathBuf::from).unwrap_or_else( || PathBuf::from("."));

        Ok( FeedConfig::new( host, port, project_root) )
    }

    pub fn addr (&self)->String { format!("{}:{}", self.host, self.port) }

    /// resolve a data file name relative to the project root (absolute paths are kept as they are)
    pub fn data_path (&self, filename: &str)->PathBuf {
        self.project_root.join( filename)
    }

    /// the delay before retry number `n` (0-based), growing geometrically with `backoff_factor`
    pub fn retry_delay_for (&self, n: u32)->Duration {
        self.retry_delay.mul_f64( self.backoff_factor.powi( n as i32))
    }
}
