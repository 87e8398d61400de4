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

//! the reconnecting SBS feed client.
//!
//! ```text
//!   Disconnected ──▶ Connecting ──▶ Streaming ──▶ Done
//!                      ▲   │            │
//!                      │   ▼            ▼
//!                   (backoff)◀──── (error / close)
//!                      │
//!                      ▼
//!                   Aborted            (Cancelled from any blocking point)
//! ```
//! Network problems never escape as errors - they end up in [`FeedOutcome::Aborted`] once the consecutive
//! error count reaches `max_retries`. The only `Err` results are failures to write the local raw table.

use std::{fmt, io, time::Duration};
use async_trait::async_trait;
use memchr::memchr;
use tokio::{io::{AsyncRead,AsyncReadExt}, net::TcpStream, time::{sleep_until,timeout,Instant}};
use tokio_util::sync::CancellationToken;
use tracing::{debug,info,warn};

use crate::MSG_TAG;
use crate::config::FeedConfig;
use crate::raw_table::RawLineSink;
use crate::errors::Result;

/// the abstraction of where SBS bytes come from, which lets us test reconnection without sockets
#[async_trait]
pub trait SbsSource: Send {
    type Stream: AsyncRead + Unpin + Send;

    async fn connect (&mut self)->io::Result<Self::Stream>;

    fn describe (&self)->String;
}

/// plain TCP source (e.g. dump1090 port 30003)
pub struct TcpSource {
    addr: String,
    connect_timeout: Duration,
}

impl TcpSource {
    pub fn new (addr: impl Into<String>, connect_timeout: Duration)->Self {
        TcpSource{ addr: addr.into(), connect_timeout }
    }

    pub fn from_config (config: &FeedConfig)->Self {
        TcpSource::new( config.addr(), config.connect_timeout)
    }
}

#[async_trait]
impl SbsSource for TcpSource {
    type Stream = TcpStream;

    async fn connect (&mut self)->io::Result<TcpStream> {
        match timeout( self.connect_timeout, TcpStream::connect( &self.addr)).await {
            Ok(res) => res,
            Err(_) => Err( io::Error::new( io::ErrorKind::TimedOut, format!("connect to {} timed out", self.addr)))
        }
    }

    fn describe (&self)->String { self.addr.clone() }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum FeedState {
    Disconnected,
    Connecting,
    Streaming,
    Done,
    Aborted,
    Cancelled
}

#[derive(Debug,Clone,PartialEq,Eq)]
pub enum AbortReason {
    TooManyErrors(u32),
    Deadline
}

/// how an ingestion run ended. Only `Aborted` is a failure, but all variants leave whatever was received
/// in the sink
#[derive(Debug,Clone,PartialEq,Eq)]
pub enum FeedOutcome {
    Done { received: usize },
    Aborted { received: usize, requested: usize, reason: AbortReason },
    Cancelled { received: usize, requested: usize },
}

impl FeedOutcome {
    pub fn received (&self)->usize {
        match self {
            FeedOutcome::Done{received} => *received,
            FeedOutcome::Aborted{received,..} => *received,
            FeedOutcome::Cancelled{received,..} => *received,
        }
    }

    pub fn is_failure (&self)->bool { matches!( self, FeedOutcome::Aborted{..}) }
}

impl fmt::Display for FeedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedOutcome::Done{received} => write!( f, "done: received {received} messages"),
            FeedOutcome::Aborted{received,requested,reason} => match reason {
                AbortReason::TooManyErrors(n) => write!( f, "aborted after {n} consecutive errors: received {received}/{requested} messages"),
                AbortReason::Deadline => write!( f, "aborted at deadline: received {received}/{requested} messages"),
            }
            FeedOutcome::Cancelled{received,requested} => write!( f, "cancelled: received {received}/{requested} messages"),
        }
    }
}

/// how a single connection ended
enum StreamEnd {
    TargetReached,
    Closed { n_lines: usize },
    Failed(io::Error),
    Deadline,
    Cancelled,
}

pub struct FeedClient<S: SbsSource> {
    source: S,
    config: FeedConfig,
    cancel: CancellationToken,

    state: FeedState,
    consecutive_errors: u32,
    received: usize,
    deadline: Option<Instant>,
}

impl<S: SbsSource> FeedClient<S> {
    pub fn new (source: S, config: FeedConfig, cancel: CancellationToken)->Self {
        FeedClient {
            source,
            config,
            cancel,
            state: FeedState::Disconnected,
            consecutive_errors: 0,
            received: 0,
            deadline: None,
        }
    }

    pub fn state (&self)->FeedState { self.state }
    pub fn consecutive_errors (&self)->u32 { self.consecutive_errors }
    pub fn received (&self)->usize { self.received }
    pub fn source (&self)->&S { &self.source }

    /// read until `target` MSG lines have been forwarded to `sink`, the client gives up or it gets cancelled.
    /// The sink is flushed after every chunk and before returning
    pub async fn run<K: RawLineSink> (&mut self, target: usize, sink: &mut K)->Result<FeedOutcome> {
        info!("start acquisition from {} ({} messages)", self.source.describe(), target);

        self.received = 0;
        self.consecutive_errors = 0;
        self.deadline = self.config.max_duration.map( |d| Instant::now() + d);
        let cancel = self.cancel.clone();

        let outcome = loop {
            if self.received >= target {
                break self.finish( FeedState::Done, target);
            }
            if self.is_past_deadline() {
                break self.finish( FeedState::Aborted, target);
            }

            self.set_state( FeedState::Connecting);
            debug!("connection attempt ({}/{})", self.consecutive_errors + 1, self.config.max_retries);

            let conn = tokio::select! {
                biased;
                _ = cancel.cancelled() => { break self.finish( FeedState::Cancelled, target) }
                res = self.source.connect() => res
            };

            let delay = match conn {
                Ok(mut stream) => {
                    info!("connected to {}", self.source.describe());
                    self.set_state( FeedState::Streaming);

                    let delay = match self.stream_lines( &mut stream, target, sink).await? {
                        StreamEnd::TargetReached => continue, // checked at loop top
                        StreamEnd::Closed{n_lines} if n_lines > 0 => {
                            info!("server closed connection");
                            self.config.retry_delay
                        }
                        StreamEnd::Closed{..} => {
                            if self.count_error( "server closed connection without data") {
                                break self.finish( FeedState::Aborted, target);
                            }
                            self.backoff_delay()
                        }
                        StreamEnd::Failed(e) => {
                            if self.count_error( &format!("stream error: {e}")) {
                                break self.finish( FeedState::Aborted, target);
                            }
                            self.backoff_delay()
                        }
                        StreamEnd::Deadline => { break self.finish( FeedState::Aborted, target) }
                        StreamEnd::Cancelled => { break self.finish( FeedState::Cancelled, target) }
                    };
                    self.set_state( FeedState::Disconnected);
                    delay
                }

                Err(e) => {
                    self.set_state( FeedState::Disconnected);
                    if self.count_error( &format!("connection error: {e}")) {
                        break self.finish( FeedState::Aborted, target);
                    }
                    self.backoff_delay()
                }
            };

            // never sleep past the deadline, the loop top turns that into Aborted
            let wake_up = Instant::now() + delay;
            let wake_up = self.deadline.map_or( wake_up, |d| wake_up.min(d));
            info!("reconnect in {:.1}s", delay.as_secs_f64());
            tokio::select! {
                biased;
                _ = cancel.cancelled() => { break self.finish( FeedState::Cancelled, target) }
                _ = sleep_until( wake_up) => {}
            }
        };

        sink.flush()?;
        match &outcome {
            FeedOutcome::Aborted{..} => warn!("{outcome}"),
            _ => info!("{outcome}")
        }
        Ok(outcome)
    }

    /// the Streaming state. Lines can span chunks - an incomplete tail is kept until its newline shows up.
    /// A tail that grows beyond `max_line_len` is dropped up to its newline
    async fn stream_lines<K: RawLineSink> (&mut self, stream: &mut S::Stream, target: usize, sink: &mut K)->Result<StreamEnd> {
        let cancel = self.cancel.clone();
        let mut buf = vec![0u8; self.config.chunk_size.max(1)];
        let mut pending: Vec<u8> = Vec::with_capacity( buf.len() * 2);
        let mut discarding = false;
        let mut n_lines = 0;

        loop {
            if self.is_past_deadline() {
                return Ok( StreamEnd::Deadline)
            }

            let res = tokio::select! {
                biased;
                _ = cancel.cancelled() => { return Ok( StreamEnd::Cancelled) }
                res = timeout( self.config.read_timeout, stream.read( &mut buf)) => res
            };

            match res {
                Err(_) => { // read timeout - no data yet, not an error
                    debug!("no data within {:?}", self.config.read_timeout);
                    continue
                }
                Ok(Ok(0)) => {
                    if !pending.is_empty() { // last line without newline
                        let line = std::mem::take( &mut pending);
                        if self.accept_line( &line, sink)? { n_lines += 1; }
                        sink.flush()?;
                    }
                    return Ok( if self.received >= target { StreamEnd::TargetReached } else { StreamEnd::Closed{n_lines} })
                }
                Ok(Ok(len)) => {
                    let mut chunk = &buf[..len];
                    if discarding {
                        match memchr( b'\n', chunk) {
                            Some(i) => {
                                discarding = false;
                                chunk = &chunk[i+1..];
                            }
                            None => continue
                        }
                    }
                    pending.extend_from_slice( chunk);

                    let mut start = 0;
                    while let Some(i) = memchr( b'\n', &pending[start..]) {
                        let end = start + i;
                        if self.accept_line( &pending[start..end], sink)? { n_lines += 1; }
                        start = end + 1;

                        if self.received >= target {
                            sink.flush()?;
                            return Ok( StreamEnd::TargetReached)
                        }
                    }
                    pending.drain( ..start);

                    if pending.len() > self.config.max_line_len {
                        warn!("dropping line exceeding {} bytes", self.config.max_line_len);
                        pending.clear();
                        discarding = true;
                    }
                    sink.flush()?;
                }
                Ok(Err(e)) => {
                    sink.flush()?;
                    return Ok( StreamEnd::Failed(e))
                }
            }
        }
    }

    /// forward a MSG line to the sink, silently drop everything else
    fn accept_line<K: RawLineSink> (&mut self, bytes: &[u8], sink: &mut K)->Result<bool> {
        let line = String::from_utf8_lossy( bytes);
        let line = line.trim_end_matches('\r');

        if line.starts_with( MSG_TAG) {
            sink.write_line( line)?;
            self.received += 1;
            self.consecutive_errors = 0; // we got data over this connection
            if self.received % 100 == 0 {
                info!("received {} messages", self.received);
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// the delay after the current run of `consecutive_errors` (at least 1) failures
    fn backoff_delay (&self)->Duration {
        self.config.retry_delay_for( self.consecutive_errors.saturating_sub(1))
    }

    /// increment the consecutive error count and return true if we reached the ceiling
    fn count_error (&mut self, msg: &str)->bool {
        self.consecutive_errors += 1;
        warn!("{} ({}/{})", msg, self.consecutive_errors, self.config.max_retries);
        self.consecutive_errors >= self.config.max_retries
    }

    fn is_past_deadline (&self)->bool {
        self.deadline.map( |d| Instant::now() >= d).unwrap_or(false)
    }

    fn set_state (&mut self, state: FeedState) {
        if state != self.state {
            debug!("feed state {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    fn finish (&mut self, state: FeedState, requested: usize)->FeedOutcome {
        self.set_state( state);
        let received = self.received;

        match state {
            FeedState::Cancelled => FeedOutcome::Cancelled{ received, requested },
            FeedState::Aborted => {
                let reason = if self.consecutive_errors >= self.config.max_retries {
                    AbortReason::TooManyErrors( self.consecutive_errors)
                } else {
                    AbortReason::Deadline
                };
                FeedOutcome::Aborted{ received, requested, reason }
            }
            _ => FeedOutcome::Done{ received }
        }
    }
}
