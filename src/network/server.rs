//! TCP Server
//!
//! Accepts connections and serves each one on its own thread.

use std::collections::HashMap;
use std::io::{BufWriter, ErrorKind};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender};

use crate::config::Config;
use crate::engine::Engine;
use crate::error::{KvError, Result};
use crate::protocol::{write_response, Response};

use super::Connection;

/// How long the accept loop sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// TCP server for SortedKV
///
/// ## Threading
/// - The calling thread runs the accept loop.
/// - Every accepted connection gets its own handler thread, so an idle
///   client never holds up another one. `max_connections` caps how many
///   handlers exist at once; extra clients get an ERROR response.
/// - Finished handlers report their id over a channel and are joined by the
///   accept loop. On shutdown the remaining sockets are closed and joined.
pub struct Server {
    config: Config,
    engine: Arc<Engine>,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
}

/// Cloneable handle that stops a running server
#[derive(Debug, Clone)]
pub struct ShutdownHandle(Arc<AtomicBool>);

impl ShutdownHandle {
    /// Ask the accept loop to stop; open connections are closed
    pub fn shutdown(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// A running connection handler
struct Handler {
    /// Second handle on the client socket, used to unblock the handler
    control: TcpStream,
    thread: JoinHandle<()>,
}

impl Server {
    /// Bind the listen address from `config`
    pub fn bind(config: Config, engine: Arc<Engine>) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen_addr).map_err(|e| {
            KvError::Network(format!("failed to bind {}: {}", config.listen_addr, e))
        })?;
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            engine,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// The bound address (useful when binding port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(Arc::clone(&self.shutdown))
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Start the server (blocking until shutdown)
    pub fn run(&self) -> Result<()> {
        let (done_tx, done_rx) = channel::unbounded::<u64>();
        let mut handlers: HashMap<u64, Handler> = HashMap::new();
        let mut next_id: u64 = 0;

        tracing::info!(
            addr = %self.local_addr()?,
            max_connections = self.config.max_connections,
            "server listening"
        );

        while !self.shutdown.load(Ordering::Relaxed) {
            reap_finished(&done_rx, &mut handlers);

            match self.listener.accept() {
                Ok((stream, peer)) => {
                    if let Err(e) = stream.set_nonblocking(false) {
                        tracing::warn!("Failed to configure stream from {}: {}", peer, e);
                        continue;
                    }

                    if self.active.load(Ordering::Acquire) >= self.config.max_connections {
                        tracing::warn!("Rejecting {}: connection limit reached", peer);
                        reject(stream);
                        continue;
                    }

                    let id = next_id;
                    next_id += 1;
                    match self.spawn_handler(id, stream, done_tx.clone()) {
                        Ok(handler) => {
                            handlers.insert(id, handler);
                        }
                        Err(e) => tracing::warn!("Failed to serve {}: {}", peer, e),
                    }
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    // Persistent failures (e.g. out of file descriptors) must not spin
                    tracing::warn!("Accept failed: {}", e);
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
            }
        }

        tracing::info!(open = handlers.len(), "server shutting down");
        for (_, handler) in handlers.drain() {
            let _ = handler.control.shutdown(Shutdown::Both);
            if handler.thread.join().is_err() {
                tracing::warn!("connection thread panicked");
            }
        }

        Ok(())
    }

    /// Number of connections currently being served
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    fn spawn_handler(&self, id: u64, stream: TcpStream, done: Sender<u64>) -> Result<Handler> {
        let control = stream.try_clone()?;
        let engine = Arc::clone(&self.engine);
        let active = Arc::clone(&self.active);
        let config = self.config.clone();

        self.active.fetch_add(1, Ordering::AcqRel);
        let spawned = thread::Builder::new()
            .name(format!("sortedkv-conn-{}", id))
            .spawn(move || {
                serve(stream, engine, &config);
                active.fetch_sub(1, Ordering::AcqRel);
                let _ = done.send(id);
            });

        match spawned {
            Ok(thread) => Ok(Handler { control, thread }),
            Err(e) => {
                self.active.fetch_sub(1, Ordering::AcqRel);
                Err(e.into())
            }
        }
    }
}

/// Run one connection to completion
fn serve(stream: TcpStream, engine: Arc<Engine>, config: &Config) {
    let result = Connection::new(stream, engine).and_then(|mut conn| {
        conn.set_timeouts(config.read_timeout_ms, config.write_timeout_ms)?;
        conn.handle()
    });
    if let Err(e) = result {
        tracing::debug!("Connection ended with error: {}", e);
    }
}

/// Join handlers that have already finished
fn reap_finished(done: &Receiver<u64>, handlers: &mut HashMap<u64, Handler>) {
    for id in done.try_iter() {
        if let Some(handler) = handlers.remove(&id) {
            if handler.thread.join().is_err() {
                tracing::warn!("connection thread panicked");
            }
        }
    }
}

/// Tell a client we are full, then hang up
fn reject(stream: TcpStream) {
    let mut writer = BufWriter::new(stream);
    if let Err(e) = write_response(&mut writer, &Response::error("too many connections")) {
        tracing::debug!("Failed to send rejection: {}", e);
    }
}
