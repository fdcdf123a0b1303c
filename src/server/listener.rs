use super::service::AppService;
use may::coroutine::JoinHandle;
use may_minihttp::HttpServerWithHeaders;
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// Header slots per request; proxies and gateways easily exceed 16
const MAX_HEADERS: usize = 32;

const READY_ATTEMPTS: u32 = 50;
const READY_INTERVAL: Duration = Duration::from_millis(5);

/// Accept coroutine of a started [`AppService`]
pub struct ServerHandle {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl AppService {
    /// Bind `addr` and return once the listener accepts connections.
    ///
    /// # Errors
    ///
    /// Fails when `addr` does not resolve, cannot be bound, or the listener
    /// does not accept within roughly 250ms. In the last case the accept
    /// coroutine is cancelled before returning.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "address did not resolve")
            })?;
        let routes = self.router.len();
        let health = self.health_endpoint_enabled();

        let handle = HttpServerWithHeaders::<_, MAX_HEADERS>(self).start(addr)?;
        let server = ServerHandle { addr, handle };

        if !accepts_connections(addr) {
            warn!(addr = %addr, "Listener never accepted a connection");
            server.stop();
            return Err(io::Error::new(io::ErrorKind::TimedOut, "listener not ready"));
        }

        info!(addr = %addr, routes, health, "Listening");
        Ok(server)
    }
}

fn accepts_connections(addr: SocketAddr) -> bool {
    (0..READY_ATTEMPTS).any(|_| {
        let ok = TcpStream::connect(addr).is_ok();
        if !ok {
            thread::sleep(READY_INTERVAL);
        }
        ok
    })
}

impl ServerHandle {
    /// Cancel the accept coroutine and wait for it to unwind
    pub fn stop(self) {
        let ServerHandle { addr, handle } = self;
        // SAFETY: the coroutine is owned by this handle and is joined right after.
        unsafe {
            handle.coroutine().cancel();
        }
        let _ = handle.join();
        info!(addr = %addr, "Listener stopped");
    }

    /// Serve until the accept coroutine exits.
    ///
    /// # Errors
    ///
    /// Returns an error if the accept coroutine panicked.
    pub fn join(self) -> io::Result<()> {
        let ServerHandle { addr, handle } = self;
        handle
            .join()
            .map_err(|_| io::Error::other(format!("listener on {addr} panicked")))
    }
}
