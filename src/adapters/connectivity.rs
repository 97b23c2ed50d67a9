use crate::domain::ports::{ConfigProvider, ConnectivityProbe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);
const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

impl<T: ConnectivityProbe + ?Sized> ConnectivityProbe for Arc<T> {
    fn is_network_available(&self) -> bool {
        (**self).is_network_available()
    }
}

/// Reports the network as available when a TCP connection to the catalog host succeeds.
///
/// Connects run on a background task; [`ConnectivityProbe::is_network_available`]
/// only reads the result of the latest one and never touches the network.
#[derive(Debug)]
pub struct TcpProbe {
    online: Arc<AtomicBool>,
    refresher: JoinHandle<()>,
}

impl TcpProbe {
    /// Probes `addr` once, then again every `interval` until dropped.
    pub async fn start(addr: impl Into<String>, timeout: Duration, interval: Duration) -> Self {
        let addr = addr.into();
        let online = Arc::new(AtomicBool::new(probe(&addr, timeout).await));
        tracing::debug!(
            "Connectivity to {}: {}",
            addr,
            online.load(Ordering::SeqCst)
        );

        let flag = Arc::clone(&online);
        let refresher = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let reachable = probe(&addr, timeout).await;
                if flag.swap(reachable, Ordering::SeqCst) != reachable {
                    tracing::info!("Connectivity to {} changed: {}", addr, reachable);
                }
            }
        });

        Self { online, refresher }
    }

    pub async fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        let addr = config.connectivity_probe_addr().to_string();
        Self::start(addr, DEFAULT_PROBE_TIMEOUT, DEFAULT_REFRESH_INTERVAL).await
    }
}

impl ConnectivityProbe for TcpProbe {
    fn is_network_available(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

impl Drop for TcpProbe {
    fn drop(&mut self) {
        self.refresher.abort();
    }
}

async fn probe(addr: &str, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            tracing::debug!("Probe connect to {} failed: {}", addr, e);
            false
        }
        Err(_) => {
            tracing::debug!("Probe connect to {} timed out after {:?}", addr, timeout);
            false
        }
    }
}

/// A switchable connectivity flag, for hosts that learn about connectivity from elsewhere.
#[derive(Debug)]
pub struct StaticConnectivity {
    online: AtomicBool,
}

impl StaticConnectivity {
    pub fn online() -> Self {
        Self {
            online: AtomicBool::new(true),
        }
    }

    pub fn offline() -> Self {
        Self {
            online: AtomicBool::new(false),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl ConnectivityProbe for StaticConnectivity {
    fn is_network_available(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}
