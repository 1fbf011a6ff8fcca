use mdns_sd::{ServiceDaemon, ServiceEvent};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{Instant, timeout};
use tracing::{debug, info, instrument};

/// One resolved advertisement: where the light answers and what it calls
/// itself on the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLight {
    pub addr: SocketAddr,
    pub name: String,
}

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("mDNS browse unavailable: {0}")]
    Unavailable(#[from] mdns_sd::Error),
}

/// Browses the local network for advertised lights until the window elapses.
/// Duplicate resolutions for the same address are collapsed within one scan.
/// An empty result means none were found and is not an error; only a browse
/// that cannot start reports `Unavailable`.
#[instrument]
pub async fn discover(service_type: &str, window: Duration) -> Result<Vec<DiscoveredLight>, DiscoveryError> {
    let daemon = ServiceDaemon::new()?;
    let receiver = daemon.browse(service_type)?;

    let deadline = Instant::now() + window;
    let mut found: HashMap<SocketAddr, DiscoveredLight> = HashMap::new();

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }

        match timeout(remaining, receiver.recv_async()).await {
            Ok(Ok(ServiceEvent::ServiceResolved(service))) => {
                let Some(ip) = service.get_addresses().iter().find(|ip| ip.is_ipv4()).copied() else {
                    continue;
                };
                let addr = SocketAddr::new(ip, service.get_port());
                let name = instance_name(service.get_fullname(), service_type);
                debug!("🔍 Resolved '{}' at {}", name, addr);
                found.entry(addr).or_insert(DiscoveredLight { addr, name });
            }
            Ok(Ok(_)) => {}
            // The daemon went away mid-scan, report what was resolved so far
            Ok(Err(_)) => break,
            // Browse window elapsed
            Err(_) => break,
        }
    }

    let _ = daemon.stop_browse(service_type);
    let _ = daemon.shutdown();

    info!("🔍 Discovery window closed, {} light(s) resolved", found.len());
    Ok(found.into_values().collect())
}

/// "Elgato Key Light 1A2B._elg._tcp.local." advertises the instance name in
/// front of the service type.
fn instance_name(fullname: &str, service_type: &str) -> String {
    fullname
        .strip_suffix(service_type)
        .map(|instance| instance.trim_end_matches('.'))
        .unwrap_or(fullname)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Elgato Key Light 1A2B._elg._tcp.local.", "Elgato Key Light 1A2B")]
    #[case("Key Light Air._elg._tcp.local.", "Key Light Air")]
    #[case("no-suffix-at-all", "no-suffix-at-all")]
    fn instance_name_strips_the_service_type(#[case] fullname: &str, #[case] expected: &str) {
        assert_eq!(instance_name(fullname, "_elg._tcp.local."), expected);
    }
}
