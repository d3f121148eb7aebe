use serde::{Deserialize, Serialize};
use std::net::ToSocketAddrs;

/// Who and where a logged process is running.
///
/// Captured once at record construction and written into every row, so an
/// operator can tell apart runs of the same app on different machines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunIdentity {
    pub user_name: String,
    pub user_ip: String,
    pub user_machine: String,
}

impl RunIdentity {
    /// Detect the identity of the current process, best effort.
    ///
    /// Detection never fails: anything the platform refuses to reveal
    /// falls back to a placeholder rather than aborting log setup.
    pub fn detect() -> Self {
        let user_machine = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        let user_ip = resolve_host_ip(&user_machine);

        Self {
            user_name: whoami::username(),
            user_ip,
            user_machine,
        }
    }

    /// Build an identity from explicit values, for callers that already
    /// know them (or tests that need stable rows).
    pub fn new(
        user_name: impl Into<String>,
        user_ip: impl Into<String>,
        user_machine: impl Into<String>,
    ) -> Self {
        Self {
            user_name: user_name.into(),
            user_ip: user_ip.into(),
            user_machine: user_machine.into(),
        }
    }
}

/// Resolve the machine's primary address from its hostname, falling back
/// to loopback when the name does not resolve (common on laptops and in
/// minimal containers).
fn resolve_host_ip(host: &str) -> String {
    (host, 0)
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "127.0.0.1".to_string())
}
