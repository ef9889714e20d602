// API layer - HTTP endpoints
pub mod admin;
pub mod auth;
pub mod health;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use health::HealthApi;

use poem::Request;

pub trait Api {
    /// Best-effort client IP for audit records
    fn extract_ip_address(&self, req: &Request) -> Option<String> {
        // Check X-Forwarded-For header (proxy/load balancer)
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                let ip = ip.trim();
                if !ip.is_empty() {
                    return Some(ip.to_string());
                }
            }
        }

        // Check X-Real-IP header (nginx)
        if let Some(real_ip) = req.header("X-Real-IP") {
            return Some(real_ip.to_string());
        }

        // Fall back to remote address
        req.remote_addr()
            .as_socket_addr()
            .map(|addr| addr.ip().to_string())
    }
}
