//! # HTTP Middleware
//!
//! Request logging, per-client rate limiting, and tracing spans.

pub mod logging;
pub mod rate_limit;
pub mod tracing_layer;

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request};
use axum::http::HeaderMap;

/// Where [`client_ip`] takes the client address from.
///
/// Forwarding headers are written by the client unless a proxy in front of
/// the service overwrites them, so they are only read when configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClientIpSource {
    /// The socket peer from `ConnectInfo`.
    #[default]
    Peer,
    /// The first `X-Forwarded-For` hop, then `X-Real-IP`, then the peer.
    ForwardedHeaders,
}

impl ClientIpSource {
    pub fn from_trust(trust_proxy_headers: bool) -> Self {
        if trust_proxy_headers {
            Self::ForwardedHeaders
        } else {
            Self::Peer
        }
    }
}

/// Best-effort client address according to the [`ClientIpSource`] extension
/// (peer only when absent). `"anonymous"` when nothing is known.
pub(crate) fn client_ip(request: &Request) -> String {
    let source = request
        .extensions()
        .get::<ClientIpSource>()
        .copied()
        .unwrap_or_default();
    if source == ClientIpSource::ForwardedHeaders {
        if let Some(ip) = forwarded_ip(request) {
            return ip.to_string();
        }
    }
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "anonymous".to_string())
}

fn forwarded_ip(request: &Request) -> Option<&str> {
    let headers = request.headers();
    header(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| header(headers, "x-real-ip"))
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn behind_proxy(builder: axum::http::request::Builder) -> Request {
        let mut request = builder.body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ClientIpSource::ForwardedHeaders);
        request
    }

    fn with_peer(mut request: Request) -> Request {
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 4000))));
        request
    }

    #[test]
    fn forwarded_header_wins_behind_proxy() {
        let request = behind_proxy(
            Request::builder()
                .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
                .header("x-real-ip", "198.51.100.2"),
        );
        assert_eq!(client_ip(&request), "203.0.113.7");
    }

    #[test]
    fn real_ip_then_peer_behind_proxy() {
        let request = behind_proxy(Request::builder().header("x-real-ip", "198.51.100.2"));
        assert_eq!(client_ip(&request), "198.51.100.2");

        let request = with_peer(behind_proxy(Request::builder()));
        assert_eq!(client_ip(&request), "192.0.2.1");
    }

    #[test]
    fn forwarding_headers_ignored_by_default() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7")
            .header("x-real-ip", "198.51.100.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&request), "anonymous");
        assert_eq!(client_ip(&with_peer(request)), "192.0.2.1");
    }

    #[test]
    fn source_follows_trust_flag() {
        assert_eq!(ClientIpSource::from_trust(false), ClientIpSource::Peer);
        assert_eq!(
            ClientIpSource::from_trust(true),
            ClientIpSource::ForwardedHeaders
        );
    }
}
