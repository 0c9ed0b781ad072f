use std::net::SocketAddr;

use axum::{extract::ConnectInfo, http::HeaderMap};

/// Caller IP: first `X-Forwarded-For` hop, then `X-Real-IP`, then the socket.
pub fn client_ip(headers: &HeaderMap, connect_info: Option<&ConnectInfo<SocketAddr>>) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .map(str::to_string)
        .or_else(|| connect_info.map(|ConnectInfo(addr)| addr.ip().to_string()))
}
