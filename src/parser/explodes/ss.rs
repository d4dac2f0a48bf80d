use log::debug;

use crate::error::{ConvertError, Result};
use crate::models::{ProxyKind, ProxyRecord, ShadowsocksProxy, SsPlugin};
use crate::utils::base64::base64_decode;
use crate::utils::{parse_leading_int, parse_query, url_decode};

const SCHEME: &str = "Shadowsocks";

/// Parse a Shadowsocks link into a proxy record
///
/// Handles SIP002 (`ss://base64(method:password)@server:port`), the plain
/// variant with an unencoded userinfo, and the legacy form where the whole
/// `method:password@server:port` is Base64-encoded.
pub fn explode_ss(ss: &str) -> Result<ProxyRecord> {
    let body = ss
        .strip_prefix("ss://")
        .ok_or_else(|| ConvertError::malformed(SCHEME, "missing ss:// prefix"))?;

    let (secret, server_info) = split_userinfo(body)?;
    let (server, port) = split_server(&server_info)?;
    let (cipher, password) = secret
        .split_once(':')
        .ok_or_else(|| ConvertError::malformed(SCHEME, "userinfo is not method:password"))?;

    let name = body
        .split('#')
        .nth(1)
        .map(url_decode)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| ProxyKind::Shadowsocks.default_name(&server, port));

    Ok(ProxyRecord::Shadowsocks(ShadowsocksProxy {
        name,
        server,
        port,
        cipher: cipher.to_string(),
        password: password.to_string(),
        plugin: plugin_param(body).and_then(|p| parse_plugin(&p)),
    }))
}

/// Split a link body into decoded `method:password` and the server part.
fn split_userinfo(body: &str) -> Result<(String, String)> {
    if let Some((userinfo, server_info)) = body.split_once('@') {
        // some clients percent-encode the Base64 padding
        let secret = base64_decode(userinfo)
            .or_else(|| base64_decode(&url_decode(userinfo)))
            .unwrap_or_else(|| userinfo.to_string());
        return Ok((secret, server_info.to_string()));
    }

    debug!("Shadowsocks link has no '@', trying legacy Base64 form");
    let encoded = body.split(['#', '?']).next().unwrap_or_default();
    let decoded = base64_decode(encoded)
        .ok_or_else(|| ConvertError::malformed(SCHEME, "expected userinfo@server:port"))?;
    let (secret, server_info) = decoded
        .rsplit_once('@')
        .ok_or_else(|| ConvertError::malformed(SCHEME, "expected userinfo@server:port"))?;
    Ok((secret.to_string(), server_info.trim().to_string()))
}

/// Split `server:port[/][?query][#fragment]` into host and port.
fn split_server(server_info: &str) -> Result<(String, u32)> {
    let host_port = server_info
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let (server, port) = host_port
        .rsplit_once(':')
        .ok_or_else(|| ConvertError::malformed(SCHEME, "missing port"))?;
    let port = parse_leading_int(port)
        .ok_or_else(|| ConvertError::malformed(SCHEME, format!("invalid port {}", port)))?;
    if server.is_empty() {
        return Err(ConvertError::malformed(SCHEME, "missing server"));
    }
    Ok((server.to_string(), port))
}

/// Raw `plugin` query value, percent-decoded once.
fn plugin_param(body: &str) -> Option<String> {
    let query = body.split('#').next()?.split_once('?')?.1;
    parse_query(query)
        .get("plugin")
        .filter(|p| !p.is_empty())
        .cloned()
}

/// Interpret a SIP003 plugin string such as `obfs-local;obfs=http;obfs-host=a.example`.
fn parse_plugin(plugin: &str) -> Option<SsPlugin> {
    let parts: Vec<&str> = plugin.split(';').collect();
    let option = |prefix: &str| {
        parts
            .iter()
            .find_map(|p| p.strip_prefix(prefix))
            .and_then(|v| v.split('=').next())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let kind = parts.first()?;
    if kind.contains("obfs") {
        Some(SsPlugin::Obfs {
            mode: option("obfs=").unwrap_or_else(|| "http".to_string()),
            host: option("obfs-host=").unwrap_or_default(),
        })
    } else if kind.contains("v2ray-plugin") {
        Some(SsPlugin::V2rayPlugin {
            mode: "websocket".to_string(),
            host: option("host=").unwrap_or_default(),
            path: option("path=").unwrap_or_else(|| "/".to_string()),
            tls: parts.contains(&"tls"),
        })
    } else {
        debug!("Ignoring unsupported Shadowsocks plugin '{}'", kind);
        None
    }
}
