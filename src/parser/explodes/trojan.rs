use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ConvertError, Result};
use crate::models::{GrpcOpts, Network, ProxyKind, ProxyRecord, TrojanProxy, WsOpts};
use crate::utils::{first_param, non_empty, parse_query, url_decode};

const SCHEME: &str = "Trojan";

/// Port used when a Trojan link omits one.
const DEFAULT_PORT: u32 = 443;

lazy_static! {
    // password@server[:port][/][?query][#fragment]
    static ref TROJAN_REGEX: Regex =
        Regex::new(r"^(.*?)@(.*?)(?::(\d+))?/?(?:\?(.*?))?(?:#(.*?))?$").unwrap();
}

/// Parse a Trojan link into a proxy record
pub fn explode_trojan(trojan: &str) -> Result<ProxyRecord> {
    let body = trojan
        .strip_prefix("trojan://")
        .ok_or_else(|| ConvertError::malformed(SCHEME, "missing trojan:// prefix"))?;

    let caps = TROJAN_REGEX
        .captures(body)
        .ok_or_else(|| ConvertError::malformed(SCHEME, "expected password@server[:port]"))?;

    let server = caps.get(2).map_or("", |m| m.as_str()).to_string();
    if server.is_empty() {
        return Err(ConvertError::malformed(SCHEME, "missing server"));
    }
    let port = caps
        .get(3)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let password = url_decode(caps.get(1).map_or("", |m| m.as_str()));
    let name = url_decode(caps.get(5).map_or("", |m| m.as_str()))
        .trim()
        .to_string();
    let name = if name.is_empty() {
        ProxyKind::Trojan.default_name(&server, port)
    } else {
        name
    };

    let params = parse_query(caps.get(4).map_or("", |m| m.as_str()));

    let network = match first_param(&params, &["type"]) {
        None => Network::Tcp,
        Some("httpupgrade") => Network::Ws,
        Some(other) => Network::from(other),
    };

    let ws_opts = if network == Network::Ws {
        let mut ws = WsOpts {
            path: first_param(&params, &["path"]).map(str::to_string),
            ..Default::default()
        };
        if let Some(host) = first_param(&params, &["host"]) {
            ws.headers.insert("Host".to_string(), host.to_string());
        }
        Some(ws).filter(WsOpts::is_effective)
    } else {
        None
    };

    let grpc_opts = if network == Network::Grpc {
        Some(GrpcOpts {
            grpc_service_name: first_param(&params, &["serviceName"]).map(str::to_string),
        })
        .filter(GrpcOpts::is_effective)
    } else {
        None
    };

    Ok(ProxyRecord::Trojan(TrojanProxy {
        name,
        server,
        port,
        password,
        skip_cert_verify: params
            .get("allowInsecure")
            .or_else(|| params.get("allow_insecure"))
            .is_some_and(|v| v == "1" || v == "true"),
        sni: first_param(&params, &["sni", "peer"]).map(str::to_string),
        alpn: first_param(&params, &["alpn"])
            .map(|a| a.split(',').filter_map(non_empty).collect())
            .unwrap_or_default(),
        network,
        client_fingerprint: first_param(&params, &["fp", "fingerprint"]).map(str::to_string),
        ws_opts,
        grpc_opts,
    }))
}
