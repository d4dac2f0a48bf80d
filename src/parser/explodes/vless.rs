use lazy_static::lazy_static;
use linked_hash_map::LinkedHashMap;
use log::{debug, warn};
use regex::Regex;

use super::common::{header_list, header_string, json_headers};
use crate::error::{ConvertError, Result};
use crate::models::{
    GrpcOpts, HttpOpts, Network, ProxyKind, ProxyRecord, RealityOpts, VlessProxy, WsOpts,
};
use crate::utils::base64::base64_decode;
use crate::utils::{first_param, is_truthy_flag, non_empty, parse_query, url_decode};

const SCHEME: &str = "VLESS";

/// The only flow mihomo accepts for VLESS; any `flow` value selects it.
const VISION_FLOW: &str = "xtls-rprx-vision";

lazy_static! {
    // uuid@server:port[/][?query][#fragment]
    static ref VLESS_REGEX: Regex =
        Regex::new(r"^(.*?)@(.*?):(\d+)/?(?:\?(.*?))?(?:#(.*?))?$").unwrap();
}

/// Parse a VLESS link into a proxy record
///
/// Accepts the plain form `vless://uuid@server:port?query#name` and the
/// Shadowrocket form, where everything before the query is Base64 of
/// `method:uuid@server:port`.
pub fn explode_vless(vless: &str) -> Result<ProxyRecord> {
    let body = vless
        .strip_prefix("vless://")
        .ok_or_else(|| ConvertError::malformed(SCHEME, "missing vless:// prefix"))?;

    let (line, shadowrocket) = if VLESS_REGEX.is_match(body) {
        (body.to_string(), false)
    } else {
        debug!("VLESS link is not in plain form, trying Shadowrocket Base64 form");
        (decode_shadowrocket(body)?, true)
    };

    let caps = VLESS_REGEX
        .captures(&line)
        .ok_or_else(|| ConvertError::malformed(SCHEME, "expected uuid@server:port"))?;

    let mut uuid = caps.get(1).map_or("", |m| m.as_str());
    if shadowrocket {
        // Shadowrocket prefixes the uuid with its cipher, e.g. `auto:`
        uuid = uuid.split_once(':').map_or(uuid, |(_, rest)| rest);
    }
    let uuid = url_decode(uuid);
    let server = caps.get(2).map_or("", |m| m.as_str()).to_string();
    if server.is_empty() {
        return Err(ConvertError::malformed(SCHEME, "missing server"));
    }
    let port: u32 = caps[3]
        .parse()
        .map_err(|_| ConvertError::malformed(SCHEME, format!("invalid port {}", &caps[3])))?;
    let name = url_decode(caps.get(5).map_or("", |m| m.as_str()))
        .trim()
        .to_string();
    let name = if name.is_empty() {
        ProxyKind::Vless.default_name(&server, port)
    } else {
        name
    };

    let params = parse_query(caps.get(4).map_or("", |m| m.as_str()));

    let mut security = first_param(&params, &["security"]).map(str::to_string);
    let mut tls = security
        .as_deref()
        .filter(|s| *s != "none")
        .map(|_| true);
    if shadowrocket && params.get("tls").is_some_and(|v| is_truthy_flag(v)) {
        tls = Some(true);
        security.get_or_insert_with(|| "reality".to_string());
    }

    let alpn = first_param(&params, &["alpn"])
        .map(|a| {
            a.replace("%2F", "/")
                .split(',')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let reality_opts = if security.as_deref() == Some("reality") {
        Some(RealityOpts {
            public_key: first_param(&params, &["pbk"]).map(str::to_string),
            short_id: first_param(&params, &["sid"]).map(str::to_string),
        })
        .filter(RealityOpts::is_effective)
    } else {
        None
    };

    let mut node = VlessProxy {
        name,
        server,
        port,
        uuid,
        tls,
        sni: first_param(&params, &["sni", "peer"]).map(str::to_string),
        flow: first_param(&params, &["flow"]).map(|_| VISION_FLOW.to_string()),
        skip_cert_verify: params.get("allowInsecure").map(|v| is_truthy_flag(v)),
        client_fingerprint: first_param(&params, &["fp"]).map(str::to_string),
        alpn,
        network: Network::Tcp,
        reality_opts,
        ws_opts: None,
        grpc_opts: None,
        http_opts: None,
    };

    let mut ws_opts = WsOpts::default();
    match first_param(&params, &["type"]).unwrap_or("tcp") {
        "httpupgrade" => {
            node.network = Network::Ws;
            ws_opts = WsOpts::http_upgrade();
        }
        other => {
            node.network = Network::from(other);
            if !node.network.is_known() {
                warn!("Unknown VLESS transport '{}', falling back to tcp", other);
                node.network = Network::Tcp;
            }
        }
    }

    let host = first_param(&params, &["host", "obfsParam"]);
    match node.network {
        Network::Ws => {
            ws_opts.path = first_param(&params, &["path"]).map(url_decode);
            if let Some(host) = host {
                match json_headers(host) {
                    Some(headers) => {
                        for (k, v) in headers.iter() {
                            ws_opts.headers.insert(k.clone(), header_string(v));
                        }
                    }
                    None => {
                        ws_opts.headers.insert("Host".to_string(), host.to_string());
                    }
                }
            }
            if let Some((header, value)) = first_param(&params, &["eh"]).and_then(extra_header) {
                ws_opts.headers.insert(header, value);
            }
            node.ws_opts = Some(ws_opts).filter(WsOpts::is_effective);
        }
        Network::Grpc => {
            node.grpc_opts = Some(GrpcOpts {
                grpc_service_name: first_param(&params, &["serviceName"]).map(url_decode),
            })
            .filter(GrpcOpts::is_effective);
        }
        Network::Http => {
            let mut http_opts = HttpOpts {
                path: first_param(&params, &["path"])
                    .map(|p| vec![url_decode(p)])
                    .unwrap_or_default(),
                headers: LinkedHashMap::new(),
            };
            if let Some(host) = host {
                match json_headers(host) {
                    Some(headers) => {
                        for (k, v) in headers.iter() {
                            http_opts.headers.insert(k.clone(), header_list(v));
                        }
                    }
                    None => {
                        http_opts
                            .headers
                            .insert("Host".to_string(), vec![host.to_string()]);
                    }
                }
            }
            node.http_opts = Some(http_opts).filter(HttpOpts::is_effective);
        }
        _ => {}
    }

    Ok(ProxyRecord::Vless(node))
}

/// Rebuild a plain link body from the Shadowrocket Base64 form.
fn decode_shadowrocket(body: &str) -> Result<String> {
    let split = body.find(['?', '#']).unwrap_or(body.len());
    let (encoded, rest) = body.split_at(split);
    let decoded = base64_decode(encoded).ok_or_else(|| {
        ConvertError::malformed(SCHEME, "expected uuid@server:port or a Base64 payload")
    })?;
    Ok(format!("{}{}", decoded.trim(), rest))
}

/// Parse an `eh` parameter of the form `Header:Value`.
fn extra_header(eh: &str) -> Option<(String, String)> {
    let mut parts = eh.split(':').map(str::trim);
    let name = non_empty(parts.next()?)?;
    let value = non_empty(parts.next()?)?;
    Some((name, value))
}
