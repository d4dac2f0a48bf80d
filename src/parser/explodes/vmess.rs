use lazy_static::lazy_static;
use linked_hash_map::LinkedHashMap;
use log::debug;
use regex::Regex;
use serde_json::Value;

use super::common::{header_string, json_headers};
use crate::error::{ConvertError, Result};
use crate::models::{GrpcOpts, HttpOpts, Network, ProxyKind, ProxyRecord, VmessProxy, WsOpts};
use crate::utils::base64::base64_decode;
use crate::utils::{first_param, parse_leading_int, parse_query, url_decode};

const SCHEME: &str = "VMess";

lazy_static! {
    // cipher:uuid@server:port
    static ref VMESS_PAYLOAD_REGEX: Regex =
        Regex::new(r"^([^:]+?):([^:]+?)@(.*):(\d+)$").unwrap();
}

type Fields = LinkedHashMap<String, String>;

/// Parse a VMess link into a proxy record
///
/// The common form is Base64 of a v2rayN JSON object. Links that are not
/// JSON are tried as `base64(cipher:uuid@server:port)?query`, the form
/// Shadowrocket exports.
pub fn explode_vmess(vmess: &str) -> Result<ProxyRecord> {
    let body = vmess
        .strip_prefix("vmess://")
        .ok_or_else(|| ConvertError::malformed(SCHEME, "missing vmess:// prefix"))?;

    let fields = match base64_decode(body).and_then(|decoded| json_fields(&decoded)) {
        Some(fields) => fields,
        None => {
            debug!("VMess link is not Base64 JSON, trying query form");
            query_form_fields(body)?
        }
    };

    build_vmess(&fields).map(ProxyRecord::Vmess)
}

/// Flatten a v2rayN JSON object into string fields.
///
/// Numbers and booleans are stringified; nested values keep their JSON
/// text so a JSON `host` can still be read as headers.
fn json_fields(decoded: &str) -> Option<Fields> {
    let json = serde_json::from_str::<LinkedHashMap<String, Value>>(decoded).ok()?;
    let fields = json
        .into_iter()
        .filter_map(|(k, v)| {
            let v = match v {
                Value::Null => return None,
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                other => other.to_string(),
            };
            Some((k, v))
        })
        .collect();
    Some(fields)
}

/// Read the `base64(cipher:uuid@server:port)?query#name` form.
fn query_form_fields(body: &str) -> Result<Fields> {
    let (body, fragment) = match body.split_once('#') {
        Some((b, f)) => (b, Some(f)),
        None => (body, None),
    };
    let (encoded, query) = body.rsplit_once('?').ok_or_else(|| {
        ConvertError::malformed(SCHEME, "neither Base64 JSON nor Base64 payload with query")
    })?;
    let encoded = encoded.strip_suffix('/').unwrap_or(encoded);

    let decoded = base64_decode(encoded)
        .ok_or_else(|| ConvertError::malformed(SCHEME, "payload is not valid Base64"))?;
    let caps = VMESS_PAYLOAD_REGEX.captures(decoded.trim()).ok_or_else(|| {
        ConvertError::malformed(SCHEME, "payload is not cipher:uuid@server:port")
    })?;

    let mut fields = parse_query(query);

    // Shadowrocket spellings, used only when the v2rayN keys are missing
    if !fields.contains_key("net") {
        match fields.get("obfs").map(String::as_str) {
            Some("websocket") => {
                fields.insert("net".to_string(), "ws".to_string());
            }
            Some(obfs) if !obfs.is_empty() && obfs != "none" => {
                let obfs = obfs.to_string();
                fields.insert("net".to_string(), obfs);
            }
            _ => {}
        }
    }
    for (alias, key) in [("obfsParam", "host"), ("peer", "sni")] {
        if !fields.contains_key(key) {
            if let Some(v) = fields.get(alias).cloned() {
                fields.insert(key.to_string(), v);
            }
        }
    }
    if let Some(name) = fragment.map(url_decode).filter(|n| !n.is_empty()) {
        fields.entry("ps".to_string()).or_insert(name);
    }

    fields.insert("scy".to_string(), caps[1].to_string());
    fields.insert("id".to_string(), caps[2].to_string());
    fields.insert("add".to_string(), caps[3].to_string());
    fields.insert("port".to_string(), caps[4].to_string());
    Ok(fields)
}

fn build_vmess(fields: &Fields) -> Result<VmessProxy> {
    let server = first_param(fields, &["add", "address", "host"])
        .ok_or_else(|| ConvertError::malformed(SCHEME, "missing server address"))?
        .to_string();
    let port = fields
        .get("port")
        .and_then(|p| parse_leading_int(p))
        .ok_or_else(|| ConvertError::malformed(SCHEME, "missing or invalid port"))?;
    let uuid = first_param(fields, &["id"])
        .ok_or_else(|| ConvertError::malformed(SCHEME, "missing id"))?
        .to_string();

    let name = first_param(fields, &["ps", "remarks", "remark"])
        .map(str::to_string)
        .unwrap_or_else(|| ProxyKind::Vmess.default_name(&server, port));

    let mut node = VmessProxy {
        name,
        server,
        port,
        uuid,
        alter_id: first_param(fields, &["aid", "alterId"])
            .and_then(parse_leading_int)
            .unwrap_or(0),
        cipher: first_param(fields, &["scy"]).unwrap_or("auto").to_string(),
        tls: matches!(fields.get("tls").map(String::as_str), Some("tls" | "1")),
        skip_cert_verify: matches!(
            fields.get("allowInsecure").map(String::as_str),
            Some("1" | "true")
        ),
        servername: first_param(fields, &["sni"]).map(str::to_string),
        network: Network::from(first_param(fields, &["net"]).unwrap_or("tcp")),
        ws_opts: None,
        grpc_opts: None,
        http_opts: None,
    };

    let path = first_param(fields, &["path"]);
    let host = first_param(fields, &["host"]);

    if node.network == Network::Other("httpupgrade".to_string()) {
        node.network = Network::Ws;
        node.ws_opts = Some(WsOpts::http_upgrade());
        return Ok(node);
    }

    match node.network {
        Network::Ws => {
            let mut ws_opts = WsOpts {
                path: Some(path.unwrap_or("/").to_string()),
                ..Default::default()
            };
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
            node.ws_opts = Some(ws_opts);
        }
        Network::Http => {
            let mut http_opts = HttpOpts {
                path: vec![path.unwrap_or("/").to_string()],
                headers: LinkedHashMap::new(),
            };
            if let Some(host) = host {
                http_opts
                    .headers
                    .insert("Host".to_string(), vec![host.to_string()]);
            }
            node.http_opts = Some(http_opts);
        }
        Network::Grpc => {
            node.grpc_opts = Some(GrpcOpts {
                grpc_service_name: path.map(str::to_string),
            })
            .filter(GrpcOpts::is_effective);
        }
        _ => {}
    }

    Ok(node)
}
