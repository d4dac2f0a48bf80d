//! mihomo `proxies:` output for every proxy kind

use log::debug;

use super::writer::{render_item, Field};
use crate::models::{
    GrpcOpts, HttpOpts, Hysteria2Proxy, Network, ProxyRecord, ShadowsocksProxy, SsPlugin,
    TrojanProxy, VlessProxy, VmessProxy, WsOpts,
};

/// Build the `proxies:` block, one list item per record in input order.
pub fn build_proxies_yaml(records: &[ProxyRecord]) -> String {
    let mut yaml = String::from("proxies:");
    for record in records {
        yaml.push('\n');
        yaml.push_str(&proxy_to_yaml(record));
    }
    debug!("Rendered {} proxies", records.len());
    yaml
}

/// Serialize one record as a YAML list item.
pub fn proxy_to_yaml(record: &ProxyRecord) -> String {
    let type_tag = record.kind().type_tag();
    let fields = match record {
        ProxyRecord::Vless(p) => vless_fields(p, type_tag),
        ProxyRecord::Vmess(p) => vmess_fields(p, type_tag),
        ProxyRecord::Shadowsocks(p) => ss_fields(p, type_tag),
        ProxyRecord::Trojan(p) => trojan_fields(p, type_tag),
        ProxyRecord::Hysteria2(p) => hysteria2_fields(p, type_tag),
    };
    render_item(&fields)
}

fn vless_fields<'a>(p: &'a VlessProxy, type_tag: &'a str) -> Vec<Field<'a>> {
    let mut fields = vec![
        Field::str("name", &p.name),
        Field::Plain("type", type_tag),
        Field::str("server", &p.server),
        Field::Int("port", p.port),
        Field::str("uuid", &p.uuid),
        Field::flag("tls", p.tls.unwrap_or(false)),
        Field::opt_str("servername", &p.sni),
        Field::opt_str("flow", &p.flow),
        Field::Bool("skip-cert-verify", p.skip_cert_verify),
        Field::opt_str("client-fingerprint", &p.client_fingerprint),
        Field::List("alpn", &p.alpn),
        Field::str("network", p.network.as_str()),
    ];
    if let Some(reality) = &p.reality_opts {
        fields.push(Field::Group(
            "reality-opts",
            vec![
                Field::opt_str("public-key", &reality.public_key),
                Field::opt_str("short-id", &reality.short_id),
            ],
        ));
    }
    push_transport_opts(
        &mut fields,
        &p.network,
        p.ws_opts.as_ref(),
        p.grpc_opts.as_ref(),
        p.http_opts.as_ref(),
    );
    fields
}

fn vmess_fields<'a>(p: &'a VmessProxy, type_tag: &'a str) -> Vec<Field<'a>> {
    let mut fields = vec![
        Field::str("name", &p.name),
        Field::Plain("type", type_tag),
        Field::str("server", &p.server),
        Field::Int("port", p.port),
        Field::str("uuid", &p.uuid),
        Field::Bool("udp", Some(true)),
        Field::Int("alterId", p.alter_id),
        Field::str("cipher", &p.cipher),
        Field::flag("tls", p.tls),
        Field::opt_str("servername", &p.servername),
        Field::Bool("skip-cert-verify", Some(p.skip_cert_verify)),
        Field::str("network", p.network.as_str()),
    ];
    push_transport_opts(
        &mut fields,
        &p.network,
        p.ws_opts.as_ref(),
        p.grpc_opts.as_ref(),
        p.http_opts.as_ref(),
    );
    fields
}

fn ss_fields<'a>(p: &'a ShadowsocksProxy, type_tag: &'a str) -> Vec<Field<'a>> {
    let mut fields = vec![
        Field::str("name", &p.name),
        Field::Plain("type", type_tag),
        Field::str("server", &p.server),
        Field::Int("port", p.port),
        Field::str("cipher", &p.cipher),
        Field::str("password", &p.password),
        Field::Bool("udp", Some(true)),
    ];
    if let Some(plugin) = &p.plugin {
        fields.push(Field::str("plugin", plugin.name()));
        fields.push(Field::Group("plugin-opts", plugin_opts(plugin)));
    }
    fields
}

fn plugin_opts(plugin: &SsPlugin) -> Vec<Field<'_>> {
    match plugin {
        SsPlugin::Obfs { mode, host } => vec![
            Field::str("mode", mode),
            Field::Str("host", non_empty(host)),
        ],
        SsPlugin::V2rayPlugin {
            mode,
            host,
            path,
            tls,
        } => vec![
            Field::str("mode", mode),
            Field::Str("host", non_empty(host)),
            Field::Str("path", non_empty(path)),
            Field::Bool("tls", Some(*tls)),
        ],
    }
}

fn trojan_fields<'a>(p: &'a TrojanProxy, type_tag: &'a str) -> Vec<Field<'a>> {
    let mut fields = vec![
        Field::str("name", &p.name),
        Field::Plain("type", type_tag),
        Field::str("server", &p.server),
        Field::Int("port", p.port),
        Field::str("password", &p.password),
        Field::Bool("udp", Some(true)),
        Field::Bool("tls", Some(true)),
        Field::opt_str("servername", &p.sni),
        Field::Bool("skip-cert-verify", Some(p.skip_cert_verify)),
        Field::opt_str("client-fingerprint", &p.client_fingerprint),
        Field::List("alpn", &p.alpn),
        Field::Str(
            "network",
            (p.network != Network::Tcp).then_some(p.network.as_str()),
        ),
    ];
    // trojan has no http transport in mihomo
    push_transport_opts(
        &mut fields,
        &p.network,
        p.ws_opts.as_ref(),
        p.grpc_opts.as_ref(),
        None,
    );
    fields
}

fn hysteria2_fields<'a>(p: &'a Hysteria2Proxy, type_tag: &'a str) -> Vec<Field<'a>> {
    vec![
        Field::str("name", &p.name),
        Field::Plain("type", type_tag),
        Field::str("server", &p.server),
        Field::Int("port", p.port),
        Field::str("password", &p.password),
        Field::opt_str("sni", &p.sni),
        Field::opt_str("obfs", &p.obfs),
        Field::opt_str("obfs-password", &p.obfs_password),
        Field::Bool("skip-cert-verify", Some(p.skip_cert_verify)),
        Field::Bool("tfo", Some(p.tfo)),
        Field::opt_str("fingerprint", &p.fingerprint),
    ]
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

/// Append the option group matching `network`; groups for other transports are ignored.
fn push_transport_opts<'a>(
    fields: &mut Vec<Field<'a>>,
    network: &Network,
    ws: Option<&'a WsOpts>,
    grpc: Option<&'a GrpcOpts>,
    http: Option<&'a HttpOpts>,
) {
    match network {
        Network::Ws => {
            if let Some(ws) = ws {
                fields.push(Field::Group(
                    "ws-opts",
                    vec![
                        Field::opt_str("path", &ws.path),
                        Field::Group(
                            "headers",
                            ws.headers
                                .iter()
                                .map(|(k, v)| Field::str(k, v))
                                .collect(),
                        ),
                        Field::flag("v2ray-http-upgrade", ws.v2ray_http_upgrade),
                        Field::flag(
                            "v2ray-http-upgrade-fast-open",
                            ws.v2ray_http_upgrade_fast_open,
                        ),
                    ],
                ));
            }
        }
        Network::Grpc => {
            if let Some(grpc) = grpc {
                fields.push(Field::Group(
                    "grpc-opts",
                    vec![Field::opt_str("grpc-service-name", &grpc.grpc_service_name)],
                ));
            }
        }
        Network::Http => {
            if let Some(http) = http {
                fields.push(Field::Group(
                    "http-opts",
                    vec![
                        Field::List("path", &http.path),
                        Field::Group(
                            "headers",
                            http.headers
                                .iter()
                                .map(|(k, v)| Field::List(k, v))
                                .collect(),
                        ),
                    ],
                ));
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RealityOpts;

    fn vless() -> VlessProxy {
        VlessProxy {
            name: "My Node".to_string(),
            server: "example.com".to_string(),
            port: 443,
            uuid: "uuid-1".to_string(),
            tls: Some(true),
            sni: Some("example.com".to_string()),
            flow: None,
            skip_cert_verify: None,
            client_fingerprint: None,
            alpn: Vec::new(),
            network: Network::Ws,
            reality_opts: None,
            ws_opts: Some(WsOpts {
                path: Some("/ws".to_string()),
                ..Default::default()
            }),
            grpc_opts: None,
            http_opts: None,
        }
    }

    #[test]
    fn test_vless_output() {
        let yaml = proxy_to_yaml(&ProxyRecord::Vless(vless()));
        assert_eq!(
            yaml,
            "- name: 'My Node'\n  type: vless\n  server: 'example.com'\n  port: 443\n  uuid: 'uuid-1'\n  tls: true\n  servername: 'example.com'\n  network: 'ws'\n  ws-opts:\n    path: '/ws'"
        );
    }

    #[test]
    fn test_vless_reality_without_values_is_skipped() {
        let mut node = vless();
        node.network = Network::Tcp;
        node.tls = None;
        node.reality_opts = Some(RealityOpts::default());
        let yaml = proxy_to_yaml(&ProxyRecord::Vless(node));
        assert!(!yaml.contains("reality-opts"));
        assert!(!yaml.contains("tls:"));
        // ws-opts only belongs to the ws transport
        assert!(!yaml.contains("ws-opts"));
    }

    #[test]
    fn test_ss_with_v2ray_plugin() {
        let node = ShadowsocksProxy {
            name: "S".to_string(),
            server: "1.2.3.4".to_string(),
            port: 8388,
            cipher: "aes-256-gcm".to_string(),
            password: "pa'ss".to_string(),
            plugin: Some(SsPlugin::V2rayPlugin {
                mode: "websocket".to_string(),
                host: "cdn.example".to_string(),
                path: "/".to_string(),
                tls: false,
            }),
        };
        assert_eq!(
            proxy_to_yaml(&ProxyRecord::Shadowsocks(node)),
            "- name: 'S'\n  type: ss\n  server: '1.2.3.4'\n  port: 8388\n  cipher: 'aes-256-gcm'\n  password: 'pa''ss'\n  udp: true\n  plugin: 'v2ray-plugin'\n  plugin-opts:\n    mode: 'websocket'\n    host: 'cdn.example'\n    path: '/'\n    tls: false"
        );
    }

    #[test]
    fn test_trojan_tcp_omits_network() {
        let node = TrojanProxy {
            name: "T".to_string(),
            server: "t.example".to_string(),
            port: 443,
            password: "pw".to_string(),
            skip_cert_verify: false,
            sni: None,
            alpn: Vec::new(),
            network: Network::Tcp,
            client_fingerprint: None,
            ws_opts: None,
            grpc_opts: None,
        };
        assert_eq!(
            proxy_to_yaml(&ProxyRecord::Trojan(node)),
            "- name: 'T'\n  type: trojan\n  server: 't.example'\n  port: 443\n  password: 'pw'\n  udp: true\n  tls: true\n  skip-cert-verify: false"
        );
    }

    #[test]
    fn test_hysteria2_always_emits_booleans() {
        let node = Hysteria2Proxy {
            name: "H".to_string(),
            server: "h.example".to_string(),
            port: 443,
            password: "pw".to_string(),
            sni: None,
            obfs: None,
            obfs_password: None,
            skip_cert_verify: false,
            fingerprint: Some("chrome".to_string()),
            tfo: false,
        };
        assert_eq!(
            proxy_to_yaml(&ProxyRecord::Hysteria2(node)),
            "- name: 'H'\n  type: hysteria2\n  server: 'h.example'\n  port: 443\n  password: 'pw'\n  skip-cert-verify: false\n  tfo: false\n  fingerprint: 'chrome'"
        );
    }

    #[test]
    fn test_vmess_http_opts() {
        let mut headers = linked_hash_map::LinkedHashMap::new();
        headers.insert("Host".to_string(), vec!["h.example".to_string()]);
        let node = VmessProxy {
            name: "V".to_string(),
            server: "v.example".to_string(),
            port: 80,
            uuid: "id".to_string(),
            alter_id: 0,
            cipher: "auto".to_string(),
            tls: false,
            skip_cert_verify: false,
            servername: None,
            network: Network::Http,
            ws_opts: None,
            grpc_opts: None,
            http_opts: Some(HttpOpts {
                path: vec!["/".to_string()],
                headers,
            }),
        };
        let yaml = proxy_to_yaml(&ProxyRecord::Vmess(node));
        assert!(yaml.ends_with(
            "  network: 'http'\n  http-opts:\n    path:\n      - '/'\n    headers:\n      Host:\n        - 'h.example'"
        ));
        assert!(yaml.contains("  udp: true\n  alterId: 0\n  cipher: 'auto'\n  skip-cert-verify: false"));
    }

    #[test]
    fn test_block_header_and_order() {
        assert_eq!(build_proxies_yaml(&[]), "proxies:");
        let mut second = vless();
        second.name = "Second".to_string();
        let yaml = build_proxies_yaml(&[ProxyRecord::Vless(vless()), ProxyRecord::Vless(second)]);
        assert!(yaml.starts_with("proxies:\n- name: 'My Node'"));
        assert!(yaml.contains("\n- name: 'Second'"));
    }
}
