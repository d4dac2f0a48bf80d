use mihomo_linkconv::models::{Network, ProxyKind, ProxyRecord, SsPlugin};
use mihomo_linkconv::parser::{explode, explode_links, explode_text};
use mihomo_linkconv::utils::base64::base64_encode;
use mihomo_linkconv::ConvertError;

#[test]
fn test_vless_ws_tls() {
    let record = explode(
        "vless://uuid-1@example.com:443?security=tls&sni=example.com&type=ws&path=%2Fws#My%20Node",
    )
    .unwrap();
    let ProxyRecord::Vless(node) = record else {
        panic!("expected vless");
    };
    assert_eq!(node.server, "example.com");
    assert_eq!(node.port, 443);
    assert_eq!(node.tls, Some(true));
    assert_eq!(node.sni.as_deref(), Some("example.com"));
    assert_eq!(node.network, Network::Ws);
    assert_eq!(
        node.ws_opts.and_then(|ws| ws.path).as_deref(),
        Some("/ws")
    );
    assert_eq!(node.name, "My Node");
}

#[test]
fn test_vless_reality() {
    let record = explode(
        "vless://id@r.example:443?security=reality&pbk=PUBKEY&sid=ab12&flow=xtls-rprx-vision&fp=chrome&type=tcp",
    )
    .unwrap();
    let ProxyRecord::Vless(node) = record else {
        panic!("expected vless");
    };
    let reality = node.reality_opts.unwrap();
    assert_eq!(reality.public_key.as_deref(), Some("PUBKEY"));
    assert_eq!(reality.short_id.as_deref(), Some("ab12"));
    assert_eq!(node.flow.as_deref(), Some("xtls-rprx-vision"));
    assert_eq!(node.client_fingerprint.as_deref(), Some("chrome"));
    assert_eq!(node.tls, Some(true));
}

#[test]
fn test_ss_sip002() {
    let record = explode("ss://YWVzLTI1Ni1nY206cGFzcw==@1.2.3.4:8388#MySS").unwrap();
    let ProxyRecord::Shadowsocks(node) = record else {
        panic!("expected ss");
    };
    assert_eq!(node.cipher, "aes-256-gcm");
    assert_eq!(node.password, "pass");
    assert_eq!(node.name, "MySS");
}

#[test]
fn test_ss_obfs_plugin() {
    let record = explode(
        "ss://YWVzLTI1Ni1nY206cGFzcw==@1.2.3.4:8388/?plugin=obfs-local%3Bobfs%3Dhttp%3Bobfs-host%3Dexample.org",
    )
    .unwrap();
    let ProxyRecord::Shadowsocks(node) = record else {
        panic!("expected ss");
    };
    assert_eq!(
        node.plugin,
        Some(SsPlugin::Obfs {
            mode: "http".to_string(),
            host: "example.org".to_string()
        })
    );
}

#[test]
fn test_vmess_json() {
    let json = r#"{"v":"2","ps":"","add":"v.example","port":8443,"id":"id-1","aid":2,"net":"grpc","path":"svc","tls":"tls"}"#;
    let record = explode(&format!("vmess://{}", base64_encode(json))).unwrap();
    let ProxyRecord::Vmess(node) = record else {
        panic!("expected vmess");
    };
    assert_eq!(node.port, 8443);
    assert_eq!(node.alter_id, 2);
    assert!(node.tls);
    assert_eq!(node.network, Network::Grpc);
    assert_eq!(
        node.grpc_opts.and_then(|g| g.grpc_service_name).as_deref(),
        Some("svc")
    );
    assert_eq!(node.name, "VMess v.example:8443");
}

#[test]
fn test_trojan_and_hysteria2() {
    let records = explode_links([
        "trojan://pw@t.example:443?sni=s.example#T",
        "hysteria2://pw@h.example:443?insecure=1&obfs=salamander&obfs-password=x#H",
    ])
    .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].kind(), ProxyKind::Trojan);
    assert_eq!(records[1].kind(), ProxyKind::Hysteria2);
    let ProxyRecord::Hysteria2(hy) = &records[1] else {
        panic!("expected hysteria2");
    };
    assert!(hy.skip_cert_verify);
    assert_eq!(hy.obfs_password.as_deref(), Some("x"));
}

#[test]
fn test_default_names() {
    let cases = [
        ("vless://id@v.example:443", "VLESS v.example:443"),
        ("ss://YWVzLTI1Ni1nY206cGFzcw==@1.2.3.4:8388#", "Shadowsocks 1.2.3.4:8388"),
        ("trojan://pw@t.example:8443#", "Trojan t.example:8443"),
        ("hy2://pw@h.example:443", "Hysteria2 h.example:443"),
    ];
    for (link, expected) in cases {
        assert_eq!(explode(link).unwrap().name(), expected, "link: {}", link);
    }
}

#[test]
fn test_unsupported_scheme() {
    assert_eq!(
        explode("socks5://h:1080"),
        Err(ConvertError::UnsupportedScheme {
            line: "socks5://h:1080".to_string()
        })
    );
}

#[test]
fn test_malformed_links() {
    for link in [
        "vless://not base64 at all",
        "vmess://%%%",
        "trojan://no-at-sign",
        "hysteria2://pw@h.example",
    ] {
        assert!(
            matches!(explode(link), Err(ConvertError::MalformedUri { .. })),
            "link: {}",
            link
        );
    }
}

#[test]
fn test_explode_text_preserves_order_and_skips_blanks() {
    let text = "\n trojan://a@one.example:1#A \n\n\ttrojan://b@two.example:2#B\n";
    let names: Vec<String> = explode_text(text)
        .unwrap()
        .iter()
        .map(|r| r.name().to_string())
        .collect();
    assert_eq!(names, vec!["A".to_string(), "B".to_string()]);
}
