use lazy_static::lazy_static;
use linked_hash_map::LinkedHashMap;
use regex::Regex;

use crate::error::{ConvertError, Result};
use crate::models::{Hysteria2Proxy, ProxyKind, ProxyRecord};
use crate::utils::{first_param, is_truthy_flag, url_decode};

const SCHEME: &str = "Hysteria2";

lazy_static! {
    static ref HYSTERIA2_REGEX: Regex = Regex::new(
        r"^(?:hysteria2|hy2)://([^@]+)@([^:]+):(\d+)/?(?:\?([^#]*))?(?:#(.*))?"
    )
    .unwrap();
}

/// Parse a Hysteria2 link (`hysteria2://` or `hy2://`) into a proxy record
pub fn explode_hysteria2(hysteria2: &str) -> Result<ProxyRecord> {
    let caps = HYSTERIA2_REGEX
        .captures(hysteria2)
        .ok_or_else(|| ConvertError::malformed(SCHEME, "expected password@server:port"))?;

    let server = caps[2].to_string();
    let port: u32 = caps[3]
        .parse()
        .map_err(|_| ConvertError::malformed(SCHEME, format!("invalid port {}", &caps[3])))?;
    let password = url_decode(&caps[1]);
    let name = url_decode(caps.get(5).map_or("", |m| m.as_str()))
        .trim()
        .to_string();
    let name = if name.is_empty() {
        ProxyKind::Hysteria2.default_name(&server, port)
    } else {
        name
    };

    // first occurrence of a key wins
    let mut params: LinkedHashMap<String, String> = LinkedHashMap::new();
    let query = caps.get(4).map_or("", |m| m.as_str());
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if !params.contains_key(&*key) {
            params.insert(key.into_owned(), value.into_owned());
        }
    }

    let obfs = first_param(&params, &["obfs"])
        .filter(|o| *o != "none")
        .map(str::to_string);
    let obfs_password = if obfs.is_some() {
        first_param(&params, &["obfs-password"]).map(str::to_string)
    } else {
        None
    };

    Ok(ProxyRecord::Hysteria2(Hysteria2Proxy {
        name,
        server,
        port,
        password,
        sni: first_param(&params, &["sni", "peer"]).map(str::to_string),
        obfs,
        obfs_password,
        skip_cert_verify: params.get("insecure").is_some_and(|v| is_truthy_flag(v)),
        fingerprint: first_param(&params, &["fp", "fingerprint", "pinSHA256"])
            .map(str::to_string),
        tfo: params.get("tfo").is_some_and(|v| is_truthy_flag(v)),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hy2(link: &str) -> Hysteria2Proxy {
        match explode_hysteria2(link).unwrap() {
            ProxyRecord::Hysteria2(h) => h,
            other => panic!("expected hysteria2, got {:?}", other),
        }
    }

    #[test]
    fn test_full_link() {
        let node = hy2(
            "hysteria2://p%40ss@h.example:443/?obfs=salamander&obfs-password=cry&sni=s.example&insecure=1&pinSHA256=AB:CD&tfo=true#HY%202",
        );
        assert_eq!(node.password, "p@ss");
        assert_eq!(node.server, "h.example");
        assert_eq!(node.port, 443);
        assert_eq!(node.obfs.as_deref(), Some("salamander"));
        assert_eq!(node.obfs_password.as_deref(), Some("cry"));
        assert_eq!(node.sni.as_deref(), Some("s.example"));
        assert!(node.skip_cert_verify);
        assert_eq!(node.fingerprint.as_deref(), Some("AB:CD"));
        assert!(node.tfo);
        assert_eq!(node.name, "HY 2");
    }

    #[test]
    fn test_hy2_scheme_and_defaults() {
        let node = hy2("hy2://pw@1.2.3.4:8443");
        assert_eq!(node.name, "Hysteria2 1.2.3.4:8443");
        assert!(!node.skip_cert_verify);
        assert!(!node.tfo);
        assert_eq!(node.obfs, None);
        assert_eq!(node.sni, None);
    }

    #[test]
    fn test_obfs_none_drops_password() {
        let node = hy2("hy2://pw@h.example:443?obfs=none&obfs-password=x&peer=p.example");
        assert_eq!(node.obfs, None);
        assert_eq!(node.obfs_password, None);
        assert_eq!(node.sni.as_deref(), Some("p.example"));
    }

    #[test]
    fn test_fingerprint_precedence() {
        let node = hy2("hy2://pw@h.example:443?pinSHA256=pin&fingerprint=fpr&fp=chrome");
        assert_eq!(node.fingerprint.as_deref(), Some("chrome"));
    }

    #[test]
    fn test_missing_port_is_malformed() {
        assert!(matches!(
            explode_hysteria2("hysteria2://pw@h.example"),
            Err(ConvertError::MalformedUri { scheme: "Hysteria2", .. })
        ));
    }
}
