//! Transport and plugin sub-records shared by several proxy kinds

use std::fmt;

use linked_hash_map::LinkedHashMap;
use serde::{Deserialize, Serialize};

/// Transport a proxy runs over.
///
/// VLESS restricts itself to the five known values; Trojan and VMess pass
/// through whatever the link carries, which lands in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Network {
    #[default]
    Tcp,
    Ws,
    Http,
    Grpc,
    H2,
    Other(String),
}

impl Network {
    pub fn as_str(&self) -> &str {
        match self {
            Network::Tcp => "tcp",
            Network::Ws => "ws",
            Network::Http => "http",
            Network::Grpc => "grpc",
            Network::H2 => "h2",
            Network::Other(s) => s,
        }
    }

    /// True for the five transports every dialect understands.
    pub fn is_known(&self) -> bool {
        !matches!(self, Network::Other(_))
    }
}

impl From<&str> for Network {
    fn from(s: &str) -> Self {
        match s {
            "tcp" => Network::Tcp,
            "ws" => Network::Ws,
            "http" => Network::Http,
            "grpc" => Network::Grpc,
            "h2" => Network::H2,
            other => Network::Other(other.to_string()),
        }
    }
}

impl From<String> for Network {
    fn from(s: String) -> Self {
        Network::from(s.as_str())
    }
}

impl From<Network> for String {
    fn from(n: Network) -> Self {
        n.as_str().to_string()
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// WebSocket options (`ws-opts`)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct WsOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "LinkedHashMap::is_empty")]
    pub headers: LinkedHashMap<String, String>,
    pub v2ray_http_upgrade: bool,
    pub v2ray_http_upgrade_fast_open: bool,
}

impl WsOpts {
    /// Options produced by the `httpupgrade` transport.
    pub fn http_upgrade() -> Self {
        WsOpts {
            v2ray_http_upgrade: true,
            v2ray_http_upgrade_fast_open: true,
            ..Default::default()
        }
    }

    pub fn is_effective(&self) -> bool {
        self.path.is_some()
            || !self.headers.is_empty()
            || self.v2ray_http_upgrade
            || self.v2ray_http_upgrade_fast_open
    }
}

/// gRPC options (`grpc-opts`)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct GrpcOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grpc_service_name: Option<String>,
}

impl GrpcOpts {
    pub fn is_effective(&self) -> bool {
        self.grpc_service_name.is_some()
    }
}

/// HTTP/1.1 obfuscation options (`http-opts`).
///
/// mihomo expects list-valued paths and header values here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpOpts {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
    #[serde(skip_serializing_if = "LinkedHashMap::is_empty")]
    pub headers: LinkedHashMap<String, Vec<String>>,
}

impl HttpOpts {
    pub fn is_effective(&self) -> bool {
        !self.path.is_empty() || self.headers.values().any(|v| !v.is_empty())
    }
}

/// REALITY options (`reality-opts`)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RealityOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_id: Option<String>,
}

impl RealityOpts {
    pub fn is_effective(&self) -> bool {
        self.public_key.is_some() || self.short_id.is_some()
    }
}

/// Shadowsocks SIP003 plugin with its `plugin-opts`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "kebab-case")]
pub enum SsPlugin {
    Obfs {
        mode: String,
        host: String,
    },
    V2rayPlugin {
        mode: String,
        host: String,
        path: String,
        tls: bool,
    },
}

impl SsPlugin {
    /// Plugin name as mihomo spells it.
    pub fn name(&self) -> &'static str {
        match self {
            SsPlugin::Obfs { .. } => "obfs",
            SsPlugin::V2rayPlugin { .. } => "v2ray-plugin",
        }
    }
}
