//! Proxy model definitions
//!
//! Contains the normalized records every share-link dialect is parsed into.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::transport::{GrpcOpts, HttpOpts, Network, RealityOpts, SsPlugin, WsOpts};
use crate::error::ConvertError;

/// Represents the kind of a proxy record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyKind {
    Vless,
    Vmess,
    Shadowsocks,
    Trojan,
    Hysteria2,
}

impl ProxyKind {
    /// Human-readable label, used for default names.
    pub fn label(self) -> &'static str {
        match self {
            ProxyKind::Vless => "VLESS",
            ProxyKind::Vmess => "VMess",
            ProxyKind::Shadowsocks => "Shadowsocks",
            ProxyKind::Trojan => "Trojan",
            ProxyKind::Hysteria2 => "Hysteria2",
        }
    }

    /// The `type:` value written into the proxies block.
    pub fn type_tag(self) -> &'static str {
        match self {
            ProxyKind::Vless => "vless",
            ProxyKind::Vmess => "vmess",
            ProxyKind::Shadowsocks => "ss",
            ProxyKind::Trojan => "trojan",
            ProxyKind::Hysteria2 => "hysteria2",
        }
    }

    /// Name used when a link carries none: `"<Kind> <server>:<port>"`.
    pub fn default_name(self, server: &str, port: u32) -> String {
        format!("{} {}:{}", self.label(), server, port)
    }
}

impl fmt::Display for ProxyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

impl FromStr for ProxyKind {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vless" => Ok(ProxyKind::Vless),
            "vmess" => Ok(ProxyKind::Vmess),
            "ss" => Ok(ProxyKind::Shadowsocks),
            "trojan" => Ok(ProxyKind::Trojan),
            "hysteria2" => Ok(ProxyKind::Hysteria2),
            other => Err(ConvertError::UnknownProxyKind(other.to_string())),
        }
    }
}

/// VLESS proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VlessProxy {
    pub name: String,
    pub server: String,
    pub port: u32,
    pub uuid: String,
    /// `Some(true)` or absent, never `Some(false)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sni: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_cert_verify: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alpn: Vec<String>,
    #[serde(default)]
    pub network: Network,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reality_opts: Option<RealityOpts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ws_opts: Option<WsOpts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grpc_opts: Option<GrpcOpts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_opts: Option<HttpOpts>,
}

/// VMess proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VmessProxy {
    pub name: String,
    pub server: String,
    pub port: u32,
    pub uuid: String,
    #[serde(rename = "alterId", default)]
    pub alter_id: u32,
    #[serde(default = "default_vmess_cipher")]
    pub cipher: String,
    #[serde(default)]
    pub tls: bool,
    #[serde(default)]
    pub skip_cert_verify: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servername: Option<String>,
    #[serde(default)]
    pub network: Network,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ws_opts: Option<WsOpts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grpc_opts: Option<GrpcOpts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_opts: Option<HttpOpts>,
}

fn default_vmess_cipher() -> String {
    "auto".to_string()
}

/// Shadowsocks proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ShadowsocksProxy {
    pub name: String,
    pub server: String,
    pub port: u32,
    pub cipher: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<SsPlugin>,
}

/// Trojan proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TrojanProxy {
    pub name: String,
    pub server: String,
    pub port: u32,
    pub password: String,
    #[serde(default)]
    pub skip_cert_verify: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sni: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alpn: Vec<String>,
    #[serde(default)]
    pub network: Network,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ws_opts: Option<WsOpts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grpc_opts: Option<GrpcOpts>,
}

/// Hysteria2 proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Hysteria2Proxy {
    pub name: String,
    pub server: String,
    pub port: u32,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sni: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfs_password: Option<String>,
    #[serde(default)]
    pub skip_cert_verify: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(default)]
    pub tfo: bool,
}

/// A parsed proxy, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProxyRecord {
    #[serde(rename = "vless")]
    Vless(VlessProxy),
    #[serde(rename = "vmess")]
    Vmess(VmessProxy),
    #[serde(rename = "ss")]
    Shadowsocks(ShadowsocksProxy),
    #[serde(rename = "trojan")]
    Trojan(TrojanProxy),
    #[serde(rename = "hysteria2")]
    Hysteria2(Hysteria2Proxy),
}

impl ProxyRecord {
    pub fn kind(&self) -> ProxyKind {
        match self {
            ProxyRecord::Vless(_) => ProxyKind::Vless,
            ProxyRecord::Vmess(_) => ProxyKind::Vmess,
            ProxyRecord::Shadowsocks(_) => ProxyKind::Shadowsocks,
            ProxyRecord::Trojan(_) => ProxyKind::Trojan,
            ProxyRecord::Hysteria2(_) => ProxyKind::Hysteria2,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ProxyRecord::Vless(p) => &p.name,
            ProxyRecord::Vmess(p) => &p.name,
            ProxyRecord::Shadowsocks(p) => &p.name,
            ProxyRecord::Trojan(p) => &p.name,
            ProxyRecord::Hysteria2(p) => &p.name,
        }
    }

    pub fn server(&self) -> &str {
        match self {
            ProxyRecord::Vless(p) => &p.server,
            ProxyRecord::Vmess(p) => &p.server,
            ProxyRecord::Shadowsocks(p) => &p.server,
            ProxyRecord::Trojan(p) => &p.server,
            ProxyRecord::Hysteria2(p) => &p.server,
        }
    }

    pub fn port(&self) -> u32 {
        match self {
            ProxyRecord::Vless(p) => p.port,
            ProxyRecord::Vmess(p) => p.port,
            ProxyRecord::Shadowsocks(p) => p.port,
            ProxyRecord::Trojan(p) => p.port,
            ProxyRecord::Hysteria2(p) => p.port,
        }
    }
}
