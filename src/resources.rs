//! Resource and Agent Kinds
//!
//! Names only. Later pipeline stages will attach behaviour to these; the
//! expansion engine never consults them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    #[serde(rename = "network/flat")]
    NetworkFlat,
    #[serde(rename = "network/vlan")]
    NetworkVlan,
    #[serde(rename = "port/vlan")]
    PortVlan,
    #[serde(rename = "vm/kvm")]
    VmKvm,
    #[serde(rename = "volume/file")]
    VolumeFile,
    #[serde(rename = "volume/nfs")]
    VolumeNfs,
    #[serde(rename = "volume_snapshot")]
    VolumeSnapshot,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::NetworkFlat,
        ResourceKind::NetworkVlan,
        ResourceKind::PortVlan,
        ResourceKind::VmKvm,
        ResourceKind::VolumeFile,
        ResourceKind::VolumeNfs,
        ResourceKind::VolumeSnapshot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::NetworkFlat => "network/flat",
            ResourceKind::NetworkVlan => "network/vlan",
            ResourceKind::PortVlan => "port/vlan",
            ResourceKind::VmKvm => "vm/kvm",
            ResourceKind::VolumeFile => "volume/file",
            ResourceKind::VolumeNfs => "volume/nfs",
            ResourceKind::VolumeSnapshot => "volume_snapshot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    #[serde(rename = "compute/kvm")]
    ComputeKvm,
    #[serde(rename = "porter/flat")]
    PorterFlat,
    #[serde(rename = "networker/bgp")]
    NetworkerBgp,
    #[serde(rename = "volumer/file")]
    VolumerFile,
}

impl AgentKind {
    pub const ALL: [AgentKind; 4] = [
        AgentKind::ComputeKvm,
        AgentKind::PorterFlat,
        AgentKind::NetworkerBgp,
        AgentKind::VolumerFile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::ComputeKvm => "compute/kvm",
            AgentKind::PorterFlat => "porter/flat",
            AgentKind::NetworkerBgp => "networker/bgp",
            AgentKind::VolumerFile => "volumer/file",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown kind: {0}")]
pub struct UnknownKind(pub String);

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

impl FromStr for AgentKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}
