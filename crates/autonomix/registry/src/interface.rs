//! Capability introspection
//!
//! A selector is the first four bytes of the Keccak-256 digest of an
//! operation's canonical signature. An interface id is the XOR of the
//! selectors of a fixed signature list. The lists below are frozen: changing
//! any entry changes the id and breaks every client that probes for it.

use autonomix_types::InterfaceId;
use sha3::{Digest, Keccak256};
use std::sync::OnceLock;

/// A named, versioned, frozen operation set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceSpec {
    pub name: &'static str,
    pub version: u32,
    pub signatures: &'static [&'static str],
}

impl InterfaceSpec {
    /// Interface id of this operation set
    pub fn id(&self) -> InterfaceId {
        interface_id(self.signatures)
    }
}

/// Capability introspection itself
pub const ERC165: InterfaceSpec = InterfaceSpec {
    name: "ERC165",
    version: 1,
    signatures: &["supportsInterface(bytes4)"],
};

/// Base identity-token operations
pub const ERC721: InterfaceSpec = InterfaceSpec {
    name: "ERC721",
    version: 1,
    signatures: &[
        "balanceOf(address)",
        "ownerOf(uint256)",
        "safeTransferFrom(address,address,uint256,bytes)",
        "safeTransferFrom(address,address,uint256)",
        "transferFrom(address,address,uint256)",
        "approve(address,uint256)",
        "setApprovalForAll(address,bool)",
        "getApproved(uint256)",
        "isApprovedForAll(address,address)",
    ],
};

pub const ERC721_METADATA: InterfaceSpec = InterfaceSpec {
    name: "ERC721Metadata",
    version: 1,
    signatures: &["name()", "symbol()", "tokenURI(uint256)"],
};

pub const ERC721_ENUMERABLE: InterfaceSpec = InterfaceSpec {
    name: "ERC721Enumerable",
    version: 1,
    signatures: &[
        "totalSupply()",
        "tokenOfOwnerByIndex(address,uint256)",
        "tokenByIndex(uint256)",
    ],
};

pub const ACCESS_CONTROL: InterfaceSpec = InterfaceSpec {
    name: "AccessControl",
    version: 1,
    signatures: &[
        "hasRole(bytes32,address)",
        "getRoleAdmin(bytes32)",
        "grantRole(bytes32,address)",
        "revokeRole(bytes32,address)",
        "renounceRole(bytes32,address)",
    ],
};

/// The agent registry operation set, version 1
pub const AGENT_REGISTRY_V1: InterfaceSpec = InterfaceSpec {
    name: "AgentRegistry",
    version: 1,
    signatures: &[
        "agentEndpoint(uint256)",
        "agentMetadataURI(uint256)",
        "reputationOf(uint256)",
        "getAgent(uint256)",
        "registerAgent(address,string,string)",
        "setAgentMetadata(uint256,string,string)",
        "updateReputation(uint256,int256)",
    ],
};

/// Every operation set a registry advertises
pub const SUPPORTED: &[InterfaceSpec] = &[
    ERC165,
    ERC721,
    ERC721_METADATA,
    ERC721_ENUMERABLE,
    ACCESS_CONTROL,
    AGENT_REGISTRY_V1,
];

/// Selector of a canonical signature
pub fn selector(signature: &str) -> InterfaceId {
    let digest = Keccak256::digest(signature.as_bytes());
    InterfaceId::from_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// XOR of the selectors of `signatures`
pub fn interface_id(signatures: &[&str]) -> InterfaceId {
    signatures
        .iter()
        .map(|sig| selector(sig))
        .fold(InterfaceId::from_u32(0), |acc, id| acc ^ id)
}

fn supported_ids() -> &'static [InterfaceId] {
    static IDS: OnceLock<Vec<InterfaceId>> = OnceLock::new();
    IDS.get_or_init(|| SUPPORTED.iter().map(InterfaceSpec::id).collect())
}

/// Whether a registry supports the operation set identified by `id`
pub fn supports_interface(id: InterfaceId) -> bool {
    id != InterfaceId::INVALID && supported_ids().contains(&id)
}

/// Supported operation sets paired with their ids
pub fn supported_interfaces() -> Vec<(InterfaceSpec, InterfaceId)> {
    SUPPORTED.iter().map(|spec| (*spec, spec.id())).collect()
}
