// Path: crates/proto/src/msp.rs
//! MSP principals (`msp/msp_principal.proto`).

/// An identity class plus its serialized qualifier.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MspPrincipal {
    #[prost(enumeration = "msp_principal::Classification", tag = "1")]
    pub principal_classification: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub principal: ::prost::alloc::vec::Vec<u8>,
}

/// Nested message and enum types in `MSPPrincipal`.
pub mod msp_principal {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Classification {
        Role = 0,
        OrganizationUnit = 1,
        Identity = 2,
        Anonymity = 3,
        Combined = 4,
    }
}

/// The qualifier of a `ROLE` principal.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MspRole {
    #[prost(string, tag = "1")]
    pub msp_identifier: ::prost::alloc::string::String,
    #[prost(enumeration = "msp_role::MspRoleType", tag = "2")]
    pub role: i32,
}

/// Nested message and enum types in `MSPRole`.
pub mod msp_role {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum MspRoleType {
        Member = 0,
        Admin = 1,
        Client = 2,
        Peer = 3,
        Orderer = 4,
    }
}
