// Path: crates/proto/src/lifecycle.rs
//! Arguments and results of the `_lifecycle` system chaincode
//! (`peer/lifecycle/lifecycle.proto`).

use super::peer::CollectionConfigPackage;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InstallChaincodeArgs {
    #[prost(bytes = "vec", tag = "1")]
    pub chaincode_install_package: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InstallChaincodeResult {
    #[prost(string, tag = "1")]
    pub package_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub label: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryInstalledChaincodeArgs {
    #[prost(string, tag = "1")]
    pub package_id: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryInstalledChaincodeResult {
    #[prost(string, tag = "1")]
    pub package_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub label: ::prost::alloc::string::String,
    #[prost(btree_map = "string, message", tag = "3")]
    pub references: ::prost::alloc::collections::BTreeMap<
        ::prost::alloc::string::String,
        query_installed_chaincode_result::References,
    >,
}

/// Nested message and enum types in `QueryInstalledChaincodeResult`.
pub mod query_installed_chaincode_result {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct References {
        #[prost(message, repeated, tag = "1")]
        pub chaincodes: ::prost::alloc::vec::Vec<Chaincode>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Chaincode {
        #[prost(string, tag = "1")]
        pub name: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub version: ::prost::alloc::string::String,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetInstalledChaincodePackageArgs {
    #[prost(string, tag = "1")]
    pub package_id: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetInstalledChaincodePackageResult {
    #[prost(bytes = "vec", tag = "1")]
    pub chaincode_install_package: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryInstalledChaincodesArgs {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryInstalledChaincodesResult {
    #[prost(message, repeated, tag = "1")]
    pub installed_chaincodes:
        ::prost::alloc::vec::Vec<query_installed_chaincodes_result::InstalledChaincode>,
}

/// Nested message and enum types in `QueryInstalledChaincodesResult`.
pub mod query_installed_chaincodes_result {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct InstalledChaincode {
        #[prost(string, tag = "1")]
        pub package_id: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub label: ::prost::alloc::string::String,
        #[prost(btree_map = "string, message", tag = "3")]
        pub references:
            ::prost::alloc::collections::BTreeMap<::prost::alloc::string::String, References>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct References {
        #[prost(message, repeated, tag = "1")]
        pub chaincodes: ::prost::alloc::vec::Vec<Chaincode>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Chaincode {
        #[prost(string, tag = "1")]
        pub name: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub version: ::prost::alloc::string::String,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ApproveChaincodeDefinitionForMyOrgArgs {
    #[prost(int64, tag = "1")]
    pub sequence: i64,
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub version: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub endorsement_plugin: ::prost::alloc::string::String,
    #[prost(string, tag = "5")]
    pub validation_plugin: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "6")]
    pub validation_parameter: ::prost::alloc::vec::Vec<u8>,
    #[prost(message, optional, tag = "7")]
    pub collections: ::core::option::Option<CollectionConfigPackage>,
    #[prost(bool, tag = "8")]
    pub init_required: bool,
    #[prost(message, optional, tag = "9")]
    pub source: ::core::option::Option<ChaincodeSource>,
}

/// Where the approving organization's package comes from.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChaincodeSource {
    #[prost(oneof = "chaincode_source::Type", tags = "1, 2")]
    pub r#type: ::core::option::Option<chaincode_source::Type>,
}

/// Nested message and enum types in `ChaincodeSource`.
pub mod chaincode_source {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Unavailable {}

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Local {
        #[prost(string, tag = "1")]
        pub package_id: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Type {
        #[prost(message, tag = "1")]
        Unavailable(Unavailable),
        #[prost(message, tag = "2")]
        LocalPackage(Local),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ApproveChaincodeDefinitionForMyOrgResult {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommitChaincodeDefinitionArgs {
    #[prost(int64, tag = "1")]
    pub sequence: i64,
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub version: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub endorsement_plugin: ::prost::alloc::string::String,
    #[prost(string, tag = "5")]
    pub validation_plugin: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "6")]
    pub validation_parameter: ::prost::alloc::vec::Vec<u8>,
    #[prost(message, optional, tag = "7")]
    pub collections: ::core::option::Option<CollectionConfigPackage>,
    #[prost(bool, tag = "8")]
    pub init_required: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommitChaincodeDefinitionResult {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CheckCommitReadinessArgs {
    #[prost(int64, tag = "1")]
    pub sequence: i64,
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub version: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub endorsement_plugin: ::prost::alloc::string::String,
    #[prost(string, tag = "5")]
    pub validation_plugin: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "6")]
    pub validation_parameter: ::prost::alloc::vec::Vec<u8>,
    #[prost(message, optional, tag = "7")]
    pub collections: ::core::option::Option<CollectionConfigPackage>,
    #[prost(bool, tag = "8")]
    pub init_required: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CheckCommitReadinessResult {
    #[prost(btree_map = "string, bool", tag = "1")]
    pub approvals: ::prost::alloc::collections::BTreeMap<::prost::alloc::string::String, bool>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryChaincodeDefinitionArgs {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryChaincodeDefinitionResult {
    #[prost(int64, tag = "1")]
    pub sequence: i64,
    #[prost(string, tag = "2")]
    pub version: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub endorsement_plugin: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub validation_plugin: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "5")]
    pub validation_parameter: ::prost::alloc::vec::Vec<u8>,
    #[prost(message, optional, tag = "6")]
    pub collections: ::core::option::Option<CollectionConfigPackage>,
    #[prost(bool, tag = "7")]
    pub init_required: bool,
    #[prost(btree_map = "string, bool", tag = "8")]
    pub approvals: ::prost::alloc::collections::BTreeMap<::prost::alloc::string::String, bool>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryChaincodeDefinitionsArgs {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryChaincodeDefinitionsResult {
    #[prost(message, repeated, tag = "1")]
    pub chaincode_definitions:
        ::prost::alloc::vec::Vec<query_chaincode_definitions_result::ChaincodeDefinition>,
}

/// Nested message and enum types in `QueryChaincodeDefinitionsResult`.
pub mod query_chaincode_definitions_result {
    use super::CollectionConfigPackage;

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ChaincodeDefinition {
        #[prost(string, tag = "1")]
        pub name: ::prost::alloc::string::String,
        #[prost(int64, tag = "2")]
        pub sequence: i64,
        #[prost(string, tag = "3")]
        pub version: ::prost::alloc::string::String,
        #[prost(string, tag = "4")]
        pub endorsement_plugin: ::prost::alloc::string::String,
        #[prost(string, tag = "5")]
        pub validation_plugin: ::prost::alloc::string::String,
        #[prost(bytes = "vec", tag = "6")]
        pub validation_parameter: ::prost::alloc::vec::Vec<u8>,
        #[prost(message, optional, tag = "7")]
        pub collections: ::core::option::Option<CollectionConfigPackage>,
        #[prost(bool, tag = "8")]
        pub init_required: bool,
    }
}
