// Path: crates/api/src/packaging.rs

use async_trait::async_trait;
use hlf_types::ChaincodeType;
use std::path::Path;

/// Builds installable chaincode archives.
///
/// The result is a two-level archive: the inner code package produced by
/// [`package_contract`](Self::package_contract) wrapped with its metadata by
/// [`final_package`](Self::final_package).
#[async_trait]
pub trait PackagingUtility: Send + Sync {
    /// Archives the chaincode source (and optional metadata directory).
    async fn package_contract(
        &self,
        source_path: &Path,
        chaincode_type: ChaincodeType,
        metadata_path: Option<&Path>,
        go_path: Option<&Path>,
    ) -> anyhow::Result<Vec<u8>>;

    /// Wraps the code archive together with its label and type.
    async fn final_package(
        &self,
        label: &str,
        chaincode_type: ChaincodeType,
        code_package: Vec<u8>,
        source_path: &Path,
    ) -> anyhow::Result<Vec<u8>>;
}
