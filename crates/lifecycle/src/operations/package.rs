// Path: crates/lifecycle/src/operations/package.rs

use super::{observe, PackageOptions};
use hlf_api::packaging::PackagingUtility;
use hlf_telemetry::{lifecycle_metrics, Timer};
use hlf_types::error::{LifecycleError, Operation};
use hlf_types::{ChaincodeIdentity, ChaincodeType, LifecycleConfig};
use std::path::PathBuf;

/// Builds an installable archive through the packaging utility and returns it
/// unmodified.
///
/// The chaincode type and label are checked first. Golang chaincode needs a Go
/// path: the explicit one, else the environment variable named by
/// [`LifecycleConfig::go_path_env`].
pub async fn package_chaincode(
    identity: &ChaincodeIdentity,
    options: &PackageOptions,
    packager: &dyn PackagingUtility,
    config: &LifecycleConfig,
) -> Result<Vec<u8>, LifecycleError> {
    build_package(identity, options, packager, config)
        .await
        .map(|(_, archive)| archive)
}

pub(crate) async fn build_package(
    identity: &ChaincodeIdentity,
    options: &PackageOptions,
    packager: &dyn PackagingUtility,
    config: &LifecycleConfig,
) -> Result<(ChaincodeType, Vec<u8>), LifecycleError> {
    let stage = Operation::Package;
    let _timer = Timer::new(lifecycle_metrics(), stage.as_str());
    observe(stage, package_inner(identity, options, packager, config).await)
}

async fn package_inner(
    identity: &ChaincodeIdentity,
    options: &PackageOptions,
    packager: &dyn PackagingUtility,
    config: &LifecycleConfig,
) -> Result<(ChaincodeType, Vec<u8>), LifecycleError> {
    let chaincode_type: ChaincodeType = options.chaincode_type.parse()?;
    validate_label(&options.label)?;
    let go_path = match chaincode_type {
        ChaincodeType::Golang => Some(resolve_go_path(options, config)?),
        ChaincodeType::Java | ChaincodeType::Node => None,
    };

    tracing::info!(
        target: "lifecycle",
        chaincode = %identity,
        label = %options.label,
        chaincode_type = %chaincode_type,
        source = %options.source_path.display(),
        "packaging chaincode"
    );

    let code_package = packager
        .package_contract(
            &options.source_path,
            chaincode_type,
            options.metadata_path.as_deref(),
            go_path.as_deref(),
        )
        .await
        .map_err(|e| LifecycleError::Packaging(format!("{:#}", e)))?;
    let archive = packager
        .final_package(
            &options.label,
            chaincode_type,
            code_package,
            &options.source_path,
        )
        .await
        .map_err(|e| LifecycleError::Packaging(format!("{:#}", e)))?;

    tracing::debug!(target: "lifecycle", chaincode = %identity, bytes = archive.len(), "packaged chaincode");
    Ok((chaincode_type, archive))
}

fn resolve_go_path(
    options: &PackageOptions,
    config: &LifecycleConfig,
) -> Result<PathBuf, LifecycleError> {
    if let Some(path) = options.go_path.as_ref().filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path.clone());
    }
    std::env::var_os(&config.go_path_env)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| LifecycleError::MissingGoPath {
            env_var: config.go_path_env.clone(),
        })
}

/// Checks a package label against the peer's rule: non-empty, starting with an
/// ASCII letter or digit, and otherwise made of letters, digits and `_ . + -`.
pub fn validate_label(label: &str) -> Result<(), LifecycleError> {
    let invalid = |reason: &str| LifecycleError::InvalidLabel {
        label: label.to_string(),
        reason: reason.to_string(),
    };
    let mut chars = label.chars();
    match chars.next() {
        None => return Err(invalid("the label must not be empty")),
        Some(first) if !first.is_ascii_alphanumeric() => {
            return Err(invalid("the label must start with a letter or digit"))
        }
        Some(_) => {}
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || "_.+-".contains(*c))) {
        return Err(invalid(&format!("character '{}' is not allowed", bad)));
    }
    Ok(())
}
