//! Startup seeding of the development dataset

use core_kernel::PortError;
use domain_policy::{PolicyTermPort, SeedGenerator, SeedReport};
use tracing::info;

use crate::config::ApiConfig;

/// Replaces the stored dataset with the deterministic seed when the local
/// profile is active
///
/// Returns `None` without touching storage for any other profile.
///
/// # Errors
///
/// Returns `PortError::Internal` if the dataset cannot be generated and the
/// port's error if writing it fails; in both cases storage is unchanged.
pub async fn seed_if_local(
    port: &dyn PolicyTermPort,
    config: &ApiConfig,
) -> Result<Option<SeedReport>, PortError> {
    if !config.is_local() {
        info!(profile = %config.profile, "Skipping seed data outside the local profile");
        return Ok(None);
    }

    let data = SeedGenerator::new()
        .generate()
        .map_err(|e| PortError::internal(e.to_string()))?;
    let report = port.replace_dataset(&data).await?;

    info!(
        policies = report.policies,
        terms = report.terms,
        "Seeded local dataset"
    );
    Ok(Some(report))
}
