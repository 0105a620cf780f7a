//! Package identity and version stamping.

use crate::document::ProjectDocument;
use crate::project::PackageName;

const PACKAGE_ID: &str = "PackageId";
const VERSION: &str = "Version";

/// Reads `PackageId` from the first property group.
///
/// Test projects and other unpublished manifests have none; that is not an error.
#[must_use]
pub fn resolve_package_name(document: &ProjectDocument) -> PackageName {
    document.property(PACKAGE_ID).map_or(PackageName::Absent, PackageName::Present)
}

/// Sets `Version` in the first property group, overwriting any previous value.
///
/// Manifests without a property group are left alone.
pub fn stamp_version(document: &mut ProjectDocument, version: &str) {
    document.set_property(VERSION, version);
}
