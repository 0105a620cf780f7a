//! Project files under transformation.
//!
//! A [`ProjectFile`] pairs a parsed manifest with the identity it publishes
//! under and the project references it still has to have rewritten.

pub mod extract;
pub mod identity;

use std::path::{Path, PathBuf};

use crate::document::{GroupId, ProjectDocument, ReferenceEdit};
use crate::error::Result;

pub use extract::extract_references;
pub use identity::{resolve_package_name, stamp_version};

/// Package identity of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageName {
    /// The project publishes under this name.
    Present(String),
    /// The project is not published (test projects and the like).
    Absent,
}

impl PackageName {
    /// Returns the name if present.
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Self::Present(name) => Some(name),
            Self::Absent => None,
        }
    }
}

/// One unresolved project reference inside a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    /// Normalized absolute path of the referenced manifest.
    pub target: PathBuf,
    /// Item group holding the reference.
    pub group: GroupId,
    /// `Include` value as written, used to find the entry again.
    pub include: String,
}

impl DependencyEdge {
    /// Edits that swap this reference for a package reference.
    #[must_use]
    pub fn edits(&self, package: &str, version: &str) -> [ReferenceEdit; 2] {
        [
            ReferenceEdit::RemoveProjectReference {
                group: self.group,
                include: self.include.clone(),
            },
            ReferenceEdit::InsertPackageReference {
                package: package.to_string(),
                version: version.to_string(),
            },
        ]
    }
}

/// A manifest loaded for one run.
#[derive(Debug, Clone)]
pub struct ProjectFile {
    /// Normalized absolute path; also the key other files reference it by.
    pub path: PathBuf,
    /// Text as read from disk.
    pub source: String,
    /// Parsed, mutable tree.
    pub document: ProjectDocument,
    /// Identity the project publishes under.
    pub package_name: PackageName,
    /// References not yet rewritten.
    pub edges: Vec<DependencyEdge>,
}

impl ProjectFile {
    /// Parses `source`, resolves the package name, stamps `version` and
    /// extracts project references.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be parsed or holds a project
    /// reference without an `Include` attribute.
    pub fn load(path: &Path, source: String, version: &str) -> Result<Self> {
        let mut document = ProjectDocument::parse(path, &source)?;
        let package_name = resolve_package_name(&document);
        stamp_version(&mut document, version);
        let edges = extract_references(&document, path)?;
        Ok(Self { path: path.to_path_buf(), source, document, package_name, edges })
    }

    /// Swaps the reference behind `edge` for a package reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is no longer in the document.
    pub fn replace_reference(
        &mut self,
        edge: &DependencyEdge,
        package: &str,
        version: &str,
    ) -> Result<()> {
        for edit in edge.edits(package, version) {
            self.document.apply(&edit)?;
        }
        Ok(())
    }

    /// Serialized document.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be serialized.
    pub fn render(&self) -> Result<String> {
        self.document.to_xml_string(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn load_resolves_identity_version_and_edges() {
        let source = r#"<Project>
  <PropertyGroup><PackageId>Pkg.A</PackageId></PropertyGroup>
  <ItemGroup><ProjectReference Include="../B/B.csproj" /></ItemGroup>
</Project>"#;
        let file = ProjectFile::load(Path::new("/w/A/A.csproj"), source.to_string(), "3.1.0")
            .unwrap();

        assert_eq!(file.package_name, PackageName::Present("Pkg.A".to_string()));
        assert_eq!(file.document.property("Version").as_deref(), Some("3.1.0"));
        assert_eq!(file.edges.len(), 1);
        assert_eq!(file.edges[0].target, PathBuf::from("/w/B/B.csproj"));
        assert_eq!(file.source, source);
    }

    #[test]
    fn replace_reference_moves_entry_into_marker_group() {
        let source = r#"<Project>
  <ItemGroup><ProjectReference Include="../B/B.csproj" /></ItemGroup>
</Project>"#;
        let mut file =
            ProjectFile::load(Path::new("/w/A/A.csproj"), source.to_string(), "1.0.0").unwrap();
        let edge = file.edges[0].clone();
        file.replace_reference(&edge, "Pkg.B", "1.0.0").unwrap();

        let text = file.render().unwrap();
        assert!(!text.contains("ProjectReference"));
        assert!(text.contains(r#"Label="DependencyReplace""#));
        assert!(text.contains(r#"Include="Pkg.B""#));
        assert_eq!(file.document.item_groups().count(), 1);
    }

    #[test]
    fn package_name_as_deref() {
        assert_eq!(PackageName::Present("Pkg".to_string()).as_deref(), Some("Pkg"));
        assert_eq!(PackageName::Absent.as_deref(), None);
    }
}
