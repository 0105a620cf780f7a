//! Dependency-ordered reference rewriting.
//!
//! Files are resolved one at a time. Each step picks the first unresolved file
//! (in input order) with no outstanding references, then rewrites every
//! reference to it in the remaining files into a package reference. The step
//! order is fixed by the input order, so identical input gives identical output.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{PublishError, Result};
use crate::project::{PackageName, ProjectFile};

/// What a rewrite pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    /// Files in the order they were resolved.
    pub order: Vec<PathBuf>,
    /// Number of project references replaced by package references.
    pub replaced: usize,
    /// Resolved files without a package name; references to them were left alone.
    pub skipped: Vec<PathBuf>,
}

/// Rewrites project references between `files` into package references pinned
/// to `version`.
///
/// # Errors
///
/// Returns [`PublishError::UnresolvableGraph`] when no remaining file is free of
/// outstanding references (a cycle, or a reference to a file outside the
/// set), and propagates document edit failures.
pub fn rewrite(files: &mut [ProjectFile], version: &str) -> Result<RewriteSummary> {
    let mut summary = RewriteSummary::default();
    let mut queue: Vec<usize> = (0..files.len()).collect();

    while !queue.is_empty() {
        let Some(slot) = queue.iter().position(|&index| files[index].edges.is_empty()) else {
            return Err(PublishError::UnresolvableGraph {
                remaining: queue.iter().map(|&index| files[index].path.clone()).collect(),
            });
        };
        let head = queue.remove(slot);
        let head_path = files[head].path.clone();
        summary.order.push(head_path.clone());

        let package = match &files[head].package_name {
            PackageName::Present(name) => Some(name.clone()),
            PackageName::Absent => {
                warn!("Skipping project {} with no package name", head_path.display());
                summary.skipped.push(head_path.clone());
                None
            }
        };

        for &index in &queue {
            summary.replaced +=
                resolve_dependant(&mut files[index], &head_path, package.as_deref(), version)?;
        }
    }

    Ok(summary)
}

/// Retires every edge of `dependant` pointing at `head_path`, rewriting the
/// reference when the head has a package name. Returns how many references
/// were rewritten.
fn resolve_dependant(
    dependant: &mut ProjectFile,
    head_path: &Path,
    package: Option<&str>,
    version: &str,
) -> Result<usize> {
    let mut replaced = 0;
    for i in (0..dependant.edges.len()).rev() {
        if dependant.edges[i].target.as_path() != head_path {
            continue;
        }
        let edge = dependant.edges.remove(i);
        if let Some(package) = package {
            info!(
                "Replacing project ref {} to package ref {package} for project {}",
                edge.include,
                dependant.path.display()
            );
            dependant.replace_reference(&edge, package, version)?;
            replaced += 1;
        }
    }
    Ok(replaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(path: &str, package: Option<&str>, references: &[&str]) -> ProjectFile {
        let package = package
            .map(|p| format!("<PropertyGroup><PackageId>{p}</PackageId></PropertyGroup>"))
            .unwrap_or_default();
        let references: String = references
            .iter()
            .map(|r| format!(r#"<ProjectReference Include="{r}" />"#))
            .collect();
        let items = if references.is_empty() {
            String::new()
        } else {
            format!("<ItemGroup>{references}</ItemGroup>")
        };
        let source = format!("<Project>{package}{items}</Project>");
        ProjectFile::load(Path::new(path), source, "2.0.0").unwrap()
    }

    fn rendered(file: &ProjectFile) -> String {
        file.render().unwrap()
    }

    #[test]
    fn empty_set_is_a_noop() {
        let mut files: Vec<ProjectFile> = Vec::new();
        let summary = rewrite(&mut files, "1.0.0").unwrap();
        assert_eq!(summary, RewriteSummary::default());
    }

    #[test]
    fn dependency_is_replaced_by_package_reference() {
        let mut files = [
            project("/w/A/A.csproj", Some("Pkg.A"), &["../B/B.csproj"]),
            project("/w/B/B.csproj", Some("Pkg.B"), &[]),
        ];
        let summary = rewrite(&mut files, "2.0.0").unwrap();

        assert_eq!(summary.replaced, 1);
        assert_eq!(
            summary.order,
            vec![PathBuf::from("/w/B/B.csproj"), PathBuf::from("/w/A/A.csproj")]
        );
        let a = rendered(&files[0]);
        assert!(!a.contains("ProjectReference"));
        assert!(a.contains(r#"Include="Pkg.B""#));
        assert!(a.contains(r#"Version="2.0.0""#));
        assert!(files.iter().all(|f| f.edges.is_empty()));
    }

    #[test]
    fn chain_resolves_leaf_first() {
        let mut files = [
            project(
                "/w/App/App.csproj",
                Some("Pkg.App"),
                &["../Data/Data.csproj", "../Core/Core.csproj"],
            ),
            project("/w/Data/Data.csproj", Some("Pkg.Data"), &["../Core/Core.csproj"]),
            project("/w/Core/Core.csproj", Some("Pkg.Core"), &[]),
        ];
        let summary = rewrite(&mut files, "2.0.0").unwrap();

        assert_eq!(summary.replaced, 3);
        assert_eq!(summary.order[0], PathBuf::from("/w/Core/Core.csproj"));
        assert_eq!(summary.order[1], PathBuf::from("/w/Data/Data.csproj"));
        let app = rendered(&files[0]);
        assert!(app.contains(r#"Include="Pkg.Core""#));
        assert!(app.contains(r#"Include="Pkg.Data""#));
        assert_eq!(app.matches("DependencyReplace").count(), 1);
    }

    #[test]
    fn ties_resolve_in_input_order() {
        let mut files = [
            project("/w/X/X.csproj", Some("Pkg.X"), &[]),
            project("/w/Y/Y.csproj", Some("Pkg.Y"), &[]),
        ];
        let summary = rewrite(&mut files, "2.0.0").unwrap();
        assert_eq!(
            summary.order,
            vec![PathBuf::from("/w/X/X.csproj"), PathBuf::from("/w/Y/Y.csproj")]
        );
    }

    #[test]
    fn nameless_head_keeps_incoming_references() {
        let mut files = [
            project("/w/Tests/Tests.csproj", None, &["../Lib/Lib.csproj"]),
            project("/w/Lib/Lib.csproj", Some("Pkg.Lib"), &["../Gen/Gen.csproj"]),
            project("/w/Gen/Gen.csproj", None, &[]),
        ];
        let summary = rewrite(&mut files, "2.0.0").unwrap();

        assert_eq!(
            summary.skipped,
            vec![PathBuf::from("/w/Gen/Gen.csproj"), PathBuf::from("/w/Tests/Tests.csproj")]
        );
        assert_eq!(summary.replaced, 1);
        let lib = rendered(&files[1]);
        assert!(lib.contains(r#"<ProjectReference Include="../Gen/Gen.csproj""#));
        assert!(!lib.contains("DependencyReplace"));
        let tests = rendered(&files[0]);
        assert!(tests.contains(r#"Include="Pkg.Lib""#));
    }

    #[test]
    fn cycle_is_unresolvable() {
        let mut files = [
            project("/w/A/A.csproj", Some("Pkg.A"), &["../B/B.csproj"]),
            project("/w/B/B.csproj", Some("Pkg.B"), &["../A/A.csproj"]),
        ];
        let err = rewrite(&mut files, "2.0.0").unwrap_err();
        assert!(matches!(
            err,
            PublishError::UnresolvableGraph { ref remaining } if remaining.len() == 2
        ));
    }

    #[test]
    fn dangling_reference_is_unresolvable() {
        let mut files = [
            project("/w/A/A.csproj", Some("Pkg.A"), &["../Missing/Missing.csproj"]),
            project("/w/B/B.csproj", Some("Pkg.B"), &[]),
        ];
        let err = rewrite(&mut files, "2.0.0").unwrap_err();
        assert!(matches!(
            err,
            PublishError::UnresolvableGraph { ref remaining }
                if *remaining == vec![PathBuf::from("/w/A/A.csproj")]
        ));
    }

    #[test]
    fn duplicate_references_are_all_replaced() {
        let mut files = [
            project("/w/A/A.csproj", Some("Pkg.A"), &["../B/B.csproj", "../B/./B.csproj"]),
            project("/w/B/B.csproj", Some("Pkg.B"), &[]),
        ];
        let summary = rewrite(&mut files, "2.0.0").unwrap();
        assert_eq!(summary.replaced, 2);
        assert_eq!(rendered(&files[0]).matches(r#"Include="Pkg.B""#).count(), 2);
    }
}
