//! Project reference extraction.

use std::path::Path;

use xmltree::XMLNode;

use crate::document::ProjectDocument;
use crate::error::{PublishError, Result};
use crate::paths;
use crate::project::DependencyEdge;

/// Collects every `<ProjectReference>` in every item group of `document`.
///
/// Targets are resolved against the directory of `path`. Extraction only
/// reads the document; rewriting happens later through
/// [`DependencyEdge::edits`].
///
/// # Errors
///
/// Returns [`PublishError::MalformedReference`] if a reference has no
/// `Include` attribute.
pub fn extract_references(document: &ProjectDocument, path: &Path) -> Result<Vec<DependencyEdge>> {
    let mut edges = Vec::new();
    for (group, element) in document.item_groups() {
        let references = element
            .children
            .iter()
            .filter_map(XMLNode::as_element)
            .filter(|child| child.name == "ProjectReference");
        for reference in references {
            let include = reference
                .attributes
                .get("Include")
                .ok_or_else(|| PublishError::MalformedReference { path: path.to_path_buf() })?;
            edges.push(DependencyEdge {
                target: paths::resolve_include(path, include),
                group,
                include: include.clone(),
            });
        }
    }
    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Result<Vec<DependencyEdge>> {
        let path = Path::new("/w/App/App.csproj");
        let document = ProjectDocument::parse(path, text).unwrap();
        extract_references(&document, path)
    }

    #[test]
    fn no_item_groups_yields_no_edges() {
        assert!(extract("<Project><PropertyGroup /></Project>").unwrap().is_empty());
    }

    #[test]
    fn single_and_multiple_references_are_collected_in_order() {
        let edges = extract(
            r#"<Project>
  <ItemGroup><ProjectReference Include="..\Core\Core.csproj" /></ItemGroup>
  <ItemGroup>
    <PackageReference Include="Serilog" Version="3.0.0" />
    <ProjectReference Include="..\Data\Data.csproj" />
    <ProjectReference Include="..\Web\Web.csproj" />
  </ItemGroup>
</Project>"#,
        )
        .unwrap();

        let includes: Vec<&str> = edges.iter().map(|e| e.include.as_str()).collect();
        assert_eq!(
            includes,
            vec![r"..\Core\Core.csproj", r"..\Data\Data.csproj", r"..\Web\Web.csproj"]
        );
        assert_ne!(edges[0].group, edges[1].group);
        assert_eq!(edges[1].group, edges[2].group);
    }

    #[cfg(unix)]
    #[test]
    fn targets_resolve_against_manifest_directory() {
        let edges = extract(
            r#"<Project><ItemGroup>
  <ProjectReference Include="..\Core\Core.csproj" />
</ItemGroup></Project>"#,
        )
        .unwrap();
        assert_eq!(edges[0].target, std::path::PathBuf::from("/w/Core/Core.csproj"));
    }

    #[test]
    fn reference_without_include_is_rejected() {
        let err =
            extract(r#"<Project><ItemGroup><ProjectReference Name="x" /></ItemGroup></Project>"#)
                .unwrap_err();
        assert!(matches!(err, PublishError::MalformedReference { .. }));
        assert!(err.to_string().contains("/w/App/App.csproj"));
    }
}
