//! Mutable manifest tree.
//!
//! Wraps an `xmltree` element rooted at `<Project>`. Item groups get stable
//! [`GroupId`]s when the document is parsed so that reference edits keep
//! pointing at the right group after other groups have been removed.

use std::path::Path;

use xmltree::{Element, EmitterConfig, XMLNode};

use crate::error::{PublishError, Result};

/// Label carried by the item group that receives rewritten references.
pub const MARKER_LABEL: &str = "DependencyReplace";

const PROJECT: &str = "Project";
const ITEM_GROUP: &str = "ItemGroup";
const PROPERTY_GROUP: &str = "PropertyGroup";
const PROJECT_REFERENCE: &str = "ProjectReference";
const PACKAGE_REFERENCE: &str = "PackageReference";
const INCLUDE: &str = "Include";
const VERSION: &str = "Version";
const LABEL: &str = "Label";

/// Stable identity of an `<ItemGroup>` within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(usize);

/// A single change to a document's references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceEdit {
    /// Drop the first project reference in `group` whose `Include` is `include`.
    RemoveProjectReference {
        /// Group the reference was found in.
        group: GroupId,
        /// `Include` value exactly as written in the manifest.
        include: String,
    },
    /// Append a package reference to the marker group, creating it if needed.
    InsertPackageReference {
        /// Package identity of the referenced project.
        package: String,
        /// Version to pin.
        version: String,
    },
}

/// A parsed project manifest.
#[derive(Debug, Clone)]
pub struct ProjectDocument {
    root: Element,
    groups: Vec<GroupId>,
    next_group: usize,
}

impl ProjectDocument {
    /// Parses manifest text read from `path`. Comments are discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not well-formed or the root element is
    /// not `<Project>`.
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut root = Element::parse(text.as_bytes())
            .map_err(|source| PublishError::Parse { path: path.to_path_buf(), source })?;
        if root.name != PROJECT {
            return Err(PublishError::UnexpectedRoot {
                path: path.to_path_buf(),
                root: root.name.clone(),
            });
        }

        strip_comments(&mut root);
        let count = root.children.iter().filter(|node| is_named(node, ITEM_GROUP)).count();
        Ok(Self { root, groups: (0..count).map(GroupId).collect(), next_group: count })
    }

    /// Serializes the tree as indented markup without an XML declaration.
    ///
    /// # Errors
    ///
    /// Returns an error if the emitter rejects the tree.
    pub fn to_xml_string(&self, path: &Path) -> Result<String> {
        let config = EmitterConfig::new().perform_indent(true).write_document_declaration(false);
        let mut buffer = Vec::new();
        self.root.write_with_config(&mut buffer, config).map_err(|e| PublishError::Serialize {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        String::from_utf8(buffer).map_err(|e| PublishError::Serialize {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Item groups in document order, paired with their ids.
    pub fn item_groups(&self) -> impl Iterator<Item = (GroupId, &Element)> {
        self.groups.iter().copied().zip(
            self.root
                .children
                .iter()
                .filter_map(XMLNode::as_element)
                .filter(|element| element.name == ITEM_GROUP),
        )
    }

    /// First `<PropertyGroup>`, if the manifest has one.
    #[must_use]
    pub fn first_property_group(&self) -> Option<&Element> {
        self.root.get_child(PROPERTY_GROUP)
    }

    /// Trimmed text of `name` inside the first property group; empty text counts as absent.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<String> {
        let text = self.first_property_group()?.get_child(name)?.get_text()?;
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// Sets `name` in the first property group, replacing any previous value.
    ///
    /// Returns `false` without touching the tree when there is no property group.
    pub fn set_property(&mut self, name: &str, value: &str) -> bool {
        let mut field = self.new_element(name);
        let Some(group) = self.root.get_mut_child(PROPERTY_GROUP) else {
            return false;
        };
        if let Some(existing) = group.get_mut_child(name) {
            existing.children = vec![XMLNode::Text(value.to_string())];
        } else {
            field.children.push(XMLNode::Text(value.to_string()));
            group.children.push(XMLNode::Element(field));
        }
        true
    }

    /// Applies one reference edit.
    ///
    /// # Errors
    ///
    /// Returns an error if a removal targets a group or reference that is no
    /// longer present.
    pub fn apply(&mut self, edit: &ReferenceEdit) -> Result<()> {
        match edit {
            ReferenceEdit::RemoveProjectReference { group, include } => {
                self.remove_project_reference(*group, include)
            }
            ReferenceEdit::InsertPackageReference { package, version } => {
                self.insert_package_reference(package, version);
                Ok(())
            }
        }
    }

    fn remove_project_reference(&mut self, group: GroupId, include: &str) -> Result<()> {
        let slot = self
            .groups
            .iter()
            .position(|id| *id == group)
            .ok_or_else(|| PublishError::MissingGroup(group.0, include.to_string()))?;
        let index = self
            .item_group_index(slot)
            .ok_or_else(|| PublishError::MissingGroup(group.0, include.to_string()))?;
        let element = self.root.children[index]
            .as_mut_element()
            .ok_or_else(|| PublishError::MissingGroup(group.0, include.to_string()))?;

        let position = element
            .children
            .iter()
            .position(|node| {
                node.as_element().is_some_and(|e| {
                    e.name == PROJECT_REFERENCE
                        && e.attributes.get(INCLUDE).map(String::as_str) == Some(include)
                })
            })
            .ok_or_else(|| PublishError::MissingReference(include.to_string()))?;
        element.children.remove(position);

        let emptied = element.attributes.is_empty()
            && !element.children.iter().any(|node| node.as_element().is_some());
        if emptied {
            self.root.children.remove(index);
            self.groups.remove(slot);
        }
        Ok(())
    }

    fn insert_package_reference(&mut self, package: &str, version: &str) {
        let mut reference = self.new_element(PACKAGE_REFERENCE);
        reference.attributes.insert(INCLUDE.to_string(), package.to_string());
        reference.attributes.insert(VERSION.to_string(), version.to_string());

        let index = if let Some(index) = self.root.children.iter().position(is_marker_group) {
            index
        } else {
            let mut marker = self.new_element(ITEM_GROUP);
            marker.attributes.insert(LABEL.to_string(), MARKER_LABEL.to_string());
            self.root.children.push(XMLNode::Element(marker));
            self.groups.push(GroupId(self.next_group));
            self.next_group += 1;
            self.root.children.len() - 1
        };

        if let Some(marker) = self.root.children[index].as_mut_element() {
            marker.children.push(XMLNode::Element(reference));
        }
    }

    /// Index into the root's children of the `slot`-th item group.
    fn item_group_index(&self, slot: usize) -> Option<usize> {
        self.root
            .children
            .iter()
            .enumerate()
            .filter(|(_, node)| is_named(node, ITEM_GROUP))
            .nth(slot)
            .map(|(index, _)| index)
    }

    /// New element in the root's namespace.
    fn new_element(&self, name: &str) -> Element {
        let mut element = Element::new(name);
        element.namespace.clone_from(&self.root.namespace);
        element.prefix.clone_from(&self.root.prefix);
        element
    }
}

fn strip_comments(element: &mut Element) {
    element.children.retain(|node| !matches!(node, XMLNode::Comment(_)));
    for child in element.children.iter_mut().filter_map(XMLNode::as_mut_element) {
        strip_comments(child);
    }
}

fn is_named(node: &XMLNode, name: &str) -> bool {
    node.as_element().is_some_and(|element| element.name == name)
}

fn is_marker_group(node: &XMLNode) -> bool {
    node.as_element().is_some_and(|element| {
        element.name == ITEM_GROUP
            && element.attributes.get(LABEL).map(String::as_str) == Some(MARKER_LABEL)
    })
}
