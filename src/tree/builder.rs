//! Builds the node tree for an opened package.
//!
//! The walk is the same at every level: enumerate children in package or
//! markup order, number them from 0, format the header, and finish each
//! child's subtree before moving to the next sibling.

use crate::markup::{NamespaceScope, XmlElement, kind_name};
use crate::opc::{ElementRef, OpcPackage, PartId, Relationship};
use crate::tree::annotation::AnnotationPolicy;
use crate::tree::header::{element_header, part_header};
use crate::tree::node::{Node, NodeKind};
use tracing::{debug, trace};

/// Tree builder over one package and one annotation policy.
pub struct TreeBuilder<'a> {
    package: &'a OpcPackage,
    policy: &'a AnnotationPolicy,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(package: &'a OpcPackage, policy: &'a AnnotationPolicy) -> Self {
        Self { package, policy }
    }

    /// Build the whole tree under a container node labelled `header`.
    pub fn build(&self, header: impl Into<String>) -> Node {
        let mut ancestors = Vec::new();
        let children = self.part_children(None, &mut ancestors);
        let root = Node::new(header.into(), NodeKind::Container, children);
        debug!(nodes = root.len(), "built document tree");
        root
    }

    /// Part nodes for the internal relationships of `source`.
    fn part_children(&self, source: Option<PartId>, ancestors: &mut Vec<PartId>) -> Vec<Node> {
        self.package
            .related_parts(source)
            .into_iter()
            .filter_map(|(rel, id)| self.part_node(rel, id, ancestors))
            .collect()
    }

    fn part_node(&self, rel: &Relationship, id: PartId, ancestors: &mut Vec<PartId>) -> Option<Node> {
        let part = self.package.part(id)?;
        let header = part_header(rel.r_id(), part.partname().as_str(), part.type_name());
        let kind = NodeKind::Part {
            relationship_id: rel.r_id().to_string(),
            part: id,
        };

        // A part already on the path is shown once more, without children
        if ancestors.contains(&id) {
            trace!(part = %part.partname(), "relationship cycle");
            return Some(Node::new(header, kind, Vec::new()));
        }

        trace!(part = %part.partname(), r_id = rel.r_id(), "part node");
        ancestors.push(id);
        let mut children = self.part_children(Some(id), ancestors);
        ancestors.pop();

        if let Some(root) = part.root() {
            let mut scope = NamespaceScope::new();
            let mark = scope.enter(root);
            children.extend(self.element_children(root, &ElementRef::root(id), &mut scope));
            scope.leave(mark);
        }

        Some(Node::new(header, kind, children))
    }

    /// Element nodes for the child elements of `parent`, whose own
    /// declarations are already in `scope`.
    fn element_children(
        &self,
        parent: &XmlElement,
        parent_ref: &ElementRef,
        scope: &mut NamespaceScope,
    ) -> Vec<Node> {
        parent
            .element_children()
            .enumerate()
            .map(|(index, (pos, element))| {
                self.element_node(index, element, parent_ref.child(pos), scope)
            })
            .collect()
    }

    fn element_node(
        &self,
        index: usize,
        element: &XmlElement,
        element_ref: ElementRef,
        scope: &mut NamespaceScope,
    ) -> Node {
        let mark = scope.enter(element);
        let kind = kind_name(element.local_name(), scope.namespace_of(element));
        let annotation = self.policy.annotate(&kind, element);
        let header = element_header(index, element.local_name(), &kind, annotation.as_ref());

        let children = self.element_children(element, &element_ref, scope);
        scope.leave(mark);

        Node::new(header, NodeKind::Element(element_ref), children)
    }
}
