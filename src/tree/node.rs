//! Tree node model.

use crate::opc::{ElementRef, PartId};

/// What a node stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The opened document as a whole.
    Container,
    /// A part reached through the relationship `relationship_id`.
    Part {
        relationship_id: String,
        part: PartId,
    },
    /// An element inside a part's markup.
    Element(ElementRef),
}

/// A node of the document tree.
///
/// Built once when a document is opened and never modified afterwards.
/// Children keep the order in which the package lists relationships and
/// the markup lists elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    header: String,
    kind: NodeKind,
    children: Vec<Node>,
}

impl Node {
    pub(crate) fn new(header: String, kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            header,
            kind,
            children,
        }
    }

    /// Display label of this node.
    #[inline]
    pub fn header(&self) -> &str {
        &self.header
    }

    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[inline]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Container)
    }

    pub fn is_part(&self) -> bool {
        matches!(self.kind, NodeKind::Part { .. })
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    /// Node reached by following child indices from this node.
    pub fn descendant(&self, path: &[usize]) -> Option<&Node> {
        path.iter()
            .try_fold(self, |node, &i| node.children.get(i))
    }

    /// First node in depth-first order whose header equals `header`.
    pub fn find(&self, header: &str) -> Option<&Node> {
        self.walk()
            .map(|(_, node)| node)
            .find(|node| node.header == header)
    }

    /// Depth-first, pre-order traversal yielding `(depth, node)`, starting
    /// with this node at depth 0.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }

    /// Number of nodes in this subtree, this node included.
    pub fn len(&self) -> usize {
        self.walk().count()
    }
}

/// Iterator returned by [`Node::walk`].
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    stack: Vec<(usize, &'a Node)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}
