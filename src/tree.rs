//! The result tree.
//!
//! Nodes live in an arena owned by [`Tree`] and refer to each other by
//! [`NodeId`]. A group lists its children in report order; every node keeps a
//! non-owning link to the group it was declared in, which is what recounting
//! walks up to reach the root.

use std::{ops::Deref, time::Duration};

use log::trace;

use crate::{
    error::ErrorRecord,
    outcome::{Counts, Status},
    value::Value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct Group {
    name: String,
    children: Vec<NodeId>,
    counts: Counts,
}

#[derive(Debug, Clone)]
pub struct Test {
    description: Option<String>,
    arguments: Vec<Value>,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Group(Group),
    Test(Test),
}

#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    status: Option<Status>,
    comment: Option<String>,
    error: Option<ErrorRecord>,
    elapsed: Duration,
    trace: Option<String>,
    parent: Option<NodeId>,
}

impl Node {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            status: None,
            comment: None,
            error: None,
            elapsed: Duration::ZERO,
            trace: None,
            parent,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group(_))
    }

    pub fn status(&self) -> Option<Status> {
        self.status
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn error(&self) -> Option<&ErrorRecord> {
        self.error.as_ref()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// A tree holding only its root group.
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = Node::new(
            NodeKind::Group(Group {
                name: root_name.into(),
                children: Vec::new(),
                counts: Counts::default(),
            }),
            None,
        );
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> NodeRef<'_> {
        let node = self.node(id);
        match &node.kind {
            NodeKind::Group(group) => NodeRef::Group(GroupRef {
                tree: self,
                id,
                node,
                group,
            }),
            NodeKind::Test(test) => NodeRef::Test(TestRef { id, node, test }),
        }
    }

    pub fn group(&self, id: NodeId) -> Option<GroupRef<'_>> {
        match self.get(id) {
            NodeRef::Group(group) => Some(group),
            NodeRef::Test(_) => None,
        }
    }

    pub fn test(&self, id: NodeId) -> Option<TestRef<'_>> {
        match self.get(id) {
            NodeRef::Test(test) => Some(test),
            NodeRef::Group(_) => None,
        }
    }

    /// A direct child group of `parent` with the given name.
    pub fn find_group(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        let NodeKind::Group(group) = &self.node(parent).kind else {
            return None;
        };
        group.children.iter().copied().find(|&child| {
            matches!(&self.node(child).kind, NodeKind::Group(g) if g.name == name)
        })
    }

    /// Create a group linked to `parent` without listing it among its children.
    pub(crate) fn add_group(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(
            NodeKind::Group(Group {
                name: name.to_string(),
                children: Vec::new(),
                counts: Counts::default(),
            }),
            Some(parent),
        ));
        id
    }

    /// Create a determined test linked to `parent` without listing it among its children.
    pub(crate) fn add_test(
        &mut self,
        parent: NodeId,
        description: Option<String>,
        arguments: Vec<Value>,
        status: Status,
        error: Option<ErrorRecord>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = Node::new(
            NodeKind::Test(Test {
                description,
                arguments,
            }),
            Some(parent),
        );
        node.status = Some(status);
        node.error = error;
        self.nodes.push(node);
        id
    }

    /// List `child` as the last child of `parent`.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let NodeKind::Group(group) = &mut self.node_mut(parent).kind {
            group.children.push(child);
        }
    }

    /// Prepare a group for (re-)execution of its body: relink it and mark it
    /// provisionally passing.
    pub(crate) fn reopen(&mut self, id: NodeId, parent: NodeId) {
        let node = self.node_mut(id);
        node.parent = Some(parent);
        node.status = Some(Status::Pass);
    }

    pub(crate) fn set_error(&mut self, id: NodeId, error: ErrorRecord) {
        let node = self.node_mut(id);
        node.status = Some(Status::Error);
        node.error = Some(error);
    }

    pub(crate) fn set_comment(&mut self, id: NodeId, comment: String) {
        self.node_mut(id).comment = Some(comment);
    }

    pub(crate) fn set_trace(&mut self, id: NodeId, trace: String) {
        self.node_mut(id).trace = Some(trace);
    }

    pub(crate) fn set_elapsed(&mut self, id: NodeId, elapsed: Duration) {
        self.node_mut(id).elapsed = elapsed;
    }

    pub(crate) fn add_elapsed(&mut self, id: NodeId, elapsed: Duration) {
        self.node_mut(id).elapsed += elapsed;
    }

    /// Recompute the counts and status of `id`, then of every ancestor up to the root.
    pub(crate) fn recount(&mut self, id: NodeId) {
        let mut next = Some(id);
        while let Some(id) = next {
            let counts = match &self.node(id).kind {
                NodeKind::Group(group) => {
                    Counts::tally(group.children.iter().map(|&child| self.node(child).status))
                }
                NodeKind::Test(_) => return,
            };
            let node = self.node_mut(id);
            let status = counts.status(node.error.is_some());
            node.status = Some(status);
            if let NodeKind::Group(group) = &mut node.kind {
                trace!("recounted {:?} ({id:?}): {counts:?} -> {status}", group.name);
                group.counts = counts;
            }
            next = node.parent;
        }
    }
}

/// A borrowed group together with the tree it lives in.
#[derive(Debug, Clone, Copy)]
pub struct GroupRef<'t> {
    tree: &'t Tree,
    id: NodeId,
    node: &'t Node,
    group: &'t Group,
}

impl<'t> GroupRef<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &'t str {
        &self.group.name
    }

    pub fn counts(&self) -> Counts {
        self.group.counts
    }

    pub fn child_ids(&self) -> &'t [NodeId] {
        &self.group.children
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'t>> + use<'t> {
        let (tree, group) = (self.tree, self.group);
        group.children.iter().map(move |&child| tree.get(child))
    }
}

impl Deref for GroupRef<'_> {
    type Target = Node;

    fn deref(&self) -> &Self::Target {
        self.node
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TestRef<'t> {
    id: NodeId,
    node: &'t Node,
    test: &'t Test,
}

impl<'t> TestRef<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn description(&self) -> Option<&'t str> {
        self.test.description.as_deref()
    }

    pub fn arguments(&self) -> &'t [Value] {
        &self.test.arguments
    }
}

impl Deref for TestRef<'_> {
    type Target = Node;

    fn deref(&self) -> &Self::Target {
        self.node
    }
}

#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'t> {
    Group(GroupRef<'t>),
    Test(TestRef<'t>),
}

impl NodeRef<'_> {
    pub fn id(&self) -> NodeId {
        match self {
            NodeRef::Group(group) => group.id(),
            NodeRef::Test(test) => test.id(),
        }
    }
}

impl Deref for NodeRef<'_> {
    type Target = Node;

    fn deref(&self) -> &Self::Target {
        match self {
            NodeRef::Group(group) => group.node,
            NodeRef::Test(test) => test.node,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::TraceFilter;

    fn test_node(tree: &mut Tree, parent: NodeId, status: Status) -> NodeId {
        let id = tree.add_test(parent, None, vec![], status, None);
        tree.attach(parent, id);
        tree.recount(parent);
        id
    }

    #[test]
    fn counts_bubble_up_to_the_root() {
        let mut tree = Tree::new("root");
        let root = tree.root();
        let outer = tree.add_group(root, "outer");
        tree.attach(root, outer);
        let inner = tree.add_group(outer, "inner");
        tree.attach(outer, inner);

        test_node(&mut tree, inner, Status::Pass);
        assert_eq!(tree.node(root).status(), Some(Status::Pass));

        test_node(&mut tree, inner, Status::Fail);
        assert_eq!(tree.node(inner).status(), Some(Status::Fail));
        assert_eq!(tree.node(outer).status(), Some(Status::Fail));
        assert_eq!(tree.node(root).status(), Some(Status::Fail));
        assert_eq!(
            tree.group(inner).unwrap().counts(),
            Counts {
                pass: 1,
                fail: 1,
                error: 0,
                total: 2
            }
        );
        assert_eq!(tree.group(root).unwrap().counts().total, 1);
    }

    #[test]
    fn recount_is_idempotent() {
        let mut tree = Tree::new("root");
        let root = tree.root();
        test_node(&mut tree, root, Status::Pass);
        test_node(&mut tree, root, Status::Error);
        let before = (tree.group(root).unwrap().counts(), tree.node(root).status());
        tree.recount(root);
        tree.recount(root);
        let after = (tree.group(root).unwrap().counts(), tree.node(root).status());
        assert_eq!(before, after);
    }

    #[test]
    fn own_error_record_outranks_passing_children() {
        let mut tree = Tree::new("root");
        let root = tree.root();
        let group = tree.add_group(root, "broken");
        tree.attach(root, group);
        test_node(&mut tree, group, Status::Pass);

        let record = ErrorRecord::from_value(Value::from("oops"), &TraceFilter::empty());
        tree.set_error(group, record);
        tree.recount(group);
        assert_eq!(tree.node(group).status(), Some(Status::Error));
        assert_eq!(tree.group(root).unwrap().counts().error, 1);
    }

    #[test]
    fn undetermined_children_only_count_towards_total() {
        let mut tree = Tree::new("root");
        let root = tree.root();
        let group = tree.add_group(root, "pending");
        tree.attach(root, group);
        tree.recount(root);
        let counts = tree.group(root).unwrap().counts();
        assert_eq!(counts.total, 1);
        assert_eq!(counts.pass + counts.fail + counts.error, 0);
    }

    #[test]
    fn groups_are_found_by_name_among_direct_children_only() {
        let mut tree = Tree::new("root");
        let root = tree.root();
        let outer = tree.add_group(root, "outer");
        tree.attach(root, outer);
        let inner = tree.add_group(outer, "inner");
        tree.attach(outer, inner);

        assert_eq!(tree.find_group(root, "outer"), Some(outer));
        assert_eq!(tree.find_group(root, "inner"), None);
        assert_eq!(tree.find_group(outer, "inner"), Some(inner));

        let names: Vec<_> = tree
            .group(root)
            .unwrap()
            .children()
            .filter_map(|child| match child {
                NodeRef::Group(group) => Some(group.name()),
                NodeRef::Test(_) => None,
            })
            .collect();
        assert_eq!(names, ["outer"]);
    }
}
