use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use resources::ResourceLoader;

use crate::errata::Errata;
use crate::error::SuiteError;
use crate::suite::Suite;
use crate::test::{Test, TestState};

pub type Attributes = BTreeMap<String, String>;

pub const TEST: &str = "TEST";
pub const TESTCASES: &str = "TESTCASES";
pub const TESTSUITE: &str = "TESTSUITE";

pub(crate) fn is_suite_name(name: &str) -> bool {
    name == TESTSUITE || name == TESTCASES
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

pub(crate) enum NodeKind {
    Element,
    Suite,
    Test(Box<TestState>),
}

pub(crate) struct Node {
    pub(crate) name: String,
    pub(crate) attributes: Attributes,
    pub(crate) document_base: String,
    pub(crate) parent: Option<Id>,
    pub(crate) children: Vec<Id>,
    pub(crate) kind: NodeKind,
}

/// Builds a suite tree one node at a time.
///
/// Nodes are created detached and linked with [`TreeBuilder::append_child`].
/// [`TreeBuilder::finish`] freezes the arena; after that only the lazily
/// computed test properties change.
pub struct TreeBuilder {
    nodes: Vec<Node>,
    errata: Arc<Errata>,
}

impl TreeBuilder {
    pub fn new(errata: Arc<Errata>) -> Self {
        Self {
            nodes: Vec::new(),
            errata,
        }
    }

    fn push(&mut self, node: Node) -> Id {
        let id = Id(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn add_element(&mut self, name: &str, attributes: Attributes, document_base: &str) -> Id {
        self.push(Node {
            name: name.to_string(),
            attributes,
            document_base: document_base.to_string(),
            parent: None,
            children: Vec::new(),
            kind: NodeKind::Element,
        })
    }

    /// Create a `TESTSUITE` or `TESTCASES` node.
    pub fn add_suite(
        &mut self,
        name: &str,
        attributes: Attributes,
        document_base: &str,
    ) -> Result<Id, SuiteError> {
        if !is_suite_name(name) {
            return Err(SuiteError::NotASuite(name.to_string()));
        }
        let id = self.add_element(name, attributes, document_base);
        self.nodes[id.index()].kind = NodeKind::Suite;
        Ok(id)
    }

    /// Create a `TEST` node. Errata corrections are applied first, then the
    /// required `ID` and `TYPE` attributes are validated.
    pub fn add_test(
        &mut self,
        mut attributes: Attributes,
        document_base: &str,
    ) -> Result<Id, SuiteError> {
        let raw_id = attributes
            .get("ID")
            .cloned()
            .ok_or_else(|| SuiteError::missing("ID"))?;
        self.errata.apply(&raw_id, &mut attributes);
        let state = TestState::from_attributes(&attributes)?;
        let id = self.add_element(TEST, attributes, document_base);
        self.nodes[id.index()].kind = NodeKind::Test(Box::new(state));
        Ok(id)
    }

    pub fn append_child(&mut self, parent: Id, child: Id) -> Result<(), SuiteError> {
        let child_node = self
            .nodes
            .get(child.index())
            .ok_or(SuiteError::UnknownNode(child.index()))?;
        let parent_node = self
            .nodes
            .get(parent.index())
            .ok_or(SuiteError::UnknownNode(parent.index()))?;
        if parent == child {
            return Err(SuiteError::SelfAppend);
        }
        if child_node.parent.is_some() {
            return Err(SuiteError::AlreadyAttached);
        }
        let mut ancestor = parent_node.parent;
        while let Some(current) = ancestor {
            if current == child {
                return Err(SuiteError::AncestorAppend);
            }
            ancestor = self.nodes[current.index()].parent;
        }
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = Some(parent);
        Ok(())
    }

    pub fn name(&self, id: Id) -> &str {
        &self.nodes[id.index()].name
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn finish(self, loader: Arc<dyn ResourceLoader>) -> Arc<Tree> {
        Arc::new(Tree {
            nodes: self.nodes,
            loader,
        })
    }
}

/// A frozen suite tree and the loader its tests read fixtures with.
pub struct Tree {
    nodes: Vec<Node>,
    loader: Arc<dyn ResourceLoader>,
}

impl Tree {
    pub(crate) fn node(&self, id: Id) -> &Node {
        &self.nodes[id.index()]
    }

    pub(crate) fn loader(&self) -> &dyn ResourceLoader {
        self.loader.as_ref()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Handle to node `id`, if this tree has one.
    pub fn element(self: &Arc<Self>, id: Id) -> Option<Element> {
        (id.index() < self.nodes.len()).then(|| Element {
            tree: Arc::clone(self),
            id,
        })
    }

    fn base_of(&self, id: Id) -> String {
        let node = self.node(id);
        let parent_base = match node.parent {
            Some(parent) => self.base_of(parent),
            None => node.document_base.clone(),
        };
        match node.attributes.get("xml:base") {
            Some(base) => tools::path::join(&parent_base, base),
            None => parent_base,
        }
    }

    /// Ids of every descendant of `root`, in document order.
    pub(crate) fn descendant_ids(&self, root: Id) -> impl Iterator<Item = Id> + '_ {
        let mut stack: Vec<Id> = self.node(root).children.iter().rev().copied().collect();
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.node(id).children.iter().rev().copied());
            Some(id)
        })
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("nodes", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

/// Handle to one node of a [`Tree`].
#[derive(Clone)]
pub struct Element {
    pub(crate) tree: Arc<Tree>,
    pub(crate) id: Id,
}

impl Element {
    pub(crate) fn node(&self) -> &Node {
        self.tree.node(self.id)
    }

    pub fn node_id(&self) -> Id {
        self.id
    }

    pub fn tree(&self) -> &Arc<Tree> {
        &self.tree
    }

    pub fn name(&self) -> &str {
        &self.node().name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.node().attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.node().attributes.get(name).map(String::as_str)
    }

    pub fn must_get_attribute(&self, name: &str) -> Result<&str, SuiteError> {
        self.attribute(name).ok_or_else(|| SuiteError::missing(name))
    }

    /// Location context in effect when the node was created.
    pub fn document_base(&self) -> &str {
        &self.node().document_base
    }

    pub fn parent(&self) -> Option<Element> {
        self.node().parent.map(|id| Element {
            tree: Arc::clone(&self.tree),
            id,
        })
    }

    pub fn children(&self) -> impl ExactSizeIterator<Item = Element> + '_ {
        self.node().children.iter().map(|&id| Element {
            tree: Arc::clone(&self.tree),
            id,
        })
    }

    /// The effective base: the parent's base, or the document base at the
    /// root, joined with this node's `xml:base` when it has one.
    pub fn base(&self) -> String {
        self.tree.base_of(self.id)
    }

    pub fn resolve_path(&self, path: &str) -> String {
        tools::path::join(&self.base(), path)
    }

    /// Every descendant, parents before their children.
    pub fn walk_child_elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.tree.descendant_ids(self.id).map(|id| Element {
            tree: Arc::clone(&self.tree),
            id,
        })
    }

    pub fn is_test(&self) -> bool {
        matches!(self.node().kind, NodeKind::Test(_))
    }

    pub fn is_suite(&self) -> bool {
        matches!(self.node().kind, NodeKind::Suite)
    }

    pub fn as_test(&self) -> Option<Test> {
        Test::try_from(self.clone()).ok()
    }

    pub fn as_suite(&self) -> Option<Suite> {
        Suite::try_from(self.clone()).ok()
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tree, &other.tree) && self.id == other.id
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("attributes", self.attributes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resources::MemoryLoader;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn builder() -> TreeBuilder {
        TreeBuilder::new(Arc::new(Errata::empty()))
    }

    fn finish(builder: TreeBuilder) -> Arc<Tree> {
        builder.finish(Arc::new(MemoryLoader::new()))
    }

    #[test]
    fn parent_is_set_on_append() {
        let mut b = builder();
        let root = b.add_element("root", Attributes::new(), "base");
        let child = b.add_element("child", Attributes::new(), "base");
        b.append_child(root, child).unwrap();
        let tree = finish(b);

        let root = tree.element(root).unwrap();
        let child = tree.element(child).unwrap();
        assert!(root.parent().is_none());
        assert_eq!(child.parent(), Some(root.clone()));
        assert_eq!(root.children().collect::<Vec<_>>(), vec![child]);
    }

    #[test]
    fn node_cannot_be_attached_twice() {
        let mut b = builder();
        let a = b.add_element("a", Attributes::new(), "");
        let c = b.add_element("c", Attributes::new(), "");
        let child = b.add_element("child", Attributes::new(), "");
        b.append_child(a, child).unwrap();
        assert!(matches!(b.append_child(c, child), Err(SuiteError::AlreadyAttached)));
        assert!(matches!(b.append_child(a, a), Err(SuiteError::SelfAppend)));
        assert!(matches!(b.append_child(child, a), Err(SuiteError::AncestorAppend)));
    }

    #[test]
    fn ids_from_another_builder_are_rejected() {
        let mut other = builder();
        for name in ["x", "y", "z"] {
            other.add_element(name, Attributes::new(), "");
        }
        let foreign = other.add_element("w", Attributes::new(), "");

        let mut b = builder();
        let root = b.add_element("root", Attributes::new(), "");
        assert!(matches!(b.append_child(root, foreign), Err(SuiteError::UnknownNode(3))));
        assert!(matches!(b.append_child(foreign, root), Err(SuiteError::UnknownNode(3))));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn must_get_attribute_reports_missing_name() {
        let mut b = builder();
        let id = b.add_element("a", attrs(&[("foo", "bar")]), "");
        let tree = finish(b);
        let el = tree.element(id).unwrap();
        assert_eq!(el.must_get_attribute("foo").unwrap(), "bar");
        let err = el.must_get_attribute("nope").unwrap_err();
        assert_eq!(err.to_string(), "attribute nope is not set");
    }

    #[test]
    fn base_without_xml_base_is_document_base() {
        let mut b = builder();
        let root = b.add_element("root", Attributes::new(), "myDocumentBase");
        let child = b.add_element("child", Attributes::new(), "myDocumentBase");
        b.append_child(root, child).unwrap();
        let tree = finish(b);
        assert_eq!(tree.element(root).unwrap().base(), "myDocumentBase");
        assert_eq!(tree.element(child).unwrap().base(), "myDocumentBase");
    }

    #[test]
    fn base_combines_xml_base_down_the_tree() {
        let mut b = builder();
        let root = b.add_element("root", attrs(&[("xml:base", "sub")]), "myDocumentBase");
        let mid = b.add_element("mid", Attributes::new(), "myDocumentBase");
        let leaf = b.add_element("leaf", attrs(&[("xml:base", "sub2/")]), "myDocumentBase");
        b.append_child(root, mid).unwrap();
        b.append_child(mid, leaf).unwrap();
        let tree = finish(b);

        assert_eq!(tree.element(root).unwrap().base(), "myDocumentBase/sub");
        assert_eq!(tree.element(mid).unwrap().base(), "myDocumentBase/sub");
        let leaf = tree.element(leaf).unwrap();
        assert_eq!(leaf.base(), "myDocumentBase/sub/sub2/");
        assert_eq!(leaf.resolve_path("x.xml"), "myDocumentBase/sub/sub2/x.xml");
    }

    #[test]
    fn walk_is_preorder() {
        let mut b = builder();
        let root = b.add_element("root", Attributes::new(), "");
        let a = b.add_element("a", Attributes::new(), "");
        let a1 = b.add_element("a1", Attributes::new(), "");
        let bb = b.add_element("b", Attributes::new(), "");
        b.append_child(root, a).unwrap();
        b.append_child(root, bb).unwrap();
        // appended after its parent gained a sibling; order still follows the tree
        b.append_child(a, a1).unwrap();
        let tree = finish(b);

        let names: Vec<String> = tree
            .element(root)
            .unwrap()
            .walk_child_elements()
            .map(|el| el.name().to_string())
            .collect();
        assert_eq!(names, ["a", "a1", "b"]);
    }

    #[test]
    fn suite_names_are_checked() {
        let mut b = builder();
        assert!(b.add_suite(TESTCASES, Attributes::new(), "").is_ok());
        assert!(matches!(
            b.add_suite("FOO", Attributes::new(), ""),
            Err(SuiteError::NotASuite(name)) if name == "FOO"
        ));
    }

    #[test]
    fn test_nodes_require_id_and_type() {
        let mut b = builder();
        let err = b.add_test(attrs(&[("TYPE", "valid")]), "").unwrap_err();
        assert_eq!(err.to_string(), "attribute ID is not set");
        let err = b.add_test(attrs(&[("ID", "x")]), "").unwrap_err();
        assert_eq!(err.to_string(), "attribute TYPE is not set");
        let err = b.add_test(attrs(&[("ID", "x"), ("TYPE", "bogus")]), "").unwrap_err();
        assert_eq!(err.to_string(), "unexpected test type: bogus");
    }
}
