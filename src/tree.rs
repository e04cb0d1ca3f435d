// SPDX-License-Identifier: MIT

//! The collection tree of a report descriptor.
//!
//! Every Main item in a report descriptor becomes one [Node] in the tree,
//! Global and Local items only change the state recorded in those nodes.
//! A Collection item opens a new level and its End Collection item is
//! the last child of that level:
//!
//! ```text
//! root
//! └── Collection (Application)
//!     ├── Input
//!     └── End Collection
//! ```
//!
//! Nodes are stored in an arena owned by the [ReportTree] and refer to each
//! other by [NodeId]. A [Node] is a cheap borrowed view into that arena,
//! a [SharedNode] keeps the arena alive on its own.

use crate::hid::{usage_name, usage_page_name, Item, ItemTag, ReportDescriptorItems};
use crate::state::{GlobalState, LocalState, StateTracker, StateUpdate};
use crate::types::{GlobalTag, LocalTag, MainTag};
use crate::{ensure, ParserError, ParserOptions, Result};
use std::sync::Arc;

/// The index of a node in its [ReportTree]. The root node is always
/// [NodeId::ROOT].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct NodeData {
    item: Option<Item>,
    global_state: GlobalState,
    local_state: LocalState,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    depth: usize,
}

type Arena = Arc<[NodeData]>;

/// Reported when the Collection and End Collection items of a report
/// descriptor do not pair up. The tree is still complete, see
/// [ReportTree::unbalanced].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnbalancedCollection {
    /// Collections still open at the end of the report descriptor.
    pub open_collections: usize,
    /// End Collection items seen while no collection was open.
    pub unmatched_end_collections: usize,
}

/// The parsed report descriptor. The tree is immutable once built
/// and may be shared between threads.
///
/// ```
/// # use hidtree::*;
/// let bytes = [0x05, 0x01, 0x09, 0x06, 0xa1, 0x01, 0xc0];
/// let tree = ReportTree::try_from(bytes.as_slice()).unwrap();
/// let collection = tree.root().children().next().unwrap();
/// assert_eq!(collection.global_state().value(GlobalTag::UsagePage), Some(0x01));
/// assert_eq!(collection.local_state().value(LocalTag::Usage), Some(0x06));
/// ```
#[derive(Debug, Clone)]
pub struct ReportTree {
    arena: Arena,
    unbalanced: Option<UnbalancedCollection>,
}

impl ReportTree {
    /// Parse the report descriptor with the given options.
    pub fn parse_with(bytes: &[u8], options: &ParserOptions) -> Result<ReportTree> {
        let items = ReportDescriptorItems::try_from(bytes)?;
        let mut builder = TreeBuilder::new(options);
        for rdesc_item in items {
            let offset = rdesc_item.offset();
            builder.feed(offset, rdesc_item.into_item())?;
        }
        builder.finish()
    }

    /// The synthetic root node. It has no item and empty state.
    pub fn root(&self) -> Node<'_> {
        Node {
            arena: &self.arena,
            id: NodeId::ROOT,
        }
    }

    /// The node for `id` or `None` if `id` is not from this tree.
    pub fn node(&self, id: NodeId) -> Option<Node<'_>> {
        (id.0 < self.arena.len()).then_some(Node {
            arena: &self.arena,
            id,
        })
    }

    /// The number of nodes including the root node.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// All nodes in report descriptor order, starting with the root node.
    pub fn nodes(&self) -> Descendants<'_> {
        self.root().descendants()
    }

    /// `Some` if the collections in the report descriptor did not pair up.
    pub fn unbalanced(&self) -> Option<UnbalancedCollection> {
        self.unbalanced
    }

    pub fn is_balanced(&self) -> bool {
        self.unbalanced.is_none()
    }
}

impl TryFrom<&[u8]> for ReportTree {
    type Error = ParserError;

    /// Parse the report descriptor with the default [ParserOptions].
    fn try_from(bytes: &[u8]) -> Result<ReportTree> {
        ReportTree::parse_with(bytes, &ParserOptions::default())
    }
}

impl TryFrom<&Vec<u8>> for ReportTree {
    type Error = ParserError;

    fn try_from(bytes: &Vec<u8>) -> Result<ReportTree> {
        ReportTree::try_from(bytes.as_slice())
    }
}

/// A borrowed view of one node in a [ReportTree].
#[derive(Clone, Copy)]
pub struct Node<'t> {
    arena: &'t Arena,
    id: NodeId,
}

impl<'t> Node<'t> {
    fn data(&self) -> &'t NodeData {
        &self.arena[self.id.0]
    }

    fn with_id(&self, id: NodeId) -> Node<'t> {
        Node {
            arena: self.arena,
            id,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn is_root(&self) -> bool {
        self.id == NodeId::ROOT
    }

    /// The Main item of this node, `None` for the root node.
    pub fn item(&self) -> Option<&'t Item> {
        self.data().item.as_ref()
    }

    /// The Main item tag of this node, `None` for the root node.
    pub fn main_tag(&self) -> Option<MainTag> {
        self.item().and_then(|item| item.main_tag())
    }

    pub fn is_collection(&self) -> bool {
        self.main_tag() == Some(MainTag::Collection)
    }

    pub fn is_end_collection(&self) -> bool {
        self.main_tag() == Some(MainTag::EndCollection)
    }

    /// The Global items in effect when this node's item was seen.
    pub fn global_state(&self) -> &'t GlobalState {
        &self.data().global_state
    }

    /// The Local items seen since the previous Main item.
    pub fn local_state(&self) -> &'t LocalState {
        &self.data().local_state
    }

    pub fn parent(&self) -> Option<Node<'t>> {
        self.data().parent.map(|id| self.with_id(id))
    }

    pub fn children(&self) -> Children<'t> {
        Children {
            arena: self.arena,
            ids: self.data().children.iter(),
        }
    }

    /// The collection depth, 0 for the root node. The children of a
    /// Collection node are one level deeper than the Collection node.
    pub fn depth(&self) -> usize {
        self.data().depth
    }

    /// This node and all nodes below it, in report descriptor order.
    pub fn descendants(&self) -> Descendants<'t> {
        Descendants {
            arena: self.arena,
            stack: vec![self.id],
        }
    }

    /// The parent, grandparent, etc. up to and including the root node.
    pub fn ancestors(&self) -> impl Iterator<Item = Node<'t>> + 't {
        let arena = self.arena;
        std::iter::successors(self.parent(), move |node| {
            arena[node.id.0].parent.map(|id| Node { arena, id })
        })
    }

    /// A handle to this node that keeps the tree's nodes alive
    /// independently of the [ReportTree].
    pub fn to_shared(&self) -> SharedNode {
        SharedNode {
            arena: Arc::clone(self.arena),
            id: self.id,
        }
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(self.arena, other.arena) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("item", &self.item())
            .field("depth", &self.depth())
            .field("children", &self.data().children.len())
            .finish()
    }
}

/// A node that owns a reference to its tree's nodes, see [Node::to_shared].
#[derive(Debug, Clone)]
pub struct SharedNode {
    arena: Arena,
    id: NodeId,
}

impl SharedNode {
    pub fn node(&self) -> Node<'_> {
        Node {
            arena: &self.arena,
            id: self.id,
        }
    }
}

/// Iterator over the children of a [Node].
pub struct Children<'t> {
    arena: &'t Arena,
    ids: std::slice::Iter<'t, NodeId>,
}

impl<'t> Iterator for Children<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Node<'t>> {
        let id = *self.ids.next()?;
        Some(Node {
            arena: self.arena,
            id,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = *self.ids.next_back()?;
        Some(Node {
            arena: self.arena,
            id,
        })
    }
}

impl ExactSizeIterator for Children<'_> {}

/// Pre-order iterator over a [Node] and everything below it.
pub struct Descendants<'t> {
    arena: &'t Arena,
    stack: Vec<NodeId>,
}

impl<'t> Iterator for Descendants<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Node<'t>> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.arena[id.0].children.iter().rev().copied());
        Some(Node {
            arena: self.arena,
            id,
        })
    }
}

/// Builds the tree one item at a time. `cursor` is the node new
/// nodes are appended to.
struct TreeBuilder<'o> {
    options: &'o ParserOptions,
    nodes: Vec<NodeData>,
    cursor: NodeId,
    state: StateTracker,
    unmatched_end_collections: usize,
}

impl<'o> TreeBuilder<'o> {
    fn new(options: &'o ParserOptions) -> Self {
        let root = NodeData {
            item: None,
            global_state: GlobalState::default(),
            local_state: LocalState::default(),
            parent: None,
            children: Vec::new(),
            depth: 0,
        };
        TreeBuilder {
            options,
            nodes: vec![root],
            cursor: NodeId::ROOT,
            state: StateTracker::new(),
            unmatched_end_collections: 0,
        }
    }

    fn feed(&mut self, offset: usize, item: Item) -> Result<()> {
        match item.item_tag() {
            ItemTag::Main(tag) => self.main_item(offset, tag, item),
            ItemTag::Global(_) | ItemTag::Local(_) => self.state_item(offset, &item),
            ItemTag::Reserved(tag) => {
                log::trace!("{offset:#06x}: ignoring reserved item with tag {tag:#x}");
                Ok(())
            }
        }
    }

    fn main_item(&mut self, offset: usize, tag: MainTag, item: Item) -> Result<()> {
        match tag {
            MainTag::Collection => {
                log::debug!("{offset:#06x}: {item} at depth {}", self.depth() + 1);
                let id = self.append(item);
                self.cursor = id;
            }
            MainTag::EndCollection => {
                if self.cursor == NodeId::ROOT {
                    ensure!(
                        !self.options.is_strict(),
                        ParserError::UnmatchedEndCollection { offset }
                    );
                    log::warn!("{offset:#06x}: End Collection without an open Collection");
                    self.unmatched_end_collections += 1;
                    self.append(item);
                } else {
                    log::debug!("{offset:#06x}: End Collection at depth {}", self.depth());
                    self.append(item);
                    self.cursor = self.nodes[self.cursor.0].parent.unwrap_or(NodeId::ROOT);
                }
            }
            _ => {
                self.append(item);
            }
        }
        self.state.reset_local();
        Ok(())
    }

    fn state_item(&mut self, offset: usize, item: &Item) -> Result<()> {
        if self.state.update(item) == StateUpdate::PoppedEmpty {
            ensure!(!self.options.is_strict(), ParserError::PopWithoutPush { offset });
            log::warn!("{offset:#06x}: Pop without Push, clearing the global state");
        }
        Ok(())
    }

    fn depth(&self) -> usize {
        self.nodes[self.cursor.0].depth
    }

    fn append(&mut self, item: Item) -> NodeId {
        let id = NodeId(self.nodes.len());
        let (global_state, local_state) = self.state.snapshot();
        self.nodes.push(NodeData {
            item: Some(item),
            global_state,
            local_state,
            parent: Some(self.cursor),
            children: Vec::new(),
            depth: self.depth() + 1,
        });
        self.nodes[self.cursor.0].children.push(id);
        id
    }

    fn finish(self) -> Result<ReportTree> {
        let open_collections = self.depth();
        if open_collections > 0 {
            ensure!(
                !self.options.is_strict(),
                ParserError::UnclosedCollection {
                    depth: open_collections
                }
            );
            log::warn!("{open_collections} collection(s) still open at the end of the report descriptor");
        }
        let unbalanced = (open_collections > 0 || self.unmatched_end_collections > 0).then_some(
            UnbalancedCollection {
                open_collections,
                unmatched_end_collections: self.unmatched_end_collections,
            },
        );
        log::debug!("Parsed report descriptor into {} nodes", self.nodes.len());
        Ok(ReportTree {
            arena: Arena::from(self.nodes),
            unbalanced,
        })
    }
}

impl std::fmt::Display for ReportTree {
    /// Prints one line per node, indented by collection depth. Collections
    /// are annotated with the usage they were declared with.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for node in self.nodes().skip(1) {
            let item = match node.item() {
                Some(item) => item,
                None => continue,
            };
            let level = if node.is_end_collection() {
                node.depth().saturating_sub(2)
            } else {
                node.depth() - 1
            };
            write!(f, "{:indent$}{item}", "", indent = level * 2)?;
            if node.is_collection() {
                if let Some(usage) = collection_usage(&node) {
                    write!(f, " [{usage}]")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn collection_usage(node: &Node) -> Option<String> {
    let usage = node.local_state().get(LocalTag::Usage)?;
    let value = u32::try_from(&usage.data()).ok()?;
    let (usage_page, usage_id) = if usage.data_size() == 4 {
        ((value >> 16) as u16, (value & 0xffff) as u16)
    } else {
        (
            node.global_state().value(GlobalTag::UsagePage)? as u16,
            value as u16,
        )
    };
    Some(format!(
        "{} / {}",
        usage_page_name(usage_page),
        usage_name(usage_page, usage_id)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(bytes: &[u8]) -> ReportTree {
        ReportTree::try_from(bytes).unwrap()
    }

    #[test]
    fn empty_descriptor() {
        let tree = parse(&[]);
        assert_eq!(tree.node_count(), 1);
        assert!(tree.root().is_root());
        assert!(tree.root().item().is_none());
        assert!(tree.root().parent().is_none());
        assert_eq!(tree.root().children().len(), 0);
        assert!(tree.is_balanced());
    }

    #[test]
    fn keyboard_collection() {
        let tree = parse(&[0x05, 0x01, 0x09, 0x06, 0xa1, 0x01, 0xc0]);
        let root = tree.root();
        assert_eq!(root.children().len(), 1);

        let collection = root.children().next().unwrap();
        assert!(collection.is_collection());
        assert_eq!(collection.depth(), 1);
        assert_eq!(collection.global_state().len(), 1);
        assert_eq!(
            collection.global_state().value(GlobalTag::UsagePage),
            Some(0x01)
        );
        assert_eq!(collection.local_state().len(), 1);
        assert_eq!(collection.local_state().value(LocalTag::Usage), Some(0x06));

        assert_eq!(collection.children().len(), 1);
        let end = collection.children().next().unwrap();
        assert!(end.is_end_collection());
        assert_eq!(end.depth(), 2);
        assert_eq!(end.global_state().value(GlobalTag::UsagePage), Some(0x01));
        assert!(end.local_state().is_empty());
        assert_eq!(end.parent(), Some(collection));
        assert!(tree.is_balanced());
    }

    #[test]
    fn leaves_do_not_move_the_cursor() {
        #[rustfmt::skip]
        let bytes = [
            0xa1, 0x01,        // Collection (Application)
            0x09, 0x30,        //   Usage (X)
            0x81, 0x02,        //   Input (Data,Var,Abs)
            0x09, 0x31,        //   Usage (Y)
            0x91, 0x02,        //   Output (Data,Var,Abs)
            0xb1, 0x02,        //   Feature (Data,Var,Abs)
            0xc0,              // End Collection
            0x81, 0x01,        // Input (Cnst)
        ];
        let tree = parse(&bytes);
        let root = tree.root();
        let tags: Vec<_> = root.children().map(|n| n.main_tag()).collect();
        assert_eq!(tags, [Some(MainTag::Collection), Some(MainTag::Input)]);

        let collection = root.children().next().unwrap();
        let tags: Vec<_> = collection.children().filter_map(|n| n.main_tag()).collect();
        assert_eq!(
            tags,
            [
                MainTag::Input,
                MainTag::Output,
                MainTag::Feature,
                MainTag::EndCollection
            ]
        );

        let children: Vec<_> = collection.children().collect();
        assert_eq!(children[0].local_state().value(LocalTag::Usage), Some(0x30));
        assert_eq!(children[1].local_state().value(LocalTag::Usage), Some(0x31));
        assert!(children[2].local_state().is_empty());
        assert!(children[3].local_state().is_empty());
    }

    #[test]
    fn end_collection_restores_cursor() {
        #[rustfmt::skip]
        let bytes = [
            0xa1, 0x01,        // Collection (Application)
            0xa1, 0x00,        //   Collection (Physical)
            0x81, 0x02,        //     Input
            0xc0,              //   End Collection
            0x81, 0x02,        //   Input
            0xc0,              // End Collection
            0xa1, 0x02,        // Collection (Logical)
            0xc0,              // End Collection
        ];
        let tree = parse(&bytes);
        let root = tree.root();
        let top: Vec<_> = root.children().collect();
        assert_eq!(top.len(), 2);

        let application = top[0];
        let inner: Vec<_> = application.children().collect();
        assert_eq!(inner.len(), 3);
        let physical = inner[0];
        assert!(physical.is_collection());
        // the input after the inner End Collection is appended to the outer collection
        assert_eq!(inner[1].main_tag(), Some(MainTag::Input));
        assert!(inner[2].is_end_collection());

        // every End Collection's parent is the collection it closes and
        // that collection's parent was the cursor before it was opened
        let physical_end = physical.children().last().unwrap();
        assert!(physical_end.is_end_collection());
        assert_eq!(physical_end.parent(), Some(physical));
        assert_eq!(physical.parent(), Some(application));
        assert_eq!(inner[2].parent().and_then(|n| n.parent()), Some(root));

        assert!(top[1].is_collection());
        assert_eq!(top[1].children().len(), 1);
        assert!(tree.is_balanced());
    }

    #[test]
    fn locals_reset_after_every_main_item() {
        #[rustfmt::skip]
        let bytes = [
            0x09, 0x01,        // Usage (0x01)
            0x19, 0x01,        // Usage Minimum (1)
            0xa1, 0x01,        // Collection (Application)
            0x09, 0x02,        //   Usage (0x02)
            0xc0,              // End Collection
            0x81, 0x02,        // Input
        ];
        let tree = parse(&bytes);
        let root = tree.root();
        let children: Vec<_> = root.children().collect();
        let collection = children[0];
        assert_eq!(collection.local_state().len(), 2);

        let end = collection.children().next().unwrap();
        assert_eq!(end.local_state().value(LocalTag::Usage), Some(0x02));
        assert!(!end.local_state().contains(LocalTag::UsageMinimum));

        assert!(children[1].local_state().is_empty());
    }

    #[test]
    fn push_pop_snapshots() {
        #[rustfmt::skip]
        let bytes = [
            0x15, 0x00,        // Logical Minimum (0)
            0xa4,              // Push
            0x15, 0x81,        //   Logical Minimum (-127)
            0x81, 0x02,        //   Input
            0xb4,              // Pop
            0x81, 0x02,        // Input
        ];
        let tree = parse(&bytes);
        let children: Vec<_> = tree.root().children().collect();
        let min = |n: &Node| {
            n.global_state()
                .get(GlobalTag::LogicalMinimum)
                .map(|item| i32::try_from(&item.data()).unwrap())
        };
        assert_eq!(min(&children[0]), Some(-127));
        assert_eq!(min(&children[1]), Some(0));
        // Push and Pop are never stored in the state
        assert!(!children[0].global_state().contains(GlobalTag::Push));
        assert!(!children[1].global_state().contains(GlobalTag::Pop));
    }

    #[test]
    fn pop_without_push() {
        let bytes = [0x05, 0x01, 0xb4, 0x81, 0x02];
        let tree = parse(&bytes);
        let input = tree.root().children().next().unwrap();
        assert!(input.global_state().is_empty());

        let strict = ParserOptions::new().strict(true);
        let err = ReportTree::parse_with(&bytes, &strict).unwrap_err();
        assert!(matches!(err, ParserError::PopWithoutPush { offset: 2 }));
    }

    #[test]
    fn reserved_items_are_skipped() {
        #[rustfmt::skip]
        let bytes = [
            0x05, 0x01,              // Usage Page (Generic Desktop)
            0x1d, 0x05,              // Reserved item type
            0xfe, 0x02, 0xf0, 0x01, 0x02, // Long item
            0x81, 0x02,              // Input
        ];
        let tree = parse(&bytes);
        assert_eq!(tree.node_count(), 2);
        let input = tree.root().children().next().unwrap();
        assert_eq!(input.global_state().len(), 1);
        assert!(input.local_state().is_empty());
    }

    #[test]
    fn unknown_main_tag_is_a_leaf() {
        let bytes = [0xa1, 0x01, 0xd1, 0x00, 0xc0];
        let tree = parse(&bytes);
        let collection = tree.root().children().next().unwrap();
        let leaf = collection.children().next().unwrap();
        assert_eq!(leaf.main_tag(), Some(MainTag::Reserved(0xd)));
        assert!(tree.is_balanced());
    }

    #[test]
    fn unclosed_collection() {
        let bytes = [0xa1, 0x01, 0xa1, 0x00, 0x81, 0x02, 0xc0];
        let tree = parse(&bytes);
        assert_eq!(
            tree.unbalanced(),
            Some(UnbalancedCollection {
                open_collections: 1,
                unmatched_end_collections: 0,
            })
        );
        // the tree is still complete
        assert_eq!(tree.node_count(), 5);

        let strict = ParserOptions::new().strict(true);
        let err = ReportTree::parse_with(&bytes, &strict).unwrap_err();
        assert!(matches!(err, ParserError::UnclosedCollection { depth: 1 }));
    }

    #[test]
    fn unmatched_end_collection() {
        let bytes = [0xc0, 0xa1, 0x01, 0xc0];
        let tree = parse(&bytes);
        assert_eq!(
            tree.unbalanced(),
            Some(UnbalancedCollection {
                open_collections: 0,
                unmatched_end_collections: 1,
            })
        );
        let children: Vec<_> = tree.root().children().collect();
        assert_eq!(children.len(), 2);
        assert!(children[0].is_end_collection());
        // the cursor stayed at the root
        assert!(children[1].is_collection());

        let strict = ParserOptions::new().strict(true);
        let err = ReportTree::parse_with(&bytes, &strict).unwrap_err();
        assert!(matches!(err, ParserError::UnmatchedEndCollection { offset: 0 }));
    }

    #[test]
    fn truncated_descriptor_fails() {
        // Logical Maximum with 4 data bytes but only 2 present
        let bytes = [0x05, 0x01, 0xa1, 0x01, 0x27, 0xff, 0x00];
        let err = ReportTree::try_from(bytes.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            ParserError::BufferOverrun {
                offset: 4,
                needed: 5,
                available: 3
            }
        ));
    }

    #[test]
    fn malformed_long_item_fails() {
        let bytes = [0x05, 0x01, 0xfd, 0x01, 0x00];
        let err = ReportTree::try_from(bytes.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            ParserError::MalformedItem {
                offset: 2,
                header: 0xfd
            }
        ));
    }

    #[test]
    fn traversal() {
        let bytes = [0xa1, 0x01, 0xa1, 0x00, 0x81, 0x02, 0xc0, 0xc0];
        let tree = parse(&bytes);
        let tags: Vec<_> = tree.nodes().map(|n| n.main_tag()).collect();
        assert_eq!(
            tags,
            [
                None,
                Some(MainTag::Collection),
                Some(MainTag::Collection),
                Some(MainTag::Input),
                Some(MainTag::EndCollection),
                Some(MainTag::EndCollection),
            ]
        );

        let input = tree.nodes().find(|n| n.main_tag() == Some(MainTag::Input)).unwrap();
        assert_eq!(input.depth(), 3);
        let ancestors: Vec<_> = input.ancestors().map(|n| n.depth()).collect();
        assert_eq!(ancestors, [2, 1, 0]);
        assert_eq!(tree.node(input.id()), Some(input));
        assert!(tree.node(NodeId(100)).is_none());
    }

    #[test]
    fn shared_node_outlives_tree() {
        let shared = {
            let tree = parse(&[0x05, 0x01, 0x09, 0x02, 0xa1, 0x01, 0x81, 0x02, 0xc0]);
            let collection = tree.root().children().next().unwrap();
            collection.to_shared()
        };
        let collection = shared.node();
        assert!(collection.is_collection());
        assert_eq!(collection.children().len(), 2);
        assert_eq!(collection.parent().map(|n| n.is_root()), Some(true));
    }

    #[test]
    fn tree_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReportTree>();
        assert_send_sync::<SharedNode>();
    }

    #[test]
    fn display() {
        let tree = parse(&[0xa1, 0x01, 0x81, 0x02, 0xc0]);
        let output = format!("{tree}");
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(
            lines,
            ["Collection (Application)", "  Input (0x2)", "End Collection"]
        );
    }
}
