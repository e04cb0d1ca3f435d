// SPDX-License-Identifier: MIT

//! The item state table, see Section 6.2.2.7 and 6.2.2.8.
//!
//! > Global items describe rather than define data from a control. A new Main item
//! > assumes the characteristics of the item state table. Global items can change the
//! > state table. As a result Global item tags apply to all subsequently defined items
//! > unless overridden by another Global item.
//!
//! > Local item tags define characteristics of controls. These items do not carry over to
//! > the next Main item.
//!
//! The [StateTracker] keeps the last [Item] seen per tag. It does not look
//! at the data of an item beyond its tag.

use crate::hid::{Item, ItemTag};
use crate::types::{GlobalTag, LocalTag};
use std::collections::BTreeMap;

/// A mapping from tag to the last [Item] seen with that tag.
///
/// Node snapshots are values of this type, they never change once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemState<T: Ord> {
    items: BTreeMap<T, Item>,
}

/// The Global items in effect at a given point of the report descriptor.
pub type GlobalState = ItemState<GlobalTag>;

/// The Local items in effect at a given point of the report descriptor.
pub type LocalState = ItemState<LocalTag>;

impl<T: Ord> Default for ItemState<T> {
    fn default() -> Self {
        ItemState {
            items: BTreeMap::new(),
        }
    }
}

impl<T: Ord + Copy> ItemState<T> {
    /// The last item seen for `tag`, if any.
    pub fn get(&self, tag: T) -> Option<&Item> {
        self.items.get(&tag)
    }

    pub fn contains(&self, tag: T) -> bool {
        self.items.contains_key(&tag)
    }

    /// The unsigned data value of the item for `tag`, see [ItemData](crate::hid::ItemData).
    /// Returns `None` if there is no such item or its data does not fit into a u32.
    pub fn value(&self, tag: T) -> Option<u32> {
        self.get(tag).and_then(|item| u32::try_from(&item.data()).ok())
    }

    /// Iterate over the tags and items, ordered by tag.
    pub fn iter(&self) -> impl Iterator<Item = (T, &Item)> + '_ {
        self.items.iter().map(|(tag, item)| (*tag, item))
    }

    pub fn tags(&self) -> impl Iterator<Item = T> + '_ {
        self.items.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn set(&mut self, tag: T, item: Item) {
        self.items.insert(tag, item);
    }

    fn clear(&mut self) {
        self.items.clear();
    }
}

/// What [StateTracker::update] did with an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateUpdate {
    /// A Global item was stored for its tag.
    Global(GlobalTag),
    /// A Local item was stored for its tag.
    Local(LocalTag),
    /// The Global state was pushed onto the stack.
    Pushed,
    /// The Global state was restored from the stack.
    Popped,
    /// A Pop without a matching Push, the Global state was cleared.
    PoppedEmpty,
    /// Not a Global or Local item, nothing changed.
    Ignored,
}

/// Tracks the Global and Local item state while walking a report descriptor.
#[derive(Debug, Default)]
pub struct StateTracker {
    globals: GlobalState,
    locals: LocalState,
    stack: Vec<GlobalState>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a Global or Local item to the state. Any other item
    /// is [ignored](StateUpdate::Ignored).
    pub fn update(&mut self, item: &Item) -> StateUpdate {
        match item.item_tag() {
            ItemTag::Global(GlobalTag::Push) => {
                self.push();
                StateUpdate::Pushed
            }
            ItemTag::Global(GlobalTag::Pop) => {
                if self.pop() {
                    StateUpdate::Popped
                } else {
                    StateUpdate::PoppedEmpty
                }
            }
            ItemTag::Global(tag) => {
                self.globals.set(tag, item.clone());
                StateUpdate::Global(tag)
            }
            ItemTag::Local(tag) => {
                self.locals.set(tag, item.clone());
                StateUpdate::Local(tag)
            }
            ItemTag::Main(_) | ItemTag::Reserved(_) => StateUpdate::Ignored,
        }
    }

    /// Save a copy of the current Global state, the current state is unchanged.
    pub fn push(&mut self) {
        self.stack.push(self.globals.clone());
    }

    /// Restore the Global state saved by the most recent unmatched [push()](Self::push).
    /// Without one the Global state is cleared and this function returns false.
    pub fn pop(&mut self) -> bool {
        match self.stack.pop() {
            Some(globals) => {
                self.globals = globals;
                true
            }
            None => {
                self.globals.clear();
                false
            }
        }
    }

    /// Clear the Local state, required after every Main item.
    pub fn reset_local(&mut self) {
        self.locals.clear();
    }

    /// Copies of the current Global and Local state.
    pub fn snapshot(&self) -> (GlobalState, LocalState) {
        (self.globals.clone(), self.locals.clone())
    }

    pub fn globals(&self) -> &GlobalState {
        &self.globals
    }

    pub fn locals(&self) -> &LocalState {
        &self.locals
    }

    /// The number of pushed Global states not yet popped.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }
}
