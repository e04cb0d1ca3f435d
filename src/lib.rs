// SPDX-License-Identifier: MIT

//! Parse a HID Report Descriptor into a tree of its Main items.
//!
//! The tree mirrors the Collection / End Collection nesting of the report
//! descriptor. Each node records the Global and Local item state that was in
//! effect when its Main item was seen, so the caller does not need to replay
//! the item stream to know e.g. the Usage Page of a Collection.
//!
//! ```
//! use hidtree::*;
//!
//! # fn main() -> Result<()> {
//! #[rustfmt::skip]
//! let bytes = [
//!     0x05, 0x01,        // Usage Page (Generic Desktop)
//!     0x09, 0x06,        // Usage (Keyboard)
//!     0xa1, 0x01,        // Collection (Application)
//!     0xc0,              // End Collection
//! ];
//! let tree = ReportTree::try_from(bytes.as_slice())?;
//! let collection = tree.root().children().next().unwrap();
//! assert!(collection.is_collection());
//! let end = collection.children().next().unwrap();
//! assert!(end.is_end_collection());
//! assert!(end.local_state().is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! The report descriptor itself is not interpreted beyond the item framing and
//! the Collection nesting. Item data is available from every [hid::Item] in
//! its raw form.
//!
//! In this document and unless stated otherwise, a reference to "Section a.b.c" refers to the
//! [HID Device Class Definition for HID 1.11](https://www.usb.org/document-library/device-class-definition-hid-111).

use thiserror::Error;

pub mod hid;
pub mod state;
pub mod tree;
pub mod types;

pub use hid::{Item, ItemFormat, ItemTag, ItemType};
pub use state::{GlobalState, LocalState};
pub use tree::{Node, NodeId, ReportTree, SharedNode, UnbalancedCollection};
pub use types::*;

#[doc(hidden)]
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    #[error("Malformed item {header:#04x} at offset {offset}: long items must have a size code of 2")]
    MalformedItem { offset: usize, header: u8 },
    #[error("Item at offset {offset} needs {needed} bytes but only {available} remain")]
    BufferOverrun {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("Invalid data at offset {offset}: {message}")]
    InvalidData { offset: usize, message: String },
    #[error("Pop at offset {offset} without a matching Push")]
    PopWithoutPush { offset: usize },
    #[error("End Collection at offset {offset} without an open Collection")]
    UnmatchedEndCollection { offset: usize },
    #[error("{depth} collection(s) still open at the end of the report descriptor")]
    UnclosedCollection { depth: usize },
}

pub type Result<T> = std::result::Result<T, ParserError>;

/// Options for [ReportTree::parse_with].
///
/// The default is lenient: a Pop without a Push clears the Global
/// state and Collection / End Collection mismatches are only reported
/// via [ReportTree::unbalanced]. In strict mode all three are errors.
///
/// ```
/// # use hidtree::*;
/// let options = ParserOptions::new().strict(true);
/// let bytes = [0xa1, 0x01]; // Collection without End Collection
/// assert!(ReportTree::parse_with(&bytes, &options).is_err());
/// assert!(ReportTree::parse_with(&bytes, &ParserOptions::default()).is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserOptions {
    strict: bool,
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on Pop without Push and on unpaired Collection / End Collection items.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }
}
