// SPDX-License-Identifier: MIT

//! A wrapper around the HID Core items. This module handles splitting
//! a report descriptor byte stream into its individual components.
//! Interpretation of the resulting [Item]s is left to the caller, the
//! [tree](crate::tree) module is one such caller.
//!
//! In this document and unless stated otherwise, a reference to "Section a.b.c" refers to the
//! [HID Device Class Definition for HID 1.11](https://www.usb.org/document-library/device-class-definition-hid-111).
//!
//! # Itemizing HID Report Descriptors
//!
//! Entry point is usually [`ReportDescriptorItems::try_from(bytes)`](ReportDescriptorItems::try_from):
//!
//! ```
//! # use hidtree::hid::*;
//! # use hidtree::types::*;
//! let bytes = [0x05, 0x01, 0x09, 0x06, 0xa1, 0x01, 0xc0];
//! let rdesc_items = ReportDescriptorItems::try_from(bytes.as_slice()).unwrap();
//! for rdesc_item in rdesc_items.iter() {
//!     println!("Item at offset {:02x}", rdesc_item.offset());
//!     let item = rdesc_item.item();
//!     match item.item_tag() {
//!         ItemTag::Main(MainTag::Collection) => println!("This is a collection"),
//!         _ => {}
//!     }
//! }
//! ```

use crate::types::*;
use crate::{ensure, ParserError};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HidError {
    #[error("Long item header {header:#04x} must have a size code of 2")]
    MalformedLongItem { header: u8 },
    #[error("Insufficient data: need {needed} bytes, have {available}")]
    InsufficientData { needed: usize, available: usize },
    #[error("Invalid data: {message}")]
    InvalidData { message: String },
}

type Result<T> = std::result::Result<T, HidError>;

/// Whether an item was encoded as Short Item (Section 6.2.2.2) or
/// Long Item (Section 6.2.2.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemFormat {
    Short,
    Long,
}

/// The `bType` of an item, the two bits after the size bits in the header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    Main,
    Global,
    Local,
    Reserved,
}

impl ItemType {
    fn from_header(header: u8) -> ItemType {
        match (header & 0b1100) >> 2 {
            0 => ItemType::Main,
            1 => ItemType::Global,
            2 => ItemType::Local,
            _ => ItemType::Reserved,
        }
    }
}

/// The tag of an [Item] resolved against its [ItemType].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemTag {
    Main(MainTag),
    Global(GlobalTag),
    Local(LocalTag),
    Reserved(u8),
}

/// The header byte of any long item, see Section 6.2.2.3.
pub const LONG_ITEM_HEADER: u8 = 0b11111110;

/// One item of a report descriptor, see Section 6.2.2.2 and 6.2.2.3.
///
/// Short items are 1 to 5 bytes, long items 3 to 258 bytes. An [Item]
/// owns a copy of its data bytes, it does not borrow from the report
/// descriptor it was decoded from.
///
/// Note that Section 6.2.2.3 states:
///
/// > **Important** No long item tags are defined in this document. These tags are
/// > reserved for future use. Tags xF0–xFF are vendor defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    format: ItemFormat,
    item_type: ItemType,
    tag: u8,
    payload: Vec<u8>,
}

impl Item {
    /// Whether this is a Short or a Long item.
    pub fn format(&self) -> ItemFormat {
        self.format
    }

    /// Returns true if this item is a Long Item (Section 6.2.2.3).
    pub fn is_long_item(&self) -> bool {
        self.format == ItemFormat::Long
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    /// The raw tag of this item. For short items this is the upper 4 bits
    /// of the header byte shifted down (0..=15), for long items this is
    /// the `bLongItemTag` byte (0..=255).
    pub fn tag(&self) -> u8 {
        self.tag
    }

    /// The tag resolved against the item type. Unknown tags map to
    /// the respective `Reserved` variant and keep their raw value.
    pub fn item_tag(&self) -> ItemTag {
        match self.item_type {
            ItemType::Main => ItemTag::Main(MainTag::from(self.tag)),
            ItemType::Global => ItemTag::Global(GlobalTag::from(self.tag)),
            ItemType::Local => ItemTag::Local(LocalTag::from(self.tag)),
            ItemType::Reserved => ItemTag::Reserved(self.tag),
        }
    }

    pub fn main_tag(&self) -> Option<MainTag> {
        match self.item_tag() {
            ItemTag::Main(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn global_tag(&self) -> Option<GlobalTag> {
        match self.item_tag() {
            ItemTag::Global(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn local_tag(&self) -> Option<LocalTag> {
        match self.item_tag() {
            ItemTag::Local(tag) => Some(tag),
            _ => None,
        }
    }

    /// The number of data bytes, 0, 1, 2 or 4 for short items
    /// and 0..=255 for long items.
    pub fn data_size(&self) -> usize {
        self.payload.len()
    }

    /// The data bytes as found in the report descriptor, without the header.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Convenience accessor for numeric conversions of [Self::payload].
    pub fn data(&self) -> ItemData<'_> {
        ItemData {
            bytes: &self.payload,
        }
    }

    /// The length of this item in bytes as encoded in the report descriptor,
    /// inclusive of the header. For short items this is the data size plus 1,
    /// for long items the data size plus 3 (header byte, `bDataSize`
    /// and `bLongItemTag`).
    pub fn encoded_len(&self) -> usize {
        match self.format {
            ItemFormat::Short => self.payload.len() + 1,
            ItemFormat::Long => self.payload.len() + 3,
        }
    }

    /// The collection type for a Collection item, `None` for any other item.
    /// A Collection item without data bytes is a Physical collection.
    pub fn collection_kind(&self) -> Option<CollectionKind> {
        match self.main_tag()? {
            MainTag::Collection => Some(self.payload.first().copied().unwrap_or(0).into()),
            _ => None,
        }
    }
}

impl TryFrom<&[u8]> for Item {
    type Error = HidError;

    /// Decode the item that starts at the first byte of `bytes`. Trailing
    /// bytes belong to subsequent items and are ignored.
    fn try_from(bytes: &[u8]) -> Result<Item> {
        let header = *bytes.first().ok_or(HidError::InsufficientData {
            needed: 1,
            available: 0,
        })?;
        let size = header & 0b11;
        let item_type = ItemType::from_header(header);
        let tag = (header & 0b11110000) >> 4;

        if tag == 0xF {
            ensure!(size == 2, HidError::MalformedLongItem { header });
            ensure!(
                bytes.len() >= 3,
                HidError::InsufficientData {
                    needed: 3,
                    available: bytes.len(),
                }
            );
            let data_size = bytes[1] as usize;
            let len = data_size + 3;
            ensure!(
                bytes.len() >= len,
                HidError::InsufficientData {
                    needed: len,
                    available: bytes.len(),
                }
            );
            return Ok(Item {
                format: ItemFormat::Long,
                item_type,
                tag: bytes[2],
                payload: bytes[3..len].to_vec(),
            });
        }

        let data_size = match size {
            0 => 0,
            1 => 1,
            2 => 2,
            _ => 4,
        };
        let len = data_size + 1;
        ensure!(
            bytes.len() >= len,
            HidError::InsufficientData {
                needed: len,
                available: bytes.len(),
            }
        );
        Ok(Item {
            format: ItemFormat::Short,
            item_type,
            tag,
            payload: bytes[1..len].to_vec(),
        })
    }
}

/// Decode the single item starting at `offset` in the report descriptor.
///
/// The consumed length is [Item::encoded_len]. Errors carry the
/// offset of the failing item.
pub fn decode_item(bytes: &[u8], offset: usize) -> crate::Result<Item> {
    let remaining = bytes.get(offset..).unwrap_or_default();
    Item::try_from(remaining).map_err(|e| match e {
        HidError::MalformedLongItem { header } => ParserError::MalformedItem { offset, header },
        HidError::InsufficientData { needed, available } => ParserError::BufferOverrun {
            offset,
            needed,
            available,
        },
        HidError::InvalidData { message } => ParserError::InvalidData { offset, message },
    })
}

/// Wraps the data bytes of a single [Item].
/// This struct mostly exists for convenience conversations, e.g.
///
///  ```
///  # use hidtree::hid::*;
///  # fn func(item: &Item) {
///  let value: u32 = u32::try_from(&item.data()).unwrap();
///  # }
///  ```
///
/// Zero data bytes convert to a value of 0. Data longer than 4 bytes (only
/// possible for long items) cannot be converted to a number.
#[derive(Debug, Clone, Copy)]
pub struct ItemData<'a> {
    bytes: &'a [u8],
}

impl std::ops::Deref for ItemData<'_> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.bytes
    }
}

impl TryFrom<&ItemData<'_>> for u32 {
    type Error = HidError;

    /// Converts the (little endian) data bytes into a u32.
    fn try_from(data: &ItemData) -> Result<u32> {
        match data.bytes {
            [] => Ok(0),
            [b0] => Ok(*b0 as u32),
            [b0, b1] => Ok(u16::from_le_bytes([*b0, *b1]) as u32),
            [b0, b1, b2, b3] => Ok(u32::from_le_bytes([*b0, *b1, *b2, *b3])),
            _ => Err(HidError::InvalidData {
                message: format!("Cannot convert {} bytes to u32", data.len()),
            }),
        }
    }
}

impl TryFrom<&ItemData<'_>> for i32 {
    type Error = HidError;

    /// Converts the (little endian) data bytes into a sign-extended i32,
    /// i.e. a single byte `0xff` is `-1`.
    fn try_from(data: &ItemData) -> Result<i32> {
        match data.bytes {
            [] => Ok(0),
            [b0] => Ok(*b0 as i8 as i32),
            [b0, b1] => Ok(i16::from_le_bytes([*b0, *b1]) as i32),
            [b0, b1, b2, b3] => Ok(i32::from_le_bytes([*b0, *b1, *b2, *b3])),
            _ => Err(HidError::InvalidData {
                message: format!("Cannot convert {} bytes to i32", data.len()),
            }),
        }
    }
}

impl TryFrom<&ItemData<'_>> for u16 {
    type Error = HidError;

    /// Converts the data bytes into a [u16]. This function throws an error if the data length
    /// is larger than 2.
    fn try_from(data: &ItemData) -> Result<u16> {
        match data.bytes {
            [] => Ok(0),
            [b0] => Ok(*b0 as u16),
            [b0, b1] => Ok(u16::from_le_bytes([*b0, *b1])),
            _ => Err(HidError::InvalidData {
                message: format!("Cannot convert {} bytes to u16", data.len()),
            }),
        }
    }
}

impl TryFrom<&ItemData<'_>> for u8 {
    type Error = HidError;

    /// Converts the data bytes into a [u8]. This function throws an error if the data length
    /// is larger than 1.
    fn try_from(data: &ItemData) -> Result<u8> {
        match data.bytes {
            [] => Ok(0),
            [b0] => Ok(*b0),
            _ => Err(HidError::InvalidData {
                message: format!("Cannot convert {} bytes to u8", data.len()),
            }),
        }
    }
}

#[cfg(feature = "hut")]
pub(crate) fn usage_page_name(usage_page: u16) -> String {
    hut::UsagePage::from_usage_page_value(usage_page)
        .map(|up| up.name())
        .unwrap_or_else(|_| format!("{usage_page:#06x}"))
}

#[cfg(not(feature = "hut"))]
pub(crate) fn usage_page_name(usage_page: u16) -> String {
    format!("{usage_page:#06x}")
}

#[cfg(feature = "hut")]
pub(crate) fn usage_name(usage_page: u16, usage_id: u16) -> String {
    hut::Usage::new_from_page_and_id(usage_page, usage_id)
        .map(|u| u.name())
        .unwrap_or_else(|_| format!("{usage_id:#06x}"))
}

#[cfg(not(feature = "hut"))]
pub(crate) fn usage_name(_usage_page: u16, usage_id: u16) -> String {
    format!("{usage_id:#06x}")
}

impl std::fmt::Display for Item {
    /// Prints the item the way `hid-decode` does, e.g. `Usage Page (Generic Desktop)`.
    /// Usage IDs cannot be named without the Usage Page from the global state and
    /// are printed as hex.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_long_item() {
            return write!(f, "Long Item ({:#04x}, {} bytes)", self.tag, self.data_size());
        }
        let data = self.data();
        let unsigned = u32::try_from(&data).unwrap_or_default();
        match self.item_tag() {
            ItemTag::Main(MainTag::Collection) => {
                let kind = self.collection_kind().unwrap_or(CollectionKind::Physical);
                write!(f, "Collection ({kind})")
            }
            ItemTag::Main(MainTag::EndCollection) => write!(f, "End Collection"),
            ItemTag::Main(tag) => write!(f, "{tag} ({unsigned:#x})"),
            ItemTag::Global(GlobalTag::UsagePage) => {
                write!(f, "Usage Page ({})", usage_page_name(unsigned as u16))
            }
            ItemTag::Global(tag @ (GlobalTag::Push | GlobalTag::Pop)) => write!(f, "{tag}"),
            ItemTag::Global(tag) if tag.is_signed() => {
                let signed = i32::try_from(&data).unwrap_or_default();
                write!(f, "{tag} ({signed})")
            }
            ItemTag::Global(tag) => write!(f, "{tag} ({unsigned})"),
            ItemTag::Local(LocalTag::Usage) if self.data_size() == 4 => {
                let usage_page = (unsigned >> 16) as u16;
                let usage_id = (unsigned & 0xffff) as u16;
                write!(
                    f,
                    "Usage ({}: {})",
                    usage_page_name(usage_page),
                    usage_name(usage_page, usage_id)
                )
            }
            ItemTag::Local(tag @ (LocalTag::Usage | LocalTag::UsageMinimum | LocalTag::UsageMaximum)) => {
                write!(f, "{tag} ({unsigned:#x})")
            }
            ItemTag::Local(tag) => write!(f, "{tag} ({unsigned})"),
            ItemTag::Reserved(tag) => write!(f, "Reserved ({tag:#x})"),
        }
    }
}

/// A single item in a parsed (but not yet interpreted) report descriptor.
#[derive(Debug, Clone)]
pub struct ReportDescriptorItem {
    offset: usize,
    item: Item,
}

impl ReportDescriptorItem {
    /// The offset of this item in the Report Descriptor it was extracted from.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The item that is this report descriptor item.
    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn into_item(self) -> Item {
        self.item
    }
}

/// A set of items extracted from a report descriptor byte array. This is the
/// result of parsing a report descriptor without *interpreting* it and
/// thus generally only useful to analyze the components of the report descriptor.
#[derive(Debug, Clone)]
pub struct ReportDescriptorItems {
    items: Vec<ReportDescriptorItem>,
}

impl std::ops::Deref for ReportDescriptorItems {
    type Target = [ReportDescriptorItem];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl IntoIterator for ReportDescriptorItems {
    type Item = ReportDescriptorItem;
    type IntoIter = std::vec::IntoIter<ReportDescriptorItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl TryFrom<&[u8]> for ReportDescriptorItems {
    type Error = ParserError;

    /// Attempts to itemize the given HID report descriptor into its
    /// set of [ReportDescriptorItem]s. Any malformed or truncated item
    /// fails the whole report descriptor.
    fn try_from(bytes: &[u8]) -> crate::Result<Self> {
        itemize(bytes)
    }
}

/// Split the HID Report Descriptor represented by bytes into its set of
/// items.
fn itemize(bytes: &[u8]) -> crate::Result<ReportDescriptorItems> {
    let mut offset = 0;
    let mut items: Vec<ReportDescriptorItem> = Vec::new();
    while offset < bytes.len() {
        let item = decode_item(bytes, offset)?;
        log::trace!(
            "{offset:#06x}: {:?} tag {:#x}, {} data bytes",
            item.item_type(),
            item.tag(),
            item.data_size()
        );
        let off = offset;
        offset += item.encoded_len();
        items.push(ReportDescriptorItem { offset: off, item });
    }
    Ok(ReportDescriptorItems { items })
}
