// SPDX-License-Identifier: MIT

//! A collection of standalone HID types for the numeric codes found in a
//! report descriptor. These are thin wrappers around the raw `u8` values
//! and exist for type safety and readable matching.
//!
//! In this document and unless stated otherwise, a reference to "Section a.b.c" refers to the
//! [HID Device Class Definition for HID 1.11](https://www.usb.org/document-library/device-class-definition-hid-111).
//!
//! None of the tag types reject unknown codes. A code that has no assignment
//! in HID 1.11 converts into the `Reserved` variant and converts back into
//! the same code.

/// Creates a tag enum with one variant per `Name = value => "Display name"`
/// entry plus a `Reserved(u8)` catch-all, and the `u8` conversions in both
/// directions.
macro_rules! impl_tag {
    ($(#[$meta:meta])* $tipo:ident { $($variant:ident = $value:literal => $name:literal),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $tipo {
            $($variant,)*
            /// A tag without an assignment in HID 1.11, kept verbatim.
            Reserved(u8),
        }

        impl $tipo {
            /// The name of this tag as written in HID 1.11, e.g. "Usage Page".
            pub fn name(&self) -> &'static str {
                match self {
                    $($tipo::$variant => $name,)*
                    $tipo::Reserved(_) => "Reserved",
                }
            }
        }

        impl From<u8> for $tipo {
            fn from(v: u8) -> $tipo {
                match v {
                    $($value => $tipo::$variant,)*
                    v => $tipo::Reserved(v),
                }
            }
        }

        impl From<&$tipo> for u8 {
            fn from(t: &$tipo) -> u8 {
                match t {
                    $($tipo::$variant => $value,)*
                    $tipo::Reserved(v) => *v,
                }
            }
        }

        impl From<$tipo> for u8 {
            fn from(t: $tipo) -> u8 {
                u8::from(&t)
            }
        }

        impl std::fmt::Display for $tipo {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $tipo::Reserved(v) => write!(f, "Reserved ({v:#04x})"),
                    _ => write!(f, "{}", self.name()),
                }
            }
        }
    };
}

impl_tag!(
    /// Tags of a [Main item](crate::hid::ItemType::Main), see Section 6.2.2.4.
    MainTag {
        Input = 0x8 => "Input",
        Output = 0x9 => "Output",
        Collection = 0xA => "Collection",
        Feature = 0xB => "Feature",
        EndCollection = 0xC => "End Collection",
    }
);

impl_tag!(
    /// Tags of a [Global item](crate::hid::ItemType::Global), see Section 6.2.2.7.
    GlobalTag {
        UsagePage = 0x0 => "Usage Page",
        LogicalMinimum = 0x1 => "Logical Minimum",
        LogicalMaximum = 0x2 => "Logical Maximum",
        PhysicalMinimum = 0x3 => "Physical Minimum",
        PhysicalMaximum = 0x4 => "Physical Maximum",
        UnitExponent = 0x5 => "Unit Exponent",
        Unit = 0x6 => "Unit",
        ReportSize = 0x7 => "Report Size",
        ReportId = 0x8 => "Report ID",
        ReportCount = 0x9 => "Report Count",
        Push = 0xA => "Push",
        Pop = 0xB => "Pop",
    }
);

impl_tag!(
    /// Tags of a [Local item](crate::hid::ItemType::Local), see Section 6.2.2.8.
    LocalTag {
        Usage = 0x0 => "Usage",
        UsageMinimum = 0x1 => "Usage Minimum",
        UsageMaximum = 0x2 => "Usage Maximum",
        DesignatorIndex = 0x3 => "Designator Index",
        DesignatorMinimum = 0x4 => "Designator Minimum",
        DesignatorMaximum = 0x5 => "Designator Maximum",
        StringIndex = 0x7 => "String Index",
        StringMinimum = 0x8 => "String Minimum",
        StringMaximum = 0x9 => "String Maximum",
        Delimiter = 0xA => "Delimiter",
    }
);

impl GlobalTag {
    /// True for the Global items whose data is a signed value
    /// (Section 6.2.2.7 lists these as two's complement).
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            GlobalTag::LogicalMinimum
                | GlobalTag::LogicalMaximum
                | GlobalTag::PhysicalMinimum
                | GlobalTag::PhysicalMaximum
                | GlobalTag::UnitExponent
        )
    }
}

/// See Section 6.2.2.6. The type of a collection is the data byte of
/// the Collection item.
///
/// > A Collection item identifies a relationship between two or more data (Input,
/// > Output, or Feature.) For example, a mouse could be described as a collection of
/// > two to four data (x, y, button 1, button 2). While the Collection item opens a
/// > collection of data, the End Collection item closes a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Physical,
    Application,
    Logical,
    Report,
    NamedArray,
    UsageSwitch,
    UsageModifier,
    Reserved { value: u8 },
    VendorDefined { value: u8 },
}

impl From<u8> for CollectionKind {
    fn from(v: u8) -> CollectionKind {
        match v {
            0x00 => CollectionKind::Physical,
            0x01 => CollectionKind::Application,
            0x02 => CollectionKind::Logical,
            0x03 => CollectionKind::Report,
            0x04 => CollectionKind::NamedArray,
            0x05 => CollectionKind::UsageSwitch,
            0x06 => CollectionKind::UsageModifier,
            value @ 0x07..=0x7f => CollectionKind::Reserved { value },
            value @ 0x80..=0xff => CollectionKind::VendorDefined { value },
        }
    }
}

impl From<&CollectionKind> for u8 {
    fn from(c: &CollectionKind) -> u8 {
        match c {
            CollectionKind::Physical => 0x00,
            CollectionKind::Application => 0x01,
            CollectionKind::Logical => 0x02,
            CollectionKind::Report => 0x03,
            CollectionKind::NamedArray => 0x04,
            CollectionKind::UsageSwitch => 0x05,
            CollectionKind::UsageModifier => 0x06,
            CollectionKind::Reserved { value } => *value,
            CollectionKind::VendorDefined { value } => *value,
        }
    }
}

impl From<CollectionKind> for u8 {
    fn from(c: CollectionKind) -> u8 {
        u8::from(&c)
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectionKind::Physical => write!(f, "Physical"),
            CollectionKind::Application => write!(f, "Application"),
            CollectionKind::Logical => write!(f, "Logical"),
            CollectionKind::Report => write!(f, "Report"),
            CollectionKind::NamedArray => write!(f, "Named Array"),
            CollectionKind::UsageSwitch => write!(f, "Usage Switch"),
            CollectionKind::UsageModifier => write!(f, "Usage Modifier"),
            CollectionKind::Reserved { value } => write!(f, "Reserved {value:#04x}"),
            CollectionKind::VendorDefined { value } => write!(f, "Vendor Defined {value:#04x}"),
        }
    }
}
