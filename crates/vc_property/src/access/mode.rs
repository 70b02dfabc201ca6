use core::fmt;

use crate::describe::Value;

/// The kind of operation an [`Accessor`](super::Accessor) performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessorMode {
    /// `() -> value`
    Get,
    /// `(value) -> ()`
    Set,
    /// `(index) -> element`
    GetIndexed,
    /// `(index, element) -> ()`
    SetIndexed,
    /// `([index], element) -> ()`
    AddIndexed,
    /// `(key) -> value`
    GetMapped,
    /// `(key, value) -> ()`, a null value removes the entry
    SetMapped,
    /// `() -> count`
    Size,
}

impl AccessorMode {
    pub const ALL: [Self; 8] = [
        Self::Get,
        Self::Set,
        Self::GetIndexed,
        Self::SetIndexed,
        Self::AddIndexed,
        Self::GetMapped,
        Self::SetMapped,
        Self::Size,
    ];

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Set => "SET",
            Self::GetIndexed => "GET_INDEXED",
            Self::SetIndexed => "SET_INDEXED",
            Self::AddIndexed => "ADD_INDEXED",
            Self::GetMapped => "GET_MAPPED",
            Self::SetMapped => "SET_MAPPED",
            Self::Size => "SIZE",
        }
    }

    /// Returns `true` for modes that never modify the target.
    #[inline]
    pub const fn is_read(self) -> bool {
        matches!(
            self,
            Self::Get | Self::GetIndexed | Self::GetMapped | Self::Size
        )
    }
}

impl fmt::Display for AccessorMode {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where an accessor came from.
///
/// Variants are ordered by precedence: when several accessors exist for the
/// same property and mode, the greatest origin wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessorOrigin {
    /// Synthesized from a container field's native operations.
    Fallback,
    /// Direct field access.
    Field,
    /// Declared on the [`DescriptorBuilder`](crate::describe::DescriptorBuilder)
    /// with a getter, setter or element function.
    Explicit,
}

/// Arguments for [`Accessor::invoke`](super::Accessor::invoke).
#[derive(Debug)]
pub enum Args<'a> {
    /// For [`AccessorMode::Get`] and [`AccessorMode::Size`].
    None,
    /// For [`AccessorMode::Set`].
    Value(Option<Value>),
    /// For [`AccessorMode::GetIndexed`].
    Index(usize),
    /// For [`AccessorMode::SetIndexed`].
    IndexValue(usize, Option<Value>),
    /// For [`AccessorMode::AddIndexed`]; `None` appends.
    Insert(Option<usize>, Value),
    /// For [`AccessorMode::GetMapped`].
    Key(&'a str),
    /// For [`AccessorMode::SetMapped`].
    KeyValue(&'a str, Option<Value>),
}
