use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::access::{Accessor, AccessorMode, AccessorOrigin};
use crate::describe::{ContainerKind, TypeTag};

/// All accessors discovered for one property name on one type.
///
/// Accessors are kept sorted by mode and then by descending precedence, so
/// [`accessor`](Self::accessor) always returns the winning one.
#[derive(Debug)]
pub struct PropertyDescriptor {
    name: Box<str>,
    value_type: Option<TypeTag>,
    accessors: Box<[Accessor]>,
}

impl PropertyDescriptor {
    pub(crate) fn new(
        name: Box<str>,
        value_type: Option<TypeTag>,
        mut accessors: Vec<Accessor>,
    ) -> Self {
        accessors.sort_by(|a, b| {
            a.mode()
                .cmp(&b.mode())
                .then_with(|| b.origin().cmp(&a.origin()))
        });
        Self {
            name,
            value_type,
            accessors: accessors.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type of the property.
    ///
    /// `None` for properties that only have element or size accessors.
    #[inline]
    pub fn value_type(&self) -> Option<TypeTag> {
        self.value_type
    }

    #[inline]
    pub fn container_kind(&self) -> ContainerKind {
        self.value_type.map_or(ContainerKind::None, |tag| tag.container())
    }

    /// The winning accessor for `mode`, if the property supports it.
    #[inline]
    pub fn accessor(&self, mode: AccessorMode) -> Option<&Accessor> {
        self.accessors.iter().find(|a| a.mode() == mode)
    }

    /// The highest ranked accessor for `mode` that navigation can step through.
    #[inline]
    pub fn traversal_accessor(&self, mode: AccessorMode) -> Option<&Accessor> {
        self.accessors
            .iter()
            .find(|a| a.mode() == mode && a.can_traverse())
    }

    /// The accessor for `mode` with the given origin.
    #[inline]
    pub fn accessor_from(&self, mode: AccessorMode, origin: AccessorOrigin) -> Option<&Accessor> {
        self.accessors
            .iter()
            .find(|a| a.mode() == mode && a.origin() == origin)
    }

    #[inline]
    pub fn supports(&self, mode: AccessorMode) -> bool {
        self.accessor(mode).is_some()
    }

    /// The supported modes, in [`AccessorMode`] order.
    pub fn modes(&self) -> impl Iterator<Item = AccessorMode> + '_ {
        AccessorMode::ALL
            .into_iter()
            .filter(|&mode| self.supports(mode))
    }

    /// Every accessor, including the ones shadowed by higher precedence.
    #[inline]
    pub fn accessors(&self) -> &[Accessor] {
        &self.accessors
    }
}
