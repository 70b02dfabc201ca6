use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::describe::{Describe, TypeDescription};

/// The container shape of a type, as far as path navigation cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContainerKind {
    /// Not a container, or a container navigation does not index into.
    #[default]
    None,
    /// Ordered, indexable by position. See [`ListAccess`](crate::container::ListAccess).
    List,
    /// Keyed by string. See [`MapAccess`](crate::container::MapAccess).
    Map,
}

impl ContainerKind {
    #[inline]
    pub const fn is_container(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// A runtime type token.
///
/// Equality and hashing only consider the [`TypeId`]; the remaining fields are
/// derived from it and exist so the registry can describe and instantiate the
/// type without knowing it statically.
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
    container: ContainerKind,
    element: fn() -> Option<TypeTag>,
    description: fn() -> TypeDescription,
}

impl TypeTag {
    /// Returns the tag of `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_property::describe::{ContainerKind, TypeTag};
    ///
    /// let tag = TypeTag::of::<Vec<u32>>();
    /// assert_eq!(tag.container(), ContainerKind::List);
    /// assert_eq!(tag.element(), Some(TypeTag::of::<u32>()));
    /// assert!(tag.is::<Vec<u32>>());
    /// ```
    #[inline]
    pub fn of<T: Describe>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: core::any::type_name::<T>(),
            container: T::container_kind(),
            element: T::element_type,
            description: TypeDescription::of::<T>,
        }
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The full type name, as reported by [`core::any::type_name`].
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn container(&self) -> ContainerKind {
        self.container
    }

    /// The element type of a list, or the value type of a map.
    #[inline]
    pub fn element(&self) -> Option<TypeTag> {
        (self.element)()
    }

    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Collects the property candidates of the type.
    #[inline]
    pub(crate) fn description(&self) -> TypeDescription {
        (self.description)()
    }
}

impl PartialEq for TypeTag {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeTag").field(&self.name).finish()
    }
}

impl fmt::Display for TypeTag {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
