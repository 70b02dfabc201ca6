use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::container::{ListAccess, MapAccess};
use crate::describe::{ContainerKind, DescriptorBuilder, TypeTag, Value};

// -----------------------------------------------------------------------------
// Describe

/// A type whose properties can be discovered and navigated.
///
/// Usually implemented through `#[derive(Describe)]`, which declares one field
/// candidate per named field. Manual implementations register candidates on
/// the [`DescriptorBuilder`], which is also how explicit getters, setters and
/// element accessors are declared.
///
/// # Examples
///
/// ```
/// use vc_property::describe::{Describe, DescriptorBuilder};
///
/// #[derive(Clone, Default)]
/// struct Celsius(f64);
///
/// impl Describe for Celsius {
///     fn describe(builder: &mut DescriptorBuilder<Self>) {
///         builder
///             .field::<f64>("celsius", |this| &this.0, |this| &mut this.0)
///             .getter("fahrenheit", |this: &Self| Some(this.0 * 1.8 + 32.0));
///     }
///
///     fn default_instance() -> Option<Self> {
///         Some(Self::default())
///     }
/// }
/// ```
pub trait Describe: Clone + Send + Sync + 'static {
    /// Declares the property candidates of this type.
    fn describe(builder: &mut DescriptorBuilder<Self>) {
        let _ = builder;
    }

    /// A fresh instance used when navigation materializes a null value.
    ///
    /// `None` means the type cannot be instantiated without arguments.
    fn default_instance() -> Option<Self> {
        None
    }

    #[inline]
    fn container_kind() -> ContainerKind {
        ContainerKind::None
    }

    /// Element type of a list, or value type of a map.
    #[inline]
    fn element_type() -> Option<TypeTag> {
        None
    }

    #[inline]
    fn list_view(&self) -> Option<&dyn ListAccess> {
        None
    }

    #[inline]
    fn list_view_mut(&mut self) -> Option<&mut dyn ListAccess> {
        None
    }

    #[inline]
    fn map_view(&self) -> Option<&dyn MapAccess> {
        None
    }

    #[inline]
    fn map_view_mut(&mut self) -> Option<&mut dyn MapAccess> {
        None
    }
}

// -----------------------------------------------------------------------------
// Inspect

/// The object-safe face of [`Describe`].
///
/// Implemented for every `T: Describe`; navigation works on `&dyn Inspect`
/// so that nested values of unrelated types can be walked uniformly.
pub trait Inspect: Any + Send + Sync {
    fn type_tag(&self) -> TypeTag;

    fn clone_value(&self) -> Value;

    fn as_list(&self) -> Option<&dyn ListAccess>;

    fn as_list_mut(&mut self) -> Option<&mut dyn ListAccess>;

    fn as_map(&self) -> Option<&dyn MapAccess>;

    fn as_map_mut(&mut self) -> Option<&mut dyn MapAccess>;
}

impl<T: Describe> Inspect for T {
    #[inline]
    fn type_tag(&self) -> TypeTag {
        TypeTag::of::<T>()
    }

    #[inline]
    fn clone_value(&self) -> Value {
        Value::from_boxed(Box::new(self.clone()))
    }

    #[inline]
    fn as_list(&self) -> Option<&dyn ListAccess> {
        self.list_view()
    }

    #[inline]
    fn as_list_mut(&mut self) -> Option<&mut dyn ListAccess> {
        self.list_view_mut()
    }

    #[inline]
    fn as_map(&self) -> Option<&dyn MapAccess> {
        self.map_view()
    }

    #[inline]
    fn as_map_mut(&mut self) -> Option<&mut dyn MapAccess> {
        self.map_view_mut()
    }
}

impl dyn Inspect {
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }
}

impl fmt::Debug for dyn Inspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dyn Inspect<{}>", self.type_tag().name())
    }
}
