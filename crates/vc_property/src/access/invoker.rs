use alloc::boxed::Box;
use alloc::sync::Arc;

use crate::BoxError;
use crate::describe::{Describe, Inspect, Slot, TypeTag, Value};

// -----------------------------------------------------------------------------
// Fault

/// A failure below the accessor, before property context is attached.
pub(crate) enum Fault {
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },
    Null {
        expected: &'static str,
    },
    OutOfRange {
        index: usize,
        len: usize,
    },
    Target(BoxError),
}

impl Fault {
    #[inline]
    pub fn target(err: impl Into<BoxError>) -> Self {
        Self::Target(err.into())
    }
}

#[inline]
pub(crate) fn owner<T: Describe>(target: &dyn Inspect) -> Result<&T, Fault> {
    target.downcast_ref::<T>().ok_or_else(|| Fault::Mismatch {
        expected: core::any::type_name::<T>(),
        found: target.type_tag().name(),
    })
}

#[inline]
pub(crate) fn owner_mut<T: Describe>(target: &mut dyn Inspect) -> Result<&mut T, Fault> {
    let found = target.type_tag().name();
    target.downcast_mut::<T>().ok_or(Fault::Mismatch {
        expected: core::any::type_name::<T>(),
        found,
    })
}

#[inline]
pub(crate) fn argument<V: Describe>(value: Value) -> Result<V, Fault> {
    value.downcast::<V>().map_err(|value| Fault::Mismatch {
        expected: core::any::type_name::<V>(),
        found: value.type_tag().name(),
    })
}

// -----------------------------------------------------------------------------
// Field access

/// Type-erased projection from an owner to one of its fields.
pub(crate) trait FieldAccess: Send + Sync {
    fn declared(&self) -> TypeTag;

    fn read<'a>(&self, owner: &'a dyn Inspect) -> Result<Option<&'a dyn Inspect>, Fault>;

    fn read_mut<'a>(&self, owner: &'a mut dyn Inspect)
    -> Result<Option<&'a mut dyn Inspect>, Fault>;

    fn write(&self, owner: &mut dyn Inspect, value: Option<Value>) -> Result<(), Fault>;
}

pub(crate) struct FieldSlot<T, S> {
    pub get: fn(&T) -> &S,
    pub get_mut: fn(&mut T) -> &mut S,
}

impl<T: Describe, S: Slot> FieldAccess for FieldSlot<T, S> {
    #[inline]
    fn declared(&self) -> TypeTag {
        TypeTag::of::<S::Target>()
    }

    fn read<'a>(&self, owner: &'a dyn Inspect) -> Result<Option<&'a dyn Inspect>, Fault> {
        let this = self::owner::<T>(owner)?;
        Ok((self.get)(this).get().map(|v| v as &dyn Inspect))
    }

    fn read_mut<'a>(
        &self,
        owner: &'a mut dyn Inspect,
    ) -> Result<Option<&'a mut dyn Inspect>, Fault> {
        let this = owner_mut::<T>(owner)?;
        Ok((self.get_mut)(this).get_mut().map(|v| v as &mut dyn Inspect))
    }

    fn write(&self, owner: &mut dyn Inspect, value: Option<Value>) -> Result<(), Fault> {
        let value = value.map(argument::<S::Target>).transpose()?;
        let this = owner_mut::<T>(owner)?;
        (self.get_mut)(this).put(value).map_err(|_| Fault::Null {
            expected: core::any::type_name::<S::Target>(),
        })
    }
}

// -----------------------------------------------------------------------------
// Invoker

pub(crate) type GetFn = Arc<dyn Fn(&dyn Inspect) -> Result<Option<Value>, Fault> + Send + Sync>;
pub(crate) type SetFn =
    Arc<dyn Fn(&mut dyn Inspect, Option<Value>) -> Result<(), Fault> + Send + Sync>;
pub(crate) type GetIndexedFn =
    Box<dyn Fn(&dyn Inspect, usize) -> Result<Option<Value>, Fault> + Send + Sync>;
pub(crate) type SetIndexedFn =
    Box<dyn Fn(&mut dyn Inspect, usize, Option<Value>) -> Result<(), Fault> + Send + Sync>;
pub(crate) type AddFn = Box<dyn Fn(&mut dyn Inspect, Value) -> Result<(), Fault> + Send + Sync>;
pub(crate) type GetMappedFn =
    Box<dyn Fn(&dyn Inspect, &str) -> Result<Option<Value>, Fault> + Send + Sync>;
pub(crate) type SetMappedFn =
    Box<dyn Fn(&mut dyn Inspect, &str, Option<Value>) -> Result<(), Fault> + Send + Sync>;
pub(crate) type SizeFn = Box<dyn Fn(&dyn Inspect) -> Result<usize, Fault> + Send + Sync>;

/// How an accessor reaches its value.
pub(crate) enum Invoker {
    Get(GetFn),
    Set(SetFn),
    GetIndexed(GetIndexedFn),
    SetIndexed(SetIndexedFn),
    Add(AddFn),
    GetMapped(GetMappedFn),
    SetMapped(SetMappedFn),
    Size(SizeFn),
    /// Direct read or write of a field.
    Field(Arc<dyn FieldAccess>),
    /// List operations on a field holding a list.
    List(Arc<dyn FieldAccess>),
    /// Map operations on a field holding a map.
    Map(Arc<dyn FieldAccess>),
    /// Container operations on the value of an explicit getter.
    Through(RoundTrip),
}

/// A container read through a getter and written back through a setter.
///
/// Writes copy the container out, change the copy and hand it to `set`.
#[derive(Clone)]
pub(crate) struct RoundTrip {
    pub declared: TypeTag,
    pub get: GetFn,
    pub set: Option<SetFn>,
}
