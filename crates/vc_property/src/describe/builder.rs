use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::convert::Infallible;
use core::fmt;
use core::marker::PhantomData;

use crate::BoxError;
use crate::access::{
    AccessorMode, AddFn, Fault, FieldAccess, FieldSlot, GetFn, GetIndexedFn, GetMappedFn, Invoker,
    SetFn, SetIndexedFn, SetMappedFn, SizeFn, argument, owner, owner_mut,
};
use crate::describe::{Describe, Inspect, Slot, TypeTag, Value};

// -----------------------------------------------------------------------------
// Candidates

/// How a candidate's name maps to a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NameForm {
    /// The name is the property name.
    Plain,
    /// The name is the singular of a collection property, e.g. `item` for `items`.
    Singular,
}

pub(crate) enum CandidateKind {
    Field {
        access: Arc<dyn FieldAccess>,
        writable: bool,
    },
    Explicit {
        mode: AccessorMode,
        value_type: TypeTag,
        invoker: Invoker,
    },
}

/// An accessor candidate before the registry resolves it into a property.
pub(crate) struct Candidate {
    pub name: &'static str,
    pub form: NameForm,
    pub kind: CandidateKind,
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Candidate");
        s.field("name", &self.name).field("form", &self.form);
        match &self.kind {
            CandidateKind::Field { access, writable } => s
                .field("declared", &access.declared())
                .field("writable", writable),
            CandidateKind::Explicit {
                mode, value_type, ..
            } => s.field("mode", mode).field("value_type", value_type),
        };
        s.finish()
    }
}

// -----------------------------------------------------------------------------
// TypeDescription

/// The unresolved property candidates of one type.
///
/// Produced by [`Describe::describe`] through a [`DescriptorBuilder`] and
/// resolved into a [`TypeDescriptor`](crate::descriptor::TypeDescriptor) by
/// the registry.
pub struct TypeDescription {
    tag: TypeTag,
    candidates: Vec<Candidate>,
    constructor: fn() -> Option<Value>,
}

fn construct<T: Describe>() -> Option<Value> {
    T::default_instance().map(Value::new)
}

impl TypeDescription {
    /// Runs `T::describe` on a fresh builder.
    pub fn of<T: Describe>() -> Self {
        let mut builder = DescriptorBuilder::<T>::new();
        T::describe(&mut builder);
        Self {
            tag: TypeTag::of::<T>(),
            candidates: builder.candidates,
            constructor: construct::<T>,
        }
    }

    #[inline]
    pub fn type_tag(&self) -> TypeTag {
        self.tag
    }

    /// Number of declared candidates.
    #[inline]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    #[inline]
    pub(crate) fn into_parts(self) -> (TypeTag, Vec<Candidate>, fn() -> Option<Value>) {
        (self.tag, self.candidates, self.constructor)
    }
}

impl fmt::Debug for TypeDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescription")
            .field("tag", &self.tag)
            .field("candidates", &self.candidates)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// DescriptorBuilder

/// Collects the accessor candidates of `T`.
///
/// Field candidates are traversable: navigation can step through them into
/// nested values. Explicit candidates (getters, setters and element
/// functions) run user code and take precedence over field access. A path
/// that may mutate can only end at a computed getter. Read-only paths walk
/// on through a copy of its value.
///
/// A list or map returned by a getter gets element and size fallbacks that
/// read through the getter. A setter of the same type adds write fallbacks,
/// which write a changed copy back through it.
///
/// `adder` and `counter` take the *singular* name of a collection property;
/// the registry attaches them to the plural property when it exists.
///
/// # Examples
///
/// ```
/// use vc_property::describe::{Describe, DescriptorBuilder};
///
/// #[derive(Clone, Default)]
/// struct Playlist {
///     title: String,
///     tracks: Vec<String>,
/// }
///
/// impl Describe for Playlist {
///     fn describe(builder: &mut DescriptorBuilder<Self>) {
///         builder
///             .read_only_field::<String>("title", |p| &p.title, |p| &mut p.title)
///             .field::<Vec<String>>("tracks", |p| &p.tracks, |p| &mut p.tracks)
///             .adder("track", |p: &mut Self, t: String| p.tracks.push(t.to_uppercase()))
///             .counter("track", |p: &Self| p.tracks.len());
///     }
/// }
/// ```
pub struct DescriptorBuilder<T: Describe> {
    candidates: Vec<Candidate>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Describe> DescriptorBuilder<T> {
    #[inline]
    fn new() -> Self {
        Self {
            candidates: Vec::new(),
            _marker: PhantomData,
        }
    }

    fn push_field<S: Slot>(
        &mut self,
        name: &'static str,
        get: fn(&T) -> &S,
        get_mut: fn(&mut T) -> &mut S,
        writable: bool,
    ) -> &mut Self {
        let access: Arc<dyn FieldAccess> = Arc::new(FieldSlot { get, get_mut });
        self.candidates.push(Candidate {
            name,
            form: NameForm::Plain,
            kind: CandidateKind::Field { access, writable },
        });
        self
    }

    fn push_explicit(
        &mut self,
        name: &'static str,
        form: NameForm,
        mode: AccessorMode,
        value_type: TypeTag,
        invoker: Invoker,
    ) -> &mut Self {
        self.candidates.push(Candidate {
            name,
            form,
            kind: CandidateKind::Explicit {
                mode,
                value_type,
                invoker,
            },
        });
        self
    }

    // -------------------------------------------------------------------------
    // Fields

    /// Declares a readable and writable field.
    ///
    /// For container fields the registry also synthesizes indexed or mapped
    /// fallback accessors.
    #[inline]
    pub fn field<S: Slot>(
        &mut self,
        name: &'static str,
        get: fn(&T) -> &S,
        get_mut: fn(&mut T) -> &mut S,
    ) -> &mut Self {
        self.push_field(name, get, get_mut, true)
    }

    /// Declares a field without a SET accessor.
    ///
    /// `get_mut` is still needed: navigation mutates through the field, and
    /// container fallbacks modify the container in place.
    #[inline]
    pub fn read_only_field<S: Slot>(
        &mut self,
        name: &'static str,
        get: fn(&T) -> &S,
        get_mut: fn(&mut T) -> &mut S,
    ) -> &mut Self {
        self.push_field(name, get, get_mut, false)
    }

    // -------------------------------------------------------------------------
    // Getter & Setter

    /// Declares a computed GET accessor.
    pub fn getter<V: Describe>(
        &mut self,
        name: &'static str,
        f: impl Fn(&T) -> Option<V> + Send + Sync + 'static,
    ) -> &mut Self {
        self.try_getter(name, move |this: &T| Ok::<_, Infallible>(f(this)))
    }

    /// Declares a fallible GET accessor. Errors surface as
    /// [`TargetInvocationFailure`](crate::PropertyErrorKind::TargetInvocationFailure).
    pub fn try_getter<V: Describe, E: Into<BoxError>>(
        &mut self,
        name: &'static str,
        f: impl Fn(&T) -> Result<Option<V>, E> + Send + Sync + 'static,
    ) -> &mut Self {
        let get: GetFn = Arc::new(move |target: &dyn Inspect| {
            let this = owner::<T>(target)?;
            f(this).map(|v| v.map(Value::new)).map_err(Fault::target)
        });
        self.push_explicit(
            name,
            NameForm::Plain,
            AccessorMode::Get,
            TypeTag::of::<V>(),
            Invoker::Get(get),
        )
    }

    /// Declares a SET accessor. The setter receives `None` for a null write.
    pub fn setter<V: Describe>(
        &mut self,
        name: &'static str,
        f: impl Fn(&mut T, Option<V>) + Send + Sync + 'static,
    ) -> &mut Self {
        self.try_setter(name, move |this: &mut T, value: Option<V>| {
            f(this, value);
            Ok::<_, Infallible>(())
        })
    }

    /// Declares a fallible SET accessor.
    pub fn try_setter<V: Describe, E: Into<BoxError>>(
        &mut self,
        name: &'static str,
        f: impl Fn(&mut T, Option<V>) -> Result<(), E> + Send + Sync + 'static,
    ) -> &mut Self {
        let set: SetFn = Arc::new(move |target: &mut dyn Inspect, value: Option<Value>| {
            let value = value.map(argument::<V>).transpose()?;
            let this = owner_mut::<T>(target)?;
            f(this, value).map_err(Fault::target)
        });
        self.push_explicit(
            name,
            NameForm::Plain,
            AccessorMode::Set,
            TypeTag::of::<V>(),
            Invoker::Set(set),
        )
    }

    // -------------------------------------------------------------------------
    // Element accessors

    /// Declares a GET_INDEXED accessor.
    pub fn indexed_getter<V: Describe>(
        &mut self,
        name: &'static str,
        f: impl Fn(&T, usize) -> Option<V> + Send + Sync + 'static,
    ) -> &mut Self {
        let get: GetIndexedFn = Box::new(move |target: &dyn Inspect, index: usize| {
            let this = owner::<T>(target)?;
            Ok(f(this, index).map(Value::new))
        });
        self.push_explicit(
            name,
            NameForm::Plain,
            AccessorMode::GetIndexed,
            TypeTag::of::<V>(),
            Invoker::GetIndexed(get),
        )
    }

    /// Declares a SET_INDEXED accessor.
    pub fn indexed_setter<V: Describe>(
        &mut self,
        name: &'static str,
        f: impl Fn(&mut T, usize, V) + Send + Sync + 'static,
    ) -> &mut Self {
        let set: SetIndexedFn = Box::new(
            move |target: &mut dyn Inspect, index: usize, value: Option<Value>| {
                let Some(value) = value else {
                    return Err(Fault::Null {
                        expected: core::any::type_name::<V>(),
                    });
                };
                let value = argument::<V>(value)?;
                f(owner_mut::<T>(target)?, index, value);
                Ok(())
            },
        );
        self.push_explicit(
            name,
            NameForm::Plain,
            AccessorMode::SetIndexed,
            TypeTag::of::<V>(),
            Invoker::SetIndexed(set),
        )
    }

    /// Declares an appending ADD_INDEXED accessor under the singular name.
    pub fn adder<V: Describe>(
        &mut self,
        singular: &'static str,
        f: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> &mut Self {
        let add: AddFn = Box::new(move |target: &mut dyn Inspect, value: Value| {
            let value = argument::<V>(value)?;
            f(owner_mut::<T>(target)?, value);
            Ok(())
        });
        self.push_explicit(
            singular,
            NameForm::Singular,
            AccessorMode::AddIndexed,
            TypeTag::of::<V>(),
            Invoker::Add(add),
        )
    }

    /// Declares a SIZE accessor under the singular name.
    pub fn counter(
        &mut self,
        singular: &'static str,
        f: impl Fn(&T) -> usize + Send + Sync + 'static,
    ) -> &mut Self {
        self.push_size(singular, NameForm::Singular, f)
    }

    /// Declares a SIZE accessor under the property name.
    pub fn sizer(
        &mut self,
        name: &'static str,
        f: impl Fn(&T) -> usize + Send + Sync + 'static,
    ) -> &mut Self {
        self.push_size(name, NameForm::Plain, f)
    }

    fn push_size(
        &mut self,
        name: &'static str,
        form: NameForm,
        f: impl Fn(&T) -> usize + Send + Sync + 'static,
    ) -> &mut Self {
        let size: SizeFn = Box::new(move |target: &dyn Inspect| Ok(f(owner::<T>(target)?)));
        self.push_explicit(
            name,
            form,
            AccessorMode::Size,
            TypeTag::of::<usize>(),
            Invoker::Size(size),
        )
    }

    /// Declares a GET_MAPPED accessor.
    pub fn mapped_getter<V: Describe>(
        &mut self,
        name: &'static str,
        f: impl Fn(&T, &str) -> Option<V> + Send + Sync + 'static,
    ) -> &mut Self {
        let get: GetMappedFn = Box::new(move |target: &dyn Inspect, key: &str| {
            let this = owner::<T>(target)?;
            Ok(f(this, key).map(Value::new))
        });
        self.push_explicit(
            name,
            NameForm::Plain,
            AccessorMode::GetMapped,
            TypeTag::of::<V>(),
            Invoker::GetMapped(get),
        )
    }

    /// Declares a SET_MAPPED accessor. `None` requests removal of the key.
    pub fn mapped_setter<V: Describe>(
        &mut self,
        name: &'static str,
        f: impl Fn(&mut T, &str, Option<V>) + Send + Sync + 'static,
    ) -> &mut Self {
        let set: SetMappedFn = Box::new(
            move |target: &mut dyn Inspect, key: &str, value: Option<Value>| {
                let value = value.map(argument::<V>).transpose()?;
                f(owner_mut::<T>(target)?, key, value);
                Ok(())
            },
        );
        self.push_explicit(
            name,
            NameForm::Plain,
            AccessorMode::SetMapped,
            TypeTag::of::<V>(),
            Invoker::SetMapped(set),
        )
    }
}
