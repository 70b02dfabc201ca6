use alloc::boxed::Box;
use core::fmt;

use crate::access::invoker::{Fault, FieldAccess, Invoker, RoundTrip};
use crate::access::{AccessorMode, AccessorOrigin, Args};
use crate::container::{ListAccess, MapAccess};
use crate::describe::{Inspect, TypeTag, Value};
use crate::{PropertyError, PropertyErrorKind, PropertyResult};

// -----------------------------------------------------------------------------
// Step

/// How a traversal reaches a child through an accessor.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Step<'k> {
    Field,
    Index(usize),
    Key(&'k str),
}

// -----------------------------------------------------------------------------
// Accessor

/// A capability bound to one (type, property, mode) triple.
///
/// Accessors are created by the registry during discovery and are immutable
/// afterwards. Each typed method checks that it matches [`mode`](Self::mode)
/// and fails with [`AccessorNotApplicable`] otherwise.
///
/// Failures raised by user code are reported as [`TargetInvocationFailure`];
/// every other failure is detected before user code runs.
///
/// # Examples
///
/// ```
/// use vc_property::prelude::*;
///
/// #[derive(Clone, Describe)]
/// struct Server { port: Option<u16> }
///
/// let registry = DescriptorRegistry::new();
/// let descriptor = registry.descriptor_of::<Server>().unwrap();
/// let get = descriptor.get_accessor("port", AccessorMode::Get, true).unwrap().unwrap();
///
/// let server = Server { port: Some(8080) };
/// let port = get.get(&server).unwrap().unwrap();
/// assert_eq!(port.downcast_ref::<u16>(), Some(&8080));
/// ```
///
/// [`AccessorNotApplicable`]: PropertyErrorKind::AccessorNotApplicable
/// [`TargetInvocationFailure`]: PropertyErrorKind::TargetInvocationFailure
pub struct Accessor {
    owner: TypeTag,
    property: Box<str>,
    mode: AccessorMode,
    origin: AccessorOrigin,
    value_type: TypeTag,
    invoker: Invoker,
}

impl Accessor {
    #[inline]
    pub(crate) fn new(
        owner: TypeTag,
        property: Box<str>,
        mode: AccessorMode,
        origin: AccessorOrigin,
        value_type: TypeTag,
        invoker: Invoker,
    ) -> Self {
        Self {
            owner,
            property,
            mode,
            origin,
            value_type,
            invoker,
        }
    }

    /// The type declaring the property.
    #[inline]
    pub fn owner(&self) -> TypeTag {
        self.owner
    }

    #[inline]
    pub fn property(&self) -> &str {
        &self.property
    }

    #[inline]
    pub fn mode(&self) -> AccessorMode {
        self.mode
    }

    #[inline]
    pub fn origin(&self) -> AccessorOrigin {
        self.origin
    }

    /// The type of the value read or written.
    ///
    /// For indexed and mapped modes this is the element type, and for
    /// [`AccessorMode::Size`] it is `usize`.
    #[inline]
    pub fn value_type(&self) -> TypeTag {
        self.value_type
    }

    #[inline]
    pub(crate) fn invoker(&self) -> &Invoker {
        &self.invoker
    }

    /// Whether navigation can step through this accessor to reach a child.
    ///
    /// Only field-backed read accessors can lend a child in place. Computed
    /// getters produce owned values, which read-only navigation walks as copies.
    #[inline]
    pub fn can_traverse(&self) -> bool {
        match self.invoker {
            Invoker::Field(_) => self.mode == AccessorMode::Get,
            Invoker::List(_) => self.mode == AccessorMode::GetIndexed,
            Invoker::Map(_) => self.mode == AccessorMode::GetMapped,
            _ => false,
        }
    }

    // -------------------------------------------------------------------------
    // Errors

    pub(crate) fn not_applicable(&self, mode: AccessorMode) -> PropertyError {
        PropertyErrorKind::AccessorNotApplicable {
            type_name: self.owner.name(),
            property: self.property.clone(),
            mode,
        }
        .into()
    }

    fn fail(&self, fault: Fault) -> PropertyError {
        match fault {
            Fault::Mismatch { expected, found } => {
                PropertyErrorKind::TypeMismatch { expected, found }
            }
            Fault::Null { expected } => PropertyErrorKind::TypeMismatch {
                expected,
                found: "null",
            },
            Fault::OutOfRange { index, len } => PropertyErrorKind::IndexOutOfRange {
                property: self.property.clone(),
                index,
                len,
            },
            Fault::Target(source) => PropertyErrorKind::TargetInvocationFailure {
                type_name: self.owner.name(),
                property: self.property.clone(),
                mode: self.mode,
                source,
            },
        }
        .into()
    }

    #[inline]
    fn lift<T>(&self, result: Result<T, Fault>) -> PropertyResult<T> {
        result.map_err(|fault| self.fail(fault))
    }

    #[inline]
    fn expect(&self, mode: AccessorMode) -> PropertyResult<()> {
        if self.mode == mode {
            Ok(())
        } else {
            Err(self.not_applicable(mode))
        }
    }

    #[inline]
    fn bounds(&self, index: usize, len: usize) -> PropertyResult<()> {
        if index < len {
            Ok(())
        } else {
            Err(self.fail(Fault::OutOfRange { index, len }))
        }
    }

    fn not_container(&self, expected: &'static str, found: TypeTag) -> PropertyError {
        self.fail(Fault::Mismatch {
            expected,
            found: found.name(),
        })
    }

    // -------------------------------------------------------------------------
    // Container views

    fn list<'a>(
        &self,
        field: &dyn FieldAccess,
        target: &'a dyn Inspect,
    ) -> PropertyResult<Option<&'a dyn ListAccess>> {
        match self.lift(field.read(target))? {
            None => Ok(None),
            Some(container) => self.view_list(container).map(Some),
        }
    }

    fn list_mut<'a>(
        &self,
        field: &dyn FieldAccess,
        target: &'a mut dyn Inspect,
    ) -> PropertyResult<&'a mut dyn ListAccess> {
        let Some(container) = self.lift(field.read_mut(target))? else {
            return Err(self.fail(Fault::Null {
                expected: field.declared().name(),
            }));
        };
        let found = container.type_tag();
        container
            .as_list_mut()
            .ok_or_else(|| self.not_container("list", found))
    }

    fn map<'a>(
        &self,
        field: &dyn FieldAccess,
        target: &'a dyn Inspect,
    ) -> PropertyResult<Option<&'a dyn MapAccess>> {
        match self.lift(field.read(target))? {
            None => Ok(None),
            Some(container) => self.view_map(container).map(Some),
        }
    }

    fn map_mut<'a>(
        &self,
        field: &dyn FieldAccess,
        target: &'a mut dyn Inspect,
    ) -> PropertyResult<&'a mut dyn MapAccess> {
        let Some(container) = self.lift(field.read_mut(target))? else {
            return Err(self.fail(Fault::Null {
                expected: field.declared().name(),
            }));
        };
        let found = container.type_tag();
        container
            .as_map_mut()
            .ok_or_else(|| self.not_container("map", found))
    }

    // -------------------------------------------------------------------------
    // Container edits

    fn view_list<'a>(&self, container: &'a dyn Inspect) -> PropertyResult<&'a dyn ListAccess> {
        container
            .as_list()
            .ok_or_else(|| self.not_container("list", container.type_tag()))
    }

    fn view_map<'a>(&self, container: &'a dyn Inspect) -> PropertyResult<&'a dyn MapAccess> {
        container
            .as_map()
            .ok_or_else(|| self.not_container("map", container.type_tag()))
    }

    fn count(&self, container: &dyn Inspect) -> PropertyResult<usize> {
        if let Some(list) = container.as_list() {
            return Ok(list.len());
        }
        self.view_map(container).map(|map| map.len())
    }

    fn replace(
        &self,
        list: &mut dyn ListAccess,
        index: usize,
        value: Option<Value>,
    ) -> PropertyResult<()> {
        let expected = list.element_type().name();
        let Some(value) = value else {
            return Err(self.fail(Fault::Null { expected }));
        };
        self.bounds(index, list.len())?;
        list.set(index, value).map_err(|value| {
            self.fail(Fault::Mismatch {
                expected,
                found: value.type_tag().name(),
            })
        })
    }

    fn insert(
        &self,
        list: &mut dyn ListAccess,
        index: Option<usize>,
        value: Value,
    ) -> PropertyResult<()> {
        let expected = list.element_type().name();
        let len = list.len();
        let result = match index {
            None => list.push(value),
            Some(index) if index <= len => list.insert(index, value),
            Some(index) => return Err(self.fail(Fault::OutOfRange { index, len })),
        };
        result.map_err(|value| {
            self.fail(Fault::Mismatch {
                expected,
                found: value.type_tag().name(),
            })
        })
    }

    fn put(&self, map: &mut dyn MapAccess, key: &str, value: Option<Value>) -> PropertyResult<()> {
        let Some(value) = value else {
            map.remove(key);
            return Ok(());
        };
        let expected = map.value_type().name();
        map.insert(key, value).map_err(|value| {
            self.fail(Fault::Mismatch {
                expected,
                found: value.type_tag().name(),
            })
        })
    }

    /// Copies the container out through the getter, applies `edit` and
    /// writes the copy back through the setter.
    fn write_through(
        &self,
        through: &RoundTrip,
        target: &mut dyn Inspect,
        edit: impl FnOnce(&mut dyn Inspect) -> PropertyResult<()>,
    ) -> PropertyResult<()> {
        let Some(set) = &through.set else {
            return Err(self.not_applicable(self.mode));
        };
        let Some(mut container) = self.lift((through.get)(&*target))? else {
            return Err(self.fail(Fault::Null {
                expected: through.declared.name(),
            }));
        };
        edit(container.as_inspect_mut())?;
        self.lift(set(target, Some(container)))
    }

    // -------------------------------------------------------------------------
    // Invocation

    /// Reads the property. `Ok(None)` is a null value.
    pub fn get(&self, target: &dyn Inspect) -> PropertyResult<Option<Value>> {
        self.expect(AccessorMode::Get)?;
        match &self.invoker {
            Invoker::Get(get) => self.lift(get(target)),
            Invoker::Field(field) => {
                let value = self.lift(field.read(target))?;
                Ok(value.map(|v| v.clone_value()))
            }
            _ => Err(self.not_applicable(AccessorMode::Get)),
        }
    }

    /// Writes the property. `None` writes null, which only nullable slots accept.
    pub fn set(&self, target: &mut dyn Inspect, value: Option<Value>) -> PropertyResult<()> {
        self.expect(AccessorMode::Set)?;
        match &self.invoker {
            Invoker::Set(set) => self.lift(set(target, value)),
            Invoker::Field(field) => self.lift(field.write(target, value)),
            _ => Err(self.not_applicable(AccessorMode::Set)),
        }
    }

    /// Reads the element at `index`. A null container reads as null.
    pub fn get_indexed(&self, target: &dyn Inspect, index: usize) -> PropertyResult<Option<Value>> {
        self.expect(AccessorMode::GetIndexed)?;
        match &self.invoker {
            Invoker::GetIndexed(get) => self.lift(get(target, index)),
            Invoker::List(field) => {
                let Some(list) = self.list(&**field, target)? else {
                    return Ok(None);
                };
                self.bounds(index, list.len())?;
                Ok(list.get(index).map(|v| v.clone_value()))
            }
            Invoker::Through(through) => {
                let Some(container) = self.lift((through.get)(target))? else {
                    return Ok(None);
                };
                let list = self.view_list(container.as_inspect())?;
                self.bounds(index, list.len())?;
                Ok(list.get(index).map(|v| v.clone_value()))
            }
            _ => Err(self.not_applicable(AccessorMode::GetIndexed)),
        }
    }

    /// Replaces the element at `index`.
    pub fn set_indexed(
        &self,
        target: &mut dyn Inspect,
        index: usize,
        value: Option<Value>,
    ) -> PropertyResult<()> {
        self.expect(AccessorMode::SetIndexed)?;
        match &self.invoker {
            Invoker::SetIndexed(set) => self.lift(set(target, index, value)),
            Invoker::List(field) => {
                let list = self.list_mut(&**field, target)?;
                self.replace(list, index, value)
            }
            Invoker::Through(through) => self.write_through(through, target, |container| {
                let found = container.type_tag();
                let list = container
                    .as_list_mut()
                    .ok_or_else(|| self.not_container("list", found))?;
                self.replace(list, index, value)
            }),
            _ => Err(self.not_applicable(AccessorMode::SetIndexed)),
        }
    }

    /// Adds an element, inserting at `index` or appending when `None`.
    ///
    /// Explicit adders only append; passing an index to one fails with
    /// [`AccessorNotApplicable`](PropertyErrorKind::AccessorNotApplicable).
    pub fn add_indexed(
        &self,
        target: &mut dyn Inspect,
        index: Option<usize>,
        value: Value,
    ) -> PropertyResult<()> {
        self.expect(AccessorMode::AddIndexed)?;
        match &self.invoker {
            Invoker::Add(add) if index.is_none() => self.lift(add(target, value)),
            Invoker::List(field) => {
                let list = self.list_mut(&**field, target)?;
                self.insert(list, index, value)
            }
            Invoker::Through(through) => self.write_through(through, target, |container| {
                let found = container.type_tag();
                let list = container
                    .as_list_mut()
                    .ok_or_else(|| self.not_container("list", found))?;
                self.insert(list, index, value)
            }),
            _ => Err(self.not_applicable(AccessorMode::AddIndexed)),
        }
    }

    /// Reads the value under `key`. A missing key or null container reads as null.
    pub fn get_mapped(&self, target: &dyn Inspect, key: &str) -> PropertyResult<Option<Value>> {
        self.expect(AccessorMode::GetMapped)?;
        match &self.invoker {
            Invoker::GetMapped(get) => self.lift(get(target, key)),
            Invoker::Map(field) => {
                let Some(map) = self.map(&**field, target)? else {
                    return Ok(None);
                };
                Ok(map.get(key).map(|v| v.clone_value()))
            }
            Invoker::Through(through) => {
                let Some(container) = self.lift((through.get)(target))? else {
                    return Ok(None);
                };
                let map = self.view_map(container.as_inspect())?;
                Ok(map.get(key).map(|v| v.clone_value()))
            }
            _ => Err(self.not_applicable(AccessorMode::GetMapped)),
        }
    }

    /// Writes the value under `key`; `None` removes the entry.
    pub fn set_mapped(
        &self,
        target: &mut dyn Inspect,
        key: &str,
        value: Option<Value>,
    ) -> PropertyResult<()> {
        self.expect(AccessorMode::SetMapped)?;
        match &self.invoker {
            Invoker::SetMapped(set) => self.lift(set(target, key, value)),
            Invoker::Map(field) => {
                let map = self.map_mut(&**field, target)?;
                self.put(map, key, value)
            }
            Invoker::Through(through) => self.write_through(through, target, |container| {
                let found = container.type_tag();
                let map = container
                    .as_map_mut()
                    .ok_or_else(|| self.not_container("map", found))?;
                self.put(map, key, value)
            }),
            _ => Err(self.not_applicable(AccessorMode::SetMapped)),
        }
    }

    /// Counts the elements. A null container has no size.
    pub fn size(&self, target: &dyn Inspect) -> PropertyResult<Option<usize>> {
        self.expect(AccessorMode::Size)?;
        match &self.invoker {
            Invoker::Size(size) => self.lift(size(target)).map(Some),
            Invoker::List(field) => Ok(self.list(&**field, target)?.map(|list| list.len())),
            Invoker::Map(field) => Ok(self.map(&**field, target)?.map(|map| map.len())),
            Invoker::Through(through) => match self.lift((through.get)(target))? {
                Some(container) => self.count(container.as_inspect()).map(Some),
                None => Ok(None),
            },
            _ => Err(self.not_applicable(AccessorMode::Size)),
        }
    }

    /// Invokes the accessor with mode-specific [`Args`].
    ///
    /// Write modes return `Ok(None)`, [`AccessorMode::Size`] returns the count
    /// as a `usize` value.
    pub fn invoke(
        &self,
        target: &mut dyn Inspect,
        args: Args<'_>,
    ) -> PropertyResult<Option<Value>> {
        use AccessorMode as M;

        match (self.mode, args) {
            (M::Get, Args::None) => self.get(target),
            (M::Set, Args::Value(value)) => self.set(target, value).map(|()| None),
            (M::GetIndexed, Args::Index(index)) => self.get_indexed(target, index),
            (M::SetIndexed, Args::IndexValue(index, value)) => {
                self.set_indexed(target, index, value).map(|()| None)
            }
            (M::AddIndexed, Args::Insert(index, value)) => {
                self.add_indexed(target, index, value).map(|()| None)
            }
            (M::GetMapped, Args::Key(key)) => self.get_mapped(target, key),
            (M::SetMapped, Args::KeyValue(key, value)) => {
                self.set_mapped(target, key, value).map(|()| None)
            }
            (M::Size, Args::None) => Ok(self.size(target)?.map(Value::new)),
            (mode, _) => Err(self.not_applicable(mode)),
        }
    }

    // -------------------------------------------------------------------------
    // Traversal

    /// Borrows the child reached through this accessor.
    ///
    /// `Ok(None)` means a null field, a null container or an absent key.
    pub(crate) fn child<'a>(
        &self,
        target: &'a dyn Inspect,
        step: Step<'_>,
    ) -> PropertyResult<Option<&'a dyn Inspect>> {
        if !self.can_traverse() {
            return Err(self.not_applicable(self.mode));
        }
        match (&self.invoker, step) {
            (Invoker::Field(field), Step::Field) => self.lift(field.read(target)),
            (Invoker::List(field), Step::Index(index)) => {
                let Some(list) = self.list(&**field, target)? else {
                    return Ok(None);
                };
                self.bounds(index, list.len())?;
                Ok(list.get(index))
            }
            (Invoker::Map(field), Step::Key(key)) => {
                let Some(map) = self.map(&**field, target)? else {
                    return Ok(None);
                };
                Ok(map.get(key))
            }
            _ => Err(self.not_applicable(self.mode)),
        }
    }

    /// Mutable counterpart of [`child`](Self::child).
    pub(crate) fn child_mut<'a>(
        &self,
        target: &'a mut dyn Inspect,
        step: Step<'_>,
    ) -> PropertyResult<Option<&'a mut dyn Inspect>> {
        if !self.can_traverse() {
            return Err(self.not_applicable(self.mode));
        }
        match (&self.invoker, step) {
            (Invoker::Field(field), Step::Field) => self.lift(field.read_mut(target)),
            (Invoker::List(field), Step::Index(index)) => {
                let Some(container) = self.lift(field.read_mut(target))? else {
                    return Ok(None);
                };
                let found = container.type_tag();
                let list = container
                    .as_list_mut()
                    .ok_or_else(|| self.not_container("list", found))?;
                self.bounds(index, list.len())?;
                Ok(list.get_mut(index))
            }
            (Invoker::Map(field), Step::Key(key)) => {
                let Some(container) = self.lift(field.read_mut(target))? else {
                    return Ok(None);
                };
                let found = container.type_tag();
                let map = container
                    .as_map_mut()
                    .ok_or_else(|| self.not_container("map", found))?;
                Ok(map.get_mut(key))
            }
            _ => Err(self.not_applicable(self.mode)),
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("owner", &self.owner)
            .field("property", &self.property)
            .field("mode", &self.mode)
            .field("origin", &self.origin)
            .field("value_type", &self.value_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::PropertyErrorKind;
    use crate::access::{AccessorMode, Args};
    use crate::describe::{Describe, DescriptorBuilder, Value};
    use crate::descriptor::TypeDescriptor;
    use crate::registry::DescriptorRegistry;

    #[derive(Clone, Default)]
    struct Sensor {
        label: String,
        samples: Vec<i32>,
    }

    impl Describe for Sensor {
        fn describe(builder: &mut DescriptorBuilder<Self>) {
            builder
                .field::<String>("label", |s| &s.label, |s| &mut s.label)
                .field::<Vec<i32>>("samples", |s| &s.samples, |s| &mut s.samples)
                .try_getter("reading", |_: &Self| Err::<Option<i32>, _>("offline"));
        }
    }

    fn descriptor() -> alloc::sync::Arc<TypeDescriptor> {
        DescriptorRegistry::new().descriptor_of::<Sensor>().unwrap()
    }

    fn sensor() -> Sensor {
        Sensor {
            label: String::from("t1"),
            samples: vec![3, 5],
        }
    }

    #[test]
    fn invoke_dispatches_by_mode() {
        let descriptor = descriptor();
        let mut sensor = sensor();

        let size = descriptor.get_accessor("samples", AccessorMode::Size, true).unwrap().unwrap();
        let count = size.invoke(&mut sensor, Args::None).unwrap().unwrap();
        assert_eq!(count.downcast_ref::<usize>(), Some(&2));

        let add = descriptor.get_accessor("samples", AccessorMode::AddIndexed, true);
        let add = add.unwrap().unwrap();
        let added = add.invoke(&mut sensor, Args::Insert(Some(0), Value::new(1_i32)));
        assert!(added.unwrap().is_none());
        assert_eq!(sensor.samples, [1, 3, 5]);

        let err = size.invoke(&mut sensor, Args::Index(0)).unwrap_err();
        assert!(matches!(err.kind(), PropertyErrorKind::AccessorNotApplicable { .. }));
    }

    #[test]
    fn typed_call_checks_mode() {
        let descriptor = descriptor();
        let get = descriptor.get_accessor("label", AccessorMode::Get, true).unwrap().unwrap();
        let err = get.size(&sensor()).unwrap_err();
        assert!(matches!(
            err.kind(),
            PropertyErrorKind::AccessorNotApplicable {
                mode: AccessorMode::Size,
                ..
            }
        ));
    }

    #[test]
    fn target_failures_are_separated() {
        let descriptor = descriptor();
        let reading = descriptor.get_accessor("reading", AccessorMode::Get, true).unwrap().unwrap();
        let err = reading.get(&sensor()).unwrap_err();
        assert!(err.is_invocation_failure());
        assert!(!err.is_resolution_failure());
    }

    #[test]
    fn value_checks() {
        let descriptor = descriptor();
        let mut sensor = sensor();

        let set = descriptor.get_accessor("label", AccessorMode::Set, true).unwrap().unwrap();
        let err = set.set(&mut sensor, None).unwrap_err();
        assert!(matches!(err.kind(), PropertyErrorKind::TypeMismatch { found: "null", .. }));
        let err = set.set(&mut sensor, Some(Value::new(7_i32))).unwrap_err();
        assert!(matches!(err.kind(), PropertyErrorKind::TypeMismatch { .. }));

        let get = descriptor.get_accessor("samples", AccessorMode::GetIndexed, true);
        let err = get.unwrap().unwrap().get_indexed(&sensor, 9).unwrap_err();
        assert!(matches!(
            err.kind(),
            PropertyErrorKind::IndexOutOfRange { index: 9, len: 2, .. }
        ));
    }
}
