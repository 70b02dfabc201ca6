use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::fmt;

use crate::access::{Accessor, AccessorMode, AccessorOrigin, Step};
use crate::describe::{Describe, Inspect, TypeTag, Value};
use crate::descriptor::{PropertyDescriptor, TypeDescriptor};
use crate::diagnostic::{MessageCatalog, PlainMessages};
use crate::navigate::{
    ContainerFactory, DefaultFactory, NavigatorConfig, ObjectFactory, TraversalMode,
};
use crate::path::{AsPropertyPath, PathSegment, PropertyPath, Suffix};
use crate::registry::DescriptorRegistry;
use crate::{PropertyError, PropertyErrorKind, PropertyResult};

// -----------------------------------------------------------------------------
// PathNavigator

/// Reads and writes nested properties by path.
///
/// Every segment but the last is stepped through with its GET, GET_INDEXED or
/// GET_MAPPED accessor. The last segment receives the requested operation.
/// Read-only navigation steps through computed getters by walking a copy of
/// their value; navigation that may mutate only steps through fields.
///
/// What happens on a null intermediate depends on the [`TraversalMode`]:
///
/// - [`Read`](TraversalMode::Read) stops, leaves the graph untouched and
///   reports a null result (`Ok(None)` or `Ok(false)`).
/// - [`CreateIfNull`](TraversalMode::CreateIfNull) instantiates the declared
///   type through the factories, stores it with the SET accessor and goes on.
///   Intermediate lists grow to reach an out-of-range index and intermediate
///   maps receive absent keys, both bounded by
///   [`NavigatorConfig::auto_grow_limit`].
///
/// Errors carry the canonical form of the segments resolved before the
/// failing one as their [`prefix`](PropertyError::prefix).
///
/// # Examples
///
/// ```
/// use vc_property::prelude::*;
///
/// #[derive(Clone, Default, Describe)]
/// #[describe(default)]
/// struct Endpoint {
///     host: String,
///     port: Option<u16>,
/// }
///
/// #[derive(Clone, Default, Describe)]
/// #[describe(default)]
/// struct Service {
///     endpoint: Option<Endpoint>,
///     tags: Vec<String>,
/// }
///
/// let registry = DescriptorRegistry::new();
/// let navigator = PathNavigator::new(&registry);
/// let mut service = Service::default();
///
/// // Nothing to read through yet.
/// let port = navigator.get(&mut service, "endpoint.port", TraversalMode::Read).unwrap();
/// assert!(port.is_none());
///
/// navigator
///     .set(&mut service, "endpoint.port", Some(Value::new(8080_u16)), TraversalMode::CreateIfNull)
///     .unwrap();
/// navigator
///     .add_element(&mut service, "tag", String::from("public"), TraversalMode::Read)
///     .unwrap();
///
/// assert_eq!(service.endpoint.as_ref().and_then(|e| e.port), Some(8080));
/// assert_eq!(navigator.size(&mut service, "tags", TraversalMode::Read).unwrap(), Some(1));
/// ```
#[derive(Clone)]
pub struct PathNavigator<'r> {
    registry: &'r DescriptorRegistry,
    config: NavigatorConfig,
    objects: Arc<dyn ObjectFactory>,
    containers: Arc<dyn ContainerFactory>,
    messages: Arc<dyn MessageCatalog>,
}

impl<'r> PathNavigator<'r> {
    /// Creates a navigator using [`DefaultFactory`] and [`PlainMessages`].
    pub fn new(registry: &'r DescriptorRegistry) -> Self {
        Self {
            registry,
            config: NavigatorConfig::new(),
            objects: Arc::new(DefaultFactory),
            containers: Arc::new(DefaultFactory),
            messages: Arc::new(PlainMessages),
        }
    }

    #[inline]
    pub fn with_config(mut self, config: NavigatorConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn with_object_factory(mut self, factory: impl ObjectFactory + 'static) -> Self {
        self.objects = Arc::new(factory);
        self
    }

    #[inline]
    pub fn with_container_factory(mut self, factory: impl ContainerFactory + 'static) -> Self {
        self.containers = Arc::new(factory);
        self
    }

    #[inline]
    pub fn with_messages(mut self, messages: impl MessageCatalog + 'static) -> Self {
        self.messages = Arc::new(messages);
        self
    }

    #[inline]
    pub fn registry(&self) -> &'r DescriptorRegistry {
        self.registry
    }

    #[inline]
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Renders `error` with the configured [`MessageCatalog`].
    #[inline]
    pub fn describe_error(&self, error: &PropertyError) -> Cow<'_, str> {
        self.messages.render(error)
    }

    // -------------------------------------------------------------------------
    // Operations

    /// Reads the value at `path`. `Ok(None)` is a null value.
    ///
    /// The target is borrowed mutably because [`CreateIfNull`](TraversalMode::CreateIfNull)
    /// may wire new intermediates into it. Use [`read`](Self::read) for a
    /// shared borrow.
    pub fn get(
        &self,
        target: &mut dyn Inspect,
        path: impl AsPropertyPath,
        mode: TraversalMode,
    ) -> PropertyResult<Option<Value>> {
        if !mode.creates() {
            return self.read(target, path);
        }
        let result = path
            .as_property_path()
            .map_err(PropertyError::from)
            .and_then(|path| {
                let Some(parent) = self.parent(target, &path, mode)? else {
                    return Ok(None);
                };
                self.terminal_get(parent.as_inspect(), path.last())
                    .map_err(|err| at_last(&path, err))
            });
        self.report(result)
    }

    /// [`get`](Self::get) in [`Read`](TraversalMode::Read) mode over a shared borrow.
    pub fn read(
        &self,
        target: &dyn Inspect,
        path: impl AsPropertyPath,
    ) -> PropertyResult<Option<Value>> {
        let result = path
            .as_property_path()
            .map_err(PropertyError::from)
            .and_then(|path| {
                let (last, parents) = path.split_last();
                let Some(parent) = self.walk(target, parents, &path)? else {
                    return Ok(None);
                };
                self.terminal_get(parent.as_inspect(), last)
                    .map_err(|err| at_last(&path, err))
            });
        self.report(result)
    }

    /// [`get`](Self::get) followed by a downcast to `T`.
    pub fn get_as<T: Describe>(
        &self,
        target: &mut dyn Inspect,
        path: impl AsPropertyPath,
        mode: TraversalMode,
    ) -> PropertyResult<Option<T>> {
        let Some(value) = self.get(target, path, mode)? else {
            return Ok(None);
        };
        let result: PropertyResult<Option<T>> = value.downcast::<T>().map(Some).map_err(|value| {
            PropertyErrorKind::TypeMismatch {
                expected: core::any::type_name::<T>(),
                found: value.type_tag().name(),
            }
            .into()
        });
        self.report(result)
    }

    /// Writes `value` at `path`; `None` writes null.
    ///
    /// Returns `false` when [`Read`](TraversalMode::Read) mode met a null
    /// intermediate or a null container, in which case nothing was written.
    pub fn set(
        &self,
        target: &mut dyn Inspect,
        path: impl AsPropertyPath,
        value: Option<Value>,
        mode: TraversalMode,
    ) -> PropertyResult<bool> {
        let result = path
            .as_property_path()
            .map_err(PropertyError::from)
            .and_then(|path| {
                let (last, parents) = path.split_last();
                let Some(parent) = self.walk_mut(target, parents, &path, mode)? else {
                    return Ok(false);
                };
                self.terminal_set(parent, last, value, mode)
                    .map_err(|err| at_last(&path, err))
            });
        self.report(result)
    }

    /// Adds `value` to the collection at `path`.
    ///
    /// The last segment may use the singular name (`item` for `items`); it is
    /// resolved through the registry's naming convention. With an index
    /// suffix the element is inserted at the index when it does not exceed
    /// the length, and appended when the index is past the end but below the
    /// auto-grow limit.
    ///
    /// Returns `false` under the same conditions as [`set`](Self::set).
    pub fn add_element(
        &self,
        target: &mut dyn Inspect,
        path: impl AsPropertyPath,
        value: impl Into<Value>,
        mode: TraversalMode,
    ) -> PropertyResult<bool> {
        let value = value.into();
        let result = path
            .as_property_path()
            .map_err(PropertyError::from)
            .and_then(|path| {
                let (last, parents) = path.split_last();
                let Some(parent) = self.walk_mut(target, parents, &path, mode)? else {
                    return Ok(false);
                };
                self.terminal_add(parent, last, value, mode)
                    .map_err(|err| at_last(&path, err))
            });
        self.report(result)
    }

    /// Counts the elements of the collection at `path`.
    ///
    /// A null collection, or a null intermediate in [`Read`](TraversalMode::Read)
    /// mode, has no size.
    pub fn size(
        &self,
        target: &mut dyn Inspect,
        path: impl AsPropertyPath,
        mode: TraversalMode,
    ) -> PropertyResult<Option<usize>> {
        let result = path
            .as_property_path()
            .map_err(PropertyError::from)
            .and_then(|path| {
                let Some(parent) = self.parent(target, &path, mode)? else {
                    return Ok(None);
                };
                self.terminal_size(parent.as_inspect(), path.last())
                    .map_err(|err| at_last(&path, err))
            });
        self.report(result)
    }

    fn report<T>(&self, result: PropertyResult<T>) -> PropertyResult<T> {
        if let Err(err) = &result
            && log::log_enabled!(log::Level::Debug)
        {
            log::debug!("navigation failed: {}", self.messages.render(err));
        }
        result
    }

    // -------------------------------------------------------------------------
    // Traversal

    /// Reaches the owner of the last segment without mutating in `Read` mode.
    fn parent<'t>(
        &self,
        target: &'t mut dyn Inspect,
        path: &PropertyPath,
        mode: TraversalMode,
    ) -> PropertyResult<Option<Node<'t>>> {
        let (_, parents) = path.split_last();
        if mode.creates() {
            let node = self.walk_mut(target, parents, path, mode)?;
            Ok(node.map(|node| Node::Borrowed(&*node)))
        } else {
            self.walk(target, parents, path)
        }
    }

    fn walk<'t>(
        &self,
        target: &'t dyn Inspect,
        segments: &[PathSegment],
        path: &PropertyPath,
    ) -> PropertyResult<Option<Node<'t>>> {
        let mut node = Node::Borrowed(target);
        for (depth, segment) in segments.iter().enumerate() {
            let child = match &node {
                Node::Borrowed(parent) => self.step(*parent, segment),
                // Children of a copy are copied out before it is dropped.
                Node::Owned(parent) => self
                    .step(parent.as_inspect(), segment)
                    .map(|child| child.map(Node::into_owned)),
            };
            let child = child.map_err(|err| err.with_prefix(path.prefix(depth)))?;
            match child {
                Some(child) => node = child,
                None => {
                    log::trace!("`{}` is null", path.prefix(depth + 1));
                    return Ok(None);
                }
            }
        }
        Ok(Some(node))
    }

    fn walk_mut<'t>(
        &self,
        target: &'t mut dyn Inspect,
        segments: &[PathSegment],
        path: &PropertyPath,
        mode: TraversalMode,
    ) -> PropertyResult<Option<&'t mut dyn Inspect>> {
        let mut node = target;
        for (depth, segment) in segments.iter().enumerate() {
            let child = self
                .step_mut(node, segment, mode)
                .map_err(|err| err.with_prefix(path.prefix(depth)))?;
            match child {
                Some(child) => node = child,
                None => {
                    log::trace!("`{}` is null", path.prefix(depth + 1));
                    return Ok(None);
                }
            }
        }
        Ok(Some(node))
    }

    fn step<'t>(
        &self,
        node: &'t dyn Inspect,
        segment: &PathSegment,
    ) -> PropertyResult<Option<Node<'t>>> {
        let descriptor = self.registry.descriptor_for(node)?;
        let property = lookup(&descriptor, segment.name())?;
        let (mode, step) = reach(segment);
        log::trace!("step `{segment}` on `{}`", descriptor.type_name());
        if let Some(accessor) = property.traversal_accessor(mode) {
            return Ok(accessor.child(node, step)?.map(Node::Borrowed));
        }

        let accessor = resolve(&descriptor, property, mode)?;
        let value = match step {
            Step::Field => accessor.get(node)?,
            Step::Index(index) => accessor.get_indexed(node, index)?,
            Step::Key(key) => accessor.get_mapped(node, key)?,
        };
        Ok(value.map(Node::Owned))
    }

    fn step_mut<'t>(
        &self,
        node: &'t mut dyn Inspect,
        segment: &PathSegment,
        mode: TraversalMode,
    ) -> PropertyResult<Option<&'t mut dyn Inspect>> {
        let descriptor = self.registry.descriptor_for(&*node)?;
        let (property, accessor, step) = traversal(&descriptor, segment)?;
        log::trace!("step `{segment}` on `{}`", descriptor.type_name());
        if mode.creates() {
            self.prepare(&mut *node, &descriptor, property, accessor, step)?;
        }
        accessor.child_mut(node, step)
    }

    // -------------------------------------------------------------------------
    // Materialization

    /// Makes sure the child reached by `step` exists.
    fn prepare(
        &self,
        node: &mut dyn Inspect,
        descriptor: &TypeDescriptor,
        property: &PropertyDescriptor,
        accessor: &Accessor,
        step: Step<'_>,
    ) -> PropertyResult<()> {
        match step {
            Step::Field => {
                if accessor.child(node, step)?.is_none() {
                    self.materialize(node, descriptor, property)?;
                }
            }
            Step::Index(index) => {
                // Nothing is created for an index the list cannot grow to.
                if index >= self.config.auto_grow_limit
                    && let Some(len) = fallback_len(node, property)?
                    && index >= len
                {
                    return Err(out_of_range(property, index, len));
                }
                self.ensure_container(node, descriptor, property, TraversalMode::CreateIfNull)?;
                self.grow_list(node, property, index)?;
            }
            Step::Key(key) => {
                if self.config.auto_grow_limit == 0 && fallback_len(node, property)? == Some(0) {
                    return Err(map_full(property, key, 0));
                }
                self.ensure_container(node, descriptor, property, TraversalMode::CreateIfNull)?;
                if accessor.child(node, step)?.is_none() {
                    self.insert_entry(node, property, key)?;
                }
            }
        }
        Ok(())
    }

    fn instantiate(&self, tag: TypeTag) -> PropertyResult<Value> {
        let descriptor = self.registry.get_descriptor(tag)?;
        let kind = tag.container();
        let value = if kind.is_container() {
            self.containers.create(kind, &descriptor)
        } else {
            self.objects.instantiate(&descriptor)
        };
        value.ok_or_else(|| {
            PropertyErrorKind::InstantiationFailed {
                type_name: tag.name(),
            }
            .into()
        })
    }

    /// Stores a fresh instance into `property` through its SET accessor.
    fn materialize(
        &self,
        node: &mut dyn Inspect,
        descriptor: &TypeDescriptor,
        property: &PropertyDescriptor,
    ) -> PropertyResult<()> {
        let set = resolve(descriptor, property, AccessorMode::Set)?;
        let value = self.instantiate(set.value_type())?;
        set.set(node, Some(value))?;
        log::debug!(
            "materialized `{}::{}` as `{}`",
            descriptor.type_name(),
            property.name(),
            set.value_type().name()
        );
        Ok(())
    }

    /// Returns whether the container behind `property` exists, creating it
    /// first in `CreateIfNull` mode.
    ///
    /// Properties without a synthesized size are left to their explicit accessors.
    fn ensure_container(
        &self,
        node: &mut dyn Inspect,
        descriptor: &TypeDescriptor,
        property: &PropertyDescriptor,
        mode: TraversalMode,
    ) -> PropertyResult<bool> {
        let Some(size) = property.accessor_from(AccessorMode::Size, AccessorOrigin::Fallback) else {
            return Ok(true);
        };
        if size.size(node)?.is_some() {
            return Ok(true);
        }
        if !mode.creates() {
            return Ok(false);
        }
        self.materialize(node, descriptor, property)?;
        Ok(true)
    }

    fn grow_list(
        &self,
        node: &mut dyn Inspect,
        property: &PropertyDescriptor,
        index: usize,
    ) -> PropertyResult<()> {
        let (Some(size), Some(add)) = (
            property.accessor_from(AccessorMode::Size, AccessorOrigin::Fallback),
            property.accessor_from(AccessorMode::AddIndexed, AccessorOrigin::Fallback),
        ) else {
            return Ok(());
        };

        let len = size.size(node)?.unwrap_or(0);
        if index < len {
            return Ok(());
        }
        if index >= self.config.auto_grow_limit {
            return Err(out_of_range(property, index, len));
        }
        for _ in len..=index {
            let element = self.instantiate(add.value_type())?;
            add.add_indexed(node, None, element)?;
        }
        log::debug!(
            "grew `{}` from {len} to {} elements",
            property.name(),
            index + 1
        );
        Ok(())
    }

    fn insert_entry(
        &self,
        node: &mut dyn Inspect,
        property: &PropertyDescriptor,
        key: &str,
    ) -> PropertyResult<()> {
        let (Some(size), Some(set)) = (
            property.accessor_from(AccessorMode::Size, AccessorOrigin::Fallback),
            property.accessor_from(AccessorMode::SetMapped, AccessorOrigin::Fallback),
        ) else {
            return Ok(());
        };

        let len = size.size(node)?.unwrap_or(0);
        if len >= self.config.auto_grow_limit {
            return Err(map_full(property, key, len));
        }
        let value = self.instantiate(set.value_type())?;
        set.set_mapped(node, key, Some(value))?;
        log::debug!("inserted `{key}` into `{}`", property.name());
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Terminal operations

    fn terminal_get(
        &self,
        node: &dyn Inspect,
        segment: &PathSegment,
    ) -> PropertyResult<Option<Value>> {
        let descriptor = self.registry.descriptor_for(node)?;
        let property = lookup(&descriptor, segment.name())?;
        match segment.suffix() {
            Suffix::None => resolve(&descriptor, property, AccessorMode::Get)?.get(node),
            Suffix::Index(index) => resolve(&descriptor, property, AccessorMode::GetIndexed)?
                .get_indexed(node, *index),
            Suffix::Key(key) => {
                resolve(&descriptor, property, AccessorMode::GetMapped)?.get_mapped(node, key)
            }
        }
    }

    fn terminal_set(
        &self,
        node: &mut dyn Inspect,
        segment: &PathSegment,
        value: Option<Value>,
        mode: TraversalMode,
    ) -> PropertyResult<bool> {
        let descriptor = self.registry.descriptor_for(&*node)?;
        let property = lookup(&descriptor, segment.name())?;
        match segment.suffix() {
            Suffix::None => {
                resolve(&descriptor, property, AccessorMode::Set)?.set(node, value)?;
            }
            Suffix::Index(index) => {
                let accessor = resolve(&descriptor, property, AccessorMode::SetIndexed)?;
                let size = property.accessor_from(AccessorMode::Size, AccessorOrigin::Fallback);
                if accessor.origin() == AccessorOrigin::Fallback
                    && let Some(size) = size
                {
                    // Replacing never creates the list, a null one has nothing to replace.
                    let Some(len) = size.size(node)? else {
                        if mode.creates() {
                            return Err(out_of_range(property, *index, 0));
                        }
                        return Ok(false);
                    };
                    if *index >= len {
                        return Err(out_of_range(property, *index, len));
                    }
                } else if !self.ensure_container(node, &descriptor, property, mode)? {
                    return Ok(false);
                }
                accessor.set_indexed(node, *index, value)?;
            }
            Suffix::Key(key) => {
                let accessor = resolve(&descriptor, property, AccessorMode::SetMapped)?;
                if !self.ensure_container(node, &descriptor, property, mode)? {
                    return Ok(false);
                }
                accessor.set_mapped(node, key, value)?;
            }
        }
        Ok(true)
    }

    fn terminal_add(
        &self,
        node: &mut dyn Inspect,
        segment: &PathSegment,
        value: Value,
        mode: TraversalMode,
    ) -> PropertyResult<bool> {
        const ADD: AccessorMode = AccessorMode::AddIndexed;

        let descriptor = self.registry.descriptor_for(&*node)?;
        let name = segment.name();
        let plural = self.registry.naming().plural(name);
        let property = descriptor
            .property(&plural)
            .filter(|property| property.supports(ADD))
            .or_else(|| descriptor.property(name))
            .ok_or_else(|| descriptor.not_found(name))?;
        let accessor = resolve(&descriptor, property, ADD)?;

        if let Suffix::Key(_) = segment.suffix() {
            return Err(descriptor.not_applicable(property.name(), ADD));
        }
        if !self.ensure_container(node, &descriptor, property, mode)? {
            return Ok(false);
        }

        let Suffix::Index(index) = *segment.suffix() else {
            accessor.add_indexed(node, None, value)?;
            return Ok(true);
        };

        // Explicit adders only append, positional inserts go through the list.
        let insert = property
            .accessor_from(ADD, AccessorOrigin::Fallback)
            .ok_or_else(|| descriptor.not_applicable(property.name(), ADD))?;
        let len = fallback_len(node, property)?.unwrap_or(0);
        if index <= len {
            insert.add_indexed(node, Some(index), value)?;
        } else if index < self.config.auto_grow_limit {
            insert.add_indexed(node, None, value)?;
        } else {
            return Err(out_of_range(property, index, len));
        }
        Ok(true)
    }

    fn terminal_size(
        &self,
        node: &dyn Inspect,
        segment: &PathSegment,
    ) -> PropertyResult<Option<usize>> {
        let descriptor = self.registry.descriptor_for(node)?;
        let property = lookup(&descriptor, segment.name())?;
        if !matches!(segment.suffix(), Suffix::None) {
            return Err(descriptor.not_applicable(property.name(), AccessorMode::Size));
        }
        resolve(&descriptor, property, AccessorMode::Size)?.size(node)
    }
}

// -----------------------------------------------------------------------------
// Node

/// A node reached by read-only navigation.
enum Node<'t> {
    Borrowed(&'t dyn Inspect),
    /// A copy produced by a computed getter.
    Owned(Value),
}

impl Node<'_> {
    #[inline]
    fn as_inspect(&self) -> &dyn Inspect {
        match self {
            Self::Borrowed(node) => *node,
            Self::Owned(value) => value.as_inspect(),
        }
    }

    fn into_owned<'a>(self) -> Node<'a> {
        match self {
            Self::Borrowed(node) => Node::Owned(node.clone_value()),
            Self::Owned(value) => Node::Owned(value),
        }
    }
}

impl fmt::Debug for PathNavigator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathNavigator")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Helpers

fn lookup<'d>(
    descriptor: &'d TypeDescriptor,
    name: &str,
) -> PropertyResult<&'d PropertyDescriptor> {
    descriptor
        .property(name)
        .ok_or_else(|| descriptor.not_found(name))
}

fn resolve<'d>(
    descriptor: &TypeDescriptor,
    property: &'d PropertyDescriptor,
    mode: AccessorMode,
) -> PropertyResult<&'d Accessor> {
    property
        .accessor(mode)
        .ok_or_else(|| descriptor.not_applicable(property.name(), mode))
}

/// The read mode and step a non-final segment is reached with.
fn reach(segment: &PathSegment) -> (AccessorMode, Step<'_>) {
    match segment.suffix() {
        Suffix::None => (AccessorMode::Get, Step::Field),
        Suffix::Index(index) => (AccessorMode::GetIndexed, Step::Index(*index)),
        Suffix::Key(key) => (AccessorMode::GetMapped, Step::Key(&**key)),
    }
}

/// The traversable accessor for a non-final segment.
fn traversal<'d, 's>(
    descriptor: &'d TypeDescriptor,
    segment: &'s PathSegment,
) -> PropertyResult<(&'d PropertyDescriptor, &'d Accessor, Step<'s>)> {
    let (mode, step) = reach(segment);
    let property = lookup(descriptor, segment.name())?;
    let accessor = property
        .traversal_accessor(mode)
        .ok_or_else(|| descriptor.not_applicable(property.name(), mode))?;
    Ok((property, accessor, step))
}

/// The length reported by the synthesized SIZE accessor. A null container is empty.
fn fallback_len(node: &dyn Inspect, property: &PropertyDescriptor) -> PropertyResult<Option<usize>> {
    match property.accessor_from(AccessorMode::Size, AccessorOrigin::Fallback) {
        Some(size) => Ok(Some(size.size(node)?.unwrap_or(0))),
        None => Ok(None),
    }
}

fn map_full(property: &PropertyDescriptor, key: &str, len: usize) -> PropertyError {
    PropertyErrorKind::MapFull {
        property: property.name().into(),
        key: key.into(),
        len,
    }
    .into()
}

fn out_of_range(property: &PropertyDescriptor, index: usize, len: usize) -> PropertyError {
    PropertyErrorKind::IndexOutOfRange {
        property: property.name().into(),
        index,
        len,
    }
    .into()
}

#[inline]
fn at_last(path: &PropertyPath, err: PropertyError) -> PropertyError {
    err.with_prefix(path.prefix(path.len() - 1))
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use alloc::{format, vec};
    use core::fmt;

    use super::*;
    use crate::derive::Describe;
    use crate::describe::DescriptorBuilder;

    #[derive(Clone, Default, Describe)]
    #[describe(default)]
    struct Leaf {
        c: Option<String>,
    }

    #[derive(Clone, Default, Describe)]
    #[describe(default)]
    struct Middle {
        b: Option<Leaf>,
    }

    #[derive(Clone, Default, Describe)]
    #[describe(default)]
    struct Root {
        a: Middle,
        name: String,
        port: Option<i32>,
        items: Option<Vec<String>>,
        values: Option<BTreeMap<String, String>>,
        leaves: Vec<Leaf>,
        nodes: BTreeMap<String, Leaf>,
        branches: Option<Vec<Leaf>>,
        named: Option<BTreeMap<String, Leaf>>,
    }

    #[derive(Debug)]
    struct Rejected;

    impl fmt::Display for Rejected {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("rejected")
        }
    }

    impl core::error::Error for Rejected {}

    #[derive(Clone, Default)]
    struct Guarded {
        level: u8,
    }

    impl Describe for Guarded {
        fn describe(builder: &mut DescriptorBuilder<Self>) {
            builder
                .getter("computed", |this: &Self| {
                    Some(Leaf {
                        c: Some(format!("level {}", this.level)),
                    })
                })
                .getter("level", |this: &Self| Some(this.level))
                .try_setter("level", |this: &mut Self, level: Option<u8>| match level {
                    Some(level) if level <= 10 => {
                        this.level = level;
                        Ok(())
                    }
                    _ => Err(Rejected),
                });
        }

        fn default_instance() -> Option<Self> {
            Some(Self::default())
        }
    }

    /// Containers exposed only through explicit getters and setters.
    #[derive(Clone, Default)]
    struct Bean {
        items: Vec<String>,
        labels: Option<BTreeMap<String, String>>,
        writes: usize,
    }

    impl Describe for Bean {
        fn describe(builder: &mut DescriptorBuilder<Self>) {
            builder
                .getter("items", |this: &Self| Some(this.items.clone()))
                .setter("items", |this: &mut Self, items: Option<Vec<String>>| {
                    this.items = items.unwrap_or_default();
                    this.writes += 1;
                })
                .getter("labels", |this: &Self| this.labels.clone())
                .setter("labels", |this: &mut Self, labels: Option<BTreeMap<String, String>>| {
                    this.labels = labels;
                })
                .getter("leaves", |_: &Self| {
                    Some(vec![Leaf {
                        c: Some(String::from("first")),
                    }])
                });
        }

        fn default_instance() -> Option<Self> {
            Some(Self::default())
        }
    }

    fn string(value: &str) -> Option<Value> {
        Some(Value::new(String::from(value)))
    }

    #[test]
    fn add_then_size_and_index() {
        let registry = DescriptorRegistry::new();
        let nav = PathNavigator::new(&registry);
        let mut root = Root::default();

        let empty = Value::new(Vec::<String>::new());
        assert!(nav.set(&mut root, "items", Some(empty), TraversalMode::Read).unwrap());
        assert!(
            nav.add_element(&mut root, "item", String::from("item1"), TraversalMode::Read)
                .unwrap()
        );

        assert_eq!(nav.size(&mut root, "items", TraversalMode::Read).unwrap(), Some(1));
        let first = nav
            .get_as::<String>(&mut root, "items[0]", TraversalMode::Read)
            .unwrap();
        assert_eq!(first.as_deref(), Some("item1"));
    }

    #[test]
    fn mapped_set_is_insert() {
        let registry = DescriptorRegistry::new();
        let nav = PathNavigator::new(&registry);
        let mut root = Root::default();

        assert!(
            nav.set(&mut root, "values['key1']", string("value1"), TraversalMode::CreateIfNull)
                .unwrap()
        );
        let value = nav.read(&root, "values['key1']").unwrap().unwrap();
        assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("value1"));

        let mut expected = BTreeMap::new();
        expected.insert(String::from("key1"), String::from("value1"));
        assert_eq!(root.values, Some(expected));

        assert!(nav.read(&root, "values['absent']").unwrap().is_none());
    }

    #[test]
    fn read_mode_stops_at_null() {
        let registry = DescriptorRegistry::new();
        let nav = PathNavigator::new(&registry);
        let mut root = Root::default();

        assert!(nav.get(&mut root, "a.b.c", TraversalMode::Read).unwrap().is_none());
        assert!(!nav.set(&mut root, "a.b.c", string("x"), TraversalMode::Read).unwrap());
        assert!(
            !nav.set(&mut root, "values['k']", string("v"), TraversalMode::Read)
                .unwrap()
        );
        assert_eq!(nav.size(&mut root, "items", TraversalMode::Read).unwrap(), None);

        assert!(root.a.b.is_none());
        assert!(root.values.is_none());
    }

    #[test]
    fn create_mode_materializes() {
        let registry = DescriptorRegistry::new();
        let nav = PathNavigator::new(&registry);
        let mut root = Root::default();

        let c = nav.get(&mut root, "a.b.c", TraversalMode::CreateIfNull).unwrap();
        assert!(c.is_none());
        assert!(root.a.b.is_some());

        assert!(nav.set(&mut root, "a.b.c", string("x"), TraversalMode::CreateIfNull).unwrap());
        let c = root.a.b.as_ref().and_then(|b| b.c.as_deref());
        assert_eq!(c, Some("x"));
    }

    #[test]
    fn nullable_scalar() {
        let registry = DescriptorRegistry::new();
        let nav = PathNavigator::new(&registry);
        let mut root = Root::default();

        assert!(nav.read(&root, "port").unwrap().is_none());
        nav.set(&mut root, "port", Some(Value::new(4242_i32)), TraversalMode::Read)
            .unwrap();
        let port = nav.get_as::<i32>(&mut root, "port", TraversalMode::Read).unwrap();
        assert_eq!(port, Some(4242));

        nav.set(&mut root, "port", None, TraversalMode::Read).unwrap();
        assert_eq!(root.port, None);
    }

    #[test]
    fn null_into_plain_field_is_a_mismatch() {
        let registry = DescriptorRegistry::new();
        let nav = PathNavigator::new(&registry);
        let mut root = Root::default();

        let err = nav.set(&mut root, "name", None, TraversalMode::Read).unwrap_err();
        assert!(matches!(err.kind(), PropertyErrorKind::TypeMismatch { .. }));

        let err = nav
            .set(&mut root, "name", Some(Value::new(7_u8)), TraversalMode::Read)
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            PropertyErrorKind::TypeMismatch { found: "u8", .. }
        ));
    }

    #[test]
    fn errors_carry_prefix() {
        let registry = DescriptorRegistry::new();
        let nav = PathNavigator::new(&registry);
        let mut root = Root::default();

        nav.get(&mut root, "a.b.c", TraversalMode::CreateIfNull).unwrap();
        let err = nav.read(&root, "a.b.missing").unwrap_err();
        assert_eq!(err.prefix(), Some("a.b"));
        assert!(matches!(err.kind(), PropertyErrorKind::PropertyNotFound { .. }));

        let err = nav.read(&root, "nope.c").unwrap_err();
        assert_eq!(err.prefix(), Some(""));
        assert!(err.is_resolution_failure());

        let err = nav.read(&root, "name[0]").unwrap_err();
        assert!(matches!(
            err.kind(),
            PropertyErrorKind::AccessorNotApplicable {
                mode: AccessorMode::GetIndexed,
                ..
            }
        ));
    }

    #[test]
    fn parse_errors_precede_side_effects() {
        let registry = DescriptorRegistry::new();
        let nav = PathNavigator::new(&registry);
        let mut root = Root::default();

        let err = nav
            .set(&mut root, "a.b[", string("x"), TraversalMode::CreateIfNull)
            .unwrap_err();
        assert!(matches!(err.kind(), PropertyErrorKind::IllegalPathSyntax(_)));
        assert!(root.a.b.is_none());
    }

    #[test]
    fn computed_getter_is_read_through() {
        let registry = DescriptorRegistry::new();
        let nav = PathNavigator::new(&registry);
        let mut guarded = Guarded { level: 2 };

        assert!(nav.read(&guarded, "computed").unwrap().is_some());
        let c = nav
            .get_as::<String>(&mut guarded, "computed.c", TraversalMode::Read)
            .unwrap();
        assert_eq!(c.as_deref(), Some("level 2"));

        let err = nav
            .get(&mut guarded, "computed.c", TraversalMode::CreateIfNull)
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            PropertyErrorKind::AccessorNotApplicable {
                mode: AccessorMode::Get,
                ..
            }
        ));
    }

    #[test]
    fn containers_behind_accessors() {
        let registry = DescriptorRegistry::new();
        let nav = PathNavigator::new(&registry);
        let mut bean = Bean {
            items: vec![String::from("a")],
            ..Bean::default()
        };

        let first = nav.read(&bean, "items[0]").unwrap().unwrap();
        assert_eq!(first.downcast_ref::<String>().map(String::as_str), Some("a"));
        assert_eq!(nav.size(&mut bean, "items", TraversalMode::Read).unwrap(), Some(1));

        assert!(nav.set(&mut bean, "items[0]", string("b"), TraversalMode::Read).unwrap());
        assert!(
            nav.add_element(&mut bean, "item", String::from("c"), TraversalMode::Read)
                .unwrap()
        );
        assert_eq!(bean.items, ["b", "c"]);
        assert_eq!(bean.writes, 2);

        let err = nav
            .set(&mut bean, "items[5]", string("x"), TraversalMode::Read)
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            PropertyErrorKind::IndexOutOfRange { index: 5, len: 2, .. }
        ));
        assert_eq!(bean.writes, 2);
    }

    #[test]
    fn map_behind_accessors() {
        let registry = DescriptorRegistry::new();
        let nav = PathNavigator::new(&registry);
        let mut bean = Bean::default();

        assert!(nav.read(&bean, "labels['k']").unwrap().is_none());
        assert_eq!(nav.size(&mut bean, "labels", TraversalMode::Read).unwrap(), None);
        assert!(
            !nav.set(&mut bean, "labels['k']", string("v"), TraversalMode::Read)
                .unwrap()
        );
        assert!(bean.labels.is_none());

        assert!(
            nav.set(&mut bean, "labels['k']", string("v"), TraversalMode::CreateIfNull)
                .unwrap()
        );
        assert_eq!(nav.size(&mut bean, "labels", TraversalMode::Read).unwrap(), Some(1));
        let value = nav.read(&bean, "labels['k']").unwrap().unwrap();
        assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("v"));

        nav.set(&mut bean, "labels['k']", None, TraversalMode::Read).unwrap();
        assert_eq!(bean.labels.as_ref().map(BTreeMap::len), Some(0));
    }

    #[test]
    fn getter_only_list_reads_through() {
        let registry = DescriptorRegistry::new();
        let nav = PathNavigator::new(&registry);
        let mut bean = Bean::default();

        let c = nav.get_as::<String>(&mut bean, "leaves[0].c", TraversalMode::Read);
        assert_eq!(c.unwrap().as_deref(), Some("first"));

        let err = nav
            .set(&mut bean, "leaves[0]", Some(Value::new(Leaf::default())), TraversalMode::Read)
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            PropertyErrorKind::AccessorNotApplicable {
                mode: AccessorMode::SetIndexed,
                ..
            }
        ));

        let err = nav
            .set(&mut bean, "leaves[0].c", string("x"), TraversalMode::CreateIfNull)
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            PropertyErrorKind::AccessorNotApplicable {
                mode: AccessorMode::GetIndexed,
                ..
            }
        ));
    }

    #[test]
    fn replace_existing_entries() {
        let registry = DescriptorRegistry::new();
        let nav = PathNavigator::new(&registry);
        let mut values = BTreeMap::new();
        values.insert(String::from("k"), String::from("old"));
        let mut root = Root {
            items: Some(vec![String::from("a"), String::from("b")]),
            values: Some(values),
            ..Root::default()
        };

        assert!(nav.set(&mut root, "items[1]", string("B"), TraversalMode::Read).unwrap());
        assert_eq!(root.items, Some(vec![String::from("a"), String::from("B")]));

        let err = nav
            .set(&mut root, "items[2]", string("c"), TraversalMode::Read)
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            PropertyErrorKind::IndexOutOfRange { index: 2, len: 2, .. }
        ));
        assert_eq!(root.items.as_ref().map(Vec::len), Some(2));

        assert!(
            nav.set(&mut root, "values['k']", string("new"), TraversalMode::Read)
                .unwrap()
        );
        let values = root.values.as_ref().unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values.get("k").map(String::as_str), Some("new"));
    }

    #[test]
    fn replacing_in_a_null_list_creates_nothing() {
        let registry = DescriptorRegistry::new();
        let nav = PathNavigator::new(&registry);
        let mut root = Root::default();

        let err = nav
            .set(&mut root, "items[0]", string("x"), TraversalMode::CreateIfNull)
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            PropertyErrorKind::IndexOutOfRange { index: 0, len: 0, .. }
        ));
        assert!(root.items.is_none());

        assert!(!nav.set(&mut root, "items[0]", string("x"), TraversalMode::Read).unwrap());
        assert!(root.items.is_none());
    }

    #[test]
    fn full_map_names_the_key() {
        let registry = DescriptorRegistry::new();
        let config = NavigatorConfig::new().with_auto_grow_limit(1);
        let nav = PathNavigator::new(&registry).with_config(config);
        let mut root = Root::default();

        nav.set(&mut root, "nodes['a'].c", string("x"), TraversalMode::CreateIfNull)
            .unwrap();
        let err = nav
            .set(&mut root, "nodes['b'].c", string("y"), TraversalMode::CreateIfNull)
            .unwrap_err();
        assert!(matches!(err.kind(), PropertyErrorKind::MapFull { len: 1, .. }));
        assert!(err.to_string().contains("key `b`"));
        assert_eq!(root.nodes.len(), 1);
    }

    #[test]
    fn target_failures_are_invocation_failures() {
        let registry = DescriptorRegistry::new();
        let nav = PathNavigator::new(&registry);
        let mut guarded = Guarded::default();

        assert!(
            nav.set(&mut guarded, "level", Some(Value::new(3_u8)), TraversalMode::Read)
                .unwrap()
        );
        assert_eq!(guarded.level, 3);

        let err = nav
            .set(&mut guarded, "level", Some(Value::new(42_u8)), TraversalMode::Read)
            .unwrap_err();
        assert!(err.is_invocation_failure());
        assert!(core::error::Error::source(&err).is_some());
        assert_eq!(guarded.level, 3);
    }

    #[test]
    fn add_with_index() {
        let registry = DescriptorRegistry::new();
        let config = NavigatorConfig::new().with_auto_grow_limit(4);
        let nav = PathNavigator::new(&registry).with_config(config);
        let mut root = Root::default();

        nav.add_element(&mut root, "item", String::from("b"), TraversalMode::CreateIfNull)
            .unwrap();
        nav.add_element(&mut root, "item[0]", String::from("a"), TraversalMode::Read)
            .unwrap();
        nav.add_element(&mut root, "items[3]", String::from("c"), TraversalMode::Read)
            .unwrap();
        assert_eq!(root.items, Some(vec![String::from("a"), String::from("b"), String::from("c")]));

        let err = nav
            .add_element(&mut root, "items[4]", String::from("d"), TraversalMode::Read)
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            PropertyErrorKind::IndexOutOfRange { index: 4, len: 3, .. }
        ));
    }

    #[test]
    fn intermediate_collections_grow() {
        let registry = DescriptorRegistry::new();
        let nav = PathNavigator::new(&registry);
        let mut root = Root::default();

        let err = nav.read(&root, "leaves[2].c").unwrap_err();
        assert!(matches!(err.kind(), PropertyErrorKind::IndexOutOfRange { .. }));
        assert_eq!(err.prefix(), Some(""));

        assert!(
            nav.set(&mut root, "leaves[2].c", string("third"), TraversalMode::CreateIfNull)
                .unwrap()
        );
        assert_eq!(root.leaves.len(), 3);
        assert_eq!(root.leaves[2].c.as_deref(), Some("third"));

        assert!(nav.get(&mut root, "nodes['x'].c", TraversalMode::Read).unwrap().is_none());
        assert!(root.nodes.is_empty());
        nav.set(&mut root, "nodes['x'].c", string("ex"), TraversalMode::CreateIfNull)
            .unwrap();
        assert_eq!(root.nodes["x"].c.as_deref(), Some("ex"));
    }

    #[test]
    fn grow_limit_is_enforced() {
        let registry = DescriptorRegistry::new();
        let config = NavigatorConfig::new().with_auto_grow_limit(2);
        let nav = PathNavigator::new(&registry).with_config(config);
        let mut root = Root::default();

        let err = nav
            .set(&mut root, "leaves[2].c", string("x"), TraversalMode::CreateIfNull)
            .unwrap_err();
        assert!(matches!(err.kind(), PropertyErrorKind::IndexOutOfRange { index: 2, .. }));
        assert!(root.leaves.is_empty());
    }

    #[test]
    fn unreachable_growth_creates_nothing() {
        let registry = DescriptorRegistry::new();
        let config = NavigatorConfig::new().with_auto_grow_limit(2);
        let nav = PathNavigator::new(&registry).with_config(config);
        let mut root = Root::default();

        let err = nav
            .set(&mut root, "branches[2].c", string("x"), TraversalMode::CreateIfNull)
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            PropertyErrorKind::IndexOutOfRange { index: 2, len: 0, .. }
        ));
        assert!(root.branches.is_none());

        let sealed = nav.clone().with_config(NavigatorConfig::new().with_auto_grow_limit(0));
        let err = sealed
            .set(&mut root, "named['a'].c", string("x"), TraversalMode::CreateIfNull)
            .unwrap_err();
        assert!(matches!(err.kind(), PropertyErrorKind::MapFull { len: 0, .. }));
        assert!(root.named.is_none());
    }

    #[test]
    fn refusing_factory() {
        let registry = DescriptorRegistry::new();
        let refuse = |_: &TypeDescriptor| -> Option<Value> { None };
        let nav = PathNavigator::new(&registry).with_object_factory(refuse);
        let mut root = Root::default();

        let err = nav
            .set(&mut root, "a.b.c", string("x"), TraversalMode::CreateIfNull)
            .unwrap_err();
        assert!(matches!(err.kind(), PropertyErrorKind::InstantiationFailed { .. }));
        assert_eq!(err.prefix(), Some("a"));
        assert!(root.a.b.is_none());
    }

    #[test]
    fn reusable_parsed_path() {
        let registry = DescriptorRegistry::new();
        let nav = PathNavigator::new(&registry);
        let path = PropertyPath::parse("a.b.c").unwrap();

        let mut first = Root::default();
        let mut second = Root::default();
        nav.set(&mut first, &path, string("1"), TraversalMode::CreateIfNull).unwrap();
        nav.set(&mut second, &path, string("2"), TraversalMode::CreateIfNull).unwrap();

        let read = |root: &Root| {
            let value = nav.read(root, &path).unwrap();
            value.and_then(|v| v.downcast::<String>().ok())
        };
        assert_eq!(read(&first).as_deref(), Some("1"));
        assert_eq!(read(&second).as_deref(), Some("2"));
    }

    #[test]
    fn custom_messages() {
        let registry = DescriptorRegistry::new();
        let nav = PathNavigator::new(&registry)
            .with_messages(|err: &PropertyError| format!("E: {}", err.kind()));
        let root = Root::default();

        let err = nav.read(&root, "missing").unwrap_err();
        assert_eq!(nav.describe_error(&err), format!("E: {}", err.kind()));
        assert!(nav.describe_error(&err).starts_with("E: "));
        assert_ne!(nav.describe_error(&err), err.to_string());
    }
}
