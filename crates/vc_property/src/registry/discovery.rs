//! Resolves a [`TypeDescription`] into a [`TypeDescriptor`].
//!
//! Candidates are grouped by property name in declaration order. Plain names
//! are placed first so that singular candidates (`adder`, `counter`) can be
//! attached to the plural property when one exists. Container fields then
//! receive synthesized fallback accessors, as do containers exposed only
//! through an explicit getter. Two accessors of the same origin for the same
//! property and mode make the type ambiguous.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::access::{Accessor, AccessorMode, AccessorOrigin, Invoker, RoundTrip};
use crate::describe::{CandidateKind, ContainerKind, NameForm, TypeDescription, TypeTag};
use crate::descriptor::{PropertyDescriptor, TypeDescriptor};
use crate::hash::{HashMap, new_map};
use crate::registry::NamingConvention;
use crate::{PropertyErrorKind, PropertyResult};

pub(crate) fn discover(
    description: TypeDescription,
    naming: &dyn NamingConvention,
) -> PropertyResult<TypeDescriptor> {
    let (owner, candidates, constructor) = description.into_parts();
    let (plain, singular): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|candidate| candidate.form == NameForm::Plain);

    let mut table = PropertyTable::new(owner);

    for candidate in plain {
        table.add(candidate.name.into(), candidate.kind);
    }

    for candidate in singular {
        let plural = naming.plural(candidate.name);
        let name: Box<str> = if table.contains(&plural) {
            plural.into()
        } else {
            candidate.name.into()
        };
        table.add(name, candidate.kind);
    }

    let properties = table.finish()?;
    log::debug!(
        "discovered {} properties on `{}`",
        properties.len(),
        owner.name()
    );
    Ok(TypeDescriptor::new(owner, properties, constructor))
}

// -----------------------------------------------------------------------------
// PropertyTable

struct Entry {
    name: Box<str>,
    value_type: Option<TypeTag>,
    accessors: Vec<Accessor>,
}

impl Entry {
    /// Gives a container behind an explicit getter the same element and size
    /// fallbacks a container field gets. Writes need an explicit setter.
    fn add_round_trips(&mut self, owner: TypeTag) {
        let field_backed = self
            .accessors
            .iter()
            .any(|a| matches!(a.invoker(), Invoker::Field(_)));
        if field_backed {
            return;
        }

        let Some((get, declared)) = self.accessors.iter().find_map(|a| match a.invoker() {
            Invoker::Get(get) => Some((get.clone(), a.value_type())),
            _ => None,
        }) else {
            return;
        };
        let Some(element) = declared.element() else {
            return;
        };
        let set = self.accessors.iter().find_map(|a| match a.invoker() {
            Invoker::Set(set) if a.value_type() == declared => Some(set.clone()),
            _ => None,
        });

        let (reads, writes): (&[AccessorMode], &[AccessorMode]) = match declared.container() {
            ContainerKind::List => (
                &[AccessorMode::GetIndexed][..],
                &[AccessorMode::SetIndexed, AccessorMode::AddIndexed][..],
            ),
            ContainerKind::Map => (&[AccessorMode::GetMapped][..], &[AccessorMode::SetMapped][..]),
            ContainerKind::None => return,
        };
        let writes = if set.is_some() { writes } else { &[] };

        let through = RoundTrip { declared, get, set };
        for &mode in reads.iter().chain(writes) {
            self.accessors.push(Accessor::new(
                owner,
                self.name.clone(),
                mode,
                AccessorOrigin::Fallback,
                element,
                Invoker::Through(through.clone()),
            ));
        }
        self.accessors.push(Accessor::new(
            owner,
            self.name.clone(),
            AccessorMode::Size,
            AccessorOrigin::Fallback,
            TypeTag::of::<usize>(),
            Invoker::Through(through),
        ));
    }
}

struct PropertyTable {
    owner: TypeTag,
    entries: Vec<Entry>,
    index: HashMap<Box<str>, usize>,
}

impl PropertyTable {
    fn new(owner: TypeTag) -> Self {
        Self {
            owner,
            entries: Vec::new(),
            index: new_map(),
        }
    }

    #[inline]
    fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    fn entry(&mut self, name: Box<str>) -> &mut Entry {
        let i = match self.index.get(&*name) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.index.insert(name.clone(), i);
                self.entries.push(Entry {
                    name,
                    value_type: None,
                    accessors: Vec::new(),
                });
                i
            }
        };
        &mut self.entries[i]
    }

    fn add(&mut self, name: Box<str>, kind: CandidateKind) {
        let owner = self.owner;
        let entry = self.entry(name);
        let mut push = |mode, origin, value_type, invoker| {
            let property = entry.name.clone();
            entry.accessors.push(Accessor::new(
                owner, property, mode, origin, value_type, invoker,
            ));
        };

        match kind {
            CandidateKind::Field { access, writable } => {
                let declared = access.declared();
                push(
                    AccessorMode::Get,
                    AccessorOrigin::Field,
                    declared,
                    Invoker::Field(access.clone()),
                );
                if writable {
                    push(
                        AccessorMode::Set,
                        AccessorOrigin::Field,
                        declared,
                        Invoker::Field(access.clone()),
                    );
                }

                let element = declared.element();
                match (declared.container(), element) {
                    (ContainerKind::List, Some(element)) => {
                        for mode in [
                            AccessorMode::GetIndexed,
                            AccessorMode::SetIndexed,
                            AccessorMode::AddIndexed,
                        ] {
                            push(
                                mode,
                                AccessorOrigin::Fallback,
                                element,
                                Invoker::List(access.clone()),
                            );
                        }
                        push(
                            AccessorMode::Size,
                            AccessorOrigin::Fallback,
                            TypeTag::of::<usize>(),
                            Invoker::List(access),
                        );
                    }
                    (ContainerKind::Map, Some(element)) => {
                        for mode in [AccessorMode::GetMapped, AccessorMode::SetMapped] {
                            push(
                                mode,
                                AccessorOrigin::Fallback,
                                element,
                                Invoker::Map(access.clone()),
                            );
                        }
                        push(
                            AccessorMode::Size,
                            AccessorOrigin::Fallback,
                            TypeTag::of::<usize>(),
                            Invoker::Map(access),
                        );
                    }
                    _ => {}
                }

                entry.value_type = Some(declared);
            }
            CandidateKind::Explicit {
                mode,
                value_type,
                invoker,
            } => {
                push(mode, AccessorOrigin::Explicit, value_type, invoker);
                let declares_type = matches!(mode, AccessorMode::Get | AccessorMode::Set);
                if declares_type && entry.value_type.is_none() {
                    entry.value_type = Some(value_type);
                }
            }
        }
    }

    fn finish(self) -> PropertyResult<Vec<PropertyDescriptor>> {
        let owner = self.owner;
        self.entries
            .into_iter()
            .map(|mut entry| -> PropertyResult<PropertyDescriptor> {
                entry.add_round_trips(owner);
                for (i, a) in entry.accessors.iter().enumerate() {
                    let clash = entry.accessors[..i]
                        .iter()
                        .any(|b| b.mode() == a.mode() && b.origin() == a.origin());
                    if clash {
                        return Err(PropertyErrorKind::AmbiguousAccessor {
                            type_name: owner.name(),
                            property: entry.name.clone(),
                            mode: a.mode(),
                        }
                        .into());
                    }
                }
                Ok(PropertyDescriptor::new(
                    entry.name,
                    entry.value_type,
                    entry.accessors,
                ))
            })
            .collect()
    }
}
