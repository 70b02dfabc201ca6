use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::container::ListAccess;
use crate::describe::{ContainerKind, Describe, Inspect, TypeTag, Value};
use crate::impls::impl_generic_slot;

// -----------------------------------------------------------------------------
// Vec

impl<T: Describe> Describe for Vec<T> {
    #[inline]
    fn default_instance() -> Option<Self> {
        Some(Vec::new())
    }

    #[inline]
    fn container_kind() -> ContainerKind {
        ContainerKind::List
    }

    #[inline]
    fn element_type() -> Option<TypeTag> {
        Some(TypeTag::of::<T>())
    }

    #[inline]
    fn list_view(&self) -> Option<&dyn ListAccess> {
        Some(self)
    }

    #[inline]
    fn list_view_mut(&mut self) -> Option<&mut dyn ListAccess> {
        Some(self)
    }
}

impl<T: Describe> ListAccess for Vec<T> {
    #[inline]
    fn element_type(&self) -> TypeTag {
        TypeTag::of::<T>()
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Inspect> {
        <[T]>::get(self, index).map(|v| v as &dyn Inspect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Inspect> {
        <[T]>::get_mut(self, index).map(|v| v as &mut dyn Inspect)
    }

    fn set(&mut self, index: usize, value: Value) -> Result<(), Value> {
        let value = value.downcast::<T>()?;
        match <[T]>::get_mut(self, index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Value::new(value)),
        }
    }

    fn insert(&mut self, index: usize, value: Value) -> Result<(), Value> {
        if index > Vec::len(self) {
            return Err(value);
        }
        Vec::insert(self, index, value.downcast::<T>()?);
        Ok(())
    }

    fn push(&mut self, value: Value) -> Result<(), Value> {
        Vec::push(self, value.downcast::<T>()?);
        Ok(())
    }
}

impl_generic_slot!(impl [T: Describe] Vec<T>);

// -----------------------------------------------------------------------------
// VecDeque

impl<T: Describe> Describe for VecDeque<T> {
    #[inline]
    fn default_instance() -> Option<Self> {
        Some(VecDeque::new())
    }

    #[inline]
    fn container_kind() -> ContainerKind {
        ContainerKind::List
    }

    #[inline]
    fn element_type() -> Option<TypeTag> {
        Some(TypeTag::of::<T>())
    }

    #[inline]
    fn list_view(&self) -> Option<&dyn ListAccess> {
        Some(self)
    }

    #[inline]
    fn list_view_mut(&mut self) -> Option<&mut dyn ListAccess> {
        Some(self)
    }
}

impl<T: Describe> ListAccess for VecDeque<T> {
    #[inline]
    fn element_type(&self) -> TypeTag {
        TypeTag::of::<T>()
    }

    #[inline]
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Inspect> {
        VecDeque::get(self, index).map(|v| v as &dyn Inspect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Inspect> {
        VecDeque::get_mut(self, index).map(|v| v as &mut dyn Inspect)
    }

    fn set(&mut self, index: usize, value: Value) -> Result<(), Value> {
        let value = value.downcast::<T>()?;
        match VecDeque::get_mut(self, index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Value::new(value)),
        }
    }

    fn insert(&mut self, index: usize, value: Value) -> Result<(), Value> {
        if index > VecDeque::len(self) {
            return Err(value);
        }
        VecDeque::insert(self, index, value.downcast::<T>()?);
        Ok(())
    }

    fn push(&mut self, value: Value) -> Result<(), Value> {
        VecDeque::push_back(self, value.downcast::<T>()?);
        Ok(())
    }
}

impl_generic_slot!(impl [T: Describe] VecDeque<T>);

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use super::*;

    #[test]
    fn vec_list_access() {
        let mut list: Vec<String> = vec![String::from("a")];
        let view: &mut dyn ListAccess = &mut list;

        assert!(view.push(Value::new(String::from("c"))).is_ok());
        assert!(view.insert(1, Value::new(String::from("b"))).is_ok());
        assert!(view.insert(9, Value::new(String::from("z"))).is_err());
        assert!(view.set(0, Value::new(String::from("A"))).is_ok());

        let rejected = view.push(Value::new(1_u8)).unwrap_err();
        assert!(rejected.is::<u8>());

        assert_eq!(view.len(), 3);
        assert_eq!(list, ["A", "b", "c"]);
    }

    #[test]
    fn deque_list_access() {
        let mut deque: VecDeque<u32> = VecDeque::new();
        let view: &mut dyn ListAccess = &mut deque;
        view.push(Value::new(2_u32)).unwrap();
        view.insert(0, Value::new(1_u32)).unwrap();

        assert_eq!(view.element_type(), TypeTag::of::<u32>());
        assert_eq!(view.get(1).and_then(|v| v.downcast_ref::<u32>()), Some(&2));
        assert_eq!(deque, [1, 2]);
    }
}
