use alloc::string::String;

use crate::describe::Describe;

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Describe for $ty {
                #[inline]
                fn default_instance() -> Option<Self> {
                    Some(<$ty as Default>::default())
                }
            }
        )*

        crate::impl_plain_slot!($($ty),*);
    };
}

impl_scalar!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, String,
);

#[cfg(test)]
mod tests {
    use crate::describe::{ContainerKind, NullValue, Slot, TypeTag, Value};

    #[test]
    fn scalars_are_plain_slots() {
        let mut port = 80_u16;
        assert!(!<u16 as Slot>::NULLABLE);
        assert_eq!(port.put(None), Err(NullValue));
        assert_eq!(port.put(Some(8080)), Ok(()));
        assert_eq!(Slot::get(&port), Some(&8080));
    }

    #[test]
    fn scalars_have_defaults() {
        let tag = TypeTag::of::<String>();
        assert_eq!(tag.container(), ContainerKind::None);
        assert_eq!(tag.element(), None);

        let value = Value::new(String::from("x"));
        assert_eq!(value.type_tag(), tag);
    }
}
