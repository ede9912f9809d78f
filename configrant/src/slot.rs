//! Storage slots for leaf fields and the field shape seen by the walker

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::time::Duration;

use crate::error::ConvertError;
use crate::record::Record;
use crate::setter::{Kind, Value};

/// Writable storage of a leaf field.
///
/// Implemented for `String`, `bool`, the integer and float primitives up to 64
/// bits, `std::time::Duration`, and `Vec`, `HashMap` and `BTreeMap` of those.
pub trait Slot {
    /// Kind used to select the setter.
    fn kind(&self) -> Kind;

    /// True while the slot still holds its type's zero value.
    fn is_zero(&self) -> bool;

    /// Replace the content with `value`.
    fn store(&mut self, value: Value) -> Result<(), ConvertError>;

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// How a field presents itself to the walker.
pub enum Node<'a> {
    Leaf(&'a mut dyn Slot),
    Record(&'a mut dyn Record),
}

/// A field type: either a leaf slot or a nested record.
///
/// `#[derive(Configrant)]` implements this for records. `Option<T>` and
/// `Box<T>` forward to `T`; an unset `Option` is filled with `T::default()`
/// when its node is requested, so nested optional records are populated too.
pub trait Member {
    fn node(&mut self) -> Node<'_>;

    /// True when [`Member::node`] yields a record. Never allocates storage.
    fn is_record(&self) -> bool;
}

fn mismatch<S: Slot + ?Sized>(slot: &S, value: &Value) -> ConvertError {
    ConvertError::Mismatch {
        type_name: slot.type_name(),
        found: value.kind_name(),
    }
}

macro_rules! leaf_member {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Member for $ty {
                fn node(&mut self) -> Node<'_> {
                    Node::Leaf(self)
                }

                fn is_record(&self) -> bool {
                    false
                }
            }
        )*
    };
}

impl Slot for String {
    fn kind(&self) -> Kind {
        Kind::Str
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn store(&mut self, value: Value) -> Result<(), ConvertError> {
        match value {
            Value::Str(value) => {
                *self = value;
                Ok(())
            }
            other => Err(mismatch(self, &other)),
        }
    }
}

impl Slot for bool {
    fn kind(&self) -> Kind {
        Kind::Bool
    }

    fn is_zero(&self) -> bool {
        !*self
    }

    fn store(&mut self, value: Value) -> Result<(), ConvertError> {
        match value {
            Value::Bool(value) => {
                *self = value;
                Ok(())
            }
            other => Err(mismatch(self, &other)),
        }
    }
}

macro_rules! integer_slot {
    ($kind:ident => $($ty:ty),*) => {
        $(
            impl Slot for $ty {
                fn kind(&self) -> Kind {
                    Kind::$kind { bits: <$ty>::BITS }
                }

                fn is_zero(&self) -> bool {
                    *self == 0
                }

                fn store(&mut self, value: Value) -> Result<(), ConvertError> {
                    match value {
                        Value::$kind(value) => {
                            *self = <$ty>::try_from(value).map_err(|e| {
                                ConvertError::parse(self.kind(), value.to_string(), e)
                            })?;
                            Ok(())
                        }
                        other => Err(mismatch(self, &other)),
                    }
                }
            }

            leaf_member!($ty);
        )*
    };
}

integer_slot!(Int => i8, i16, i32, i64, isize);
integer_slot!(Uint => u8, u16, u32, u64, usize);

impl Slot for f32 {
    fn kind(&self) -> Kind {
        Kind::Float { bits: 32 }
    }

    fn is_zero(&self) -> bool {
        self.to_bits() == 0
    }

    fn store(&mut self, value: Value) -> Result<(), ConvertError> {
        match value {
            Value::Float(value) => {
                *self = value as f32;
                Ok(())
            }
            other => Err(mismatch(self, &other)),
        }
    }
}

impl Slot for f64 {
    fn kind(&self) -> Kind {
        Kind::Float { bits: 64 }
    }

    fn is_zero(&self) -> bool {
        self.to_bits() == 0
    }

    fn store(&mut self, value: Value) -> Result<(), ConvertError> {
        match value {
            Value::Float(value) => {
                *self = value;
                Ok(())
            }
            other => Err(mismatch(self, &other)),
        }
    }
}

impl Slot for Duration {
    fn kind(&self) -> Kind {
        Kind::Duration
    }

    fn is_zero(&self) -> bool {
        Duration::is_zero(self)
    }

    fn store(&mut self, value: Value) -> Result<(), ConvertError> {
        match value {
            Value::Duration(value) => {
                *self = value;
                Ok(())
            }
            other => Err(mismatch(self, &other)),
        }
    }
}

leaf_member!(String, bool, f32, f64, Duration);

fn store_element<T: Slot + Default>(value: Value) -> Result<T, ConvertError> {
    let mut element = T::default();
    element.store(value)?;
    Ok(element)
}

impl<T: Slot + Default> Slot for Vec<T> {
    fn kind(&self) -> Kind {
        Kind::Seq(Box::new(T::default().kind()))
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn store(&mut self, value: Value) -> Result<(), ConvertError> {
        match value {
            Value::Seq(items) => {
                *self = items
                    .into_iter()
                    .map(store_element)
                    .collect::<Result<_, _>>()?;
                Ok(())
            }
            other => Err(mismatch(self, &other)),
        }
    }
}

impl<T: Slot + Default> Member for Vec<T> {
    fn node(&mut self) -> Node<'_> {
        Node::Leaf(self)
    }

    fn is_record(&self) -> bool {
        false
    }
}

impl<K, V, S> Slot for HashMap<K, V, S>
where
    K: Slot + Default + Eq + Hash,
    V: Slot + Default,
    S: BuildHasher + Default,
{
    fn kind(&self) -> Kind {
        Kind::Map(Box::new(K::default().kind()), Box::new(V::default().kind()))
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn store(&mut self, value: Value) -> Result<(), ConvertError> {
        match value {
            Value::Map(entries) => {
                let mut map = HashMap::with_capacity_and_hasher(entries.len(), S::default());
                for (key, value) in entries {
                    map.insert(store_element(key)?, store_element(value)?);
                }
                *self = map;
                Ok(())
            }
            other => Err(mismatch(self, &other)),
        }
    }
}

impl<K, V, S> Member for HashMap<K, V, S>
where
    K: Slot + Default + Eq + Hash,
    V: Slot + Default,
    S: BuildHasher + Default,
{
    fn node(&mut self) -> Node<'_> {
        Node::Leaf(self)
    }

    fn is_record(&self) -> bool {
        false
    }
}

impl<K, V> Slot for BTreeMap<K, V>
where
    K: Slot + Default + Ord,
    V: Slot + Default,
{
    fn kind(&self) -> Kind {
        Kind::Map(Box::new(K::default().kind()), Box::new(V::default().kind()))
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn store(&mut self, value: Value) -> Result<(), ConvertError> {
        match value {
            Value::Map(entries) => {
                let mut map = BTreeMap::new();
                for (key, value) in entries {
                    map.insert(store_element(key)?, store_element(value)?);
                }
                *self = map;
                Ok(())
            }
            other => Err(mismatch(self, &other)),
        }
    }
}

impl<K, V> Member for BTreeMap<K, V>
where
    K: Slot + Default + Ord,
    V: Slot + Default,
{
    fn node(&mut self) -> Node<'_> {
        Node::Leaf(self)
    }

    fn is_record(&self) -> bool {
        false
    }
}

impl<T: Member + Default> Member for Option<T> {
    fn node(&mut self) -> Node<'_> {
        self.get_or_insert_with(T::default).node()
    }

    fn is_record(&self) -> bool {
        match self {
            Some(inner) => inner.is_record(),
            None => T::default().is_record(),
        }
    }
}

impl<T: Member + ?Sized> Member for Box<T> {
    fn node(&mut self) -> Node<'_> {
        (**self).node()
    }

    fn is_record(&self) -> bool {
        (**self).is_record()
    }
}
