//! # Value Inspection
//!
//! Turns any `serde::Serialize` value into a [`Value`], so assertions can look
//! inside caller-defined types without those types implementing anything but
//! `Serialize`.
//!
//! ## Mapping
//!
//! - `Option::None` becomes a nil reference, `Some(v)` a reference to `v`
//! - `()` becomes the absence-of-value
//! - sequences become `List`, `serialize_bytes` becomes `Bytes`
//! - tuples become `Tuple`; serde reports fixed-size arrays as tuples too, so
//!   an inspected `[T; N]` is a `Tuple` (use `Value::from` for an `Array`)
//! - structs, tuple structs and enum variants become `Struct`; variants are
//!   named `Enum::Variant` and positional fields are named `0`, `1`, ...
//! - map keys must be scalars and keep their type

use serde::ser::{self, Serialize};

use crate::errors::{InspectError, InspectResult};
use crate::value::{FloatType, IntType, MapKey, Struct, Value};

/// Converts `value` into a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use verity::{inspect::to_value, predicates::is_empty};
///
/// #[derive(Serialize, Default)]
/// struct Config {
///     name: String,
///     retries: u32,
/// }
///
/// let value = to_value(&Some(Config::default())).unwrap();
/// assert!(is_empty(&value));
/// assert_eq!(value.type_name(), "&Config");
/// ```
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> InspectResult<Value> {
    value.serialize(ValueSerializer)
}

/// The serializer behind [`to_value`].
pub struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = InspectError;

    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = StructBuilder;
    type SerializeTupleVariant = StructBuilder;
    type SerializeMap = MapBuilder;
    type SerializeStruct = StructBuilder;
    type SerializeStructVariant = StructBuilder;

    fn serialize_bool(self, v: bool) -> InspectResult<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> InspectResult<Value> {
        Ok(Value::Int(v.into(), IntType::I8))
    }

    fn serialize_i16(self, v: i16) -> InspectResult<Value> {
        Ok(Value::Int(v.into(), IntType::I16))
    }

    fn serialize_i32(self, v: i32) -> InspectResult<Value> {
        Ok(Value::Int(v.into(), IntType::I32))
    }

    fn serialize_i64(self, v: i64) -> InspectResult<Value> {
        Ok(Value::Int(v.into(), IntType::I64))
    }

    fn serialize_u8(self, v: u8) -> InspectResult<Value> {
        Ok(Value::Int(v.into(), IntType::U8))
    }

    fn serialize_u16(self, v: u16) -> InspectResult<Value> {
        Ok(Value::Int(v.into(), IntType::U16))
    }

    fn serialize_u32(self, v: u32) -> InspectResult<Value> {
        Ok(Value::Int(v.into(), IntType::U32))
    }

    fn serialize_u64(self, v: u64) -> InspectResult<Value> {
        Ok(Value::Int(v.into(), IntType::U64))
    }

    fn serialize_f32(self, v: f32) -> InspectResult<Value> {
        Ok(Value::Float(v.into(), FloatType::F32))
    }

    fn serialize_f64(self, v: f64) -> InspectResult<Value> {
        Ok(Value::Float(v, FloatType::F64))
    }

    fn serialize_char(self, v: char) -> InspectResult<Value> {
        Ok(Value::Char(v))
    }

    fn serialize_str(self, v: &str) -> InspectResult<Value> {
        Ok(Value::Str(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> InspectResult<Value> {
        Ok(Value::bytes(v))
    }

    fn serialize_none(self) -> InspectResult<Value> {
        Ok(Value::Ref(None))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> InspectResult<Value> {
        Ok(Value::reference(value.serialize(self)?))
    }

    fn serialize_unit(self) -> InspectResult<Value> {
        Ok(Value::Nil)
    }

    fn serialize_unit_struct(self, name: &'static str) -> InspectResult<Value> {
        Ok(Struct::new(name).into())
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> InspectResult<Value> {
        Ok(Struct::new(variant_name(name, variant)).into())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> InspectResult<Value> {
        Ok(Struct::new(name).field("0", value.serialize(self)?).into())
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> InspectResult<Value> {
        let inner = value.serialize(self)?;
        Ok(Struct::new(variant_name(name, variant))
            .field("0", inner)
            .into())
    }

    fn serialize_seq(self, len: Option<usize>) -> InspectResult<SeqBuilder> {
        Ok(SeqBuilder::new(len.unwrap_or(0), false))
    }

    fn serialize_tuple(self, len: usize) -> InspectResult<SeqBuilder> {
        Ok(SeqBuilder::new(len, true))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> InspectResult<StructBuilder> {
        Ok(StructBuilder::new(name.to_string()))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> InspectResult<StructBuilder> {
        Ok(StructBuilder::new(variant_name(name, variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> InspectResult<MapBuilder> {
        Ok(MapBuilder::default())
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> InspectResult<StructBuilder> {
        Ok(StructBuilder::new(name.to_string()))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> InspectResult<StructBuilder> {
        Ok(StructBuilder::new(variant_name(name, variant)))
    }
}

fn variant_name(name: &str, variant: &str) -> String {
    format!("{}::{}", name, variant)
}

// ============================================================================
// COMPOUND BUILDERS
// ============================================================================

/// Collects sequence and tuple elements.
pub struct SeqBuilder {
    items: Vec<Value>,
    tuple: bool,
}

impl SeqBuilder {
    fn new(capacity: usize, tuple: bool) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            tuple,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> InspectResult<()> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn finish(self) -> Value {
        if self.tuple {
            Value::Tuple(self.items)
        } else {
            Value::List(Some(self.items))
        }
    }
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = Value;
    type Error = InspectError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> InspectResult<()> {
        self.push(value)
    }

    fn end(self) -> InspectResult<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = Value;
    type Error = InspectError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> InspectResult<()> {
        self.push(value)
    }

    fn end(self) -> InspectResult<Value> {
        Ok(self.finish())
    }
}

/// Collects named or positional record fields.
pub struct StructBuilder {
    record: Struct,
}

impl StructBuilder {
    fn new(name: String) -> Self {
        Self {
            record: Struct::new(name),
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, name: String, value: &T) -> InspectResult<()> {
        let value = value.serialize(ValueSerializer)?;
        self.record.push(name, value);
        Ok(())
    }

    fn push_positional<T: ?Sized + Serialize>(&mut self, value: &T) -> InspectResult<()> {
        let index = self.record.fields().len();
        self.push(index.to_string(), value)
    }
}

impl ser::SerializeStruct for StructBuilder {
    type Ok = Value;
    type Error = InspectError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> InspectResult<()> {
        self.push(key.to_string(), value)
    }

    fn end(self) -> InspectResult<Value> {
        Ok(self.record.into())
    }
}

impl ser::SerializeStructVariant for StructBuilder {
    type Ok = Value;
    type Error = InspectError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> InspectResult<()> {
        self.push(key.to_string(), value)
    }

    fn end(self) -> InspectResult<Value> {
        Ok(self.record.into())
    }
}

impl ser::SerializeTupleStruct for StructBuilder {
    type Ok = Value;
    type Error = InspectError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> InspectResult<()> {
        self.push_positional(value)
    }

    fn end(self) -> InspectResult<Value> {
        Ok(self.record.into())
    }
}

impl ser::SerializeTupleVariant for StructBuilder {
    type Ok = Value;
    type Error = InspectError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> InspectResult<()> {
        self.push_positional(value)
    }

    fn end(self) -> InspectResult<Value> {
        Ok(self.record.into())
    }
}

/// Collects map entries keyed by scalar keys.
#[derive(Default)]
pub struct MapBuilder {
    entries: im::OrdMap<MapKey, Value>,
    pending_key: Option<MapKey>,
}

impl ser::SerializeMap for MapBuilder {
    type Ok = Value;
    type Error = InspectError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> InspectResult<()> {
        self.pending_key = Some(map_key(key.serialize(ValueSerializer)?)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> InspectResult<()> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| InspectError::Custom("map value without a key".to_string()))?;
        self.entries.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> InspectResult<Value> {
        Ok(Value::Map(Some(self.entries)))
    }
}

fn map_key(key: Value) -> InspectResult<MapKey> {
    MapKey::try_from(key).map_err(|other| InspectError::KeyMustBeScalar {
        found: other.type_name(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::Serialize;

    use super::*;
    use crate::predicates::{deep_equal, is_empty, is_nil};

    #[derive(Serialize, Default)]
    struct Account {
        id: u64,
        owner: String,
        tags: Vec<String>,
        parent: Option<Box<Account>>,
    }

    #[derive(Serialize)]
    enum Shape {
        Empty,
        Circle(f64),
        Rect { w: u32, h: u32 },
    }

    #[test]
    fn records_keep_names_and_field_order() {
        let value = to_value(&Account {
            id: 7,
            owner: "ada".into(),
            ..Default::default()
        })
        .unwrap();
        let Value::Struct(record) = &value else {
            panic!("expected a record, got {:?}", value);
        };
        assert_eq!(record.name(), "Account");
        let names: Vec<&str> = record.fields().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["id", "owner", "tags", "parent"]);
        assert!(deep_equal(record.get("id").unwrap(), &Value::from(7u64)));
        assert!(is_nil(record.get("parent").unwrap()));
    }

    #[test]
    fn default_record_is_not_empty_because_vec_is_not_nil() {
        // a Rust Vec is never nil, so the record is not its zero value
        let value = to_value(&Account::default()).unwrap();
        assert!(!is_empty(&value));
    }

    #[test]
    fn enum_variants() {
        let empty = to_value(&Shape::Empty).unwrap();
        assert_eq!(empty.type_name(), "Shape::Empty");
        let circle = to_value(&Shape::Circle(1.5)).unwrap();
        assert_eq!(format!("{:#}", circle), "{0:1.5}");
        let rect = to_value(&Shape::Rect { w: 2, h: 3 }).unwrap();
        assert_eq!(format!("{:#}", rect), "{w:2 h:3}");
        assert!(!deep_equal(&empty, &rect));
    }

    #[test]
    fn tuples_keep_their_element_types() {
        let value = to_value(&(1u8, "a")).unwrap();
        assert_eq!(value.type_name(), "(u8, String)");
        assert_eq!(value.to_string(), "(1, a)");
        assert!(!deep_equal(&to_value(&(0, 0)).unwrap(), &Value::from([0, 0])));
        assert!(deep_equal(&to_value(&(0, 0)).unwrap(), &to_value(&(0, 0)).unwrap()));
    }

    #[test]
    fn map_keys() {
        let mut scores = BTreeMap::new();
        scores.insert(3, "c");
        scores.insert(1, "a");
        let value = to_value(&scores).unwrap();
        assert_eq!(value.to_string(), "map[1:a 3:c]");
        assert_eq!(value.type_name(), "Map<i32, String>");

        let mut by_name = BTreeMap::new();
        by_name.insert("3", "c");
        by_name.insert("1", "a");
        assert!(!deep_equal(&value, &to_value(&by_name).unwrap()));

        let mut numeric = BTreeMap::new();
        numeric.insert(10u32, 2);
        numeric.insert(3u32, 1);
        assert_eq!(to_value(&numeric).unwrap().to_string(), "map[3:1 10:2]");

        let mut bad = BTreeMap::new();
        bad.insert(vec![1], 1);
        assert_eq!(
            to_value(&bad),
            Err(InspectError::KeyMustBeScalar {
                found: "Vec<i32>".to_string()
            })
        );
    }

    #[test]
    fn unit_is_absence() {
        assert!(matches!(to_value(&()).unwrap(), Value::Nil));
    }
}
