//! # Value Model
//!
//! The type-erased value every assertion works on. A `Value` keeps enough
//! runtime type information to render a type name in diagnostics and to recurse
//! into containers, records and references.
//!
//! ## Kinds
//!
//! - **Scalars**: `Bool`, `Int`, `Float`, `Char`, `Str`
//! - **Nilable**: `Bytes`, `List`, `Map`, `Ref`, `Chan`, `Func`, `RawPtr`
//! - **Composite, never nil**: `Array`, `Tuple`, `Struct`
//! - **Absence**: `Nil`, rendered as `<nil>`

use std::cmp::Ordering;
use std::fmt;

use im::OrdMap;

use crate::predicates;

// ============================================================================
// TYPE TAGS
// ============================================================================

/// Width and signedness of an integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntType {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
}

impl IntType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntType::I8 => "i8",
            IntType::I16 => "i16",
            IntType::I32 => "i32",
            IntType::I64 => "i64",
            IntType::Isize => "isize",
            IntType::U8 => "u8",
            IntType::U16 => "u16",
            IntType::U32 => "u32",
            IntType::U64 => "u64",
            IntType::Usize => "usize",
        }
    }
}

/// Precision of a floating point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatType {
    F32,
    F64,
}

impl FloatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FloatType::F32 => "f32",
            FloatType::F64 => "f64",
        }
    }
}

/// Fieldless mirror of the `Value` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Nil,
    Bool,
    Int,
    Float,
    Char,
    Str,
    Bytes,
    List,
    Array,
    Tuple,
    Map,
    Ref,
    Struct,
    Chan,
    Func,
    RawPtr,
}

/// Kinds whose instances can sit in an empty-handle state.
const NILABLE_KINDS: [Kind; 7] = [
    Kind::Chan,
    Kind::Func,
    Kind::Map,
    Kind::Ref,
    Kind::List,
    Kind::Bytes,
    Kind::RawPtr,
];

impl Kind {
    /// Returns true if values of this kind can be nil.
    ///
    /// `Kind::Nil` is not listed: the absence-of-value is nil by definition,
    /// not because it is a handle.
    pub fn is_nilable(self) -> bool {
        NILABLE_KINDS.contains(&self)
    }
}

// ============================================================================
// HANDLES AND RECORDS
// ============================================================================

/// A record value: a type name plus ordered, named fields.
///
/// # Examples
///
/// ```rust
/// use verity::{Struct, Value};
/// let point = Struct::new("Point").field("x", 0).field("y", 0);
/// assert_eq!(Value::from(point).type_name(), "Point");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Struct {
    name: String,
    fields: Vec<(String, Value)>,
}

impl Struct {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field, keeping declaration order.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

/// A channel handle. Two handles are the same channel iff their ids match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Channel {
    pub id: usize,
    /// Number of queued elements.
    pub len: usize,
    pub cap: usize,
}

impl Channel {
    pub fn new(id: usize, cap: usize) -> Self {
        Self { id, len: 0, cap }
    }

    pub fn with_len(mut self, len: usize) -> Self {
        self.len = len;
        self
    }
}

/// A function handle. Non-nil handles never compare equal, not even to
/// themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Callable {
    pub name: String,
    pub addr: usize,
}

impl Callable {
    pub fn new(name: impl Into<String>, addr: usize) -> Self {
        Self {
            name: name.into(),
            addr,
        }
    }
}

// ============================================================================
// MAP KEYS
// ============================================================================

/// A mapping key. Keys keep their type: the integer `1` and the string `"1"`
/// are different keys, and integer keys sort numerically.
#[derive(Debug, Clone)]
pub enum MapKey {
    Bool(bool),
    Int(i128, IntType),
    Float(f64, FloatType),
    Char(char),
    Str(String),
}

impl MapKey {
    pub fn type_name(&self) -> &'static str {
        match self {
            MapKey::Bool(_) => "bool",
            MapKey::Int(_, ty) => ty.as_str(),
            MapKey::Float(_, ty) => ty.as_str(),
            MapKey::Char(_) => "char",
            MapKey::Str(_) => "String",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            MapKey::Bool(_) => 0,
            MapKey::Int(..) => 1,
            MapKey::Float(..) => 2,
            MapKey::Char(_) => 3,
            MapKey::Str(_) => 4,
        }
    }
}

impl Ord for MapKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (MapKey::Bool(a), MapKey::Bool(b)) => a.cmp(b),
            (MapKey::Int(a, ta), MapKey::Int(b, tb)) => {
                ta.as_str().cmp(tb.as_str()).then(a.cmp(b))
            }
            (MapKey::Float(a, ta), MapKey::Float(b, tb)) => {
                ta.as_str().cmp(tb.as_str()).then(a.total_cmp(b))
            }
            (MapKey::Char(a), MapKey::Char(b)) => a.cmp(b),
            (MapKey::Str(a), MapKey::Str(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for MapKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MapKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MapKey {}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::Bool(b) => write!(f, "{}", b),
            MapKey::Int(n, _) => write!(f, "{}", n),
            MapKey::Float(x, FloatType::F32) => write!(f, "{}", *x as f32),
            MapKey::Float(x, FloatType::F64) => write!(f, "{}", x),
            MapKey::Char(c) => write!(f, "{}", c),
            MapKey::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Scalars become keys; anything else is handed back.
impl TryFrom<Value> for MapKey {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(b) => Ok(MapKey::Bool(b)),
            Value::Int(n, ty) => Ok(MapKey::Int(n, ty)),
            Value::Float(x, ty) => Ok(MapKey::Float(x, ty)),
            Value::Char(c) => Ok(MapKey::Char(c)),
            Value::Str(s) => Ok(MapKey::Str(s)),
            other => Err(other),
        }
    }
}

macro_rules! impl_from_scalar_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for MapKey {
                fn from(key: $ty) -> Self {
                    match Value::from(key) {
                        Value::Bool(b) => MapKey::Bool(b),
                        Value::Int(n, ty) => MapKey::Int(n, ty),
                        Value::Float(x, ty) => MapKey::Float(x, ty),
                        Value::Char(c) => MapKey::Char(c),
                        Value::Str(s) => MapKey::Str(s),
                        other => unreachable!("{} is not a scalar", other.type_name()),
                    }
                }
            }
        )*
    };
}

impl_from_scalar_key!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, char, &str, String,
);

// ============================================================================
// VALUE
// ============================================================================

/// Represents a value under assertion.
///
/// # Examples
///
/// ```rust
/// use verity::Value;
/// let n = Value::from(42);
/// assert_eq!(n.type_name(), "i32");
/// let nil = Value::default();
/// assert!(nil.is_nil());
/// assert_eq!(nil.to_string(), "<nil>");
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    /// Stored widened; the tag keeps the original width.
    Int(i128, IntType),
    Float(f64, FloatType),
    Char(char),
    Str(String),
    Bytes(Option<Vec<u8>>),
    List(Option<Vec<Value>>),
    /// Fixed-size arrays; every element has the same type.
    Array(Vec<Value>),
    /// Tuples; elements may differ in type.
    Tuple(Vec<Value>),
    Map(Option<OrdMap<MapKey, Value>>),
    Ref(Option<Box<Value>>),
    Struct(Struct),
    Chan(Option<Channel>),
    Func(Option<Callable>),
    /// Raw memory handle; `0` is null.
    RawPtr(usize),
}

impl Value {
    /// A non-nil byte sequence.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(Some(bytes.into()))
    }

    pub fn nil_bytes() -> Self {
        Value::Bytes(None)
    }

    pub fn nil_list() -> Self {
        Value::List(None)
    }

    pub fn nil_map() -> Self {
        Value::Map(None)
    }

    /// Builds a non-nil mapping from key/value pairs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use verity::Value;
    /// let a = Value::map([("a", 1), ("b", 2)]);
    /// let b = Value::map([("b", 2), ("a", 1)]);
    /// assert_eq!(a, b);
    /// ```
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<MapKey>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(Some(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// A non-nil reference to `value`.
    pub fn reference(value: impl Into<Value>) -> Self {
        Value::Ref(Some(Box::new(value.into())))
    }

    pub fn null_ref() -> Self {
        Value::Ref(None)
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Nil => Kind::Nil,
            Value::Bool(_) => Kind::Bool,
            Value::Int(..) => Kind::Int,
            Value::Float(..) => Kind::Float,
            Value::Char(_) => Kind::Char,
            Value::Str(_) => Kind::Str,
            Value::Bytes(_) => Kind::Bytes,
            Value::List(_) => Kind::List,
            Value::Array(_) => Kind::Array,
            Value::Tuple(_) => Kind::Tuple,
            Value::Map(_) => Kind::Map,
            Value::Ref(_) => Kind::Ref,
            Value::Struct(_) => Kind::Struct,
            Value::Chan(_) => Kind::Chan,
            Value::Func(_) => Kind::Func,
            Value::RawPtr(_) => Kind::RawPtr,
        }
    }

    /// Returns the runtime type name shown in diagnostics.
    ///
    /// The absence-of-value reports the `<nil>` marker. Element types of
    /// dynamic containers are taken from their first element, or `_` when the
    /// container holds nothing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use verity::Value;
    /// assert_eq!(Value::from(vec![1u8, 2]).type_name(), "Vec<u8>");
    /// assert_eq!(Value::from(Some("a")).type_name(), "&String");
    /// assert_eq!(Value::Nil.type_name(), "<nil>");
    /// ```
    pub fn type_name(&self) -> String {
        match self {
            Value::Nil => "<nil>".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(_, ty) => ty.as_str().to_string(),
            Value::Float(_, ty) => ty.as_str().to_string(),
            Value::Char(_) => "char".to_string(),
            Value::Str(_) => "String".to_string(),
            Value::Bytes(_) => "Vec<u8>".to_string(),
            Value::List(items) => {
                let elem = items.as_deref().and_then(<[Value]>::first);
                format!("Vec<{}>", elem_type_name(elem))
            }
            Value::Array(items) => {
                format!("[{}; {}]", elem_type_name(items.first()), items.len())
            }
            Value::Tuple(items) => {
                let types: Vec<String> = items.iter().map(Value::type_name).collect();
                format!("({})", types.join(", "))
            }
            Value::Map(map) => {
                let first = map.as_ref().and_then(|m| m.iter().next());
                let (key, elem) = match first {
                    Some((k, v)) => (k.type_name().to_string(), v.type_name()),
                    None => ("_".to_string(), "_".to_string()),
                };
                format!("Map<{}, {}>", key, elem)
            }
            Value::Ref(target) => format!("&{}", elem_type_name(target.as_deref())),
            Value::Struct(s) => s.name().to_string(),
            Value::Chan(_) => "Channel".to_string(),
            Value::Func(_) => "fn".to_string(),
            Value::RawPtr(_) => "*const ()".to_string(),
        }
    }

    /// Returns true if the value is nil. See [`predicates::is_nil`].
    pub fn is_nil(&self) -> bool {
        predicates::is_nil(self)
    }

    /// Returns true if the value is empty. See [`predicates::is_empty`].
    pub fn is_empty(&self) -> bool {
        predicates::is_empty(self)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Display formatting helpers
    // ------------------------------------------------------------------------

    /// Helper for formatting sequences as `[a b c]`
    fn fmt_items<'a>(
        f: &mut fmt::Formatter<'_>,
        items: impl IntoIterator<Item = &'a Value>,
    ) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            Value::fmt_nested(f, item)?;
        }
        write!(f, "]")
    }

    /// Helper for formatting mappings as `map[k:v k2:v2]`
    fn fmt_map(f: &mut fmt::Formatter<'_>, map: &OrdMap<MapKey, Value>) -> fmt::Result {
        write!(f, "map[")?;
        for (i, (k, v)) in map.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}:", k)?;
            Value::fmt_nested(f, v)?;
        }
        write!(f, "]")
    }

    /// Helper for formatting records as `{v1 v2}`, or `{a:v1 b:v2}` in alternate mode
    fn fmt_struct(f: &mut fmt::Formatter<'_>, s: &Struct) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in s.fields().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            if f.alternate() {
                write!(f, "{}:", name)?;
            }
            Value::fmt_nested(f, value)?;
        }
        write!(f, "}}")
    }

    /// Keeps the alternate flag while recursing.
    fn fmt_nested(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
        if f.alternate() {
            write!(f, "{:#}", value)
        } else {
            write!(f, "{}", value)
        }
    }
}

fn elem_type_name(value: Option<&Value>) -> String {
    value.map_or_else(|| "_".to_string(), Value::type_name)
}

/// Renders values in the generic `%v` layout; `{:#}` gives the `%+v` layout
/// with record field names.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "<nil>"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n, _) => write!(f, "{}", n),
            Value::Float(x, FloatType::F32) => write!(f, "{}", *x as f32),
            Value::Float(x, FloatType::F64) => write!(f, "{}", x),
            Value::Char(c) => write!(f, "{}", c),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bytes(bytes) => {
                let bytes = bytes.as_deref().unwrap_or_default();
                write!(f, "[")?;
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", b)?;
                }
                write!(f, "]")
            }
            Value::List(items) => Value::fmt_items(f, items.iter().flatten()),
            Value::Array(items) => Value::fmt_items(f, items),
            Value::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    Value::fmt_nested(f, item)?;
                }
                write!(f, ")")
            }
            Value::Map(None) => write!(f, "map[]"),
            Value::Map(Some(map)) => Value::fmt_map(f, map),
            Value::Ref(None) => write!(f, "<nil>"),
            Value::Ref(Some(target)) => {
                write!(f, "&")?;
                Value::fmt_nested(f, target)
            }
            Value::Struct(s) => Value::fmt_struct(f, s),
            Value::Chan(None) | Value::Func(None) | Value::RawPtr(0) => write!(f, "<nil>"),
            Value::Chan(Some(ch)) => write!(f, "{:#x}", ch.id),
            Value::Func(Some(func)) => write!(f, "{:#x}", func.addr),
            Value::RawPtr(addr) => write!(f, "{:#x}", addr),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        predicates::deep_equal(self, other)
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

macro_rules! impl_from_int {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Int(n as i128, IntType::$tag)
                }
            }
        )*
    };
}

impl_from_int! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(x as f64, FloatType::F32)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x, FloatType::F64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

impl From<Struct> for Value {
    fn from(s: Struct) -> Self {
        Value::Struct(s)
    }
}

impl From<Channel> for Value {
    fn from(ch: Channel) -> Self {
        Value::Chan(Some(ch))
    }
}

impl From<Callable> for Value {
    fn from(func: Callable) -> Self {
        Value::Func(Some(func))
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

/// Sequences. Use [`Value::bytes`] for byte sequences.
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(Some(items.into_iter().map(Into::into).collect()))
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

/// `None` is a nil reference, `Some(v)` a reference to `v`.
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        Value::Ref(opt.map(|v| Box::new(v.into())))
    }
}

impl<T: Into<Value>> From<Box<T>> for Value {
    fn from(boxed: Box<T>) -> Self {
        Value::reference(*boxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_keep_width() {
        assert_eq!(Value::from(5i32).type_name(), "i32");
        assert_eq!(Value::from(5u64).type_name(), "u64");
        assert_eq!(Value::from(1.5f32).type_name(), "f32");
        assert_eq!(Value::from(vec!["a"]).type_name(), "Vec<String>");
        assert_eq!(Value::nil_list().type_name(), "Vec<_>");
        assert_eq!(Value::from([1, 2, 3]).type_name(), "[i32; 3]");
        assert_eq!(Value::map([("k", true)]).type_name(), "Map<String, bool>");
        assert_eq!(Value::map([(3u16, "c")]).type_name(), "Map<u16, String>");
        assert_eq!(Value::nil_map().type_name(), "Map<_, _>");
        let pair = Value::Tuple(vec![Value::from(1u8), Value::from("a")]);
        assert_eq!(pair.type_name(), "(u8, String)");
        assert_eq!(Value::null_ref().type_name(), "&_");
    }

    #[test]
    fn display_uses_generic_layout() {
        let point = Struct::new("Point").field("x", 1).field("y", 2);
        assert_eq!(Value::from(point.clone()).to_string(), "{1 2}");
        assert_eq!(format!("{:#}", Value::from(point.clone())), "{x:1 y:2}");
        assert_eq!(format!("{:#}", Value::reference(point)), "&{x:1 y:2}");
        assert_eq!(Value::from(vec![1, 2]).to_string(), "[1 2]");
        assert_eq!(Value::bytes(vec![7u8, 8]).to_string(), "[7 8]");
        assert_eq!(Value::map([("b", 2), ("a", 1)]).to_string(), "map[a:1 b:2]");
        assert_eq!(Value::nil_map().to_string(), "map[]");
        assert_eq!(Value::null_ref().to_string(), "<nil>");
        assert_eq!(Value::RawPtr(255).to_string(), "0xff");
    }

    #[test]
    fn map_keys_order_by_type_then_value() {
        let map = Value::map([(10u32, 2), (3u32, 1)]);
        assert_eq!(map.to_string(), "map[3:1 10:2]");
        assert_ne!(MapKey::from(1), MapKey::from("1"));
        assert_ne!(MapKey::from(1i32), MapKey::from(1i64));
        assert_eq!(MapKey::from(f64::NAN), MapKey::from(f64::NAN));
        assert!(MapKey::try_from(Value::from(vec![1])).is_err());
    }

    #[test]
    fn tuples_render_in_parentheses() {
        let pair = Value::Tuple(vec![Value::from(1), Value::from("a")]);
        assert_eq!(pair.to_string(), "(1, a)");
        assert_eq!(Value::Tuple(Vec::new()).type_name(), "()");
    }

    #[test]
    fn nilable_kinds() {
        assert!(Kind::Ref.is_nilable());
        assert!(Kind::Bytes.is_nilable());
        assert!(!Kind::Struct.is_nilable());
        assert!(!Kind::Array.is_nilable());
        assert!(!Kind::Tuple.is_nilable());
        assert!(!Kind::Nil.is_nilable());
    }
}
