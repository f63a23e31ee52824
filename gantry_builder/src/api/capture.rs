use std::any::{Any, TypeId};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::constant::SWITCH_VALUE;
use crate::error::DefinitionError;

/// The error raised by a user defined conversion, kept as the [`ConversionError`] source.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

type Conversion = fn(&str) -> Result<Value, Cause>;

/// A converted token.
///
/// The converted value is type erased (and cheap to clone), so values of every option may share one [`ParseState`](./struct.ParseState.html).
#[derive(Clone)]
pub struct Value {
    raw: String,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Value {
    /// Wrap an already converted value, along with the raw token it came from.
    pub fn new<T: Any + Send + Sync>(raw: impl Into<String>, value: T) -> Self {
        Self {
            raw: raw.into(),
            inner: Arc::new(value),
        }
    }

    pub(crate) fn switch() -> Self {
        Value::new(SWITCH_VALUE, true)
    }

    /// The raw token.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The converted value, if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Value").field(&self.raw).finish()
    }
}

/// The conversion conventions a custom value type may expose.
///
/// When a type registers several, the first in this order is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strategy {
    /// [`FromStr`].
    Parse,
    /// [`TryFrom<String>`].
    ValueOf,
    /// [`From<String>`].
    Construct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Text,
    Native,
    Custom,
}

/// The semantic type that each token of an option/argument converts to.
#[derive(Clone)]
pub struct ValueType {
    name: &'static str,
    type_id: TypeId,
    kind: ValueKind,
    conversions: Vec<(Strategy, Conversion)>,
    mismatch: Option<&'static str>,
}

impl ValueType {
    /// Tokens are kept as-is.
    pub fn string() -> Self {
        Self {
            name: std::any::type_name::<String>(),
            type_id: TypeId::of::<String>(),
            kind: ValueKind::Text,
            conversions: Vec::default(),
            mismatch: None,
        }
    }

    fn native<T>() -> Self
    where
        T: FromStr + Any + Send + Sync,
        T::Err: Into<Cause>,
    {
        Self {
            name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
            kind: ValueKind::Native,
            conversions: vec![(Strategy::Parse, parse_with::<T>)],
            mismatch: None,
        }
    }

    /// A custom type without any conversion registered yet.
    /// See [`ValueType::with_parse`], [`ValueType::with_value_of`], and [`ValueType::with_construct`].
    ///
    /// ### Example
    /// ```
    /// # use gantry_builder as gantry;
    /// use gantry::{TypeConverter, ValueType};
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct Name(String);
    ///
    /// impl From<String> for Name {
    ///     fn from(value: String) -> Self {
    ///         Name(value)
    ///     }
    /// }
    ///
    /// let value_type = ValueType::custom::<Name>().with_construct::<Name>();
    /// let value = TypeConverter.convert("name", &value_type, "bob").unwrap();
    /// assert_eq!(value.downcast_ref::<Name>(), Some(&Name("bob".to_string())));
    /// ```
    pub fn custom<T: Any + Send + Sync>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
            kind: ValueKind::Custom,
            conversions: Vec::default(),
            mismatch: None,
        }
    }

    /// A custom type converted via [`FromStr`].
    pub fn parsed<T>() -> Self
    where
        T: FromStr + Any + Send + Sync,
        T::Err: Into<Cause>,
    {
        Self::custom::<T>().with_parse::<T>()
    }

    /// A custom type converted via [`TryFrom<String>`].
    pub fn value_of<T>() -> Self
    where
        T: TryFrom<String> + Any + Send + Sync,
        T::Error: Into<Cause>,
    {
        Self::custom::<T>().with_value_of::<T>()
    }

    /// A custom type converted via [`From<String>`].
    pub fn constructed<T>() -> Self
    where
        T: From<String> + Any + Send + Sync,
    {
        Self::custom::<T>().with_construct::<T>()
    }

    /// Register the [`FromStr`] convention.
    ///
    /// `T` must be the type this `ValueType` was created for; otherwise building the option/arguments fails with [`DefinitionError::ConversionType`].
    pub fn with_parse<T>(self) -> Self
    where
        T: FromStr + Any + Send + Sync,
        T::Err: Into<Cause>,
    {
        self.register::<T>(Strategy::Parse, parse_with::<T>)
    }

    /// Register the [`TryFrom<String>`] convention.
    /// See [`ValueType::with_parse`].
    pub fn with_value_of<T>(self) -> Self
    where
        T: TryFrom<String> + Any + Send + Sync,
        T::Error: Into<Cause>,
    {
        self.register::<T>(Strategy::ValueOf, value_of_with::<T>)
    }

    /// Register the [`From<String>`] convention.
    /// See [`ValueType::with_parse`].
    pub fn with_construct<T>(self) -> Self
    where
        T: From<String> + Any + Send + Sync,
    {
        self.register::<T>(Strategy::Construct, construct_with::<T>)
    }

    fn register<T: Any>(mut self, strategy: Strategy, conversion: Conversion) -> Self {
        if self.type_id != TypeId::of::<T>() {
            self.mismatch.get_or_insert(std::any::type_name::<T>());
            return self;
        }

        self.conversions.retain(|(s, _)| s != &strategy);
        self.conversions.push((strategy, conversion));
        self.conversions.sort_by_key(|(s, _)| *s);
        self
    }

    /// The type name (for messages).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The [`TypeId`] of the converted values.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The conversion convention that will be used, if any.
    /// Always `None` for [`ValueType::string`].
    pub fn strategy(&self) -> Option<Strategy> {
        self.conversions.first().map(|(s, _)| *s)
    }

    pub(crate) fn check(&self, name: &str) -> Result<(), DefinitionError> {
        match self.mismatch {
            Some(found) => Err(DefinitionError::ConversionType {
                name: name.to_string(),
                expected: self.name,
                found,
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn is_bool(&self) -> bool {
        self.type_id == TypeId::of::<bool>()
    }
}

impl std::fmt::Debug for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ValueType[{}, {:?}]", self.name, self.strategy())
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ValueType {}

fn parse_with<T>(raw: &str) -> Result<Value, Cause>
where
    T: FromStr + Any + Send + Sync,
    T::Err: Into<Cause>,
{
    T::from_str(raw)
        .map(|value| Value::new(raw, value))
        .map_err(Into::into)
}

fn value_of_with<T>(raw: &str) -> Result<Value, Cause>
where
    T: TryFrom<String> + Any + Send + Sync,
    T::Error: Into<Cause>,
{
    T::try_from(raw.to_string())
        .map(|value| Value::new(raw, value))
        .map_err(Into::into)
}

fn construct_with<T>(raw: &str) -> Result<Value, Cause>
where
    T: From<String> + Any + Send + Sync,
{
    Ok(Value::new(raw, T::from(raw.to_string())))
}

/// Types with a built-in [`ValueType`].
pub trait Typed: Any + Send + Sync {
    /// The value type for `Self`.
    fn value_type() -> ValueType;
}

impl Typed for String {
    fn value_type() -> ValueType {
        ValueType::string()
    }
}

macro_rules! native_typed {
    ($($t:ty),* $(,)?) => {
        $(
            impl Typed for $t {
                fn value_type() -> ValueType {
                    ValueType::native::<$t>()
                }
            }
        )*
    };
}

native_typed!(
    bool, char, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, PathBuf
);

/// A token could not convert to its option/argument type.
///
/// When a user defined conversion rejected the token, its error is kept as the [`std::error::Error::source`].
/// Malformed or out of range input for the built-in types carries no source.
#[derive(Debug, Error)]
#[error("'{raw}' cannot convert to {type_name} for '{title}'.")]
pub struct ConversionError {
    title: String,
    raw: String,
    type_name: &'static str,
    #[source]
    cause: Option<Cause>,
}

impl ConversionError {
    /// The option/argument title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The raw token.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The target type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The error raised by the user defined conversion, if any.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

/// Converts single tokens into values of a [`ValueType`].
///
/// Stateless; share freely.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeConverter;

impl TypeConverter {
    /// Convert `raw` for the option/argument titled `field_name`.
    ///
    /// ### Example
    /// ```
    /// # use gantry_builder as gantry;
    /// use gantry::{TypeConverter, Typed};
    ///
    /// let value = TypeConverter.convert("count", &i8::value_type(), "-3").unwrap();
    /// assert_eq!(value.downcast_ref::<i8>(), Some(&-3));
    ///
    /// // Out of range for i8: rejected, never wrapped.
    /// TypeConverter.convert("count", &i8::value_type(), "200").unwrap_err();
    /// ```
    pub fn convert(
        &self,
        field_name: &str,
        value_type: &ValueType,
        raw: &str,
    ) -> Result<Value, ConversionError> {
        let error = |cause: Option<Cause>| ConversionError {
            title: field_name.to_string(),
            raw: raw.to_string(),
            type_name: value_type.name,
            cause,
        };

        match value_type.kind {
            ValueKind::Text => Ok(Value::new(raw, raw.to_string())),
            ValueKind::Native => match value_type.conversions.first() {
                Some((_, conversion)) => conversion(raw).map_err(|_| error(None)),
                None => unreachable!("internal error - native value types must convert"),
            },
            ValueKind::Custom => match value_type.conversions.first() {
                Some((_, conversion)) => conversion(raw).map_err(|cause| error(Some(cause))),
                None => Err(error(None)),
            },
        }
    }
}
