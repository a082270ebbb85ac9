use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use uuid::Uuid;

use crate::audit::error::AuditError;

/// A named property value exposed by a record or an auditable entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: &'static str,
    pub value: PropertyValue,
}

impl Property {
    pub fn new(name: &'static str, value: impl Into<PropertyValue>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// Typed property value. Scalar variants carry an `Option` so that NULL keeps
/// its semantic type, which the Postgres binder and the diff both rely on.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(Option<bool>),
    Int(Option<i64>),
    Float(Option<f64>),
    Text(Option<String>),
    Uuid(Option<Uuid>),
    Date(Option<NaiveDate>),
    Timestamp(Option<DateTime<Utc>>),
    Enum(Option<String>),
    /// Navigation to another entity. Never diffed.
    Reference(Option<Uuid>),
    /// Navigation to a set of entities, carried as its size. Never diffed.
    Collection(usize),
}

impl PropertyValue {
    pub fn enumeration(variant: Option<&str>) -> Self {
        PropertyValue::Enum(variant.map(str::to_string))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Int(_) => "int",
            PropertyValue::Float(_) => "float",
            PropertyValue::Text(_) => "text",
            PropertyValue::Uuid(_) => "uuid",
            PropertyValue::Date(_) => "date",
            PropertyValue::Timestamp(_) => "timestamp",
            PropertyValue::Enum(_) => "enum",
            PropertyValue::Reference(_) => "reference",
            PropertyValue::Collection(_) => "collection",
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            PropertyValue::Reference(_) | PropertyValue::Collection(_)
        )
    }

    /// Culture-invariant string form used in audit entries. NULL renders as `None`.
    ///
    /// Non-finite floats have no reproducible rendering and are rejected.
    pub fn render(&self, property: &str) -> Result<Option<String>, AuditError> {
        let rendered = match self {
            PropertyValue::Bool(v) => v.map(|b| b.to_string()),
            PropertyValue::Int(v) => v.map(|n| n.to_string()),
            PropertyValue::Float(v) => match v {
                Some(f) if !f.is_finite() => {
                    return Err(AuditError::NonFiniteFloat {
                        property: property.to_string(),
                    });
                }
                Some(f) => Some(f.to_string()),
                None => None,
            },
            PropertyValue::Text(v) | PropertyValue::Enum(v) => v.clone(),
            PropertyValue::Uuid(v) => v.map(|id| id.hyphenated().to_string()),
            PropertyValue::Date(v) => v.map(|d| d.format("%Y-%m-%d").to_string()),
            PropertyValue::Timestamp(v) => {
                v.map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            PropertyValue::Reference(_) | PropertyValue::Collection(_) => {
                return Err(AuditError::NotScalar {
                    property: property.to_string(),
                    kind: self.kind(),
                });
            }
        };
        Ok(rendered)
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for PropertyValue {
                fn from(value: $ty) -> Self {
                    PropertyValue::$variant(Some(value.into()))
                }
            }

            impl From<Option<$ty>> for PropertyValue {
                fn from(value: Option<$ty>) -> Self {
                    PropertyValue::$variant(value.map(Into::into))
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    i64 => Int,
    i32 => Int,
    f64 => Float,
    String => Text,
    Uuid => Uuid,
    NaiveDate => Date,
    DateTime<Utc> => Timestamp,
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(Some(value.to_string()))
    }
}

impl From<Option<&str>> for PropertyValue {
    fn from(value: Option<&str>) -> Self {
        PropertyValue::Text(value.map(str::to_string))
    }
}
