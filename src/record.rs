/*!
This module contains the field-access capability that records expose to comparators and the
resolver that walks key paths through records.

# Field access

A record is anything implementing [`Record`]. A record declares its own fields by name and may have
an ancestor: another record whose fields it inherits. Inheritance is modelled by composition, so the
ancestor is usually a field of the record that holds the shared part of the data.

Field lookups search the record's own fields first, in declaration order, and then each ancestor in
turn. This means a field declared on a more derived record shadows a field of the same name on an
ancestor.

Records are usually declared with the [`impl_record!`](crate::impl_record) macro. Because the macro
expands in the module that defines the record, fields are readable regardless of their visibility.
[`DynamicRecord`] covers records that are only known at runtime.
*/

use std::fmt;

use chrono::{DateTime, Utc};

use crate::errors::{ComparatorError, ComparatorResult, FieldAccessError};
use crate::key::KeyPath;
use crate::value::{Introspect, Timestamp, Value};

/// The field-access capability of a record.
pub trait Record {
    /// The name of the record's type. This is used in error messages.
    fn type_name(&self) -> &'static str;

    /**
    The names of the fields declared directly on this record in a stable order.

    Fields inherited from the ancestor are not included.
    */
    fn declared_fields(&self) -> Vec<&str>;

    /**
    Read a field declared directly on this record.

    # Errors

    - [`FieldAccessError::Absent`] if there is no field called `name`.
    - [`FieldAccessError::Denied`] if the field exists but the record refuses to expose it.
    */
    fn read_field(&self, name: &str) -> Result<Value<'_>, FieldAccessError>;

    /// The record that this record inherits fields from, if any.
    fn ancestor(&self) -> Option<&dyn Record> {
        None
    }
}

/// A field declared on a record or one of its ancestors.
#[derive(Clone, Copy)]
pub struct DeclaredField<'a> {
    /// The record (or ancestor) that declares the field.
    owner: &'a dyn Record,

    /// The name of the field.
    name: &'a str,
}

/// Public methods
impl<'a> DeclaredField<'a> {
    /// Get the name of the field.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Get the name of the type that declares the field.
    pub fn owner_type_name(&self) -> &'static str {
        self.owner.type_name()
    }

    /// Read the value of the field.
    pub fn read(&self) -> Result<Value<'a>, FieldAccessError> {
        self.owner.read_field(self.name)
    }
}

impl fmt::Debug for DeclaredField<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclaredField")
            .field("owner", &self.owner.type_name())
            .field("name", &self.name)
            .finish()
    }
}

/**
Enumerate every field of a record including inherited ones.

The record's own fields come first followed by the fields of each ancestor, nearest ancestor first.
Shadowed fields are included so a name may appear more than once.
*/
pub fn all_fields(record: &dyn Record) -> Vec<DeclaredField<'_>> {
    let mut fields = vec![];
    let mut maybe_current = Some(record);
    while let Some(current) = maybe_current {
        fields.extend(
            current
                .declared_fields()
                .into_iter()
                .map(|name| DeclaredField {
                    owner: current,
                    name,
                }),
        );
        maybe_current = current.ancestor();
    }

    fields
}

/**
Resolve a key path against a value, reading one field per segment.

The returned value can be anything, including another record. Checking that it is a comparable
scalar is left to the caller.

# Errors

- [`ComparatorError::NotAddressable`] if a segment is applied to a value that is not a record.
- [`ComparatorError::UnknownField`] if a segment does not name a field on the current record or
  any of its ancestors.
- [`ComparatorError::AccessDenied`] if the record refused to expose a field.
*/
pub fn resolve<'a, T>(value: &'a T, path: &KeyPath) -> ComparatorResult<Value<'a>>
where
    T: Introspect + ?Sized,
{
    let mut current = value.as_value();
    for segment in path.segments() {
        let record = current
            .as_record()
            .ok_or_else(|| ComparatorError::NotAddressable {
                path: path.to_string(),
                segment: segment.clone(),
                type_name: current.type_name(),
            })?;

        // The first match wins which is the most derived declaration of the name
        let field = all_fields(record)
            .into_iter()
            .find(|field| field.name() == segment.as_str())
            .ok_or_else(|| ComparatorError::UnknownField {
                path: path.to_string(),
                segment: segment.clone(),
                type_name: record.type_name(),
            })?;

        current = field.read().map_err(|access_err| match access_err {
            FieldAccessError::Absent => ComparatorError::UnknownField {
                path: path.to_string(),
                segment: segment.clone(),
                type_name: field.owner_type_name(),
            },
            FieldAccessError::Denied(reason) => ComparatorError::AccessDenied {
                path: path.to_string(),
                segment: segment.clone(),
                reason,
            },
        })?;

        log::trace!(
            "Read field {} from {} while resolving {}",
            segment,
            field.owner_type_name(),
            path
        );
    }

    Ok(current)
}

/**
Implement [`Record`] and [`Introspect`] for a struct from a list of its fields.

Every listed field must implement [`Introspect`]. A field can be exposed under a different name with
`field = "name"`, which is handy when keys follow a different naming convention than Rust. A record
can inherit the fields of one of its fields by naming it after a colon.

The macro must be invoked in the module that defines the struct so that private fields are
readable.

# Example

```
use fieldsort::impl_record;

struct Payment {
    start_salary: i32,
}
impl_record!(Payment { start_salary = "startSalary" });

struct Person {
    name: String,
    pay: Payment,
}
impl_record!(Person { name, pay });

struct Manager {
    person: Person,
    reports: i32,
}
impl_record!(Manager: person { reports });
```
*/
#[macro_export]
macro_rules! impl_record {
    (@record $ty:ty, [$($ancestor:ident)?], { $($field:ident $(= $name:literal)?),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn type_name(&self) -> &'static str {
                stringify!($ty)
            }

            fn declared_fields(&self) -> ::std::vec::Vec<&str> {
                vec![$($crate::impl_record!(@name $field $($name)?)),*]
            }

            #[allow(unused_variables)]
            fn read_field(
                &self,
                name: &str,
            ) -> ::std::result::Result<$crate::Value<'_>, $crate::FieldAccessError> {
                $(
                    if name == $crate::impl_record!(@name $field $($name)?) {
                        return Ok($crate::Introspect::as_value(&self.$field));
                    }
                )*

                Err($crate::FieldAccessError::Absent)
            }

            $(
                fn ancestor(&self) -> ::std::option::Option<&dyn $crate::Record> {
                    Some(&self.$ancestor)
                }
            )?
        }

        impl $crate::Introspect for $ty {
            fn as_value(&self) -> $crate::Value<'_> {
                $crate::Value::Record(self)
            }
        }
    };
    (@name $field:ident $name:literal) => {
        $name
    };
    (@name $field:ident) => {
        stringify!($field)
    };
    ($ty:ty { $($fields:tt)* }) => {
        $crate::impl_record!(@record $ty, [], { $($fields)* });
    };
    ($ty:ty : $ancestor:ident { $($fields:tt)* }) => {
        $crate::impl_record!(@record $ty, [$ancestor], { $($fields)* });
    };
}

/**
A value stored in a slot of a [`DynamicRecord`].
*/
#[derive(Clone, Debug, PartialEq)]
pub enum Slot {
    /// A signed 32-bit integer.
    Int(i32),
    /// A signed 64-bit integer.
    Long(i64),
    /// A single-precision float.
    Float(f32),
    /// A double-precision float.
    Double(f64),
    /// Owned text.
    Text(String),
    /// An instant in time.
    Timestamp(DateTime<Utc>),
    /// A nested record.
    Record(DynamicRecord),
    /**
    A slot that is listed as a field but whose value cannot be read.

    The string is the reason reported when a read is attempted.
    */
    Sealed(String),
}

impl From<i32> for Slot {
    fn from(value: i32) -> Self {
        Slot::Int(value)
    }
}

impl From<i64> for Slot {
    fn from(value: i64) -> Self {
        Slot::Long(value)
    }
}

impl From<f32> for Slot {
    fn from(value: f32) -> Self {
        Slot::Float(value)
    }
}

impl From<f64> for Slot {
    fn from(value: f64) -> Self {
        Slot::Double(value)
    }
}

impl From<&str> for Slot {
    fn from(value: &str) -> Self {
        Slot::Text(value.to_owned())
    }
}

impl From<String> for Slot {
    fn from(value: String) -> Self {
        Slot::Text(value)
    }
}

impl From<DateTime<Utc>> for Slot {
    fn from(value: DateTime<Utc>) -> Self {
        Slot::Timestamp(value)
    }
}

impl From<DynamicRecord> for Slot {
    fn from(value: DynamicRecord) -> Self {
        Slot::Record(value)
    }
}

/**
A record whose fields are named slots assigned at runtime.

Slots keep their insertion order. If a name is inserted more than once, the first slot is the one
that is read.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicRecord {
    /// The type name reported in error messages.
    type_name: &'static str,

    /// The named slots in declaration order.
    slots: Vec<(String, Slot)>,

    /// The record whose slots this record inherits.
    ancestor: Option<Box<DynamicRecord>>,
}

/// Public methods
impl DynamicRecord {
    /// Create an empty record that reports itself as `type_name`.
    pub fn new(type_name: &'static str) -> Self {
        DynamicRecord {
            type_name,
            slots: vec![],
            ancestor: None,
        }
    }

    /// Add a slot to the record.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Slot>) -> Self {
        self.slots.push((name.into(), value.into()));
        self
    }

    /// Add a slot that is enumerated like any other field but refuses reads with `reason`.
    pub fn sealed(mut self, name: impl Into<String>, reason: impl Into<String>) -> Self {
        self.slots
            .push((name.into(), Slot::Sealed(reason.into())));
        self
    }

    /// Set the record that this record inherits slots from.
    pub fn extends(mut self, ancestor: DynamicRecord) -> Self {
        self.ancestor = Some(Box::new(ancestor));
        self
    }

    /// Get a declared slot by name without searching ancestors.
    pub fn get(&self, name: &str) -> Option<&Slot> {
        self.slots
            .iter()
            .find(|(slot_name, _)| slot_name == name)
            .map(|(_, slot)| slot)
    }
}

impl Record for DynamicRecord {
    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn declared_fields(&self) -> Vec<&str> {
        self.slots.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn read_field(&self, name: &str) -> Result<Value<'_>, FieldAccessError> {
        let value = match self.get(name).ok_or(FieldAccessError::Absent)? {
            Slot::Int(value) => Value::Int(*value),
            Slot::Long(value) => Value::Long(*value),
            Slot::Float(value) => Value::Float(*value),
            Slot::Double(value) => Value::Double(*value),
            Slot::Text(value) => Value::Text(value.as_str()),
            Slot::Timestamp(value) => Value::Timestamp(Timestamp::from(*value)),
            Slot::Record(record) => Value::Record(record),
            Slot::Sealed(reason) => return Err(FieldAccessError::Denied(reason.clone())),
        };

        Ok(value)
    }

    fn ancestor(&self) -> Option<&dyn Record> {
        self.ancestor
            .as_deref()
            .map(|ancestor| ancestor as &dyn Record)
    }
}

impl Introspect for DynamicRecord {
    fn as_value(&self) -> Value<'_> {
        Value::Record(self)
    }
}
