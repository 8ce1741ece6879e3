/*!
This module contains the values produced by resolving key paths and the comparison rules for the
scalar kinds that can be ordered.

Values borrow from the record they were read out of so resolving a path does not copy strings or
nested records. Only six scalar kinds can be ordered. Everything else is either a nested record,
which can be resolved further, or an opaque value that only reports its type name.
*/

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

use crate::errors::{ComparatorError, ComparatorResult};
use crate::record::Record;

/// The closed set of value kinds that can be ordered.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ScalarKind {
    /// Signed 32-bit integer.
    Int,
    /// Signed 64-bit integer.
    Long,
    /// Single-precision float.
    Float,
    /// Double-precision float.
    Double,
    /// UTF-8 text.
    Text,
    /// An instant in time.
    Timestamp,
}

impl ScalarKind {
    /// A short name for the kind used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::Int => "i32",
            ScalarKind::Long => "i64",
            ScalarKind::Float => "f32",
            ScalarKind::Double => "f64",
            ScalarKind::Text => "string",
            ScalarKind::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The number of nanoseconds in a second.
const NANOS_PER_SECOND: u32 = 1_000_000_000;

/**
An instant in time measured from the Unix epoch.

Both [`DateTime<Utc>`] and [`SystemTime`] convert into a timestamp without range checks, so instants
that chrono cannot represent still compare.
*/
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Timestamp {
    /// Whole seconds since the epoch. Negative before the epoch.
    seconds: i128,

    /**
    Nanoseconds past `seconds`.

    This is below one billion except during a leap second read from chrono.
    */
    nanos: u32,
}

/// Public methods
impl Timestamp {
    /// Get the whole seconds since the Unix epoch, rounded towards negative infinity.
    pub fn seconds(&self) -> i128 {
        self.seconds
    }

    /// Get the nanoseconds past [`Timestamp::seconds`].
    pub fn subsec_nanos(&self) -> u32 {
        self.nanos
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(time: DateTime<Utc>) -> Self {
        Timestamp {
            seconds: i128::from(time.timestamp()),
            nanos: time.timestamp_subsec_nanos(),
        }
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after_epoch) => Timestamp {
                seconds: i128::from(after_epoch.as_secs()),
                nanos: after_epoch.subsec_nanos(),
            },
            Err(err) => {
                let before_epoch = err.duration();
                let seconds = -i128::from(before_epoch.as_secs());
                if before_epoch.subsec_nanos() == 0 {
                    Timestamp { seconds, nanos: 0 }
                } else {
                    // Borrow a second so that the nanoseconds stay positive
                    Timestamp {
                        seconds: seconds - 1,
                        nanos: NANOS_PER_SECOND - before_epoch.subsec_nanos(),
                    }
                }
            }
        }
    }
}

/**
A value read out of a record, or a record itself.

Scalars can be compared with [`compare_values`]. Records can have further fields read from them.
Opaque values can do neither and only carry the name of their type for error reporting.
*/
#[derive(Clone, Copy)]
pub enum Value<'a> {
    /// A signed 32-bit integer.
    Int(i32),
    /// A signed 64-bit integer.
    Long(i64),
    /// A single-precision float.
    Float(f32),
    /// A double-precision float.
    Double(f64),
    /// Borrowed text.
    Text(&'a str),
    /// An instant in time.
    Timestamp(Timestamp),
    /// A value with named fields.
    Record(&'a dyn Record),
    /// A value that is neither comparable nor has fields.
    Opaque(&'static str),
}

impl<'a> Value<'a> {
    /// Returns the scalar kind of the value or `None` if it is not a comparable scalar.
    pub fn kind(&self) -> Option<ScalarKind> {
        match self {
            Value::Int(_) => Some(ScalarKind::Int),
            Value::Long(_) => Some(ScalarKind::Long),
            Value::Float(_) => Some(ScalarKind::Float),
            Value::Double(_) => Some(ScalarKind::Double),
            Value::Text(_) => Some(ScalarKind::Text),
            Value::Timestamp(_) => Some(ScalarKind::Timestamp),
            Value::Record(_) | Value::Opaque(_) => None,
        }
    }

    /// The name of the value's type for use in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Record(record) => record.type_name(),
            Value::Opaque(type_name) => *type_name,
            Value::Int(_) => ScalarKind::Int.name(),
            Value::Long(_) => ScalarKind::Long.name(),
            Value::Float(_) => ScalarKind::Float.name(),
            Value::Double(_) => ScalarKind::Double.name(),
            Value::Text(_) => ScalarKind::Text.name(),
            Value::Timestamp(_) => ScalarKind::Timestamp.name(),
        }
    }

    /// Returns the record if this value has fields.
    pub fn as_record(&self) -> Option<&'a dyn Record> {
        match self {
            Value::Record(record) => Some(*record),
            _ => None,
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(value) => f.debug_tuple("Int").field(value).finish(),
            Value::Long(value) => f.debug_tuple("Long").field(value).finish(),
            Value::Float(value) => f.debug_tuple("Float").field(value).finish(),
            Value::Double(value) => f.debug_tuple("Double").field(value).finish(),
            Value::Text(value) => f.debug_tuple("Text").field(value).finish(),
            Value::Timestamp(value) => f.debug_tuple("Timestamp").field(value).finish(),
            Value::Record(record) => f.debug_tuple("Record").field(&record.type_name()).finish(),
            Value::Opaque(type_name) => f.debug_tuple("Opaque").field(type_name).finish(),
        }
    }
}

/**
Compare two scalar values by the natural order of their kind.

Integers are compared numerically and strings by their UTF-8 bytes, which is code point order.
Timestamps are compared chronologically.

Floats are compared with the IEEE-754 `totalOrder` predicate so the ordering is total even when NaN
is involved: negative NaN sorts before negative infinity, positive NaN sorts after positive
infinity, and `-0.0` sorts before `+0.0`.

# Errors

- [`ComparatorError::UnsupportedType`] if either operand is not a scalar. The left operand is
  checked first.
- [`ComparatorError::TypeMismatch`] if the operands are scalars of different kinds.
*/
pub fn compare_values(left: &Value<'_>, right: &Value<'_>) -> ComparatorResult<Ordering> {
    let left_kind = left.kind().ok_or(ComparatorError::UnsupportedType {
        type_name: left.type_name(),
    })?;
    let right_kind = right.kind().ok_or(ComparatorError::UnsupportedType {
        type_name: right.type_name(),
    })?;

    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Long(a), Value::Long(b)) => a.cmp(b),
        (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
        (Value::Double(a), Value::Double(b)) => a.total_cmp(b),
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        _ => {
            return Err(ComparatorError::TypeMismatch {
                left: left_kind,
                right: right_kind,
            })
        }
    };

    Ok(ordering)
}

/**
Trait for types that can be viewed as a [`Value`].

This is implemented for the comparable scalar types, for records via
[`impl_record!`](crate::impl_record), and for common smart pointers. A handful of primitive types
that have no ordering under the comparator are implemented as [`Value::Opaque`] so that they can be
declared as record fields and still produce a descriptive error if they are sorted on.
*/
pub trait Introspect {
    /// View `self` as a value.
    fn as_value(&self) -> Value<'_>;
}

impl Introspect for i32 {
    fn as_value(&self) -> Value<'_> {
        Value::Int(*self)
    }
}

impl Introspect for i64 {
    fn as_value(&self) -> Value<'_> {
        Value::Long(*self)
    }
}

impl Introspect for f32 {
    fn as_value(&self) -> Value<'_> {
        Value::Float(*self)
    }
}

impl Introspect for f64 {
    fn as_value(&self) -> Value<'_> {
        Value::Double(*self)
    }
}

impl Introspect for str {
    fn as_value(&self) -> Value<'_> {
        Value::Text(self)
    }
}

impl Introspect for String {
    fn as_value(&self) -> Value<'_> {
        Value::Text(self.as_str())
    }
}

impl Introspect for DateTime<Utc> {
    fn as_value(&self) -> Value<'_> {
        Value::Timestamp(Timestamp::from(*self))
    }
}

impl Introspect for SystemTime {
    fn as_value(&self) -> Value<'_> {
        Value::Timestamp(Timestamp::from(*self))
    }
}

impl<T: Introspect + ?Sized> Introspect for &T {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: Introspect + ?Sized> Introspect for Box<T> {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: Introspect + ?Sized> Introspect for Rc<T> {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: Introspect + ?Sized> Introspect for Arc<T> {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

macro_rules! impl_opaque_introspect {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Introspect for $ty {
                fn as_value(&self) -> Value<'_> {
                    Value::Opaque(std::any::type_name::<$ty>())
                }
            }
        )*
    };
}

impl_opaque_introspect!(bool, char, i8, i16, i128, isize, u8, u16, u32, u64, u128, usize);

#[cfg(test)]
mod value_tests {
    use std::time::Duration;

    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn integers_are_ordered_numerically() {
        assert_eq!(
            compare_values(&(-5_i32).as_value(), &3_i32.as_value()),
            Ok(Ordering::Less)
        );
        assert_eq!(
            compare_values(&i64::MAX.as_value(), &i64::MIN.as_value()),
            Ok(Ordering::Greater)
        );
        assert_eq!(
            compare_values(&101_i32.as_value(), &101_i32.as_value()),
            Ok(Ordering::Equal)
        );
    }

    #[test]
    fn strings_are_ordered_by_code_point() {
        assert_eq!(
            compare_values(&"Angela".as_value(), &"Bob".as_value()),
            Ok(Ordering::Less)
        );
        // Upper case letters precede lower case ones; there is no locale-aware collation
        assert_eq!(
            compare_values(&"bob".as_value(), &"Bob".as_value()),
            Ok(Ordering::Greater)
        );
        assert_eq!(
            compare_values(&"Lisa".to_string().as_value(), &"Lisa".as_value()),
            Ok(Ordering::Equal)
        );
    }

    #[test]
    fn timestamps_are_ordered_chronologically() {
        let earlier = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2021, 6, 30, 12, 0, 0).unwrap();

        assert_eq!(
            compare_values(&earlier.as_value(), &later.as_value()),
            Ok(Ordering::Less)
        );
        assert_eq!(
            compare_values(&later.as_value(), &earlier.as_value()),
            Ok(Ordering::Greater)
        );
    }

    #[test]
    fn system_times_are_timestamps() {
        let epoch = SystemTime::UNIX_EPOCH;
        let now = SystemTime::now();

        assert_eq!(epoch.as_value().kind(), Some(ScalarKind::Timestamp));
        assert_eq!(
            compare_values(&epoch.as_value(), &now.as_value()),
            Ok(Ordering::Less)
        );
    }

    #[test]
    fn system_times_outside_the_chrono_range_compare() {
        let far_future = UNIX_EPOCH + Duration::from_secs(1 << 43);

        assert_eq!(
            compare_values(&far_future.as_value(), &UNIX_EPOCH.as_value()),
            Ok(Ordering::Greater)
        );
        assert_eq!(
            compare_values(&far_future.as_value(), &far_future.as_value()),
            Ok(Ordering::Equal)
        );
        assert_eq!(
            compare_values(
                &DateTime::<Utc>::MAX_UTC.as_value(),
                &far_future.as_value()
            ),
            Ok(Ordering::Less)
        );
    }

    #[test]
    fn system_times_before_the_epoch_line_up_with_chrono_timestamps() {
        let system_time = UNIX_EPOCH - Duration::from_millis(1500);
        let date_time = Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 58).unwrap()
            + chrono::Duration::milliseconds(500);

        let timestamp = Timestamp::from(system_time);
        assert_eq!(timestamp.seconds(), -2);
        assert_eq!(timestamp.subsec_nanos(), 500_000_000);
        assert_eq!(timestamp, Timestamp::from(date_time));
        assert_eq!(
            compare_values(&system_time.as_value(), &date_time.as_value()),
            Ok(Ordering::Equal)
        );
        assert_eq!(
            compare_values(&system_time.as_value(), &UNIX_EPOCH.as_value()),
            Ok(Ordering::Less)
        );
    }

    #[test]
    fn scalar_type_names_match_their_kind() {
        assert_eq!(1_i32.as_value().type_name(), "i32");
        assert_eq!(1_i64.as_value().type_name(), "i64");
        assert_eq!(1.0_f32.as_value().type_name(), "f32");
        assert_eq!(1.0_f64.as_value().type_name(), "f64");
        assert_eq!("text".as_value().type_name(), "string");
        assert_eq!(UNIX_EPOCH.as_value().type_name(), "timestamp");
    }

    #[test]
    fn floats_have_a_total_order_including_nan() {
        let ordered = [
            f64::NEG_INFINITY,
            -1.5,
            -0.0,
            0.0,
            2.25,
            f64::INFINITY,
            f64::NAN,
        ];
        for window in ordered.windows(2) {
            assert_eq!(
                compare_values(&window[0].as_value(), &window[1].as_value()),
                Ok(Ordering::Less),
                "Expected {} < {}",
                window[0],
                window[1]
            );
        }

        assert_eq!(
            compare_values(&f32::NAN.as_value(), &f32::NAN.as_value()),
            Ok(Ordering::Equal)
        );
        assert_eq!(
            compare_values(&f32::NAN.as_value(), &1.0_f32.as_value()),
            Ok(Ordering::Greater)
        );
    }

    #[test]
    fn mismatched_kinds_cannot_be_compared() {
        assert_eq!(
            compare_values(&1_i32.as_value(), &1_i64.as_value()),
            Err(ComparatorError::TypeMismatch {
                left: ScalarKind::Int,
                right: ScalarKind::Long
            })
        );
        assert_eq!(
            compare_values(&1.0_f32.as_value(), &1.0_f64.as_value()),
            Err(ComparatorError::TypeMismatch {
                left: ScalarKind::Float,
                right: ScalarKind::Double
            })
        );
        assert_eq!(
            compare_values(&"1".as_value(), &1_i32.as_value()),
            Err(ComparatorError::TypeMismatch {
                left: ScalarKind::Text,
                right: ScalarKind::Int
            })
        );
    }

    #[test]
    fn unsupported_types_cannot_be_compared() {
        assert_eq!(
            compare_values(&true.as_value(), &false.as_value()),
            Err(ComparatorError::UnsupportedType { type_name: "bool" })
        );
        assert_eq!(
            compare_values(&1_i32.as_value(), &7_u64.as_value()),
            Err(ComparatorError::UnsupportedType { type_name: "u64" })
        );
    }

    #[test]
    fn smart_pointers_forward_to_the_inner_value() {
        let boxed: Box<i32> = Box::new(4);
        let shared: Arc<String> = Arc::new("four".to_string());

        assert_eq!(boxed.as_value().kind(), Some(ScalarKind::Int));
        assert_eq!(shared.as_value().kind(), Some(ScalarKind::Text));
        assert_eq!(
            compare_values(&boxed.as_value(), &Rc::new(5_i32).as_value()),
            Ok(Ordering::Less)
        );
    }
}
