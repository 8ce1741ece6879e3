/*!
This module contains the error types surfaced by comparators as well as the narrower error type
returned by field-access capabilities.

Every failure that can happen while parsing keys, resolving fields, or comparing values is reported
to the caller. Nothing is logged-and-ignored and no fallback ordering is substituted.
*/

use std::fmt;

use crate::value::ScalarKind;

/// Alias for a [`Result`] that wraps a [`ComparatorError`].
pub type ComparatorResult<T> = Result<T, ComparatorError>;

/// Top-level comparator errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ComparatorError {
    /**
    Variant for key strings that could not be parsed at construction time.

    The key is empty, starts or ends with a separator, or contains consecutive separators.
    */
    MalformedKey {
        /// The key string as supplied by the caller.
        key: String,
    },

    /// Variant for path segments that do not name a field on the current value or its ancestors.
    UnknownField {
        /// The full key path being resolved.
        path: String,
        /// The segment that could not be found.
        segment: String,
        /// The type name of the value the segment was looked up on.
        type_name: &'static str,
    },

    /// Variant for path segments that were applied to a value with no fields e.g. a scalar.
    NotAddressable {
        /// The full key path being resolved.
        path: String,
        /// The segment that could not be applied.
        segment: String,
        /// The type name of the value that has no fields.
        type_name: &'static str,
    },

    /// Variant for reads refused by the field-access capability for a reason other than absence.
    AccessDenied {
        /// The full key path being resolved.
        path: String,
        /// The segment whose read was refused.
        segment: String,
        /// The reason given by the capability.
        reason: String,
    },

    /// Variant for comparisons between two scalars of different kinds.
    TypeMismatch {
        /// The kind of the left operand.
        left: ScalarKind,
        /// The kind of the right operand.
        right: ScalarKind,
    },

    /// Variant for comparisons where an operand is not a recognized scalar kind.
    UnsupportedType {
        /// The type name of the offending operand.
        type_name: &'static str,
    },
}

impl std::error::Error for ComparatorError {}

impl fmt::Display for ComparatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparatorError::MalformedKey { key } => write!(
                f,
                "The sort key {:?} is malformed. Keys must be one or more non-empty segments \
                separated by '{}'.",
                key,
                crate::config::KEY_SEGMENT_SEPARATOR
            ),
            ComparatorError::UnknownField {
                path,
                segment,
                type_name,
            } => write!(
                f,
                "Failed to resolve the key path {}. The type {} has no field named {:?}.",
                path, type_name, segment
            ),
            ComparatorError::NotAddressable {
                path,
                segment,
                type_name,
            } => write!(
                f,
                "Failed to resolve the key path {}. Cannot read the field {:?} from a value of \
                type {} because it has no fields.",
                path, segment, type_name
            ),
            ComparatorError::AccessDenied {
                path,
                segment,
                reason,
            } => write!(
                f,
                "Failed to resolve the key path {}. Reading the field {:?} was denied: {}",
                path, segment, reason
            ),
            ComparatorError::TypeMismatch { left, right } => write!(
                f,
                "Cannot compare a value of kind {} with a value of kind {}.",
                left, right
            ),
            ComparatorError::UnsupportedType { type_name } => write!(
                f,
                "Values of type {} are not comparable. Supported kinds are 32-bit and 64-bit \
                integers, single and double precision floats, strings, and timestamps.",
                type_name
            ),
        }
    }
}

/**
Errors that a field-access capability may return when asked to read a field.

The resolver maps these into [`ComparatorError`] variants with the path context attached.
*/
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldAccessError {
    /// The value has no field with the requested name.
    Absent,

    /// The field exists but the capability refused to read it.
    Denied(String),
}

impl std::error::Error for FieldAccessError {}

impl fmt::Display for FieldAccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldAccessError::Absent => write!(f, "The field does not exist"),
            FieldAccessError::Denied(reason) => write!(f, "{}", reason),
        }
    }
}
