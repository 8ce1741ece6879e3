/*!
This module contains global configuration constants for the comparators.

Comparators have no runtime configuration beyond the sort direction chosen at construction. Values
that are fixed for the whole crate live here.
*/

/// The character separating the segments of a dotted key path e.g. `pay.startSalary`.
pub(crate) const KEY_SEGMENT_SEPARATOR: char = '.';
