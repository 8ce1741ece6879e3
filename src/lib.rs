/*!
fieldsort provides comparators that order records by one or more named fields, including fields of
nested records reached through a dotted path like `pay.startSalary`.

A [`FieldComparator`] is built from a direction and a list of keys. Records expose their fields
through the [`Record`] capability, which is usually implemented with the [`impl_record!`] macro.
Collections of plain scalars can be sorted by a comparator without keys.

Comparisons never make up an ordering. Keys that do not resolve and values that cannot be compared
are reported as a [`ComparatorError`]. [`try_sort_by`] and [`sort_by_fields`] run a stable sort that
stops at the first such error.

```
use fieldsort::{impl_record, sort_by_fields};

struct Payment {
    start_salary: i32,
}
impl_record!(Payment { start_salary = "startSalary" });

struct Person {
    name: String,
    id: i32,
    pay: Payment,
}
impl_record!(Person { name, id, pay });

let mut people = vec![
    Person { name: "Mike".into(), id: 101, pay: Payment { start_salary: 65000 } },
    Person { name: "Angela".into(), id: 102, pay: Payment { start_salary: 50000 } },
    Person { name: "Bob".into(), id: 103, pay: Payment { start_salary: 50000 } },
];

sort_by_fields(&mut people, true, ["pay.startSalary", "id"]).unwrap();
let names: Vec<&str> = people.iter().map(|person| person.name.as_str()).collect();
assert_eq!(names, ["Angela", "Bob", "Mike"]);
```
*/

#![warn(missing_debug_implementations, missing_docs)]

mod config;
mod utils;

mod errors;
pub use errors::{ComparatorError, ComparatorResult, FieldAccessError};

mod field_comparator;
pub use field_comparator::{Direction, FieldComparator};

mod key;
pub use key::KeyPath;

mod record;
pub use record::{all_fields, resolve, DeclaredField, DynamicRecord, Record, Slot};

mod sort;
pub use sort::{sort_by_fields, try_sort_by};

pub use utils::comparator::Comparator;

mod value;
pub use value::{compare_values, Introspect, ScalarKind, Timestamp, Value};
