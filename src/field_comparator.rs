/*!
This module contains the comparator that orders records by one or more named fields.

Keys are compared lexicographically: the first key that does not tie decides the ordering and later
keys only break ties. The direction applies to every key. Orderings that need a different direction
per key should be built by implementing [`Comparator`] on top of several [`FieldComparator`]s.

# Example

```
use fieldsort::{impl_record, Direction, FieldComparator};

struct Person {
    name: String,
    id: i32,
}
impl_record!(Person { name, id });

let mut people = vec![
    Person { name: "Mike".to_string(), id: 101 },
    Person { name: "Angela".to_string(), id: 102 },
];

let comparator = FieldComparator::with_direction(Direction::Descending, ["id"]).unwrap();
fieldsort::try_sort_by(&mut people, &comparator).unwrap();
assert_eq!(people[0].name, "Angela");
```
*/

use std::cmp::Ordering;

use crate::errors::{ComparatorError, ComparatorResult};
use crate::key::{parse_key_list, KeyPath};
use crate::record::resolve;
use crate::utils::comparator::Comparator;
use crate::value::{compare_values, Introspect};

/// The direction that a comparator orders values in.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Direction {
    /// Smallest values first.
    #[default]
    Ascending,

    /// Largest values first.
    Descending,
}

impl Direction {
    /// Returns true if the direction is ascending.
    pub fn is_ascending(&self) -> bool {
        *self == Direction::Ascending
    }

    /// Get the opposite direction.
    pub fn reversed(&self) -> Direction {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }

    /// Adjust an ascending ordering to this direction.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

/// `true` is ascending and `false` is descending.
impl From<bool> for Direction {
    fn from(ascending: bool) -> Self {
        if ascending {
            Direction::Ascending
        } else {
            Direction::Descending
        }
    }
}

/**
A comparator that orders records by a list of key paths.

The comparator is immutable once constructed and holds no references to the records it compares,
so a single instance can be shared by any number of sorts.

# Primitive collections

A comparator with no keys compares the values themselves. This is used to sort collections of
scalars like integers or strings.
*/
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct FieldComparator {
    /// The keys in precedence order.
    keys: Vec<KeyPath>,

    /// The direction applied to every key.
    direction: Direction,
}

/// Public methods
impl FieldComparator {
    /**
    Create a comparator that sorts in ascending order by the provided dotted keys.

    # Errors

    Returns [`ComparatorError::MalformedKey`] if any key has an empty segment.
    */
    pub fn new<I, S>(keys: I) -> ComparatorResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        FieldComparator::with_direction(Direction::Ascending, keys)
    }

    /**
    Create a comparator that sorts in the provided direction by the provided dotted keys.

    The direction can also be given as a `bool` where `true` means ascending.

    # Errors

    Returns [`ComparatorError::MalformedKey`] if any key has an empty segment.
    */
    pub fn with_direction<D, I, S>(direction: D, keys: I) -> ComparatorResult<Self>
    where
        D: Into<Direction>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let direction = direction.into();
        let keys = parse_key_list(keys)?;
        log::debug!(
            "Created a field comparator with direction {:?} and keys [{}]",
            direction,
            keys.iter()
                .map(ToString::to_string)
                .collect::<Vec<String>>()
                .join(", ")
        );

        Ok(FieldComparator { keys, direction })
    }

    /// Get the keys in precedence order.
    pub fn keys(&self) -> &[KeyPath] {
        &self.keys
    }

    /// Get the direction of the comparator.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Get a comparator with the same keys and the opposite direction.
    pub fn reversed(&self) -> FieldComparator {
        FieldComparator {
            keys: self.keys.clone(),
            direction: self.direction.reversed(),
        }
    }

    /**
    Compare two records by the comparator's keys.

    Each key is resolved on both records and the resolved values are compared. The first key whose
    values differ decides the ordering. If every key ties the records are equal.

    # Errors

    Any error from resolving a key or comparing the resolved values is returned. See
    [`resolve`](crate::resolve) and [`compare_values`](crate::compare_values).
    */
    pub fn compare<T>(&self, a: &T, b: &T) -> ComparatorResult<Ordering>
    where
        T: Introspect + ?Sized,
    {
        if self.keys.is_empty() {
            return compare_values(&a.as_value(), &b.as_value())
                .map(|ordering| self.direction.apply(ordering))
                .map_err(|err| {
                    log::debug!("Failed to compare values directly. Error: {}", err);
                    err
                });
        }

        for key in self.keys.iter() {
            let ordering = FieldComparator::compare_on_key(key, a, b).map_err(|err| {
                log::debug!("Failed to compare records on the key {}. Error: {}", key, err);
                err
            })?;

            if ordering.is_ne() {
                return Ok(self.direction.apply(ordering));
            }
        }

        Ok(Ordering::Equal)
    }
}

/// Private methods
impl FieldComparator {
    /// Compare two records by a single key in ascending order.
    fn compare_on_key<T>(key: &KeyPath, a: &T, b: &T) -> ComparatorResult<Ordering>
    where
        T: Introspect + ?Sized,
    {
        let a_value = resolve(a, key)?;
        let b_value = resolve(b, key)?;

        compare_values(&a_value, &b_value)
    }
}

impl<T> Comparator<T> for FieldComparator
where
    T: Introspect + ?Sized,
{
    type Error = ComparatorError;

    fn compare(&self, a: &T, b: &T) -> ComparatorResult<Ordering> {
        FieldComparator::compare(self, a, b)
    }
}

#[cfg(test)]
mod field_comparator_tests {
    use pretty_assertions::assert_eq;

    use crate::impl_record;
    use crate::record::DynamicRecord;

    use super::*;

    fn setup() {
        let _ = env_logger::builder()
            // Include all events in tests
            .filter_level(log::LevelFilter::max())
            // Ensure events are captured by `cargo test`
            .is_test(true)
            // Ignore errors initializing the logger if tests race to configure it
            .try_init();
    }

    struct Payment {
        start_salary: i32,
        start_bonus: i32,
    }
    impl_record!(Payment {
        start_salary = "startSalary",
        start_bonus = "startBonus"
    });

    struct Person {
        name: String,
        id: i32,
        pay: Payment,
    }
    impl_record!(Person { name, id, pay });

    fn person(name: &str, id: i32, start_salary: i32, start_bonus: i32) -> Person {
        Person {
            name: name.to_string(),
            id,
            pay: Payment {
                start_salary,
                start_bonus,
            },
        }
    }

    #[test]
    fn direction_defaults_to_ascending() {
        let comparator = FieldComparator::new(["id"]).unwrap();

        assert_eq!(comparator.direction(), Direction::Ascending);
        assert_eq!(Direction::default(), Direction::Ascending);
        assert_eq!(Direction::from(true), Direction::Ascending);
        assert_eq!(Direction::from(false), Direction::Descending);
    }

    #[test]
    fn construction_fails_on_malformed_keys() {
        assert_eq!(
            FieldComparator::new([""]),
            Err(ComparatorError::MalformedKey { key: String::new() })
        );
        assert_eq!(
            FieldComparator::with_direction(false, ["name", "a..b"]),
            Err(ComparatorError::MalformedKey {
                key: "a..b".to_string()
            })
        );
    }

    #[test]
    fn construction_preserves_key_order() {
        let comparator = FieldComparator::new(["pay.startSalary", "id"]).unwrap();

        let keys: Vec<String> = comparator.keys().iter().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["pay.startSalary", "id"]);
    }

    #[test]
    fn construction_does_not_validate_fields() {
        let comparator = FieldComparator::new(["does.not.exist"]);

        assert!(comparator.is_ok());
    }

    #[test]
    fn compare_orders_by_a_single_key() {
        setup();

        let angela = person("Angela", 102, 50000, 4500);
        let mike = person("Mike", 101, 65000, 5500);
        let comparator = FieldComparator::new(["name"]).unwrap();

        assert_eq!(comparator.compare(&angela, &mike), Ok(Ordering::Less));
        assert_eq!(comparator.compare(&mike, &angela), Ok(Ordering::Greater));
    }

    #[test]
    fn later_keys_only_break_ties() {
        setup();

        let angela = person("Angela", 102, 50000, 4500);
        let bob = person("Bob", 103, 50000, 4500);
        let mike = person("Mike", 101, 65000, 5500);
        let comparator = FieldComparator::new(["pay.startSalary", "id"]).unwrap();

        assert_eq!(comparator.compare(&angela, &bob), Ok(Ordering::Less));
        assert_eq!(comparator.compare(&bob, &mike), Ok(Ordering::Less));
        assert_eq!(comparator.compare(&mike, &angela), Ok(Ordering::Greater));
    }

    #[test]
    fn records_tying_on_every_key_are_equal() {
        let angela = person("Angela", 102, 50000, 4500);
        let bob = person("Bob", 103, 50000, 4500);
        let comparator =
            FieldComparator::with_direction(false, ["pay.startSalary", "pay.startBonus"]).unwrap();

        assert_eq!(comparator.compare(&angela, &bob), Ok(Ordering::Equal));
    }

    #[test]
    fn descending_inverts_every_non_equal_result() {
        let people = [
            person("Angela", 102, 50000, 4500),
            person("Mike", 101, 65000, 5500),
            person("Bob", 103, 50000, 4500),
        ];
        let ascending = FieldComparator::new(["pay.startSalary", "name"]).unwrap();
        let descending = ascending.reversed();

        assert_eq!(descending.direction(), Direction::Descending);
        for a in people.iter() {
            for b in people.iter() {
                assert_eq!(
                    descending.compare(a, b).unwrap(),
                    ascending.compare(a, b).unwrap().reverse()
                );
            }
        }
    }

    #[test]
    fn self_comparison_is_equal_in_both_directions() {
        let lisa = person("Lisa", 104, 75000, 4500);
        let ascending = FieldComparator::new(["name", "id", "pay.startBonus"]).unwrap();

        assert_eq!(ascending.compare(&lisa, &lisa), Ok(Ordering::Equal));
        assert_eq!(ascending.reversed().compare(&lisa, &lisa), Ok(Ordering::Equal));
    }

    #[test]
    fn empty_key_lists_compare_scalars_directly() {
        let ascending = FieldComparator::new(Vec::<&str>::new()).unwrap();
        let descending = FieldComparator::with_direction(Direction::Descending, Vec::<&str>::new())
            .unwrap();

        assert_eq!(ascending.compare(&12_i32, &15_i32), Ok(Ordering::Less));
        assert_eq!(descending.compare(&12_i32, &15_i32), Ok(Ordering::Greater));
        assert_eq!(ascending.compare("b", "a"), Ok(Ordering::Greater));
    }

    #[test]
    fn empty_key_lists_reject_records() {
        let angela = person("Angela", 102, 50000, 4500);
        let bob = person("Bob", 103, 50000, 4500);
        let comparator = FieldComparator::new(Vec::<&str>::new()).unwrap();

        assert_eq!(
            comparator.compare(&angela, &bob),
            Err(ComparatorError::UnsupportedType {
                type_name: "Person"
            })
        );
    }

    #[test]
    fn resolution_errors_surface_from_compare() {
        setup();

        let angela = person("Angela", 102, 50000, 4500);
        let bob = person("Bob", 103, 50000, 4500);
        let comparator = FieldComparator::new(["name", "pay.bonus"]).unwrap();

        // The first key does not tie so the broken second key is never resolved
        assert_eq!(comparator.compare(&angela, &bob), Ok(Ordering::Less));
        assert_eq!(
            comparator.compare(&angela, &angela),
            Err(ComparatorError::UnknownField {
                path: "pay.bonus".to_string(),
                segment: "bonus".to_string(),
                type_name: "Payment",
            })
        );
    }

    #[test]
    fn keys_ending_on_a_record_are_unsupported() {
        let angela = person("Angela", 102, 50000, 4500);
        let comparator = FieldComparator::new(["pay"]).unwrap();

        assert_eq!(
            comparator.compare(&angela, &angela),
            Err(ComparatorError::UnsupportedType {
                type_name: "Payment"
            })
        );
    }

    #[test]
    fn mismatched_kinds_across_records_are_reported() {
        let first = DynamicRecord::new("Row").with("value", 1_i32);
        let second = DynamicRecord::new("Row").with("value", "1");
        let comparator = FieldComparator::new(["value"]).unwrap();

        assert_eq!(
            comparator.compare(&first, &second),
            Err(ComparatorError::TypeMismatch {
                left: crate::value::ScalarKind::Int,
                right: crate::value::ScalarKind::Text,
            })
        );
    }

    #[test]
    fn comparators_can_be_used_through_the_trait() {
        fn compare_with<C: Comparator<Person>>(
            comparator: &C,
            a: &Person,
            b: &Person,
        ) -> Result<Ordering, C::Error> {
            comparator.compare(a, b)
        }

        let angela = person("Angela", 102, 50000, 4500);
        let mike = person("Mike", 101, 65000, 5500);
        let comparator = FieldComparator::new(["id"]).unwrap();

        assert_eq!(
            compare_with(&comparator, &angela, &mike),
            Ok(Ordering::Greater)
        );
    }
}
