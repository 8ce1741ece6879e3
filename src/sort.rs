/*!
This module contains stable sorts that are driven by a fallible [`Comparator`].

The standard library sorts expect an infallible comparison function so errors would have to be
hidden behind a made up ordering. The sorts here stop at the first comparison that fails and return
its error instead.

# Algorithm

The sort is a bottom-up merge sort over the positions of the items. Runs of positions are merged
pairwise, taking from the left run unless the right item is strictly smaller, which keeps equal items
in their input order. The items are only moved once every comparison has succeeded, so a failed sort
leaves the slice untouched.
*/

use std::cmp::{self, Ordering};

use crate::errors::ComparatorResult;
use crate::field_comparator::{Direction, FieldComparator};
use crate::utils::comparator::Comparator;
use crate::value::Introspect;

/**
Stable sort `items` with the provided comparator.

# Errors

Returns the first error produced by the comparator. The slice is not modified if an error occurs.
*/
pub fn try_sort_by<T, C>(items: &mut [T], comparator: &C) -> Result<(), C::Error>
where
    C: Comparator<T> + ?Sized,
{
    let order = match sorted_positions(items, comparator) {
        Ok(order) => order,
        Err(err) => {
            log::warn!(
                "Aborting the sort of {} items because a comparison failed.",
                items.len()
            );
            return Err(err);
        }
    };

    apply_order(items, order);
    Ok(())
}

/**
Stable sort `items` by the provided dotted keys in the provided direction.

This is a shorthand for creating a [`FieldComparator`] and calling [`try_sort_by`] with it.

# Errors

Returns a [`ComparatorError`](crate::ComparatorError) if a key is malformed or a comparison fails.
The slice is not modified if an error occurs.
*/
pub fn sort_by_fields<T, D, I, S>(items: &mut [T], direction: D, keys: I) -> ComparatorResult<()>
where
    T: Introspect,
    D: Into<Direction>,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let comparator = FieldComparator::with_direction(direction, keys)?;
    try_sort_by(items, &comparator)
}

/**
Compute the stable sorted order of `items`.

Element `i` of the returned vector is the position in `items` of the item that belongs at position
`i` once sorted.
*/
fn sorted_positions<T, C>(items: &[T], comparator: &C) -> Result<Vec<usize>, C::Error>
where
    C: Comparator<T> + ?Sized,
{
    let len = items.len();
    let mut order: Vec<usize> = (0..len).collect();
    let mut merged: Vec<usize> = Vec::with_capacity(len);
    let mut run_length: usize = 1;

    while run_length < len {
        merged.clear();

        for run_start in (0..len).step_by(2 * run_length) {
            let mid = cmp::min(run_start + run_length, len);
            let run_end = cmp::min(run_start + 2 * run_length, len);
            let mut left = run_start;
            let mut right = mid;

            while left < mid && right < run_end {
                let ordering = comparator.compare(&items[order[left]], &items[order[right]])?;
                if ordering == Ordering::Greater {
                    merged.push(order[right]);
                    right += 1;
                } else {
                    merged.push(order[left]);
                    left += 1;
                }
            }

            merged.extend_from_slice(&order[left..mid]);
            merged.extend_from_slice(&order[right..run_end]);
        }

        std::mem::swap(&mut order, &mut merged);
        run_length *= 2;
    }

    Ok(order)
}

/**
Permute `items` in place so that position `i` holds the item previously at `order[i]`.

Each cycle of the permutation is walked once with swaps. Visited positions are marked by making them
fixed points in `order`.
*/
fn apply_order<T>(items: &mut [T], mut order: Vec<usize>) {
    for cycle_start in 0..order.len() {
        let mut current = cycle_start;
        loop {
            let source = order[current];
            order[current] = current;
            if source == cycle_start {
                break;
            }

            items.swap(current, source);
            current = source;
        }
    }
}
