use std::cmp::Ordering;
use std::net::Ipv4Addr;

use crate::table::ModelError;

/// Sort key derived from one column of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    Integer(u64),
    Text(String),
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (SortKey::Integer(a), SortKey::Integer(b)) => a.partial_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Convert a dotted-quad IPv4 address to an integer, most-significant octet first.
pub fn ip_to_int(ip: &str) -> Option<u32> {
    ip.trim().parse::<Ipv4Addr>().ok().map(u32::from)
}

/// Reorder `items` into the order that sorts `keys` ascending, sorting `keys` along with it.
///
/// The sort is stable: items with equal (or incomparable) keys keep their relative order.
/// An empty key list leaves `items` untouched.
pub fn sort_array_with_array<K, T>(keys: &mut Vec<K>, items: &mut Vec<T>) -> Result<(), ModelError>
where
    K: PartialOrd,
{
    if keys.is_empty() {
        return Ok(());
    }
    if keys.len() != items.len() {
        return Err(ModelError::KeyCountMismatch {
            keys: keys.len(),
            items: items.len(),
        });
    }

    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| keys[a].partial_cmp(&keys[b]).unwrap_or(Ordering::Equal));

    apply_permutation(keys, &order);
    apply_permutation(items, &order);
    Ok(())
}

// `order[i]` is the old index of the element that belongs at position `i`.
fn apply_permutation<T>(values: &mut Vec<T>, order: &[usize]) {
    let mut slots: Vec<Option<T>> = values.drain(..).map(Some).collect();
    values.extend(order.iter().filter_map(|&i| slots[i].take()));
}
