//! Display ordering invariant
//!
//! Ordered collections (challenges by `day_order`, plan cards by `display_order`)
//! always expose a contiguous rank with no gaps and no duplicates. Every mutation
//! ends with a full stable resort; drag moves are expressed as a permuted id list
//! so there is exactly one code path that assigns order values.

use std::collections::HashSet;

use crate::EditError;

/// Where ranks start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBase {
    Zero,
    One,
}

impl OrderBase {
    pub fn offset(&self) -> u32 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }
}

/// A record with a persisted position
pub trait Ordered {
    /// Stable identity used by reorder requests
    fn order_key(&self) -> String;
    fn order(&self) -> u32;
    fn set_order(&mut self, order: u32);
}

/// Stable sort by current order (ties keep insertion order), then reassign ranks
pub fn normalize<T: Ordered>(items: &mut [T], base: OrderBase) {
    items.sort_by_key(|item| item.order());
    for (index, item) in items.iter_mut().enumerate() {
        item.set_order(index as u32 + base.offset());
    }
}

/// Check that the exposed order is exactly `base..base + len` in slice order
pub fn is_contiguous<T: Ordered>(items: &[T], base: OrderBase) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(index, item)| item.order() == index as u32 + base.offset())
}

/// Rearrange `items` to follow `ids` and assign ranks by position.
///
/// `ids` must name every item exactly once.
pub fn apply_permutation<T, S>(items: &[T], ids: &[S], base: OrderBase) -> Result<Vec<T>, EditError>
where
    T: Ordered + Clone,
    S: AsRef<str>,
{
    if ids.len() != items.len() {
        return Err(EditError::InvalidPermutation(format!(
            "expected {} ids, got {}",
            items.len(),
            ids.len()
        )));
    }

    let mut seen = HashSet::with_capacity(ids.len());
    let mut reordered = Vec::with_capacity(items.len());
    for id in ids {
        let id = id.as_ref();
        if !seen.insert(id) {
            return Err(EditError::InvalidPermutation(format!("duplicate id {id}")));
        }
        let item = items
            .iter()
            .find(|item| item.order_key() == id)
            .ok_or_else(|| EditError::InvalidPermutation(format!("unknown id {id}")))?;
        reordered.push(item.clone());
    }

    for (index, item) in reordered.iter_mut().enumerate() {
        item.set_order(index as u32 + base.offset());
    }
    Ok(reordered)
}

/// Id list after dragging the item at `from` to `to` (0-based positions)
pub fn move_ids<T: Ordered>(items: &[T], from: usize, to: usize) -> Result<Vec<String>, EditError> {
    let len = items.len();
    for position in [from, to] {
        if position >= len {
            return Err(EditError::PositionOutOfRange { position, len });
        }
    }

    let mut ids: Vec<String> = items.iter().map(Ordered::order_key).collect();
    let moved = ids.remove(from);
    ids.insert(to, moved);
    Ok(ids)
}
