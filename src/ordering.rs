use std::collections::HashSet;

use crate::models::RecordId;

/// Drag-and-drop move.
///
/// The item at `source` is taken out first, then put back at `destination`
/// counted in the shortened sequence, so moving `[A, B, C]` from 0 to 2 gives
/// `[B, C, A]`. A `None` destination is a drop outside any list and changes
/// nothing, as does an out-of-range `source`. Destinations past the end land
/// at the end.
///
/// Returns whether the drop was applied.
pub fn move_item<T>(items: &mut Vec<T>, source: usize, destination: Option<usize>) -> bool {
    let Some(destination) = destination else {
        return false;
    };
    if source >= items.len() {
        return false;
    }
    let item = items.remove(source);
    let destination = destination.min(items.len());
    items.insert(destination, item);
    true
}

/// True when `proposed` holds exactly the ids of `current`, each once.
pub fn is_permutation(current: &[RecordId], proposed: &[RecordId]) -> bool {
    if current.len() != proposed.len() {
        return false;
    }
    let known: HashSet<&RecordId> = current.iter().collect();
    let mut seen = HashSet::with_capacity(proposed.len());
    proposed.iter().all(|id| known.contains(id) && seen.insert(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<RecordId> {
        raw.iter().copied().map(RecordId::from).collect()
    }

    #[test]
    fn move_forward_lands_against_shortened_sequence() {
        let mut items = vec!['A', 'B', 'C'];
        assert!(move_item(&mut items, 0, Some(2)));
        assert_eq!(items, vec!['B', 'C', 'A']);
    }

    #[test]
    fn move_backward() {
        let mut items = vec!['A', 'B', 'C'];
        assert!(move_item(&mut items, 2, Some(0)));
        assert_eq!(items, vec!['C', 'A', 'B']);
    }

    #[test]
    fn forward_move_lands_one_earlier_than_original_index() {
        let mut items = vec!['A', 'B', 'C', 'D'];
        move_item(&mut items, 0, Some(2));
        // 'A' sits at index 2 of the result, i.e. before the original 'C'.
        assert_eq!(items, vec!['B', 'C', 'A', 'D']);
    }

    #[test]
    fn same_index_is_idempotent() {
        let mut items = vec!['A', 'B', 'C'];
        move_item(&mut items, 1, Some(1));
        assert_eq!(items, vec!['A', 'B', 'C']);
    }

    #[test]
    fn cancelled_or_out_of_range_drop_is_noop() {
        let mut items = vec!['A', 'B', 'C'];
        assert!(!move_item(&mut items, 0, None));
        assert!(!move_item(&mut items, 3, Some(0)));
        assert_eq!(items, vec!['A', 'B', 'C']);

        assert!(move_item(&mut items, 0, Some(99)));
        assert_eq!(items, vec!['B', 'C', 'A']);
    }

    #[test]
    fn permutation_check() {
        let current = ids(&["1", "2", "3"]);
        assert!(is_permutation(&current, &ids(&["3", "1", "2"])));
        assert!(!is_permutation(&current, &ids(&["1", "2"])));
        assert!(!is_permutation(&current, &ids(&["1", "1", "2"])));
        assert!(!is_permutation(&current, &ids(&["1", "2", "4"])));
    }
}
