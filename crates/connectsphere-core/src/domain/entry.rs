/// Shared behavior of the multi-valued phone and email lists.
pub trait MultiValueEntry {
    fn value(&self) -> &str;
    fn is_primary(&self) -> bool;
    fn set_primary(&mut self, primary: bool);
}

/// Leaves exactly one primary entry in a non-empty list: the first flagged one,
/// or the first entry when none is flagged.
pub fn settle_primary<T: MultiValueEntry>(entries: &mut [T]) {
    let keep = entries
        .iter()
        .position(MultiValueEntry::is_primary)
        .unwrap_or(0);
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.set_primary(index == keep);
    }
}

pub fn primary_of<T: MultiValueEntry>(entries: &[T]) -> Option<&T> {
    entries
        .iter()
        .find(|entry| entry.is_primary())
        .or_else(|| entries.first())
}

pub fn primary_count<T: MultiValueEntry>(entries: &[T]) -> usize {
    entries.iter().filter(|entry| entry.is_primary()).count()
}
