use core::fmt;

use thiserror::Error;

/// Returned by [PriorityQueue::extract_min] on an empty queue. Callers are expected to check
/// [PriorityQueue::is_empty] first, so this signals a contract violation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("extract_min called on an empty priority queue")]
pub struct EmptyQueueError;

/// A queue that hands out items in priority order, resolving ties first-in-first-out.
///
/// Priority is defined by the `less_than` comparator: if `less_than(a, b)` holds, `a` is removed
/// before `b`. Items are kept in a vector sorted so that the next item to be removed sits at the
/// end, which makes removal O(1) and insertion O(n). The grids this is used on are small enough
/// for that to beat the bookkeeping a heap would need to keep ties FIFO.
pub struct PriorityQueue<T, F> {
    queue: Vec<T>,
    less_than: F,
}

impl<T, F> PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> bool,
{
    pub fn new(less_than: F) -> PriorityQueue<T, F> {
        PriorityQueue {
            queue: Vec::new(),
            less_than,
        }
    }

    pub fn with_capacity(capacity: usize, less_than: F) -> PriorityQueue<T, F> {
        PriorityQueue {
            queue: Vec::with_capacity(capacity),
            less_than,
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Inserts `item` behind every queued item of equal priority.
    pub fn insert(&mut self, item: T) {
        // Everything strictly lower in priority than `item` forms a prefix of the vector. Placing
        // the item right after that prefix puts it in front of its equals, so they leave first.
        let ix = self
            .queue
            .partition_point(|queued| (self.less_than)(&item, queued));
        self.queue.insert(ix, item);
    }

    /// Removes and returns the item with the highest priority.
    pub fn extract_min(&mut self) -> Result<T, EmptyQueueError> {
        self.queue.pop().ok_or(EmptyQueueError)
    }

    /// The item [extract_min](Self::extract_min) would return next.
    pub fn peek(&self) -> Option<&T> {
        self.queue.last()
    }

    /// Iterates over the queued items in removal order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.queue.iter().rev()
    }

    /// Checks whether an item equal to `item` is already queued with a priority key lower than or
    /// equal to that of `item`. Identity comes from [PartialEq], the key from `key`.
    pub fn contains_with_priority_at_most<K, FK>(&self, item: &T, key: FK) -> bool
    where
        T: PartialEq,
        K: PartialOrd,
        FK: Fn(&T) -> K,
    {
        let bound = key(item);
        self.queue
            .iter()
            .any(|queued| queued == item && key(queued) <= bound)
    }
}

impl<T: fmt::Debug, F> fmt::Debug for PriorityQueue<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.queue.iter().rev()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shorter(a: &&str, b: &&str) -> bool {
        a.len() < b.len()
    }

    fn names() -> PriorityQueue<&'static str, fn(&&str, &&str) -> bool> {
        let mut queue = PriorityQueue::new(shorter as fn(&&str, &&str) -> bool);
        queue.insert("fred");
        queue.insert("arju");
        queue.insert("monalisa");
        queue.insert("hat");
        queue
    }

    #[test]
    fn insert_keeps_sorted_storage() {
        let queue = names();
        assert_eq!(queue.queue, vec!["monalisa", "arju", "fred", "hat"]);
        assert_eq!(queue.peek(), Some(&"hat"));
    }

    #[test]
    fn ties_leave_in_insertion_order() {
        let mut queue = names();
        assert_eq!(queue.extract_min(), Ok("hat"));
        assert_eq!(queue.extract_min(), Ok("fred"));
        assert_eq!(queue.extract_min(), Ok("arju"));
        assert_eq!(queue.extract_min(), Ok("monalisa"));
    }

    #[test]
    fn empty_queue_errors() {
        let mut queue = names();
        for _ in 0..4 {
            assert!(queue.extract_min().is_ok());
        }
        assert!(queue.is_empty());
        assert_eq!(queue.extract_min(), Err(EmptyQueueError));
    }

    #[test]
    fn single_element() {
        let mut queue = PriorityQueue::new(|a: &i32, b: &i32| a < b);
        queue.insert(3);
        assert_eq!(queue.len(), 1);
        queue.insert(1);
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    /// Inserts many keyed items and checks both ordering and FIFO tie-breaking on extraction.
    #[test]
    fn extraction_is_stable_sort() {
        let keys = [5, 3, 9, 3, 0, 5, 5, 1, 9, 3, 7, 0, 2, 2, 8];
        let mut queue = PriorityQueue::new(|a: &(i32, usize), b: &(i32, usize)| a.0 < b.0);
        for (seq, key) in keys.iter().enumerate() {
            queue.insert((*key, seq));
        }
        let mut extracted = Vec::new();
        while !queue.is_empty() {
            extracted.push(queue.extract_min().unwrap());
        }
        let mut expected = keys.iter().copied().zip(0usize..).collect::<Vec<_>>();
        expected.sort_by_key(|&(key, _)| key);
        assert_eq!(extracted, expected);
    }

    #[test]
    fn priority_membership() {
        #[derive(Debug)]
        struct Entry {
            id: char,
            cost: i32,
        }
        impl PartialEq for Entry {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }
        let mut queue = PriorityQueue::new(|a: &Entry, b: &Entry| a.cost < b.cost);
        queue.insert(Entry { id: 'a', cost: 20 });
        queue.insert(Entry { id: 'b', cost: 10 });
        let cost = |e: &Entry| e.cost;
        assert!(queue.contains_with_priority_at_most(&Entry { id: 'a', cost: 20 }, cost));
        assert!(queue.contains_with_priority_at_most(&Entry { id: 'a', cost: 30 }, cost));
        assert!(!queue.contains_with_priority_at_most(&Entry { id: 'a', cost: 19 }, cost));
        assert!(!queue.contains_with_priority_at_most(&Entry { id: 'c', cost: 99 }, cost));
    }
}
