use crate::types::{LargestDirectory, LargestFile};

/// Anything that can be ranked by a byte size.
pub trait Ranked {
    fn rank_size(&self) -> u64;
}

impl Ranked for LargestFile {
    fn rank_size(&self) -> u64 {
        self.size_bytes
    }
}

impl Ranked for LargestDirectory {
    fn rank_size(&self) -> u64 {
        self.size_bytes
    }
}

/// Bounded collection keeping the `limit` largest items, largest first.
///
/// A sorted `Vec` is plenty at the sizes we allow (≤ 500). The sort is stable and
/// a full collection only admits strictly larger candidates, so among equal
/// sizes whoever arrived first stays ahead and stays in.
#[derive(Debug, Clone)]
pub struct TopK<T> {
    limit: usize,
    items: Vec<T>,
}

impl<T: Ranked> TopK<T> {
    pub fn new(limit: usize) -> Self {
        Self { limit, items: Vec::with_capacity(limit.min(512)) }
    }

    /// Whether a candidate of this size would currently be kept.
    pub fn would_accept(&self, size: u64) -> bool {
        if self.limit == 0 {
            return false;
        }
        match self.items.last() {
            Some(min) if self.items.len() >= self.limit => size > min.rank_size(),
            _ => true,
        }
    }

    pub fn offer(&mut self, item: T) {
        if !self.would_accept(item.rank_size()) {
            return;
        }
        if self.items.len() < self.limit {
            self.items.push(item);
        } else if let Some(last) = self.items.last_mut() {
            *last = item;
        }
        self.items.sort_by(|a, b| b.rank_size().cmp(&a.rank_size()));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}
