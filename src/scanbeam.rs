// Copyright 2025 Lars Brubaker
// License: MIT
//
// Scanbeam queue: a binary max-heap of y values.
//
// nodes[1..=size] hold the heap; nodes[0] is unused so parent/child indices
// are plain shifts. Popping returns the largest pending y and discards every
// further copy of it, so each distinct y is visited exactly once. The sweep
// moves from the largest y (edge bottoms) toward the smallest (edge tops).

pub struct Scanbeam {
    nodes: Vec<i64>,
    size: usize,
}

impl Scanbeam {
    pub fn new() -> Self {
        Scanbeam {
            nodes: vec![0],
            size: 0,
        }
    }

    fn float_down(&mut self, mut curr: usize) {
        let y = self.nodes[curr];
        loop {
            let mut child = curr << 1;
            if child > self.size {
                break;
            }
            if child < self.size && self.nodes[child + 1] > self.nodes[child] {
                child += 1;
            }
            if y >= self.nodes[child] {
                break;
            }
            self.nodes[curr] = self.nodes[child];
            curr = child;
        }
        self.nodes[curr] = y;
    }

    fn float_up(&mut self, mut curr: usize) {
        let y = self.nodes[curr];
        loop {
            let parent = curr >> 1;
            if parent == 0 || self.nodes[parent] >= y {
                break;
            }
            self.nodes[curr] = self.nodes[parent];
            curr = parent;
        }
        self.nodes[curr] = y;
    }

    pub fn insert(&mut self, y: i64) {
        self.size += 1;
        if self.nodes.len() <= self.size {
            self.nodes.push(y);
        } else {
            self.nodes[self.size] = y;
        }
        self.float_up(self.size);
    }

    fn extract_max(&mut self) -> Option<i64> {
        if self.size == 0 {
            return None;
        }
        let max = self.nodes[1];
        self.nodes[1] = self.nodes[self.size];
        self.size -= 1;
        if self.size > 0 {
            self.float_down(1);
        }
        Some(max)
    }

    /// Pop the largest y, suppressing duplicates of it.
    pub fn pop(&mut self) -> Option<i64> {
        let y = self.extract_max()?;
        while self.size > 0 && self.nodes[1] == y {
            self.extract_max();
        }
        Some(y)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.size = 0;
    }
}

impl Default for Scanbeam {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_descending_without_duplicates() {
        let mut sb = Scanbeam::new();
        for y in [5, 1, 9, 5, 3, 9, 9, -2, 1] {
            sb.insert(y);
        }
        let mut out = Vec::new();
        while let Some(y) = sb.pop() {
            out.push(y);
        }
        assert_eq!(out, vec![9, 5, 3, 1, -2]);
        assert!(sb.is_empty());
    }

    #[test]
    fn empty_pop_is_none() {
        let mut sb = Scanbeam::new();
        assert_eq!(sb.pop(), None);
        assert!(sb.is_empty());
    }

    #[test]
    fn interleaved_insert_and_pop() {
        let mut sb = Scanbeam::new();
        sb.insert(10);
        sb.insert(4);
        assert_eq!(sb.pop(), Some(10));
        sb.insert(7);
        sb.insert(4);
        assert_eq!(sb.pop(), Some(7));
        assert_eq!(sb.pop(), Some(4));
        assert_eq!(sb.pop(), None);
        sb.insert(1);
        sb.clear();
        assert!(sb.is_empty());
    }

    #[test]
    fn many_values_stay_ordered() {
        let mut sb = Scanbeam::new();
        for i in 0..200i64 {
            sb.insert((i * 37) % 101);
        }
        let mut prev = i64::MAX;
        while let Some(y) = sb.pop() {
            assert!(y < prev);
            prev = y;
        }
    }
}
