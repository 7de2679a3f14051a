// Copyright 2025 Lars Brubaker
// License: MIT
//
// Vec-backed arena with a free list. Output points live here so rings can be
// spliced, split and merged by rewriting indices. Freed slots keep their last
// value and are marked dead until reused, so a ring walk that reaches a freed
// point can tell.

#[derive(Clone, Debug)]
struct Slot<T> {
    value: T,
    live: bool,
}

pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Store `value`, reusing a freed slot when one is available.
    pub fn alloc(&mut self, value: T) -> u32 {
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.value = value;
            slot.live = true;
            idx
        } else {
            let idx = self.slots.len() as u32;
            self.slots.push(Slot { value, live: true });
            idx
        }
    }

    /// Return a slot to the free list. Freeing a dead slot is a no-op.
    pub fn free(&mut self, idx: u32) {
        if let Some(slot) = self.slots.get_mut(idx as usize) {
            if slot.live {
                slot.live = false;
                self.free_list.push(idx);
            }
        }
    }

    pub fn is_live(&self, idx: u32) -> bool {
        self.slots.get(idx as usize).is_some_and(|s| s.live)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
    }

    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Unchecked access for hot paths inside the sweep; liveness is verified when
// rings are walked for output.
impl<T> std::ops::Index<u32> for Arena<T> {
    type Output = T;
    #[inline]
    fn index(&self, idx: u32) -> &T {
        &self.slots[idx as usize].value
    }
}

impl<T> std::ops::IndexMut<u32> for Arena<T> {
    #[inline]
    fn index_mut(&mut self, idx: u32) -> &mut T {
        &mut self.slots[idx as usize].value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_and_free() {
        let mut arena: Arena<u32> = Arena::new();
        let a = arena.alloc(1);
        let b = arena.alloc(2);
        assert_ne!(a, b);
        arena.free(a);
        let c = arena.alloc(3);
        // c reuses a's slot
        assert_eq!(c, a);
        assert_eq!(arena[c], 3);
    }

    #[test]
    fn freed_slot_is_dead_until_reused() {
        let mut arena: Arena<i32> = Arena::new();
        let idx = arena.alloc(7);
        arena.free(idx);
        arena.free(idx);
        assert!(!arena.is_live(idx));
        assert_eq!(arena.live_count(), 0);
        let again = arena.alloc(1);
        assert_eq!(again, idx);
        assert!(arena.is_live(again));
        assert!(!arena.is_live(idx + 1));
    }
}
