//! LRU List Module
//!
//! Doubly-linked recency list stored in a slot arena.
//!
//! Nodes live in a `Vec` of slots and link to each other through
//! generational indices instead of pointers, so every node has exactly one
//! owner (the arena) and all list operations stay O(1).

// == Node Id ==
/// Stable handle to a node in the arena.
///
/// The generation is bumped whenever a slot is freed, so an id that
/// outlives its node never resolves to the slot's next occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug)]
struct Node<V> {
    value: V,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

#[derive(Debug)]
struct Slot<V> {
    generation: u32,
    node: Option<Node<V>>,
}

// == LRU List ==
/// Recency list ordered from most recently used (head) to least recently
/// used (tail).
#[derive(Debug)]
pub struct LruList<V> {
    slots: Vec<Slot<V>>,
    /// Indices of vacant slots available for reuse
    free: Vec<usize>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl<V> Default for LruList<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> LruList<V> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts a value as the most recently used node.
    pub fn push_front(&mut self, value: V) -> NodeId {
        let node = Node {
            value,
            prev: None,
            next: None,
        };

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        };

        self.link_front(id);
        self.len += 1;
        id
    }

    // == Move To Front ==
    /// Marks a node as most recently used.
    ///
    /// Returns false if the id no longer refers to a live node.
    pub fn move_to_front(&mut self, id: NodeId) -> bool {
        if self.node(id).is_none() {
            return false;
        }
        if self.head != Some(id) {
            self.unlink(id);
            self.link_front(id);
        }
        true
    }

    // == Remove ==
    /// Unlinks a node and frees its slot, returning the value.
    pub fn remove(&mut self, id: NodeId) -> Option<V> {
        self.node(id)?;
        self.unlink(id);

        let slot = &mut self.slots[id.index];
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(node.value)
    }

    // == Pop Back ==
    /// Removes and returns the least recently used value.
    pub fn pop_back(&mut self) -> Option<V> {
        let tail = self.tail?;
        self.remove(tail)
    }

    // == Accessors ==
    /// Id of the most recently used node.
    pub fn front(&self) -> Option<NodeId> {
        self.head
    }

    /// Id of the least recently used node.
    pub fn back(&self) -> Option<NodeId> {
        self.tail
    }

    pub fn get(&self, id: NodeId) -> Option<&V> {
        self.node(id).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut V> {
        self.node_mut(id).map(|node| &mut node.value)
    }

    // == Length ==
    /// Returns the number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Clear ==
    /// Drops every node and releases the arena.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Iter ==
    /// Iterates values from most to least recently used.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    // == Internal Linking ==
    fn node(&self, id: NodeId) -> Option<&Node<V>> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<V>> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Detaches a live node from its neighbours, leaving it in its slot.
    fn unlink(&mut self, id: NodeId) {
        let (prev, next) = match self.node_mut(id) {
            Some(node) => (node.prev.take(), node.next.take()),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.node_mut(p) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(n) => {
                if let Some(node) = self.node_mut(n) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    /// Attaches a detached live node at the head.
    fn link_front(&mut self, id: NodeId) {
        let old_head = self.head;

        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = old_head;
        }

        match old_head {
            Some(h) => {
                if let Some(node) = self.node_mut(h) {
                    node.prev = Some(id);
                }
            }
            None => self.tail = Some(id),
        }

        self.head = Some(id);
    }

    /// Walks the list in both directions and checks the structural
    /// invariants: acyclic, consistent back links, head/tail set iff
    /// non-empty, node count equals `len`.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.head.is_some(), self.len > 0, "head set iff non-empty");
        assert_eq!(self.tail.is_some(), self.len > 0, "tail set iff non-empty");

        let mut count = 0;
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let node = self.node(id).expect("linked id must be live");
            assert_eq!(node.prev, prev, "back link mismatch");
            prev = Some(id);
            cursor = node.next;
            count += 1;
            assert!(count <= self.len, "list is cyclic or longer than len");
        }
        assert_eq!(prev, self.tail, "forward walk must end at tail");
        assert_eq!(count, self.len);
    }
}

// == Iterator ==
/// Iterator over list values, most recently used first.
#[derive(Debug)]
pub struct Iter<'a, V> {
    list: &'a LruList<V>,
    cursor: Option<NodeId>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.value)
    }
}
