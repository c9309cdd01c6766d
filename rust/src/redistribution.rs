//! Moving keys between siblings of one parent.
//!
//! Two primitives cover every repair the leaf-linked trees perform:
//!
//! * rotations move a single entry across one separator (borrowing on
//!   delete, spilling into a sibling on B* insert);
//! * [`regroup`](BPlusTree::regroup) gathers a run of adjacent siblings,
//!   together with the separators between them, and deals the entries back
//!   out evenly over a different number of nodes (merges, 2-into-3 splits,
//!   3-into-2 merges).

use tracing::trace;

use crate::types::{BPlusTree, BranchNode, LeafNode, NodeId, NodeRef, NULL_NODE};

/// Sizes of `parts` nearly equal chunks of `total`, larger chunks first.
pub(crate) fn even_sizes(total: usize, parts: usize) -> Vec<usize> {
    let base = total / parts;
    let extra = total % parts;
    (0..parts).map(|i| base + usize::from(i < extra)).collect()
}

impl<K: Ord + Clone> BPlusTree<K> {
    /// Move the first entry of child `index + 1` to the end of child `index`.
    pub(crate) fn rotate_left(&mut self, parent_id: NodeId, index: usize) {
        let (left, right) = self.sibling_pair(parent_id, index);
        match left {
            NodeRef::Leaf(left_id) => {
                let right_id = right.id();
                let moved = self.leaf_arena[right_id].keys.remove(0);
                self.leaf_arena[left_id].keys.push(moved);
                let separator = self.leaf_arena[right_id].keys[0].clone();
                self.branch_arena[parent_id].keys[index] = separator;
            }
            NodeRef::Branch(left_id) => {
                let right_id = right.id();
                if let Some((moved_key, moved_child)) = self.branch_arena[right_id].take_first() {
                    let separator =
                        std::mem::replace(&mut self.branch_arena[parent_id].keys[index], moved_key);
                    self.branch_arena[left_id].accept_from_right(separator, moved_child);
                }
            }
        }
        trace!(parent = parent_id, index, "rotated entry to left sibling");
    }

    /// Move the last entry of child `index` to the front of child `index + 1`.
    pub(crate) fn rotate_right(&mut self, parent_id: NodeId, index: usize) {
        let (left, right) = self.sibling_pair(parent_id, index);
        match left {
            NodeRef::Leaf(left_id) => {
                let right_id = right.id();
                if let Some(moved) = self.leaf_arena[left_id].keys.pop() {
                    self.branch_arena[parent_id].keys[index] = moved.clone();
                    self.leaf_arena[right_id].keys.insert(0, moved);
                }
            }
            NodeRef::Branch(left_id) => {
                let right_id = right.id();
                if let Some((moved_key, moved_child)) = self.branch_arena[left_id].take_last() {
                    let separator =
                        std::mem::replace(&mut self.branch_arena[parent_id].keys[index], moved_key);
                    self.branch_arena[right_id].accept_from_left(separator, moved_child);
                }
            }
        }
        trace!(parent = parent_id, index, "rotated entry to right sibling");
    }

    fn sibling_pair(&self, parent_id: NodeId, index: usize) -> (NodeRef, NodeRef) {
        let parent = &self.branch_arena[parent_id];
        (parent.children[index], parent.children[index + 1])
    }

    /// True if the `count_in` children starting at `first` would fit into
    /// `count_out` non-root nodes.
    pub(crate) fn group_fits(
        &self,
        parent_id: NodeId,
        first: usize,
        count_in: usize,
        count_out: usize,
    ) -> bool {
        let children = &self.branch_arena[parent_id].children[first..first + count_in];
        let mut entries: usize = children.iter().map(|child| self.node_len(*child)).sum();
        if !children[0].is_leaf() {
            // separators come down from the parent, new ones go back up
            entries = (entries + count_in - 1).saturating_sub(count_out - 1);
        }
        entries <= count_out * self.order.max_keys()
    }

    /// Redistribute the `count_in` adjacent children of `parent_id` starting
    /// at `first` over `count_out` nodes.
    ///
    /// The leftmost node of the group is always kept, surplus nodes are freed
    /// and missing ones allocated. Parent separators for the group are
    /// rebuilt, and so is the leaf chain when the children are leaves.
    pub(crate) fn regroup(
        &mut self,
        parent_id: NodeId,
        first: usize,
        count_in: usize,
        count_out: usize,
    ) {
        let parent = &mut self.branch_arena[parent_id];
        let old_separators: Vec<K> = parent.keys.drain(first..first + count_in - 1).collect();
        let group: Vec<NodeRef> = parent.children.drain(first..first + count_in).collect();

        let (new_separators, new_children) = match group[0] {
            NodeRef::Leaf(_) => {
                let ids: Vec<NodeId> = group.iter().map(NodeRef::id).collect();
                self.regroup_leaves(&ids, count_out)
            }
            NodeRef::Branch(_) => {
                let ids: Vec<NodeId> = group.iter().map(NodeRef::id).collect();
                self.regroup_branches(&ids, old_separators, count_out)
            }
        };

        let parent = &mut self.branch_arena[parent_id];
        parent.keys.splice(first..first, new_separators);
        parent.children.splice(first..first, new_children);

        trace!(parent = parent_id, first, count_in, count_out, "regrouped siblings");
    }

    fn regroup_leaves(&mut self, ids: &[NodeId], count_out: usize) -> (Vec<K>, Vec<NodeRef>) {
        let tail_next = ids.last().map_or(NULL_NODE, |id| self.leaf_arena[*id].next);
        let mut keys = Vec::new();
        for id in ids {
            keys.append(&mut self.leaf_arena[*id].keys);
        }

        let out_ids = self.resize_group(
            ids,
            count_out,
            |tree| tree.leaf_arena.allocate(LeafNode::new()),
            |tree, id| {
                tree.leaf_arena.deallocate(id);
            },
        );

        let mut remaining = keys.into_iter();
        let mut separators = Vec::with_capacity(count_out - 1);
        for (position, size) in even_sizes(remaining.len(), count_out).into_iter().enumerate() {
            let chunk: Vec<K> = remaining.by_ref().take(size).collect();
            if position > 0 {
                if let Some(first_key) = chunk.first() {
                    separators.push(first_key.clone());
                }
            }
            let next = out_ids.get(position + 1).copied().unwrap_or(tail_next);
            let leaf = &mut self.leaf_arena[out_ids[position]];
            leaf.keys = chunk;
            leaf.next = next;
        }

        (separators, out_ids.into_iter().map(NodeRef::Leaf).collect())
    }

    fn regroup_branches(
        &mut self,
        ids: &[NodeId],
        old_separators: Vec<K>,
        count_out: usize,
    ) -> (Vec<K>, Vec<NodeRef>) {
        let mut keys = Vec::new();
        let mut children = Vec::new();
        let mut separators = old_separators.into_iter();
        for (position, id) in ids.iter().enumerate() {
            if position > 0 {
                keys.extend(separators.next());
            }
            let branch = &mut self.branch_arena[*id];
            keys.append(&mut branch.keys);
            children.append(&mut branch.children);
        }

        let out_ids = self.resize_group(
            ids,
            count_out,
            |tree| tree.branch_arena.allocate(BranchNode::new()),
            |tree, id| {
                tree.branch_arena.deallocate(id);
            },
        );

        let promoted_count = count_out - 1;
        let sizes = even_sizes(keys.len() - promoted_count, count_out);
        let mut remaining_keys = keys.into_iter();
        let mut remaining_children = children.into_iter();
        let mut promoted = Vec::with_capacity(promoted_count);
        for (position, size) in sizes.into_iter().enumerate() {
            let branch = &mut self.branch_arena[out_ids[position]];
            branch.keys = remaining_keys.by_ref().take(size).collect();
            branch.children = remaining_children.by_ref().take(size + 1).collect();
            if position + 1 < count_out {
                promoted.extend(remaining_keys.next());
            }
        }

        (promoted, out_ids.into_iter().map(NodeRef::Branch).collect())
    }

    /// Keep the first `count_out` ids of the group, freeing the rest or
    /// allocating fresh nodes after them.
    fn resize_group(
        &mut self,
        ids: &[NodeId],
        count_out: usize,
        mut allocate: impl FnMut(&mut Self) -> NodeId,
        mut free: impl FnMut(&mut Self, NodeId),
    ) -> Vec<NodeId> {
        let kept = ids.len().min(count_out);
        let mut out_ids = ids[..kept].to_vec();
        for id in &ids[kept..] {
            free(self, *id);
        }
        while out_ids.len() < count_out {
            out_ids.push(allocate(self));
        }
        out_ids
    }
}
