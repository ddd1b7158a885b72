//! Stable integer identities for tree node instances.
//!
//! Identity is arena identity: two parents holding the same id hold the same
//! node. Ids are handed out 1, 2, 3 ... in first-visit order.

use std::collections::HashMap;

use go125_syntax::ast::{CommentGroupId, DeclId, ExprId, FieldId, SpecId, StmtId};

/// Arena address of a node that can be shared between parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKey {
    Expr(ExprId),
    Stmt(StmtId),
    Decl(DeclId),
    Spec(SpecId),
    Field(FieldId),
    CommentGroup(CommentGroupId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// Tracking is off; no id is emitted.
    Untracked,
    /// First visit of this instance, or an inline helper node.
    Unseen(u32),
    /// The instance was visited before under this id.
    Seen(u32),
}

impl Identity {
    pub fn ref_id(self) -> Option<u32> {
        match self {
            Identity::Untracked => None,
            Identity::Unseen(id) | Identity::Seen(id) => Some(id),
        }
    }
}

#[derive(Debug, Default)]
pub struct RefTracker {
    enabled: bool,
    next: u32,
    ids: HashMap<NodeKey, u32>,
    shared_hits: usize,
}

impl RefTracker {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Identity of the node at `key`; `None` is an inline helper node, which
    /// always gets a fresh id.
    pub fn identity_of(&mut self, key: Option<NodeKey>) -> Identity {
        if !self.enabled {
            return Identity::Untracked;
        }
        let Some(key) = key else {
            return Identity::Unseen(self.fresh());
        };
        if let Some(&id) = self.ids.get(&key) {
            self.shared_hits += 1;
            return Identity::Seen(id);
        }
        let id = self.fresh();
        self.ids.insert(key, id);
        Identity::Unseen(id)
    }

    fn fresh(&mut self) -> u32 {
        self.next += 1;
        self.next
    }

    /// Number of ids handed out so far.
    pub fn assigned(&self) -> u32 {
        self.next
    }

    /// Number of revisits of an already identified instance.
    pub fn shared_hits(&self) -> usize {
        self.shared_hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_instance_same_id() {
        let mut t = RefTracker::new(true);
        let a = NodeKey::Expr(ExprId::from_raw(0));
        let b = NodeKey::Expr(ExprId::from_raw(1));
        assert_eq!(t.identity_of(Some(a)), Identity::Unseen(1));
        assert_eq!(t.identity_of(Some(b)), Identity::Unseen(2));
        assert_eq!(t.identity_of(Some(a)), Identity::Seen(1));
        assert_eq!(t.shared_hits(), 1);
    }

    #[test]
    fn families_do_not_collide() {
        let mut t = RefTracker::new(true);
        assert_eq!(t.identity_of(Some(NodeKey::Expr(ExprId::from_raw(0)))), Identity::Unseen(1));
        assert_eq!(t.identity_of(Some(NodeKey::Stmt(StmtId::from_raw(0)))), Identity::Unseen(2));
    }

    #[test]
    fn inline_nodes_always_fresh() {
        let mut t = RefTracker::new(true);
        assert_eq!(t.identity_of(None), Identity::Unseen(1));
        assert_eq!(t.identity_of(None), Identity::Unseen(2));
        assert_eq!(t.assigned(), 2);
    }

    #[test]
    fn disabled_tracker_emits_nothing() {
        let mut t = RefTracker::new(false);
        let a = NodeKey::Spec(SpecId::from_raw(3));
        assert_eq!(t.identity_of(Some(a)), Identity::Untracked);
        assert_eq!(t.identity_of(Some(a)), Identity::Untracked);
        assert_eq!(t.identity_of(None).ref_id(), None);
        assert_eq!(t.assigned(), 0);
    }
}
