//! In-memory reply tree for a single question.
//!
//! [`ReplyThread::load`] fetches every reply of a question in one query and
//! indexes them by id and by parent id, so navigation afterwards is free of
//! round-trips.

use crate::core::Reply;
use crate::db::{schema::ReplyRow, Connection};
use crate::error::{format_ids, Result};
use rusqlite::params;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Arena of one question's replies with a parent → children index.
#[derive(Debug, Clone, Default)]
pub struct ReplyThread {
    question_id: i64,
    replies: HashMap<i64, Reply>,
    children: HashMap<i64, Vec<i64>>,
    roots: Vec<i64>,
    detached: Vec<i64>,
    cyclic: Vec<i64>,
}

impl ReplyThread {
    /// Load and index all replies to `question_id`.
    pub fn load(conn: &mut Connection, question_id: i64) -> Result<Self> {
        let rows = conn.query(
            "SELECT * FROM replies WHERE question_id = ? ORDER BY id",
            params![question_id],
            ReplyRow::from_row,
        )?;
        Ok(Self::from_replies(
            question_id,
            rows.into_iter().map(Reply::from_row).collect(),
        ))
    }

    /// Index an already-fetched set of replies.
    ///
    /// Replies belonging to other questions are dropped. A reply whose parent
    /// is not part of this question is kept as a root and listed in
    /// [`detached`](Self::detached). A reply caught in a parent cycle is cut
    /// loose from its parent, kept as a root and listed in
    /// [`cyclic`](Self::cyclic), so every reply shows up in [`walk`](Self::walk).
    pub fn from_replies(question_id: i64, mut replies: Vec<Reply>) -> Self {
        replies.retain(|r| r.question_id == question_id);
        replies.sort_by_key(|r| r.id);

        let known: HashSet<i64> = replies.iter().map(|r| r.id).collect();
        let mut thread = Self {
            question_id,
            ..Self::default()
        };

        for reply in &replies {
            if reply.is_top_level() {
                thread.roots.push(reply.id);
                continue;
            }
            match reply.parent_reply_id.filter(|parent| known.contains(parent)) {
                Some(parent) => thread.children.entry(parent).or_default().push(reply.id),
                None => {
                    thread.detached.push(reply.id);
                    thread.roots.push(reply.id);
                }
            }
        }

        let mut reached = HashSet::new();
        for &root in &thread.roots {
            thread.mark_reachable(root, &mut reached);
        }

        // Anything the roots cannot reach hangs off a parent cycle.
        for reply in &replies {
            if reached.contains(&reply.id) {
                continue;
            }
            if let Some(siblings) = reply
                .parent_reply_id
                .and_then(|parent| thread.children.get_mut(&parent))
            {
                siblings.retain(|&id| id != reply.id);
            }
            thread.cyclic.push(reply.id);
            thread.roots.push(reply.id);
            thread.mark_reachable(reply.id, &mut reached);
        }
        thread.roots.sort_unstable();

        if !thread.detached.is_empty() {
            warn!(
                question_id,
                replies = %format_ids(&thread.detached),
                "replies point at parents outside their question"
            );
        }
        if !thread.cyclic.is_empty() {
            warn!(
                question_id,
                replies = %format_ids(&thread.cyclic),
                "reply parents form a cycle"
            );
        }

        thread.replies = replies.into_iter().map(|r| (r.id, r)).collect();
        thread
    }

    /// The question these replies belong to.
    pub fn question_id(&self) -> i64 {
        self.question_id
    }

    pub fn len(&self) -> usize {
        self.replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Reply> {
        self.replies.get(&id)
    }

    /// Top-level replies in id order, including detached and cyclic ones.
    pub fn roots(&self) -> Vec<&Reply> {
        self.resolve(&self.roots)
    }

    /// Replies whose parent lives outside this question.
    pub fn detached(&self) -> Vec<&Reply> {
        self.resolve(&self.detached)
    }

    /// Replies promoted to roots because their parents form a cycle.
    pub fn cyclic(&self) -> Vec<&Reply> {
        self.resolve(&self.cyclic)
    }

    /// Direct children of `id` in id order.
    pub fn children(&self, id: i64) -> Vec<&Reply> {
        self.children
            .get(&id)
            .map(|ids| self.resolve(ids))
            .unwrap_or_default()
    }

    /// The in-thread parent of `id`.
    pub fn parent(&self, id: i64) -> Option<&Reply> {
        if self.cyclic.contains(&id) {
            return None;
        }
        let parent_id = self.replies.get(&id)?.parent_reply_id?;
        self.replies.get(&parent_id)
    }

    /// Distance from the nearest root; roots are depth 0.
    pub fn depth(&self, id: i64) -> Option<usize> {
        self.replies.get(&id)?;
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            depth += 1;
            current = parent.id;
        }
        Some(depth)
    }

    /// Depth-first pre-order walk yielding `(depth, reply)`.
    pub fn walk(&self) -> Vec<(usize, &Reply)> {
        let mut out = Vec::with_capacity(self.replies.len());
        let mut stack: Vec<(usize, i64)> = self.roots.iter().rev().map(|&id| (0, id)).collect();

        while let Some((depth, id)) = stack.pop() {
            let Some(reply) = self.replies.get(&id) else {
                continue;
            };
            out.push((depth, reply));
            if let Some(kids) = self.children.get(&id) {
                stack.extend(kids.iter().rev().map(|&kid| (depth + 1, kid)));
            }
        }
        out
    }

    fn mark_reachable(&self, from: i64, seen: &mut HashSet<i64>) {
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if seen.insert(id) {
                if let Some(kids) = self.children.get(&id) {
                    stack.extend(kids);
                }
            }
        }
    }

    fn resolve(&self, ids: &[i64]) -> Vec<&Reply> {
        ids.iter().filter_map(|id| self.replies.get(id)).collect()
    }
}
