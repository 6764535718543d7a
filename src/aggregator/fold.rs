//! Generic reduce-over-tree for trace forests.
//!
//! Every aggregation over a trace goes through `fold_trace`: one visit per
//! transaction, in a caller-chosen order. The walk keeps its own work list,
//! so arbitrarily deep traces do not grow the call stack.

use crate::parser::schema::TraceEvent;
use std::collections::VecDeque;
use std::fmt;

/// Order in which a forest is walked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalOrder {
    /// Parent before children, roots left to right
    #[default]
    PreOrder,
    /// Children before parent
    PostOrder,
    /// Level by level
    BreadthFirst,
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TraversalOrder::PreOrder => "pre-order",
            TraversalOrder::PostOrder => "post-order",
            TraversalOrder::BreadthFirst => "breadth-first",
        };
        f.write_str(name)
    }
}

/// Iterator over every transaction of a forest
///
/// The flag next to each pending node marks that its children were
/// already scheduled (only used for post-order).
pub struct Walk<'a> {
    order: TraversalOrder,
    pending: VecDeque<(&'a TraceEvent, bool)>,
}

impl<'a> Walk<'a> {
    pub fn new(roots: &'a [TraceEvent], order: TraversalOrder) -> Self {
        Self {
            order,
            pending: roots.iter().map(|e| (e, false)).collect(),
        }
    }

    fn schedule_children_first(&mut self, node: &'a TraceEvent) {
        for child in node.children.iter().rev() {
            self.pending.push_front((child, false));
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a TraceEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.order {
            TraversalOrder::PreOrder => {
                let (node, _) = self.pending.pop_front()?;
                self.schedule_children_first(node);
                Some(node)
            }
            TraversalOrder::BreadthFirst => {
                let (node, _) = self.pending.pop_front()?;
                self.pending.extend(node.children.iter().map(|c| (c, false)));
                Some(node)
            }
            TraversalOrder::PostOrder => loop {
                let (node, expanded) = self.pending.pop_front()?;
                if expanded || node.children.is_empty() {
                    return Some(node);
                }
                self.pending.push_front((node, true));
                self.schedule_children_first(node);
            },
        }
    }
}

impl TraceEvent {
    /// Walk this transaction and all of its descendants
    pub fn iter(&self, order: TraversalOrder) -> Walk<'_> {
        Walk::new(std::slice::from_ref(self), order)
    }
}

/// Fold `visit` over every transaction in the forest
///
/// **Public** - building block for trace aggregations
///
/// # Arguments
/// * `trace` - Root transactions
/// * `order` - Traversal order
/// * `seed` - Initial accumulator
/// * `visit` - Called once per transaction with the running accumulator
///
/// # Example
/// ```ignore
/// let deepest = fold_trace(&trace, TraversalOrder::PreOrder, 0, |max, e| max.max(e.generation));
/// ```
pub fn fold_trace<A, F>(trace: &[TraceEvent], order: TraversalOrder, seed: A, visit: F) -> A
where
    F: FnMut(A, &TraceEvent) -> A,
{
    Walk::new(trace, order).fold(seed, visit)
}

#[cfg(test)]
mod tests {
    use super::*;

    //      a
    //     / \
    //    b   c
    //    |
    //    d
    fn sample() -> Vec<TraceEvent> {
        vec![
            TraceEvent::new("p", "a", 0.0, 1.0, 0).with_children(vec![
                TraceEvent::new("p", "b", 0.0, 1.0, 1)
                    .with_children(vec![TraceEvent::new("p", "d", 0.0, 1.0, 2)]),
                TraceEvent::new("p", "c", 0.0, 1.0, 1),
            ]),
            TraceEvent::new("p", "e", 0.0, 1.0, 0),
        ]
    }

    fn ids(trace: &[TraceEvent], order: TraversalOrder) -> Vec<String> {
        Walk::new(trace, order)
            .map(|e| e.event_id.to_string())
            .collect()
    }

    #[test]
    fn test_pre_order() {
        assert_eq!(ids(&sample(), TraversalOrder::PreOrder), ["a", "b", "d", "c", "e"]);
    }

    #[test]
    fn test_post_order() {
        assert_eq!(ids(&sample(), TraversalOrder::PostOrder), ["d", "b", "c", "a", "e"]);
    }

    #[test]
    fn test_breadth_first() {
        assert_eq!(ids(&sample(), TraversalOrder::BreadthFirst), ["a", "e", "b", "c", "d"]);
    }

    #[test]
    fn test_fold_empty_returns_seed() {
        let result = fold_trace(&[], TraversalOrder::PostOrder, 7, |acc, _| acc + 1);
        assert_eq!(result, 7);
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let mut node = TraceEvent::new("p", "leaf", 0.0, 1.0, 50_000);
        for depth in (0..50_000u64).rev() {
            node = TraceEvent::new("p", format!("e{}", depth), 0.0, 1.0, depth)
                .with_children(vec![node]);
        }

        for order in [
            TraversalOrder::PreOrder,
            TraversalOrder::PostOrder,
            TraversalOrder::BreadthFirst,
        ] {
            assert_eq!(node.iter(order).count(), 50_001);
        }

        drop(node);
    }
}
