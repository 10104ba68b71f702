//! Cycle detection for diagram traversal.
//!
//! `PathGuard` tracks the ids on the current path of the resolver's walk, so a
//! shared part reached again through a sibling path is fine while re-entering
//! an ancestor is a cycle. `sweep_unreached` covers cycles that no entry point
//! leads into.

use bb_model::{ElementId, ElementIndex};

use crate::error::{BomError, BomResult};

/// The stack of elements on the current traversal path.
#[derive(Debug, Clone)]
pub struct PathGuard {
    on_path: Vec<bool>,
    stack: Vec<ElementId>,
}

impl PathGuard {
    pub fn new(len: usize) -> Self {
        Self {
            on_path: vec![false; len],
            stack: Vec::new(),
        }
    }

    /// Push `id` onto the path, failing if it is already there.
    pub fn enter(&mut self, id: ElementId, index: &ElementIndex<'_>) -> BomResult<()> {
        if self.on_path[id.slot()] {
            return Err(BomError::Cycle {
                id: index.key(id).to_string(),
                path: self.path_to(id, index),
            });
        }
        self.on_path[id.slot()] = true;
        self.stack.push(id);
        Ok(())
    }

    /// Pop `id`, which must be the innermost element on the path.
    pub fn leave(&mut self, id: ElementId) {
        debug_assert_eq!(self.stack.last(), Some(&id));
        self.stack.pop();
        self.on_path[id.slot()] = false;
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Current path as string ids, followed by `next`.
    pub fn path_to(&self, next: ElementId, index: &ElementIndex<'_>) -> Vec<String> {
        self.stack
            .iter()
            .chain(std::iter::once(&next))
            .map(|&id| index.key(id).to_string())
            .collect()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Active,
    Done,
}

/// Depth-first search from every element the walk never reached.
///
/// Reached elements were fully explored without a cycle, so they count as
/// done.
pub fn sweep_unreached(index: &ElementIndex<'_>, reached: &[bool]) -> BomResult<()> {
    let mut marks: Vec<Mark> = reached
        .iter()
        .map(|&r| if r { Mark::Done } else { Mark::Unvisited })
        .collect();
    let mut guard = PathGuard::new(index.len());

    for start in index.ids() {
        if marks[start.slot()] == Mark::Unvisited {
            visit(start, index, &mut marks, &mut guard)?;
        }
    }
    Ok(())
}

fn visit(
    id: ElementId,
    index: &ElementIndex<'_>,
    marks: &mut [Mark],
    guard: &mut PathGuard,
) -> BomResult<()> {
    match marks[id.slot()] {
        Mark::Done => return Ok(()),
        // Active means on the guard's path; enter() reports it.
        Mark::Active | Mark::Unvisited => guard.enter(id, index)?,
    }
    marks[id.slot()] = Mark::Active;

    for next in index.successors(id) {
        visit(next, index, marks, guard)?;
    }

    marks[id.slot()] = Mark::Done;
    guard.leave(id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb_model::DiagramBuilder;

    #[test]
    fn guard_reports_path_ending_in_repeat() {
        let mut builder = DiagramBuilder::new();
        builder.add_node("A", "A").add_node("B", "B");
        let diagram = builder.build().unwrap();
        let index = ElementIndex::from_diagram(&diagram).unwrap();
        let a = index.id_of("A").unwrap();
        let b = index.id_of("B").unwrap();

        let mut guard = PathGuard::new(index.len());
        guard.enter(a, &index).unwrap();
        guard.enter(b, &index).unwrap();
        assert_eq!(guard.depth(), 2);

        let err = guard.enter(a, &index).unwrap_err();
        assert_eq!(
            err,
            BomError::Cycle {
                id: "A".into(),
                path: vec!["A".into(), "B".into(), "A".into()],
            }
        );

        guard.leave(b);
        guard.leave(a);
        assert_eq!(guard.depth(), 0);
        // Re-entering after leaving is a fresh path.
        guard.enter(b, &index).unwrap();
    }

    #[test]
    fn sweep_finds_cycle_between_nested_containers() {
        // Neither container is top-level, so no walk ever reaches them.
        let mut builder = DiagramBuilder::new();
        builder
            .add_subgraph("A", "A")
            .add_nested_subgraph("A", "B", "B")
            .link_child("B", "A");
        let mut diagram = builder.build().unwrap();
        diagram.top_level.clear();

        let index = ElementIndex::from_diagram(&diagram).unwrap();
        let reached = vec![false; index.len()];
        let err = sweep_unreached(&index, &reached).unwrap_err();
        assert_eq!(
            err,
            BomError::Cycle {
                id: "A".into(),
                path: vec!["A".into(), "B".into(), "A".into()],
            }
        );
    }

    #[test]
    fn sweep_accepts_shared_parts() {
        // Diamond: A -> B, A -> C, B -> D, C -> D
        let mut builder = DiagramBuilder::new();
        builder
            .add_node("A", "A")
            .add_node("B", "B")
            .add_node("C", "C")
            .add_node("D", "D")
            .add_edge("A", "B")
            .add_edge("A", "C")
            .add_edge("B", "D")
            .add_edge("C", "D");
        let diagram = builder.build().unwrap();
        let index = ElementIndex::from_diagram(&diagram).unwrap();
        assert!(sweep_unreached(&index, &vec![false; index.len()]).is_ok());
    }
}
