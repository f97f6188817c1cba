//! System pipeline ordering
//!
//! The pipeline is the process-wide ordered sequence of (system, phase)
//! nodes walked once per frame. New nodes are spliced immediately before or
//! after an anchor node; anchors are located by system type with an
//! optional phase to disambiguate between several nodes of the same type.

use std::any::TypeId;

use super::phase::Phase;

/// Generic top-level anchor
///
/// Registering before or after `EngineRoot` appends the node at the tail;
/// it is the anchor used to seed the pipeline's first entries.
pub struct EngineRoot;

/// One pipeline entry
#[derive(Debug, Clone)]
pub(crate) struct SystemNode {
    /// Concrete type of the system instance
    pub system: TypeId,
    /// System name for diagnostics
    pub name: &'static str,
    /// Optional phase argument passed to dispatch
    pub phase: Option<Phase>,
}

/// Ordered pipeline of system nodes
#[derive(Default)]
pub(crate) struct Pipeline {
    nodes: Vec<SystemNode>,
}

/// Phase comparison used for anchor resolution: absence is a wildcard on
/// either side, so a node registered without a phase matches any request
/// and a request without a phase matches any node of the anchor type.
fn phase_matches(node: Option<Phase>, wanted: Option<Phase>) -> bool {
    match (node, wanted) {
        (None, _) | (_, None) => true,
        (Some(a), Some(b)) => a == b,
    }
}

impl Pipeline {
    /// Index of the first node matching the anchor, for "insert before"
    pub fn anchor_before(&self, anchor: TypeId, phase: Option<Phase>) -> Option<usize> {
        self.nodes
            .iter()
            .position(|node| node.system == anchor && phase_matches(node.phase, phase))
    }

    /// Index just past the last node matching the anchor, for "insert after"
    pub fn anchor_after(&self, anchor: TypeId, phase: Option<Phase>) -> Option<usize> {
        self.nodes
            .iter()
            .rposition(|node| node.system == anchor && phase_matches(node.phase, phase))
            .map(|index| index + 1)
    }

    /// Whether an identical (system, phase) node already exists
    pub fn contains(&self, system: TypeId, phase: Option<Phase>) -> bool {
        self.nodes
            .iter()
            .any(|node| node.system == system && node.phase == phase)
    }

    /// Splice a node at the given index
    pub fn insert(&mut self, index: usize, node: SystemNode) {
        self.nodes.insert(index, node);
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The nodes in walk order
    pub fn nodes(&self) -> &[SystemNode] {
        &self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;
    struct C;

    fn node<S: 'static>(phase: Option<Phase>) -> SystemNode {
        SystemNode {
            system: TypeId::of::<S>(),
            name: std::any::type_name::<S>(),
            phase,
        }
    }

    fn order(pipeline: &Pipeline) -> Vec<TypeId> {
        pipeline.nodes().iter().map(|n| n.system).collect()
    }

    #[test]
    fn test_before_and_after_splicing() {
        let mut pipeline = Pipeline::default();
        // Seed with A, append B after it, then squeeze C in before B.
        pipeline.insert(0, node::<A>(None));
        let index = pipeline.anchor_after(TypeId::of::<A>(), None).unwrap();
        pipeline.insert(index, node::<B>(None));
        let index = pipeline.anchor_before(TypeId::of::<B>(), None).unwrap();
        pipeline.insert(index, node::<C>(None));

        assert_eq!(order(&pipeline), vec![TypeId::of::<A>(), TypeId::of::<C>(), TypeId::of::<B>()]);
    }

    #[test]
    fn test_after_anchors_on_last_match() {
        let mut pipeline = Pipeline::default();
        pipeline.insert(0, node::<A>(Some(Phase::Update)));
        pipeline.insert(1, node::<B>(None));
        pipeline.insert(2, node::<A>(Some(Phase::Render)));

        let index = pipeline.anchor_after(TypeId::of::<A>(), Some(Phase::Render)).unwrap();
        assert_eq!(index, 3);
    }

    #[test]
    fn test_before_anchors_on_first_match() {
        let mut pipeline = Pipeline::default();
        pipeline.insert(0, node::<A>(Some(Phase::Update)));
        pipeline.insert(1, node::<A>(Some(Phase::Render)));

        let index = pipeline.anchor_before(TypeId::of::<A>(), Some(Phase::Update)).unwrap();
        assert_eq!(index, 0);
    }

    #[test]
    fn test_absent_phase_matches_any() {
        // Two nodes of the same type with phases {Update, none}: anchoring
        // "after" with phase Update must land after the phase-less node,
        // because absence matches any phase.
        let mut pipeline = Pipeline::default();
        pipeline.insert(0, node::<A>(Some(Phase::Update)));
        pipeline.insert(1, node::<A>(None));

        let index = pipeline.anchor_after(TypeId::of::<A>(), Some(Phase::Update)).unwrap();
        assert_eq!(index, 2);
    }

    #[test]
    fn test_phaseless_request_matches_phased_node() {
        let mut pipeline = Pipeline::default();
        pipeline.insert(0, node::<A>(Some(Phase::Update)));
        assert_eq!(pipeline.anchor_before(TypeId::of::<A>(), None), Some(0));
    }

    #[test]
    fn test_missing_anchor() {
        let pipeline = Pipeline::default();
        assert_eq!(pipeline.anchor_before(TypeId::of::<A>(), None), None);
        assert_eq!(pipeline.anchor_after(TypeId::of::<A>(), None), None);
    }

    #[test]
    fn test_contains_is_exact() {
        let mut pipeline = Pipeline::default();
        pipeline.insert(0, node::<A>(Some(Phase::Update)));
        assert!(pipeline.contains(TypeId::of::<A>(), Some(Phase::Update)));
        assert!(!pipeline.contains(TypeId::of::<A>(), None));
        assert!(!pipeline.contains(TypeId::of::<B>(), Some(Phase::Update)));
    }
}
