//! Pipeline composition model

use crate::core::step::StepKind;

/// A pipeline: ordered/parallel composition of steps and sub-pipelines.
///
/// A `Sequence` completes when its children have completed in order; a
/// `Parallel` node completes when its slowest child has completed. Parallel
/// siblings must write disjoint output subtrees; that is enforced by the
/// fixed step destinations, not checked at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineNode {
    Step(StepKind),
    Sequence(Vec<PipelineNode>),
    Parallel(Vec<PipelineNode>),
}

impl PipelineNode {
    pub fn step(kind: StepKind) -> Self {
        PipelineNode::Step(kind)
    }

    pub fn sequence<I: IntoIterator<Item = PipelineNode>>(children: I) -> Self {
        PipelineNode::Sequence(children.into_iter().collect())
    }

    pub fn parallel<I: IntoIterator<Item = PipelineNode>>(children: I) -> Self {
        PipelineNode::Parallel(children.into_iter().collect())
    }

    /// Every step referenced by this pipeline, in declaration order
    pub fn steps(&self) -> Vec<StepKind> {
        let mut steps = Vec::new();
        self.collect_steps(&mut steps);
        steps
    }

    fn collect_steps(&self, steps: &mut Vec<StepKind>) {
        match self {
            PipelineNode::Step(kind) => steps.push(*kind),
            PipelineNode::Sequence(children) | PipelineNode::Parallel(children) => {
                for child in children {
                    child.collect_steps(steps);
                }
            }
        }
    }
}

/// The default build pipeline, run after `clean`.
///
/// The sprite is generated before the parallel group because rendered pages
/// reference sprite output paths.
pub fn default_pipeline() -> PipelineNode {
    PipelineNode::sequence([
        PipelineNode::step(StepKind::Svg),
        PipelineNode::parallel([
            PipelineNode::step(StepKind::Scripts),
            PipelineNode::step(StepKind::Styles),
            PipelineNode::step(StepKind::Templates),
            PipelineNode::step(StepKind::Images),
            PipelineNode::step(StepKind::Fonts),
        ]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pipeline_covers_every_step() {
        let steps = default_pipeline().steps();
        assert_eq!(steps.len(), StepKind::ALL.len());
        for kind in StepKind::ALL {
            assert!(steps.contains(&kind), "missing step {}", kind);
        }
    }

    #[test]
    fn test_sprite_precedes_the_parallel_group() {
        match default_pipeline() {
            PipelineNode::Sequence(children) => {
                assert_eq!(children[0], PipelineNode::Step(StepKind::Svg));
                assert!(matches!(children[1], PipelineNode::Parallel(_)));
            }
            other => panic!("expected a sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_steps_flattens_nested_composition() {
        let pipeline = PipelineNode::sequence([
            PipelineNode::step(StepKind::Svg),
            PipelineNode::parallel([
                PipelineNode::step(StepKind::Scripts),
                PipelineNode::sequence([PipelineNode::step(StepKind::Styles)]),
            ]),
        ]);
        assert_eq!(
            pipeline.steps(),
            vec![StepKind::Svg, StepKind::Scripts, StepKind::Styles]
        );
    }
}
