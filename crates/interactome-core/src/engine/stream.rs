use super::config::ExportConfig;
use super::dedup::Deduplicator;
use super::filter::TrivialClassifier;
use super::inference::{InferenceEngine, TraversalStats};
use super::progress::{Progress, ProgressReporter};
use crate::core::graph::EntityGraph;
use crate::core::models::entity::StId;
use crate::core::models::interaction::Interaction;
use std::collections::VecDeque;

/// A lazy, pull-based sequence of unique inferred interactions over a root
/// set.
///
/// Laziness is per root: `next()` drains an internal buffer and expands the
/// next pending root (full depth-first expansion, deduplicated against the
/// run's seen-set) only when the buffer runs dry. The stream is single-pass
/// and not restartable — a fresh traversal must be initiated to
/// re-enumerate. Dropping the stream abandons the remaining roots without
/// side effects; containers are read-only. No delivery order is promised,
/// only uniqueness and completeness.
pub struct InteractionStream<'a, G: EntityGraph> {
    engine: InferenceEngine<'a, G>,
    dedup: Deduplicator,
    roots: VecDeque<StId>,
    buffer: VecDeque<Interaction>,
    reporter: &'a ProgressReporter<'a>,
}

impl<'a, G: EntityGraph> InteractionStream<'a, G> {
    pub fn over(
        graph: &'a G,
        config: &ExportConfig,
        classifier: &'a dyn TrivialClassifier,
        roots: Vec<StId>,
        reporter: &'a ProgressReporter<'a>,
    ) -> Self {
        Self {
            engine: InferenceEngine::new(graph, config, classifier),
            dedup: Deduplicator::new(),
            roots: roots.into(),
            buffer: VecDeque::new(),
            reporter,
        }
    }

    /// Counters accumulated so far; complete once the stream is exhausted.
    pub fn stats(&self) -> TraversalStats {
        self.engine.stats()
    }

    pub fn pending_roots(&self) -> usize {
        self.roots.len()
    }
}

impl<'a, G: EntityGraph> Iterator for InteractionStream<'a, G> {
    type Item = Interaction;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(interaction) = self.buffer.pop_front() {
                return Some(interaction);
            }
            let root = self.roots.pop_front()?;
            self.reporter.report(Progress::RootStart {
                id: root.to_string(),
            });
            let mut batch = Vec::new();
            self.engine.expand_root(&root, &mut self.dedup, &mut batch);
            self.reporter.report(Progress::RootFinish {
                interactions: batch.len() as u64,
            });
            self.buffer.extend(batch);
        }
    }
}
