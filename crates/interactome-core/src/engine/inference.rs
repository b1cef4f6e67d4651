use super::config::ExportConfig;
use super::dedup::Deduplicator;
use super::extractor::participants_of;
use super::filter::{SimpleEntityFilter, TrivialClassifier};
use crate::core::graph::EntityGraph;
use crate::core::models::entity::{ContainerKind, Entity, StId};
use crate::core::models::interaction::{Interaction, InteractionType, Participant, Provenance};
use crate::core::models::participants::{ParticipantSet, Role};
use itertools::Itertools;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Counters accumulated over one export run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Containers expanded (each counted once per root traversal).
    pub containers: u64,
    /// Role-groups discarded because their post-filter size exceeded the cap.
    pub oversized_groups: u64,
    /// Containment cycles defensively skipped.
    pub cycles: u64,
    /// Children or roots the entity store could not resolve.
    pub unresolved: u64,
}

/// One admitted participant of a role-group: the resolved entity and its
/// stoichiometry under that role.
struct Admitted<'e> {
    entity: &'e Entity,
    stoichiometry: u32,
}

const WITHIN_GROUP_RULES: [(Role, InteractionType); 4] = [
    (Role::Component, InteractionType::CoComplex),
    (Role::Member, InteractionType::CoMember),
    (Role::RepeatedUnit, InteractionType::CoPolymer),
    (Role::Input, InteractionType::CoInput),
];

/// Turns containers into candidate interaction pairs.
///
/// Holds the graph handle, the admission policies and the run counters; the
/// stream drives it one root at a time. Expansion is depth-first with an
/// explicit per-root in-path set guarding against cyclic containment, and a
/// child the store cannot resolve is skipped with a warning while its
/// siblings continue.
pub struct InferenceEngine<'a, G: EntityGraph> {
    graph: &'a G,
    filter: SimpleEntityFilter<'a>,
    max_unit_size: usize,
    stats: TraversalStats,
}

impl<'a, G: EntityGraph> InferenceEngine<'a, G> {
    pub fn new(
        graph: &'a G,
        config: &ExportConfig,
        classifier: &'a dyn TrivialClassifier,
    ) -> Self {
        Self {
            graph,
            filter: SimpleEntityFilter::new(config.simple_entity_policy, classifier),
            max_unit_size: config.max_unit_size,
            stats: TraversalStats::default(),
        }
    }

    pub fn stats(&self) -> TraversalStats {
        self.stats
    }

    /// Expands one traversal root depth-first, appending every first-seen
    /// interaction to `out`.
    pub fn expand_root(
        &mut self,
        root: &StId,
        dedup: &mut Deduplicator,
        out: &mut Vec<Interaction>,
    ) {
        let entity = match self.graph.entity(root) {
            Ok(entity) => entity,
            Err(error) => {
                warn!(root = %root, %error, "Skipping unresolvable traversal root");
                self.stats.unresolved += 1;
                return;
            }
        };
        if !entity.is_container() {
            debug!(root = %root, "Root is not a container, nothing to expand");
            return;
        }
        let mut in_path = HashSet::new();
        self.expand(&entity, &mut in_path, dedup, out);
    }

    fn expand(
        &mut self,
        container: &Entity,
        in_path: &mut HashSet<StId>,
        dedup: &mut Deduplicator,
        out: &mut Vec<Interaction>,
    ) {
        if !in_path.insert(container.st_id.clone()) {
            debug!(container = %container.st_id, "Cyclic containment, skipping re-entry");
            self.stats.cycles += 1;
            return;
        }
        self.stats.containers += 1;

        let parts = participants_of(container);
        let children = self.resolve_children(container);
        self.emit_pairs(container, &parts, &children, dedup, out);

        for child in children.values() {
            if child.is_container() {
                self.expand(child, in_path, dedup, out);
            }
        }

        in_path.remove(&container.st_id);
    }

    fn resolve_children(&mut self, container: &Entity) -> BTreeMap<StId, Entity> {
        let mut children = BTreeMap::new();
        for id in container.child_ids() {
            if children.contains_key(id) {
                continue;
            }
            match self.graph.entity(id) {
                Ok(entity) => {
                    children.insert(id.clone(), entity);
                }
                Err(error) => {
                    warn!(
                        container = %container.st_id,
                        child = %id,
                        %error,
                        "Skipping unresolvable child"
                    );
                    self.stats.unresolved += 1;
                }
            }
        }
        children
    }

    fn emit_pairs<'e>(
        &mut self,
        container: &Entity,
        parts: &ParticipantSet,
        children: &'e BTreeMap<StId, Entity>,
        dedup: &mut Deduplicator,
        out: &mut Vec<Interaction>,
    ) {
        let Some(kind) = container.container_kind() else {
            return;
        };

        let mut admitted_inputs: Option<Vec<Admitted<'e>>> = None;
        for (role, interaction_type) in WITHIN_GROUP_RULES {
            let Some(group) = self.admitted_group(container, parts, role, children) else {
                continue;
            };
            if group.len() >= 2 {
                for (a, b) in group.iter().tuple_combinations() {
                    self.push(container, kind, interaction_type, a, b, dedup, out);
                }
            }
            if role == Role::Input {
                admitted_inputs = Some(group);
            }
        }

        self.emit_catalyst_pairs(container, parts, children, admitted_inputs, dedup, out);
    }

    /// Catalyst-substrate pairs: every (catalyst entity, input entity)
    /// combination, with each activity's active units standing in for the
    /// whole catalyst when the activity specifies any.
    fn emit_catalyst_pairs<'e>(
        &mut self,
        container: &Entity,
        parts: &ParticipantSet,
        children: &'e BTreeMap<StId, Entity>,
        admitted_inputs: Option<Vec<Admitted<'e>>>,
        dedup: &mut Deduplicator,
        out: &mut Vec<Interaction>,
    ) {
        if parts.catalysts().is_empty() {
            return;
        }
        let Some(inputs) = admitted_inputs else {
            return;
        };
        if inputs.is_empty() {
            return;
        }

        let catalyst_pool = self.admitted_pool(container, parts, Role::Catalyst, children);
        let unit_pool = self.admitted_pool(container, parts, Role::ActiveUnit, children);
        let kind = ContainerKind::Reaction;

        for activity in parts.catalysts() {
            let effective: Vec<&Admitted<'_>> = if activity.active_units.is_empty() {
                catalyst_pool
                    .get(&activity.physical_entity)
                    .into_iter()
                    .collect()
            } else {
                activity
                    .active_units
                    .iter()
                    .filter_map(|unit| unit_pool.get(unit))
                    .collect()
            };

            for catalyst in effective {
                for input in &inputs {
                    self.push(
                        container,
                        kind,
                        InteractionType::CatalystSubstrate,
                        catalyst,
                        input,
                        dedup,
                        out,
                    );
                }
            }
        }
    }

    /// The admitted participants of one role-group, or `None` when the role
    /// is absent or the post-filter group exceeds the size cap (skipped
    /// whole, never sampled).
    fn admitted_group<'e>(
        &mut self,
        container: &Entity,
        parts: &ParticipantSet,
        role: Role,
        children: &'e BTreeMap<StId, Entity>,
    ) -> Option<Vec<Admitted<'e>>> {
        let group = parts.group(role)?;
        let admitted: Vec<Admitted<'e>> = group
            .iter()
            .filter_map(|(id, &stoichiometry)| {
                let entity = children.get(id)?;
                self.filter.admits(entity).then_some(Admitted {
                    entity,
                    stoichiometry,
                })
            })
            .collect();

        if admitted.len() > self.max_unit_size {
            warn!(
                container = %container.st_id,
                role = %role,
                size = admitted.len(),
                cap = self.max_unit_size,
                "Role-group exceeds maxUnitSize, skipping its pair generation"
            );
            self.stats.oversized_groups += 1;
            return None;
        }
        Some(admitted)
    }

    fn admitted_pool<'e>(
        &mut self,
        container: &Entity,
        parts: &ParticipantSet,
        role: Role,
        children: &'e BTreeMap<StId, Entity>,
    ) -> BTreeMap<StId, Admitted<'e>> {
        self.admitted_group(container, parts, role, children)
            .map(|admitted| {
                admitted
                    .into_iter()
                    .map(|participant| (participant.entity.st_id.clone(), participant))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn push(
        &mut self,
        container: &Entity,
        kind: ContainerKind,
        interaction_type: InteractionType,
        a: &Admitted<'_>,
        b: &Admitted<'_>,
        dedup: &mut Deduplicator,
        out: &mut Vec<Interaction>,
    ) {
        let participant = |admitted: &Admitted<'_>| Participant {
            id: admitted.entity.st_id.clone(),
            name: admitted.entity.name.clone(),
            class: admitted.entity.kind.label(),
            stoichiometry: admitted.stoichiometry,
        };

        if let Some(interaction) = Interaction::between(
            participant(a),
            participant(b),
            Provenance {
                container: container.st_id.clone(),
                container_kind: kind,
                interaction_type,
            },
        ) && dedup.insert(&interaction)
        {
            out.push(interaction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::memory::MemoryGraph;
    use crate::engine::config::{ExportConfigBuilder, Selection, SimpleEntityPolicy};
    use crate::engine::filter::ReferenceTrivialSet;

    fn config(policy: SimpleEntityPolicy, max_unit_size: usize) -> ExportConfig {
        ExportConfigBuilder::new()
            .selection(Selection::Objects(vec!["unused".to_string()]))
            .simple_entity_policy(policy)
            .max_unit_size(max_unit_size)
            .build()
            .unwrap()
    }

    fn expand(graph: &MemoryGraph, config: &ExportConfig, root: &str) -> Vec<Interaction> {
        let classifier = ReferenceTrivialSet;
        let mut engine = InferenceEngine::new(graph, config, &classifier);
        let mut dedup = Deduplicator::new();
        let mut out = Vec::new();
        engine.expand_root(&root.into(), &mut dedup, &mut out);
        out
    }

    fn pair_keys(interactions: &[Interaction]) -> Vec<(String, String)> {
        let mut keys: Vec<(String, String)> = interactions
            .iter()
            .map(|i| (i.a.id.to_string(), i.b.id.to_string()))
            .collect();
        keys.sort();
        keys
    }

    fn three_protein_complex() -> MemoryGraph {
        let mut graph = MemoryGraph::new();
        graph.add_sequence("R-HSA-1", "A", None);
        graph.add_sequence("R-HSA-2", "B", None);
        graph.add_sequence("R-HSA-3", "C", None);
        graph.add_complex("R-HSA-100", "trimer", &["R-HSA-1", "R-HSA-2", "R-HSA-3"]);
        graph
    }

    #[test]
    fn complex_components_yield_all_pairs() {
        let graph = three_protein_complex();
        let out = expand(&graph, &config(SimpleEntityPolicy::NonTrivial, 4), "R-HSA-100");

        assert_eq!(
            pair_keys(&out),
            vec![
                ("R-HSA-1".to_string(), "R-HSA-2".to_string()),
                ("R-HSA-1".to_string(), "R-HSA-3".to_string()),
                ("R-HSA-2".to_string(), "R-HSA-3".to_string()),
            ]
        );
        assert!(
            out.iter()
                .all(|i| i.provenance.interaction_type == InteractionType::CoComplex)
        );
    }

    #[test]
    fn multiplicity_affects_stoichiometry_but_never_pair_count() {
        let mut graph = MemoryGraph::new();
        graph.add_sequence("R-HSA-1", "A", None);
        graph.add_sequence("R-HSA-2", "B", None);
        graph.add_complex("R-HSA-100", "dimer of dimers", &["R-HSA-1", "R-HSA-1", "R-HSA-2"]);

        let out = expand(&graph, &config(SimpleEntityPolicy::NonTrivial, 4), "R-HSA-100");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].a.stoichiometry, 2);
        assert_eq!(out[0].b.stoichiometry, 1);
    }

    #[test]
    fn reaction_yields_co_input_and_catalyst_substrate_pairs() {
        let mut graph = MemoryGraph::new();
        graph.add_sequence("R-HSA-11", "X", None);
        graph.add_sequence("R-HSA-12", "Y", None);
        graph.add_sequence("R-HSA-13", "Z", None);
        graph.add_reaction(
            "R-HSA-10",
            "catalyzed reaction",
            &["R-HSA-11", "R-HSA-12"],
            &[("R-HSA-13", &[])],
        );

        let out = expand(&graph, &config(SimpleEntityPolicy::NonTrivial, 4), "R-HSA-10");
        assert_eq!(
            pair_keys(&out),
            vec![
                ("R-HSA-11".to_string(), "R-HSA-12".to_string()),
                ("R-HSA-11".to_string(), "R-HSA-13".to_string()),
                ("R-HSA-12".to_string(), "R-HSA-13".to_string()),
            ]
        );

        let substrate_pairs = out
            .iter()
            .filter(|i| i.provenance.interaction_type == InteractionType::CatalystSubstrate)
            .count();
        assert_eq!(substrate_pairs, 2);
    }

    #[test]
    fn active_units_replace_the_whole_catalyst() {
        let mut graph = MemoryGraph::new();
        graph.add_sequence("R-HSA-11", "substrate", None);
        graph.add_sequence("R-HSA-14", "kinase domain", None);
        graph.add_complex("R-HSA-13", "holoenzyme", &["R-HSA-14"]);
        graph.add_reaction(
            "R-HSA-10",
            "phosphorylation",
            &["R-HSA-11"],
            &[("R-HSA-13", &["R-HSA-14"])],
        );

        let out = expand(&graph, &config(SimpleEntityPolicy::NonTrivial, 4), "R-HSA-10");
        assert_eq!(out.len(), 1);
        assert_eq!(
            out[0].provenance.interaction_type,
            InteractionType::CatalystSubstrate
        );
        let key = (out[0].a.id.to_string(), out[0].b.id.to_string());
        assert_eq!(key, ("R-HSA-11".to_string(), "R-HSA-14".to_string()));
    }

    #[test]
    fn oversized_groups_are_skipped_whole() {
        let mut graph = MemoryGraph::new();
        for i in 1..=5 {
            graph.add_sequence(&format!("R-HSA-{i}"), "protein", None);
        }
        graph.add_complex(
            "R-HSA-100",
            "pentamer",
            &["R-HSA-1", "R-HSA-2", "R-HSA-3", "R-HSA-4", "R-HSA-5"],
        );

        let cfg = config(SimpleEntityPolicy::NonTrivial, 4);
        let classifier = ReferenceTrivialSet;
        let mut engine = InferenceEngine::new(&graph, &cfg, &classifier);
        let mut dedup = Deduplicator::new();
        let mut out = Vec::new();
        engine.expand_root(&"R-HSA-100".into(), &mut dedup, &mut out);

        assert!(out.is_empty());
        assert_eq!(engine.stats().oversized_groups, 1);
    }

    #[test]
    fn group_at_exactly_the_cap_yields_full_combinatorics() {
        let mut graph = MemoryGraph::new();
        for i in 1..=4 {
            graph.add_sequence(&format!("R-HSA-{i}"), "protein", None);
        }
        graph.add_complex(
            "R-HSA-100",
            "tetramer",
            &["R-HSA-1", "R-HSA-2", "R-HSA-3", "R-HSA-4"],
        );

        let out = expand(&graph, &config(SimpleEntityPolicy::NonTrivial, 4), "R-HSA-100");
        assert_eq!(out.len(), 6);
    }

    #[test]
    fn trivial_entities_are_filtered_before_the_cap_is_evaluated() {
        let mut graph = MemoryGraph::new();
        for i in 1..=4 {
            graph.add_sequence(&format!("R-HSA-{i}"), "protein", None);
        }
        graph.add_simple("R-ALL-90", "H2O", Some("ChEBI:15377"));
        graph.add_simple("R-ALL-91", "H+", Some("ChEBI:15378"));
        graph.add_complex(
            "R-HSA-100",
            "tetramer with solvent",
            &["R-HSA-1", "R-HSA-2", "R-HSA-3", "R-HSA-4", "R-ALL-90", "R-ALL-91"],
        );

        let out = expand(&graph, &config(SimpleEntityPolicy::NonTrivial, 4), "R-HSA-100");
        assert_eq!(out.len(), 6);
    }

    #[test]
    fn policy_controls_simple_entity_admission() {
        let mut graph = MemoryGraph::new();
        graph.add_sequence("R-HSA-1", "A", None);
        graph.add_sequence("R-HSA-2", "B", None);
        graph.add_simple("R-ALL-90", "H2O", Some("ChEBI:15377"));
        graph.add_complex("R-HSA-100", "solvated dimer", &["R-HSA-1", "R-HSA-2", "R-ALL-90"]);

        let non_trivial = expand(&graph, &config(SimpleEntityPolicy::NonTrivial, 4), "R-HSA-100");
        assert_eq!(non_trivial.len(), 1);

        let all = expand(&graph, &config(SimpleEntityPolicy::All, 4), "R-HSA-100");
        assert_eq!(all.len(), 3);

        let none = expand(&graph, &config(SimpleEntityPolicy::None, 4), "R-HSA-100");
        assert_eq!(none.len(), 1);
    }

    #[test]
    fn nested_containers_stay_opaque_and_expand_on_their_own() {
        let mut graph = MemoryGraph::new();
        graph.add_sequence("R-HSA-1", "A", None);
        graph.add_sequence("R-HSA-2", "B", None);
        graph.add_sequence("R-HSA-3", "C", None);
        graph.add_complex("R-HSA-200", "inner", &["R-HSA-2", "R-HSA-3"]);
        graph.add_complex("R-HSA-100", "outer", &["R-HSA-1", "R-HSA-200"]);

        let out = expand(&graph, &config(SimpleEntityPolicy::NonTrivial, 4), "R-HSA-100");
        assert_eq!(
            pair_keys(&out),
            vec![
                ("R-HSA-1".to_string(), "R-HSA-200".to_string()),
                ("R-HSA-2".to_string(), "R-HSA-3".to_string()),
            ]
        );
    }

    #[test]
    fn oversized_parents_still_recurse_into_children() {
        let mut graph = MemoryGraph::new();
        for i in 1..=4 {
            graph.add_sequence(&format!("R-HSA-{i}"), "protein", None);
        }
        graph.add_sequence("R-HSA-5", "D", None);
        graph.add_sequence("R-HSA-6", "E", None);
        graph.add_complex("R-HSA-200", "inner", &["R-HSA-5", "R-HSA-6"]);
        graph.add_complex(
            "R-HSA-100",
            "oversized outer",
            &["R-HSA-1", "R-HSA-2", "R-HSA-3", "R-HSA-4", "R-HSA-200"],
        );

        let out = expand(&graph, &config(SimpleEntityPolicy::NonTrivial, 4), "R-HSA-100");
        assert_eq!(
            pair_keys(&out),
            vec![("R-HSA-5".to_string(), "R-HSA-6".to_string())]
        );
    }

    #[test]
    fn cyclic_containment_terminates() {
        let mut graph = MemoryGraph::new();
        graph.add_sequence("R-HSA-1", "A", None);
        graph.add_complex("R-HSA-100", "outer", &["R-HSA-1", "R-HSA-200"]);
        graph.add_complex("R-HSA-200", "inner", &["R-HSA-1", "R-HSA-100"]);

        let cfg = config(SimpleEntityPolicy::NonTrivial, 4);
        let classifier = ReferenceTrivialSet;
        let mut engine = InferenceEngine::new(&graph, &cfg, &classifier);
        let mut dedup = Deduplicator::new();
        let mut out = Vec::new();
        engine.expand_root(&"R-HSA-100".into(), &mut dedup, &mut out);

        assert_eq!(engine.stats().cycles, 1);
        assert_eq!(
            pair_keys(&out),
            vec![
                ("R-HSA-1".to_string(), "R-HSA-100".to_string()),
                ("R-HSA-1".to_string(), "R-HSA-200".to_string()),
            ]
        );
    }

    #[test]
    fn unresolvable_children_are_skipped_locally() {
        let mut graph = MemoryGraph::new();
        graph.add_sequence("R-HSA-1", "A", None);
        graph.add_sequence("R-HSA-2", "B", None);
        graph.add_complex("R-HSA-100", "partial", &["R-HSA-1", "R-HSA-2", "R-HSA-404"]);

        let cfg = config(SimpleEntityPolicy::NonTrivial, 4);
        let classifier = ReferenceTrivialSet;
        let mut engine = InferenceEngine::new(&graph, &cfg, &classifier);
        let mut dedup = Deduplicator::new();
        let mut out = Vec::new();
        engine.expand_root(&"R-HSA-100".into(), &mut dedup, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(engine.stats().unresolved, 1);
    }

    #[test]
    fn duplicate_pairs_across_containers_collapse() {
        let mut graph = MemoryGraph::new();
        graph.add_sequence("R-HSA-1", "A", None);
        graph.add_sequence("R-HSA-2", "B", None);
        graph.add_complex("R-HSA-100", "first", &["R-HSA-1", "R-HSA-2"]);
        graph.add_complex("R-HSA-200", "second", &["R-HSA-1", "R-HSA-2"]);

        let cfg = config(SimpleEntityPolicy::NonTrivial, 4);
        let classifier = ReferenceTrivialSet;
        let mut engine = InferenceEngine::new(&graph, &cfg, &classifier);
        let mut dedup = Deduplicator::new();
        let mut out = Vec::new();
        engine.expand_root(&"R-HSA-100".into(), &mut dedup, &mut out);
        engine.expand_root(&"R-HSA-200".into(), &mut dedup, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].provenance.container.as_str(), "R-HSA-100");
    }

    #[test]
    fn entity_sets_and_polymers_pair_their_members() {
        let mut graph = MemoryGraph::new();
        graph.add_sequence("R-HSA-1", "A", None);
        graph.add_sequence("R-HSA-2", "B", None);
        graph.add_set("R-HSA-300", "paralogs", &["R-HSA-1", "R-HSA-2"]);
        graph.add_polymer("R-HSA-400", "fibril", &["R-HSA-1", "R-HSA-2"]);

        let members = expand(&graph, &config(SimpleEntityPolicy::NonTrivial, 4), "R-HSA-300");
        assert_eq!(members.len(), 1);
        assert_eq!(
            members[0].provenance.interaction_type,
            InteractionType::CoMember
        );

        let units = expand(&graph, &config(SimpleEntityPolicy::NonTrivial, 4), "R-HSA-400");
        assert_eq!(units.len(), 1);
        assert_eq!(
            units[0].provenance.interaction_type,
            InteractionType::CoPolymer
        );
    }
}
