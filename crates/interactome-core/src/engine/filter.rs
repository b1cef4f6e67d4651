use super::config::SimpleEntityPolicy;
use crate::core::models::entity::{Entity, EntityKind};
use phf::{Set, phf_set};

/// Reference accessions of molecules excluded under the NON_TRIVIAL policy:
/// water, protons, nucleotide cofactors, redox carriers, and common
/// inorganic ions.
static TRIVIAL_REFERENCES: Set<&'static str> = phf_set! {
    "ChEBI:15377",  // water
    "ChEBI:15378",  // hydron
    "ChEBI:16240",  // hydrogen peroxide
    "ChEBI:15379",  // dioxygen
    "ChEBI:16526",  // carbon dioxide
    "ChEBI:30616",  // ATP(4-)
    "ChEBI:15422",  // ATP
    "ChEBI:456216", // ADP(3-)
    "ChEBI:16761",  // ADP
    "ChEBI:456215", // AMP(2-)
    "ChEBI:16027",  // AMP
    "ChEBI:37565",  // GTP(4-)
    "ChEBI:15996",  // GTP
    "ChEBI:58189",  // GDP(3-)
    "ChEBI:17552",  // GDP
    "ChEBI:43474",  // hydrogenphosphate
    "ChEBI:18367",  // phosphate(3-)
    "ChEBI:33019",  // diphosphate(3-)
    "ChEBI:29888",  // diphosphate
    "ChEBI:57540",  // NAD(1-)
    "ChEBI:15846",  // NAD(+)
    "ChEBI:57945",  // NADH(2-)
    "ChEBI:16908",  // NADH
    "ChEBI:58349",  // NADP(3-)
    "ChEBI:18009",  // NADP(+)
    "ChEBI:57783",  // NADPH(4-)
    "ChEBI:16474",  // NADPH
    "ChEBI:57692",  // FAD(3-)
    "ChEBI:16238",  // FAD
    "ChEBI:17877",  // FADH2
    "ChEBI:57287",  // coenzyme A(4-)
    "ChEBI:15346",  // coenzyme A
    "ChEBI:17996",  // chloride
    "ChEBI:29101",  // sodium(1+)
    "ChEBI:29103",  // potassium(1+)
    "ChEBI:29108",  // calcium(2+)
    "ChEBI:18420",  // magnesium(2+)
    "ChEBI:29105",  // zinc(2+)
};

/// Display-name fallback for stores that do not expose reference accessions.
static TRIVIAL_NAMES: Set<&'static str> = phf_set! {
    "water", "h2o", "h+", "h2o2", "o2", "co2",
    "atp", "adp", "amp", "gtp", "gdp",
    "pi", "ppi", "phosphate", "diphosphate",
    "nad+", "nadh", "nadp+", "nadph", "fad", "fadh2",
    "coa", "coa-sh",
    "cl-", "na+", "k+", "ca2+", "mg2+", "zn2+",
};

/// Decides whether a simple entity is a trivial cofactor.
///
/// The reference set is a data concern: callers may substitute their own
/// classifier for the shipped one.
pub trait TrivialClassifier {
    fn is_trivial(&self, entity: &Entity) -> bool;
}

/// The default classifier, backed by the compile-time reference set above.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceTrivialSet;

impl TrivialClassifier for ReferenceTrivialSet {
    fn is_trivial(&self, entity: &Entity) -> bool {
        let EntityKind::SimpleEntity { reference } = &entity.kind else {
            return false;
        };
        if let Some(reference) = reference
            && TRIVIAL_REFERENCES.contains(reference.as_str())
        {
            return true;
        }
        TRIVIAL_NAMES.contains(entity.name.to_ascii_lowercase().as_str())
    }
}

/// Applies the run's [`SimpleEntityPolicy`] to one participant.
///
/// Only simple entities are subject to filtering; every other variant is
/// always admitted. Admission is decided before role-group sizes are
/// compared against the size cap.
pub struct SimpleEntityFilter<'a> {
    policy: SimpleEntityPolicy,
    classifier: &'a dyn TrivialClassifier,
}

impl<'a> SimpleEntityFilter<'a> {
    pub fn new(policy: SimpleEntityPolicy, classifier: &'a dyn TrivialClassifier) -> Self {
        Self { policy, classifier }
    }

    pub fn admits(&self, entity: &Entity) -> bool {
        if !entity.is_simple() {
            return true;
        }
        match self.policy {
            SimpleEntityPolicy::All => true,
            SimpleEntityPolicy::None => false,
            SimpleEntityPolicy::NonTrivial => !self.classifier.is_trivial(entity),
        }
    }
}
