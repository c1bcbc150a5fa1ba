//! Builder traits and the blocks they produce.

use std::collections::BTreeMap;
use std::sync::Arc;

use tessera_plaquette::{
    Plaquette, PlaquetteContext, PlaquetteResult, descriptions, plaquettes_for,
};
use tessera_templates::RectangularTemplate;

use crate::block::{CubeSpec, PipeSpec};
use crate::error::CompileResult;

/// Plaquettes of one round, keyed by template class.
///
/// Classes without an entry hold the empty plaquette.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundPlaquettes {
    by_class: BTreeMap<usize, Plaquette>,
}

impl RoundPlaquettes {
    pub fn new() -> Self {
        Self::default()
    }

    /// One plaquette for every class `1..=count`.
    pub fn for_classes(count: usize, context: &PlaquetteContext) -> PlaquetteResult<Self> {
        let by_class = (1..=count).zip(plaquettes_for(count, context)?).collect();
        Ok(Self { by_class })
    }

    /// The plaquettes of the classes `context` describes, and no others.
    pub fn described(context: &PlaquetteContext) -> PlaquetteResult<Self> {
        let by_class = descriptions(context)?
            .into_iter()
            .map(|(class, rpng)| Ok((class, Plaquette::from_rpng(&rpng, context.timing())?)))
            .collect::<PlaquetteResult<_>>()?;
        Ok(Self { by_class })
    }

    pub fn insert(&mut self, class: usize, plaquette: Plaquette) {
        self.by_class.insert(class, plaquette);
    }

    pub fn get(&self, class: usize) -> Option<&Plaquette> {
        self.by_class.get(&class)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Plaquette)> {
        self.by_class.iter().map(|(class, p)| (*class, p))
    }

    pub fn len(&self) -> usize {
        self.by_class.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_class.is_empty()
    }

    pub fn has_extended(&self) -> bool {
        self.by_class.values().any(Plaquette::is_extended)
    }

    /// Replace the plaquettes of every class present in `other`.
    pub fn overwrite(&mut self, other: &RoundPlaquettes) {
        for (class, plaquette) in other.iter() {
            self.by_class.insert(class, plaquette.clone());
        }
    }

    /// Keep the classes found in `mapping` and renumber them.
    #[must_use]
    pub fn remapped(&self, mapping: &BTreeMap<usize, usize>) -> Self {
        let by_class = self
            .by_class
            .iter()
            .filter_map(|(class, p)| mapping.get(class).map(|to| (*to, p.clone())))
            .collect();
        Self { by_class }
    }

    /// Every plaquette stretched to `length` moments.
    pub fn padded(&self, length: usize) -> PlaquetteResult<Self> {
        let by_class = self
            .by_class
            .iter()
            .map(|(class, p)| Ok((*class, p.padded(length)?)))
            .collect::<PlaquetteResult<_>>()?;
        Ok(Self { by_class })
    }
}

/// A cube's template and its plaquettes round by round.
#[derive(Debug, Clone)]
pub struct CompiledBlock {
    pub template: Arc<dyn RectangularTemplate>,
    pub rounds: Vec<RoundPlaquettes>,
}

impl CompiledBlock {
    pub fn new(template: Arc<dyn RectangularTemplate>, rounds: Vec<RoundPlaquettes>) -> Self {
        Self { template, rounds }
    }

    pub fn num_rounds(&self) -> usize {
        self.rounds.len()
    }

    pub fn has_extended(&self) -> bool {
        self.rounds.iter().any(RoundPlaquettes::has_extended)
    }

    /// Apply per-round overrides. Rounds out of range are ignored.
    pub fn substitute(&mut self, overrides: &BTreeMap<usize, RoundPlaquettes>) {
        for (round, plaquettes) in overrides {
            if let Some(target) = self.rounds.get_mut(*round) {
                target.overwrite(plaquettes);
            }
        }
    }
}

/// Per-round plaquette overrides a pipe applies to its endpoint cubes,
/// in the cubes' own class numbering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    /// Overrides of the head cube, by round.
    pub head: BTreeMap<usize, RoundPlaquettes>,
    /// Overrides of the tail cube, by round.
    pub tail: BTreeMap<usize, RoundPlaquettes>,
}

impl Substitution {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.head.values().all(RoundPlaquettes::is_empty)
            && self.tail.values().all(RoundPlaquettes::is_empty)
    }

    /// Number of rounds the substitution reaches into.
    pub fn num_rounds(&self) -> usize {
        let last = |rounds: &BTreeMap<usize, RoundPlaquettes>| rounds.keys().next_back().map(|r| r + 1);
        last(&self.head).max(last(&self.tail)).unwrap_or(0)
    }
}

/// Compiles one category of cube.
///
/// Builders are shared across the rayon pool and must be pure.
pub trait CubeBuilder: Send + Sync {
    /// Get the name of this builder.
    fn name(&self) -> &str;

    /// Template and `rounds` rounds of plaquettes for the cube.
    fn build(&self, spec: &CubeSpec, rounds: usize) -> CompileResult<CompiledBlock>;
}

/// Compiles one category of pipe into overrides of its endpoint cubes.
pub trait PipeBuilder: Send + Sync {
    /// Get the name of this builder.
    fn name(&self) -> &str;

    /// Overrides for the endpoints, given their compiled blocks before
    /// any substitution.
    fn build(
        &self,
        spec: &PipeSpec,
        head: &CompiledBlock,
        tail: &CompiledBlock,
    ) -> CompileResult<Substitution>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_ir::Basis;
    use tessera_plaquette::PlaquetteFamily;
    use tessera_templates::QubitTemplate;

    fn memory() -> PlaquetteContext {
        PlaquetteContext::new(PlaquetteFamily::Memory {
            x: Basis::Z,
            y: Basis::X,
            even: Basis::X,
        })
    }

    #[test]
    fn test_for_classes_covers_every_class() {
        let round = RoundPlaquettes::for_classes(14, &memory()).unwrap();
        assert_eq!(round.len(), 14);
        assert!(!round.has_extended());
        assert!(round.get(15).is_none());
    }

    #[test]
    fn test_described_is_subset() {
        let all = RoundPlaquettes::for_classes(14, &memory()).unwrap();
        let described = RoundPlaquettes::described(&memory()).unwrap();
        assert!(described.len() <= all.len());
        for (class, plaquette) in described.iter() {
            assert_eq!(all.get(class), Some(plaquette));
        }
    }

    #[test]
    fn test_remap_and_overwrite() {
        let described = RoundPlaquettes::described(&memory()).unwrap();
        let (class, plaquette) = described.iter().next().unwrap();
        let mapping = BTreeMap::from([(class, 100)]);
        let moved = described.remapped(&mapping);
        assert_eq!(moved.len(), 1);
        assert_eq!(moved.get(100), Some(plaquette));

        let mut target = RoundPlaquettes::new();
        target.overwrite(&moved);
        assert_eq!(target.get(100), Some(plaquette));
    }

    #[test]
    fn test_substitute_ignores_missing_rounds() {
        let round = RoundPlaquettes::for_classes(14, &memory()).unwrap();
        let mut block = CompiledBlock::new(Arc::new(QubitTemplate), vec![round.clone(); 2]);
        let mut override_round = RoundPlaquettes::new();
        override_round.insert(1, Plaquette::empty(tessera_plaquette::Timing::Extended));
        let overrides = BTreeMap::from([(1, override_round.clone()), (5, override_round)]);
        block.substitute(&overrides);
        assert_eq!(block.rounds[0], round);
        assert!(block.rounds[1].get(1).unwrap().is_empty());
        assert!(block.has_extended());
    }

    #[test]
    fn test_substitution_rounds() {
        assert_eq!(Substitution::empty().num_rounds(), 0);
        assert!(Substitution::empty().is_empty());
        let mut sub = Substitution::empty();
        sub.tail.insert(2, RoundPlaquettes::described(&memory()).unwrap());
        assert_eq!(sub.num_rounds(), 3);
        assert!(!sub.is_empty());
    }
}
