//! Registry mapping block categories to builders.

use std::collections::BTreeMap;
use std::fmt;

use tessera_ir::Position3D;

use crate::block::BlockCategory;
use crate::builder::{CubeBuilder, PipeBuilder};
use crate::builders::{
    HalfCubeBuilder, MemoryCubeBuilder, SpatialHadamardPipeBuilder, SpatialJunctionBuilder, SpatialPipeBuilder,
    TemporalHadamardPipeBuilder, TemporalPipeBuilder,
};
use crate::error::{CompileError, CompileResult};

/// The builders used to compile each category of block.
///
/// A category without an entry is unsupported: compiling a graph that
/// contains such a block fails with [`CompileError::UnsupportedKind`].
pub struct BuilderRegistry {
    cubes: BTreeMap<BlockCategory, Box<dyn CubeBuilder>>,
    pipes: BTreeMap<BlockCategory, Box<dyn PipeBuilder>>,
}

impl BuilderRegistry {
    /// A registry without any builder.
    pub fn empty() -> Self {
        Self {
            cubes: BTreeMap::new(),
            pipes: BTreeMap::new(),
        }
    }

    /// Builders for memory cubes, spatial junctions, Y half cubes and
    /// every pipe category. Ports have no entry.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register_cube(BlockCategory::MemoryCube, MemoryCubeBuilder);
        registry.register_cube(BlockCategory::SpatialJunction, SpatialJunctionBuilder);
        registry.register_cube(BlockCategory::HalfCube, HalfCubeBuilder);
        registry.register_pipe(BlockCategory::TemporalPipe, TemporalPipeBuilder);
        registry.register_pipe(BlockCategory::TemporalHadamardPipe, TemporalHadamardPipeBuilder);
        registry.register_pipe(BlockCategory::SpatialPipe, SpatialPipeBuilder);
        registry.register_pipe(BlockCategory::SpatialHadamardPipe, SpatialHadamardPipeBuilder);
        registry
    }

    /// Register a cube builder, replacing any previous one.
    pub fn register_cube(&mut self, category: BlockCategory, builder: impl CubeBuilder + 'static) {
        self.cubes.insert(category, Box::new(builder));
    }

    /// Register a pipe builder, replacing any previous one.
    pub fn register_pipe(&mut self, category: BlockCategory, builder: impl PipeBuilder + 'static) {
        self.pipes.insert(category, Box::new(builder));
    }

    #[must_use]
    pub fn with_cube(mut self, category: BlockCategory, builder: impl CubeBuilder + 'static) -> Self {
        self.register_cube(category, builder);
        self
    }

    #[must_use]
    pub fn with_pipe(mut self, category: BlockCategory, builder: impl PipeBuilder + 'static) -> Self {
        self.register_pipe(category, builder);
        self
    }

    /// Remove the builder of `category`.
    pub fn unregister(&mut self, category: BlockCategory) {
        self.cubes.remove(&category);
        self.pipes.remove(&category);
    }

    /// The cube builder for a block at `position`.
    pub fn cube_builder(
        &self,
        category: BlockCategory,
        position: Position3D,
    ) -> CompileResult<&dyn CubeBuilder> {
        self.cubes
            .get(&category)
            .map(Box::as_ref)
            .ok_or(CompileError::UnsupportedKind { category, position })
    }

    /// The pipe builder for a pipe whose head is at `position`.
    pub fn pipe_builder(
        &self,
        category: BlockCategory,
        position: Position3D,
    ) -> CompileResult<&dyn PipeBuilder> {
        self.pipes
            .get(&category)
            .map(Box::as_ref)
            .ok_or(CompileError::UnsupportedKind { category, position })
    }

    pub fn supports(&self, category: BlockCategory) -> bool {
        self.cubes.contains_key(&category) || self.pipes.contains_key(&category)
    }

    /// Categories with a builder.
    pub fn categories(&self) -> impl Iterator<Item = BlockCategory> + '_ {
        BlockCategory::ALL.into_iter().filter(|c| self.supports(*c))
    }

    /// Get the number of registered builders.
    pub fn len(&self) -> usize {
        self.cubes.len() + self.pipes.len()
    }

    /// Check if the registry has no builder.
    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty() && self.pipes.is_empty()
    }
}

impl Default for BuilderRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for BuilderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |builders: Vec<(&BlockCategory, &str)>| {
            builders
                .into_iter()
                .map(|(category, name)| format!("{category}: {name}"))
                .collect::<Vec<_>>()
        };
        f.debug_struct("BuilderRegistry")
            .field(
                "cubes",
                &names(self.cubes.iter().map(|(c, b)| (c, b.name())).collect()),
            )
            .field(
                "pipes",
                &names(self.pipes.iter().map(|(c, b)| (c, b.name())).collect()),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::CubeSpec;
    use crate::builder::CompiledBlock;

    struct FailingBuilder;

    impl CubeBuilder for FailingBuilder {
        fn name(&self) -> &'static str {
            "Failing"
        }

        fn build(&self, spec: &CubeSpec, _rounds: usize) -> CompileResult<CompiledBlock> {
            Err(CompileError::UnsupportedKind {
                category: spec.category(),
                position: spec.position,
            })
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = BuilderRegistry::empty();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(matches!(
            registry.cube_builder(BlockCategory::MemoryCube, Position3D::new(0, 0, 0)),
            Err(CompileError::UnsupportedKind {
                category: BlockCategory::MemoryCube,
                ..
            })
        ));
    }

    #[test]
    fn test_standard_registry() {
        let registry = BuilderRegistry::standard();
        assert_eq!(registry.len(), 7);
        assert!(registry.supports(BlockCategory::HalfCube));
        assert!(!registry.supports(BlockCategory::Port));
        assert_eq!(registry.categories().count(), 7);

        let position = Position3D::new(1, 2, 3);
        let builder = registry
            .pipe_builder(BlockCategory::TemporalHadamardPipe, position)
            .unwrap();
        assert_eq!(builder.name(), "TemporalHadamardPipe");
        assert_eq!(
            registry
                .cube_builder(BlockCategory::HalfCube, position)
                .unwrap()
                .name(),
            "HalfCube"
        );
        assert!(matches!(
            registry.cube_builder(BlockCategory::Port, position),
            Err(CompileError::UnsupportedKind { position: p, .. }) if p == position
        ));
    }

    #[test]
    fn test_replace_and_unregister() {
        let mut registry =
            BuilderRegistry::standard().with_cube(BlockCategory::MemoryCube, FailingBuilder);
        let origin = Position3D::new(0, 0, 0);
        assert_eq!(
            registry
                .cube_builder(BlockCategory::MemoryCube, origin)
                .unwrap()
                .name(),
            "Failing"
        );
        registry.unregister(BlockCategory::SpatialPipe);
        assert!(!registry.supports(BlockCategory::SpatialPipe));
        assert_eq!(registry.len(), 6);
        assert!(format!("{registry:?}").contains("memory cube: Failing"));
    }
}
