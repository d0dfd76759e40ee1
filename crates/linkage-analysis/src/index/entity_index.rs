//! Entity → block inverted index.
//!
//! Built in a single pass over the block list. Every later stage enumerates
//! an entity's candidate neighbors through its own block memberships, so
//! the cost of a query is proportional to that entity's blocks rather than
//! to the block list.

use linkage_core::constants::DEFAULT_MAX_COMPARISONS;
use linkage_core::errors::BlockError;
use linkage_core::types::collections::SmallVec8;
use linkage_core::types::{total_comparisons, Block, BlockId, Dataset, EntityId, IdSpace};

use super::statistics::BlockStatistics;

/// Inverted index over a validated block list.
#[derive(Debug, Clone)]
pub struct EntityIndex {
    clean_clean: bool,
    id_space: IdSpace,
    /// Flat entity id → ascending block indices.
    entity_blocks: Vec<SmallVec8<BlockId>>,
    /// Flat entity id → comparisons it takes part in, `d(e)`.
    comparisons: Vec<u64>,
    /// Block index → entity memberships.
    block_sizes: Vec<usize>,
    stats: BlockStatistics,
}

impl EntityIndex {
    /// Index a block list, deriving the id space from the largest ids seen.
    pub fn build(blocks: &[Block], clean_clean: bool) -> Result<Self, BlockError> {
        Self::build_with_limit(blocks, clean_clean, DEFAULT_MAX_COMPARISONS)
    }

    /// Like [`EntityIndex::build`], failing with `TooManyComparisons` when the
    /// blocks induce more than `max_comparisons` comparisons.
    pub fn build_with_limit(
        blocks: &[Block],
        clean_clean: bool,
        max_comparisons: u64,
    ) -> Result<Self, BlockError> {
        validate_block_types(blocks, clean_clean)?;
        let id_space = derive_id_space(blocks, clean_clean);
        Self::index(blocks, clean_clean, id_space, max_comparisons)
    }

    /// Index a block list against a caller-supplied id space. Any id outside
    /// it is `EntityOutOfRange`.
    pub fn with_id_space(
        blocks: &[Block],
        clean_clean: bool,
        id_space: IdSpace,
        max_comparisons: u64,
    ) -> Result<Self, BlockError> {
        validate_block_types(blocks, clean_clean)?;
        Self::index(blocks, clean_clean, id_space, max_comparisons)
    }

    fn index(
        blocks: &[Block],
        clean_clean: bool,
        id_space: IdSpace,
        max_comparisons: u64,
    ) -> Result<Self, BlockError> {
        let total = total_comparisons(blocks)?;
        if total > max_comparisons {
            return Err(BlockError::TooManyComparisons {
                count: total,
                capacity: max_comparisons,
            });
        }
        if blocks.len() > u32::MAX as usize {
            return Err(BlockError::TooManyComparisons {
                count: blocks.len() as u64,
                capacity: u32::MAX as u64,
            });
        }

        let mut entity_blocks: Vec<SmallVec8<BlockId>> = vec![SmallVec8::new(); id_space.len()];
        let mut comparisons = vec![0u64; id_space.len()];
        let mut block_sizes = Vec::with_capacity(blocks.len());
        let mut assignments = 0usize;

        for (b, block) in blocks.iter().enumerate() {
            let b = BlockId(b as u32);
            block_sizes.push(block.size());
            assignments += block.size();
            match block {
                Block::Unilateral { entities } => {
                    let others = entities.len().saturating_sub(1) as u64;
                    for &id in entities {
                        let flat = flat_id(&id_space, Dataset::D1, id)?;
                        record(&mut entity_blocks[flat], &mut comparisons[flat], b, others);
                    }
                }
                Block::Bilateral { d1, d2 } => {
                    for &id in d1 {
                        let flat = flat_id(&id_space, Dataset::D1, id)?;
                        record(&mut entity_blocks[flat], &mut comparisons[flat], b, d2.len() as u64);
                    }
                    for &id in d2 {
                        let flat = flat_id(&id_space, Dataset::D2, id)?;
                        record(&mut entity_blocks[flat], &mut comparisons[flat], b, d1.len() as u64);
                    }
                }
            }
        }

        let stats = BlockStatistics {
            blocks: blocks.len(),
            entities: id_space.len(),
            assignments,
            comparisons: total,
            average_block_size: if blocks.is_empty() {
                0.0
            } else {
                assignments as f64 / blocks.len() as f64
            },
        };

        tracing::debug!(
            blocks = stats.blocks,
            entities = stats.entities,
            assignments = stats.assignments,
            comparisons = stats.comparisons,
            "entity index built"
        );

        Ok(Self {
            clean_clean,
            id_space,
            entity_blocks,
            comparisons,
            block_sizes,
            stats,
        })
    }

    pub fn is_clean_clean(&self) -> bool {
        self.clean_clean
    }

    pub fn id_space(&self) -> IdSpace {
        self.id_space
    }

    pub fn statistics(&self) -> &BlockStatistics {
        &self.stats
    }

    /// Number of flat entity ids.
    pub fn len(&self) -> usize {
        self.entity_blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entity_blocks.is_empty()
    }

    /// Ascending block indices of an entity.
    pub fn entity_blocks(&self, global: usize) -> &[BlockId] {
        self.entity_blocks
            .get(global)
            .map(|b| b.as_slice())
            .unwrap_or(&[])
    }

    /// Comparisons the entity takes part in, `d(e)`.
    pub fn comparisons_of(&self, global: usize) -> u64 {
        self.comparisons.get(global).copied().unwrap_or(0)
    }

    /// Number of blocks the entity belongs to, `|B(e)|`.
    pub fn block_count_of(&self, global: usize) -> usize {
        self.entity_blocks(global).len()
    }

    /// Entity memberships of a block.
    pub fn block_size(&self, block: BlockId) -> usize {
        self.block_sizes.get(block.index()).copied().unwrap_or(0)
    }

    /// Blocks shared by two entities, ascending.
    pub fn common_blocks(&self, a: usize, b: usize) -> SmallVec8<BlockId> {
        let (xs, ys) = (self.entity_blocks(a), self.entity_blocks(b));
        let mut out = SmallVec8::new();
        let (mut i, mut j) = (0, 0);
        while i < xs.len() && j < ys.len() {
            match xs[i].cmp(&ys[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    out.push(xs[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        out
    }

    /// Whether `block` is the lowest-indexed block both entities share.
    pub fn is_first_common_block(&self, a: usize, b: usize, block: BlockId) -> bool {
        let (xs, ys) = (self.entity_blocks(a), self.entity_blocks(b));
        let (mut i, mut j) = (0, 0);
        while i < xs.len() && j < ys.len() {
            match xs[i].cmp(&ys[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => return xs[i] == block,
            }
        }
        false
    }

    /// Flat id of a comparison endpoint.
    pub fn global(&self, dataset: Dataset, id: EntityId) -> Option<usize> {
        self.id_space.global(dataset, id)
    }
}

fn record(blocks: &mut SmallVec8<BlockId>, comparisons: &mut u64, block: BlockId, others: u64) {
    // Duplicate memberships inside one block count once.
    if blocks.last() != Some(&block) {
        blocks.push(block);
        *comparisons += others;
    }
}

fn flat_id(id_space: &IdSpace, dataset: Dataset, id: EntityId) -> Result<usize, BlockError> {
    id_space
        .global(dataset, id)
        .ok_or_else(|| BlockError::EntityOutOfRange {
            id: id.0,
            limit: match dataset {
                Dataset::D1 => id_space.dataset_limit(),
                Dataset::D2 => id_space.len() - id_space.dataset_limit(),
            },
        })
}

fn validate_block_types(blocks: &[Block], clean_clean: bool) -> Result<(), BlockError> {
    if blocks.is_empty() {
        return Err(BlockError::EmptyBlockList);
    }
    match blocks.iter().position(|b| b.is_bilateral() != clean_clean) {
        Some(index) => Err(BlockError::MixedBlockTypes { index, clean_clean }),
        None => Ok(()),
    }
}

fn derive_id_space(blocks: &[Block], clean_clean: bool) -> IdSpace {
    let bound = |ids: &[EntityId]| ids.iter().map(|id| id.index() + 1).max().unwrap_or(0);
    let (mut d1, mut d2) = (0usize, 0usize);
    for block in blocks {
        match block {
            Block::Unilateral { entities } => d1 = d1.max(bound(entities)),
            Block::Bilateral { d1: a, d2: b } => {
                d1 = d1.max(bound(a));
                d2 = d2.max(bound(b));
            }
        }
    }
    if clean_clean {
        IdSpace::clean_clean(d1, d2)
    } else {
        IdSpace::dirty(d1)
    }
}

/// Every raw comparison of a block list, block by block, duplicates included.
pub fn raw_comparisons(blocks: &[Block]) -> Vec<(EntityId, EntityId)> {
    blocks.iter().flat_map(|b| b.pairs()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_lists_and_degrees() {
        let blocks = vec![Block::unilateral([0, 1, 2]), Block::unilateral([1, 2, 3])];
        let index = EntityIndex::build(&blocks, false).unwrap();
        assert_eq!(index.len(), 4);
        assert_eq!(index.entity_blocks(1), &[BlockId(0), BlockId(1)]);
        assert_eq!(index.comparisons_of(1), 4);
        assert_eq!(index.comparisons_of(0), 2);
        assert_eq!(index.common_blocks(1, 2).as_slice(), &[BlockId(0), BlockId(1)]);
        assert_eq!(index.block_size(BlockId(1)), 3);
        assert_eq!(index.block_size(BlockId(9)), 0);
        assert!(index.is_first_common_block(1, 2, BlockId(0)));
        assert!(!index.is_first_common_block(1, 2, BlockId(1)));
        assert_eq!(index.statistics().assignments, 6);
        assert_eq!(index.statistics().comparisons, 6);
    }

    #[test]
    fn test_bilateral_degrees_use_other_side() {
        let blocks = vec![Block::bilateral([0, 1], [0]), Block::bilateral([1, 2], [1, 2])];
        let index = EntityIndex::build(&blocks, true).unwrap();
        let space = index.id_space();
        assert_eq!(space.dataset_limit(), 3);
        assert_eq!(space.len(), 6);
        assert_eq!(index.comparisons_of(1), 3);
        let d2_0 = space.global(Dataset::D2, EntityId(0)).unwrap();
        assert_eq!(index.comparisons_of(d2_0), 2);
    }

    #[test]
    fn test_empty_and_mixed_lists_are_rejected() {
        assert!(matches!(
            EntityIndex::build(&[], false),
            Err(BlockError::EmptyBlockList)
        ));
        let mixed = vec![Block::unilateral([0, 1]), Block::bilateral([0], [1])];
        assert!(matches!(
            EntityIndex::build(&mixed, false),
            Err(BlockError::MixedBlockTypes { index: 1, .. })
        ));
    }

    #[test]
    fn test_out_of_range_against_given_space() {
        let blocks = vec![Block::unilateral([0, 5])];
        let err = EntityIndex::with_id_space(&blocks, false, IdSpace::dirty(3), u64::MAX)
            .unwrap_err();
        assert!(matches!(err, BlockError::EntityOutOfRange { id: 5, limit: 3 }));
    }

    #[test]
    fn test_comparison_limit() {
        let blocks = vec![Block::unilateral(0..10)];
        let err = EntityIndex::build_with_limit(&blocks, false, 44).unwrap_err();
        assert!(matches!(err, BlockError::TooManyComparisons { count: 45, .. }));
    }

    #[test]
    fn test_raw_comparisons_keep_duplicates() {
        let blocks = vec![Block::unilateral([0, 1, 2]), Block::unilateral([1, 2, 3])];
        let raw = raw_comparisons(&blocks);
        assert_eq!(raw.len(), 6);
        let dup = raw.iter().filter(|&&p| p == (EntityId(1), EntityId(2))).count();
        assert_eq!(dup, 2);
    }
}
