use serde::{Deserialize, Serialize};

use crate::geometry::{Facing, Rotation};

/// A block-type code as stored in the layout's block array.
pub type BlockId = u8;

/// Mask of the metadata bits that hold a repeater's facing.
const FACING_BITS: u8 = 0b11;

/// Block codes and metadata encodings for the redstone substrate.
///
/// Loaded once and handed to every component that reads or writes voxels.
/// Repeater metadata stores the facing in its two low bits, clockwise from
/// north; the remaining bits (delay) are opaque and preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockRegistry {
    pub air: BlockId,
    pub stone: BlockId,
    pub planks: BlockId,
    pub glass: BlockId,
    pub sticky_piston: BlockId,
    pub redstone_wire: BlockId,
    pub unlit_redstone_torch: BlockId,
    pub redstone_torch: BlockId,
    pub unpowered_repeater: BlockId,
    pub powered_repeater: BlockId,
    pub redstone_block: BlockId,
    /// Torch metadata for a torch standing on the block below it.
    pub torch_up: u8,
    /// Piston metadata for a piston pushing downward.
    pub piston_down: u8,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self {
            air: 0,
            stone: 1,
            planks: 5,
            glass: 20,
            sticky_piston: 29,
            redstone_wire: 55,
            unlit_redstone_torch: 75,
            redstone_torch: 76,
            unpowered_repeater: 93,
            powered_repeater: 94,
            redstone_block: 152,
            torch_up: 5,
            piston_down: 0,
        }
    }
}

impl BlockRegistry {
    /// Blocks whose metadata encodes an absolute compass direction.
    pub fn is_direction_sensitive(&self, block: BlockId) -> bool {
        block == self.unpowered_repeater || block == self.powered_repeater
    }

    pub fn repeater_data(&self, facing: Facing) -> u8 {
        facing.clockwise_index()
    }

    /// Metadata of a direction-sensitive block after its cell turns by
    /// `rotation`. Counter-clockwise cell turns move the facing backwards in
    /// the clockwise encoding.
    pub fn counter_rotate(&self, data: u8, rotation: Rotation) -> u8 {
        let facing = (data & FACING_BITS) as i32 - rotation.turns() as i32;
        (data & !FACING_BITS) | (facing.rem_euclid(4) as u8)
    }

    /// Support block placed under a routed voxel whose support lands on `layer`.
    pub fn support_for(&self, layer: i32, floor_layer: i32) -> BlockId {
        if layer == floor_layer {
            self.stone
        } else {
            self.planks
        }
    }
}
