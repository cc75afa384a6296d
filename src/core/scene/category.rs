//=========================================================================
// Node Categories
//=========================================================================
//
// Bitmask tagging which kinds of commands a node answers to.
//
// The core only defines `SCENE`, the tag every node carries unless its
// content says otherwise. Games add their own bits:
//
// ```
// use stagecraft::core::scene::Category;
//
// pub const PLAYER_AIRCRAFT: Category = Category::from_bits_retain(1 << 1);
// pub const ENEMY_AIRCRAFT: Category = Category::from_bits_retain(1 << 2);
// ```
//
//=========================================================================

use bitflags::bitflags;

bitflags! {
    /// Category bitmask of a scene node or a command target.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Category: u32 {
        /// Generic scene node.
        const SCENE = 1;

        // Bits above SCENE belong to the game.
        const _ = !0;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
