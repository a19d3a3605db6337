pub mod resolver;

pub use resolver::{
    ability_modifier, resolve, CharacterContext, Resolution, Resolver, DEFAULT_ABILITY_SCORE,
    DEXTERITY_ARMOR, LEVEL_TIMES_CONSTITUTION_MOD,
};
