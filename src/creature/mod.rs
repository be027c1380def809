pub mod arena;
pub mod kind;
pub mod state;

pub use arena::Arena;
pub use kind::CreatureKind;
pub use state::{Creature, CreatureSnapshot, CreatureSpec, Vitals};
