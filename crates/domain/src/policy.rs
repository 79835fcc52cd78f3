pub mod group;
pub mod rule;
pub mod table;

pub use group::PolicyGroup;
pub use rule::{PrecedenceMode, SubnetRule};
pub use table::{PolicyMatch, PolicyTable};
