pub mod composition;
pub mod path;
pub mod view_definition;

pub use composition::{Composition, CompositionOperator, CompositionType};
pub use view_definition::{ProjectedColumn, ViewDefinition};
