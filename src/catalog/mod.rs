/// Portrait/landscape classification from node names and geometry
pub mod orientation;
/// Slot discovery over content containers
pub mod scanner;
/// Slot record, size groups and orientation labels
pub mod slot;
