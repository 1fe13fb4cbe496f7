/// Random orientation-pure assignment of variants to frame slots
pub mod assign;
/// Idempotent generation of resized variants
pub mod compress;
/// Long-side normalization of target dimensions
pub mod normalize;
/// Removal of unreferenced compressed variants
pub mod reconcile;
