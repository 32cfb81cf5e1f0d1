//! Built-in passes.

mod cancel;
mod fuse;
mod translate;

pub use cancel::CancelPairs;
pub use fuse::Fuse1q;
pub use translate::BasisTranslation;

#[cfg(test)]
pub(crate) fn names(dag: &qgibbs_ir::CircuitDag) -> Vec<String> {
    dag.ops().map(|(_, inst)| inst.name().to_owned()).collect()
}
