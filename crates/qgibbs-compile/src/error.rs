//! Compilation errors.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// The gate has no rewrite into the requested basis.
    #[error("'{gate}' cannot be expressed in the basis [{basis}]")]
    Untranslatable {
        /// Gate name.
        gate: String,
        /// Comma-separated target basis.
        basis: String,
    },

    /// A basis entry the compiler cannot emit.
    #[error("unknown basis gate '{0}'")]
    UnknownBasisGate(String),

    /// Optimization levels run from 0 to 3.
    #[error("optimization level {0} is out of range 0..=3")]
    OptimizationLevel(u8),

    #[error(transparent)]
    Ir(#[from] qgibbs_ir::IrError),
}

pub type CompileResult<T> = Result<T, CompileError>;
