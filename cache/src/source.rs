use tessera_core::{CompiledCommand, FetchSpecification, Result};
use tessera_types::Value;

/// Executes compiled SELECT commands against the backing store.
///
/// Each returned row holds one value per column of the fetched entity, in
/// metadata column order. Transport failures are reported as
/// [`TesseraError::Store`](tessera_core::TesseraError::Store).
pub trait RowSource {
    fn fetch(
        &self,
        command: &CompiledCommand,
        spec: &FetchSpecification,
    ) -> Result<Vec<Vec<Value>>>;
}

impl<F> RowSource for F
where
    F: Fn(&CompiledCommand, &FetchSpecification) -> Result<Vec<Vec<Value>>>,
{
    fn fetch(
        &self,
        command: &CompiledCommand,
        spec: &FetchSpecification,
    ) -> Result<Vec<Vec<Value>>> {
        self(command, spec)
    }
}
