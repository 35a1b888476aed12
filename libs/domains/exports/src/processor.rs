use domain_products::Product;
use tracing::debug;

use crate::error::ExportResult;

/// Transforms or filters single items between read and write.
///
/// Returning `Ok(None)` filters the item out.
pub trait ItemProcessor: Send + Sync {
    type Input;
    type Output;

    fn process(&self, item: Self::Input) -> ExportResult<Option<Self::Output>>;
}

/// Hands every product through unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughProcessor;

impl ItemProcessor for PassThroughProcessor {
    type Input = Product;
    type Output = Product;

    fn process(&self, item: Product) -> ExportResult<Option<Product>> {
        debug!("Processing product: {}", item.id);
        Ok(Some(item))
    }
}
