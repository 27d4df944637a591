//! The uniform query interface implemented by every backend adapter.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::QueryError;
use crate::types::{Backend, CanonicalBlock, CanonicalTransaction};

/// Block-by-height and transaction-by-hash over one backend node.
///
/// Inputs are assumed syntactically valid (the boundary layer checks hash
/// shape). Failures are always classified: callers only ever see
/// [`QueryError::NotFound`] or [`QueryError::BadGateway`].
#[async_trait]
pub trait ChainAdapter: Send + Sync + 'static {
    type Block: Serialize + Into<CanonicalBlock> + Send + 'static;
    type Transaction: Serialize + Into<CanonicalTransaction> + Send + 'static;

    /// Which dialect this adapter speaks.
    fn backend(&self) -> Backend;

    /// Fetch the block at `height`.
    async fn block_by_height(&self, height: u64) -> Result<Self::Block, QueryError>;

    /// Fetch the transaction identified by `hash`.
    async fn transaction_by_hash(&self, hash: &str) -> Result<Self::Transaction, QueryError>;

    /// [`block_by_height`](Self::block_by_height), widened to the canonical view.
    async fn canonical_block(&self, height: u64) -> Result<CanonicalBlock, QueryError> {
        self.block_by_height(height).await.map(Into::into)
    }

    /// [`transaction_by_hash`](Self::transaction_by_hash), widened to the canonical view.
    async fn canonical_transaction(
        &self,
        hash: &str,
    ) -> Result<CanonicalTransaction, QueryError> {
        self.transaction_by_hash(hash).await.map(Into::into)
    }
}
