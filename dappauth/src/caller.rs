//! The contract-read seam.
//!
//! [`ContractCaller`] is the only way this crate talks to a chain. Every call goes
//! out with the same [`CallContext`], which carries the block to read at, the
//! caller's cancellation token and an optional per-call timeout. Retries, if any,
//! belong to the implementation of [`ContractCaller`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::CapabilityError;

/// Block at which contract state is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockContext {
    /// Most recent mined block.
    #[default]
    Latest,
    /// Pending state, including mempool transactions.
    Pending,
    /// A specific block height.
    Number(u64),
}

impl fmt::Display for BlockContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Pending => f.write_str("pending"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Error parsing a [`BlockContext`] from a string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid block `{0}`: expected `latest`, `pending` or a block number")]
pub struct ParseBlockContextError(String);

impl FromStr for BlockContext {
    type Err = ParseBlockContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(Self::Latest),
            "pending" => Ok(Self::Pending),
            _ => s
                .parse()
                .map(Self::Number)
                .map_err(|_| ParseBlockContextError(s.to_owned())),
        }
    }
}

/// Per-verification call options, threaded unchanged to every remote read.
///
/// Cloning is cheap; clones share the same cancellation token.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    /// Block to read contract state at.
    pub block: BlockContext,
    /// Cancels any in-flight read and aborts the remaining steps.
    pub cancellation: CancellationToken,
    /// Upper bound on a single remote read. Requires a tokio runtime with the
    /// time driver enabled.
    pub timeout: Option<Duration>,
}

impl CallContext {
    /// A context reading at the latest block, never cancelled, without timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the block to read at.
    #[must_use]
    pub const fn with_block(mut self, block: BlockContext) -> Self {
        self.block = block;
        self
    }

    /// Uses `token` to cancel remote reads.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Bounds every remote read by `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Drives `call` to completion unless the token fires or the timeout elapses.
    pub(crate) async fn guard<F, T, E>(&self, call: F) -> Result<T, CapabilityError>
    where
        F: Future<Output = Result<T, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let call = self.cancellation.run_until_cancelled(call);
        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| CapabilityError::Timeout(limit))?,
            None => call.await,
        };
        outcome
            .ok_or(CapabilityError::Cancelled)?
            .map_err(CapabilityError::transport)
    }
}

/// Read-only access to contract state.
///
/// Implementations must be safe for concurrent use; the authenticator shares one
/// caller between all verifications.
pub trait ContractCaller: Send + Sync {
    /// Transport-level error.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Executes `call_data` against `to` without creating a transaction
    /// (`eth_call`) and returns the raw return data.
    fn read_contract_state(
        &self,
        to: Address,
        call_data: Bytes,
        ctx: &CallContext,
    ) -> impl Future<Output = Result<Bytes, Self::Error>> + Send;
}

impl<T: ContractCaller> ContractCaller for &T {
    type Error = T::Error;

    fn read_contract_state(
        &self,
        to: Address,
        call_data: Bytes,
        ctx: &CallContext,
    ) -> impl Future<Output = Result<Bytes, Self::Error>> + Send {
        (**self).read_contract_state(to, call_data, ctx)
    }
}

impl<T: ContractCaller> ContractCaller for std::sync::Arc<T> {
    type Error = T::Error;

    fn read_contract_state(
        &self,
        to: Address,
        call_data: Bytes,
        ctx: &CallContext,
    ) -> impl Future<Output = Result<Bytes, Self::Error>> + Send {
        (**self).read_contract_state(to, call_data, ctx)
    }
}

#[cfg(feature = "provider")]
pub use provider::ProviderCaller;

#[cfg(feature = "provider")]
mod provider {
    use alloy_primitives::{Address, Bytes};
    use alloy_provider::Provider;
    use alloy_rpc_types_eth::{BlockId, TransactionRequest};
    use alloy_transport::TransportError;

    use super::{BlockContext, CallContext, ContractCaller};

    impl From<BlockContext> for BlockId {
        fn from(block: BlockContext) -> Self {
            match block {
                BlockContext::Latest => Self::latest(),
                BlockContext::Pending => Self::pending(),
                BlockContext::Number(number) => Self::number(number),
            }
        }
    }

    /// [`ContractCaller`] backed by an `alloy` provider, issuing `eth_call`.
    #[derive(Debug, Clone)]
    pub struct ProviderCaller<P> {
        provider: P,
    }

    impl<P> ProviderCaller<P> {
        /// Wraps `provider`.
        pub const fn new(provider: P) -> Self {
            Self { provider }
        }

        /// The wrapped provider.
        pub const fn inner(&self) -> &P {
            &self.provider
        }
    }

    impl<P> ContractCaller for ProviderCaller<P>
    where
        P: Provider + Send + Sync,
    {
        type Error = TransportError;

        async fn read_contract_state(
            &self,
            to: Address,
            call_data: Bytes,
            ctx: &CallContext,
        ) -> Result<Bytes, Self::Error> {
            let request = TransactionRequest::default().to(to).input(call_data.into());
            self.provider.call(request).block(ctx.block.into()).await
        }
    }

}
