//! Trait definitions for the external instance boundary.
//!
//! Everything a deployed GIF instance does for us happens behind these
//! traits: the on-chain adapters in [`crate::onchain`] implement them against
//! the real contracts, and unit tests substitute mocks. Every state-mutating
//! call takes the signing account explicitly instead of relying on an
//! ambient default sender.

use {
    alloy::primitives::{Address, Bytes},
    gif_domain_types::{Account, ComponentId, ComponentName, Policy, PolicyId, RequestId, RoleId},
};

/// A remote call failed.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The instance refused the call: reverted transaction, missing
    /// permission, duplicate role grant, unknown id. Not retried locally;
    /// a revert leaves no persisted effect on chain.
    #[error("rejected by instance: {0}")]
    Rejected(String),
    /// The call never reached a conclusive on-chain outcome.
    #[error("transport: {0:?}")]
    Transport(#[from] anyhow::Error),
}

/// Privileged operations signed by the instance operator.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait InstanceOperatorService: Send + Sync {
    /// The role an account needs before it may provide oracles.
    async fn oracle_provider_role(&self) -> Result<RoleId, ServiceError>;

    /// The role an account needs before it may own products.
    async fn product_owner_role(&self) -> Result<RoleId, ServiceError>;

    async fn add_role_to_account(
        &self,
        account: Account,
        role: RoleId,
        from: Account,
    ) -> Result<(), ServiceError>;

    /// Ratifies a previously proposed oracle. Rejected by the instance if no
    /// proposal for `id` exists.
    async fn approve_oracle(&self, id: ComponentId, from: Account) -> Result<(), ServiceError>;

    /// Ratifies a previously proposed product.
    async fn approve_product(&self, id: ComponentId, from: Account) -> Result<(), ServiceError>;
}

/// Entry point for component owners to submit a deployed component to the
/// instance.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ComponentOwnerService: Send + Sync {
    async fn propose(&self, component: Address, from: Account) -> Result<(), ServiceError>;
}

/// Callback surface for oracle providers to deliver requested data. The
/// provisioners never call this; it is carried on the instance facade so a
/// freshly provisioned oracle owner can answer requests right away.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait OracleService: Send + Sync {
    async fn respond(
        &self,
        request_id: RequestId,
        data: Bytes,
        from: Account,
    ) -> Result<(), ServiceError>;
}

/// Read access to issued policies.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PolicyController: Send + Sync {
    /// Looks up a policy by its process id. An id the instance has never
    /// seen yields `None`; it is not an error and is never masked.
    async fn policy(&self, id: &PolicyId) -> Result<Option<Policy>, ServiceError>;
}

/// A deployed component contract (oracle or product).
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ComponentHandle: Send + Sync {
    fn address(&self) -> Address;

    /// Registry-assigned component id. Provisional until the component has
    /// been proposed; callers read it only after `propose` has settled.
    async fn id(&self) -> Result<ComponentId, ServiceError>;
}

/// Deploys component contracts. Passed into the provisioners explicitly so
/// nothing resolves contract classes from ambient registries.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ComponentFactory: Send + Sync {
    /// Deploys an oracle bound to the instance registry, signed by `from`.
    async fn deploy_oracle(
        &self,
        name: ComponentName,
        registry: Address,
        from: Account,
    ) -> Result<Box<dyn ComponentHandle>, ServiceError>;

    /// Deploys a product bound to the registry and to an already approved
    /// oracle, signed by `from`.
    async fn deploy_product(
        &self,
        name: ComponentName,
        registry: Address,
        oracle_id: ComponentId,
        from: Account,
    ) -> Result<Box<dyn ComponentHandle>, ServiceError>;
}
