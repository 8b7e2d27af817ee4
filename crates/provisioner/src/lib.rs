//! Provisioning orchestration against an already deployed GIF instance.
//!
//! Two orchestrators compose the same four-step protocol: grant the required
//! role, deploy the component, propose it, await approval. An oracle is
//! provisioned first; a product binds to the resulting oracle id. Every step
//! is a single remote call that must settle before the next one is issued,
//! and any failure propagates to the caller untouched; compensating a
//! half-completed sequence is the chain's transaction-revert semantics or
//! the operator's business, not ours.

pub mod arguments;
pub mod instance;
pub mod onchain;
pub mod oracle;
pub mod product;
pub mod traits;

use {
    crate::traits::ServiceError,
    gif_domain_types::{
        Account,
        state::{Actor, ComponentState},
    },
};

/// A provisioning sequence failed, carrying the state in which it halted.
/// Resuming means re-running from scratch, subject to the external system's
/// idempotence.
#[derive(Debug, thiserror::Error)]
#[error("provisioning halted in state {state:?}")]
pub struct ProvisionError {
    pub state: ComponentState,
    #[source]
    pub source: ServiceError,
}

impl ProvisionError {
    pub(crate) fn halted(state: ComponentState) -> impl FnOnce(ServiceError) -> Self {
        move |source| Self { state, source }
    }
}

/// Resolves the transition leaving `state` against the transition table:
/// the state entered on success and the account that signs the call.
pub(crate) fn advance(
    state: ComponentState,
    component_owner: Account,
    instance_owner: Account,
) -> (ComponentState, Account) {
    let transition = state.next().expect("no transition out of terminal state");
    let from = match transition.signer {
        Actor::ComponentOwner => component_owner,
        Actor::InstanceOperator => instance_owner,
    };
    (transition.to, from)
}

/// Entry point of the deployment driver binary: connects to the instance
/// behind the configured registry and provisions an oracle and a product
/// against it.
pub async fn main(args: arguments::Arguments) {
    let provider = onchain::provider(args.node_url.as_str());
    let instance = onchain::connect(
        provider.clone(),
        args.registry,
        Account(args.instance_owner),
    )
    .await
    .expect("failed to connect to the instance");

    let factory = onchain::BytecodeFactory::new(
        provider,
        onchain::read_bytecode(&args.oracle_bytecode).expect("failed to read oracle bytecode"),
        onchain::read_bytecode(&args.product_bytecode).expect("failed to read product bytecode"),
    );

    let oracle = oracle::OracleProvisioner::provision(
        &instance,
        &factory,
        args.oracle_name,
        Account(args.oracle_owner),
    )
    .await
    .expect("oracle provisioning failed");

    let product = product::ProductProvisioner::provision(
        &instance,
        &oracle,
        &factory,
        args.product_name,
        Account(args.product_owner),
    )
    .await
    .expect("product provisioning failed");

    tracing::info!(
        oracle = %oracle.oracle_id(),
        product = %product.product_id(),
        "instance provisioned"
    );
}
