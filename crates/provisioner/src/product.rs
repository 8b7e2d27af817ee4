use {
    crate::{
        ProvisionError, advance,
        instance::Instance,
        oracle::OracleProvisioner,
        traits::{ComponentFactory, ComponentHandle, PolicyController, ServiceError},
    },
    gif_domain_types::{
        Account, ComponentId, ComponentName, Policy, PolicyId, state::ComponentState,
    },
    std::sync::Arc,
};

/// A fully provisioned product, bound to exactly one previously approved
/// oracle.
pub struct ProductProvisioner {
    product: Box<dyn ComponentHandle>,
    product_id: ComponentId,
    policy_controller: Arc<dyn PolicyController>,
    owner: Account,
}

impl ProductProvisioner {
    /// Runs the full provisioning sequence for a new product component. The
    /// product binds the oracle id of a provisioner that completed before
    /// this call began; that ordering is what guarantees the referenced
    /// oracle is already approved. The product owner may differ from the
    /// oracle owner.
    pub async fn provision(
        instance: &Instance,
        oracle: &OracleProvisioner,
        factory: &dyn ComponentFactory,
        name: ComponentName,
        owner: Account,
    ) -> Result<Self, ProvisionError> {
        let operator = instance.operator_service();
        let state = ComponentState::Unroled;

        let (granted, from) = advance(state, owner, instance.owner());
        let role = operator
            .product_owner_role()
            .await
            .map_err(ProvisionError::halted(state))?;
        operator
            .add_role_to_account(owner, role, from)
            .await
            .map_err(ProvisionError::halted(state))?;
        tracing::debug!(?role, %owner, "granted product owner role");

        let (deployed, from) = advance(granted, owner, instance.owner());
        let product = factory
            .deploy_product(name, instance.registry(), oracle.oracle_id(), from)
            .await
            .map_err(ProvisionError::halted(granted))?;
        tracing::debug!(
            address = ?product.address(),
            %name,
            oracle = %oracle.oracle_id(),
            "deployed product"
        );

        let (proposed, from) = advance(deployed, owner, instance.owner());
        instance
            .component_owner_service()
            .propose(product.address(), from)
            .await
            .map_err(ProvisionError::halted(deployed))?;

        let product_id = product
            .id()
            .await
            .map_err(ProvisionError::halted(proposed))?;
        let (approved, from) = advance(proposed, owner, instance.owner());
        operator
            .approve_product(product_id, from)
            .await
            .map_err(ProvisionError::halted(proposed))?;
        debug_assert_eq!(approved, ComponentState::Approved);
        tracing::info!(%product_id, "product approved");

        Ok(Self {
            product,
            product_id,
            policy_controller: instance.policy_controller(),
            owner,
        })
    }

    pub fn product_id(&self) -> ComponentId {
        self.product_id
    }

    pub fn product(&self) -> &dyn ComponentHandle {
        self.product.as_ref()
    }

    pub fn owner(&self) -> Account {
        self.owner
    }

    /// Looks up an issued policy through the instance's policy controller.
    /// Pure read; an id the instance has never seen yields `None`.
    pub async fn policy(&self, id: &PolicyId) -> Result<Option<Policy>, ServiceError> {
        self.policy_controller.policy(id).await
    }
}

impl std::fmt::Debug for ProductProvisioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductProvisioner")
            .field("product_id", &self.product_id)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}
