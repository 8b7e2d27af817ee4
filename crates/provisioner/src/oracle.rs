use {
    crate::{
        ProvisionError, advance,
        instance::Instance,
        traits::{ComponentFactory, ComponentHandle},
    },
    gif_domain_types::{Account, ComponentId, ComponentName, state::ComponentState},
};

/// A fully provisioned oracle: role granted, deployed, proposed, approved.
pub struct OracleProvisioner {
    oracle: Box<dyn ComponentHandle>,
    oracle_id: ComponentId,
    owner: Account,
}

impl OracleProvisioner {
    /// Runs the full provisioning sequence for a new oracle component. Each
    /// remote call must settle before the next one is issued; the first
    /// failure aborts the sequence in the state reached so far, with no
    /// local cleanup. Running this twice for the same owner fails on the
    /// role grant, which the instance does not treat as idempotent.
    pub async fn provision(
        instance: &Instance,
        factory: &dyn ComponentFactory,
        name: ComponentName,
        owner: Account,
    ) -> Result<Self, ProvisionError> {
        let operator = instance.operator_service();
        let state = ComponentState::Unroled;

        let (granted, from) = advance(state, owner, instance.owner());
        let role = operator
            .oracle_provider_role()
            .await
            .map_err(ProvisionError::halted(state))?;
        operator
            .add_role_to_account(owner, role, from)
            .await
            .map_err(ProvisionError::halted(state))?;
        tracing::debug!(?role, %owner, "granted oracle provider role");

        let (deployed, from) = advance(granted, owner, instance.owner());
        let oracle = factory
            .deploy_oracle(name, instance.registry(), from)
            .await
            .map_err(ProvisionError::halted(granted))?;
        tracing::debug!(address = ?oracle.address(), %name, "deployed oracle");

        let (proposed, from) = advance(deployed, owner, instance.owner());
        instance
            .component_owner_service()
            .propose(oracle.address(), from)
            .await
            .map_err(ProvisionError::halted(deployed))?;

        // The registry assigns the definitive id while the component is
        // proposed, so it must not be read any earlier than this.
        let oracle_id = oracle.id().await.map_err(ProvisionError::halted(proposed))?;
        let (approved, from) = advance(proposed, owner, instance.owner());
        operator
            .approve_oracle(oracle_id, from)
            .await
            .map_err(ProvisionError::halted(proposed))?;
        debug_assert_eq!(approved, ComponentState::Approved);
        tracing::info!(%oracle_id, "oracle approved");

        Ok(Self {
            oracle,
            oracle_id,
            owner,
        })
    }

    pub fn oracle_id(&self) -> ComponentId {
        self.oracle_id
    }

    /// The underlying deployed contract, for downstream binding.
    pub fn oracle(&self) -> &dyn ComponentHandle {
        self.oracle.as_ref()
    }

    pub fn owner(&self) -> Account {
        self.owner
    }
}

impl std::fmt::Debug for OracleProvisioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleProvisioner")
            .field("oracle_id", &self.oracle_id)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}
