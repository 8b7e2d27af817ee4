use {
    crate::traits::{
        ComponentOwnerService, InstanceOperatorService, OracleService, PolicyController,
    },
    alloy::primitives::Address,
    gif_domain_types::Account,
    std::sync::Arc,
};

/// Facade over a deployed GIF instance: the four service handles, the
/// registry address, and the account that owns the instance. Immutable once
/// obtained; all handles point at contracts that are deployed and maintained
/// elsewhere.
pub struct Instance {
    operator: Arc<dyn InstanceOperatorService>,
    component_owner: Arc<dyn ComponentOwnerService>,
    oracle: Arc<dyn OracleService>,
    policy: Arc<dyn PolicyController>,
    registry: Address,
    owner: Account,
}

impl Instance {
    pub fn new(
        operator: Arc<dyn InstanceOperatorService>,
        component_owner: Arc<dyn ComponentOwnerService>,
        oracle: Arc<dyn OracleService>,
        policy: Arc<dyn PolicyController>,
        registry: Address,
        owner: Account,
    ) -> Self {
        Self {
            operator,
            component_owner,
            oracle,
            policy,
            registry,
            owner,
        }
    }

    pub fn operator_service(&self) -> Arc<dyn InstanceOperatorService> {
        self.operator.clone()
    }

    pub fn component_owner_service(&self) -> Arc<dyn ComponentOwnerService> {
        self.component_owner.clone()
    }

    pub fn oracle_service(&self) -> Arc<dyn OracleService> {
        self.oracle.clone()
    }

    pub fn policy_controller(&self) -> Arc<dyn PolicyController> {
        self.policy.clone()
    }

    pub fn registry(&self) -> Address {
        self.registry
    }

    /// The designated instance operator account. Signs role grants and
    /// component approvals.
    pub fn owner(&self) -> Account {
        self.owner
    }
}
