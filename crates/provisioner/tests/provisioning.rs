//! End-to-end provisioning against an in-memory fake instance that records
//! every state-mutating call and enforces the same authorization rules as
//! the real services.

use {
    alloy::primitives::{Address, B256, Bytes, U256},
    gif_domain_types::{
        Account, ComponentId, ComponentName, Policy, PolicyId, PolicyState, RequestId, RoleId,
        state::ComponentState,
    },
    provisioner::{
        instance::Instance,
        oracle::OracleProvisioner,
        product::ProductProvisioner,
        traits::{
            ComponentFactory, ComponentHandle, ComponentOwnerService, InstanceOperatorService,
            OracleService, PolicyController, ServiceError,
        },
    },
    std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    },
};

const PROVIDER_ROLE: RoleId = RoleId(B256::repeat_byte(0x01));
const OWNER_ROLE: RoleId = RoleId(B256::repeat_byte(0x02));
const REGISTRY: Address = Address::repeat_byte(0x10);
const INSTANCE_OWNER: Account = Account(Address::repeat_byte(0x11));
const OWNER_A: Account = Account(Address::repeat_byte(0xa1));
const OWNER_B: Account = Account(Address::repeat_byte(0xb1));

/// Every state-mutating call the fake instance saw, in order.
#[derive(Clone, Debug, Eq, PartialEq)]
enum Call {
    AddRole {
        account: Account,
        role: RoleId,
        from: Account,
    },
    Deploy {
        name: String,
        registry: Address,
        oracle_id: Option<ComponentId>,
        from: Account,
    },
    Propose {
        component: Address,
        from: Account,
    },
    ApproveOracle {
        id: ComponentId,
        from: Account,
    },
    ApproveProduct {
        id: ComponentId,
        from: Account,
    },
}

/// In-memory stand-in for the deployed instance. Ids are assigned while a
/// component is proposed, like the real registry does it.
#[derive(Default)]
struct Ledger {
    calls: Vec<Call>,
    granted: Vec<(Account, RoleId)>,
    deployments: u64,
    proposed: HashMap<Address, ComponentId>,
    policies: HashMap<PolicyId, Policy>,
}

impl Ledger {
    fn ensure_operator(from: Account) -> Result<(), ServiceError> {
        if from == INSTANCE_OWNER {
            Ok(())
        } else {
            Err(ServiceError::Rejected(
                "caller is not the instance operator".into(),
            ))
        }
    }
}

struct FakeOperatorService(Arc<Mutex<Ledger>>);

#[async_trait::async_trait]
impl InstanceOperatorService for FakeOperatorService {
    async fn oracle_provider_role(&self) -> Result<RoleId, ServiceError> {
        Ok(PROVIDER_ROLE)
    }

    async fn product_owner_role(&self) -> Result<RoleId, ServiceError> {
        Ok(OWNER_ROLE)
    }

    async fn add_role_to_account(
        &self,
        account: Account,
        role: RoleId,
        from: Account,
    ) -> Result<(), ServiceError> {
        Ledger::ensure_operator(from)?;
        let mut ledger = self.0.lock().unwrap();
        if ledger.granted.contains(&(account, role)) {
            return Err(ServiceError::Rejected("role already granted".into()));
        }
        ledger.granted.push((account, role));
        ledger.calls.push(Call::AddRole {
            account,
            role,
            from,
        });
        Ok(())
    }

    async fn approve_oracle(&self, id: ComponentId, from: Account) -> Result<(), ServiceError> {
        Ledger::ensure_operator(from)?;
        let mut ledger = self.0.lock().unwrap();
        if !ledger.proposed.values().any(|proposed| *proposed == id) {
            return Err(ServiceError::Rejected(format!("no proposal for id {id}")));
        }
        ledger.calls.push(Call::ApproveOracle { id, from });
        Ok(())
    }

    async fn approve_product(&self, id: ComponentId, from: Account) -> Result<(), ServiceError> {
        Ledger::ensure_operator(from)?;
        let mut ledger = self.0.lock().unwrap();
        if !ledger.proposed.values().any(|proposed| *proposed == id) {
            return Err(ServiceError::Rejected(format!("no proposal for id {id}")));
        }
        ledger.calls.push(Call::ApproveProduct { id, from });
        Ok(())
    }
}

struct FakeOwnerService(Arc<Mutex<Ledger>>);

#[async_trait::async_trait]
impl ComponentOwnerService for FakeOwnerService {
    async fn propose(&self, component: Address, from: Account) -> Result<(), ServiceError> {
        let mut ledger = self.0.lock().unwrap();
        let id = ComponentId(U256::from(ledger.proposed.len() as u64 + 1));
        ledger.proposed.insert(component, id);
        ledger.calls.push(Call::Propose { component, from });
        Ok(())
    }
}

struct FakeOracleService;

#[async_trait::async_trait]
impl OracleService for FakeOracleService {
    async fn respond(
        &self,
        _request_id: RequestId,
        _data: Bytes,
        _from: Account,
    ) -> Result<(), ServiceError> {
        Ok(())
    }
}

struct FakePolicyController(Arc<Mutex<Ledger>>);

#[async_trait::async_trait]
impl PolicyController for FakePolicyController {
    async fn policy(&self, id: &PolicyId) -> Result<Option<Policy>, ServiceError> {
        Ok(self.0.lock().unwrap().policies.get(id).cloned())
    }
}

struct FakeComponent {
    address: Address,
    ledger: Arc<Mutex<Ledger>>,
}

#[async_trait::async_trait]
impl ComponentHandle for FakeComponent {
    fn address(&self) -> Address {
        self.address
    }

    async fn id(&self) -> Result<ComponentId, ServiceError> {
        // Provisional zero until the proposal assigned the real id.
        Ok(self
            .ledger
            .lock()
            .unwrap()
            .proposed
            .get(&self.address)
            .copied()
            .unwrap_or_default())
    }
}

struct FakeFactory(Arc<Mutex<Ledger>>);

impl FakeFactory {
    fn deploy(
        &self,
        name: ComponentName,
        registry: Address,
        oracle_id: Option<ComponentId>,
        from: Account,
    ) -> Box<dyn ComponentHandle> {
        let mut ledger = self.0.lock().unwrap();
        ledger.deployments += 1;
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&ledger.deployments.to_be_bytes());
        let address = Address::from(bytes);
        ledger.calls.push(Call::Deploy {
            name: name.as_str().to_string(),
            registry,
            oracle_id,
            from,
        });
        Box::new(FakeComponent {
            address,
            ledger: self.0.clone(),
        })
    }
}

#[async_trait::async_trait]
impl ComponentFactory for FakeFactory {
    async fn deploy_oracle(
        &self,
        name: ComponentName,
        registry: Address,
        from: Account,
    ) -> Result<Box<dyn ComponentHandle>, ServiceError> {
        Ok(self.deploy(name, registry, None, from))
    }

    async fn deploy_product(
        &self,
        name: ComponentName,
        registry: Address,
        oracle_id: ComponentId,
        from: Account,
    ) -> Result<Box<dyn ComponentHandle>, ServiceError> {
        Ok(self.deploy(name, registry, Some(oracle_id), from))
    }
}

fn fixture() -> (Arc<Mutex<Ledger>>, Instance, FakeFactory) {
    observe::tracing::initialize_reentrant("warn,provisioner=debug");
    let ledger = Arc::new(Mutex::new(Ledger::default()));
    let instance = Instance::new(
        Arc::new(FakeOperatorService(ledger.clone())),
        Arc::new(FakeOwnerService(ledger.clone())),
        Arc::new(FakeOracleService),
        Arc::new(FakePolicyController(ledger.clone())),
        REGISTRY,
        INSTANCE_OWNER,
    );
    let factory = FakeFactory(ledger.clone());
    (ledger, instance, factory)
}

fn name(name: &str) -> ComponentName {
    ComponentName::new(name).unwrap()
}

#[tokio::test]
async fn provisions_oracle_then_product_with_the_expected_call_sequence() {
    let (ledger, instance, factory) = fixture();

    let oracle = OracleProvisioner::provision(&instance, &factory, name("Test.Oracle"), OWNER_A)
        .await
        .unwrap();
    let product = ProductProvisioner::provision(
        &instance,
        &oracle,
        &factory,
        name("Test.Product"),
        OWNER_B,
    )
    .await
    .unwrap();

    assert_eq!(oracle.oracle_id(), ComponentId(U256::from(1)));
    assert_eq!(product.product_id(), ComponentId(U256::from(2)));

    let calls = ledger.lock().unwrap().calls.clone();
    assert_eq!(
        calls,
        vec![
            Call::AddRole {
                account: OWNER_A,
                role: PROVIDER_ROLE,
                from: INSTANCE_OWNER,
            },
            Call::Deploy {
                name: "Test.Oracle".into(),
                registry: REGISTRY,
                oracle_id: None,
                from: OWNER_A,
            },
            Call::Propose {
                component: oracle.oracle().address(),
                from: OWNER_A,
            },
            Call::ApproveOracle {
                id: oracle.oracle_id(),
                from: INSTANCE_OWNER,
            },
            Call::AddRole {
                account: OWNER_B,
                role: OWNER_ROLE,
                from: INSTANCE_OWNER,
            },
            Call::Deploy {
                name: "Test.Product".into(),
                registry: REGISTRY,
                oracle_id: Some(oracle.oracle_id()),
                from: OWNER_B,
            },
            Call::Propose {
                component: product.product().address(),
                from: OWNER_B,
            },
            Call::ApproveProduct {
                id: product.product_id(),
                from: INSTANCE_OWNER,
            },
        ]
    );
}

#[tokio::test]
async fn a_second_provisioning_run_fails_on_the_role_grant() {
    let (ledger, instance, factory) = fixture();

    OracleProvisioner::provision(&instance, &factory, name("Test.Oracle"), OWNER_A)
        .await
        .unwrap();
    let calls_after_first_run = ledger.lock().unwrap().calls.len();

    let err = OracleProvisioner::provision(&instance, &factory, name("Test.Oracle"), OWNER_A)
        .await
        .unwrap_err();

    assert_eq!(err.state, ComponentState::Unroled);
    assert!(matches!(err.source, ServiceError::Rejected(_)));
    // The rejected grant left no trace and nothing later was attempted.
    assert_eq!(ledger.lock().unwrap().calls.len(), calls_after_first_run);
}

#[tokio::test]
async fn approving_an_unproposed_component_is_rejected() {
    let (_ledger, instance, _factory) = fixture();

    let err = instance
        .operator_service()
        .approve_oracle(ComponentId(U256::from(9)), INSTANCE_OWNER)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Rejected(_)));
}

#[tokio::test]
async fn policy_lookup_surfaces_absence_and_never_fails_differently() {
    let (ledger, instance, factory) = fixture();

    let issued = PolicyId(B256::repeat_byte(0x33));
    ledger.lock().unwrap().policies.insert(
        issued,
        Policy {
            state: PolicyState::Active,
            premium: U256::from(100),
            sum_insured: U256::from(10_000),
            created_at: U256::from(1_700_000_000u64),
            updated_at: U256::from(1_700_000_000u64),
        },
    );

    let oracle = OracleProvisioner::provision(&instance, &factory, name("Test.Oracle"), OWNER_A)
        .await
        .unwrap();
    let product = ProductProvisioner::provision(
        &instance,
        &oracle,
        &factory,
        name("Test.Product"),
        OWNER_B,
    )
    .await
    .unwrap();

    assert!(
        product
            .policy(&PolicyId(B256::repeat_byte(0x44)))
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(
        product.policy(&issued).await.unwrap().unwrap().state,
        PolicyState::Active
    );
}
