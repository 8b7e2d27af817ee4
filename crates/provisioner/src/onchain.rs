//! alloy-backed implementations of the service boundary, talking to the
//! contracts of a deployed instance.

use {
    crate::{
        instance::Instance,
        traits::{self, ServiceError},
    },
    alloy::{
        contract::Error as ContractError,
        network::{Ethereum, TransactionBuilder},
        primitives::{Address, B256, Bytes},
        providers::{DynProvider, PendingTransactionBuilder, Provider as _, ProviderBuilder},
        rpc::{
            client::ClientBuilder,
            types::{TransactionReceipt, TransactionRequest},
        },
        sol_types::SolValue,
        transports::{RpcError, TransportError},
    },
    anyhow::{Context, Result},
    gif_domain_types::{
        Account, ComponentId, ComponentName, Policy, PolicyId, PolicyState, RequestId, RoleId,
    },
    std::{path::Path, sync::Arc},
};

pub fn provider(url: &str) -> DynProvider {
    let rpc = ClientBuilder::default().http(url.parse().unwrap());
    ProviderBuilder::new().connect_client(rpc).erased()
}

/// Connects the facade to a deployed instance by resolving every service
/// address from the instance registry.
pub async fn connect(provider: DynProvider, registry: Address, owner: Account) -> Result<Instance> {
    let registry = contracts::Registry::new(registry, provider.clone());
    let operator = resolve(&registry, "InstanceOperatorService").await?;
    let component_owner = resolve(&registry, "ComponentOwnerService").await?;
    let oracle_service = resolve(&registry, "OracleService").await?;
    // The policy controller registers under its module name.
    let policy = resolve(&registry, "Policy").await?;
    tracing::info!(
        ?operator,
        ?component_owner,
        ?oracle_service,
        ?policy,
        "resolved instance services"
    );

    Ok(Instance::new(
        Arc::new(OperatorService {
            contract: contracts::InstanceOperatorService::new(operator, provider.clone()),
        }),
        Arc::new(OwnerService {
            contract: contracts::ComponentOwnerService::new(component_owner, provider.clone()),
        }),
        Arc::new(ResponseService {
            contract: contracts::OracleService::new(oracle_service, provider.clone()),
        }),
        Arc::new(PolicyService {
            contract: contracts::PolicyController::new(policy, provider),
        }),
        *registry.address(),
        owner,
    ))
}

async fn resolve(registry: &contracts::Registry, name: &str) -> Result<Address> {
    let encoded = ComponentName::new(name).expect("service names fit the fixed width");
    let address = registry
        .getContract(B256::new(encoded.to_bytes()))
        .call()
        .await
        .with_context(|| format!("could not resolve {name}"))?;
    anyhow::ensure!(address != Address::ZERO, "{name} is not registered");
    Ok(address)
}

/// Reads hex-encoded creation bytecode the contract build pipeline wrote to
/// disk.
pub fn read_bytecode(path: &Path) -> Result<Bytes> {
    let hex = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let code =
        const_hex::decode(hex.trim()).with_context(|| format!("decode {}", path.display()))?;
    Ok(code.into())
}

pub struct OperatorService {
    contract: contracts::InstanceOperatorService,
}

#[async_trait::async_trait]
impl traits::InstanceOperatorService for OperatorService {
    async fn oracle_provider_role(&self) -> Result<RoleId, ServiceError> {
        let role = self
            .contract
            .oracleProviderRole()
            .call()
            .await
            .map_err(contract_error)?;
        Ok(RoleId(role))
    }

    async fn product_owner_role(&self) -> Result<RoleId, ServiceError> {
        let role = self
            .contract
            .productOwnerRole()
            .call()
            .await
            .map_err(contract_error)?;
        Ok(RoleId(role))
    }

    async fn add_role_to_account(
        &self,
        account: Account,
        role: RoleId,
        from: Account,
    ) -> Result<(), ServiceError> {
        let pending = self
            .contract
            .addRoleToAccount(account.0, role.0)
            .from(from.0)
            .send()
            .await
            .map_err(contract_error)?;
        settled(pending).await
    }

    async fn approve_oracle(&self, id: ComponentId, from: Account) -> Result<(), ServiceError> {
        let pending = self
            .contract
            .approveOracle(id.0)
            .from(from.0)
            .send()
            .await
            .map_err(contract_error)?;
        settled(pending).await
    }

    async fn approve_product(&self, id: ComponentId, from: Account) -> Result<(), ServiceError> {
        let pending = self
            .contract
            .approveProduct(id.0)
            .from(from.0)
            .send()
            .await
            .map_err(contract_error)?;
        settled(pending).await
    }
}

pub struct OwnerService {
    contract: contracts::ComponentOwnerService,
}

#[async_trait::async_trait]
impl traits::ComponentOwnerService for OwnerService {
    async fn propose(&self, component: Address, from: Account) -> Result<(), ServiceError> {
        let pending = self
            .contract
            .propose(component)
            .from(from.0)
            .send()
            .await
            .map_err(contract_error)?;
        settled(pending).await
    }
}

pub struct ResponseService {
    contract: contracts::OracleService,
}

#[async_trait::async_trait]
impl traits::OracleService for ResponseService {
    async fn respond(
        &self,
        request_id: RequestId,
        data: Bytes,
        from: Account,
    ) -> Result<(), ServiceError> {
        let pending = self
            .contract
            .respond(request_id.0, data)
            .from(from.0)
            .send()
            .await
            .map_err(contract_error)?;
        settled(pending).await
    }
}

pub struct PolicyService {
    contract: contracts::PolicyController,
}

#[async_trait::async_trait]
impl traits::PolicyController for PolicyService {
    async fn policy(&self, id: &PolicyId) -> Result<Option<Policy>, ServiceError> {
        match self.contract.getPolicy(id.0).call().await {
            Ok(policy) => Ok(Some(into_policy(policy))),
            // The controller reverts for ids it has never issued; that is
            // absence, not an error.
            Err(err) => match contract_error(err) {
                ServiceError::Rejected(_) => Ok(None),
                transport => Err(transport),
            },
        }
    }
}

fn into_policy(raw: contracts::IPolicyController::Policy) -> Policy {
    Policy {
        state: match raw.state {
            contracts::IPolicyController::PolicyState::Active => PolicyState::Active,
            contracts::IPolicyController::PolicyState::Expired => PolicyState::Expired,
            contracts::IPolicyController::PolicyState::Closed => PolicyState::Closed,
            // `sol!` synthesizes this sentinel for decoding an out-of-range
            // `u8`; a well-formed policy from the instance never carries it.
            _ => unreachable!("policy controller returned an out-of-range state"),
        },
        premium: raw.premiumAmount,
        sum_insured: raw.sumInsuredAmount,
        created_at: raw.createdAt,
        updated_at: raw.updatedAt,
    }
}

/// Deploys component contracts from externally compiled creation bytecode.
pub struct BytecodeFactory {
    provider: DynProvider,
    oracle_bytecode: Bytes,
    product_bytecode: Bytes,
}

impl BytecodeFactory {
    pub fn new(provider: DynProvider, oracle_bytecode: Bytes, product_bytecode: Bytes) -> Self {
        Self {
            provider,
            oracle_bytecode,
            product_bytecode,
        }
    }

    async fn deploy(
        &self,
        code: Vec<u8>,
        from: Account,
    ) -> Result<Box<dyn traits::ComponentHandle>, ServiceError> {
        let tx = TransactionRequest::default()
            .from(from.0)
            .with_deploy_code(code);
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(rpc_error)?;
        let receipt = pending
            .get_receipt()
            .await
            .map_err(|err| ServiceError::Transport(err.into()))?;
        committed(&receipt)?;
        let address = receipt.contract_address.ok_or_else(|| {
            ServiceError::Rejected("deployment receipt carries no contract address".to_string())
        })?;
        Ok(Box::new(OnchainComponent::new(
            address,
            self.provider.clone(),
        )))
    }
}

#[async_trait::async_trait]
impl traits::ComponentFactory for BytecodeFactory {
    async fn deploy_oracle(
        &self,
        name: ComponentName,
        registry: Address,
        from: Account,
    ) -> Result<Box<dyn traits::ComponentHandle>, ServiceError> {
        let args = (B256::new(name.to_bytes()), registry).abi_encode_params();
        self.deploy([self.oracle_bytecode.as_ref(), &args].concat(), from)
            .await
    }

    async fn deploy_product(
        &self,
        name: ComponentName,
        registry: Address,
        oracle_id: ComponentId,
        from: Account,
    ) -> Result<Box<dyn traits::ComponentHandle>, ServiceError> {
        let args = (B256::new(name.to_bytes()), registry, oracle_id.0).abi_encode_params();
        self.deploy([self.product_bytecode.as_ref(), &args].concat(), from)
            .await
    }
}

pub struct OnchainComponent {
    contract: contracts::Component,
}

impl OnchainComponent {
    fn new(address: Address, provider: DynProvider) -> Self {
        Self {
            contract: contracts::Component::new(address, provider),
        }
    }
}

#[async_trait::async_trait]
impl traits::ComponentHandle for OnchainComponent {
    fn address(&self) -> Address {
        *self.contract.address()
    }

    async fn id(&self) -> Result<ComponentId, ServiceError> {
        self.contract
            .getId()
            .call()
            .await
            .map(ComponentId)
            .map_err(contract_error)
    }
}

/// Waits for a sent transaction to be mined and checks it did not revert.
async fn settled(pending: PendingTransactionBuilder<Ethereum>) -> Result<(), ServiceError> {
    let receipt = pending
        .get_receipt()
        .await
        .map_err(|err| ServiceError::Transport(err.into()))?;
    committed(&receipt)
}

fn committed(receipt: &TransactionReceipt) -> Result<(), ServiceError> {
    if receipt.status() {
        Ok(())
    } else {
        Err(ServiceError::Rejected(format!(
            "transaction {:?} reverted",
            receipt.transaction_hash
        )))
    }
}

/// Classifies a contract call failure. Revert data on the RPC error response
/// distinguishes an instance rejection from plain transport trouble; the
/// same goes for everything that is not transport related at all.
fn contract_error(err: ContractError) -> ServiceError {
    match &err {
        ContractError::TransportError(RpcError::ErrorResp(resp))
            if resp.as_revert_data().is_some() =>
        {
            ServiceError::Rejected(resp.message.to_string())
        }
        ContractError::TransportError(_) => ServiceError::Transport(err.into()),
        _ => ServiceError::Rejected(err.to_string()),
    }
}

fn rpc_error(err: TransportError) -> ServiceError {
    match &err {
        RpcError::ErrorResp(resp) if resp.as_revert_data().is_some() => {
            ServiceError::Rejected(resp.message.to_string())
        }
        _ => ServiceError::Transport(err.into()),
    }
}
