//! `sol!` bindings for the on-chain side of a deployed GIF instance.
//!
//! Only the surface this workspace talks to is declared here: the registry
//! lookup, the two authorization services, the policy controller read path,
//! and the component getters shared by oracles and products. The contracts
//! themselves are deployed and maintained elsewhere.

pub use alloy::providers::DynProvider as Provider;

alloy::sol! {
    /// Name-indexed address book of a deployed instance. Every module and
    /// service registers under a fixed-width name.
    #[sol(rpc)]
    interface IRegistry {
        function getContract(bytes32 contractName) external view returns (address moduleAddress);
    }

    /// Privileged operations of the instance operator.
    #[sol(rpc)]
    interface IInstanceOperatorService {
        function oracleProviderRole() external view returns (bytes32 role);
        function productOwnerRole() external view returns (bytes32 role);
        function addRoleToAccount(address account, bytes32 role) external;
        function approveOracle(uint256 oracleId) external;
        function approveProduct(uint256 productId) external;
    }

    /// Entry point for component owners to submit their component to the
    /// instance.
    #[sol(rpc)]
    interface IComponentOwnerService {
        function propose(address component) external;
    }

    /// Callback surface for oracle providers to deliver requested data.
    #[sol(rpc)]
    interface IOracleService {
        function respond(uint256 requestId, bytes calldata data) external;
    }

    #[sol(rpc)]
    interface IPolicyController {
        enum PolicyState {
            Active,
            Expired,
            Closed
        }

        struct Policy {
            PolicyState state;
            uint256 premiumAmount;
            uint256 sumInsuredAmount;
            uint256 createdAt;
            uint256 updatedAt;
        }

        function getPolicy(bytes32 processId) external view returns (Policy memory policy);
    }

    /// Getters common to all deployed components (oracles and products).
    #[sol(rpc)]
    interface IComponent {
        function getId() external view returns (uint256 id);
        function getName() external view returns (bytes32 name);
        function getOwner() external view returns (address owner);
    }
}

pub type Registry = IRegistry::IRegistryInstance<Provider>;
pub type InstanceOperatorService =
    IInstanceOperatorService::IInstanceOperatorServiceInstance<Provider>;
pub type ComponentOwnerService = IComponentOwnerService::IComponentOwnerServiceInstance<Provider>;
pub type OracleService = IOracleService::IOracleServiceInstance<Provider>;
pub type PolicyController = IPolicyController::IPolicyControllerInstance<Provider>;
pub type Component = IComponent::IComponentInstance<Provider>;
