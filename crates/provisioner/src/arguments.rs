use {
    alloy::primitives::Address,
    clap::Parser,
    gif_domain_types::ComponentName,
    std::path::PathBuf,
    url::Url,
};

#[derive(Parser)]
pub struct Arguments {
    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Address of the registry of the instance to provision against.
    #[clap(long, env)]
    pub registry: Address,

    /// Account that owns the instance; signs role grants and approvals.
    #[clap(long, env)]
    pub instance_owner: Address,

    /// Account that will own the provisioned oracle.
    #[clap(long, env)]
    pub oracle_owner: Address,

    /// Account that will own the provisioned product. May differ from the
    /// oracle owner.
    #[clap(long, env)]
    pub product_owner: Address,

    /// Name under which the oracle registers, at most 32 ASCII bytes.
    #[clap(long, env, default_value = "Test.Oracle")]
    pub oracle_name: ComponentName,

    /// Name under which the product registers, at most 32 ASCII bytes.
    #[clap(long, env, default_value = "Test.Product")]
    pub product_name: ComponentName,

    /// Path to the hex-encoded creation bytecode of the oracle contract.
    #[clap(long, env)]
    pub oracle_bytecode: PathBuf,

    /// Path to the hex-encoded creation bytecode of the product contract.
    #[clap(long, env)]
    pub product_bytecode: PathBuf,
}

impl std::fmt::Display for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "node_url: {}", self.node_url)?;
        writeln!(f, "registry: {:?}", self.registry)?;
        writeln!(f, "instance_owner: {:?}", self.instance_owner)?;
        writeln!(f, "oracle_owner: {:?}", self.oracle_owner)?;
        writeln!(f, "product_owner: {:?}", self.product_owner)?;
        writeln!(f, "oracle_name: {}", self.oracle_name)?;
        writeln!(f, "product_name: {}", self.product_name)?;
        writeln!(f, "oracle_bytecode: {}", self.oracle_bytecode.display())?;
        writeln!(f, "product_bytecode: {}", self.product_bytecode.display())?;
        Ok(())
    }
}
