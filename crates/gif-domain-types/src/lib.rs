//! Domain types shared by the GIF provisioning crates. These mirror the
//! vocabulary of a deployed instance (components, roles, policies) without
//! pulling in any of the RPC plumbing.

pub mod state;

use {
    alloy_primitives::{Address, B256, U256},
    std::fmt,
};

/// Registry-assigned component identity.
///
/// The registry hands out the definitive id while a component is being
/// proposed; a value read before that point is provisional and must not be
/// persisted or passed to an approval call.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ComponentId(pub U256);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Access-control role identifier as the instance operator service hands it
/// out. Opaque to this code; only ever passed back to the instance.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RoleId(pub B256);

/// Identifies an issued policy (a process id in instance terms).
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct PolicyId(pub B256);

impl std::str::FromStr for PolicyId {
    type Err = <B256 as std::str::FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl fmt::Debug for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifies an oracle data request issued by a product.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct RequestId(pub U256);

/// External signing identity, referenced by address only. Key custody stays
/// with the node or wallet that owns the account; whoever holds the key is
/// the exclusive authority to sign on its behalf.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Account(pub Address);

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Component name in the fixed-width encoding the component contract
/// constructors expect: ASCII, right-padded with zero bytes to 32 bytes.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct ComponentName([u8; 32]);

impl ComponentName {
    pub fn new(name: &str) -> Result<Self, InvalidName> {
        if !name.is_ascii() {
            return Err(InvalidName::NotAscii);
        }
        if name.len() > 32 {
            return Err(InvalidName::TooLong(name.len()));
        }
        let mut bytes = [0; 32];
        bytes[..name.len()].copy_from_slice(name.as_bytes());
        Ok(Self(bytes))
    }

    /// The wire encoding passed to contract constructors and the registry.
    pub fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    pub fn as_str(&self) -> &str {
        let len = self
            .0
            .iter()
            .position(|byte| *byte == 0)
            .unwrap_or(self.0.len());
        // Construction only accepts ASCII.
        std::str::from_utf8(&self.0[..len]).expect("component name is ascii")
    }
}

impl std::str::FromStr for ComponentName {
    type Err = InvalidName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Debug for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentName({:?})", self.as_str())
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InvalidName {
    #[error("component names are at most 32 bytes, got {0}")]
    TooLong(usize),
    #[error("component names must be ascii")]
    NotAscii,
}

/// Lifecycle discriminant of an issued policy.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PolicyState {
    Active,
    Expired,
    Closed,
}

/// Read-only snapshot of an issued policy as the policy controller reports
/// it. Nothing in this workspace ever creates or mutates one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Policy {
    pub state: PolicyState,
    pub premium: U256,
    pub sum_insured: U256,
    pub created_at: U256,
    pub updated_at: U256,
}
