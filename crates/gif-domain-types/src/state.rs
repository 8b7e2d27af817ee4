//! Component provisioning state machine.
//!
//! Provisioning a component against a deployed instance is a two-party
//! workflow: the component owner deploys and proposes, the instance operator
//! grants roles and approves. The table below is the single source of truth
//! for which actor signs which transition; callers resolve the signing
//! account from it instead of inferring it from call order.

/// Progress of a component through the provisioning sequence. Every
/// transition corresponds to exactly one state-mutating remote call; there is
/// no skip, retry, or rollback transition. A failed call halts the sequence
/// in its current state.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ComponentState {
    Unroled,
    RoleGranted,
    Deployed,
    Proposed,
    Approved,
}

/// The actor whose account signs a transition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Actor {
    InstanceOperator,
    ComponentOwner,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Transition {
    pub from: ComponentState,
    pub to: ComponentState,
    pub signer: Actor,
}

const fn transition(from: ComponentState, to: ComponentState, signer: Actor) -> Transition {
    Transition { from, to, signer }
}

pub const TRANSITIONS: [Transition; 4] = [
    transition(
        ComponentState::Unroled,
        ComponentState::RoleGranted,
        Actor::InstanceOperator,
    ),
    transition(
        ComponentState::RoleGranted,
        ComponentState::Deployed,
        Actor::ComponentOwner,
    ),
    transition(
        ComponentState::Deployed,
        ComponentState::Proposed,
        Actor::ComponentOwner,
    ),
    transition(
        ComponentState::Proposed,
        ComponentState::Approved,
        Actor::InstanceOperator,
    ),
];

impl ComponentState {
    /// The transition leaving this state, or `None` for the terminal state.
    pub fn next(self) -> Option<Transition> {
        TRANSITIONS
            .iter()
            .find(|transition| transition.from == self)
            .copied()
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}
