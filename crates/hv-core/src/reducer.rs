//! Reducer abstraction

use crate::action::ActionType;

/// A pure state transition function
///
/// Implementations must not perform I/O or read ambient state: everything a
/// transition needs is either in `state`, in `action`, or owned by the
/// reducer itself (settings, catalogs). A failed transition returns an error
/// and leaves the caller's state untouched.
pub trait Reducer {
    /// State snapshot the reducer operates on
    type State: Clone + Send + Sync + 'static;

    /// Action set the reducer understands
    type Action: ActionType;

    /// Error returned for structurally invalid transitions
    type Error: std::error::Error + Send + Sync + 'static;

    /// Compute the next state
    fn reduce(&self, state: &Self::State, action: Self::Action) -> Result<Self::State, Self::Error>;
}

/// Fold a sequence of actions through a reducer, stopping at the first error
pub fn reduce_all<R, I>(reducer: &R, initial: R::State, actions: I) -> Result<R::State, R::Error>
where
    R: Reducer,
    I: IntoIterator<Item = R::Action>,
{
    actions
        .into_iter()
        .try_fold(initial, |state, action| reducer.reduce(&state, action))
}
