//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers in various ways:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Embed a feature reducer (its own state and action
//!   types) inside a larger application reducer
//!
//! # Examples
//!
//! ```
//! use postboard_core::composition::{combine_reducers, scope_reducer};
//! use postboard_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Default)]
//! struct Counter {
//!     count: i32,
//! }
//!
//! #[derive(Clone)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = Counter;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut Counter, action: CounterAction, _env: &()) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! #[derive(Default)]
//! struct App {
//!     left: Counter,
//!     right: Counter,
//! }
//!
//! #[derive(Clone)]
//! enum AppAction {
//!     Left(CounterAction),
//!     Right(CounterAction),
//! }
//!
//! let app = combine_reducers(vec![
//!     Box::new(scope_reducer(
//!         CounterReducer,
//!         |app: &mut App| &mut app.left,
//!         |action| match action {
//!             AppAction::Left(a) => Some(a),
//!             AppAction::Right(_) => None,
//!         },
//!         AppAction::Left,
//!     )),
//!     Box::new(scope_reducer(
//!         CounterReducer,
//!         |app: &mut App| &mut app.right,
//!         |action| match action {
//!             AppAction::Right(a) => Some(a),
//!             AppAction::Left(_) => None,
//!         },
//!         AppAction::Right,
//!     )),
//! ]);
//!
//! let mut state = App::default();
//! let _ = app.reduce(&mut state, AppAction::Right(CounterAction::Increment), &());
//! assert_eq!(state.left.count, 0);
//! assert_eq!(state.right.count, 1);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;

/// Boxed reducer that can be shared with the runtime's spawned tasks
pub type BoxedReducer<S, A, E> = Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence, and all effects are collected and concatenated.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<BoxedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Vec<BoxedReducer<S, A, E>>,
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects);
        }

        all_effects
    }
}

/// Scopes a feature reducer into a parent state and action.
///
/// - `state`: lens from the parent state to the child state
/// - `extract`: returns the child action if the parent action targets this feature
/// - `embed`: wraps child actions produced by effects back into the parent type
///
/// Parent actions that `extract` rejects are ignored by the scoped reducer.
pub fn scope_reducer<S, SubS, A, SubA, E, R>(
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<SubA>,
    embed: fn(SubA) -> A,
) -> ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    ScopedReducer {
        reducer,
        state,
        extract,
        embed,
        _phantom: std::marker::PhantomData,
    }
}

/// A reducer focused on one feature of a larger application.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<SubA>,
    embed: fn(SubA) -> A,
    _phantom: std::marker::PhantomData<fn() -> E>,
}

impl<S, SubS, A, SubA, E, R> Reducer for ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
    A: 'static,
    SubA: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let Some(child_action) = (self.extract)(action) else {
            return SmallVec::new();
        };

        let child_state = (self.state)(state);
        let embed = self.embed;

        self.reducer
            .reduce(child_state, child_action, env)
            .into_iter()
            .map(|effect| effect.map(embed))
            .collect()
    }
}
