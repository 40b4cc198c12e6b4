//! Running several sessions under one enclosing update.

use reflow_types::{CycleFault, Effects};

/// Thread one session's cycle result into a continuation.
///
/// `next` receives the committed session and builds the composite model plus
/// its own effects, usually by cycling a sibling session. The merged batch
/// lists `cycled`'s effects before the continuation's. Each session keeps its
/// own slot history; siblings run one after another, never interleaved.
///
/// Sessions with different descriptor types are lifted with
/// [`Effects::map`] before composing.
pub fn compose<S, M, E, F>(cycled: (S, Effects<E>), next: F) -> (M, Effects<E>)
where
    F: FnOnce(S) -> (M, Effects<E>),
{
    let (session, first) = cycled;
    let (model, rest) = next(session);
    (model, first.then(rest))
}

/// [`compose`] over [`Session::try_cycle`](crate::Session::try_cycle)
/// results. The first fault wins; the continuation does not run after one.
pub fn try_compose<S, M, E, F>(
    cycled: Result<(S, Effects<E>), CycleFault>,
    next: F,
) -> Result<(M, Effects<E>), CycleFault>
where
    F: FnOnce(S) -> Result<(M, Effects<E>), CycleFault>,
{
    let (session, first) = cycled?;
    let (model, rest) = next(session)?;
    Ok((model, first.then(rest)))
}
