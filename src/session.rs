use crate::input::Console;

/// Everything one interactive session shares: the store and the console.
///
/// Built once at startup and handed by reference to every operation.
pub struct Session<S, R, W> {
    pub store: S,
    pub console: Console<R, W>,
}

impl<S, R, W> Session<S, R, W> {
    pub fn new(store: S, console: Console<R, W>) -> Self {
        Self { store, console }
    }

    /// Give back the store so it can be closed
    pub fn into_store(self) -> S {
        self.store
    }
}
