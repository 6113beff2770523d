//! The `UseCase` abstraction: one application operation with typed input and
//! output.
//!
//! `execute` is the only behavior; the callback and async flavors call it and
//! hand its result over unchanged. Compose use cases by calling `execute` on
//! the inner ones.

pub trait UseCase {
    type Params;
    type Output;

    /// Run the operation on the caller's thread.
    fn execute(&self, params: Self::Params) -> Self::Output;

    fn execute_with_callback<F>(&self, params: Self::Params, callback: F)
    where
        F: FnOnce(Self::Output),
    {
        callback(self.execute(params));
    }

    /// Awaitable flavor of `execute`. The work itself still runs through
    /// `execute`; wrap the call in `spawn_blocking` to keep it off an async
    /// executor's worker threads.
    #[allow(async_fn_in_trait)]
    async fn execute_async(&self, params: Self::Params) -> Self::Output {
        self.execute(params)
    }

    #[allow(async_fn_in_trait)]
    async fn execute_async_with_callback<F>(&self, params: Self::Params, callback: F)
    where
        F: FnOnce(Self::Output),
    {
        callback(self.execute_async(params).await);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct Double {
        calls: Cell<u32>,
    }

    impl UseCase for Double {
        type Params = u32;
        type Output = u32;

        fn execute(&self, params: u32) -> u32 {
            self.calls.set(self.calls.get() + 1);
            params * 2
        }
    }

    fn double() -> Double {
        Double { calls: Cell::new(0) }
    }

    #[test]
    fn callback_receives_execute_result() {
        let use_case = double();
        let mut seen = None;
        use_case.execute_with_callback(21, |out| seen = Some(out));
        assert_eq!(seen, Some(42));
        assert_eq!(use_case.calls.get(), 1);
    }

    #[tokio::test]
    async fn async_flavors_go_through_execute() {
        let use_case = double();
        assert_eq!(use_case.execute_async(5).await, 10);

        let mut seen = None;
        use_case.execute_async_with_callback(7, |out| seen = Some(out)).await;
        assert_eq!(seen, Some(14));
        assert_eq!(use_case.calls.get(), 2);
    }
}
