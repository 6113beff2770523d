//! Two-armed result type returned by every use case.
//!
//! # Design
//! `Outcome` is a plain enum so the common path (`match`, `into_result`,
//! `result()`) cannot touch the wrong arm. The `get_result` / `get_error`
//! accessors exist for callers that already checked `is_successful`; calling
//! them on the wrong arm is a programmer error and panics instead of
//! returning a default.

/// Either the value a use case produced or the error it failed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, E> {
    Success(T),
    Failure(E),
}

impl<T, E> Outcome<T, E> {
    pub fn success(value: T) -> Self {
        Outcome::Success(value)
    }

    pub fn failure(error: E) -> Self {
        Outcome::Failure(error)
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(error) => Some(error),
        }
    }

    /// Take the success value.
    ///
    /// # Panics
    /// If the outcome is a `Failure`.
    #[track_caller]
    pub fn get_result(self) -> T {
        match self {
            Outcome::Success(value) => value,
            Outcome::Failure(_) => panic!("get_result() called on a failed outcome"),
        }
    }

    /// Take the failure value.
    ///
    /// # Panics
    /// If the outcome is a `Success`.
    #[track_caller]
    pub fn get_error(self) -> E {
        match self {
            Outcome::Success(_) => panic!("get_error() called on a successful outcome"),
            Outcome::Failure(error) => error,
        }
    }

    pub fn into_result(self) -> Result<T, E> {
        self.into()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, E> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(error) => Outcome::Failure(error),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        match outcome {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_exposes_value() {
        let outcome: Outcome<u32, String> = Outcome::success(7);
        assert!(outcome.is_successful());
        assert_eq!(outcome.result(), Some(&7));
        assert!(outcome.error().is_none());
        assert_eq!(outcome.get_result(), 7);
    }

    #[test]
    fn failure_exposes_error() {
        let outcome: Outcome<u32, String> = Outcome::failure("boom".to_string());
        assert!(!outcome.is_successful());
        assert!(outcome.result().is_none());
        assert_eq!(outcome.error().map(String::as_str), Some("boom"));
        assert_eq!(outcome.get_error(), "boom");
    }

    #[test]
    #[should_panic(expected = "get_error() called on a successful outcome")]
    fn get_error_on_success_panics() {
        let outcome: Outcome<u32, String> = Outcome::success(1);
        outcome.get_error();
    }

    #[test]
    #[should_panic(expected = "get_result() called on a failed outcome")]
    fn get_result_on_failure_panics() {
        let outcome: Outcome<u32, String> = Outcome::failure("nope".to_string());
        outcome.get_result();
    }

    #[test]
    fn converts_to_and_from_result() {
        let ok: Outcome<u8, &str> = Ok(3).into();
        assert_eq!(ok, Outcome::Success(3));
        let err: Result<u8, &str> = Outcome::failure("bad").into_result();
        assert_eq!(err, Err("bad"));
    }

    #[test]
    fn map_only_touches_success() {
        let doubled = Outcome::<u8, &str>::success(4).map(|v| v * 2);
        assert_eq!(doubled, Outcome::Success(8));
        let untouched = Outcome::<u8, &str>::failure("x").map(|v| v * 2);
        assert_eq!(untouched, Outcome::Failure("x"));
    }
}
