use std::error::Error;

pub(crate) trait ResultExtension<T, E: Error> {
    /// A method similar to [`Result::unwrap`], except that it applies only to types which implement
    /// [`Error`] and panics with the message of the error itself.
    ///
    /// # Panics
    /// Panics if the [`Result`] is an [`Err`].
    fn throw(self) -> T;

    /// Surfaces the error in strict mode and swallows it otherwise, leaving [`None`] in its place.
    fn strictly(self, strict: bool) -> Result<Option<T>, E>;
}

impl<T, E: Error> ResultExtension<T, E> for Result<T, E> {
    fn throw(self) -> T {
        match self {
            Ok(val) => val,
            Err(error) => panic!("{}", error),
        }
    }

    fn strictly(self, strict: bool) -> Result<Option<T>, E> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(error) if strict => Err(error),
            Err(_) => Ok(None),
        }
    }
}
