//! Errors shared by the rules engine and the network layer.

use thiserror::Error;

/// Every fallible operation in the game returns this `Result`.
pub type GameResult<T> = Result<T, GameError>;

/// Errors that can occur while running a game.
#[derive(Debug, Error)]
pub enum GameError {
    /// A precondition of a public operation was violated.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A face-up slot or a list position outside of its bounds.
    #[error("Index {index} is out of range (length is {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The underlying byte stream failed. Fatal for the connection.
    #[error("Transport failure: {0}")]
    Transport(#[from] std::io::Error),

    /// A line or a field received from a peer could not be decoded.
    #[error("Malformed message: {0}")]
    Malformed(String),

    /// The other end of a channel went away while we were waiting on it.
    #[error("Interrupted while waiting for {0}")]
    Interrupted(String),
}

/// Fails with [`GameError::InvalidArgument`] when `condition` does not hold.
///
/// # Example
/// ```
/// use tchu::error::{check_argument, GameError};
///
/// assert!(check_argument(1 + 1 == 2, || "math".to_string()).is_ok());
/// assert!(matches!(
///     check_argument(false, || "nope".to_string()),
///     Err(GameError::InvalidArgument(_))
/// ));
/// ```
#[inline]
pub fn check_argument<F>(condition: bool, message: F) -> GameResult<()>
where
    F: FnOnce() -> String,
{
    if condition {
        Ok(())
    } else {
        Err(GameError::InvalidArgument(message()))
    }
}

/// Fails with [`GameError::IndexOutOfRange`] when `index >= len`.
#[inline]
pub fn check_index(index: usize, len: usize) -> GameResult<usize> {
    if index < len {
        Ok(index)
    } else {
        Err(GameError::IndexOutOfRange { index, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_index_in_range() {
        assert_eq!(check_index(0, 5).ok(), Some(0));
        assert_eq!(check_index(4, 5).ok(), Some(4));
    }

    #[test]
    fn check_index_out_of_range() {
        assert!(matches!(
            check_index(5, 5),
            Err(GameError::IndexOutOfRange { index: 5, len: 5 })
        ));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            GameError::IndexOutOfRange { index: 7, len: 5 }.to_string(),
            "Index 7 is out of range (length is 5)"
        );
        assert_eq!(
            GameError::InvalidArgument("bad".into()).to_string(),
            "Invalid argument: bad"
        );
    }

    #[test]
    fn io_error_converts_to_transport() {
        let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let error: GameError = io_error.into();
        assert!(matches!(error, GameError::Transport(_)));
    }
}
