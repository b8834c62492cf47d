//! Text encodings of game values, and combinators to build encodings of composite values.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt::Debug;
use tchu::bag::SortedBag;
use tchu::{GameError, GameResult};
use tracing::warn;

/// Converts values of type `T` to text and back.
pub trait Serde<T> {
    fn serialize(&self, value: &T) -> String;

    /// Returns [`GameError::Malformed`] if `text` is not the encoding of a `T`.
    fn deserialize(&self, text: &str) -> GameResult<T>;
}

pub(crate) fn malformed(what: &str, text: &str) -> GameError {
    GameError::Malformed(format!("{:?} is not a valid {}", text, what))
}

/// Decimal integers.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntSerde;

macro_rules! int_serde {
    ($($int:ty),*) => {
        $(
            impl Serde<$int> for IntSerde {
                fn serialize(&self, value: &$int) -> String {
                    value.to_string()
                }

                fn deserialize(&self, text: &str) -> GameResult<$int> {
                    text.parse().map_err(|_| malformed(stringify!($int), text))
                }
            }
        )*
    };
}

int_serde!(i32, u32, usize);

/// UTF-8 text, in standard Base64 so it never contains separators.
///
/// # Example
/// ```
/// use tchu_net::codec::{Serde, StringSerde};
///
/// assert_eq!(StringSerde.serialize(&"Charles".to_string()), "Q2hhcmxlcw==");
/// assert_eq!(StringSerde.deserialize("Q2hhcmxlcw==").unwrap(), "Charles");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct StringSerde;

impl Serde<String> for StringSerde {
    fn serialize(&self, value: &String) -> String {
        STANDARD.encode(value.as_bytes())
    }

    fn deserialize(&self, text: &str) -> GameResult<String> {
        let bytes = STANDARD
            .decode(text)
            .map_err(|_| malformed("Base64 string", text))?;
        String::from_utf8(bytes).map_err(|_| malformed("UTF-8 string", text))
    }
}

/// A value among a fixed list, encoded as its position in the list.
#[derive(Clone, Debug)]
pub struct OneOf<T> {
    values: Vec<T>,
}

impl<T: Clone + PartialEq> OneOf<T> {
    pub fn new(values: impl Into<Vec<T>>) -> Self {
        Self {
            values: values.into(),
        }
    }
}

impl<T: Clone + Debug + PartialEq> Serde<T> for OneOf<T> {
    /// Values outside of the list have no encoding, and are serialized as an empty string.
    fn serialize(&self, value: &T) -> String {
        match self.values.iter().position(|candidate| candidate == value) {
            Some(index) => index.to_string(),
            None => {
                warn!(?value, "Serializing a value which cannot be encoded");
                String::new()
            }
        }
    }

    fn deserialize(&self, text: &str) -> GameResult<T> {
        text.parse::<usize>()
            .ok()
            .and_then(|index| self.values.get(index))
            .cloned()
            .ok_or_else(|| malformed("index", text))
    }
}

/// Lists of values, joined by a separator. The empty list is the empty string.
#[derive(Clone, Debug)]
pub struct ListOf<S> {
    element: S,
    separator: char,
}

impl<S> ListOf<S> {
    pub fn new(element: S, separator: char) -> Self {
        Self { element, separator }
    }

    /// Serializes the elements of any slice.
    pub fn serialize_slice<T>(&self, values: &[T]) -> String
    where
        S: Serde<T>,
    {
        values
            .iter()
            .map(|value| self.element.serialize(value))
            .collect::<Vec<_>>()
            .join(&self.separator.to_string())
    }
}

impl<T, S: Serde<T>> Serde<Vec<T>> for ListOf<S> {
    fn serialize(&self, values: &Vec<T>) -> String {
        self.serialize_slice(values)
    }

    fn deserialize(&self, text: &str) -> GameResult<Vec<T>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        text.split(self.separator)
            .map(|part| self.element.deserialize(part))
            .collect()
    }
}

/// Multisets, encoded as the list of their elements in order.
#[derive(Clone, Debug)]
pub struct BagOf<S> {
    list: ListOf<S>,
}

impl<S> BagOf<S> {
    pub fn new(element: S, separator: char) -> Self {
        Self {
            list: ListOf::new(element, separator),
        }
    }
}

impl<T: Ord + Clone, S: Serde<T>> Serde<SortedBag<T>> for BagOf<S> {
    fn serialize(&self, bag: &SortedBag<T>) -> String {
        self.list.serialize_slice(bag.as_slice())
    }

    fn deserialize(&self, text: &str) -> GameResult<SortedBag<T>> {
        let values: Vec<T> = self.list.deserialize(text)?;
        Ok(values.into())
    }
}
