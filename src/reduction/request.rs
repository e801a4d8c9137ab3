//! One-or-many requests and results.
//!
//! Moment orders and quantile probabilities may be requested singly or as an
//! ordered list. Internally every request is handled as a slice; the variant
//! is only used to hand back a result of the same arity.
use crate::errors::{WStatError, WStatResult};

/// A single request or an ordered list of requests (and the matching results).
#[derive(Debug, Clone, PartialEq)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value),
            OneOrMany::Many(values) => values,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn is_one(&self) -> bool {
        matches!(self, OneOrMany::One(_))
    }

    /// Flatten into a vector, preserving order.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }

    /// The single value of a `One`; `None` for `Many`.
    pub fn into_one(self) -> Option<T> {
        match self {
            OneOrMany::One(value) => Some(value),
            OneOrMany::Many(_) => None,
        }
    }

    /// Apply a fallible map while keeping the arity.
    pub fn try_map<U, F>(self, mut f: F) -> WStatResult<OneOrMany<U>>
    where
        F: FnMut(T) -> WStatResult<U>,
    {
        match self {
            OneOrMany::One(value) => Ok(OneOrMany::One(f(value)?)),
            OneOrMany::Many(values) => {
                Ok(OneOrMany::Many(values.into_iter().map(f).collect::<WStatResult<Vec<U>>>()?))
            }
        }
    }
}

macro_rules! impl_one_or_many_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for OneOrMany<$t> {
                fn from(value: $t) -> Self {
                    OneOrMany::One(value)
                }
            }

            impl From<Vec<$t>> for OneOrMany<$t> {
                fn from(values: Vec<$t>) -> Self {
                    OneOrMany::Many(values)
                }
            }

            impl From<&[$t]> for OneOrMany<$t> {
                fn from(values: &[$t]) -> Self {
                    OneOrMany::Many(values.to_vec())
                }
            }

            impl<const N: usize> From<[$t; N]> for OneOrMany<$t> {
                fn from(values: [$t; N]) -> Self {
                    OneOrMany::Many(values.to_vec())
                }
            }
        )*
    };
}

impl_one_or_many_from!(u32, f64);

/// Reject empty moment lists and orders that do not fit `powi`.
pub fn validate_moments(moments: &OneOrMany<u32>) -> WStatResult<()> {
    if moments.is_empty() {
        return Err(WStatError::EmptyMomentRequest);
    }
    if let Some(&order) = moments.as_slice().iter().find(|&&k| k > i32::MAX as u32) {
        return Err(WStatError::MomentOrderTooLarge { order });
    }
    Ok(())
}
