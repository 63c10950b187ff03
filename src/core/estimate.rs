//! Estimated values that may be entirely unavailable
//!
//! Intelligence on a dominion can be missing altogether (never scouted).
//! `Estimate` keeps that case explicit: any arithmetic touching an Unknown
//! yields Unknown, never a silently substituted zero.

use std::cmp::Ordering;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A value derived from intelligence: either known (possibly approximate)
/// or entirely unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Estimate<T> {
    Known(T),
    Unknown,
}

impl<T> Estimate<T> {
    pub fn is_known(&self) -> bool {
        matches!(self, Estimate::Known(_))
    }

    /// Convert into `Option`, discarding the distinction for callers that
    /// handle absence themselves.
    pub fn known(self) -> Option<T> {
        match self {
            Estimate::Known(v) => Some(v),
            Estimate::Unknown => None,
        }
    }

    pub fn as_ref(&self) -> Estimate<&T> {
        match self {
            Estimate::Known(v) => Estimate::Known(v),
            Estimate::Unknown => Estimate::Unknown,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Estimate<U> {
        match self {
            Estimate::Known(v) => Estimate::Known(f(v)),
            Estimate::Unknown => Estimate::Unknown,
        }
    }

    pub fn and_then<U, F: FnOnce(T) -> Estimate<U>>(self, f: F) -> Estimate<U> {
        match self {
            Estimate::Known(v) => f(v),
            Estimate::Unknown => Estimate::Unknown,
        }
    }

    /// Combine two estimates; Unknown on either side wins.
    pub fn zip_with<U, V, F: FnOnce(T, U) -> V>(self, other: Estimate<U>, f: F) -> Estimate<V> {
        match (self, other) {
            (Estimate::Known(a), Estimate::Known(b)) => Estimate::Known(f(a, b)),
            _ => Estimate::Unknown,
        }
    }
}

impl<T: PartialOrd> Estimate<T> {
    /// Ordering is only defined between two known values.
    pub fn cmp_known(&self, other: &Estimate<T>) -> Option<Ordering> {
        match (self, other) {
            (Estimate::Known(a), Estimate::Known(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl<T> From<T> for Estimate<T> {
    fn from(value: T) -> Self {
        Estimate::Known(value)
    }
}

impl<T> From<Option<T>> for Estimate<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Estimate::Known(v),
            None => Estimate::Unknown,
        }
    }
}

impl<T: Add<Output = T>> Add for Estimate<T> {
    type Output = Estimate<T>;
    fn add(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl<T: Sub<Output = T>> Sub for Estimate<T> {
    type Output = Estimate<T>;
    fn sub(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl<T: Mul<Output = T>> Mul for Estimate<T> {
    type Output = Estimate<T>;
    fn mul(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a * b)
    }
}

impl<T: Add<Output = T> + Default> Sum for Estimate<T> {
    fn sum<I: Iterator<Item = Estimate<T>>>(iter: I) -> Self {
        let mut acc = Estimate::Known(T::default());
        for item in iter {
            acc = acc + item;
        }
        acc
    }
}
