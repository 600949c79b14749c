//! Processing steps recorded on an entity, in the order they were applied.

use crate::id::Topping;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One processing step applied to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operation {
    CookFryer,
    CookMicrowave,
    CookGrill,
    Dock,
    Flatten,
    DispenseFluid(Topping),
    /// Two fluids dispensed together. Always stored with the lower topping
    /// first; build it with [`Operation::mixed`].
    DispenseFluidMixed(Topping, Topping),
    CoatFluid(Topping),
    DispenseTopping(Topping),
}

impl Operation {
    /// Mixed dispense of two distinct toppings, order-normalized.
    ///
    /// Returns `None` when both toppings are the same.
    pub fn mixed(a: Topping, b: Topping) -> Option<Operation> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Operation::DispenseFluidMixed(a, b)),
            std::cmp::Ordering::Greater => Some(Operation::DispenseFluidMixed(b, a)),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::CookFryer => f.write_str("CookFryer"),
            Operation::CookMicrowave => f.write_str("CookMicrowave"),
            Operation::CookGrill => f.write_str("CookGrill"),
            Operation::Dock => f.write_str("Dock"),
            Operation::Flatten => f.write_str("Flatten"),
            Operation::DispenseFluid(t) => write!(f, "DispenseFluid({t})"),
            Operation::DispenseFluidMixed(a, b) => write!(f, "DispenseFluidMixed({a}, {b})"),
            Operation::CoatFluid(t) => write!(f, "CoatFluid({t})"),
            Operation::DispenseTopping(t) => write!(f, "DispenseTopping({t})"),
        }
    }
}
