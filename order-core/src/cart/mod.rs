//! Cart Store
//!
//! Mutable collection of cart lines owned by the session. Lines keep their
//! insertion order; `product_id` is unique and every quantity is at least 1.
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | `add_item` | merge into the existing line or append a new one |
//! | `remove_item` | the only way a line disappears (besides `clear`) |
//! | `update_quantity` | +1 / -1, decrement floors at 1 |
//! | `clear` | after checkout and on logout |

use shared::models::MenuItem;
use shared::order::{CartLine, QuantityChange};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartStore {
    lines: Vec<CartLine>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of `item`.
    ///
    /// A zero quantity counts as 1.
    pub fn add_item(&mut self, item: &MenuItem, quantity: u32) {
        let quantity = quantity.max(1);
        match self.line_mut(item.id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(quantity);
                tracing::debug!(product_id = item.id, quantity = line.quantity, "Cart line merged");
            }
            None => {
                self.lines.push(CartLine::from_item(item, quantity));
                tracing::debug!(product_id = item.id, quantity, "Cart line added");
            }
        }
    }

    /// Delete the line for `product_id`; absent ids are a no-op.
    pub fn remove_item(&mut self, product_id: i64) -> Option<CartLine> {
        let index = self.lines.iter().position(|l| l.product_id == product_id)?;
        tracing::debug!(product_id, "Cart line removed");
        Some(self.lines.remove(index))
    }

    /// Step the quantity of `product_id` by one.
    ///
    /// Returns the new quantity, `None` when the product is not in the cart.
    pub fn update_quantity(&mut self, product_id: i64, change: QuantityChange) -> Option<u32> {
        let line = self.line_mut(product_id)?;
        line.quantity = match change {
            QuantityChange::Increase => line.quantity.saturating_add(1),
            QuantityChange::Decrease => line.quantity.saturating_sub(1).max(1),
        };
        Some(line.quantity)
    }

    pub fn clear(&mut self) {
        if !self.lines.is_empty() {
            tracing::debug!(lines = self.lines.len(), "Cart cleared");
        }
        self.lines.clear();
    }

    /// Σ unit price × quantity, in minor units (saturating)
    pub fn total_minor(&self) -> i64 {
        self.lines
            .iter()
            .fold(0i64, |acc, line| acc.saturating_add(line.total_minor()))
    }

    /// Number of distinct lines (badge count), not total units
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn get(&self, product_id: i64) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Owned copy of the lines, detached from the live cart
    pub fn snapshot(&self) -> Vec<CartLine> {
        self.lines.clone()
    }

    fn line_mut(&mut self, product_id: i64) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product_id == product_id)
    }
}
