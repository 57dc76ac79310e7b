use crate::domain::error::DomainError;
use crate::domain::menu::{Menu, MenuSize};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub menu: Menu,
    pub size: MenuSize,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.menu.price * Decimal::from(self.quantity)
    }
}

/// Items a customer picked before checkout.
///
/// Lines are kept in insertion order. Adding the same menu twice produces two
/// lines; quantity changes apply to every line of a menu.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_to_cart(&mut self, menu: Menu, size: MenuSize, quantity: u32) -> Result<(), DomainError> {
        if quantity == 0 {
            return Err(DomainError::validation("Quantity must be at least 1"));
        }
        self.lines.push(CartLine {
            menu,
            size,
            quantity,
        });
        Ok(())
    }

    pub fn remove_item(&mut self, menu_id: &str) {
        self.lines.retain(|line| line.menu.id != menu_id);
    }

    pub fn increase_quantity(&mut self, menu_id: &str) {
        for line in self.lines.iter_mut().filter(|l| l.menu.id == menu_id) {
            line.quantity = line.quantity.saturating_add(1);
        }
    }

    /// Lines already at quantity 1 are left alone.
    pub fn decrease_quantity(&mut self, menu_id: &str) {
        for line in self
            .lines
            .iter_mut()
            .filter(|l| l.menu.id == menu_id && l.quantity > 1)
        {
            line.quantity -= 1;
        }
    }

    pub fn clear_cart(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Subtotal plus delivery; an empty cart costs nothing.
    pub fn total(&self, delivery_fee: Decimal) -> Decimal {
        if self.is_empty() {
            Decimal::ZERO
        } else {
            self.subtotal() + delivery_fee
        }
    }
}
