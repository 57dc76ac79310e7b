use crate::data::cart_storage::KeyValueStorage;
use crate::domain::cart::Cart;
use crate::domain::error::DomainError;
use crate::domain::menu::{Menu, MenuSize};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Storage key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// A [`Cart`] that writes itself to storage after every mutation.
pub struct CartStore<S: KeyValueStorage> {
    storage: S,
    cart: Cart,
}

impl<S: KeyValueStorage> CartStore<S> {
    /// Restores the saved cart. A missing or unreadable entry starts empty.
    pub fn open(storage: S) -> Result<Self> {
        let cart = match storage.get_item(CART_STORAGE_KEY)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding corrupt saved cart");
                Cart::new()
            }),
            None => Cart::new(),
        };
        debug!(lines = cart.lines.len(), "Cart restored");
        Ok(Self { storage, cart })
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Writes `next` and only then makes it the live cart, so a failed
    /// write leaves memory and storage in agreement.
    fn commit(&mut self, next: Cart) -> Result<()> {
        let raw = serde_json::to_string(&next).context("serializing cart")?;
        self.storage.set_item(CART_STORAGE_KEY, &raw).inspect_err(|e| {
            warn!(error = %e, "Cart not saved, keeping previous state");
        })?;
        self.cart = next;
        Ok(())
    }

    fn update(&mut self, change: impl FnOnce(&mut Cart) -> Result<(), DomainError>) -> Result<()> {
        let mut next = self.cart.clone();
        change(&mut next)?;
        self.commit(next)
    }

    pub fn add_to_cart(&mut self, menu: Menu, size: MenuSize, quantity: u32) -> Result<()> {
        self.update(|cart| cart.add_to_cart(menu, size, quantity))
    }

    pub fn remove_item(&mut self, menu_id: &str) -> Result<()> {
        self.update(|cart| {
            cart.remove_item(menu_id);
            Ok(())
        })
    }

    pub fn increase_quantity(&mut self, menu_id: &str) -> Result<()> {
        self.update(|cart| {
            cart.increase_quantity(menu_id);
            Ok(())
        })
    }

    pub fn decrease_quantity(&mut self, menu_id: &str) -> Result<()> {
        self.update(|cart| {
            cart.decrease_quantity(menu_id);
            Ok(())
        })
    }

    pub fn clear_cart(&mut self) -> Result<()> {
        self.commit(Cart::new())
    }

    pub fn subtotal(&self) -> Decimal {
        self.cart.subtotal()
    }

    pub fn total(&self, delivery_fee: Decimal) -> Decimal {
        self.cart.total(delivery_fee)
    }

    /// Hands the lines over for checkout and empties the cart.
    pub fn take(&mut self) -> Result<Cart> {
        if self.cart.is_empty() {
            return Err(DomainError::validation("Cart is empty").into());
        }
        let cart = self.cart.clone();
        self.commit(Cart::new())?;
        Ok(cart)
    }
}
