use crate::application::menu_service::MenuService;
use crate::domain::cart::Cart;
use crate::domain::error::DomainError;
use crate::domain::menu::{Menu, MenuRecord};
use crate::domain::order::{CartItem, CartItemView, CheckoutRequest, Order, OrderView};
use crate::domain::price::{PriceFormat, format_price};
use crate::domain::repository::{CategoryRepository, MenuRepository, OrderRepository, UserRepository};
use crate::domain::validation::validate_checkout;
use anyhow::Result;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

pub struct OrderService<O, M, C, U>
where
    O: OrderRepository,
    M: MenuRepository,
    C: CategoryRepository,
    U: UserRepository,
{
    orders: Arc<O>,
    menus: Arc<MenuService<M, C>>,
    users: Arc<U>,
    delivery_fee: Decimal,
}

impl<O, M, C, U> OrderService<O, M, C, U>
where
    O: OrderRepository,
    M: MenuRepository,
    C: CategoryRepository,
    U: UserRepository,
{
    pub fn new(
        orders: Arc<O>,
        menus: Arc<MenuService<M, C>>,
        users: Arc<U>,
        delivery_fee: Decimal,
    ) -> Self {
        Self {
            orders,
            menus,
            users,
            delivery_fee,
        }
    }

    pub fn delivery_fee(&self) -> Decimal {
        self.delivery_fee
    }

    /// Places an order for `user_id`. Prices come from the stored menus,
    /// never from the submitted cart. The menus stay held by the order so
    /// they cannot be deleted underneath it.
    #[instrument(skip(self, req), fields(lines = req.cart.len()))]
    pub async fn checkout(&self, user_id: &str, req: CheckoutRequest) -> Result<Order> {
        let req = validate_checkout(&req)?;

        if self.users.find_user_by_id(user_id).await?.is_none() {
            return Err(DomainError::not_found(format!("User {user_id} not found")).into());
        }

        let mut menu_ids: Vec<String> = Vec::new();
        for line in &req.cart {
            if !menu_ids.contains(&line.menu.id) {
                menu_ids.push(line.menu.id.clone());
            }
        }
        let held = self.menus.hold(&menu_ids).await?;

        match self.place(user_id, req, held).await {
            Ok(order) => Ok(order),
            Err(e) => {
                warn!(error = %e, "Checkout failed, releasing menus");
                self.menus.release(&menu_ids).await?;
                Err(e)
            }
        }
    }

    async fn place(
        &self,
        user_id: &str,
        req: CheckoutRequest,
        held: Vec<MenuRecord>,
    ) -> Result<Order> {
        // Re-price the submitted lines against the catalogue.
        let catalogue: HashMap<String, Menu> = held
            .into_iter()
            .map(|record| (record.id.clone(), Menu::from_parts(record, Vec::new(), Vec::new())))
            .collect();
        let mut priced = Cart::new();
        for line in &req.cart {
            let menu = catalogue
                .get(&line.menu.id)
                .cloned()
                .ok_or_else(|| DomainError::not_found(format!("Menu {} not found", line.menu.id)))?;
            priced.add_to_cart(menu, line.size, line.quantity)?;
        }

        let order_id = Uuid::new_v4().to_string();
        let cart_items = priced
            .lines
            .iter()
            .map(|line| CartItem {
                id: Uuid::new_v4().to_string(),
                menu_id: line.menu.id.clone(),
                size: line.size,
                quantity: line.quantity,
                unit_price: line.menu.price,
                order_id: order_id.clone(),
            })
            .collect();

        let order = Order {
            id: order_id,
            user_id: user_id.to_string(),
            paid: false,
            created_at: Utc::now(),
            customer_name: req.customer_name,
            email: req.email,
            street: req.street,
            city: req.city,
            phone: req.phone,
            delivery_fee: self.delivery_fee,
            total: priced.total(self.delivery_fee),
            cart_items,
        };
        self.orders.save_order(order.clone()).await?;

        info!(
            order_id = %order.id,
            user_id = %order.user_id,
            items = priced.item_count(),
            total = %order.total,
            "Order placed"
        );
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<OrderView>> {
        let orders = self.orders.orders_for_user(user_id).await?;
        let user = self.users.find_user_by_id(user_id).await?;
        debug!(count = orders.len(), "Orders loaded");

        let mut views = Vec::with_capacity(orders.len());
        for order in orders {
            let mut cart_items = Vec::with_capacity(order.cart_items.len());
            for item in order.cart_items {
                let menu = self.menus.get(&item.menu_id).await?;
                cart_items.push(CartItemView { item, menu });
            }
            views.push(OrderView {
                formatted_total: format_price(order.total, PriceFormat::default()),
                id: order.id,
                paid: order.paid,
                created_at: order.created_at,
                customer_name: order.customer_name,
                email: order.email,
                street: order.street,
                city: order.city,
                phone: order.phone,
                delivery_fee: order.delivery_fee,
                total: order.total,
                user: user.clone(),
                cart_items,
            });
        }
        Ok(views)
    }

    #[instrument(skip(self))]
    pub async fn mark_paid(&self, order_id: &str) -> Result<Order> {
        let mut order = self
            .orders
            .find_order_by_id(order_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Order {order_id} not found")))?;
        if !order.paid {
            order.paid = true;
            self.orders.save_order(order.clone()).await?;
            info!(order_id = %order.id, "Order marked as paid");
        }
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::category_repository::InMemoryCategoryRepository;
    use crate::data::menu_repository::InMemoryMenuRepository;
    use crate::data::order_repository::InMemoryOrderRepository;
    use crate::data::user_repository::InMemoryUserRepository;
    use crate::domain::cart::CartLine;
    use crate::domain::category::Category;
    use crate::domain::menu::{Menu, MenuForm, MenuSize};
    use crate::domain::user::{LoginProvider, Role, User};
    use std::str::FromStr;

    type Service = OrderService<
        InMemoryOrderRepository,
        InMemoryMenuRepository,
        InMemoryCategoryRepository,
        InMemoryUserRepository,
    >;

    struct Fixture {
        service: Service,
        menus: Arc<MenuService<InMemoryMenuRepository, InMemoryCategoryRepository>>,
        user_id: String,
    }

    async fn fixture() -> Fixture {
        let orders = Arc::new(InMemoryOrderRepository::new());
        let categories = Arc::new(InMemoryCategoryRepository::new());
        categories
            .insert_category(Category {
                id: "cat".to_string(),
                name: "Mains".to_string(),
            })
            .await
            .unwrap();
        let menus = Arc::new(MenuService::new(
            Arc::new(InMemoryMenuRepository::new()),
            categories,
        ));
        let users = Arc::new(InMemoryUserRepository::new());
        users
            .insert_user(User {
                id: "u1".to_string(),
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password_hash: None,
                role: Role::User,
                login: LoginProvider::Credentials,
                image: None,
                street: None,
                city: None,
                phone: None,
            })
            .await
            .unwrap();

        Fixture {
            service: OrderService::new(orders, menus.clone(), users, Decimal::TWO),
            menus,
            user_id: "u1".to_string(),
        }
    }

    async fn create_menu(fx: &Fixture, name: &str, price: &str) -> Menu {
        fx.menus
            .create(MenuForm {
                menu_name: name.to_string(),
                menu_description: "Good".to_string(),
                menu_image: vec![],
                menu_size: MenuSize::Normal,
                menu_category: vec!["cat".to_string()],
                menu_price: price.to_string(),
            })
            .await
            .unwrap()
    }

    fn checkout(lines: Vec<CartLine>) -> CheckoutRequest {
        CheckoutRequest {
            cart: lines,
            customer_name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            street: "Main St 1".to_string(),
            city: "Springfield".to_string(),
            phone: "555 0100".to_string(),
        }
    }

    fn domain_err(err: anyhow::Error) -> DomainError {
        err.downcast::<DomainError>().expect("domain error")
    }

    #[tokio::test]
    async fn test_checkout_uses_catalogue_prices() {
        let fx = fixture().await;
        let burger = create_menu(&fx, "Burger", "8.50").await;
        let mut tampered = burger.clone();
        tampered.price = Decimal::ZERO;

        let order = fx
            .service
            .checkout(
                &fx.user_id,
                checkout(vec![CartLine {
                    menu: tampered,
                    size: MenuSize::Small,
                    quantity: 3,
                }]),
            )
            .await
            .unwrap();

        assert!(!order.paid);
        assert_eq!(order.cart_items.len(), 1);
        assert_eq!(order.cart_items[0].unit_price, Decimal::from_str("8.50").unwrap());
        assert_eq!(order.total, Decimal::from_str("27.50").unwrap());
    }

    #[tokio::test]
    async fn test_checkout_unknown_menu_is_not_found() {
        let fx = fixture().await;
        let mut ghost = create_menu(&fx, "Ghost", "5").await;
        ghost.id = "missing".to_string();

        let err = fx
            .service
            .checkout(
                &fx.user_id,
                checkout(vec![CartLine {
                    menu: ghost,
                    size: MenuSize::Normal,
                    quantity: 1,
                }]),
            )
            .await
            .unwrap_err();
        assert!(matches!(domain_err(err), DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_ordered_menu_cannot_be_deleted() {
        let fx = fixture().await;
        let soup = create_menu(&fx, "Soup", "4").await;
        fx.service
            .checkout(
                &fx.user_id,
                checkout(vec![CartLine {
                    menu: soup.clone(),
                    size: MenuSize::Normal,
                    quantity: 1,
                }]),
            )
            .await
            .unwrap();

        let err = fx.menus.delete(&soup.id).await.unwrap_err();
        assert!(matches!(domain_err(err), DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_checkout_racing_delete_never_orphans_order() {
        let fx = fixture().await;
        let soup = create_menu(&fx, "Soup", "4").await;
        let req = checkout(vec![CartLine {
            menu: soup.clone(),
            size: MenuSize::Normal,
            quantity: 1,
        }]);

        let (placed, deleted) = tokio::join!(
            fx.service.checkout(&fx.user_id, req),
            fx.menus.delete(&soup.id)
        );

        assert!(placed.is_ok() != deleted.is_ok());
        if placed.is_ok() {
            assert!(matches!(domain_err(deleted.unwrap_err()), DomainError::Conflict(_)));
            let views = fx.service.list_for_user(&fx.user_id).await.unwrap();
            assert_eq!(views[0].cart_items[0].menu.name, "Soup");
        } else {
            assert!(matches!(domain_err(placed.unwrap_err()), DomainError::NotFound(_)));
        }
    }

    #[tokio::test]
    async fn test_rejected_checkout_keeps_menus_deletable() {
        let fx = fixture().await;
        let soup = create_menu(&fx, "Soup", "4").await;
        let mut ghost = soup.clone();
        ghost.id = "missing".to_string();

        let lines = [soup.clone(), ghost]
            .into_iter()
            .map(|menu| CartLine {
                menu,
                size: MenuSize::Normal,
                quantity: 1,
            })
            .collect();
        assert!(fx.service.checkout(&fx.user_id, checkout(lines)).await.is_err());

        fx.menus.delete(&soup.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_and_mark_paid() {
        let fx = fixture().await;
        let soup = create_menu(&fx, "Soup", "4").await;
        let line = CartLine {
            menu: soup,
            size: MenuSize::Normal,
            quantity: 1,
        };
        let first = fx.service.checkout(&fx.user_id, checkout(vec![line.clone()])).await.unwrap();
        let second = fx.service.checkout(&fx.user_id, checkout(vec![line])).await.unwrap();

        let views = fx.service.list_for_user(&fx.user_id).await.unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].id, second.id);
        assert_eq!(views[0].cart_items[0].menu.name, "Soup");
        assert_eq!(views[0].user.as_ref().unwrap().username, "alice");
        assert_eq!(views[0].formatted_total, "€6");

        let paid = fx.service.mark_paid(&first.id).await.unwrap();
        assert!(paid.paid);
        let err = fx.service.mark_paid("nope").await.unwrap_err();
        assert!(matches!(domain_err(err), DomainError::NotFound(_)));
    }
}
