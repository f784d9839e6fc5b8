//! Fixtures shared by order tests

use shared::models::{Coordinates, MenuItem};
use shared::order::{DeliveryDraft, Order, OrderStatus, PaymentMethod};

use super::create_order;

pub fn egg_burger() -> MenuItem {
    MenuItem {
        id: 1,
        category_id: 3,
        name: "Egg Burger".to_string(),
        price_minor: 50000,
        rating: 4.4,
        image: String::new(),
        description: String::new(),
    }
}

pub fn complete_draft() -> DeliveryDraft {
    DeliveryDraft {
        contact_name: "Nimal Perera".to_string(),
        contact_phone: "0771234567".to_string(),
        address: "12 Galle Road, Colombo 03".to_string(),
        coordinates: Some(Coordinates::new(10.0, 20.0)),
    }
}

/// Fresh order for `egg_burger() × 2`, forced into `status`
pub fn order_with_status(status: OrderStatus) -> Order {
    let lines = vec![shared::order::CartLine::from_item(&egg_burger(), 2)];
    let mut order = create_order(&lines, &complete_draft(), PaymentMethod::SavedCard)
        .expect("fixture order");
    order.status = status;
    order
}
