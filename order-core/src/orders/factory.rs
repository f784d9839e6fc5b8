//! Order Factory
//!
//! Converts a cart snapshot plus delivery details into an immutable [`Order`].
//! The factory has no side effects: clearing the cart and installing the
//! order as the active order is the caller's job.

use super::{OrderError, OrderResult};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_field,
    validate_required_field,
};
use shared::order::{CartLine, DeliveryDetails, DeliveryDraft, Order, OrderStatus, PaymentMethod};
use shared::util::{now_millis, order_id};

/// Create a `Preparing` order from `cart`.
///
/// # Errors
///
/// - [`OrderError::EmptyCart`] when `cart` has no lines
/// - [`OrderError::IncompleteDelivery`] when the contact name, address or
///   coordinates are missing (non-finite coordinates count as missing)
/// - [`OrderError::Validation`] when a text field exceeds its length limit
pub fn create_order(
    cart: &[CartLine],
    draft: &DeliveryDraft,
    payment_method: PaymentMethod,
) -> OrderResult<Order> {
    if cart.is_empty() {
        return Err(OrderError::EmptyCart);
    }

    let delivery = validate_delivery(draft, payment_method)?;
    // Owned copy: later cart edits must not reach the placed order
    let lines: Vec<CartLine> = cart.to_vec();
    let total_minor = order_total(&lines)?;

    let order = Order {
        id: order_id(),
        lines,
        total_minor,
        created_at: now_millis(),
        status: OrderStatus::Preparing,
        delivery,
        completed_at: None,
        rating: None,
    };

    tracing::info!(
        order_id = %order.id,
        lines = order.lines.len(),
        total_minor = order.total_minor,
        payment_method = %payment_method,
        "Order created"
    );
    Ok(order)
}

/// Σ line totals; an overflowing total cannot be charged
fn order_total(lines: &[CartLine]) -> OrderResult<i64> {
    lines
        .iter()
        .try_fold(0i64, |acc, line| {
            line.checked_total_minor()
                .and_then(|total| acc.checked_add(total))
        })
        .ok_or_else(|| OrderError::Validation("order total out of range".to_string()))
}

fn validate_delivery(
    draft: &DeliveryDraft,
    payment_method: PaymentMethod,
) -> OrderResult<DeliveryDetails> {
    let contact_name = validate_required_field(&draft.contact_name, "contact_name", MAX_NAME_LEN)?;
    let address = validate_required_field(&draft.address, "address", MAX_ADDRESS_LEN)?;
    let contact_phone =
        validate_optional_field(&draft.contact_phone, "contact_phone", MAX_SHORT_TEXT_LEN)?;
    let coordinates = draft
        .coordinates
        .filter(|c| c.is_finite())
        .ok_or(OrderError::IncompleteDelivery {
            field: "coordinates",
        })?;

    Ok(DeliveryDetails {
        contact_name,
        contact_phone,
        address,
        payment_method,
        coordinates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartStore;
    use crate::orders::test_support::{complete_draft, egg_burger};
    use shared::models::Coordinates;
    use shared::order::QuantityChange;

    #[test]
    fn test_empty_cart_fails() {
        let err = create_order(&[], &complete_draft(), PaymentMethod::SavedCard).unwrap_err();
        assert!(matches!(err, OrderError::EmptyCart));
    }

    #[test]
    fn test_egg_burger_order() {
        let mut cart = CartStore::new();
        cart.add_item(&egg_burger(), 2);

        let order =
            create_order(cart.lines(), &complete_draft(), PaymentMethod::CashOnDelivery).unwrap();

        assert_eq!(order.total_minor, 100000);
        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.delivery.payment_method, PaymentMethod::CashOnDelivery);
        assert!(order.created_at > 0);
        assert!(order.completed_at.is_none());
    }

    #[test]
    fn test_order_lines_unaffected_by_later_cart_changes() {
        let mut cart = CartStore::new();
        cart.add_item(&egg_burger(), 2);
        let order = create_order(cart.lines(), &complete_draft(), PaymentMethod::SavedCard).unwrap();
        let lines_before = order.lines.clone();

        cart.update_quantity(1, QuantityChange::Increase);
        cart.remove_item(1);
        cart.clear();

        assert_eq!(order.lines, lines_before);
        assert_eq!(order.lines[0].quantity, 2);
        assert_eq!(order.total_minor, 100000);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut cart = CartStore::new();
        cart.add_item(&egg_burger(), 1);
        let a = create_order(cart.lines(), &complete_draft(), PaymentMethod::SavedCard).unwrap();
        let b = create_order(cart.lines(), &complete_draft(), PaymentMethod::SavedCard).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_missing_required_fields() {
        let mut cart = CartStore::new();
        cart.add_item(&egg_burger(), 1);

        let mut draft = complete_draft();
        draft.contact_name = "  ".to_string();
        let err = create_order(cart.lines(), &draft, PaymentMethod::SavedCard).unwrap_err();
        assert!(matches!(err, OrderError::IncompleteDelivery { field: "contact_name" }));

        let mut draft = complete_draft();
        draft.address.clear();
        let err = create_order(cart.lines(), &draft, PaymentMethod::SavedCard).unwrap_err();
        assert!(matches!(err, OrderError::IncompleteDelivery { field: "address" }));

        let mut draft = complete_draft();
        draft.coordinates = None;
        let err = create_order(cart.lines(), &draft, PaymentMethod::SavedCard).unwrap_err();
        assert!(matches!(err, OrderError::IncompleteDelivery { field: "coordinates" }));

        let draft = complete_draft().with_coordinates(Coordinates::new(f64::NAN, 79.8));
        let err = create_order(cart.lines(), &draft, PaymentMethod::SavedCard).unwrap_err();
        assert!(matches!(err, OrderError::IncompleteDelivery { field: "coordinates" }));
    }

    #[test]
    fn test_overflowing_total_rejected() {
        let mut gold = egg_burger();
        gold.price_minor = i64::MAX / 2;
        let mut cart = CartStore::new();
        cart.add_item(&gold, 2);
        cart.add_item(&egg_burger(), 1);

        let err = create_order(cart.lines(), &complete_draft(), PaymentMethod::SavedCard).unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
    }

    #[test]
    fn test_phone_is_optional() {
        let mut cart = CartStore::new();
        cart.add_item(&egg_burger(), 1);
        let mut draft = complete_draft();
        draft.contact_phone.clear();

        let order = create_order(cart.lines(), &draft, PaymentMethod::SavedCard).unwrap();
        assert_eq!(order.delivery.contact_phone, None);
    }
}
