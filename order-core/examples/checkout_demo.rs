//! 下单演示 - 完整流程
//!
//! Logs in, fills a cart, checks out and follows the simulated delivery
//! until the order lands in history.
//!
//! ```bash
//! PREP_DELAY_MS=2000 DELIVERY_TICKS=10 cargo run --example checkout_demo
//! ```

use order_core::{
    Coordinates, LifecycleEvent, Menu, PaymentMethod, ProfileRepository, RedbProfileStore,
    Session, UserProfile, setup_environment,
};
use std::sync::Arc;

const CATALOG: &str = r#"{
    "categories": [{ "id": 3, "name": "Burgers", "icon": "nutrition" }],
    "foodItems": [
        { "id": 13, "categoryId": 3, "name": "Egg Burger", "price": "Rs. 1,500.00", "rating": 4.0 },
        { "id": 14, "categoryId": 3, "name": "Chicken Burger", "price": "Rs. 1,800.00", "rating": 4.5 }
    ]
}"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = setup_environment();
    std::fs::create_dir_all(&config.data_dir)?;

    let store = Arc::new(RedbProfileStore::open(config.database_path())?);
    if store.get_profile("demo-user").await?.is_none() {
        let profile = UserProfile {
            full_name: "Demo User".to_string(),
            phone: Some("0770000000".to_string()),
            address: Some("1 Marine Drive, Colombo".to_string()),
            coordinates: Some(Coordinates::new(6.9271, 79.8612)),
            email: None,
        };
        store.save_profile("demo-user", &profile).await?;
    }

    let menu = Menu::from_json(CATALOG)?;
    let mut session = Session::login("demo-user", store, config.simulation.clone()).await?;
    for item in menu.search("burger") {
        session.cart_mut().add_item(item, 1);
    }
    println!("Cart total: Rs. {:.2}", session.cart().total_minor() as f64 / 100.0);

    let mut events = session.subscribe();
    let draft = session.delivery_draft();
    let tracking = session.checkout(&draft, PaymentMethod::SavedCard)?;
    println!("Order {} placed", tracking.order_id());

    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                LifecycleEvent::StatusChanged { status, .. } => println!("Status: {status}"),
                LifecycleEvent::PositionUpdated { tick, position, .. } => {
                    println!("  courier #{tick}: {:.5}, {:.5}", position.lat, position.lng)
                }
                _ => {}
            }
        }
    });

    tracking.completed().await?;
    let order = session.finalize_active_order(Some(5)).await?;
    println!("Order {} delivered and rated {:?}", order.id, order.rating);
    println!("History: {} order(s)", session.order_history().await?.len());

    session.logout();
    let _ = printer.await;
    Ok(())
}
