use super::*;

const CATALOG: &str = r#"{
    "categories": [
        { "id": 1, "name": "Rice", "icon": "restaurant" },
        { "id": 3, "name": "Burgers", "icon": "nutrition" }
    ],
    "foodItems": [
        {
            "id": 1, "categoryId": 1, "name": "Vegetable Fried Rice", "price": "Rs. 600",
            "rating": 4.2, "image": "https://example.com/rice.jpg",
            "description": "Classic Sri Lankan style vegetable fried rice."
        },
        {
            "id": 2, "categoryId": 1, "name": "Egg Rice", "price": "Rs. 750",
            "rating": 4.3, "image": "", "description": ""
        },
        {
            "id": 13, "categoryId": 3, "name": "Egg Burger", "price": "Rs. 1,500.00",
            "rating": 4.0, "image": "", "description": ""
        }
    ]
}"#;

#[test]
fn test_from_json_parses_prices_once() {
    let menu = Menu::from_json(CATALOG).unwrap();
    assert_eq!(menu.categories().len(), 2);
    assert_eq!(menu.items().len(), 3);
    assert_eq!(menu.item(1).unwrap().price_minor, 60000);
    assert_eq!(menu.item(13).unwrap().price_minor, 150000);
}

#[test]
fn test_unknown_fields_rejected() {
    let json = r#"{
        "categories": [{ "id": 1, "name": "Rice", "icon": "r", "color": "red" }],
        "foodItems": []
    }"#;
    assert!(matches!(Menu::from_json(json), Err(CatalogError::Json(_))));
}

#[test]
fn test_bad_price_rejected_with_item_id() {
    let json = r#"{
        "categories": [{ "id": 1, "name": "Rice", "icon": "r" }],
        "foodItems": [{ "id": 9, "categoryId": 1, "name": "Mystery", "price": "ask" }]
    }"#;
    let err = Menu::from_json(json).unwrap_err();
    assert!(matches!(err, CatalogError::Price { item_id: 9, .. }));
    assert_eq!(err.code(), ErrorCode::InvalidPrice);
}

#[test]
fn test_unknown_category_rejected() {
    let json = r#"{
        "categories": [{ "id": 1, "name": "Rice", "icon": "r" }],
        "foodItems": [{ "id": 9, "categoryId": 4, "name": "Cola", "price": "Rs. 200" }]
    }"#;
    assert!(matches!(
        Menu::from_json(json),
        Err(CatalogError::UnknownCategory { item_id: 9, category_id: 4 })
    ));
}

#[test]
fn test_duplicate_item_rejected() {
    let json = r#"{
        "categories": [{ "id": 1, "name": "Rice", "icon": "r" }],
        "foodItems": [
            { "id": 9, "categoryId": 1, "name": "A", "price": "Rs. 200" },
            { "id": 9, "categoryId": 1, "name": "B", "price": "Rs. 300" }
        ]
    }"#;
    assert!(matches!(Menu::from_json(json), Err(CatalogError::DuplicateItem(9))));
}

#[test]
fn test_search_is_case_insensitive() {
    let menu = Menu::from_json(CATALOG).unwrap();
    let names: Vec<&str> = menu.search("EGG").iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Egg Rice", "Egg Burger"]);
    assert!(menu.search("   ").is_empty());
}

#[test]
fn test_visible_prefers_search() {
    let menu = Menu::from_json(CATALOG).unwrap();
    assert_eq!(menu.visible("", 1).len(), 2);
    assert_eq!(menu.visible("burger", 1).len(), 1);
    assert_eq!(menu.visible("burger", 1)[0].id, 13);
}

#[test]
fn test_oversized_price_rejected() {
    let json = r#"{
        "categories": [{ "id": 1, "name": "Rice", "icon": "r" }],
        "foodItems": [{ "id": 5, "categoryId": 1, "name": "Gold", "price": "Rs. 50,000,000,000,000,000" }]
    }"#;
    assert!(matches!(
        Menu::from_json(json),
        Err(CatalogError::Price { item_id: 5, source: PriceParseError::OutOfRange(_) })
    ));

    let category = Category { id: 1, name: "Rice".into(), icon: String::new() };
    let gold = MenuItem {
        id: 6,
        category_id: 1,
        name: "Gold".into(),
        price_minor: MAX_PRICE_MINOR + 1,
        rating: 0.0,
        image: String::new(),
        description: String::new(),
    };
    assert!(matches!(
        Menu::new(vec![category], vec![gold]),
        Err(CatalogError::Price { item_id: 6, .. })
    ));
}
