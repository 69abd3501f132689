use serde_json::{json, Value};

pub fn listing_payload(title: &str, for_sale: bool, price: f64, tags: &[&str]) -> Value {
    json!({
        "title": title,
        "forSale": for_sale,
        "price": price,
        "photoReference": format!("{}.jpg", title.replace(' ', "-")),
        "tags": tags,
    })
}

pub fn bike() -> Value {
    json!({
        "title": "Bike",
        "forSale": true,
        "price": 150,
        "photoReference": "bike.PNG",
        "tags": "motor"
    })
}

/// Six listings covering every tag and both sale flags.
pub fn catalogue() -> Vec<Value> {
    vec![
        listing_payload("Mountain Bike", true, 150.0, &["motor", "lifestyle"]),
        listing_payload("Scooter", true, 120.0, &["motor"]),
        listing_payload("iPhone", false, 300.0, &["mobile", "work"]),
        listing_payload("Racing Bike", true, 199.0, &["motor"]),
        listing_payload("Desk", true, 100.0, &["work"]),
        listing_payload("Helmet", true, 100.0, &["motor"]),
    ]
}
