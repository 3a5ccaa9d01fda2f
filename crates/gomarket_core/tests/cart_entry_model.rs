use gomarket_core::{CartEntry, CartEntryValidationError};

#[test]
fn serialization_uses_storage_field_names() {
    let entry = CartEntry::new("p-7", "Backpack", "https://img/backpack.png", 120.0)
        .unwrap()
        .with_quantity(3);

    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["id"], "p-7");
    assert_eq!(json["title"], "Backpack");
    assert_eq!(json["image_url"], "https://img/backpack.png");
    assert_eq!(json["price"], 120.0);
    assert_eq!(json["quantity"], 3);

    let decoded: CartEntry = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, entry);
}

#[test]
fn deserialize_rejects_blank_id() {
    let value = serde_json::json!({
        "id": " ",
        "title": "Nameless",
        "image_url": "",
        "price": 1.0,
        "quantity": 1
    });

    let err = serde_json::from_value::<CartEntry>(value).unwrap_err();
    assert!(
        err.to_string().contains("id must not be empty"),
        "unexpected error: {err}"
    );
}

#[test]
fn deserialize_rejects_negative_price() {
    let value = serde_json::json!({
        "id": "p-1",
        "title": "Refund",
        "image_url": "",
        "price": -3.0,
        "quantity": 1
    });

    let err = serde_json::from_value::<CartEntry>(value).unwrap_err();
    assert!(err.to_string().contains("invalid price"), "unexpected error: {err}");
}

#[test]
fn zero_price_is_allowed() {
    let entry = CartEntry::new("gift", "Free sticker", "", 0.0).unwrap();
    assert_eq!(entry.validate(), Ok(()));
}

#[test]
fn validation_error_names_offending_product() {
    let mut entry = CartEntry::new("p-9", "Hat", "", 10.0).unwrap();
    entry.price = f64::INFINITY;

    match entry.validate().unwrap_err() {
        CartEntryValidationError::InvalidPrice { id, .. } => assert_eq!(id, "p-9"),
        other => panic!("unexpected error: {other}"),
    }
}
