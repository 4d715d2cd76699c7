use gomarket_core::{decode_cart, encode_cart, CartItem, NewCartItem};

fn item(id: &str, quantity: i64) -> CartItem {
    NewCartItem::new(id, format!("title {id}"), format!("https://img/{id}.png"), 9.9)
        .into_cart_item(quantity)
}

#[test]
fn encode_uses_snake_case_wire_fields() {
    let encoded = encode_cart(&[item("p1", 3)]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();

    let object = value[0].as_object().unwrap();
    let mut keys = object.keys().cloned().collect::<Vec<_>>();
    keys.sort();
    assert_eq!(keys, ["id", "image_url", "price", "quantity", "title"]);
    assert_eq!(value[0]["quantity"], 3);
}

#[test]
fn decode_then_encode_preserves_order_and_fields() {
    let original = vec![item("b", 1), item("a", -2), item("c", 0)];

    let decoded = decode_cart(&encode_cart(&original).unwrap()).unwrap();

    assert_eq!(decoded, original);
}

#[test]
fn decode_accepts_externally_written_blob() {
    let raw = r#"[{"id":"p1","title":"T","image_url":"u","price":10,"quantity":4}]"#;

    let decoded = decode_cart(raw).unwrap();

    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].id, "p1");
    assert_eq!(decoded[0].price, 10.0);
    assert_eq!(decoded[0].quantity, 4);
}

#[test]
fn decode_rejects_malformed_blob() {
    assert!(decode_cart("not json").is_err());
    assert!(decode_cart(r#"[{"id":"p1"}]"#).is_err());
    assert!(decode_cart(r#"{"id":"p1"}"#).is_err());
}

#[test]
fn new_cart_item_carries_fields_into_line() {
    let line = NewCartItem::new("p9", "Shoe", "u", 42.5).into_cart_item(1);

    assert_eq!(line.id, "p9");
    assert_eq!(line.title, "Shoe");
    assert_eq!(line.image_url, "u");
    assert_eq!(line.price, 42.5);
    assert_eq!(line.quantity, 1);
}
