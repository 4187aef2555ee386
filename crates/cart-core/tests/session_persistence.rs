use cart_core::{
    keys, CartLedger, CartSession, FileStore, ItemDraft, Money, PersistentStore, ShippingPolicy,
};
use tempfile::TempDir;

fn open(dir: &TempDir) -> CartSession<FileStore> {
    let store = FileStore::open(dir.path().join("cart.json")).unwrap();
    CartSession::hydrate(store, ShippingPolicy::default())
}

#[test]
fn test_session_survives_restart() {
    let dir = TempDir::new().unwrap();

    {
        let mut session = open(&dir);
        session.add_item(&ItemDraft::new("Rice", 50.0, 2)).unwrap();
        session.add_item(&ItemDraft::new("Oil", 120.0, 1)).unwrap();
        session.set_zone("calape").unwrap();
        session.set_payment_method("Gcash").unwrap();
    }

    let session = open(&dir);
    let snapshot = session.snapshot();

    let names: Vec<&str> = snapshot.cart.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Rice", "Oil"]);
    assert_eq!(snapshot.zone, "calape");
    assert_eq!(snapshot.payment_method, "Gcash");
    assert_eq!(snapshot.subtotal, Money::from_centavos(22_000));
    assert_eq!(snapshot.grand_total, Money::from_centavos(37_000));
}

#[test]
fn test_persisted_cart_format() {
    let dir = TempDir::new().unwrap();
    let mut session = open(&dir);
    session.add_item(&ItemDraft::new("Rice", 55.5, 2)).unwrap();

    let raw = session.store().get(keys::CART).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(
        value,
        serde_json::json!([{ "name": "Rice", "price": 55.5, "quantity": 2 }])
    );
    // zone was never selected, so it is not written
    assert_eq!(session.store().get(keys::ZONE).unwrap(), None);
}

#[test]
fn test_clear_cart_keeps_selection_across_restart() {
    let dir = TempDir::new().unwrap();

    {
        let mut session = open(&dir);
        session.add_item(&ItemDraft::new("Rice", 50.0, 2)).unwrap();
        session.set_zone("calape").unwrap();
        session.set_payment_method("Creditcard").unwrap();
        session.clear_cart().unwrap();
    }

    let session = open(&dir);
    assert!(session.ledger().is_empty());
    assert_eq!(session.zone(), "calape");
    assert_eq!(session.payment_method(), "Creditcard");
    assert_eq!(session.grand_total(), Money::from_centavos(15_000));
}

#[test]
fn test_corrupt_cart_entry_falls_back_to_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cart.json");

    {
        let mut store = FileStore::open(&path).unwrap();
        store.set(keys::CART, "[{\"name\": \"Rice\"").unwrap();
        store.set(keys::ZONE, "tubigon").unwrap();
    }

    let mut session = open(&dir);
    assert!(session.ledger().is_empty());
    assert_eq!(session.zone(), "tubigon");

    // the next mutation overwrites the bad value
    session.add_item(&ItemDraft::new("Salt", 15.0, 1)).unwrap();
    let raw = session.store().get(keys::CART).unwrap().unwrap();
    assert_eq!(CartLedger::from_json(&raw).unwrap().len(), 1);
}

#[test]
fn test_remove_then_readd_moves_to_end() {
    let dir = TempDir::new().unwrap();
    let mut session = open(&dir);
    session.add_item(&ItemDraft::new("Rice", 50.0, 2)).unwrap();
    session.add_item(&ItemDraft::new("Oil", 120.0, 1)).unwrap();
    session.add_item(&ItemDraft::new("Salt", 15.0, 3)).unwrap();
    let before = session.subtotal();

    let removed = session.delete_item(1).unwrap();
    session.add_item(&ItemDraft::from(&removed)).unwrap();

    let names: Vec<String> = session
        .snapshot()
        .cart
        .into_iter()
        .map(|l| l.name)
        .collect();
    assert_eq!(names, vec!["Rice", "Salt", "Oil"]);
    assert_eq!(session.subtotal(), before);
}
