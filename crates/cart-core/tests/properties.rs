use cart_core::{
    CartError, CartSession, ItemDraft, MemoryStore, Money, ShippingPolicy, Snapshot,
};
use proptest::prelude::*;

const ZONES: [&str; 4] = ["tubigon", "calape", "", "loon"];

/// Index range deliberately wider than the carts the sequences build
const MAX_INDEX: usize = 8;

#[derive(Debug, Clone)]
enum Op {
    Add(i64, u32),
    AddInvalid(i64, u32),
    Update(usize, i64, u32),
    Remove(usize),
    Clear,
    SetZone(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (1i64..1_000_000, 1u32..50).prop_map(|(c, q)| Op::Add(c, q)),
        1 => (-1_000i64..=0, 0u32..5).prop_map(|(c, q)| Op::AddInvalid(c, q)),
        2 => (0..MAX_INDEX, 1i64..1_000_000, 1u32..50).prop_map(|(i, c, q)| Op::Update(i, c, q)),
        2 => (0..MAX_INDEX).prop_map(Op::Remove),
        1 => Just(Op::Clear),
        1 => (0..ZONES.len()).prop_map(Op::SetZone),
    ]
}

fn draft(centavos: i64, quantity: u32) -> ItemDraft {
    ItemDraft::new("Item", centavos as f64 / 100.0, quantity)
}

fn lines(snap: &Snapshot) -> Vec<(i64, u32)> {
    snap.cart
        .iter()
        .map(|l| (l.unit_price.centavos(), l.quantity))
        .collect()
}

fn assert_matches(session: &CartSession<MemoryStore>, shadow: &[(i64, u32)], zone: &str) {
    let snap = session.snapshot();

    assert_eq!(lines(&snap), shadow);
    for (i, line) in snap.cart.iter().enumerate() {
        assert_eq!(line.index, i);
        assert_eq!(
            line.line_total.centavos(),
            line.unit_price.centavos() * i64::from(line.quantity)
        );
    }

    let expected: i64 = shadow.iter().map(|(c, q)| c * i64::from(*q)).sum();
    assert_eq!(snap.subtotal, Money::from_centavos(expected));
    assert_eq!(snap.zone, zone);
    assert_eq!(snap.shipping_fee, session.policy().fee_for(zone));
    assert_eq!(snap.grand_total, snap.subtotal + snap.shipping_fee);

    // What was written hydrates back to the same cart and zone
    let restored = CartSession::hydrate(session.store().clone(), ShippingPolicy::default());
    assert_eq!(lines(&restored.snapshot()), shadow);
    assert_eq!(restored.zone(), zone);
}

fn assert_unchanged(session: &CartSession<MemoryStore>, before: &Snapshot, writes: usize) {
    assert_eq!(&session.snapshot(), before);
    assert_eq!(session.store().writes(), writes);
}

proptest! {
    /// Totals always match a plain model of the cart, and declined
    /// operations leave both the session and the store untouched.
    #[test]
    fn totals_track_model(ops in prop::collection::vec(op(), 0..40)) {
        let mut session = CartSession::hydrate(MemoryStore::new(), ShippingPolicy::default());
        let mut shadow: Vec<(i64, u32)> = Vec::new();
        let mut zone = "tubigon".to_string();
        assert_matches(&session, &shadow, &zone);

        for op in ops {
            let before = session.snapshot();
            let writes = session.store().writes();

            match op {
                Op::Add(c, q) => {
                    session.add_item(&draft(c, q)).unwrap();
                    shadow.push((c, q));
                }
                Op::AddInvalid(c, q) => {
                    let err = session.add_item(&draft(c, q)).unwrap_err();
                    assert!(err.is_declined());
                    assert_unchanged(&session, &before, writes);
                }
                Op::Update(i, c, q) => {
                    let result = session.add_or_update_item(&draft(c, q), Some(i));
                    if i < shadow.len() {
                        assert_eq!(result, Ok(before.cart[i].id));
                        shadow[i] = (c, q);
                    } else {
                        assert_eq!(result, Err(CartError::OutOfRange { index: i, len: shadow.len() }));
                        assert_unchanged(&session, &before, writes);
                    }
                }
                Op::Remove(i) => {
                    let result = session.delete_item(i);
                    if i < shadow.len() {
                        result.unwrap();
                        shadow.remove(i);
                    } else {
                        assert_eq!(
                            result.unwrap_err(),
                            CartError::OutOfRange { index: i, len: shadow.len() }
                        );
                        assert_unchanged(&session, &before, writes);
                    }
                }
                Op::Clear => {
                    session.clear_cart().unwrap();
                    shadow.clear();
                }
                Op::SetZone(z) => {
                    session.set_zone(ZONES[z]).unwrap();
                    zone = ZONES[z].to_string();
                }
            }

            assert_matches(&session, &shadow, &zone);
        }
    }

    /// Shipping fee depends only on the zone: configured fee or zero.
    #[test]
    fn fee_is_configured_or_zero(zone in "[a-z]{0,8}") {
        let policy = ShippingPolicy::default();
        let fee = policy.fee_for(&zone);

        match policy.rate(&zone) {
            Some(rate) => assert_eq!(fee, rate.fee),
            None => assert_eq!(fee, Money::ZERO),
        }
        assert!(fee <= policy.max_fee());
    }
}
