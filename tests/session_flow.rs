//! End-to-end flows through a session: browsing, building a cart, ordering,
//! paying and reviewing history, with the notices each step raises.

use std::fs;

use testresult::TestResult;

use comanda::prelude::*;

fn guest() -> Result<UserProfile, ProfileError> {
    UserProfile::new("María González", "maria.gonzalez@email.com", "+56 9 8765 4321")
}

fn titles(sink: &RecordingSink) -> Vec<&str> {
    sink.notices().iter().map(|notice| notice.title.as_str()).collect()
}

#[test]
fn add_twice_then_remove_scenarios() -> TestResult {
    let catalog = Catalog::builtin()?;
    let mut session = Session::new(&catalog, guest()?, RecordingSink::new());
    let empanadas = ProductId::from("1");
    let pastel = ProductId::from("2");

    session.add_to_cart(&empanadas)?;
    session.add_to_cart(&empanadas)?;

    assert_eq!(session.cart().len(), 1);
    assert_eq!(session.cart().line(&empanadas).map(CartLine::quantity), Some(2));
    assert_eq!(session.cart().total(), Price::new(7000));

    session.change_quantity(&empanadas, 1);
    session.add_to_cart(&pastel)?;
    session.remove_from_cart(&empanadas);

    assert_eq!(session.cart().len(), 1);
    assert_eq!(session.cart().total(), Price::new(8500));
    assert_eq!(session.cart().item_count(), 1);

    Ok(())
}

#[test]
fn browse_order_and_pay() -> TestResult {
    let catalog = Catalog::builtin()?;
    let mut session = Session::new(&catalog, guest()?, RecordingSink::new());

    let vegan: Vec<ProductId> = catalog
        .search(&MenuQuery::new().dietary("vegano"))
        .map(|item| item.id.clone())
        .collect();

    assert!(!vegan.is_empty(), "builtin menu has vegan dishes");

    for id in &vegan {
        session.add_to_cart(id)?;
    }

    let vegan_total = session.cart().total();
    let order = session.place_order(OrderRequest::new("12").with_instructions("Sin sal"))?;

    assert_eq!(order.to_string(), "ORD001");
    assert_eq!(session.orders().current().count(), 1);
    assert_eq!(
        session.orders().get(order).map(Order::total),
        Some(vegan_total)
    );

    session.add_to_cart(&ProductId::from("2"))?;
    session.add_to_cart(&ProductId::from("3"))?;

    let payment = session.pay(PaymentRequest::new(PaymentMethod::WebPay).split(BillSplit::new(4)?))?;

    assert_eq!(payment.amount, Price::new(8500 + 7200));
    assert_eq!(payment.shares().iter().copied().sum::<Price>(), payment.amount);
    assert_eq!(session.orders().len(), 2);
    assert_eq!(session.orders().past().count(), 1);
    assert!(session.cart().is_empty());

    let sink = session.into_sink();
    let titles = titles(&sink);

    assert!(titles.contains(&"¡Pedido enviado! 🎉"), "{titles:?}");
    assert!(titles.contains(&"🎉 ¡Pago exitoso!"), "{titles:?}");
    assert!(
        sink.notices().iter().all(|notice| notice.severity == Severity::Info),
        "unexpected warning in {titles:?}"
    );

    Ok(())
}

#[test]
fn blocked_actions_leave_state_and_warn() -> TestResult {
    let catalog = Catalog::builtin()?;
    let mut sink = RecordingSink::new();
    let mut session = Session::new(&catalog, guest()?, &mut sink);

    assert!(session.place_order(OrderRequest::new("3")).is_err());
    assert!(session.pay(PaymentRequest::default()).is_err());

    session.add_to_cart(&ProductId::from("4"))?;
    assert!(session.place_order(OrderRequest::new("")).is_err());
    assert_eq!(session.cart().item_count(), 1);
    assert!(session.orders().is_empty());

    drop(session);

    let destructive: Vec<&str> = sink
        .notices()
        .iter()
        .filter(|notice| notice.severity == Severity::Destructive)
        .map(|notice| notice.title.as_str())
        .collect();

    assert_eq!(
        destructive,
        ["Carrito vacío", "Error", "Número de mesa requerido"]
    );

    Ok(())
}

#[test]
fn fixture_menus_load_from_disk() -> TestResult {
    let dir = tempfile::tempdir()?;
    fs::create_dir(dir.path().join("menu"))?;
    fs::write(
        dir.path().join("menu").join("cafe.yml"),
        r#"
currency: CLP
categories:
  - { id: bebidas, name: Bebidas }
items:
  - id: cafe
    name: Café de grano
    price: 1900
    category: bebidas
    dietary: [vegano]
"#,
    )?;

    let catalog = Catalog::from_fixture(dir.path(), "cafe")?;
    let mut session = Session::new(&catalog, guest()?, RecordingSink::new());

    session.add_to_cart(&ProductId::from("cafe"))?;
    session.add_to_cart(&ProductId::from("cafe"))?;

    let mut rendered = Vec::new();
    CartReceipt::new(session.cart()).write_to(&mut rendered)?;
    let rendered = String::from_utf8(rendered)?;

    assert!(rendered.contains("Café de grano"), "{rendered}");
    assert!(rendered.contains("$3.800"), "{rendered}");

    Ok(())
}
