//! Orders
//!
//! Placing the cart as an order and keeping the history of orders for the
//! session. Placement is simulated: the order is recorded locally and the
//! cart is cleared, nothing leaves the process.

use std::{fmt, ops::RangeInclusive};

use jiff::Timestamp;
use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    cart::{Cart, CartLine},
    payment::Payment,
    prices::Price,
};

/// Kitchen estimate quoted when an order is sent, in minutes.
pub const ESTIMATED_WAIT_MINUTES: RangeInclusive<u32> = 20..=25;

/// Ratings are whole stars in this range.
pub const RATING_RANGE: RangeInclusive<u8> = 1..=5;

/// Errors raised by order placement and history operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// The cart has no lines.
    #[error("cart is empty; add dishes before placing an order")]
    EmptyCart,

    /// No table number was given.
    #[error("a table number is required")]
    MissingTable,

    /// No order with this id exists.
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// Only completed orders can be rated.
    #[error("order {0} has not been completed yet")]
    NotCompleted(OrderId),

    /// Star rating outside 1-5.
    #[error("rating {0} is outside 1-5")]
    InvalidRating(u8),

    /// Two seeded orders share an id.
    #[error("order {0} appears more than once")]
    DuplicateOrder(OrderId),
}

/// Sequential order number, displayed as `ORD001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderId(u32);

impl OrderId {
    /// Creates an order id from its sequence number.
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// The sequence number.
    pub fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ORD{:03}", self.0)
    }
}

/// Where an order is in the kitchen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    /// Sent to the kitchen
    Preparing,

    /// Waiting to be served
    Ready,

    /// Served and closed
    Completed,
}

impl OrderStatus {
    /// The following status. `Completed` is terminal.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            OrderStatus::Preparing => OrderStatus::Ready,
            OrderStatus::Ready | OrderStatus::Completed => OrderStatus::Completed,
        }
    }

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Preparing => "Preparando",
            OrderStatus::Ready => "Listo",
            OrderStatus::Completed => "Completado",
        }
    }
}

/// Table number and kitchen notes collected on the cart screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderRequest {
    /// Table the order is for
    pub table_number: String,

    /// Free-form notes for the kitchen
    pub special_instructions: Option<String>,
}

impl OrderRequest {
    /// A request for the given table.
    pub fn new(table_number: impl Into<String>) -> Self {
        Self {
            table_number: table_number.into(),
            special_instructions: None,
        }
    }

    /// Attach kitchen notes. Blank notes are dropped.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        let instructions = instructions.into();
        self.special_instructions = (!instructions.trim().is_empty()).then_some(instructions);
        self
    }
}

/// A placed or paid order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: OrderId,
    lines: Vec<CartLine>,
    currency: &'static Currency,
    status: OrderStatus,
    table_number: Option<String>,
    special_instructions: Option<String>,
    placed_at: Timestamp,
    rating: Option<u8>,
    payment: Option<Payment>,
}

impl Order {
    /// An order in the `Preparing` state with a snapshot of the given lines,
    /// priced in `currency`.
    pub fn new(
        id: OrderId,
        lines: Vec<CartLine>,
        currency: &'static Currency,
        placed_at: Timestamp,
    ) -> Self {
        Self {
            id,
            lines,
            currency,
            status: OrderStatus::Preparing,
            table_number: None,
            special_instructions: None,
            placed_at,
            rating: None,
            payment: None,
        }
    }

    /// Set the status.
    #[must_use]
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the table number.
    #[must_use]
    pub fn with_table(mut self, table_number: impl Into<String>) -> Self {
        self.table_number = Some(table_number.into());
        self
    }

    /// Attach kitchen notes.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.special_instructions = Some(instructions.into());
        self
    }

    /// Attach the payment that settled this order.
    #[must_use]
    pub fn with_payment(mut self, payment: Payment) -> Self {
        self.payment = Some(payment);
        self
    }

    /// Order id
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Lines as they were in the cart when the order was placed.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of line subtotals.
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// The total as money in the order currency.
    pub fn total_money(&self) -> Money<'static, Currency> {
        self.total().money(self.currency)
    }

    /// Currency the order was priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Number of units ordered.
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity()))
            .sum()
    }

    /// Current status
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Table number, if the order was placed from a table.
    pub fn table_number(&self) -> Option<&str> {
        self.table_number.as_deref()
    }

    /// Kitchen notes
    pub fn special_instructions(&self) -> Option<&str> {
        self.special_instructions.as_deref()
    }

    /// When the order was placed.
    pub fn placed_at(&self) -> Timestamp {
        self.placed_at
    }

    /// Star rating, once rated.
    pub fn rating(&self) -> Option<u8> {
        self.rating
    }

    /// Payment record, if the order was paid.
    pub fn payment(&self) -> Option<&Payment> {
        self.payment.as_ref()
    }
}

/// All orders made during the session, oldest first.
#[derive(Debug, Clone)]
pub struct OrderHistory {
    orders: Vec<Order>,
    next_id: u32,
}

impl Default for OrderHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderHistory {
    /// An empty history. The first order will be `ORD001`.
    pub fn new() -> Self {
        Self {
            orders: Vec::new(),
            next_id: 1,
        }
    }

    /// A history seeded with existing orders. New ids continue after the highest seeded one.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::DuplicateOrder`] if two seeded orders share an id.
    pub fn with_orders(orders: impl Into<Vec<Order>>) -> Result<Self, OrderError> {
        let orders = orders.into();
        let mut seen = FxHashSet::default();

        for order in &orders {
            if !seen.insert(order.id) {
                return Err(OrderError::DuplicateOrder(order.id));
            }
        }

        let next_id = orders
            .iter()
            .map(|order| order.id.0)
            .max()
            .map_or(1, |highest| highest.saturating_add(1));

        Ok(Self { orders, next_id })
    }

    /// All orders, oldest first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Orders still in the kitchen or waiting to be served.
    pub fn current(&self) -> impl Iterator<Item = &Order> {
        self.orders
            .iter()
            .filter(|order| order.status != OrderStatus::Completed)
    }

    /// Completed orders.
    pub fn past(&self) -> impl Iterator<Item = &Order> {
        self.orders
            .iter()
            .filter(|order| order.status == OrderStatus::Completed)
    }

    /// Look up an order.
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == id)
    }

    /// Number of orders
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Check if there are no orders.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Move an order to its next status.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] for unknown ids.
    pub fn advance(&mut self, id: OrderId) -> Result<OrderStatus, OrderError> {
        let order = self.get_mut(id)?;
        order.status = order.status.next();

        Ok(order.status)
    }

    /// Rate a completed order with 1 to 5 stars. Rating again replaces the old rating.
    ///
    /// # Errors
    ///
    /// - [`OrderError::InvalidRating`]: stars outside 1-5.
    /// - [`OrderError::NotFound`]: unknown id.
    /// - [`OrderError::NotCompleted`]: the order is still open.
    pub fn rate(&mut self, id: OrderId, stars: u8) -> Result<(), OrderError> {
        if !RATING_RANGE.contains(&stars) {
            return Err(OrderError::InvalidRating(stars));
        }

        let order = self.get_mut(id)?;

        if order.status != OrderStatus::Completed {
            return Err(OrderError::NotCompleted(id));
        }

        order.rating = Some(stars);

        Ok(())
    }

    /// Add every line of a previous order back into the cart, returning the number of units added.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] for unknown ids.
    pub fn reorder(&self, id: OrderId, cart: &mut Cart) -> Result<u64, OrderError> {
        let order = self.get(id).ok_or(OrderError::NotFound(id))?;

        for line in &order.lines {
            cart.add_units(line.product(), line.quantity());
        }

        Ok(order.item_count())
    }

    /// Sum of all order totals.
    pub fn total_spent(&self) -> Price {
        self.orders.iter().map(Order::total).sum()
    }

    /// Mean star rating over rated orders.
    pub fn average_rating(&self) -> Option<f32> {
        let (sum, count) = self
            .orders
            .iter()
            .filter_map(|order| order.rating)
            .fold((0_u16, 0_u16), |(sum, count), stars| {
                (sum.saturating_add(u16::from(stars)), count.saturating_add(1))
            });

        (count > 0).then(|| f32::from(sum) / f32::from(count))
    }

    /// Id the next recorded order will get.
    pub(crate) fn next_id(&self) -> OrderId {
        OrderId(self.next_id)
    }

    /// Snapshot the cart into a new order, clear the cart and return a copy of
    /// the stored order.
    pub(crate) fn record(
        &mut self,
        cart: &mut Cart,
        placed_at: Timestamp,
        configure: impl FnOnce(Order) -> Order,
    ) -> Order {
        let id = self.next_id();
        self.next_id = self.next_id.saturating_add(1);

        let order = configure(Order::new(
            id,
            cart.lines().to_vec(),
            cart.currency(),
            placed_at,
        ));
        cart.clear();

        self.orders.push(order.clone());

        order
    }

    fn get_mut(&mut self, id: OrderId) -> Result<&mut Order, OrderError> {
        self.orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or(OrderError::NotFound(id))
    }
}

/// Send the cart to the kitchen.
///
/// On success the cart lines become a `Preparing` order in `history`, the
/// cart is cleared and a copy of the recorded order is returned.
///
/// # Errors
///
/// - [`OrderError::EmptyCart`]: nothing to order.
/// - [`OrderError::MissingTable`]: blank table number.
///
/// Neither the cart nor the history change when an error is returned.
pub fn place_order(
    cart: &mut Cart,
    history: &mut OrderHistory,
    request: OrderRequest,
    now: Timestamp,
) -> Result<Order, OrderError> {
    if cart.is_empty() {
        return Err(OrderError::EmptyCart);
    }

    let table_number = request.table_number.trim();

    if table_number.is_empty() {
        return Err(OrderError::MissingTable);
    }

    let table_number = table_number.to_string();

    Ok(history.record(cart, now, move |mut order| {
        order.table_number = Some(table_number);
        order.special_instructions = request.special_instructions;
        order
    }))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use rusty_money::iso;

    use crate::cart::{CartProduct, ProductId};

    use super::*;

    fn now() -> Timestamp {
        Timestamp::from_second(1_705_329_000).unwrap_or(Timestamp::UNIX_EPOCH)
    }

    fn cart_with_empanadas_and_cazuela() -> Cart {
        let mut cart = Cart::default();
        cart.add_item(CartProduct::new("1", "Empanadas de Pino", 3500, ""));
        cart.add_item(CartProduct::new("1", "Empanadas de Pino", 3500, ""));
        cart.add_item(CartProduct::new("3", "Cazuela Nogada", 7200, ""));
        cart
    }

    #[test]
    fn order_ids_display_with_padding() {
        assert_eq!(OrderId::new(1).to_string(), "ORD001");
        assert_eq!(OrderId::new(42).to_string(), "ORD042");
        assert_eq!(OrderId::new(1234).to_string(), "ORD1234");
    }

    #[test]
    fn status_advances_and_stops_at_completed() {
        assert_eq!(OrderStatus::Preparing.next(), OrderStatus::Ready);
        assert_eq!(OrderStatus::Ready.next(), OrderStatus::Completed);
        assert_eq!(OrderStatus::Completed.next(), OrderStatus::Completed);
    }

    #[test]
    fn placing_an_order_snapshots_and_clears_the_cart() -> TestResult {
        let mut cart = cart_with_empanadas_and_cazuela();
        let mut history = OrderHistory::new();

        let order = place_order(
            &mut cart,
            &mut history,
            OrderRequest::new("5").with_instructions("Sin cebolla en las empanadas"),
            now(),
        )?;

        assert_eq!(order.id(), OrderId::new(1));
        assert_eq!(order.total(), Price::new(14_200));
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.status(), OrderStatus::Preparing);
        assert_eq!(order.table_number(), Some("5"));
        assert_eq!(
            order.special_instructions(),
            Some("Sin cebolla en las empanadas")
        );
        assert_eq!(order.placed_at(), now());
        assert!(cart.is_empty());
        assert_eq!(history.current().count(), 1);

        Ok(())
    }

    #[test]
    fn empty_cart_is_rejected() {
        let mut cart = Cart::default();
        let mut history = OrderHistory::new();

        let result = place_order(&mut cart, &mut history, OrderRequest::new("5"), now());

        assert_eq!(result.err(), Some(OrderError::EmptyCart));
        assert!(history.is_empty());
    }

    #[test]
    fn blank_table_is_rejected_and_cart_kept() {
        let mut cart = cart_with_empanadas_and_cazuela();
        let mut history = OrderHistory::new();

        let result = place_order(&mut cart, &mut history, OrderRequest::new("  "), now());

        assert_eq!(result.err(), Some(OrderError::MissingTable));
        assert_eq!(cart.item_count(), 3);
        assert!(history.is_empty());
    }

    #[test]
    fn blank_instructions_are_dropped() {
        let request = OrderRequest::new("2").with_instructions("   ");

        assert_eq!(request.special_instructions, None);
    }

    #[test]
    fn order_ids_are_sequential() -> TestResult {
        let mut history = OrderHistory::new();

        for _ in 0..3 {
            let mut cart = cart_with_empanadas_and_cazuela();
            place_order(&mut cart, &mut history, OrderRequest::new("1"), now())?;
        }

        let ids: Vec<String> = history.orders().iter().map(|o| o.id().to_string()).collect();

        assert_eq!(ids, ["ORD001", "ORD002", "ORD003"]);

        Ok(())
    }

    #[test]
    fn advance_moves_orders_from_current_to_past() -> TestResult {
        let mut cart = cart_with_empanadas_and_cazuela();
        let mut history = OrderHistory::new();
        let id = place_order(&mut cart, &mut history, OrderRequest::new("7"), now())?.id();

        assert_eq!(history.advance(id)?, OrderStatus::Ready);
        assert_eq!(history.current().count(), 1);

        assert_eq!(history.advance(id)?, OrderStatus::Completed);
        assert_eq!(history.current().count(), 0);
        assert_eq!(history.past().count(), 1);

        assert_eq!(
            history.advance(OrderId::new(99)),
            Err(OrderError::NotFound(OrderId::new(99)))
        );

        Ok(())
    }

    #[test]
    fn rating_requires_completed_order_and_valid_stars() -> TestResult {
        let mut cart = cart_with_empanadas_and_cazuela();
        let mut history = OrderHistory::new();
        let id = place_order(&mut cart, &mut history, OrderRequest::new("3"), now())?.id();

        assert_eq!(history.rate(id, 5), Err(OrderError::NotCompleted(id)));

        history.advance(id)?;
        history.advance(id)?;

        assert_eq!(history.rate(id, 0), Err(OrderError::InvalidRating(0)));
        assert_eq!(history.rate(id, 6), Err(OrderError::InvalidRating(6)));

        history.rate(id, 4)?;
        assert_eq!(history.get(id).and_then(Order::rating), Some(4));

        Ok(())
    }

    #[test]
    fn reorder_adds_previous_lines_back() -> TestResult {
        let mut cart = cart_with_empanadas_and_cazuela();
        let mut history = OrderHistory::new();
        let id = place_order(&mut cart, &mut history, OrderRequest::new("3"), now())?.id();

        cart.add_item(CartProduct::new("3", "Cazuela Nogada", 7200, ""));

        let added = history.reorder(id, &mut cart)?;

        assert_eq!(added, 3);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.line(&ProductId::from("1")).map(CartLine::quantity), Some(2));
        assert_eq!(cart.line(&ProductId::from("3")).map(CartLine::quantity), Some(2));
        assert_eq!(cart.total(), Price::new(21_400));

        assert_eq!(
            history.reorder(OrderId::new(9), &mut cart),
            Err(OrderError::NotFound(OrderId::new(9)))
        );

        Ok(())
    }

    #[test]
    fn seeded_history_continues_numbering() -> TestResult {
        let mut seed_cart = Cart::default();
        seed_cart.add_item(CartProduct::new("2", "Pastel de Choclo", 8500, ""));

        let seeded = Order::new(OrderId::new(3), seed_cart.lines().to_vec(), iso::CLP, now())
            .with_status(OrderStatus::Completed)
            .with_table("3");

        let mut history = OrderHistory::with_orders(vec![seeded])?;
        let mut cart = cart_with_empanadas_and_cazuela();

        let order = place_order(&mut cart, &mut history, OrderRequest::new("1"), now())?;

        assert_eq!(order.id(), OrderId::new(4));
        assert_eq!(history.past().count(), 1);

        Ok(())
    }

    #[test]
    fn seeding_rejects_duplicate_ids() {
        let first = Order::new(OrderId::new(2), Vec::new(), iso::CLP, now());
        let second = Order::new(OrderId::new(2), Vec::new(), iso::CLP, now())
            .with_status(OrderStatus::Completed);

        assert_eq!(
            OrderHistory::with_orders(vec![first, second]).err(),
            Some(OrderError::DuplicateOrder(OrderId::new(2)))
        );
    }

    #[test]
    fn returned_order_matches_the_recorded_one() -> TestResult {
        let mut cart = Cart::new(iso::JPY);
        cart.add_item(CartProduct::new("ramen", "Ramen", 1200, ""));
        let mut history = OrderHistory::new();

        let order = place_order(&mut cart, &mut history, OrderRequest::new("9"), now())?;

        assert_eq!(history.get(order.id()), Some(&order));
        assert_eq!(order.currency(), iso::JPY);
        assert_eq!(order.total_money().to_string(), "¥1,200");

        Ok(())
    }

    #[test]
    fn spending_and_ratings_aggregate() -> TestResult {
        let mut history = OrderHistory::new();

        for stars in [5, 4] {
            let mut cart = cart_with_empanadas_and_cazuela();
            let id = place_order(&mut cart, &mut history, OrderRequest::new("1"), now())?.id();
            history.advance(id)?;
            history.advance(id)?;
            history.rate(id, stars)?;
        }

        let mut cart = cart_with_empanadas_and_cazuela();
        place_order(&mut cart, &mut history, OrderRequest::new("1"), now())?;

        assert_eq!(history.total_spent(), Price::new(42_600));
        assert_eq!(history.average_rating(), Some(4.5));

        Ok(())
    }

    #[test]
    fn average_rating_is_none_without_ratings() {
        assert_eq!(OrderHistory::new().average_rating(), None);
    }
}
