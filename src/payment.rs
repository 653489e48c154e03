//! Payment
//!
//! Simulated payment of the cart total, optionally split between diners.
//! Nothing is charged; a paid order is recorded and the cart is cleared.

use std::{fmt, ops::RangeInclusive};

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    cart::Cart,
    orders::{OrderHistory, OrderId, OrderStatus},
    prices::Price,
};

/// How many people a bill can be split between.
pub const SPLIT_PEOPLE: RangeInclusive<u8> = 2..=10;

/// Errors raised while paying.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// Nothing in the cart to pay for.
    #[error("there are no products in the cart to pay for")]
    EmptyCart,

    /// Split outside 2-10 people.
    #[error("a bill can be split between 2 and 10 people, not {0}")]
    InvalidSplit(u8),
}

/// Payment method chosen on the payment screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PaymentMethod {
    /// Credit or debit card
    #[default]
    Card,

    /// WebPay redirect
    #[value(name = "webpay")]
    WebPay,
}

impl PaymentMethod {
    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Card => "Tarjeta de Crédito/Débito",
            PaymentMethod::WebPay => "WebPay",
        }
    }
}

/// Card form fields. Carried as entered; nothing is validated or charged.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CardDetails {
    /// Card number
    pub number: String,

    /// Expiry, `MM/YY`
    pub expiry: String,

    /// Security code
    pub cvv: String,

    /// Name on the card
    pub holder: String,
}

impl CardDetails {
    /// Last four digits of the card number, if it has at least four digits.
    pub fn last_four(&self) -> Option<String> {
        let digits: Vec<char> = self.number.chars().filter(char::is_ascii_digit).collect();
        let start = digits.len().checked_sub(4)?;

        digits.get(start..).map(|tail| tail.iter().collect())
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("last_four", &self.last_four())
            .field("expiry", &self.expiry)
            .field("holder", &self.holder)
            .finish_non_exhaustive()
    }
}

/// Splitting the bill evenly between a number of people.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillSplit {
    people: u8,
}

impl BillSplit {
    /// Split between `people` diners.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::InvalidSplit`] unless `people` is between 2 and 10.
    pub fn new(people: u8) -> Result<Self, PaymentError> {
        if SPLIT_PEOPLE.contains(&people) {
            Ok(Self { people })
        } else {
            Err(PaymentError::InvalidSplit(people))
        }
    }

    /// Number of people
    pub fn people(self) -> u8 {
        self.people
    }

    /// Whole-unit shares that add up exactly to `total`.
    ///
    /// Any remainder is spread one unit at a time over the first shares, so
    /// shares never differ by more than one.
    pub fn shares(self, total: Price) -> Vec<Price> {
        let people = u64::from(self.people);
        let base = *total / people;
        let remainder = *total % people;

        (0..people)
            .map(|idx| Price::new(base + u64::from(idx < remainder)))
            .collect()
    }

    /// The amount each person is asked to pay: the largest share.
    pub fn per_person(self, total: Price) -> Price {
        let people = u64::from(self.people);

        Price::new(total.div_ceil(people))
    }
}

/// What the payment screen submits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Chosen payment method
    pub method: PaymentMethod,

    /// Card form, when paying by card
    pub card: Option<CardDetails>,

    /// Optional bill split
    pub split: Option<BillSplit>,
}

impl PaymentRequest {
    /// Pay the whole bill with the given method.
    pub fn new(method: PaymentMethod) -> Self {
        Self {
            method,
            card: None,
            split: None,
        }
    }

    /// Attach card details.
    #[must_use]
    pub fn with_card(mut self, card: CardDetails) -> Self {
        self.card = Some(card);
        self
    }

    /// Split the bill.
    #[must_use]
    pub fn split(mut self, split: BillSplit) -> Self {
        self.split = Some(split);
        self
    }
}

/// A completed (simulated) payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    /// Order recorded for this payment
    pub order: OrderId,

    /// Method used
    pub method: PaymentMethod,

    /// Whole bill
    pub amount: Price,

    /// Amount each person pays; equals `amount` when the bill is not split
    pub per_person: Price,

    /// Split applied, if any
    pub split: Option<BillSplit>,

    /// Last four card digits, when paid by card
    pub card_last_four: Option<String>,
}

impl Payment {
    /// Each person's share, or the whole amount as a single share.
    pub fn shares(&self) -> Vec<Price> {
        match self.split {
            Some(split) => split.shares(self.amount),
            None => vec![self.amount],
        }
    }
}

/// Pay for everything in the cart.
///
/// The cart contents are recorded as a completed order carrying the payment,
/// and the cart is cleared.
///
/// # Errors
///
/// Returns [`PaymentError::EmptyCart`] when there is nothing to pay for; the
/// cart and history are left untouched.
pub fn pay(
    cart: &mut Cart,
    history: &mut OrderHistory,
    request: PaymentRequest,
    now: Timestamp,
) -> Result<Payment, PaymentError> {
    if cart.is_empty() {
        return Err(PaymentError::EmptyCart);
    }

    let amount = cart.total();
    let per_person = request
        .split
        .map_or(amount, |split| split.per_person(amount));

    let card_last_four = match request.method {
        PaymentMethod::Card => request.card.as_ref().and_then(CardDetails::last_four),
        PaymentMethod::WebPay => None,
    };

    let payment = Payment {
        order: history.next_id(),
        method: request.method,
        amount,
        per_person,
        split: request.split,
        card_last_four,
    };

    history.record(cart, now, |order| {
        order
            .with_status(OrderStatus::Completed)
            .with_payment(payment.clone())
    });

    Ok(payment)
}
