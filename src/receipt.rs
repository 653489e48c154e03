//! Receipt
//!
//! Terminal rendering of the cart and of placed orders.

use std::{fmt::Write, io};

use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartLine},
    orders::Order,
    prices::Price,
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// There is nothing to print.
    #[error("no lines to print")]
    Empty,

    /// IO error
    #[error("IO error")]
    IO,
}

/// The cart as a table of lines with its total.
#[derive(Debug, Clone, Copy)]
pub struct CartReceipt<'a> {
    cart: &'a Cart,
    colored: bool,
}

impl<'a> CartReceipt<'a> {
    /// Receipt for the given cart.
    pub fn new(cart: &'a Cart) -> Self {
        Self {
            cart,
            colored: false,
        }
    }

    /// Emit ANSI colours for borders and the header row.
    #[must_use]
    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Writes the receipt.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Empty`] for an empty cart, or
    /// [`ReceiptError::IO`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if self.cart.is_empty() {
            return Err(ReceiptError::Empty);
        }

        write_lines_table(
            &mut out,
            self.cart.lines(),
            self.cart.currency(),
            self.colored,
        )?;

        write_summary(
            &mut out,
            &[
                (" Platos:", self.cart.item_count().to_string()),
                (" Total:", self.cart.total_money().to_string()),
            ],
        )
    }
}

/// A placed order: header, lines, totals and payment details.
#[derive(Debug, Clone, Copy)]
pub struct OrderReceipt<'a> {
    order: &'a Order,
    colored: bool,
}

impl<'a> OrderReceipt<'a> {
    /// Receipt for the given order.
    pub fn new(order: &'a Order) -> Self {
        Self {
            order,
            colored: false,
        }
    }

    /// Emit ANSI colours for borders and the header row.
    #[must_use]
    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Writes the receipt.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::IO`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let order = self.order;

        writeln!(
            out,
            "\nPedido {} · {} · {}",
            order.id(),
            order.status().label(),
            order.placed_at().strftime("%Y-%m-%d %H:%M UTC")
        )
        .map_err(|_err| ReceiptError::IO)?;

        if let Some(table) = order.table_number() {
            writeln!(out, "Mesa {table}").map_err(|_err| ReceiptError::IO)?;
        }

        if let Some(notes) = order.special_instructions() {
            writeln!(out, "Notas: {notes}").map_err(|_err| ReceiptError::IO)?;
        }

        let currency = order.currency();

        write_lines_table(&mut out, order.lines(), currency, self.colored)?;

        let mut summary = vec![
            (" Platos:", order.item_count().to_string()),
            (" Total:", order.total_money().to_string()),
        ];

        if let Some(payment) = order.payment() {
            summary.push((" Pago:", payment.method.label().to_string()));

            if let Some(last_four) = &payment.card_last_four {
                summary.push((" Tarjeta:", format!("•••• {last_four}")));
            }

            if let Some(split) = payment.split {
                summary.push((" Personas:", split.people().to_string()));
                summary.push((
                    " Por persona:",
                    payment.per_person.money(currency).to_string(),
                ));
            }
        }

        if let Some(stars) = order.rating() {
            summary.push((" Calificación:", "★".repeat(usize::from(stars))));
        }

        write_summary(&mut out, &summary)
    }
}

fn write_lines_table(
    out: &mut impl io::Write,
    lines: &[CartLine],
    currency: &'static Currency,
    colored: bool,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["", "Plato", "Precio", "Cant.", "Subtotal"]);

    for (idx, line) in lines.iter().enumerate() {
        builder.push_record([
            format!("#{}", idx + 1),
            line.name().to_string(),
            line.price().money(currency).to_string(),
            line.quantity().to_string(),
            line.subtotal().money(currency).to_string(),
        ]);
    }

    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Columns::new(2..5), Alignment::right());

    let rendered = if colored {
        table.modify(Rows::first(), Color::BOLD);
        colorize_borders(&table.to_string())
    } else {
        table.to_string()
    };

    writeln!(out, "\n{rendered}").map_err(|_err| ReceiptError::IO)
}

/// Labels right-aligned in one column, values right-aligned in the next.
fn write_summary(out: &mut impl io::Write, rows: &[(&str, String)]) -> Result<(), ReceiptError> {
    let label_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or_default();

    let value_width = rows
        .iter()
        .map(|(_, value)| value.chars().count())
        .max()
        .unwrap_or_default();

    for (label, value) in rows {
        writeln!(out, "{label:>label_width$}  {value:>value_width$}")
            .map_err(|_err| ReceiptError::IO)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Wraps runs of box-drawing characters (U+2500..U+257F) in ANSI dark grey.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Shares as `$5.634 / $5.633 / $5.633` in the given currency.
pub fn format_shares(shares: &[Price], currency: &'static Currency) -> String {
    shares
        .iter()
        .map(|share| share.money(currency).to_string())
        .collect::<Vec<_>>()
        .join(" / ")
}
