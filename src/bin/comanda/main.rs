//! Comanda command line

use std::io::{self, IsTerminal, Write};

use anyhow::Context;
use tracing::{debug, info};

use comanda::{
    catalog::{Catalog, MenuQuery},
    notifications::TracingSink,
    orders::OrderRequest,
    payment::{BillSplit, CardDetails, PaymentRequest},
    profile::UserProfile,
    profile::ProfileStats,
    receipt::{CartReceipt, OrderReceipt, format_shares},
    samples,
    session::Session,
};

use crate::config::{CartArgs, Command, Config, MenuArgs, OrderArgs, PayArgs};

mod config;
mod logging;
mod menu;

type CliSession<'c> = Session<'c, TracingSink>;

fn main() -> anyhow::Result<()> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => err.exit(),
    };

    logging::init_subscriber(&config.logging)?;

    let catalog = match &config.menu_dir {
        Some(dir) => Catalog::from_fixture(dir, &config.menu)
            .with_context(|| format!("loading menu {:?} from {}", config.menu, dir.display()))?,
        None => Catalog::builtin()?,
    };

    info!(items = catalog.len(), currency = catalog.currency().iso_alpha_code, "menu loaded");

    let stdout = io::stdout();
    let colored = stdout.is_terminal();
    let mut out = stdout.lock();

    match config.command {
        Command::Menu(args) => list_menu(&mut out, &catalog, args)?,
        Command::Order(args) => {
            let mut session = new_session(&catalog)?;
            send_order(&mut out, &mut session, args, colored)?;
        }
        Command::Pay(args) => {
            let mut session = new_session(&catalog)?;
            pay_bill(&mut out, &mut session, args, colored)?;
        }
        Command::History => show_history(&mut out, &catalog, colored)?,
    }

    out.flush()?;

    Ok(())
}

fn new_session(catalog: &Catalog) -> anyhow::Result<CliSession<'_>> {
    let guest = UserProfile::new("Invitado", "invitado@comanda.local", "")?;

    Ok(Session::new(catalog, guest, TracingSink))
}

fn list_menu(out: &mut impl Write, catalog: &Catalog, args: MenuArgs) -> anyhow::Result<()> {
    let mut query = MenuQuery::new().category(args.category);

    if let Some(term) = args.search {
        query = query.term(term);
    }

    if let Some(tag) = args.dietary {
        query = query.dietary(tag);
    }

    let shown = menu::write_menu(out, catalog, &query)?;

    debug!(shown, "menu listed");

    Ok(())
}

fn fill_cart(session: &mut CliSession<'_>, args: &CartArgs) -> anyhow::Result<()> {
    for (id, count) in &args.items {
        session.add_units_to_cart(id, *count)?;
    }

    for (id, quantity) in &args.quantities {
        session.change_quantity(id, *quantity);
    }

    Ok(())
}

fn write_cart(out: &mut impl Write, session: &CliSession<'_>, colored: bool) -> anyhow::Result<()> {
    if !session.cart().is_empty() {
        CartReceipt::new(session.cart())
            .colored(colored)
            .write_to(out)?;
    }

    Ok(())
}

fn send_order(
    out: &mut impl Write,
    session: &mut CliSession<'_>,
    args: OrderArgs,
    colored: bool,
) -> anyhow::Result<()> {
    fill_cart(session, &args.cart)?;
    write_cart(out, session, colored)?;

    let mut request = OrderRequest::new(args.table);

    if let Some(notes) = args.notes {
        request = request.with_instructions(notes);
    }

    let id = session.place_order(request)?;

    if let Some(order) = session.orders().get(id) {
        OrderReceipt::new(order).colored(colored).write_to(out)?;
    }

    Ok(())
}

fn pay_bill(
    out: &mut impl Write,
    session: &mut CliSession<'_>,
    args: PayArgs,
    colored: bool,
) -> anyhow::Result<()> {
    fill_cart(session, &args.cart)?;
    write_cart(out, session, colored)?;

    let mut request = PaymentRequest::new(args.method);

    if let Some(people) = args.split {
        request = request.split(BillSplit::new(people)?);
    }

    if let Some(number) = args.card_number {
        request = request.with_card(CardDetails {
            number,
            ..CardDetails::default()
        });
    }

    let payment = session.pay(request)?;

    if let Some(order) = session.orders().get(payment.order) {
        OrderReceipt::new(order).colored(colored).write_to(&mut *out)?;
    }

    if payment.split.is_some() {
        let shares = format_shares(&payment.shares(), session.cart().currency());

        writeln!(out, "Cuotas: {shares}")?;
    }

    Ok(())
}

fn show_history(out: &mut impl Write, catalog: &Catalog, colored: bool) -> anyhow::Result<()> {
    let session = Session::new(catalog, samples::profile()?, TracingSink)
        .with_history(samples::history(catalog)?);

    for order in session.orders().orders() {
        OrderReceipt::new(order).colored(colored).write_to(&mut *out)?;
    }

    let ProfileStats {
        total_orders,
        total_spent,
        average_rating,
        favorite_category,
    } = session.profile_stats();

    writeln!(out, "{}", session.profile().name())?;
    writeln!(
        out,
        "Pedidos: {total_orders} · Total gastado: {}",
        total_spent.money(catalog.currency())
    )?;

    if let Some(rating) = average_rating {
        writeln!(out, "Calificación promedio: {rating:.1}")?;
    }

    if let Some(category) = favorite_category {
        writeln!(out, "Categoría favorita: {category}")?;
    }

    Ok(())
}
