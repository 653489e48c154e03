//! Session
//!
//! The screen-level logic of the ordering app. A [`Session`] owns the one
//! cart, the order history and the profile for a diner, borrows the menu,
//! and reports the outcome of every action to its [`NotificationSink`].
//! Precondition failures come back as errors *and* as destructive notices.

use jiff::Timestamp;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    cart::{Cart, CartLine, ProductId, QuantityUpdate},
    catalog::Catalog,
    notifications::{Notice, NotificationSink},
    orders::{self, ESTIMATED_WAIT_MINUTES, OrderError, OrderHistory, OrderId, OrderRequest, OrderStatus},
    payment::{self, Payment, PaymentError, PaymentRequest},
    profile::{ProfileError, ProfileStats, ProfileUpdate, UserProfile},
};

/// Errors surfaced by session actions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The menu has no item with this id.
    #[error("menu item {0} not found")]
    UnknownMenuItem(ProductId),

    /// Order placement or history error
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Payment error
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Profile validation error
    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// Where timestamps for new orders come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    /// The system clock
    #[default]
    System,

    /// Always the same instant
    Fixed(Timestamp),
}

impl Clock {
    /// Current time according to this clock.
    pub fn now(self) -> Timestamp {
        match self {
            Clock::System => Timestamp::now(),
            Clock::Fixed(timestamp) => timestamp,
        }
    }
}

/// One diner's ordering session.
#[derive(Debug)]
pub struct Session<'c, S> {
    catalog: &'c Catalog,
    cart: Cart,
    orders: OrderHistory,
    profile: UserProfile,
    sink: S,
    clock: Clock,
}

impl<'c, S: NotificationSink> Session<'c, S> {
    /// Start a session with an empty cart and no orders.
    pub fn new(catalog: &'c Catalog, profile: UserProfile, sink: S) -> Self {
        Self {
            catalog,
            cart: Cart::new(catalog.currency()),
            orders: OrderHistory::new(),
            profile,
            sink,
            clock: Clock::System,
        }
    }

    /// Continue from an existing order history.
    #[must_use]
    pub fn with_history(mut self, orders: OrderHistory) -> Self {
        self.orders = orders;
        self
    }

    /// Use the given clock for order timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// The menu
    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// The active cart
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// All orders so far
    pub fn orders(&self) -> &OrderHistory {
        &self.orders
    }

    /// The diner's profile
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// The notification sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Give back the sink, ending the session.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Add one unit of a menu item to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownMenuItem`] if the id is not on the menu.
    pub fn add_to_cart(&mut self, id: &ProductId) -> Result<(), SessionError> {
        self.add_units_to_cart(id, 1)
    }

    /// Add several units of a menu item in one step, with a single notice.
    /// Zero units only checks the id.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownMenuItem`] if the id is not on the menu.
    pub fn add_units_to_cart(&mut self, id: &ProductId, quantity: u32) -> Result<(), SessionError> {
        let Some(item) = self.catalog.get(id) else {
            warn!(product = %id, "add to cart: unknown menu item");
            self.sink.notify(Notice::destructive(
                "Producto no encontrado",
                format!("El producto {id} no está en el menú."),
            ));

            return Err(SessionError::UnknownMenuItem(id.clone()));
        };

        if quantity == 0 {
            return Ok(());
        }

        self.cart.add_units(item.cart_product(), quantity);

        debug!(
            product = %id,
            quantity,
            item_count = self.cart.item_count(),
            total = *self.cart.total(),
            "added to cart"
        );

        let description = if quantity == 1 {
            format!("{} ha sido agregado a tu pedido.", item.name)
        } else {
            format!("{quantity} × {} han sido agregados a tu pedido.", item.name)
        };

        self.sink
            .notify(Notice::info("Agregado al carrito", description));

        Ok(())
    }

    /// Set the quantity of a cart line; zero removes it.
    pub fn change_quantity(&mut self, id: &ProductId, quantity: u32) -> QuantityUpdate {
        let outcome = self.cart.update_quantity(id, quantity);

        match &outcome {
            QuantityUpdate::Removed(line) => {
                debug!(product = %line.id(), "quantity dropped to zero; line removed");
                self.notify_removed();
            }
            QuantityUpdate::Updated { previous, quantity } => {
                debug!(product = %id, previous, quantity, "quantity updated");
            }
            QuantityUpdate::Missing => {
                debug!(product = %id, "quantity change for product not in cart");
            }
        }

        outcome
    }

    /// Remove a line from the cart.
    pub fn remove_from_cart(&mut self, id: &ProductId) -> Option<CartLine> {
        let removed = self.cart.remove_item(id);

        if removed.is_some() {
            debug!(product = %id, "removed from cart");
            self.notify_removed();
        }

        removed
    }

    /// Send the cart to the kitchen.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Order`] if the cart is empty or the table number is blank.
    pub fn place_order(&mut self, request: OrderRequest) -> Result<OrderId, SessionError> {
        let now = self.clock.now();

        match orders::place_order(&mut self.cart, &mut self.orders, request, now) {
            Ok(order) => {
                let id = order.id();
                let table = order.table_number().unwrap_or_default().to_string();

                info!(order = %id, table = %table, total = *order.total(), "order placed");

                self.sink.notify(Notice::info(
                    "¡Pedido enviado! 🎉",
                    format!(
                        "Tu pedido para la mesa {table} ha sido enviado a cocina. Tiempo estimado: {}-{} minutos.",
                        ESTIMATED_WAIT_MINUTES.start(),
                        ESTIMATED_WAIT_MINUTES.end()
                    ),
                ));

                Ok(id)
            }
            Err(err) => {
                warn!(error = %err, "order rejected");

                let notice = match err {
                    OrderError::EmptyCart => Notice::destructive(
                        "Carrito vacío",
                        "Agrega algunos platos antes de realizar el pedido.",
                    ),
                    OrderError::MissingTable => Notice::destructive(
                        "Número de mesa requerido",
                        "Por favor ingresa tu número de mesa.",
                    ),
                    ref other => Notice::destructive("Error", other.to_string()),
                };

                self.sink.notify(notice);

                Err(err.into())
            }
        }
    }

    /// Pay for the cart.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Payment`] if the cart is empty.
    pub fn pay(&mut self, request: PaymentRequest) -> Result<Payment, SessionError> {
        let now = self.clock.now();

        match payment::pay(&mut self.cart, &mut self.orders, request, now) {
            Ok(payment) => {
                info!(
                    order = %payment.order,
                    method = payment.method.label(),
                    amount = *payment.amount,
                    per_person = *payment.per_person,
                    "payment processed"
                );

                let suffix = if payment.split.is_some() {
                    " por persona"
                } else {
                    ""
                };

                self.sink.notify(Notice::info(
                    "🎉 ¡Pago exitoso!",
                    format!(
                        "Se ha procesado el pago por {}{suffix}. ¡Gracias por tu preferencia!",
                        payment.per_person.money(self.cart.currency())
                    ),
                ));

                Ok(payment)
            }
            Err(err) => {
                warn!(error = %err, "payment rejected");

                let description = match err {
                    PaymentError::EmptyCart => "No hay productos en el carrito para pagar.".to_string(),
                    PaymentError::InvalidSplit(_) => err.to_string(),
                };

                self.sink.notify(Notice::destructive("Error", description));

                Err(err.into())
            }
        }
    }

    /// Move an order along the kitchen workflow.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Order`] for unknown ids.
    pub fn advance_order(&mut self, id: OrderId) -> Result<OrderStatus, SessionError> {
        let status = self.orders.advance(id)?;

        debug!(order = %id, status = status.label(), "order advanced");

        Ok(status)
    }

    /// Rate a completed order.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Order`] for unknown or open orders and invalid ratings.
    pub fn rate_order(&mut self, id: OrderId, stars: u8) -> Result<(), SessionError> {
        match self.orders.rate(id, stars) {
            Ok(()) => {
                self.sink.notify(Notice::info(
                    "¡Gracias por tu calificación!",
                    format!("Has calificado este pedido con {stars} estrellas."),
                ));

                Ok(())
            }
            Err(err) => {
                self.sink
                    .notify(Notice::destructive("No se pudo calificar", err.to_string()));

                Err(err.into())
            }
        }
    }

    /// Put the dishes of a previous order back into the cart.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Order`] for unknown ids.
    pub fn reorder(&mut self, id: OrderId) -> Result<u64, SessionError> {
        match self.orders.reorder(id, &mut self.cart) {
            Ok(units) => {
                debug!(order = %id, units, "reordered");

                self.sink.notify(Notice::info(
                    "Pedido agregado al carrito",
                    "Los mismos platos han sido agregados a tu carrito actual.",
                ));

                Ok(units)
            }
            Err(err) => {
                self.sink
                    .notify(Notice::destructive("Error", err.to_string()));

                Err(err.into())
            }
        }
    }

    /// Save edits from the profile form.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Profile`] if a field is invalid; the profile is left unchanged.
    pub fn save_profile(&mut self, update: ProfileUpdate) -> Result<(), SessionError> {
        match self.profile.apply(update) {
            Ok(()) => {
                self.sink.notify(Notice::info(
                    "Perfil actualizado",
                    "Tus datos han sido guardados exitosamente.",
                ));

                Ok(())
            }
            Err(err) => {
                self.sink
                    .notify(Notice::destructive("Datos inválidos", err.to_string()));

                Err(err.into())
            }
        }
    }

    /// Add or remove a dietary preference.
    pub fn toggle_preference(&mut self, tag: &str) -> bool {
        self.profile.toggle_preference(tag)
    }

    /// Profile statistics derived from the order history.
    pub fn profile_stats(&self) -> ProfileStats {
        ProfileStats::from_history(&self.orders, self.catalog)
    }

    fn notify_removed(&mut self) {
        self.sink.notify(Notice::info(
            "Producto eliminado",
            "El producto ha sido eliminado de tu carrito.",
        ));
    }
}
