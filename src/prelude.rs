//! Comanda prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartLine, CartProduct, CartState, ProductId, QuantityUpdate},
    catalog::{Catalog, CatalogError, Category, DietaryFilter, MenuItem, MenuItemKey, query::MenuQuery},
    notifications::{Notice, NotificationSink, RecordingSink, Severity, TracingSink},
    orders::{Order, OrderError, OrderHistory, OrderId, OrderRequest, OrderStatus},
    payment::{BillSplit, CardDetails, Payment, PaymentError, PaymentMethod, PaymentRequest},
    prices::Price,
    profile::{ProfileError, ProfileStats, ProfileUpdate, UserProfile},
    receipt::{CartReceipt, OrderReceipt, ReceiptError},
    samples::SampleError,
    session::{Clock, Session, SessionError},
    tags::DietaryTags,
};
