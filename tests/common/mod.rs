#![allow(dead_code)]

pub mod handlers;
pub mod strategies;

pub use handlers::*;

use param_binding::{HandlerCatalog, ParamBinder, ParamHandler};
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

/// Catalog with the shop handlers installed; `BROKEN_HANDLER` always fails to load.
pub fn shop_catalog() -> Arc<HandlerCatalog> {
    shop_catalog_counting(Arc::new(AtomicUsize::new(0)))
}

/// Like [`shop_catalog`], counting customer constructions in `counter`.
pub fn shop_catalog_counting(counter: Arc<AtomicUsize>) -> Arc<HandlerCatalog> {
    let catalog = HandlerCatalog::new();
    catalog.register_loader(CUSTOMER_HANDLER, move || {
        Ok(Arc::new(CustomerHandler::with_counter(Arc::clone(&counter))) as Arc<dyn ParamHandler>)
    });
    catalog.register::<DateHandler>(DATE_HANDLER);
    catalog.register::<OrderHandler>(ORDER_HANDLER);
    catalog.register_loader(BROKEN_HANDLER, || {
        Err("Can't locate shop/broken_handler in the handler path".to_string())
    });
    Arc::new(catalog)
}

/// Isolated binder over the shop catalog with `customer` bound by default.
pub fn shop_binder() -> Arc<ParamBinder> {
    let binder = Arc::new(ParamBinder::with_catalog(shop_catalog()));
    binder
        .set_default("customer", CUSTOMER_HANDLER)
        .expect("customer handler is installed");
    binder
}
