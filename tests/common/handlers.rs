//! Domain handlers shared by the integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use param_binding::{BoundValue, HandlerFailure, ParamHandler, ResolutionContext};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const CUSTOMER_HANDLER: &str = "shop::CustomerHandler";
pub const DATE_HANDLER: &str = "shop::DateHandler";
pub const ORDER_HANDLER: &str = "shop::OrderHandler";
pub const BROKEN_HANDLER: &str = "shop::BrokenHandler";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: u64,
    pub name: String,
}

/// Looks customers up by numeric id in a fixed table.
#[derive(Debug)]
pub struct CustomerHandler {
    customers: HashMap<u64, String>,
    constructions: Arc<AtomicUsize>,
}

impl Default for CustomerHandler {
    fn default() -> Self {
        Self::with_counter(Arc::new(AtomicUsize::new(0)))
    }
}

impl CustomerHandler {
    pub fn with_counter(constructions: Arc<AtomicUsize>) -> Self {
        let customers = HashMap::from([(1, "Ovid".to_string()), (2, "Corinna".to_string())]);
        Self {
            customers,
            constructions,
        }
    }
}

impl ParamHandler for CustomerHandler {
    fn construct(
        &self,
        context: &ResolutionContext,
        name: &str,
    ) -> Result<BoundValue, HandlerFailure> {
        self.constructions.fetch_add(1, Ordering::SeqCst);

        let raw = context.raw_param(name).unwrap_or_default();
        let id: u64 = raw
            .parse()
            .map_err(|_| HandlerFailure::new(format!("Invalid id ({raw}) for {name}")))?;
        let customer_name = self
            .customers
            .get(&id)
            .ok_or_else(|| HandlerFailure::new(format!("Could not find customer for ({id})")))?;

        Ok(BoundValue::new(Customer {
            id,
            name: customer_name.clone(),
        }))
    }
}

/// Builds a date from `{name}_year`, `{name}_month` and `{name}_day`.
#[derive(Debug, Default)]
pub struct DateHandler;

impl ParamHandler for DateHandler {
    fn construct(
        &self,
        context: &ResolutionContext,
        name: &str,
    ) -> Result<BoundValue, HandlerFailure> {
        let part = |suffix: &str| -> Result<u32, HandlerFailure> {
            let key = format!("{name}_{suffix}");
            context
                .raw_param(&key)
                .ok_or_else(|| HandlerFailure::new(format!("Missing {key}")))?
                .parse()
                .map_err(|_| HandlerFailure::new(format!("Invalid {key}")))
        };

        let year = part("year")?;
        let month = part("month")?;
        let day = part("day")?;
        let date = i32::try_from(year)
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, month, day))
            .ok_or_else(|| HandlerFailure::new(format!("Invalid date for {name}")))?;

        Ok(BoundValue::new(date))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub number: String,
    pub customer: Customer,
}

/// Builds an order for the `customer` parameter, resolved through the context.
#[derive(Debug, Default)]
pub struct OrderHandler;

impl ParamHandler for OrderHandler {
    fn construct(
        &self,
        context: &ResolutionContext,
        name: &str,
    ) -> Result<BoundValue, HandlerFailure> {
        let number = context
            .raw_param(name)
            .ok_or_else(|| HandlerFailure::new("No order number supplied"))?
            .to_string();
        let customer = context
            .bound::<Customer>("customer")
            .ok_or_else(|| HandlerFailure::new(format!("Order {number} has no valid customer")))?;

        Ok(BoundValue::new(Order {
            number,
            customer: (*customer).clone(),
        }))
    }
}
