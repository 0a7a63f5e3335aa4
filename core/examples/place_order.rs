// lazypipe/examples/place_order.rs

//! Order placement as a chain of fallible steps: validate, price, acknowledge.

use lazypipe::{Handle, PipeResult};
use std::collections::HashMap;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum OrderError {
  #[error("validation failed: {0}")]
  Validation(String),

  #[error("no price for product {0}")]
  Pricing(String),

  #[error("could not send acknowledgment to {0}")]
  Acknowledgment(String),
}

// --- Unvalidated input ---
#[derive(Debug, Clone)]
struct UnvalidatedOrder {
  order_id: String,
  customer_name: String,
  email: String,
  lines: Vec<UnvalidatedLine>,
}

#[derive(Debug, Clone)]
struct UnvalidatedLine {
  product_code: String,
  quantity: f64,
}

// --- Validated and priced order ---
#[derive(Debug, Clone, PartialEq)]
enum ProductCode {
  Widget(String),
  Gizmo(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Quantity {
  Units(u32),
  Kilograms(f64),
}

impl Quantity {
  fn value(&self) -> f64 {
    match self {
      Quantity::Units(n) => f64::from(*n),
      Quantity::Kilograms(kg) => *kg,
    }
  }
}

#[derive(Debug)]
struct ValidatedOrder {
  order_id: String,
  customer_name: String,
  email: String,
  lines: Vec<(ProductCode, Quantity)>,
}

#[derive(Debug)]
struct PricedOrder {
  order: ValidatedOrder,
  line_prices: Vec<f64>,
  amount_to_bill: f64,
}

#[derive(Debug)]
enum PlacedOrderEvent {
  OrderPlaced { order_id: String, amount_to_bill: f64 },
  AcknowledgmentSent { order_id: String, email: String },
}

fn string50(field: &str, value: &str) -> Result<String, OrderError> {
  match value.chars().count() {
    0 => Err(OrderError::Validation(format!("{field} must not be empty"))),
    n if n > 50 => Err(OrderError::Validation(format!("{field} must not be more than 50 chars"))),
    _ => Ok(value.to_string()),
  }
}

fn to_product_code(code: &str) -> Result<ProductCode, OrderError> {
  match code.chars().next() {
    Some('W') if code.len() == 5 => Ok(ProductCode::Widget(code.to_string())),
    Some('G') if code.len() == 5 => Ok(ProductCode::Gizmo(code.to_string())),
    _ => Err(OrderError::Validation(format!("invalid product code {code:?}"))),
  }
}

fn to_quantity(code: &ProductCode, quantity: f64) -> Result<Quantity, OrderError> {
  match code {
    ProductCode::Widget(_) => {
      if quantity.fract() != 0.0 || !(1.0..=1000.0).contains(&quantity) {
        return Err(OrderError::Validation(format!("unit quantity must be a whole number in 1..=1000, got {quantity}")));
      }
      Ok(Quantity::Units(quantity as u32))
    }
    ProductCode::Gizmo(_) => {
      if !(0.05..=100.0).contains(&quantity) {
        return Err(OrderError::Validation(format!("kilogram quantity must be in 0.05..=100, got {quantity}")));
      }
      Ok(Quantity::Kilograms(quantity))
    }
  }
}

fn validate_order(order: UnvalidatedOrder) -> Result<ValidatedOrder, OrderError> {
  let lines = order
    .lines
    .iter()
    .map(|line| -> Result<(ProductCode, Quantity), OrderError> {
      let code = to_product_code(&line.product_code)?;
      let quantity = to_quantity(&code, line.quantity)?;
      Ok((code, quantity))
    })
    .collect::<Result<Vec<_>, _>>()?;

  if !order.email.contains('@') {
    return Err(OrderError::Validation(format!("invalid email {:?}", order.email)));
  }
  Ok(ValidatedOrder {
    order_id: string50("order id", &order.order_id)?,
    customer_name: string50("customer name", &order.customer_name)?,
    email: order.email,
    lines,
  })
}

fn price_order(prices: HashMap<&'static str, f64>) -> impl FnOnce(ValidatedOrder) -> Result<PricedOrder, OrderError> + Send + 'static {
  move |order| {
    let line_prices = order
      .lines
      .iter()
      .map(|(code, quantity)| {
        let key = match code {
          ProductCode::Widget(c) | ProductCode::Gizmo(c) => c.as_str(),
        };
        prices
          .get(key)
          .map(|unit| unit * quantity.value())
          .ok_or_else(|| OrderError::Pricing(key.to_string()))
      })
      .collect::<Result<Vec<_>, _>>()?;
    let amount_to_bill = line_prices.iter().sum();
    Ok(PricedOrder {
      order,
      line_prices,
      amount_to_bill,
    })
  }
}

fn acknowledge_order(order: PricedOrder) -> Result<Vec<PlacedOrderEvent>, OrderError> {
  let letter = format!(
    "<p>Dear {}, your order {} totals {:.2}.</p>",
    order.order.customer_name, order.order.order_id, order.amount_to_bill
  );
  if order.order.email.ends_with(".invalid") {
    return Err(OrderError::Acknowledgment(order.order.email));
  }
  info!(email = %order.order.email, lines = order.line_prices.len(), "Sending acknowledgment: {}", letter);
  Ok(vec![
    PlacedOrderEvent::OrderPlaced {
      order_id: order.order.order_id.clone(),
      amount_to_bill: order.amount_to_bill,
    },
    PlacedOrderEvent::AcknowledgmentSent {
      order_id: order.order.order_id,
      email: order.order.email,
    },
  ])
}

fn place_order(order: UnvalidatedOrder) -> PipeResult<Result<Vec<PlacedOrderEvent>, OrderError>> {
  let prices = HashMap::from([("W1234", 2.5), ("G0001", 10.0)]);
  Handle::<UnvalidatedOrder, OrderError>::new(order)
    .try_map_into(validate_order)?
    .try_map_into(price_order(prices))?
    .try_map_into(acknowledge_order)?
    .value_result()
}

fn main() -> PipeResult<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();
  info!("--- Place Order Example ---");

  let order = UnvalidatedOrder {
    order_id: "ORD-001".to_string(),
    customer_name: "Alex Doe".to_string(),
    email: "alex@example.com".to_string(),
    lines: vec![
      UnvalidatedLine {
        product_code: "W1234".to_string(),
        quantity: 4.0,
      },
      UnvalidatedLine {
        product_code: "G0001".to_string(),
        quantity: 0.5,
      },
    ],
  };

  match place_order(order.clone())? {
    Ok(events) => info!("Order placed: {:?}", events),
    Err(e) => warn!("Order rejected: {}", e),
  }

  let mut unknown_product = order.clone();
  unknown_product.lines[0].product_code = "W9999".to_string();
  match place_order(unknown_product)? {
    Ok(events) => warn!("Order unexpectedly placed: {:?}", events),
    Err(e) => info!("Order rejected as expected: {}", e),
  }

  let mut fractional_units = order.clone();
  fractional_units.lines[0].quantity = 2.5;
  let outcome = place_order(fractional_units)?;
  info!("Outcome for 2.5 widgets: {:?}", outcome.as_ref().map(Vec::len));
  assert!(matches!(outcome, Err(OrderError::Validation(_))));

  let mut negative_weight = order.clone();
  negative_weight.lines[1].quantity = -1.0;
  assert!(matches!(place_order(negative_weight)?, Err(OrderError::Validation(_))));

  let mut bad_email = order;
  bad_email.email = "alex".to_string();
  let outcome = place_order(bad_email)?;
  info!("Outcome for a bad email: {:?}", outcome.as_ref().map(Vec::len));
  assert!(matches!(outcome, Err(OrderError::Validation(_))));

  info!("--- Place Order Example Finished ---");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quantities_outside_their_range_are_rejected() {
    let widget = ProductCode::Widget("W1234".to_string());
    let gizmo = ProductCode::Gizmo("G0001".to_string());
    assert_eq!(to_quantity(&widget, 3.0).ok(), Some(Quantity::Units(3)));
    assert!(to_quantity(&widget, 2.5).is_err());
    assert!(to_quantity(&widget, -4.0).is_err());
    assert!(to_quantity(&widget, 0.0).is_err());
    assert_eq!(to_quantity(&gizmo, 0.5).ok(), Some(Quantity::Kilograms(0.5)));
    assert!(to_quantity(&gizmo, -1.0).is_err());
    assert!(to_quantity(&gizmo, 250.0).is_err());
  }
}
