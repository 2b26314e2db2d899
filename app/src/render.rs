// app/src/render.rs

//! Plain-text renderings of the catalog and the cart.

use storefront::{Cart, CatalogView, Decimal, Product};
use tabled::{builder::Builder, settings::Style};

fn money(amount: Decimal) -> String {
  format!("${:.2}", amount)
}

fn status_chip(product: &Product) -> &'static str {
  if product.is_enabled {
    "Enabled"
  } else {
    "Disabled"
  }
}

/// One row per product, in the order the API returned them.
pub fn product_table(products: &[Product]) -> String {
  let mut builder = Builder::default();
  builder.push_record(["ID", "Name", "Status", "Price", "Weight", "Description"]);
  for product in products {
    builder.push_record([
      product.id.to_string(),
      product.name.clone(),
      status_chip(product).to_string(),
      money(product.price),
      format!("{} kg", product.weight),
      product.description.clone(),
    ]);
  }
  let mut table = builder.build();
  table.with(Style::modern_rounded());
  table.to_string()
}

pub fn catalog(view: &CatalogView) -> String {
  match view {
    CatalogView::Loading => "Loading products...".to_string(),
    CatalogView::Failed(message) => format!("Error: {message}"),
    CatalogView::Ready(products) if products.is_empty() => "No products available.".to_string(),
    CatalogView::Ready(products) => product_table(products),
  }
}

pub fn cart(cart: &Cart) -> String {
  let mut out = format!("Shopping Cart ({} items)\n", cart.item_count());
  if !cart.is_empty() {
    let mut builder = Builder::default();
    builder.push_record(["Product", "Qty", "Each", "Discount", "Line total"]);
    for line in cart.lines() {
      builder.push_record([
        line.name.clone(),
        line.quantity.to_string(),
        money(line.price),
        money(line.discount),
        money(line.total),
      ]);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    out.push_str(&table.to_string());
    out.push('\n');
  }
  out.push_str(&format!("Total: {}", money(cart.grand_total())));
  out
}
