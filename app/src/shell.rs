// app/src/shell.rs

//! Line-oriented front end: one command per line, parsed with clap.

use crate::errors::Result;
use crate::render;
use clap::{Parser, Subcommand};
use std::io::Write;
use storefront::{StoreError, Storefront, ToggleOutcome};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(multicall = true)]
struct ShellLine {
  #[command(subcommand)]
  command: ShellCommand,
}

#[derive(Debug, Subcommand)]
enum ShellCommand {
  /// Sign in and open the product listing
  Login { email: Option<String>, password: Option<String> },
  /// Forget the session token
  Logout,
  /// Show who is signed in
  Whoami,
  /// Reload and list all products
  Products,
  /// Flip a product between enabled and disabled
  Toggle { id: i64 },
  /// Add a product to the cart (quantity defaults to 1)
  Add { id: i64, quantity: Option<String> },
  /// Show the cart
  Cart,
  /// Leave the storefront
  #[command(alias = "exit")]
  Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFlow {
  Continue,
  Exit,
}

/// Reads a quantity the way the quantity dialog does: anything unparsable or
/// below one becomes one.
pub fn parse_quantity(raw: Option<&str>) -> u32 {
  let Some(raw) = raw else {
    return 1;
  };
  match raw.trim().parse::<i64>() {
    Ok(n) if n >= 1 => u32::try_from(n).unwrap_or(u32::MAX),
    _ => 1,
  }
}

pub struct Shell<'a, W: Write> {
  storefront: &'a Storefront,
  out: W,
}

impl<'a, W: Write> Shell<'a, W> {
  pub fn new(storefront: &'a Storefront, out: W) -> Self {
    Self { storefront, out }
  }

  pub fn greet(&mut self) -> Result<()> {
    let session = self.storefront.session().snapshot();
    match (session.is_authenticated(), session.user_email) {
      (true, Some(email)) => writeln!(self.out, "Welcome back, {email}. Type 'help' for commands.")?,
      _ => writeln!(self.out, "Storefront. Type 'login <email> <password>' to start, 'help' for commands.")?,
    }
    Ok(())
  }

  pub fn prompt(&mut self) -> Result<()> {
    write!(self.out, "> ")?;
    self.out.flush()?;
    Ok(())
  }

  /// Runs one input line.
  pub async fn execute(&mut self, line: &str) -> Result<ShellFlow> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
      return Ok(ShellFlow::Continue);
    }

    let command = match ShellLine::try_parse_from(words) {
      Ok(parsed) => parsed.command,
      Err(e) => {
        write!(self.out, "{}", e.render())?;
        return Ok(ShellFlow::Continue);
      }
    };
    debug!(?command, "Shell command parsed.");

    match command {
      ShellCommand::Login { email, password } => self.login(email, password).await?,
      ShellCommand::Logout => self.logout()?,
      ShellCommand::Whoami => self.whoami()?,
      ShellCommand::Products => self.products().await?,
      ShellCommand::Toggle { id } => self.toggle(id).await?,
      ShellCommand::Add { id, quantity } => self.add(id, parse_quantity(quantity.as_deref())).await?,
      ShellCommand::Cart => writeln!(self.out, "{}", render::cart(&self.storefront.cart()))?,
      ShellCommand::Quit => return Ok(ShellFlow::Exit),
    }
    Ok(ShellFlow::Continue)
  }

  async fn login(&mut self, email: Option<String>, password: Option<String>) -> Result<()> {
    let email = email.unwrap_or_default();
    let password = password.unwrap_or_default();
    match self.storefront.login(&email, &password).await {
      Ok(()) => {
        writeln!(self.out, "Signed in as {}.", self.storefront.session().user_email().unwrap_or(email))?;
        self.products().await
      }
      Err(e) if e.is_validation() => {
        writeln!(self.out, "{}", validation_message(&e))?;
        Ok(())
      }
      // The server accepted the credentials; only the durable copy is missing.
      Err(e @ StoreError::SessionStorage { .. }) => {
        writeln!(self.out, "!! Signed in, but the session could not be saved: {e}")?;
        self.products().await
      }
      Err(_) => {
        writeln!(self.out, "!! Login failed")?;
        Ok(())
      }
    }
  }

  // The token is gone from memory even when the durable write fails.
  fn logout(&mut self) -> Result<()> {
    match self.storefront.logout() {
      Ok(()) => writeln!(self.out, "Signed out.")?,
      Err(e) => writeln!(self.out, "!! Signed out, but the session could not be saved: {e}")?,
    }
    Ok(())
  }

  fn whoami(&mut self) -> Result<()> {
    let session = self.storefront.session().snapshot();
    let who = session.user_email.as_deref().unwrap_or("(no user email)");
    let state = if session.is_authenticated() { "signed in" } else { "signed out" };
    writeln!(self.out, "{who} ({state})")?;
    Ok(())
  }

  // The catalog records its own error state; the view shows it.
  async fn products(&mut self) -> Result<()> {
    let _loaded = self.storefront.load_products().await;
    writeln!(self.out, "{}", render::catalog(&self.storefront.catalog().view()))?;
    Ok(())
  }

  async fn toggle(&mut self, product_id: i64) -> Result<()> {
    match self.storefront.toggle_enabled(product_id).await {
      Ok(ToggleOutcome::NotCached) => {
        writeln!(self.out, "Product {product_id} is not in the listing.")?;
      }
      Ok(ToggleOutcome::Toggled { .. }) | Err(_) => {
        writeln!(self.out, "{}", render::catalog(&self.storefront.catalog().view()))?;
      }
    }
    Ok(())
  }

  // Pricing failures are logged by the library and not shown here.
  async fn add(&mut self, product_id: i64, quantity: u32) -> Result<()> {
    match self.storefront.add_to_cart_by_id(product_id, quantity).await {
      Ok(line) => {
        writeln!(self.out, "Added {} x {} to the cart.", line.name, quantity)?;
      }
      Err(e) if e.is_validation() => {
        writeln!(self.out, "{}", validation_message(&e))?;
      }
      Err(_) => {}
    }
    Ok(())
  }
}

fn validation_message(e: &StoreError) -> String {
  match e {
    StoreError::Validation(message) => message.clone(),
    other => other.to_string(),
  }
}
