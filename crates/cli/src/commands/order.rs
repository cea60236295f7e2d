//! Order placement command.

use std::str::FromStr;

use beanstall_core::{MenuId, OrderForm, format_won};
use beanstall_storefront::services::{self, checkout::CheckoutOutcome};
use beanstall_storefront::{ApiClient, ClientError, Session};

use super::CliError;

/// One `--item` argument: `ID` or `ID=COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemArg {
    pub id: MenuId,
    pub count: u32,
}

impl FromStr for ItemArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, count) = match s.split_once('=') {
            Some((id, count)) => {
                let count: u32 = count
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid count in '{s}'"))?;
                (id, count)
            }
            None => (s, 1),
        };
        if count == 0 {
            return Err(format!("count must be at least 1 in '{s}'"));
        }
        let id = id.parse().map_err(|_| format!("invalid menu id in '{s}'"))?;
        Ok(Self { id, count })
    }
}

/// Fill a cart from `items` and check out.
#[allow(clippy::print_stdout)]
pub async fn place(
    client: &ApiClient,
    email: &str,
    address: &str,
    postcode: &str,
    items: &[ItemArg],
) -> Result<(), CliError> {
    let mut session = Session::new();
    services::catalog::refresh(client, &mut session).await?;

    for item in items {
        if !session.catalog().contains(item.id) {
            return Err(CliError::UnknownItem(item.id));
        }
        for _ in 0..item.count {
            session.add_to_cart(item.id).map_err(ClientError::from)?;
        }
    }
    *session.form_mut() = OrderForm::new(email, address, postcode);

    for (item, quantity) in session.cart().entries(session.catalog()) {
        println!("{quantity:>3} x {} ({})", item.name, item.price);
    }
    println!("Total: {}", format_won(session.total_price()));

    match services::checkout::checkout(client, &mut session).await? {
        CheckoutOutcome::NothingToOrder => println!("Nothing to order."),
        CheckoutOutcome::Placed(receipt) => {
            println!(
                "{}",
                receipt
                    .ack
                    .message
                    .as_deref()
                    .unwrap_or("Order placed. Thank you!")
            );
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_item_arg_parse() {
        assert_eq!(
            "3".parse::<ItemArg>().unwrap(),
            ItemArg {
                id: MenuId::new(3),
                count: 1
            }
        );
        assert_eq!(
            "12=4".parse::<ItemArg>().unwrap(),
            ItemArg {
                id: MenuId::new(12),
                count: 4
            }
        );
    }

    #[test]
    fn test_item_arg_rejects_bad_input() {
        assert!("x".parse::<ItemArg>().is_err());
        assert!("1=".parse::<ItemArg>().is_err());
        assert!("1=0".parse::<ItemArg>().is_err());
        assert!("1=-2".parse::<ItemArg>().is_err());
    }
}
