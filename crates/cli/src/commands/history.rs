//! Order history command.

use beanstall_core::format_won;
use beanstall_storefront::ApiClient;
use beanstall_storefront::services;

use super::CliError;

/// Print every order placed with `email`.
#[allow(clippy::print_stdout)]
pub async fn show(client: &ApiClient, email: &str) -> Result<(), CliError> {
    let Some(history) = services::history::lookup(client, email).await? else {
        println!("No orders found for {email}.");
        return Ok(());
    };

    for (n, order) in history.orders.iter().enumerate() {
        println!("Order {} - {} ({:05})", n + 1, order.address, order.postcode);
        for item in &order.items {
            println!(
                "  {:>3} x {} ({})",
                item.count,
                item.menu_name,
                format_won(u64::from(item.menu_price))
            );
        }
        println!("  Subtotal: {}", format_won(order.total_price()));
    }
    println!("Total spent: {}", format_won(history.total_price()));
    Ok(())
}
