use anyhow::Result;

use crate::args::{Cli, Command};

mod actions;
mod doctor;
mod estimate;
mod resolve;

pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Resolve { slug, set, pricing } => {
            resolve::run(&cli.api_url, &slug, &set, &pricing).await
        }
        Command::Estimate {
            product,
            ring_option,
        } => estimate::run(&product, ring_option.as_deref()),
        Command::Action {
            kind,
            product_id,
            toggle,
            customer_id,
            retailer_id,
        } => actions::run_action(&cli.api_url, kind, product_id, toggle, customer_id, retailer_id).await,
        Command::Share {
            product_id,
            to,
            from,
            message,
            customer_id,
            retailer_id,
        } => {
            actions::run_share(
                &cli.api_url,
                product_id,
                to,
                from,
                message,
                customer_id,
                retailer_id,
            )
            .await
        }
        Command::Doctor => doctor::run(&cli.api_url).await,
    }
}
