use anyhow::Result;
use serde::Serialize;

use facet_core::gateway::ClientContext;
use facet_gateway::{ActionClient, ActionKind, ShareRequest};

use crate::args::ActionKindArg;
use crate::output;

#[derive(Debug, Serialize)]
pub struct ActionOut {
    pub kind: String,
    pub product_id: i64,
    pub toggled: bool,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct ShareOut {
    pub product_id: i64,
    pub sent: bool,
}

pub async fn run_action(
    api_url: &str,
    kind: ActionKindArg,
    product_id: i64,
    toggle: bool,
    customer_id: Option<i64>,
    retailer_id: Option<i64>,
) -> Result<()> {
    let client = ActionClient::new(api_url)?;
    let ctx = ClientContext {
        customer_id,
        retailer_id,
    };
    let kind = map_kind(kind);

    let active = if toggle {
        client.toggle(kind, product_id, &ctx).await?
    } else {
        client.check(kind, product_id, &ctx).await?
    };

    output::print(&ActionOut {
        kind: format!("{kind:?}").to_lowercase(),
        product_id,
        toggled: toggle,
        active,
    })?;
    Ok(())
}

pub async fn run_share(
    api_url: &str,
    product_id: i64,
    to: String,
    from: String,
    message: Option<String>,
    customer_id: Option<i64>,
    retailer_id: Option<i64>,
) -> Result<()> {
    let client = ActionClient::new(api_url)?;
    client
        .share(&ShareRequest {
            products_id: product_id,
            recipient_email: to,
            sender_name: from,
            message,
            customers_id: customer_id,
            retailers_id: retailer_id,
        })
        .await?;

    output::print(&ShareOut {
        product_id,
        sent: true,
    })?;
    Ok(())
}

fn map_kind(kind: ActionKindArg) -> ActionKind {
    match kind {
        ActionKindArg::Wishlist => ActionKind::Wishlist,
        ActionKindArg::Compare => ActionKind::Compare,
        ActionKindArg::Cart => ActionKind::Cart,
    }
}
