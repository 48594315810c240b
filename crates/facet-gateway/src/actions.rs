//! Secondary product actions: wishlist / compare / cart toggles and
//! share-by-email.
//!
//! These are independent of the filter chain: they never touch resolver
//! state, and a failure here leaves whatever toggle state the server already
//! had. Caller identity travels explicitly in a [`ClientContext`] on every
//! call; nothing is read from ambient state.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use facet_core::gateway::ClientContext;
use facet_core::{FacetError, FacetResult};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Which product list a check/toggle targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Wishlist,
    Compare,
    Cart,
}

impl ActionKind {
    fn segment(self) -> &'static str {
        match self {
            Self::Wishlist => "wishlist",
            Self::Compare => "compare",
            Self::Cart => "cart",
        }
    }
}

#[derive(Debug, Serialize)]
struct ActionBody {
    products_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    customers_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retailers_id: Option<i64>,
}

impl ActionBody {
    fn new(product_id: i64, ctx: &ClientContext) -> Self {
        Self {
            products_id: product_id,
            customers_id: ctx.customer_id,
            retailers_id: ctx.retailer_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ActionState {
    #[serde(default)]
    active: bool,
}

/// A product-share request sent to the storefront mailer.
#[derive(Debug, Clone, Serialize)]
pub struct ShareRequest {
    pub products_id: i64,
    pub recipient_email: String,
    pub sender_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customers_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retailers_id: Option<i64>,
}

/// Client for the secondary-action endpoints.
#[derive(Debug, Clone)]
pub struct ActionClient {
    base: Url,
    http: reqwest::Client,
}

impl ActionClient {
    pub fn new(base_url: &str) -> FacetResult<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| FacetError::invalid_argument(format!("invalid base url: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FacetError::gateway(format!("http client: {e}")))?;
        Ok(Self { base, http })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base.as_str().trim_end_matches('/'), path)
    }

    /// Whether the product is currently in the given list.
    pub async fn check(
        &self,
        kind: ActionKind,
        product_id: i64,
        ctx: &ClientContext,
    ) -> FacetResult<bool> {
        let path = format!("{}/check", kind.segment());
        self.post_state(&path, &ActionBody::new(product_id, ctx)).await
    }

    /// Toggle membership; returns the new state.
    pub async fn toggle(
        &self,
        kind: ActionKind,
        product_id: i64,
        ctx: &ClientContext,
    ) -> FacetResult<bool> {
        let path = format!("{}/toggle", kind.segment());
        self.post_state(&path, &ActionBody::new(product_id, ctx)).await
    }

    /// Send a share-by-email request.
    pub async fn share(&self, request: &ShareRequest) -> FacetResult<()> {
        let url = self.endpoint("product-share");
        debug!(%url, products_id = request.products_id, "share request");
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| FacetError::gateway(format!("POST product-share: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FacetError::gateway(format!(
                "POST product-share: status {status}"
            )));
        }
        Ok(())
    }

    async fn post_state(&self, path: &str, body: &ActionBody) -> FacetResult<bool> {
        let url = self.endpoint(path);
        debug!(%url, products_id = body.products_id, "action request");
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| FacetError::gateway(format!("POST {path}: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FacetError::gateway(format!("POST {path}: status {status}")));
        }
        let state: ActionState = response
            .json()
            .await
            .map_err(|e| FacetError::malformed(format!("POST {path}: {e}")))?;
        Ok(state.active)
    }
}
