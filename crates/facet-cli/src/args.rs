use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug, Clone)]
#[command(name = "facet", version, about = "facet configurator CLI")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Storefront API base URL.
    #[arg(long, global = true, default_value = "http://127.0.0.1:8080/api")]
    pub api_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Resolve the filter chain for a page and print the session state.
    Resolve {
        /// Category navigation slug (e.g. "bands").
        slug: String,

        /// Selection overrides applied in order, as dimension=value
        /// (e.g. --set stoneType=1 --set diamondSize=0.5).
        #[arg(long = "set", value_name = "DIM=VALUE")]
        set: Vec<String>,

        /// Opaque pricing-context passthrough for the product query,
        /// as key=value.
        #[arg(long = "pricing", value_name = "KEY=VALUE")]
        pricing: Vec<String>,
    },

    /// Compute an estimate from a product JSON file and an optional
    /// ring-option JSON file, offline.
    Estimate {
        /// Path to a resolved-product JSON file.
        product: String,

        /// Path to a ring-size-option JSON file.
        #[arg(long)]
        ring_option: Option<String>,
    },

    /// Check or toggle a product in the wishlist/compare/cart lists.
    Action {
        #[arg(value_enum)]
        kind: ActionKindArg,

        product_id: i64,

        /// Toggle membership instead of just checking it.
        #[arg(long)]
        toggle: bool,

        #[arg(long)]
        customer_id: Option<i64>,

        #[arg(long)]
        retailer_id: Option<i64>,
    },

    /// Share a product by email.
    Share {
        product_id: i64,

        /// Recipient email address.
        #[arg(long)]
        to: String,

        /// Sender display name.
        #[arg(long)]
        from: String,

        #[arg(long)]
        message: Option<String>,

        #[arg(long)]
        customer_id: Option<i64>,

        #[arg(long)]
        retailer_id: Option<i64>,
    },

    /// Run environment checks.
    Doctor,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ActionKindArg {
    Wishlist,
    Compare,
    Cart,
}
