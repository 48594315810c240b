use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use facet_core::dimension::FilterDimension;
use facet_core::gateway::PricingContext;
use facet_core::resolver::{DiagnosticLevel, Outcome, ResolveDiagnostic, Session, SessionSnapshot};
use facet_core::selection::SelectionValue;
use facet_gateway::CatalogClient;

use crate::output;

#[derive(Debug, Serialize)]
pub struct ResolveOut {
    pub outcome: Outcome,
    pub diagnostics: Vec<ResolveDiagnostic>,
    pub session: SessionSnapshot,
}

pub async fn run(api_url: &str, slug: &str, set: &[String], pricing: &[String]) -> Result<()> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));

    pb.set_message("connecting");
    let client = CatalogClient::new(api_url)?;

    let mut ctx = PricingContext::default();
    for pair in pricing {
        let (key, value) = split_pair(pair)?;
        ctx = ctx.with(key, value);
    }

    pb.set_message(format!("loading {slug}"));
    let (mut session, mut report) = Session::initialize(client, slug, ctx).await?;
    let mut diagnostics = report.diagnostics.clone();

    for pair in set {
        let (dim, value) = parse_selection(pair)?;
        pb.set_message(format!("selecting {dim}"));
        report = session.select(dim, value).await?;
        diagnostics.extend(report.diagnostics.iter().cloned());
    }

    pb.finish_and_clear();

    if !output::is_json() {
        for d in diagnostics
            .iter()
            .filter(|d| matches!(d.level, DiagnosticLevel::Warning))
        {
            output::eprintln_line(&format!("warning: {} ({})", d.message, d.code));
        }
    }

    let out = ResolveOut {
        outcome: report.outcome,
        diagnostics,
        session: session.snapshot(),
    };
    output::print(&out)?;
    Ok(())
}

fn split_pair(pair: &str) -> Result<(&str, &str)> {
    pair.split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got '{pair}'"))
}

/// Parse a `dimension=value` override. Diamond size takes a decimal size;
/// every other dimension takes a numeric id.
fn parse_selection(pair: &str) -> Result<(FilterDimension, SelectionValue)> {
    let (name, raw) = split_pair(pair)?;
    let dim = parse_dimension(name)?;
    let value = if dim == FilterDimension::DiamondSize {
        let size: f64 = raw
            .parse()
            .map_err(|_| anyhow!("diamondSize takes a decimal size, got '{raw}'"))?;
        SelectionValue::Size(size)
    } else {
        let id: i64 = raw
            .parse()
            .map_err(|_| anyhow!("{dim} takes a numeric id, got '{raw}'"))?;
        SelectionValue::Id(id)
    };
    Ok((dim, value))
}

fn parse_dimension(name: &str) -> Result<FilterDimension> {
    FilterDimension::ORDER
        .into_iter()
        .find(|d| d.as_str().eq_ignore_ascii_case(name))
        .ok_or_else(|| anyhow!("unknown dimension '{name}'"))
}
