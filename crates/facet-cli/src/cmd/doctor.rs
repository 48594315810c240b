use anyhow::Result;
use serde::Serialize;

use crate::output;

#[derive(Debug, Serialize)]
pub struct Check {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct DoctorOut {
    pub ok: bool,
    pub checks: Vec<Check>,
}

pub async fn run(api_url: &str) -> Result<()> {
    let mut checks = Vec::new();

    let parsed = reqwest::Url::parse(api_url);
    checks.push(Check {
        name: "api-url".to_string(),
        ok: parsed.is_ok(),
        detail: match &parsed {
            Ok(u) => format!("{u}"),
            Err(e) => format!("{e}"),
        },
    });

    // Reachability is advisory; offline use (estimate) works without it.
    let reachable = match &parsed {
        Err(_) => Check {
            name: "api-reachable".to_string(),
            ok: false,
            detail: "skipped (url did not parse)".to_string(),
        },
        Ok(u) => match probe(u.as_str()).await {
            Ok(status) => Check {
                name: "api-reachable".to_string(),
                ok: true,
                detail: format!("status {status}"),
            },
            Err(e) => Check {
                name: "api-reachable".to_string(),
                ok: false,
                detail: format!("{e}"),
            },
        },
    };
    checks.push(reachable);

    let ok = checks.iter().all(|c| c.ok || c.name == "api-reachable");
    output::print(&DoctorOut { ok, checks })?;
    Ok(())
}

async fn probe(url: &str) -> Result<u16> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()?;
    let response = client.get(url).send().await?;
    Ok(response.status().as_u16())
}
