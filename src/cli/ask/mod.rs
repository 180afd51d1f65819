//! Ask command - answers one question

use crate::infrastructure::services::QueryServiceTrait;

pub async fn run(query: String, session: Option<String>) -> anyhow::Result<()> {
    let config = super::init()?;
    let services = crate::create_services(&config).await?;

    let answer = services.query.ask(session.as_deref(), &query).await?;
    println!("{}", answer.response);

    Ok(())
}
