use std::io;
use std::time::Duration;

use telerivet::{Auth, Entity, TelerivetClient};
use tracing_subscriber::EnvFilter;

fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let api_key = required_env("TELERIVET_API_KEY")?;
    let project_id = required_env("TELERIVET_PROJECT_ID")?;
    let contact_id = required_env("TELERIVET_CONTACT_ID")?;

    let client = TelerivetClient::builder(Auth::api_key(api_key)?)
        .timeout(Duration::from_secs(20))
        .build()?;
    let project = client.init_project_by_id(&project_id);

    let mut contact = project.init_contact_by_id(&contact_id)?;
    contact.load().await?;
    println!("before: {contact}");

    let visits = contact
        .var("visits")?
        .and_then(|value| value.as_i64())
        .unwrap_or(0);
    contact.set_var("visits", visits + 1)?;
    contact.save().await?;

    println!("after: {contact}");
    Ok(())
}
