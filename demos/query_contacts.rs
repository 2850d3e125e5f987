use std::io;

use serde_json::json;
use telerivet::{Auth, Params, TelerivetClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let api_key = std::env::var("TELERIVET_API_KEY").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "TELERIVET_API_KEY environment variable is required",
        )
    })?;
    let project_id = std::env::var("TELERIVET_PROJECT_ID").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "TELERIVET_PROJECT_ID environment variable is required",
        )
    })?;
    let prefix = std::env::var("TELERIVET_NAME_PREFIX").ok();

    let client = TelerivetClient::new(Auth::api_key(api_key)?)?;
    let project = client.init_project_by_id(&project_id);

    let mut filter = Params::new();
    if let Some(prefix) = prefix {
        filter.insert("name".to_owned(), json!({ "prefix": prefix }));
    }
    filter.insert("sort".to_owned(), json!("name"));

    let cursor = project.query_contacts(filter)?;
    println!("matching contacts: {}", cursor.count().await?);

    let mut cursor = cursor.limit(25);
    cursor
        .each(|contact| match contact {
            Some(contact) => println!("{contact}"),
            None => println!("-- end --"),
        })
        .await?;

    println!("requests made: {}", client.num_requests());
    Ok(())
}
