use std::io;

use serde_json::json;
use telerivet::{Auth, Params, TelerivetClient};
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
    let to_number = required_env("TELERIVET_TO_NUMBER")?;
    let content = std::env::var("TELERIVET_MESSAGE")
        .unwrap_or_else(|_| "Hello from the telerivet demo.".to_owned());

    let client = TelerivetClient::new(Auth::api_key(api_key)?)?;
    let project = client.init_project_by_id(&project_id);

    let mut options = Params::new();
    options.insert("to_number".to_owned(), json!(to_number));
    options.insert("content".to_owned(), json!(content));
    let message = project.send_message(options).await?;

    println!(
        "id: {:?}, status: {:?}",
        message.id()?,
        message.status()?
    );
    Ok(())
}
