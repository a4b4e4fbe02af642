use anyhow::Result;
use ems::{cli, view::Notice};

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    let (action, globals) = cli::start()?;

    if let Err(err) = action.execute(&globals).await {
        eprintln!("{}", Notice::Error(format!("{err:#}")));
        std::process::exit(1);
    }

    Ok(())
}
