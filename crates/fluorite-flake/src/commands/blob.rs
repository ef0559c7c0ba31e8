use colored::Colorize;
use fluorite_provision_vercel::VercelCli;

pub async fn handle_create(name: &str) -> anyhow::Result<()> {
    let cli = VercelCli::default();

    match cli.whoami().await? {
        Some(username) => tracing::debug!("vercel session: {username}"),
        None => {
            eprintln!(
                "{} vercel CLI is not logged in. Run `vercel login` first.",
                "error:".red().bold()
            );
            std::process::exit(1);
        }
    }

    println!("{}", format!("Creating Blob store {name}...").blue().bold());
    let store = cli.create_blob_store(name).await?;

    println!(
        "{} {} ({}) in {}",
        "Blob store created:".green().bold(),
        store.name.cyan(),
        store.id,
        store.region
    );

    // Token availability depends on the CLI version; the store itself is
    // already created, so a lookup failure is not fatal.
    match cli.get_store(&store.id).await {
        Ok(details) => match details.read_write_token {
            Some(token) => println!("Read/write token: {token}"),
            None => println!(
                "No read/write token in CLI output; fetch one from the Vercel dashboard"
            ),
        },
        Err(e) => tracing::warn!("could not fetch blob store details: {e}"),
    }

    println!("Link it to a project with: vercel blob store connect {}", store.id);
    Ok(())
}
