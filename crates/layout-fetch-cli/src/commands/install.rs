use anyhow::Result;
use layout_fetch::InstallRequest;
use layout_fetch_oryx::OryxClient;

/// Fetch and install the layout, printing a summary to stdout.
pub async fn run(client: &OryxClient, request: &InstallRequest) -> Result<()> {
    println!("Fetching layout {}...", request.layout.hash_id);

    let report = layout_fetch::run(client, client, request).await?;

    let title = report
        .revision
        .layout_title
        .as_deref()
        .unwrap_or(&request.layout.hash_id);
    println!(
        "Installed \"{title}\" ({} files) into {}",
        report.files_installed,
        report.destination.display()
    );

    if let Some(scratch) = &report.scratch_kept {
        println!("Scratch files kept in {}", scratch.display());
    }

    Ok(())
}
