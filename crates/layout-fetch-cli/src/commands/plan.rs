use anyhow::Result;
use layout_fetch::InstallRequest;
use layout_fetch_oryx::OryxClient;

/// Resolve the layout and print what an install would do.
pub async fn run(client: &OryxClient, request: &InstallRequest) -> Result<()> {
    let plan = layout_fetch::plan(client, request).await?;
    let revision = &plan.revision;

    println!("Layout:      {}", revision.layout_title.as_deref().unwrap_or("-"));
    println!("Revision:    {}", revision.hash_id.as_deref().unwrap_or("-"));
    if let Some(created_at) = &revision.created_at {
        println!("Created:     {created_at}");
    }
    if let Some(qmk_version) = &revision.qmk_version {
        println!("QMK version: {qmk_version}");
    }
    println!("Archive:     {}", revision.zip_url);
    println!("Source dir:  {}", plan.source_dir);
    println!("Destination: {}", plan.destination.display());

    Ok(())
}
