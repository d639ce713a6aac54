//! Basic example walking a Backlog space.
//!
//! Run with:
//! ```
//! BACKLOG_SPACE_ID=your-space BACKLOG_API_KEY=your-key cargo run --example basic
//! ```

use backlog_api::{Backlog, Params};

#[tokio::main]
async fn main() -> backlog_api::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    let backlog = Backlog::from_env()?;
    println!("Connected to: {}", backlog.connector().base_url());

    println!("\n--- Listing Projects ---");
    let projects = backlog.projects().list(Params::new()).await?;
    let projects = projects.as_array().cloned().unwrap_or_default();
    println!("Found {} projects", projects.len());
    for project in &projects {
        println!("  - {} ({})", project["name"], project["projectKey"]);
    }

    let Some(first) = projects.first() else {
        return Ok(());
    };
    let project_key = first["projectKey"].as_str().unwrap_or_default();

    println!("\n--- Statuses in {project_key} ---");
    let statuses = backlog.projects().statuses(project_key).await?;
    for status in statuses.as_array().into_iter().flatten() {
        println!("  - {}", status["name"]);
    }

    println!("\n--- Recent Issues ---");
    let issues = backlog
        .issues()
        .list(
            Params::new()
                .with("projectId[]", &first["id"])
                .with("sort", "updated")
                .with("count", 5),
        )
        .await?;
    for issue in issues.as_array().into_iter().flatten() {
        println!("  {} {}", issue["issueKey"], issue["summary"]);

        let attachments = backlog
            .issues()
            .attachments(issue["issueKey"].as_str().unwrap_or_default())
            .await?;
        for attachment in attachments.as_array().into_iter().flatten() {
            println!("      attachment: {}", attachment["name"]);
        }
    }

    println!("\n--- Wiki Pages ---");
    let wikis = backlog.wikis().list(project_key).await?;
    for wiki in wikis.as_array().into_iter().flatten() {
        println!("  - {}", wiki["name"]);
    }

    println!("\nDone!");
    Ok(())
}
