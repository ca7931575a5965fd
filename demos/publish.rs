use chrono::{Duration, Utc};
use std::path::PathBuf;
use tracing::info;

use vk_client::{
    application::models::post::Publication,
    config::Config,
    session::auth::VkAuth,
    session::manager::VkSessionManager,
    utils::logger::setup_logger,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logger();

    // Reads VK_* environment variables as defined in src/config.rs
    let config = Config::new();
    info!("Configuration loaded: {}", config);

    let group = config
        .groups
        .first()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("VK_GROUPS must name at least one group"))?;

    let mut manager = VkSessionManager::new(VkAuth::new(&config.rest_api));
    manager
        .initialize(
            &config.credentials.user_name,
            &config.credentials.access_token,
            &config.groups,
        )
        .await?;
    info!("Managing groups: {:?}", manager.state().groups());

    let group_id = manager.state().group_id(&group)?;
    for post in manager.state().scheduled_posts(group_id) {
        info!("Scheduled: {}", post);
    }

    // Image paths are taken from the command line
    let images: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    let publication = Publication::new("Scheduled from vk_client", Utc::now() + Duration::hours(1))
        .with_images(images);

    let post_id = manager.post_publication(&group, &publication).await?;
    info!("Post {} scheduled at {}", post_id, publication.publish_at);

    manager.update_group_scheduled_posts(&group).await?;
    manager.delete_last_scheduled_publication(&group).await?;
    info!("Latest scheduled post removed again");

    Ok(())
}
