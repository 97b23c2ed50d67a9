use crate::domain::model::SortCriterion;
use crate::utils::error::Result;
use async_trait::async_trait;
use url::Url;

/// Remote catalog the list is fetched from.
#[async_trait]
pub trait MovieSource: Send + Sync {
    fn build_request_url(&self, criterion: SortCriterion) -> Result<Url>;

    /// One GET; the full body on 2xx, an error otherwise. No retries.
    async fn fetch(&self, url: &Url) -> Result<String>;
}

/// Consulted before every fetch attempt, on the owner's context; must not block.
pub trait ConnectivityProbe: Send + Sync {
    fn is_network_available(&self) -> bool;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn api_key(&self) -> &str;
    fn image_base_url(&self) -> &str;
    fn image_size(&self) -> &str;
    fn request_timeout_secs(&self) -> u64;
    fn connectivity_probe_addr(&self) -> &str;
}
