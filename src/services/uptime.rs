use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};

/// Request timeout for a single ping.
const PING_TIMEOUT: Duration = Duration::from_secs(10);

/// Keeps the portfolio site's tunnel awake by requesting it on a fixed interval.
pub struct UptimeService {
    client: reqwest::Client,
    url: String,
    interval: Duration,
    scheduler: JobScheduler,
}

impl UptimeService {
    pub async fn new(url: String, interval: Duration) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let client = reqwest::Client::builder().timeout(PING_TIMEOUT).build()?;
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            client,
            url,
            interval,
            scheduler,
        })
    }

    pub async fn start(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let client = self.client.clone();
        let url = self.url.clone();

        let ping_job = Job::new_repeated_async(self.interval, move |_uuid, _l| {
            let client = client.clone();
            let url = url.clone();
            Box::pin(async move {
                log_ping(&url, ping(&client, &url).await);
            })
        })?;

        self.scheduler.add(ping_job).await?;
        self.scheduler.start().await?;

        tracing::info!(
            "Uptime service started - pinging {} every {}s",
            self.url,
            self.interval.as_secs()
        );

        // First ping right away rather than one interval from now
        self.ping_now().await;
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.scheduler.shutdown().await?;
        Ok(())
    }

    pub async fn ping_now(&self) {
        log_ping(&self.url, ping(&self.client, &self.url).await);
    }
}

/// Requests `url` once and returns the response status.
pub async fn ping(client: &reqwest::Client, url: &str) -> Result<reqwest::StatusCode, reqwest::Error> {
    let response = client.get(url).send().await?;
    Ok(response.status())
}

fn log_ping(url: &str, result: Result<reqwest::StatusCode, reqwest::Error>) {
    match result {
        Ok(status) if status.is_success() => tracing::info!("Ping {} succeeded: {}", url, status),
        Ok(status) => tracing::warn!("Ping {} returned {}", url, status),
        Err(e) => tracing::error!("Ping {} failed: {}", url, e),
    }
}
