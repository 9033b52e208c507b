use std::time::Duration;
use tokio::sync::OnceCell;

use crate::error::AppResult;

static HTTP_CLIENT: OnceCell<reqwest::Client> = OnceCell::const_new();

// Vision requests with two inline images routinely take longer than a minute.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub async fn http_client() -> AppResult<&'static reqwest::Client> {
    let client = HTTP_CLIENT
        .get_or_try_init(|| async {
            reqwest::Client::builder()
                .user_agent("ChartPatternAnalyzer/0.1")
                .timeout(REQUEST_TIMEOUT)
                .build()
        })
        .await?;
    Ok(client)
}
