use async_trait::async_trait;

use crate::error::FetchError;
use crate::http::FetchClient;
use crate::model::ImageBytes;

/// Downloads card artwork
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch_image(&self, url: &str) -> Result<ImageBytes, FetchError>;
}

#[derive(Clone)]
pub struct ImageFetcher {
    client: FetchClient,
}

impl ImageFetcher {
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageSource for ImageFetcher {
    async fn fetch_image(&self, url: &str) -> Result<ImageBytes, FetchError> {
        self.client.fetch_binary(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::client;
    use mockito::Server;

    #[tokio::test]
    async fn test_fetch_image_missing() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/avatar/1.jpeg")
            .with_status(404)
            .with_header("content-type", "text/html")
            .with_body("<h1>404</h1>")
            .create_async()
            .await;

        let err = ImageFetcher::new(client())
            .fetch_image(&format!("{}/avatar/1.jpeg", server.url()))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_fetch_image_png() {
        let png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/avatar/2.png")
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body(png.clone())
            .create_async()
            .await;

        let image = ImageFetcher::new(client())
            .fetch_image(&format!("{}/avatar/2.png", server.url()))
            .await
            .unwrap();

        assert_eq!(image.data, png);
        assert_eq!(image.format(), "png");
    }
}
