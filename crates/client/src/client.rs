//! The REST client.

use std::collections::BTreeMap;

use common::{ComponentStatus, ProductId, ReviewId};
use domain::{CreateCategory, CreateProduct, CreateReview};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use store::{Category, CategoryPatch, Product, ProductPatch, Review, ReviewPatch};

use crate::ClientConfig;
use crate::error::{ClientError, Result};

/// Which service a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Category,
    Product,
    Review,
}

/// Body of a `/health` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub status: ComponentStatus,
    #[serde(default)]
    pub database: ComponentStatus,
    #[serde(default)]
    pub dependencies: BTreeMap<String, ComponentStatus>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the category, product and review services.
#[derive(Debug, Clone)]
pub struct ShopClient {
    http: Client,
    category_url: Url,
    product_url: Url,
    review_url: Url,
}

fn parse_base(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| ClientError::InvalidBaseUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    if parsed.cannot_be_a_base() {
        return Err(ClientError::InvalidBaseUrl {
            url: url.to_string(),
            reason: "expected an absolute URL".to_string(),
        });
    }
    Ok(parsed)
}

impl ShopClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            category_url: parse_base(&config.category_url)?,
            product_url: parse_base(&config.product_url)?,
            review_url: parse_base(&config.review_url)?,
        })
    }

    fn url(&self, service: Service, segments: &[&str]) -> Url {
        let mut url = match service {
            Service::Category => self.category_url.clone(),
            Service::Product => self.product_url.clone(),
            Service::Review => self.review_url.clone(),
        };
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, service: Service, segments: &[&str]) -> RequestBuilder {
        let url = self.url(service, segments);
        tracing::debug!(%method, %url, "sending request");
        self.http.request(method, url)
    }

    async fn checked(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = Self::checked(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn discard(&self, request: RequestBuilder) -> Result<()> {
        Self::checked(request.send().await?).await?;
        Ok(())
    }

    // -- Categories --

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.fetch(self.request(Method::GET, Service::Category, &["api", "categories"]))
            .await
    }

    pub async fn get_category(&self, id: &str) -> Result<Category> {
        self.fetch(self.request(Method::GET, Service::Category, &["api", "categories", id]))
            .await
    }

    pub async fn create_category(&self, category: &CreateCategory) -> Result<Category> {
        self.fetch(
            self.request(Method::POST, Service::Category, &["api", "categories"])
                .json(category),
        )
        .await
    }

    pub async fn update_category(&self, id: &str, patch: &CategoryPatch) -> Result<Category> {
        self.fetch(
            self.request(Method::PUT, Service::Category, &["api", "categories", id])
                .json(patch),
        )
        .await
    }

    pub async fn delete_category(&self, id: &str) -> Result<()> {
        self.discard(self.request(Method::DELETE, Service::Category, &["api", "categories", id]))
            .await
    }

    // -- Products --

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.fetch(self.request(Method::GET, Service::Product, &["api", "products"]))
            .await
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Product> {
        let id = id.to_string();
        self.fetch(self.request(Method::GET, Service::Product, &["api", "products", &id]))
            .await
    }

    pub async fn products_by_category(&self, category_id: &str) -> Result<Vec<Product>> {
        self.fetch(self.request(
            Method::GET,
            Service::Product,
            &["api", "products", "category", category_id],
        ))
        .await
    }

    pub async fn create_product(&self, product: &CreateProduct) -> Result<Product> {
        self.fetch(
            self.request(Method::POST, Service::Product, &["api", "products"])
                .json(product),
        )
        .await
    }

    pub async fn update_product(&self, id: ProductId, patch: &ProductPatch) -> Result<Product> {
        let id = id.to_string();
        self.fetch(
            self.request(Method::PUT, Service::Product, &["api", "products", &id])
                .json(patch),
        )
        .await
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<()> {
        let id = id.to_string();
        self.discard(self.request(Method::DELETE, Service::Product, &["api", "products", &id]))
            .await
    }

    // -- Reviews --

    pub async fn list_reviews(&self) -> Result<Vec<Review>> {
        self.fetch(self.request(Method::GET, Service::Review, &["api", "reviews"]))
            .await
    }

    pub async fn get_review(&self, id: ReviewId) -> Result<Review> {
        let id = id.to_string();
        self.fetch(self.request(Method::GET, Service::Review, &["api", "reviews", &id]))
            .await
    }

    /// Reviews attached to a product. Served by the review service.
    pub async fn reviews_for_product(&self, product_id: ProductId) -> Result<Vec<Review>> {
        let id = product_id.to_string();
        self.fetch(self.request(
            Method::GET,
            Service::Review,
            &["api", "products", &id, "reviews"],
        ))
        .await
    }

    pub async fn create_review(&self, review: &CreateReview) -> Result<Review> {
        self.fetch(
            self.request(Method::POST, Service::Review, &["api", "reviews"])
                .json(review),
        )
        .await
    }

    pub async fn update_review(&self, id: ReviewId, patch: &ReviewPatch) -> Result<Review> {
        let id = id.to_string();
        self.fetch(
            self.request(Method::PUT, Service::Review, &["api", "reviews", &id])
                .json(patch),
        )
        .await
    }

    pub async fn delete_review(&self, id: ReviewId) -> Result<()> {
        let id = id.to_string();
        self.discard(self.request(Method::DELETE, Service::Review, &["api", "reviews", &id]))
            .await
    }

    // -- Health --

    /// Reads a service's health. A 503 still carries a report, so it is
    /// returned rather than treated as an error.
    pub async fn health(&self, service: Service) -> Result<HealthReport> {
        let response = self.request(Method::GET, service, &["health"]).send().await?;
        if response.status() == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            return Ok(response.json().await?);
        }
        Ok(Self::checked(response).await?.json().await?)
    }
}
