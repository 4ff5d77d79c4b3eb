//! Product lookup through the Product Advertising API 5 `SearchItems` operation.
//!
//! Requests are signed with SigV4 for the `ProductAdvertisingAPI` service and
//! sent as JSON. Only the first listing price of each item is kept.

use std::time::SystemTime;

use aws_credential_types::Credentials;
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4;
use serde::{Deserialize, Serialize};

use crate::config::ProductSearchConfig;
use crate::credentials::{self, PaapiCredentials};
use crate::error::{ConfigError, ProviderError, ProviderErrorKind};

const SERVICE: &str = "ProductAdvertisingAPI";
const TARGET: &str = "com.amazon.paapi5.v1.ProductAdvertisingAPIv1.SearchItems";
const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const RESOURCES: [&str; 3] = [
    "Images.Primary.Medium",
    "ItemInfo.Title",
    "Offers.Listings.Price",
];

/// Summary of one search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductItem {
    pub asin: String,
    pub detail_page_url: Option<String>,
    pub title: Option<String>,
    pub price: Option<String>,
    pub image_url: Option<String>,
}

/// Signed client for `SearchItems`.
pub struct ProductSearchClient {
    credentials: PaapiCredentials,
    host: String,
    region: String,
    client: reqwest::Client,
}

// --- Request types ---

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SearchItemsRequest<'a> {
    keywords: &'a str,
    partner_tag: &'a str,
    partner_type: &'static str,
    search_index: &'static str,
    item_count: u32,
    resources: &'static [&'static str],
}

// --- Response types ---

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct SearchItemsResponse {
    #[serde(default)]
    search_result: Option<SearchResult>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct SearchResult {
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Item {
    #[serde(rename = "ASIN")]
    asin: String,
    #[serde(rename = "DetailPageURL")]
    detail_page_url: Option<String>,
    item_info: Option<ItemInfo>,
    offers: Option<Offers>,
    images: Option<Images>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ItemInfo {
    title: Option<DisplayValue>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DisplayValue {
    display_value: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Offers {
    #[serde(default)]
    listings: Vec<Listing>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Listing {
    price: Option<Price>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Price {
    display_amount: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Images {
    primary: Option<ImageSizes>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ImageSizes {
    medium: Option<ImageUrl>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ImageUrl {
    #[serde(rename = "URL")]
    url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiError {
    code: String,
    #[serde(default)]
    message: String,
}

impl From<Item> for ProductItem {
    fn from(item: Item) -> Self {
        Self {
            asin: item.asin,
            detail_page_url: item.detail_page_url,
            title: item
                .item_info
                .and_then(|info| info.title)
                .map(|t| t.display_value),
            price: item
                .offers
                .and_then(|offers| offers.listings.into_iter().next())
                .and_then(|listing| listing.price)
                .map(|p| p.display_amount),
            image_url: item
                .images
                .and_then(|images| images.primary)
                .and_then(|primary| primary.medium)
                .map(|m| m.url),
        }
    }
}

impl ProductSearchClient {
    pub fn new(credentials: PaapiCredentials, host: &str, region: &str) -> Self {
        Self {
            credentials,
            host: host.to_string(),
            region: region.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Load the credentials file named by the config.
    pub fn from_config(config: &ProductSearchConfig) -> Result<Self, ConfigError> {
        let creds: PaapiCredentials = credentials::load(&config.credentials)?;
        Ok(Self::new(creds, &config.host, &config.region))
    }

    fn url(&self) -> String {
        format!("https://{}/paapi5/searchitems", self.host)
    }

    fn request_body(&self, keywords: &str, item_count: u32) -> Result<Vec<u8>, ProviderError> {
        let request = SearchItemsRequest {
            keywords,
            partner_tag: &self.credentials.partner_tag,
            partner_type: "Associates",
            search_index: "All",
            item_count,
            resources: &RESOURCES,
        };
        serde_json::to_vec(&request)
            .map_err(|e| ProviderError::new(ProviderErrorKind::Service, e.to_string()))
    }

    /// SigV4 headers (`authorization`, `x-amz-date`) for a request body.
    fn signed_headers(&self, body: &[u8]) -> Result<Vec<(String, String)>, ProviderError> {
        let sign_err = |message: String| {
            ProviderError::new(ProviderErrorKind::Auth, format!("Signing failed: {message}"))
        };

        let identity = Credentials::new(
            &self.credentials.access_key,
            &self.credentials.secret_key,
            None,
            None,
            "paapi-creds",
        )
        .into();
        let params = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(SERVICE)
            .time(SystemTime::now())
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| sign_err(e.to_string()))?
            .into();

        let url = self.url();
        let headers = [
            ("host", self.host.as_str()),
            ("content-type", CONTENT_TYPE),
            ("content-encoding", "amz-1.0"),
            ("x-amz-target", TARGET),
        ];
        let signable = SignableRequest::new(
            "POST",
            url.as_str(),
            headers.into_iter(),
            SignableBody::Bytes(body),
        )
        .map_err(|e| sign_err(e.to_string()))?;

        let (instructions, _signature) = sign(signable, &params)
            .map_err(|e| sign_err(e.to_string()))?
            .into_parts();
        Ok(instructions
            .headers()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect())
    }

    /// Search the catalog. An empty result is not an error.
    pub async fn search_items(
        &self,
        keywords: &str,
        item_count: u32,
    ) -> Result<Vec<ProductItem>, ProviderError> {
        let body = self.request_body(keywords, item_count)?;
        let signed = self.signed_headers(&body)?;

        let mut request = self
            .client
            .post(self.url())
            .header("content-type", CONTENT_TYPE)
            .header("content-encoding", "amz-1.0")
            .header("x-amz-target", TARGET);
        for (name, value) in signed {
            request = request.header(name, value);
        }

        tracing::debug!("SearchItems {:?} ({} items)", keywords, item_count);
        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorKind::Network, e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorKind::Network, e.to_string()))?;

        parse_response(status, &text)
    }
}

/// Map an API error code to a failure category.
fn classify_code(code: &str) -> ProviderErrorKind {
    match code {
        "TooManyRequests" | "RequestThrottled" => ProviderErrorKind::Quota,
        "InvalidSignature" | "IncompleteSignature" | "UnrecognizedClient"
        | "InvalidPartnerTag" | "AccessDenied" | "AccessDeniedAwsUsers" => {
            ProviderErrorKind::Auth
        }
        _ => ProviderErrorKind::Service,
    }
}

fn parse_response(status: u16, body: &str) -> Result<Vec<ProductItem>, ProviderError> {
    let parsed: SearchItemsResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) if !(200..300).contains(&status) => {
            return Err(ProviderError::from_status(status, body));
        }
        Err(e) => {
            return Err(ProviderError::new(
                ProviderErrorKind::MalformedResponse,
                e.to_string(),
            ))
        }
    };

    if let Some(error) = parsed.errors.into_iter().next() {
        if error.code == "NoResults" {
            return Ok(Vec::new());
        }
        let mut err = ProviderError::new(
            classify_code(&error.code),
            format!("{}: {}", error.code, error.message),
        );
        if !(200..300).contains(&status) {
            err.status_code = Some(status);
        }
        return Err(err);
    }

    if !(200..300).contains(&status) {
        return Err(ProviderError::from_status(status, body));
    }

    Ok(parsed
        .search_result
        .map(|result| result.items.into_iter().map(ProductItem::from).collect())
        .unwrap_or_default())
}
