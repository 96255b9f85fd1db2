//! Drive v3 REST client

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{DriveError, Result};

use super::{DirectoryService, ListPage, ListRequest};

pub struct HttpDirectoryService {
    client: Client,
    config: ClientConfig,
}

impl HttpDirectoryService {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("drivetree/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    fn files_url(&self, suffix: &str) -> String {
        format!("{}/files{}", self.config.api_base, suffix)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.bearer_auth(&self.config.access_token).send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(DriveError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl DirectoryService for HttpDirectoryService {
    fn list(&self, request: &ListRequest) -> Result<ListPage> {
        debug!(query = %request.query, page_token = ?request.page_token, "listing files");

        let mut params: Vec<(&str, String)> = vec![
            ("q", request.query.clone()),
            ("fields", request.fields.clone()),
            ("pageSize", request.page_size.to_string()),
            ("supportsAllDrives", request.supports_all_drives.to_string()),
            (
                "includeItemsFromAllDrives",
                request.include_items_from_all_drives.to_string(),
            ),
        ];
        if let Some(ref token) = request.page_token {
            params.push(("pageToken", token.clone()));
        }
        if let Some(ref order_by) = request.order_by {
            params.push(("orderBy", order_by.clone()));
        }

        let response = self.send(self.client.get(self.files_url("")).query(&params))?;
        Ok(response.json()?)
    }

    fn get(&self, id: &str, fields: &str) -> Result<Value> {
        debug!(id, fields, "fetching entry metadata");
        let request = self
            .client
            .get(self.files_url(&format!("/{id}")))
            .query(&[("fields", fields), ("supportsAllDrives", "true")]);
        Ok(self.send(request)?.json()?)
    }

    fn download(&self, id: &str) -> Result<Vec<u8>> {
        debug!(id, "downloading file content");
        let request = self
            .client
            .get(self.files_url(&format!("/{id}")))
            .query(&[("alt", "media"), ("supportsAllDrives", "true")]);
        Ok(self.send(request)?.bytes()?.to_vec())
    }

    fn export(&self, id: &str, mime_type: &str) -> Result<Vec<u8>> {
        debug!(id, mime_type, "exporting document");
        let request = self
            .client
            .get(self.files_url(&format!("/{id}/export")))
            .query(&[("mimeType", mime_type), ("supportsAllDrives", "true")]);
        Ok(self.send(request)?.bytes()?.to_vec())
    }
}
