// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! JSON-over-HTTP tune service.
//!
//! `GET <base>/tunes` lists tunes, `POST <base>/tunes` creates one.

use reqwest::{Client, Response};
use tracing::debug;

use super::{StoreError, TuneService};
use crate::music::Tune;

/// Tune service reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpTuneService {
    client: Client,
    tunes_url: String,
}

impl HttpTuneService {
    /// Create a service rooted at `base_url` (e.g. `http://localhost:3000/api/v1`)
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a service using an existing client
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            tunes_url: format!("{}/tunes", base_url.trim_end_matches('/')),
        }
    }

    /// URL of the tunes collection
    pub fn tunes_url(&self) -> &str {
        &self.tunes_url
    }

    fn check_status(&self, response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(StoreError::Status {
                status: status.as_u16(),
                url: self.tunes_url.clone(),
            })
        }
    }
}

impl TuneService for HttpTuneService {
    async fn list(&self) -> Result<Vec<Tune>, StoreError> {
        debug!(url = %self.tunes_url, "listing tunes");
        let response = self.client.get(&self.tunes_url).send().await?;
        let tunes = self.check_status(response)?.json::<Vec<Tune>>().await?;
        Ok(tunes)
    }

    async fn create(&self, tune: &Tune) -> Result<Tune, StoreError> {
        debug!(url = %self.tunes_url, name = %tune.name, "creating tune");
        let response = self.client.post(&self.tunes_url).json(tune).send().await?;
        let created = self.check_status(response)?.json::<Tune>().await?;
        Ok(created)
    }
}
