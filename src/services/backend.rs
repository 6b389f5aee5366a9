use crate::models::{UserPreferences, UserProfile, UserRecord};
use crate::repo::{ProfileRepository, RepoError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the hosted document backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl From<BackendError> for RepoError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::NotFound(msg) => RepoError::NotFound(msg),
            other => RepoError::Transient(other.to_string()),
        }
    }
}

/// Collection IDs in the hosted backend
#[derive(Debug, Clone)]
pub struct BackendCollections {
    pub profiles: String,
    pub preferences: String,
}

/// Client for the hosted document backend that owns profile data
///
/// The app's profile and preference documents live in a managed document
/// store; this client is the read-only view the engine gets of them.
pub struct BackendClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: BackendCollections,
}

impl BackendClient {
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: BackendCollections,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        })
    }

    fn documents_url(&self, collection: &str, queries: &[String]) -> String {
        let base = format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        );
        if queries.is_empty() {
            return base;
        }
        let queries_json = serde_json::to_string(queries).unwrap_or_default();
        format!("{}?query={}", base, urlencoding::encode(&queries_json))
    }

    async fn fetch_documents(&self, url: &str) -> Result<Vec<Value>, BackendError> {
        let response = self
            .client
            .get(url)
            .header("X-Backend-Key", &self.api_key)
            .header("X-Backend-Project", &self.project_id)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::ApiError(format!(
                "Document query failed: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| BackendError::InvalidResponse("Missing documents array".into()))?;

        Ok(documents
            .iter()
            .map(|doc| doc.get("data").unwrap_or(doc).clone())
            .collect())
    }

    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, BackendError> {
        let url = self.documents_url(
            &self.collections.profiles,
            &[format!("equal(\"userId\", \"{}\")", user_id)],
        );
        tracing::debug!("Fetching profile for user: {}", user_id);

        let documents = self.fetch_documents(&url).await?;
        let doc = documents
            .first()
            .ok_or_else(|| BackendError::NotFound(format!("Profile not found for user {}", user_id)))?;

        serde_json::from_value(doc.clone())
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse profile: {}", e)))
    }

    async fn get_preferences(&self, user_id: &str) -> Result<UserPreferences, BackendError> {
        let url = self.documents_url(
            &self.collections.preferences,
            &[format!("equal(\"userId\", \"{}\")", user_id)],
        );
        tracing::debug!("Fetching preferences for user: {}", user_id);

        let documents = self.fetch_documents(&url).await?;
        let doc = documents.first().ok_or_else(|| {
            BackendError::NotFound(format!("Preferences not found for user {}", user_id))
        })?;

        serde_json::from_value(doc.clone()).map_err(|e| {
            BackendError::InvalidResponse(format!("Failed to parse preferences: {}", e))
        })
    }

    async fn list_profiles(
        &self,
        exclude_ids: &HashSet<String>,
    ) -> Result<Vec<UserProfile>, BackendError> {
        let mut queries = vec!["equal(\"isActive\", true)".to_string()];
        for id in exclude_ids {
            queries.push(format!("notEqual(\"userId\", \"{}\")", id));
        }

        let url = self.documents_url(&self.collections.profiles, &queries);
        let documents = self.fetch_documents(&url).await?;

        // Documents the store lets through but we asked to exclude are
        // filtered again here; the backend treats excess filters as advisory
        let profiles: Vec<UserProfile> = documents
            .iter()
            .filter_map(|doc| serde_json::from_value(doc.clone()).ok())
            .filter(|p: &UserProfile| !exclude_ids.contains(&p.user_id))
            .collect();

        Ok(profiles)
    }

    async fn list_preferences_for(
        &self,
        user_ids: &[String],
    ) -> Result<HashMap<String, UserPreferences>, BackendError> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let id_list = user_ids
            .iter()
            .map(|id| format!("\"{}\"", id))
            .collect::<Vec<_>>()
            .join(",");
        let url = self.documents_url(
            &self.collections.preferences,
            &[format!("in(\"userId\", [{}])", id_list)],
        );

        let documents = self.fetch_documents(&url).await?;
        Ok(documents
            .iter()
            .filter_map(|doc| serde_json::from_value::<UserPreferences>(doc.clone()).ok())
            .map(|prefs| (prefs.user_id.clone(), prefs))
            .collect())
    }
}

#[async_trait]
impl ProfileRepository for BackendClient {
    async fn get_record(&self, user_id: &str) -> Result<UserRecord, RepoError> {
        let profile = self.get_profile(user_id).await?;
        let preferences = self.get_preferences(user_id).await?;
        Ok(UserRecord {
            profile,
            preferences,
        })
    }

    async fn list_records_except(
        &self,
        exclude_ids: &HashSet<String>,
    ) -> Result<Vec<UserRecord>, RepoError> {
        let profiles = self.list_profiles(exclude_ids).await?;

        let ids: Vec<String> = profiles.iter().map(|p| p.user_id.clone()).collect();
        let mut preferences = self.list_preferences_for(&ids).await?;

        // Profiles whose preferences document is missing cannot be scored;
        // drop them rather than fail the whole pool
        let records: Vec<UserRecord> = profiles
            .into_iter()
            .filter_map(|profile| {
                match preferences.remove(&profile.user_id) {
                    Some(prefs) => Some(UserRecord {
                        profile,
                        preferences: prefs,
                    }),
                    None => {
                        tracing::debug!("No preferences for {}, skipping", profile.user_id);
                        None
                    }
                }
            })
            .collect();

        Ok(records)
    }
}
